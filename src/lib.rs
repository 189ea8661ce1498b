//! eingrad: symbolic tensor expression graphs with reverse-mode autodiff.
//!
//! Graphs are composed from [`Index`]-labeled tensor leaves with the `*`
//! tensor-product operator (generalized Einstein contraction); they can be
//! forward-evaluated against a stimulus mapping, differentiated into new
//! gradient graphs, and simplified by eliminating singleton groups and
//! Kronecker-delta relabelings.
//!
//! # Example
//!
//! ```
//! use eingrad::{simplify, Index, Node};
//!
//! let i = Index::new(2);
//! let j = Index::new(3);
//! let k = Index::new(4);
//!
//! let a = Node::tensor(vec![i, j]);
//! let b = Node::tensor(vec![j, k]);
//!
//! // Shared index j contracts away.
//! let graph = &a * &b;
//! assert_eq!(graph.indices(), vec![i, k]);
//!
//! // d(graph)/d(b) carries the graph's free indices plus one fresh
//! // denominator axis per axis of b.
//! let gradient = simplify(graph.gradient(&b).unwrap());
//! assert_eq!(gradient.indices().len(), 4);
//! ```

pub mod error;
pub mod eval;
pub mod grad;
pub mod index;
pub mod node;
pub mod simplify;

pub use error::Error;
pub use eval::Stimulus;
pub use index::{shape, Index};
pub use node::{Node, NodeOp};
pub use simplify::simplify;
