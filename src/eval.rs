//! Forward evaluation against a stimulus mapping.
//!
//! Evaluation is value-type-agnostic: the stimulus maps variable tags to any
//! `Clone` value, and the engine only moves those values around. Only
//! `Variable` and `Identity` leaves have evaluation rules; everything else
//! reports an error rather than guessing.

use rustc_hash::FxHashMap;

use crate::error::Error;
use crate::node::{Node, NodeOp};

/// External inputs for forward evaluation, keyed by variable tag.
pub type Stimulus<V> = FxHashMap<String, V>;

impl Node {
    /// Forward-evaluate this graph against `stimulus`.
    ///
    /// Children are evaluated first; the node's own propagation rule is then
    /// applied to the ordered child results. A `Variable` leaf resolves its
    /// tag directly against the mapping.
    pub fn call<V: Clone>(&self, stimulus: &Stimulus<V>) -> Result<V, Error> {
        if let NodeOp::Variable { tag } = self.op() {
            return stimulus
                .get(&tag)
                .cloned()
                .ok_or(Error::MissingBinding { tag });
        }
        let mut features = Vec::new();
        for child in self.children() {
            features.push(child.call(stimulus)?);
        }
        self.propagate(features)
    }

    /// Apply this node's propagation rule to already-evaluated child values.
    pub(crate) fn propagate<V>(&self, features: Vec<V>) -> Result<V, Error> {
        match self.op() {
            // Pass-through on its single incoming value. A bare delta leaf
            // has no incoming value and therefore nothing to return.
            NodeOp::Identity => features
                .into_iter()
                .next()
                .ok_or(Error::NoEvaluationRule { kind: "Identity" }),
            NodeOp::Tensor => Err(Error::NoEvaluationRule { kind: "Tensor" }),
            NodeOp::Constant => Err(Error::NoEvaluationRule { kind: "Constant" }),
            op => Err(Error::Unsupported {
                kind: op.kind_name(),
                operation: "propagate",
            }),
        }
    }
}
