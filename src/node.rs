//! The expression-graph node hierarchy.
//!
//! A [`Node`] is a cheap-clone shared handle to one vertex of a functional
//! graph. The same child handle may be referenced by several parents; the
//! simplifier exploits this by relabeling shared leaf index lists in place.
//! Node identity (the "is this the same object" question asked by the
//! differentiation engine) is pointer identity, never structural equality.

use std::cell::RefCell;
use std::fmt;
use std::ops::Mul;
use std::rc::Rc;

use crate::index::Index;

/// The closed set of node kinds.
///
/// Group kinds (`Product`, `Sum`, `Multiply`) are commutative-associative
/// operations kept in a canonical flat form by construction. Leaf kinds
/// (`Tensor`, `Constant`, `Identity`, `Variable`) carry an ordered index
/// list and have no children.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeOp {
    /// Tensor contraction: free indices are those with odd occurrence parity.
    Product,
    /// Elementwise sum.
    Sum,
    /// Elementwise product.
    Multiply,
    /// Logistic activation (unary).
    Sigmoid,
    /// Plain tensor leaf.
    Tensor,
    /// Non-semantic constant leaf.
    Constant,
    /// Kronecker delta over exactly two indices `(top, bottom)`.
    Identity,
    /// Differentiable leaf resolved against the stimulus mapping by `tag`.
    Variable {
        /// Lookup key into the stimulus mapping.
        tag: String,
    },
}

impl NodeOp {
    /// The kind name used in diagnostics and error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            NodeOp::Product => "Product",
            NodeOp::Sum => "Sum",
            NodeOp::Multiply => "Multiply",
            NodeOp::Sigmoid => "Sigmoid",
            NodeOp::Tensor => "Tensor",
            NodeOp::Constant => "Constant",
            NodeOp::Identity => "Identity",
            NodeOp::Variable { .. } => "Variable",
        }
    }

    pub(crate) fn is_leaf(&self) -> bool {
        matches!(
            self,
            NodeOp::Tensor | NodeOp::Constant | NodeOp::Identity | NodeOp::Variable { .. }
        )
    }

    pub(crate) fn is_group(&self) -> bool {
        matches!(self, NodeOp::Product | NodeOp::Sum | NodeOp::Multiply)
    }

    fn symbol(&self) -> &'static str {
        match self {
            NodeOp::Product => "⨯",
            NodeOp::Sum => "+",
            NodeOp::Multiply => "*",
            _ => "",
        }
    }
}

pub(crate) struct NodeData {
    pub(crate) op: NodeOp,
    pub(crate) children: Vec<Node>,
    // Leaf index list; empty for interior nodes. Relabeled in place by the
    // simplifier, so every parent of a shared leaf sees the mutation.
    pub(crate) indices: Vec<Index>,
}

/// A shared handle to one vertex of an expression graph.
#[derive(Clone)]
pub struct Node(pub(crate) Rc<RefCell<NodeData>>);

impl Node {
    fn leaf(op: NodeOp, indices: Vec<Index>) -> Self {
        Node(Rc::new(RefCell::new(NodeData {
            op,
            children: Vec::new(),
            indices,
        })))
    }

    /// A plain tensor leaf over the given axes.
    pub fn tensor(indices: Vec<Index>) -> Self {
        Self::leaf(NodeOp::Tensor, indices)
    }

    /// A constant tensor leaf. Behaves like [`Node::tensor`]; the kind only
    /// marks intent.
    pub fn constant(indices: Vec<Index>) -> Self {
        Self::leaf(NodeOp::Constant, indices)
    }

    /// The Kronecker delta relabeling `top` to `bottom`. Taking the pair by
    /// value makes a malformed delta unrepresentable.
    pub fn identity(top: Index, bottom: Index) -> Self {
        Self::leaf(NodeOp::Identity, vec![top, bottom])
    }

    /// A differentiable leaf bound to a stimulus key.
    pub fn variable(indices: Vec<Index>, tag: impl Into<String>) -> Self {
        Self::leaf(NodeOp::Variable { tag: tag.into() }, indices)
    }

    /// Group construction with flattening: a child of the same concrete kind
    /// has its own children spliced in place of itself, so no group ever
    /// directly nests its own kind. The flat form is not re-checked later.
    fn group(op: NodeOp, children: Vec<Node>) -> Self {
        let mut flat = Vec::with_capacity(children.len());
        for child in children {
            if child.0.borrow().op == op {
                flat.extend(child.children());
            } else {
                flat.push(child);
            }
        }
        Node(Rc::new(RefCell::new(NodeData {
            op,
            children: flat,
            indices: Vec::new(),
        })))
    }

    /// Tensor contraction over the given factors.
    pub fn product(children: Vec<Node>) -> Self {
        Self::group(NodeOp::Product, children)
    }

    /// Elementwise sum of the given terms.
    pub fn sum(children: Vec<Node>) -> Self {
        Self::group(NodeOp::Sum, children)
    }

    /// Elementwise product of the given factors.
    pub fn multiply(children: Vec<Node>) -> Self {
        Self::group(NodeOp::Multiply, children)
    }

    /// Logistic activation of a single operand.
    pub fn sigmoid(child: Node) -> Self {
        Node(Rc::new(RefCell::new(NodeData {
            op: NodeOp::Sigmoid,
            children: vec![child],
            indices: Vec::new(),
        })))
    }

    /// The operation performed by this node.
    pub fn op(&self) -> NodeOp {
        self.0.borrow().op.clone()
    }

    /// The kind name used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        self.0.borrow().op.kind_name()
    }

    /// The ordered child handles.
    pub fn children(&self) -> Vec<Node> {
        self.0.borrow().children.clone()
    }

    /// Whether this node is a tensor-family leaf.
    pub fn is_leaf(&self) -> bool {
        self.0.borrow().op.is_leaf()
    }

    /// Whether this node is a commutative group operation.
    pub fn is_group(&self) -> bool {
        self.0.borrow().op.is_group()
    }

    /// Pointer identity: do both handles refer to the same graph vertex?
    pub fn ptr_eq(&self, other: &Node) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// The free indices of this node, derived fresh on every call so that
    /// simplifier mutations are always reflected.
    ///
    /// Leaves report their stored list. `Product` accumulates occurrence
    /// parity across the entire flat child list: an index appearing an odd
    /// number of times survives, an even count cancels it. Every other
    /// interior kind takes the first-seen-order union of its children.
    pub fn indices(&self) -> Vec<Index> {
        let data = self.0.borrow();
        if data.op.is_leaf() {
            return data.indices.clone();
        }
        if data.op == NodeOp::Product {
            let mut present: Vec<(Index, bool)> = Vec::new();
            for child in &data.children {
                for index in child.indices() {
                    if let Some(slot) = present.iter_mut().find(|slot| slot.0 == index) {
                        slot.1 = !slot.1;
                    } else {
                        present.push((index, true));
                    }
                }
            }
            return present
                .into_iter()
                .filter(|slot| slot.1)
                .map(|slot| slot.0)
                .collect();
        }
        let mut union: Vec<Index> = Vec::new();
        for child in &data.children {
            for index in child.indices() {
                if !union.contains(&index) {
                    union.push(index);
                }
            }
        }
        union
    }

    /// Every tensor-family leaf reachable from this node, in child order.
    /// A leaf reachable along two paths appears twice; callers needing
    /// uniqueness deduplicate externally.
    pub fn variables(&self) -> Vec<Node> {
        let data = self.0.borrow();
        if data.op.is_leaf() {
            return vec![self.clone()];
        }
        data.children
            .iter()
            .flat_map(|child| child.variables())
            .collect()
    }

    pub(crate) fn depends_on(&self, variable: &Node) -> bool {
        self.variables()
            .iter()
            .any(|leaf| leaf.ptr_eq(variable))
    }

    pub(crate) fn set_children(&self, children: Vec<Node>) {
        self.0.borrow_mut().children = children;
    }

    pub(crate) fn remove_child(&self, position: usize) {
        self.0.borrow_mut().children.remove(position);
    }

    /// Swap one occurrence of `from` for `to` in a leaf's index list.
    /// Returns false when this leaf does not hold `from`.
    pub(crate) fn replace_leaf_index(&self, from: Index, to: Index) -> bool {
        let mut data = self.0.borrow_mut();
        match data.indices.iter_mut().find(|index| **index == from) {
            Some(slot) => {
                *slot = to;
                true
            }
            None => false,
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self.0.borrow();
        match &data.op {
            NodeOp::Tensor | NodeOp::Constant | NodeOp::Variable { .. } => {
                write!(f, "[")?;
                for (position, index) in data.indices.iter().enumerate() {
                    if position > 0 {
                        write!(f, "⨯")?;
                    }
                    write!(f, "{index}")?;
                }
                write!(f, "]")
            }
            NodeOp::Identity => {
                write!(f, "δ")?;
                for index in &data.indices {
                    write!(f, "{}", index.tag())?;
                }
                Ok(())
            }
            NodeOp::Sigmoid => write!(f, "Sigmoid({})", data.children[0]),
            op => {
                write!(f, "(")?;
                for (position, child) in data.children.iter().enumerate() {
                    if position > 0 {
                        write!(f, "{}", op.symbol())?;
                    }
                    write!(f, "{child}")?;
                }
                write!(f, ")")?;
                for index in self.indices() {
                    write!(f, "{}", index.tag())?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind_name(), self)
    }
}

impl Mul for Node {
    type Output = Node;
    fn mul(self, rhs: Node) -> Node {
        Node::product(vec![self, rhs])
    }
}

impl Mul<&Node> for Node {
    type Output = Node;
    fn mul(self, rhs: &Node) -> Node {
        Node::product(vec![self, rhs.clone()])
    }
}

impl Mul<Node> for &Node {
    type Output = Node;
    fn mul(self, rhs: Node) -> Node {
        Node::product(vec![self.clone(), rhs])
    }
}

impl Mul<&Node> for &Node {
    type Output = Node;
    fn mul(self, rhs: &Node) -> Node {
        Node::product(vec![self.clone(), rhs.clone()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn axes<const N: usize>(length: usize) -> [Index; N] {
        std::array::from_fn(|_| Index::new(length))
    }

    #[test]
    fn same_kind_children_flatten() {
        let [i, j, k, l] = axes::<4>(2);
        let a = Node::tensor(vec![i, j]);
        let b = Node::tensor(vec![j, k]);
        let c = Node::tensor(vec![k, l]);

        let nested = Node::product(vec![a.clone(), Node::product(vec![b.clone(), c.clone()])]);
        assert_eq!(nested.children().len(), 3);
        assert!(nested.children().iter().all(Node::is_leaf));
    }

    #[test]
    fn different_kind_children_are_kept() {
        let [i, j] = axes::<2>(3);
        let inner = Node::sum(vec![Node::tensor(vec![i]), Node::tensor(vec![i])]);
        let graph = Node::product(vec![inner.clone(), Node::tensor(vec![i, j])]);
        assert_eq!(graph.children().len(), 2);
        assert!(graph.children()[0].ptr_eq(&inner));
    }

    #[test]
    fn product_parity_cancels_even_counts() {
        let [i, j] = axes::<2>(4);
        let factor = || Node::tensor(vec![j]);

        let twice = Node::product(vec![Node::tensor(vec![i, j]), factor()]);
        assert_eq!(twice.indices(), vec![i]);

        let thrice = Node::product(vec![Node::tensor(vec![i, j]), factor(), factor()]);
        assert_eq!(thrice.indices(), vec![i, j]);

        let four = Node::product(vec![factor(), factor(), factor(), factor()]);
        assert!(four.indices().is_empty());
    }

    #[test]
    fn sum_indices_are_the_union() {
        let [i, j, k] = axes::<3>(2);
        let graph = Node::sum(vec![Node::tensor(vec![i, j]), Node::tensor(vec![j, k])]);
        assert_eq!(graph.indices(), vec![i, j, k]);
    }

    #[test]
    fn multiply_flattens_like_any_group() {
        let [i] = axes::<1>(2);
        let inner = Node::multiply(vec![Node::tensor(vec![i]), Node::tensor(vec![i])]);
        let graph = Node::multiply(vec![inner, Node::tensor(vec![i])]);
        assert_eq!(graph.children().len(), 3);
    }

    #[test]
    fn constants_are_ordinary_leaves() {
        let [i, j] = axes::<2>(2);
        let c = Node::constant(vec![i, j]);
        assert!(c.is_leaf());
        assert_eq!(c.indices(), vec![i, j]);
        assert_eq!(c.variables().len(), 1);
    }

    #[test]
    fn variables_keep_duplicates() {
        let [i, j] = axes::<2>(2);
        let a = Node::tensor(vec![i, j]);
        let graph = &a * &a;
        let vars = graph.variables();
        assert_eq!(vars.len(), 2);
        assert!(vars[0].ptr_eq(&a) && vars[1].ptr_eq(&a));
    }

    #[test]
    fn debug_labels_carry_the_kind_name() {
        let [i, j] = axes::<2>(2);
        let graph = &Node::tensor(vec![i]) * &Node::tensor(vec![j]);
        assert!(format!("{graph:?}").starts_with("Product"));
        assert!(format!("{:?}", Node::identity(i, j)).starts_with("Identity"));
    }

    #[test]
    fn sigmoid_renders_its_operand() {
        let [i] = axes::<1>(2);
        let graph = Node::sigmoid(Node::tensor(vec![i]));
        assert!(graph.to_string().starts_with("Sigmoid("));
        assert_eq!(graph.indices(), vec![i]);
    }
}
