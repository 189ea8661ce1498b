//! Reverse-mode differentiation over expression graphs.
//!
//! `gradient` composes, for every child that depends on the target variable,
//! the node's local partial derivative with the child's own gradient, and
//! accumulates the branches additively. Children that do not depend on the
//! variable contribute nothing and are filtered out before the sum is built,
//! so no explicit zero node ever enters the graph.

use log::trace;

use crate::error::Error;
use crate::index::Index;
use crate::node::{Node, NodeOp};

impl Node {
    /// d(self)/d(variable), with one fresh target index synthesized per axis
    /// of `variable`, matching lengths. The fresh indices label the
    /// denominator axes of the derivative.
    pub fn gradient(&self, variable: &Node) -> Result<Node, Error> {
        let indices: Vec<Index> = variable
            .indices()
            .iter()
            .map(|index| Index::new(index.length()))
            .collect();
        self.gradient_with(variable, &indices)
    }

    /// d(self)/d(variable) against explicit target indices.
    pub fn gradient_with(&self, variable: &Node, indices: &[Index]) -> Result<Node, Error> {
        if self.is_leaf() {
            return self.backpropagate(variable, indices, self);
        }
        let mut branches = Vec::new();
        for child in self.children() {
            if !child.depends_on(variable) {
                continue;
            }
            trace!("gradient branch through {:?}", child);
            let local = self.backpropagate(variable, indices, &child)?;
            let downstream = child.gradient_with(variable, indices)?;
            branches.push(local * downstream);
        }
        Ok(Node::sum(branches))
    }

    /// The local partial derivative of this node with respect to one child.
    ///
    /// `Product` applies the product rule: the derivative with respect to one
    /// factor is the contraction of all remaining factors (the `indices`
    /// argument is unused there, the remaining factors carry their own). A
    /// leaf differentiating itself yields the outer product of one Kronecker
    /// delta per axis pair; any other leaf is the additive identity,
    /// represented as an empty sum and dropped by the caller's accumulation.
    pub fn backpropagate(
        &self,
        variable: &Node,
        indices: &[Index],
        child: &Node,
    ) -> Result<Node, Error> {
        match self.op() {
            NodeOp::Product => {
                let remaining: Vec<Node> = self
                    .children()
                    .into_iter()
                    .filter(|sibling| !sibling.ptr_eq(child))
                    .collect();
                Ok(Node::product(remaining))
            }
            NodeOp::Tensor | NodeOp::Constant | NodeOp::Identity | NodeOp::Variable { .. } => {
                if self.ptr_eq(variable) {
                    let deltas: Vec<Node> = self
                        .indices()
                        .into_iter()
                        .zip(indices.iter().copied())
                        .map(|(own, target)| Node::identity(own, target))
                        .collect();
                    Ok(Node::product(deltas))
                } else {
                    Ok(Node::sum(Vec::new()))
                }
            }
            op => Err(Error::Unsupported {
                kind: op.kind_name(),
                operation: "backpropagate",
            }),
        }
    }
}
