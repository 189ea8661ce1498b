//! In-place graph simplification.
//!
//! A single recursive top-down rewrite that removes singleton groups and
//! resolvable Kronecker-delta nodes. Delta elimination relabels one sibling
//! index occurrence in place; because leaf handles can be shared between
//! parents, the relabeling is visible through every parent. Callers that
//! need the original graph untouched must copy it before simplifying.

use log::debug;

use crate::index::Index;
use crate::node::{Node, NodeOp};

/// Simplify `graph` in place, returning the (possibly replaced) root.
///
/// Rules, applied top-down:
/// 1. a tensor-family leaf returns unchanged;
/// 2. a group with exactly one child is replaced by the simplified child;
/// 3. each `Identity` child whose `top` index occurs in a sibling relabels
///    that occurrence to `bottom` and is removed; a delta with no matching
///    sibling is left in place;
/// 4. the remaining children are simplified recursively and rebound.
pub fn simplify(graph: Node) -> Node {
    if graph.is_leaf() {
        return graph;
    }

    if graph.is_group() && graph.children().len() == 1 {
        return simplify(graph.children().remove(0));
    }

    // Reverse child order so removals do not disturb positions that have
    // not been processed yet.
    let mut position = graph.children().len();
    while position > 0 {
        position -= 1;
        let child = graph.children()[position].clone();
        if child.op() != NodeOp::Identity {
            continue;
        }
        let pair = child.indices();
        let (top, bottom) = (pair[0], pair[1]);
        if apply_kronecker(&graph, &child, top, bottom) {
            debug!("eliminated {:?} by relabeling {} to {}", child, top, bottom);
            graph.remove_child(position);
        }
    }

    let simplified: Vec<Node> = graph.children().into_iter().map(simplify).collect();
    graph.set_children(simplified);
    graph
}

/// Find a sibling of `delta` whose index set holds `top` and relabel that
/// occurrence to `bottom`. Returns whether a leaf was actually relabeled.
fn apply_kronecker(parent: &Node, delta: &Node, top: Index, bottom: Index) -> bool {
    for sibling in parent.children() {
        if sibling.ptr_eq(delta) {
            continue;
        }
        if sibling.indices().contains(&top) {
            return relabel_index(&sibling, top, bottom);
        }
    }
    false
}

/// Descend to the first tensor-family leaf that holds `top` and swap it for
/// `bottom` in place.
fn relabel_index(node: &Node, top: Index, bottom: Index) -> bool {
    if node.is_leaf() {
        return node.replace_leaf_index(top, bottom);
    }
    for child in node.children() {
        if child.indices().contains(&top) {
            return relabel_index(&child, top, bottom);
        }
    }
    false
}
