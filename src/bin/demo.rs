//! Builds a random three-tensor contraction chain and prints its gradient.
//!
//! Run with `RUST_LOG=debug` to watch the simplifier eliminate deltas.

use eingrad::{shape, simplify, Index, Node};
use rand::Rng;

fn main() {
    env_logger::init();

    let mut rng = rand::thread_rng();
    let indices: Vec<Index> = (0..4).map(|_| Index::new(rng.gen_range(1..=10))).collect();
    println!("Initial indices: {:?}", indices);
    println!();

    let a = Node::tensor(indices[..2].to_vec());
    let b = Node::tensor(indices[1..3].to_vec());
    let c = Node::tensor(indices[2..].to_vec());

    println!("Tensor A: {a} (shape {:?})", shape(&a.indices()));
    println!("Tensor B: {b} (shape {:?})", shape(&b.indices()));
    println!("Tensor C: {c} (shape {:?})", shape(&c.indices()));
    println!();

    let graph = &(&a * &b) * &c;
    println!("Graph: {graph}");
    println!("Graph indices: {:?}", graph.indices());
    println!();

    let gradient = match graph.gradient(&b) {
        Ok(gradient) => simplify(gradient),
        Err(err) => {
            eprintln!("gradient failed: {err}");
            std::process::exit(1);
        }
    };
    println!("Gradient of graph wrt tensor {b}: {gradient}");
    println!("Gradient indices: {:?}", gradient.indices());
}
