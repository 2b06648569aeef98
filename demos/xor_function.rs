//! Compiles the two-variable XOR function directly via conjoin/disjoin and
//! prints its size and model count.

use sdd::{model_count, sdd_num_nodes, sdd_size, SddMgr, VtreeShape};

fn main() {
    let mgr = SddMgr::new(2, VtreeShape::Balanced);
    let v1 = mgr.compile_variable(1).unwrap();
    let v2 = mgr.compile_variable(2).unwrap();

    let xor = v1.conjoin(&v2.negate()).disjoin(&v1.negate().conjoin(&v2));

    println!("xor = (v1 & !v2) | (!v1 & v2)");
    println!("elements: {}", sdd_size(&xor));
    println!("decisions: {}", sdd_num_nodes(&xor));
    println!("model count over 2 vars: {}", model_count(&xor, 2));

    assert!(!xor.is_constant());
    assert_eq!(xor.negate().negate(), xor);
}
