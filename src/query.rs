//! Read-only queries over a finished SDD (§6.1, §10 of the design notes):
//! model counting, satisfying probability, size metrics, and a
//! deterministic linearization.
//!
//! Grounded on `Bdd::extract_cubes`/`node_count`/`var_count`
//! (`src/bdd/mod.rs`): the same "recursive traversal with a visited/memo
//! map" shape, generalized from enumerating satisfying paths to
//! multiplying branch counts, which is what lets `model_count` avoid
//! materializing `2^n` assignments.

use std::collections::HashMap;

use num_bigint::BigUint;
use num_rational::BigRational;
use num_traits::{One, Zero};

use crate::manager::{ManagerInner, Sdd};
use crate::node::{NodeId, SddNode, FALSE_NODE, TRUE_NODE};

/// Number of satisfying assignments over `num_vars` variables (§6.1, §8.1.7,
/// §8.1.8).
///
/// Memoizes, per node, the model count restricted to the variables *under*
/// that node's own vtree, then scales up for variables the node doesn't
/// mention (each contributes a free factor of 2).
pub fn model_count(s: &Sdd, num_vars: usize) -> BigUint {
    if s.is_true() {
        return BigUint::from(2u32).pow(num_vars as u32);
    }
    if s.is_false() {
        return BigUint::zero();
    }

    let mgr = s.mgr.borrow();
    let mut memo: HashMap<NodeId, BigUint> = HashMap::new();
    let (count, covered) = count_under(&mgr, s.id, &mut memo);
    count * BigUint::from(2u32).pow((num_vars - covered) as u32)
}

/// Returns `(model count restricted to this node's own variables, how many
/// variables that is)`.
fn count_under(mgr: &ManagerInner, id: NodeId, memo: &mut HashMap<NodeId, BigUint>) -> (BigUint, usize) {
    if id == TRUE_NODE {
        return (BigUint::one(), 0);
    }
    if id == FALSE_NODE {
        return (BigUint::zero(), 0);
    }

    let vtree = mgr.node(id).vtree().expect("non-constant node has a vtree");
    let own_vars = mgr.vtree().variables(vtree).len();

    if let Some(count) = memo.get(&id) {
        return (count.clone(), own_vars);
    }

    let count = match mgr.node(id) {
        SddNode::Literal { .. } => BigUint::one(),
        SddNode::Decision { .. } => {
            let elements = mgr.decision_elements(id).to_vec();
            let mut total = BigUint::zero();
            for eid in elements {
                let e = mgr.element(eid);
                let (prime_count, prime_vars) = count_under(mgr, e.prime, memo);
                let (sub_count, sub_vars) = count_under(mgr, e.sub, memo);
                let free_vars = own_vars.saturating_sub(prime_vars + sub_vars);
                total += prime_count * sub_count * BigUint::from(2u32).pow(free_vars as u32);
            }
            total
        }
        SddNode::True | SddNode::False => unreachable!("constants handled above"),
    };

    memo.insert(id, count.clone());
    (count, own_vars)
}

/// Probability a uniformly random assignment over `num_vars` variables
/// satisfies `s` (§6.1, §8.1.8): `model_count(s, n) / 2^n`, kept exact.
pub fn sat_prob(s: &Sdd, num_vars: usize) -> BigRational {
    let count = model_count(s, num_vars);
    let total = BigUint::from(2u32).pow(num_vars as u32);
    BigRational::new(count.into(), total.into())
}

/// Number of Elements reachable from `s` (§6.1).
pub fn sdd_size(s: &Sdd) -> usize {
    s.mgr.borrow().size(s.id)
}

/// Number of Decisions reachable from `s` (§6.1).
pub fn sdd_num_nodes(s: &Sdd) -> usize {
    s.mgr.borrow().num_nodes(s.id)
}

/// Reachable nodes in a deterministic topological order, children before
/// parents (§6.1, §4.G).
pub fn linearize(s: &Sdd) -> Vec<NodeId> {
    s.mgr.borrow().linearize(s.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manager::SddMgr;
    use crate::vtree::VtreeShape;

    #[test]
    fn true_has_two_to_the_n_models() {
        let mgr = SddMgr::new(5, VtreeShape::Balanced);
        let t = mgr.compile_constant(true);
        assert_eq!(model_count(&t, 5), BigUint::from(32u32));
    }

    #[test]
    fn false_has_no_models() {
        let mgr = SddMgr::new(5, VtreeShape::Balanced);
        let f = mgr.compile_constant(false);
        assert_eq!(model_count(&f, 5), BigUint::zero());
    }

    #[test]
    fn a_single_literal_covers_half_the_space() {
        let mgr = SddMgr::new(5, VtreeShape::Balanced);
        let v1 = mgr.compile_variable(1).unwrap();
        assert_eq!(model_count(&v1, 5), BigUint::from(16u32));
        assert_eq!(sat_prob(&v1, 5), BigRational::new(1.into(), 2.into()));
    }

    #[test]
    fn xor_has_half_the_models() {
        let mgr = SddMgr::new(5, VtreeShape::Balanced);
        let v1 = mgr.compile_variable(1).unwrap();
        let v2 = mgr.compile_variable(2).unwrap();
        let xor = v1
            .conjoin(&v2.negate())
            .disjoin(&v1.negate().conjoin(&v2));
        assert_eq!(model_count(&xor, 5), BigUint::from(16u32));
    }

    #[test]
    fn sdd_size_and_num_nodes_are_nonzero_for_a_decision() {
        let mgr = SddMgr::new(5, VtreeShape::Balanced);
        let v1 = mgr.compile_variable(1).unwrap();
        let v2 = mgr.compile_variable(2).unwrap();
        let c = v1.conjoin(&v2);
        assert!(sdd_size(&c) >= 2);
        assert!(sdd_num_nodes(&c) >= 1);
    }

    #[test]
    fn linearize_orders_children_before_parents() {
        let mgr = SddMgr::new(5, VtreeShape::Balanced);
        let v1 = mgr.compile_variable(1).unwrap();
        let v2 = mgr.compile_variable(2).unwrap();
        let c = v1.conjoin(&v2);
        let order = linearize(&c);
        let v1_pos = order.iter().position(|&n| n == v1.id);
        let c_pos = order.iter().position(|&n| n == c.id);
        assert!(v1_pos.unwrap() < c_pos.unwrap());
    }
}
