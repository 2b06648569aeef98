//! The canonicalizer (component D): turns a transient XY-partition into a
//! canonical node — trim, compress, then hash-cons into the unique table.
//!
//! Grounded on `BddManager::make_node`'s reduction-then-lookup-or-insert
//! shape (`src/bdd/mod.rs`): there, `low == high` collapses a node to its
//! shared child before the unique-table lookup; here the single `low == high`
//! check becomes the two degenerate shapes of §3.3.5, and the lookup key
//! generalizes from a `(var, low, high)` triple to an XY-partition.

use std::collections::{BTreeSet, HashMap};

use crate::error::CanonicalizeError;
use crate::node::{ElementId, NodeId, FALSE_NODE, TRUE_NODE};
use crate::vtree::VtreeId;

use super::{apply, ManagerInner, XyKey};

/// Canonicalize the XY-partition `partition` at vtree node `vtree`, returning
/// the (possibly pre-existing) canonical node it represents.
pub(crate) fn canonicalize(
    mgr: &mut ManagerInner,
    vtree: VtreeId,
    partition: Vec<(NodeId, NodeId)>,
) -> Result<NodeId, CanonicalizeError> {
    let partition: Vec<(NodeId, NodeId)> =
        partition.into_iter().filter(|&(p, _)| p != FALSE_NODE).collect();

    let partition = compress(mgr, partition);

    if partition.is_empty() {
        return Err(CanonicalizeError::DegeneratePartition);
    }

    if partition.len() == 1 {
        let (p, s) = partition[0];
        return if p == TRUE_NODE {
            Ok(s)
        } else {
            Err(CanonicalizeError::DegeneratePartition)
        };
    }

    if partition.len() == 2 {
        if let Some(node) = trim_two(mgr, &partition) {
            return Ok(node);
        }
    }

    Ok(unique(mgr, vtree, partition))
}

/// Group elements by (pointer-identical) sub, folding each group's primes
/// together with a recursive disjoin (§4.D.2).
fn compress(mgr: &mut ManagerInner, partition: Vec<(NodeId, NodeId)>) -> Vec<(NodeId, NodeId)> {
    let mut order: Vec<NodeId> = Vec::new();
    let mut groups: HashMap<NodeId, Vec<NodeId>> = HashMap::new();
    for (p, s) in partition {
        groups
            .entry(s)
            .or_insert_with(|| {
                order.push(s);
                Vec::new()
            })
            .push(p);
    }

    order
        .into_iter()
        .map(|s| {
            let mut primes = groups.remove(&s).unwrap().into_iter();
            let first = primes.next().expect("a group always has at least one prime");
            let combined = primes.fold(first, |acc, p| apply::disjoin(mgr, acc, p));
            (combined, s)
        })
        .collect()
}

/// Recognize the two trimmable two-element shapes of §3.3.5:
/// `{(α, ⊤), (β, ⊥)}` or its commuted form, with `β = ¬α`.
fn trim_two(mgr: &ManagerInner, partition: &[(NodeId, NodeId)]) -> Option<NodeId> {
    let (p0, s0) = partition[0];
    let (p1, s1) = partition[1];
    let (alpha, beta) = if s0 == TRUE_NODE && s1 == FALSE_NODE {
        (p0, p1)
    } else if s1 == TRUE_NODE && s0 == FALSE_NODE {
        (p1, p0)
    } else {
        return None;
    };
    if mgr.negate(alpha) == beta {
        Some(alpha)
    } else {
        None
    }
}

/// Unique-table lookup; on miss, allocate the Decision and its paired
/// negation together (§3.5, §4.D.4).
fn unique(mgr: &mut ManagerInner, vtree: VtreeId, partition: Vec<(NodeId, NodeId)>) -> NodeId {
    let key: XyKey = partition.iter().copied().collect::<BTreeSet<_>>();
    if let Some(hit) = mgr.unique_lookup(vtree, &key) {
        return hit;
    }

    let elements: Vec<ElementId> = partition
        .iter()
        .map(|&(p, s)| mgr.alloc_element(p, s))
        .collect();
    // Placeholder negation (self-referential index); patched below once the
    // paired Decision exists. Never observed before the patch — construction
    // is not reentrant.
    let decision = mgr.alloc_decision(vtree, elements, 0);

    let negated_partition: Vec<(NodeId, NodeId)> =
        partition.iter().map(|&(p, s)| (p, mgr.negate(s))).collect();
    let negated_key: XyKey = negated_partition.iter().copied().collect();
    let negated_elements: Vec<ElementId> = negated_partition
        .iter()
        .map(|&(p, s)| mgr.alloc_element(p, s))
        .collect();
    let negation = mgr.alloc_decision(vtree, negated_elements, decision);
    mgr.set_negation(decision, negation);

    mgr.unique_insert(vtree, key, decision);
    mgr.unique_insert(vtree, negated_key, negation);
    decision
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manager::SddMgr;
    use crate::vtree::VtreeShape;

    #[test]
    fn single_true_element_trims_to_its_sub() {
        let mgr = SddMgr::new(7, VtreeShape::Balanced);
        let v3 = mgr.compile_variable(3).unwrap();
        let leaf = v3.vtree().unwrap();
        let id = {
            let mut inner = mgr.inner.borrow_mut();
            canonicalize(&mut inner, leaf, vec![(TRUE_NODE, v3.id)]).unwrap()
        };
        assert_eq!(id, v3.id);
    }

    #[test]
    fn two_element_equivalence_shape_trims_to_the_literal() {
        let mgr = SddMgr::new(7, VtreeShape::Balanced);
        let v1 = mgr.compile_variable(1).unwrap();
        let not_v1 = v1.negate();
        let leaf = v1.vtree().unwrap();
        let id = {
            let mut inner = mgr.inner.borrow_mut();
            canonicalize(
                &mut inner,
                leaf,
                vec![(v1.id, TRUE_NODE), (not_v1.id, FALSE_NODE)],
            )
            .unwrap()
        };
        assert_eq!(id, v1.id);
    }
}
