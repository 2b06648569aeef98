//! The validator (component G): an oracle that walks a finished SDD once
//! and checks the structural invariants of §3.3, independent of whatever
//! machinery produced the node.
//!
//! Grounded on `Bdd::count_reachable_nodes`'s visited-set traversal
//! (`src/bdd/mod.rs`) — a plain `HashSet` of visited ids threaded through
//! recursion, rather than a persistent mark bit on each node. The design
//! notes in `spec.md` offer either; a local visited-set avoids adding a
//! mutable scratch field to `SddNode` and needing to clear it between runs.

use std::collections::HashSet;
use std::fmt;

use crate::manager::{Sdd, SddMgr};
use crate::node::{NodeId, FALSE_NODE, TRUE_NODE};

/// One violation of §3.3 found while validating an SDD.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    LiteralVariableMismatch { node: NodeId },
    LiteralNotAtLeaf { node: NodeId },
    DecisionVtreeNotInner { node: NodeId },
    DecisionTooSmall { node: NodeId, size: usize },
    DecisionPrimeIsFalse { node: NodeId },
    DecisionPrimesNotDisjoint { node: NodeId },
    DecisionSubsNotDistinct { node: NodeId },
    DecisionPrimesNotExhaustive { node: NodeId },
    DecisionNotTrimmed { node: NodeId },
    PrimeVtreeNotLeftDescendant { node: NodeId },
    SubVtreeNotRightDescendant { node: NodeId },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::LiteralVariableMismatch { node } => {
                write!(f, "literal {node} names a variable other than its leaf vtree's")
            }
            Violation::LiteralNotAtLeaf { node } => {
                write!(f, "literal {node} is not associated with a leaf vtree")
            }
            Violation::DecisionVtreeNotInner { node } => {
                write!(f, "decision {node} is associated with a non-inner vtree node")
            }
            Violation::DecisionTooSmall { node, size } => {
                write!(f, "decision {node} has only {size} element(s), minimum is 2")
            }
            Violation::DecisionPrimeIsFalse { node } => {
                write!(f, "decision {node} has an element whose prime is False")
            }
            Violation::DecisionPrimesNotDisjoint { node } => {
                write!(f, "decision {node}'s primes are not pairwise mutually exclusive")
            }
            Violation::DecisionSubsNotDistinct { node } => {
                write!(f, "decision {node} has two elements sharing the same sub")
            }
            Violation::DecisionPrimesNotExhaustive { node } => {
                write!(f, "decision {node}'s primes do not disjoin to True")
            }
            Violation::DecisionNotTrimmed { node } => {
                write!(f, "decision {node} has a trimmable {{(a,True),(-a,False)}} shape")
            }
            Violation::PrimeVtreeNotLeftDescendant { node } => {
                write!(f, "decision {node} has a prime outside its vtree's left side")
            }
            Violation::SubVtreeNotRightDescendant { node } => {
                write!(f, "decision {node} has a sub outside its vtree's right side")
            }
        }
    }
}

impl std::error::Error for Violation {}

/// Walk the DAG rooted at `root` once and collect every invariant
/// violation found (§4.G, §8.1.1). An empty result means the node is
/// structurally sound.
pub fn validate(mgr: &SddMgr, root: &Sdd) -> Vec<Violation> {
    let mut visited = HashSet::new();
    let mut violations = Vec::new();
    walk(mgr, root.id, &mut visited, &mut violations);
    violations
}

fn walk(mgr: &SddMgr, id: NodeId, visited: &mut HashSet<NodeId>, out: &mut Vec<Violation>) {
    if id == TRUE_NODE || id == FALSE_NODE || !visited.insert(id) {
        return;
    }

    if let Some((variable, vtree)) = mgr.literal_info(id) {
        if !mgr.vtree_is_leaf(vtree) {
            out.push(Violation::LiteralNotAtLeaf { node: id });
        } else if mgr.leaf_variable(vtree) != variable {
            out.push(Violation::LiteralVariableMismatch { node: id });
        }
        return;
    }

    let vtree = match mgr.decision_vtree(id) {
        Some(v) => v,
        None => return,
    };
    if mgr.vtree_is_leaf(vtree) {
        out.push(Violation::DecisionVtreeNotInner { node: id });
    }

    let elements = mgr.decision_elements_pairs(id);
    if elements.len() < 2 {
        out.push(Violation::DecisionTooSmall {
            node: id,
            size: elements.len(),
        });
    }

    let left = mgr.left_vtree_of(vtree);
    let right = mgr.right_vtree_of(vtree);

    let mut subs_seen: Vec<NodeId> = Vec::new();
    let mut primes: Vec<NodeId> = Vec::new();
    for &(prime, sub) in &elements {
        if prime == FALSE_NODE {
            out.push(Violation::DecisionPrimeIsFalse { node: id });
        }
        if let Some(pv) = mgr.node_vtree(prime) {
            if !mgr.vtree_varsubset(pv, left) {
                out.push(Violation::PrimeVtreeNotLeftDescendant { node: id });
            }
        }
        if let Some(sv) = mgr.node_vtree(sub) {
            if !mgr.vtree_varsubset(sv, right) {
                out.push(Violation::SubVtreeNotRightDescendant { node: id });
            }
        }
        if subs_seen.contains(&sub) {
            out.push(Violation::DecisionSubsNotDistinct { node: id });
        }
        subs_seen.push(sub);
        primes.push(prime);
    }

    for i in 0..primes.len() {
        for j in (i + 1)..primes.len() {
            if mgr.conjoin_raw(primes[i], primes[j]) != FALSE_NODE {
                out.push(Violation::DecisionPrimesNotDisjoint { node: id });
            }
        }
    }

    let exhaustive = primes
        .iter()
        .copied()
        .reduce(|a, b| mgr.disjoin_raw(a, b))
        .map(|d| d == TRUE_NODE)
        .unwrap_or(false);
    if !exhaustive {
        out.push(Violation::DecisionPrimesNotExhaustive { node: id });
    }

    if elements.len() == 2 {
        let (p0, s0) = elements[0];
        let (p1, s1) = elements[1];
        let trimmable = (s0 == TRUE_NODE && s1 == FALSE_NODE && mgr.negate_raw(p0) == p1)
            || (s1 == TRUE_NODE && s0 == FALSE_NODE && mgr.negate_raw(p1) == p0);
        if trimmable {
            out.push(Violation::DecisionNotTrimmed { node: id });
        }
    }

    for &(prime, sub) in &elements {
        walk(mgr, prime, visited, out);
        walk(mgr, sub, visited, out);
    }
}
