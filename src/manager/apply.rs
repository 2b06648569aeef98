//! The apply engine (component E): conjunction, disjunction, and the
//! vtree-guided recursion that decomposes operands into XY-partitions.
//!
//! Grounded on `BddManager::ite`'s cache-key normalization and topmost-
//! variable dispatch (`src/bdd/mod.rs`: `Self::cofactors` picks the lower of
//! the two operands' top variables and cofactors both along it). Shannon
//! cofactoring on a single variable generalizes here to four vtree-relation
//! cases — same node, left-subset, right-subset, strictly-above — since an
//! SDD decomposes along a whole vtree side rather than a single variable.

use crate::node::{NodeId, FALSE_NODE, TRUE_NODE};
use crate::vtree::VtreeId;

use super::canonicalize::canonicalize;
use super::ManagerInner;

/// Conjunction (§4.E.2). Recurses along the vtree, memoizing on the
/// normalized operand pair within the bucket the pair's vtrees imply.
pub(crate) fn conjoin(mgr: &mut ManagerInner, a: NodeId, b: NodeId) -> NodeId {
    if a == FALSE_NODE || b == FALSE_NODE {
        return FALSE_NODE;
    }
    if a == TRUE_NODE {
        return b;
    }
    if b == TRUE_NODE {
        return a;
    }
    if a == b {
        return a;
    }
    if a == mgr.negate(b) {
        return FALSE_NODE;
    }

    // Stable order so conjoin(a,b) and conjoin(b,a) share a cache entry.
    let (a, b) = if a <= b { (a, b) } else { (b, a) };

    let va = mgr.vtree_of(a);
    let vb = mgr.vtree_of(b);
    let bucket = if va == vb { va } else { mgr.vtree().lca(va, vb) };

    if let Some(hit) = mgr.apply_cache_get(bucket, (a, b)) {
        return hit;
    }

    let result = conjoin_uncached(mgr, a, b, va, vb, bucket);
    mgr.apply_cache_insert(bucket, (a, b), result);
    result
}

/// Disjunction via De Morgan (§4.E.3; resolved in `DESIGN.md`): negation is
/// O(1), so this costs one conjoin plus three pointer dereferences.
pub(crate) fn disjoin(mgr: &mut ManagerInner, a: NodeId, b: NodeId) -> NodeId {
    let na = mgr.negate(a);
    let nb = mgr.negate(b);
    let c = conjoin(mgr, na, nb);
    mgr.negate(c)
}

fn conjoin_uncached(
    mgr: &mut ManagerInner,
    a: NodeId,
    b: NodeId,
    va: VtreeId,
    vb: VtreeId,
    m: VtreeId,
) -> NodeId {
    if va == vb {
        return conjoin_cartesian(mgr, m, a, b);
    }
    if va == m {
        return conjoin_decompose(mgr, m, a, b, vb);
    }
    if vb == m {
        return conjoin_decompose(mgr, m, b, a, va);
    }

    let a_goes_left = {
        let vtree = mgr.vtree();
        vtree.varsubset(va, vtree.left(m)) && vtree.varsubset(vb, vtree.right(m))
    };

    if a_goes_left {
        let na = mgr.negate(a);
        canonicalize(mgr, m, vec![(a, b), (na, FALSE_NODE)])
            .expect("apply never constructs a degenerate partition")
    } else {
        debug_assert!({
            let vtree = mgr.vtree();
            vtree.varsubset(vb, vtree.left(m)) && vtree.varsubset(va, vtree.right(m))
        });
        let nb = mgr.negate(b);
        canonicalize(mgr, m, vec![(b, a), (nb, FALSE_NODE)])
            .expect("apply never constructs a degenerate partition")
    }
}

/// `va == vb`: both operands are Decisions at the same inner vtree node.
/// Full Cartesian product of their elements (§4.E.2, row 1).
fn conjoin_cartesian(mgr: &mut ManagerInner, m: VtreeId, a: NodeId, b: NodeId) -> NodeId {
    let elems_a = mgr.decision_elements(a).to_vec();
    let elems_b = mgr.decision_elements(b).to_vec();

    let mut partition = Vec::with_capacity(elems_a.len() * elems_b.len());
    for &ea in &elems_a {
        let ea = mgr.element(ea);
        for &eb in &elems_b {
            let eb = mgr.element(eb);
            let prime = conjoin(mgr, ea.prime, eb.prime);
            if prime == FALSE_NODE {
                continue;
            }
            let sub = conjoin(mgr, ea.sub, eb.sub);
            partition.push((prime, sub));
        }
    }

    canonicalize(mgr, m, partition).expect("apply never constructs a degenerate partition")
}

/// `va` strictly above `vb` (outer's own vtree `m` is the LCA): decompose
/// `outer`'s elements, conjoining `inner` into whichever side — prime or
/// sub — shares `inner`'s variables (§4.E.2, row 4).
///
/// When `inner` merges into the prime side, the primes no longer disjoin to
/// True on their own (they disjoin to `inner`), so an extra
/// `(¬inner, False)` element restores exhaustiveness. Merging into the sub
/// side leaves the primes untouched, so no such element is needed.
fn conjoin_decompose(
    mgr: &mut ManagerInner,
    m: VtreeId,
    outer: NodeId,
    inner: NodeId,
    inner_vtree: VtreeId,
) -> NodeId {
    let into_left = {
        let vtree = mgr.vtree();
        vtree.varsubset(inner_vtree, vtree.left(m))
    };

    let elems = mgr.decision_elements(outer).to_vec();
    let mut partition = Vec::with_capacity(elems.len() + 1);
    for &eid in &elems {
        let e = mgr.element(eid);
        if into_left {
            let prime = conjoin(mgr, e.prime, inner);
            partition.push((prime, e.sub));
        } else {
            let sub = conjoin(mgr, e.sub, inner);
            partition.push((e.prime, sub));
        }
    }

    if into_left {
        let not_inner = mgr.negate(inner);
        partition.push((not_inner, FALSE_NODE));
    }

    canonicalize(mgr, m, partition).expect("apply never constructs a degenerate partition")
}
