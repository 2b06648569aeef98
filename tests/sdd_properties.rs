//! Black-box tests against the public API, covering the scenarios and
//! round-trips spelled out for this compiler: distinctness of literals,
//! paired negation, deterministic canonical construction regardless of
//! operand order, the unknown-variable error, and strategy-agreement for
//! CNF compilation.

use sdd::{validate, CnfStrategy, Gate, GateKind, SddMgr, VtreeShape};

struct Lit(i64);
impl Gate for Lit {
    fn kind(&self) -> GateKind {
        GateKind::Literal
    }
    fn children(&self) -> Box<dyn Iterator<Item = &dyn Gate> + '_> {
        Box::new(std::iter::empty())
    }
    fn literal(&self) -> i64 {
        self.0
    }
    fn constant(&self) -> bool {
        unreachable!()
    }
}

struct Or(Vec<Lit>);
impl Gate for Or {
    fn kind(&self) -> GateKind {
        GateKind::Or
    }
    fn children(&self) -> Box<dyn Iterator<Item = &dyn Gate> + '_> {
        Box::new(self.0.iter().map(|l| l as &dyn Gate))
    }
    fn literal(&self) -> i64 {
        unreachable!()
    }
    fn constant(&self) -> bool {
        unreachable!()
    }
}

struct And(Vec<Or>);
impl Gate for And {
    fn kind(&self) -> GateKind {
        GateKind::And
    }
    fn children(&self) -> Box<dyn Iterator<Item = &dyn Gate> + '_> {
        Box::new(self.0.iter().map(|c| c as &dyn Gate))
    }
    fn literal(&self) -> i64 {
        unreachable!()
    }
    fn constant(&self) -> bool {
        unreachable!()
    }
}

/// S1: distinct variables compile to distinct positive literals.
#[test]
fn s1_distinct_variables_are_distinct_literals() {
    let mgr = SddMgr::new(7, VtreeShape::Balanced);
    let v1 = mgr.compile_variable(1).unwrap();
    let v2 = mgr.compile_variable(2).unwrap();
    assert_ne!(v1, v2);
}

/// S2: negating the constants swaps them.
#[test]
fn s2_negating_constants_swaps_them() {
    let mgr = SddMgr::new(7, VtreeShape::Balanced);
    let t = mgr.compile_constant(true);
    let f = mgr.compile_constant(false);
    assert_eq!(t.negate(), f);
    assert_eq!(f.negate(), t);
}

/// S5 (order independence + determinism): the same conjunction built from
/// either operand order, through disjoin, produces a pointer-identical,
/// structurally valid SDD.
#[test]
fn s5_construction_order_does_not_affect_the_result() {
    let mgr = SddMgr::new(7, VtreeShape::Balanced);
    let v1 = mgr.compile_variable(1).unwrap();
    let v4 = mgr.compile_variable(4).unwrap();
    let v7 = mgr.compile_variable(7).unwrap();

    let n1 = v1.conjoin(&v4).disjoin(&v1.negate().conjoin(&v7));
    let n2 = v1.negate().conjoin(&v7).disjoin(&v1.conjoin(&v4));

    assert_eq!(n1, n2);
    assert!(validate(&mgr, &n1).is_empty());
}

/// S6: compiling a literal outside the vtree's range raises an error.
#[test]
fn s6_out_of_range_literal_errors() {
    let mgr = SddMgr::new(7, VtreeShape::Balanced);
    assert!(mgr.compile_literal(8).is_err());
    assert!(mgr.compile_literal(-8).is_err());
    assert!(mgr.compile_variable(8).is_err());
}

/// S7: XOR built from conjoin/negate/disjoin has exactly half the models
/// and is structurally sound.
#[test]
fn s7_xor_has_half_the_models_and_validates() {
    let mgr = SddMgr::new(7, VtreeShape::Balanced);
    let v1 = mgr.compile_variable(1).unwrap();
    let v2 = mgr.compile_variable(2).unwrap();

    let xor = v1.conjoin(&v2.negate()).disjoin(&v1.negate().conjoin(&v2));

    assert_eq!(sdd::model_count(&xor, 7), (1u32 << 6).into());
    assert!(validate(&mgr, &xor).is_empty());
    assert_eq!(xor.conjoin(&xor), xor);
}

/// §8.3 round-trip: linear and vtree-recursive CNF compilation land on the
/// same pointer, because the manager is canonical.
#[test]
fn round_trip_linear_and_recursive_cnf_agree() {
    let mgr = SddMgr::new(6, VtreeShape::Balanced);
    let cnf = And(vec![
        Or(vec![Lit(1), Lit(-2), Lit(3)]),
        Or(vec![Lit(-1), Lit(4)]),
        Or(vec![Lit(5), Lit(-6)]),
        Or(vec![Lit(2), Lit(6)]),
    ]);

    let linear = mgr.compile_cnf(&cnf, CnfStrategy::Linear).unwrap();
    let recursive = mgr.compile_cnf(&cnf, CnfStrategy::VtreeRecursive).unwrap();

    assert_eq!(linear, recursive);
    assert!(validate(&mgr, &linear).is_empty());
}

/// §8.3 round-trip: replaying the same sequence of compile/apply calls
/// reproduces a pointer-identical SDD, and its linearized form always ends
/// with the root itself.
#[test]
fn round_trip_linearize_and_replay() {
    let mgr = SddMgr::new(4, VtreeShape::Balanced);
    let v1 = mgr.compile_variable(1).unwrap();
    let v2 = mgr.compile_variable(2).unwrap();
    let v3 = mgr.compile_variable(3).unwrap();

    let original = v1.conjoin(&v2).disjoin(&v2.negate().conjoin(&v3));
    let order = sdd::linearize(&original);
    assert!(!order.is_empty());

    let replay = v1.conjoin(&v2).disjoin(&v2.negate().conjoin(&v3));
    assert_eq!(original, replay);
    assert_eq!(sdd::linearize(&replay), order);
}
