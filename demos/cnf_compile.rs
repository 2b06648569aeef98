//! Compiles a small CNF with both driver strategies and checks they agree,
//! per the canonicity guarantee (two different recursions over a canonical
//! manager must land on the same pointer).

use sdd::{compile_clause, CnfStrategy, Gate, GateKind, SddMgr, VtreeShape};

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

fn main() {
    // (v1 | v2 | v3) & (!v1 | !v2) & (v2 | !v3)
    let cnf = And(vec![
        Or(vec![Lit(1), Lit(2), Lit(3)]),
        Or(vec![Lit(-1), Lit(-2)]),
        Or(vec![Lit(2), Lit(-3)]),
    ]);

    let mgr = SddMgr::new(3, VtreeShape::Balanced);
    let linear = mgr.compile_cnf(&cnf, CnfStrategy::Linear).unwrap();
    let recursive = mgr.compile_cnf(&cnf, CnfStrategy::VtreeRecursive).unwrap();

    println!("linear and vtree-recursive agree: {}", linear == recursive);
    println!("models: {}", sdd::model_count(&linear, 3));

    let clause = Or(vec![Lit(2), Lit(-3)]);
    let compiled_clause = compile_clause(&mgr, &clause).unwrap();
    println!("clause elements: {}", sdd::sdd_size(&compiled_clause));
}
