use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sdd::{CnfStrategy, Gate, GateKind, SddMgr, VtreeShape};

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

/// A chain of `n` clauses `(vi | v(i+1))`, each spanning two adjacent
/// variables — small enough to keep the benchmark fast, wide enough to
/// exercise both clustering strategies differently.
fn chain_cnf(n: usize) -> And {
    And((1..n)
        .map(|i| Or(vec![Lit(i as i64), Lit((i + 1) as i64)]))
        .collect())
}

fn bench_cnf_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile_cnf");
    for &n in &[8usize, 16, 32] {
        group.bench_function(format!("linear/{n}"), |b| {
            let cnf = chain_cnf(n);
            b.iter(|| {
                let mgr = SddMgr::new(n, VtreeShape::Balanced);
                black_box(mgr.compile_cnf(&cnf, CnfStrategy::Linear).unwrap())
            });
        });
        group.bench_function(format!("vtree_recursive/{n}"), |b| {
            let cnf = chain_cnf(n);
            b.iter(|| {
                let mgr = SddMgr::new(n, VtreeShape::Balanced);
                black_box(mgr.compile_cnf(&cnf, CnfStrategy::VtreeRecursive).unwrap())
            });
        });
    }
    group.finish();
}

fn bench_apply(c: &mut Criterion) {
    c.bench_function("conjoin_chain_16", |b| {
        b.iter(|| {
            let mgr = SddMgr::new(16, VtreeShape::Balanced);
            let mut acc = mgr.compile_constant(true);
            for v in 1..=16 {
                let lit = mgr.compile_variable(v).unwrap();
                acc = acc.conjoin(&lit);
            }
            black_box(acc)
        });
    });
}

criterion_group!(benches, bench_cnf_compile, bench_apply);
criterion_main!(benches);
