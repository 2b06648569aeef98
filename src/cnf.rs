//! CNF compilation (component F): two driver strategies that turn a
//! conjunction of disjunctions-of-literals into an SDD via repeated literal
//! compilation and `conjoin`/`disjoin`.
//!
//! Parsing user-supplied formula syntax into a circuit tree is explicitly
//! out of scope (§1); callers hand in anything implementing [`Gate`], a
//! generic logic-circuit view generalized from the tagged-sum AST walk the
//! teacher used for its own boolean expressions
//! (`BoolExprInner` in the now-removed `src/expression/mod.rs`).

use crate::error::{CnfError, CompileError};
use crate::manager::{Sdd, SddMgr};

/// The kind of gate a [`Gate`] node represents (§6.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateKind {
    And,
    Or,
    Literal,
    Constant,
}

/// A caller-supplied logic-circuit node. The CNF compiler only ever reads
/// `And`-of-`Or`-of-literal shapes through this trait; it never constructs
/// or mutates one.
pub trait Gate {
    fn kind(&self) -> GateKind;
    /// Children in order. Empty for `Literal`/`Constant`.
    fn children(&self) -> Box<dyn Iterator<Item = &dyn Gate> + '_>;
    /// Valid when `kind() == GateKind::Literal`: positive = positive literal.
    fn literal(&self) -> i64;
    /// Valid when `kind() == GateKind::Constant`.
    fn constant(&self) -> bool;
}

/// Which driver `compile_cnf` uses (§4.F, §6.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CnfStrategy {
    /// Fold `conjoin` over clause compilations in input order.
    Linear,
    /// Recurse over the vtree, partitioning clauses by variable scope.
    VtreeRecursive,
}

/// Compile a single clause: disjoin the literal compilations of its children
/// (§4.F).
pub fn compile_clause(mgr: &SddMgr, clause: &dyn Gate) -> Result<Sdd, CompileError> {
    match clause.kind() {
        GateKind::Literal => Ok(mgr.compile_literal(clause.literal())?),
        GateKind::Constant => Ok(mgr.compile_constant(clause.constant())),
        GateKind::Or => {
            let mut children = clause.children();
            let first = children
                .next()
                .ok_or_else(|| CnfError::NotClausal {
                    reason: "clause has no literals".into(),
                })?;
            let mut acc = compile_literal_gate(mgr, first)?;
            for child in children {
                let lit = compile_literal_gate(mgr, child)?;
                acc = acc.disjoin(&lit);
            }
            Ok(acc)
        }
        GateKind::And => Err(CnfError::NotClausal {
            reason: "clause contains a nested conjunction".into(),
        }
        .into()),
    }
}

fn compile_literal_gate(mgr: &SddMgr, gate: &dyn Gate) -> Result<Sdd, CompileError> {
    match gate.kind() {
        GateKind::Literal => Ok(mgr.compile_literal(gate.literal())?),
        GateKind::Constant => Ok(mgr.compile_constant(gate.constant())),
        _ => Err(CnfError::NotClausal {
            reason: "clause child is neither a literal nor a constant".into(),
        }
        .into()),
    }
}

/// Compile a CNF (§4.F, §6.1).
pub fn compile_cnf(mgr: &SddMgr, cnf: &dyn Gate, strategy: CnfStrategy) -> Result<Sdd, CompileError> {
    let clauses = top_level_clauses(cnf)?;
    match strategy {
        CnfStrategy::Linear => compile_linear(mgr, &clauses),
        CnfStrategy::VtreeRecursive => compile_recursive(mgr, &clauses, mgr.root_vtree()),
    }
}

fn top_level_clauses<'a>(cnf: &'a dyn Gate) -> Result<Vec<&'a dyn Gate>, CompileError> {
    match cnf.kind() {
        GateKind::And => Ok(cnf.children().collect()),
        GateKind::Or | GateKind::Literal | GateKind::Constant => Ok(vec![cnf]),
    }
}

fn compile_linear(mgr: &SddMgr, clauses: &[&dyn Gate]) -> Result<Sdd, CompileError> {
    let mut acc = mgr.compile_constant(true);
    for clause in clauses {
        let c = compile_clause(mgr, *clause)?;
        acc = acc.conjoin(&c);
    }
    Ok(acc)
}

/// Variables a clause's literals range over, as a sorted `Vec` (small
/// clauses; a `BTreeSet` would cost more than it saves here).
fn clause_variables(clause: &dyn Gate) -> Vec<u32> {
    let mut vars = Vec::new();
    collect_variables(clause, &mut vars);
    vars.sort_unstable();
    vars.dedup();
    vars
}

fn collect_variables(gate: &dyn Gate, out: &mut Vec<u32>) {
    match gate.kind() {
        GateKind::Literal => out.push(gate.literal().unsigned_abs() as u32),
        GateKind::Constant => {}
        GateKind::And | GateKind::Or => {
            for child in gate.children() {
                collect_variables(child, out);
            }
        }
    }
}

fn compile_recursive(
    mgr: &SddMgr,
    clauses: &[&dyn Gate],
    vtree: crate::vtree::VtreeId,
) -> Result<Sdd, CompileError> {
    if mgr.vtree_is_leaf(vtree) || clauses.is_empty() {
        return compile_linear(mgr, clauses);
    }

    let left = mgr.left_vtree_of(vtree);
    let right = mgr.right_vtree_of(vtree);

    let mut in_left = Vec::new();
    let mut in_right = Vec::new();
    let mut mixed: Vec<&dyn Gate> = Vec::new();

    for &clause in clauses {
        let vars = clause_variables(clause);
        if vars.iter().all(|&v| mgr.vtree_contains_variable(left, v)) {
            in_left.push(clause);
        } else if vars.iter().all(|&v| mgr.vtree_contains_variable(right, v)) {
            in_right.push(clause);
        } else {
            mixed.push(clause);
        }
    }

    let left_sdd = compile_recursive(mgr, &in_left, left)?;
    let right_sdd = compile_recursive(mgr, &in_right, right)?;
    let mut acc = left_sdd.conjoin(&right_sdd);

    mixed.sort_by_key(|c| clause_variables(c).len());
    for clause in mixed {
        let c = compile_clause(mgr, clause)?;
        acc = acc.conjoin(&c);
    }

    Ok(acc)
}
