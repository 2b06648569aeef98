//! # SDD: a trimmed, compressed, canonical Sentential Decision Diagram compiler
//!
//! A Sentential Decision Diagram (SDD) represents a Boolean function as a
//! directed acyclic graph of alternating disjunctions ("Decisions") and
//! conjunctions ("Elements"), normalized with respect to a binary tree over
//! the function's variables (a *vtree*). Two SDDs over the same manager are
//! pointer-identical exactly when they represent the same Boolean function.
//!
//! ## Quick start
//!
//! ```
//! use sdd::{SddMgr, VtreeShape};
//!
//! let mgr = SddMgr::new(3, VtreeShape::Balanced);
//! let a = mgr.compile_variable(1).unwrap();
//! let b = mgr.compile_variable(2).unwrap();
//!
//! let and = a.conjoin(&b);
//! let or = a.disjoin(&b);
//! assert_eq!(and.negate(), and.negate());
//! assert_eq!(sdd::model_count(&and, 3), 2u32.into());
//! let _ = or;
//! ```
//!
//! ## Compiling a CNF
//!
//! ```
//! use sdd::{CnfStrategy, Gate, GateKind, SddMgr, VtreeShape};
//!
//! struct Lit(i64);
//! impl Gate for Lit {
//!     fn kind(&self) -> GateKind { GateKind::Literal }
//!     fn children(&self) -> Box<dyn Iterator<Item = &dyn Gate> + '_> {
//!         Box::new(std::iter::empty())
//!     }
//!     fn literal(&self) -> i64 { self.0 }
//!     fn constant(&self) -> bool { unreachable!() }
//! }
//! struct Or(Vec<Lit>);
//! impl Gate for Or {
//!     fn kind(&self) -> GateKind { GateKind::Or }
//!     fn children(&self) -> Box<dyn Iterator<Item = &dyn Gate> + '_> {
//!         Box::new(self.0.iter().map(|l| l as &dyn Gate))
//!     }
//!     fn literal(&self) -> i64 { unreachable!() }
//!     fn constant(&self) -> bool { unreachable!() }
//! }
//! struct And(Vec<Or>);
//! impl Gate for And {
//!     fn kind(&self) -> GateKind { GateKind::And }
//!     fn children(&self) -> Box<dyn Iterator<Item = &dyn Gate> + '_> {
//!         Box::new(self.0.iter().map(|c| c as &dyn Gate))
//!     }
//!     fn literal(&self) -> i64 { unreachable!() }
//!     fn constant(&self) -> bool { unreachable!() }
//! }
//!
//! let mgr = SddMgr::new(2, VtreeShape::Balanced);
//! let cnf = And(vec![Or(vec![Lit(1), Lit(2)]), Or(vec![Lit(-1), Lit(-2)])]);
//! let sdd = mgr.compile_cnf(&cnf, CnfStrategy::Linear).unwrap();
//! assert_eq!(sdd::model_count(&sdd, 2), 2u32.into());
//! ```

mod cnf;
mod error;
mod manager;
mod node;
mod query;
mod validator;
mod vtree;

pub use cnf::{compile_clause, CnfStrategy, Gate, GateKind};
pub use error::{CanonicalizeError, CnfError, CompileError, VtreeError};
pub use manager::{Sdd, SddMgr};
pub use node::{ElementId, NodeId};
pub use query::{linearize, model_count, sat_prob, sdd_num_nodes, sdd_size};
pub use validator::{validate, Violation};
pub use vtree::{VarId, VtreeId, VtreeShape, VtreeSpec};
