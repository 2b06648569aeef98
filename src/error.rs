//! Error types for the SDD compiler
//!
//! This module provides comprehensive error types organized by source and operation.
//! Each error source has its own enum with specific variants, and operations have
//! wrapper enums that combine only the errors they can produce.

use std::fmt;

use crate::vtree::VarId;

// ============================================================================
// Source-Level Error Enums
// ============================================================================

/// Errors related to the vtree.
///
/// Currently the only failure mode is asking for a variable the vtree
/// doesn't know about (§4.A, §7 of the specification).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VtreeError {
    /// A literal or variable referred to a variable outside the vtree's range.
    UnknownVariable {
        /// The offending variable.
        variable: VarId,
    },
}

impl fmt::Display for VtreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VtreeError::UnknownVariable { variable } => {
                write!(f, "variable {} is not present in the vtree", variable)
            }
        }
    }
}

impl std::error::Error for VtreeError {}

/// Errors related to canonicalizing an XY-partition (§4.D, §7).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanonicalizeError {
    /// The canonicalizer was handed an XY-partition with no real content
    /// left after removing False primes — a programming error in the
    /// caller (apply never constructs one of these from valid operands).
    DegeneratePartition,
}

impl fmt::Display for CanonicalizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CanonicalizeError::DegeneratePartition => {
                write!(f, "canonicalizer was given a degenerate XY-partition")
            }
        }
    }
}

impl std::error::Error for CanonicalizeError {}

/// Errors related to CNF compilation (§4.F, §6.2, §7).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CnfError {
    /// The CNF compilation strategy name wasn't recognized.
    InvalidStrategy {
        /// The strategy name that was requested.
        name: String,
    },
    /// The supplied circuit isn't a conjunction of disjunctions of literals
    /// (or single-literal clauses).
    NotClausal {
        /// Human-readable description of where the shape failed to match.
        reason: String,
    },
}

impl fmt::Display for CnfError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CnfError::InvalidStrategy { name } => {
                write!(f, "unknown CNF compilation strategy '{}'", name)
            }
            CnfError::NotClausal { reason } => {
                write!(f, "input is not a CNF (conjunction of clauses): {}", reason)
            }
        }
    }
}

impl std::error::Error for CnfError {}

// ============================================================================
// Operation-Level Error Enums
// ============================================================================

/// Errors that can occur during [`crate::manager::SddMgr::compile_cnf`].
///
/// This is the union of every error kind that compilation can surface:
/// an unknown variable while compiling a literal, or a malformed CNF.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// A literal referred to a variable outside the vtree.
    Vtree(VtreeError),
    /// The CNF input or strategy was invalid.
    Cnf(CnfError),
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileError::Vtree(e) => write!(f, "{}", e),
            CompileError::Cnf(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for CompileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CompileError::Vtree(e) => Some(e),
            CompileError::Cnf(e) => Some(e),
        }
    }
}

impl From<VtreeError> for CompileError {
    fn from(err: VtreeError) -> Self {
        CompileError::Vtree(err)
    }
}

impl From<CnfError> for CompileError {
    fn from(err: CnfError) -> Self {
        CompileError::Cnf(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vtree_error_display_names_the_variable() {
        let err = VtreeError::UnknownVariable { variable: 8 };
        assert_eq!(err.to_string(), "variable 8 is not present in the vtree");
    }

    #[test]
    fn compile_error_wraps_and_displays_sources() {
        let err: CompileError = VtreeError::UnknownVariable { variable: 3 }.into();
        assert!(err.to_string().contains("variable 3"));

        let err: CompileError = CnfError::InvalidStrategy {
            name: "bogus".into(),
        }
        .into();
        assert!(err.to_string().contains("bogus"));
    }
}
