//! Caller-attributable errors
//!
//! Conflicts, top-level unsatisfiability and budget exhaustion are ordinary
//! outcomes, not errors; only misuse of the API surfaces here.

use thiserror::Error;

/// Errors returned by the solver API.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolverError {
    /// A clause mentions a variable that was never created.
    #[error("literal {literal} refers to a variable out of range (have {nvars} variables)")]
    VariableOutOfRange {
        /// The offending literal code.
        literal: u32,
        /// Number of variables currently registered.
        nvars: u32,
    },

    /// A parameter setter was called with a value outside its legal range.
    #[error("parameter {name} = {value} is out of range")]
    ParameterOutOfRange {
        /// Parameter name.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// An operation was attempted in a state that does not allow it, e.g.
    /// `add_clause` or `solve` after UNSAT without an intervening `reset`.
    #[error("operation `{operation}` is not allowed in the current solver state")]
    InvalidState {
        /// The rejected operation.
        operation: &'static str,
    },
}
