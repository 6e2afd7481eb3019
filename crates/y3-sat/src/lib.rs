//! y3-sat - CDCL SAT solver core
//!
//! A conflict-driven clause-learning engine with inprocessing, built around
//! an arena clause pool and a two-watched-literal propagation scheme.
//!
//! ## Search
//! - Two-watched-literal BCP with inline binary clauses and blocker literals
//! - First-UIP conflict analysis with recursive clause minimization
//! - VSIDS activity heap with lazy removal and implicit phase saving
//! - Glucose-style EMA restarts, performed partially (active levels survive)
//! - LBD-aware clause-database reduction and level-0 simplification
//!
//! ## Inprocessing
//! - Pure and unit literal propagation
//! - Equivalence substitution by SCCs of the binary implication graph
//! - Subsumption and self-subsuming resolution with clause signatures
//! - Bounded variable elimination by resolution
//! - Model reconstruction over eliminated and substituted variables
//!
//! ```
//! use y3_sat::{Literal, Solver, Status, Value};
//!
//! let mut solver = Solver::new(4, false);
//! solver.add_vars(2);
//! let a = solver.new_var();
//! let x = Literal::positive(a);
//! solver.add_clause(&[x]).unwrap();
//! assert_eq!(solver.solve(), Ok(Status::Sat));
//! assert_eq!(solver.value(a), Value::True);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod clause_db;
pub mod conflict;
pub mod error;
pub mod heap;
pub mod invariants;
pub mod literal;
pub mod params;
pub mod preprocess;
pub mod reconstruct;
pub mod scc;
pub mod solver;
pub mod subsume;
pub mod value;
pub mod watched;

pub use clause_db::{ClausePool, ClauseRef};
pub use error::SolverError;
pub use literal::{Literal, Variable};
pub use params::Params;
pub use reconstruct::ReconstructionLog;
pub use solver::{Solver, Stats, Status};
pub use value::Value;
