//! Tunable search and preprocessing parameters
//!
//! Defaults follow the values the heuristics were tuned with. Setters on the
//! solver validate ranges and reject bad values with
//! [`SolverError::ParameterOutOfRange`](crate::error::SolverError).

/// Solver parameters.
#[derive(Debug, Clone)]
pub struct Params {
    /// Variable activity decay factor, in (0, 1).
    pub var_decay: f64,
    /// Learned-clause activity decay factor, in (0, 1).
    pub clause_decay: f32,
    /// Probability of a random decision, in [0, 1].
    pub randomness: f32,
    /// Seed for the decision RNG.
    pub random_seed: u64,
    /// Learned clauses with LBD at or below this are never deleted.
    pub keep_lbd: u32,
    /// Fraction (out of 32) of deletion candidates removed per reduction.
    pub reduce_fraction: u32,
    /// Conflicts before the first clause-database reduction.
    pub reduce_interval: u64,
    /// Initial second-order increment of the reduction schedule.
    pub reduce_delta: u64,
    /// Minimal number of conflicts between two restarts.
    pub restart_interval: u64,
    /// Conflicts between clause-database simplifications.
    pub simplify_interval: u64,
    /// New binary clauses required to trigger a simplification.
    pub simplify_bin_delta: u32,
    /// Skip variable elimination when both polarities occur at least this often.
    pub var_elim_skip: u32,
    /// Skip subsumption when the key literal occurs more often than this.
    pub subsume_skip: u32,
    /// Largest resolvent produced by variable elimination.
    pub res_clause_limit: u32,
    /// Diagnostic verbosity; 0 is silent.
    pub verbosity: u32,
}

impl Default for Params {
    fn default() -> Self {
        Params {
            var_decay: 0.95,
            clause_decay: 0.999,
            randomness: 0.02,
            random_seed: 0xabcd_ef98,
            keep_lbd: 4,
            reduce_fraction: 16,
            reduce_interval: 2000,
            reduce_delta: 300,
            restart_interval: 10,
            simplify_interval: 100,
            simplify_bin_delta: 100,
            var_elim_skip: 10,
            subsume_skip: 3000,
            res_clause_limit: 20,
            verbosity: 0,
        }
    }
}
