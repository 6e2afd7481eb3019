//! Conflict-analysis workspace
//!
//! First-UIP learning walks the trail backwards resolving antecedents; the
//! state it needs between steps lives here: per-variable `seen` marks, the
//! buffer collecting learned-clause literals below the conflict level, a
//! ternary cache for recursive clause minimization, and a stamped level map
//! for LBD computation. The traversal itself is driven from the solver,
//! which owns the trail and the clause pool.

use crate::literal::{Literal, Variable};

/// Minimization verdict cached per variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Implied {
    /// Not examined yet.
    NotSeen = 0,
    /// Known to be implied by the clause body and level-0 units.
    Yes = 1,
    /// Known not to be implied.
    No = 2,
}

/// Reusable state for first-UIP conflict analysis.
#[derive(Debug, Default)]
pub struct ConflictAnalyzer {
    /// Variables marked during resolution (conflict-level counting) and
    /// kept marked for buffer literals until the learned clause is emitted.
    seen: Vec<bool>,
    /// Learned-clause literals below the conflict level.
    pub buffer: Vec<Literal>,
    /// Ternary minimization cache.
    cache: Vec<Implied>,
    /// Variables whose cache entry must be cleared after minimization.
    cache_touched: Vec<u32>,
    /// Stamp per decision level, for LBD counting.
    level_stamp: Vec<u64>,
    stamp: u64,
}

impl ConflictAnalyzer {
    /// Create a workspace for `num_vars` variables.
    pub fn new(num_vars: usize) -> Self {
        ConflictAnalyzer {
            seen: vec![false; num_vars],
            buffer: Vec::new(),
            cache: vec![Implied::NotSeen; num_vars],
            cache_touched: Vec::new(),
            level_stamp: vec![0; num_vars + 1],
            stamp: 0,
        }
    }

    /// Grow the workspace for `num_vars` variables.
    pub fn ensure_num_vars(&mut self, num_vars: usize) {
        if self.seen.len() < num_vars {
            self.seen.resize(num_vars, false);
            self.cache.resize(num_vars, Implied::NotSeen);
            self.level_stamp.resize(num_vars + 1, 0);
        }
    }

    /// Mark a variable as seen.
    #[inline]
    pub fn mark(&mut self, var: Variable) {
        self.seen[var.index()] = true;
    }

    /// Clear a variable's mark.
    #[inline]
    pub fn unmark(&mut self, var: Variable) {
        self.seen[var.index()] = false;
    }

    /// Whether a variable is marked.
    #[inline]
    pub fn is_marked(&self, var: Variable) -> bool {
        self.seen[var.index()]
    }

    /// Cached minimization verdict for a variable.
    #[inline]
    pub fn cached(&self, var: Variable) -> Implied {
        self.cache[var.index()]
    }

    /// Record a minimization verdict.
    #[inline]
    pub fn cache_verdict(&mut self, var: Variable, verdict: Implied) {
        self.cache[var.index()] = verdict;
        self.cache_touched.push(var.0);
    }

    /// Forget all cached verdicts (cheap: only touched entries are cleared).
    pub fn clear_cache(&mut self) {
        for &v in &self.cache_touched {
            self.cache[v as usize] = Implied::NotSeen;
        }
        self.cache_touched.clear();
    }

    /// Count the distinct decision levels in `levels` (the LBD when fed a
    /// learned clause's literal levels). Stamping makes repeated calls cheap.
    pub fn count_levels(&mut self, levels: impl IntoIterator<Item = u32>) -> u32 {
        self.stamp += 1;
        let mut count = 0;
        for lvl in levels {
            let slot = &mut self.level_stamp[lvl as usize];
            if *slot != self.stamp {
                *slot = self.stamp;
                count += 1;
            }
        }
        count
    }

    /// Drop per-conflict state. Marks of buffer literals must already have
    /// been cleared by the emitter.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.clear_cache();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marks() {
        let mut a = ConflictAnalyzer::new(5);
        a.mark(Variable(1));
        a.mark(Variable(3));
        assert!(a.is_marked(Variable(1)));
        assert!(!a.is_marked(Variable(2)));
        a.unmark(Variable(1));
        assert!(!a.is_marked(Variable(1)));
        assert!(a.is_marked(Variable(3)));
    }

    #[test]
    fn test_count_levels() {
        let mut a = ConflictAnalyzer::new(8);
        assert_eq!(a.count_levels([3, 1, 3, 2, 1]), 3);
        // a fresh stamp forgets the previous call
        assert_eq!(a.count_levels([3, 3, 3]), 1);
        assert_eq!(a.count_levels(std::iter::empty()), 0);
    }

    #[test]
    fn test_cache_clearing() {
        let mut a = ConflictAnalyzer::new(4);
        a.cache_verdict(Variable(2), Implied::Yes);
        a.cache_verdict(Variable(3), Implied::No);
        assert_eq!(a.cached(Variable(2)), Implied::Yes);
        assert_eq!(a.cached(Variable(3)), Implied::No);
        a.clear_cache();
        assert_eq!(a.cached(Variable(2)), Implied::NotSeen);
        assert_eq!(a.cached(Variable(3)), Implied::NotSeen);
    }
}
