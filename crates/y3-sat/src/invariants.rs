//! Consistency checkers
//!
//! Structural invariants of the solver, verified at strategic points in
//! debug builds and usable from tests. Each checker returns a description
//! of the first violation it finds.

use std::collections::HashMap;

use crate::literal::Literal;
use crate::solver::{Antecedent, Solver};
use crate::value::Value;
use crate::watched::Watch;

impl Solver {
    /// Every live long clause is watched exactly once by each of its first
    /// two literals and by nothing else; binary entries pair up.
    pub fn check_watch_integrity(&self) -> Result<(), String> {
        let mut counts: HashMap<(u32, u32), u32> = HashMap::new();
        for idx in 0..self.watches.num_lists() {
            let l = Literal::from_index(idx);
            for w in self.watches.list(l) {
                if let Watch::Long(cidx, _) = w {
                    *counts.entry((cidx.0, l.0)).or_insert(0) += 1;
                }
            }
        }
        let mut total = 0u32;
        for cidx in self.pool.iter() {
            let l0 = self.pool.first_literal(cidx);
            let l1 = self.pool.second_literal(cidx);
            for l in [l0, l1] {
                match counts.get(&(cidx.0, l.0)) {
                    Some(1) => total += 1,
                    n => {
                        return Err(format!(
                            "clause {} watched {:?} times by literal {}",
                            cidx.0, n, l.0
                        ))
                    }
                }
            }
        }
        let stray: u32 = counts.values().sum::<u32>() - total;
        if stray != 0 {
            return Err(format!("{stray} watch entries reference non-watching literals"));
        }
        for idx in 0..self.watches.num_lists() {
            let a = Literal::from_index(idx);
            for w in self.watches.list(a) {
                if let Watch::Binary(b) = w {
                    let back = self
                        .watches
                        .list(*b)
                        .iter()
                        .filter(|v| matches!(v, Watch::Binary(x) if *x == a))
                        .count();
                    if back == 0 {
                        return Err(format!(
                            "binary clause {{{}, {}}} missing its mirror entry",
                            a.0, b.0
                        ));
                    }
                }
            }
        }
        Ok(())
    }

    /// With the propagation pointer at the trail top and no conflict, no
    /// clause is unit or false under the current assignment.
    pub fn check_propagation_complete(&self) -> Result<(), String> {
        if self.trail.prop_ptr != self.trail.len() {
            return Err("propagation pointer below trail top".to_string());
        }
        for cidx in self.pool.iter() {
            let lits = self.pool.literals(cidx);
            let satisfied = lits.iter().any(|&l| self.lit_value(l) == Value::True);
            if satisfied {
                continue;
            }
            let unassigned = lits
                .iter()
                .filter(|&&l| !self.lit_value(l).is_assigned())
                .count();
            if unassigned < 2 {
                return Err(format!(
                    "clause {} is {} under the current assignment",
                    cidx.0,
                    if unassigned == 0 { "false" } else { "unit" }
                ));
            }
        }
        for idx in 0..self.watches.num_lists() {
            let a = Literal::from_index(idx);
            for w in self.watches.list(a) {
                if let Watch::Binary(b) = w {
                    if self.lit_value(a) == Value::False && self.lit_value(*b) == Value::False {
                        return Err(format!("binary clause {{{}, {}}} is false", a.0, b.0));
                    }
                }
            }
        }
        Ok(())
    }

    /// Trail literals are true, their antecedents justify them, and
    /// implication edges never point to later levels.
    pub fn check_antecedents(&self) -> Result<(), String> {
        for &l in &self.trail.lits {
            if self.lit_value(l) != Value::True {
                return Err(format!("trail literal {} is not true", l.0));
            }
            let x = l.variable();
            let lvl = self.level[x.index()];
            match self.ante[x.index()] {
                Antecedent::None | Antecedent::Eliminated | Antecedent::Subst(_) => {
                    return Err(format!("trail literal {} has no antecedent", l.0));
                }
                Antecedent::Unit | Antecedent::Pure => {
                    if lvl != 0 {
                        return Err(format!("level-0 literal {} at level {lvl}", l.0));
                    }
                }
                Antecedent::Decision => {}
                Antecedent::Binary(other) => {
                    if self.lit_value(other) != Value::False
                        || self.level[other.variable().index()] > lvl
                    {
                        return Err(format!("bad binary antecedent of literal {}", l.0));
                    }
                }
                Antecedent::Clause(cidx) => {
                    if !self.pool.is_live(cidx) {
                        return Err(format!("literal {} implied by a dead clause", l.0));
                    }
                    if self.pool.first_literal(cidx) != l {
                        return Err(format!(
                            "antecedent clause {} does not start with literal {}",
                            cidx.0, l.0
                        ));
                    }
                    for &lk in &self.pool.literals(cidx)[1..] {
                        if self.lit_value(lk) != Value::False
                            || self.level[lk.variable().index()] > lvl
                        {
                            return Err(format!("bad clause antecedent of literal {}", l.0));
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Activity heap shape and position map.
    pub fn check_heap_order(&self) -> Result<(), String> {
        if self.heap.shape_is_valid() {
            Ok(())
        } else {
            Err("activity heap shape violated".to_string())
        }
    }

    /// After simplification no live clause contains a level-0 false literal.
    pub fn check_level0_clean(&self) -> Result<(), String> {
        for cidx in self.pool.iter() {
            for &l in self.pool.literals(cidx) {
                if self.lit_value(l) == Value::False && self.level[l.variable().index()] == 0 {
                    return Err(format!(
                        "clause {} still contains level-0 false literal {}",
                        cidx.0, l.0
                    ));
                }
            }
        }
        Ok(())
    }

    /// A model must satisfy every live clause (used by tests after SAT).
    pub fn check_model(&self) -> Result<(), String> {
        for cidx in self.pool.iter() {
            if !self
                .pool
                .literals(cidx)
                .iter()
                .any(|&l| self.lit_value(l) == Value::True)
            {
                return Err(format!("clause {} unsatisfied by the model", cidx.0));
            }
        }
        for idx in 0..self.watches.num_lists() {
            let a = Literal::from_index(idx);
            for w in self.watches.list(a) {
                if let Watch::Binary(b) = w {
                    if self.lit_value(a) != Value::True && self.lit_value(*b) != Value::True {
                        return Err(format!("binary clause {{{}, {}}} unsatisfied", a.0, b.0));
                    }
                }
            }
        }
        Ok(())
    }

    /// Run the search-state checkers, panicking on the first violation.
    /// Compiled to nothing in release builds.
    #[inline]
    pub(crate) fn debug_check_search_state(&self) {
        #[cfg(debug_assertions)]
        {
            if let Err(e) = self.check_watch_integrity() {
                panic!("watch integrity: {e}");
            }
            if let Err(e) = self.check_antecedents() {
                panic!("antecedent soundness: {e}");
            }
            if let Err(e) = self.check_heap_order() {
                panic!("heap order: {e}");
            }
        }
    }
}
