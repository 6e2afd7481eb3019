//! Subsumption and self-subsuming resolution (preprocessing)
//!
//! A clause C subsumes D when every literal of C appears in D; D is then
//! redundant. C strengthens D via pivot `p` when `C \ {p} ⊆ D` and `¬p ∈ D`;
//! resolving the two on `p` shows `¬p` can be dropped from D.
//!
//! Candidates for a clause C come from the occurrence lists of C's *key*
//! literal (the one with the fewest total occurrences) and of its negation.
//! A 32-bit signature per clause (bitmap of variables mod 32) filters most
//! non-subsumptions before the literal scan. The scan frontier walks the
//! whole pool once; clauses that shrink behind the frontier are re-enqueued
//! through the marked clause queue.

use crate::clause_db::ClauseRef;
use crate::literal::Literal;
use crate::solver::{Antecedent, Solver};

/// Bitmap of the clause's variables mod 32; if `sig(C) & !sig(D) != 0`, C
/// cannot subsume or strengthen D.
pub(crate) fn clause_signature(lits: &[Literal]) -> u32 {
    let mut sig = 0u32;
    for l in lits {
        sig |= 1 << (l.variable().0 & 31);
    }
    sig
}

impl Solver {
    /// Advance the subsumption scan frontier.
    fn clause_scan_next(&mut self) -> Option<ClauseRef> {
        let c = self.pool.next_live(self.scan_index)?;
        self.scan_index = self.pool.next_index(c);
        Some(c)
    }

    /// One subsumption pass: every clause past the scan frontier plus every
    /// re-enqueued clause gets to subsume and strengthen its neighbours.
    /// Returns false when a strengthening chain derived the empty clause.
    pub(crate) fn pp_subsumption(&mut self) -> bool {
        loop {
            let cidx = match self.clause_scan_next() {
                Some(c) => c,
                None => match self.clause_queue_pop() {
                    Some(c) => c,
                    None => break,
                },
            };
            self.pp_clause_subsumption(cidx);
            if self.has_empty_clause {
                return false;
            }
        }
        true
    }

    /// Try to subsume or strengthen other clauses with `cidx`.
    fn pp_clause_subsumption(&mut self, cidx: ClauseRef) {
        if !self.pool.is_live(cidx) {
            return;
        }
        let c_lits: Vec<Literal> = self.pool.literals(cidx).to_vec();
        let c_sig = self.pool.signature(cidx);
        let key = *c_lits
            .iter()
            .min_by_key(|l| self.occ[l.index()] + self.occ[l.negated().index()])
            .expect("clauses have at least two literals");

        for &l in &c_lits {
            self.lit_marks[l.index()] = true;
        }

        // candidates with `key` can be subsumed or strengthened on another
        // pivot; candidates with `¬key` can only be strengthened on `key`
        for watch_lit in [key, key.negated()] {
            if self.occ_lists.list(watch_lit).len() > self.params.subsume_skip as usize {
                continue;
            }
            let candidates: Vec<ClauseRef> = self.occ_lists.list(watch_lit).to_vec();
            for d in candidates {
                if d == cidx || !self.pool.is_live(d) {
                    continue;
                }
                if (self.pool.len(d) as usize) < c_lits.len() {
                    continue;
                }
                if c_sig & !self.pool.signature(d) != 0 {
                    continue;
                }
                let mut same = 0usize;
                let mut flips = 0usize;
                let mut flipped = Literal::TRUE;
                for &dl in self.pool.literals(d) {
                    if self.lit_marks[dl.index()] {
                        same += 1;
                    } else if self.lit_marks[dl.negated().index()] {
                        flips += 1;
                        flipped = dl;
                    }
                }
                if flips == 0 && same == c_lits.len() {
                    self.pp_remove_clause(d);
                    self.stats.subsumed += 1;
                } else if flips == 1 && same == c_lits.len() - 1 {
                    self.pp_strengthen_clause(d, flipped);
                }
                if self.has_empty_clause {
                    break;
                }
            }
        }

        for &l in &c_lits {
            self.lit_marks[l.index()] = false;
        }
    }

    /// Remove `flipped` from clause `d` (self-subsuming resolution) and
    /// re-enqueue it: a shorter clause can subsume more.
    fn pp_strengthen_clause(&mut self, d: ClauseRef, flipped: Literal) {
        self.stats.strengthened += 1;
        let old: Vec<Literal> = self.pool.literals(d).to_vec();
        let kept: Vec<Literal> = old.iter().copied().filter(|&l| l != flipped).collect();
        debug_assert_eq!(kept.len() + 1, old.len());

        if kept.len() == 1 {
            self.pool.delete(d);
            self.stats.problem_clauses_deleted += 1;
            self.pp_assign(kept[0], Antecedent::Unit);
            self.pp_decrement_occ(flipped);
            self.pp_decrement_occ(kept[0]);
        } else {
            for (i, &l) in kept.iter().enumerate() {
                self.pool.set_lit(d, i as u32, l);
            }
            self.pool.shrink(d, kept.len() as u32);
            self.pool.set_signature(d, clause_signature(&kept));
            self.occ_lists.remove_entry(flipped, d);
            self.pp_decrement_occ(flipped);
            self.clause_queue_push(d);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::literal::Variable;
    use crate::solver::Solver;
    use crate::value::Value;

    fn lit(v: u32, pos: bool) -> Literal {
        if pos {
            Literal::positive(Variable(v))
        } else {
            Literal::negative(Variable(v))
        }
    }

    #[test]
    fn test_signature_order_independent() {
        let a = clause_signature(&[lit(1, true), lit(2, false), lit(35, true)]);
        let b = clause_signature(&[lit(35, false), lit(1, false), lit(2, true)]);
        // signatures ignore polarity and order
        assert_eq!(a, b);
        // variable 35 aliases bit 3 (35 mod 32)
        assert_ne!(a & (1 << 3), 0);
    }

    #[test]
    fn test_signature_filters_disjoint_clauses() {
        let c = clause_signature(&[lit(1, true), lit(2, true)]);
        let d = clause_signature(&[lit(3, true), lit(4, true)]);
        assert_ne!(c & !d, 0);
    }

    #[test]
    fn test_subsumption_removes_superset() {
        let mut s = Solver::new(8, true);
        s.add_vars(5);
        s.add_clause(&[lit(1, true), lit(2, true)]).unwrap();
        s.add_clause(&[lit(1, true), lit(2, true), lit(3, true)]).unwrap();
        s.add_clause(&[lit(3, true), lit(4, true), lit(5, true)]).unwrap();

        assert!(s.pp_subsumption());
        assert_eq!(s.stats().subsumed, 1);
        assert_eq!(s.num_problem_clauses(), 2);
    }

    #[test]
    fn test_strengthening_removes_flipped_literal() {
        let mut s = Solver::new(8, true);
        s.add_vars(4);
        // {1, 2} strengthens {¬1, 2, 3} to {2, 3}
        s.add_clause(&[lit(1, true), lit(2, true)]).unwrap();
        s.add_clause(&[lit(1, false), lit(2, true), lit(3, true)]).unwrap();

        assert!(s.pp_subsumption());
        assert_eq!(s.stats().strengthened, 1);

        let lens: Vec<u32> = s.pool.iter().map(|c| s.pool.len(c)).collect();
        assert_eq!(lens, vec![2, 2]);
    }

    #[test]
    fn test_strengthening_to_unit_queues_literal() {
        let mut s = Solver::new(8, true);
        s.add_vars(2);
        // {1, 2} and {1, ¬2}: strengthening yields the unit {1}
        s.add_clause(&[lit(1, true), lit(2, true)]).unwrap();
        s.add_clause(&[lit(1, true), lit(2, false)]).unwrap();

        assert!(s.pp_subsumption());
        assert_eq!(s.value(Variable(1)), Value::True);
    }
}
