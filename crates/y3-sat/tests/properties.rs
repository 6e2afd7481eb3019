//! Randomized cross-checking against a truth-table decision procedure.

use proptest::prelude::*;
use y3_sat::{Literal, Solver, Status, Value, Variable};

const NVARS: u32 = 7;

fn lit(v: u32, pos: bool) -> Literal {
    if pos {
        Literal::positive(Variable(v))
    } else {
        Literal::negative(Variable(v))
    }
}

/// Clause as (variable, polarity) pairs over 1..=NVARS.
type TestClause = Vec<(u32, bool)>;

fn clause_strategy() -> impl Strategy<Value = TestClause> {
    proptest::collection::vec((1..=NVARS, any::<bool>()), 1..5)
}

fn formula_strategy() -> impl Strategy<Value = Vec<TestClause>> {
    proptest::collection::vec(clause_strategy(), 0..24)
}

fn brute_force_is_sat(clauses: &[TestClause]) -> bool {
    (0..(1u32 << NVARS)).any(|m| {
        clauses.iter().all(|c| {
            c.iter().any(|&(v, pos)| {
                let val = m & (1 << (v - 1)) != 0;
                if pos {
                    val
                } else {
                    !val
                }
            })
        })
    })
}

fn build_solver(clauses: &[TestClause], preprocess: bool) -> Solver {
    let mut s = Solver::new(NVARS as usize + 1, preprocess);
    s.add_vars(NVARS);
    for c in clauses {
        let lits: Vec<Literal> = c.iter().map(|&(v, pos)| lit(v, pos)).collect();
        s.add_clause(&lits).unwrap();
    }
    s
}

fn model_satisfies(s: &Solver, clauses: &[TestClause]) -> bool {
    clauses.iter().all(|c| {
        c.iter()
            .any(|&(v, pos)| s.lit_value(lit(v, pos)) == Value::True)
    })
}

proptest! {
    /// The solver agrees with the truth table, with and without
    /// preprocessing, and SAT models satisfy the original clauses.
    #[test]
    fn prop_matches_brute_force(clauses in formula_strategy()) {
        let expected = if brute_force_is_sat(&clauses) {
            Status::Sat
        } else {
            Status::Unsat
        };

        for preprocess in [false, true] {
            let mut s = build_solver(&clauses, preprocess);
            let got = s.solve().unwrap();
            prop_assert_eq!(got, expected, "preprocess = {}", preprocess);
            if got == Status::Sat {
                prop_assert!(
                    model_satisfies(&s, &clauses),
                    "model does not satisfy the original clauses (preprocess = {})",
                    preprocess
                );
            }
        }
    }

    /// Clause order does not change the answer.
    #[test]
    fn prop_status_independent_of_clause_order(
        (clauses, shuffled) in formula_strategy()
            .prop_flat_map(|c| {
                let n = c.len();
                (Just(c), proptest::collection::vec(0..usize::MAX, n))
            })
            .prop_map(|(c, keys)| {
                let mut tagged: Vec<(usize, TestClause)> =
                    keys.into_iter().zip(c.iter().cloned()).collect();
                tagged.sort_by_key(|&(k, _)| k);
                let shuffled: Vec<TestClause> =
                    tagged.into_iter().map(|(_, cl)| cl).collect();
                (c, shuffled)
            })
    ) {
        let mut a = build_solver(&clauses, false);
        let mut b = build_solver(&shuffled, false);
        prop_assert_eq!(a.solve().unwrap(), b.solve().unwrap());
    }

    /// Reversing the literals inside every clause does not change the
    /// answer either.
    #[test]
    fn prop_status_independent_of_literal_order(clauses in formula_strategy()) {
        let reversed: Vec<TestClause> = clauses
            .iter()
            .map(|c| c.iter().rev().copied().collect())
            .collect();
        let mut a = build_solver(&clauses, false);
        let mut b = build_solver(&reversed, false);
        prop_assert_eq!(a.solve().unwrap(), b.solve().unwrap());
    }

    /// After a SAT answer the internal invariant checkers hold.
    #[test]
    fn prop_invariants_after_sat(clauses in formula_strategy()) {
        let mut s = build_solver(&clauses, false);
        if s.solve().unwrap() == Status::Sat {
            prop_assert!(s.check_watch_integrity().is_ok());
            prop_assert!(s.check_heap_order().is_ok());
            prop_assert!(s.check_model().is_ok());
        }
    }
}
