//! End-to-end search scenarios.

use y3_sat::{Literal, Solver, SolverError, Status, Value, Variable};

fn lit(v: u32, pos: bool) -> Literal {
    if pos {
        Literal::positive(Variable(v))
    } else {
        Literal::negative(Variable(v))
    }
}

fn solver(nvars: u32, preprocess: bool) -> Solver {
    let mut s = Solver::new(nvars as usize + 1, preprocess);
    s.add_vars(nvars);
    s
}

fn add_all(s: &mut Solver, clauses: &[Vec<Literal>]) {
    for c in clauses {
        s.add_clause(c).unwrap();
    }
}

fn assert_model_satisfies(s: &Solver, clauses: &[Vec<Literal>]) {
    for c in clauses {
        assert!(
            c.iter().any(|&l| s.lit_value(l) == Value::True),
            "clause {c:?} not satisfied"
        );
    }
}

#[test]
fn unit_propagation_chain() {
    for preprocess in [false, true] {
        let mut s = solver(4, preprocess);
        add_all(
            &mut s,
            &[
                vec![lit(1, true)],
                vec![lit(1, false), lit(2, true)],
                vec![lit(2, false), lit(3, true)],
                vec![lit(3, false), lit(4, true)],
            ],
        );
        assert_eq!(s.solve(), Ok(Status::Sat));
        for v in 1..=4 {
            assert_eq!(s.value(Variable(v)), Value::True, "variable {v}");
        }
    }
}

#[test]
fn simple_unsat() {
    for preprocess in [false, true] {
        let mut s = solver(2, preprocess);
        add_all(
            &mut s,
            &[
                vec![lit(1, true), lit(2, true)],
                vec![lit(1, true), lit(2, false)],
                vec![lit(1, false), lit(2, true)],
                vec![lit(1, false), lit(2, false)],
            ],
        );
        assert_eq!(s.solve(), Ok(Status::Unsat));
    }
}

fn pigeonhole(pigeons: u32, holes: u32) -> (u32, Vec<Vec<Literal>>) {
    let var = |i: u32, j: u32| holes * (i - 1) + j; // 1-based
    let mut clauses = Vec::new();
    for i in 1..=pigeons {
        clauses.push((1..=holes).map(|j| lit(var(i, j), true)).collect());
    }
    for j in 1..=holes {
        for i1 in 1..=pigeons {
            for i2 in (i1 + 1)..=pigeons {
                clauses.push(vec![lit(var(i1, j), false), lit(var(i2, j), false)]);
            }
        }
    }
    (pigeons * holes, clauses)
}

#[test]
fn pigeonhole_three_into_two() {
    for preprocess in [false, true] {
        let (nvars, clauses) = pigeonhole(3, 2);
        let mut s = solver(nvars, preprocess);
        add_all(&mut s, &clauses);
        assert_eq!(s.solve(), Ok(Status::Unsat));
    }
}

#[test]
fn equivalence_chain_is_unsat() {
    // 1 ≡ 2 ≡ 3 via binaries, then {¬1, ¬3} with {3} forces a conflict
    for preprocess in [false, true] {
        let mut s = solver(3, preprocess);
        add_all(
            &mut s,
            &[
                vec![lit(1, true), lit(2, false)],
                vec![lit(1, false), lit(2, true)],
                vec![lit(2, true), lit(3, false)],
                vec![lit(2, false), lit(3, true)],
                vec![lit(1, false), lit(3, false)],
                vec![lit(3, true)],
            ],
        );
        assert_eq!(s.solve(), Ok(Status::Unsat), "preprocess = {preprocess}");
    }
}

#[test]
fn pure_literals_solve_without_search() {
    let clauses = vec![
        vec![lit(1, true), lit(2, true)],
        vec![lit(2, false), lit(3, true)],
    ];
    let mut s = solver(3, true);
    add_all(&mut s, &clauses);
    assert_eq!(s.solve(), Ok(Status::Sat));
    assert_model_satisfies(&s, &clauses);
    assert!(s.stats().pure_literals > 0);
    assert_eq!(s.stats().conflicts, 0);
}

#[test]
fn elimination_with_reconstruction() {
    let clauses = vec![vec![lit(1, true), lit(2, true)], vec![lit(1, false), lit(3, true)]];
    let mut s = solver(3, true);
    add_all(&mut s, &clauses);
    assert_eq!(s.solve(), Ok(Status::Sat));
    // whatever preprocessing removed, the extended model covers the originals
    assert_model_satisfies(&s, &clauses);
}

#[test]
fn status_stable_under_literal_order() {
    let base = vec![
        vec![lit(1, true), lit(2, true), lit(3, false)],
        vec![lit(2, false), lit(3, true)],
        vec![lit(1, false), lit(3, true)],
        vec![lit(3, false), lit(1, true)],
    ];
    let reversed: Vec<Vec<Literal>> = base
        .iter()
        .map(|c| c.iter().rev().copied().collect())
        .collect();

    let mut a = solver(3, false);
    add_all(&mut a, &base);
    let mut b = solver(3, false);
    add_all(&mut b, &reversed);
    assert_eq!(a.solve().unwrap(), b.solve().unwrap());
}

#[test]
fn identical_seeds_give_identical_models() {
    let (nvars, mut clauses) = pigeonhole(3, 3); // satisfiable
    clauses.push(vec![lit(1, true), lit(5, true), lit(9, true)]);

    let run = |seed: u64| {
        let mut s = solver(nvars, false);
        s.set_random_seed(seed);
        s.set_randomness(0.3).unwrap();
        add_all(&mut s, &clauses);
        assert_eq!(s.solve(), Ok(Status::Sat));
        let mut values = Vec::new();
        s.all_values(&mut values);
        values
    };
    assert_eq!(run(7), run(7));
}

#[test]
fn budget_exhaustion_is_resumable() {
    let (nvars, clauses) = pigeonhole(4, 3);
    let mut s = solver(nvars, false);
    add_all(&mut s, &clauses);
    s.set_conflict_budget(1);
    assert_eq!(s.solve(), Ok(Status::Unknown));
    s.clear_conflict_budget();
    assert_eq!(s.solve(), Ok(Status::Unsat));
}

#[test]
fn solve_after_unsat_requires_reset() {
    let mut s = solver(1, false);
    s.add_clause(&[lit(1, true)]).unwrap();
    s.add_clause(&[lit(1, false)]).unwrap();
    assert_eq!(s.solve(), Ok(Status::Unsat));
    assert!(matches!(s.solve(), Err(SolverError::InvalidState { .. })));
    assert!(matches!(
        s.add_clause(&[lit(1, true)]),
        Err(SolverError::InvalidState { .. })
    ));

    s.reset();
    s.add_clause(&[lit(1, false)]).unwrap();
    assert_eq!(s.solve(), Ok(Status::Sat));
    assert_eq!(s.value(Variable(1)), Value::False);
}

#[test]
fn true_literals_reports_the_assignment() {
    let mut s = solver(3, false);
    add_all(
        &mut s,
        &[vec![lit(1, true)], vec![lit(1, false), lit(2, false)]],
    );
    assert_eq!(s.solve(), Ok(Status::Sat));
    let mut out = Vec::new();
    let n = s.true_literals(&mut out);
    assert_eq!(n, out.len());
    assert!(out.contains(&lit(1, true)));
    assert!(out.contains(&lit(2, false)));
    // the reserved variable is always true
    assert!(out.contains(&Literal::TRUE));
}

#[test]
fn search_state_invariants_hold_after_solving() {
    let (nvars, mut clauses) = pigeonhole(4, 4);
    clauses.push(vec![lit(2, true), lit(7, true), lit(12, true)]);
    let mut s = solver(nvars, false);
    add_all(&mut s, &clauses);
    assert_eq!(s.solve(), Ok(Status::Sat));
    s.check_watch_integrity().unwrap();
    s.check_heap_order().unwrap();
    s.check_model().unwrap();
    assert_model_satisfies(&s, &clauses);
}

#[test]
fn larger_mixed_instance_learns_and_stays_consistent() {
    // chain of implications with some conflicting pockets; SAT overall
    let n = 30u32;
    let mut clauses: Vec<Vec<Literal>> = Vec::new();
    for v in 1..n {
        clauses.push(vec![lit(v, false), lit(v + 1, true)]);
    }
    for v in 1..=(n - 2) {
        clauses.push(vec![lit(v, true), lit(v + 1, true), lit(v + 2, true)]);
    }
    clauses.push(vec![lit(1, true), lit(n, false)]);
    let mut s = solver(n, false);
    add_all(&mut s, &clauses);
    assert_eq!(s.solve(), Ok(Status::Sat));
    assert_model_satisfies(&s, &clauses);
    s.check_model().unwrap();
}
