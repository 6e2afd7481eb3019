//! Preprocessing scenarios: subsumption, elimination, SCC substitution and
//! model reconstruction.

use y3_sat::{Literal, Solver, Status, Value, Variable};

fn lit(v: u32, pos: bool) -> Literal {
    if pos {
        Literal::positive(Variable(v))
    } else {
        Literal::negative(Variable(v))
    }
}

fn solver(nvars: u32) -> Solver {
    let mut s = Solver::new(nvars as usize + 1, true);
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
fn bounded_elimination_fires_and_reconstructs() {
    // no pure literals, no binary clauses: variable 3 (then others) must go
    // through resolution
    let clauses = vec![
        vec![lit(1, true), lit(2, true), lit(3, true)],
        vec![lit(1, false), lit(4, true), lit(5, true)],
        vec![lit(2, false), lit(4, false), lit(1, true)],
        vec![lit(2, false), lit(3, false), lit(4, false), lit(5, false)],
    ];
    let mut s = solver(5);
    add_all(&mut s, &clauses);
    assert_eq!(s.solve(), Ok(Status::Sat));
    assert!(s.stats().eliminated_vars > 0, "no variable was eliminated");
    assert_model_satisfies(&s, &clauses);
}

#[test]
fn scc_substitution_collapses_equivalent_variables() {
    // 1 ≡ 2 and 2 ≡ 3, plus a satisfiable core over the representative
    let clauses = vec![
        vec![lit(1, true), lit(2, false)],
        vec![lit(1, false), lit(2, true)],
        vec![lit(2, true), lit(3, false)],
        vec![lit(2, false), lit(3, true)],
        vec![lit(1, true), lit(4, true)],
        vec![lit(3, false), lit(4, false)],
    ];
    let mut s = solver(4);
    add_all(&mut s, &clauses);
    assert_eq!(s.solve(), Ok(Status::Sat));
    assert!(s.stats().substituted_vars >= 2);
    // equivalence must survive reconstruction
    assert_eq!(s.value(Variable(1)), s.value(Variable(2)));
    assert_eq!(s.value(Variable(2)), s.value(Variable(3)));
    assert_model_satisfies(&s, &clauses);
}

#[test]
fn inconsistent_component_detected() {
    // the four binaries make 1 ≡ 2 and 1 ≡ ¬2: unsatisfiable
    let clauses = vec![
        vec![lit(1, true), lit(2, true)],
        vec![lit(1, false), lit(2, false)],
        vec![lit(1, true), lit(2, false)],
        vec![lit(1, false), lit(2, true)],
    ];
    let mut s = solver(2);
    add_all(&mut s, &clauses);
    assert_eq!(s.solve(), Ok(Status::Unsat));
}

#[test]
fn preprocessing_shrinks_the_problem() {
    let clauses = vec![
        vec![lit(1, true), lit(2, true), lit(3, true), lit(4, true)],
        vec![lit(1, true), lit(2, true), lit(3, true)],
        vec![lit(1, true), lit(2, true)],
        vec![lit(1, false), lit(2, true), lit(3, true)],
        vec![lit(2, false), lit(4, false), lit(1, true)],
        vec![lit(3, false), lit(4, true), lit(2, false)],
    ];
    let mut s = solver(4);
    add_all(&mut s, &clauses);
    assert_eq!(s.solve(), Ok(Status::Sat));
    // between elimination, subsumption and pure literals, the long clauses
    // must not all survive to the search
    assert!(s.num_problem_clauses() < 4);
    let st = s.stats();
    assert!(
        st.subsumed
            + st.strengthened
            + st.eliminated_vars
            + st.pure_literals
            + st.substituted_vars
            > 0,
        "preprocessing achieved nothing"
    );
    assert_model_satisfies(&s, &clauses);
}

#[test]
fn preprocessing_alone_can_refute() {
    // the unit cascade from {¬3} runs through the binaries and derives the
    // empty clause before any search
    let clauses = vec![
        vec![lit(1, true), lit(2, true)],
        vec![lit(1, true), lit(2, false)],
        vec![lit(1, false), lit(3, true)],
        vec![lit(3, false)],
    ];
    let mut s = solver(3);
    add_all(&mut s, &clauses);
    assert_eq!(s.solve(), Ok(Status::Unsat));
    assert_eq!(s.stats().conflicts, 0);
}

#[test]
fn mixed_pipeline_keeps_models_faithful() {
    // units, equivalences, eliminable variables and subsumable clauses in
    // one instance; every original clause must hold in the final model
    let clauses = vec![
        vec![lit(7, true)],
        vec![lit(7, false), lit(1, true), lit(2, true)],
        vec![lit(1, true), lit(2, false)],
        vec![lit(1, false), lit(2, true)],
        vec![lit(2, true), lit(3, true), lit(4, true)],
        vec![lit(3, false), lit(5, true), lit(6, true)],
        vec![lit(5, false), lit(4, false), lit(3, true)],
        vec![lit(6, false), lit(4, false), lit(5, false), lit(3, false)],
        vec![lit(4, true), lit(6, true), lit(2, false)],
    ];
    let mut s = solver(7);
    add_all(&mut s, &clauses);
    assert_eq!(s.solve(), Ok(Status::Sat));
    assert_model_satisfies(&s, &clauses);
    // the reduced clause set is consistent as well
    s.check_model().unwrap();
}

#[test]
fn preprocessing_is_deterministic() {
    let clauses = vec![
        vec![lit(1, true), lit(2, true), lit(3, true)],
        vec![lit(1, false), lit(4, true), lit(5, true)],
        vec![lit(2, false), lit(4, false), lit(1, true)],
        vec![lit(2, false), lit(3, false), lit(4, false), lit(5, false)],
    ];
    let run = || {
        let mut s = solver(5);
        add_all(&mut s, &clauses);
        assert_eq!(s.solve(), Ok(Status::Sat));
        let mut values = Vec::new();
        s.all_values(&mut values);
        values
    };
    assert_eq!(run(), run());
}
