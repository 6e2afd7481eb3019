//! Solver benchmarks: pigeonhole refutations and an easy random 3-SAT mix.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use y3_sat::{Literal, Solver, Status, Variable};

fn lit(v: u32, pos: bool) -> Literal {
    if pos {
        Literal::positive(Variable(v))
    } else {
        Literal::negative(Variable(v))
    }
}

fn pigeonhole(pigeons: u32, holes: u32) -> (u32, Vec<Vec<Literal>>) {
    let var = |i: u32, j: u32| holes * (i - 1) + j;
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

fn random_3sat(nvars: u32, nclauses: u32, mut seed: u64) -> Vec<Vec<Literal>> {
    let mut next = || {
        seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        seed >> 33
    };
    (0..nclauses)
        .map(|_| {
            (0..3)
                .map(|_| {
                    let v = (next() % nvars as u64) as u32 + 1;
                    lit(v, next() % 2 == 0)
                })
                .collect()
        })
        .collect()
}

fn solve(nvars: u32, clauses: &[Vec<Literal>], preprocess: bool) -> Status {
    let mut s = Solver::new(nvars as usize + 1, preprocess);
    s.add_vars(nvars);
    for c in clauses {
        s.add_clause(c).unwrap();
    }
    s.solve().unwrap()
}

fn bench_pigeonhole(c: &mut Criterion) {
    let (nvars, clauses) = pigeonhole(6, 5);
    c.bench_function("pigeonhole_6_5", |b| {
        b.iter(|| {
            let status = solve(black_box(nvars), black_box(&clauses), false);
            assert_eq!(status, Status::Unsat);
        })
    });
}

fn bench_random_3sat(c: &mut Criterion) {
    let nvars = 60;
    let clauses = random_3sat(nvars, 150, 0xdead_beef);
    c.bench_function("random_3sat_60_150", |b| {
        b.iter(|| {
            let _ = solve(black_box(nvars), black_box(&clauses), false);
        })
    });
    c.bench_function("random_3sat_60_150_preprocessed", |b| {
        b.iter(|| {
            let _ = solve(black_box(nvars), black_box(&clauses), true);
        })
    });
}

criterion_group!(benches, bench_pigeonhole, bench_random_3sat);
criterion_main!(benches);
