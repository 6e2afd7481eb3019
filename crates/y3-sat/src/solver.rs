//! CDCL search engine
//!
//! The solver owns every piece of mutable state: the clause pool, watch
//! vectors, assignment trail, activity heap, conflict-analysis workspace,
//! preprocessing structures and the reconstruction log. `solve` runs
//! propagation, first-UIP learning, glucose-style EMA restarts, LBD-aware
//! clause-database reduction and level-0 simplification to completion,
//! returning `Sat`, `Unsat`, or `Unknown` when the conflict budget runs out.
//!
//! Assignment values are stored per literal; the two halves of a variable
//! are always negations of each other. Unassigned values carry the preferred
//! polarity, so phase saving needs no extra storage (see [`crate::value`]).

use std::collections::VecDeque;
use std::io::Write;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::clause_db::{ClausePool, ClauseRef};
use crate::conflict::{ConflictAnalyzer, Implied};
use crate::error::SolverError;
use crate::heap::ActivityHeap;
use crate::literal::{Literal, Variable};
use crate::params::Params;
use crate::preprocess::{ElimHeap, OccurrenceLists};
use crate::reconstruct::ReconstructionLog;
use crate::value::Value;
use crate::watched::{Watch, WatchLists};

/// Learned-clause activities above this trigger a rescale of the whole
/// learned region.
const CLAUSE_ACTIVITY_THRESHOLD: f32 = 1e20;
const INV_CLAUSE_ACTIVITY_THRESHOLD: f32 = 1e-20;

/// Result of a `solve` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// A satisfying assignment was found (extended over eliminated
    /// variables by the reconstruction log).
    Sat,
    /// The clause set is unsatisfiable.
    Unsat,
    /// The conflict budget ran out; solving can resume after raising it.
    Unknown,
}

/// What forced a variable's assignment (or removed it from the problem).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Antecedent {
    /// Unassigned.
    None,
    /// Level-0 fact.
    Unit,
    /// Decision.
    Decision,
    /// Propagated by a binary clause; the datum is the other (false) literal.
    Binary(Literal),
    /// Propagated by a long clause whose first literal is the implied one.
    Clause(ClauseRef),
    /// Pure literal, assigned by preprocessing.
    Pure,
    /// Eliminated by resolution; its value comes from the reconstruction log.
    Eliminated,
    /// Substituted by an equivalent literal (the positive literal of the
    /// variable equals the datum).
    Subst(Literal),
}

/// A failed clause found by propagation.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Conflict {
    /// Binary clause with both literals false.
    Binary(Literal, Literal),
    /// Long clause with all literals false.
    Long(ClauseRef),
}

/// Lifecycle state of the solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Ready,
    Sat,
    Unsat,
    Unknown,
}

/// The assignment trail: assigned literals in assignment order, per-level
/// start markers, and the propagation pointer.
#[derive(Debug)]
pub(crate) struct Trail {
    pub(crate) lits: Vec<Literal>,
    /// `level_index[k]` = index in `lits` where level `k` starts.
    pub(crate) level_index: Vec<u32>,
    /// Literals below this index have been propagated.
    pub(crate) prop_ptr: usize,
}

impl Trail {
    fn new() -> Self {
        Trail {
            lits: Vec::new(),
            level_index: vec![0],
            prop_ptr: 0,
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.lits.len()
    }

    pub(crate) fn reset(&mut self) {
        self.lits.clear();
        self.level_index.clear();
        self.level_index.push(0);
        self.prop_ptr = 0;
    }
}

/// Search and preprocessing counters.
#[derive(Debug, Clone, Default)]
pub struct Stats {
    /// Conflicts found by propagation.
    pub conflicts: u64,
    /// Decisions made.
    pub decisions: u64,
    /// Decisions made by the random draw.
    pub random_decisions: u64,
    /// Trail literals processed by propagation.
    pub propagations: u64,
    /// Restarts (partial or full).
    pub restarts: u64,
    /// Clause-database reductions.
    pub reduce_calls: u64,
    /// Level-0 simplification rounds.
    pub simplify_calls: u64,
    /// Clause-pool compactions.
    pub gc_calls: u64,
    /// Learned clauses created (any size).
    pub learned_clauses: u64,
    /// Total literals over created learned clauses.
    pub learned_literals: u64,
    /// Learned clauses deleted by reduction.
    pub learned_deleted: u64,
    /// Problem clauses deleted by simplification or preprocessing.
    pub problem_clauses_deleted: u64,
    /// Clauses removed by subsumption.
    pub subsumed: u64,
    /// Literals removed by self-subsuming resolution.
    pub strengthened: u64,
    /// Pure literals assigned by preprocessing.
    pub pure_literals: u64,
    /// Unit literals assigned at level 0.
    pub unit_literals: u64,
    /// Variables eliminated by resolution.
    pub eliminated_vars: u64,
    /// Eliminations with at most one occurrence of some polarity (or 2x2).
    pub cheap_eliminations: u64,
    /// Variables replaced by an SCC representative.
    pub substituted_vars: u64,
    /// Deepest decision level reached.
    pub max_depth: u32,
}

/// The CDCL SAT solver.
pub struct Solver {
    pub(crate) nvars: u32,
    pub(crate) pool: ClausePool,
    pub(crate) watches: WatchLists,
    /// Truth value per literal.
    pub(crate) value: Vec<Value>,
    /// Antecedent per variable.
    pub(crate) ante: Vec<Antecedent>,
    /// Decision level per variable (meaningful when assigned; kept across
    /// backtracks for LBD computation).
    pub(crate) level: Vec<u32>,
    pub(crate) heap: ActivityHeap,
    pub(crate) trail: Trail,
    pub(crate) analyzer: ConflictAnalyzer,
    pub(crate) params: Params,
    rng: SmallRng,
    state: State,
    pub(crate) has_empty_clause: bool,
    pub(crate) decision_level: u32,
    /// Number of binary clauses stored inline in the watch vectors.
    pub(crate) binaries: u32,

    // restart state (64-bit fixed point, cf. `update_emas`)
    slow_ema: u64,
    fast_ema: u64,
    level_ema: u64,
    restart_next: u64,

    // reduce state
    reduce_next: u64,
    reduce_inc: u64,
    reduce_inc2: u64,
    /// Learned-clause activity increment.
    cla_inc: f32,

    // simplify state
    simplify_assigned: u32,
    simplify_binaries: u32,
    simplify_next: u64,
    pub(crate) simplify_new_bins: u32,

    /// Absolute ceiling on `stats.conflicts`; `u64::MAX` when unlimited.
    conflict_budget: u64,

    // preprocessing state (see preprocess.rs)
    pub(crate) preprocess: bool,
    /// True once the clause set has been prepared for search (watch scheme
    /// built, binaries inline). Drives the SCC successor iteration mode.
    pub(crate) preprocessed: bool,
    /// Occurrence count per literal (preprocessing only).
    pub(crate) occ: Vec<u32>,
    pub(crate) occ_lists: OccurrenceLists,
    /// Queue of literals forced true at level 0 (unit and pure).
    pub(crate) lqueue: VecDeque<Literal>,
    /// Queue of shrunken clauses to revisit for subsumption.
    pub(crate) cqueue: VecDeque<ClauseRef>,
    /// Subsumption scan frontier into the pool.
    pub(crate) scan_index: u32,
    pub(crate) elim: ElimHeap,
    /// Per-literal scratch marks for subsumption checking.
    pub(crate) lit_marks: Vec<bool>,

    pub(crate) log: ReconstructionLog,
    pub(crate) stats: Stats,
    search_started: bool,
    diag: Option<Box<dyn Write + Send>>,
    report_lines: u32,
}

impl Solver {
    /// Create a solver with storage pre-sized for `var_capacity` variables.
    /// When `preprocess` is set, `solve` runs the inprocessing preprocessor
    /// (pure/unit propagation, SCC substitution, subsumption, bounded
    /// variable elimination) before search.
    pub fn new(var_capacity: usize, preprocess: bool) -> Self {
        let params = Params::default();
        let cap = var_capacity.max(1);
        let mut solver = Solver {
            nvars: 1,
            pool: ClausePool::new(),
            watches: WatchLists::new(cap),
            value: Vec::with_capacity(cap * 2),
            ante: Vec::with_capacity(cap),
            level: Vec::with_capacity(cap),
            heap: ActivityHeap::new(cap, params.var_decay),
            trail: Trail::new(),
            analyzer: ConflictAnalyzer::new(cap),
            rng: SmallRng::seed_from_u64(params.random_seed),
            state: State::Ready,
            has_empty_clause: false,
            decision_level: 0,
            binaries: 0,
            slow_ema: 0,
            fast_ema: 0,
            level_ema: 0,
            restart_next: params.restart_interval,
            reduce_next: params.reduce_interval,
            reduce_inc: params.reduce_interval,
            reduce_inc2: params.reduce_delta,
            cla_inc: 1.0,
            simplify_assigned: 0,
            simplify_binaries: 0,
            simplify_next: 0,
            simplify_new_bins: 0,
            conflict_budget: u64::MAX,
            preprocess,
            preprocessed: false,
            occ: Vec::with_capacity(cap * 2),
            occ_lists: OccurrenceLists::new(cap),
            lqueue: VecDeque::new(),
            cqueue: VecDeque::new(),
            scan_index: 0,
            elim: ElimHeap::new(cap),
            lit_marks: vec![false; cap * 2],
            log: ReconstructionLog::new(),
            stats: Stats::default(),
            search_started: false,
            diag: None,
            report_lines: 0,
            params,
        };
        // the reserved variable is permanently true at level 0
        solver.value.push(Value::True);
        solver.value.push(Value::False);
        solver.ante.push(Antecedent::Unit);
        solver.level.push(0);
        solver.occ.push(0);
        solver.occ.push(0);
        solver
    }

    // ------------------------------------------------------------------
    // Variables and clauses
    // ------------------------------------------------------------------

    /// Number of variables, including the reserved variable 0.
    #[inline]
    pub fn num_vars(&self) -> u32 {
        self.nvars
    }

    /// Create one fresh variable. Must be called before `solve`.
    pub fn new_var(&mut self) -> Variable {
        let x = Variable(self.nvars);
        self.nvars += 1;
        let n = self.nvars as usize;
        self.value.push(Value::UndefFalse);
        self.value.push(Value::UndefTrue);
        self.ante.push(Antecedent::None);
        self.level.push(0);
        self.occ.push(0);
        self.occ.push(0);
        self.watches.ensure_num_vars(n);
        self.occ_lists.ensure_num_vars(n);
        self.analyzer.ensure_num_vars(n);
        self.heap.ensure_num_vars(n);
        self.elim.ensure_num_vars(n);
        self.lit_marks.resize(n * 2, false);
        self.heap.insert(x);
        x
    }

    /// Create `n` fresh variables.
    pub fn add_vars(&mut self, n: u32) {
        for _ in 0..n {
            self.new_var();
        }
    }

    /// Add a clause. Duplicate literals collapse, tautologies and clauses
    /// with a true literal are dropped, false literals are removed. The
    /// empty clause makes the problem unsatisfiable.
    pub fn add_clause(&mut self, lits: &[Literal]) -> Result<(), SolverError> {
        if self.state != State::Ready || self.search_started {
            return Err(SolverError::InvalidState {
                operation: "add_clause",
            });
        }
        for &l in lits {
            if l.variable().0 >= self.nvars {
                return Err(SolverError::VariableOutOfRange {
                    literal: l.0,
                    nvars: self.nvars,
                });
            }
        }

        let mut c: Vec<Literal> = lits.to_vec();
        c.sort_unstable();
        c.dedup();
        // after sorting, a complementary pair is adjacent
        for w in c.windows(2) {
            if w[0].variable() == w[1].variable() {
                return Ok(()); // tautology
            }
        }
        let mut keep = Vec::with_capacity(c.len());
        for &l in &c {
            match self.lit_value(l) {
                Value::True => return Ok(()),
                Value::False => {}
                _ => keep.push(l),
            }
        }

        match keep.len() {
            0 => self.has_empty_clause = true,
            1 => self.add_unit_clause(keep[0]),
            2 if !self.preprocess => self.add_binary_clause(keep[0], keep[1]),
            _ => self.add_large_clause(&keep),
        }
        if self.preprocess && keep.len() >= 2 {
            for &l in &keep {
                self.occ[l.index()] += 1;
            }
        }
        Ok(())
    }

    fn add_unit_clause(&mut self, l: Literal) {
        debug_assert_eq!(self.decision_level, 0);
        debug_assert!(!self.lit_value(l).is_assigned());
        self.assign(l, Antecedent::Unit);
        self.stats.unit_literals += 1;
    }

    pub(crate) fn add_binary_clause(&mut self, a: Literal, b: Literal) {
        self.watches.add_binary(a, b);
        self.binaries += 1;
    }

    fn add_large_clause(&mut self, lits: &[Literal]) {
        let cidx = self.pool.add_problem_clause(lits);
        if self.preprocess {
            let sig = crate::subsume::clause_signature(lits);
            self.pool.set_signature(cidx, sig);
            self.occ_lists.add_clause(cidx, lits);
        } else {
            self.watches.add_long(lits[0], cidx, lits[1]);
            self.watches.add_long(lits[1], cidx, lits[0]);
        }
    }

    // ------------------------------------------------------------------
    // Values and assignment
    // ------------------------------------------------------------------

    /// Truth value of a literal.
    #[inline]
    pub fn lit_value(&self, l: Literal) -> Value {
        self.value[l.index()]
    }

    /// Truth value of a variable (its positive literal).
    #[inline]
    pub fn value(&self, var: Variable) -> Value {
        self.value[Literal::positive(var).index()]
    }

    /// Fill `out` with the value of every variable, index-aligned.
    pub fn all_values(&self, out: &mut Vec<Value>) {
        out.clear();
        out.extend((0..self.nvars).map(|x| self.value(Variable(x))));
    }

    /// Append every literal assigned true to `out`; returns how many.
    pub fn true_literals(&self, out: &mut Vec<Literal>) -> usize {
        let before = out.len();
        for x in 0..self.nvars {
            let var = Variable(x);
            match self.value(var) {
                Value::True => out.push(Literal::positive(var)),
                Value::False => out.push(Literal::negative(var)),
                _ => {}
            }
        }
        out.len() - before
    }

    /// Search statistics.
    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    /// Number of live long problem clauses in the pool.
    pub fn num_problem_clauses(&self) -> u32 {
        self.pool.num_problem_clauses()
    }

    /// Number of binary clauses stored inline in watch vectors.
    pub fn num_binary_clauses(&self) -> u32 {
        self.binaries
    }

    #[inline]
    pub(crate) fn var_is_assigned(&self, x: Variable) -> bool {
        self.value[Literal::positive(x).index()].is_assigned()
    }

    #[inline]
    pub(crate) fn var_is_eliminated(&self, x: Variable) -> bool {
        matches!(
            self.ante[x.index()],
            Antecedent::Pure | Antecedent::Eliminated | Antecedent::Subst(_)
        )
    }

    /// Unassigned and not removed by preprocessing.
    #[inline]
    pub(crate) fn var_is_active(&self, x: Variable) -> bool {
        !self.var_is_assigned(x) && !self.var_is_eliminated(x)
    }

    #[inline]
    pub(crate) fn lit_is_active(&self, l: Literal) -> bool {
        self.var_is_active(l.variable())
    }

    /// Assign `l` true at the current decision level.
    pub(crate) fn assign(&mut self, l: Literal, ante: Antecedent) {
        debug_assert!(!self.lit_value(l).is_assigned());
        self.value[l.index()] = Value::True;
        self.value[l.negated().index()] = Value::False;
        let x = l.variable();
        self.level[x.index()] = self.decision_level;
        self.ante[x.index()] = ante;
        self.trail.lits.push(l);
    }

    // ------------------------------------------------------------------
    // Propagation
    // ------------------------------------------------------------------

    /// Two-watched-literal BCP from the propagation pointer to the trail
    /// top. Returns the failed clause on conflict. Watch entries not yet
    /// visited stay in place.
    pub(crate) fn propagate(&mut self) -> Option<Conflict> {
        while self.trail.prop_ptr < self.trail.lits.len() {
            let p = self.trail.lits[self.trail.prop_ptr];
            self.trail.prop_ptr += 1;
            self.stats.propagations += 1;

            let false_lit = p.negated();
            let mut ws = self.watches.take_list(false_lit);
            let mut conflict = None;
            let mut i = 0;
            let mut j = 0;
            'entries: while i < ws.len() {
                let w = ws[i];
                i += 1;
                match w {
                    Watch::Binary(other) => {
                        ws[j] = w;
                        j += 1;
                        match self.lit_value(other) {
                            Value::True => {}
                            Value::False => {
                                conflict = Some(Conflict::Binary(false_lit, other));
                                break 'entries;
                            }
                            _ => self.assign(other, Antecedent::Binary(false_lit)),
                        }
                    }
                    Watch::Long(cidx, blocker) => {
                        if self.lit_value(blocker) == Value::True {
                            ws[j] = w;
                            j += 1;
                            continue;
                        }
                        // normalize: lit[1] is the false watched literal
                        if self.pool.lit(cidx, 0) == false_lit {
                            self.pool.swap_lits(cidx, 0, 1);
                        }
                        debug_assert_eq!(self.pool.lit(cidx, 1), false_lit);
                        let first = self.pool.lit(cidx, 0);
                        if self.lit_value(first) == Value::True {
                            ws[j] = Watch::Long(cidx, first);
                            j += 1;
                            continue;
                        }
                        // look for a replacement watch
                        let len = self.pool.len(cidx);
                        let mut replacement = None;
                        for k in 2..len {
                            let lk = self.pool.lit(cidx, k);
                            if self.lit_value(lk) != Value::False {
                                replacement = Some((k, lk));
                                break;
                            }
                        }
                        if let Some((k, lk)) = replacement {
                            self.pool.swap_lits(cidx, 1, k);
                            self.watches.add_long(lk, cidx, first);
                            // entry dropped from this vector
                            continue;
                        }
                        // unit or conflicting
                        ws[j] = w;
                        j += 1;
                        if self.lit_value(first) == Value::False {
                            conflict = Some(Conflict::Long(cidx));
                            break 'entries;
                        }
                        self.assign(first, Antecedent::Clause(cidx));
                    }
                }
            }
            if conflict.is_some() {
                // keep the unvisited tail
                while i < ws.len() {
                    ws[j] = ws[i];
                    i += 1;
                    j += 1;
                }
            }
            ws.truncate(j);
            self.watches.put_list(false_lit, ws);
            if conflict.is_some() {
                return conflict;
            }
        }
        None
    }

    // ------------------------------------------------------------------
    // Backtracking
    // ------------------------------------------------------------------

    /// Pop the trail down to `back_level`. Unassigned variables keep their
    /// last polarity as the preferred one and rejoin the heap.
    pub(crate) fn backtrack(&mut self, back_level: u32) {
        debug_assert!(back_level <= self.decision_level);
        if back_level == self.decision_level {
            return;
        }
        let start = self.trail.level_index[(back_level + 1) as usize] as usize;
        for i in start..self.trail.lits.len() {
            let l = self.trail.lits[i];
            let x = l.variable();
            self.value[l.index()] = Value::UndefTrue;
            self.value[l.negated().index()] = Value::UndefFalse;
            self.ante[x.index()] = Antecedent::None;
            self.heap.insert(x);
        }
        self.trail.lits.truncate(start);
        self.trail.level_index.truncate((back_level + 1) as usize);
        self.trail.prop_ptr = start.min(self.trail.prop_ptr);
        self.decision_level = back_level;
    }

    // ------------------------------------------------------------------
    // Decisions
    // ------------------------------------------------------------------

    /// Pick and assign a decision literal. Returns false when every active
    /// variable is assigned (the formula is satisfied).
    fn decide(&mut self) -> bool {
        if self.nvars > 1 && self.params.randomness > 0.0 {
            let draw: f32 = self.rng.gen();
            if draw < self.params.randomness {
                let x = Variable(self.rng.gen_range(1..self.nvars));
                if self.var_is_active(x) {
                    self.stats.random_decisions += 1;
                    self.make_decision(x);
                    return true;
                }
            }
        }
        while let Some(x) = self.heap.pop() {
            if self.var_is_active(x) {
                self.make_decision(x);
                return true;
            }
        }
        false
    }

    fn make_decision(&mut self, x: Variable) {
        self.stats.decisions += 1;
        let pos = Literal::positive(x);
        let l = if self.value[pos.index()] == Value::UndefTrue {
            pos
        } else {
            pos.negated()
        };
        self.decision_level += 1;
        self.trail.level_index.push(self.trail.lits.len() as u32);
        self.assign(l, Antecedent::Decision);
        if self.decision_level > self.stats.max_depth {
            self.stats.max_depth = self.decision_level;
        }
    }

    // ------------------------------------------------------------------
    // Conflict analysis (first-UIP)
    // ------------------------------------------------------------------

    /// Process literal `l` during resolution: mark it, bump its activity,
    /// collect it in the learned-clause buffer if below the conflict level.
    /// Returns 1 if `l` still has to be resolved (it is at the conflict
    /// level).
    fn process_literal(&mut self, l: Literal) -> u32 {
        let x = l.variable();
        debug_assert_eq!(self.lit_value(l), Value::False);
        let lvl = self.level[x.index()];
        if !self.analyzer.is_marked(x) && lvl > 0 {
            self.analyzer.mark(x);
            self.heap.bump(x);
            if lvl < self.decision_level {
                self.analyzer.buffer.push(l);
                return 0;
            }
            return 1;
        }
        0
    }

    /// Analyze a conflict, learn the first-UIP clause, backtrack and assert
    /// the learned literal.
    fn resolve_conflict(&mut self, conflict: Conflict) {
        debug_assert!(self.decision_level > 0);
        debug_assert!(self.analyzer.buffer.is_empty());

        let mut unresolved = match conflict {
            Conflict::Binary(a, b) => self.process_literal(a) + self.process_literal(b),
            Conflict::Long(cidx) => {
                self.bump_clause_activity(cidx);
                let n = self.pool.len(cidx);
                let mut u = 0;
                for k in 0..n {
                    let l = self.pool.lit(cidx, k);
                    u += self.process_literal(l);
                }
                u
            }
        };
        debug_assert!(unresolved >= 1);

        // walk the trail backwards resolving conflict-level literals until
        // only the first UIP remains
        let mut i = self.trail.lits.len();
        let uip = loop {
            let l = loop {
                i -= 1;
                let l = self.trail.lits[i];
                if self.analyzer.is_marked(l.variable()) {
                    break l;
                }
            };
            if unresolved == 1 {
                break l;
            }
            self.analyzer.unmark(l.variable());
            unresolved -= 1;
            match self.ante[l.variable().index()] {
                Antecedent::Binary(other) => {
                    unresolved += self.process_literal(other);
                }
                Antecedent::Clause(cidx) => {
                    debug_assert_eq!(self.pool.lit(cidx, 0), l);
                    self.bump_clause_activity(cidx);
                    let n = self.pool.len(cidx);
                    for k in 1..n {
                        let lk = self.pool.lit(cidx, k);
                        unresolved += self.process_literal(lk);
                    }
                }
                other => unreachable!("resolving a literal with antecedent {other:?}"),
            }
        };

        self.minimize_learned();

        // take the buffer; marks of its variables stay set until emission
        let mut body = std::mem::take(&mut self.analyzer.buffer);
        let levels: Vec<u32> = std::iter::once(self.decision_level)
            .chain(body.iter().map(|l| self.level[l.variable().index()]))
            .collect();
        let lbd = self.analyzer.count_levels(levels);
        debug_assert!(1 <= lbd && lbd as usize <= body.len() + 1);
        self.update_emas(lbd);

        let back_level = body
            .iter()
            .map(|l| self.level[l.variable().index()])
            .max()
            .unwrap_or(0);
        self.backtrack(back_level);

        let not_uip = uip.negated();
        self.stats.learned_clauses += 1;
        self.stats.learned_literals += body.len() as u64 + 1;
        match body.len() {
            0 => {
                debug_assert_eq!(self.decision_level, 0);
                self.assign(not_uip, Antecedent::Unit);
                self.stats.unit_literals += 1;
            }
            1 => {
                self.add_binary_clause(not_uip, body[0]);
                self.assign(not_uip, Antecedent::Binary(body[0]));
            }
            _ => {
                // position 1 must hold a literal of the backtrack level so
                // both watches behave after the jump
                let k = body
                    .iter()
                    .position(|l| self.level[l.variable().index()] == back_level)
                    .expect("backtrack level comes from the body");
                body.swap(0, k);
                let mut clause = Vec::with_capacity(body.len() + 1);
                clause.push(not_uip);
                clause.extend_from_slice(&body);
                let cidx = self.pool.add_learned_clause(&clause);
                self.pool.set_activity(cidx, self.cla_inc);
                self.watches.add_long(clause[0], cidx, clause[1]);
                self.watches.add_long(clause[1], cidx, clause[0]);
                self.assign(not_uip, Antecedent::Clause(cidx));
            }
        }

        // clear the marks of the learned clause
        self.analyzer.unmark(uip.variable());
        for &l in &body {
            self.analyzer.unmark(l.variable());
        }
        body.clear();
        self.analyzer.buffer = body;
        self.analyzer.clear_cache();

        self.heap.decay();
        self.cla_inc *= 1.0 / self.params.clause_decay;
    }

    /// Remove buffer literals recursively implied by the rest of the learned
    /// clause (and level-0 units), using the analyzer's ternary cache.
    fn minimize_learned(&mut self) {
        let mut j = 0;
        for i in 0..self.analyzer.buffer.len() {
            let l = self.analyzer.buffer[i];
            if self.literal_is_redundant(l) {
                // keep it usable as a justification for later checks
                self.analyzer.cache_verdict(l.variable(), Implied::Yes);
            } else {
                self.analyzer.buffer[j] = l;
                j += 1;
            }
        }
        self.analyzer.buffer.truncate(j);
    }

    /// Whether `l`'s assignment is implied by the other marked literals of
    /// the learned clause, recursively through the implication graph.
    fn literal_is_redundant(&mut self, l: Literal) -> bool {
        match self.ante[l.variable().index()] {
            Antecedent::Decision => return false,
            Antecedent::Unit => return true,
            _ => {}
        }
        // iterative DFS; a frame is (variable, index of next predecessor)
        let mut stack: Vec<(Variable, u32)> = vec![(l.variable(), 0)];
        while let Some(&(x, idx)) = stack.last() {
            let pred = match self.ante[x.index()] {
                Antecedent::Binary(other) => {
                    if idx == 0 {
                        Some(other)
                    } else {
                        None
                    }
                }
                Antecedent::Clause(cidx) => {
                    let n = self.pool.len(cidx);
                    if idx + 1 < n {
                        Some(self.pool.lit(cidx, idx + 1))
                    } else {
                        None
                    }
                }
                other => unreachable!("minimizing through antecedent {other:?}"),
            };
            let Some(p) = pred else {
                // all predecessors implied
                stack.pop();
                self.analyzer.cache_verdict(x, Implied::Yes);
                continue;
            };
            stack.last_mut().expect("stack is nonempty").1 += 1;

            let px = p.variable();
            if self.level[px.index()] == 0
                || self.analyzer.is_marked(px)
                || self.analyzer.cached(px) == Implied::Yes
            {
                continue;
            }
            if self.analyzer.cached(px) == Implied::No
                || matches!(self.ante[px.index()], Antecedent::Decision | Antecedent::Unit)
            {
                // Unit can only appear here for a level-0 literal, which was
                // already handled; a decision predecessor poisons the chain.
                for (v, _) in stack.drain(..) {
                    self.analyzer.cache_verdict(v, Implied::No);
                }
                self.analyzer.cache_verdict(px, Implied::No);
                return false;
            }
            stack.push((px, 0));
        }
        true
    }

    // ------------------------------------------------------------------
    // Restart heuristics
    // ------------------------------------------------------------------

    /// Update the fixed-point moving averages after learning a clause of
    /// the given LBD. The slow average has window 2^16, the fast 2^5; both
    /// keep the sample scaled so that `ema >> 32` is the integer average.
    fn update_emas(&mut self, lbd: u32) {
        self.slow_ema -= self.slow_ema >> 16;
        self.slow_ema += (lbd as u64) << 16;
        self.fast_ema -= self.fast_ema >> 5;
        self.fast_ema += (lbd as u64) << 27;
        self.level_ema -= self.level_ema >> 16;
        self.level_ema += (self.decision_level as u64) << 16;
    }

    /// Recent learned clauses worse than the long-run average by the 0.90625
    /// margin, enough conflicts since the last restart, and a decision level
    /// at least the fast average.
    fn need_restart(&self) -> bool {
        if self.stats.conflicts >= self.restart_next
            && self.decision_level >= (self.fast_ema >> 32) as u32
        {
            let scaled = self.fast_ema - (self.fast_ema >> 4) - (self.fast_ema >> 5);
            if scaled >= self.slow_ema {
                return true;
            }
        }
        false
    }

    fn done_restart(&mut self) {
        self.restart_next = self.stats.conflicts + self.params.restart_interval;
    }

    /// Whether every variable assigned at level `k` has activity below `ax`.
    fn level_has_lower_activity(&self, ax: f64, k: u32) -> bool {
        let start = self.trail.level_index[k as usize] as usize;
        let end = if k < self.decision_level {
            self.trail.level_index[(k + 1) as usize] as usize
        } else {
            self.trail.lits.len()
        };
        self.trail.lits[start..end]
            .iter()
            .all(|l| self.heap.activity(l.variable()) < ax)
    }

    /// Partial restart: keep the decision levels that still hold a variable
    /// at least as active as the best unassigned one.
    fn partial_restart(&mut self) {
        self.stats.restarts += 1;
        if self.decision_level == 0 {
            return;
        }
        while let Some(x) = self.heap.peek() {
            if self.var_is_active(x) {
                break;
            }
            self.heap.pop();
        }
        match self.heap.peek() {
            None => self.backtrack(0),
            Some(top) => {
                let ax = self.heap.activity(top);
                for k in 1..=self.decision_level {
                    if self.level_has_lower_activity(ax, k) {
                        self.backtrack(k - 1);
                        break;
                    }
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Learned-clause activities and reduction
    // ------------------------------------------------------------------

    fn bump_clause_activity(&mut self, cidx: ClauseRef) {
        if !self.pool.is_learned(cidx) {
            return;
        }
        let mut act = self.pool.activity(cidx) + self.cla_inc;
        if act > CLAUSE_ACTIVITY_THRESHOLD {
            self.pool
                .rescale_learned_activities(INV_CLAUSE_ACTIVITY_THRESHOLD);
            self.cla_inc *= INV_CLAUSE_ACTIVITY_THRESHOLD;
            act = self.pool.activity(cidx) + self.cla_inc;
        }
        self.pool.set_activity(cidx, act);
    }

    fn need_reduce(&self) -> bool {
        self.stats.conflicts >= self.reduce_next
    }

    fn done_reduce(&mut self) {
        self.reduce_inc += self.reduce_inc2;
        self.reduce_next = self.stats.conflicts + self.reduce_inc;
        if self.reduce_inc2 > 0 {
            self.reduce_inc2 -= 1;
        }
    }

    /// Antecedent of an assigned variable; such a clause must survive.
    fn clause_is_locked(&self, cidx: ClauseRef) -> bool {
        let x = self.pool.first_literal(cidx).variable();
        self.var_is_assigned(x)
            && matches!(self.ante[x.index()], Antecedent::Clause(c) if c == cidx)
    }

    /// Short or low-LBD clauses are kept regardless of activity.
    fn clause_is_precious(&mut self, cidx: ClauseRef) -> bool {
        let k = self.params.keep_lbd;
        let n = self.pool.len(cidx);
        if n <= k {
            return true;
        }
        let levels: Vec<u32> = self
            .pool
            .literals(cidx)
            .iter()
            .map(|l| self.level[l.variable().index()])
            .collect();
        self.analyzer.count_levels(levels) <= k
    }

    /// Delete the least active deletable learned clauses and compact the
    /// learned region.
    fn reduce_learned_clauses(&mut self) {
        let learned: Vec<ClauseRef> = self.pool.iter_learned().collect();
        let mut candidates: Vec<ClauseRef> = Vec::with_capacity(learned.len());
        for cidx in learned {
            if !self.clause_is_locked(cidx) && !self.clause_is_precious(cidx) {
                candidates.push(cidx);
            }
        }
        candidates.sort_by(|a, b| {
            self.pool
                .activity(*a)
                .total_cmp(&self.pool.activity(*b))
                .then(a.0.cmp(&b.0))
        });
        let n0 = (self.params.reduce_fraction as usize) * (candidates.len() / 32);
        for &cidx in &candidates[..n0] {
            self.pool.delete(cidx);
            self.stats.learned_deleted += 1;
        }
        log::debug!(
            "reduce: deleted {} of {} candidates, {} learned clauses left",
            n0,
            candidates.len(),
            self.pool.num_learned_clauses()
        );
        self.collect_garbage(self.pool.learned_base());
        self.stats.reduce_calls += 1;
        self.done_reduce();
        self.report("red");
    }

    // ------------------------------------------------------------------
    // Garbage collection
    // ------------------------------------------------------------------

    /// Compact the pool from `base`, rewriting watch vectors and clause
    /// antecedents. `base` is 0 for a full collection or the learned-region
    /// base after a reduction.
    pub(crate) fn collect_garbage(&mut self, base: u32) {
        self.watches.remove_long_ge(base);
        // antecedent clauses must be traced through the move
        for &l in &self.trail.lits {
            if let Antecedent::Clause(c) = self.ante[l.variable().index()] {
                if c.0 >= base {
                    self.pool.mark(c);
                }
            }
        }
        let moved = self.pool.compact(base);
        for (old, new) in moved {
            let x = self.pool.first_literal(new).variable();
            debug_assert!(matches!(self.ante[x.index()], Antecedent::Clause(c) if c == old));
            self.ante[x.index()] = Antecedent::Clause(new);
        }
        // rebuild the watches of every clause in the compacted region
        let rebuilt: Vec<ClauseRef> = self.pool.iter_from(base).collect();
        for cidx in rebuilt {
            let l0 = self.pool.first_literal(cidx);
            let l1 = self.pool.second_literal(cidx);
            self.watches.add_long(l0, cidx, l1);
            self.watches.add_long(l1, cidx, l0);
        }
        self.stats.gc_calls += 1;
        self.debug_check_search_state();
    }

    // ------------------------------------------------------------------
    // Level-0 simplification
    // ------------------------------------------------------------------

    /// Literals assigned at level 0.
    fn level0_literals(&self) -> u32 {
        if self.decision_level > 0 {
            self.trail.level_index[1]
        } else {
            self.trail.lits.len() as u32
        }
    }

    fn need_simplify(&self) -> bool {
        (self.level0_literals() > self.simplify_assigned
            || self.binaries > self.simplify_binaries + self.params.simplify_bin_delta)
            && self.stats.conflicts >= self.simplify_next
    }

    fn done_simplify(&mut self) {
        // binaries produced this round have not been seen by SCC yet
        self.simplify_binaries = self.binaries.saturating_sub(self.simplify_new_bins);
        self.simplify_assigned = self.trail.lits.len() as u32;
        self.simplify_next = self.stats.conflicts + self.params.simplify_interval;
    }

    /// Level-0 simplification: SCC substitution over the binary implication
    /// graph, then removal of satisfied clauses and false literals.
    fn simplify(&mut self) {
        debug_assert_eq!(self.decision_level, 0);
        debug_assert_eq!(self.trail.prop_ptr, self.trail.lits.len());
        self.simplify_new_bins = 0;
        self.scc_substitution();
        if self.has_empty_clause {
            return;
        }
        // the substitution may have produced fresh level-0 units
        if self.propagate().is_some() {
            self.has_empty_clause = true;
            return;
        }
        self.simplify_clause_database();
        self.stats.simplify_calls += 1;
        self.done_simplify();
        #[cfg(debug_assertions)]
        if let Err(e) = self.check_level0_clean() {
            panic!("level-0 cleanliness: {e}");
        }
        self.report("simp");
    }

    /// Remove true binary entries and level-0-satisfied clauses; strip false
    /// literals; promote two-literal remainders to inline binaries.
    fn simplify_clause_database(&mut self) {
        // binary entries: lists of assigned literals go away entirely (the
        // clause is true or its partner propagated); surviving lists drop
        // entries whose partner is assigned (necessarily true)
        for idx in 0..self.watches.num_lists() {
            let l = Literal::from_index(idx);
            if self.value[idx].is_assigned() {
                self.watches.list_mut(l).clear();
            } else {
                let values = &self.value;
                self.watches.list_mut(l).retain(|w| match w {
                    Watch::Binary(other) => !values[other.index()].is_assigned(),
                    Watch::Long(..) => true,
                });
            }
        }

        let handles: Vec<ClauseRef> = self.pool.iter().collect();
        let mut deleted = 0u64;
        for cidx in handles {
            if self.simplify_clause(cidx) {
                deleted += 1;
            }
        }
        self.stats.problem_clauses_deleted += deleted;

        // antecedents of level-0 literals may be deleted clauses; they are
        // permanent facts now
        for &l in &self.trail.lits {
            self.ante[l.variable().index()] = Antecedent::Unit;
        }

        self.collect_garbage(0);
        self.binaries = self.watches.count_binaries();
    }

    /// Simplify one clause against the level-0 assignment. Returns true if
    /// the clause was deleted.
    fn simplify_clause(&mut self, cidx: ClauseRef) -> bool {
        let n = self.pool.len(cidx);
        let mut j = 0u32;
        for i in 0..n {
            let l = self.pool.lit(cidx, i);
            match self.lit_value(l) {
                Value::True => {
                    self.pool.delete(cidx);
                    return true;
                }
                Value::False => {}
                _ => {
                    if j < i {
                        self.pool.set_lit(cidx, j, l);
                    }
                    j += 1;
                }
            }
        }
        debug_assert!(j >= 2, "propagation left a unit or empty clause");
        if j == 2 {
            let a = self.pool.lit(cidx, 0);
            let b = self.pool.lit(cidx, 1);
            self.add_binary_clause(a, b);
            self.simplify_new_bins += 1;
            self.pool.delete(cidx);
            return true;
        }
        if j < n {
            self.pool.shrink(cidx, j);
        }
        false
    }

    // ------------------------------------------------------------------
    // Solving
    // ------------------------------------------------------------------

    /// Limit the search to `n` more conflicts; `solve` returns
    /// [`Status::Unknown`] once the limit is hit and can be called again
    /// after raising the budget.
    pub fn set_conflict_budget(&mut self, n: u64) {
        self.conflict_budget = self.stats.conflicts.saturating_add(n);
    }

    /// Remove the conflict budget.
    pub fn clear_conflict_budget(&mut self) {
        self.conflict_budget = u64::MAX;
    }

    fn init_schedulers(&mut self) {
        self.slow_ema = 0;
        self.fast_ema = 0;
        self.level_ema = 0;
        self.restart_next = self.params.restart_interval;
        self.reduce_next = self.params.reduce_interval;
        self.reduce_inc = self.params.reduce_interval;
        self.reduce_inc2 = self.params.reduce_delta;
        self.simplify_assigned = 0;
        self.simplify_binaries = 0;
        self.simplify_next = 0;
        self.cla_inc = 1.0;
    }

    /// Solve the current clause set.
    ///
    /// Returns an error only when called after `Unsat` without `reset`.
    /// A `Sat` answer leaves a total assignment readable through
    /// [`value`](Self::value), extended over eliminated variables.
    pub fn solve(&mut self) -> Result<Status, SolverError> {
        match self.state {
            State::Unsat => {
                return Err(SolverError::InvalidState { operation: "solve" });
            }
            State::Sat => return Ok(Status::Sat),
            _ => {}
        }
        if self.has_empty_clause {
            self.state = State::Unsat;
            return Ok(Status::Unsat);
        }

        if !self.search_started {
            self.search_started = true;
            self.init_schedulers();
            if self.preprocess {
                self.preprocess_formula();
                if self.has_empty_clause {
                    self.state = State::Unsat;
                    return Ok(Status::Unsat);
                }
            }
            self.preprocessed = true;
            self.debug_check_search_state();
            self.report_header();
        }

        loop {
            if let Some(conflict) = self.propagate() {
                if self.decision_level == 0 {
                    self.state = State::Unsat;
                    self.report("unsat");
                    return Ok(Status::Unsat);
                }
                self.stats.conflicts += 1;
                self.resolve_conflict(conflict);
                if self.need_reduce() {
                    self.reduce_learned_clauses();
                }
                if self.stats.conflicts >= self.conflict_budget {
                    self.state = State::Unknown;
                    return Ok(Status::Unknown);
                }
            } else if self.need_restart() {
                if self.need_simplify() {
                    self.backtrack(0);
                    self.stats.restarts += 1;
                    if self.propagate().is_some() {
                        self.state = State::Unsat;
                        return Ok(Status::Unsat);
                    }
                    self.simplify();
                    if self.has_empty_clause {
                        self.state = State::Unsat;
                        return Ok(Status::Unsat);
                    }
                } else {
                    self.partial_restart();
                }
                self.done_restart();
            } else if self.decision_level == 0 && self.need_simplify() {
                self.simplify();
                if self.has_empty_clause {
                    self.state = State::Unsat;
                    return Ok(Status::Unsat);
                }
            } else if !self.decide() {
                self.extend_assignment();
                self.state = State::Sat;
                self.report("sat");
                return Ok(Status::Sat);
            }
        }
    }

    /// Return the solver to its freshly-created state, keeping the variable
    /// set and parameters. Required between an `Unsat` answer and further
    /// use.
    pub fn reset(&mut self) {
        self.pool.reset();
        self.watches.clear_all();
        for x in 1..self.nvars {
            let pos = Literal::positive(Variable(x)).index();
            self.value[pos] = Value::UndefFalse;
            self.value[pos + 1] = Value::UndefTrue;
            self.ante[x as usize] = Antecedent::None;
            self.level[x as usize] = 0;
        }
        self.heap.reset();
        for x in 1..self.nvars {
            self.heap.insert(Variable(x));
        }
        self.trail.reset();
        self.decision_level = 0;
        self.binaries = 0;
        self.has_empty_clause = false;
        self.state = State::Ready;
        self.search_started = false;
        self.preprocessed = false;
        for o in &mut self.occ {
            *o = 0;
        }
        self.occ_lists.clear_all();
        self.lqueue.clear();
        self.cqueue.clear();
        self.scan_index = 0;
        self.elim.reset();
        self.log.clear();
        self.analyzer.clear();
        self.stats = Stats::default();
        self.conflict_budget = u64::MAX;
        self.rng = SmallRng::seed_from_u64(self.params.random_seed);
        self.report_lines = 0;
        self.init_schedulers();
    }

    // ------------------------------------------------------------------
    // Parameters
    // ------------------------------------------------------------------

    /// Set the variable activity decay factor, in (0, 1).
    pub fn set_var_decay(&mut self, d: f64) -> Result<(), SolverError> {
        if !(0.0 < d && d < 1.0) {
            return Err(SolverError::ParameterOutOfRange {
                name: "var_decay",
                value: d,
            });
        }
        self.params.var_decay = d;
        self.heap.set_decay(d);
        Ok(())
    }

    /// Set the learned-clause activity decay factor, in (0, 1).
    pub fn set_clause_decay(&mut self, d: f32) -> Result<(), SolverError> {
        if !(0.0 < d && d < 1.0) {
            return Err(SolverError::ParameterOutOfRange {
                name: "clause_decay",
                value: d as f64,
            });
        }
        self.params.clause_decay = d;
        Ok(())
    }

    /// Set the random-decision probability, in [0, 1].
    pub fn set_randomness(&mut self, r: f32) -> Result<(), SolverError> {
        if !(0.0..=1.0).contains(&r) {
            return Err(SolverError::ParameterOutOfRange {
                name: "randomness",
                value: r as f64,
            });
        }
        self.params.randomness = r;
        Ok(())
    }

    /// Reseed the decision RNG.
    pub fn set_random_seed(&mut self, seed: u64) {
        self.params.random_seed = seed;
        self.rng = SmallRng::seed_from_u64(seed);
    }

    /// Learned clauses with LBD at or below this survive every reduction.
    pub fn set_keep_lbd(&mut self, k: u32) {
        self.params.keep_lbd = k;
    }

    /// Fraction (out of 32) of deletion candidates removed per reduction.
    pub fn set_reduce_fraction(&mut self, f: u32) -> Result<(), SolverError> {
        if f > 32 {
            return Err(SolverError::ParameterOutOfRange {
                name: "reduce_fraction",
                value: f as f64,
            });
        }
        self.params.reduce_fraction = f;
        Ok(())
    }

    /// Conflicts before the first reduction (and base of the schedule).
    pub fn set_reduce_interval(&mut self, n: u64) -> Result<(), SolverError> {
        if n == 0 {
            return Err(SolverError::ParameterOutOfRange {
                name: "reduce_interval",
                value: 0.0,
            });
        }
        self.params.reduce_interval = n;
        Ok(())
    }

    /// Second-order increment of the reduction schedule.
    pub fn set_reduce_delta(&mut self, n: u64) {
        self.params.reduce_delta = n;
    }

    /// Minimal number of conflicts between restarts.
    pub fn set_restart_interval(&mut self, n: u64) -> Result<(), SolverError> {
        if n == 0 {
            return Err(SolverError::ParameterOutOfRange {
                name: "restart_interval",
                value: 0.0,
            });
        }
        self.params.restart_interval = n;
        Ok(())
    }

    /// Conflicts between level-0 simplifications.
    pub fn set_simplify_interval(&mut self, n: u64) -> Result<(), SolverError> {
        if n == 0 {
            return Err(SolverError::ParameterOutOfRange {
                name: "simplify_interval",
                value: 0.0,
            });
        }
        self.params.simplify_interval = n;
        Ok(())
    }

    /// New binary clauses required to trigger a simplification.
    pub fn set_simplify_bin_delta(&mut self, n: u32) {
        self.params.simplify_bin_delta = n;
    }

    /// Skip elimination of variables with this many occurrences of both
    /// polarities.
    pub fn set_var_elim_skip(&mut self, n: u32) {
        self.params.var_elim_skip = n;
    }

    /// Skip subsumption when the key literal occurs more often than this.
    pub fn set_subsume_skip(&mut self, n: u32) {
        self.params.subsume_skip = n;
    }

    /// Largest resolvent variable elimination may produce.
    pub fn set_res_clause_limit(&mut self, n: u32) {
        self.params.res_clause_limit = n;
    }

    /// Diagnostic verbosity (0 = silent; >= 2 prints per-round statistics).
    pub fn set_verbosity(&mut self, v: u32) {
        self.params.verbosity = v;
    }

    /// Redirect diagnostic output (default: stderr).
    pub fn set_diagnostic_output(&mut self, w: Box<dyn Write + Send>) {
        self.diag = Some(w);
    }

    // ------------------------------------------------------------------
    // Reporting
    // ------------------------------------------------------------------

    fn active_vars(&self) -> u32 {
        (1..self.nvars)
            .filter(|&x| self.var_is_active(Variable(x)))
            .count() as u32
    }

    fn report_header(&mut self) {
        if self.params.verbosity < 2 {
            return;
        }
        self.write_diag(
            "c\nc        conflicts restarts    lbd  depth |    vars     bins  clauses |  learned lits/cls\n",
        );
    }

    fn report(&mut self, tag: &str) {
        if self.params.verbosity < 2 {
            return;
        }
        if self.report_lines % 20 == 19 {
            self.report_header();
        }
        self.report_lines += 1;
        let lbd = (self.slow_ema as f64) / 4.3e9;
        let depth = (self.level_ema as f64) / 4.3e9;
        let learned = self.pool.num_learned_clauses();
        let lits_per_clause = if learned > 0 {
            self.pool.num_learned_literals() as f64 / learned as f64
        } else {
            0.0
        };
        let line = format!(
            "c {:>5} {:>9} {:>8} {:>6.1} {:>6.1} | {:>7} {:>8} {:>8} | {:>8} {:>8.1}\n",
            tag,
            self.stats.conflicts,
            self.stats.restarts,
            lbd,
            depth,
            self.active_vars(),
            self.binaries,
            self.pool.num_problem_clauses(),
            learned,
            lits_per_clause,
        );
        self.write_diag(&line);
    }

    fn write_diag(&mut self, s: &str) {
        match &mut self.diag {
            Some(w) => {
                let _ = w.write_all(s.as_bytes());
            }
            None => eprint!("{s}"),
        }
    }
}

impl std::fmt::Debug for Solver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Solver")
            .field("nvars", &self.nvars)
            .field("binaries", &self.binaries)
            .field("problem_clauses", &self.pool.num_problem_clauses())
            .field("learned_clauses", &self.pool.num_learned_clauses())
            .field("decision_level", &self.decision_level)
            .field("conflicts", &self.stats.conflicts)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(v: u32, pos: bool) -> Literal {
        if pos {
            Literal::positive(Variable(v))
        } else {
            Literal::negative(Variable(v))
        }
    }

    fn solver_with_vars(n: u32) -> Solver {
        let mut s = Solver::new(n as usize + 1, false);
        s.add_vars(n);
        s
    }

    #[test]
    fn test_empty_formula_is_sat() {
        let mut s = solver_with_vars(3);
        assert_eq!(s.solve(), Ok(Status::Sat));
    }

    #[test]
    fn test_empty_clause_is_unsat() {
        let mut s = solver_with_vars(2);
        s.add_clause(&[]).unwrap();
        assert_eq!(s.solve(), Ok(Status::Unsat));
    }

    #[test]
    fn test_unit_propagation_chain() {
        let mut s = solver_with_vars(4);
        s.add_clause(&[lit(1, true)]).unwrap();
        s.add_clause(&[lit(1, false), lit(2, true)]).unwrap();
        s.add_clause(&[lit(2, false), lit(3, true)]).unwrap();
        s.add_clause(&[lit(3, false), lit(4, true)]).unwrap();

        assert_eq!(s.solve(), Ok(Status::Sat));
        for v in 1..=4 {
            assert_eq!(s.value(Variable(v)), Value::True);
        }
    }

    #[test]
    fn test_simple_unsat() {
        let mut s = solver_with_vars(2);
        s.add_clause(&[lit(1, true), lit(2, true)]).unwrap();
        s.add_clause(&[lit(1, true), lit(2, false)]).unwrap();
        s.add_clause(&[lit(1, false), lit(2, true)]).unwrap();
        s.add_clause(&[lit(1, false), lit(2, false)]).unwrap();
        assert_eq!(s.solve(), Ok(Status::Unsat));
    }

    #[test]
    fn test_solve_after_unsat_errors() {
        let mut s = solver_with_vars(1);
        s.add_clause(&[lit(1, true)]).unwrap();
        s.add_clause(&[lit(1, false)]).unwrap();
        assert_eq!(s.solve(), Ok(Status::Unsat));
        assert!(matches!(s.solve(), Err(SolverError::InvalidState { .. })));
        s.reset();
        s.add_clause(&[lit(1, true)]).unwrap();
        assert_eq!(s.solve(), Ok(Status::Sat));
        assert_eq!(s.value(Variable(1)), Value::True);
    }

    #[test]
    fn test_out_of_range_literal_rejected() {
        let mut s = solver_with_vars(2);
        let err = s.add_clause(&[lit(7, true)]).unwrap_err();
        assert!(matches!(err, SolverError::VariableOutOfRange { .. }));
    }

    #[test]
    fn test_tautology_and_duplicates_filtered() {
        let mut s = solver_with_vars(2);
        s.add_clause(&[lit(1, true), lit(1, false)]).unwrap();
        s.add_clause(&[lit(1, true), lit(1, true), lit(2, true)]).unwrap();
        assert_eq!(s.num_binary_clauses(), 1);
        assert_eq!(s.num_problem_clauses(), 0);
        assert_eq!(s.solve(), Ok(Status::Sat));
    }

    #[test]
    fn test_true_constant_satisfies_clause() {
        let mut s = solver_with_vars(1);
        s.add_clause(&[Literal::TRUE, lit(1, false)]).unwrap();
        // clause dropped: nothing constrains variable 1
        assert_eq!(s.num_binary_clauses(), 0);
        s.add_clause(&[Literal::FALSE, lit(1, true)]).unwrap();
        // false constant removed: unit clause on variable 1
        assert_eq!(s.solve(), Ok(Status::Sat));
        assert_eq!(s.value(Variable(1)), Value::True);
    }

    #[test]
    fn test_pigeonhole_3_into_2() {
        // pigeons i in 1..=3, holes j in 1..=2; var p_ij = 2*(i-1)+j
        let mut s = solver_with_vars(6);
        let p = |i: u32, j: u32| lit(2 * (i - 1) + j, true);
        let np = |i: u32, j: u32| lit(2 * (i - 1) + j, false);
        for i in 1..=3 {
            s.add_clause(&[p(i, 1), p(i, 2)]).unwrap();
        }
        for j in 1..=2 {
            for i1 in 1..=3 {
                for i2 in (i1 + 1)..=3 {
                    s.add_clause(&[np(i1, j), np(i2, j)]).unwrap();
                }
            }
        }
        assert_eq!(s.solve(), Ok(Status::Unsat));
    }

    #[test]
    fn test_conflict_budget_unknown_then_resume() {
        // a formula that needs at least one conflict
        let mut s = solver_with_vars(8);
        for a in [true, false] {
            for b in [true, false] {
                s.add_clause(&[lit(1, a), lit(2, b), lit(3, true)]).unwrap();
                s.add_clause(&[lit(4, a), lit(5, b), lit(3, false)]).unwrap();
            }
        }
        s.set_conflict_budget(0);
        // budget of zero conflicts: any conflict ends the call
        let first = s.solve().unwrap();
        s.clear_conflict_budget();
        let second = s.solve().unwrap();
        assert_eq!(second, Status::Sat);
        let _ = first;
    }

    #[test]
    fn test_parameter_validation() {
        let mut s = solver_with_vars(1);
        assert!(s.set_var_decay(0.0).is_err());
        assert!(s.set_var_decay(1.0).is_err());
        assert!(s.set_var_decay(0.9).is_ok());
        assert!(s.set_randomness(1.5).is_err());
        assert!(s.set_randomness(0.0).is_ok());
        assert!(s.set_reduce_fraction(33).is_err());
        assert!(s.set_reduce_fraction(32).is_ok());
        assert!(s.set_restart_interval(0).is_err());
    }

    #[test]
    fn test_status_independent_of_clause_order() {
        let clauses: Vec<Vec<Literal>> = vec![
            vec![lit(1, true), lit(2, true)],
            vec![lit(1, false), lit(3, true)],
            vec![lit(2, false), lit(3, false)],
            vec![lit(3, true), lit(1, true)],
        ];
        let solve_in_order = |order: &[usize]| {
            let mut s = solver_with_vars(3);
            for &i in order {
                s.add_clause(&clauses[i]).unwrap();
            }
            s.solve().unwrap()
        };
        let a = solve_in_order(&[0, 1, 2, 3]);
        let b = solve_in_order(&[3, 2, 1, 0]);
        let c = solve_in_order(&[2, 0, 3, 1]);
        assert_eq!(a, b);
        assert_eq!(b, c);
    }

    #[test]
    fn test_model_satisfies_all_clauses() {
        // a formula with enough structure to force conflicts and learning
        let mut s = solver_with_vars(9);
        let mut clauses = Vec::new();
        for i in 1..=7u32 {
            let c = vec![
                lit(i, i % 2 == 0),
                lit(i % 9 + 1, i % 3 == 0),
                lit((i * 3) % 9 + 1, true),
            ];
            clauses.push(c);
        }
        clauses.push(vec![lit(1, true), lit(5, false)]);
        clauses.push(vec![lit(2, false), lit(6, true)]);
        for c in &clauses {
            s.add_clause(c).unwrap();
        }
        assert_eq!(s.solve(), Ok(Status::Sat));
        for c in &clauses {
            assert!(
                c.iter().any(|&l| s.lit_value(l) == Value::True),
                "clause {c:?} not satisfied"
            );
        }
    }
}
