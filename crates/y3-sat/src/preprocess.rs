//! Inprocessing preprocessor
//!
//! Runs before search when the solver was created with preprocessing on.
//! During preprocessing every clause (binaries included) lives in the pool;
//! occurrence lists map each literal to the clauses containing it, and
//! `occ` holds exact per-literal occurrence counts. Occurrence lists are
//! pruned lazily: consumers skip entries whose clause died or no longer
//! contains the literal.
//!
//! The driver alternates pure/unit literal propagation, SCC equivalence
//! substitution, subsumption/strengthening, and bounded variable
//! elimination by resolution until a fixed point, then rebuilds the
//! two-watched-literal representation for search.

use crate::clause_db::ClauseRef;
use crate::literal::{Literal, Variable};
use crate::solver::{Antecedent, Solver};
use crate::value::Value;

/// Per-literal occurrence lists (preprocessing only).
#[derive(Debug, Default)]
pub(crate) struct OccurrenceLists {
    lists: Vec<Vec<ClauseRef>>,
}

impl OccurrenceLists {
    pub(crate) fn new(num_vars: usize) -> Self {
        OccurrenceLists {
            lists: vec![Vec::new(); num_vars * 2],
        }
    }

    pub(crate) fn ensure_num_vars(&mut self, num_vars: usize) {
        let target = num_vars * 2;
        if self.lists.len() < target {
            self.lists.resize_with(target, Vec::new);
        }
    }

    pub(crate) fn add_clause(&mut self, cidx: ClauseRef, lits: &[Literal]) {
        for &l in lits {
            self.lists[l.index()].push(cidx);
        }
    }

    pub(crate) fn push(&mut self, l: Literal, cidx: ClauseRef) {
        self.lists[l.index()].push(cidx);
    }

    #[inline]
    pub(crate) fn list(&self, l: Literal) -> &[ClauseRef] {
        &self.lists[l.index()]
    }

    pub(crate) fn take(&mut self, l: Literal) -> Vec<ClauseRef> {
        std::mem::take(&mut self.lists[l.index()])
    }

    /// Order-preserving removal of one entry.
    pub(crate) fn remove_entry(&mut self, l: Literal, cidx: ClauseRef) {
        let list = &mut self.lists[l.index()];
        if let Some(p) = list.iter().position(|&c| c == cidx) {
            list.remove(p);
        }
    }

    pub(crate) fn clear_all(&mut self) {
        for list in &mut self.lists {
            list.clear();
        }
    }
}

/// Min-heap of elimination candidates, ordered so that cheap variables
/// (at most one occurrence of some polarity) come first and the rest by
/// `occ(x) * occ(¬x)`.
#[derive(Debug, Default)]
pub(crate) struct ElimHeap {
    heap: Vec<u32>,
    pos: Vec<i32>,
}

fn elim_cost(occ: &[u32], x: u32) -> u64 {
    let p = occ[(2 * x) as usize] as u64;
    let n = occ[(2 * x + 1) as usize] as u64;
    p * n
}

fn elim_occs(occ: &[u32], x: u32) -> u64 {
    let p = occ[(2 * x) as usize] as u64;
    let n = occ[(2 * x + 1) as usize] as u64;
    p + n
}

/// Heuristic elimination order: cheap variables first, then by cost.
fn elim_lt(occ: &[u32], x: u32, y: u32) -> bool {
    let (cx, ox) = (elim_cost(occ, x), elim_occs(occ, x));
    let (cy, oy) = (elim_cost(occ, y), elim_occs(occ, y));
    if cx < ox && cy >= oy {
        return true;
    }
    if cy < oy && cx >= ox {
        return false;
    }
    cx < cy
}

impl ElimHeap {
    pub(crate) fn new(num_vars: usize) -> Self {
        ElimHeap {
            heap: Vec::new(),
            pos: vec![-1; num_vars],
        }
    }

    pub(crate) fn ensure_num_vars(&mut self, num_vars: usize) {
        if self.pos.len() < num_vars {
            self.pos.resize(num_vars, -1);
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub(crate) fn contains(&self, x: Variable) -> bool {
        self.pos[x.index()] >= 0
    }

    fn sift_up(&mut self, occ: &[u32], mut i: usize) {
        while i > 0 {
            let parent = (i - 1) / 2;
            if !elim_lt(occ, self.heap[i], self.heap[parent]) {
                break;
            }
            self.swap(i, parent);
            i = parent;
        }
    }

    fn sift_down(&mut self, occ: &[u32], mut i: usize) {
        loop {
            let left = 2 * i + 1;
            let right = left + 1;
            let mut best = i;
            if left < self.heap.len() && elim_lt(occ, self.heap[left], self.heap[best]) {
                best = left;
            }
            if right < self.heap.len() && elim_lt(occ, self.heap[right], self.heap[best]) {
                best = right;
            }
            if best == i {
                return;
            }
            self.swap(i, best);
            i = best;
        }
    }

    fn swap(&mut self, i: usize, j: usize) {
        self.heap.swap(i, j);
        self.pos[self.heap[i] as usize] = i as i32;
        self.pos[self.heap[j] as usize] = j as i32;
    }

    pub(crate) fn insert(&mut self, x: Variable, occ: &[u32]) {
        if self.contains(x) {
            return;
        }
        let i = self.heap.len();
        self.heap.push(x.0);
        self.pos[x.index()] = i as i32;
        self.sift_up(occ, i);
    }

    /// Reposition `x` after its occurrence counts changed.
    pub(crate) fn update(&mut self, x: Variable, occ: &[u32]) {
        let p = self.pos[x.index()];
        if p >= 0 {
            self.sift_up(occ, p as usize);
            let p = self.pos[x.index()];
            self.sift_down(occ, p as usize);
        }
    }

    pub(crate) fn remove(&mut self, x: Variable, occ: &[u32]) {
        let p = self.pos[x.index()];
        if p < 0 {
            return;
        }
        let p = p as usize;
        self.pos[x.index()] = -1;
        let last = self.heap.pop().expect("heap is nonempty");
        if p < self.heap.len() {
            self.heap[p] = last;
            self.pos[last as usize] = p as i32;
            self.sift_up(occ, p);
            let p = self.pos[last as usize] as usize;
            self.sift_down(occ, p);
        }
    }

    pub(crate) fn pop(&mut self, occ: &[u32]) -> Option<Variable> {
        let top = *self.heap.first()?;
        self.pos[top as usize] = -1;
        let last = self.heap.pop().expect("heap is nonempty");
        if !self.heap.is_empty() {
            self.heap[0] = last;
            self.pos[last as usize] = 0;
            self.sift_down(occ, 0);
        }
        Some(Variable(top))
    }

    pub(crate) fn reset(&mut self) {
        self.heap.clear();
        for p in &mut self.pos {
            *p = -1;
        }
    }
}

impl Solver {
    // ------------------------------------------------------------------
    // Pure/unit literal propagation
    // ------------------------------------------------------------------

    /// Force `l` true at level 0 and queue it for clause cleanup. Detects
    /// the empty clause when `l` is already false.
    pub(crate) fn pp_assign(&mut self, l: Literal, tag: Antecedent) {
        match self.lit_value(l) {
            Value::True => return,
            Value::False => {
                self.has_empty_clause = true;
                return;
            }
            _ => {}
        }
        debug_assert_eq!(self.decision_level, 0);
        self.assign(l, tag);
        if tag == Antecedent::Pure {
            self.stats.pure_literals += 1;
        } else {
            self.stats.unit_literals += 1;
        }
        self.lqueue.push_back(l);
    }

    fn pp_increment_occ(&mut self, l: Literal) {
        self.occ[l.index()] += 1;
        self.elim.update(l.variable(), &self.occ);
    }

    /// Decrement an occurrence count; a polarity dropping to zero makes the
    /// complementary literal pure, and shrinking counts can turn the
    /// variable into an elimination candidate.
    pub(crate) fn pp_decrement_occ(&mut self, l: Literal) {
        debug_assert!(self.occ[l.index()] > 0);
        self.occ[l.index()] -= 1;
        let x = l.variable();
        self.elim.update(x, &self.occ);
        if self.occ[l.index()] == 0
            && self.occ[l.negated().index()] > 0
            && self.var_is_active(x)
        {
            self.pp_assign(l.negated(), Antecedent::Pure);
        }
        if self.var_is_active(x) && self.pp_elim_candidate(x) {
            self.elim.insert(x, &self.occ);
        }
    }

    /// Delete a clause and release its occurrences.
    pub(crate) fn pp_remove_clause(&mut self, cidx: ClauseRef) {
        debug_assert!(self.pool.is_live(cidx));
        let lits: Vec<Literal> = self.pool.literals(cidx).to_vec();
        self.pool.delete(cidx);
        self.stats.problem_clauses_deleted += 1;
        for &l in &lits {
            self.pp_decrement_occ(l);
        }
    }

    /// All clauses containing `l` are satisfied; remove them.
    fn pp_remove_true_clauses(&mut self, l: Literal) {
        let list = self.occ_lists.take(l);
        for cidx in list {
            if self.pool.is_live(cidx) && self.pool.literals(cidx).contains(&l) {
                self.pp_remove_clause(cidx);
            }
        }
        debug_assert_eq!(self.occ[l.index()], 0);
    }

    /// Strip the now-false literals from every clause containing `fl`.
    fn pp_visit_clauses_of_lit(&mut self, fl: Literal) {
        let list = self.occ_lists.take(fl);
        for cidx in list {
            if self.pool.is_live(cidx) && self.pool.literals(cidx).contains(&fl) {
                self.pp_visit_clause(cidx);
                if self.has_empty_clause {
                    return;
                }
            }
        }
    }

    /// Remove false literals from a clause; delete it if true, queue a unit
    /// if one literal remains.
    fn pp_visit_clause(&mut self, cidx: ClauseRef) {
        let old: Vec<Literal> = self.pool.literals(cidx).to_vec();
        let mut kept: Vec<Literal> = Vec::with_capacity(old.len());
        for &l in &old {
            match self.lit_value(l) {
                Value::True => {
                    self.pp_remove_clause(cidx);
                    return;
                }
                Value::False => {}
                _ => kept.push(l),
            }
        }
        if kept.len() == old.len() {
            return;
        }
        match kept.len() {
            0 => {
                self.has_empty_clause = true;
            }
            1 => {
                self.pool.delete(cidx);
                self.stats.problem_clauses_deleted += 1;
                self.pp_assign(kept[0], Antecedent::Unit);
                for &l in &old {
                    if l != kept[0] && self.lit_value(l) == Value::False {
                        // occurrence of a false literal in a deleted clause
                        self.occ[l.index()] -= 1;
                        self.elim.update(l.variable(), &self.occ);
                    }
                }
                self.pp_decrement_occ(kept[0]);
            }
            m => {
                for (i, &l) in kept.iter().enumerate() {
                    self.pool.set_lit(cidx, i as u32, l);
                }
                self.pool.shrink(cidx, m as u32);
                let sig = crate::subsume::clause_signature(&kept);
                self.pool.set_signature(cidx, sig);
                for &l in &old {
                    if !kept.contains(&l) {
                        self.occ[l.index()] -= 1;
                        self.elim.update(l.variable(), &self.occ);
                    }
                }
                self.clause_queue_push(cidx);
            }
        }
    }

    /// Drain the pure/unit queue, deleting satisfied clauses and stripping
    /// false literals. Returns false when the empty clause was derived.
    pub(crate) fn pp_empty_queue(&mut self) -> bool {
        while let Some(l) = self.lqueue.pop_front() {
            debug_assert_eq!(self.lit_value(l), Value::True);
            self.pp_remove_true_clauses(l);
            self.pp_visit_clauses_of_lit(l.negated());
            if self.has_empty_clause {
                return false;
            }
        }
        true
    }

    /// Queue the units added before `solve` and every initially pure
    /// literal.
    fn collect_unit_and_pure_literals(&mut self) {
        let units: Vec<Literal> = self.trail.lits.clone();
        for l in units {
            self.lqueue.push_back(l);
        }
        for x in 1..self.nvars {
            let var = Variable(x);
            if !self.var_is_active(var) {
                continue;
            }
            let pos = Literal::positive(var);
            let neg = Literal::negative(var);
            let np = self.occ[pos.index()];
            let nn = self.occ[neg.index()];
            if np == 0 && nn > 0 {
                self.pp_assign(neg, Antecedent::Pure);
            } else if nn == 0 && np > 0 {
                self.pp_assign(pos, Antecedent::Pure);
            }
        }
    }

    // ------------------------------------------------------------------
    // Subsumption queue plumbing (shared with subsume.rs)
    // ------------------------------------------------------------------

    /// Re-enqueue a shrunken clause that the subsumption scan already
    /// passed. Queued clauses carry the pool's transient mark.
    pub(crate) fn clause_queue_push(&mut self, cidx: ClauseRef) {
        if cidx.0 < self.scan_index && !self.pool.is_marked(cidx) {
            self.pool.mark(cidx);
            self.cqueue.push_back(cidx);
        }
    }

    /// Next queued clause, skipping dead entries.
    pub(crate) fn clause_queue_pop(&mut self) -> Option<ClauseRef> {
        while let Some(c) = self.cqueue.pop_front() {
            if self.pool.is_live(c) {
                self.pool.unmark(c);
                return Some(c);
            }
        }
        None
    }

    // ------------------------------------------------------------------
    // Garbage collection during preprocessing
    // ------------------------------------------------------------------

    /// Compact the pool when padding piles up, rebuilding occurrence lists.
    fn pp_try_gc(&mut self) {
        if !self.pool.needs_gc() {
            return;
        }
        // queued handles are about to move
        while let Some(c) = self.cqueue.pop_front() {
            if self.pool.is_live(c) {
                self.pool.unmark(c);
            }
        }
        self.scan_index = 0;
        let _moved = self.pool.compact(0);
        self.occ_lists.clear_all();
        let handles: Vec<ClauseRef> = self.pool.iter().collect();
        for cidx in handles {
            let lits: Vec<Literal> = self.pool.literals(cidx).to_vec();
            self.occ_lists.add_clause(cidx, &lits);
        }
        self.stats.gc_calls += 1;
        log::trace!("preprocessing gc: pool size {} words", self.pool.size());
    }

    // ------------------------------------------------------------------
    // SCC substitution during preprocessing
    // ------------------------------------------------------------------

    /// Equivalence substitution over the binary clauses still in the pool.
    /// Returns false when an inconsistent component was found.
    fn pp_scc_simplification(&mut self) -> bool {
        let before = self.stats.substituted_vars;
        self.compute_sccs();
        if self.has_empty_clause {
            return false;
        }
        if self.stats.substituted_vars == before {
            return true;
        }
        log::debug!(
            "preprocessing scc: {} substitutions",
            self.stats.substituted_vars - before
        );
        for x in 1..self.nvars {
            if let Antecedent::Subst(_) = self.ante[x as usize] {
                let pos = Literal::positive(Variable(x));
                if !self.value[pos.index()].is_assigned() {
                    // placeholder value so other passes skip the variable;
                    // reconstruction overwrites it from the log
                    self.value[pos.index()] = Value::True;
                    self.value[pos.negated().index()] = Value::False;
                    self.pp_apply_subst_to_variable(Variable(x));
                    if self.has_empty_clause {
                        return false;
                    }
                }
            }
        }
        true
    }

    /// Rewrite every clause of a freshly substituted variable.
    fn pp_apply_subst_to_variable(&mut self, x: Variable) {
        for l in [Literal::positive(x), Literal::negative(x)] {
            let list = self.occ_lists.take(l);
            for cidx in list {
                if self.pool.is_live(cidx) && self.pool.literals(cidx).contains(&l) {
                    self.pp_apply_subst_to_clause(cidx);
                    if self.has_empty_clause {
                        return;
                    }
                }
            }
            self.occ[l.index()] = 0;
        }
    }

    /// Apply the substitution to one clause, with full occurrence
    /// bookkeeping.
    fn pp_apply_subst_to_clause(&mut self, cidx: ClauseRef) {
        let old: Vec<Literal> = self.pool.literals(cidx).to_vec();
        let mut kept: Vec<Literal> = Vec::with_capacity(old.len());
        let mut changed = false;
        for &l in &old {
            let s = self.subst_root(l);
            if s != l {
                changed = true;
            }
            match self.lit_value(s) {
                Value::True => {
                    self.pp_remove_clause(cidx);
                    return;
                }
                Value::False => changed = true,
                _ => {
                    if kept.contains(&s.negated()) {
                        self.pp_remove_clause(cidx);
                        return;
                    }
                    if kept.contains(&s) {
                        changed = true;
                    } else {
                        kept.push(s);
                    }
                }
            }
        }
        if !changed {
            return;
        }
        // release the old occurrences (no pure detection: the substituted
        // variable is already out of play and the rest get re-incremented)
        for &l in &old {
            self.occ[l.index()] -= 1;
            self.elim.update(l.variable(), &self.occ);
        }
        match kept.len() {
            0 => {
                self.has_empty_clause = true;
                self.pool.delete(cidx);
                self.stats.problem_clauses_deleted += 1;
            }
            1 => {
                self.pool.delete(cidx);
                self.stats.problem_clauses_deleted += 1;
                self.pp_assign(kept[0], Antecedent::Unit);
            }
            m => {
                for (i, &l) in kept.iter().enumerate() {
                    self.pool.set_lit(cidx, i as u32, l);
                }
                self.pool.shrink(cidx, m as u32);
                let sig = crate::subsume::clause_signature(&kept);
                self.pool.set_signature(cidx, sig);
                for &l in &kept {
                    self.pp_increment_occ(l);
                    if !old.contains(&l) {
                        self.occ_lists.push(l, cidx);
                    }
                }
                self.clause_queue_push(cidx);
            }
        }
    }

    // ------------------------------------------------------------------
    // Bounded variable elimination
    // ------------------------------------------------------------------

    /// A variable qualifies for the elimination heap unless both polarities
    /// occur too often.
    fn pp_elim_candidate(&self, x: Variable) -> bool {
        let skip = self.params.var_elim_skip;
        self.occ[Literal::positive(x).index()] < skip
            || self.occ[Literal::negative(x).index()] < skip
    }

    fn collect_elimination_candidates(&mut self) {
        for x in 1..self.nvars {
            let var = Variable(x);
            if self.var_is_active(var) && self.pp_elim_candidate(var) {
                self.elim.insert(var, &self.occ);
            }
        }
    }

    /// Live clauses that really contain `l`.
    fn pp_occurrences(&self, l: Literal) -> Vec<ClauseRef> {
        self.occ_lists
            .list(l)
            .iter()
            .copied()
            .filter(|&c| self.pool.is_live(c) && self.pool.literals(c).contains(&l))
            .collect()
    }

    /// Resolvent of two clauses on `pivot`; `None` when tautological.
    fn resolvent(&self, c1: ClauseRef, c2: ClauseRef, pivot: Literal) -> Option<Vec<Literal>> {
        let mut res: Vec<Literal> = Vec::new();
        for &l in self.pool.literals(c1) {
            if l != pivot {
                res.push(l);
            }
        }
        let np = pivot.negated();
        for &l in self.pool.literals(c2) {
            if l == np {
                continue;
            }
            if res.contains(&l.negated()) {
                return None;
            }
            if !res.contains(&l) {
                res.push(l);
            }
        }
        Some(res)
    }

    /// Elimination is worthwhile when the non-trivial resolvents do not
    /// outnumber the clauses removed and none grows past the length limit.
    fn pp_worth_eliminating(
        &self,
        x: Variable,
        pos_cls: &[ClauseRef],
        neg_cls: &[ClauseRef],
    ) -> bool {
        let skip = self.params.var_elim_skip as usize;
        if pos_cls.len() >= skip && neg_cls.len() >= skip {
            return false;
        }
        let n = pos_cls.len() + neg_cls.len();
        let pivot = Literal::positive(x);
        let mut new_n = 0usize;
        for &c1 in pos_cls {
            for &c2 in neg_cls {
                if let Some(res) = self.resolvent(c1, c2, pivot) {
                    if res.len() > self.params.res_clause_limit as usize {
                        return false;
                    }
                    new_n += 1;
                    if new_n > n {
                        return false;
                    }
                }
            }
        }
        true
    }

    fn pp_add_resolvent(&mut self, res: Vec<Literal>) {
        match res.len() {
            0 => self.has_empty_clause = true,
            1 => self.pp_assign(res[0], Antecedent::Unit),
            _ => {
                let cidx = self.pool.add_problem_clause(&res);
                let sig = crate::subsume::clause_signature(&res);
                self.pool.set_signature(cidx, sig);
                self.occ_lists.add_clause(cidx, &res);
                for &l in &res {
                    self.pp_increment_occ(l);
                }
            }
        }
    }

    /// Eliminate `x` by resolution: save the smaller side of its clauses to
    /// the reconstruction log, add all non-trivial resolvents, delete the
    /// originals.
    fn pp_eliminate_variable(
        &mut self,
        x: Variable,
        pos_cls: Vec<ClauseRef>,
        neg_cls: Vec<ClauseRef>,
    ) {
        let pos = Literal::positive(x);
        let neg = Literal::negative(x);

        // save the cheaper side for model reconstruction
        let count = |cls: &[ClauseRef]| -> usize {
            cls.iter().map(|&c| self.pool.len(c) as usize).sum()
        };
        let (side, pivot) = if count(&pos_cls) <= count(&neg_cls) {
            (&pos_cls, pos)
        } else {
            (&neg_cls, neg)
        };
        let block = self.log.begin_block();
        for &c in side.iter() {
            let lits: Vec<Literal> = self.pool.literals(c).to_vec();
            self.log.save_clause(&lits, pivot);
        }
        self.log.end_block(block);

        self.ante[x.index()] = Antecedent::Eliminated;
        self.stats.eliminated_vars += 1;

        // resolvents first: they read the original clauses
        for &c1 in &pos_cls {
            for &c2 in &neg_cls {
                if let Some(res) = self.resolvent(c1, c2, pos) {
                    self.pp_add_resolvent(res);
                    if self.has_empty_clause {
                        return;
                    }
                }
            }
        }
        for c in pos_cls.into_iter().chain(neg_cls) {
            self.pp_remove_clause(c);
        }
    }

    /// Work through the elimination heap.
    fn process_elimination_candidates(&mut self) {
        while let Some(x) = self.elim.pop(&self.occ) {
            if !self.var_is_active(x) {
                continue;
            }
            let np = self.occ[Literal::positive(x).index()];
            let nn = self.occ[Literal::negative(x).index()];
            if np == 0 || nn == 0 {
                // pure: the literal queue handles it
                continue;
            }
            let pos_cls = self.pp_occurrences(Literal::positive(x));
            let neg_cls = self.pp_occurrences(Literal::negative(x));
            if self.pp_worth_eliminating(x, &pos_cls, &neg_cls) {
                let cheap = np == 1 || nn == 1 || (np == 2 && nn == 2);
                self.pp_eliminate_variable(x, pos_cls, neg_cls);
                if cheap {
                    self.stats.cheap_eliminations += 1;
                }
                if self.has_empty_clause || !self.pp_empty_queue() {
                    return;
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Driver
    // ------------------------------------------------------------------

    /// Rebuild the search representation: binaries move inline into the
    /// watch vectors, long clauses get their two watches.
    fn prepare_for_search(&mut self) {
        debug_assert!(!self.has_empty_clause);
        self.trail.reset();
        self.decision_level = 0;
        self.occ_lists.clear_all();
        for o in &mut self.occ {
            *o = 0;
        }
        self.watches.clear_all();
        self.binaries = 0;
        let bins = self.pool.extract_binaries_and_compact();
        for (a, b) in bins {
            self.add_binary_clause(a, b);
        }
        let handles: Vec<ClauseRef> = self.pool.iter().collect();
        for cidx in handles {
            let l0 = self.pool.first_literal(cidx);
            let l1 = self.pool.second_literal(cidx);
            self.watches.add_long(l0, cidx, l1);
            self.watches.add_long(l1, cidx, l0);
        }
    }

    /// Run the preprocessor to a fixed point. On exit either
    /// `has_empty_clause` is set or the clause set is ready for search.
    pub(crate) fn preprocess_formula(&mut self) {
        debug_assert!(self.preprocess && !self.preprocessed);

        self.collect_unit_and_pure_literals();
        loop {
            if !self.pp_empty_queue() {
                break;
            }
            self.pp_try_gc();
            if !self.pp_scc_simplification() {
                break;
            }
            if self.lqueue.is_empty() {
                break;
            }
        }

        if !self.has_empty_clause {
            self.collect_elimination_candidates();
            loop {
                self.process_elimination_candidates();
                if self.has_empty_clause || !self.pp_subsumption() {
                    break;
                }
                if self.elim.is_empty() {
                    break;
                }
            }
        }

        if !self.has_empty_clause {
            loop {
                if !self.pp_empty_queue() {
                    break;
                }
                self.pp_try_gc();
                if !self.pp_scc_simplification() {
                    break;
                }
                if self.lqueue.is_empty() {
                    break;
                }
            }
        }

        while let Some(c) = self.cqueue.pop_front() {
            if self.pool.is_live(c) {
                self.pool.unmark(c);
            }
        }
        self.scan_index = 0;
        self.elim.reset();

        log::debug!(
            "preprocessing: {} units, {} pures, {} substitutions, {} eliminations, {} subsumed, {} strengthened{}",
            self.stats.unit_literals,
            self.stats.pure_literals,
            self.stats.substituted_vars,
            self.stats.eliminated_vars,
            self.stats.subsumed,
            self.stats.strengthened,
            if self.has_empty_clause { ", unsat" } else { "" },
        );

        if !self.has_empty_clause {
            self.prepare_for_search();
        }
    }
}
