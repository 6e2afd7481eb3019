//! Equivalence substitution via strongly-connected components
//!
//! Every binary clause `{a, b}` induces the implications `¬a → b` and
//! `¬b → a`. Literals in one strongly-connected component of this graph are
//! equivalent and collapse onto a single representative: the smallest
//! literal during preprocessing, the most active one during search. If a
//! component contains a literal and its negation the formula is
//! unsatisfiable.
//!
//! Tarjan's algorithm runs iteratively with explicit stacks. Successor
//! edges are read from the occurrence lists while preprocessing (binary
//! clauses still live in the pool then) and from the inline binary watch
//! entries during search.

use crate::clause_db::ClauseRef;
use crate::literal::Literal;
use crate::solver::{Antecedent, Solver};
use crate::value::Value;
use crate::watched::Watch;

/// `label` value of a fully-explored literal.
const EXPLORED: u32 = u32::MAX;

impl Solver {
    /// Follow substitution chains to the root literal.
    pub(crate) fn subst_root(&self, mut l: Literal) -> Literal {
        loop {
            match self.ante[l.variable().index()] {
                Antecedent::Subst(s) => {
                    l = if l.is_positive() { s } else { s.negated() };
                }
                _ => return l,
            }
        }
    }

    /// Record `l0 := rep` as a variable substitution and log it for model
    /// reconstruction.
    fn set_lit_subst(&mut self, l0: Literal, rep: Literal) {
        let x = l0.variable();
        debug_assert!(self.var_is_active(x));
        let s = if l0.is_positive() { rep } else { rep.negated() };
        self.ante[x.index()] = Antecedent::Subst(s);
        self.log.save_substitution(s, Literal::positive(x));
        self.stats.substituted_vars += 1;
        self.elim.remove(x, &self.occ);
    }

    /// Next binary-implication successor of `l`, scanning from position
    /// `k`. Returns the successor and the position to resume from.
    fn next_successor(&self, l: Literal, mut k: u32) -> (Option<Literal>, u32) {
        let not_l = l.negated();
        if self.preprocessed {
            let list = self.watches.list(not_l);
            while (k as usize) < list.len() {
                let w = list[k as usize];
                k += 1;
                if let Watch::Binary(other) = w {
                    if self.lit_is_active(other) {
                        return (Some(other), k);
                    }
                }
            }
        } else {
            let list = self.occ_lists.list(not_l);
            while (k as usize) < list.len() {
                let cidx = list[k as usize];
                k += 1;
                if !self.pool.is_live(cidx) || self.pool.len(cidx) != 2 {
                    continue;
                }
                let l0 = self.pool.lit(cidx, 0);
                let l1 = self.pool.lit(cidx, 1);
                let other = if l0 == not_l {
                    l1
                } else if l1 == not_l {
                    l0
                } else {
                    continue; // stale occurrence entry
                };
                if self.lit_is_active(other) {
                    return (Some(other), k);
                }
            }
        }
        (None, k)
    }

    /// Pick the representative of the component on top of `vertices`,
    /// rooted at `l`.
    fn scc_representative(&self, l: Literal, vertices: &[Literal]) -> Literal {
        let mut rep = l;
        let mut i = vertices.len();
        if !self.preprocessed {
            loop {
                i -= 1;
                let l0 = vertices[i];
                if l0 < rep {
                    rep = l0;
                }
                if l0 == l {
                    break;
                }
            }
        } else {
            let mut best = self.heap.activity(rep.variable());
            loop {
                i -= 1;
                let l0 = vertices[i];
                let act = self.heap.activity(l0.variable());
                if act > best || (act == best && l0 < rep) {
                    best = act;
                    rep = l0;
                }
                if l0 == l {
                    break;
                }
            }
        }
        rep
    }

    /// Pop the component rooted at `l` off `vertices` and record the
    /// substitutions, or discard it if its complement was handled first.
    fn process_scc(&mut self, l: Literal, vertices: &mut Vec<Literal>, label: &mut [u32]) {
        if label[l.negated().index()] == EXPLORED {
            // the complementary component was processed before
            loop {
                let l0 = vertices.pop().expect("component on the vertex stack");
                label[l0.index()] = EXPLORED;
                if l0 == l {
                    break;
                }
            }
            return;
        }
        let rep = self.scc_representative(l, vertices);
        loop {
            let l0 = vertices.pop().expect("component on the vertex stack");
            label[l0.index()] = EXPLORED;
            if self.var_is_eliminated(l0.variable()) {
                // l0 and its negation both sit in this component
                log::debug!("scc: inconsistent component at {:?}", l0);
                self.has_empty_clause = true;
                return;
            }
            if l0 != rep {
                self.set_lit_subst(l0, rep);
            }
            if l0 == l {
                return;
            }
        }
    }

    /// Iterative Tarjan from `root`.
    fn dfs_explore(
        &mut self,
        root: Literal,
        visit: &mut [u32],
        label: &mut [u32],
        counter: &mut u32,
    ) {
        let mut dfs: Vec<(Literal, u32)> = Vec::new();
        let mut vertices: Vec<Literal> = Vec::new();

        *counter += 1;
        visit[root.index()] = *counter;
        label[root.index()] = *counter;
        dfs.push((root, 0));
        vertices.push(root);

        loop {
            let &(x, k) = dfs.last().expect("dfs stack is nonempty");
            let (succ, k2) = self.next_successor(x, k);
            dfs.last_mut().expect("dfs stack is nonempty").1 = k2;
            match succ {
                Some(y) => {
                    if visit[y.index()] == 0 {
                        *counter += 1;
                        visit[y.index()] = *counter;
                        label[y.index()] = *counter;
                        dfs.push((y, 0));
                        vertices.push(y);
                    } else if label[y.index()] < label[x.index()] {
                        label[x.index()] = label[y.index()];
                    }
                }
                None => {
                    debug_assert!(label[x.index()] <= visit[x.index()]);
                    if label[x.index()] == visit[x.index()] {
                        self.process_scc(x, &mut vertices, label);
                        if self.has_empty_clause {
                            return;
                        }
                    }
                    dfs.pop();
                    let Some(&(y, _)) = dfs.last() else {
                        return;
                    };
                    if label[x.index()] < label[y.index()] {
                        label[y.index()] = label[x.index()];
                    }
                }
            }
        }
    }

    /// Compute all components over the active literals and record the
    /// resulting substitutions. Sets `has_empty_clause` on an inconsistent
    /// component.
    pub(crate) fn compute_sccs(&mut self) {
        let n = 2 * self.nvars as usize;
        let mut visit = vec![0u32; n];
        let mut label = vec![0u32; n];
        let mut counter = 0u32;
        for i in 2..n {
            let l = Literal::from_index(i);
            if self.lit_is_active(l) && visit[i] == 0 {
                self.dfs_explore(l, &mut visit, &mut label, &mut counter);
                if self.has_empty_clause {
                    return;
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Search-time substitution (level 0)
    // ------------------------------------------------------------------

    /// Detect equivalences and rewrite the whole clause set through them.
    /// Called at level 0 by `simplify`.
    pub(crate) fn scc_substitution(&mut self) {
        let before = self.stats.substituted_vars;
        self.compute_sccs();
        if self.has_empty_clause {
            return;
        }
        if self.stats.substituted_vars == before {
            return;
        }
        log::debug!(
            "scc: {} variable substitutions",
            self.stats.substituted_vars - before
        );
        // substituted variables stay unassigned; the SUBST tag keeps them
        // out of decisions, and the rewrite below removes every occurrence
        self.apply_substitution();
    }

    /// Rewrite every binary and long clause through the substitution,
    /// then rebuild watches.
    fn apply_substitution(&mut self) {
        debug_assert_eq!(self.decision_level, 0);

        // collect the inline binaries once, emptying every watch vector;
        // long-clause watches are rebuilt by the garbage collector below
        let mut bins: Vec<(Literal, Literal)> = Vec::new();
        for idx in 0..self.watches.num_lists() {
            let l0 = Literal::from_index(idx);
            let list = self.watches.take_list(l0);
            if self.value[idx].is_assigned() {
                // propagation is complete, these binaries are all true
                continue;
            }
            for w in &list {
                if let Watch::Binary(l1) = *w {
                    if l1 > l0 && !self.value[l1.index()].is_assigned() {
                        bins.push((l0, l1));
                    }
                }
            }
        }
        self.binaries = 0;

        for (a, b) in bins {
            self.subst_binary(a, b);
            if self.has_empty_clause {
                return;
            }
        }

        let handles: Vec<ClauseRef> = self.pool.iter().collect();
        for cidx in handles {
            self.subst_long_clause(cidx);
            if self.has_empty_clause {
                return;
            }
        }

        // clauses that implied level-0 literals may be gone
        for &l in &self.trail.lits {
            self.ante[l.variable().index()] = Antecedent::Unit;
        }
        self.collect_garbage(0);
        self.binaries = self.watches.count_binaries();
    }

    /// Rewrite one collected binary clause through the substitution.
    fn subst_binary(&mut self, a: Literal, b: Literal) {
        let mut lits: Vec<Literal> = Vec::with_capacity(2);
        for l in [a, b] {
            let s = self.subst_root(l);
            match self.lit_value(s) {
                Value::True => return,
                Value::False => {}
                _ => {
                    if lits.contains(&s.negated()) {
                        return; // tautology
                    }
                    if !lits.contains(&s) {
                        lits.push(s);
                    }
                }
            }
        }
        match lits.len() {
            0 => self.has_empty_clause = true,
            1 => {
                self.assign(lits[0], Antecedent::Unit);
                self.stats.unit_literals += 1;
            }
            _ => self.add_binary_clause(lits[0], lits[1]),
        }
    }

    /// Rewrite one pool clause through the substitution.
    fn subst_long_clause(&mut self, cidx: ClauseRef) {
        let n = self.pool.len(cidx);
        let mut lits: Vec<Literal> = Vec::with_capacity(n as usize);
        let mut changed = false;
        for i in 0..n {
            let l = self.pool.lit(cidx, i);
            let s = self.subst_root(l);
            if s != l {
                changed = true;
            }
            match self.lit_value(s) {
                Value::True => {
                    if !self.pool.is_learned(cidx) {
                        self.stats.problem_clauses_deleted += 1;
                    }
                    self.pool.delete(cidx);
                    return;
                }
                Value::False => changed = true,
                _ => {
                    if lits.contains(&s.negated()) {
                        // tautological after substitution
                        if !self.pool.is_learned(cidx) {
                            self.stats.problem_clauses_deleted += 1;
                        }
                        self.pool.delete(cidx);
                        return;
                    }
                    if lits.contains(&s) {
                        changed = true;
                    } else {
                        lits.push(s);
                    }
                }
            }
        }
        if !changed {
            return;
        }
        match lits.len() {
            0 => {
                self.has_empty_clause = true;
                self.pool.delete(cidx);
            }
            1 => {
                self.pool.delete(cidx);
                self.assign(lits[0], Antecedent::Unit);
                self.stats.unit_literals += 1;
            }
            2 => {
                self.pool.delete(cidx);
                self.add_binary_clause(lits[0], lits[1]);
                self.simplify_new_bins += 1;
            }
            m => {
                for (i, &l) in lits.iter().enumerate() {
                    self.pool.set_lit(cidx, i as u32, l);
                }
                self.pool.shrink(cidx, m as u32);
            }
        }
    }
}
