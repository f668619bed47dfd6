// Copyright (c) The kmap-min Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::cover::solve_impl::{
    ReductionCadence, SearchState, Solution, SolveError, Solver,
};
use log::trace;

/// A complete cover candidate. Row indexes are kept sorted; because chart
/// rows are laid out in canonical `(mask, value)` order, comparing sorted
/// row lists doubles as the lexicographic cube tie-break.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Candidate {
    pub(crate) rows: Vec<usize>,
    pub(crate) literals: u32,
}

impl Candidate {
    pub(crate) fn new(mut rows: Vec<usize>, literals: u32) -> Self {
        rows.sort_unstable();
        Self { rows, literals }
    }

    fn beats(&self, other: &Candidate) -> bool {
        (self.rows.len(), self.literals, &self.rows) < (other.rows.len(), other.literals, &other.rows)
    }

    pub(crate) fn into_solution(self) -> Solution {
        Solution {
            rows: self.rows,
            literals: self.literals,
        }
    }
}

impl Solver<'_> {
    /// Explores one node of the cyclic-core search: reduce, bound, then
    /// branch on the most-constrained column. Rows already tried for that
    /// column are excluded from later siblings.
    pub(crate) fn branch(
        &mut self,
        mut state: SearchState,
        mut chosen: Vec<usize>,
        mut literals: u32,
        best: &mut Candidate,
    ) -> Result<(), SolveError> {
        self.nodes += 1;
        trace!(
            "node {}: {} columns uncovered, {} rows chosen, {} literals",
            self.nodes,
            state.uncovered.len(),
            chosen.len(),
            literals
        );
        if self.cancel.is_cancelled() {
            return Err(SolveError::Cancelled { best: None });
        }

        let full = self.cadence == ReductionCadence::EveryNode;
        self.reduce(&mut state, &mut chosen, &mut literals, full);

        if state.uncovered.is_empty() {
            let candidate = Candidate::new(chosen, literals);
            if candidate.beats(best) {
                *best = candidate;
            }
            return Ok(());
        }

        let Some(bound) = self.lower_bound(&state) else {
            // Some column lost all of its coverers to sibling exclusion.
            return Ok(());
        };
        let count_bound = chosen.len() + bound as usize;
        // Every further row costs at least one literal.
        let literal_bound = literals + bound;
        if (count_bound, literal_bound) > (best.rows.len(), best.literals) {
            return Ok(());
        }

        // Most-constrained column first; ties to the lower column index.
        let Some(col) = state
            .uncovered
            .iter()
            .min_by_key(|&c| (self.live_degree(c, &state), c))
        else {
            return Ok(());
        };

        let mut candidates: Vec<(usize, usize)> = self.chart.col_rows[col]
            .iter()
            .filter(|r| state.available.contains(**r))
            .map(|&r| (r, self.chart.rows[r].cols.intersect_count(&state.uncovered)))
            .collect();
        // Highest covered-per-literal ratio first, compared without floats.
        candidates.sort_unstable_by(|&(ra, ca), &(rb, cb)| {
            let score_a = ca as u64 * u64::from(self.chart.rows[rb].literals);
            let score_b = cb as u64 * u64::from(self.chart.rows[ra].literals);
            score_b.cmp(&score_a).then_with(|| ra.cmp(&rb))
        });

        for (row, _) in candidates {
            let mut child_state = state.clone();
            let mut child_chosen = chosen.clone();
            let mut child_literals = literals;
            self.commit(&mut child_state, &mut child_chosen, &mut child_literals, row);
            self.branch(child_state, child_chosen, child_literals, best)?;
            state.available.remove(row);
        }
        Ok(())
    }

    /// Admissible independent-set lower bound: repeatedly charge one row
    /// for the lowest-degree column, then discard every column any of its
    /// coverers could also satisfy. `None` marks an infeasible subchart.
    pub(crate) fn lower_bound(&self, state: &SearchState) -> Option<u32> {
        let mut remaining = state.uncovered.clone();
        let mut bound = 0u32;
        while !remaining.is_empty() {
            let (degree, col) = remaining
                .iter()
                .map(|c| (self.live_degree(c, state), c))
                .min()?;
            if degree == 0 {
                return None;
            }
            bound += 1;
            for &row in &self.chart.col_rows[col] {
                if state.available.contains(row) {
                    remaining.subtract(&self.chart.rows[row].cols);
                }
            }
        }
        Some(bound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cancel::CancelToken;
    use crate::chart::PiChart;
    use crate::cover::bitset::BitSet;
    use crate::cover::solve_impl::solve_cover;
    use crate::cube::Minterm;
    use crate::logic_function::LogicFunction;
    use crate::primes::prime_implicants;
    use crate::trace::StepTrace;

    fn built_chart(
        n_vars: u8,
        ones: &[Minterm],
    ) -> (LogicFunction, Vec<crate::primes::PrimeImplicant>, PiChart) {
        let function = LogicFunction::new(n_vars, ones.iter().copied(), []).unwrap();
        let mut trace = StepTrace::new(false);
        let mut primes = prime_implicants(&function, &CancelToken::new(), &mut trace)
            .unwrap()
            .primes;
        let chart = PiChart::build(&mut primes, &function).unwrap();
        (function, primes, chart)
    }

    #[test]
    fn test_candidate_ordering() {
        let fewer_rows = Candidate::new(vec![0, 1], 6);
        let more_rows = Candidate::new(vec![0, 1, 2], 3);
        assert!(fewer_rows.beats(&more_rows), "row count dominates literals");

        let fewer_literals = Candidate::new(vec![0, 2], 4);
        assert!(fewer_literals.beats(&fewer_rows));

        let lex_smaller = Candidate::new(vec![0, 1], 6);
        let lex_larger = Candidate::new(vec![0, 2], 6);
        assert!(lex_smaller.beats(&lex_larger));
        assert!(!lex_smaller.beats(&lex_smaller.clone()));
    }

    #[test]
    fn test_lower_bound_on_cyclic_core() {
        let (_, _, chart) = built_chart(3, &[0, 1, 2, 5, 6, 7]);
        let cancel = CancelToken::new();
        let solver = Solver {
            chart: &chart,
            cadence: ReductionCadence::EveryNode,
            cancel: &cancel,
            nodes: 0,
        };
        let state = SearchState {
            uncovered: BitSet::full(chart.n_cols()),
            available: BitSet::full(chart.n_rows()),
        };
        let bound = solver.lower_bound(&state).unwrap();
        assert!(bound >= 2, "six-column cycle needs at least two primes, got {}", bound);
        assert!(bound <= 3, "bound must stay admissible, got {}", bound);
    }

    #[test]
    fn test_lower_bound_detects_infeasible_state() {
        let (_, _, chart) = built_chart(2, &[0, 3]);
        let cancel = CancelToken::new();
        let solver = Solver {
            chart: &chart,
            cadence: ReductionCadence::EveryNode,
            cancel: &cancel,
            nodes: 0,
        };
        let state = SearchState {
            uncovered: BitSet::full(chart.n_cols()),
            // No rows at all: every column is stranded.
            available: BitSet::new(chart.n_rows()),
        };
        assert_eq!(solver.lower_bound(&state), None);
    }

    #[test]
    fn test_search_is_exact_on_shaved_cycle() {
        // Adding minterm 3 to the six-cycle gives essentials plus a small
        // residual search; the optimum is still three primes.
        let (_, _, chart) = built_chart(3, &[0, 1, 2, 3, 5, 6, 7]);
        let cancel = CancelToken::new();
        let mut trace = StepTrace::new(false);
        let report =
            solve_cover(&chart, ReductionCadence::EveryNode, &cancel, &mut trace).unwrap();
        assert_eq!(report.solution.rows.len(), 3);
    }

    #[test]
    fn test_cancellation_returns_incumbent() {
        let (_, _, chart) = built_chart(3, &[0, 1, 2, 5, 6, 7]);
        let cancel = CancelToken::new();
        cancel.cancel();
        let mut trace = StepTrace::new(false);
        let err =
            solve_cover(&chart, ReductionCadence::EveryNode, &cancel, &mut trace).unwrap_err();
        match err {
            SolveError::Cancelled { best: Some(solution) } => {
                // The greedy incumbent is a genuine (if unproven) cover.
                let mut covered = BitSet::new(chart.n_cols());
                for row in solution.rows {
                    for col in chart.rows[row].cols.iter() {
                        covered.insert(col);
                    }
                }
                assert_eq!(covered.len(), chart.n_cols());
            }
            other => panic!("expected cancelled-with-best, got {:?}", other),
        }
    }
}
