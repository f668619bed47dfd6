// Copyright (c) The kmap-min Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::cancel::CancelToken;
use crate::chart::PiChart;
use crate::cover::bitset::BitSet;
use crate::cover::branch_bound::Candidate;
use crate::trace::StepTrace;
use log::debug;

/// How much reduction work runs inside every branch-and-bound node.
/// Both settings are exact; dominance only changes search speed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ReductionCadence {
    /// Essential fixpoint plus row/column dominance at every node.
    EveryNode,
    /// Essential fixpoint only; dominance runs at the top level.
    EssentialsOnly,
}

/// A minimum cover: chart row indexes in ascending order plus their total
/// literal cost.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Solution {
    pub rows: Vec<usize>,
    pub literals: u32,
}

#[derive(Debug)]
pub(crate) enum SolveError {
    /// The token tripped mid-search; `best` holds the incumbent cover.
    Cancelled { best: Option<Solution> },
    /// Assertion-class failure; the chart guarantees coverability.
    Infeasible { message: String },
}

#[derive(Debug)]
pub(crate) struct SolveReport {
    pub solution: Solution,
    pub nodes: u64,
}

/// Mutable view of the chart during solving: columns still to cover and
/// rows still eligible for selection.
#[derive(Clone, Debug)]
pub(crate) struct SearchState {
    pub(crate) uncovered: BitSet,
    pub(crate) available: BitSet,
}

pub(crate) struct Solver<'a> {
    pub(crate) chart: &'a PiChart,
    pub(crate) cadence: ReductionCadence,
    pub(crate) cancel: &'a CancelToken,
    pub(crate) nodes: u64,
}

/// Finds an exact minimum-cost cover of the chart: essential extraction and
/// dominance reductions to fixpoint, then branch-and-bound over whatever
/// cyclic core remains.
pub(crate) fn solve_cover(
    chart: &PiChart,
    cadence: ReductionCadence,
    cancel: &CancelToken,
    trace: &mut StepTrace,
) -> Result<SolveReport, SolveError> {
    let mut solver = Solver {
        chart,
        cadence,
        cancel,
        nodes: 0,
    };
    let mut state = SearchState {
        uncovered: BitSet::full(chart.n_cols()),
        available: BitSet::full(chart.n_rows()),
    };
    let mut chosen: Vec<usize> = Vec::new();
    let mut literals = 0u32;

    solver.reduce(&mut state, &mut chosen, &mut literals, true);

    if state.uncovered.is_empty() {
        chosen.sort_unstable();
        trace.push(|| "Chart solved by essential extraction and dominance".to_string());
        return Ok(SolveReport {
            solution: Solution { rows: chosen, literals },
            nodes: 0,
        });
    }

    let core_cols = state.uncovered.len();
    let core_rows = state.available.len();
    debug!("cyclic core: {} columns x {} rows", core_cols, core_rows);
    trace.push(|| format!("Cyclic core of {} columns x {} rows remains", core_cols, core_rows));

    let mut best = solver
        .greedy_complete(&state, &chosen, literals)
        .ok_or_else(|| SolveError::Infeasible {
            message: "greedy cover failed on a coverable chart".to_string(),
        })?;

    match solver.branch(state, chosen, literals, &mut best) {
        Ok(()) => {}
        Err(SolveError::Cancelled { .. }) => {
            return Err(SolveError::Cancelled {
                best: Some(best.into_solution()),
            });
        }
        Err(other) => return Err(other),
    }

    trace.push(|| format!("Found optimal cover with {} prime implicants", best.rows.len()));
    let nodes = solver.nodes;
    debug!("branch-and-bound explored {} nodes", nodes);
    Ok(SolveReport {
        solution: best.into_solution(),
        nodes,
    })
}

impl Solver<'_> {
    pub(crate) fn commit(
        &self,
        state: &mut SearchState,
        chosen: &mut Vec<usize>,
        literals: &mut u32,
        row: usize,
    ) {
        chosen.push(row);
        *literals += self.chart.rows[row].literals;
        state.available.remove(row);
        state.uncovered.subtract(&self.chart.rows[row].cols);
    }

    pub(crate) fn live_degree(&self, col: usize, state: &SearchState) -> usize {
        self.chart.col_rows[col]
            .iter()
            .filter(|r| state.available.contains(**r))
            .count()
    }

    /// Runs reductions to fixpoint. `full` adds the dominance passes on top
    /// of the essential fixpoint.
    pub(crate) fn reduce(
        &self,
        state: &mut SearchState,
        chosen: &mut Vec<usize>,
        literals: &mut u32,
        full: bool,
    ) {
        loop {
            let mut changed = self.extract_essentials(state, chosen, literals);
            if state.uncovered.is_empty() {
                return;
            }
            if full {
                changed |= self.row_dominance(state);
                changed |= self.column_dominance(state);
            }
            if !changed {
                return;
            }
        }
    }

    /// Commits every row that is the sole remaining coverer of some column,
    /// repeating until no column is singly covered.
    fn extract_essentials(
        &self,
        state: &mut SearchState,
        chosen: &mut Vec<usize>,
        literals: &mut u32,
    ) -> bool {
        let mut any = false;
        loop {
            let mut forced: Vec<usize> = Vec::new();
            for col in state.uncovered.iter() {
                let mut covering = self.chart.col_rows[col]
                    .iter()
                    .filter(|r| state.available.contains(**r));
                if let (Some(&row), None) = (covering.next(), covering.next()) {
                    forced.push(row);
                }
            }
            if forced.is_empty() {
                return any;
            }
            forced.sort_unstable();
            forced.dedup();
            for row in forced {
                // A row forced by one column may already have been committed
                // for another, or left without live columns by it.
                if state.available.contains(row)
                    && self.chart.rows[row].cols.intersect_count(&state.uncovered) > 0
                {
                    self.commit(state, chosen, literals, row);
                }
            }
            any = true;
        }
    }

    /// Drops rows whose live columns are contained in a no-costlier row's,
    /// along with rows that no longer cover anything.
    fn row_dominance(&self, state: &mut SearchState) -> bool {
        let mut live: Vec<(usize, BitSet)> = Vec::new();
        let mut changed = false;
        for row in state.available.iter().collect::<Vec<_>>() {
            let cols = self.chart.rows[row].cols.intersection(&state.uncovered);
            if cols.is_empty() {
                state.available.remove(row);
                changed = true;
            } else {
                live.push((row, cols));
            }
        }

        for (b, cols_b) in &live {
            if !state.available.contains(*b) {
                continue;
            }
            for (a, cols_a) in &live {
                if a == b || !state.available.contains(*a) {
                    continue;
                }
                if !cols_b.is_subset(cols_a) {
                    continue;
                }
                let lit_a = self.chart.rows[*a].literals;
                let lit_b = self.chart.rows[*b].literals;
                // Mutual domination (identical columns, identical cost)
                // keeps the lower row index.
                if lit_a < lit_b || (lit_a == lit_b && (cols_a != cols_b || a < b)) {
                    state.available.remove(*b);
                    changed = true;
                    break;
                }
            }
        }
        changed
    }

    /// Drops every column whose coverer set contains another column's: the
    /// harder column forces the easier one to be covered anyway.
    fn column_dominance(&self, state: &mut SearchState) -> bool {
        let cols: Vec<usize> = state.uncovered.iter().collect();
        let row_sets: Vec<BitSet> = cols
            .iter()
            .map(|&c| {
                let mut set = BitSet::new(self.chart.n_rows());
                for &r in &self.chart.col_rows[c] {
                    if state.available.contains(r) {
                        set.insert(r);
                    }
                }
                set
            })
            .collect();

        let mut changed = false;
        for (i1, &c1) in cols.iter().enumerate() {
            if !state.uncovered.contains(c1) {
                continue;
            }
            for (i2, &c2) in cols.iter().enumerate() {
                if i1 == i2 || !state.uncovered.contains(c2) {
                    continue;
                }
                if row_sets[i2].is_subset(&row_sets[i1])
                    && (row_sets[i2] != row_sets[i1] || c2 < c1)
                {
                    state.uncovered.remove(c1);
                    changed = true;
                    break;
                }
            }
        }
        changed
    }

    /// Completes `chosen` into a full cover by repeatedly taking the row
    /// covering the most live columns. Seeds the branch-and-bound incumbent.
    pub(crate) fn greedy_complete(
        &self,
        state: &SearchState,
        chosen: &[usize],
        literals: u32,
    ) -> Option<Candidate> {
        let mut state = state.clone();
        let mut chosen: Vec<usize> = chosen.to_vec();
        let mut literals = literals;

        while !state.uncovered.is_empty() {
            let mut best: Option<(usize, u32, usize)> = None;
            for row in state.available.iter() {
                let count = self.chart.rows[row].cols.intersect_count(&state.uncovered);
                if count == 0 {
                    continue;
                }
                let key = (count, self.chart.rows[row].literals, row);
                let better = match best {
                    None => true,
                    Some((bc, bl, br)) => {
                        count > bc || (count == bc && (key.1 < bl || (key.1 == bl && row < br)))
                    }
                };
                if better {
                    best = Some(key);
                }
            }
            let (_, _, row) = best?;
            self.commit(&mut state, &mut chosen, &mut literals, row);
        }

        Some(Candidate::new(chosen, literals))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cube::Minterm;
    use crate::logic_function::LogicFunction;
    use crate::primes::prime_implicants;

    fn solve(n_vars: u8, ones: &[Minterm], dcs: &[Minterm]) -> (Vec<usize>, u32, u64) {
        let function = LogicFunction::new(n_vars, ones.iter().copied(), dcs.iter().copied()).unwrap();
        let cancel = CancelToken::new();
        let mut trace = StepTrace::new(false);
        let mut primes = prime_implicants(&function, &cancel, &mut trace).unwrap().primes;
        let chart = PiChart::build(&mut primes, &function).unwrap();
        let report = solve_cover(&chart, ReductionCadence::EveryNode, &cancel, &mut trace).unwrap();
        (report.solution.rows, report.solution.literals, report.nodes)
    }

    #[test]
    fn test_essentials_only() {
        let (rows, literals, nodes) = solve(3, &[0, 2, 5, 7], &[]);
        assert_eq!(rows.len(), 2);
        assert_eq!(literals, 4);
        assert_eq!(nodes, 0, "no search needed when essentials cover");
    }

    #[test]
    fn test_cyclic_core_needs_three_of_six() {
        let (rows, literals, nodes) = solve(3, &[0, 1, 2, 5, 6, 7], &[]);
        assert_eq!(rows.len(), 3);
        assert_eq!(literals, 6);
        assert!(nodes > 0, "the fully cyclic chart requires search");
    }

    #[test]
    fn test_dominance_finds_two_cube_cover() {
        // ones admit the two-prime cover {B', D}.
        let (rows, literals, _) = solve(4, &[0, 1, 2, 3, 5, 7, 8, 9, 10, 11, 13, 15], &[]);
        assert_eq!(rows.len(), 2);
        assert_eq!(literals, 2);
    }

    #[test]
    fn test_empty_chart() {
        let function = LogicFunction::new(2, [], [0, 1]).unwrap();
        let cancel = CancelToken::new();
        let mut trace = StepTrace::new(false);
        let mut primes = prime_implicants(&function, &cancel, &mut trace).unwrap().primes;
        let chart = PiChart::build(&mut primes, &function).unwrap();
        let report = solve_cover(&chart, ReductionCadence::EveryNode, &cancel, &mut trace).unwrap();
        assert!(report.solution.rows.is_empty());
    }

    #[test]
    fn test_both_cadences_agree_on_cost() {
        for cadence in [ReductionCadence::EveryNode, ReductionCadence::EssentialsOnly] {
            let function = LogicFunction::new(3, [0, 1, 2, 5, 6, 7], []).unwrap();
            let cancel = CancelToken::new();
            let mut trace = StepTrace::new(false);
            let mut primes = prime_implicants(&function, &cancel, &mut trace).unwrap().primes;
            let chart = PiChart::build(&mut primes, &function).unwrap();
            let report = solve_cover(&chart, cadence, &cancel, &mut trace).unwrap();
            assert_eq!(report.solution.rows.len(), 3);
            assert_eq!(report.solution.literals, 6);
        }
    }
}
