// Copyright (c) The kmap-min Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::cover::bitset::BitSet;
use crate::cube::Minterm;
use crate::errors::MinimizeError;
use crate::logic_function::LogicFunction;
use crate::primes::PrimeImplicant;

/// Bipartite incidence between required on-minterms (columns) and prime
/// implicants (rows). Don't-care points are not columns.
#[derive(Debug)]
pub(crate) struct PiChart {
    /// Column index -> minterm.
    pub col_minterms: Vec<Minterm>,
    /// Row index (== prime index) -> covered column set and literal cost.
    pub rows: Vec<ChartRow>,
    /// Column index -> rows covering it, ascending.
    pub col_rows: Vec<Vec<usize>>,
}

#[derive(Debug)]
pub(crate) struct ChartRow {
    pub cols: BitSet,
    pub literals: u32,
}

impl PiChart {
    /// Builds the chart and marks the essential primes: a prime is
    /// essential iff it is the unique coverer of some column here, before
    /// any reduction runs.
    pub(crate) fn build(
        primes: &mut [PrimeImplicant],
        function: &LogicFunction,
    ) -> Result<Self, MinimizeError> {
        let col_minterms: Vec<Minterm> = function.ones().to_vec();
        let n_cols = col_minterms.len();

        let mut rows = Vec::with_capacity(primes.len());
        let mut col_rows: Vec<Vec<usize>> = vec![Vec::new(); n_cols];

        for (row_ix, prime) in primes.iter().enumerate() {
            let mut cols = BitSet::new(n_cols);
            for &m in &prime.covers {
                let col = col_minterms
                    .binary_search(&m)
                    .map_err(|_| MinimizeError::Internal {
                        message: format!("prime cover {} is not a required minterm", m),
                    })?;
                cols.insert(col);
                col_rows[col].push(row_ix);
            }
            rows.push(ChartRow {
                cols,
                literals: prime.literal_count(function.n_vars()),
            });
        }

        for (col, covering) in col_rows.iter().enumerate() {
            match covering.as_slice() {
                [] => {
                    return Err(MinimizeError::UncoverableMinterm {
                        minterm: col_minterms[col],
                    });
                }
                [only] => primes[*only].essential = true,
                _ => {}
            }
        }

        Ok(Self {
            col_minterms,
            rows,
            col_rows,
        })
    }

    #[inline]
    pub(crate) fn n_cols(&self) -> usize {
        self.col_minterms.len()
    }

    #[inline]
    pub(crate) fn n_rows(&self) -> usize {
        self.rows.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cancel::CancelToken;
    use crate::primes::prime_implicants;
    use crate::trace::StepTrace;

    fn chart_for(n_vars: u8, ones: &[Minterm], dcs: &[Minterm]) -> (Vec<PrimeImplicant>, PiChart) {
        let function = LogicFunction::new(n_vars, ones.iter().copied(), dcs.iter().copied()).unwrap();
        let mut trace = StepTrace::new(false);
        let mut primes = prime_implicants(&function, &CancelToken::new(), &mut trace)
            .unwrap()
            .primes;
        let chart = PiChart::build(&mut primes, &function).unwrap();
        (primes, chart)
    }

    #[test]
    fn test_columns_exclude_dont_cares() {
        let (_, chart) = chart_for(3, &[0, 2], &[5, 7]);
        assert_eq!(chart.col_minterms, vec![0, 2]);
        assert_eq!(chart.n_cols(), 2);
    }

    #[test]
    fn test_essential_marking() {
        // Two disjoint pair-primes: each uniquely covers its columns.
        let (primes, chart) = chart_for(3, &[0, 2, 5, 7], &[]);
        assert_eq!(chart.n_rows(), 2);
        assert!(primes.iter().all(|pi| pi.essential));
        assert!(chart.col_rows.iter().all(|rows| rows.len() == 1));
    }

    #[test]
    fn test_cyclic_chart_has_no_essentials() {
        let (primes, chart) = chart_for(3, &[0, 1, 2, 5, 6, 7], &[]);
        assert_eq!(chart.n_rows(), 6);
        assert!(primes.iter().all(|pi| !pi.essential));
        assert!(chart.col_rows.iter().all(|rows| rows.len() == 2));
    }

    #[test]
    fn test_row_costs() {
        let (_, chart) = chart_for(3, &[0, 2, 5, 7], &[]);
        assert!(chart.rows.iter().all(|row| row.literals == 2));
    }
}
