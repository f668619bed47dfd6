// Copyright (c) The kmap-min Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::cube::{Minterm, MAX_VARS};
use crate::errors::MinimizeError;
use itertools::Itertools;
use once_cell::sync::OnceCell;

/// Smallest supported variable count.
pub const MIN_VARS: u8 = 2;

/// A single-output Boolean function given by its on-set and dc-set.
///
/// Construction validates the domain (`2 <= n_vars <= 15`, every point in
/// `[0, 2^n_vars)`, on-set and dc-set disjoint) and normalizes both sets to
/// sorted, deduplicated order. The off-set is derived lazily and cached.
#[derive(Clone, Debug)]
pub struct LogicFunction {
    n_vars: u8,
    ones: Vec<Minterm>,
    dont_cares: Vec<Minterm>,
    zeros: OnceCell<Vec<Minterm>>,
}

impl LogicFunction {
    pub fn new(
        n_vars: u8,
        ones: impl IntoIterator<Item = Minterm>,
        dont_cares: impl IntoIterator<Item = Minterm>,
    ) -> Result<Self, MinimizeError> {
        if !(MIN_VARS..=MAX_VARS).contains(&n_vars) {
            return Err(MinimizeError::InvalidNumVars { n_vars });
        }
        let limit = 1u32 << n_vars;
        let ones: Vec<Minterm> = ones.into_iter().sorted_unstable().dedup().collect();
        let dont_cares: Vec<Minterm> = dont_cares.into_iter().sorted_unstable().dedup().collect();

        for &m in ones.iter().chain(&dont_cares) {
            if u32::from(m) >= limit {
                return Err(MinimizeError::InvalidMinterm { minterm: m, n_vars });
            }
        }
        for &m in &dont_cares {
            if ones.binary_search(&m).is_ok() {
                return Err(MinimizeError::Overlap { minterm: m });
            }
        }

        Ok(Self {
            n_vars,
            ones,
            dont_cares,
            zeros: OnceCell::new(),
        })
    }

    /// Maxterm-mode constructor: the on-set is everything outside the given
    /// maxterms and don't-cares.
    pub fn from_maxterms(
        n_vars: u8,
        maxterms: impl IntoIterator<Item = Minterm>,
        dont_cares: impl IntoIterator<Item = Minterm>,
    ) -> Result<Self, MinimizeError> {
        if !(MIN_VARS..=MAX_VARS).contains(&n_vars) {
            return Err(MinimizeError::InvalidNumVars { n_vars });
        }
        let limit = 1u32 << n_vars;
        let maxterms: Vec<Minterm> = maxterms.into_iter().sorted_unstable().dedup().collect();
        let dont_cares: Vec<Minterm> = dont_cares.into_iter().sorted_unstable().dedup().collect();
        for &m in &maxterms {
            if u32::from(m) >= limit {
                return Err(MinimizeError::InvalidMinterm { minterm: m, n_vars });
            }
        }
        for &m in &dont_cares {
            if maxterms.binary_search(&m).is_ok() {
                return Err(MinimizeError::Overlap { minterm: m });
            }
        }
        let ones: Vec<Minterm> = (0..limit as Minterm)
            .filter(|m| {
                maxterms.binary_search(m).is_err() && dont_cares.binary_search(m).is_err()
            })
            .collect();
        Self::new(n_vars, ones, dont_cares)
    }

    #[inline]
    pub fn n_vars(&self) -> u8 {
        self.n_vars
    }

    #[inline]
    pub fn ones(&self) -> &[Minterm] {
        &self.ones
    }

    #[inline]
    pub fn dont_cares(&self) -> &[Minterm] {
        &self.dont_cares
    }

    #[inline]
    pub fn universe_len(&self) -> u32 {
        1u32 << self.n_vars
    }

    /// The off-set, `[0, 2^n) \ ones \ dont_cares`. Computed once.
    pub fn zeros(&self) -> &[Minterm] {
        self.zeros.get_or_init(|| {
            (0..self.universe_len() as Minterm)
                .filter(|m| {
                    self.ones.binary_search(m).is_err()
                        && self.dont_cares.binary_search(m).is_err()
                })
                .collect()
        })
    }

    /// The complement function: on-set and off-set swapped, don't-cares
    /// unchanged. Minimizing the complement yields the POS form.
    pub fn complement(&self) -> Self {
        Self {
            n_vars: self.n_vars,
            ones: self.zeros().to_vec(),
            dont_cares: self.dont_cares.clone(),
            zeros: OnceCell::new(),
        }
    }

    #[inline]
    pub fn is_one(&self, m: Minterm) -> bool {
        self.ones.binary_search(&m).is_ok()
    }

    #[inline]
    pub fn is_dont_care(&self, m: Minterm) -> bool {
        self.dont_cares.binary_search(&m).is_ok()
    }
}

impl PartialEq for LogicFunction {
    fn eq(&self, other: &Self) -> bool {
        // The lazily-derived off-set is not part of the function identity.
        self.n_vars == other.n_vars
            && self.ones == other.ones
            && self.dont_cares == other.dont_cares
    }
}

impl Eq for LogicFunction {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation() {
        assert!(matches!(
            LogicFunction::new(1, [0], []),
            Err(MinimizeError::InvalidNumVars { n_vars: 1 })
        ));
        assert!(matches!(
            LogicFunction::new(16, [0], []),
            Err(MinimizeError::InvalidNumVars { n_vars: 16 })
        ));
        assert!(matches!(
            LogicFunction::new(3, [8], []),
            Err(MinimizeError::InvalidMinterm { minterm: 8, n_vars: 3 })
        ));
        assert!(matches!(
            LogicFunction::new(3, [1, 2], [5, 2]),
            Err(MinimizeError::Overlap { minterm: 2 })
        ));
    }

    #[test]
    fn test_normalization() {
        let f = LogicFunction::new(3, [5, 0, 5, 2], [7, 7]).unwrap();
        assert_eq!(f.ones(), &[0, 2, 5]);
        assert_eq!(f.dont_cares(), &[7]);
        assert_eq!(f.zeros(), &[1, 3, 4, 6]);
    }

    #[test]
    fn test_complement() {
        let f = LogicFunction::new(2, [0, 3], [1]).unwrap();
        let c = f.complement();
        assert_eq!(c.ones(), &[2]);
        assert_eq!(c.dont_cares(), &[1]);
        assert_eq!(c.zeros(), &[0, 3]);
    }

    #[test]
    fn test_from_maxterms() {
        let f = LogicFunction::from_maxterms(3, [0, 1], [4]).unwrap();
        assert_eq!(f.ones(), &[2, 3, 5, 6, 7]);
        assert_eq!(f.dont_cares(), &[4]);
        assert!(matches!(
            LogicFunction::from_maxterms(3, [0], [0]),
            Err(MinimizeError::Overlap { minterm: 0 })
        ));
    }
}
