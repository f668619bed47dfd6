// Copyright (c) The kmap-min Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::cube::Minterm;
use crate::minimize::MinimizationResult;
use std::fmt;

/// Errors reported by [`minimize`](crate::minimize::minimize) and by
/// [`LogicFunction`](crate::logic_function::LogicFunction) construction.
///
/// Errors are values: nothing inside the core retries, and partial results
/// are carried only by [`MinimizeError::Cancelled`].
#[derive(Debug, Clone, PartialEq)]
pub enum MinimizeError {
    /// The variable count is outside the supported `[2, 15]` range.
    InvalidNumVars { n_vars: u8 },
    /// A minterm index lies outside `[0, 2^n_vars)`.
    InvalidMinterm { minterm: Minterm, n_vars: u8 },
    /// A minterm was listed both as an on-point and as a don't-care.
    Overlap { minterm: Minterm },
    /// Chart construction found a required minterm no prime implicant
    /// covers. Structurally impossible for validated inputs.
    UncoverableMinterm { minterm: Minterm },
    /// The deadline expired or the token was signalled. `partial` holds the
    /// best (non-minimum) result assembled before the cut, if any.
    Cancelled {
        partial: Option<Box<MinimizationResult>>,
    },
    /// Assertion-class failure inside the solver.
    Internal { message: String },
}

impl fmt::Display for MinimizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MinimizeError::InvalidNumVars { n_vars } => {
                write!(f, "variable count {} is outside the supported range 2..=15", n_vars)
            }
            MinimizeError::InvalidMinterm { minterm, n_vars } => write!(
                f,
                "minterm {} does not fit in {} variables (limit {})",
                minterm,
                n_vars,
                1u32 << n_vars
            ),
            MinimizeError::Overlap { minterm } => {
                write!(f, "minterm {} appears in both the on-set and the don't-care set", minterm)
            }
            MinimizeError::UncoverableMinterm { minterm } => {
                write!(f, "no prime implicant covers required minterm {}", minterm)
            }
            MinimizeError::Cancelled { partial } => {
                if partial.is_some() {
                    write!(f, "minimization cancelled; a non-minimum partial result is available")
                } else {
                    write!(f, "minimization cancelled before any cover was found")
                }
            }
            MinimizeError::Internal { message } => {
                write!(f, "internal minimizer error: {}", message)
            }
        }
    }
}

impl std::error::Error for MinimizeError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = MinimizeError::InvalidNumVars { n_vars: 16 };
        assert_eq!(
            err.to_string(),
            "variable count 16 is outside the supported range 2..=15"
        );

        let err = MinimizeError::InvalidMinterm { minterm: 9, n_vars: 3 };
        assert_eq!(err.to_string(), "minterm 9 does not fit in 3 variables (limit 8)");

        let err = MinimizeError::Cancelled { partial: None };
        assert_eq!(
            err.to_string(),
            "minimization cancelled before any cover was found"
        );
    }
}
