// Copyright (c) The kmap-min Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Exact two-level minimization of Boolean functions.
//!
//! Given a function of 2 to 15 variables as on-set minterms plus optional
//! don't-care points, [`minimize`] returns the minimum-literal
//! Sum-of-Products and Product-of-Sums covers, every prime implicant with
//! essentiality marks, K-map grouping annotations, a step trace, and stage
//! telemetry. Prime implicants come from bit-sliced adjacency merging over
//! `(value, mask)` cube words; the cover is found exactly by essential
//! extraction, dominance reductions, and branch-and-bound over the cyclic
//! core.
//!
//! ```
//! use kmap_min::{minimize, LogicFunction, MinimizeOptions};
//!
//! let function = LogicFunction::new(3, [0, 2, 5, 7], []).unwrap();
//! let result = minimize(&function, &MinimizeOptions::default()).unwrap();
//! assert_eq!(result.minimal_sop, "A'C' + AC");
//! ```

pub mod cancel;
mod chart;
mod cover;
pub mod cube;
pub mod errors;
pub mod logic_function;
pub mod minimize;
pub mod primes;
pub mod render;
mod trace;

#[cfg(any(test, feature = "proptest-helpers"))]
pub mod proptest_helpers;

pub use cancel::CancelToken;
pub use cube::{Cube, Minterm, Polarity, MAX_VARS};
pub use errors::MinimizeError;
pub use logic_function::{LogicFunction, MIN_VARS};
pub use minimize::{
    minimize, minimize_with_token, MinimizationResult, MinimizeOptions, OptimizationLevel,
    StageCounts, StageTimings, DEFAULT_OUTPUT_NAME, DEFAULT_VARIABLE_NAMES,
};
pub use primes::PrimeImplicant;
pub use render::KmapGroup;
