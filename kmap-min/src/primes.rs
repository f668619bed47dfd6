// Copyright (c) The kmap-min Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::cancel::CancelToken;
use crate::cube::{Cube, Minterm};
use crate::errors::MinimizeError;
use crate::logic_function::LogicFunction;
use crate::trace::StepTrace;
use itertools::Itertools;
use log::debug;
use std::collections::{btree_map::Entry, BTreeMap, BTreeSet};

/// A maximal implicant of the function, together with the on-minterms it
/// covers. Don't-care points fuel merging but are never tracked here.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrimeImplicant {
    pub cube: Cube,
    /// Sorted on-minterms inside the cube.
    pub covers: Vec<Minterm>,
    /// True iff this is the only prime covering some required minterm.
    /// Assigned during chart construction.
    pub essential: bool,
}

impl PrimeImplicant {
    #[inline]
    pub(crate) fn literal_count(&self, n_vars: u8) -> u32 {
        self.cube.literal_count(n_vars)
    }
}

#[derive(Debug)]
pub(crate) struct PrimeGeneration {
    pub primes: Vec<PrimeImplicant>,
    /// Number of merge rounds that produced at least one cube.
    pub generations: usize,
}

#[inline]
fn cube_from_id(id: u32) -> Cube {
    Cube {
        value: (id & 0xffff) as u16,
        mask: (id >> 16) as u16,
    }
}

fn union_covers(a: &[Minterm], b: &[Minterm]) -> Vec<Minterm> {
    itertools::merge(a.iter().copied(), b.iter().copied())
        .dedup()
        .collect()
}

/// Generates every prime implicant of `function` by iterated adjacency
/// merging over truth-space cubes.
///
/// Cubes are bucketed by `(mask, popcount(value))`; only identical-mask
/// cubes whose value popcounts differ by one can be adjacent. Results are
/// deduplicated through their canonical `(mask, value)` identity, carrying
/// the union of their parents' on-minterm covers. A cube left unmerged by a
/// round is prime. Primes that cover only don't-care points are dropped.
pub(crate) fn prime_implicants(
    function: &LogicFunction,
    cancel: &CancelToken,
    trace: &mut StepTrace,
) -> Result<PrimeGeneration, MinimizeError> {
    // Generation zero: one 0-cube per on-point or don't-care point.
    let mut current: BTreeMap<u32, Vec<Minterm>> = BTreeMap::new();
    for &m in function.ones() {
        current.insert(Cube::minterm(m).id(), vec![m]);
    }
    for &m in function.dont_cares() {
        current.insert(Cube::minterm(m).id(), Vec::new());
    }

    trace.push(|| {
        let groups = current
            .keys()
            .map(|&id| cube_from_id(id).value.count_ones())
            .sorted_unstable()
            .dedup()
            .count();
        format!("Initial grouping by popcount: {} groups", groups)
    });

    let mut primes: Vec<PrimeImplicant> = Vec::new();
    let mut generations = 0usize;

    while !current.is_empty() {
        if cancel.is_cancelled() {
            return Err(MinimizeError::Cancelled { partial: None });
        }

        // Bucket the generation; BTreeMap keeps every scan order stable.
        let mut buckets: BTreeMap<(u16, u32), Vec<u32>> = BTreeMap::new();
        for &id in current.keys() {
            let cube = cube_from_id(id);
            buckets
                .entry((cube.mask, cube.value.count_ones()))
                .or_default()
                .push(id);
        }

        let mut next: BTreeMap<u32, Vec<Minterm>> = BTreeMap::new();
        let mut merged: BTreeSet<u32> = BTreeSet::new();

        for (&(mask, ones_count), lower) in &buckets {
            let Some(upper) = buckets.get(&(mask, ones_count + 1)) else {
                continue;
            };
            for &a_id in lower {
                let a = cube_from_id(a_id);
                for &b_id in upper {
                    let b = cube_from_id(b_id);
                    let Some(child) = a.merge(&b) else {
                        continue;
                    };
                    merged.insert(a_id);
                    merged.insert(b_id);
                    let covers = union_covers(&current[&a_id], &current[&b_id]);
                    match next.entry(child.id()) {
                        Entry::Occupied(mut entry) => {
                            let unioned = union_covers(entry.get(), &covers);
                            entry.insert(unioned);
                        }
                        Entry::Vacant(entry) => {
                            entry.insert(covers);
                        }
                    }
                }
            }
        }

        for (&id, covers) in &current {
            if !merged.contains(&id) && !covers.is_empty() {
                primes.push(PrimeImplicant {
                    cube: cube_from_id(id),
                    covers: covers.clone(),
                    essential: false,
                });
            }
        }

        if !next.is_empty() {
            generations += 1;
            debug!(
                "prime generation {}: {} cubes, {} primes so far",
                generations,
                next.len(),
                primes.len()
            );
            trace.push(|| format!("Iteration {}: Created {} new implicants", generations, next.len()));
        }
        current = next;
    }

    primes.sort_unstable_by_key(|pi| pi.cube.id());
    trace.push(|| format!("Found {} prime implicants using bit-slicing", primes.len()));

    Ok(PrimeGeneration { primes, generations })
}
