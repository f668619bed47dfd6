// Copyright (c) The kmap-min Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::cube::Minterm;
use crate::logic_function::LogicFunction;
use proptest::prelude::*;

impl Arbitrary for LogicFunction {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        // Small oracle-checkable spaces: pick n, then a three-way partition
        // of the universe into off / on / don't-care points.
        (2u8..=6)
            .prop_flat_map(|n_vars| {
                let universe = 1usize << n_vars;
                prop::collection::vec(0u8..3, universe).prop_map(move |kinds| {
                    let ones = kinds
                        .iter()
                        .enumerate()
                        .filter_map(|(m, &kind)| (kind == 1).then(|| m as Minterm))
                        .collect::<Vec<_>>();
                    let dont_cares = kinds
                        .iter()
                        .enumerate()
                        .filter_map(|(m, &kind)| (kind == 2).then(|| m as Minterm))
                        .collect::<Vec<_>>();
                    LogicFunction::new(n_vars, ones, dont_cares)
                        .expect("generated points are in range and disjoint")
                })
            })
            .boxed()
    }
}
