// Copyright (c) The kmap-min Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

pub(crate) mod bitset;
mod branch_bound;
mod solve_impl;

pub(crate) use solve_impl::*;
