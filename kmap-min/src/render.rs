// Copyright (c) The kmap-min Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::cube::{Cube, Minterm, Polarity};
use crate::logic_function::LogicFunction;
use crate::primes::PrimeImplicant;
use itertools::Itertools;

/// One selected cube's cells for the K-map visualizer, with a stable color
/// slot assigned by enumeration order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KmapGroup {
    /// Sorted on-minterms of the group.
    pub cells: Vec<Minterm>,
    pub color_index: u8,
}

/// Renders a selected SOP cover. Callers pass cubes already in canonical
/// `(mask, value)` order.
pub(crate) fn sop_expression(selected: &[Cube], n_vars: u8, names: &[String]) -> String {
    if selected.is_empty() {
        return "0".to_string();
    }
    if selected.iter().any(|c| c.is_universe(n_vars)) {
        return "1".to_string();
    }
    selected
        .iter()
        .map(|c| c.algebraic_display(n_vars, names, Polarity::Sop))
        .join(" + ")
}

/// Renders the POS cover from the complement function's selected cubes:
/// every cube dualizes into a parenthesized sum of negated literals.
pub(crate) fn pos_expression(complement_selected: &[Cube], n_vars: u8, names: &[String]) -> String {
    if complement_selected.is_empty() {
        // The complement is never true, so the function is a tautology.
        return "1".to_string();
    }
    if complement_selected.iter().any(|c| c.is_universe(n_vars)) {
        return "0".to_string();
    }
    complement_selected
        .iter()
        .map(|c| format!("({})", c.algebraic_display(n_vars, names, Polarity::Pos)))
        .collect()
}

/// `Σm(...)` listing the on-set, with don't-cares appended as `+ d(...)`.
pub(crate) fn canonical_sop(function: &LogicFunction) -> String {
    if function.ones().is_empty() {
        return "0".to_string();
    }
    let mut out = format!("Σm({})", function.ones().iter().join(", "));
    if !function.dont_cares().is_empty() {
        out.push_str(&format!(" + d({})", function.dont_cares().iter().join(", ")));
    }
    out
}

/// `ΠM(...)` listing the off-set, with don't-cares appended as `+ d(...)`.
pub(crate) fn canonical_pos(function: &LogicFunction) -> String {
    if function.zeros().is_empty() {
        return "1".to_string();
    }
    let mut out = format!("ΠM({})", function.zeros().iter().join(", "));
    if !function.dont_cares().is_empty() {
        out.push_str(&format!(" + d({})", function.dont_cares().iter().join(", ")));
    }
    out
}

/// One group per selected prime, in the given (canonical) order.
pub(crate) fn kmap_groups(selected: &[&PrimeImplicant]) -> Vec<KmapGroup> {
    selected
        .iter()
        .enumerate()
        .map(|(ix, pi)| KmapGroup {
            cells: pi.covers.clone(),
            color_index: (ix % 256) as u8,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_sop_expression() {
        let vars = names(&["A", "B", "C"]);
        let selected = [
            Cube { value: 0b000, mask: 0b010 },
            Cube { value: 0b101, mask: 0b010 },
        ];
        assert_eq!(sop_expression(&selected, 3, &vars), "A'C' + AC");
        assert_eq!(sop_expression(&[], 3, &vars), "0");
        assert_eq!(sop_expression(&[Cube::universe(3)], 3, &vars), "1");
    }

    #[test]
    fn test_pos_expression() {
        let vars = names(&["A", "B", "C"]);
        // Complement cover {AB', C'} dualizes to (A' + B)(C).
        let selected = [
            Cube { value: 0b100, mask: 0b001 },
            Cube { value: 0b000, mask: 0b110 },
        ];
        assert_eq!(pos_expression(&selected, 3, &vars), "(A' + B)(C)");
        assert_eq!(pos_expression(&[], 3, &vars), "1");
        assert_eq!(pos_expression(&[Cube::universe(3)], 3, &vars), "0");
    }

    #[test]
    fn test_canonical_forms() {
        let f = LogicFunction::new(3, [1, 3, 7], [0, 2]).unwrap();
        assert_eq!(canonical_sop(&f), "Σm(1, 3, 7) + d(0, 2)");
        assert_eq!(canonical_pos(&f), "ΠM(4, 5, 6) + d(0, 2)");

        let empty = LogicFunction::new(2, [], []).unwrap();
        assert_eq!(canonical_sop(&empty), "0");

        let full = LogicFunction::new(2, [0, 1, 2, 3], []).unwrap();
        assert_eq!(canonical_pos(&full), "1");
    }

    #[test]
    fn test_kmap_groups() {
        let pis = vec![
            PrimeImplicant {
                cube: Cube { value: 0, mask: 0b010 },
                covers: vec![0, 2],
                essential: true,
            },
            PrimeImplicant {
                cube: Cube { value: 0b101, mask: 0b010 },
                covers: vec![5, 7],
                essential: true,
            },
        ];
        let groups = kmap_groups(&pis.iter().collect::<Vec<_>>());
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].cells, vec![0, 2]);
        assert_eq!(groups[0].color_index, 0);
        assert_eq!(groups[1].color_index, 1);
    }
}
