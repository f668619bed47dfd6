// Copyright (c) The kmap-min Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

/// Human-readable step trace, collected only when the caller asked for it.
#[derive(Debug, Default)]
pub(crate) struct StepTrace {
    enabled: bool,
    entries: Vec<String>,
}

impl StepTrace {
    pub(crate) fn new(enabled: bool) -> Self {
        Self {
            enabled,
            entries: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, entry: impl FnOnce() -> String) {
        if self.enabled {
            self.entries.push(entry());
        }
    }

    pub(crate) fn extend_prefixed(&mut self, prefix: &str, other: StepTrace) {
        if self.enabled {
            self.entries
                .extend(other.entries.into_iter().map(|e| format!("{}{}", prefix, e)));
        }
    }

    pub(crate) fn into_entries(self) -> Vec<String> {
        self.entries
    }
}
