// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Seed label vocabulary
//!
//! The hosted model owns the label set (five Good varieties, five matching
//! Bad varieties and one Impurity class). Labels are relayed verbatim; the
//! category below is only used to build summary counts and never rejects a
//! label the model returns.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Quality bucket a seed label falls into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedCategory {
    Good,
    Bad,
    Impurity,
    Unclassified,
}

impl SeedCategory {
    /// Classify a model label by keyword, case-insensitively
    pub fn from_label(label: &str) -> Self {
        let lowered = label.to_ascii_lowercase();
        let has_word = |word: &str| {
            lowered
                .split(|c: char| !c.is_ascii_alphanumeric())
                .any(|token| token == word)
        };

        if lowered.contains("impurit") {
            SeedCategory::Impurity
        } else if has_word("good") {
            SeedCategory::Good
        } else if has_word("bad") {
            SeedCategory::Bad
        } else {
            SeedCategory::Unclassified
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SeedCategory::Good => "good",
            SeedCategory::Bad => "bad",
            SeedCategory::Impurity => "impurity",
            SeedCategory::Unclassified => "unclassified",
        }
    }
}

impl fmt::Display for SeedCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-category detection counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub good: usize,
    pub bad: usize,
    pub impurity: usize,
    pub unclassified: usize,
}

impl CategorySummary {
    pub fn from_labels<'a>(labels: impl IntoIterator<Item = &'a str>) -> Self {
        let mut summary = Self::default();
        for label in labels {
            summary.record(SeedCategory::from_label(label));
        }
        summary
    }

    pub fn record(&mut self, category: SeedCategory) {
        match category {
            SeedCategory::Good => self.good += 1,
            SeedCategory::Bad => self.bad += 1,
            SeedCategory::Impurity => self.impurity += 1,
            SeedCategory::Unclassified => self.unclassified += 1,
        }
    }
}
