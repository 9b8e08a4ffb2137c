/*!
 * Post-conversion validation of citation cross-references.
 *
 * Cross-checks that every inline citation number in canonical-form text has
 * a matching reference definition and vice versa. Purely advisory: a
 * mismatch is reported as a warning annotation and never blocks a write.
 */

use std::collections::BTreeSet;

use crate::citation_format::unique_citation_numbers;

/// How many citation numbers a warning summary lists per set.
const PREVIEW_CAP: usize = 5;

/// Result of cross-checking inline markers against reference definitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    /// Cited inline but never defined — a defect the document author should fix.
    pub missing: BTreeSet<u32>,
    /// Defined but never cited — usually harmless.
    pub orphan: BTreeSet<u32>,
}

impl ValidationReport {
    /// True when every inline number has a definition and vice versa.
    pub fn is_clean(&self) -> bool {
        self.missing.is_empty() && self.orphan.is_empty()
    }

    /// Short warning text listing the first few numbers of each non-empty
    /// set, or `None` when the report is clean.
    pub fn warning_summary(&self) -> Option<String> {
        if self.is_clean() {
            return None;
        }

        let mut parts = Vec::new();
        if !self.missing.is_empty() {
            parts.push(format!("⚠ Missing refs: {:?}", preview(&self.missing)));
        }
        if !self.orphan.is_empty() {
            parts.push(format!("⚠ Orphan refs: {:?}", preview(&self.orphan)));
        }
        Some(parts.join(" | "))
    }
}

fn preview(numbers: &BTreeSet<u32>) -> Vec<u32> {
    numbers.iter().take(PREVIEW_CAP).copied().collect()
}

/// Validate canonical-form text: `missing` is the set of inline numbers
/// without a definition line, `orphan` the set of definition numbers never
/// cited inline.
pub fn validate_conversion(text: &str) -> ValidationReport {
    let (inline_numbers, ref_numbers) = unique_citation_numbers(text);
    ValidationReport {
        missing: inline_numbers.difference(&ref_numbers).copied().collect(),
        orphan: ref_numbers.difference(&inline_numbers).copied().collect(),
    }
}
