//! In-memory index over a company's raw fact set.

use crate::fact::{Fact, FormType};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// An in-memory index over one company's XBRL facts, keyed by concept tag.
///
/// Built once per fetch and read-only thereafter; it may be shared freely
/// across threads. Lookups never fail — an unknown tag yields an empty
/// slice, which downstream resolution treats as a normal outcome.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FactStore {
    by_tag: HashMap<String, Vec<Fact>>,
    total: usize,
}

impl FactStore {
    /// Build the index from a raw fact feed.
    ///
    /// Malformed facts (empty concept tag, non-finite value) are dropped
    /// here rather than aborting the whole build. Each tag's series is
    /// ordered by period end descending, then filed date descending, so
    /// the most recent occurrence is always first.
    pub fn index(facts: impl IntoIterator<Item = Fact>) -> Self {
        let mut by_tag: HashMap<String, Vec<Fact>> = HashMap::new();
        let mut total = 0usize;

        for fact in facts {
            if fact.tag.is_empty() || !fact.value.is_finite() {
                log::debug!("dropping malformed fact: {:?}", fact.tag);
                continue;
            }
            by_tag.entry(fact.tag.clone()).or_default().push(fact);
            total += 1;
        }

        for series in by_tag.values_mut() {
            series.sort_by(|a, b| {
                b.period
                    .end()
                    .cmp(&a.period.end())
                    .then(b.filed.cmp(&a.filed))
            });
        }

        Self { by_tag, total }
    }

    /// All facts reported under a concept tag, most recent first.
    pub fn lookup(&self, tag: &str) -> &[Fact] {
        self.by_tag.get(tag).map_or(&[], Vec::as_slice)
    }

    /// Facts under `tag` plausible for the given fiscal year and report type.
    ///
    /// Filters to facts filed under the matching form whose fiscal-year
    /// attribution equals the target. Duplicates (comparatives and
    /// restatements) survive this filter deliberately — choosing among
    /// them is the period selector's job.
    pub fn lookup_in_window(&self, tag: &str, fiscal_year: i32, form: FormType) -> Vec<&Fact> {
        self.lookup(tag)
            .iter()
            .filter(|f| f.form == Some(form) && f.fiscal_year_or_end_year() == fiscal_year)
            .collect()
    }

    /// Total number of indexed facts.
    pub const fn len(&self) -> usize {
        self.total
    }

    /// Returns true if the index holds no facts at all.
    pub const fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Number of distinct concept tags in the index.
    pub fn tag_count(&self) -> usize {
        self.by_tag.len()
    }
}
