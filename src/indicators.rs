//! Derives the fire-brigade indicators from the ages of the residents of
//! one address.
//!
//! - "vulnerable persons" is always produced: level 2 when anyone aged 0-12
//!   or 70+ is registered, level 3 otherwise.
//! - "number of persons" is added at level 2 once [`HEADCOUNT_THRESHOLD`]
//!   or more residents are registered.

use crate::age::AgeCategory;
use crate::models::{Indicator, IndicatorKind, WarningLevel};

/// Number of registered residents from which the headcount indicator is added.
pub const HEADCOUNT_THRESHOLD: usize = 10;

/// Residents per age bucket plus the overall headcount.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgeTally {
    counts: [usize; 3],
    total: usize,
}

impl AgeTally {
    /// Ages outside every bucket still count towards `total`.
    pub fn from_ages(ages: &[i32]) -> Self {
        let mut tally = Self {
            total: ages.len(),
            ..Self::default()
        };
        for category in ages.iter().filter_map(|age| AgeCategory::of_age(*age)) {
            tally.counts[Self::slot(category)] += 1;
        }
        tally
    }

    fn slot(category: AgeCategory) -> usize {
        match category {
            AgeCategory::Child => 0,
            AgeCategory::Adult => 1,
            AgeCategory::Senior => 2,
        }
    }

    pub fn count(&self, category: AgeCategory) -> usize {
        self.counts[Self::slot(category)]
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn has_vulnerable(&self) -> bool {
        AgeCategory::ALL
            .iter()
            .any(|category| category.is_vulnerable() && self.count(*category) > 0)
    }

    /// `Registered: 0-12: x, 13-69: y, 70+: z.`
    pub fn detail(&self) -> String {
        let parts: Vec<String> = AgeCategory::ALL
            .iter()
            .map(|category| format!("{}: {}", category.label(), self.count(*category)))
            .collect();
        format!("Registered: {}.", parts.join(", "))
    }
}

/// Indicators for one address, vulnerable-persons first.
pub fn indicators(ages: &[i32]) -> Vec<Indicator> {
    let tally = AgeTally::from_ages(ages);
    let detail = tally.detail();

    let level = if tally.has_vulnerable() {
        WarningLevel::High
    } else {
        WarningLevel::Normal
    };

    let mut indicators = vec![Indicator {
        level,
        kind: IndicatorKind::VulnerablePersons,
        label: "age".to_string(),
        detail: detail.clone(),
    }];

    if tally.total() >= HEADCOUNT_THRESHOLD {
        indicators.push(Indicator {
            level: WarningLevel::High,
            kind: IndicatorKind::NumberOfPersons,
            label: format!("{} registered", tally.total()),
            detail,
        });
    }

    indicators
}
