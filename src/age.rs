//! Age calculation and the age buckets used by the fire-brigade indicators.

use chrono::{Datelike, Local, NaiveDate};
use std::ops::RangeInclusive;

/// Oldest age that is still counted in a bucket.
pub const MAX_AGE: i32 = 125;

/// Disjoint age buckets covering exactly `0..=MAX_AGE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgeCategory {
    /// 0-12
    Child,
    /// 13-69
    Adult,
    /// 70+
    Senior,
}

impl AgeCategory {
    /// All buckets in reporting order.
    pub const ALL: [AgeCategory; 3] = [AgeCategory::Child, AgeCategory::Adult, AgeCategory::Senior];

    pub fn label(&self) -> &'static str {
        match self {
            AgeCategory::Child => "0-12",
            AgeCategory::Adult => "13-69",
            AgeCategory::Senior => "70+",
        }
    }

    pub fn range(&self) -> RangeInclusive<i32> {
        match self {
            AgeCategory::Child => 0..=12,
            AgeCategory::Adult => 13..=69,
            AgeCategory::Senior => 70..=MAX_AGE,
        }
    }

    /// Children and seniors raise the warning level.
    pub fn is_vulnerable(&self) -> bool {
        matches!(self, AgeCategory::Child | AgeCategory::Senior)
    }

    /// First bucket containing `age`, `None` outside `0..=MAX_AGE`.
    pub fn of_age(age: i32) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|category| category.range().contains(&age))
    }
}

/// Whole calendar years between `birthdate` and `today`.
///
/// A birthday not yet reached this year does not count. Negative when the
/// birthdate lies in the future.
pub fn age_on(birthdate: NaiveDate, today: NaiveDate) -> i32 {
    let years = today.year() - birthdate.year();
    if (today.month(), today.day()) < (birthdate.month(), birthdate.day()) {
        years - 1
    } else {
        years
    }
}

/// Age as of the local calendar date.
pub fn current_age(birthdate: NaiveDate) -> i32 {
    age_on(birthdate, Local::now().date_naive())
}
