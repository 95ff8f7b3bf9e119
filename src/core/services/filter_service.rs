//! Month and free-text filtering of the entry listing.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;

use crate::domain::Entry;
use crate::errors::ValidationError;

/// Restricts the listing to one `YYYY-MM` month, or shows everything.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MonthFilter {
    #[default]
    All,
    Month(String),
}

impl MonthFilter {
    /// Accepts `all` or a well-formed `YYYY-MM` month.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        if trimmed.eq_ignore_ascii_case("all") {
            return Ok(MonthFilter::All);
        }
        let well_formed = trimmed.len() == 7
            && NaiveDate::parse_from_str(&format!("{trimmed}-01"), "%Y-%m-%d").is_ok();
        if well_formed {
            Ok(MonthFilter::Month(trimmed.to_string()))
        } else {
            Err(ValidationError::InvalidMonth(trimmed.to_string()))
        }
    }

    pub fn matches(&self, entry: &Entry) -> bool {
        match self {
            MonthFilter::All => true,
            MonthFilter::Month(month) => entry.month_key() == *month,
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, MonthFilter::All)
    }
}

impl FromStr for MonthFilter {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl fmt::Display for MonthFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonthFilter::All => f.write_str("all"),
            MonthFilter::Month(month) => f.write_str(month),
        }
    }
}

/// Filter parameters supplied by the presentation layer on every render.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryFilter {
    pub month: MonthFilter,
    pub search: String,
}

impl EntryFilter {
    pub fn new(month: MonthFilter, search: impl Into<String>) -> Self {
        Self {
            month,
            search: search.into(),
        }
    }

    pub fn is_identity(&self) -> bool {
        self.month.is_all() && self.search.is_empty()
    }
}

pub struct FilterService;

impl FilterService {
    /// Entries in the selected month whose category or description contains the
    /// search text, ignoring case. Input order is preserved.
    pub fn filter<'a>(entries: &'a [Entry], filter: &EntryFilter) -> Vec<&'a Entry> {
        let needle = filter.search.to_lowercase();
        entries
            .iter()
            .filter(|entry| filter.month.matches(entry))
            .filter(|entry| matches_search(entry, &needle))
            .collect()
    }
}

fn matches_search(entry: &Entry, needle: &str) -> bool {
    needle.is_empty()
        || entry.category.to_lowercase().contains(needle)
        || entry.description.to_lowercase().contains(needle)
}
