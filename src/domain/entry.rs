use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::Displayable;
use crate::errors::ValidationError;

/// Date layout used for entry dates on disk and in the shell.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
/// Year-month prefix layout used by month filters.
pub const MONTH_FORMAT: &str = "%Y-%m";

/// Opaque identifier assigned to an entry when it is created.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct EntryId(String);

impl EntryId {
    /// Mints a fresh identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First eight characters, enough to address an entry from the shell.
    pub fn short(&self) -> &str {
        match self.0.char_indices().nth(8) {
            Some((idx, _)) => &self.0[..idx],
            None => &self.0,
        }
    }
}

impl From<String> for EntryId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for EntryId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Income,
    Expense,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Income => "income",
            EntryKind::Expense => "expense",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EntryKind::Income => "Income",
            EntryKind::Expense => "Expense",
        }
    }
}

impl FromStr for EntryKind {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "income" | "in" | "+" => Ok(EntryKind::Income),
            "expense" | "out" | "-" => Ok(EntryKind::Expense),
            other => Err(ValidationError::UnknownKind(other.to_string())),
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single income or expense record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Entry {
    pub id: EntryId,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub amount: f64,
    pub category: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub description: String,
}

impl Entry {
    /// `YYYY-MM` key of the entry's date.
    pub fn month_key(&self) -> String {
        self.date.format(MONTH_FORMAT).to_string()
    }

    pub fn description(&self) -> Option<&str> {
        if self.description.is_empty() {
            None
        } else {
            Some(&self.description)
        }
    }

    pub fn is_income(&self) -> bool {
        self.kind == EntryKind::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind == EntryKind::Expense
    }

    /// Overwrites every mutable field with the draft's values. The id is untouched.
    pub(crate) fn apply(&mut self, draft: EntryDraft) {
        self.kind = draft.kind;
        self.amount = draft.amount;
        self.category = draft.category;
        self.date = draft.date;
        self.description = draft.description;
    }
}

impl Displayable for Entry {
    fn display_label(&self) -> String {
        format!(
            "{} {} {:.2} ({})",
            self.date.format(DATE_FORMAT),
            self.kind,
            self.amount,
            self.category
        )
    }
}

/// Candidate entry fields as supplied by the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryDraft {
    pub kind: EntryKind,
    pub amount: f64,
    pub category: String,
    pub date: NaiveDate,
    pub description: String,
}

impl EntryDraft {
    pub fn new(kind: EntryKind, amount: f64, category: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            kind,
            amount,
            category: category.into(),
            date,
            description: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Builds a draft from raw text fields.
    pub fn parse(
        kind: &str,
        amount: &str,
        category: &str,
        date: &str,
        description: &str,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            kind: kind.parse()?,
            amount: parse_amount(amount)?,
            category: category.to_string(),
            date: parse_date(date)?,
            description: description.to_string(),
        })
    }

    /// Prefills a draft with an existing entry's fields, for editing.
    pub fn from_entry(entry: &Entry) -> Self {
        Self {
            kind: entry.kind,
            amount: entry.amount,
            category: entry.category.clone(),
            date: entry.date,
            description: entry.description.clone(),
        }
    }

    /// Trims free-text fields and checks the entry invariants.
    pub fn validated(mut self) -> Result<Self, ValidationError> {
        if !self.amount.is_finite() {
            return Err(ValidationError::InvalidAmount(self.amount.to_string()));
        }
        if self.amount <= 0.0 {
            return Err(ValidationError::NonPositiveAmount);
        }
        self.category = self.category.trim().to_string();
        if self.category.is_empty() {
            return Err(ValidationError::EmptyCategory);
        }
        self.description = self.description.trim().to_string();
        Ok(self)
    }

    pub(crate) fn into_entry(self, id: EntryId) -> Entry {
        Entry {
            id,
            kind: self.kind,
            amount: self.amount,
            category: self.category,
            date: self.date,
            description: self.description,
        }
    }
}

pub fn parse_amount(raw: &str) -> Result<f64, ValidationError> {
    let trimmed = raw.trim();
    let value: f64 = trimmed
        .parse()
        .map_err(|_| ValidationError::InvalidAmount(trimmed.to_string()))?;
    if !value.is_finite() {
        return Err(ValidationError::InvalidAmount(trimmed.to_string()));
    }
    Ok(value)
}

pub fn parse_date(raw: &str) -> Result<NaiveDate, ValidationError> {
    let trimmed = raw.trim();
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .map_err(|_| ValidationError::InvalidDate(trimmed.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn entry_serializes_with_original_field_names() {
        let entry = EntryDraft::new(EntryKind::Expense, 300.0, "Food", date(2024, 1, 10))
            .with_description("groceries")
            .into_entry(EntryId::from("id1704844800000"));
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["id"], "id1704844800000");
        assert_eq!(json["type"], "expense");
        assert_eq!(json["amount"], 300.0);
        assert_eq!(json["category"], "Food");
        assert_eq!(json["date"], "2024-01-10");
        assert_eq!(json["description"], "groceries");
    }

    #[test]
    fn entry_without_description_field_loads_as_empty() {
        let raw = r#"{"id":"a","type":"income","amount":10,"category":"Gift","date":"2024-03-01"}"#;
        let entry: Entry = serde_json::from_str(raw).unwrap();
        assert_eq!(entry.description(), None);
        assert_eq!(entry.month_key(), "2024-03");
    }

    #[test]
    fn validated_trims_text_fields() {
        let draft = EntryDraft::new(EntryKind::Income, 5.0, "  Salary ", date(2024, 1, 1))
            .with_description(" bonus  ")
            .validated()
            .unwrap();
        assert_eq!(draft.category, "Salary");
        assert_eq!(draft.description, "bonus");
    }

    #[test]
    fn validated_rejects_non_positive_amounts_and_blank_categories() {
        let zero = EntryDraft::new(EntryKind::Expense, 0.0, "Food", date(2024, 1, 1));
        assert_eq!(zero.validated(), Err(ValidationError::NonPositiveAmount));

        let negative = EntryDraft::new(EntryKind::Expense, -4.0, "Food", date(2024, 1, 1));
        assert_eq!(negative.validated(), Err(ValidationError::NonPositiveAmount));

        let blank = EntryDraft::new(EntryKind::Expense, 4.0, "   ", date(2024, 1, 1));
        assert_eq!(blank.validated(), Err(ValidationError::EmptyCategory));
    }

    #[test]
    fn parse_reports_malformed_fields() {
        assert!(matches!(
            EntryDraft::parse("loan", "1", "x", "2024-01-01", ""),
            Err(ValidationError::UnknownKind(_))
        ));
        assert!(matches!(
            EntryDraft::parse("income", "ten", "x", "2024-01-01", ""),
            Err(ValidationError::InvalidAmount(_))
        ));
        assert!(matches!(
            EntryDraft::parse("income", "10", "x", "2024-13-01", ""),
            Err(ValidationError::InvalidDate(_))
        ));
    }

    #[test]
    fn short_id_keeps_whole_id_when_shorter_than_eight() {
        assert_eq!(EntryId::from("abc").short(), "abc");
        assert_eq!(EntryId::from("0123456789").short(), "01234567");
    }
}
