//! Printable report of the full, unfiltered entry list.

pub mod table;

use std::{fs, io, path::Path};

use chrono::NaiveDate;
use thiserror::Error;

use crate::core::services::{SummaryService, Totals};
use crate::core::utils::ensure_dir;
use crate::currency::MoneyFormat;
use crate::domain::entry::DATE_FORMAT;
use crate::domain::Entry;

use table::{Table, TableColumn};

/// Placeholder shown for empty cells.
pub const EMPTY_CELL: &str = "—";
pub const REPORT_HEADERS: [&str; 5] = ["Type", "Amount", "Category", "Date", "Description"];

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Text,
    Csv,
}

impl ReportFormat {
    /// `.csv` paths export CSV; anything else gets the text document.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => ReportFormat::Csv,
            _ => ReportFormat::Text,
        }
    }
}

/// Snapshot of the entries and totals, ready to be written out.
#[derive(Debug, Clone)]
pub struct Report<'a> {
    pub title: String,
    pub generated_on: NaiveDate,
    pub entries: &'a [Entry],
    pub totals: Totals,
    money: MoneyFormat,
}

impl<'a> Report<'a> {
    pub fn build(
        title: impl Into<String>,
        entries: &'a [Entry],
        money: MoneyFormat,
        generated_on: NaiveDate,
    ) -> Self {
        Self {
            title: title.into(),
            generated_on,
            entries,
            totals: SummaryService::totals(entries),
            money,
        }
    }

    /// One display row per entry, empty text replaced by [`EMPTY_CELL`].
    pub fn rows(&self) -> Vec<Vec<String>> {
        self.entries
            .iter()
            .map(|entry| {
                vec![
                    entry.kind.label().to_string(),
                    self.money.format(entry.amount),
                    or_placeholder(&entry.category),
                    entry.date.format(DATE_FORMAT).to_string(),
                    or_placeholder(&entry.description),
                ]
            })
            .collect()
    }

    pub fn render_text(&self) -> String {
        let mut table = Table::new(vec![
            TableColumn::left(REPORT_HEADERS[0]),
            TableColumn::right(REPORT_HEADERS[1]),
            TableColumn::left(REPORT_HEADERS[2]),
            TableColumn::left(REPORT_HEADERS[3]),
            TableColumn::left(REPORT_HEADERS[4]).max_width(48),
        ]);
        for row in self.rows() {
            table.push_row(row);
        }

        let mut out = String::new();
        out.push_str(&self.title);
        out.push('\n');
        out.push_str(&"=".repeat(self.title.chars().count()));
        out.push_str(&format!(
            "\nGenerated: {}\n\n",
            self.generated_on.format(DATE_FORMAT)
        ));
        if self.entries.is_empty() {
            out.push_str("No entries\n");
        } else {
            out.push_str(&table.render());
            out.push('\n');
        }
        out.push_str(&format!(
            "\nIncome:  {}\nExpense: {}\nBalance: {}\n",
            self.money.format(self.totals.income),
            self.money.format(self.totals.expense),
            self.money.format(self.totals.balance)
        ));
        out
    }

    /// Raw machine-readable values, one record per entry.
    pub fn render_csv(&self) -> Result<String, ReportError> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(["id", "type", "amount", "category", "date", "description"])?;
        for entry in self.entries {
            let amount = format!("{:.2}", entry.amount);
            let date = entry.date.format(DATE_FORMAT).to_string();
            writer.write_record([
                entry.id.as_str(),
                entry.kind.as_str(),
                amount.as_str(),
                entry.category.as_str(),
                date.as_str(),
                entry.description.as_str(),
            ])?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|err| ReportError::Io(err.into_error()))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    pub fn write(&self, path: &Path, format: ReportFormat) -> Result<(), ReportError> {
        let contents = match format {
            ReportFormat::Text => self.render_text(),
            ReportFormat::Csv => self.render_csv()?,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            ensure_dir(parent)?;
        }
        fs::write(path, contents)?;
        Ok(())
    }
}

fn or_placeholder(text: &str) -> String {
    if text.trim().is_empty() {
        EMPTY_CELL.to_string()
    } else {
        text.to_string()
    }
}
