use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::domain::{Entry, EntryKind};

/// Income, expense and their signed difference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Totals {
    pub income: f64,
    pub expense: f64,
    pub balance: f64,
}

/// Summed expense amount for one category label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub amount: f64,
}

/// A category total together with its share of all expenses, in percent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    pub category: String,
    pub amount: f64,
    pub percent: f64,
}

pub struct SummaryService;

impl SummaryService {
    pub fn totals(entries: &[Entry]) -> Totals {
        let (income, expense) =
            entries
                .iter()
                .fold((0.0, 0.0), |(income, expense), entry| match entry.kind {
                    EntryKind::Income => (income + entry.amount, expense),
                    EntryKind::Expense => (income, expense + entry.amount),
                });
        Totals {
            income,
            expense,
            balance: income - expense,
        }
    }

    /// Expense totals per exact category label, in order of first appearance.
    pub fn category_totals(entries: &[Entry]) -> Vec<CategoryTotal> {
        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut totals: Vec<CategoryTotal> = Vec::new();
        for entry in entries.iter().filter(|entry| entry.is_expense()) {
            match index.get(entry.category.as_str()) {
                Some(&slot) => totals[slot].amount += entry.amount,
                None => {
                    index.insert(entry.category.as_str(), totals.len());
                    totals.push(CategoryTotal {
                        category: entry.category.clone(),
                        amount: entry.amount,
                    });
                }
            }
        }
        totals
    }

    pub fn category_shares(entries: &[Entry]) -> Vec<CategoryShare> {
        let totals = Self::category_totals(entries);
        let overall: f64 = totals.iter().map(|total| total.amount).sum();
        totals
            .into_iter()
            .map(|total| CategoryShare {
                percent: if overall > 0.0 {
                    total.amount / overall * 100.0
                } else {
                    0.0
                },
                category: total.category,
                amount: total.amount,
            })
            .collect()
    }

    /// Distinct `YYYY-MM` months, in order of first appearance.
    pub fn distinct_months(entries: &[Entry]) -> Vec<String> {
        let mut seen = HashSet::new();
        entries
            .iter()
            .map(Entry::month_key)
            .filter(|month| seen.insert(month.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EntryDraft, EntryId};
    use chrono::NaiveDate;

    fn entry(kind: EntryKind, amount: f64, category: &str, date: (i32, u32, u32)) -> Entry {
        let date = NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap();
        EntryDraft::new(kind, amount, category, date).into_entry(EntryId::generate())
    }

    #[test]
    fn empty_collection_has_zero_totals() {
        assert_eq!(SummaryService::totals(&[]), Totals::default());
        assert!(SummaryService::category_totals(&[]).is_empty());
        assert!(SummaryService::distinct_months(&[]).is_empty());
    }

    #[test]
    fn balance_can_go_negative() {
        let entries = vec![
            entry(EntryKind::Income, 100.0, "Gift", (2024, 1, 1)),
            entry(EntryKind::Expense, 250.0, "Rent", (2024, 1, 2)),
        ];
        let totals = SummaryService::totals(&entries);
        assert_eq!(totals.balance, -150.0);
        assert_eq!(totals.balance, totals.income - totals.expense);
    }

    #[test]
    fn category_totals_skip_income_and_keep_first_seen_order() {
        let entries = vec![
            entry(EntryKind::Expense, 10.0, "Transport", (2024, 1, 1)),
            entry(EntryKind::Income, 500.0, "Food", (2024, 1, 1)),
            entry(EntryKind::Expense, 5.0, "Food", (2024, 1, 2)),
            entry(EntryKind::Expense, 2.5, "Transport", (2024, 1, 3)),
            entry(EntryKind::Expense, 1.0, "food", (2024, 1, 3)),
        ];
        let totals = SummaryService::category_totals(&entries);
        let pairs: Vec<(&str, f64)> = totals
            .iter()
            .map(|t| (t.category.as_str(), t.amount))
            .collect();
        assert_eq!(pairs, vec![("Transport", 12.5), ("Food", 5.0), ("food", 1.0)]);
    }

    #[test]
    fn category_shares_sum_to_one_hundred() {
        let entries = vec![
            entry(EntryKind::Expense, 75.0, "Rent", (2024, 1, 1)),
            entry(EntryKind::Expense, 25.0, "Food", (2024, 1, 2)),
        ];
        let shares = SummaryService::category_shares(&entries);
        assert_eq!(shares[0].percent, 75.0);
        assert_eq!(shares[1].percent, 25.0);
    }

    #[test]
    fn distinct_months_collapse_duplicates_in_first_seen_order() {
        let entries = vec![
            entry(EntryKind::Expense, 1.0, "a", (2024, 3, 9)),
            entry(EntryKind::Expense, 1.0, "a", (2024, 1, 9)),
            entry(EntryKind::Expense, 1.0, "a", (2024, 3, 1)),
        ];
        assert_eq!(
            SummaryService::distinct_months(&entries),
            vec!["2024-03".to_string(), "2024-01".to_string()]
        );
    }
}
