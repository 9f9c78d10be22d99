//! # Expense Summaries
//!
//! Pure aggregation behind the expense chart screen. The chart widget itself
//! lives in the UI; this module only produces the numbers it draws.

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ts_rs::TS;

use crate::money::Money;
use crate::types::Expense;

/// One slice of the expense chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CategoryTotal {
    pub category: String,
    pub total: Money,
    pub count: usize,
    /// Share of the overall total in basis points (10000 = 100%), floored.
    pub share_bps: u32,
}

/// Groups expenses by category.
///
/// Sorted by total descending, ties broken by category name so the chart
/// legend is stable between renders. Expenses with a blank category are
/// grouped under "기타".
pub fn summarize_by_category(expenses: &[Expense]) -> Vec<CategoryTotal> {
    let mut groups: BTreeMap<String, (Money, usize)> = BTreeMap::new();
    for expense in expenses {
        let category = match expense.category.trim() {
            "" => "기타".to_string(),
            name => name.to_string(),
        };
        let entry = groups.entry(category).or_insert((Money::zero(), 0));
        entry.0 = entry.0.saturating_add(expense.amount.clamp_non_negative());
        entry.1 += 1;
    }

    let grand_total: Money = groups.values().map(|(total, _)| *total).sum();

    let mut totals: Vec<CategoryTotal> = groups
        .into_iter()
        .map(|(category, (total, count))| CategoryTotal {
            share_bps: share_bps(total, grand_total),
            category,
            total,
            count,
        })
        .collect();

    totals.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.category.cmp(&b.category)));
    totals
}

/// Total spent in the given calendar month.
pub fn monthly_total(expenses: &[Expense], year: i32, month: u32) -> Money {
    expenses
        .iter()
        .filter(|e| e.expense_date.year() == year && e.expense_date.month() == month)
        .map(|e| e.amount.clamp_non_negative())
        .sum()
}

fn share_bps(part: Money, whole: Money) -> u32 {
    if !whole.is_positive() {
        return 0;
    }
    ((part.won() as i128 * 10_000) / whole.won() as i128) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn expense(id: i64, category: &str, amount: i64, day: (i32, u32, u32)) -> Expense {
        Expense {
            id,
            category: category.to_string(),
            amount: Money::from_won(amount),
            expense_date: NaiveDate::from_ymd_opt(day.0, day.1, day.2).unwrap(),
            memo: None,
        }
    }

    #[test]
    fn test_summarize_groups_and_sorts() {
        let expenses = vec![
            expense(1, "재료비", 30_000, (2024, 1, 3)),
            expense(2, "임대료", 1_000_000, (2024, 1, 5)),
            expense(3, "재료비", 20_000, (2024, 1, 9)),
            expense(4, "", 10_000, (2024, 1, 9)),
        ];

        let summary = summarize_by_category(&expenses);
        assert_eq!(summary.len(), 3);
        assert_eq!(summary[0].category, "임대료");
        assert_eq!(summary[1].category, "재료비");
        assert_eq!(summary[1].total.won(), 50_000);
        assert_eq!(summary[1].count, 2);
        assert_eq!(summary[2].category, "기타");

        // 1,000,000 / 1,060,000 = 94.33%
        assert_eq!(summary[0].share_bps, 9433);
    }

    #[test]
    fn test_ties_sorted_by_name() {
        let expenses = vec![
            expense(1, "b", 5_000, (2024, 1, 1)),
            expense(2, "a", 5_000, (2024, 1, 1)),
        ];
        let summary = summarize_by_category(&expenses);
        assert_eq!(summary[0].category, "a");
        assert_eq!(summary[0].share_bps, 5000);
    }

    #[test]
    fn test_empty_input() {
        assert!(summarize_by_category(&[]).is_empty());
        assert!(monthly_total(&[], 2024, 1).is_zero());
    }

    #[test]
    fn test_monthly_total() {
        let expenses = vec![
            expense(1, "재료비", 30_000, (2024, 1, 31)),
            expense(2, "재료비", 20_000, (2024, 2, 1)),
            expense(3, "재료비", 5_000, (2023, 1, 15)),
        ];
        assert_eq!(monthly_total(&expenses, 2024, 1).won(), 30_000);
        assert_eq!(monthly_total(&expenses, 2024, 2).won(), 20_000);
    }
}
