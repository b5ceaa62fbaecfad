//! Aggregate reports: the month-by-month balance of a year and the expense
//! breakdown by item type. Their rows are computed here, then drawn by the
//! same table engine as the ledgers.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use super::format::{format_amount, format_quantity, month_name};
use super::income::green_style;
use super::{Expense, Income, ReportDefinition, ReportPeriod, DEFAULT_CURRENCY};
use crate::layout::TableStyle;
use crate::model::{ColumnSpec, PageGeometry, RowRecord};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MonthSummary {
    /// 1-based.
    pub month: u32,
    pub income: f64,
    pub expense: f64,
}

impl MonthSummary {
    pub fn balance(&self) -> f64 {
        self.income - self.expense
    }
}

#[derive(Debug, Clone)]
pub struct YearlySummaryReport {
    pub year: i32,
    pub currency: String,
}

impl YearlySummaryReport {
    pub fn new(year: i32) -> Self {
        Self {
            year,
            currency: DEFAULT_CURRENCY.to_string(),
        }
    }

    pub fn currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    /// Twelve months of the report's year, empty months included.
    pub fn aggregate(&self, expenses: &[Expense], incomes: &[Income]) -> Vec<MonthSummary> {
        let mut months: Vec<MonthSummary> = (1..=12)
            .map(|month| MonthSummary {
                month,
                income: 0.0,
                expense: 0.0,
            })
            .collect();

        for expense in expenses.iter().filter(|e| e.date.year() == self.year) {
            months[expense.date.month0() as usize].expense += expense.amount;
        }
        for income in incomes.iter().filter(|i| i.date.year() == self.year) {
            months[income.date.month0() as usize].income += income.amount;
        }
        months
    }
}

impl ReportDefinition for YearlySummaryReport {
    type Record = MonthSummary;

    fn title(&self) -> String {
        "Income vs Expense Summary".to_string()
    }

    fn columns(&self) -> Vec<ColumnSpec> {
        let currency = &self.currency;
        vec![
            ColumnSpec::new("month", "Month").stretch(1),
            ColumnSpec::new("income", format!("Income ({currency})"))
                .right()
                .stretch(1),
            ColumnSpec::new("expense", format!("Expense ({currency})"))
                .right()
                .stretch(1),
            ColumnSpec::new("balance", format!("Balance ({currency})"))
                .right()
                .stretch(1),
        ]
    }

    fn geometry(&self) -> PageGeometry {
        PageGeometry {
            row_height: 20,
            header_height: 24,
            ..PageGeometry::a4_portrait()
        }
    }

    fn style(&self) -> TableStyle {
        green_style()
    }

    fn compare(&self, a: &MonthSummary, b: &MonthSummary) -> Ordering {
        a.month.cmp(&b.month)
    }

    fn to_row(&self, _index: usize, month: &MonthSummary) -> RowRecord {
        RowRecord::new([
            month_name(month.month).to_string(),
            format_amount(month.income),
            format_amount(month.expense),
            format_amount(month.balance()),
        ])
    }

    fn total_row(&self, months: &[MonthSummary]) -> RowRecord {
        let income: f64 = months.iter().map(|m| m.income).sum();
        let expense: f64 = months.iter().map(|m| m.expense).sum();
        RowRecord::new([
            "TOTAL".to_string(),
            format_amount(income),
            format_amount(expense),
            format_amount(income - expense),
        ])
    }

    fn period_label(&self, _months: &[MonthSummary]) -> String {
        ReportPeriod::Year(self.year).label(std::iter::empty::<&NaiveDate>())
    }
}

/// Spending on one item type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySummary {
    pub item_type: String,
    pub entries: usize,
    pub quantity: f64,
    pub amount: f64,
    /// Percentage of the period's spending.
    pub share: f64,
    pub first: NaiveDate,
    pub last: NaiveDate,
}

#[derive(Debug, Clone)]
pub struct CategoryBreakdownReport {
    pub period: ReportPeriod,
    pub currency: String,
}

impl CategoryBreakdownReport {
    pub fn new(period: ReportPeriod) -> Self {
        Self {
            period,
            currency: DEFAULT_CURRENCY.to_string(),
        }
    }

    pub fn currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    /// Group the period's expenses by item type.
    pub fn aggregate(&self, expenses: &[Expense]) -> Vec<CategorySummary> {
        let mut groups: BTreeMap<&str, CategorySummary> = BTreeMap::new();
        for expense in expenses.iter().filter(|e| self.period.contains(&e.date)) {
            let entry = groups
                .entry(expense.item_type.as_str())
                .or_insert_with(|| CategorySummary {
                    item_type: expense.item_type.clone(),
                    entries: 0,
                    quantity: 0.0,
                    amount: 0.0,
                    share: 0.0,
                    first: expense.date,
                    last: expense.date,
                });
            entry.entries += 1;
            entry.quantity += expense.quantity;
            entry.amount += expense.amount;
            entry.first = entry.first.min(expense.date);
            entry.last = entry.last.max(expense.date);
        }

        let total: f64 = groups.values().map(|g| g.amount).sum();
        groups
            .into_values()
            .map(|mut group| {
                if total > 0.0 {
                    group.share = group.amount / total * 100.0;
                }
                group
            })
            .collect()
    }
}

impl ReportDefinition for CategoryBreakdownReport {
    type Record = CategorySummary;

    fn title(&self) -> String {
        "Expense Breakdown by Item Type".to_string()
    }

    fn columns(&self) -> Vec<ColumnSpec> {
        vec![
            ColumnSpec::new("index", "#"),
            ColumnSpec::new("item_type", "Item Type").stretch(1),
            ColumnSpec::new("entries", "Entries").right(),
            ColumnSpec::new("quantity", "Qty").right(),
            ColumnSpec::new("amount", format!("Amount ({})", self.currency)).right(),
            ColumnSpec::new("share", "Share").right(),
        ]
    }

    fn geometry(&self) -> PageGeometry {
        PageGeometry::a4_portrait()
    }

    fn style(&self) -> TableStyle {
        TableStyle::default()
    }

    /// Largest spending first; equal amounts fall back to the name.
    fn compare(&self, a: &CategorySummary, b: &CategorySummary) -> Ordering {
        b.amount
            .total_cmp(&a.amount)
            .then_with(|| a.item_type.cmp(&b.item_type))
    }

    fn to_row(&self, index: usize, group: &CategorySummary) -> RowRecord {
        RowRecord::new([
            (index + 1).to_string(),
            group.item_type.clone(),
            group.entries.to_string(),
            format_quantity(group.quantity),
            format_amount(group.amount),
            format!("{:.2}%", group.share),
        ])
    }

    fn total_row(&self, groups: &[CategorySummary]) -> RowRecord {
        let entries: usize = groups.iter().map(|g| g.entries).sum();
        let quantity: f64 = groups.iter().map(|g| g.quantity).sum();
        let amount: f64 = groups.iter().map(|g| g.amount).sum();
        let share = if amount > 0.0 { "100.00%" } else { "0.00%" };
        RowRecord::new([
            String::new(),
            "TOTAL".to_string(),
            entries.to_string(),
            format_quantity(quantity),
            format_amount(amount),
            share.to_string(),
        ])
    }

    fn period_label(&self, groups: &[CategorySummary]) -> String {
        self.period
            .label(groups.iter().flat_map(|g| [&g.first, &g.last]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expense(date: &str, item_type: &str, amount: f64) -> Expense {
        Expense {
            date: date.parse().unwrap(),
            item_type: item_type.to_string(),
            item_description: String::new(),
            unit: String::new(),
            quantity: 1.0,
            amount,
            remarks: String::new(),
        }
    }

    fn income(date: &str, amount: f64) -> Income {
        Income {
            date: date.parse().unwrap(),
            income_type: "Salary".to_string(),
            description: String::new(),
            quantity: 1.0,
            amount,
            remarks: String::new(),
        }
    }

    #[test]
    fn yearly_summary_always_has_twelve_months() {
        let report = YearlySummaryReport::new(2025);
        let months = report.aggregate(
            &[
                expense("2025-03-04", "Food", 300.0),
                expense("2025-03-20", "Fuel", 200.0),
                expense("2024-03-04", "Food", 999.0),
            ],
            &[income("2025-03-01", 1000.0)],
        );

        assert_eq!(months.len(), 12);
        assert_eq!(months[2].expense, 500.0);
        assert_eq!(months[2].balance(), 500.0);
        assert_eq!(months[0].balance(), 0.0);

        let total = report.total_row(&months);
        assert_eq!(total.cells, vec!["TOTAL", "1000.00", "500.00", "500.00"]);
        assert_eq!(report.to_row(2, &months[2]).cell(0), "March");
        assert_eq!(report.period_label(&months), "Year 2025");
    }

    #[test]
    fn categories_are_grouped_with_shares() {
        let report = CategoryBreakdownReport::new(ReportPeriod::All);
        let mut groups = report.aggregate(&[
            expense("2025-03-04", "Food", 300.0),
            expense("2025-03-20", "Fuel", 100.0),
            expense("2025-01-02", "Food", 100.0),
        ]);
        groups.sort_by(|a, b| report.compare(a, b));

        assert_eq!(groups[0].item_type, "Food");
        assert_eq!(groups[0].entries, 2);
        assert_eq!(report.to_row(0, &groups[0]).cell(5), "80.00%");
        assert_eq!(report.to_row(1, &groups[1]).cell(5), "20.00%");
        assert_eq!(report.total_row(&groups).cell(5), "100.00%");
        assert_eq!(report.period_label(&groups), "02/01/2025 - 20/03/2025");
    }

    #[test]
    fn empty_breakdown_has_no_share() {
        let report = CategoryBreakdownReport::new(ReportPeriod::Year(2025));
        let groups = report.aggregate(&[expense("2024-05-05", "Food", 10.0)]);
        assert!(groups.is_empty());
        assert_eq!(report.total_row(&groups).cell(5), "0.00%");
    }
}
