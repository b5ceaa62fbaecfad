//! The expense ledger report.

use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::format::{format_amount, format_date, format_quantity, month_short};
use super::{ReportDefinition, ReportPeriod, DEFAULT_CURRENCY};
use crate::layout::TableStyle;
use crate::model::{ColumnSpec, PageGeometry, RowRecord};

fn default_quantity() -> f64 {
    1.0
}

/// One expense entry as stored by the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub date: NaiveDate,
    pub item_type: String,
    pub item_description: String,
    #[serde(default)]
    pub unit: String,
    #[serde(default = "default_quantity")]
    pub quantity: f64,
    pub amount: f64,
    #[serde(default)]
    pub remarks: String,
}

#[derive(Debug, Clone)]
pub struct ExpenseReport {
    pub period: ReportPeriod,
    /// Only list expenses of this item type.
    pub item_type: Option<String>,
    pub currency: String,
}

impl Default for ExpenseReport {
    fn default() -> Self {
        Self {
            period: ReportPeriod::All,
            item_type: None,
            currency: DEFAULT_CURRENCY.to_string(),
        }
    }
}

impl ExpenseReport {
    pub fn new(period: ReportPeriod) -> Self {
        Self {
            period,
            ..Self::default()
        }
    }

    pub fn item_type(mut self, item_type: impl Into<String>) -> Self {
        self.item_type = Some(item_type.into());
        self
    }

    pub fn currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }
}

impl ReportDefinition for ExpenseReport {
    type Record = Expense;

    fn title(&self) -> String {
        "Expense Report".to_string()
    }

    fn columns(&self) -> Vec<ColumnSpec> {
        vec![
            ColumnSpec::new("index", "#"),
            ColumnSpec::new("date", "Date"),
            ColumnSpec::new("month", "Month"),
            ColumnSpec::new("item_type", "Item Type"),
            ColumnSpec::new("description", "Description").stretch(60),
            ColumnSpec::new("unit", "Unit"),
            ColumnSpec::new("quantity", "Qty").right(),
            ColumnSpec::new("amount", format!("Amount ({})", self.currency)).right(),
            ColumnSpec::new("remarks", "Remarks").stretch(40),
        ]
    }

    fn geometry(&self) -> PageGeometry {
        PageGeometry::a4_landscape()
    }

    fn style(&self) -> TableStyle {
        TableStyle::default()
    }

    fn includes(&self, expense: &Expense) -> bool {
        self.period.contains(&expense.date)
            && self
                .item_type
                .as_deref()
                .map_or(true, |wanted| expense.item_type == wanted)
    }

    fn compare(&self, a: &Expense, b: &Expense) -> Ordering {
        a.date.cmp(&b.date)
    }

    fn to_row(&self, index: usize, expense: &Expense) -> RowRecord {
        RowRecord::new([
            (index + 1).to_string(),
            format_date(&expense.date),
            month_short(&expense.date).to_string(),
            expense.item_type.clone(),
            expense.item_description.clone(),
            expense.unit.clone(),
            format_quantity(expense.quantity),
            format_amount(expense.amount),
            expense.remarks.clone(),
        ])
    }

    fn total_row(&self, expenses: &[Expense]) -> RowRecord {
        let quantity: f64 = expenses.iter().map(|e| e.quantity).sum();
        let amount: f64 = expenses.iter().map(|e| e.amount).sum();
        RowRecord::new([
            String::new(),
            String::new(),
            String::new(),
            String::new(),
            "GRAND TOTAL".to_string(),
            String::new(),
            format_quantity(quantity),
            format_amount(amount),
            String::new(),
        ])
    }

    fn period_label(&self, expenses: &[Expense]) -> String {
        self.period.label(expenses.iter().map(|e| &e.date))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expense(date: &str, item_type: &str, amount: f64) -> Expense {
        Expense {
            date: date.parse().unwrap(),
            item_type: item_type.to_string(),
            item_description: format!("{item_type} purchase"),
            unit: "kg".to_string(),
            quantity: 2.0,
            amount,
            remarks: String::new(),
        }
    }

    #[test]
    fn deserializes_with_ledger_defaults() {
        let json = r#"{"date":"2025-03-04","itemType":"Food","itemDescription":"Rice","amount":120.5}"#;
        let parsed: Expense = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.quantity, 1.0);
        assert_eq!(parsed.unit, "");
        assert_eq!(parsed.remarks, "");
    }

    #[test]
    fn rows_are_numbered_from_one() {
        let report = ExpenseReport::default();
        let row = report.to_row(0, &expense("2025-03-04", "Food", 120.5));
        assert_eq!(
            row.cells,
            vec!["1", "04/03/2025", "Mar", "Food", "Food purchase", "kg", "2", "120.50", ""]
        );
        assert_eq!(row.len(), report.columns().len());
    }

    #[test]
    fn total_sums_quantity_and_amount() {
        let report = ExpenseReport::default();
        let expenses = [
            expense("2025-03-04", "Food", 120.5),
            expense("2025-03-05", "Fuel", 79.5),
        ];
        let total = report.total_row(&expenses);
        assert_eq!(total.cell(4), "GRAND TOTAL");
        assert_eq!(total.cell(6), "4");
        assert_eq!(total.cell(7), "200.00");
    }

    #[test]
    fn filters_by_period_and_item_type() {
        let report = ExpenseReport::new(ReportPeriod::Month {
            year: 2025,
            month: 3,
        })
        .item_type("Food");
        assert!(report.includes(&expense("2025-03-04", "Food", 1.0)));
        assert!(!report.includes(&expense("2025-03-04", "Fuel", 1.0)));
        assert!(!report.includes(&expense("2025-04-04", "Food", 1.0)));
    }

    #[test]
    fn amount_header_carries_the_currency() {
        let report = ExpenseReport::default().currency("EUR");
        assert_eq!(report.columns()[7].header, "Amount (EUR)");
    }
}
