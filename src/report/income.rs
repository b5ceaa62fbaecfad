//! The income ledger report. Same engine as expenses, portrait and green.

use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::format::{format_amount, format_date, format_quantity};
use super::{ReportDefinition, ReportPeriod, DEFAULT_CURRENCY};
use crate::layout::TableStyle;
use crate::model::{Color, ColumnSpec, PageGeometry, RowRecord};

fn default_quantity() -> f64 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Income {
    pub date: NaiveDate,
    pub income_type: String,
    pub description: String,
    #[serde(default = "default_quantity")]
    pub quantity: f64,
    pub amount: f64,
    #[serde(default)]
    pub remarks: String,
}

#[derive(Debug, Clone)]
pub struct IncomeReport {
    pub period: ReportPeriod,
    pub income_type: Option<String>,
    pub currency: String,
}

impl Default for IncomeReport {
    fn default() -> Self {
        Self {
            period: ReportPeriod::All,
            income_type: None,
            currency: DEFAULT_CURRENCY.to_string(),
        }
    }
}

impl IncomeReport {
    pub fn new(period: ReportPeriod) -> Self {
        Self {
            period,
            ..Self::default()
        }
    }

    pub fn income_type(mut self, income_type: impl Into<String>) -> Self {
        self.income_type = Some(income_type.into());
        self
    }

    pub fn currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }
}

/// Green palette shared by the income and summary reports.
pub(crate) fn green_style() -> TableStyle {
    TableStyle::themed(
        Color::rgb(0x27, 0x67, 0x49),
        Color::rgb(0xf7, 0xfd, 0xf9),
        Color::rgb(0xd4, 0xed, 0xda),
        Color::rgb(0x27, 0x67, 0x49),
    )
}

impl ReportDefinition for IncomeReport {
    type Record = Income;

    fn title(&self) -> String {
        "Income Report".to_string()
    }

    fn columns(&self) -> Vec<ColumnSpec> {
        vec![
            ColumnSpec::new("index", "#"),
            ColumnSpec::new("date", "Date"),
            ColumnSpec::new("income_type", "Income Type"),
            ColumnSpec::new("description", "Description").stretch(60),
            ColumnSpec::new("quantity", "Qty").right(),
            ColumnSpec::new("amount", format!("Amount ({})", self.currency)).right(),
            ColumnSpec::new("remarks", "Remarks").stretch(40),
        ]
    }

    fn geometry(&self) -> PageGeometry {
        PageGeometry::a4_portrait()
    }

    fn style(&self) -> TableStyle {
        green_style()
    }

    fn includes(&self, income: &Income) -> bool {
        self.period.contains(&income.date)
            && self
                .income_type
                .as_deref()
                .map_or(true, |wanted| income.income_type == wanted)
    }

    fn compare(&self, a: &Income, b: &Income) -> Ordering {
        a.date.cmp(&b.date)
    }

    fn to_row(&self, index: usize, income: &Income) -> RowRecord {
        RowRecord::new([
            (index + 1).to_string(),
            format_date(&income.date),
            income.income_type.clone(),
            income.description.clone(),
            format_quantity(income.quantity),
            format_amount(income.amount),
            income.remarks.clone(),
        ])
    }

    fn total_row(&self, incomes: &[Income]) -> RowRecord {
        let quantity: f64 = incomes.iter().map(|i| i.quantity).sum();
        let amount: f64 = incomes.iter().map(|i| i.amount).sum();
        RowRecord::new([
            String::new(),
            String::new(),
            String::new(),
            "TOTAL".to_string(),
            format_quantity(quantity),
            format_amount(amount),
            String::new(),
        ])
    }

    fn period_label(&self, incomes: &[Income]) -> String {
        self.period.label(incomes.iter().map(|i| &i.date))
    }
}
