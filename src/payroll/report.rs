//! Payroll reports.
//!
//! Report figures are fixed samples per payroll cycle; nothing here derives
//! them from hours or deductions.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::repository::{RecordId, matches_search};

/// One employee line of a payroll report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayrollReportRow {
    pub employee_id: RecordId,
    pub name: String,
    pub salary: Decimal,
    pub total_hours: Decimal,
    pub overtime_hours: Decimal,
    pub total_deductions: Decimal,
    pub net_pay: Decimal,
}

impl PayrollReportRow {
    fn sample(id: i64, name: &str, figures: [i64; 5]) -> Self {
        let [salary, total_hours, overtime_hours, total_deductions, net_pay] =
            figures.map(Decimal::from);
        Self {
            employee_id: RecordId(id),
            name: name.to_string(),
            salary,
            total_hours,
            overtime_hours,
            total_deductions,
            net_pay,
        }
    }
}

/// Payroll cycles a report can be generated for.
pub const REPORT_CYCLES: &[&str] = &["June 2023", "July 2023 First Half"];

/// Rows of the sample report.
#[must_use]
pub fn sample_rows() -> Vec<PayrollReportRow> {
    vec![
        PayrollReportRow::sample(1, "John Doe", [5000, 160, 10, 500, 5250]),
        PayrollReportRow::sample(2, "Jane Smith", [4500, 152, 0, 450, 4050]),
        PayrollReportRow::sample(3, "Bob Johnson", [5500, 168, 8, 550, 5610]),
    ]
}

/// What a payslip request returns for one report row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Payslip {
    pub cycle: Option<String>,
    pub employee_id: RecordId,
    pub name: String,
    pub gross_pay: Decimal,
    pub total_deductions: Decimal,
    pub net_pay: Decimal,
}

#[derive(Clone, Debug)]
pub struct PayrollReport {
    cycle: Option<String>,
    rows: Vec<PayrollReportRow>,
    search: String,
}

impl Default for PayrollReport {
    fn default() -> Self {
        Self::new(sample_rows())
    }
}

impl PayrollReport {
    #[must_use]
    pub fn new(rows: Vec<PayrollReportRow>) -> Self {
        Self {
            cycle: None,
            rows,
            search: String::new(),
        }
    }

    /// Selects a cycle from [`REPORT_CYCLES`]. Returns `false` for any other name.
    pub fn select_cycle(&mut self, cycle: &str) -> bool {
        if !REPORT_CYCLES.contains(&cycle) {
            return false;
        }
        self.cycle = Some(cycle.to_string());
        true
    }

    #[must_use]
    pub fn cycle(&self) -> Option<&str> {
        self.cycle.as_deref()
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
    }

    /// Rows whose employee name matches the search term.
    #[must_use]
    pub fn visible(&self) -> Vec<&PayrollReportRow> {
        self.rows
            .iter()
            .filter(|r| matches_search(&r.name, &self.search))
            .collect()
    }

    /// Sum of the net pay of every row, the report footer.
    #[must_use]
    pub fn total_net_pay(&self) -> Decimal {
        self.rows.iter().map(|r| r.net_pay).sum()
    }

    #[instrument(skip(self))]
    pub fn generate_payslip(&self, employee_id: RecordId) -> Option<Payslip> {
        let row = self.rows.iter().find(|r| r.employee_id == employee_id)?;
        info!(%employee_id, cycle = ?self.cycle, "generating payslip");
        Some(Payslip {
            cycle: self.cycle.clone(),
            employee_id,
            name: row.name.clone(),
            gross_pay: row.net_pay + row.total_deductions,
            total_deductions: row.total_deductions,
            net_pay: row.net_pay,
        })
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn footer_sums_net_pay() {
        assert_eq!(PayrollReport::default().total_net_pay(), dec!(14910));
    }

    #[test]
    fn only_known_cycles_can_be_selected() {
        let mut report = PayrollReport::default();
        assert!(!report.select_cycle("August 2023"));
        assert_eq!(report.cycle(), None);
        assert!(report.select_cycle("June 2023"));
        assert_eq!(report.cycle(), Some("June 2023"));
    }

    #[test]
    fn payslip_for_listed_employee() {
        let mut report = PayrollReport::default();
        report.select_cycle("July 2023 First Half");

        let payslip = report.generate_payslip(RecordId(2)).unwrap();
        assert_eq!(payslip.name, "Jane Smith");
        assert_eq!(payslip.gross_pay, dec!(4500));
        assert_eq!(payslip.cycle.as_deref(), Some("July 2023 First Half"));
        assert!(report.generate_payslip(RecordId(9)).is_none());
    }

    #[test]
    fn search_filters_by_name() {
        let mut report = PayrollReport::default();
        report.set_search("SMITH");
        let names: Vec<&str> = report.visible().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Jane Smith"]);
    }
}
