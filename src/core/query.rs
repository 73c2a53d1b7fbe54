use crate::utils::error::Result;
use crate::utils::validation::{parse_number_field, validate_range, Validate};
use chrono::Datelike;
use serde_json::{Map, Value};

/// The report page's query, with the period written into the document.
pub const REPORT_QUERY: &str = r#"
query ReportQuery {
    reports(month: "10", year: "2025") {
        __typename,
        month,
        year,
        category,
        totalIncome,
        totalExpenses
    }
}
"#;

/// Same selection as [`REPORT_QUERY`], with the period bound through variables.
pub const REPORT_PERIOD_QUERY: &str = r#"
query ReportQuery($month: String!, $year: String!) {
    reports(month: $month, year: $year) {
        __typename,
        month,
        year,
        category,
        totalIncome,
        totalExpenses
    }
}
"#;

/// A reporting month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportPeriod {
    month: u32,
    year: u32,
}

impl ReportPeriod {
    pub fn new(month: u32, year: u32) -> Result<Self> {
        let period = Self { month, year };
        period.validate()?;
        Ok(period)
    }

    pub fn parse(month: &str, year: &str) -> Result<Self> {
        Self::new(
            parse_number_field("report.month", month)?,
            parse_number_field("report.year", year)?,
        )
    }

    /// Builds a period from optional parts. Nothing given means no period;
    /// a missing month or year is taken from [`ReportPeriod::current`].
    pub fn from_parts(month: Option<&str>, year: Option<&str>) -> Result<Option<Self>> {
        if month.is_none() && year.is_none() {
            return Ok(None);
        }
        let current = Self::current();
        let month = match month {
            Some(month) => parse_number_field("report.month", month)?,
            None => current.month,
        };
        let year = match year {
            Some(year) => parse_number_field("report.year", year)?,
            None => current.year,
        };
        Self::new(month, year).map(Some)
    }

    pub fn current() -> Self {
        let today = chrono::Local::now().date_naive();
        Self {
            month: today.month(),
            year: today.year().clamp(1000, 9999) as u32,
        }
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn year(&self) -> u32 {
        self.year
    }

    /// Variables for [`REPORT_PERIOD_QUERY`]. The server takes both as
    /// strings, month without zero padding.
    pub fn variables(&self) -> Map<String, Value> {
        let mut variables = Map::new();
        variables.insert("month".to_string(), Value::String(self.month.to_string()));
        variables.insert("year".to_string(), Value::String(self.year.to_string()));
        variables
    }
}

impl Validate for ReportPeriod {
    fn validate(&self) -> Result<()> {
        validate_range("report.month", self.month, 1, 12)?;
        validate_range("report.year", self.year, 1000, 9999)
    }
}
