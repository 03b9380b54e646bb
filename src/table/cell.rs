//! Tagged cell values for dynamically typed tables.
//!
//! Source files mix numbers, free text and missing markers inside the same
//! column, so a cell keeps the shape it was loaded with and exposes total
//! coercions instead of panicking accessors. A coercion that does not apply
//! returns `None` and the caller skips the value.

use chrono::NaiveDate;

use crate::table::dates::parse_date_string;

/// Field values treated as missing when ingesting raw text
pub const NA_TOKENS: [&str; 10] = [
    "", "NA", "N/A", "n/a", "NULL", "null", "NaN", "nan", "None", "<NA>",
];

/// A single table value
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// Missing value
    Null,
    /// Numeric value
    Number(f64),
    /// Textual value
    Text(String),
}

impl Cell {
    /// Build a cell from a raw text field, mapping the usual missing-value
    /// markers to [`Cell::Null`]
    #[must_use]
    pub fn from_field(field: &str) -> Self {
        if NA_TOKENS.contains(&field) {
            Cell::Null
        } else {
            Cell::Text(field.to_string())
        }
    }

    /// Whether this cell holds no value
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    /// Coerce to a number
    ///
    /// Numeric cells return their value directly; textual cells are parsed
    /// after trimming. Values that do not parse, and NaN, yield `None`.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Null => None,
            Cell::Number(n) => Some(*n),
            Cell::Text(s) => s.trim().parse::<f64>().ok().filter(|v| !v.is_nan()),
        }
    }

    /// Borrow the text of a textual cell
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Render the cell for display, `None` for missing values
    ///
    /// Whole numbers render without a fractional part so identifiers loaded
    /// as numbers keep their written form.
    #[must_use]
    pub fn display_string(&self) -> Option<String> {
        match self {
            Cell::Null => None,
            Cell::Number(n) => Some(render_number(*n)),
            Cell::Text(s) => Some(s.clone()),
        }
    }

    /// Coerce to a calendar date using the given chrono format strings
    #[must_use]
    pub fn as_date(&self, formats: &[String]) -> Option<NaiveDate> {
        match self {
            Cell::Null => None,
            Cell::Number(n) => parse_date_string(&render_number(*n), formats),
            Cell::Text(s) => parse_date_string(s.trim(), formats),
        }
    }
}

/// Format a number the way it was most likely written: integral values
/// without a trailing `.0`
fn render_number(n: f64) -> String {
    // 2^53 is the last f64 that still distinguishes adjacent integers
    if n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}
