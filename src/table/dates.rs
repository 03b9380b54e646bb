//! Module for handling date parsing across the formats sources write.

use chrono::NaiveDate;

/// Parse a date string with multiple format attempts
///
/// Tries each configured format in order, then falls back to pattern
/// detection for strings none of the formats accept.
#[must_use]
pub fn parse_date_string(s: &str, formats: &[String]) -> Option<NaiveDate> {
    for format in formats {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return Some(date);
        }
    }

    if let Some(detected) = detect_date_format(s) {
        if let Ok(date) = NaiveDate::parse_from_str(s, detected) {
            return Some(date);
        }
    }

    None
}

/// Try to detect the date format based on string patterns
#[must_use]
pub fn detect_date_format(s: &str) -> Option<&'static str> {
    // ISO-like format with dashes (YYYY-MM-DD)
    if s.len() == 10 && s.chars().nth(4) == Some('-') && s.chars().nth(7) == Some('-') {
        return Some("%Y-%m-%d");
    }

    if s.contains('/') {
        let parts: Vec<&str> = s.split('/').collect();
        if parts.len() == 3 {
            if parts[0].len() == 4 {
                return Some("%Y/%m/%d");
            } else if parts[2].len() == 4 {
                // Day-first when the leading number cannot be a month
                if let Ok(first_num) = parts[0].parse::<u8>() {
                    if first_num > 12 {
                        return Some("%d/%m/%Y");
                    }
                    return Some("%m/%d/%Y");
                }
            }
        }
    }

    if s.contains('.') {
        let parts: Vec<&str> = s.split('.').collect();
        if parts.len() == 3 && parts[2].len() == 4 {
            return Some("%d.%m.%Y");
        }
    }

    // Compact format (YYYYMMDD)
    if s.len() == 8 && s.chars().all(|c| c.is_ascii_digit()) {
        return Some("%Y%m%d");
    }

    None
}
