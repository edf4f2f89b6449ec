//! Date formats at the two boundaries: ISO-8601 on the source wire and
//! day/month/year for humans and the destination's forms.

use chrono::NaiveDate;

use crate::error::RecordError;

/// `dd/mm/yyyy`, used for user input and destination writes.
pub const HUMAN_DATE_FORMAT: &str = "%d/%m/%Y";

/// `yyyy-mm-dd`, used by the source API.
pub const WIRE_DATE_FORMAT: &str = "%Y-%m-%d";

pub fn parse_human_date(value: &str) -> Result<NaiveDate, RecordError> {
    NaiveDate::parse_from_str(value.trim(), HUMAN_DATE_FORMAT).map_err(|_| {
        RecordError::InvalidDate {
            value: value.to_string(),
            expected: "dd/mm/yyyy",
        }
    })
}

pub fn parse_wire_date(value: &str) -> Result<NaiveDate, RecordError> {
    NaiveDate::parse_from_str(value.trim(), WIRE_DATE_FORMAT).map_err(|_| {
        RecordError::InvalidDate {
            value: value.to_string(),
            expected: "yyyy-mm-dd",
        }
    })
}

pub fn format_human(date: NaiveDate) -> String {
    date.format(HUMAN_DATE_FORMAT).to_string()
}

pub fn format_wire(date: NaiveDate) -> String {
    date.format(WIRE_DATE_FORMAT).to_string()
}
