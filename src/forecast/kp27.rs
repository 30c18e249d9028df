//! Parser for the SWPC 27-day space weather outlook table.
//!
//! Data lines carry a date and three indices in fixed columns:
//!
//! ```text
//! #   UTC      Radio Flux   Planetary   Largest
//! #  Date       10.7 cm      A Index    Kp Index
//! 2025 Jan 06     172          22          5
//! ```

use crate::forecast::error::ForecastError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

const OUTLOOK_DATE_FORMAT: &str = "%Y %b %d";

/// One outlook day: 10.7 cm radio flux, planetary A index, and the largest
/// expected Kp index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kp27Row {
    pub date: NaiveDate,
    pub radio_flux: i64,
    pub planetary_index: i64,
    pub largest_kp_index: i64,
}

/// Parses the 27-day outlook into one row per data line, in source order.
pub fn parse_kp_27_outlook(data: &str) -> Result<Vec<Kp27Row>, ForecastError> {
    let mut rows = Vec::new();

    for (index, raw_line) in data.lines().enumerate() {
        let line_no = index + 1;
        if raw_line.starts_with('#') || raw_line.starts_with(':') {
            continue;
        }
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }

        let (raw_date, indices) = match rsplit_indices(line) {
            Some(fields) => fields,
            None => {
                return Err(ForecastError::MalformedOutlookRow {
                    line_no,
                    line: line.to_string(),
                })
            }
        };

        let date = NaiveDate::parse_from_str(raw_date, OUTLOOK_DATE_FORMAT).map_err(|e| {
            ForecastError::InvalidDate {
                line_no,
                token: raw_date.to_string(),
                source: e,
            }
        })?;
        let radio_flux = parse_index(line_no, indices[0])?;
        let planetary_index = parse_index(line_no, indices[1])?;
        let largest_kp_index = parse_index(line_no, indices[2])?;

        rows.push(Kp27Row {
            date,
            radio_flux,
            planetary_index,
            largest_kp_index,
        });
    }

    Ok(rows)
}

/// Splits the trailing three whitespace-separated tokens off a trimmed line,
/// returning the leading date string and the tokens in source order.
fn rsplit_indices(line: &str) -> Option<(&str, [&str; 3])> {
    let mut rest = line;
    let mut indices = [""; 3];
    for slot in indices.iter_mut().rev() {
        let cut = rest.rfind(char::is_whitespace)?;
        *slot = rest[cut..].trim_start();
        rest = rest[..cut].trim_end();
    }
    (!rest.is_empty()).then_some((rest, indices))
}

fn parse_index(line_no: usize, token: &str) -> Result<i64, ForecastError> {
    token.parse::<i64>().map_err(|e| ForecastError::InvalidInteger {
        line_no,
        token: token.to_string(),
        source: e,
    })
}
