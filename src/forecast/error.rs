use thiserror::Error;

/// Structural violations in the SWPC text products. Each variant carries the
/// line number (1-based) and enough of the offending content to find it in
/// the raw report.
#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("data line {line_no} appears before any date header: '{line}'")]
    ColumnsNotInitialized { line_no: usize, line: String },

    #[error("expected {expected} kp values on line {line_no}, found {found}: '{line}'")]
    ColumnCountMismatch {
        line_no: usize,
        line: String,
        expected: usize,
        found: usize,
    },

    #[error("invalid kp value '{token}' on line {line_no}")]
    InvalidKpValue {
        line_no: usize,
        token: String,
        #[source]
        source: std::num::ParseFloatError,
    },

    #[error("expected a date and three integer fields on line {line_no}: '{line}'")]
    MalformedOutlookRow { line_no: usize, line: String },

    #[error("invalid date '{token}' on line {line_no}")]
    InvalidDate {
        line_no: usize,
        token: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("invalid integer '{token}' on line {line_no}")]
    InvalidInteger {
        line_no: usize,
        token: String,
        #[source]
        source: std::num::ParseIntError,
    },
}
