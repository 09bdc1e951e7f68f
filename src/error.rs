//! Error types for seating generation

use thiserror::Error;

/// Result type used across the crate
pub type Result<T> = std::result::Result<T, SeatingError>;

/// Everything that can abort a generation run.
///
/// Every variant is terminal for the run: there is no partial plan.
#[derive(Error, Debug)]
pub enum SeatingError {
    /// Missing or malformed room/session configuration
    #[error("{0}")]
    Configuration(String),

    /// A session schedules more students than all rooms can seat
    #[error("Rooms insufficient for {date} {shift}! Capacity: {capacity}, Students scheduled: {scheduled}")]
    Capacity {
        date: String,
        shift: String,
        capacity: u64,
        scheduled: u64,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid JSON configuration format: {0}")]
    Json(#[from] serde_json::Error),
}

impl SeatingError {
    pub fn config(message: impl Into<String>) -> Self {
        SeatingError::Configuration(message.into())
    }

    /// Number of students that could not be seated, for capacity errors
    pub fn shortfall(&self) -> Option<u64> {
        match self {
            SeatingError::Capacity { capacity, scheduled, .. } => Some(scheduled.saturating_sub(*capacity)),
            _ => None,
        }
    }

    /// True when the caller can fix the failure by changing its input
    pub fn is_input_error(&self) -> bool {
        !matches!(self, SeatingError::Io(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_message_names_session_and_numbers() {
        let err = SeatingError::Capacity {
            date: "2024-05-12".to_string(),
            shift: "9:00 AM - 12:00 PM".to_string(),
            capacity: 60,
            scheduled: 61,
        };
        assert_eq!(
            err.to_string(),
            "Rooms insufficient for 2024-05-12 9:00 AM - 12:00 PM! Capacity: 60, Students scheduled: 61"
        );
        assert_eq!(err.shortfall(), Some(1));
        assert!(err.is_input_error());
    }

    #[test]
    fn io_errors_are_not_input_errors() {
        let err: SeatingError = std::io::Error::other("disk gone").into();
        assert!(!err.is_input_error());
        assert_eq!(err.shortfall(), None);
    }
}
