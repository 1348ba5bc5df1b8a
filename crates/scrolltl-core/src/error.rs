#![forbid(unsafe_code)]

//! Error types for timeline configuration.
//!
//! Only two conditions are errors: an unrecognized axis name and a logical
//! axis that cannot be resolved because no computed style is available.
//! Everything else — no source, a disconnected source, a non-scrollable
//! display — is a legitimate state reported through
//! [`TimelinePhase::Inactive`](crate::timeline::TimelinePhase) and an
//! unresolved (`None`) current time, so consumers poll rather than catch.

/// Error raised by timeline configuration and axis resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimelineError {
    /// An axis name outside the recognized set (`x`, `y`, `block`, `inline`)
    /// was supplied. The previous axis, if any, is left unchanged.
    InvalidAxis(String),
    /// A logical axis (`block`/`inline`) had to be resolved but no computed
    /// style could be obtained for the source.
    MissingStyleContext,
}

impl std::fmt::Display for TimelineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidAxis(name) => write!(f, "invalid axis {name:?}"),
            Self::MissingStyleContext => write!(
                f,
                "computed style of the source is required to resolve a logical axis"
            ),
        }
    }
}

impl std::error::Error for TimelineError {}
