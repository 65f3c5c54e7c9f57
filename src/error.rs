//! Error types for cradle configuration.

use core::fmt;

use crate::config::Parameter;

/// Errors reported when configuring the cradle.
///
/// Physics stepping never fails; only parameter updates and body
/// construction can be rejected.
#[derive(Debug, Clone, PartialEq)]
pub enum CradleError {
    /// A parameter value fell outside its documented bound.
    /// The previous value is kept.
    InvalidParameter {
        parameter: Parameter,
        reason: &'static str,
    },
    /// A parameter name did not match any known parameter.
    UnknownParameter,
    /// The support anchor had a NaN or infinite coordinate.
    InvalidAnchor,
}

impl CradleError {
    pub(crate) fn invalid(parameter: Parameter, reason: &'static str) -> Self {
        CradleError::InvalidParameter { parameter, reason }
    }
}

impl fmt::Display for CradleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CradleError::InvalidParameter { parameter, reason } => {
                write!(f, "invalid {}: {}", parameter.name(), reason)
            }
            CradleError::UnknownParameter => write!(f, "unknown parameter name"),
            CradleError::InvalidAnchor => write!(f, "anchor must be finite"),
        }
    }
}

impl core::error::Error for CradleError {}
