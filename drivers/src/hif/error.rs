use core::fmt;

use crate::hal::serial::SerialError;

/// Host interface errors.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum HifError {
    /// Bad channel, bad baud/flow-control combination, or a configuration
    /// the hardware refused.
    InvalidParameter,
    /// A transfer buffer could not be allocated.
    ResourceExhausted,
    /// `open` was called on an open session.
    AlreadyOpen,
    /// The operation needs an open session.
    NotOpen,
    /// A configuration change failed and the previous configuration could
    /// not be restored. The session is closed.
    RestoreFailed,
}

impl fmt::Display for HifError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            HifError::InvalidParameter => "invalid parameter",
            HifError::ResourceExhausted => "resource exhausted",
            HifError::AlreadyOpen => "already open",
            HifError::NotOpen => "not open",
            HifError::RestoreFailed => "restore failed",
        })
    }
}

impl From<SerialError> for HifError {
    fn from(_: SerialError) -> Self {
        HifError::InvalidParameter
    }
}
