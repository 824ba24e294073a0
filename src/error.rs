/// [Result] alias for return types of the crate API
pub type Result<T> = std::result::Result<T, Error>;

/// Error enum type
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// The flight platform SDK reported a failure. The String contains the
    /// description provided by the platform.
    Sdk(String),
    /// The mission draft cannot be materialized into a mission. The String contains the reason.
    InvalidMission(String),
    /// An argument was out of range. The String contains the reason.
    InvalidArgument(String),
    /// The aircraft is currently disconnected.
    Disconnected,
    /// Error with the async machinery.
    SystemError(String),
    /// Operation timed out waiting for a response.
    Timeout,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Sdk(reason) => write!(f, "flight platform error: {}", reason),
            Error::InvalidMission(reason) => write!(f, "invalid mission: {}", reason),
            Error::InvalidArgument(reason) => write!(f, "invalid argument: {}", reason),
            Error::Disconnected => write!(f, "aircraft disconnected"),
            Error::SystemError(reason) => write!(f, "system error: {}", reason),
            Error::Timeout => write!(f, "operation timed out"),
        }
    }
}

impl std::error::Error for Error {}

impl From<flume::RecvError> for Error {
    fn from(_: flume::RecvError) -> Self {
        Error::Disconnected
    }
}

impl<T> From<flume::SendError<T>> for Error {
    fn from(_: flume::SendError<T>) -> Self {
        Error::Disconnected
    }
}
