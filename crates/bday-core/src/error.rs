use std::fmt;

/// Machine-readable error codes for scripts and the JSON error envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigParseError,
    InvalidInput,
    RosterFull,
    DuplicateName,
    StoreWriteFailed,
    StoreReadFailed,
    LockContention,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigParseError => "E1002",
            Self::InvalidInput => "E2001",
            Self::RosterFull => "E2002",
            Self::DuplicateName => "E2003",
            Self::StoreWriteFailed => "E5001",
            Self::LockContention => "E5002",
            Self::StoreReadFailed => "E5003",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Optional remediation hint that can be surfaced to users and scripts.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigParseError => Some("Fix syntax in bday/config.toml and retry."),
            Self::InvalidInput => Some("Pass a non-empty name and a date as YYYY-MM-DD."),
            Self::RosterFull => Some("Raise roster.max_records in the config file."),
            Self::DuplicateName => Some("Use a distinguishing name, e.g. add a surname."),
            Self::StoreWriteFailed => Some("Check disk space and write permissions."),
            Self::StoreReadFailed => Some("Check read permissions on the store file."),
            Self::LockContention => Some("Retry after the other `bday` process releases its lock."),
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
