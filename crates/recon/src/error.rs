use std::fmt;

/// Which table of a reconciliation a key pattern failed to resolve against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Target,
    Source,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Target => "target",
            Side::Source => "source",
        }
    }
}

#[derive(Debug)]
pub enum ReconError {
    /// Input had no usable header row (empty grid, workbook without sheets).
    ParseEmptyInput,
    /// Two tables expected to share the same header sequence do not.
    HeaderMismatch { expected: Vec<String>, found: Vec<String> },
    /// A key pattern selects no header on the named side.
    KeyFieldNotFound { pattern: String, side: Side },
    /// A regex key or search pattern does not compile.
    InvalidPattern { pattern: String, reason: String },
    /// Matching was requested before any master data was imported.
    NoMasterData,
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (empty key list, bad pattern, etc.).
    ConfigValidation(String),
    /// IO error (file read, workbook decode, etc.).
    Io(String),
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ParseEmptyInput => write!(f, "input has no header row"),
            Self::HeaderMismatch { expected, found } => {
                write!(
                    f,
                    "header mismatch: expected [{}], found [{}]",
                    expected.join(", "),
                    found.join(", ")
                )
            }
            Self::KeyFieldNotFound { pattern, side } => {
                write!(f, "{} table has no column matching key \"{pattern}\"", side.as_str())
            }
            Self::InvalidPattern { pattern, reason } => {
                write!(f, "invalid pattern \"{pattern}\": {reason}")
            }
            Self::NoMasterData => write!(f, "no master data imported yet"),
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for ReconError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_field_message_names_side() {
        let err = ReconError::KeyFieldNotFound {
            pattern: "订单.*号".into(),
            side: Side::Source,
        };
        assert_eq!(err.to_string(), "source table has no column matching key \"订单.*号\"");
    }

    #[test]
    fn header_mismatch_lists_both_sides() {
        let err = ReconError::HeaderMismatch {
            expected: vec!["A".into(), "B".into()],
            found: vec!["A".into(), "C".into()],
        };
        let msg = err.to_string();
        assert!(msg.contains("[A, B]"));
        assert!(msg.contains("[A, C]"));
    }
}
