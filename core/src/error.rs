//! Error types for the fallible edges of barseg: config loading, snapshot
//! decoding and click dispatch. Segment builders themselves never fail.

/// Common error type for barseg operations.
#[derive(Debug, thiserror::Error)]
pub enum SegmentError {
    /// I/O error while reading or writing config, stdin or stdout.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing a config file or a metric snapshot.
    #[error("Parse error: {message}")]
    Parse {
        /// Description of what failed to parse
        message: String,
        /// Optional source error for chaining
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration error (invalid tier list, zero budget, etc.).
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration issue
        message: String,
        /// The invalid configuration value if applicable
        value: Option<String>,
    },

    /// A click command could not be launched.
    #[error("Failed to launch '{program}': {reason}")]
    Launch {
        /// Program that was being spawned
        program: String,
        /// Why the spawn failed
        reason: String,
    },
}

impl SegmentError {
    /// Create a new parse error with a simple message.
    pub fn parse<S: Into<String>>(message: S) -> Self {
        Self::Parse {
            message: message.into(),
            source: None,
        }
    }

    /// Create a new parse error with a source error.
    pub fn parse_with_source<S: Into<String>, E>(message: S, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Parse {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new configuration error.
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
            value: None,
        }
    }

    /// Create a new configuration error with the invalid value.
    pub fn config_with_value<S: Into<String>, V: Into<String>>(message: S, value: V) -> Self {
        Self::Config {
            message: message.into(),
            value: Some(value.into()),
        }
    }

    /// Create a new launch error.
    pub fn launch<P: Into<String>, R: Into<String>>(program: P, reason: R) -> Self {
        Self::Launch {
            program: program.into(),
            reason: reason.into(),
        }
    }

    /// Check if this error represents a temporary condition.
    ///
    /// The stdin pipeline skips the offending line after a temporary error
    /// and stops on the rest.
    #[must_use]
    pub fn is_temporary(&self) -> bool {
        match self {
            Self::Parse { .. } => true,
            Self::Io(err) => matches!(
                err.kind(),
                std::io::ErrorKind::Interrupted | std::io::ErrorKind::TimedOut
            ),
            _ => false,
        }
    }
}

impl From<serde_json::Error> for SegmentError {
    fn from(err: serde_json::Error) -> Self {
        Self::parse_with_source("invalid JSON", err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_pick_the_right_variant() {
        let err = SegmentError::parse("bad line");
        assert!(matches!(err, SegmentError::Parse { .. }));

        let err = SegmentError::config_with_value("tiers out of order", "load");
        assert!(matches!(err, SegmentError::Config { value: Some(_), .. }));

        let err = SegmentError::launch("gsimplecal", "not found");
        assert_eq!(err.to_string(), "Failed to launch 'gsimplecal': not found");
    }

    #[test]
    fn temporary_classification() {
        assert!(SegmentError::parse("bad line").is_temporary());
        assert!(!SegmentError::config("nope").is_temporary());
        assert!(!SegmentError::launch("gsimplecal", "not found").is_temporary());

        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "bar exited");
        assert!(!SegmentError::from(io).is_temporary());

        let io = std::io::Error::new(std::io::ErrorKind::Interrupted, "signal");
        assert!(SegmentError::from(io).is_temporary());
    }

    #[test]
    fn json_errors_convert_to_parse() {
        let err: SegmentError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, SegmentError::Parse { source: Some(_), .. }));
    }
}
