use std::fmt;

/// All failures surfaced across the engine boundary.
///
/// Usage errors (stale handles, release-order violations, step-protocol
/// violations) are distinguished values rather than silent corruption: the
/// handle registry can always detect them, and a host boundary should report
/// a caller bug instead of continuing with undefined state.
#[derive(Debug)]
pub enum EngineError {
    /// Compile-time/link-time compatibility token did not match this build.
    VersionMismatch {
        kind: &'static str,
        expected: u32,
        got: u32,
    },
    /// Handle was never valid, already released, or outlived its resource.
    StaleHandle { kind: &'static str },
    /// Release order violation: children must be released before parents.
    DependentsAlive {
        kind: &'static str,
        dependents: usize,
    },
    /// Two-phase step protocol or mid-step access violation.
    ProtocolViolation {
        op: &'static str,
        reason: &'static str,
    },
    /// Local precondition failure (bad geometry, kinematic misuse, ...).
    Validation(String),
    /// Collection template index out of range.
    IndexOutOfRange { index: u32, len: u32 },
    /// File I/O failure while loading a collection.
    Io(std::io::Error),
    /// Malformed serialized collection data.
    Parse(String),
}

pub type EngineResult<T> = Result<T, EngineError>;

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::VersionMismatch {
                kind,
                expected,
                got,
            } => write!(
                f,
                "{} version mismatch: expected {:#010x}, got {:#010x}",
                kind, expected, got
            ),
            EngineError::StaleHandle { kind } => {
                write!(f, "stale {} handle (released or never created)", kind)
            }
            EngineError::DependentsAlive { kind, dependents } => write!(
                f,
                "cannot release {}: {} dependent resource(s) still live",
                kind, dependents
            ),
            EngineError::ProtocolViolation { op, reason } => {
                write!(f, "protocol violation in {}: {}", op, reason)
            }
            EngineError::Validation(msg) => write!(f, "validation failed: {}", msg),
            EngineError::IndexOutOfRange { index, len } => {
                write!(f, "template index {} out of range (collection has {})", index, len)
            }
            EngineError::Io(err) => write!(f, "i/o error: {}", err),
            EngineError::Parse(msg) => write!(f, "parse error: {}", msg),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for EngineError {
    fn from(err: std::io::Error) -> Self {
        EngineError::Io(err)
    }
}
