use thiserror::Error;

/// All failure modes the index engine and its thin adapters can raise.
///
/// Every variant corresponds to one of the error kinds enumerated in the
/// format specification (file-absent/exists, format, argument, I/O,
/// logic/corruption). Nothing here is recovered locally; `main` turns any
/// `Err` into a single `Error: ...` diagnostic line and a non-zero exit.
#[derive(Debug, Error)]
pub enum BtError {
    #[error("index file '{0}' already exists")]
    FileExists(String),

    #[error("index file '{0}' does not exist")]
    FileNotFound(String),

    #[error("'{0}' is not a valid index file (magic marker mismatch)")]
    BadMagic(String),

    #[error("short read: block {0} did not return 512 bytes")]
    ShortBlock(u64),

    #[error("node block {0} has an impossible key count {1} (must be 0..=19)")]
    BadNumKeys(u64, u64),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Argument(String),

    #[error("{path}:{line}: {reason}")]
    MalformedLine {
        path: String,
        line: usize,
        reason: String,
    },

    #[error("corrupt tree: block {0} references a zero child where one was expected")]
    Corrupt(u64),
}
