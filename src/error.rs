use std::error::Error;
use std::fmt;
use std::io;
use std::path::PathBuf;

pub const PROG_NAME: &'static str = "rls";

/// Everything that can go wrong while listing. Each variant keeps the path
/// it happened on plus the underlying system error.
#[derive(Debug)]
pub enum LsError {
    /// A metadata query failed (covers both not-found and access-denied).
    Access { path: PathBuf, source: io::Error },
    /// A directory stream could not be opened or read.
    DirOpen { path: PathBuf, source: io::Error },
    /// A symlink's target could not be read.
    LinkRead { path: PathBuf, source: io::Error },
}

impl LsError {
    pub fn access(path: PathBuf, source: io::Error) -> LsError {
        LsError::Access { path: path, source: source }
    }

    pub fn dir_open(path: PathBuf, source: io::Error) -> LsError {
        LsError::DirOpen { path: path, source: source }
    }

    pub fn link_read(path: PathBuf, source: io::Error) -> LsError {
        LsError::LinkRead { path: path, source: source }
    }

    fn action(&self) -> &'static str {
        match *self {
            LsError::Access { .. } => "cannot access",
            LsError::DirOpen { .. } => "cannot open directory",
            LsError::LinkRead { .. } => "cannot read symbolic link",
        }
    }

    /// Bit contributed to the process exit code. Distinct failure kinds
    /// stay visible in the final status.
    pub fn exit_bit(&self) -> i32 {
        match *self {
            LsError::Access { ref source, .. } => {
                if source.kind() == io::ErrorKind::NotFound {
                    0x1
                } else {
                    0x2
                }
            }
            LsError::DirOpen { .. } => 0x4,
            LsError::LinkRead { .. } => 0x8,
        }
    }
}

impl fmt::Display for LsError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            LsError::Access { ref path, ref source }
            | LsError::DirOpen { ref path, ref source }
            | LsError::LinkRead { ref path, ref source } => {
                write!(f, "{} '{}': {}", self.action(), path.display(), source)
            }
        }
    }
}

impl Error for LsError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match *self {
            LsError::Access { ref source, .. }
            | LsError::DirOpen { ref source, .. }
            | LsError::LinkRead { ref source, .. } => Some(source),
        }
    }
}

/// Prints one uniform line per failure and folds every failure into the
/// process-wide exit code. Reporting never aborts anything by itself;
/// callers decide whether to skip an entry or a whole subtree.
pub struct ErrorReporter {
    code: i32,
    failures: usize,
}

impl ErrorReporter {
    pub fn new() -> ErrorReporter {
        ErrorReporter { code: 0, failures: 0 }
    }

    pub fn report(&mut self, err: &LsError) {
        eprintln!("{}: {}", PROG_NAME, err);
        self.code |= err.exit_bit();
        self.failures += 1;
    }

    pub fn exit_code(&self) -> i32 {
        self.code
    }

    /// Number of lines reported so far; one per failure.
    pub fn failure_count(&self) -> usize {
        self.failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn not_found() -> io::Error {
        io::Error::new(io::ErrorKind::NotFound, "No such file or directory")
    }

    #[test]
    fn exit_bits_accumulate() {
        let mut reporter = ErrorReporter::new();
        assert_eq!(reporter.exit_code(), 0);

        reporter.report(&LsError::access(PathBuf::from("/no/such"), not_found()));
        assert_eq!(reporter.exit_code(), 0x1);

        reporter.report(&LsError::dir_open(PathBuf::from("/locked"), not_found()));
        assert_eq!(reporter.exit_code(), 0x1 | 0x4);

        // Reporting the same kind again does not change the code,
        // but every report still counts.
        reporter.report(&LsError::access(PathBuf::from("/gone/too"), not_found()));
        assert_eq!(reporter.exit_code(), 0x1 | 0x4);
        assert_eq!(reporter.failure_count(), 3);
    }

    #[test]
    fn message_names_action_path_and_cause() {
        let err = LsError::access(PathBuf::from("/no/such/path"), not_found());
        let line = format!("{}", err);
        assert!(line.starts_with("cannot access '/no/such/path':"));
        assert!(line.contains("No such file or directory"));
    }

    #[test]
    fn access_denied_uses_its_own_bit() {
        let denied = io::Error::new(io::ErrorKind::PermissionDenied, "Permission denied");
        let err = LsError::access(PathBuf::from("/root/secret"), denied);
        assert_eq!(err.exit_bit(), 0x2);
    }
}
