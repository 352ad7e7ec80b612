use backtrace::Backtrace;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::result::Result;
use std::sync::Arc;

use crate::common::{atomic, Atomic};
use crate::validation::ValidationResult;
use crate::Version;

/// Error kinds for upgrade operations
///
/// Every kind is terminal: the [`UpdateHelper`](crate::UpdateHelper) never retries
/// and never rolls back, it only reports what went wrong and where.
///
/// # Examples
///
/// ```rust,ignore
/// use updatehelper::errors::{UpdateError, ErrorKind, UpdateResult};
///
/// fn example() -> UpdateResult<()> {
///     Err(UpdateError::new("Latest version mismatch", ErrorKind::ConfigurationError))
/// }
/// ```
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ErrorKind {
    /// An update (or the whole update collection) expected to be present was absent
    NullInput,
    /// The worker's declared latest version disagrees with the requested target version
    ConfigurationError,
    /// The update collection failed structural validation
    ValidationError(ValidationResult),
    /// The storage reported itself closed between two steps
    ExecutionError {
        /// Version of the last update that ran to completion, if any
        last_applied_version: Option<Version>,
    },
    /// A single update failed while executing
    StepFailed {
        /// Version of the failing update, `None` if the update itself was absent
        update_version: Option<Version>,
    },
    /// A mock-data insertion or consistency check failed in an update test
    TestExecutionFailed,
    /// The operation is not valid in the current context
    InvalidOperation,
    /// Generic IO error
    IOError,
    /// Internal error (usually indicates a bug)
    InternalError,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::NullInput => write!(f, "Null input"),
            ErrorKind::ConfigurationError => write!(f, "Configuration error"),
            ErrorKind::ValidationError(result) => write!(f, "Validation error ({})", result),
            ErrorKind::ExecutionError { .. } => write!(f, "Execution error"),
            ErrorKind::StepFailed { .. } => write!(f, "Update step failed"),
            ErrorKind::TestExecutionFailed => write!(f, "Test execution failed"),
            ErrorKind::InvalidOperation => write!(f, "Invalid operation"),
            ErrorKind::IOError => write!(f, "IO error"),
            ErrorKind::InternalError => write!(f, "Internal error"),
        }
    }
}

/// Error type of the upgrade engine.
///
/// `UpdateError` carries a message, an [`ErrorKind`] and an optional cause. The cause
/// is whatever an update action or a test executor failed with, kept behind an `Arc`
/// so the error itself stays cheap to clone.
///
/// # Examples
///
/// ```rust,ignore
/// use updatehelper::errors::{UpdateError, ErrorKind};
///
/// let err = UpdateError::new("No updates provided", ErrorKind::NullInput);
///
/// let cause = anyhow::anyhow!("disk full");
/// let err = UpdateError::new_with_cause(
///     "Update with version '3' failed!",
///     ErrorKind::StepFailed { update_version: Some(3) },
///     cause,
/// );
/// ```
#[derive(Clone)]
pub struct UpdateError {
    message: String,
    error_kind: ErrorKind,
    cause: Option<Arc<anyhow::Error>>,
    backtrace: Atomic<Backtrace>,
}

impl UpdateError {
    /// Creates a new `UpdateError` with the specified message and error kind.
    pub fn new(message: &str, error_kind: ErrorKind) -> Self {
        UpdateError {
            message: message.to_string(),
            error_kind,
            cause: None,
            backtrace: atomic(Backtrace::new()),
        }
    }

    /// Creates a new `UpdateError` with a cause error.
    ///
    /// The cause is preserved and exposed through [`Error::source`].
    pub fn new_with_cause(
        message: &str,
        error_kind: ErrorKind,
        cause: impl Into<anyhow::Error>,
    ) -> Self {
        UpdateError {
            message: message.to_string(),
            error_kind,
            cause: Some(Arc::new(cause.into())),
            backtrace: atomic(Backtrace::new()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.error_kind
    }

    pub fn cause(&self) -> Option<&anyhow::Error> {
        self.cause.as_deref()
    }

    /// The validation outcome behind a [`ErrorKind::ValidationError`].
    pub fn validation_result(&self) -> Option<ValidationResult> {
        match self.error_kind {
            ErrorKind::ValidationError(result) => Some(result),
            _ => None,
        }
    }

    /// Version of the update a [`ErrorKind::StepFailed`] error refers to.
    pub fn failed_update_version(&self) -> Option<Version> {
        match self.error_kind {
            ErrorKind::StepFailed { update_version } => update_version,
            _ => None,
        }
    }

    /// Last successfully applied version reported by an [`ErrorKind::ExecutionError`].
    pub fn last_applied_version(&self) -> Option<Version> {
        match self.error_kind {
            ErrorKind::ExecutionError {
                last_applied_version,
            } => last_applied_version,
            _ => None,
        }
    }
}

impl Display for UpdateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Debug for UpdateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // print error message with stack trace followed by cause
        match &self.cause {
            Some(cause) => write!(f, "{}\nCaused by: {:?}", self.message, cause),
            None => write!(f, "{}\n{:?}", self.message, self.backtrace.read()),
        }
    }
}

impl Error for UpdateError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.cause {
            Some(cause) => {
                let cause: &anyhow::Error = cause;
                let source: &(dyn Error + Send + Sync + 'static) = cause.as_ref();
                Some(source)
            }
            None => None,
        }
    }
}

/// A result type alias for upgrade operations.
///
/// `UpdateResult<T>` is shorthand for `Result<T, UpdateError>`.
pub type UpdateResult<T> = Result<T, UpdateError>;

impl From<std::io::Error> for UpdateError {
    fn from(err: std::io::Error) -> Self {
        UpdateError::new(&format!("IO error: {}", err), ErrorKind::IOError)
    }
}

impl From<anyhow::Error> for UpdateError {
    fn from(err: anyhow::Error) -> Self {
        // an UpdateError that travelled through anyhow keeps its identity
        match err.downcast::<UpdateError>() {
            Ok(update_error) => update_error,
            Err(err) => UpdateError::new_with_cause(
                &err.to_string(),
                ErrorKind::InternalError,
                err,
            ),
        }
    }
}

impl From<String> for UpdateError {
    fn from(msg: String) -> Self {
        UpdateError::new(&msg, ErrorKind::InternalError)
    }
}

impl From<&str> for UpdateError {
    fn from(msg: &str) -> Self {
        UpdateError::new(msg, ErrorKind::InternalError)
    }
}
