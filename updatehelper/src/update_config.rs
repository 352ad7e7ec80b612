//! Configuration management for the update helper.

use crate::common::{atomic, Atomic};
use crate::errors::{ErrorKind, UpdateError, UpdateResult};
use crate::DEFAULT_LABEL;
use log::Level;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Public interface for the update helper configuration.
///
/// The configuration is frozen once an [`UpdateHelper`](crate::UpdateHelper) is built
/// from it; later changes are rejected with [`ErrorKind::InvalidOperation`].
///
/// # Examples
///
/// ```rust,ignore
/// use updatehelper::UpdateHelper;
///
/// let helper = UpdateHelper::builder(worker)
///     .label("accounts-db")
///     .step_log_level(log::Level::Info)
///     .build()?;
/// ```
#[derive(Clone)]
pub struct UpdateConfig {
    /// The pointer to implementation. Uses Arc for cheap cloning.
    inner: Arc<UpdateConfigInner>,
}

impl Default for UpdateConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl UpdateConfig {
    /// Creates a new configuration instance with default values.
    pub fn new() -> Self {
        UpdateConfig {
            inner: Arc::new(UpdateConfigInner::new()),
        }
    }

    /// Returns the label used to tag every log line of an upgrade run.
    pub fn label(&self) -> String {
        self.inner.label()
    }

    /// Sets the label used to tag log lines.
    ///
    /// # Errors
    ///
    /// Returns error if already initialized or if the label is blank.
    pub fn set_label(&self, label: &str) -> UpdateResult<()> {
        self.inner.set_label(label)
    }

    /// Returns the log level used for per-step progress lines.
    pub fn step_log_level(&self) -> Level {
        self.inner.step_log_level()
    }

    /// Sets the log level used for per-step progress lines.
    ///
    /// # Errors
    ///
    /// Returns error if already initialized.
    pub fn set_step_log_level(&self, level: Level) -> UpdateResult<()> {
        self.inner.set_step_log_level(level)
    }

    /// Returns whether the configuration has been frozen.
    pub fn is_initialized(&self) -> bool {
        self.inner.configured.load(Ordering::Relaxed)
    }

    pub(crate) fn initialize(&self) {
        self.inner.configured.store(true, Ordering::Relaxed);
    }
}

/// Private implementation of the update helper configuration.
struct UpdateConfigInner {
    /// Indicates whether this configuration has been initialized
    configured: AtomicBool,
    label: Atomic<String>,
    step_log_level: Atomic<Level>,
}

impl UpdateConfigInner {
    fn new() -> Self {
        UpdateConfigInner {
            configured: AtomicBool::from(false),
            label: atomic(DEFAULT_LABEL.to_string()),
            step_log_level: atomic(Level::Debug),
        }
    }

    fn label(&self) -> String {
        self.label.read().clone()
    }

    fn set_label(&self, label: &str) -> UpdateResult<()> {
        if self.configured.load(Ordering::Relaxed) {
            log::error!("Label cannot be changed after initialization");
            return Err(UpdateError::new(
                "Label cannot be changed after initialization",
                ErrorKind::InvalidOperation,
            ));
        }

        let label = label.trim();
        if label.is_empty() {
            log::error!("Label cannot be empty");
            return Err(UpdateError::new(
                "Label cannot be empty",
                ErrorKind::InvalidOperation,
            ));
        }

        *self.label.write() = label.to_string();
        Ok(())
    }

    fn step_log_level(&self) -> Level {
        *self.step_log_level.read()
    }

    fn set_step_log_level(&self, level: Level) -> UpdateResult<()> {
        if self.configured.load(Ordering::Relaxed) {
            log::error!("Step log level cannot be changed after initialization");
            return Err(UpdateError::new(
                "Step log level cannot be changed after initialization",
                ErrorKind::InvalidOperation,
            ));
        }
        *self.step_log_level.write() = level;
        Ok(())
    }
}
