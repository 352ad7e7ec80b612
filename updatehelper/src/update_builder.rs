use crate::errors::{UpdateError, UpdateResult};
use crate::update_config::UpdateConfig;
use crate::update_helper::UpdateHelper;
use crate::worker::UpdateWorker;
use log::Level;

/// Builder for creating and configuring an [`UpdateHelper`].
///
/// Configuration errors are captured as they happen and reported by
/// [`build`](Self::build), so the chain never has to be broken up.
///
/// # Examples
///
/// ```rust,ignore
/// use updatehelper::UpdateHelper;
///
/// let mut helper = UpdateHelper::builder(&mut worker)
///     .label("settings-file")
///     .step_log_level(log::Level::Info)
///     .build()?;
/// helper.on_upgrade(&mut storage, 1, 4)?;
/// ```
pub struct UpdateHelperBuilder<W> {
    error: Option<UpdateError>,
    config: UpdateConfig,
    worker: W,
}

impl<W: UpdateWorker> UpdateHelperBuilder<W> {
    /// Creates a new `UpdateHelperBuilder` with default configuration.
    pub fn new(worker: W) -> Self {
        UpdateHelperBuilder {
            error: None,
            config: UpdateConfig::new(),
            worker,
        }
    }

    /// Sets the label every log line of an upgrade is tagged with.
    ///
    /// A blank label is captured as an error and returned by `build()`.
    pub fn label(mut self, label: &str) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.config.set_label(label) {
                self.error = Some(e);
            }
        }
        self
    }

    /// Sets the log level of the per-update progress lines.
    pub fn step_log_level(mut self, level: Level) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.config.set_step_log_level(level) {
                self.error = Some(e);
            }
        }
        self
    }

    /// Builds the helper.
    ///
    /// # Errors
    ///
    /// Returns the first error captured while configuring.
    pub fn build(self) -> UpdateResult<UpdateHelper<W>> {
        if let Some(error) = self.error {
            return Err(error);
        }
        Ok(UpdateHelper::with_config(self.worker, self.config))
    }
}
