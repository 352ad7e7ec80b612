use crate::errors::{ErrorKind, UpdateError, UpdateResult};
use crate::update::Update;
use crate::update_builder::UpdateHelperBuilder;
use crate::update_config::UpdateConfig;
use crate::validation::validate_updates;
use crate::worker::UpdateWorker;
use crate::Version;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Report of a finished upgrade run.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UpgradeSummary {
    /// The version the storage was at before the run.
    pub from_version: Version,
    /// The version the storage is at now.
    pub to_version: Version,
    /// Versions of the executed updates, in execution order.
    pub applied_versions: Vec<Version>,
    /// Number of declared updates skipped because the storage already had them.
    pub skipped: usize,
}

impl UpgradeSummary {
    fn new(from_version: Version, to_version: Version) -> Self {
        UpgradeSummary {
            from_version,
            to_version,
            applied_versions: Vec::new(),
            skipped: 0,
        }
    }

    /// Returns `true` if the run did not execute any update.
    pub fn is_noop(&self) -> bool {
        self.applied_versions.is_empty()
    }
}

/// Validates and applies the updates of an [`UpdateWorker`] to a storage.
///
/// The helper itself holds no state between calls besides its worker and its
/// configuration. Pass `&mut worker` to keep ownership of the worker on the
/// caller's side.
///
/// # Examples
///
/// ```rust,ignore
/// use updatehelper::UpdateHelper;
///
/// let mut helper = UpdateHelper::new(&mut worker);
/// let summary = helper.on_upgrade(&mut storage, stored_version, 5)?;
/// save_version(&storage, summary.to_version)?;
/// ```
pub struct UpdateHelper<W> {
    worker: W,
    config: UpdateConfig,
}

impl<W: UpdateWorker> UpdateHelper<W> {
    /// Creates a helper with the default configuration.
    pub fn new(worker: W) -> Self {
        let config = UpdateConfig::new();
        config.initialize();
        UpdateHelper { worker, config }
    }

    /// Starts configuring a helper for `worker`.
    pub fn builder(worker: W) -> UpdateHelperBuilder<W> {
        UpdateHelperBuilder::new(worker)
    }

    pub(crate) fn with_config(worker: W, config: UpdateConfig) -> Self {
        config.initialize();
        UpdateHelper { worker, config }
    }

    pub fn config(&self) -> &UpdateConfig {
        &self.config
    }

    pub fn worker(&self) -> &W {
        &self.worker
    }

    pub fn worker_mut(&mut self) -> &mut W {
        &mut self.worker
    }

    pub fn into_worker(self) -> W {
        self.worker
    }

    /// Upgrades `storage` from `old_version` to `new_version`.
    ///
    /// Nothing happens if both versions are equal. Otherwise the worker's latest
    /// version must match `new_version` and its updates must pass validation before
    /// the first update runs. Updates with a version of `old_version` or lower are
    /// skipped. Before each remaining update the storage is checked for closure,
    /// then the pre-hook, the update and the post-hook run. The completion hook runs
    /// once every pending update succeeded.
    ///
    /// # Errors
    ///
    /// - [`ErrorKind::ConfigurationError`] if the latest version differs from `new_version`
    /// - [`ErrorKind::NullInput`] if the worker handed out a collection with holes
    /// - [`ErrorKind::ValidationError`] if the updates are empty, unordered, duplicated
    ///   or do not end at the latest version
    /// - [`ErrorKind::ExecutionError`] if the storage was closed between two updates
    /// - [`ErrorKind::StepFailed`] if an update failed
    ///
    /// Hook errors are returned unchanged. Updates applied before a failure are not
    /// undone.
    pub fn on_upgrade(
        &mut self,
        storage: &mut W::Storage,
        old_version: Version,
        new_version: Version,
    ) -> UpdateResult<UpgradeSummary> {
        let label = self.config.label();
        if old_version == new_version {
            log::debug!("[{}] Storage already at version {}", label, new_version);
            return Ok(UpgradeSummary::new(old_version, new_version));
        }

        let latest_version = self.worker.latest_update_version(storage);
        if latest_version != new_version {
            log::error!(
                "[{}] Latest update version {} does not match target version {}",
                label,
                latest_version,
                new_version
            );
            return Err(UpdateError::new(
                &format!(
                    "Latest update version '{}' differs from the requested version '{}'",
                    latest_version, new_version
                ),
                ErrorKind::ConfigurationError,
            ));
        }

        let updates = self.worker.create_updates();
        let validation = validate_updates(Some(&updates), latest_version)?;
        if let Some(err) = validation.into_error() {
            log::error!("[{}] Invalid updates: {}", label, err);
            return Err(err);
        }

        log::info!(
            "[{}] Upgrading storage from version {} to {}",
            label,
            old_version,
            new_version
        );

        let step_level = self.config.step_log_level();
        let mut summary = UpgradeSummary::new(old_version, new_version);
        let mut last_applied_version: Option<Version> = None;

        for slot in updates.iter() {
            let update = match slot {
                Some(update) if update.update_version() <= old_version => {
                    summary.skipped += 1;
                    continue;
                }
                Some(update) => update,
                None => {
                    log::error!(
                        "[{}] Missing update after version {:?}",
                        label,
                        last_applied_version
                    );
                    return Err(UpdateError::new_with_cause(
                        "Update with version 'null' failed!",
                        ErrorKind::StepFailed {
                            update_version: None,
                        },
                        UpdateError::new("The update is null", ErrorKind::NullInput),
                    ));
                }
            };
            let version = update.update_version();

            if self.worker.is_storage_closed(storage) {
                log::error!(
                    "[{}] Storage closed before update {}, last applied version {:?}",
                    label,
                    version,
                    last_applied_version
                );
                let message = match last_applied_version {
                    Some(last) => format!(
                        "Storage was closed before update '{}'. Last applied update: '{}'",
                        version, last
                    ),
                    None => format!(
                        "Storage was closed before update '{}'. No update was applied",
                        version
                    ),
                };
                return Err(UpdateError::new(
                    &message,
                    ErrorKind::ExecutionError {
                        last_applied_version,
                    },
                ));
            }

            self.worker.on_pre_update(storage, update)?;

            log::log!(step_level, "[{}] Executing update {}", label, version);
            if let Err(cause) = update.execute(storage) {
                log::error!("[{}] Update {} failed: {}", label, version, cause);
                return Err(UpdateError::new_with_cause(
                    &format!("Update with version '{}' failed!", version),
                    ErrorKind::StepFailed {
                        update_version: Some(version),
                    },
                    cause,
                ));
            }

            self.worker.on_post_update(storage, update)?;
            last_applied_version = Some(version);
            summary.applied_versions.push(version);
        }

        self.worker.on_upgrading_done(storage)?;
        log::info!(
            "[{}] Upgrade to version {} done, {} update(s) applied, {} skipped",
            label,
            new_version,
            summary.applied_versions.len(),
            summary.skipped
        );
        Ok(summary)
    }

    /// Returns the versions [`on_upgrade`](Self::on_upgrade) would execute, without
    /// executing anything or calling any hook.
    ///
    /// Runs the same version check and validation as an upgrade and fails the same way.
    pub fn plan_upgrade(
        &mut self,
        storage: &W::Storage,
        old_version: Version,
        new_version: Version,
    ) -> UpdateResult<Vec<Version>> {
        if old_version == new_version {
            return Ok(Vec::new());
        }

        let latest_version = self.worker.latest_update_version(storage);
        if latest_version != new_version {
            log::error!(
                "[{}] Latest update version {} does not match target version {}",
                self.config.label(),
                latest_version,
                new_version
            );
            return Err(UpdateError::new(
                &format!(
                    "Latest update version '{}' differs from the requested version '{}'",
                    latest_version, new_version
                ),
                ErrorKind::ConfigurationError,
            ));
        }

        let updates = self.worker.create_updates();
        validate_updates(Some(&updates), latest_version)?.ensure_correct()?;

        Ok(updates
            .iter()
            .flatten()
            .map(|update| update.update_version())
            .filter(|version| *version > old_version)
            .collect())
    }
}
