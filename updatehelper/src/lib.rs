#![allow(
    clippy::new_without_default,
)]
//! # UpdateHelper - Version-Sequenced Storage Upgrades
//!
//! UpdateHelper brings a versioned storage (a database, a settings file, anything
//! with a version number) from the version it is at to the version the application
//! expects. The caller supplies a worker that creates the updates and knows the
//! storage; the helper checks the updates and runs the pending ones in order.
//!
//! ## Key Features
//!
//! - **Validation First**: Updates are checked for order, duplicates and the final
//!   version before anything touches the storage
//! - **Skipping**: Updates the storage already has are skipped
//! - **Hooks**: Pre, post and completion hooks on the worker
//! - **Typed Errors**: Every failure carries an [`ErrorKind`] with the failing or last
//!   applied version
//! - **Testing**: Updates can test themselves right after they ran, see [`testing`]
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use updatehelper::{FnUpdate, UpdateCollection, UpdateHelper, UpdateWorker, Version};
//!
//! struct Worker;
//!
//! impl UpdateWorker for Worker {
//!     type Storage = Vec<String>;
//!     type Update = FnUpdate<Vec<String>, fn(&mut Vec<String>) -> anyhow::Result<()>>;
//!
//!     fn latest_update_version(&self, _: &Vec<String>) -> Version {
//!         1
//!     }
//!
//!     fn create_updates(&mut self) -> UpdateCollection<Self::Update> {
//!         vec![FnUpdate::new(1, add_header as _)].into()
//!     }
//!
//!     fn is_storage_closed(&self, _: &Vec<String>) -> bool {
//!         false
//!     }
//! }
//!
//! let mut storage = Vec::new();
//! let summary = UpdateHelper::new(Worker).on_upgrade(&mut storage, 0, 1)?;
//! assert_eq!(summary.applied_versions, vec![1]);
//! ```
//!
//! ## Module Organization
//!
//! - [`common`] - Shared utilities
//! - [`errors`] - Error types and result definitions
//! - [`testing`] - Self-testing updates and test workers
//! - [`update`] - The update trait and update collections
//! - [`validation`] - Update validation

pub mod common;
pub mod errors;
pub mod testing;
pub mod update;
pub mod validation;

mod update_builder;
mod update_config;
mod update_helper;
mod worker;

pub use errors::{ErrorKind, UpdateError, UpdateResult};
pub use update::{FnUpdate, Update, UpdateCollection};
pub use update_builder::UpdateHelperBuilder;
pub use update_config::UpdateConfig;
pub use update_helper::{UpdateHelper, UpgradeSummary};
pub use validation::{validate_updates, ValidationResult};
pub use worker::UpdateWorker;

/// A storage version. Versions are compared numerically.
pub type Version = i64;

/// Label used in log lines when none was configured.
pub const DEFAULT_LABEL: &str = "storage";
