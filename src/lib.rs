//! Provision an Ubuntu host to run a self-hosted Immich instance.
//!
//! One run takes a fresh host to a working deployment: base
//! packages and Docker are installed, the Immich release
//! manifests are downloaded, the database password is set, Nginx
//! is configured as a reverse proxy for the chosen domain, the
//! firewall is opened and a TLS certificate is requested.
//!
//! # Overview
//!
//! A run is a [`Pipeline`] walking the fixed [`Stage`] sequence.
//! It talks to the outside world through two seams:
//!
//! - A [`Runner`](cmd::Runner) executing shell commands
//!   ([`Shell`](cmd::Shell), or [`DryRun`](cmd::DryRun) to only
//!   print them)
//! - A [`Prompter`](prompt::Prompter) asking the operator for
//!   the domain and the database password
//!   ([`Terminal`](prompt::Terminal), or
//!   [`Scripted`](prompt::Scripted) for canned answers)
//!
//! The two local file edits are plain functions usable on their
//! own: [`env_file::update_db_password`] and
//! [`nginx::add_directive`].
//!
//! # Example
//!
//! ```rust,no_run
//! use immich_bootstrap::{Pipeline, Settings};
//!
//! fn main() -> anyhow::Result<()> {
//!     let settings = Settings::default()
//!         .domain("photos.example.com")
//!         .work_dir("/opt/immich-app");
//!
//!     Pipeline::new(settings).run()?;
//!     Ok(())
//! }
//! ```
//!
//! Every stage fails fast: the first failing command stops the
//! run and nothing already done is rolled back.

// Allow noisy pedantic lints that don't add value for a
// provisioning tool crate.
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

pub mod cli;
pub mod cmd;
pub mod env_file;
pub mod error;
pub mod manifest;
pub mod nginx;
pub mod pipeline;
pub mod prompt;
pub mod settings;
pub mod vhost;

pub use error::{ProvisionError, ProvisionResult};
pub use pipeline::{Pipeline, Stage};
pub use settings::Settings;
pub use vhost::VirtualHost;
