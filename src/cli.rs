use std::path::PathBuf;

use clap::Parser;

use crate::error::ProvisionResult;
use crate::settings::Settings;

#[derive(Debug, Parser)]
#[command(name = "immich-bootstrap")]
#[command(about = "Provision this host to run Immich behind Nginx with TLS")]
pub struct Cli {
    /// TOML file overriding the default settings
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Domain to serve; prompted for when omitted
    #[arg(long)]
    pub domain: Option<String>,

    /// Directory receiving the deployment manifests
    #[arg(long)]
    pub work_dir: Option<PathBuf>,

    /// Print commands without executing them
    #[arg(long)]
    pub dry_run: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Resolve settings: defaults, then the config file, then
    /// flags.
    pub fn settings(&self) -> ProvisionResult<Settings> {
        let mut settings = match &self.config {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };
        if let Some(domain) = &self.domain {
            settings = settings.domain(domain);
        }
        if let Some(dir) = &self.work_dir {
            settings = settings.work_dir(dir.clone());
        }
        Ok(settings)
    }
}
