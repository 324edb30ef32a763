use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::{ProvisionError, ProvisionResult};
use crate::nginx;

/// Tunables for a provisioning run. Every field has a default,
/// so an empty TOML file is a valid config.
///
/// # Example
///
/// ```
/// use immich_bootstrap::Settings;
///
/// let settings = Settings::from_toml(
///     "work_dir = \"/opt/immich\"\nfirewall_ports = [80, 443, 22]",
/// )
/// .unwrap();
///
/// assert_eq!(settings.work_dir.to_str(), Some("/opt/immich"));
/// assert_eq!(settings.upstream, "http://localhost:2283");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Domain served by the virtual host. Prompted for when
    /// unset.
    pub domain: Option<String>,
    /// Directory receiving the deployment manifests and `.env`.
    pub work_dir: PathBuf,
    /// Base URL the manifests are downloaded from.
    pub release_url: String,
    pub nginx_conf: PathBuf,
    pub nginx_marker: String,
    pub nginx_directive: String,
    /// Address Nginx proxies requests to.
    pub upstream: String,
    pub vhost_max_body_size: String,
    pub web_root: String,
    pub sites_available: String,
    pub sites_enabled: String,
    pub firewall_ports: Vec<u16>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            domain: None,
            work_dir: PathBuf::from("./immich-app"),
            release_url: "https://github.com/immich-app/immich/releases/latest/download"
                .to_string(),
            nginx_conf: PathBuf::from(nginx::DEFAULT_CONF_PATH),
            nginx_marker: nginx::DEFAULT_MARKER.to_string(),
            nginx_directive: nginx::DEFAULT_DIRECTIVE.to_string(),
            upstream: "http://localhost:2283".to_string(),
            vhost_max_body_size: "50000M".to_string(),
            web_root: "/var/www".to_string(),
            sites_available: "/etc/nginx/sites-available".to_string(),
            sites_enabled: "/etc/nginx/sites-enabled".to_string(),
            firewall_ports: vec![80, 443],
        }
    }
}

impl Settings {
    pub fn from_toml(content: &str) -> ProvisionResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load settings from a TOML file.
    pub fn load(path: &Path) -> ProvisionResult<Self> {
        if !path.is_file() {
            return Err(ProvisionError::FileNotFound(path.to_path_buf()));
        }
        debug!(path = %path.display(), "loading settings");
        Self::from_toml(&fs::read_to_string(path)?)
    }

    #[must_use]
    pub fn domain(mut self, domain: &str) -> Self {
        self.domain = Some(domain.to_string());
        self
    }

    #[must_use]
    pub fn work_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.work_dir = dir.into();
        self
    }

    #[must_use]
    pub fn nginx_conf(mut self, path: impl Into<PathBuf>) -> Self {
        self.nginx_conf = path.into();
        self
    }
}

/// Check that `domain` is usable as an Nginx `server_name`, a
/// file name, and a shell argument.
pub fn validate_domain(domain: &str) -> ProvisionResult<()> {
    let invalid = |reason: &str| ProvisionError::InvalidDomain {
        domain: domain.to_string(),
        reason: reason.to_string(),
    };

    if domain.is_empty() {
        return Err(invalid("cannot be empty"));
    }
    if domain.starts_with(['.', '-']) || domain.ends_with(['.', '-']) {
        return Err(invalid("cannot start or end with '.' or '-'"));
    }
    if let Some(ch) = domain
        .chars()
        .find(|c| !c.is_ascii_alphanumeric() && *c != '.' && *c != '-')
    {
        return Err(invalid(&format!("invalid character '{ch}'")));
    }
    Ok(())
}
