use std::fs;
use std::path::{Path, PathBuf};

use docker_compose_types::Compose;

use crate::cmd::quote;
use crate::error::{ProvisionError, ProvisionResult};

/// A release asset and the name it is saved under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Manifest {
    pub asset: &'static str,
    pub file_name: &'static str,
}

/// Files fetched from the Immich release, in download order.
pub const MANIFESTS: [Manifest; 4] = [
    Manifest {
        asset: "docker-compose.yml",
        file_name: "docker-compose.yml",
    },
    Manifest {
        asset: "example.env",
        file_name: ".env",
    },
    Manifest {
        asset: "hwaccel.transcoding.yml",
        file_name: "hwaccel.transcoding.yml",
    },
    Manifest {
        asset: "hwaccel.ml.yml",
        file_name: "hwaccel.ml.yml",
    },
];

pub const COMPOSE_FILE: &str = "docker-compose.yml";

impl Manifest {
    #[must_use]
    pub fn url(&self, release_url: &str) -> String {
        format!("{}/{}", release_url.trim_end_matches('/'), self.asset)
    }

    #[must_use]
    pub fn destination(&self, dir: &Path) -> PathBuf {
        dir.join(self.file_name)
    }

    /// `wget` command line saving this asset into `dir`.
    #[must_use]
    pub fn download_command(&self, release_url: &str, dir: &Path) -> String {
        format!(
            "wget -O {} {}",
            quote(&self.destination(dir).to_string_lossy()),
            quote(&self.url(release_url))
        )
    }
}

/// Parse compose content and return its service names.
pub fn compose_services(content: &str, path: &Path) -> ProvisionResult<Vec<String>> {
    let compose: Compose = serde_yaml::from_str(content)?;
    let services: Vec<String> = compose.services.0.keys().cloned().collect();

    if services.is_empty() {
        return Err(ProvisionError::InvalidManifest {
            path: path.to_path_buf(),
            reason: "no services defined".into(),
        });
    }
    Ok(services)
}

/// Check that the downloaded `docker-compose.yml` in `dir`
/// parses and declares at least one service.
pub fn verify_compose(dir: &Path) -> ProvisionResult<Vec<String>> {
    let path = dir.join(COMPOSE_FILE);
    if !path.is_file() {
        return Err(ProvisionError::FileNotFound(path));
    }
    compose_services(&fs::read_to_string(&path)?, &path)
}
