mod support;

use std::fs;
use std::path::Path;

use immich_bootstrap::ProvisionError;
use immich_bootstrap::manifest::{self, MANIFESTS};

#[test]
fn download_order() {
    let names: Vec<&str> = MANIFESTS.iter().map(|m| m.file_name).collect();

    assert_eq!(
        names,
        vec![
            "docker-compose.yml",
            ".env",
            "hwaccel.transcoding.yml",
            "hwaccel.ml.yml"
        ]
    );
}

#[test]
fn download_commands_target_work_dir() {
    let release = "https://github.com/immich-app/immich/releases/latest/download";
    let dir = Path::new("/opt/immich-app");

    let commands: Vec<String> = MANIFESTS
        .iter()
        .map(|m| m.download_command(release, dir))
        .collect();

    assert_eq!(
        commands[0],
        "wget -O '/opt/immich-app/docker-compose.yml' \
         'https://github.com/immich-app/immich/releases/latest/download/docker-compose.yml'"
    );
    assert!(commands.iter().all(|c| c.starts_with("wget -O '/opt/immich-app/")));
}

#[test]
fn verify_lists_services() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("docker-compose.yml"), support::COMPOSE).unwrap();

    let services = manifest::verify_compose(dir.path()).unwrap();

    assert_eq!(services, vec!["immich-server", "database"]);
}

#[test]
fn verify_rejects_empty_services() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("docker-compose.yml"), "services: {}\n").unwrap();

    let err = manifest::verify_compose(dir.path()).unwrap_err();

    assert!(matches!(err, ProvisionError::InvalidManifest { .. }));
}

#[test]
fn verify_rejects_garbage() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("docker-compose.yml"),
        "<html>Not Found</html>\n",
    )
    .unwrap();

    assert!(manifest::verify_compose(dir.path()).is_err());
}

#[test]
fn verify_missing_file() {
    let dir = tempfile::tempdir().unwrap();

    let err = manifest::verify_compose(dir.path()).unwrap_err();

    assert!(matches!(err, ProvisionError::FileNotFound(_)));
}
