use std::path::PathBuf;

use immich_bootstrap::ProvisionError;

#[test]
fn display_command_failed() {
    let err = ProvisionError::CommandFailed {
        command: "sudo apt update -y".into(),
        code: Some(100),
        stderr: String::new(),
    };
    assert_eq!(err.to_string(), "command failed: sudo apt update -y");
}

#[test]
fn display_file_not_found() {
    let err = ProvisionError::FileNotFound(PathBuf::from("/immich-app/.env"));
    assert_eq!(err.to_string(), "file not found: /immich-app/.env");
}

#[test]
fn display_mismatch() {
    assert_eq!(ProvisionError::Mismatch.to_string(), "passwords do not match");
}

#[test]
fn display_key_not_found() {
    let err = ProvisionError::KeyNotFound {
        key: "DB_PASSWORD".into(),
        path: PathBuf::from("/app/.env"),
    };
    assert_eq!(err.to_string(), "DB_PASSWORD entry not found in /app/.env");
}

#[test]
fn display_marker_not_found() {
    let err = ProvisionError::MarkerNotFound {
        marker: "types_hash_max_size".into(),
        path: PathBuf::from("/etc/nginx/nginx.conf"),
    };
    assert_eq!(
        err.to_string(),
        "'types_hash_max_size' not found in /etc/nginx/nginx.conf"
    );
}

#[test]
fn exit_code_propagates_command_status() {
    let err = ProvisionError::CommandFailed {
        command: "sudo ufw allow 80".into(),
        code: Some(42),
        stderr: String::new(),
    };
    assert_eq!(err.exit_code(), 42);
}

#[test]
fn exit_code_for_signal_is_one() {
    let err = ProvisionError::CommandFailed {
        command: "wget".into(),
        code: None,
        stderr: String::new(),
    };
    assert_eq!(err.exit_code(), 1);
}

#[test]
fn exit_code_for_validation_is_one() {
    assert_eq!(ProvisionError::Mismatch.exit_code(), 1);
    assert_eq!(
        ProvisionError::FileNotFound(PathBuf::from(".env")).exit_code(),
        1
    );
}

#[test]
fn from_io_error() {
    let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
    let err: ProvisionError = io_err.into();
    assert!(matches!(err, ProvisionError::Io(_)));
}

#[test]
fn from_yaml_error() {
    let yaml_err = serde_yaml::from_str::<Vec<u64>>("{").unwrap_err();
    let err: ProvisionError = yaml_err.into();
    assert!(matches!(err, ProvisionError::Yaml(_)));
}
