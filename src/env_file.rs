use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::{ProvisionError, ProvisionResult};
use crate::prompt::Prompter;

/// Key holding the database password in Immich's `.env`.
pub const DB_PASSWORD_KEY: &str = "DB_PASSWORD";

/// Name of the environment file inside the deployment
/// directory.
pub const ENV_FILE_NAME: &str = ".env";

/// Replace the value of every line starting with `KEY=`.
///
/// Returns the rewritten content and the number of lines
/// replaced. Replaced lines always end in `\n`; every other
/// line is passed through byte for byte.
#[must_use]
pub fn replace_value(content: &str, key: &str, value: &str) -> (String, usize) {
    let prefix = format!("{key}=");
    let mut out = String::with_capacity(content.len() + value.len());
    let mut replaced = 0;

    for line in content.split_inclusive('\n') {
        if line.starts_with(&prefix) {
            out.push_str(&prefix);
            out.push_str(value);
            out.push('\n');
            replaced += 1;
        } else {
            out.push_str(line);
        }
    }

    (out, replaced)
}

/// Rewrite `KEY=` lines of the file at `path` in place.
///
/// The file is always rewritten, even when no line matches; in
/// that case the content is unchanged and
/// [`ProvisionError::KeyNotFound`] is returned.
pub fn set_value(path: &Path, key: &str, value: &str) -> ProvisionResult<usize> {
    if !path.is_file() {
        return Err(ProvisionError::FileNotFound(path.to_path_buf()));
    }

    let content = fs::read_to_string(path)?;
    let (updated, replaced) = replace_value(&content, key, value);
    fs::write(path, updated)?;

    if replaced == 0 {
        return Err(ProvisionError::KeyNotFound {
            key: key.to_string(),
            path: path.to_path_buf(),
        });
    }
    Ok(replaced)
}

/// Prompt twice for a new database password and store it in
/// `<dir>/.env`.
///
/// Nothing is written unless the file exists and both answers
/// agree.
pub fn update_db_password(dir: &Path, prompter: &mut dyn Prompter) -> ProvisionResult<()> {
    let path = dir.join(ENV_FILE_NAME);
    if !path.is_file() {
        return Err(ProvisionError::FileNotFound(path));
    }

    let password = prompter.secret("Enter the new DB password")?;
    let confirm = prompter.secret("Confirm the new DB password")?;
    if *password != *confirm {
        return Err(ProvisionError::Mismatch);
    }

    set_value(&path, DB_PASSWORD_KEY, &password)?;
    info!(path = %path.display(), "DB password updated");
    eprintln!("DB password updated successfully.");
    Ok(())
}
