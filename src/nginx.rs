use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::{ProvisionError, ProvisionResult};

pub const DEFAULT_CONF_PATH: &str = "/etc/nginx/nginx.conf";
pub const DEFAULT_MARKER: &str = "types_hash_max_size";
pub const DEFAULT_DIRECTIVE: &str = "client_max_body_size 500M;";

/// Leading run of spaces and tabs of `line`.
#[must_use]
pub fn indentation(line: &str) -> &str {
    let content = line.trim_start_matches([' ', '\t']);
    &line[..line.len() - content.len()]
}

/// Insert `directive` on its own line right after the first line
/// containing `marker`, indented like that line.
///
/// Returns the rewritten content and whether an insertion took
/// place. Without a match the content is returned unchanged.
#[must_use]
pub fn insert_after_marker(content: &str, marker: &str, directive: &str) -> (String, bool) {
    let mut out = String::with_capacity(content.len() + directive.len() + 8);
    let mut inserted = false;

    for line in content.split_inclusive('\n') {
        out.push_str(line);
        if !inserted && line.contains(marker) {
            if !line.ends_with('\n') {
                out.push('\n');
            }
            out.push_str(indentation(line));
            out.push_str(directive);
            out.push('\n');
            inserted = true;
        }
    }

    (out, inserted)
}

/// Add `directive` after the first `marker` line of the config
/// file at `path`, rewriting it in place.
///
/// The file is rewritten even when the marker is missing, in
/// which case [`ProvisionError::MarkerNotFound`] is returned.
pub fn add_directive(path: &Path, marker: &str, directive: &str) -> ProvisionResult<()> {
    if !path.is_file() {
        return Err(ProvisionError::FileNotFound(path.to_path_buf()));
    }

    let content = fs::read_to_string(path)?;
    let (updated, inserted) = insert_after_marker(&content, marker, directive);
    fs::write(path, updated)?;

    if !inserted {
        return Err(ProvisionError::MarkerNotFound {
            marker: marker.to_string(),
            path: path.to_path_buf(),
        });
    }

    info!(path = %path.display(), directive, "nginx directive added");
    eprintln!("Configuration line added successfully.");
    Ok(())
}

/// Add `client_max_body_size 500M;` after `types_hash_max_size`
/// in the config file at `path`.
pub fn add_client_max_body_size(path: &Path) -> ProvisionResult<()> {
    add_directive(path, DEFAULT_MARKER, DEFAULT_DIRECTIVE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indentation_mixed() {
        assert_eq!(indentation("\t  types_hash_max_size 2048;\n"), "\t  ");
        assert_eq!(indentation("http {\n"), "");
    }

    #[test]
    fn inserts_with_same_indent() {
        let input = "http {\n  types_hash_max_size 2048;\n  sendfile on;\n}\n";

        let (out, inserted) = insert_after_marker(input, DEFAULT_MARKER, DEFAULT_DIRECTIVE);

        assert!(inserted);
        assert_eq!(
            out,
            "http {\n  types_hash_max_size 2048;\n  client_max_body_size 500M;\n  sendfile on;\n}\n"
        );
    }

    #[test]
    fn tab_indent() {
        let (out, _) = insert_after_marker(
            "http {\n\ttypes_hash_max_size 2048;\n}\n",
            DEFAULT_MARKER,
            DEFAULT_DIRECTIVE,
        );

        assert!(out.contains("\ttypes_hash_max_size 2048;\n\tclient_max_body_size 500M;\n"));
    }

    #[test]
    fn only_first_match() {
        let input = "a {\n  types_hash_max_size 1;\n}\nb {\n    types_hash_max_size 2;\n}\n";

        let (out, _) = insert_after_marker(input, DEFAULT_MARKER, DEFAULT_DIRECTIVE);

        assert_eq!(out.matches("client_max_body_size").count(), 1);
        assert!(out.contains("  types_hash_max_size 1;\n  client_max_body_size 500M;\n"));
        assert!(out.contains("    types_hash_max_size 2;\n}\n"));
    }

    #[test]
    fn missing_marker_is_identity() {
        let input = "http {\n  sendfile on;\n}\n";

        let (out, inserted) = insert_after_marker(input, DEFAULT_MARKER, DEFAULT_DIRECTIVE);

        assert!(!inserted);
        assert_eq!(out, input);
    }

    #[test]
    fn marker_on_unterminated_last_line() {
        let (out, inserted) =
            insert_after_marker("  types_hash_max_size 2048;", DEFAULT_MARKER, DEFAULT_DIRECTIVE);

        assert!(inserted);
        assert_eq!(out, "  types_hash_max_size 2048;\n  client_max_body_size 500M;\n");
    }
}
