//! Path helpers for user-facing messages.

use std::path::Path;

/// Renders a path for an error message without exposing parent directories
/// under the user's home.
pub fn sanitize_path_for_error(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(rest) = path.strip_prefix(&home) {
            return Path::new("~").join(rest).display().to_string();
        }
    }
    path.display().to_string()
}
