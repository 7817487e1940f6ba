use std::path::Path;

/// The last component of a path, used to name the tables in messages.
pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(path)
        .to_string()
}

/// Paths in the configuration are relative to the directory of the configuration.
pub fn resolve_path(root: &Path, file_path: &str) -> String {
    root.join(file_path).as_path().display().to_string()
}
