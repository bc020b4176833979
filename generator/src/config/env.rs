use std::path::Path;

/// Load `.env` files from the project root
///
/// Precedence (later overrides earlier):
/// 1. .env
/// 2. .env.local
/// 3. Actual process environment (highest priority)
///
/// Returns the files that were found and loaded.
pub fn load_dotenv(project_root: &Path) -> Vec<std::path::PathBuf> {
    // dotenvy never overwrites existing vars, so load the most specific file first
    let mut loaded = Vec::new();
    for name in [".env.local", ".env"] {
        let path = project_root.join(name);
        if dotenvy::from_path(&path).is_ok() {
            loaded.push(path);
        }
    }
    loaded
}

/// Get an environment variable with a default value
///
/// # Example
/// ```
/// use ipcgen::config::env;
///
/// let prefix: String = env("IPCGEN_MARKER_PREFIX", "service".to_string());
/// ```
pub fn env<T: std::str::FromStr>(key: &str, default: T) -> T {
    env_optional(key).unwrap_or(default)
}

/// Get an optional environment variable
pub fn env_optional<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

/// Comma separated list, empty entries dropped
pub fn env_list(key: &str) -> Vec<String> {
    std::env::var(key)
        .map(|v| {
            v.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}
