//! Data directory layout for gatechat.
//!
//! Everything the client persists lives under one directory:
//! `config.toml` and `conversation.json`.

use std::path::{Path, PathBuf};

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "GATECHAT_DATA_DIR";

/// `{data_dir}/config.toml`.
pub fn config_path(data_dir: &Path) -> PathBuf {
    data_dir.join("config.toml")
}

/// `{data_dir}/conversation.json`.
pub fn conversation_path(data_dir: &Path) -> PathBuf {
    data_dir.join("conversation.json")
}

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `GATECHAT_DATA_DIR` environment variable
/// 2. `~/.gatechat`
/// 3. `./.gatechat` when no home directory is known
pub fn resolve_data_dir() -> PathBuf {
    resolve_data_dir_from(std::env::var(DATA_DIR_ENV).ok(), dirs::home_dir())
}

fn resolve_data_dir_from(env_dir: Option<String>, home: Option<PathBuf>) -> PathBuf {
    if let Some(dir) = env_dir.filter(|d| !d.trim().is_empty()) {
        return PathBuf::from(dir);
    }

    if let Some(home) = home {
        return home.join(".gatechat");
    }

    PathBuf::from(".gatechat")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_dir_wins() {
        let dir = resolve_data_dir_from(
            Some("/tmp/test-gatechat".to_string()),
            Some(PathBuf::from("/home/user")),
        );
        assert_eq!(dir, PathBuf::from("/tmp/test-gatechat"));
    }

    #[test]
    fn test_blank_env_dir_ignored() {
        let dir = resolve_data_dir_from(Some("  ".to_string()), Some(PathBuf::from("/home/user")));
        assert_eq!(dir, PathBuf::from("/home/user/.gatechat"));
    }

    #[test]
    fn test_fallback_without_home() {
        assert_eq!(resolve_data_dir_from(None, None), PathBuf::from(".gatechat"));
    }

    #[test]
    fn test_file_paths() {
        let data_dir = PathBuf::from("/home/user/.gatechat");
        assert_eq!(
            config_path(&data_dir),
            PathBuf::from("/home/user/.gatechat/config.toml")
        );
        assert_eq!(
            conversation_path(&data_dir),
            PathBuf::from("/home/user/.gatechat/conversation.json")
        );
    }
}
