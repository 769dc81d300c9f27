use std::path::PathBuf;

pub const CONFIG_ENV_VAR: &str = "USTORE_CONFIG";

pub fn get_config_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".config").join("ustore")
}

pub fn get_config_path() -> PathBuf {
    match std::env::var_os(CONFIG_ENV_VAR) {
        Some(path) if !path.is_empty() => PathBuf::from(path),
        _ => get_config_dir().join("config.toml"),
    }
}
