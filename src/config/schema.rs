use serde::Deserialize;

/// Top-level settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/subrate/config.toml`
/// or `~/.config/subrate/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `SUBRATE__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub library: LibrarySettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Base URL of the Subsonic server, without the `/rest` suffix.
    pub url: String,
    /// Port appended to `url`. Leave unset when the URL already carries one.
    pub port: Option<u16>,
    pub username: String,
    pub password: String,
    /// Value sent as the `c` parameter on every request.
    pub client_name: String,
    /// Subsonic REST API version sent as the `v` parameter.
    pub api_version: String,
    /// Per-request timeout in seconds. `0` waits forever.
    pub timeout_secs: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            url: "http://localhost".to_string(),
            port: Some(4533),
            username: String::new(),
            password: String::new(),
            client_name: "subrate".to_string(),
            api_version: "1.16.1".to_string(),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// File extension of the files to read ratings from (case-insensitive, without dot).
    pub extension: String,
    /// Whether to follow symlinks during scanning.
    pub follow_links: bool,
    /// Whether to include hidden files/directories (dotfiles).
    pub include_hidden: bool,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            extension: "mp3".to_string(),
            follow_links: true,
            include_hidden: true,
        }
    }
}

impl LibrarySettings {
    /// The configured extension, lowercased and without a leading dot.
    pub fn normalized_extension(&self) -> String {
        self.extension
            .trim()
            .trim_start_matches('.')
            .to_ascii_lowercase()
    }
}
