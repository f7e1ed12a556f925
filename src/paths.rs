use std::path::PathBuf;
use std::sync::OnceLock;

/// Where voicegender keeps its configuration.
///
///   Linux:  $XDG_CONFIG_HOME/voicegender  (~/.config/voicegender)
///   macOS:  ~/Library/Application Support/voicegender
///
/// The `dirs` crate handles platform detection. The resolved path is cached
/// in a OnceLock so the lookup only happens once.
static CONFIG_DIR: OnceLock<PathBuf> = OnceLock::new();

/// Root config directory.
pub fn config_dir() -> &'static PathBuf {
    CONFIG_DIR.get_or_init(|| {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("voicegender")
    })
}

/// Config file path: <config_dir>/config.toml
pub fn config_file() -> PathBuf {
    config_dir().join("config.toml")
}
