//! 設定ファイル (`collatz.toml`) の読み込み
//!
//! すべての項目にデフォルト値があり、ファイルがなくても動作する。

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::sequence::Generator;

/// デフォルトの設定ファイル名（カレントディレクトリ）
pub const DEFAULT_CONFIG_FILE: &str = "collatz.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub generator: GeneratorConfig,

    #[serde(default)]
    pub range: RangeConfig,

    #[serde(default)]
    pub display: DisplayConfig,
}

/// 軌道生成の設定
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// 1軌道あたりのステップ上限。未設定なら上限なし。
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_steps: Option<u64>,
}

/// 範囲解析の設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeConfig {
    /// 上限を省略したときの max_n
    #[serde(default = "default_max_n")]
    pub default_max_n: u64,
}

impl Default for RangeConfig {
    fn default() -> Self {
        Self {
            default_max_n: default_max_n(),
        }
    }
}

fn default_max_n() -> u64 {
    100
}

/// 表示の設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// 複数軌道を対数スケールで表示する
    #[serde(default)]
    pub log_scale: bool,

    /// 軌道プレビューで先頭から表示する行数
    #[serde(default = "default_preview_limit")]
    pub preview_limit: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            log_scale: false,
            preview_limit: default_preview_limit(),
        }
    }
}

fn default_preview_limit() -> usize {
    50
}

impl Config {
    /// 指定ファイルを読み込む。存在しなければエラー。
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        tracing::debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    /// path が指定されていればそれを読む。
    /// 未指定なら DEFAULT_CONFIG_FILE を探し、なければデフォルト値。
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(p) = path {
            return Self::load(p);
        }
        let default_path = Path::new(DEFAULT_CONFIG_FILE);
        if default_path.exists() {
            Self::load(default_path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.range.default_max_n == 0 {
            return Err(ConfigError::Invalid {
                field: "range.default_max_n",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.display.preview_limit == 0 {
            return Err(ConfigError::Invalid {
                field: "display.preview_limit",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// 設定に従った軌道生成器
    pub fn generator(&self) -> Generator {
        Generator::with_limit(self.generator.max_steps)
    }

    /// init-config 用の雛形
    pub fn default_toml() -> String {
        r#"# collatz-viz configuration

[generator]
# Maximum Collatz steps per starting value. Unset means unbounded.
# max_steps = 100000

[range]
# Upper bound used when stopping-times / max-values are run without MAX_N.
default_max_n = 100

[display]
# Plot multiple sequences on a logarithmic scale.
log_scale = false
# Number of leading steps shown in sequence previews.
preview_limit = 50
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.generator.max_steps, None);
        assert_eq!(config.range.default_max_n, 100);
        assert!(!config.display.log_scale);
        assert_eq!(config.display.preview_limit, 50);
        assert_eq!(config.generator(), Generator::new());
    }

    #[test]
    fn test_default_toml_parses_to_default() {
        let parsed: Config = toml::from_str(&Config::default_toml()).unwrap();
        assert_eq!(parsed, Config::default());
    }

    #[test]
    fn test_partial_file() {
        let parsed: Config = toml::from_str("[generator]\nmax_steps = 500\n").unwrap();
        assert_eq!(parsed.generator.max_steps, Some(500));
        assert_eq!(parsed.range.default_max_n, 100);
        assert_eq!(parsed.generator().max_steps(), Some(500));
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[range]\ndefault_max_n = 27\n[display]\nlog_scale = true").unwrap();
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.range.default_max_n, 27);
        assert!(config.display.log_scale);
    }

    #[test]
    fn test_load_rejects_zero() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[range]\ndefault_max_n = 0").unwrap();
        let err = Config::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "range.default_max_n", .. }));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_load_bad_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[range\ndefault_max_n = ").unwrap();
        assert!(matches!(
            Config::load(file.path()).unwrap_err(),
            ConfigError::Parse { .. }
        ));
    }
}
