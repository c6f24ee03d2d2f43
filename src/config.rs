use std::num::NonZeroUsize;
use std::path::PathBuf;

use thiserror::Error;

pub const DATA_FILE_VAR: &str = "LOANBOOK_DATA_FILE";
pub const HISTORY_LIMIT_VAR: &str = "LOANBOOK_HISTORY_LIMIT";
pub const DEFAULT_DATA_FILE: &str = "data/loanbook.json";

/// 起動時の設定エラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{HISTORY_LIMIT_VAR} should be a positive integer: {0:?}")]
    InvalidHistoryLimit(String),
}

/// 環境変数から読み込む設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// 文書を保存するJSONファイル
    pub data_file: PathBuf,
    /// 保持するスナップショット数の上限（未設定なら無制限）
    pub history_limit: Option<NonZeroUsize>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 任意の参照関数から設定を組み立てる
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let data_file = lookup(DATA_FILE_VAR)
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DATA_FILE.to_string())
            .into();

        let history_limit = match lookup(HISTORY_LIMIT_VAR) {
            Some(value) if !value.trim().is_empty() => Some(
                value
                    .trim()
                    .parse::<NonZeroUsize>()
                    .map_err(|_| ConfigError::InvalidHistoryLimit(value.clone()))?,
            ),
            _ => None,
        };

        Ok(Self {
            data_file,
            history_limit,
        })
    }
}
