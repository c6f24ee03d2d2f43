use thiserror::Error;

use crate::application::loan_book::ModelError;
use crate::domain::LoanBookError;
use crate::ports::StorageError;

use super::parser::ParseError;

/// CLI層のエラー型
///
/// 解析・アプリケーション・保存のエラーをまとめ、利用者向けの
/// メッセージへのマッピングを提供する。
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl CliError {
    /// 利用者に表示するメッセージ
    pub fn user_message(&self) -> String {
        match self {
            // 入力の誤り・ビジネスルール違反はそのまま伝える
            CliError::Parse(e) => e.to_string(),
            CliError::Model(ModelError::LoanBook(LoanBookError::LoanNotFound(id))) => {
                format!("The loan id provided is invalid: #{id}")
            }
            CliError::Model(e) => e.to_string(),

            // システム障害
            // 詳細はログに記録し、利用者には一般的なメッセージのみを返す
            CliError::Storage(e) => {
                tracing::error!("Storage error: {}", e);
                "Could not save data to file".to_string()
            }
        }
    }
}
