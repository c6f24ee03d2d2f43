use crate::domain::{DataIntegrityError, LoanBook};
use async_trait::async_trait;
use thiserror::Error;

/// 保存・読み込みのエラー
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to access loan book file")]
    Io(#[from] std::io::Error),

    #[error("Loan book file is not in the correct format")]
    Serialization(#[from] serde_json::Error),

    /// 読み込んだ文書の整合性が取れていない
    #[error("Loan book data is inconsistent: {0}")]
    DataIntegrity(#[from] DataIntegrityError),
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// LoanBookストレージポート
///
/// 文書全体（自転車・貸出・最終使用ID）を1単位として保存・復元する。
/// 保存した内容はすべてのフィールドを失わずに読み戻せること。
#[async_trait]
pub trait LoanBookStorage: Send + Sync {
    /// 保存済みの文書を読み込む
    ///
    /// 保存データが存在しない場合は`None`を返す。
    /// 重複やIDマネージャの不整合がある場合は修正せずに
    /// `StorageError::DataIntegrity`で失敗する。
    async fn read_loan_book(&self) -> Result<Option<LoanBook>>;

    /// 文書のスナップショットを保存する
    async fn save_loan_book(&self, loan_book: &LoanBook) -> Result<()>;
}
