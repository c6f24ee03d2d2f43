use thiserror::Error;

use crate::domain::{
    DataIntegrityError, DeleteLoanError, HistoryError, LoanBookError, LoanId, LoanIdError, Name,
    ReturnLoanError,
};

/// LoanBookアプリケーション層のエラー
#[derive(Debug, Error)]
pub enum ModelError {
    /// 進行中の同じ貸出が既に存在する（業務上の重複）
    #[error("This loan already exists in the loan book")]
    DuplicateLoan,

    /// 進行中の貸出がある自転車は削除できない
    #[error("Bike {0} is still on loan")]
    BikeInUse(Name),

    /// 編集で貸出のIDは変えられない
    #[error("The id of loan #{from} cannot be changed to #{to}")]
    LoanIdChanged { from: LoanId, to: LoanId },

    /// 集約の更新エラー
    #[error(transparent)]
    LoanBook(#[from] LoanBookError),

    /// IDの発行エラー
    #[error(transparent)]
    LoanId(#[from] LoanIdError),

    /// 履歴操作のエラー
    #[error(transparent)]
    History(#[from] HistoryError),

    /// 文書の差し替え時の整合性エラー
    #[error(transparent)]
    DataIntegrity(#[from] DataIntegrityError),

    /// 返却のエラー
    #[error(transparent)]
    Return(#[from] ReturnLoanError),

    /// 削除のエラー
    #[error(transparent)]
    Delete(#[from] DeleteLoanError),
}

/// アプリケーション層の Result型
pub type Result<T> = std::result::Result<T, ModelError>;
