use thiserror::Error;

use super::{LoanId, Name};

/// 値オブジェクト生成時のバリデーションエラー
///
/// 不正な値は部分的にも生成されない。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Names should only contain alphanumeric characters and spaces, and should not be blank: {0:?}")]
    InvalidName(String),

    #[error("NRIC should start with S, T, F or G, followed by 7 digits and end with a letter: {0:?}")]
    InvalidNric(String),

    #[error("Phone numbers should only contain digits and be at least 3 digits long: {0:?}")]
    InvalidPhone(String),

    #[error("Emails should be of the format local-part@domain: {0:?}")]
    InvalidEmail(String),

    #[error("Loan rate should be a non-negative number with at most 2 decimal places: {0:?}")]
    InvalidRate(String),

    #[error("Loan time should be of the format YYYY-MM-DD HH:MM: {0:?}")]
    InvalidTime(String),

    #[error("Tags should be alphanumeric: {0:?}")]
    InvalidTag(String),

    #[error("Unknown loan status: {0:?}")]
    InvalidLoanStatus(String),

    #[error("Unknown bike status: {0:?}")]
    InvalidBikeStatus(String),
}

/// 貸出IDのエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoanIdError {
    /// 範囲外、または数字1〜9桁でない
    #[error("Loan id should be a number between 0 and 999999999: {0:?}")]
    InvalidValue(String),

    /// 最大IDを発行済みで、これ以上IDを発行できない
    #[error("All loan ids have been used up")]
    ExhaustedIdSpace,
}

/// LoanBook集約の更新エラー
///
/// 失敗時、集約は一切変更されない。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoanBookError {
    #[error("This bike already exists in the loan book: {0}")]
    DuplicateBike(Name),

    #[error("This loan already exists in the loan book: #{0}")]
    DuplicateLoan(LoanId),

    #[error("The bike does not exist in the loan book: {0}")]
    BikeNotFound(Name),

    #[error("The loan does not exist in the loan book: #{0}")]
    LoanNotFound(LoanId),

    /// IDマネージャが貸出集合に対して不正になる
    #[error("Loan id manager is behind the loans it manages (highest loan id #{highest})")]
    IllegalLoanIdManager { highest: LoanId },

    #[error(transparent)]
    LoanId(#[from] LoanIdError),
}

/// 読み込んだ文書の整合性エラー
///
/// 読み込みは失敗させ、データの切り詰めや修正は行わない。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataIntegrityError {
    #[error("Loan book contains duplicate bike(s): {0}")]
    DuplicateBike(Name),

    #[error("Loan book contains duplicate loan(s): #{0}")]
    DuplicateLoan(LoanId),

    #[error("Loan id manager is illegal: last used id {last_used:?}, highest loan id #{highest}")]
    IllegalLoanIdManager {
        last_used: Option<LoanId>,
        highest: LoanId,
    },
}

/// 履歴操作のエラー
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HistoryError {
    #[error("No more commands to undo!")]
    NoUndoableState,

    #[error("No more commands to redo!")]
    NoRedoableState,
}

/// 返却のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReturnLoanError {
    /// 既に返却済み
    #[error("Loan #{0} has already been returned")]
    AlreadyReturned(LoanId),
    /// 削除済み
    #[error("Loan #{0} has been deleted")]
    AlreadyDeleted(LoanId),
    /// 返却時刻が開始時刻より前
    #[error("Return time is before the start of loan #{0}")]
    EndBeforeStart(LoanId),
}

/// 削除のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeleteLoanError {
    /// 既に削除済み
    #[error("Loan #{0} has already been deleted")]
    AlreadyDeleted(LoanId),
}
