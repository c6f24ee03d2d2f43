use serde::{Deserialize, Serialize};

use super::{LoanId, LoanTime};

/// イベント：自転車が返却された
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanReturned {
    pub loan_id: LoanId,
    pub returned_at: LoanTime,
    /// 料金（セント単位）
    pub cost_cents: u64,
}

/// イベント：貸出が削除された
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanDeleted {
    pub loan_id: LoanId,
}

/// 文書が差し替わった原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeCause {
    Committed,
    Undone,
    Redone,
    Reset,
}

/// イベント：LoanBook文書が変更された
///
/// 購読者は一覧を再描画・保存する。細かな要素単位の変更は通知しない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanBookChanged {
    pub cause: ChangeCause,
    pub bike_count: usize,
    pub loan_count: usize,
}
