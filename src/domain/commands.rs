use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::{Email, LoanId, LoanRate, LoanTime, Name, Nric, Phone, Tag};

/// コマンド：自転車を登録する
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddBike {
    pub name: Name,
}

/// コマンド：自転車を貸し出す
///
/// IDは持たない。IDは登録時にLoanIdManagerが発行する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddLoan {
    pub name: Name,
    pub nric: Nric,
    pub phone: Phone,
    pub email: Email,
    pub bike: Name,
    pub rate: LoanRate,
    pub start_time: LoanTime,
    pub tags: BTreeSet<Tag>,
}

/// コマンド：自転車を返却する
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnLoan {
    pub loan_id: LoanId,
    pub returned_at: LoanTime,
}

/// コマンド：貸出を削除する（記録は残す）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteLoan {
    pub loan_id: LoanId,
}
