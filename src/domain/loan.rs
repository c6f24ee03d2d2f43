use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::{
    DeleteLoanError, Email, LoanDeleted, LoanId, LoanRate, LoanReturned, LoanStatus, LoanTime,
    Name, Nric, Phone, ReturnLoanError, Tag, commands::AddLoan,
};

/// 貸出 - 1台の自転車の1回の貸出
///
/// 不変な値として扱い、状態遷移は新しいLoanを返す。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loan {
    // 識別子
    pub id: LoanId,

    // 借り手
    pub name: Name,
    pub nric: Nric,
    pub phone: Phone,
    pub email: Email,

    // 自転車への参照（名前のみ）
    pub bike: Name,

    // 貸出管理の責務
    pub rate: LoanRate,
    pub start_time: LoanTime,
    #[serde(default)]
    pub end_time: Option<LoanTime>,
    pub status: LoanStatus,
    #[serde(default)]
    pub tags: BTreeSet<Tag>,
}

/// 純粋関数：貸出を開始する
///
/// 状態はOngoing、終了時刻なし。
pub fn open_loan(id: LoanId, cmd: AddLoan) -> Loan {
    Loan {
        id,
        name: cmd.name,
        nric: cmd.nric,
        phone: cmd.phone,
        email: cmd.email,
        bike: cmd.bike,
        rate: cmd.rate,
        start_time: cmd.start_time,
        end_time: None,
        status: LoanStatus::Ongoing,
        tags: cmd.tags,
    }
}

/// 業務上の重複か
///
/// 氏名・NRIC・自転車が同じで、かつ電話番号かメールアドレスの
/// どちらかが同じなら重複とみなす。ID・料金・時刻・状態・タグは見ない。
/// 全フィールドの比較は`==`を使う。
pub fn is_same_loan(a: &Loan, b: &Loan) -> bool {
    a.name == b.name
        && a.nric == b.nric
        && a.bike == b.bike
        && (a.phone == b.phone || a.email == b.email)
}

/// 純粋関数：料金計算
///
/// 1時間あたりの料金 × 経過分 / 60（セント単位、四捨五入）
///
/// 途中計算はu128で行い、u64に収まらない結果は`u64::MAX`に丸める。
pub fn calculate_cost(loan: &Loan, end: &LoanTime) -> u64 {
    let minutes = loan.start_time.minutes_until(end) as u128;
    let cost = (u128::from(loan.rate.cents()) * minutes + 30) / 60;
    u64::try_from(cost).unwrap_or(u64::MAX)
}

/// 純粋関数：自転車を返却する
///
/// 副作用なし。新しいLoanとイベントを返す。
pub fn return_loan(
    loan: &Loan,
    returned_at: LoanTime,
) -> Result<(Loan, LoanReturned), ReturnLoanError> {
    match loan.status {
        LoanStatus::Returned => return Err(ReturnLoanError::AlreadyReturned(loan.id)),
        LoanStatus::Deleted => return Err(ReturnLoanError::AlreadyDeleted(loan.id)),
        LoanStatus::Ongoing => {}
    }

    if returned_at < loan.start_time {
        return Err(ReturnLoanError::EndBeforeStart(loan.id));
    }

    let new_loan = Loan {
        end_time: Some(returned_at),
        status: LoanStatus::Returned,
        ..loan.clone()
    };

    let event = LoanReturned {
        loan_id: loan.id,
        returned_at,
        cost_cents: calculate_cost(loan, &returned_at),
    };

    Ok((new_loan, event))
}

/// 純粋関数：貸出を削除済みにする
///
/// 記録は残し、状態のみDeletedにする。
pub fn delete_loan(loan: &Loan) -> Result<(Loan, LoanDeleted), DeleteLoanError> {
    if loan.status.is_deleted() {
        return Err(DeleteLoanError::AlreadyDeleted(loan.id));
    }

    let new_loan = Loan {
        status: LoanStatus::Deleted,
        ..loan.clone()
    };

    Ok((new_loan, LoanDeleted { loan_id: loan.id }))
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn add_loan(name: &str, bike: &str) -> AddLoan {
        AddLoan {
            name: Name::new(name).unwrap(),
            nric: Nric::new("S1234567A").unwrap(),
            phone: Phone::new("91234567").unwrap(),
            email: Email::new("alice@example.com").unwrap(),
            bike: Name::new(bike).unwrap(),
            rate: LoanRate::new("6.00").unwrap(),
            start_time: LoanTime::parse("2018-10-01 09:00").unwrap(),
            tags: BTreeSet::new(),
        }
    }

    pub fn loan(id: u32, name: &str, bike: &str) -> Loan {
        open_loan(LoanId::try_from(id).unwrap(), add_loan(name, bike))
    }
}
