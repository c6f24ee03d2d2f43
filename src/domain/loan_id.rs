use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{Loan, LoanIdError};

/// 貸出IDの上限（9桁）
pub const MAXIMUM_LOAN_ID: u32 = 999_999_999;

/// 貸出ID - LoanIdManagerが単調増加で発行する
///
/// 不変条件：0 以上 999,999,999 以下
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct LoanId(u32);

impl LoanId {
    pub fn from_int(value: i64) -> Result<Self, LoanIdError> {
        if !(0..=i64::from(MAXIMUM_LOAN_ID)).contains(&value) {
            return Err(LoanIdError::InvalidValue(value.to_string()));
        }
        Ok(Self(value as u32))
    }

    pub fn value(&self) -> u32 {
        self.0
    }

    pub fn is_maximum_id(&self) -> bool {
        self.0 == MAXIMUM_LOAN_ID
    }

    /// 次のID。最大IDの次は存在しない。
    fn successor(&self) -> Option<Self> {
        if self.is_maximum_id() {
            None
        } else {
            Some(Self(self.0 + 1))
        }
    }
}

impl TryFrom<u32> for LoanId {
    type Error = LoanIdError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::from_int(i64::from(value))
    }
}

impl From<LoanId> for u32 {
    fn from(id: LoanId) -> Self {
        id.0
    }
}

impl FromStr for LoanId {
    type Err = LoanIdError;

    /// 数字1〜9桁のみ受け付ける（符号・空白・10桁以上は不可）
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || LoanIdError::InvalidValue(s.to_string());
        if s.is_empty() || s.len() > 9 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let value: u32 = s.parse().map_err(|_| invalid())?;
        Self::try_from(value)
    }
}

impl fmt::Display for LoanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 貸出IDの発行管理
///
/// 不変条件：
/// - 初回に発行するIDは0
/// - 1ずつ増加し、欠番・再利用なし
/// - 最大IDを発行した後は二度と発行しない（飽和）
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LoanIdManager {
    /// 最後に発行したID（未発行ならNone）
    running_id_counter: Option<LoanId>,
    is_maximum_reached: bool,
}

impl LoanIdManager {
    /// 新規作成（未発行、次は0）
    pub fn new() -> Self {
        Self::default()
    }

    /// 保存済みの最終使用IDから復元する
    ///
    /// 最終使用IDが最大IDなら、最初から飽和状態になる。
    pub fn from_last_used(last_used_loan_id: LoanId) -> Self {
        Self {
            running_id_counter: Some(last_used_loan_id),
            is_maximum_reached: last_used_loan_id.is_maximum_id(),
        }
    }

    /// 保存形式（Option）から復元する
    pub fn from_last_used_opt(last_used_loan_id: Option<LoanId>) -> Self {
        last_used_loan_id.map_or_else(Self::new, Self::from_last_used)
    }

    /// 次の貸出IDを発行する
    ///
    /// カウンタを進めてから、発行したIDが最大かどうかを判定する。
    /// 最大IDを発行した呼び出し自体は成功し、以降の呼び出しが失敗する。
    ///
    /// # エラー
    /// 飽和状態なら`LoanIdError::ExhaustedIdSpace`を返す
    pub fn next_available_loan_id(&mut self) -> Result<LoanId, LoanIdError> {
        if self.is_maximum_reached {
            return Err(LoanIdError::ExhaustedIdSpace);
        }

        let next = match self.running_id_counter {
            None => LoanId(0),
            Some(last) => last.successor().ok_or(LoanIdError::ExhaustedIdSpace)?,
        };

        self.running_id_counter = Some(next);
        if next.is_maximum_id() {
            self.is_maximum_reached = true;
        }
        Ok(next)
    }

    pub fn has_next_available_loan_id(&self) -> bool {
        !self.is_maximum_reached
    }

    pub fn last_used_loan_id(&self) -> Option<LoanId> {
        self.running_id_counter
    }

    /// 貸出集合に対して正当か
    ///
    /// 集合が空、または最終使用IDが集合内の最大ID以上であること。
    pub fn is_legal_for<'a>(&self, loans: impl IntoIterator<Item = &'a Loan>) -> bool {
        match highest_loan_id(loans) {
            None => true,
            Some(highest) => self.running_id_counter.is_some_and(|last| last >= highest),
        }
    }

    /// 初期状態に戻す
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

/// 貸出集合内の最大ID
pub fn highest_loan_id<'a>(loans: impl IntoIterator<Item = &'a Loan>) -> Option<LoanId> {
    loans.into_iter().map(|loan| loan.id).max()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(value: u32) -> LoanId {
        LoanId::try_from(value).unwrap()
    }

    #[test]
    fn test_loan_id_from_int_bounds() {
        assert_eq!(LoanId::from_int(0).unwrap().value(), 0);
        assert_eq!(LoanId::from_int(999_999_999).unwrap().value(), MAXIMUM_LOAN_ID);
        assert!(matches!(
            LoanId::from_int(-1),
            Err(LoanIdError::InvalidValue(_))
        ));
        assert!(matches!(
            LoanId::from_int(1_000_000_000),
            Err(LoanIdError::InvalidValue(_))
        ));
    }

    #[test]
    fn test_loan_id_from_str() {
        assert_eq!("0".parse::<LoanId>().unwrap(), id(0));
        assert_eq!("000000042".parse::<LoanId>().unwrap(), id(42));
        assert_eq!("999999999".parse::<LoanId>().unwrap(), id(MAXIMUM_LOAN_ID));
        assert!("".parse::<LoanId>().is_err());
        assert!("-1".parse::<LoanId>().is_err());
        assert!("+1".parse::<LoanId>().is_err());
        assert!(" 1".parse::<LoanId>().is_err());
        assert!("1000000000".parse::<LoanId>().is_err());
    }

    #[test]
    fn test_is_maximum_id() {
        assert!(id(MAXIMUM_LOAN_ID).is_maximum_id());
        assert!(!id(MAXIMUM_LOAN_ID - 1).is_maximum_id());
        assert!(!id(0).is_maximum_id());
    }

    #[test]
    fn test_fresh_manager_issues_from_zero_without_gaps() {
        let mut manager = LoanIdManager::new();
        assert_eq!(manager.last_used_loan_id(), None);

        let issued: Vec<u32> = (0..5)
            .map(|_| manager.next_available_loan_id().unwrap().value())
            .collect();

        assert_eq!(issued, vec![0, 1, 2, 3, 4]);
        assert_eq!(manager.last_used_loan_id(), Some(id(4)));
        assert!(manager.has_next_available_loan_id());
    }

    #[test]
    fn test_resume_from_last_used() {
        let mut manager = LoanIdManager::from_last_used(id(41));
        assert_eq!(manager.next_available_loan_id().unwrap(), id(42));
        assert_eq!(manager.next_available_loan_id().unwrap(), id(43));
    }

    #[test]
    fn test_resume_from_maximum_is_saturated() {
        let mut manager = LoanIdManager::from_last_used(id(MAXIMUM_LOAN_ID));
        assert!(!manager.has_next_available_loan_id());
        assert_eq!(
            manager.next_available_loan_id(),
            Err(LoanIdError::ExhaustedIdSpace)
        );
    }

    #[test]
    fn test_saturation_returns_maximum_then_fails_forever() {
        let mut manager = LoanIdManager::from_last_used(id(MAXIMUM_LOAN_ID - 2));
        assert_eq!(manager.next_available_loan_id().unwrap(), id(MAXIMUM_LOAN_ID - 1));
        assert!(manager.has_next_available_loan_id());

        // 最大IDを発行した呼び出し自体は成功する
        assert_eq!(manager.next_available_loan_id().unwrap(), id(MAXIMUM_LOAN_ID));
        assert!(!manager.has_next_available_loan_id());

        for _ in 0..3 {
            assert_eq!(
                manager.next_available_loan_id(),
                Err(LoanIdError::ExhaustedIdSpace)
            );
            assert!(!manager.has_next_available_loan_id());
        }
        assert_eq!(manager.last_used_loan_id(), Some(id(MAXIMUM_LOAN_ID)));
    }

    #[test]
    fn test_has_next_is_pure() {
        let manager = LoanIdManager::from_last_used(id(7));
        assert!(manager.has_next_available_loan_id());
        assert!(manager.has_next_available_loan_id());
        assert_eq!(manager.last_used_loan_id(), Some(id(7)));
    }

    #[test]
    fn test_reset_restores_fresh_state() {
        let mut manager = LoanIdManager::from_last_used(id(MAXIMUM_LOAN_ID));
        manager.reset();
        assert_eq!(manager, LoanIdManager::new());
        assert_eq!(manager.next_available_loan_id().unwrap(), id(0));
    }

    #[test]
    fn test_from_last_used_opt() {
        assert_eq!(LoanIdManager::from_last_used_opt(None), LoanIdManager::new());
        assert_eq!(
            LoanIdManager::from_last_used_opt(Some(id(3))).last_used_loan_id(),
            Some(id(3))
        );
    }
}
