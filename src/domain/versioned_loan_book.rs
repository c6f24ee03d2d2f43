use std::num::NonZeroUsize;
use std::ops::{Deref, DerefMut};

use super::{HistoryError, LoanBook};

/// 取り消し・やり直し可能なLoanBook
///
/// 状態：
/// - `states`：確定済みスナップショットの列。追加後は変更しない
/// - `current_state_pointer`：現在のスナップショットの位置
/// - `working`：現在のスナップショットの上に未確定の変更を載せた作業用コピー
///
/// 不変条件：
/// - `current_state_pointer < states.len()`
/// - commitは現在位置より後のスナップショットを破棄してから追加する
/// - undo/redoは確定済みスナップショットの間を移動するだけ
///
/// 更新系の操作は`DerefMut`経由で作業用コピーに対して行う。
#[derive(Debug, Clone)]
pub struct VersionedLoanBook {
    working: LoanBook,
    states: Vec<LoanBook>,
    current_state_pointer: usize,
    history_limit: Option<NonZeroUsize>,
}

impl VersionedLoanBook {
    /// 初期状態を`S[0]`として作成する（履歴は無制限）
    pub fn new(initial: LoanBook) -> Self {
        Self {
            working: initial.clone(),
            states: vec![initial],
            current_state_pointer: 0,
            history_limit: None,
        }
    }

    /// 保持するスナップショット数の上限付きで作成する
    ///
    /// 上限を超えたcommitでは最も古いスナップショットから捨てる。
    pub fn with_history_limit(initial: LoanBook, limit: NonZeroUsize) -> Self {
        Self {
            history_limit: Some(limit),
            ..Self::new(initial)
        }
    }

    /// 作業中の状態を新しいスナップショットとして確定する
    ///
    /// 現在位置より後（やり直し可能な状態）はすべて破棄される。
    /// 変更がなくてもスナップショットは追加される。
    pub fn commit(&mut self) {
        self.states.truncate(self.current_state_pointer + 1);
        self.states.push(self.working.clone());
        self.current_state_pointer += 1;

        if let Some(limit) = self.history_limit {
            let excess = self.states.len().saturating_sub(limit.get());
            if excess > 0 {
                self.states.drain(..excess);
                self.current_state_pointer -= excess;
            }
        }
    }

    /// 1つ前のスナップショットに戻る
    ///
    /// 未確定の変更は破棄される。
    ///
    /// # エラー
    /// 先頭にいる場合は`HistoryError::NoUndoableState`を返す
    pub fn undo(&mut self) -> Result<(), HistoryError> {
        if !self.can_undo() {
            return Err(HistoryError::NoUndoableState);
        }
        self.current_state_pointer -= 1;
        self.restore_current_state();
        Ok(())
    }

    /// 1つ後のスナップショットに進む
    ///
    /// # エラー
    /// 末尾にいる場合は`HistoryError::NoRedoableState`を返す
    pub fn redo(&mut self) -> Result<(), HistoryError> {
        if !self.can_redo() {
            return Err(HistoryError::NoRedoableState);
        }
        self.current_state_pointer += 1;
        self.restore_current_state();
        Ok(())
    }

    pub fn can_undo(&self) -> bool {
        self.current_state_pointer > 0
    }

    pub fn can_redo(&self) -> bool {
        self.current_state_pointer + 1 < self.states.len()
    }

    pub fn history_len(&self) -> usize {
        self.states.len()
    }

    pub fn current_state_index(&self) -> usize {
        self.current_state_pointer
    }

    /// 現在位置のスナップショット（未確定の変更を含まない）
    pub fn current_state(&self) -> &LoanBook {
        &self.states[self.current_state_pointer]
    }

    fn restore_current_state(&mut self) {
        self.working = self.states[self.current_state_pointer].clone();
    }
}

impl Deref for VersionedLoanBook {
    type Target = LoanBook;

    fn deref(&self) -> &Self::Target {
        &self.working
    }
}

impl DerefMut for VersionedLoanBook {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.working
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Bike, Name};

    fn bike(name: &str) -> Bike {
        Bike::new(Name::new(name).unwrap())
    }

    fn book_with(bikes: &[&str]) -> LoanBook {
        let mut book = LoanBook::new();
        for name in bikes {
            book.add_bike(bike(name)).unwrap();
        }
        book
    }

    /// [A, B, C] のスナップショットを持ち、Cにいる履歴
    fn history_abc() -> VersionedLoanBook {
        let mut history = VersionedLoanBook::new(book_with(&[]));
        history.add_bike(bike("B")).unwrap();
        history.commit();
        history.add_bike(bike("C")).unwrap();
        history.commit();
        history
    }

    #[test]
    fn test_new_history_has_single_state() {
        let history = VersionedLoanBook::new(book_with(&["A"]));
        assert_eq!(history.history_len(), 1);
        assert_eq!(history.current_state_index(), 0);
        assert!(!history.can_undo());
        assert!(!history.can_redo());
        assert_eq!(&*history, &book_with(&["A"]));
    }

    #[test]
    fn test_undo_on_single_state_fails() {
        let mut history = VersionedLoanBook::new(LoanBook::new());
        assert_eq!(history.undo(), Err(HistoryError::NoUndoableState));
        assert_eq!(history.current_state_index(), 0);
    }

    #[test]
    fn test_redo_at_newest_state_fails() {
        let mut history = history_abc();
        assert_eq!(history.redo(), Err(HistoryError::NoRedoableState));
        assert_eq!(history.current_state_index(), 2);
    }

    #[test]
    fn test_mutation_does_not_touch_history() {
        let mut history = VersionedLoanBook::new(LoanBook::new());
        history.add_bike(bike("A")).unwrap();

        assert_eq!(history.history_len(), 1);
        assert_eq!(history.current_state(), &LoanBook::new());
        assert_eq!(history.bikes(), &[bike("A")]);
    }

    #[test]
    fn test_commit_advances_pointer() {
        let history = history_abc();
        assert_eq!(history.history_len(), 3);
        assert_eq!(history.current_state_index(), 2);
        assert!(history.can_undo());
        assert!(!history.can_redo());
        assert_eq!(&*history, &book_with(&["B", "C"]));
    }

    #[test]
    fn test_redundant_commit_creates_identical_snapshot() {
        let mut history = VersionedLoanBook::new(LoanBook::new());
        history.commit();
        assert_eq!(history.history_len(), 2);
        history.undo().unwrap();
        assert_eq!(&*history, &LoanBook::new());
    }

    #[test]
    fn test_undo_discards_uncommitted_changes() {
        let mut history = history_abc();
        history.add_bike(bike("D")).unwrap();
        history.undo().unwrap();
        assert_eq!(&*history, &book_with(&["B"]));
        history.redo().unwrap();
        assert_eq!(&*history, &book_with(&["B", "C"]));
    }

    #[test]
    fn test_commit_after_undo_truncates_redo_history() {
        let mut history = history_abc();
        history.undo().unwrap();
        history.undo().unwrap();
        assert_eq!(&*history, &book_with(&[]));

        history.add_bike(bike("D")).unwrap();
        history.commit();

        // [A, D] でDにいる
        assert_eq!(history.history_len(), 2);
        assert_eq!(history.current_state_index(), 1);
        assert!(!history.can_redo());
        assert_eq!(history.redo(), Err(HistoryError::NoRedoableState));
        assert_eq!(&*history, &book_with(&["D"]));

        history.undo().unwrap();
        assert_eq!(&*history, &book_with(&[]));
    }

    #[test]
    fn test_undo_then_redo_restores_exact_state() {
        let mut history = VersionedLoanBook::new(LoanBook::new());
        let names = ["A", "B", "C", "D", "E"];
        for name in names {
            history.add_bike(bike(name)).unwrap();
            history.commit();
        }

        for k in 1..history.history_len() {
            let before = (*history).clone();
            let index = history.current_state_index();

            for _ in 0..k {
                history.undo().unwrap();
            }
            for _ in 0..k {
                history.redo().unwrap();
            }

            assert_eq!(&*history, &before);
            assert_eq!(history.current_state_index(), index);
        }
    }

    #[test]
    fn test_snapshots_are_not_affected_by_later_mutation() {
        let mut history = history_abc();
        history.undo().unwrap();
        history.remove_bike(&bike("B")).unwrap();
        assert!(history.bikes().is_empty());

        // 確定済みスナップショットは変わらない
        assert_eq!(history.current_state(), &book_with(&["B"]));
        history.redo().unwrap();
        history.undo().unwrap();
        assert_eq!(&*history, &book_with(&["B"]));
    }

    #[test]
    fn test_history_limit_drops_oldest_snapshots() {
        let limit = NonZeroUsize::new(2).unwrap();
        let mut history = VersionedLoanBook::with_history_limit(LoanBook::new(), limit);
        for name in ["A", "B", "C"] {
            history.add_bike(bike(name)).unwrap();
            history.commit();
        }

        assert_eq!(history.history_len(), 2);
        assert_eq!(history.current_state_index(), 1);
        history.undo().unwrap();
        assert_eq!(&*history, &book_with(&["A", "B"]));
        assert_eq!(history.undo(), Err(HistoryError::NoUndoableState));
    }
}
