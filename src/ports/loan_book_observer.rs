use crate::domain::LoanBookChanged;

/// LoanBook変更の購読ポート
///
/// commit・undo・redo・resetのたびに同期的に呼ばれる。
/// 表示の再描画や自動保存の契機に使う。
pub trait LoanBookObserver {
    fn loan_book_changed(&self, event: &LoanBookChanged);
}
