use std::num::NonZeroUsize;

use crate::domain::{
    self, Bike, ChangeCause, LoanBook, LoanBookChanged, LoanBookError, LoanDeleted, LoanId,
    LoanReturned, Name, VersionedLoanBook,
    commands::{AddBike, AddLoan, DeleteLoan, ReturnLoan},
    loan::is_same_loan,
};
use crate::ports::LoanBookObserver;

use super::{
    errors::{ModelError, Result},
    filter::LoanFilter,
    summary::LoanSummary,
};

/// アプリケーションのモデル
///
/// コマンド層はこのモデルを通して文書を更新し、成功後に明示的に
/// `commit()`を呼ぶ。モデル自身は暗黙にcommitしない。
///
/// 一覧（`filtered_loans`など）は呼び出しのたびに作業中の文書から
/// 再計算されるため、commit・undo・redo・resetの直後でも常に最新。
pub struct Model {
    versioned_loan_book: VersionedLoanBook,
    loan_filter: LoanFilter,
    observers: Vec<Box<dyn LoanBookObserver>>,
}

impl Model {
    pub fn new(loan_book: LoanBook) -> Self {
        Self::with_history_limit(loan_book, None)
    }

    pub fn with_history_limit(loan_book: LoanBook, history_limit: Option<NonZeroUsize>) -> Self {
        tracing::debug!(
            bikes = loan_book.bikes().len(),
            loans = loan_book.loans().len(),
            "Initializing model"
        );
        let versioned_loan_book = match history_limit {
            Some(limit) => VersionedLoanBook::with_history_limit(loan_book, limit),
            None => VersionedLoanBook::new(loan_book),
        };
        Self {
            versioned_loan_book,
            loan_filter: LoanFilter::All,
            observers: Vec::new(),
        }
    }

    /// 文書変更の購読者を登録する
    pub fn subscribe(&mut self, observer: Box<dyn LoanBookObserver>) {
        self.observers.push(observer);
    }

    /// 作業中の文書（読み取り専用）
    pub fn loan_book(&self) -> &LoanBook {
        &self.versioned_loan_book
    }

    // ------------------------------------------------------------------------
    // 自転車
    // ------------------------------------------------------------------------

    pub fn add_bike(&mut self, cmd: AddBike) -> Result<()> {
        self.versioned_loan_book.add_bike(Bike::new(cmd.name.clone()))?;
        tracing::debug!(bike = %cmd.name, "Added bike");
        Ok(())
    }

    /// 自転車を削除する
    ///
    /// 進行中の貸出が参照している自転車は削除できない。
    pub fn delete_bike(&mut self, name: &Name) -> Result<Bike> {
        let bike = self.find_bike(name)?.clone();

        let in_use = self
            .versioned_loan_book
            .loans()
            .iter()
            .any(|loan| loan.status.is_ongoing() && &loan.bike == name);
        if in_use {
            return Err(ModelError::BikeInUse(name.clone()));
        }

        let removed = self.versioned_loan_book.remove_bike(&bike)?;
        tracing::debug!(bike = %name, "Deleted bike");
        Ok(removed)
    }

    pub fn update_bike(&mut self, name: &Name, replacement: Bike) -> Result<()> {
        let target = self.find_bike(name)?.clone();
        self.versioned_loan_book.update_bike(&target, replacement)?;
        Ok(())
    }

    // ------------------------------------------------------------------------
    // 貸出
    // ------------------------------------------------------------------------

    /// 貸出を登録し、発行したIDを返す
    ///
    /// ビジネスルール：
    /// - 自転車が登録済みであること
    /// - 進行中の貸出と業務上重複しないこと
    /// - 発行可能なIDが残っていること
    ///
    /// 失敗した場合、IDは消費されない。
    pub fn add_loan(&mut self, cmd: AddLoan) -> Result<LoanId> {
        self.find_bike(&cmd.bike)?;

        let book = &mut *self.versioned_loan_book;
        let mut loan_id_manager = book.loan_id_manager().clone();
        let loan_id = loan_id_manager.next_available_loan_id()?;
        let loan = domain::loan::open_loan(loan_id, cmd);

        let duplicated = book
            .loans()
            .iter()
            .any(|existing| existing.status.is_ongoing() && is_same_loan(existing, &loan));
        if duplicated {
            return Err(ModelError::DuplicateLoan);
        }

        book.set_loan_id_manager(loan_id_manager)?;
        book.add_loan(loan)?;
        tracing::debug!(loan_id = %loan_id, "Added loan");
        Ok(loan_id)
    }

    /// 貸出を編集後の値で置き換える（IDは変えられない）
    pub fn update_loan(&mut self, loan_id: LoanId, replacement: domain::Loan) -> Result<()> {
        let target = self.find_loan(loan_id)?.clone();
        if replacement.id != loan_id {
            return Err(ModelError::LoanIdChanged {
                from: loan_id,
                to: replacement.id,
            });
        }
        self.versioned_loan_book.update_loan(&target, replacement)?;
        Ok(())
    }

    /// 自転車を返却する
    pub fn return_loan(&mut self, cmd: ReturnLoan) -> Result<LoanReturned> {
        let target = self.find_loan(cmd.loan_id)?.clone();
        let (returned, event) = domain::loan::return_loan(&target, cmd.returned_at)?;
        self.versioned_loan_book.update_loan(&target, returned)?;
        tracing::debug!(loan_id = %cmd.loan_id, cost_cents = event.cost_cents, "Returned loan");
        Ok(event)
    }

    /// 貸出を削除済みにする（記録は残る）
    pub fn delete_loan(&mut self, cmd: DeleteLoan) -> Result<LoanDeleted> {
        let target = self.find_loan(cmd.loan_id)?.clone();
        let (deleted, event) = domain::loan::delete_loan(&target)?;
        self.versioned_loan_book.update_loan(&target, deleted)?;
        tracing::debug!(loan_id = %cmd.loan_id, "Deleted loan");
        Ok(event)
    }

    /// 貸出を文書から取り除く（IDは再利用されない）
    pub fn remove_loan(&mut self, loan_id: LoanId) -> Result<domain::Loan> {
        let target = self.find_loan(loan_id)?.clone();
        Ok(self.versioned_loan_book.remove_loan(&target)?)
    }

    pub fn has_next_loan_id(&self) -> bool {
        self.versioned_loan_book.has_next_loan_id()
    }

    // ------------------------------------------------------------------------
    // 履歴
    // ------------------------------------------------------------------------

    /// 作業中の文書をスナップショットとして確定する
    pub fn commit(&mut self) {
        self.versioned_loan_book.commit();
        tracing::info!(
            snapshot = self.versioned_loan_book.current_state_index(),
            "Committed loan book"
        );
        self.notify(ChangeCause::Committed);
    }

    pub fn undo(&mut self) -> Result<()> {
        self.versioned_loan_book.undo()?;
        tracing::info!(
            snapshot = self.versioned_loan_book.current_state_index(),
            "Undid loan book change"
        );
        self.notify(ChangeCause::Undone);
        Ok(())
    }

    pub fn redo(&mut self) -> Result<()> {
        self.versioned_loan_book.redo()?;
        tracing::info!(
            snapshot = self.versioned_loan_book.current_state_index(),
            "Redid loan book change"
        );
        self.notify(ChangeCause::Redone);
        Ok(())
    }

    pub fn can_undo(&self) -> bool {
        self.versioned_loan_book.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.versioned_loan_book.can_redo()
    }

    /// 作業中の文書を丸ごと置き換える（全消去など）
    ///
    /// 履歴には触れない。確定するにはこの後`commit()`を呼ぶ。
    pub fn reset_data(&mut self, new_data: &LoanBook) -> Result<()> {
        self.versioned_loan_book.replace_all(new_data)?;
        tracing::info!("Reset loan book data");
        self.notify(ChangeCause::Reset);
        Ok(())
    }

    // ------------------------------------------------------------------------
    // 一覧
    // ------------------------------------------------------------------------

    pub fn set_loan_filter(&mut self, filter: LoanFilter) {
        self.loan_filter = filter;
    }

    pub fn loan_filter(&self) -> &LoanFilter {
        &self.loan_filter
    }

    /// 絞り込み条件に合う貸出
    pub fn filtered_loans(&self) -> Vec<&domain::Loan> {
        self.versioned_loan_book
            .loans()
            .iter()
            .filter(|loan| self.loan_filter.matches(loan))
            .collect()
    }

    pub fn bikes(&self) -> &[Bike] {
        self.versioned_loan_book.bikes()
    }

    pub fn summary(&self) -> LoanSummary {
        LoanSummary::from_loans(self.versioned_loan_book.loans())
    }

    // ------------------------------------------------------------------------
    // 内部
    // ------------------------------------------------------------------------

    fn find_bike(&self, name: &Name) -> Result<&Bike> {
        self.versioned_loan_book
            .bike(name)
            .ok_or_else(|| LoanBookError::BikeNotFound(name.clone()).into())
    }

    fn find_loan(&self, loan_id: LoanId) -> Result<&domain::Loan> {
        self.versioned_loan_book
            .loan(loan_id)
            .ok_or_else(|| LoanBookError::LoanNotFound(loan_id).into())
    }

    fn notify(&self, cause: ChangeCause) {
        let event = LoanBookChanged {
            cause,
            bike_count: self.versioned_loan_book.bikes().len(),
            loan_count: self.versioned_loan_book.loans().len(),
        };
        for observer in &self.observers {
            observer.loan_book_changed(&event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        LoanIdError, LoanIdManager, LoanStatus, LoanTime, MAXIMUM_LOAN_ID, loan::fixtures,
    };

    fn name(value: &str) -> Name {
        Name::new(value).unwrap()
    }

    fn model_with_bike(bike: &str) -> Model {
        let mut model = Model::new(LoanBook::new());
        model.add_bike(AddBike { name: name(bike) }).unwrap();
        model.commit();
        model
    }

    #[test]
    fn test_add_loan_allocates_sequential_ids() {
        let mut model = model_with_bike("BIKE001");

        let first = model.add_loan(fixtures::add_loan("Alice", "BIKE001")).unwrap();
        let second = model.add_loan(fixtures::add_loan("Bob", "BIKE001")).unwrap();

        assert_eq!(first.value(), 0);
        assert_eq!(second.value(), 1);
        assert_eq!(model.loan_book().loans().len(), 2);
    }

    #[test]
    fn test_add_loan_when_id_space_is_exhausted() {
        let last = LoanId::try_from(MAXIMUM_LOAN_ID).unwrap();
        let book = LoanBook::try_from_parts(
            vec![domain::Bike::new(name("BIKE001"))],
            vec![fixtures::loan(MAXIMUM_LOAN_ID, "Bob", "BIKE001")],
            LoanIdManager::from_last_used(last),
        )
        .unwrap();
        let mut model = Model::new(book.clone());
        assert!(!model.has_next_loan_id());

        let result = model.add_loan(fixtures::add_loan("Alice", "BIKE001"));

        assert!(matches!(
            result,
            Err(ModelError::LoanId(LoanIdError::ExhaustedIdSpace))
        ));
        assert_eq!(model.loan_book(), &book);
    }

    #[test]
    fn test_add_loan_requires_existing_bike() {
        let mut model = Model::new(LoanBook::new());
        let result = model.add_loan(fixtures::add_loan("Alice", "BIKE001"));

        assert!(matches!(
            result,
            Err(ModelError::LoanBook(LoanBookError::BikeNotFound(_)))
        ));
        assert_eq!(model.loan_book(), &LoanBook::new());
    }

    #[test]
    fn test_business_duplicate_is_rejected_without_consuming_id() {
        let mut model = model_with_bike("BIKE001");
        model.add_loan(fixtures::add_loan("Alice", "BIKE001")).unwrap();

        let result = model.add_loan(fixtures::add_loan("Alice", "BIKE001"));
        assert!(matches!(result, Err(ModelError::DuplicateLoan)));

        let next = model.add_loan(fixtures::add_loan("Bob", "BIKE001")).unwrap();
        assert_eq!(next.value(), 1);
    }

    #[test]
    fn test_returned_loan_does_not_block_new_rental() {
        let mut model = model_with_bike("BIKE001");
        let loan_id = model.add_loan(fixtures::add_loan("Alice", "BIKE001")).unwrap();
        model
            .return_loan(ReturnLoan {
                loan_id,
                returned_at: LoanTime::parse("2018-10-01 12:00").unwrap(),
            })
            .unwrap();

        assert!(model.add_loan(fixtures::add_loan("Alice", "BIKE001")).is_ok());
    }

    #[test]
    fn test_return_and_delete_loan() {
        let mut model = model_with_bike("BIKE001");
        let loan_id = model.add_loan(fixtures::add_loan("Alice", "BIKE001")).unwrap();

        let event = model
            .return_loan(ReturnLoan {
                loan_id,
                returned_at: LoanTime::parse("2018-10-01 10:00").unwrap(),
            })
            .unwrap();
        assert_eq!(event.cost_cents, 600);
        assert_eq!(
            model.loan_book().loan(loan_id).unwrap().status,
            LoanStatus::Returned
        );

        model.delete_loan(DeleteLoan { loan_id }).unwrap();
        assert_eq!(
            model.loan_book().loan(loan_id).unwrap().status,
            LoanStatus::Deleted
        );
        assert!(matches!(
            model.delete_loan(DeleteLoan { loan_id }),
            Err(ModelError::Delete(_))
        ));
    }

    #[test]
    fn test_delete_bike_in_use_is_refused() {
        let mut model = model_with_bike("BIKE001");
        model.add_loan(fixtures::add_loan("Alice", "BIKE001")).unwrap();

        assert!(matches!(
            model.delete_bike(&name("BIKE001")),
            Err(ModelError::BikeInUse(_))
        ));
        assert_eq!(model.bikes().len(), 1);
    }

    #[test]
    fn test_remove_loan_never_reuses_id() {
        let mut model = model_with_bike("BIKE001");
        let first = model.add_loan(fixtures::add_loan("Alice", "BIKE001")).unwrap();
        model.remove_loan(first).unwrap();

        let second = model.add_loan(fixtures::add_loan("Alice", "BIKE001")).unwrap();
        assert_eq!(second.value(), 1);
    }

    #[test]
    fn test_update_loan_cannot_change_id() {
        let mut model = model_with_bike("BIKE001");
        let loan_id = model.add_loan(fixtures::add_loan("Alice", "BIKE001")).unwrap();
        let mut edited = model.loan_book().loan(loan_id).unwrap().clone();
        edited.id = LoanId::from_int(7).unwrap();

        let result = model.update_loan(loan_id, edited);
        assert!(matches!(
            result,
            Err(ModelError::LoanIdChanged { from, to })
                if from == loan_id && to == LoanId::from_int(7).unwrap()
        ));
        assert_eq!(
            result.unwrap_err().to_string(),
            "The id of loan #0 cannot be changed to #7"
        );

        let mut edited = model.loan_book().loan(loan_id).unwrap().clone();
        edited.name = name("Alicia");
        model.update_loan(loan_id, edited).unwrap();
        assert_eq!(model.loan_book().loan(loan_id).unwrap().name, name("Alicia"));
    }

    #[test]
    fn test_filtered_loans_follow_undo() {
        let mut model = model_with_bike("BIKE001");
        model.add_loan(fixtures::add_loan("Alice", "BIKE001")).unwrap();
        model.commit();
        model.add_loan(fixtures::add_loan("Bob", "BIKE001")).unwrap();
        model.commit();

        model.set_loan_filter(LoanFilter::NameContainsKeywords(vec!["bob".into()]));
        assert_eq!(model.filtered_loans().len(), 1);

        model.undo().unwrap();
        assert!(model.filtered_loans().is_empty());
        assert_eq!(
            model.loan_filter(),
            &LoanFilter::NameContainsKeywords(vec!["bob".into()])
        );
    }

    #[test]
    fn test_reset_data_then_undo_restores_previous_document() {
        let mut model = model_with_bike("BIKE001");
        model.reset_data(&LoanBook::new()).unwrap();
        model.commit();
        assert!(model.bikes().is_empty());

        model.undo().unwrap();
        assert_eq!(model.bikes().len(), 1);
    }

    #[test]
    fn test_navigation_errors_are_reported() {
        let mut model = Model::new(LoanBook::new());
        assert!(!model.can_undo());
        assert!(!model.can_redo());
        assert!(matches!(
            model.undo(),
            Err(ModelError::History(domain::HistoryError::NoUndoableState))
        ));
        assert!(matches!(
            model.redo(),
            Err(ModelError::History(domain::HistoryError::NoRedoableState))
        ));
    }
}
