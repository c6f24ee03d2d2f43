use super::{
    Bike, DataIntegrityError, Loan, LoanBookError, LoanId, LoanIdManager, Name,
    loan_id::highest_loan_id,
    unique_list::{UniqueList, UniqueListError},
};

/// LoanBook集約 - 自転車・貸出・IDマネージャの整合性境界
///
/// 不変条件：
/// - 同じ名前の自転車は1台まで
/// - 完全一致またはIDを共有する貸出は共存しない
/// - IDマネージャは常に貸出集合に対して正当
///
/// 更新に失敗した場合、集約は一切変更されない。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LoanBook {
    bikes: UniqueList<Bike>,
    loans: UniqueList<Loan>,
    loan_id_manager: LoanIdManager,
}

impl LoanBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// 構成要素から集約を作成する（保存データの読み込み用）
    ///
    /// # エラー
    /// - 自転車・貸出の重複
    /// - IDマネージャが貸出集合に対して不正
    pub fn try_from_parts(
        bikes: Vec<Bike>,
        loans: Vec<Loan>,
        loan_id_manager: LoanIdManager,
    ) -> Result<Self, DataIntegrityError> {
        let bikes = UniqueList::from_vec(bikes)
            .map_err(|duplicate| DataIntegrityError::DuplicateBike(duplicate.name))?;
        let loans = UniqueList::from_vec(loans)
            .map_err(|duplicate| DataIntegrityError::DuplicateLoan(duplicate.id))?;

        if let Some(highest) = highest_loan_id(loans.as_slice()) {
            if !loan_id_manager.is_legal_for(loans.as_slice()) {
                return Err(DataIntegrityError::IllegalLoanIdManager {
                    last_used: loan_id_manager.last_used_loan_id(),
                    highest,
                });
            }
        }

        Ok(Self {
            bikes,
            loans,
            loan_id_manager,
        })
    }

    /// 全データを`other`の内容で置き換える
    ///
    /// 読み込み時と同じ検証を行い、失敗した場合は何も変更しない。
    pub fn replace_all(&mut self, other: &LoanBook) -> Result<(), DataIntegrityError> {
        *self = Self::try_from_parts(
            other.bikes().to_vec(),
            other.loans().to_vec(),
            other.loan_id_manager.clone(),
        )?;
        Ok(())
    }

    // ------------------------------------------------------------------------
    // 自転車
    // ------------------------------------------------------------------------

    pub fn add_bike(&mut self, bike: Bike) -> Result<(), LoanBookError> {
        let name = bike.name.clone();
        self.bikes
            .add(bike)
            .map_err(|_| LoanBookError::DuplicateBike(name))
    }

    pub fn remove_bike(&mut self, target: &Bike) -> Result<Bike, LoanBookError> {
        self.bikes
            .remove(target)
            .map_err(|_| LoanBookError::BikeNotFound(target.name.clone()))
    }

    pub fn update_bike(&mut self, target: &Bike, replacement: Bike) -> Result<(), LoanBookError> {
        let replacement_name = replacement.name.clone();
        self.bikes
            .set(target, replacement)
            .map_err(|err| match err {
                UniqueListError::NotFound => LoanBookError::BikeNotFound(target.name.clone()),
                UniqueListError::Duplicate => LoanBookError::DuplicateBike(replacement_name),
            })
    }

    pub fn has_bike(&self, bike: &Bike) -> bool {
        self.bikes.contains(bike)
    }

    /// 名前で自転車を探す
    pub fn bike(&self, name: &Name) -> Option<&Bike> {
        self.bikes.as_slice().iter().find(|bike| &bike.name == name)
    }

    pub fn bikes(&self) -> &[Bike] {
        self.bikes.as_slice()
    }

    // ------------------------------------------------------------------------
    // 貸出
    // ------------------------------------------------------------------------

    /// 貸出を追加する
    ///
    /// IDはIDマネージャが発行済みのものでなければならない。
    pub fn add_loan(&mut self, loan: Loan) -> Result<(), LoanBookError> {
        self.ensure_issued(loan.id)?;
        let id = loan.id;
        self.loans
            .add(loan)
            .map_err(|_| LoanBookError::DuplicateLoan(id))
    }

    pub fn remove_loan(&mut self, target: &Loan) -> Result<Loan, LoanBookError> {
        self.loans
            .remove(target)
            .map_err(|_| LoanBookError::LoanNotFound(target.id))
    }

    pub fn update_loan(&mut self, target: &Loan, replacement: Loan) -> Result<(), LoanBookError> {
        if !self.loans.as_slice().contains(target) {
            return Err(LoanBookError::LoanNotFound(target.id));
        }
        self.ensure_issued(replacement.id)?;

        let replacement_id = replacement.id;
        self.loans
            .set(target, replacement)
            .map_err(|err| match err {
                UniqueListError::NotFound => LoanBookError::LoanNotFound(target.id),
                UniqueListError::Duplicate => LoanBookError::DuplicateLoan(replacement_id),
            })
    }

    pub fn has_loan(&self, loan: &Loan) -> bool {
        self.loans.contains(loan)
    }

    /// IDで貸出を探す
    pub fn loan(&self, id: LoanId) -> Option<&Loan> {
        self.loans.as_slice().iter().find(|loan| loan.id == id)
    }

    pub fn loans(&self) -> &[Loan] {
        self.loans.as_slice()
    }

    // ------------------------------------------------------------------------
    // IDマネージャ
    // ------------------------------------------------------------------------

    /// 次の貸出IDを発行する（IDマネージャに委譲）
    pub fn next_loan_id(&mut self) -> Result<LoanId, LoanBookError> {
        Ok(self.loan_id_manager.next_available_loan_id()?)
    }

    pub fn has_next_loan_id(&self) -> bool {
        self.loan_id_manager.has_next_available_loan_id()
    }

    /// IDマネージャを差し替える
    ///
    /// 現在の貸出集合に対して不正なマネージャは受け付けない。
    pub fn set_loan_id_manager(&mut self, manager: LoanIdManager) -> Result<(), LoanBookError> {
        if let Some(highest) = highest_loan_id(self.loans.as_slice()) {
            if !manager.is_legal_for(self.loans.as_slice()) {
                return Err(LoanBookError::IllegalLoanIdManager { highest });
            }
        }
        self.loan_id_manager = manager;
        Ok(())
    }

    pub fn loan_id_manager(&self) -> &LoanIdManager {
        &self.loan_id_manager
    }

    fn ensure_issued(&self, id: LoanId) -> Result<(), LoanBookError> {
        match self.loan_id_manager.last_used_loan_id() {
            Some(last) if last >= id => Ok(()),
            _ => Err(LoanBookError::IllegalLoanIdManager { highest: id }),
        }
    }
}
