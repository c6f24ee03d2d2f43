use serde::{Deserialize, Serialize};

use crate::domain::{Bike, DataIntegrityError, Loan, LoanBook, LoanId, LoanIdManager};

/// JSON file representation of a LoanBook
///
/// Field values are validated by their own `Deserialize` impls; cross-entity
/// checks (duplicates, id manager legality) happen in the conversion to
/// `LoanBook`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableLoanBook {
    #[serde(default)]
    pub bikes: Vec<Bike>,
    #[serde(default)]
    pub loans: Vec<Loan>,
    #[serde(default)]
    pub last_used_loan_id: Option<LoanId>,
}

impl From<&LoanBook> for SerializableLoanBook {
    fn from(loan_book: &LoanBook) -> Self {
        Self {
            bikes: loan_book.bikes().to_vec(),
            loans: loan_book.loans().to_vec(),
            last_used_loan_id: loan_book.loan_id_manager().last_used_loan_id(),
        }
    }
}

impl TryFrom<SerializableLoanBook> for LoanBook {
    type Error = DataIntegrityError;

    fn try_from(data: SerializableLoanBook) -> Result<Self, Self::Error> {
        LoanBook::try_from_parts(
            data.bikes,
            data.loans,
            LoanIdManager::from_last_used_opt(data.last_used_loan_id),
        )
    }
}
