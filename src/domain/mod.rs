pub mod bike;
pub mod commands;
pub mod errors;
pub mod events;
pub mod loan;
pub mod loan_book;
pub mod loan_id;
pub mod unique_list;
pub mod value_objects;
pub mod versioned_loan_book;

pub use bike::Bike;
pub use errors::*;
pub use events::*;
pub use loan::Loan;
pub use loan_book::LoanBook;
pub use loan_id::{LoanId, LoanIdManager, MAXIMUM_LOAN_ID};
pub use value_objects::*;
pub use versioned_loan_book::VersionedLoanBook;
