pub mod loan_book_observer;
pub mod loan_book_storage;

pub use loan_book_observer::ChangeRecorder;
pub use loan_book_storage::LoanBookStorage;
