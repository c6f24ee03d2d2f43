pub mod loan_book_storage;
pub mod serializable;

pub use loan_book_storage::LoanBookStorage;
pub use serializable::SerializableLoanBook;
