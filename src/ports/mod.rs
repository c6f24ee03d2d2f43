pub mod loan_book_observer;
pub mod loan_book_storage;

pub use loan_book_observer::*;
pub use loan_book_storage::*;
