mod command;
mod errors;
mod filter;
mod model;
mod summary;

pub use command::{Command, CommandResult, HELP_MESSAGE, execute};
pub use errors::{ModelError, Result};
pub use filter::LoanFilter;
pub use model::Model;
pub use summary::LoanSummary;
