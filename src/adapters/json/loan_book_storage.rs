use crate::domain::LoanBook;
use crate::ports::loan_book_storage::{LoanBookStorage as LoanBookStorageTrait, Result};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::serializable::SerializableLoanBook;

/// JSON file implementation of LoanBookStorage
///
/// The whole document is written as one pretty-printed JSON object.
/// Saving writes a sibling `.tmp` file and renames it over the target.
pub struct LoanBookStorage {
    path: PathBuf,
}

impl LoanBookStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut file_name = self.path.file_name().unwrap_or_default().to_os_string();
        file_name.push(".tmp");
        self.path.with_file_name(file_name)
    }
}

#[async_trait]
impl LoanBookStorageTrait for LoanBookStorage {
    /// Load the loan book, or `None` if the file does not exist yet
    async fn read_loan_book(&self) -> Result<Option<LoanBook>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!(path = %self.path.display(), "Loan book file not found");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let data: SerializableLoanBook = serde_json::from_str(&content)?;
        let loan_book = LoanBook::try_from(data)?;

        tracing::debug!(
            path = %self.path.display(),
            bikes = loan_book.bikes().len(),
            loans = loan_book.loans().len(),
            "Loaded loan book"
        );
        Ok(Some(loan_book))
    }

    /// Save a snapshot of the loan book
    async fn save_loan_book(&self, loan_book: &LoanBook) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_string_pretty(&SerializableLoanBook::from(loan_book))?;
        let temp_path = self.temp_path();
        tokio::fs::write(&temp_path, content).await?;
        tokio::fs::rename(&temp_path, &self.path).await?;

        tracing::debug!(path = %self.path.display(), "Saved loan book");
        Ok(())
    }
}
