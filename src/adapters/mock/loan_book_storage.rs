use crate::domain::LoanBook;
use crate::ports::loan_book_storage::{LoanBookStorage as LoanBookStorageTrait, Result};
use async_trait::async_trait;
use std::sync::Mutex;

/// LoanBookStorageのモック実装
///
/// ファイルの代わりにメモリ上に最後に保存した文書を保持する。
/// 保存回数も記録し、自動保存のテストに使える。
pub struct LoanBookStorage {
    saved: Mutex<Option<LoanBook>>,
    save_count: Mutex<usize>,
}

impl LoanBookStorage {
    pub fn new() -> Self {
        Self {
            saved: Mutex::new(None),
            save_count: Mutex::new(0),
        }
    }

    /// テスト用に保存済みの文書を用意する
    pub fn with_loan_book(loan_book: LoanBook) -> Self {
        let storage = Self::new();
        *storage.saved.lock().unwrap() = Some(loan_book);
        storage
    }

    pub fn save_count(&self) -> usize {
        *self.save_count.lock().unwrap()
    }
}

impl Default for LoanBookStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LoanBookStorageTrait for LoanBookStorage {
    /// 最後に保存した文書を返す
    async fn read_loan_book(&self) -> Result<Option<LoanBook>> {
        Ok(self.saved.lock().unwrap().clone())
    }

    /// 文書を複製して保持する
    async fn save_loan_book(&self, loan_book: &LoanBook) -> Result<()> {
        *self.saved.lock().unwrap() = Some(loan_book.clone());
        *self.save_count.lock().unwrap() += 1;
        Ok(())
    }
}
