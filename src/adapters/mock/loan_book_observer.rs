use crate::domain::LoanBookChanged;
use crate::ports::LoanBookObserver;
use std::sync::{Arc, Mutex};

/// Mock implementation of LoanBookObserver
///
/// Records every notification. Clones share the same record, so a test can
/// keep one clone and hand the other to the model.
#[derive(Clone, Default)]
pub struct ChangeRecorder {
    events: Arc<Mutex<Vec<LoanBookChanged>>>,
}

impl ChangeRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// All notifications received so far, oldest first
    pub fn events(&self) -> Vec<LoanBookChanged> {
        self.events.lock().unwrap().clone()
    }

    /// Drain the record and report whether anything arrived
    pub fn take_changed(&self) -> bool {
        let mut events = self.events.lock().unwrap();
        let changed = !events.is_empty();
        events.clear();
        changed
    }
}

impl LoanBookObserver for ChangeRecorder {
    fn loan_book_changed(&self, event: &LoanBookChanged) {
        self.events.lock().unwrap().push(event.clone());
    }
}
