use crate::domain::{Loan, LoanStatus, loan::calculate_cost};

/// 貸出の集計
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoanSummary {
    pub ongoing: usize,
    pub returned: usize,
    pub deleted: usize,
    /// 返却済み貸出の売上合計（セント単位）
    pub revenue_cents: u64,
}

impl LoanSummary {
    pub fn from_loans<'a>(loans: impl IntoIterator<Item = &'a Loan>) -> Self {
        loans
            .into_iter()
            .fold(Self::default(), |mut summary, loan| {
                match loan.status {
                    LoanStatus::Ongoing => summary.ongoing += 1,
                    LoanStatus::Returned => {
                        summary.returned += 1;
                        if let Some(end) = &loan.end_time {
                            summary.revenue_cents =
                                summary.revenue_cents.saturating_add(calculate_cost(loan, end));
                        }
                    }
                    LoanStatus::Deleted => summary.deleted += 1,
                }
                summary
            })
    }

    pub fn total(&self) -> usize {
        self.ongoing + self.returned + self.deleted
    }
}
