use crate::domain::{Loan, LoanStatus, Name};

/// 貸出一覧の絞り込み条件
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoanFilter {
    /// すべて表示
    #[default]
    All,
    /// 借り手の氏名がいずれかのキーワードを単語として含む
    NameContainsKeywords(Vec<String>),
    /// 指定したステータスのみ
    Status(LoanStatus),
    /// 指定した自転車の貸出のみ
    Bike(Name),
}

impl LoanFilter {
    pub fn matches(&self, loan: &Loan) -> bool {
        match self {
            LoanFilter::All => true,
            LoanFilter::NameContainsKeywords(keywords) => keywords
                .iter()
                .any(|keyword| loan.name.contains_word_ignore_case(keyword)),
            LoanFilter::Status(status) => loan.status == *status,
            LoanFilter::Bike(bike) => loan.bike == *bike,
        }
    }
}
