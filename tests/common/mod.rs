#![allow(dead_code)]

use rusty_bike_rental::domain::{
    Bike, Email, Loan, LoanId, LoanRate, LoanStatus, LoanTime, Name, Nric, Phone,
    commands::AddLoan,
};
use std::collections::BTreeSet;

pub fn name(value: &str) -> Name {
    Name::new(value).unwrap()
}

pub fn bike(value: &str) -> Bike {
    Bike::new(name(value))
}

pub fn time(value: &str) -> LoanTime {
    LoanTime::parse(value).unwrap()
}

/// テスト用の貸出コマンドを作成（料金6.00、2018-10-01 09:00開始）
pub fn add_loan(borrower: &str, bike: &str) -> AddLoan {
    AddLoan {
        name: name(borrower),
        nric: Nric::new("S1234567A").unwrap(),
        phone: Phone::new("91234567").unwrap(),
        email: Email::new("alice@example.com").unwrap(),
        bike: name(bike),
        rate: LoanRate::new("6.00").unwrap(),
        start_time: time("2018-10-01 09:00"),
        tags: BTreeSet::new(),
    }
}

/// IDを指定して進行中の貸出を作成
pub fn loan(id: u32, borrower: &str, bike: &str) -> Loan {
    let cmd = add_loan(borrower, bike);
    Loan {
        id: LoanId::try_from(id).unwrap(),
        name: cmd.name,
        nric: cmd.nric,
        phone: cmd.phone,
        email: cmd.email,
        bike: cmd.bike,
        rate: cmd.rate,
        start_time: cmd.start_time,
        end_time: None,
        status: LoanStatus::Ongoing,
        tags: cmd.tags,
    }
}
