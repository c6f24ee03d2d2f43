use crate::domain::{Bike, Loan};

/// 貸出1件を1行で表示する
pub fn format_loan(loan: &Loan) -> String {
    let mut line = format!(
        "#{} {} [{}] bike: {} rate: ${}/h from: {}",
        loan.id, loan.name, loan.status, loan.bike, loan.rate, loan.start_time
    );
    if let Some(end_time) = &loan.end_time {
        line.push_str(&format!(" to: {end_time}"));
    }
    if !loan.tags.is_empty() {
        let tags: Vec<&str> = loan.tags.iter().map(|tag| tag.as_str()).collect();
        line.push_str(&format!(" tags: {}", tags.join(", ")));
    }
    line
}

pub fn format_bike(bike: &Bike) -> String {
    format!("{} [{}]", bike.name, bike.status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LoanTime, Name, Tag, loan::fixtures};

    #[test]
    fn test_format_loan() {
        let mut loan = fixtures::loan(3, "Alice", "BIKE001");
        assert_eq!(
            format_loan(&loan),
            "#3 Alice [ONGOING] bike: BIKE001 rate: $6.00/h from: 2018-10-01 09:00"
        );

        loan.end_time = Some(LoanTime::parse("2018-10-01 10:00").unwrap());
        loan.tags.insert(Tag::new("vip").unwrap());
        assert!(format_loan(&loan).ends_with(" to: 2018-10-01 10:00 tags: vip"));
    }

    #[test]
    fn test_format_bike() {
        let bike = Bike::new(Name::new("BIKE001").unwrap());
        assert_eq!(format_bike(&bike), "BIKE001 [AVAILABLE]");
    }
}
