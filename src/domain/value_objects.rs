use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{DateTime, NaiveDateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::ValidationError;

static NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\p{Alphabetic}\p{Nd}][\p{Alphabetic}\p{Nd} ]*$").unwrap());
static NRIC_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[STFG]\d{7}[A-Z]$").unwrap());
static PHONE_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{3,}$").unwrap());
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*$").unwrap()
});
static RATE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,9})(?:\.(\d{1,2}))?$").unwrap());
static TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\p{Alphabetic}\p{Nd}]+$").unwrap());

/// 表示・入力に使う時刻フォーマット
pub const LOAN_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// 名前（借り手の氏名、自転車名の両方に使う）
///
/// 不変条件：英数字と空白のみ、先頭は空白不可、空文字不可
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Name(String);

impl Name {
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into().trim().to_string();
        if !NAME_PATTERN.is_match(&value) {
            return Err(ValidationError::InvalidName(value));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 空白区切りの単語のいずれかに一致するか（大文字小文字無視）
    pub fn contains_word_ignore_case(&self, keyword: &str) -> bool {
        self.0
            .split_whitespace()
            .any(|word| word.eq_ignore_ascii_case(keyword))
    }
}

/// NRIC（身分証番号）
///
/// 不変条件：S/T/F/G + 数字7桁 + 英大文字1文字
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Nric(String);

impl Nric {
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into().trim().to_uppercase();
        if !NRIC_PATTERN.is_match(&value) {
            return Err(ValidationError::InvalidNric(value));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// 電話番号
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Phone(String);

impl Phone {
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into().trim().to_string();
        if !PHONE_PATTERN.is_match(&value) {
            return Err(ValidationError::InvalidPhone(value));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// メールアドレス
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into().trim().to_string();
        if !EMAIL_PATTERN.is_match(&value) {
            return Err(ValidationError::InvalidEmail(value));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// タグ
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Tag(String);

impl Tag {
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into().trim().to_string();
        if !TAG_PATTERN.is_match(&value) {
            return Err(ValidationError::InvalidTag(value));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// 1時間あたりの貸出料金
///
/// セント単位の整数で保持する。
/// 不変条件：非負、小数点以下2桁まで
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LoanRate(u64);

impl LoanRate {
    pub fn new(value: &str) -> Result<Self, ValidationError> {
        let trimmed = value.trim();
        let invalid = || ValidationError::InvalidRate(trimmed.to_string());

        let captures = RATE_PATTERN.captures(trimmed).ok_or_else(invalid)?;
        let whole: u64 = captures[1].parse().map_err(|_| invalid())?;
        // "3.5"は350セント
        let fraction = match captures.get(2).map(|m| m.as_str()) {
            Some(digits) => {
                let value: u64 = digits.parse().map_err(|_| invalid())?;
                if digits.len() == 1 { value * 10 } else { value }
            }
            None => 0,
        };

        Ok(Self(whole * 100 + fraction))
    }

    pub fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    pub fn cents(&self) -> u64 {
        self.0
    }
}

/// 貸出の開始・終了時刻
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LoanTime(DateTime<Utc>);

impl LoanTime {
    pub fn now() -> Self {
        Self(Utc::now())
    }

    pub fn from_datetime(value: DateTime<Utc>) -> Self {
        Self(value)
    }

    /// `YYYY-MM-DD HH:MM`（UTCとして解釈）またはRFC 3339形式を受け付ける
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        let trimmed = value.trim();
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, LOAN_TIME_FORMAT) {
            return Ok(Self(naive.and_utc()));
        }
        DateTime::parse_from_rfc3339(trimmed)
            .map(|dt| Self(dt.with_timezone(&Utc)))
            .map_err(|_| ValidationError::InvalidTime(trimmed.to_string()))
    }

    pub fn value(&self) -> DateTime<Utc> {
        self.0
    }

    /// 開始時刻から終了時刻までの経過分数（負にはならない）
    pub fn minutes_until(&self, end: &LoanTime) -> i64 {
        (end.0 - self.0).num_minutes().max(0)
    }
}

/// 貸出ステータス
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoanStatus {
    /// 貸出中
    Ongoing,
    /// 返却済み
    Returned,
    /// 削除済み（記録は残る）
    Deleted,
}

impl LoanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoanStatus::Ongoing => "ONGOING",
            LoanStatus::Returned => "RETURNED",
            LoanStatus::Deleted => "DELETED",
        }
    }

    pub fn is_ongoing(&self) -> bool {
        matches!(self, LoanStatus::Ongoing)
    }

    pub fn is_returned(&self) -> bool {
        matches!(self, LoanStatus::Returned)
    }

    pub fn is_deleted(&self) -> bool {
        matches!(self, LoanStatus::Deleted)
    }
}

impl FromStr for LoanStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ONGOING" => Ok(LoanStatus::Ongoing),
            "RETURNED" => Ok(LoanStatus::Returned),
            "DELETED" => Ok(LoanStatus::Deleted),
            _ => Err(ValidationError::InvalidLoanStatus(s.to_string())),
        }
    }
}

/// 自転車ステータス（今のところ貸出可能のみ）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum BikeStatus {
    #[default]
    Available,
}

impl BikeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BikeStatus::Available => "AVAILABLE",
        }
    }
}

impl FromStr for BikeStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AVAILABLE" => Ok(BikeStatus::Available),
            _ => Err(ValidationError::InvalidBikeStatus(s.to_string())),
        }
    }
}

// ============================================================================
// 変換・表示
// ============================================================================

macro_rules! string_conversions {
    ($($ty:ident),* $(,)?) => {
        $(
            impl TryFrom<String> for $ty {
                type Error = ValidationError;

                fn try_from(value: String) -> Result<Self, Self::Error> {
                    Self::new(value)
                }
            }

            impl From<$ty> for String {
                fn from(value: $ty) -> Self {
                    value.0
                }
            }

            impl FromStr for $ty {
                type Err = ValidationError;

                fn from_str(s: &str) -> Result<Self, Self::Err> {
                    Self::new(s)
                }
            }

            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(&self.0)
                }
            }
        )*
    };
}

string_conversions!(Name, Nric, Phone, Email, Tag);

impl TryFrom<String> for LoanRate {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<LoanRate> for String {
    fn from(value: LoanRate) -> Self {
        value.to_string()
    }
}

impl FromStr for LoanRate {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for LoanRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl fmt::Display for LoanTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(LOAN_TIME_FORMAT))
    }
}

impl fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for BikeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
