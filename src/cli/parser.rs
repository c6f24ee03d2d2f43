use std::collections::BTreeSet;

use thiserror::Error;

use crate::application::loan_book::{Command, LoanFilter};
use crate::domain::{
    Email, LoanId, LoanIdError, LoanRate, LoanStatus, LoanTime, Name, Nric, Phone, Tag,
    ValidationError,
    commands::{AddBike, AddLoan, DeleteLoan, ReturnLoan},
};

const ADD_BIKE_USAGE: &str = "addbike n/NAME";
const DELETE_BIKE_USAGE: &str = "deletebike n/NAME";
const ADD_LOAN_USAGE: &str = "add n/NAME i/NRIC p/PHONE e/EMAIL b/BIKE r/RATE [s/START] [t/TAG]...";
const RETURN_USAGE: &str = "return LOAN_ID [at/TIME]";
const DELETE_USAGE: &str = "delete LOAN_ID";
const LIST_USAGE: &str = "list [ongoing|returned|deleted|b/BIKE]";
const FIND_USAGE: &str = "find KEYWORD [MORE_KEYWORDS]...";

/// 入力行の解析エラー
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    /// 引数の形が使い方と合わない
    #[error("Invalid command format!\nUsage: {usage}")]
    InvalidFormat { usage: &'static str },

    /// 1回しか指定できない接頭辞が複数回現れた
    #[error("Prefix {0} may only be given once")]
    DuplicatePrefix(&'static str),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    LoanId(#[from] LoanIdError),
}

pub type Result<T> = std::result::Result<T, ParseError>;

/// 引数の接頭辞
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Prefix {
    Name,
    Nric,
    Phone,
    Email,
    Bike,
    Rate,
    Start,
    Tag,
    At,
}

impl Prefix {
    const ALL: [Prefix; 9] = [
        Prefix::Name,
        Prefix::Nric,
        Prefix::Phone,
        Prefix::Email,
        Prefix::Bike,
        Prefix::Rate,
        Prefix::Start,
        Prefix::Tag,
        Prefix::At,
    ];

    fn as_str(self) -> &'static str {
        match self {
            Prefix::Name => "n/",
            Prefix::Nric => "i/",
            Prefix::Phone => "p/",
            Prefix::Email => "e/",
            Prefix::Bike => "b/",
            Prefix::Rate => "r/",
            Prefix::Start => "s/",
            Prefix::Tag => "t/",
            Prefix::At => "at/",
        }
    }

    /// トークンの先頭に接頭辞があれば、接頭辞と残りの値を返す
    fn split(token: &str) -> Option<(Prefix, &str)> {
        Prefix::ALL
            .into_iter()
            .find_map(|prefix| token.strip_prefix(prefix.as_str()).map(|rest| (prefix, rest)))
    }
}

/// 接頭辞ごとに値を集めた引数
///
/// 接頭辞で始まらないトークンは直前の値の続き（空白区切り）として扱う。
/// 最初の接頭辞より前のトークンは前置き（preamble）になる。
#[derive(Debug, Default)]
struct ArgumentMultimap {
    preamble: String,
    values: Vec<(Prefix, String)>,
}

impl ArgumentMultimap {
    fn tokenize(args: &str) -> Self {
        let mut map = Self::default();
        for token in args.split_whitespace() {
            if let Some((prefix, value)) = Prefix::split(token) {
                map.values.push((prefix, value.to_string()));
                continue;
            }
            let target = match map.values.last_mut() {
                Some((_, value)) => value,
                None => &mut map.preamble,
            };
            if !target.is_empty() {
                target.push(' ');
            }
            target.push_str(token);
        }
        map
    }

    fn all(&self, prefix: Prefix) -> impl Iterator<Item = &str> {
        self.values
            .iter()
            .filter(move |(p, _)| *p == prefix)
            .map(|(_, value)| value.as_str())
    }

    fn optional(&self, prefix: Prefix) -> Result<Option<&str>> {
        let mut values = self.all(prefix);
        let first = values.next();
        if values.next().is_some() {
            return Err(ParseError::DuplicatePrefix(prefix.as_str()));
        }
        Ok(first)
    }

    fn required(&self, prefix: Prefix, usage: &'static str) -> Result<&str> {
        self.optional(prefix)?
            .ok_or(ParseError::InvalidFormat { usage })
    }

    /// 前置きが空で、許可された接頭辞だけが現れていることを確かめる
    fn expect_only(&self, allowed: &[Prefix], usage: &'static str) -> Result<()> {
        let unexpected = self.values.iter().any(|(p, _)| !allowed.contains(p));
        if !self.preamble.is_empty() || unexpected {
            return Err(ParseError::InvalidFormat { usage });
        }
        Ok(())
    }
}

/// 入力行をコマンドに変換する
///
/// 書式: `COMMAND_WORD [ARGUMENTS]`
/// 時刻を省略した`add`と`return`は現在時刻を使う。
pub fn parse_command(input: &str) -> Result<Command> {
    let input = input.trim();
    let (command_word, args) = match input.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (input, ""),
    };

    match command_word {
        "addbike" => parse_add_bike(args),
        "deletebike" => parse_delete_bike(args),
        "add" => parse_add_loan(args),
        "return" => parse_return_loan(args),
        "delete" => parse_delete_loan(args),
        "list" => parse_list(args),
        "find" => parse_find(args),
        "bikes" => no_arguments(args, Command::ListBikes, "bikes"),
        "summary" => no_arguments(args, Command::Summary, "summary"),
        "clear" => no_arguments(args, Command::Clear, "clear"),
        "undo" => no_arguments(args, Command::Undo, "undo"),
        "redo" => no_arguments(args, Command::Redo, "redo"),
        "help" => Ok(Command::Help),
        "exit" => Ok(Command::Exit),
        other => Err(ParseError::UnknownCommand(other.to_string())),
    }
}

fn no_arguments(args: &str, command: Command, usage: &'static str) -> Result<Command> {
    if args.is_empty() {
        Ok(command)
    } else {
        Err(ParseError::InvalidFormat { usage })
    }
}

fn parse_add_bike(args: &str) -> Result<Command> {
    let map = ArgumentMultimap::tokenize(args);
    map.expect_only(&[Prefix::Name], ADD_BIKE_USAGE)?;
    let name = Name::new(map.required(Prefix::Name, ADD_BIKE_USAGE)?)?;
    Ok(Command::AddBike(AddBike { name }))
}

fn parse_delete_bike(args: &str) -> Result<Command> {
    let map = ArgumentMultimap::tokenize(args);
    map.expect_only(&[Prefix::Name], DELETE_BIKE_USAGE)?;
    let name = Name::new(map.required(Prefix::Name, DELETE_BIKE_USAGE)?)?;
    Ok(Command::DeleteBike(name))
}

fn parse_add_loan(args: &str) -> Result<Command> {
    let map = ArgumentMultimap::tokenize(args);
    map.expect_only(
        &[
            Prefix::Name,
            Prefix::Nric,
            Prefix::Phone,
            Prefix::Email,
            Prefix::Bike,
            Prefix::Rate,
            Prefix::Start,
            Prefix::Tag,
        ],
        ADD_LOAN_USAGE,
    )?;

    let start_time = match map.optional(Prefix::Start)? {
        Some(value) => LoanTime::parse(value)?,
        None => LoanTime::now(),
    };
    let tags = map
        .all(Prefix::Tag)
        .map(Tag::new)
        .collect::<std::result::Result<BTreeSet<_>, _>>()?;

    Ok(Command::AddLoan(AddLoan {
        name: Name::new(map.required(Prefix::Name, ADD_LOAN_USAGE)?)?,
        nric: Nric::new(map.required(Prefix::Nric, ADD_LOAN_USAGE)?)?,
        phone: Phone::new(map.required(Prefix::Phone, ADD_LOAN_USAGE)?)?,
        email: Email::new(map.required(Prefix::Email, ADD_LOAN_USAGE)?)?,
        bike: Name::new(map.required(Prefix::Bike, ADD_LOAN_USAGE)?)?,
        rate: LoanRate::new(map.required(Prefix::Rate, ADD_LOAN_USAGE)?)?,
        start_time,
        tags,
    }))
}

fn parse_loan_id(preamble: &str, usage: &'static str) -> Result<LoanId> {
    if preamble.is_empty() {
        return Err(ParseError::InvalidFormat { usage });
    }
    Ok(preamble.parse()?)
}

fn parse_return_loan(args: &str) -> Result<Command> {
    let map = ArgumentMultimap::tokenize(args);
    // IDは前置きとして受け取る
    if map.values.iter().any(|(p, _)| *p != Prefix::At) {
        return Err(ParseError::InvalidFormat {
            usage: RETURN_USAGE,
        });
    }

    let loan_id = parse_loan_id(&map.preamble, RETURN_USAGE)?;
    let returned_at = match map.optional(Prefix::At)? {
        Some(value) => LoanTime::parse(value)?,
        None => LoanTime::now(),
    };
    Ok(Command::ReturnLoan(ReturnLoan {
        loan_id,
        returned_at,
    }))
}

fn parse_delete_loan(args: &str) -> Result<Command> {
    let map = ArgumentMultimap::tokenize(args);
    if !map.values.is_empty() {
        return Err(ParseError::InvalidFormat {
            usage: DELETE_USAGE,
        });
    }
    let loan_id = parse_loan_id(&map.preamble, DELETE_USAGE)?;
    Ok(Command::DeleteLoan(DeleteLoan { loan_id }))
}

fn parse_list(args: &str) -> Result<Command> {
    if args.is_empty() {
        return Ok(Command::List(LoanFilter::All));
    }
    let map = ArgumentMultimap::tokenize(args);
    if let Some(bike) = map.optional(Prefix::Bike)? {
        map.expect_only(&[Prefix::Bike], LIST_USAGE)?;
        return Ok(Command::List(LoanFilter::Bike(Name::new(bike)?)));
    }
    let status: LoanStatus = args
        .parse()
        .map_err(|_| ParseError::InvalidFormat { usage: LIST_USAGE })?;
    Ok(Command::List(LoanFilter::Status(status)))
}

fn parse_find(args: &str) -> Result<Command> {
    let keywords: Vec<String> = args.split_whitespace().map(str::to_string).collect();
    if keywords.is_empty() {
        return Err(ParseError::InvalidFormat { usage: FIND_USAGE });
    }
    Ok(Command::List(LoanFilter::NameContainsKeywords(keywords)))
}
