use crate::domain::{
    LoanBook, Name,
    commands::{AddBike, AddLoan, DeleteLoan, ReturnLoan},
};

use super::{errors::Result, filter::LoanFilter, model::Model};

/// コマンド層が受け付ける操作
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    AddBike(AddBike),
    DeleteBike(Name),
    AddLoan(AddLoan),
    ReturnLoan(ReturnLoan),
    DeleteLoan(DeleteLoan),
    List(LoanFilter),
    ListBikes,
    Summary,
    Clear,
    Undo,
    Redo,
    Help,
    Exit,
}

/// コマンドの実行結果
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandResult {
    /// 利用者に表示するメッセージ
    pub feedback: String,
    /// 絞り込み後の貸出一覧を表示するか
    pub show_loans: bool,
    /// 自転車一覧を表示するか
    pub show_bikes: bool,
    pub exit: bool,
}

impl CommandResult {
    fn message(feedback: impl Into<String>) -> Self {
        Self {
            feedback: feedback.into(),
            ..Self::default()
        }
    }
}

pub const HELP_MESSAGE: &str = "\
Commands:
  addbike n/NAME
  deletebike n/NAME
  add n/NAME i/NRIC p/PHONE e/EMAIL b/BIKE r/RATE [s/START] [t/TAG]...
  return LOAN_ID [at/TIME]
  delete LOAN_ID
  list [ongoing|returned|deleted|b/BIKE]
  find KEYWORD [MORE_KEYWORDS]...
  bikes
  summary
  clear
  undo
  redo
  help
  exit";

/// コマンドを実行する
///
/// 文書を変更するコマンドは成功後に必ずcommitする。
/// 失敗したコマンドは文書も履歴も変更しない。
pub fn execute(model: &mut Model, command: Command) -> Result<CommandResult> {
    match command {
        Command::AddBike(cmd) => {
            let name = cmd.name.clone();
            model.add_bike(cmd)?;
            model.commit();
            Ok(CommandResult::message(format!("New bike added: {name}")))
        }
        Command::DeleteBike(name) => {
            model.delete_bike(&name)?;
            model.commit();
            Ok(CommandResult::message(format!("Deleted bike: {name}")))
        }
        Command::AddLoan(cmd) => {
            let loan_id = model.add_loan(cmd)?;
            model.commit();
            Ok(CommandResult::message(format!("New loan added: #{loan_id}")))
        }
        Command::ReturnLoan(cmd) => {
            let event = model.return_loan(cmd)?;
            model.commit();
            Ok(CommandResult::message(format!(
                "Loan #{} returned. Cost: ${}.{:02}",
                event.loan_id,
                event.cost_cents / 100,
                event.cost_cents % 100
            )))
        }
        Command::DeleteLoan(cmd) => {
            let event = model.delete_loan(cmd)?;
            model.commit();
            Ok(CommandResult::message(format!(
                "Deleted loan: #{}",
                event.loan_id
            )))
        }
        Command::List(filter) => {
            let listed_all = filter == LoanFilter::All;
            model.set_loan_filter(filter);
            let feedback = if listed_all {
                "Listed all loans".to_string()
            } else {
                format!("{} loans listed!", model.filtered_loans().len())
            };
            Ok(CommandResult {
                show_loans: true,
                ..CommandResult::message(feedback)
            })
        }
        Command::ListBikes => Ok(CommandResult {
            show_bikes: true,
            ..CommandResult::message(format!("{} bikes listed!", model.bikes().len()))
        }),
        Command::Summary => {
            let summary = model.summary();
            Ok(CommandResult::message(format!(
                "Loans: {} ongoing, {} returned, {} deleted. Revenue: ${}.{:02}",
                summary.ongoing,
                summary.returned,
                summary.deleted,
                summary.revenue_cents / 100,
                summary.revenue_cents % 100
            )))
        }
        Command::Clear => {
            model.reset_data(&LoanBook::new())?;
            model.commit();
            Ok(CommandResult::message("Loan book has been cleared!"))
        }
        Command::Undo => {
            model.undo()?;
            Ok(CommandResult::message("Undo success!"))
        }
        Command::Redo => {
            model.redo()?;
            Ok(CommandResult::message("Redo success!"))
        }
        Command::Help => Ok(CommandResult::message(HELP_MESSAGE)),
        Command::Exit => Ok(CommandResult {
            exit: true,
            ..CommandResult::message("Exiting loan book as requested ...")
        }),
    }
}
