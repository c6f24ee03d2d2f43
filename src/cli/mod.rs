pub mod display;
pub mod error;
pub mod parser;

pub use error::CliError;
pub use parser::{ParseError, parse_command};

use crate::application::loan_book::{CommandResult, Model, execute};

/// 入力1行を解析して実行する
pub fn handle_line(model: &mut Model, line: &str) -> Result<CommandResult, CliError> {
    let command = parse_command(line)?;
    tracing::debug!(?command, "Parsed command");
    Ok(execute(model, command)?)
}

/// 実行結果を表示用の行に組み立てる
///
/// 一覧を表示するコマンドでは、メッセージの後に現在の絞り込み結果を続ける。
pub fn render(model: &Model, result: &CommandResult) -> Vec<String> {
    let mut lines = vec![result.feedback.clone()];
    if result.show_loans {
        lines.extend(model.filtered_loans().into_iter().map(display::format_loan));
    }
    if result.show_bikes {
        lines.extend(model.bikes().iter().map(display::format_bike));
    }
    lines
}
