use rusty_bike_rental::{
    adapters::json::LoanBookStorage as JsonLoanBookStorage,
    application::loan_book::Model,
    cli::{self, CliError},
    config::Config,
    domain::{LoanBook, LoanBookChanged},
    ports::{LoanBookObserver, LoanBookStorage, StorageError},
};
use std::cell::Cell;
use std::rc::Rc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Marks the loan book as needing a save after any change notification
struct DirtyFlag(Rc<Cell<bool>>);

impl LoanBookObserver for DirtyFlag {
    fn loan_book_changed(&self, event: &LoanBookChanged) {
        tracing::debug!(cause = ?event.cause, "Loan book changed");
        self.0.set(true);
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rusty_bike_rental=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(2);
        }
    };
    tracing::info!(data_file = %config.data_file.display(), "Starting loan book");

    // Initialize adapters
    let storage = JsonLoanBookStorage::new(&config.data_file);
    let loan_book = load_loan_book(&storage).await;

    let dirty = Rc::new(Cell::new(false));
    let mut model = Model::with_history_limit(loan_book, config.history_limit);
    model.subscribe(Box::new(DirtyFlag(Rc::clone(&dirty))));

    println!("Welcome to the bike rental loan book. Type `help` for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                tracing::error!("Failed to read input: {}", e);
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let result = match cli::handle_line(&mut model, &line) {
            Ok(result) => result,
            Err(e) => {
                println!("{}", e.user_message());
                continue;
            }
        };
        for output in cli::render(&model, &result) {
            println!("{output}");
        }

        if dirty.replace(false) {
            if let Err(e) = storage.save_loan_book(model.loan_book()).await {
                println!("{}", CliError::from(e).user_message());
            }
        }

        if result.exit {
            break;
        }
    }

    tracing::info!("Stopping loan book");
}

/// Read the saved loan book, falling back to an empty one
///
/// Loading never repairs data. A file that fails validation stays on disk
/// until the first committed change, which overwrites it with the new book.
async fn load_loan_book(storage: &JsonLoanBookStorage) -> LoanBook {
    match storage.read_loan_book().await {
        Ok(Some(loan_book)) => loan_book,
        Ok(None) => {
            tracing::info!("Data file not found. Starting with an empty loan book");
            LoanBook::new()
        }
        Err(StorageError::DataIntegrity(e)) => {
            tracing::warn!(
                "Data file not in the correct format ({}). Starting with an empty loan book; \
                 the file will be overwritten on the next change",
                e
            );
            LoanBook::new()
        }
        Err(e) => {
            tracing::warn!(
                "Problem while reading from the file ({}). Starting with an empty loan book",
                e
            );
            LoanBook::new()
        }
    }
}
