use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use financecore::{app::App, cli::Cli, config, error::AppError};

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("financecore={level},engine={level}")));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let settings = match config::load(&cli.config) {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("{}", err.notification());
            return ExitCode::FAILURE;
        }
    };
    init_tracing(&settings.level);

    let result: Result<(), AppError> = async {
        let mut app = App::new(settings, cli.color)?;
        app.run(cli.command).await
    }
    .await;

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, kind = ?err.kind(), "command failed");
            eprintln!("{}", err.notification());
            ExitCode::FAILURE
        }
    }
}
