use std::process::ExitCode;

use apis::icanhazdadjoke::JokeError;
use clap::Parser;
use commands::{Cli, Command};
use utilities::config::Config;
use utilities::logchamp;

mod apis;
mod commands;
mod utilities;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let dotenv = dotenvy::dotenv();
    let cli = Cli::parse();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            println!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    logchamp::init(config.log_level);

    match dotenv {
        Ok(path) => log::debug!("loaded environment from {}", path.display()),
        Err(err) if err.not_found() => (),
        Err(err) => log::warn!("failed to load .env: {err}"),
    }

    let result = match cli.command {
        Command::Random(args) => commands::random::execute(&config, &args).await,
    };

    match result {
        Ok(joke) => {
            println!("{joke}");
            ExitCode::SUCCESS
        }
        Err(JokeError::NoJokesFound) => {
            println!("{}", JokeError::NoJokesFound);
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::debug!("{err:?}");
            println!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
