use clap::{Parser, Subcommand};

pub mod random;

#[derive(Parser)]
#[command(name = "dadjoke", version, about = "Get dad jokes from icanhazdadjoke.com")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Get a random dad joke
    Random(random::Args),
}
