use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "mvc", about = "mvc: minimal local version control", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Show debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Run as if started in <DIR>
    #[arg(short = 'C', value_name = "DIR", global = true)]
    pub directory: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Initialize a new repository
    Init(InitArgs),
    /// Add a file to the staging area
    Add(AddArgs),
    /// Commit staged changes with a message
    Commit(CommitArgs),
    /// Show commit history
    Log(LogArgs),
    /// Restore files from a commit
    Checkout(CheckoutArgs),
    /// Show the status of the working directory
    Status(StatusArgs),
}

#[derive(Args)]
pub struct InitArgs {}

#[derive(Args)]
pub struct AddArgs {
    pub file: String,
}

#[derive(Args)]
pub struct CommitArgs {
    #[arg(short, long)]
    pub message: String,
}

#[derive(Args)]
pub struct LogArgs {}

#[derive(Args)]
pub struct CheckoutArgs {
    /// Commit id or unique id prefix
    pub commit: String,
}

#[derive(Args)]
pub struct StatusArgs {}
