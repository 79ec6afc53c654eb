use std::io::{self, Write};
use std::path::PathBuf;

use colored::Colorize;
use mvc_sdk::{DiffHunk, DiffOp, FileOutcome, Repository, SdkError, StageOutcome, StatusReport};

use crate::cli::*;
use crate::prompt::Prompt;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let root = match cli.directory {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    match cli.command {
        Command::Init(_) => cmd_init(root),
        Command::Add(args) => cmd_add(root, args),
        Command::Commit(args) => cmd_commit(root, args),
        Command::Log(_) => cmd_log(root),
        Command::Checkout(args) => cmd_checkout(root, args),
        Command::Status(_) => cmd_status(root),
    }
}

/// Print a failed command's error for the user.
pub fn report_error(err: &anyhow::Error) {
    match err.downcast_ref::<SdkError>() {
        Some(SdkError::EmptyCommit) => {
            eprintln!("{}", "Nothing to commit. Staging area is empty.".yellow())
        }
        Some(SdkError::NotARepository { .. }) => eprintln!(
            "{} {}",
            "✗ Not an mvc repository.".red(),
            "Run 'mvc init' first.".dimmed()
        ),
        _ => eprintln!("{} {err:#}", "✗".red().bold()),
    }
}

fn cmd_init(root: PathBuf) -> anyhow::Result<()> {
    match Repository::init(&root) {
        Ok(_) => {
            println!(
                "{} Initialized empty repository in {}",
                "✓".green().bold(),
                root.display().to_string().bold()
            );
            Ok(())
        }
        Err(SdkError::AlreadyInitialized { .. }) => {
            println!("{}", "Repository already initialized.".yellow());
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

fn cmd_add(root: PathBuf, args: AddArgs) -> anyhow::Result<()> {
    let repo = Repository::open(root)?;
    let (path, outcome) = repo.add(&args.file)?;
    match outcome {
        StageOutcome::Unchanged => println!("{} already staged, unchanged", path.to_string().dimmed()),
        _ => println!("{} Added {} to staging area", "✓".green().bold(), path),
    }
    Ok(())
}

fn cmd_commit(root: PathBuf, args: CommitArgs) -> anyhow::Result<()> {
    let repo = Repository::open(root)?;
    let summary = repo.commit(&args.message)?;
    println!(
        "{} Committed as {} - \"{}\"",
        "✓".green().bold(),
        repo.short_id(&summary.commit.id()).yellow(),
        summary.commit.message()
    );
    Ok(())
}

fn cmd_log(root: PathBuf) -> anyhow::Result<()> {
    let repo = Repository::open(root)?;
    let commits = repo.log()?;
    if commits.is_empty() {
        println!("{}", "No commits found.".yellow());
        return Ok(());
    }

    let head = repo.head()?;
    println!("{}\n", "Commit History:".blue().bold());
    for commit in &commits {
        let marker = if Some(commit.id()) == head { " (HEAD)" } else { "" };
        println!(
            "{}{}",
            format!("Commit: {}", repo.short_id(&commit.id())).green(),
            marker.cyan()
        );
        println!("Message: {}", commit.message());
        println!("Date:    {}", commit.timestamp().format("%Y-%m-%dT%H:%M:%S%.3fZ"));
        println!("{}", "---------------------------".dimmed());
    }
    Ok(())
}

fn cmd_checkout(root: PathBuf, args: CheckoutArgs) -> anyhow::Result<()> {
    let repo = Repository::open(root)?;
    let mut prompt = Prompt::stdio();
    let report = repo.checkout(&args.commit, &mut prompt)?;

    for (path, outcome) in &report.files {
        match outcome {
            FileOutcome::Restored | FileOutcome::Overwritten => {
                println!("{} Restored {}", "✓".green(), path)
            }
            FileOutcome::Declined => println!("{} Skipped {}", "-".yellow(), path),
            FileOutcome::Unchanged => println!("  {} {}", "Unchanged".dimmed(), path),
        }
    }
    let skipped = report.with_outcome(FileOutcome::Declined);
    if !skipped.is_empty() {
        println!(
            "\n{} {} file(s) kept local changes, {} written",
            "!".yellow().bold(),
            skipped.len(),
            report.written()
        );
    }
    println!(
        "\n{} Checked out to commit {}",
        "✓".green().bold(),
        repo.short_id(&report.commit.id()).yellow()
    );
    Ok(())
}

fn cmd_status(root: PathBuf) -> anyhow::Result<()> {
    let repo = Repository::open(root)?;
    let status = repo.status()?;
    render_status(&mut io::stdout().lock(), &repo, &status)?;
    Ok(())
}

/// Write a status report: one line per changed file, with the diff under
/// each modified one.
fn render_status(out: &mut impl Write, repo: &Repository, status: &StatusReport) -> io::Result<()> {
    match &status.head {
        Some(id) => writeln!(out, "On commit {}\n", repo.short_id(id).yellow().bold())?,
        None => writeln!(out, "No commits yet\n")?,
    }

    if status.staged.is_empty() {
        writeln!(out, "{}", "No files staged for commit.".dimmed())?;
    } else {
        writeln!(out, "{}", "Staged for commit:".green())?;
        for path in &status.staged {
            writeln!(out, "  - {path}")?;
        }
    }

    if !status.is_clean() {
        writeln!(out)?;
    }
    for change in &status.changes {
        writeln!(out, "{}", format!("Modified: {}", change.path).yellow())?;
        render_hunks(out, &change.hunks)?;
    }
    for path in &status.reconciliation.deleted {
        writeln!(out, "{}", format!("Deleted: {path}").red())?;
    }
    for path in status.untracked() {
        writeln!(out, "{}", format!("Untracked: {path}").cyan())?;
    }

    if status.is_clean() {
        writeln!(out, "\n{}", "Working directory clean".green())?;
    }
    Ok(())
}

fn render_hunks(out: &mut impl Write, hunks: &[DiffHunk]) -> io::Result<()> {
    for hunk in hunks {
        writeln!(
            out,
            "  {}",
            format!(
                "@@ -{},{} +{},{} @@",
                hunk.old_start, hunk.old_count, hunk.new_start, hunk.new_count
            )
            .cyan()
        )?;
        for line in &hunk.lines {
            match line {
                DiffOp::Equal(text) => writeln!(out, "   {text}")?,
                DiffOp::Removed(text) => writeln!(out, "  {}", format!("-{text}").red())?,
                DiffOp::Added(text) => writeln!(out, "  {}", format!("+{text}").green())?,
            }
        }
    }
    Ok(())
}
