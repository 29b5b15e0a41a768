use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};

use gitpanel::Panel;
use gitpanel::config::Settings;
use gitpanel::panel::StatusLists;

#[derive(Parser)]
#[command(name = "gitpanel")]
#[command(about = "Staging panel for git: status, staging, branches and tags", long_about = None)]
#[command(version)]
struct Cli {
    /// Repository directory (defaults to the last-used one)
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Settings file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show staged, unstaged and unmerged files
    Status,
    /// Refresh the status periodically at the configured interval
    Watch {
        /// Override the interval in seconds
        #[arg(long)]
        interval: Option<u32>,
    },
    /// List branches (current one marked)
    Branches,
    /// List tags
    Tags,
    /// List remotes
    Remotes,
    /// Commit staged changes
    Commit {
        /// Commit message; a default is used when empty
        #[arg(short, long, default_value = "")]
        message: String,
        /// Amend the previous commit
        #[arg(long)]
        amend: bool,
    },
    /// Stage files (everything when none given)
    Add { paths: Vec<String> },
    /// Unstage files (everything when none given)
    Reset { paths: Vec<String> },
    /// Discard working-tree changes to the given files
    Checkout {
        #[arg(required = true)]
        paths: Vec<String>,
    },
    /// Branch management
    Branch {
        #[command(subcommand)]
        command: BranchCommand,
    },
    /// Tag management
    Tag {
        #[command(subcommand)]
        command: TagCommand,
    },
    /// Stash the working tree, or pop the last stash
    Stash {
        #[command(subcommand)]
        command: Option<StashCommand>,
    },
    /// Push a branch to a remote
    Push { remote: String, branch: String },
    /// Fetch from a remote
    Fetch { remote: String },
    /// Merge a branch into the current one
    Merge { branch: String },
    /// Rebase the current branch
    Rebase,
    /// Switch to a branch
    Switch { branch: String },
    /// Run an arbitrary git command, then refresh
    Run { line: String },
}

#[derive(Subcommand)]
enum BranchCommand {
    /// Create a branch
    Create { name: String },
    /// Rename a branch
    Rename { from: String, to: String },
    /// Copy a branch
    Copy { from: String, to: String },
    /// Delete a branch
    Delete { name: String },
}

#[derive(Subcommand)]
enum TagCommand {
    /// Create a tag at HEAD
    Create { name: String },
    /// Delete a tag
    Delete { name: String },
    /// Push all tags to a remote
    Push { remote: String },
}

#[derive(Subcommand)]
enum StashCommand {
    /// Stash the working tree (default)
    Save,
    /// Pop the most recent stash
    Pop,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.clone().unwrap_or_else(Settings::default_path);
    let mut settings = Settings::load(&config_path)?;

    let dir = cli.dir.clone().unwrap_or_else(|| settings.repo_dir.clone());
    let mut panel = Panel::open(&dir);
    if !panel.is_repository() {
        anyhow::bail!("{} is not a git repository", dir.display());
    }

    match cli.command {
        Commands::Status => {
            panel.refresh_all()?;
            print_status(&panel);
        }
        Commands::Watch { interval } => {
            let secs = interval.unwrap_or(settings.refresh_secs).max(1);
            watch(&mut panel, secs)?;
        }
        Commands::Branches => {
            panel.refresh_branches()?;
            for branch in &panel.branches {
                let marker = if Some(branch) == panel.current_branch.as_ref() {
                    "* "
                } else {
                    "  "
                };
                println!("{marker}{branch}");
            }
        }
        Commands::Tags => {
            panel.refresh_tags()?;
            for tag in &panel.tags {
                println!("{tag}");
            }
        }
        Commands::Remotes => {
            panel.refresh_remotes()?;
            for remote in &panel.remotes {
                println!("{remote}");
            }
        }
        Commands::Commit { message, amend } => {
            panel.amend = amend;
            let message = if amend && message.trim().is_empty() {
                // Amending without a message keeps the previous subject.
                panel.last_commit_subject()?
            } else {
                message
            };
            panel.refresh_status()?;
            if !panel.commit_available() {
                anyhow::bail!("nothing staged; commit is unavailable");
            }
            panel.commit(&message)?;
        }
        Commands::Add { paths } => panel.add(&paths)?,
        Commands::Reset { paths } => panel.reset(&paths)?,
        Commands::Checkout { paths } => panel.checkout_paths(&paths)?,
        Commands::Branch { command } => match command {
            BranchCommand::Create { name } => panel.create_branch(&name)?,
            BranchCommand::Rename { from, to } => panel.rename_branch(&from, &to)?,
            BranchCommand::Copy { from, to } => panel.copy_branch(&from, &to)?,
            BranchCommand::Delete { name } => panel.delete_branch(&name)?,
        },
        Commands::Tag { command } => match command {
            TagCommand::Create { name } => panel.create_tag(&name)?,
            TagCommand::Delete { name } => panel.delete_tag(&name)?,
            TagCommand::Push { remote } => panel.push_tags(&remote)?,
        },
        Commands::Stash { command } => match command.unwrap_or(StashCommand::Save) {
            StashCommand::Save => panel.stash()?,
            StashCommand::Pop => panel.stash_pop()?,
        },
        Commands::Push { remote, branch } => panel.push(&remote, &branch)?,
        Commands::Fetch { remote } => panel.fetch(&remote)?,
        Commands::Merge { branch } => panel.merge(&branch)?,
        Commands::Rebase => panel.rebase()?,
        Commands::Switch { branch } => panel.switch(&branch)?,
        Commands::Run { line } => panel.run_custom(&line)?,
    }

    // Remember the directory that was used for next time.
    settings.repo_dir = dir;
    settings.save(&config_path)?;
    Ok(())
}

/// Periodic refresh loop, the CLI rendition of the auto-refresh timer.
/// Single-threaded and blocking: a tick that would fire while a command is
/// still running simply does not happen.
fn watch(panel: &mut Panel, secs: u32) -> Result<()> {
    let mut last: Option<StatusLists> = None;
    loop {
        match panel.refresh_status() {
            Ok(()) => {
                if last.as_ref() != Some(&panel.lists) {
                    print_status(panel);
                    last = Some(panel.lists.clone());
                }
            }
            // Keep ticking; one failed refresh skips the update only.
            Err(e) => log::warn!("status refresh failed: {e:#}"),
        }
        std::thread::sleep(Duration::from_secs(secs.into()));
    }
}

fn print_status(panel: &Panel) {
    if let Some(branch) = &panel.current_branch {
        println!("On branch {branch}");
    }

    println!("Staged:");
    for entry in panel.lists.staged.iter() {
        println!("  {}", entry.label);
    }
    println!("Unstaged:");
    for entry in panel.lists.unstaged.iter() {
        println!("  {}", entry.label);
    }
    if !panel.lists.unmerged.is_empty() {
        println!("Unmerged (resolve manually):");
        for path in &panel.lists.unmerged {
            println!("  {path}");
        }
    }
    if !panel.commit_available() {
        println!("(nothing staged; commit unavailable)");
    }
}
