use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use stride_core::models::{Frequency, Priority};

#[derive(Parser)]
#[command(name = "stride")]
#[command(about = "Offline-first personal productivity from the command line")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Optional path to local database file
    #[arg(long, global = true, value_name = "PATH")]
    pub db_path: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage tasks
    Task {
        #[command(subcommand)]
        command: TaskCommands,
    },
    /// Manage notes
    Note {
        #[command(subcommand)]
        command: NoteCommands,
    },
    /// Manage expenses
    Expense {
        #[command(subcommand)]
        command: ExpenseCommands,
    },
    /// Manage habits
    Habit {
        #[command(subcommand)]
        command: HabitCommands,
    },
    /// Show connectivity and pending-change status
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Replay pending changes against the remote backend now
    Sync,
    /// Configure the CLI profile
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum TaskCommands {
    /// Create a new task
    #[command(alias = "new")]
    Add {
        /// Task title
        title: Vec<String>,
        /// Free-form notes
        #[arg(long)]
        notes: Option<String>,
        /// Due date (YYYY-MM-DD)
        #[arg(long, value_name = "DATE")]
        due: Option<String>,
        /// Task priority
        #[arg(long, value_enum, default_value_t = PriorityArg::Medium)]
        priority: PriorityArg,
    },
    /// List tasks, most recently updated first
    List {
        /// Include completed tasks
        #[arg(long)]
        all: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Mark a task completed
    Done {
        /// Task ID or unique ID prefix
        id: String,
    },
    /// Delete a task
    #[command(alias = "delete")]
    Rm {
        /// Task ID or unique ID prefix
        id: String,
    },
}

#[derive(Subcommand)]
pub enum NoteCommands {
    /// Create a new note
    #[command(alias = "new")]
    Add {
        /// Note title
        title: String,
        /// Note content (title is reused when omitted)
        content: Vec<String>,
    },
    /// List notes, most recently updated first
    List {
        /// Filter notes by #tag name
        #[arg(long)]
        tag: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a note
    #[command(alias = "delete")]
    Rm {
        /// Note ID or unique ID prefix
        id: String,
    },
}

#[derive(Subcommand)]
pub enum ExpenseCommands {
    /// Record a new expense
    #[command(alias = "new")]
    Add {
        /// Amount, e.g. 12.50
        amount: String,
        /// Category, e.g. groceries
        category: String,
        /// Free-form description
        #[arg(long)]
        description: Option<String>,
        /// Day incurred (YYYY-MM-DD, today when omitted)
        #[arg(long, value_name = "DATE")]
        date: Option<String>,
    },
    /// List expenses, most recently updated first
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete an expense
    #[command(alias = "delete")]
    Rm {
        /// Expense ID or unique ID prefix
        id: String,
    },
}

#[derive(Subcommand)]
pub enum HabitCommands {
    /// Create a new habit
    #[command(alias = "new")]
    Add {
        /// Habit name
        name: Vec<String>,
        /// Expected completion frequency
        #[arg(long, value_enum, default_value_t = FrequencyArg::Daily)]
        frequency: FrequencyArg,
    },
    /// List habits with their streaks
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Record a completion for today
    Tick {
        /// Habit ID or unique ID prefix
        id: String,
    },
    /// Delete a habit
    #[command(alias = "delete")]
    Rm {
        /// Habit ID or unique ID prefix
        id: String,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Initialize or update the CLI profile
    Init {
        /// Remote backend base URL
        #[arg(long, value_name = "URL")]
        api_url: Option<String>,
        /// Bearer token for the remote backend
        #[arg(long, value_name = "TOKEN")]
        token: Option<String>,
        /// Owner id to operate as
        #[arg(long, value_name = "ID")]
        owner: Option<String>,
    },
    /// Show the current profile (token redacted)
    Show,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum PriorityArg {
    Low,
    Medium,
    High,
}

impl From<PriorityArg> for Priority {
    fn from(arg: PriorityArg) -> Self {
        match arg {
            PriorityArg::Low => Self::Low,
            PriorityArg::Medium => Self::Medium,
            PriorityArg::High => Self::High,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum FrequencyArg {
    Daily,
    Weekly,
}

impl From<FrequencyArg> for Frequency {
    fn from(arg: FrequencyArg) -> Self {
        match arg {
            FrequencyArg::Daily => Self::Daily,
            FrequencyArg::Weekly => Self::Weekly,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_task_add_with_flags() {
        let cli = Cli::parse_from([
            "stride", "task", "add", "write", "report", "--due", "2026-09-01", "--priority",
            "high",
        ]);
        match cli.command {
            Commands::Task {
                command:
                    TaskCommands::Add {
                        title,
                        due,
                        priority,
                        ..
                    },
            } => {
                assert_eq!(title, vec!["write", "report"]);
                assert_eq!(due.as_deref(), Some("2026-09-01"));
                assert_eq!(priority, PriorityArg::High);
            }
            _ => panic!("parsed into the wrong command"),
        }
    }

    #[test]
    fn parses_global_db_path_after_subcommand() {
        let cli = Cli::parse_from(["stride", "status", "--db-path", "/tmp/s.db"]);
        assert_eq!(cli.db_path.as_deref(), Some(std::path::Path::new("/tmp/s.db")));
    }
}
