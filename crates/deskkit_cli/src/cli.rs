use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use deskkit_core::model::todo::{Priority, TodoFilter};
use deskkit_core::ModuleKind;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "deskkit")]
#[command(about = "Local-first notes, todos, projects, pomodoro and assistant chat")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: platform config dir `config.toml`)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding the database and logs
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Keep everything in memory; nothing is written to disk
    #[arg(long, global = true)]
    pub memory: bool,

    /// Override the configured log level (trace|debug|info|warn|error|off)
    #[arg(long, global = true)]
    pub log_level: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage note folders and notes
    Notes {
        #[command(subcommand)]
        cmd: NotesCommands,
    },

    /// Manage todos
    Todo {
        #[command(subcommand)]
        cmd: TodoCommands,
    },

    /// Manage projects and their tasks
    Project {
        #[command(subcommand)]
        cmd: ProjectCommands,
    },

    /// Talk to the simulated assistant
    Chat {
        #[command(subcommand)]
        cmd: ChatCommands,
    },

    /// Pomodoro settings and countdown
    Pomodoro {
        #[command(subcommand)]
        cmd: PomodoroCommands,
    },

    /// Print a module summary
    Show {
        /// notes | todos | ai-chat | pomodoro | projects
        module: ModuleKind,
    },

    /// Write a dated JSON backup of all data
    Export {
        /// Target directory (default: current directory)
        #[arg(long)]
        dir: Option<PathBuf>,

        /// Print the backup to stdout instead of writing a file
        #[arg(long, conflicts_with = "dir")]
        stdout: bool,
    },

    /// Replace all data with a JSON backup
    Import {
        /// Backup file
        file: PathBuf,
    },

    /// Print version information
    Version,
}

#[derive(Subcommand)]
pub enum NotesCommands {
    /// List folders with note counts
    Folders,

    /// Create a folder
    AddFolder { name: String },

    /// Rename a folder
    RenameFolder { folder_id: String, name: String },

    /// Delete a folder and every note in it
    DeleteFolder { folder_id: String },

    /// List notes in a folder
    List { folder_id: String },

    /// Print one note
    Show { folder_id: String, note_id: String },

    /// Add a note to a folder
    Add {
        folder_id: String,
        title: String,

        #[arg(short, long, default_value = "")]
        content: String,
    },

    /// Replace a note's title and content
    Edit {
        folder_id: String,
        note_id: String,

        #[arg(short, long)]
        title: String,

        #[arg(short, long, default_value = "")]
        content: String,
    },

    /// Delete a note
    Delete { folder_id: String, note_id: String },
}

#[derive(Subcommand)]
pub enum TodoCommands {
    /// List todos, pending first then by priority
    List {
        /// all | pending | completed
        #[arg(short, long, default_value = "all")]
        filter: TodoFilter,
    },

    /// Add a todo
    Add {
        title: String,

        /// high | medium | low
        #[arg(short, long, default_value = "medium")]
        priority: Priority,

        /// Due date (YYYY-MM-DD)
        #[arg(short, long)]
        due: Option<NaiveDate>,
    },

    /// Change fields of a todo
    Edit {
        id: String,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(short, long)]
        priority: Option<Priority>,

        #[arg(short, long, conflicts_with = "clear_due")]
        due: Option<NaiveDate>,

        /// Remove the due date
        #[arg(long)]
        clear_due: bool,
    },

    /// Flip a todo between pending and completed
    Toggle { id: String },

    /// Delete a todo
    Delete { id: String },

    /// Print total / pending / completed counts
    Stats,
}

#[derive(Subcommand)]
pub enum ProjectCommands {
    /// List projects with progress
    List,

    /// Print one project with its tasks
    Show { project_id: String },

    /// Create a project
    Add { name: String },

    /// Rename a project
    Rename { project_id: String, name: String },

    /// Delete a project and its tasks
    Delete { project_id: String },

    /// Add a task to a project
    AddTask { project_id: String, title: String },

    /// Retitle a task
    EditTask {
        project_id: String,
        task_id: String,
        title: String,
    },

    /// Flip a task's completion
    ToggleTask { project_id: String, task_id: String },

    /// Delete a task
    DeleteTask { project_id: String, task_id: String },

    /// Print totals across all projects
    Stats,
}

#[derive(Subcommand)]
pub enum ChatCommands {
    /// List sessions
    List,

    /// Start a new session
    New,

    /// Print a session transcript
    Show { session_id: String },

    /// Send a message and wait for the reply
    Send {
        text: String,

        /// Session id (default: latest, created when none exist)
        #[arg(short, long)]
        session: Option<String>,
    },

    /// Delete a session
    Delete { session_id: String },
}

#[derive(Subcommand)]
pub enum PomodoroCommands {
    /// Print durations and today's count
    Status,

    /// Change durations in minutes
    Set {
        #[arg(short, long)]
        work: Option<u32>,

        #[arg(short = 'b', long = "break")]
        break_minutes: Option<u32>,
    },

    /// Run the countdown in the foreground
    Run {
        /// Segments to run back to back (work, break, work, ...)
        #[arg(short, long, default_value_t = 1)]
        segments: u32,
    },
}
