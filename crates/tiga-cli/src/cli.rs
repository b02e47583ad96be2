use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "tiga")]
#[command(about = "Tasks and notes from the command line")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Quick add: tiga "buy milk"
    #[arg(trailing_var_arg = true)]
    pub title: Vec<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new todo
    #[command(alias = "new")]
    Add {
        /// Todo title
        title: Vec<String>,
        /// Due date (YYYY-MM-DD or RFC 3339)
        #[arg(long, value_name = "DATE")]
        due: Option<String>,
        /// Folder id to file the todo under
        #[arg(long, value_name = "ID")]
        folder: Option<i64>,
        /// Create a document instead of a task
        #[arg(long)]
        doc: bool,
        /// Markdown body for documents
        #[arg(long, value_name = "TEXT")]
        content: Option<String>,
    },
    /// List todos, newest first
    List {
        /// Number of rows to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
        /// Show documents instead of tasks
        #[arg(long)]
        docs: bool,
        /// Show checkbox tasks extracted from documents
        #[arg(long)]
        doc_tasks: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Mark a task as completed
    Done {
        /// Todo id
        id: i64,
    },
    /// Reopen a completed task
    Reopen {
        /// Todo id
        id: i64,
    },
    /// Check a checkbox line inside a document
    Check {
        /// Document id
        id: i64,
        /// Zero-based line number of the checkbox
        line: usize,
    },
    /// Uncheck a checkbox line inside a document
    Uncheck {
        /// Document id
        id: i64,
        /// Zero-based line number of the checkbox
        line: usize,
    },
    /// Edit a todo's title or content
    Edit {
        /// Todo id
        id: i64,
        /// New title
        #[arg(long, value_name = "TEXT")]
        title: Option<String>,
        /// New markdown body ($EDITOR opens when omitted for documents)
        #[arg(long, value_name = "TEXT")]
        content: Option<String>,
    },
    /// Set or clear a due date
    Due {
        /// Todo id
        id: i64,
        /// Due date (YYYY-MM-DD or RFC 3339)
        #[arg(value_name = "DATE")]
        date: Option<String>,
        /// Clear the due date and reminder
        #[arg(long, conflicts_with = "date")]
        clear: bool,
    },
    /// Delete a todo
    Delete {
        /// Todo id
        id: i64,
    },
    /// Manage folders
    Folder {
        #[command(subcommand)]
        command: FolderCommands,
    },
    /// Show the activity timeline
    Timeline {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Export all todos as JSON
    Export {
        /// Optional output path (tiga-export-<date>.json when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Upload a profile avatar image
    Avatar {
        /// Image file (png, jpg, jpeg, webp, or gif)
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Create an account
    Register {
        /// Display name
        #[arg(long, value_name = "NAME")]
        nickname: String,
        /// Account email
        #[arg(long, value_name = "EMAIL")]
        email: String,
        /// Account password
        #[arg(long, value_name = "PASSWORD")]
        password: String,
    },
    /// Manage the signed-in session
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum FolderCommands {
    /// List folders
    List {
        /// Show document folders instead of task folders
        #[arg(long)]
        docs: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Create a folder
    Add {
        /// Folder name
        name: String,
        /// Folder color
        #[arg(long, default_value = "blue", value_name = "COLOR")]
        color: String,
        /// Create a document folder instead of a task folder
        #[arg(long)]
        docs: bool,
    },
    /// Delete a folder
    Delete {
        /// Folder id
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum AuthCommands {
    /// Sign in with email and password, storing the session in the keychain
    Login {
        /// Account email
        #[arg(long, value_name = "EMAIL")]
        email: String,
        /// Account password
        #[arg(long, value_name = "PASSWORD")]
        password: String,
    },
    /// Print the browser URL for an OAuth sign-in
    Oauth {
        /// OAuth provider
        #[arg(value_enum)]
        provider: OauthProviderArg,
        /// Redirect URL the backend sends the session to
        #[arg(long, default_value = "tiga://auth/callback", value_name = "URL")]
        redirect: String,
    },
    /// Show session status
    Status,
    /// Sign out and clear the stored session
    Logout,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum OauthProviderArg {
    Google,
    Github,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}
