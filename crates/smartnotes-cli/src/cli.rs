use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "smartnotes")]
#[command(about = "Capture notes with AI summaries from the command line")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// CLI profile name (backend URL and stored session)
    #[arg(long, global = true, value_name = "NAME")]
    pub profile: Option<String>,

    /// Quick capture: smartnotes "my thought here"
    #[arg(trailing_var_arg = true)]
    pub note: Vec<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new note
    #[command(alias = "new")]
    Add {
        /// Note title (defaults to the first line of the content)
        #[arg(short, long)]
        title: Option<String>,
        /// Comma-separated tags
        #[arg(long, value_delimiter = ',')]
        tags: Vec<String>,
        /// Pin the note on creation
        #[arg(long)]
        pin: bool,
        /// Skip AI summary and tag generation
        #[arg(long)]
        no_ai: bool,
        /// Note content
        content: Vec<String>,
    },
    /// List notes
    List {
        /// Server-side search over title and content
        #[arg(short, long)]
        search: Option<String>,
        /// Include archived notes
        #[arg(long)]
        archived: bool,
        /// Local filter over title, content and summary
        #[arg(short, long, value_name = "TEXT")]
        filter: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show a single note
    Show {
        /// Note ID
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Edit an existing note (opens $EDITOR when no field is given)
    Edit {
        /// Note ID
        id: String,
        /// New title
        #[arg(short, long)]
        title: Option<String>,
        /// New content
        #[arg(short, long)]
        content: Option<String>,
        /// Replace tags (comma-separated)
        #[arg(long, value_delimiter = ',')]
        tags: Option<Vec<String>>,
    },
    /// Pin a note
    Pin {
        /// Note ID
        id: String,
    },
    /// Unpin a note
    Unpin {
        /// Note ID
        id: String,
    },
    /// Archive a note
    Archive {
        /// Note ID
        id: String,
    },
    /// Restore an archived note
    Unarchive {
        /// Note ID
        id: String,
    },
    /// Delete a note
    Delete {
        /// Note ID
        id: String,
    },
    /// Recompute the AI summary and tags of a note
    Regenerate {
        /// Note ID
        id: String,
    },
    /// List every tag in use
    Tags {
        /// Include tags from archived notes
        #[arg(long)]
        archived: bool,
    },
    /// Configure CLI profiles
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Sign in, sign up or inspect the stored session
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Initialize or update profile config
    Init {
        /// Backend API base URL (e.g. <https://notes.example.com/api>)
        #[arg(long, value_name = "URL")]
        api_base_url: Option<String>,
        /// Keep current active profile instead of activating this one
        #[arg(long)]
        no_activate: bool,
    },
    /// Print the resolved profile configuration
    Show,
}

#[derive(Subcommand)]
pub enum AuthCommands {
    /// Login with username/password and store the token in the keychain
    Login {
        /// Account username
        #[arg(long, value_name = "USERNAME")]
        username: String,
        /// Account password
        #[arg(long, value_name = "PASSWORD")]
        password: String,
    },
    /// Create an account and sign in
    Signup {
        /// Account email
        #[arg(long, value_name = "EMAIL")]
        email: String,
        /// Account username
        #[arg(long, value_name = "USERNAME")]
        username: String,
        /// Optional display name
        #[arg(long, value_name = "NAME")]
        full_name: Option<String>,
        /// Account password
        #[arg(long, value_name = "PASSWORD")]
        password: String,
    },
    /// Show auth status for profile
    Status,
    /// Logout profile and clear stored token
    Logout,
}
