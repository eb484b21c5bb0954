use std::path::PathBuf;

use clap::Subcommand;

#[derive(Subcommand)]
pub enum AdminCommands {
    /// Create the schema and the back-office account
    Init {
        /// Email address of the admin account
        #[arg(long)]
        email: Option<String>,

        /// Password of the admin account
        #[arg(long)]
        password: Option<String>,

        /// Path to a TOML configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Skip interactive prompts
        #[arg(long)]
        non_interactive: bool,
    },

    /// Replace the admin password
    SetPassword {
        /// New password; prompted for when omitted
        #[arg(long)]
        password: Option<String>,

        /// Path to a TOML configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },
}
