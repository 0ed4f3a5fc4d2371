use clap::{Args, Subcommand};

/// Authentication commands.
#[derive(Clone, Debug, Subcommand)]
pub enum AuthCommands {
    /// Sign in with a display name (prompts when none is given or configured).
    Login(AuthLoginArgs),
    /// Sign out and clear the stored session.
    Logout,
    /// Show the signed-in identity.
    Status,
}

#[derive(Clone, Debug, Args)]
pub struct AuthLoginArgs {
    /// Display name shown on the board.
    #[arg(long)]
    pub name: Option<String>,
    /// Avatar image URL.
    #[arg(long)]
    pub photo_url: Option<String>,
}
