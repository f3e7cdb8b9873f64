use clap::{Args, Parser, Subcommand};

use cryptnote_core::VERSION;

/// cryptnote - an encrypted note vault behind one master password
#[derive(Parser)]
#[command(name = "cryptnote")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Vault directory
    #[arg(short, long, global = true, env = "CRYPTNOTE_VAULT")]
    pub vault: Option<String>,

    #[command(subcommand)]
    pub command: Commands,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Set the master password of a new vault
    Init,

    /// List entries, newest first
    List(ListArgs),

    /// Decrypt and print one entry
    Show(ShowArgs),

    /// Write a new entry
    Add(AddArgs),

    /// Rewrite or append to an existing entry
    Edit(EditArgs),

    /// Copy an encrypted entry file into the vault
    Import(ImportArgs),

    /// Change the master password and re-encrypt every entry
    Passwd,
}

/// Arguments for the `list` command
#[derive(Args)]
pub struct ListArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `show` command
#[derive(Args)]
pub struct ShowArgs {
    /// Entry ID (file name without extension)
    #[arg(value_name = "ID")]
    pub id: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `add` command
#[derive(Args)]
pub struct AddArgs {
    /// Entry title
    #[arg(short, long)]
    pub title: Option<String>,

    /// Entry body (overrides stdin)
    #[arg(long)]
    pub body: Option<String>,
}

/// Arguments for the `edit` command
#[derive(Args)]
pub struct EditArgs {
    /// Entry ID (file name without extension)
    #[arg(value_name = "ID")]
    pub id: String,

    /// New title (keeps the current title when omitted)
    #[arg(short, long)]
    pub title: Option<String>,

    /// Append after the existing content instead of rewriting it
    #[arg(long)]
    pub append: bool,

    /// New or appended body (overrides stdin)
    #[arg(long)]
    pub body: Option<String>,
}

/// Arguments for the `import` command
#[derive(Args)]
pub struct ImportArgs {
    /// Path to an entry file sealed under this vault's password
    #[arg(value_name = "PATH")]
    pub path: String,
}
