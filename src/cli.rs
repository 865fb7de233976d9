use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "keyreg", about = "Sign up for an API key with a disposable mailbox")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Provision a mailbox, submit the signup form and wait for the key
    Run,
    /// Submit the signup form for an existing address
    Submit {
        /// Address to register
        #[arg(short, long)]
        email: String,
    },
    /// Provision a mailbox, print its address and wait for the key
    Mailbox,
    /// Log in to an existing mailbox and wait for the key
    Poll {
        /// Mailbox address
        #[arg(short, long)]
        address: String,

        /// Mailbox password (defaults to the configured one)
        #[arg(short, long)]
        password: Option<String>,
    },
}
