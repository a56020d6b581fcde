use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "contact-form")]
#[command(about = "Contact form endpoint: validates submissions and relays them by email")]
pub struct CliConfig {
    #[command(subcommand)]
    pub command: Command,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Subcommand)]
pub enum Command {
    /// Start the HTTP endpoint
    Serve {
        #[arg(long, default_value = "contact-form.toml")]
        config: String,

        /// Overrides server.bind from the configuration file
        #[arg(long)]
        bind: Option<String>,
    },
    /// Load and validate a configuration file, then exit
    CheckConfig {
        #[arg(long, default_value = "contact-form.toml")]
        config: String,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "contact-submit")]
#[command(about = "Submit the contact form from the command line")]
pub struct SubmitArgs {
    #[arg(long, default_value = "http://127.0.0.1:8080/contact")]
    pub endpoint: String,

    #[arg(long, default_value = "")]
    pub name: String,

    #[arg(long, default_value = "")]
    pub email: String,

    #[arg(long, default_value = "")]
    pub phone: String,

    #[arg(long, default_value = "")]
    pub message: String,

    #[arg(long, default_value = "en", value_parser = ["en", "bg"])]
    pub locale: String,

    #[arg(long, default_value = "30", help = "Request timeout in seconds")]
    pub timeout: u64,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}
