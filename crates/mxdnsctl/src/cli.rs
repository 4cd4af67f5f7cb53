//! Command-line arguments

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "mxdnsctl")]
#[command(version)]
#[command(
    about = "Manage Local DNS profiles, records and network assignments on MX appliances",
    long_about = None
)]
pub struct Cli {
    /// Organization ID or name (defaults to the first accessible organization)
    #[arg(short, long, global = true)]
    pub org: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List accessible organizations
    Orgs,

    /// List networks of the organization
    Networks,

    /// Manage Local DNS profiles
    Profiles {
        #[command(subcommand)]
        action: ProfileCommands,
    },

    /// Manage hostname-to-address records
    Records {
        #[command(subcommand)]
        action: RecordCommands,
    },

    /// Manage profile-to-network assignments
    Assignments {
        #[command(subcommand)]
        action: AssignmentCommands,
    },

    /// Show configuration (API key redacted)
    Config,
}

#[derive(Subcommand)]
pub enum ProfileCommands {
    /// List profiles
    List,

    /// Create a profile
    Create {
        /// Profile name
        name: String,
    },

    /// Delete a profile
    Delete {
        /// Profile ID
        profile_id: String,
    },
}

#[derive(Subcommand)]
pub enum RecordCommands {
    /// List records with their profile names
    List,

    /// Create a record inside a profile
    Create {
        /// Profile ID the record belongs to
        #[arg(short, long)]
        profile: String,

        /// Hostname
        hostname: String,

        /// Address the hostname resolves to
        address: String,
    },

    /// Delete a record
    Delete {
        /// Record ID
        record_id: String,
    },
}

#[derive(Subcommand)]
pub enum AssignmentCommands {
    /// List assignments with network and profile names
    List,

    /// Assign a profile to a network
    Create {
        /// Network ID
        #[arg(short, long)]
        network: String,

        /// Profile ID
        #[arg(short, long)]
        profile: String,
    },

    /// Remove an assignment
    Delete {
        /// Assignment ID
        assignment_id: String,
    },
}
