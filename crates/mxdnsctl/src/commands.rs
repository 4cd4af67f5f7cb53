//! Subcommand handlers
//!
//! Each handler makes the manager calls for one command and prints the
//! result. Lists use the strict manager forms so a failed load is reported
//! instead of printed as an empty table.

use anyhow::{Context, Result, anyhow};
use mxdns_core::lookup::{self, AssignmentRow, RecordRow};
use mxdns_core::{
    DnsManager, ManagerConfig, Mutation, Network, Organization, Profile, TransportRegistry,
};
use serde::Serialize;
use serde_json::json;

use crate::cli::{AssignmentCommands, Cli, Commands, OutputFormat, ProfileCommands, RecordCommands};
use crate::render::table;
use crate::{Config, CtlExitCode};

/// Build the manager and run one command
pub async fn run(cli: Cli, config: &ManagerConfig) -> Result<CtlExitCode> {
    let registry = TransportRegistry::new();

    #[cfg(feature = "dashboard")]
    mxdns_transport_dashboard::register(&registry);

    let transport = registry
        .create_transport(&config.transport)
        .context("Failed to create transport")?;
    let manager = DnsManager::new(transport, config)?;
    let format = cli.format;

    if let Commands::Orgs = cli.command {
        let organizations = manager
            .try_organizations()
            .await
            .context("Failed to load organizations")?;
        print_organizations(&organizations, format)?;
        return Ok(CtlExitCode::Success);
    }

    let organization = resolve_organization(&manager, cli.org.as_deref()).await?;
    let org_id = organization.id.as_str();
    tracing::debug!(org_id, name = %organization.name, "Organization selected");

    match cli.command {
        Commands::Networks => {
            let networks = manager
                .try_networks(org_id)
                .await
                .context("Failed to load networks")?;
            print_networks(&networks, format)?;
            Ok(CtlExitCode::Success)
        }
        Commands::Profiles { action } => profiles(&manager, org_id, action, format).await,
        Commands::Records { action } => records(&manager, org_id, action, format).await,
        Commands::Assignments { action } => assignments(&manager, org_id, action, format).await,
        Commands::Orgs | Commands::Config => Ok(CtlExitCode::Success),
    }
}

/// Pick the organization named by `--org`, or the first one
///
/// The selector matches an id first, then an organization name.
async fn resolve_organization(
    manager: &DnsManager,
    selector: Option<&str>,
) -> Result<Organization> {
    let mut organizations = manager
        .try_organizations()
        .await
        .context("Failed to load organizations")?;

    let Some(selector) = selector else {
        return organizations
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("No organizations found for this API key"));
    };

    if let Some(index) = organizations.iter().position(|o| o.id == selector) {
        return Ok(organizations.swap_remove(index));
    }

    let by_name = lookup::selection_map(&organizations, |o| o.name.clone(), |o| o.id.as_str());
    let id = by_name
        .get(selector)
        .ok_or_else(|| anyhow!("Organization '{}' not found", selector))?;

    organizations
        .iter()
        .find(|o| &o.id == id)
        .cloned()
        .ok_or_else(|| anyhow!("Organization '{}' not found", selector))
}

async fn profiles(
    manager: &DnsManager,
    org_id: &str,
    action: ProfileCommands,
    format: OutputFormat,
) -> Result<CtlExitCode> {
    match action {
        ProfileCommands::List => {
            let profiles = manager
                .fetch_profiles(org_id)
                .await
                .context("Failed to load profiles")?;
            print_profiles(&profiles, format)?;
            Ok(CtlExitCode::Success)
        }
        ProfileCommands::Create { name } => {
            if name.trim().is_empty() {
                return Ok(input_error("Please enter a profile name."));
            }
            let result = manager.create_profile(org_id, name.trim()).await;
            report(result, format, |p| {
                let label = lookup::labelled(&p.name, Some(p.profile_id.as_str()));
                format!("Created profile {}", label)
            })
        }
        ProfileCommands::Delete { profile_id } => {
            let result = manager.delete_profile(org_id, &profile_id).await;
            report(result, format, |_| format!("Deleted profile {}", profile_id))
        }
    }
}

async fn records(
    manager: &DnsManager,
    org_id: &str,
    action: RecordCommands,
    format: OutputFormat,
) -> Result<CtlExitCode> {
    match action {
        RecordCommands::List => {
            let rows = manager
                .try_record_view(org_id)
                .await
                .context("Failed to load DNS records")?;
            print_records(&rows, format)?;
            Ok(CtlExitCode::Success)
        }
        RecordCommands::Create {
            profile,
            hostname,
            address,
        } => {
            if [&profile, &hostname, &address]
                .iter()
                .any(|field| field.trim().is_empty())
            {
                return Ok(input_error("Please fill in all fields."));
            }
            let result = manager
                .create_dns_record(org_id, profile.trim(), hostname.trim(), address.trim())
                .await;
            report(result, format, |r| {
                format!("Created record {} -> {} ({})", r.hostname, r.address, r.record_id)
            })
        }
        RecordCommands::Delete { record_id } => {
            let result = manager.delete_dns_record(org_id, &record_id).await;
            report(result, format, |_| format!("Deleted record {}", record_id))
        }
    }
}

async fn assignments(
    manager: &DnsManager,
    org_id: &str,
    action: AssignmentCommands,
    format: OutputFormat,
) -> Result<CtlExitCode> {
    match action {
        AssignmentCommands::List => {
            let rows = manager
                .try_assignment_view(org_id)
                .await
                .context("Failed to load assignments")?;
            print_assignments(&rows, format)?;
            Ok(CtlExitCode::Success)
        }
        AssignmentCommands::Create { network, profile } => {
            if network.trim().is_empty() || profile.trim().is_empty() {
                return Ok(input_error("Please select a network and a profile."));
            }
            let result = manager
                .assign_profile(org_id, network.trim(), profile.trim())
                .await;
            report(result, format, |created| {
                let ids: Vec<&str> = created.iter().map(|a| a.assignment_id.as_str()).collect();
                if ids.is_empty() {
                    format!("Assigned profile {} to network {}", profile, network)
                } else {
                    format!(
                        "Assigned profile {} to network {} ({})",
                        profile,
                        network,
                        ids.join(", ")
                    )
                }
            })
        }
        AssignmentCommands::Delete { assignment_id } => {
            let result = manager.remove_assignment(org_id, &assignment_id).await;
            report(result, format, |_| format!("Removed assignment {}", assignment_id))
        }
    }
}

/// Print the configuration without contacting the API
pub fn show_config(config: &Config, format: OutputFormat) -> Result<()> {
    let key_status = match config.api_key_source {
        Some(source) => format!("set ({})", source),
        None => "missing".to_string(),
    };
    let mode = if config.dry_run { "dry-run" } else { "live" };

    match format {
        OutputFormat::Json => print_json(&json!({
            "api_key": key_status,
            "base_url": config.base_url,
            "mode": mode,
            "organizations_ttl_secs": config.organizations_ttl_secs,
            "networks_ttl_secs": config.networks_ttl_secs,
            "log_level": config.log_level,
        })),
        OutputFormat::Text => {
            println!("API key:            {}", key_status);
            println!("Base URL:           {}", config.base_url);
            println!("Mode:               {}", mode);
            println!("Organizations TTL:  {}s", config.organizations_ttl_secs);
            println!("Networks TTL:       {}s", config.networks_ttl_secs);
            println!("Log level:          {}", config.log_level);
            Ok(())
        }
    }
}

/// Suggestion printed under an error the API may not repeat
pub fn retry_hint(err: &anyhow::Error) -> Option<&'static str> {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<mxdns_core::Error>())
        .filter(|cause| cause.is_transient())
        .map(|_| "The Dashboard API did not answer normally; try again later.")
}

// ===== Output =====

fn input_error(message: &str) -> CtlExitCode {
    eprintln!("Error: {}", message);
    CtlExitCode::CommandFailed
}

/// Print a mutation result; a failure exits with [`CtlExitCode::CommandFailed`]
fn report<T: Serialize>(
    result: Mutation<T>,
    format: OutputFormat,
    describe: impl FnOnce(&T) -> String,
) -> Result<CtlExitCode> {
    match (result, format) {
        (Ok(value), OutputFormat::Json) => {
            print_json(&value)?;
            Ok(CtlExitCode::Success)
        }
        (Ok(value), OutputFormat::Text) => {
            println!("{}", describe(&value));
            Ok(CtlExitCode::Success)
        }
        (Err(failure), OutputFormat::Json) => {
            print_json(&failure)?;
            Ok(CtlExitCode::CommandFailed)
        }
        (Err(failure), OutputFormat::Text) => {
            eprintln!("Error: {}", failure.error);
            Ok(CtlExitCode::CommandFailed)
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print a list as JSON, or as a table with an empty-state message
fn print_list<T: Serialize>(
    items: &[T],
    format: OutputFormat,
    empty: &str,
    headers: &[&str],
    row: impl Fn(&T) -> Vec<String>,
) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(items),
        OutputFormat::Text if items.is_empty() => {
            println!("{}", empty);
            Ok(())
        }
        OutputFormat::Text => {
            let rows: Vec<Vec<String>> = items.iter().map(row).collect();
            print!("{}", table(headers, &rows));
            Ok(())
        }
    }
}

fn print_organizations(organizations: &[Organization], format: OutputFormat) -> Result<()> {
    print_list(
        organizations,
        format,
        "No organizations found.",
        &["ID", "Name"],
        |o| vec![o.id.clone(), o.name.clone()],
    )
}

fn print_networks(networks: &[Network], format: OutputFormat) -> Result<()> {
    print_list(networks, format, "No networks found.", &["ID", "Name"], |n| {
        vec![n.id.clone(), n.name.clone()]
    })
}

fn print_profiles(profiles: &[Profile], format: OutputFormat) -> Result<()> {
    print_list(profiles, format, "No profiles found.", &["ID", "Name"], |p| {
        vec![p.profile_id.clone(), p.name.clone()]
    })
}

fn print_records(rows: &[RecordRow], format: OutputFormat) -> Result<()> {
    print_list(
        rows,
        format,
        "No DNS records found.",
        &["ID", "Hostname", "Address", "Profile"],
        |r| {
            vec![
                r.record_id.clone(),
                r.hostname.clone(),
                r.address.clone(),
                r.profile_label(),
            ]
        },
    )
}

fn print_assignments(rows: &[AssignmentRow], format: OutputFormat) -> Result<()> {
    print_list(
        rows,
        format,
        "No assignments found.",
        &["ID", "Network", "Profile"],
        |a| {
            vec![
                a.assignment_id.clone(),
                a.network_label(),
                a.profile_label(),
            ]
        },
    )
}
