//! Command implementations behind the CLI surface.

use std::io::{self, Write};
use std::time::Duration;

use clap::CommandFactory;
use clap_complete::Shell;

use crate::config::DeskConfig;
use crate::detail::FlashKind;
use crate::engine::{
    Dashboard, create_and_refresh, patch_and_refresh, refresh_all, resolve_detail,
};
use crate::error::{DeskError, Result};
use crate::filter::{FilterState, Selector, filter_tickets};
use crate::form::{TicketDraft, build_create_payload};
use crate::remote::TicketApi;
use crate::render::{build_board, render_board, render_detail, render_table};
use crate::types::TicketPatch;
use crate::watch::{WatchOptions, WatchView, render_stats, run_watch};

/// Assemble filter state from CLI flags, canonicalizing selector values
/// against the configured vocabularies.
pub fn filter_from_args(
    config: &DeskConfig,
    status: Option<&str>,
    priority: Option<&str>,
    term: Option<&str>,
) -> Result<FilterState> {
    let status = match status {
        None => Selector::All,
        Some(raw) => match Selector::parse(raw) {
            Selector::All => Selector::All,
            Selector::Only(value) => Selector::Only(
                config
                    .statuses
                    .canonical(&value)
                    .ok_or_else(|| DeskError::InvalidStatus(value.clone()))?
                    .to_string(),
            ),
        },
    };
    let priority = match priority {
        None => Selector::All,
        Some(raw) => match Selector::parse(raw) {
            Selector::All => Selector::All,
            Selector::Only(value) => Selector::Only(
                config
                    .priorities
                    .canonical(&value)
                    .ok_or_else(|| DeskError::InvalidPriority(value.clone()))?
                    .to_string(),
            ),
        },
    };
    Ok(FilterState {
        status,
        priority,
        term: term.unwrap_or_default().to_string(),
    })
}

/// List tickets as a table, optionally as JSON.
pub async fn cmd_ls(
    api: &dyn TicketApi,
    config: &DeskConfig,
    status: Option<&str>,
    priority: Option<&str>,
    term: Option<&str>,
    output_json: bool,
) -> Result<()> {
    let filter = filter_from_args(config, status, priority, term)?;
    let tickets = api.list_tickets().await?;
    let filtered = filter_tickets(&tickets, &filter);

    if output_json {
        println!("{}", serde_json::to_string_pretty(&filtered)?);
        return Ok(());
    }

    println!("{}", render_table(&filtered, &config.statuses));
    Ok(())
}

/// Show the status-column board.
pub async fn cmd_board(
    api: &dyn TicketApi,
    config: &DeskConfig,
    status: Option<&str>,
    priority: Option<&str>,
    term: Option<&str>,
) -> Result<()> {
    let filter = filter_from_args(config, status, priority, term)?;
    let tickets = api.list_tickets().await?;
    let filtered = filter_tickets(&tickets, &filter);
    let board = build_board(&filtered, &config.statuses);
    print!("{}", render_board(&board));
    Ok(())
}

/// Show the aggregate stats cards.
pub async fn cmd_stats(api: &dyn TicketApi, config: &DeskConfig) -> Result<()> {
    let stats = api.fetch_stats().await?;
    println!(
        "{}",
        render_stats(&stats, &config.statuses, &config.priorities)
    );
    if !stats.issue_type.is_empty() {
        let issues: Vec<String> = stats
            .issue_type
            .iter()
            .map(|(issue, count)| format!("{}: {}", issue, count))
            .collect();
        println!("By issue type: {}", issues.join("  |  "));
    }
    Ok(())
}

/// Open the detail view for one ticket and print it.
pub async fn cmd_show(api: &dyn TicketApi, config: &DeskConfig, id: &str) -> Result<()> {
    let mut dash = Dashboard::new(config.statuses.clone(), config.priorities.clone());
    refresh_all(&mut dash, api).await;
    if let Some(error) = dash.table_error() {
        return Err(DeskError::Api(error.to_string()));
    }
    let Some(ticket) = dash.ticket(id).cloned() else {
        return Err(DeskError::TicketNotFound(id.to_string()));
    };
    dash.open_detail(&ticket.id);
    if let Some(buffer) = dash.detail().buffer()
        && let Some(flash) = dash.detail().flash()
    {
        println!(
            "{}",
            render_detail(&ticket, buffer, flash, &config.statuses)
        );
    }
    Ok(())
}

/// Update fields on one ticket, then refetch so the change is visible.
pub async fn cmd_set(
    api: &dyn TicketApi,
    config: &DeskConfig,
    id: &str,
    status: Option<&str>,
    assignee: Option<&str>,
    notes: Option<&str>,
    priority: Option<&str>,
) -> Result<()> {
    let status = status
        .map(|raw| {
            config
                .statuses
                .canonical(raw)
                .map(str::to_string)
                .ok_or_else(|| DeskError::InvalidStatus(raw.to_string()))
        })
        .transpose()?;
    let priority = priority
        .map(|raw| {
            config
                .priorities
                .canonical(raw)
                .map(str::to_string)
                .ok_or_else(|| DeskError::InvalidPriority(raw.to_string()))
        })
        .transpose()?;

    let patch = TicketPatch {
        status,
        assignee: assignee.map(str::to_string),
        resolution_notes: notes.map(str::to_string),
        priority,
    };
    if patch.is_empty() {
        return Err(DeskError::Config(
            "nothing to update: pass at least one of --status, --assignee, --notes, --priority"
                .to_string(),
        ));
    }

    let mut dash = Dashboard::new(config.statuses.clone(), config.priorities.clone());
    refresh_all(&mut dash, api).await;
    if dash.ticket(id).is_none() {
        return Err(DeskError::TicketNotFound(id.to_string()));
    }
    patch_and_refresh(&mut dash, api, id, &patch).await?;
    println!("Ticket {} updated.", id);
    Ok(())
}

/// Resolve one ticket through the detail panel's shortcut: force
/// `resolved`, keeping typed notes and falling back to the canned note.
pub async fn cmd_resolve(
    api: &dyn TicketApi,
    config: &DeskConfig,
    id: &str,
    notes: Option<&str>,
) -> Result<()> {
    let mut dash = Dashboard::new(config.statuses.clone(), config.priorities.clone());
    refresh_all(&mut dash, api).await;
    if !dash.open_detail(id) {
        return Err(DeskError::TicketNotFound(id.to_string()));
    }
    if let Some(notes) = notes
        && let Some(buffer) = dash.edit_buffer_mut()
    {
        buffer.resolution_notes = notes.to_string();
    }
    resolve_detail(&mut dash, api).await?;

    if let Some(flash) = dash.detail().flash()
        && flash.kind == FlashKind::Success
    {
        println!("{}", flash.text);
    } else {
        println!("Ticket {} resolved.", id);
    }
    Ok(())
}

/// Submit a new ticket, then show the refreshed board the way the intake
/// page does.
pub async fn cmd_submit(api: &dyn TicketApi, config: &DeskConfig, draft: &TicketDraft) -> Result<()> {
    let priority = config
        .priorities
        .canonical(&draft.priority)
        .ok_or_else(|| DeskError::InvalidPriority(draft.priority.clone()))?;
    let draft = TicketDraft {
        priority: priority.to_string(),
        ..draft.clone()
    };
    let payload = build_create_payload(&draft, &config.intake);

    let mut dash = Dashboard::new(config.statuses.clone(), config.priorities.clone());
    let outcome = create_and_refresh(&mut dash, api, &payload).await?;

    if outcome.auto_resolved() {
        println!("Ticket auto-resolved instantly. Review in the Resolved column.");
    } else {
        println!("Ticket created successfully.");
    }
    let board = build_board(&dash.filtered(), &config.statuses);
    print!("{}", render_board(&board));
    Ok(())
}

/// Run the live dashboard until interrupted (or for `--cycles` refreshes).
#[allow(clippy::too_many_arguments)]
pub async fn cmd_watch(
    api: &dyn TicketApi,
    config: &DeskConfig,
    view: WatchView,
    interval: Option<u64>,
    status: Option<&str>,
    priority: Option<&str>,
    term: Option<&str>,
    cycles: Option<u64>,
) -> Result<()> {
    let mut dash = Dashboard::new(config.statuses.clone(), config.priorities.clone())
        .with_initial_stats(config.initial_stats.clone());
    dash.filter = filter_from_args(config, status, priority, term)?;

    let options = WatchOptions {
        view,
        period: interval
            .map(|secs| Duration::from_secs(secs.max(1)))
            .unwrap_or_else(|| config.refresh_period()),
        ticks: cycles,
    };
    let mut stdout = io::stdout();
    run_watch(&mut dash, api, &options, &mut stdout).await
}

/// Print the effective configuration with secrets redacted.
pub fn cmd_config_show(config: &DeskConfig) -> Result<()> {
    let mut printable = config.clone();
    if printable.auth.token.is_some() {
        printable.auth.token = Some("[REDACTED]".to_string());
    }
    print!("{}", serde_yaml_ng::to_string(&printable)?);
    Ok(())
}

/// Emit shell completions for the CLI.
pub fn cmd_completions<C: CommandFactory>(shell: Shell) -> Result<()> {
    let mut command = C::command();
    let name = command.get_name().to_string();
    clap_complete::generate(shell, &mut command, name, &mut io::stdout());
    io::stdout().flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_from_args_canonicalizes() {
        let config = DeskConfig::default();
        let filter =
            filter_from_args(&config, Some("OPEN"), Some("High"), Some("vpn")).unwrap();
        assert_eq!(filter.status, Selector::Only("open".to_string()));
        assert_eq!(filter.priority, Selector::Only("high".to_string()));
        assert_eq!(filter.term, "vpn");
    }

    #[test]
    fn test_filter_from_args_all_passthrough() {
        let config = DeskConfig::default();
        let filter = filter_from_args(&config, Some("all"), None, None).unwrap();
        assert_eq!(filter.status, Selector::All);
        assert_eq!(filter.priority, Selector::All);
    }

    #[test]
    fn test_filter_from_args_rejects_unknown_values() {
        let config = DeskConfig::default();
        assert!(filter_from_args(&config, Some("archived"), None, None).is_err());
        assert!(filter_from_args(&config, None, Some("sev0"), None).is_err());
    }
}
