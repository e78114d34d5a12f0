use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use deskview::commands::{
    cmd_board, cmd_completions, cmd_config_show, cmd_ls, cmd_resolve, cmd_set, cmd_show,
    cmd_stats, cmd_submit, cmd_watch,
};
use deskview::{DeskConfig, HttpTicketClient, Result, TicketDraft, WatchView};

#[derive(Parser)]
#[command(name = "deskview")]
#[command(about = "Terminal dashboard for a remote support-ticket service")]
#[command(version)]
struct Cli {
    /// Path to the configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Service base URL (overrides configuration)
    #[arg(long, global = true)]
    url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Live dashboard with periodic refresh
    #[command(visible_alias = "w")]
    Watch {
        /// Projection to show: table or board
        #[arg(long, default_value = "table", value_parser = parse_view)]
        view: WatchView,

        /// Refresh period in seconds (default from configuration)
        #[arg(long)]
        interval: Option<u64>,

        /// Filter by status
        #[arg(long)]
        status: Option<String>,

        /// Filter by priority
        #[arg(long)]
        priority: Option<String>,

        /// Free-text search term
        #[arg(long)]
        term: Option<String>,

        /// Stop after this many refresh cycles (default: run until ^C)
        #[arg(long)]
        cycles: Option<u64>,
    },

    /// List tickets as a table
    Ls {
        /// Filter by status
        #[arg(long)]
        status: Option<String>,

        /// Filter by priority
        #[arg(long)]
        priority: Option<String>,

        /// Free-text search term
        #[arg(long)]
        term: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// View tickets grouped by status
    Board {
        /// Filter by status
        #[arg(long)]
        status: Option<String>,

        /// Filter by priority
        #[arg(long)]
        priority: Option<String>,

        /// Free-text search term
        #[arg(long)]
        term: Option<String>,
    },

    /// Show aggregate ticket stats
    Stats,

    /// Show one ticket's detail panel
    #[command(visible_alias = "s")]
    Show {
        /// Ticket ID
        id: String,
    },

    /// Update a ticket's status, assignee, notes, or priority
    Set {
        /// Ticket ID
        id: String,

        /// New status
        #[arg(long)]
        status: Option<String>,

        /// New assignee
        #[arg(long)]
        assignee: Option<String>,

        /// Resolution notes
        #[arg(long)]
        notes: Option<String>,

        /// New priority
        #[arg(long)]
        priority: Option<String>,
    },

    /// Mark a ticket resolved
    Resolve {
        /// Ticket ID
        id: String,

        /// Resolution notes (defaults to the canned dashboard note)
        #[arg(long)]
        notes: Option<String>,
    },

    /// Submit a new ticket
    Submit {
        /// Ticket subject
        subject: String,

        /// Description text
        #[arg(short, long)]
        description: String,

        /// Issue type (e.g. network, hardware, billing)
        #[arg(short = 't', long = "type")]
        issue_type: String,

        /// Priority (default: medium)
        #[arg(short, long, default_value = "medium")]
        priority: String,

        /// Requester name
        #[arg(long)]
        requester_name: Option<String>,

        /// Requester email
        #[arg(long)]
        requester_email: Option<String>,

        /// Context field for the chosen issue type, as name=value (repeatable)
        #[arg(long = "field", value_parser = parse_key_value)]
        fields: Vec<(String, String)>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Target shell
        shell: Shell,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show the effective configuration
    Show,
}

fn parse_view(s: &str) -> std::result::Result<WatchView, String> {
    match s.to_lowercase().as_str() {
        "table" => Ok(WatchView::Table),
        "board" => Ok(WatchView::Board),
        _ => Err("expected 'table' or 'board'".to_string()),
    }
}

fn parse_key_value(s: &str) -> std::result::Result<(String, String), String> {
    s.split_once('=')
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected name=value, got '{}'", s))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("DESKVIEW_LOG")
        .unwrap_or_else(|_| EnvFilter::new("deskview=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_client(config: &DeskConfig, url: Option<&str>) -> Result<HttpTicketClient> {
    let base_url = config.resolved_base_url(url)?;
    let mut client = HttpTicketClient::new(base_url, config.request_timeout())?;
    if let Some(token) = config.resolved_token() {
        client = client.with_token(token);
    }
    Ok(client)
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let config = match DeskConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let result = run(&cli, &config).await;

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli, config: &DeskConfig) -> Result<()> {
    match &cli.command {
        Commands::Watch {
            view,
            interval,
            status,
            priority,
            term,
            cycles,
        } => {
            let api = build_client(config, cli.url.as_deref())?;
            cmd_watch(
                &api,
                config,
                *view,
                *interval,
                status.as_deref(),
                priority.as_deref(),
                term.as_deref(),
                *cycles,
            )
            .await
        }

        Commands::Ls {
            status,
            priority,
            term,
            json,
        } => {
            let api = build_client(config, cli.url.as_deref())?;
            cmd_ls(
                &api,
                config,
                status.as_deref(),
                priority.as_deref(),
                term.as_deref(),
                *json,
            )
            .await
        }

        Commands::Board {
            status,
            priority,
            term,
        } => {
            let api = build_client(config, cli.url.as_deref())?;
            cmd_board(
                &api,
                config,
                status.as_deref(),
                priority.as_deref(),
                term.as_deref(),
            )
            .await
        }

        Commands::Stats => {
            let api = build_client(config, cli.url.as_deref())?;
            cmd_stats(&api, config).await
        }

        Commands::Show { id } => {
            let api = build_client(config, cli.url.as_deref())?;
            cmd_show(&api, config, id).await
        }

        Commands::Set {
            id,
            status,
            assignee,
            notes,
            priority,
        } => {
            let api = build_client(config, cli.url.as_deref())?;
            cmd_set(
                &api,
                config,
                id,
                status.as_deref(),
                assignee.as_deref(),
                notes.as_deref(),
                priority.as_deref(),
            )
            .await
        }

        Commands::Resolve { id, notes } => {
            let api = build_client(config, cli.url.as_deref())?;
            cmd_resolve(&api, config, id, notes.as_deref()).await
        }

        Commands::Submit {
            subject,
            description,
            issue_type,
            priority,
            requester_name,
            requester_email,
            fields,
        } => {
            let api = build_client(config, cli.url.as_deref())?;
            let draft = TicketDraft {
                subject: subject.clone(),
                description: description.clone(),
                issue_type: issue_type.clone(),
                priority: priority.clone(),
                requester_name: requester_name.clone(),
                requester_email: requester_email.clone(),
                context: fields.clone(),
            };
            cmd_submit(&api, config, &draft).await
        }

        Commands::Config { action } => match action {
            ConfigAction::Show => cmd_config_show(config),
        },

        Commands::Completions { shell } => cmd_completions::<Cli>(*shell),
    }
}
