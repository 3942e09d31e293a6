//! CLI command definitions.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use tracing::debug;

use crate::board::build_board;
use crate::bulk::{BulkAction, TicketSelection};
use crate::config::{write_default_configuration, CONFIGURATION_FILE_NAME};
use crate::config_loader::load_configuration_or_default;
use crate::dashboard::summarize;
use crate::error::CoreDeskError;
use crate::fixtures::{load_tickets, mock_tickets};
use crate::ids::format_ticket_id;
use crate::local_storage::{
    load_storage, save_storage, set_view_mode, view_mode, ViewMode, LOCAL_STORAGE_FILE,
};
use crate::models::{CoreDeskConfiguration, Priority, Ticket, TicketStatus};
use crate::queries::{filter_tickets, sort_tickets, SectorFilter, TicketCriteria};
use crate::repository::{InMemoryTicketRepository, TicketRepository};
use crate::session::{clear_session, resolve_session, store_session, Role, SessionContext};
use crate::sla::evaluate_with_policy;
use crate::ticket_display::format_ticket_for_display;
use crate::ticket_line::{compute_widths, format_ticket_line, should_use_color};
use crate::ticket_update::TicketUpdate;
use crate::timestamps::{current_timestamp, parse_timestamp};

/// CoreDesk CLI arguments.
#[derive(Debug, Parser)]
#[command(name = "coredesk", version)]
pub struct Cli {
    /// Ticket fixture file (JSON array). Defaults to the built-in dataset.
    #[arg(long, global = true, value_name = "PATH")]
    tickets: Option<PathBuf>,
    /// Evaluate SLAs and stamp updates at this time (YYYY-MM-DD HH:mm).
    #[arg(long, global = true, value_name = "TIMESTAMP")]
    now: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, clap::Args)]
struct FilterArgs {
    /// Case-insensitive search over title, id, requester and description.
    #[arg(long)]
    search: Option<String>,
    /// Status filter (repeatable).
    #[arg(long)]
    status: Vec<String>,
    /// Priority filter (repeatable).
    #[arg(long)]
    priority: Vec<String>,
    /// Sector filter, or "all".
    #[arg(long)]
    sector: Option<String>,
    /// Sort key (priority, created, updated, overdue).
    #[arg(long)]
    sort: Option<String>,
    /// Plain, non-colorized output for machine parsing.
    #[arg(long)]
    porcelain: bool,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List tickets.
    List {
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// List new tickets and tickets with customer replies.
    Recent {
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Show a ticket.
    Show {
        /// Ticket identifier.
        identifier: String,
        /// Emit JSON output.
        #[arg(long)]
        json: bool,
    },
    /// List overdue tickets, most overdue first.
    Alerts {
        /// Plain, non-colorized output for machine parsing.
        #[arg(long)]
        porcelain: bool,
    },
    /// Show tickets grouped into status columns.
    Board,
    /// Show dashboard figures.
    Dashboard {
        /// Emit JSON output.
        #[arg(long)]
        json: bool,
    },
    /// Update a single ticket.
    Update {
        /// Ticket identifier.
        identifier: String,
        /// New status.
        #[arg(long)]
        status: Option<String>,
        /// New priority.
        #[arg(long)]
        priority: Option<String>,
        /// New assignee (empty to unassign).
        #[arg(long)]
        assignee: Option<String>,
    },
    /// Close the selected tickets.
    Close {
        /// Ticket identifiers.
        #[arg(required = true)]
        identifiers: Vec<String>,
        /// Emit the resulting collection as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Reassign the selected tickets.
    Reassign {
        /// Ticket identifiers.
        #[arg(required = true)]
        identifiers: Vec<String>,
        /// New assignee.
        #[arg(long)]
        assignee: String,
        /// Emit the resulting collection as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Move the selected tickets to a destination queue.
    Move {
        /// Ticket identifiers.
        #[arg(required = true)]
        identifiers: Vec<String>,
        /// Destination code (suporte-n1, suporte-n2, suporte-n3, desenvolvimento,
        /// aguardando, concluido).
        #[arg(long)]
        target: String,
        /// Emit the resulting collection as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Sign in as a customer, or as staff when a role is given.
    Login {
        /// User name.
        username: String,
        /// Staff role (operador, gestor, admin, manager).
        #[arg(long)]
        role: Option<String>,
    },
    /// Sign out.
    Logout,
    /// Show the signed-in user.
    Whoami,
    /// Show or set the dashboard view mode (cards, list).
    #[command(name = "view-mode")]
    ViewMode {
        /// New view mode.
        mode: Option<String>,
    },
    /// Configuration helpers.
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigCommands {
    /// Write a default .coredesk.yml.
    Init,
}

fn is_help_request(kind: ErrorKind) -> bool {
    matches!(
        kind,
        ErrorKind::DisplayHelp
            | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
            | ErrorKind::DisplayVersion
    )
}

/// Output produced by a CLI command.
#[derive(Debug, Default)]
pub struct CommandOutput {
    pub stdout: String,
}

/// Everything a command needs, resolved once per invocation.
struct CommandContext {
    root: PathBuf,
    configuration: CoreDeskConfiguration,
    now: NaiveDateTime,
    tickets_override: Option<PathBuf>,
}

impl CommandContext {
    fn storage_path(&self) -> PathBuf {
        self.root.join(LOCAL_STORAGE_FILE)
    }

    fn load_tickets(&self) -> Result<Vec<Ticket>, CoreDeskError> {
        if let Some(path) = &self.tickets_override {
            return load_tickets(&self.root.join(path));
        }
        match &self.configuration.tickets_path {
            Some(path) => load_tickets(&self.root.join(path)),
            None => Ok(mock_tickets()),
        }
    }

    fn session(&self) -> Result<Option<SessionContext>, CoreDeskError> {
        let storage = load_storage(&self.storage_path())?;
        resolve_session(&storage)
    }

    fn scoped(&self, criteria: TicketCriteria) -> Result<TicketCriteria, CoreDeskError> {
        Ok(match self.session()? {
            Some(session) => session.scope(criteria),
            None => criteria,
        })
    }
}

/// Tickets outside the session scope are reported as missing.
fn ensure_visible<'a>(scope: &TicketCriteria, ticket: &'a Ticket) -> Result<&'a Ticket, CoreDeskError> {
    if scope.matches(ticket) {
        Ok(ticket)
    } else {
        Err(CoreDeskError::TicketNotFound(ticket.id.clone()))
    }
}

/// Run the CLI with explicit arguments.
///
/// # Arguments
///
/// * `args` - Command line arguments.
/// * `cwd` - Working directory for the command.
///
/// # Errors
///
/// Returns `CoreDeskError` if execution fails.
pub fn run_from_args<I, T>(args: I, cwd: &Path) -> Result<(), CoreDeskError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let output = run_from_args_with_output(args, cwd)?;
    if !output.stdout.is_empty() {
        println!("{}", output.stdout);
    }
    Ok(())
}

/// Run the CLI with explicit arguments and capture stdout output.
///
/// # Arguments
///
/// * `args` - Command line arguments.
/// * `cwd` - Working directory for the command.
///
/// # Errors
///
/// Returns `CoreDeskError` if execution fails.
pub fn run_from_args_with_output<I, T>(args: I, cwd: &Path) -> Result<CommandOutput, CoreDeskError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(parsed) => parsed,
        Err(error) => {
            let rendered = error.render().to_string();
            if is_help_request(error.kind()) {
                return Ok(CommandOutput { stdout: rendered });
            }
            return Err(CoreDeskError::TicketOperation(rendered));
        }
    };

    if let Commands::Config {
        command: ConfigCommands::Init,
    } = cli.command
    {
        let path = cwd.join(CONFIGURATION_FILE_NAME);
        if path.exists() {
            return Err(CoreDeskError::Configuration(
                "configuration already exists".to_string(),
            ));
        }
        write_default_configuration(&path)?;
        return Ok(CommandOutput {
            stdout: format!("wrote {CONFIGURATION_FILE_NAME}"),
        });
    }

    let now = match cli.now.as_deref() {
        Some(value) => parse_timestamp(value).ok_or_else(|| {
            CoreDeskError::InvalidAction(format!("invalid timestamp '{value}'"))
        })?,
        None => current_timestamp(),
    };
    let context = CommandContext {
        root: cwd.to_path_buf(),
        configuration: load_configuration_or_default(cwd)?,
        now,
        tickets_override: cli.tickets,
    };
    debug!(root = %context.root.display(), now = %context.now, "running command");
    let stdout = execute_command(cli.command, &context)?;

    Ok(CommandOutput {
        stdout: stdout.unwrap_or_default(),
    })
}

fn build_criteria(filters: &FilterArgs, base: TicketCriteria) -> Result<TicketCriteria, CoreDeskError> {
    let mut criteria = base;
    if let Some(search) = &filters.search {
        criteria = criteria.with_search(search.clone());
    }
    for status in &filters.status {
        criteria = criteria.with_status(status.parse::<TicketStatus>()?);
    }
    for priority in &filters.priority {
        criteria = criteria.with_priority(priority.parse::<Priority>()?);
    }
    if let Some(sector) = &filters.sector {
        criteria = criteria.with_sector(sector.parse::<SectorFilter>()?);
    }
    Ok(criteria)
}

fn render_list(
    context: &CommandContext,
    filters: &FilterArgs,
    base: TicketCriteria,
) -> Result<String, CoreDeskError> {
    let tickets = context.load_tickets()?;
    let criteria = context.scoped(build_criteria(filters, base)?)?;
    let visible = filter_tickets(&tickets, &criteria);
    let sorted = sort_tickets(
        visible,
        filters.sort.as_deref(),
        &context.configuration.sla,
        context.now,
    )?;
    Ok(render_lines(context, &sorted, filters.porcelain))
}

fn render_lines(context: &CommandContext, tickets: &[&Ticket], porcelain: bool) -> String {
    let rows: Vec<(&Ticket, _)> = tickets
        .iter()
        .map(|ticket| {
            (
                *ticket,
                evaluate_with_policy(ticket, &context.configuration.sla, context.now),
            )
        })
        .collect();
    let widths = if porcelain {
        None
    } else {
        Some(compute_widths(&rows))
    };
    rows.iter()
        .map(|(ticket, alert)| {
            format_ticket_line(
                ticket,
                alert,
                widths.as_ref(),
                porcelain,
                Some(&context.configuration),
                None,
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn run_bulk(
    context: &CommandContext,
    identifiers: &[String],
    action: BulkAction,
    json: bool,
) -> Result<String, CoreDeskError> {
    let scope = context.scoped(TicketCriteria::all())?;
    let mut repository = InMemoryTicketRepository::with_fixed_clock(context.load_tickets()?, context.now);
    for identifier in identifiers {
        ensure_visible(&scope, repository.get(identifier)?)?;
    }
    let selection = TicketSelection::from_ids(identifiers);
    let updated = repository.bulk_update(&selection, &action);
    if json {
        return serde_json::to_string_pretty(&filter_tickets(repository.list(), &scope))
            .map_err(|error| CoreDeskError::Io(error.to_string()));
    }
    let formatted = updated
        .iter()
        .map(|identifier| format_ticket_id(identifier))
        .collect::<Vec<_>>()
        .join(", ");
    let verb = match action {
        BulkAction::Close => "Closed".to_string(),
        BulkAction::Reassign(assignee) => format!("Reassigned to {assignee}:"),
        BulkAction::Move(target) => format!("Moved to {target}:"),
    };
    Ok(format!("{verb} {formatted}"))
}

fn execute_command(
    command: Commands,
    context: &CommandContext,
) -> Result<Option<String>, CoreDeskError> {
    match command {
        Commands::List { filters } => Ok(Some(render_list(context, &filters, TicketCriteria::all())?)),
        Commands::Recent { filters } => Ok(Some(render_list(
            context,
            &filters,
            TicketCriteria::recent_activity(),
        )?)),
        Commands::Show { identifier, json } => {
            let scope = context.scoped(TicketCriteria::all())?;
            let repository = InMemoryTicketRepository::new(context.load_tickets()?);
            let ticket = ensure_visible(&scope, repository.get(&identifier)?)?;
            if json {
                let payload = serde_json::to_string_pretty(ticket)
                    .map_err(|error| CoreDeskError::Io(error.to_string()))?;
                return Ok(Some(payload));
            }
            let alert = evaluate_with_policy(ticket, &context.configuration.sla, context.now);
            Ok(Some(format_ticket_for_display(
                ticket,
                &alert,
                Some(&context.configuration),
                should_use_color(),
            )))
        }
        Commands::Alerts { porcelain } => {
            let tickets = context.load_tickets()?;
            let criteria = context.scoped(TicketCriteria::all())?;
            let overdue: Vec<&Ticket> = filter_tickets(&tickets, &criteria)
                .into_iter()
                .filter(|ticket| {
                    evaluate_with_policy(ticket, &context.configuration.sla, context.now).is_critical
                })
                .collect();
            let overdue =
                sort_tickets(overdue, Some("overdue"), &context.configuration.sla, context.now)?;
            if overdue.is_empty() {
                return Ok(Some("no overdue tickets".to_string()));
            }
            Ok(Some(render_lines(context, &overdue, porcelain)))
        }
        Commands::Board => {
            let tickets = context.load_tickets()?;
            let criteria = context.scoped(TicketCriteria::all())?;
            let visible = filter_tickets(&tickets, &criteria);
            let mut sections = Vec::new();
            for column in build_board(visible) {
                let mut lines = vec![format!("{} ({})", column.status, column.count())];
                for ticket in &column.tickets {
                    lines.push(format!("  {} {}", format_ticket_id(&ticket.id), ticket.title));
                }
                sections.push(lines.join("\n"));
            }
            Ok(Some(sections.join("\n\n")))
        }
        Commands::Dashboard { json } => {
            let tickets = context.load_tickets()?;
            let criteria = context.scoped(TicketCriteria::all())?;
            let visible = filter_tickets(&tickets, &criteria);
            let summary = summarize(visible, &context.configuration.sla, context.now);
            if json {
                let payload = serde_json::to_string_pretty(&summary)
                    .map_err(|error| CoreDeskError::Io(error.to_string()))?;
                return Ok(Some(payload));
            }
            let storage = load_storage(&context.storage_path())?;
            let mut lines = vec![
                format!("view: {}", view_mode(&storage)),
                format!("total tickets: {}", summary.total),
            ];
            for (status, count) in &summary.by_status {
                lines.push(format!("status: {status}: {count}"));
            }
            for (priority, count) in &summary.by_priority {
                lines.push(format!("priority: {priority}: {count}"));
            }
            lines.push(format!("critical: {}", summary.critical));
            lines.push(format!("severe: {}", summary.severe));
            lines.push(format!("unassigned: {}", summary.unassigned));
            lines.push(format!("needs attention: {}", summary.needs_attention));
            Ok(Some(lines.join("\n")))
        }
        Commands::Update {
            identifier,
            status,
            priority,
            assignee,
        } => {
            let update = TicketUpdate {
                status: status.as_deref().map(str::parse::<TicketStatus>).transpose()?,
                priority: priority.as_deref().map(str::parse::<Priority>).transpose()?,
                assignee,
            };
            if update.is_empty() {
                return Err(CoreDeskError::InvalidAction(
                    "nothing to update".to_string(),
                ));
            }
            let scope = context.scoped(TicketCriteria::all())?;
            let mut repository =
                InMemoryTicketRepository::with_fixed_clock(context.load_tickets()?, context.now);
            ensure_visible(&scope, repository.get(&identifier)?)?;
            let ticket = repository.update(&identifier, &update)?;
            Ok(Some(format!("Updated {}", format_ticket_id(&ticket.id))))
        }
        Commands::Close { identifiers, json } => {
            Ok(Some(run_bulk(context, &identifiers, BulkAction::Close, json)?))
        }
        Commands::Reassign {
            identifiers,
            assignee,
            json,
        } => {
            let action = BulkAction::reassign(&assignee)?;
            Ok(Some(run_bulk(context, &identifiers, action, json)?))
        }
        Commands::Move {
            identifiers,
            target,
            json,
        } => {
            let action = BulkAction::move_to(&target)?;
            Ok(Some(run_bulk(context, &identifiers, action, json)?))
        }
        Commands::Login { username, role } => {
            let session = match role {
                Some(value) => SessionContext::Staff {
                    username,
                    role: value.parse::<Role>()?,
                },
                None => SessionContext::Customer { username },
            };
            let path = context.storage_path();
            let mut storage = load_storage(&path)?;
            store_session(&mut storage, &session)?;
            save_storage(&path, &storage)?;
            Ok(Some(format!("Signed in as {session}")))
        }
        Commands::Logout => {
            let path = context.storage_path();
            let mut storage = load_storage(&path)?;
            clear_session(&mut storage);
            save_storage(&path, &storage)?;
            Ok(Some("Signed out".to_string()))
        }
        Commands::Whoami => match context.session()? {
            Some(session) => Ok(Some(session.to_string())),
            None => Ok(Some("not signed in".to_string())),
        },
        Commands::ViewMode { mode } => {
            let path = context.storage_path();
            let mut storage = load_storage(&path)?;
            match mode {
                Some(value) => {
                    set_view_mode(&mut storage, value.parse::<ViewMode>()?);
                    save_storage(&path, &storage)?;
                    Ok(Some(format!("view mode: {}", view_mode(&storage))))
                }
                None => Ok(Some(view_mode(&storage).to_string())),
            }
        }
        Commands::Config { .. } => Ok(None),
    }
}

/// Run the CLI using process arguments and current directory.
///
/// # Errors
///
/// Returns `CoreDeskError` if execution fails.
pub fn run_from_env() -> Result<(), CoreDeskError> {
    run_from_args(std::env::args_os(), Path::new("."))
}
