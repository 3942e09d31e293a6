//! Single-line ticket formatting for list output.

use owo_colors::{AnsiColors, OwoColorize};

use crate::ids::format_ticket_id;
use crate::models::{AlertLevel, CoreDeskConfiguration, CriticalAlert, Priority, Ticket, TicketStatus};
use crate::sla::{alert_style, AlertFill};

/// Column widths for list output.
#[derive(Debug, Clone, Copy)]
pub struct Widths {
    pub identifier: usize,
    pub status: usize,
    pub priority: usize,
    pub sector: usize,
    pub alert: usize,
}

/// Compute printable column widths for aligned normal-mode output.
pub fn compute_widths(rows: &[(&Ticket, CriticalAlert)]) -> Widths {
    let mut widths = Widths {
        identifier: 0,
        status: 0,
        priority: 0,
        sector: 1,
        alert: 1,
    };

    for (ticket, alert) in rows {
        widths.identifier = widths.identifier.max(format_ticket_id(&ticket.id).len());
        widths.status = widths.status.max(ticket.status.label().chars().count());
        widths.priority = widths.priority.max(ticket.priority.as_str().len());
        widths.sector = widths.sector.max(ticket.sector_id.chars().count());
        widths.alert = widths.alert.max(alert_badge(alert).len());
    }

    widths
}

/// Short overdue marker, e.g. `+6h`, or `-` when not critical.
pub fn alert_badge(alert: &CriticalAlert) -> String {
    if alert.is_critical {
        format!("+{}h", alert.hours_overdue)
    } else {
        "-".to_string()
    }
}

/// Render a single-line ticket summary.
///
/// When `use_color_override` is `None`, color is determined by NO_COLOR and
/// stdout TTY (interactive). When `Some(true)` or `Some(false)`, that value
/// is used instead (for tests or callers that know the context).
pub fn format_ticket_line(
    ticket: &Ticket,
    alert: &CriticalAlert,
    widths: Option<&Widths>,
    porcelain: bool,
    configuration: Option<&CoreDeskConfiguration>,
    use_color_override: Option<bool>,
) -> String {
    let formatted_identifier = format_ticket_id(&ticket.id);
    let assignee = if ticket.is_unassigned() {
        "-"
    } else {
        ticket.assignee.as_str()
    };
    if porcelain {
        return format!(
            "{} | {} | {} | {} | {} | {} | {}",
            formatted_identifier,
            ticket.status,
            ticket.priority,
            if ticket.sector_id.is_empty() { "-" } else { ticket.sector_id.as_str() },
            assignee,
            alert_badge(alert),
            ticket.title
        );
    }

    let computed_widths = widths
        .copied()
        .unwrap_or_else(|| compute_widths(&[(ticket, *alert)]));
    let use_color = use_color_override.unwrap_or_else(should_use_color);

    let alert_part = paint_alert(
        &format!("{:width$}", alert_badge(alert), width = computed_widths.alert),
        alert.visible_level(),
        use_color,
    );
    let identifier_part = format!(
        "{:width$}",
        formatted_identifier,
        width = computed_widths.identifier
    );
    let status_part = paint(
        &pad(ticket.status.label(), computed_widths.status),
        status_color(ticket.status),
        use_color,
    );
    let priority_part = paint(
        &format!(
            "{:width$}",
            ticket.priority.as_str(),
            width = computed_widths.priority
        ),
        priority_color(ticket.priority),
        use_color,
    );
    let sector_value = if ticket.sector_id.is_empty() { "-" } else { ticket.sector_id.as_str() };
    let sector_part = paint(
        &pad(sector_value, computed_widths.sector),
        sector_color(&ticket.sector_id, configuration),
        use_color,
    );
    let assignee_part = if ticket.is_unassigned() && use_color {
        assignee.color(AnsiColors::BrightBlack).to_string()
    } else {
        assignee.to_string()
    };
    format!(
        "{alert_part} {identifier_part} {status_part} {priority_part} {sector_part} {} ({assignee_part})",
        ticket.title
    )
}

fn pad(value: &str, width: usize) -> String {
    let length = value.chars().count();
    format!("{value}{}", " ".repeat(width.saturating_sub(length)))
}

pub(crate) fn should_use_color() -> bool {
    use std::io::IsTerminal;
    // Disable colors if NO_COLOR is set or if stdout is not a TTY
    std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal()
}

pub(crate) fn paint(text: &str, color: Option<AnsiColors>, use_color: bool) -> String {
    match (use_color, color) {
        (true, Some(color_value)) => text.color(color_value).to_string(),
        _ => text.to_string(),
    }
}

/// Paint text with the treatment of an alert level.
pub(crate) fn paint_alert(text: &str, level: Option<AlertLevel>, use_color: bool) -> String {
    let Some(level) = level.filter(|_| use_color) else {
        return text.to_string();
    };
    match alert_style(level).fill {
        AlertFill::Solid => text
            .color(AnsiColors::BrightWhite)
            .on_color(AnsiColors::Red)
            .bold()
            .to_string(),
        AlertFill::Light => text.color(AnsiColors::Red).bold().to_string(),
        AlertFill::None => text.to_string(),
    }
}

pub(crate) fn parse_color(name: &str) -> Option<AnsiColors> {
    match name.to_ascii_lowercase().as_str() {
        "black" => Some(AnsiColors::Black),
        "red" => Some(AnsiColors::Red),
        "green" => Some(AnsiColors::Green),
        "yellow" => Some(AnsiColors::Yellow),
        "blue" => Some(AnsiColors::Blue),
        "magenta" => Some(AnsiColors::Magenta),
        "cyan" => Some(AnsiColors::Cyan),
        "white" => Some(AnsiColors::White),
        "bright_black" => Some(AnsiColors::BrightBlack),
        "bright_red" => Some(AnsiColors::BrightRed),
        "bright_green" => Some(AnsiColors::BrightGreen),
        "bright_yellow" => Some(AnsiColors::BrightYellow),
        "bright_blue" => Some(AnsiColors::BrightBlue),
        "bright_magenta" => Some(AnsiColors::BrightMagenta),
        "bright_cyan" => Some(AnsiColors::BrightCyan),
        "bright_white" => Some(AnsiColors::BrightWhite),
        _ => None,
    }
}

pub(crate) fn status_color(status: TicketStatus) -> Option<AnsiColors> {
    Some(match status {
        TicketStatus::New => AnsiColors::Cyan,
        TicketStatus::InProgress => AnsiColors::Blue,
        TicketStatus::Waiting => AnsiColors::Yellow,
        TicketStatus::Resolved => AnsiColors::Green,
    })
}

pub(crate) fn priority_color(priority: Priority) -> Option<AnsiColors> {
    Some(match priority {
        Priority::Urgent => AnsiColors::Red,
        Priority::High => AnsiColors::BrightRed,
        Priority::Medium => AnsiColors::Yellow,
        Priority::Low => AnsiColors::Blue,
    })
}

pub(crate) fn sector_color(
    sector_id: &str,
    configuration: Option<&CoreDeskConfiguration>,
) -> Option<AnsiColors> {
    configuration
        .and_then(|config| config.sector(sector_id))
        .and_then(|sector| sector.color.as_deref())
        .and_then(parse_color)
}
