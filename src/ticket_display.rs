//! Ticket display formatting helpers.

use owo_colors::{AnsiColors, OwoColorize};

use crate::ids::format_ticket_id;
use crate::models::{CoreDeskConfiguration, CriticalAlert, Ticket};
use crate::ticket_line::{paint, paint_alert, priority_color, sector_color, status_color};

fn dim(text: &str, use_color: bool) -> String {
    if use_color {
        text.color(AnsiColors::BrightBlack).to_string()
    } else {
        text.to_string()
    }
}

fn describe_alert(alert: &CriticalAlert) -> String {
    if alert.is_critical {
        format!("{} ({}h overdue)", alert.alert_level, alert.hours_overdue)
    } else {
        "within SLA".to_string()
    }
}

/// Format a ticket for human-readable display.
pub fn format_ticket_for_display(
    ticket: &Ticket,
    alert: &CriticalAlert,
    configuration: Option<&CoreDeskConfiguration>,
    use_color: bool,
) -> String {
    let assignee = if ticket.is_unassigned() {
        "-".to_string()
    } else {
        ticket.assignee.clone()
    };
    let sector = configuration
        .and_then(|config| config.sector(&ticket.sector_id))
        .map(|sector| sector.name.clone())
        .unwrap_or_else(|| ticket.sector_id.clone());
    let category = if ticket.category.is_empty() {
        "-".to_string()
    } else {
        ticket.category.clone()
    };

    let rows = vec![
        ("ID:", format_ticket_id(&ticket.id), None, false),
        ("Title:", ticket.title.clone(), None, false),
        (
            "Status:",
            ticket.status.label().to_string(),
            status_color(ticket.status),
            false,
        ),
        (
            "Priority:",
            ticket.priority.to_string(),
            priority_color(ticket.priority),
            false,
        ),
        (
            "Sector:",
            sector,
            sector_color(&ticket.sector_id, configuration),
            false,
        ),
        ("Category:", category, None, ticket.category.is_empty()),
        ("Assignee:", assignee, None, ticket.is_unassigned()),
        ("Requester:", ticket.requester.clone(), None, false),
        ("Created:", ticket.created_at.clone(), None, false),
        ("Updated:", ticket.updated_at.clone(), None, false),
        (
            "Activity:",
            format!(
                "{} responses, {} attachments",
                ticket.responses, ticket.attachments
            ),
            None,
            false,
        ),
    ];

    let mut lines = Vec::new();
    for (label, value, color, muted) in rows {
        let final_color = if muted {
            Some(AnsiColors::BrightBlack)
        } else {
            color
        };
        lines.push(format!(
            "{} {}",
            dim(label, use_color),
            paint(&value, final_color, use_color)
        ));
    }
    lines.push(format!(
        "{} {}",
        dim("SLA:", use_color),
        paint_alert(&describe_alert(alert), alert.visible_level(), use_color)
    ));
    if ticket.has_customer_reply {
        lines.push(format!(
            "{} {}",
            dim("Reply:", use_color),
            paint("customer replied", Some(AnsiColors::Yellow), use_color)
        ));
    }
    if !ticket.description.is_empty() {
        lines.push(dim("Description:", use_color));
        lines.push(ticket.description.clone());
    }
    lines.join("\n")
}
