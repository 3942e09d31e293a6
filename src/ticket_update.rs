//! Single-ticket update workflow.

use chrono::NaiveDateTime;

use crate::error::CoreDeskError;
use crate::models::{Priority, Ticket, TicketStatus};
use crate::timestamps::format_timestamp;

/// Fields an operator can change on one ticket.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketUpdate {
    pub status: Option<TicketStatus>,
    pub priority: Option<Priority>,
    /// `Some("")` unassigns the ticket.
    pub assignee: Option<String>,
}

impl TicketUpdate {
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.priority.is_none() && self.assignee.is_none()
    }
}

/// Apply an update to a ticket and refresh `updated_at`.
///
/// # Arguments
/// * `ticket` - Ticket being updated.
/// * `update` - Requested changes.
/// * `now` - Timestamp written to `updated_at`.
///
/// # Errors
/// Returns `CoreDeskError::TicketOperation` if no field would change.
pub fn apply_ticket_update(
    ticket: &mut Ticket,
    update: &TicketUpdate,
    now: NaiveDateTime,
) -> Result<(), CoreDeskError> {
    let mut changed = false;

    if let Some(status) = update.status {
        if ticket.status != status {
            ticket.status = status;
            changed = true;
        }
    }

    if let Some(priority) = update.priority {
        if ticket.priority != priority {
            ticket.priority = priority;
            changed = true;
        }
    }

    if let Some(assignee) = update.assignee.as_deref() {
        let normalized = assignee.trim();
        if ticket.assignee != normalized {
            ticket.assignee = normalized.to_string();
            changed = true;
        }
    }

    if !changed {
        return Err(CoreDeskError::TicketOperation(
            "no updates requested".to_string(),
        ));
    }

    ticket.updated_at = format_timestamp(now);
    Ok(())
}
