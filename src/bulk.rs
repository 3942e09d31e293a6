//! Bulk actions over a selection of tickets.

use std::collections::BTreeSet;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use chrono::NaiveDateTime;
use tracing::{info, warn};

use crate::error::CoreDeskError;
use crate::ids::normalize_ticket_id;
use crate::models::{Ticket, TicketStatus};
use crate::timestamps::{current_timestamp, format_timestamp};

/// Destination of a bulk move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveTarget {
    SupportLevel1,
    SupportLevel2,
    SupportLevel3,
    Development,
    Waiting,
    Done,
    /// Unrecognized destination code, moved to in-progress.
    Other(String),
}

impl MoveTarget {
    /// Destination codes offered to operators.
    pub const KNOWN_CODES: [&'static str; 6] = [
        "suporte-n1",
        "suporte-n2",
        "suporte-n3",
        "desenvolvimento",
        "aguardando",
        "concluido",
    ];

    pub fn code(&self) -> &str {
        match self {
            MoveTarget::SupportLevel1 => "suporte-n1",
            MoveTarget::SupportLevel2 => "suporte-n2",
            MoveTarget::SupportLevel3 => "suporte-n3",
            MoveTarget::Development => "desenvolvimento",
            MoveTarget::Waiting => "aguardando",
            MoveTarget::Done => "concluido",
            MoveTarget::Other(code) => code,
        }
    }

    /// Status a ticket takes when moved here.
    pub fn status(&self) -> TicketStatus {
        match self {
            MoveTarget::Waiting => TicketStatus::Waiting,
            MoveTarget::Done => TicketStatus::Resolved,
            MoveTarget::SupportLevel1
            | MoveTarget::SupportLevel2
            | MoveTarget::SupportLevel3
            | MoveTarget::Development
            | MoveTarget::Other(_) => TicketStatus::InProgress,
        }
    }
}

impl Display for MoveTarget {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.code())
    }
}

impl FromStr for MoveTarget {
    type Err = CoreDeskError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let code = value.trim();
        match code {
            "" => Err(CoreDeskError::InvalidAction(
                "move target is required".to_string(),
            )),
            "suporte-n1" => Ok(MoveTarget::SupportLevel1),
            "suporte-n2" => Ok(MoveTarget::SupportLevel2),
            "suporte-n3" => Ok(MoveTarget::SupportLevel3),
            "desenvolvimento" => Ok(MoveTarget::Development),
            "aguardando" => Ok(MoveTarget::Waiting),
            "concluido" => Ok(MoveTarget::Done),
            other => {
                warn!(
                    code = other,
                    known = ?MoveTarget::KNOWN_CODES,
                    "unknown move target, tickets will be set in progress"
                );
                Ok(MoveTarget::Other(other.to_string()))
            }
        }
    }
}

/// Action applied uniformly to every selected ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BulkAction {
    Close,
    Reassign(String),
    Move(MoveTarget),
}

impl BulkAction {
    /// Build a reassignment, rejecting a blank assignee.
    ///
    /// # Errors
    /// Returns `CoreDeskError::InvalidAction` if `assignee` is blank.
    pub fn reassign(assignee: &str) -> Result<Self, CoreDeskError> {
        let trimmed = assignee.trim();
        if trimmed.is_empty() {
            return Err(CoreDeskError::InvalidAction(
                "assignee is required".to_string(),
            ));
        }
        Ok(BulkAction::Reassign(trimmed.to_string()))
    }

    /// Build a move from a destination code.
    ///
    /// # Errors
    /// Returns `CoreDeskError::InvalidAction` if `code` is blank.
    pub fn move_to(code: &str) -> Result<Self, CoreDeskError> {
        Ok(BulkAction::Move(code.parse()?))
    }

    fn apply(&self, ticket: &mut Ticket, timestamp: &str) {
        match self {
            BulkAction::Close => ticket.status = TicketStatus::Resolved,
            BulkAction::Reassign(assignee) => ticket.assignee = assignee.clone(),
            BulkAction::Move(target) => ticket.status = target.status(),
        }
        ticket.updated_at = timestamp.to_string();
    }
}

impl Display for BulkAction {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self {
            BulkAction::Close => write!(formatter, "close"),
            BulkAction::Reassign(assignee) => write!(formatter, "reassign to {assignee}"),
            BulkAction::Move(target) => write!(formatter, "move to {target}"),
        }
    }
}

/// Set of selected ticket identifiers, stored in canonical form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketSelection {
    identifiers: BTreeSet<String>,
}

impl TicketSelection {
    pub fn new() -> Self {
        TicketSelection::default()
    }

    /// Build a selection from identifiers in either representation.
    pub fn from_ids<I, S>(identifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut selection = TicketSelection::new();
        for identifier in identifiers {
            selection.select(identifier.as_ref());
        }
        selection
    }

    pub fn select(&mut self, identifier: &str) {
        let normalized = normalize_ticket_id(identifier);
        if !normalized.is_empty() {
            self.identifiers.insert(normalized);
        }
    }

    pub fn deselect(&mut self, identifier: &str) {
        self.identifiers.remove(&normalize_ticket_id(identifier));
    }

    /// Flip the selection state of one ticket.
    pub fn toggle(&mut self, identifier: &str) {
        let normalized = normalize_ticket_id(identifier);
        if !self.identifiers.remove(&normalized) {
            self.select(&normalized);
        }
    }

    /// Select every visible ticket, or clear when all are already selected.
    pub fn toggle_all<'a, I>(&mut self, visible: I)
    where
        I: IntoIterator<Item = &'a Ticket>,
    {
        let visible_ids: Vec<&str> = visible.into_iter().map(|ticket| ticket.id.as_str()).collect();
        let all_selected = !visible_ids.is_empty()
            && visible_ids
                .iter()
                .all(|identifier| self.identifiers.contains(*identifier));
        if all_selected {
            self.clear();
        } else {
            for identifier in visible_ids {
                self.select(identifier);
            }
        }
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.identifiers.contains(&normalize_ticket_id(identifier))
    }

    pub fn len(&self) -> usize {
        self.identifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.identifiers.is_empty()
    }

    pub fn clear(&mut self) {
        self.identifiers.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.identifiers.iter().map(String::as_str)
    }
}

/// Apply a bulk action using the current wall clock.
pub fn apply_bulk(
    tickets: &mut [Ticket],
    selection: &TicketSelection,
    action: &BulkAction,
) -> Vec<String> {
    apply_bulk_at(tickets, selection, action, current_timestamp())
}

/// Apply a bulk action to the selected tickets in place.
///
/// # Arguments
/// * `tickets` - Ticket collection.
/// * `selection` - Selected identifiers.
/// * `action` - Action to apply.
/// * `now` - Timestamp written to `updated_at`.
///
/// # Returns
/// Identifiers of the updated tickets, in collection order. Tickets outside
/// the selection are left untouched.
pub fn apply_bulk_at(
    tickets: &mut [Ticket],
    selection: &TicketSelection,
    action: &BulkAction,
    now: NaiveDateTime,
) -> Vec<String> {
    let timestamp = format_timestamp(now);
    let mut updated = Vec::new();
    for ticket in tickets.iter_mut() {
        if selection.contains(&ticket.id) {
            action.apply(ticket, &timestamp);
            updated.push(ticket.id.clone());
        }
    }
    info!(action = %action, selected = selection.len(), updated = updated.len(), "applied bulk action");
    updated
}

/// Apply a bulk action and clear the selection.
pub fn commit_bulk(
    tickets: &mut [Ticket],
    selection: &mut TicketSelection,
    action: &BulkAction,
) -> Vec<String> {
    commit_bulk_at(tickets, selection, action, current_timestamp())
}

/// Apply a bulk action at a given instant and clear the selection.
pub fn commit_bulk_at(
    tickets: &mut [Ticket],
    selection: &mut TicketSelection,
    action: &BulkAction,
    now: NaiveDateTime,
) -> Vec<String> {
    let updated = apply_bulk_at(tickets, selection, action, now);
    selection.clear();
    updated
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_codes_map_to_statuses() {
        for code in ["suporte-n1", "suporte-n2", "suporte-n3", "desenvolvimento"] {
            assert_eq!(code.parse::<MoveTarget>().unwrap().status(), TicketStatus::InProgress);
        }
        assert_eq!("aguardando".parse::<MoveTarget>().unwrap().status(), TicketStatus::Waiting);
        assert_eq!("concluido".parse::<MoveTarget>().unwrap().status(), TicketStatus::Resolved);
        assert_eq!("triagem".parse::<MoveTarget>().unwrap().status(), TicketStatus::InProgress);
    }

    #[test]
    fn blank_arguments_are_rejected() {
        assert!(BulkAction::reassign("   ").is_err());
        assert!(BulkAction::move_to("").is_err());
    }

    #[test]
    fn selection_normalizes_identifiers() {
        let mut selection = TicketSelection::from_ids(["#2024-001", "2024-002"]);
        assert!(selection.contains("2024-001"));
        assert!(selection.contains("#2024-002"));
        selection.toggle("#2024-001");
        assert_eq!(selection.len(), 1);
    }
}
