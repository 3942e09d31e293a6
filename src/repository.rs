//! Ticket repository abstraction.

use chrono::NaiveDateTime;
use tracing::debug;

use crate::bulk::{apply_bulk_at, BulkAction, TicketSelection};
use crate::error::CoreDeskError;
use crate::ids::normalize_ticket_id;
use crate::models::Ticket;
use crate::ticket_update::{apply_ticket_update, TicketUpdate};
use crate::timestamps::current_timestamp;

/// Source of tickets consumed by the rules engine.
pub trait TicketRepository {
    /// All tickets in their stored order.
    fn list(&self) -> &[Ticket];

    /// Look up a ticket by identifier in either representation.
    ///
    /// # Errors
    /// Returns `CoreDeskError::TicketNotFound` if no ticket matches.
    fn get(&self, identifier: &str) -> Result<&Ticket, CoreDeskError>;

    /// Update a single ticket.
    ///
    /// # Errors
    /// Returns `CoreDeskError` if the ticket is missing or nothing changes.
    fn update(&mut self, identifier: &str, update: &TicketUpdate) -> Result<Ticket, CoreDeskError>;

    /// Apply a bulk action, returning the updated identifiers.
    fn bulk_update(&mut self, selection: &TicketSelection, action: &BulkAction) -> Vec<String>;
}

/// Repository holding tickets in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTicketRepository {
    tickets: Vec<Ticket>,
    fixed_now: Option<NaiveDateTime>,
}

impl InMemoryTicketRepository {
    pub fn new(tickets: Vec<Ticket>) -> Self {
        InMemoryTicketRepository {
            tickets,
            fixed_now: None,
        }
    }

    /// Repository stamping every mutation with `now` instead of the wall clock.
    pub fn with_fixed_clock(tickets: Vec<Ticket>, now: NaiveDateTime) -> Self {
        InMemoryTicketRepository {
            tickets,
            fixed_now: Some(now),
        }
    }

    /// Instant used for `updated_at` on the next mutation.
    pub fn now(&self) -> NaiveDateTime {
        self.fixed_now.unwrap_or_else(current_timestamp)
    }

    pub fn into_tickets(self) -> Vec<Ticket> {
        self.tickets
    }

    fn position(&self, identifier: &str) -> Result<usize, CoreDeskError> {
        let normalized = normalize_ticket_id(identifier);
        self.tickets
            .iter()
            .position(|ticket| ticket.id == normalized)
            .ok_or(CoreDeskError::TicketNotFound(normalized))
    }
}

impl TicketRepository for InMemoryTicketRepository {
    fn list(&self) -> &[Ticket] {
        &self.tickets
    }

    fn get(&self, identifier: &str) -> Result<&Ticket, CoreDeskError> {
        let index = self.position(identifier)?;
        Ok(&self.tickets[index])
    }

    fn update(&mut self, identifier: &str, update: &TicketUpdate) -> Result<Ticket, CoreDeskError> {
        let index = self.position(identifier)?;
        let now = self.now();
        let ticket = &mut self.tickets[index];
        apply_ticket_update(ticket, update, now)?;
        debug!(ticket = %ticket.id, "updated ticket");
        Ok(ticket.clone())
    }

    fn bulk_update(&mut self, selection: &TicketSelection, action: &BulkAction) -> Vec<String> {
        let now = self.now();
        apply_bulk_at(&mut self.tickets, selection, action, now)
    }
}
