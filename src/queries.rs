//! Query utilities for ticket listing.

use std::cmp::Reverse;
use std::collections::BTreeSet;
use std::str::FromStr;

use chrono::NaiveDateTime;
use tracing::debug;

use crate::error::CoreDeskError;
use crate::ids::format_ticket_id;
use crate::models::{Priority, SlaPolicy, Ticket, TicketStatus};
use crate::sla::evaluate_with_policy;
use crate::timestamps::parse_timestamp;

/// Sector restriction of a query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SectorFilter {
    #[default]
    All,
    Only(String),
}

impl SectorFilter {
    fn matches(&self, ticket: &Ticket) -> bool {
        match self {
            SectorFilter::All => true,
            SectorFilter::Only(sector) => ticket.sector_id == *sector,
        }
    }
}

impl FromStr for SectorFilter {
    type Err = CoreDeskError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed == "all" {
            return Ok(SectorFilter::All);
        }
        Ok(SectorFilter::Only(trimmed.to_string()))
    }
}

/// Criteria combined with logical AND when filtering tickets.
///
/// Within `statuses` and `priorities`, membership is OR. An empty set lets
/// every value through.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketCriteria {
    pub search_term: String,
    pub statuses: BTreeSet<TicketStatus>,
    pub priorities: BTreeSet<Priority>,
    pub sector: SectorFilter,
    /// Keep only new tickets or tickets with an unanswered customer reply.
    pub needs_attention: bool,
    /// Restrict to tickets opened by this requester.
    pub requester: Option<String>,
}

impl TicketCriteria {
    /// Criteria of the general ticket list: everything passes.
    pub fn all() -> Self {
        TicketCriteria::default()
    }

    /// Criteria of the dashboard's recent activity surface.
    pub fn recent_activity() -> Self {
        TicketCriteria {
            needs_attention: true,
            ..TicketCriteria::default()
        }
    }

    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search_term = term.into();
        self
    }

    pub fn with_status(mut self, status: TicketStatus) -> Self {
        self.statuses.insert(status);
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priorities.insert(priority);
        self
    }

    pub fn with_sector(mut self, sector: SectorFilter) -> Self {
        self.sector = sector;
        self
    }

    pub fn with_requester(mut self, requester: impl Into<String>) -> Self {
        self.requester = Some(requester.into());
        self
    }

    /// Whether a single ticket satisfies every active criterion.
    pub fn matches(&self, ticket: &Ticket) -> bool {
        matches_search(ticket, &self.search_term)
            && (self.statuses.is_empty() || self.statuses.contains(&ticket.status))
            && (self.priorities.is_empty() || self.priorities.contains(&ticket.priority))
            && self.sector.matches(ticket)
            && (!self.needs_attention || needs_attention(ticket))
            && self
                .requester
                .as_deref()
                .is_none_or(|requester| ticket.requester == requester)
    }
}

/// Whether a ticket belongs on the recent activity surface.
pub fn needs_attention(ticket: &Ticket) -> bool {
    ticket.status == TicketStatus::New || ticket.has_customer_reply
}

fn matches_search(ticket: &Ticket, term: &str) -> bool {
    let term = term.trim();
    if term.is_empty() {
        return true;
    }
    let lowered = term.to_lowercase();
    ticket.title.to_lowercase().contains(&lowered)
        || ticket.id.to_lowercase().contains(&lowered)
        || format_ticket_id(&ticket.id).to_lowercase().contains(&lowered)
        || ticket.requester.to_lowercase().contains(&lowered)
        || ticket.description.to_lowercase().contains(&lowered)
}

/// Filter tickets by the given criteria.
///
/// # Arguments
/// * `tickets` - Tickets to filter.
/// * `criteria` - Active criteria.
///
/// # Returns
/// Matching tickets in their original relative order.
pub fn filter_tickets<'a>(tickets: &'a [Ticket], criteria: &TicketCriteria) -> Vec<&'a Ticket> {
    let visible: Vec<&Ticket> = tickets
        .iter()
        .filter(|ticket| criteria.matches(ticket))
        .collect();
    debug!(
        total = tickets.len(),
        visible = visible.len(),
        "filtered tickets"
    );
    visible
}

/// Sort tickets by a supported key.
///
/// # Arguments
/// * `tickets` - Tickets to sort.
/// * `sort_key` - One of `priority`, `created`, `updated` or `overdue`.
/// * `policy` - Policy used by the `overdue` key.
/// * `now` - Instant used by the `overdue` key.
///
/// # Errors
/// Returns `CoreDeskError::TicketOperation` if the sort key is unsupported.
pub fn sort_tickets<'a>(
    mut tickets: Vec<&'a Ticket>,
    sort_key: Option<&str>,
    policy: &SlaPolicy,
    now: NaiveDateTime,
) -> Result<Vec<&'a Ticket>, CoreDeskError> {
    let Some(key) = sort_key else {
        return Ok(tickets);
    };

    match key {
        "priority" => tickets.sort_by_key(|ticket| Reverse(ticket.priority)),
        "created" => tickets.sort_by_key(|ticket| Reverse(parse_timestamp(&ticket.created_at))),
        "updated" => tickets.sort_by_key(|ticket| Reverse(parse_timestamp(&ticket.updated_at))),
        "overdue" => tickets.sort_by_key(|ticket| {
            Reverse(evaluate_with_policy(ticket, policy, now).hours_overdue)
        }),
        _ => return Err(CoreDeskError::TicketOperation("invalid sort key".to_string())),
    }
    Ok(tickets)
}
