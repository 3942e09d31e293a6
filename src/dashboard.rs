//! Dashboard summary figures.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::models::{AlertLevel, Priority, SlaPolicy, Ticket, TicketStatus};
use crate::queries::needs_attention;
use crate::sla::evaluate_with_policy;

/// Aggregate counts shown on the operator dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    pub total: usize,
    pub by_status: BTreeMap<TicketStatus, usize>,
    pub by_priority: BTreeMap<Priority, usize>,
    /// Overdue tickets at the critical tier.
    pub critical: usize,
    /// Overdue tickets at the severe tier.
    pub severe: usize,
    /// Open tickets with nobody assigned.
    pub unassigned: usize,
    /// Tickets on the recent activity surface.
    pub needs_attention: usize,
}

/// Summarize a ticket collection.
pub fn summarize<'a, I>(tickets: I, policy: &SlaPolicy, now: NaiveDateTime) -> DashboardSummary
where
    I: IntoIterator<Item = &'a Ticket>,
{
    let mut summary = DashboardSummary {
        total: 0,
        by_status: TicketStatus::ALL.into_iter().map(|status| (status, 0)).collect(),
        by_priority: Priority::ALL.into_iter().map(|priority| (priority, 0)).collect(),
        critical: 0,
        severe: 0,
        unassigned: 0,
        needs_attention: 0,
    };

    for ticket in tickets {
        summary.total += 1;
        let alert = evaluate_with_policy(ticket, policy, now);
        *summary.by_status.entry(ticket.status).or_default() += 1;
        *summary.by_priority.entry(ticket.priority).or_default() += 1;
        match alert.visible_level() {
            Some(AlertLevel::Severe) => summary.severe += 1,
            Some(AlertLevel::Critical) => summary.critical += 1,
            _ => {}
        }
        if ticket.is_unassigned() && !ticket.status.is_closed() {
            summary.unassigned += 1;
        }
        if needs_attention(ticket) {
            summary.needs_attention += 1;
        }
    }

    summary
}
