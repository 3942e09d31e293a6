//! SLA alert evaluation.
//!
//! Only open `high` and `urgent` tickets are tracked. A tracked ticket is
//! critical once the hours elapsed since creation exceed its priority's
//! limit, and severe once the overdue hours exceed the policy's severe
//! threshold.

use chrono::NaiveDateTime;
use tracing::{debug, warn};

use crate::models::{AlertLevel, CriticalAlert, Priority, SlaPolicy, Ticket};
use crate::timestamps::{current_timestamp, parse_timestamp};

const MILLISECONDS_PER_HOUR: i64 = 3_600_000;

/// Fill treatment of an alert badge or row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertFill {
    None,
    Light,
    Solid,
}

/// Ring highlight around an alert badge or row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertRing {
    None,
    Thin,
    Strong,
}

/// Visual treatment keyed by alert level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlertStyle {
    pub fill: AlertFill,
    pub ring: AlertRing,
}

impl AlertStyle {
    /// Whether the style renders anything at all.
    pub fn is_empty(&self) -> bool {
        self.fill == AlertFill::None && self.ring == AlertRing::None
    }
}

/// Map an alert level to its visual treatment.
///
/// `Warning` maps to the empty style; it is never shown because
/// `is_critical` gates visibility.
pub fn alert_style(level: AlertLevel) -> AlertStyle {
    match level {
        AlertLevel::Severe => AlertStyle {
            fill: AlertFill::Solid,
            ring: AlertRing::Strong,
        },
        AlertLevel::Critical => AlertStyle {
            fill: AlertFill::Light,
            ring: AlertRing::Thin,
        },
        AlertLevel::Warning => AlertStyle {
            fill: AlertFill::None,
            ring: AlertRing::None,
        },
    }
}

/// Evaluate a ticket against the default policy using the current wall clock.
pub fn evaluate(ticket: &Ticket) -> CriticalAlert {
    evaluate_at(ticket, current_timestamp())
}

/// Evaluate a ticket against the default policy at a given instant.
pub fn evaluate_at(ticket: &Ticket, now: NaiveDateTime) -> CriticalAlert {
    evaluate_with_policy(ticket, &SlaPolicy::default(), now)
}

/// Evaluate a ticket against an explicit policy.
///
/// # Arguments
/// * `ticket` - Ticket to evaluate.
/// * `policy` - Resolution time budgets.
/// * `now` - Wall-clock instant to measure against.
///
/// # Returns
/// The derived alert. Tickets outside SLA tracking, and tickets whose
/// creation timestamp cannot be parsed, yield `CriticalAlert::not_critical()`.
pub fn evaluate_with_policy(
    ticket: &Ticket,
    policy: &SlaPolicy,
    now: NaiveDateTime,
) -> CriticalAlert {
    if !ticket.priority.is_sla_tracked() || ticket.status.is_closed() {
        return CriticalAlert::not_critical();
    }

    let Some(created) = parse_timestamp(&ticket.created_at) else {
        warn!(
            ticket = %ticket.id,
            created_at = %ticket.created_at,
            "unparseable creation timestamp, treating ticket as not critical"
        );
        return CriticalAlert::not_critical();
    };

    let elapsed_hours = (now - created)
        .num_milliseconds()
        .div_euclid(MILLISECONDS_PER_HOUR);
    let limit = i64::try_from(time_limit_hours(ticket.priority, policy)).unwrap_or(i64::MAX);
    let hours_overdue = u64::try_from(elapsed_hours.saturating_sub(limit)).unwrap_or(0);

    let alert = if hours_overdue > policy.severe_after_hours {
        CriticalAlert {
            is_critical: true,
            hours_overdue,
            alert_level: AlertLevel::Severe,
        }
    } else if hours_overdue > 0 {
        CriticalAlert {
            is_critical: true,
            hours_overdue,
            alert_level: AlertLevel::Critical,
        }
    } else {
        CriticalAlert::not_critical()
    };

    debug!(
        ticket = %ticket.id,
        elapsed_hours,
        hours_overdue,
        level = %alert.alert_level,
        "evaluated sla"
    );
    alert
}

/// Evaluate every ticket once, preserving input order.
pub fn evaluate_all<'a>(
    tickets: &'a [Ticket],
    policy: &SlaPolicy,
    now: NaiveDateTime,
) -> Vec<(&'a Ticket, CriticalAlert)> {
    tickets
        .iter()
        .map(|ticket| (ticket, evaluate_with_policy(ticket, policy, now)))
        .collect()
}

/// Resolution budget for a tracked priority.
pub fn time_limit_hours(priority: Priority, policy: &SlaPolicy) -> u64 {
    if priority == Priority::Urgent {
        policy.urgent_limit_hours
    } else {
        policy.high_limit_hours
    }
}
