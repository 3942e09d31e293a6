//! CoreDesk data models.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreDeskError;
use crate::ids::deserialize_ticket_id;

/// Ticket priority, ordered by increasing severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

impl Priority {
    /// All priorities from least to most severe.
    pub const ALL: [Priority; 4] = [
        Priority::Low,
        Priority::Medium,
        Priority::High,
        Priority::Urgent,
    ];

    /// Wire label of the priority.
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Urgent => "urgent",
        }
    }

    /// Whether tickets of this priority are tracked against an SLA.
    pub fn is_sla_tracked(&self) -> bool {
        matches!(self, Priority::High | Priority::Urgent)
    }
}

impl Display for Priority {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = CoreDeskError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            "urgent" => Ok(Priority::Urgent),
            other => Err(CoreDeskError::InvalidAction(format!(
                "unknown priority '{other}'"
            ))),
        }
    }
}

/// Ticket status, declared in lifecycle order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TicketStatus {
    #[serde(rename = "Novo")]
    New,
    #[serde(rename = "Em Andamento")]
    InProgress,
    #[serde(rename = "Aguardando")]
    Waiting,
    #[serde(rename = "Resolvido")]
    Resolved,
}

impl TicketStatus {
    /// All statuses in lifecycle order.
    pub const ALL: [TicketStatus; 4] = [
        TicketStatus::New,
        TicketStatus::InProgress,
        TicketStatus::Waiting,
        TicketStatus::Resolved,
    ];

    /// Label shown to users and used on the wire.
    pub fn label(&self) -> &'static str {
        match self {
            TicketStatus::New => "Novo",
            TicketStatus::InProgress => "Em Andamento",
            TicketStatus::Waiting => "Aguardando",
            TicketStatus::Resolved => "Resolvido",
        }
    }

    /// Command-line friendly key.
    pub fn key(&self) -> &'static str {
        match self {
            TicketStatus::New => "novo",
            TicketStatus::InProgress => "em-andamento",
            TicketStatus::Waiting => "aguardando",
            TicketStatus::Resolved => "resolvido",
        }
    }

    /// Resolved tickets are closed for SLA purposes.
    pub fn is_closed(&self) -> bool {
        matches!(self, TicketStatus::Resolved)
    }
}

impl Display for TicketStatus {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.label())
    }
}

impl FromStr for TicketStatus {
    type Err = CoreDeskError;

    /// Accepts the display label or the key, ignoring case.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_lowercase().replace(['_', ' '], "-");
        TicketStatus::ALL
            .into_iter()
            .find(|status| status.key() == normalized)
            .ok_or_else(|| CoreDeskError::InvalidAction(format!("unknown status '{}'", value.trim())))
    }
}

/// Organizational queue a ticket is routed to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sector {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
}

/// Support ticket record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    /// Canonical identifier, never carrying the `#` display marker.
    #[serde(deserialize_with = "deserialize_ticket_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub priority: Priority,
    pub status: TicketStatus,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub sector_id: String,
    /// Empty when unassigned.
    #[serde(default)]
    pub assignee: String,
    #[serde(default)]
    pub requester: String,
    /// Wall-clock creation time formatted as `YYYY-MM-DD HH:mm`.
    pub created_at: String,
    pub updated_at: String,
    #[serde(default)]
    pub responses: u32,
    #[serde(default)]
    pub attachments: u32,
    #[serde(default)]
    pub has_customer_reply: bool,
}

impl Ticket {
    /// Whether nobody is responsible for the ticket yet.
    pub fn is_unassigned(&self) -> bool {
        self.assignee.trim().is_empty()
    }
}

/// Severity tier of an overdue ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Warning,
    Critical,
    Severe,
}

impl AlertLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertLevel::Warning => "warning",
            AlertLevel::Critical => "critical",
            AlertLevel::Severe => "severe",
        }
    }
}

impl Display for AlertLevel {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Derived SLA state of a ticket. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CriticalAlert {
    pub is_critical: bool,
    pub hours_overdue: u64,
    /// Meaningless while `is_critical` is false.
    pub alert_level: AlertLevel,
}

impl CriticalAlert {
    /// Inert default returned for tickets outside SLA tracking.
    pub const fn not_critical() -> Self {
        CriticalAlert {
            is_critical: false,
            hours_overdue: 0,
            alert_level: AlertLevel::Warning,
        }
    }

    /// Alert level to render, if any.
    pub fn visible_level(&self) -> Option<AlertLevel> {
        self.is_critical.then_some(self.alert_level)
    }
}

impl Default for CriticalAlert {
    fn default() -> Self {
        CriticalAlert::not_critical()
    }
}

/// Resolution time budgets, in whole hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SlaPolicy {
    pub urgent_limit_hours: u64,
    pub high_limit_hours: u64,
    /// Overdue hours beyond which an alert becomes severe.
    pub severe_after_hours: u64,
}

impl SlaPolicy {
    /// Largest accepted budget or threshold (ten years).
    pub const MAX_HOURS: u64 = 87_600;
}

impl Default for SlaPolicy {
    fn default() -> Self {
        SlaPolicy {
            urgent_limit_hours: 24,
            high_limit_hours: 72,
            severe_after_hours: 48,
        }
    }
}

/// Configuration loaded from .coredesk.yml.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CoreDeskConfiguration {
    #[serde(default)]
    pub sla: SlaPolicy,
    pub sectors: Vec<Sector>,
    /// Ticket fixture file, relative to the configuration file.
    #[serde(default)]
    pub tickets_path: Option<String>,
}

impl CoreDeskConfiguration {
    /// Look up a sector by identifier.
    pub fn sector(&self, identifier: &str) -> Option<&Sector> {
        self.sectors.iter().find(|sector| sector.id == identifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_labels_and_keys() {
        assert_eq!("Em Andamento".parse::<TicketStatus>().unwrap(), TicketStatus::InProgress);
        assert_eq!("em_andamento".parse::<TicketStatus>().unwrap(), TicketStatus::InProgress);
        assert_eq!("RESOLVIDO".parse::<TicketStatus>().unwrap(), TicketStatus::Resolved);
        assert!("closed".parse::<TicketStatus>().is_err());
    }

    #[test]
    fn priority_orders_by_severity() {
        assert!(Priority::Urgent > Priority::High);
        assert!(Priority::High > Priority::Medium);
        assert!(Priority::Medium > Priority::Low);
    }

    #[test]
    fn ticket_deserializes_with_hash_prefixed_id() {
        let json = r##"{
            "id": "#2024-001",
            "title": "Printer offline",
            "priority": "urgent",
            "status": "Em Andamento",
            "sectorId": "suporte",
            "createdAt": "2024-01-15 10:30",
            "updatedAt": "2024-01-15 11:00",
            "hasCustomerReply": true
        }"##;
        let ticket: Ticket = serde_json::from_str(json).unwrap();
        assert_eq!(ticket.id, "2024-001");
        assert_eq!(ticket.status, TicketStatus::InProgress);
        assert!(ticket.has_customer_reply);
        assert!(ticket.is_unassigned());
    }
}
