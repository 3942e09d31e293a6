use chrono::Duration;
use cucumber::{given, then, when};

use coredesk::models::{AlertLevel, Priority, Ticket, TicketStatus};
use coredesk::sla::evaluate_at;
use coredesk::timestamps::format_timestamp;

use crate::step_definitions::world::CoreDeskWorld;

fn build_ticket(identifier: &str, priority: &str, status: &str, created_at: String) -> Ticket {
    let ticket: Ticket = serde_json::from_value(serde_json::json!({
        "id": identifier,
        "title": "Chamado de teste",
        "description": "",
        "priority": priority.parse::<Priority>().expect("priority"),
        "status": status.parse::<TicketStatus>().expect("status"),
        "category": "Sistema",
        "sectorId": "suporte-n1",
        "assignee": "",
        "requester": "Maria Silva",
        "createdAt": created_at,
        "updatedAt": created_at,
        "responses": 0,
        "attachments": 0,
        "hasCustomerReply": false,
    }))
    .expect("build ticket");
    ticket
}

#[given(expr = "a {string} ticket {string} with status {string} created {int} hours ago")]
fn given_ticket_created_hours_ago(
    world: &mut CoreDeskWorld,
    priority: String,
    identifier: String,
    status: String,
    hours: i64,
) {
    let created_at = format_timestamp(world.now() - Duration::hours(hours));
    world.tickets = vec![build_ticket(&identifier, &priority, &status, created_at)];
}

#[given(expr = "a {string} ticket {string} with status {string} created at {string}")]
fn given_ticket_created_at(
    world: &mut CoreDeskWorld,
    priority: String,
    identifier: String,
    status: String,
    created_at: String,
) {
    world.tickets = vec![build_ticket(&identifier, &priority, &status, created_at)];
}

#[when("the SLA of the ticket is evaluated")]
fn when_sla_evaluated(world: &mut CoreDeskWorld) {
    let ticket = world.tickets.first().expect("ticket");
    world.alert = Some(evaluate_at(ticket, world.now()));
}

#[then(expr = "the ticket is critical with {int} hours overdue")]
fn then_ticket_critical(world: &mut CoreDeskWorld, hours: u64) {
    let alert = world.alert.expect("alert");
    assert!(alert.is_critical);
    assert_eq!(alert.hours_overdue, hours);
}

#[then("the ticket is not critical")]
fn then_ticket_not_critical(world: &mut CoreDeskWorld) {
    let alert = world.alert.expect("alert");
    assert!(!alert.is_critical);
    assert_eq!(alert.hours_overdue, 0);
}

#[then(expr = "the alert level is {string}")]
fn then_alert_level(world: &mut CoreDeskWorld, level: String) {
    let alert = world.alert.expect("alert");
    let expected = match level.as_str() {
        "warning" => AlertLevel::Warning,
        "critical" => AlertLevel::Critical,
        "severe" => AlertLevel::Severe,
        other => panic!("unknown alert level {other}"),
    };
    assert_eq!(alert.alert_level, expected);
}

#[then(expr = "the ticket identifier is {string}")]
fn then_ticket_identifier(world: &mut CoreDeskWorld, identifier: String) {
    assert_eq!(world.tickets[0].id, identifier);
}
