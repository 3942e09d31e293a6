use cucumber::{given, then, when};

use coredesk::bulk::{commit_bulk_at, BulkAction};
use coredesk::fixtures::mock_tickets;
use coredesk::ids::normalize_ticket_id;
use coredesk::models::TicketStatus;
use coredesk::timestamps::format_timestamp;

use crate::step_definitions::world::CoreDeskWorld;

fn split_identifiers(list: &str) -> Vec<String> {
    list.split(',')
        .map(normalize_ticket_id)
        .filter(|identifier| !identifier.is_empty())
        .collect()
}

fn commit(world: &mut CoreDeskWorld, action: BulkAction) {
    let now = world.now();
    world.touched = world.selection.iter().map(str::to_string).collect();
    commit_bulk_at(&mut world.tickets, &mut world.selection, &action, now);
}

#[given("the mock ticket collection")]
fn given_mock_tickets(world: &mut CoreDeskWorld) {
    world.tickets = mock_tickets();
    world.original_tickets = world.tickets.clone();
}

#[when(expr = "I select tickets {string}")]
fn when_select_tickets(world: &mut CoreDeskWorld, list: String) {
    for identifier in split_identifiers(&list) {
        world.selection.select(&identifier);
    }
}

#[when("I toggle all visible tickets")]
fn when_toggle_all(world: &mut CoreDeskWorld) {
    let CoreDeskWorld {
        selection, tickets, ..
    } = world;
    selection.toggle_all(tickets.iter());
}

#[when("I close the selection")]
fn when_close_selection(world: &mut CoreDeskWorld) {
    commit(world, BulkAction::Close);
}

#[when(expr = "I move the selection to {string}")]
fn when_move_selection(world: &mut CoreDeskWorld, code: String) {
    match BulkAction::move_to(&code) {
        Ok(action) => commit(world, action),
        Err(error) => world.error = Some(error),
    }
}

#[when(expr = "I reassign the selection to {string}")]
fn when_reassign_selection(world: &mut CoreDeskWorld, assignee: String) {
    match BulkAction::reassign(&assignee) {
        Ok(action) => commit(world, action),
        Err(error) => world.error = Some(error),
    }
}

#[then(expr = "tickets {string} have status {string}")]
fn then_tickets_have_status(world: &mut CoreDeskWorld, list: String, status: String) {
    let expected: TicketStatus = status.parse().expect("status");
    for identifier in split_identifiers(&list) {
        let ticket = world
            .tickets
            .iter()
            .find(|ticket| ticket.id == identifier)
            .expect("ticket");
        assert_eq!(ticket.status, expected);
        assert_eq!(ticket.updated_at, format_timestamp(world.now()));
    }
}

#[then(expr = "tickets {string} are assigned to {string}")]
fn then_tickets_assigned(world: &mut CoreDeskWorld, list: String, assignee: String) {
    for identifier in split_identifiers(&list) {
        let ticket = world
            .tickets
            .iter()
            .find(|ticket| ticket.id == identifier)
            .expect("ticket");
        assert_eq!(ticket.assignee, assignee);
    }
}

#[then("the other tickets are unchanged")]
fn then_other_tickets_unchanged(world: &mut CoreDeskWorld) {
    for (after, before) in world.tickets.iter().zip(&world.original_tickets) {
        if !world.touched.contains(&before.id) {
            assert_eq!(after, before);
        }
    }
}

#[then(expr = "the selection holds {int} tickets")]
fn then_selection_size(world: &mut CoreDeskWorld, count: usize) {
    assert_eq!(world.selection.len(), count);
}

#[then(expr = "the action fails with {string}")]
fn then_action_fails(world: &mut CoreDeskWorld, message: String) {
    let error = world.error.as_ref().expect("error");
    assert_eq!(error.to_string(), message);
}
