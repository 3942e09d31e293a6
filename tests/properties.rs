use chrono::{Duration, NaiveDate, NaiveDateTime};
use proptest::prelude::*;

use coredesk::bulk::{apply_bulk_at, BulkAction, TicketSelection};
use coredesk::ids::{format_ticket_id, normalize_ticket_id};
use coredesk::models::{AlertLevel, Priority, SlaPolicy, Ticket, TicketStatus};
use coredesk::queries::{filter_tickets, TicketCriteria};
use coredesk::sla::evaluate_with_policy;
use coredesk::timestamps::format_timestamp;

fn fixed_now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 20)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

fn priority_strategy() -> impl Strategy<Value = Priority> {
    prop::sample::select(Priority::ALL.to_vec())
}

fn status_strategy() -> impl Strategy<Value = TicketStatus> {
    prop::sample::select(TicketStatus::ALL.to_vec())
}

fn ticket_strategy() -> impl Strategy<Value = Ticket> {
    (
        1u32..999,
        priority_strategy(),
        status_strategy(),
        0i64..400 * 60,
        any::<bool>(),
        prop::sample::select(vec!["suporte-n1", "suporte-n2", "financeiro"]),
    )
        .prop_map(|(number, priority, status, minutes, replied, sector)| {
            let created = format_timestamp(fixed_now() - Duration::minutes(minutes));
            Ticket {
                id: format!("2024-{number:03}"),
                title: format!("Chamado {number}"),
                description: String::new(),
                priority,
                status,
                category: "Sistema".to_string(),
                sector_id: sector.to_string(),
                assignee: String::new(),
                requester: "Maria Silva".to_string(),
                created_at: created.clone(),
                updated_at: created,
                responses: 0,
                attachments: 0,
                has_customer_reply: replied,
            }
        })
}

proptest! {
    #[test]
    fn overdue_hours_never_decrease_as_time_passes(
        ticket in ticket_strategy(),
        first in 0i64..200,
        extra in 0i64..200,
    ) {
        let policy = SlaPolicy::default();
        let earlier = evaluate_with_policy(&ticket, &policy, fixed_now() + Duration::hours(first));
        let later = evaluate_with_policy(
            &ticket,
            &policy,
            fixed_now() + Duration::hours(first + extra),
        );
        prop_assert!(later.hours_overdue >= earlier.hours_overdue);
        if earlier.is_critical {
            prop_assert!(later.is_critical);
        }
    }

    #[test]
    fn exempt_tickets_are_never_critical(ticket in ticket_strategy(), hours in 0i64..10_000) {
        let exempt = ticket.status == TicketStatus::Resolved || !ticket.priority.is_sla_tracked();
        let alert = evaluate_with_policy(&ticket, &SlaPolicy::default(), fixed_now() + Duration::hours(hours));
        if exempt {
            prop_assert!(!alert.is_critical);
            prop_assert_eq!(alert.hours_overdue, 0);
        }
        prop_assert_eq!(alert.is_critical, alert.hours_overdue > 0);
        if alert.alert_level == AlertLevel::Severe {
            prop_assert!(alert.hours_overdue > 48);
        }
    }

    #[test]
    fn filter_equals_conjunction_of_criteria(
        tickets in prop::collection::vec(ticket_strategy(), 0..20),
        statuses in prop::collection::btree_set(status_strategy(), 0..3),
        priorities in prop::collection::btree_set(priority_strategy(), 0..3),
    ) {
        let mut criteria = TicketCriteria::all();
        for status in &statuses {
            criteria = criteria.with_status(*status);
        }
        for priority in &priorities {
            criteria = criteria.with_priority(*priority);
        }
        let visible: Vec<&Ticket> = filter_tickets(&tickets, &criteria);
        let expected: Vec<&Ticket> = tickets
            .iter()
            .filter(|ticket| statuses.is_empty() || statuses.contains(&ticket.status))
            .filter(|ticket| priorities.is_empty() || priorities.contains(&ticket.priority))
            .collect();
        prop_assert_eq!(visible, expected);
    }

    #[test]
    fn statuses_within_a_field_give_the_union(
        tickets in prop::collection::vec(ticket_strategy(), 0..20),
        first in status_strategy(),
        second in status_strategy(),
    ) {
        let both = TicketCriteria::all().with_status(first).with_status(second);
        let combined: Vec<&Ticket> = filter_tickets(&tickets, &both);
        let singles: Vec<Vec<&Ticket>> = [first, second]
            .into_iter()
            .map(|status| filter_tickets(&tickets, &TicketCriteria::all().with_status(status)))
            .collect();
        let union: Vec<&Ticket> = tickets
            .iter()
            .filter(|ticket| {
                singles
                    .iter()
                    .any(|single| single.iter().any(|matched| std::ptr::eq(*matched, *ticket)))
            })
            .collect();
        prop_assert_eq!(combined, union);
    }

    #[test]
    fn priorities_within_a_field_give_the_union(
        tickets in prop::collection::vec(ticket_strategy(), 0..20),
        first in priority_strategy(),
        second in priority_strategy(),
    ) {
        let both = TicketCriteria::all().with_priority(first).with_priority(second);
        let combined: Vec<&Ticket> = filter_tickets(&tickets, &both);
        let expected: Vec<&Ticket> = tickets
            .iter()
            .filter(|ticket| {
                let single = |priority| {
                    TicketCriteria::all().with_priority(priority).matches(ticket)
                };
                single(first) || single(second)
            })
            .collect();
        prop_assert_eq!(combined, expected);
    }

    #[test]
    fn bulk_leaves_unselected_tickets_untouched(
        tickets in prop::collection::vec(ticket_strategy(), 1..12),
        picks in prop::collection::vec(any::<bool>(), 12),
    ) {
        let original = tickets.clone();
        let mut tickets = tickets;
        let selection = TicketSelection::from_ids(
            original
                .iter()
                .zip(&picks)
                .filter(|(_, picked)| **picked)
                .map(|(ticket, _)| format_ticket_id(&ticket.id)),
        );
        apply_bulk_at(&mut tickets, &selection, &BulkAction::Close, fixed_now());
        for (after, before) in tickets.iter().zip(&original) {
            if selection.contains(&before.id) {
                prop_assert_eq!(after.status, TicketStatus::Resolved);
            } else {
                prop_assert_eq!(after, before);
            }
        }
    }

    #[test]
    fn identifier_display_form_has_exactly_one_marker(raw in "#{0,3}[0-9]{4}-[0-9]{3}") {
        let display = format_ticket_id(&raw);
        prop_assert!(display.starts_with('#'));
        prop_assert!(!display[1..].starts_with('#'));
        prop_assert_eq!(normalize_ticket_id(&display), normalize_ticket_id(&raw));
    }
}
