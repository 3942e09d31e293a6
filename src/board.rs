//! Kanban board grouping.

use crate::models::{Ticket, TicketStatus};

/// One board column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardColumn<'a> {
    pub status: TicketStatus,
    pub tickets: Vec<&'a Ticket>,
}

impl BoardColumn<'_> {
    pub fn count(&self) -> usize {
        self.tickets.len()
    }
}

/// Group tickets into status columns in lifecycle order.
///
/// Every status gets a column, even when empty. Tickets keep their relative
/// input order inside each column.
pub fn build_board<'a, I>(tickets: I) -> Vec<BoardColumn<'a>>
where
    I: IntoIterator<Item = &'a Ticket>,
{
    let mut columns: Vec<BoardColumn<'a>> = TicketStatus::ALL
        .into_iter()
        .map(|status| BoardColumn {
            status,
            tickets: Vec::new(),
        })
        .collect();
    for ticket in tickets {
        if let Some(column) = columns.iter_mut().find(|column| column.status == ticket.status) {
            column.tickets.push(ticket);
        }
    }
    columns
}
