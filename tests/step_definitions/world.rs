use std::path::PathBuf;

use chrono::NaiveDateTime;
use cucumber::{given, World};
use tempfile::TempDir;

use coredesk::bulk::TicketSelection;
use coredesk::error::CoreDeskError;
use coredesk::models::{CriticalAlert, Ticket};
use coredesk::timestamps::parse_timestamp;

#[derive(Debug, Default, World)]
pub struct CoreDeskWorld {
    pub now: Option<NaiveDateTime>,
    pub tickets: Vec<Ticket>,
    pub original_tickets: Vec<Ticket>,
    pub selection: TicketSelection,
    pub touched: Vec<String>,
    pub alert: Option<CriticalAlert>,
    pub error: Option<CoreDeskError>,
    pub temp_dir: Option<TempDir>,
    pub working_directory: Option<PathBuf>,
    pub exit_code: Option<i32>,
    pub stdout: Option<String>,
    pub stderr: Option<String>,
}

impl CoreDeskWorld {
    pub fn now(&self) -> NaiveDateTime {
        self.now.expect("clock not set")
    }
}

#[given(expr = "the clock reads {string}")]
fn given_clock_reads(world: &mut CoreDeskWorld, value: String) {
    world.now = Some(parse_timestamp(&value).expect("parse clock"));
}
