//! CoreDesk ticket rules engine.

pub mod board;
pub mod bulk;
pub mod cli;
pub mod config;
pub mod config_loader;
pub mod dashboard;
pub mod error;
pub mod fixtures;
pub mod ids;
pub mod local_storage;
pub mod models;
pub mod queries;
pub mod repository;
pub mod session;
pub mod sla;
pub mod ticket_display;
pub mod ticket_line;
pub mod ticket_update;
pub mod timestamps;
