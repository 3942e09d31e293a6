pub mod bulk_steps;
pub mod cli_steps;
pub mod sla_steps;
pub mod world;
