mod admin;
mod commands;

pub use admin::{run_admin_init, run_set_password};
pub use commands::AdminCommands;
