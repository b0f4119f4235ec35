mod export;
mod import;
mod search;
mod users;

pub use export::cmd_export;
pub use import::cmd_import;
pub use search::cmd_search;
pub use users::{cmd_users_add, cmd_users_list, cmd_users_remove, cmd_users_reset_password};

/// Name recorded in the activity log for operations run from the terminal.
pub const CLI_ACTOR: &str = "cli";
