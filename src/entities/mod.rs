pub mod prelude;

pub mod activity_logs;
pub mod phrases;
pub mod users;
