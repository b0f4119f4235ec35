pub mod logs;
pub mod phrase;
pub mod user;
