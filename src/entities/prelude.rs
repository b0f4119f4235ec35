pub use super::activity_logs::Entity as ActivityLogs;
pub use super::phrases::Entity as Phrases;
pub use super::users::Entity as Users;
