pub mod activity;
pub use activity::ActivityLog;

pub mod export;

pub mod auth_service;
pub mod auth_service_impl;
pub use auth_service::{AuthError, AuthService, PasswordChange, UserInfo};
pub use auth_service_impl::SeaOrmAuthService;

pub mod phrase_service;
pub mod phrase_service_impl;
pub use phrase_service::{PhraseError, PhraseInput, PhraseSearch, PhraseService};
pub use phrase_service_impl::SeaOrmPhraseService;

pub mod import_service;
pub mod import_service_impl;
pub use import_service::{ImportService, ImportSummary};
pub use import_service_impl::DefaultImportService;
