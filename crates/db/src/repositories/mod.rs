//! Database repositories.

#![allow(missing_docs)]

pub mod complaint;
pub mod notification;
pub mod password_reset_token;
pub mod response;
pub mod stats;
pub mod status_history;
pub mod user;

pub use complaint::ComplaintRepository;
pub use notification::NotificationRepository;
pub use password_reset_token::PasswordResetTokenRepository;
pub use response::ResponseRepository;
pub use stats::StatsRepository;
pub use status_history::StatusHistoryRepository;
pub use user::UserRepository;
