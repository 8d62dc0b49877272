//! Database entities.

#![allow(missing_docs)]

pub mod complaint;
pub mod notification;
pub mod password_reset_token;
pub mod response;
pub mod status_history;
pub mod user;

pub use complaint::Entity as Complaint;
pub use notification::Entity as Notification;
pub use password_reset_token::Entity as PasswordResetToken;
pub use response::Entity as Response;
pub use status_history::Entity as StatusHistory;
pub use user::Entity as User;
