//! Business logic services.

#![allow(missing_docs)]

pub mod account;
pub mod complaint;
pub mod email;
pub mod notification;
pub mod password_reset;
pub mod scope;
pub mod stats;

pub use account::{
    AccountService, RegisterAdminInput, RegisterStudentInput, UpdateProfileInput,
};
pub use complaint::{
    ComplaintDetail, ComplaintService, StatusUpdateOutcome, SubmitComplaintInput,
};
pub use email::EmailService;
pub use notification::{CreateNotificationInput, NotificationService};
pub use password_reset::PasswordResetService;
pub use scope::ComplaintScope;
pub use stats::{Analytics, AnalyticsFilter, AnalyticsSummary, OverviewStats, StatsService};
