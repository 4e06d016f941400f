pub mod admin_service;
pub mod event_service;
pub mod file_service;
pub mod job_service;
pub mod notification_service;
pub mod profile_service;
pub mod tpo_service;
pub mod user_service;

pub use admin_service::{AccountRow, AdminService};
pub use event_service::EventService;
pub use file_service::{DocumentFlags, FileService, PendingCertificate};
pub use job_service::{ApplicationDraft, JobApplicationCount, JobService};
pub use notification_service::{group_broadcasts, NotificationService};
pub use profile_service::{ProfileService, ReviewDecision};
pub use tpo_service::{ApprovedStudent, DashboardSummary, PendingStudent, TpoService};
pub use user_service::UserService;
