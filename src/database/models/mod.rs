pub mod event;
pub mod file;
pub mod job;
pub mod notification;
pub mod profile;
pub mod reset_token;
pub mod user;

pub use event::{Event, EventChanges, EventRegistration, NewEvent, RegistrantView};
pub use file::{FileUpload, NewFileUpload, ReviewItem};
pub use job::{ApplicantView, Job, JobApplication, JobChanges, JobView, NewJob};
pub use notification::{BroadcastGroup, NewNotification, Notification};
pub use profile::{Profile, ProfileFields};
pub use reset_token::PasswordResetToken;
pub use user::{NewUser, User, UserChanges};
