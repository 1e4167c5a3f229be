mod content;
mod summary;
mod user;

pub use content::{ContentField, ContentItem, ContentType, NewContent, Training};
pub use summary::{OutcomeKind, SummaryOutcome, SummaryRequest};
pub use user::{Role, User};
