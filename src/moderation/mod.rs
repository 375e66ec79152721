pub mod classifier;
pub mod moderation_errors;
pub mod moderation_model;
pub mod moderation_service;

pub use classifier::{classify, Verdict};
pub use moderation_errors::ModerationError;
pub use moderation_model::{FieldOutcome, SpamReason};
pub use moderation_service::ModerationService;
