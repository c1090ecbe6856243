pub mod mailer;
pub mod parameters;
pub mod publisher;
