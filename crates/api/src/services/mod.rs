//! Services sit between the HTTP handlers and the stores they depend on.
//!
//! Each service is constructed with the capabilities it needs and is cheap
//! to clone. They normalise input, log intent and outcome under an `op`
//! field, and hand errors back to the handler.

pub mod feedback;
pub mod homepage;
pub mod millionaire;
pub mod photo;

pub use feedback::FeedbackService;
pub use homepage::HomepageService;
pub use millionaire::MillionaireService;
pub use photo::PhotoService;
