pub mod client;
pub mod config;
pub mod expr;
pub mod inline;
pub mod mode;
pub mod reply;
pub mod session;
pub mod state;

// Re-export main types for convenience
pub use client::TutorClient;
pub use config::Config;
pub use expr::{expression_to_latex, typeset, Typeset};
pub use inline::Segment;
pub use mode::ViewMode;
pub use reply::{parse_reply, ParsedReply};
pub use session::{Session, SessionState};
pub use state::{Message, Sender};
