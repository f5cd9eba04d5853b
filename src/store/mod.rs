//! SQLite-backed persistence
//!
//! One small database file per concern, opened best-effort: a store
//! that fails to open disables its feature with a status warning
//! instead of taking the app down.

mod members;
mod portfolio;
mod progress;
mod session;

pub use members::{MemberRecord, MemberStore, PaymentRecord};
pub use portfolio::{PatternCard, PortfolioStore};
pub use progress::ProgressStore;
pub use session::SessionStore;
