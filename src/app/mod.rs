pub mod context;
pub mod edits;
pub mod reconciler;
pub mod render;
pub mod session;

pub use context::AppContext;
pub use session::{MappingSession, Mutation, PendingSubmit, SessionState};
pub use edits::{RowEdit, apply_edits, parse_assignment};
