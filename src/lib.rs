pub mod config;
pub mod git;
pub mod ops;
pub mod panel;
pub mod refname;
pub mod status;

// Re-export the types front-ends interact with most
pub use git::{CommandOutput, GitError, Runner};
pub use ops::Panel;
pub use panel::StatusLists;
pub use status::FileStatusEntry;
