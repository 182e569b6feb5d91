//! CLI command handlers. Each command is in its own file.

mod batch;
mod completions;
mod id;
mod import;
mod search;

pub use completions::run_completions;
pub use id::run_id;
pub use import::run_import;
pub use search::run_search;
