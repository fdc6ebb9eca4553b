// taskboard - In-memory task list with status and category filtering

pub mod config;
pub mod event;
pub mod filter;
pub mod models;
pub mod render;
pub mod shell;
pub mod store;

// Re-export main types for convenience
pub use config::Config;
pub use event::StoreEvent;
pub use filter::Filter;
pub use models::{Category, Priority, Task, TaskId, parse_due_date};
pub use render::Renderer;
pub use shell::Shell;
pub use store::{Counts, TaskStore};
