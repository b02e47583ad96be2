//! Data models for Tiga

mod activity;
mod folder;
mod todo;

pub use activity::{ActivityAction, ActivityEntry, ActivityMetadata};
pub use folder::{Folder, FolderColor};
pub use todo::{EmbeddedTask, Todo, TodoId};
