pub mod add;
pub mod auth_cmd;
pub mod avatar;
pub mod common;
pub mod completions;
pub mod delete;
pub mod due;
pub mod edit;
pub mod export;
pub mod folder;
pub mod list;
pub mod register;
pub mod timeline;
pub mod toggle;
