//! tiga-core - Core library for Tiga
//!
//! This crate contains the shared models, remote store clients, and the
//! client-side sync logic used by all Tiga interfaces. Durable state lives
//! in the hosted backend; everything here is a rebuildable projection.

pub mod api;
pub mod auth;
pub mod avatar;
pub mod cache;
pub mod config;
pub mod error;
pub mod export;
pub mod models;
pub mod realtime;
pub mod reminders;
pub mod remote;
pub mod service;
pub mod tasks;
pub mod util;

pub use error::{Error, Result};
pub use models::{Folder, Todo, TodoId};
