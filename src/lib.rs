//! Resonate cast receiver bootstrap
//!
//! Resolves the server endpoint and player identity, builds a player session
//! against the playback engine and keeps a status/debug display current.

#![forbid(unsafe_code)]

pub mod bootstrap;
pub mod config;
pub mod constants;
pub mod display;
pub mod engine;
pub mod error;
pub mod ipc;
pub mod launch;
pub mod session;
pub mod status;
pub mod storage;

pub use bootstrap::{Bootstrap, Phase, Receiver};
pub use error::BootstrapError;
