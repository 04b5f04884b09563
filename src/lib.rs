// ABOUTME: Public library API for the mata blogging CLI
// ABOUTME: Re-exports core modules for external use

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod convert;
pub mod editor;
pub mod error;
pub mod model;
pub mod storage;
pub mod sync;
pub mod util;

pub use error::{Error, Result};
pub use model::{Post, PostReceipt};
