//! Core translation engine module

pub mod backend;
pub mod cleanup;
pub mod client;
pub mod config;
pub mod errors;
pub mod models;
pub mod prompt;
