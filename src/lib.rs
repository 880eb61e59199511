// src/lib.rs — Library root for kotoba

pub mod api;
pub mod cli;
pub mod gateway;
pub mod infra;
pub mod matcher;
pub mod prompts;
pub mod provider;
pub mod session;
