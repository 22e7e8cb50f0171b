pub mod cli;
pub mod commands;
pub mod compose;
pub mod config;
pub mod docker;
pub mod error;
pub mod git;
pub mod identity;
pub mod orchestrator;
pub mod platform;
pub mod ui;
