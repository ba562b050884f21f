pub mod command;
pub mod config;
pub mod discovery;
pub mod generator;
pub mod git;
pub mod orchestrator;
pub mod payload;
pub mod project;
pub mod prompts;
pub mod readme;
