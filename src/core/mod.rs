pub mod commands;
pub mod config;
pub mod expand;
pub mod state;
