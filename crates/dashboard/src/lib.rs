//! FinanceCore dashboard: a terminal client for the household finance
//! Gateway.
pub mod app;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod local_state;
pub mod login;
pub mod ui;
