// Library crate; main.rs and the integration tests both build on it.

pub mod activity;
pub mod chat;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod gateway;
pub mod model;
pub mod routes;
pub mod scheduler;
pub mod seed;
pub mod server;
pub mod settings;
pub mod simulator;
pub mod state;
pub mod table;
pub mod widgets;
