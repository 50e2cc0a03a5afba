pub mod app;
pub mod cluster;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod services;
pub mod session;
pub mod state;
