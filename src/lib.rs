pub mod catalog;
pub mod config;
pub mod error;
pub mod metrics;
pub mod player;
mod routes;
pub mod session;
pub mod speech;
pub mod startup;
mod websocket;
