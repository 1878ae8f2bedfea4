pub mod address_book;
pub mod api_error;
pub mod artifacts;
pub mod chain;
pub mod cli;
pub mod config;
pub mod http;
pub mod middleware;
pub mod models;
pub mod service;
pub mod telemetry;

#[cfg(test)]
mod testing;
