pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod gateway;
pub mod handlers;
pub mod ledger;
pub mod metering;
pub mod middleware;
pub mod providers;
pub mod quota;
pub mod services;
pub mod types;

#[cfg(test)]
pub mod testing;
