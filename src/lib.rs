//! Stock Portfolio App server library.
//!
//! Exposes the building blocks (config, state, session store, routes, views)
//! so integration tests and the binary entrypoint can both access them.

pub mod app;
pub mod config;
pub mod error;
pub mod flash;
pub mod forms;
pub mod mailer;
pub mod sessions;
pub mod state;
pub mod stocks;
pub mod users;
pub mod views;
