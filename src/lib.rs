//! Event and booking persistence for a MongoDB-backed web application.
//!
//! Records go through an explicit save pipeline (see [`validation`]) run by the
//! [`repositories`] right before each write. The database handle is memoized by
//! [`db::ConnectionManager`], which callers own and pass around.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod repositories;
pub mod validation;

pub use error::{Error, Result};
