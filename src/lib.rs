//! Movie recommendation service: parallel similarity scoring over a MovieLens-style
//! dataset, exposed over HTTP.

pub mod api;
pub mod config;
pub mod error;
pub mod loader;
pub mod middleware;
pub mod models;
pub mod services;
pub mod similarity;
