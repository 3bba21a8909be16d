//! Nominee Board - server-rendered award category browser
//!
//! This library fetches award categories and their nominees from the
//! upstream nominee API, derives render-ready view state, and serves it
//! as HTML pages and JSON snapshots.

pub mod api;
pub mod client;
pub mod config;
pub mod models;
pub mod render;
pub mod views;
