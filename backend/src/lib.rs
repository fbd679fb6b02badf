//! # Birthday Countdown Backend
//!
//! Countdown to a yearly anniversary, plus a small store of notes left on one
//! anniversary for the next.
//!
//! ## Features
//!
//! - **Anniversary Clock**: next occurrence of a fixed month/day at local
//!   midnight in a fixed UTC offset, with a 24 hour celebration window
//! - **Countdown Ticker**: poll-driven phase tracking for live displays
//! - **Message Store**: messages kept in Cloudflare Workers KV or in memory
//! - **HTTP API**: RESTful endpoints and a Server-Sent Events countdown stream
//!
//! ## Architecture
//!
//! - [`models`]: Time values, the anniversary clock and message records
//! - [`services`]: The countdown ticker
//! - [`db`]: Repository pattern and message service layer
//! - [`config`]: Server and anniversary settings
//! - [`http`]: Axum-based HTTP server and request handlers
//! - [`routes`]: Route-specific data types
//! - [`api`]: Data Transfer Objects for API responses

// Allow large error types - RepositoryError contains rich context for debugging
#![allow(clippy::result_large_err)]

pub mod api;
pub mod config;
pub mod db;
pub mod models;
pub mod routes;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
