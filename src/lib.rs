//! BRP Brandweer Library
//!
//! Looks up the residents registered at a location in the municipal
//! population register (StUF 0204 over mutual TLS) and derives the
//! fire-brigade indicators from their ages.
//!
//! # Modules
//!
//! - `api`: HTTP-facing components.
//! - `core`: Age rules, indicators and the lookup pipeline.
//! - `integrations`: StUF message, client and answer parser.
//! - `age`: Age calculation and age buckets.
//! - `config`: Configuration management.
//! - `errors`: Error handling types.
//! - `handlers`: HTTP request handlers and router.
//! - `indicators`: Indicator rules.
//! - `lookup`: Per-identifier lookup pipeline.
//! - `models`: Data models.
//! - `openapi`: OpenAPI document.
//! - `stuf_client`: Mutual-TLS client for the register.
//! - `stuf_message`: Lv01 question builder.
//! - `stuf_parser`: La01 answer parser.

pub mod api;
pub mod core;
pub mod integrations;

pub mod age;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod indicators;
pub mod lookup;
pub mod models;
pub mod openapi;
pub mod stuf_client;
pub mod stuf_message;
pub mod stuf_parser;

pub use lookup::{lookup, BrpLookup};
