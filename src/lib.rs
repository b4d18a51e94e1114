//! snaplink - an in-memory URL shortener
//!
//! Long URLs are mapped to short random ids and resolved back on lookup.
//! Creation requests are gated by a per-client rate limiter.
//!
//! # Architecture
//! - `storage`: mapping store trait and the in-memory backend
//! - `services`: short id allocation (`LinkService`) and admission (`RateLimiter`)
//! - `api`: HTTP handlers and middleware
//! - `config`: configuration loading
//! - `runtime`: server startup
//! - `system`: logging setup

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
