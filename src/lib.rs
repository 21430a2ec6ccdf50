//! # Nocturne
//!
//! A personal sleep tracker with AI-generated sleep hygiene tips.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (users, sleep records, summaries)
//! - **clock**: Time-of-day and duration codecs, overnight duration math
//! - **calculate**: Summary statistics and regularity series computation
//! - **storage**: JSONL-backed, owner-scoped record store
//! - **auth**: Password hashing and signed session tokens
//! - **tips**: AI tip generation with a fixed fallback
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod api;
pub mod auth;
pub mod calculate;
pub mod clock;
pub mod config;
pub mod models;
pub mod storage;
pub mod tips;

pub use models::*;
