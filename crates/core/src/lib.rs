//! Helper Admin Core - Shared types library.
//!
//! This crate provides the types exchanged between the admin panel and the
//! Helper backend REST API:
//! - `admin` - The admin panel server (server-rendered, port 3001)
//! - `integration-tests` - End-to-end tests against a mocked backend
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. Every record
//! here mirrors a backend response; none of them is authoritative locally.
//!
//! # Modules
//!
//! - [`types`] - IDs, roles, statuses, the response envelope, records and stats

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
