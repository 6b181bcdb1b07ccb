//! Helper Admin library.
//!
//! This crate provides the admin panel as a library, allowing it to be
//! tested and reused. The binary in `main.rs` only wires configuration,
//! logging and the server loop around [`routes::app`].
//!
//! # Security
//!
//! The panel holds no data of its own. Every page is rendered from the
//! Helper REST API using the signed-in admin's bearer token, and the
//! backend has the final say on authorization:
//! - Only `ADMIN` accounts can sign in
//! - Tokens live in the server-side session, never in page markup
//! - A backend 401 ends the session immediately

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod components;
pub mod config;
pub mod error;
pub mod filters;
pub mod helper;
pub mod middleware;
pub mod models;
pub mod queries;
pub mod routes;
pub mod state;
