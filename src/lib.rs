//! Todo Lists
//!
//! List presentation engine for the todos client. A flat, server-ordered
//! list of todos is grouped for display, and each list screen runs a small
//! state machine over loads, search, pagination and creation against the
//! JSON:API backend.

pub mod commands;
pub mod config;
pub mod context;
pub mod controller;
pub mod error;
pub mod grouping;
pub mod jsonapi;
pub mod models;
pub mod screens;
pub mod store;

#[cfg(test)]
mod testing;
