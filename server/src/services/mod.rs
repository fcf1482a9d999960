//! Domain services used by websocket and HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own the registry, relay and history logic so route
//! handlers can stay focused on protocol translation and auth plumbing.

pub mod auth;
pub mod history;
pub mod registry;
pub mod relay;
