//! Discussion Partner API Library Crate
//!
//! Hosts learner sessions over HTTP: the in-memory session store, the
//! credential gate, voice upload handling, API handlers and routing. The
//! `api` binary is a thin wrapper around this library.

pub mod audio;
pub mod config;
pub mod handlers;
pub mod models;
pub mod router;
pub mod state;
pub mod store;

#[cfg(test)]
mod test_support;
