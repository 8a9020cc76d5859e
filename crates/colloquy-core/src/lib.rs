//! Core types and error definitions for the Colloquy conversation store.
//!
//! This crate provides the foundational types shared across all Colloquy
//! crates: error handling and the activity records that transcript backends
//! persist and page over.
//!
//! # Main types
//!
//! - [`ColloquyError`] — Unified error enum for all Colloquy subsystems.
//! - [`ColloquyResult`] — Convenience alias for `Result<T, ColloquyError>`.
//! - [`ActivityKind`] — What kind of conversation event an activity records.
//! - [`Activity`] — A single logged event within a conversation.

pub mod activity;
pub mod error;

pub use activity::{Activity, ActivityKind};
pub use error::{ColloquyError, ColloquyResult};
