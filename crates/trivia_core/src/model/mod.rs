//! Trivia domain model.
//!
//! # Responsibility
//! - Define the question and category records shared by repositories,
//!   services and the HTTP boundary.
//!
//! # Invariants
//! - Question ids are assigned by storage, increase monotonically and are
//!   never reused.
//! - Questions are immutable once stored; the only mutation is deletion.
//! - Categories are seeded by migration and never written through the API.

pub mod category;
pub mod question;
