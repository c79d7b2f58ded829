//! Quiz decision services.
//!
//! # Responsibility
//! - Selection, scoring and taxonomy resolution over repository traits.
//! - Session flow that ties selection and scoring together.
//!
//! Services are storage-agnostic and hold no state beyond their
//! repositories and config.

pub mod quiz_service;
pub mod resolver;
pub mod scorer;
pub mod selector;
