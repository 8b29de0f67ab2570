//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repositories, the listing source and notifiers into the
//!   run and subscriber-management use-cases.
//! - Keep the CLI decoupled from storage and transport details.

pub mod recipient_service;
pub mod run_service;
