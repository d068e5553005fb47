//! # Collaborator Services
//!
//! Interfaces the health handlers depend on, with their production
//! implementations. Handlers only see the traits, so tests can swap in
//! scripted collaborators.
//!
//! ## Available Services
//!
//! - **Database** (`database`) - Connectivity probe running a validation query
//! - **Process metrics** (`process_metrics`) - Optional resource statistics provider

pub mod database;
pub mod process_metrics;
