//! # StudySync Core
//!
//! Domain types and the session conflict engine for the StudySync client.
//!
//! The engine answers two questions about a group's study sessions:
//!
//! - does anything in the list overlap a session the current user already accepted?
//! - which upcoming session should member availability be checked for?
//!
//! Everything in [`conflict`] and [`interval`] is synchronous and side-effect free.
//! Fetching the inputs is the job of the `studysync-client` crate.

/// Error taxonomy shared by the workspace
pub mod errors;
/// Wire and domain models
pub mod models;
/// Half-open time intervals
pub mod interval;
/// Self-conflict detection and soonest-session selection
pub mod conflict;

pub use conflict::{
    ConflictPair, ConflictResult, Scheduled, availability_window, compute_self_conflict,
    select_soonest, window_for,
};
pub use interval::{Interval, overlaps};
