//! Read-side services computed from mirrored collections.
//!
//! # Responsibility
//! - Derive dashboard figures without touching stores or the network.

pub mod dashboard;
