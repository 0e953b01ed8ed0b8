//! # Unit Components
//!
//! Tests for each component of the hierarchy, leaves first.
