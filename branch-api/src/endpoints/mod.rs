//! API endpoint modules organized by resource.
//!
//! Each module provides typed methods for a group of related endpoints.

pub mod links;
