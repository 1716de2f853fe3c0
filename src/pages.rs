//! Page generation modules
//!
//! Each page module builds a complete document from shared components.

pub mod sheet;
