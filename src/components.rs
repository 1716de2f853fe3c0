//! Reusable HTML components for page generation
//!
//! Maud component functions used by the sheet page: the document wrapper
//! and the per-issue entry card.

pub mod entry;
pub mod layout;
