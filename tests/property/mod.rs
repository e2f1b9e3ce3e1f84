//! Property-based tests module

mod diff_properties;
mod search_properties;
