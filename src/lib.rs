//! teamtree: an organization's teams as an in-memory hierarchy
//!
//! The core is [`domain::TeamStore`], a flat insertion-ordered list of named
//! teams linked to their parents by name. The hierarchy is browsed one level
//! at a time with `list_children`, and changed with `insert` and `remove`.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
