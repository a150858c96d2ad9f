#![forbid(unsafe_code)]

//! Widgets for arbor.

pub mod multiselect;

pub use multiselect::{MultiSelect, MultiSelectConfig, MultiSelectError};
