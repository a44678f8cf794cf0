//! Helper functions shared by templates and views

mod date;

pub use date::*;
