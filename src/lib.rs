// src/lib.rs

//! gh-watch library
//!
//! Collects candidate repositories from GitHub search, trending feeds and
//! forum posts, and reports only the ones not seen or dismissed before.

pub mod error;
pub mod models;
pub mod pipeline;
pub mod presenter;
pub mod sources;
pub mod storage;
pub mod utils;
