//! Test fixtures providing reusable test data without database insertion.
//!
//! Unlike factories, fixtures do NOT touch the database. They provide the raw inputs the
//! import pipeline works on: image payloads and emoji web pages.
//!
//! # Example
//!
//! ```rust,ignore
//! use test_utils::fixture::{image, page};
//!
//! let bytes = image::png();
//! let html = page::emoji_page("/img/x.png", "x");
//! ```

pub mod image;
pub mod page;
