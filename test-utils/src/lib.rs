//! Emoji Importer Test Utils
//!
//! Provides shared testing utilities for the emoji importer bot. This crate offers a
//! builder for test contexts backed by in-memory SQLite databases, factories that insert
//! allow-list rows, and fixtures for the images and web pages the import pipeline
//! consumes.
//!
//! # Overview
//!
//! The test utilities consist of these components:
//! - **TestBuilder**: Fluent builder for configuring test environments
//! - **TestContext**: Test environment containing the database connection
//! - **TestError**: Error types that can occur during test setup
//! - **factory**: Insert entities with sensible defaults
//! - **fixture**: In-memory test data (image bytes, HTML pages), no database involved
//!
//! # Usage
//!
//! ```rust,ignore
//! use test_utils::builder::TestBuilder;
//!
//! #[tokio::test]
//! async fn test_allow_list() -> Result<(), TestError> {
//!     let test = TestBuilder::new()
//!         .with_allow_list_tables()
//!         .build()
//!         .await?;
//!
//!     let db = test.db.unwrap();
//!     // Perform database operations...
//!
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod context;
pub mod error;
pub mod factory;
pub mod fixture;
