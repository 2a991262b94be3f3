//! Factory methods for creating test data.
//!
//! Factories insert entities with sensible defaults, reducing boilerplate in tests. Each
//! entity has a `Factory` struct for customization and a `create_*` convenience function
//! for quick default creation.
//!
//! # Basic Usage
//!
//! ```rust,ignore
//! use test_utils::factory;
//!
//! #[tokio::test]
//! async fn test_example() -> Result<(), sea_orm::DbErr> {
//!     let db = /* ... */;
//!
//!     // Create with defaults
//!     let role = factory::create_allowed_role(&db).await?;
//!
//!     // Customize
//!     let role = factory::allowed_role::AllowedRoleFactory::new(&db)
//!         .guild_id(42)
//!         .role_id(7)
//!         .build()
//!         .await?;
//!
//!     Ok(())
//! }
//! ```

pub mod allowed_role;
pub mod helpers;

pub use allowed_role::{create_allowed_role, create_allowed_role_for};
