//! Domain models shared by the data, service and bot layers.
//!
//! These types carry no Discord or database specifics: ids are plain `u64` snowflakes
//! and the bot layer converts serenity types into them at the handler boundary.

pub mod emoji;
pub mod image;
pub mod request;
pub mod role;
