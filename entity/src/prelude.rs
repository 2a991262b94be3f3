pub use super::emoji_allowed_role::Entity as EmojiAllowedRole;
