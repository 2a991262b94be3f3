pub mod prelude;

pub mod emoji_allowed_role;
