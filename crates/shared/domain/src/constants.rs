//! Names shared between storage, HTTP routes and logs.

/// Session cookie holding the hex-encoded field key.
pub const KEY_COOKIE: &str = "key";

// Tables
pub const ACCOUNT: &str = "account";
pub const PROFILE: &str = "profile";
pub const CHARACTER: &str = "character";
pub const TAG: &str = "tag";
pub const PERSONA: &str = "persona";
pub const STORY: &str = "story";
pub const CHAT: &str = "chat";
pub const MESSAGE: &str = "message";

// OpenAPI tags
pub const SYSTEM_TAG: &str = "System";
pub const SESSION_TAG: &str = "Session";
pub const PROFILES_TAG: &str = "Profiles";
pub const CHARACTERS_TAG: &str = "Characters";
pub const TAGS_TAG: &str = "Tags";
pub const PERSONAS_TAG: &str = "Personas";
pub const STORIES_TAG: &str = "Stories";
pub const CHATS_TAG: &str = "Chats";

/// Length of generated record ids.
pub const ID_LEN: usize = 12;
