pub mod profile_rules;
pub mod username;

pub use profile_rules::{
    BIO_MAX_CHARS, DISPLAY_NAME_MAX_CHARS, SECTION_ITEM_LIMIT,
    STATUS_MAX_CHARS,
};
pub use username::{Username, UsernameError};
