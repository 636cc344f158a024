//! ID prefix constants.
//!
//! Every stored entity ID is `{prefix}-{8 hex chars}`, e.g. `cr-a3f8b2c1`.
//! The random part is generated by the database (`randomblob(4)`).

pub const PREFIX_CHANGE_REQUEST: &str = "cr";
pub const PREFIX_COMMENT: &str = "cmt";
pub const PREFIX_ATTACHMENT: &str = "att";
pub const PREFIX_AUDIT: &str = "aud";

pub const ALL_PREFIXES: [&str; 4] = [
    PREFIX_CHANGE_REQUEST,
    PREFIX_COMMENT,
    PREFIX_ATTACHMENT,
    PREFIX_AUDIT,
];

/// Prefix of an ID, if it has one.
#[must_use]
pub fn prefix_of(id: &str) -> Option<&str> {
    id.split_once('-').map(|(prefix, _)| prefix)
}
