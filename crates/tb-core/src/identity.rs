use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Display identity of the signed-in user, passed between crates.
///
/// Produced by `tb-auth` on sign-in and consumed by `tb-board` (owner of the
/// board and of created tasks) and `tb-cli` (profile header).
/// Contains only data fields. Sign-in logic lives in `tb-auth`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct UserIdentity {
    /// Stable user ID (`usr-` prefix). Tasks are keyed by this value.
    pub user_id: String,
    /// Name shown next to the avatar.
    pub display_name: String,
    /// Avatar image URL, if the provider supplied one.
    pub photo_url: Option<String>,
}
