use serde::{Deserialize, Serialize};

/// Identity attached to a request by the auth middleware: the subject the
/// bearer token was issued to, plus the admin flag carried in its claims.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AuthUser {
    pub user_id: i64,
    pub is_admin: bool,
}
