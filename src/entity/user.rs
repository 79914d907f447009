use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One line of the newline-delimited user file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub totp_secret: String,
    pub created_at: DateTime<Utc>,
}
