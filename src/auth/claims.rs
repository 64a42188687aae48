use serde::{Deserialize, Serialize};

/// JWT payload used for authentication.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // username
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin: Option<bool>,
    pub iat: usize,  // issued at (unix timestamp)
    pub exp: usize,  // expires at (unix timestamp)
    pub iss: String, // issuer
    pub aud: String, // audience
}

impl Claims {
    pub fn is_admin(&self) -> bool {
        self.admin.unwrap_or(false)
    }
}
