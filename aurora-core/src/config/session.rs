/// Session token signing configuration.
#[derive(Clone)]
pub struct SessionConfig {
    secret: Box<[u8]>,
    /// Lifetime of a session in seconds.
    pub max_age_secs: i64,
    /// Add the `Secure` attribute to the session cookie.
    pub secure_cookie: bool,
}

impl SessionConfig {
    pub fn new(secret: Box<[u8]>, max_age_secs: i64, secure_cookie: bool) -> Self {
        Self {
            secret,
            max_age_secs,
            secure_cookie,
        }
    }

    /// HMAC key for session tokens.
    pub fn secret(&self) -> &[u8] {
        &self.secret
    }
}

impl std::fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionConfig")
            .field("secret", &"<redacted>")
            .field("max_age_secs", &self.max_age_secs)
            .field("secure_cookie", &self.secure_cookie)
            .finish()
    }
}
