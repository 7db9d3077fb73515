// Secret key module
// Process-lifetime random value for cookie/session signing

use std::fmt;

/// Length of the generated key in bytes
pub const SECRET_KEY_LEN: usize = 16;

/// Randomly generated signing key, created once at startup.
///
/// Held in [`super::AppState`] for the process lifetime; never persisted and
/// never rotated. No route currently reads it (it exists for session-cookie
/// signing that is not implemented), so its only observable property is that
/// it differs across restarts.
#[derive(Clone)]
pub struct SecretKey([u8; SECRET_KEY_LEN]);

impl SecretKey {
    /// Generate a fresh key from the OS random source
    pub fn generate() -> Self {
        Self(rand::random::<[u8; SECRET_KEY_LEN]>())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Lowercase hex rendering (for test assertions only)
    #[cfg(test)]
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }
}

// Key material must not leak through debug output
impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(redacted)")
    }
}
