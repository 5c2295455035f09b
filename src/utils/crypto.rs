// Cryptographic utilities for generating secure tokens

use base64::{engine::general_purpose, Engine as _};
use rand::RngCore;

/// Session token size in bytes (256 bits)
pub const SESSION_TOKEN_BYTES: usize = 32;

/// Number of characters of a token that may appear in log output
const TOKEN_PREVIEW_CHARS: usize = 6;

/// Generate a cryptographically secure session token
///
/// 32 bytes from the thread-local CSPRNG, encoded as unpadded base64url so the
/// value is safe to place in a cookie without further escaping.
///
/// # Returns
///
/// A 43 character base64url string
#[must_use]
pub fn generate_session_token() -> String {
    generate_nonce(SESSION_TOKEN_BYTES)
}

/// Generate a cryptographically secure nonce of specified byte length
///
/// # Arguments
///
/// * `length` - Number of bytes to generate (recommended: 16-32 for most use cases)
///
/// # Returns
///
/// A base64url-encoded string representing the specified bytes of random data
#[must_use]
pub fn generate_nonce(length: usize) -> String {
    let mut nonce = vec![0u8; length];
    rand::rng().fill_bytes(&mut nonce);
    general_purpose::URL_SAFE_NO_PAD.encode(nonce)
}

/// Shorten a token for debug logging
///
/// Only a short prefix is ever logged so a log line can't be replayed as a
/// session cookie.
#[must_use]
pub fn token_preview(token: &str) -> String {
    let prefix: String = token.chars().take(TOKEN_PREVIEW_CHARS).collect();
    format!("{prefix}…")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_session_token_length_and_alphabet() {
        let token = generate_session_token();

        // 32 bytes -> 43 base64url characters without padding
        assert_eq!(token.len(), 43);
        assert!(token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn test_session_tokens_are_unique() {
        let tokens: HashSet<String> = (0..1000).map(|_| generate_session_token()).collect();
        assert_eq!(tokens.len(), 1000);
    }

    #[test]
    fn test_generate_nonce_decodes_to_requested_length() {
        let nonce = generate_nonce(16);
        let decoded = general_purpose::URL_SAFE_NO_PAD.decode(nonce).unwrap();
        assert_eq!(decoded.len(), 16);
    }

    #[test]
    fn test_token_preview_hides_most_of_the_token() {
        let preview = token_preview("abcdefghijklmnop");
        assert_eq!(preview, "abcdef…");
        assert_eq!(token_preview("abc"), "abc…");
    }
}
