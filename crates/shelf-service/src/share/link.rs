//! Share link token generation.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::Rng;

/// Random bytes per token.
const TOKEN_BYTES: usize = 32;

/// Generates a fresh token from the thread-local CSPRNG, URL-safe base64
/// without padding (43 characters).
pub fn generate_token() -> String {
    let bytes: [u8; TOKEN_BYTES] = rand::rng().random();
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Public URL of a shared item: `{base}/share/{token}`.
pub fn share_url(base: &str, token: &str) -> String {
    format!("{}/share/{token}", base.trim_end_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_tokens_are_url_safe_and_unique() {
        let tokens: HashSet<String> = (0..64).map(|_| generate_token()).collect();
        assert_eq!(tokens.len(), 64);
        for token in &tokens {
            assert_eq!(token.len(), 43);
            assert!(
                token
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
            );
        }
    }

    #[test]
    fn test_share_url_trims_trailing_slash() {
        assert_eq!(
            share_url("https://shelf.example/", "abc"),
            "https://shelf.example/share/abc"
        );
        assert_eq!(share_url("http://localhost:3000", "t"), "http://localhost:3000/share/t");
    }
}
