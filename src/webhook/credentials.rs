//! Password obfuscation and Basic auth header construction.
//!
//! The stored form is base64 of the reversed password. This only keeps the
//! password out of casual view of the database; it is not encryption.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

/// Obfuscates a password for storage.
pub fn encode_password(password: &str) -> String {
    let reversed: String = password.chars().rev().collect();
    STANDARD.encode(reversed.as_bytes())
}

/// Reverses [`encode_password`]; input that is not an encoded password is returned as is.
pub fn decode_password(encoded: &str) -> String {
    STANDARD
        .decode(encoded)
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok())
        .map(|reversed| reversed.chars().rev().collect())
        .unwrap_or_else(|| encoded.to_string())
}

/// `Basic base64(user:pass)`, or `None` unless both parts are non-empty.
pub fn basic_auth_header(username: &str, password: &str) -> Option<String> {
    if username.is_empty() || password.is_empty() {
        return None;
    }
    Some(format!(
        "Basic {}",
        STANDARD.encode(format!("{username}:{password}"))
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_encode_known_value() {
        // "cba" -> base64
        assert_eq!(encode_password("abc"), "Y2Jh");
        assert_eq!(decode_password("Y2Jh"), "abc");
    }

    #[test]
    fn test_decode_falls_back_to_input() {
        assert_eq!(decode_password("not base64!"), "not base64!");
        assert_eq!(decode_password(""), "");
    }

    #[test]
    fn test_basic_auth_header() {
        assert_eq!(
            basic_auth_header("user", "pass").as_deref(),
            Some("Basic dXNlcjpwYXNz")
        );
        assert!(basic_auth_header("", "pass").is_none());
        assert!(basic_auth_header("user", "").is_none());
    }

    proptest! {
        #[test]
        fn prop_decode_inverts_encode(password in "\\PC{0,40}") {
            prop_assert_eq!(decode_password(&encode_password(&password)), password);
        }
    }
}
