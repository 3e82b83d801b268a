//! Client-side identifiers: `<prefix>_<epoch-ms>_<random base36>`.

use rand::Rng;

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Length of the random suffix of activity ids and session tokens.
pub const SUFFIX_LEN: usize = 7;

pub fn random_base36(len: usize) -> String {
    let mut rng = rand::rng();
    (0..len)
        .map(|_| BASE36[rng.random_range(0..BASE36.len())] as char)
        .collect()
}

pub fn activity_id(now_ms: i64) -> String {
    format!("activity_{}_{}", now_ms, random_base36(SUFFIX_LEN))
}

pub fn session_token(now_ms: i64) -> String {
    format!("session_{}_{}", now_ms, random_base36(SUFFIX_LEN))
}

/// True when `token` looks like something [`session_token`] produced.
pub fn is_session_token(token: &str) -> bool {
    let mut parts = token.splitn(3, '_');
    matches!(
        (parts.next(), parts.next(), parts.next()),
        (Some("session"), Some(ms), Some(suffix))
            if !ms.is_empty()
                && ms.bytes().all(|b| b.is_ascii_digit())
                && !suffix.is_empty()
                && suffix.bytes().all(|b| BASE36.contains(&b))
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn activity_id_has_prefix_timestamp_and_suffix() {
        let id = activity_id(1_700_000_000_000);
        let parts: Vec<&str> = id.split('_').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "activity");
        assert_eq!(parts[1], "1700000000000");
        assert_eq!(parts[2].len(), SUFFIX_LEN);
    }

    #[test]
    fn session_token_is_recognised() {
        let token = session_token(42);
        assert!(is_session_token(&token));
        assert!(!is_session_token("session__abc"));
        assert!(!is_session_token("activity_42_abcdefg"));
        assert!(!is_session_token("session_42_ABC"));
    }

    #[test]
    fn suffix_is_lowercase_base36() {
        let s = random_base36(64);
        assert!(s.bytes().all(|b| b.is_ascii_digit() || b.is_ascii_lowercase()));
    }
}
