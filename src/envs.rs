use std::env;
use std::str::FromStr;
use std::sync::LazyLock;

pub static LISTEN_HOST: LazyLock<String> =
    LazyLock::new(|| env::var("LISTEN_HOST").unwrap_or("0.0.0.0:12321".into()));

pub static CONCURRENCY_LIMIT: LazyLock<usize> =
    LazyLock::new(|| var_or("CONCURRENCY_LIMIT", 500));

/// When false, forwarding headers are ignored and only the peer address is used.
pub static TRUST_FORWARDED: LazyLock<bool> = LazyLock::new(|| var_or("TRUST_FORWARDED", true));

fn var_or<T: FromStr>(key: &str, default: T) -> T {
    parse_or(env::var(key).ok().as_deref(), default)
}

fn parse_or<T: FromStr>(raw: Option<&str>, default: T) -> T {
    raw.and_then(|s| s.trim().parse().ok()).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_or() {
        assert_eq!(parse_or(Some(" 64 "), 500usize), 64);
        assert_eq!(parse_or(Some("lots"), 500usize), 500);
        assert_eq!(parse_or(None, 500usize), 500);
        assert!(!parse_or(Some("false"), true));
        assert!(parse_or(Some("nope"), true));
    }
}
