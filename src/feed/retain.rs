/// Preference key holding the retain count.
pub const RETAIN_COUNT_KEY: &str = "retainCount";

/// Retain count used when no usable preference is stored.
pub const DEFAULT_RETAIN_COUNT: usize = 5;

/// Parse a retain-count value the way an integer-prefix parser does.
///
/// Leading whitespace is skipped, an optional sign is accepted, then the
/// longest run of ASCII digits is read; anything after it is ignored.
/// Returns `None` when no digits follow, which callers treat as "no bound".
/// Zero and negative values yield `Some(0)`.
pub fn parse_retain_count(value: &str) -> Option<usize> {
    let rest = value.trim_start();
    let (negative, rest) = match rest.as_bytes().first() {
        Some(b'-') => (true, &rest[1..]),
        Some(b'+') => (false, &rest[1..]),
        _ => (false, rest),
    };

    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }

    if negative {
        return Some(0);
    }

    let count = rest[..digits]
        .bytes()
        .fold(0usize, |acc, d| {
            acc.saturating_mul(10).saturating_add(usize::from(d - b'0'))
        });
    Some(count)
}
