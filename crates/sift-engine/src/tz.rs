//! Named timezone offsets for CONVERT_TZ.
//!
//! The contract is `local_time(name, utc_epoch) -> Option<local_epoch>`.
//! This implementation resolves a fixed table of common IANA zone names to
//! their standard offsets, plus `UTC±HH[:MM]` spellings; a tzdata-backed
//! provider can replace [`zone_offset`] without touching the callers.

/// Standard offsets (seconds east of UTC) for the zones the fixtures use.
const ZONES: &[(&str, i64)] = &[
    ("UTC", 0),
    ("Etc/UTC", 0),
    ("GMT", 0),
    ("Etc/GMT", 0),
    ("Europe/London", 0),
    ("Europe/Paris", 3_600),
    ("Europe/Berlin", 3_600),
    ("Europe/Madrid", 3_600),
    ("Europe/Rome", 3_600),
    ("Europe/Athens", 7_200),
    ("Europe/Helsinki", 7_200),
    ("Europe/Moscow", 10_800),
    ("America/New_York", -18_000),
    ("America/Chicago", -21_600),
    ("America/Denver", -25_200),
    ("America/Phoenix", -25_200),
    ("America/Los_Angeles", -28_800),
    ("America/Anchorage", -32_400),
    ("America/Sao_Paulo", -10_800),
    ("Asia/Dubai", 14_400),
    ("Asia/Karachi", 18_000),
    ("Asia/Kolkata", 19_800),
    ("Asia/Dhaka", 21_600),
    ("Asia/Bangkok", 25_200),
    ("Asia/Shanghai", 28_800),
    ("Asia/Singapore", 28_800),
    ("Asia/Hong_Kong", 28_800),
    ("Asia/Tokyo", 32_400),
    ("Asia/Seoul", 32_400),
    ("Australia/Sydney", 36_000),
    ("Pacific/Auckland", 43_200),
];

/// Offset in seconds east of UTC for a zone name, or `None` when unknown.
pub fn zone_offset(name: &str) -> Option<i64> {
    if let Some(&(_, offset)) = ZONES.iter().find(|(n, _)| n.eq_ignore_ascii_case(name)) {
        return Some(offset);
    }
    parse_utc_offset(name)
}

/// Shift a UTC epoch into a zone's local clock time.
pub fn local_time(name: &str, utc_epoch: i64) -> Option<i64> {
    Some(utc_epoch + zone_offset(name)?)
}

/// `UTC+5`, `UTC-05:30`, `+08`, `-0330` and friends.
fn parse_utc_offset(name: &str) -> Option<i64> {
    let rest = name
        .strip_prefix("UTC")
        .or_else(|| name.strip_prefix("utc"))
        .or_else(|| name.strip_prefix("GMT"))
        .or_else(|| name.strip_prefix("gmt"))
        .unwrap_or(name);
    let bytes = rest.as_bytes();
    let sign = match bytes.first()? {
        b'+' => 1,
        b'-' => -1,
        _ => return None,
    };
    let digits: String = rest[1..].chars().filter(|c| *c != ':').collect();
    if digits.is_empty() || digits.len() > 4 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let (hours, minutes) = if digits.len() <= 2 {
        (digits.parse::<i64>().ok()?, 0)
    } else {
        let split = digits.len() - 2;
        (
            digits[..split].parse::<i64>().ok()?,
            digits[split..].parse::<i64>().ok()?,
        )
    };
    if hours > 14 || minutes > 59 {
        return None;
    }
    Some(sign * (hours * 3_600 + minutes * 60))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_zone_offsets() {
        assert_eq!(zone_offset("UTC"), Some(0));
        assert_eq!(zone_offset("america/new_york"), Some(-18_000));
        assert_eq!(zone_offset("Asia/Kolkata"), Some(19_800));
        assert_eq!(zone_offset("Atlantis/Nowhere"), None);
    }

    #[test]
    fn utc_offset_spellings() {
        assert_eq!(zone_offset("UTC+5"), Some(18_000));
        assert_eq!(zone_offset("UTC-05:30"), Some(-19_800));
        assert_eq!(zone_offset("+0800"), Some(28_800));
        assert_eq!(zone_offset("UTC+99"), None);
    }

    #[test]
    fn local_time_shifts_epoch() {
        assert_eq!(local_time("UTC", 1_000), Some(1_000));
        assert_eq!(local_time("America/New_York", 0), Some(-18_000));
        assert_eq!(local_time("Narnia/Lantern", 0), None);
    }
}
