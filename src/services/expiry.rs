use chrono::{DateTime, Duration, Utc};

/// Expiry durations selectable at upload time
pub const ALLOWED_EXPIRY_HOURS: [i64; 6] = [1, 6, 12, 24, 72, 168];

pub const DEFAULT_EXPIRY_HOURS: i64 = 24;

/// Clamp a requested duration to the allow-list, falling back to the default
/// when the request is absent or not in the set.
pub fn sanitize_expiry_hours(requested: Option<i64>) -> i64 {
    match requested {
        Some(hours) if ALLOWED_EXPIRY_HOURS.contains(&hours) => hours,
        _ => DEFAULT_EXPIRY_HOURS,
    }
}

/// Absolute expiry instant for an upload happening at `now`
pub fn compute_expiry(now: DateTime<Utc>, hours: i64) -> DateTime<Utc> {
    now + Duration::hours(hours)
}

/// A missing expiry means the file never expires; otherwise it is expired
/// once the instant is strictly in the past.
pub fn is_expired(expires_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    match expires_at {
        Some(expires_at) => expires_at < now,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_expiry_not_expired() {
        let now = Utc::now();
        for hours in ALLOWED_EXPIRY_HOURS {
            let expires_at = compute_expiry(now, hours);
            assert!(!is_expired(Some(expires_at), now));
        }
    }

    #[test]
    fn test_expired_after_duration_passes() {
        let now = Utc::now();
        for hours in ALLOWED_EXPIRY_HOURS {
            let expires_at = compute_expiry(now, hours);
            let later = now + Duration::hours(hours) + Duration::seconds(1);
            assert!(is_expired(Some(expires_at), later));
        }
    }

    #[test]
    fn test_exact_instant_is_not_expired() {
        let now = Utc::now();
        assert!(!is_expired(Some(now), now));
    }

    #[test]
    fn test_no_expiry_sentinel() {
        assert!(!is_expired(None, Utc::now()));
    }

    #[test]
    fn test_sanitize_expiry_hours() {
        assert_eq!(sanitize_expiry_hours(Some(1)), 1);
        assert_eq!(sanitize_expiry_hours(Some(168)), 168);
        assert_eq!(sanitize_expiry_hours(Some(2)), DEFAULT_EXPIRY_HOURS);
        assert_eq!(sanitize_expiry_hours(Some(-5)), DEFAULT_EXPIRY_HOURS);
        assert_eq!(sanitize_expiry_hours(None), DEFAULT_EXPIRY_HOURS);
    }
}
