use chrono::{Datelike, Duration, NaiveDate, Weekday};

use super::PricingError;

/// Days ahead of today the target expiration is anchored at.
pub const TARGET_HORIZON_DAYS: i64 = 14;

/// Two weeks from `today`, moved forward to the next Friday (or kept if it
/// already is one).
pub fn target_expiration(today: NaiveDate) -> NaiveDate {
    let anchor = today + Duration::days(TARGET_HORIZON_DAYS);
    let offset = (Weekday::Fri.num_days_from_monday() + 7
        - anchor.weekday().num_days_from_monday())
        % 7;
    anchor + Duration::days(i64::from(offset))
}

/// Pick the listed expiration for the target Friday.
///
/// The target itself when listed, otherwise the earliest listed date strictly
/// after it. Earlier dates are never chosen, however close.
pub fn select_expiration(today: NaiveDate, available: &[NaiveDate]) -> Result<NaiveDate, PricingError> {
    if available.is_empty() {
        return Err(PricingError::NoExpirations);
    }

    let target = target_expiration(today);
    if available.contains(&target) {
        return Ok(target);
    }

    available
        .iter()
        .filter(|d| **d > target)
        .min()
        .copied()
        .ok_or(PricingError::NoExpirationAfter { target })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_target_is_friday_two_weeks_out() {
        // Wednesday 2024-05-01 → anchor Wednesday 05-15 → Friday 05-17.
        assert_eq!(target_expiration(date(2024, 5, 1)), date(2024, 5, 17));
        // Friday stays a Friday.
        assert_eq!(target_expiration(date(2024, 5, 3)), date(2024, 5, 17));
        // Saturday → anchor Saturday 05-18 → Friday 05-24.
        assert_eq!(target_expiration(date(2024, 5, 4)), date(2024, 5, 24));
    }

    #[test]
    fn test_exact_target_is_used() {
        let available = [date(2024, 5, 10), date(2024, 5, 17), date(2024, 5, 24)];
        assert_eq!(select_expiration(date(2024, 5, 1), &available).unwrap(), date(2024, 5, 17));
    }

    #[test]
    fn test_empty_expirations() {
        assert!(matches!(
            select_expiration(date(2024, 5, 1), &[]),
            Err(PricingError::NoExpirations)
        ));
    }
}
