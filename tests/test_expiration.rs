
use chrono::{Datelike, Duration, Weekday};

use options_screener::pricing::{PricingError, select_expiration, target_expiration};

use mock_common::*;

#[test]
fn test_target_is_first_friday_on_or_after_two_weeks() {
    let start = date(2024, 4, 29);
    for offset in 0..14 {
        let today = start + Duration::days(offset);
        let target = target_expiration(today);
        let anchor = today + Duration::days(14);
        assert_eq!(target.weekday(), Weekday::Fri, "from {today}");
        assert!(target >= anchor, "from {today}");
        assert!(target - anchor < Duration::days(7), "from {today}");
    }
}

#[test]
fn test_rollover_rejects_closer_but_earlier_date() {
    // Target is 2024-05-17; the 16th is a day closer than the 24th.
    let available = [date(2024, 5, 10), date(2024, 5, 16), date(2024, 5, 24), date(2024, 6, 21)];
    assert_eq!(select_expiration(today(), &available).unwrap(), date(2024, 5, 24));
}

#[test]
fn test_rollover_picks_earliest_later_date_in_any_order() {
    let available = [date(2024, 6, 21), date(2024, 5, 31), date(2024, 5, 24)];
    assert_eq!(select_expiration(today(), &available).unwrap(), date(2024, 5, 24));
}

#[test]
fn test_listed_target_wins() {
    let available = [date(2024, 5, 24), date(2024, 5, 17)];
    assert_eq!(select_expiration(today(), &available).unwrap(), date(2024, 5, 17));
}

#[test]
fn test_only_earlier_dates_is_an_error() {
    let available = [date(2024, 5, 3), date(2024, 5, 10)];
    assert_eq!(
        select_expiration(today(), &available),
        Err(PricingError::NoExpirationAfter {
            target: date(2024, 5, 17)
        })
    );
}
