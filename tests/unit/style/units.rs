use super::*;

#[test]
fn strips_unit_suffixes() {
    assert_eq!(parse_positive_scalar("3s"), Some(3.0));
    assert_eq!(parse_positive_scalar("250%"), Some(250.0));
    assert_eq!(parse_positive_scalar("1.5s"), Some(1.5));
    assert_eq!(parse_positive_scalar("  2.5s  "), Some(2.5));
    assert_eq!(parse_positive_scalar("400px"), Some(400.0));
    assert_eq!(parse_positive_scalar("42"), Some(42.0));
}

#[test]
fn empty_and_garbage_mean_use_default() {
    assert_eq!(parse_positive_scalar(""), None);
    assert_eq!(parse_positive_scalar("   "), None);
    assert_eq!(parse_positive_scalar("abc"), None);
    assert_eq!(parse_positive_scalar("px"), None);
    assert_eq!(parse_positive_scalar("1.2.3"), None);
}

#[test]
fn non_positive_values_mean_use_default() {
    assert_eq!(parse_positive_scalar("0"), None);
    assert_eq!(parse_positive_scalar("0s"), None);
    assert_eq!(parse_positive_scalar("-5"), None);
    assert_eq!(parse_positive_scalar("-0.1s"), None);
    assert_eq!(parse_positive_scalar("inf"), None);
}

#[test]
fn non_negative_policy_accepts_zero() {
    assert_eq!(parse_non_negative_scalar("0%"), Some(0.0));
    assert_eq!(parse_non_negative_scalar("10%"), Some(10.0));
    assert_eq!(parse_non_negative_scalar("-1%"), None);
    assert_eq!(parse_non_negative_scalar(""), None);
}

#[test]
fn parse_or_falls_back() {
    assert_eq!(parse_or("2s", 1.5), 2.0);
    assert_eq!(parse_or("", 1.5), 1.5);
    assert_eq!(parse_or("junk", 0.5), 0.5);
}

#[test]
fn seconds_to_millis_rounds() {
    assert_eq!(secs_to_millis(3.0), 3000);
    assert_eq!(secs_to_millis(1.5), 1500);
    assert_eq!(secs_to_millis(0.0005), 1);
    assert_eq!(secs_to_millis(0.0), 0);
}
