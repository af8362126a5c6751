//! Free-text parsers for the fields users type by hand.
//!
//! Both parsers are lenient: anything they cannot read counts as zero.
//! They run once when a session is written (see `SessionDraft::validate`)
//! and when legacy rows are imported, never while aggregating.

use std::sync::LazyLock;

use regex::Regex;

static HOURS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)([0-9]+)\s*(?:timer|time|hours?|t|h)").expect("hour pattern is valid")
});

static MINUTES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)([0-9]+)\s*(?:minutter|minutes?|minut|min|m)")
        .expect("minute pattern is valid")
});

static REPS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)([0-9]+)\s*reps").expect("reps pattern is valid"));

fn first_quantity(pattern: &Regex, text: &str) -> u32 {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .unwrap_or(0)
}

/// Total minutes in a duration such as `"1 time 50 min"` or `"1t 30m"`.
///
/// The first hour token and the first minute token are looked up
/// independently; a missing token contributes nothing.
#[must_use]
pub fn parse_duration_minutes(text: &str) -> u32 {
    if text.trim().is_empty() {
        return 0;
    }
    let hours = first_quantity(&HOURS, text);
    let minutes = first_quantity(&MINUTES, text);
    hours.saturating_mul(60).saturating_add(minutes)
}

/// Same as [`parse_duration_minutes`] for a value that may be absent.
#[must_use]
pub fn parse_optional_duration_minutes(text: Option<&str>) -> u32 {
    text.map_or(0, parse_duration_minutes)
}

/// Rep count written before a `reps` token, e.g. `"Pull ups: 10 reps"` -> 10.
#[must_use]
pub fn parse_reps(text: &str) -> u32 {
    first_quantity(&REPS, text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_hours_and_minutes() {
        assert_eq!(parse_duration_minutes("1 time 50 min"), 110);
        assert_eq!(parse_duration_minutes("1t 30m"), 90);
        assert_eq!(parse_duration_minutes("2 timer 5 minutter"), 125);
        assert_eq!(parse_duration_minutes("1h30m"), 90);
    }

    #[test]
    fn single_token_inputs() {
        assert_eq!(parse_duration_minutes("30 min"), 30);
        assert_eq!(parse_duration_minutes("2t"), 120);
        assert_eq!(parse_duration_minutes("45 minutes"), 45);
        assert_eq!(parse_duration_minutes("3 Hours"), 180);
    }

    #[test]
    fn empty_and_unitless_inputs_are_zero() {
        assert_eq!(parse_duration_minutes(""), 0);
        assert_eq!(parse_duration_minutes("   "), 0);
        assert_eq!(parse_duration_minutes("90"), 0);
        assert_eq!(parse_duration_minutes("lang tid"), 0);
        assert_eq!(parse_optional_duration_minutes(None), 0);
    }

    #[test]
    fn partial_strings_still_yield_their_token() {
        assert_eq!(parse_duration_minutes("ca. 1 time"), 60);
        assert_eq!(parse_duration_minutes("omkring 40 min ish"), 40);
        assert_eq!(parse_optional_duration_minutes(Some("1 T")), 60);
    }

    #[test]
    fn oversized_numbers_degrade_to_zero() {
        assert_eq!(parse_duration_minutes("99999999999 min"), 0);
        assert_eq!(parse_duration_minutes("5000000000 t"), 0);
        assert_eq!(parse_duration_minutes("80000000 t"), u32::MAX);
    }

    #[test]
    fn combined_never_less_than_either_part() {
        let pairs = [("1 time", "50 min"), ("2t", "5m"), ("0 h", "15 min")];
        for (hour, minute) in pairs {
            let both = parse_duration_minutes(&format!("{hour} {minute}"));
            assert!(both >= parse_duration_minutes(hour));
            assert!(both >= parse_duration_minutes(minute));
        }
    }

    #[test]
    fn reps_take_the_number_before_the_token() {
        assert_eq!(parse_reps("Pull ups: 10 reps"), 10);
        assert_eq!(parse_reps("dips 3x 12REPS"), 12);
        assert_eq!(parse_reps("Pull ups"), 0);
        assert_eq!(parse_reps("10 pull ups"), 0);
    }
}
