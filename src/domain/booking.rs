//! Booking rules
//!
//! Validation is a pure function over snapshots of a club and a competition. Allocation mutates
//! the competition ledger and is the only place where the per-club cap is enforced.

use std::num::IntErrorKind;

use chrono::NaiveDateTime;

use super::{Club, Competition, LedgerEntry, MAX_PLACES_PER_CLUB};

/// Reason a booking was refused
///
/// Every variant is recoverable: the booking form is shown again with the message and nothing
/// has been mutated.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("Competition date has already passed")]
    Expired { date: NaiveDateTime },

    #[error("Invalid number")]
    InvalidNumber { raw: String },

    /// `requested` saturates at `i64::MIN` for larger negative inputs
    #[error("Number of places required must be positive")]
    NonPositive { requested: i64 },

    /// `requested` saturates at `u32::MAX` for larger inputs
    #[error("insufficient places in the competition")]
    InsufficientPlaces { requested: u32, available: u32 },

    #[error("insufficient number of points")]
    InsufficientPoints { requested: u32, available: u32 },

    /// The club would hold more than [`MAX_PLACES_PER_CLUB`] places in the competition
    #[error("use no more than 12 places per competition")]
    CapExceeded { already_reserved: u32, requested: u32 },
}

/// Whether a date lies strictly before `now`
pub fn is_past(date: NaiveDateTime, now: NaiveDateTime) -> bool {
    date < now
}

/// Refuse any booking activity on a competition that already took place
///
/// Both the booking form and the purchase go through this check.
pub fn ensure_open(competition: &Competition, now: NaiveDateTime) -> Result<(), Rejection> {
    if is_past(competition.date, now) {
        return Err(Rejection::Expired {
            date: competition.date,
        });
    }

    Ok(())
}

/// Check a raw place count against the club and competition
///
/// Checks run in a fixed order and the first failure wins. The per-club cap is left to
/// [`allocate`] as it depends on the ledger.
pub fn validate(
    club: &Club,
    competition: &Competition,
    raw_places: &str,
    now: NaiveDateTime,
) -> Result<u32, Rejection> {
    ensure_open(competition, now)?;

    // Well-formed integers beyond i64 saturate, they are still negative or far too large
    let requested = match raw_places.trim().parse::<i64>() {
        Ok(requested) => requested,
        Err(err) => match err.kind() {
            IntErrorKind::NegOverflow => i64::MIN,
            IntErrorKind::PosOverflow => i64::MAX,
            _ => {
                return Err(Rejection::InvalidNumber {
                    raw: raw_places.to_string(),
                })
            }
        },
    };
    if requested <= 0 {
        return Err(Rejection::NonPositive { requested });
    }

    // Anything above u32::MAX cannot fit in either counter
    let places = u32::try_from(requested).unwrap_or(u32::MAX);
    if places > competition.number_of_places {
        return Err(Rejection::InsufficientPlaces {
            requested: places,
            available: competition.number_of_places,
        });
    }
    if places > club.points {
        return Err(Rejection::InsufficientPoints {
            requested: places,
            available: club.points,
        });
    }

    Ok(places)
}

/// Record `places` for the club in the competition ledger
///
/// Leaves the ledger untouched when the cumulative total would exceed [`MAX_PLACES_PER_CLUB`].
/// Points and available places are not touched here, see [`apply_booking`].
pub fn allocate(club: &Club, competition: &mut Competition, places: u32) -> Result<(), Rejection> {
    if places == 0 {
        return Err(Rejection::NonPositive { requested: 0 });
    }

    match competition
        .reserved_places
        .iter_mut()
        .find(|entry| entry.club_name == club.name)
    {
        Some(entry) => {
            let total = entry.reserved_places.saturating_add(places);
            if total > MAX_PLACES_PER_CLUB {
                return Err(Rejection::CapExceeded {
                    already_reserved: entry.reserved_places,
                    requested: places,
                });
            }
            entry.reserved_places = total;
        }
        None => {
            if places > MAX_PLACES_PER_CLUB {
                return Err(Rejection::CapExceeded {
                    already_reserved: 0,
                    requested: places,
                });
            }
            competition.reserved_places.push(LedgerEntry {
                club_name: club.name.clone(),
                reserved_places: places,
            });
        }
    }

    Ok(())
}

/// Allocate the places and debit the club points and competition places
///
/// Both debits are checked before the ledger is touched, so on error neither record changed.
pub fn apply_booking(
    club: &mut Club,
    competition: &mut Competition,
    places: u32,
) -> Result<(), Rejection> {
    let remaining_places = competition
        .number_of_places
        .checked_sub(places)
        .ok_or(Rejection::InsufficientPlaces {
            requested: places,
            available: competition.number_of_places,
        })?;
    let remaining_points = club
        .points
        .checked_sub(places)
        .ok_or(Rejection::InsufficientPoints {
            requested: places,
            available: club.points,
        })?;

    allocate(club, competition, places)?;

    competition.number_of_places = remaining_places;
    club.points = remaining_points;

    Ok(())
}

/// Largest place count the club could book right now
pub fn max_bookable(club: &Club, competition: &Competition) -> u32 {
    MAX_PLACES_PER_CLUB
        .saturating_sub(competition.reserved_by(&club.name))
        .min(club.points)
        .min(competition.number_of_places)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use rstest::*;
    use speculoos::prelude::*;

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[fixture]
    fn now() -> NaiveDateTime {
        noon()
    }

    #[fixture]
    fn club() -> Club {
        Club::new("Club_test", "club_test@email.fr", 15)
    }

    #[fixture]
    fn competition(now: NaiveDateTime) -> Competition {
        Competition::new("Competition_test", now + Duration::days(30), 10)
    }

    #[rstest]
    #[case(noon() - Duration::days(50), true)]
    #[case(noon() - Duration::seconds(1), true)]
    #[case(noon(), false)]
    #[case(noon() + Duration::days(1), false)]
    fn test_is_past(now: NaiveDateTime, #[case] date: NaiveDateTime, #[case] expected: bool) {
        assert_that!(is_past(date, now)).is_equal_to(expected);
    }

    #[rstest]
    #[case("10", 10)]
    #[case("1", 1)]
    #[case(" 3 ", 3)]
    #[case("+4", 4)]
    fn test_validate_ok(
        club: Club,
        competition: Competition,
        now: NaiveDateTime,
        #[case] raw: &str,
        #[case] expected: u32,
    ) {
        let res = validate(&club, &competition, raw, now);

        assert_that!(res).is_ok().is_equal_to(expected);
    }

    #[rstest]
    #[case("abc")]
    #[case("")]
    #[case("2.5")]
    #[case("1e3")]
    #[case("- 5")]
    fn test_validate_invalid_number(
        club: Club,
        competition: Competition,
        now: NaiveDateTime,
        #[case] raw: &str,
    ) {
        let res = validate(&club, &competition, raw, now);

        assert_that!(res)
            .is_err()
            .matches(|err| matches!(err, Rejection::InvalidNumber { .. }));
    }

    #[rstest]
    #[case("0", 0)]
    #[case("-5", -5)]
    #[case("-100", -100)]
    #[case("-99999999999999999999999", i64::MIN)]
    fn test_validate_non_positive(
        club: Club,
        competition: Competition,
        now: NaiveDateTime,
        #[case] raw: &str,
        #[case] requested: i64,
    ) {
        let res = validate(&club, &competition, raw, now);

        assert_that!(res)
            .is_err()
            .is_equal_to(Rejection::NonPositive { requested });
    }

    #[rstest]
    fn test_validate_insufficient_places(club: Club, competition: Competition, now: NaiveDateTime) {
        let res = validate(&club, &competition, "12", now);

        assert_that!(res)
            .is_err()
            .is_equal_to(Rejection::InsufficientPlaces {
                requested: 12,
                available: 10,
            });
    }

    #[rstest]
    fn test_validate_huge_request_is_insufficient_places(
        club: Club,
        competition: Competition,
        now: NaiveDateTime,
    ) {
        let res = validate(&club, &competition, "5000000000", now);

        assert_that!(res)
            .is_err()
            .matches(|err| matches!(err, Rejection::InsufficientPlaces { .. }));
    }

    /// Integers too large for any counter are still integers, not invalid input
    #[rstest]
    #[case("99999999999999999999999")]
    #[case("+99999999999999999999999")]
    fn test_validate_overflow_is_insufficient_places(
        club: Club,
        competition: Competition,
        now: NaiveDateTime,
        #[case] raw: &str,
    ) {
        let res = validate(&club, &competition, raw, now);

        assert_that!(res)
            .is_err()
            .is_equal_to(Rejection::InsufficientPlaces {
                requested: u32::MAX,
                available: 10,
            });
    }

    /// 11 places requested with only 10 points
    #[rstest]
    fn test_validate_insufficient_points(now: NaiveDateTime) {
        let club = Club::new("Club_test_2", "club_test_2@email.fr", 10);
        let competition = Competition::new("Competition_test_2", now + Duration::days(30), 15);

        let res = validate(&club, &competition, "11", now);

        assert_that!(res)
            .is_err()
            .is_equal_to(Rejection::InsufficientPoints {
                requested: 11,
                available: 10,
            });
    }

    /// An expired competition wins over every other failure
    #[rstest]
    #[case("3")]
    #[case("abc")]
    #[case("-5")]
    #[case("500")]
    fn test_validate_expired_first(club: Club, now: NaiveDateTime, #[case] raw: &str) {
        let competition = Competition::new("Fall Classic", now - Duration::days(50), 10);

        let res = validate(&club, &competition, raw, now);

        assert_that!(res)
            .is_err()
            .matches(|err| matches!(err, Rejection::Expired { .. }));
    }

    /// The cap is not a validation concern
    #[rstest]
    fn test_validate_ignores_cap(now: NaiveDateTime) {
        let club = Club::new("Club_test", "club_test@email.fr", 30);
        let competition = Competition::new("Competition_test", now + Duration::days(1), 20);

        let res = validate(&club, &competition, "13", now);

        assert_that!(res).is_ok().is_equal_to(13);
    }

    #[rstest]
    fn test_allocate_new_entry(club: Club, mut competition: Competition) {
        let res = allocate(&club, &mut competition, 10);

        assert_that!(res).is_ok();
        assert_that!(competition.reserved_places).is_equal_to(vec![LedgerEntry {
            club_name: "Club_test".to_string(),
            reserved_places: 10,
        }]);
        // Allocation alone does not debit anything
        assert_that!(competition.number_of_places).is_equal_to(10);
    }

    #[rstest]
    fn test_allocate_increments_entry(club: Club, mut competition: Competition) {
        allocate(&club, &mut competition, 4).unwrap();
        let res = allocate(&club, &mut competition, 8);

        assert_that!(res).is_ok();
        assert_that!(competition.reserved_places).has_length(1);
        assert_that!(competition.reserved_by("Club_test")).is_equal_to(12);
    }

    #[rstest]
    fn test_allocate_new_entry_over_cap(club: Club, mut competition: Competition) {
        let res = allocate(&club, &mut competition, 13);

        assert_that!(res).is_err().is_equal_to(Rejection::CapExceeded {
            already_reserved: 0,
            requested: 13,
        });
        assert_that!(competition.reserved_places).is_empty();
    }

    #[rstest]
    fn test_allocate_existing_entry_over_cap(club: Club, mut competition: Competition) {
        allocate(&club, &mut competition, 10).unwrap();
        let before = competition.clone();

        let res = allocate(&club, &mut competition, 3);

        assert_that!(res).is_err().is_equal_to(Rejection::CapExceeded {
            already_reserved: 10,
            requested: 3,
        });
        assert_that!(competition).is_equal_to(before);
    }

    #[rstest]
    fn test_allocate_zero(club: Club, mut competition: Competition) {
        let res = allocate(&club, &mut competition, 0);

        assert_that!(res).is_err();
        assert_that!(competition.reserved_places).is_empty();
    }

    #[rstest]
    fn test_allocate_other_clubs_independent(club: Club, mut competition: Competition) {
        let other = Club::new("Iron Temple", "admin@irontemple.com", 4);
        allocate(&club, &mut competition, 12).unwrap();

        let res = allocate(&other, &mut competition, 12);

        assert_that!(res).is_ok();
        assert_that!(competition.reserved_places).has_length(2);
    }

    /// 15 points, 10 places: booking 10 then 3 more
    #[rstest]
    fn test_apply_booking_scenario(mut club: Club, mut competition: Competition) {
        let res = apply_booking(&mut club, &mut competition, 10);

        assert_that!(res).is_ok();
        assert_that!(club.points).is_equal_to(5);
        assert_that!(competition.number_of_places).is_equal_to(0);
        assert_that!(competition.reserved_by("Club_test")).is_equal_to(10);

        // Give the competition more room so only the cap can fail
        competition.number_of_places = 10;
        let (club_before, competition_before) = (club.clone(), competition.clone());
        let res = apply_booking(&mut club, &mut competition, 3);

        assert_that!(res)
            .is_err()
            .matches(|err| matches!(err, Rejection::CapExceeded { .. }));
        assert_that!(club).is_equal_to(club_before);
        assert_that!(competition).is_equal_to(competition_before);
    }

    #[rstest]
    fn test_apply_booking_insufficient_points_untouched(mut competition: Competition) {
        let mut club = Club::new("Club_test_2", "club_test_2@email.fr", 2);

        let res = apply_booking(&mut club, &mut competition, 3);

        assert_that!(res)
            .is_err()
            .matches(|err| matches!(err, Rejection::InsufficientPoints { .. }));
        assert_that!(club.points).is_equal_to(2);
        assert_that!(competition.reserved_places).is_empty();
    }

    #[rstest]
    #[case(15, 10, 0, 10)]
    #[case(15, 25, 0, 12)]
    #[case(4, 25, 0, 4)]
    #[case(15, 25, 9, 3)]
    #[case(15, 25, 12, 0)]
    fn test_max_bookable(
        now: NaiveDateTime,
        #[case] points: u32,
        #[case] places: u32,
        #[case] reserved: u32,
        #[case] expected: u32,
    ) {
        let club = Club::new("Club_test", "club_test@email.fr", points);
        let mut competition = Competition::new("Competition_test", now, places);
        if reserved > 0 {
            competition.reserved_places.push(LedgerEntry {
                club_name: club.name.clone(),
                reserved_places: reserved,
            });
        }

        assert_that!(max_bookable(&club, &competition)).is_equal_to(expected);
    }

    #[test]
    fn test_messages() {
        let err = Rejection::CapExceeded {
            already_reserved: 10,
            requested: 3,
        };

        assert_that!(err.to_string())
            .is_equal_to("use no more than 12 places per competition".to_string());
    }
}
