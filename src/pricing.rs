//! Rental payment arithmetic.

use chrono::NaiveDateTime;

use crate::models::Car;

/// Fractional hours from `start` to `end`. A clock that stepped backwards
/// counts as zero rather than a negative duration.
pub fn hours_between(start: &NaiveDateTime, end: &NaiveDateTime) -> f64 {
    let seconds = (*end - *start).num_seconds().max(0);
    seconds as f64 / 3600.0
}

/// `hours × hourly rate + distance × distance rate`, using the car's rates.
/// Computed in `f64` so any accepted distance yields a finite payment.
pub fn compute_payment(hours: f64, distance: i64, car: &Car) -> f64 {
    hours * car.hourly_rate as f64 + distance as f64 * car.distance_rate as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn model_3() -> Car {
        Car {
            id: 1,
            model: "Model 3".into(),
            hourly_rate: 12,
            distance_rate: 5,
        }
    }

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn two_hours_ten_km_on_model_3() {
        assert_eq!(compute_payment(2.0, 10, &model_3()), 74.0);
    }

    #[test]
    fn zero_duration_charges_distance_only() {
        assert_eq!(compute_payment(0.0, 3, &model_3()), 15.0);
    }

    #[test]
    fn huge_distance_does_not_overflow() {
        let payment = compute_payment(0.0, 2_000_000_000_000_000_000, &model_3());
        assert!(payment.is_finite());
        assert_eq!(payment, 1.0e19);
    }

    #[test]
    fn hours_are_fractional() {
        assert_eq!(hours_between(&at(10, 0, 0), &at(11, 30, 0)), 1.5);
        let start = at(23, 0, 0);
        assert_eq!(hours_between(&start, &(start + Duration::hours(2))), 2.0);
    }

    #[test]
    fn backwards_clock_counts_as_zero() {
        assert_eq!(hours_between(&at(12, 0, 0), &at(11, 0, 0)), 0.0);
    }
}
