//! Row types for the three rental tables.

use chrono::NaiveDateTime;

/// Text layout of `StartTime`/`EndTime` columns.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Catalog inserted on first run: (id, model, hourly rate, distance rate).
pub const SEED_CARS: [(i64, &str, i64, i64); 3] = [
    (1, "Model 3", 12, 5),
    (2, "Model Y", 15, 8),
    (3, "Cybertruck", 10, 7),
];

#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    pub id: i64,
    pub full_name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Car {
    pub id: i64,
    pub model: String,
    /// EUR per hour
    pub hourly_rate: i64,
    /// EUR per km
    pub distance_rate: i64,
}

/// A rental before it has been given a row id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRental {
    pub customer_id: i64,
    pub car_id: i64,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub distance_driven: i64,
    pub total_payment: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Rental {
    pub id: i64,
    pub customer_id: i64,
    pub car_id: i64,
    pub start_time: String,
    pub end_time: String,
    pub distance_driven: i64,
    pub total_payment: f64,
}

/// A rental with the customer name and car model resolved for display.
/// Names are empty when the referenced row no longer exists.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerEntry {
    pub rental: Rental,
    pub customer_name: String,
    pub car_model: String,
}

pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

impl std::fmt::Display for Car {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} - Hourly Rate: {} EUR/h, Distance Rate: {} EUR/km",
            self.id, self.model, self.hourly_rate, self.distance_rate
        )
    }
}

impl std::fmt::Display for LedgerEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let r = &self.rental;
        write!(
            f,
            "Rental ID: {}, Customer: {}, Car: {}, Start Time: {}, End Time: {}, Kilometers: {}, Total Payment: {} EUR",
            r.id,
            self.customer_name,
            self.car_model,
            r.start_time,
            r.end_time,
            r.distance_driven,
            r.total_payment
        )
    }
}
