use chrono::{Duration, NaiveDate, NaiveDateTime};
use rusqlite::{params, Connection};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::Cursor;
use std::path::PathBuf;
use tempfile::NamedTempFile;
use tesla_rent::{
    sqlite, Clock, Console, RentalError, RentalOutcome, RentalSession, RentalStore, Result, Stage,
    Table,
};

/// Hands out the queued readings in order.
struct ScriptedClock {
    readings: RefCell<VecDeque<NaiveDateTime>>,
}

impl ScriptedClock {
    fn elapsed(hours: i64) -> Self {
        let start = NaiveDate::from_ymd_opt(2024, 7, 14)
            .unwrap()
            .and_hms_opt(8, 30, 0)
            .unwrap();
        Self {
            readings: RefCell::new(VecDeque::from(vec![start, start + Duration::hours(hours)])),
        }
    }
}

impl Clock for ScriptedClock {
    fn now(&self) -> NaiveDateTime {
        self.readings.borrow_mut().pop_front().expect("clock read too often")
    }
}

fn run_session<C: Clock>(
    store: &RentalStore,
    input: &str,
    clock: C,
) -> (Result<RentalOutcome>, String, Stage) {
    let console = Console::new(Cursor::new(input.as_bytes().to_vec()), Vec::new());
    let mut session = RentalSession::new(store, console, clock);
    let outcome = session.run();
    let stage = session.stage();
    let output = String::from_utf8(session.into_console().into_output()).unwrap();
    (outcome, output, stage)
}

#[test]
fn test_model_3_two_hours_ten_km() -> Result<()> {
    let store = RentalStore::open_in_memory()?;
    let (outcome, output, stage) = run_session(
        &store,
        "Jane Doe\njane@example.com\n1\n\n10\n",
        ScriptedClock::elapsed(2),
    );
    let outcome = outcome?;

    assert_eq!(stage, Stage::Done);
    assert_eq!(outcome.rental.total_payment, 74.0);
    assert_eq!(outcome.rental.car_id, 1);
    assert_eq!(outcome.rental.distance_driven, 10);
    assert_eq!(outcome.rental.start_time, "2024-07-14 08:30:00");
    assert_eq!(outcome.rental.end_time, "2024-07-14 10:30:00");
    assert_eq!(outcome.customer.full_name, "Jane Doe");

    assert!(output.contains("1: Model 3 - Hourly Rate: 12 EUR/h, Distance Rate: 5 EUR/km"));
    assert!(output.contains("3: Cybertruck - Hourly Rate: 10 EUR/h, Distance Rate: 7 EUR/km"));
    assert!(output.contains("Total Payment: 74 EUR."));
    assert!(output.contains("Customer: Jane Doe, Car: Model 3"));
    Ok(())
}

#[test]
fn test_invalid_car_and_negative_distance_are_reprompted() -> Result<()> {
    let store = RentalStore::open_in_memory()?;
    let (outcome, output, _) = run_session(
        &store,
        "Sam\nsam@example.com\n0\n4\nthree\n2\n\n-5\n3\n",
        ScriptedClock::elapsed(1),
    );
    let outcome = outcome?;

    assert_eq!(output.matches("Enter the Car ID to rent (1, 2, or 3): ").count(), 4);
    assert_eq!(
        output
            .matches("Invalid Car ID. Please enter a valid Car ID (1, 2, or 3).")
            .count(),
        2
    );
    assert!(output.contains("'three' is not a whole number."));
    assert_eq!(output.matches("Enter kilometers driven: ").count(), 2);
    assert!(output.contains("Kilometers driven cannot be a negative number."));

    // Model Y: 1 h × 15 + 3 km × 8
    assert_eq!(outcome.rental.car_id, 2);
    assert_eq!(outcome.rental.total_payment, 39.0);
    Ok(())
}

#[test]
fn test_one_run_adds_one_customer_and_one_rental() -> Result<()> {
    let store = RentalStore::open_in_memory()?;
    let (first, _, _) = run_session(&store, "A\na@x\n3\n\n0\n", ScriptedClock::elapsed(0));
    first?;
    assert_eq!(store.count(Table::Customers)?, 1);
    assert_eq!(store.count(Table::Rentals)?, 1);

    let (second, output, _) = run_session(&store, "B\nb@x\n1\n\n1\n", ScriptedClock::elapsed(1));
    let second = second?;
    assert_eq!(store.count(Table::Customers)?, 2);
    assert_eq!(store.count(Table::Rentals)?, 2);
    assert_eq!(store.count(Table::Cars)?, 3);

    // The report lists every rental, not just this run's.
    assert_eq!(second.ledger.len(), 2);
    assert_eq!(output.matches("Rental ID: ").count(), 2);
    Ok(())
}

#[test]
fn test_huge_distance_is_priced_without_overflow() -> Result<()> {
    let store = RentalStore::open_in_memory()?;
    let (outcome, output, stage) = run_session(
        &store,
        "A\na@x\n2\n\n2000000000000000000\n",
        ScriptedClock::elapsed(0),
    );
    let outcome = outcome?;

    // Model Y: 8 per km
    assert_eq!(stage, Stage::Done);
    assert_eq!(outcome.rental.distance_driven, 2_000_000_000_000_000_000);
    assert_eq!(outcome.rental.total_payment, 1.6e19);
    assert!(output.contains("Total Payment: "));
    Ok(())
}

#[test]
fn test_empty_name_and_email_are_accepted() -> Result<()> {
    let store = RentalStore::open_in_memory()?;
    let (outcome, _, _) = run_session(&store, "\n\n1\n\n0\n", ScriptedClock::elapsed(0));
    let outcome = outcome?;
    assert_eq!(outcome.customer.full_name, "");
    assert_eq!(outcome.customer.email, "");
    assert_eq!(outcome.rental.total_payment, 0.0);
    Ok(())
}

#[test]
fn test_closed_input_stops_the_run() -> Result<()> {
    let store = RentalStore::open_in_memory()?;
    let (outcome, _, stage) = run_session(&store, "Jo\njo@x\n2\n", ScriptedClock::elapsed(1));
    assert!(matches!(outcome, Err(RentalError::InputClosed("end of rental"))));
    assert_eq!(stage, Stage::AwaitingEndSignal);
    assert_eq!(store.count(Table::Rentals)?, 0);
    Ok(())
}

/// Registers another customer through a second connection the moment the
/// rental end is timed, like a concurrent writer would.
struct InterleavingClock {
    inner: ScriptedClock,
    db_path: PathBuf,
}

impl Clock for InterleavingClock {
    fn now(&self) -> NaiveDateTime {
        let reading = self.inner.now();
        if self.inner.readings.borrow().is_empty() {
            let conn = Connection::open(&self.db_path).unwrap();
            conn.execute(
                "INSERT INTO Customers (FullName, Email) VALUES (?1, ?2)",
                params!["Intruder", "late@example.com"],
            )
            .unwrap();
        }
        reading
    }
}

#[test]
fn test_rental_belongs_to_this_sessions_customer() -> Result<()> {
    let temp_file = NamedTempFile::new().unwrap();
    let store = RentalStore::new(sqlite::open_database(temp_file.path())?);
    let clock = InterleavingClock {
        inner: ScriptedClock::elapsed(1),
        db_path: temp_file.path().to_path_buf(),
    };

    let (outcome, _, _) = run_session(&store, "Owner\nowner@example.com\n1\n\n0\n", clock);
    let outcome = outcome?;

    assert_eq!(store.count(Table::Customers)?, 2);
    assert_eq!(outcome.rental.customer_id, outcome.customer.id);
    assert_eq!(outcome.ledger[0].customer_name, "Owner");
    Ok(())
}
