//! One pass through registration and a single rental.
//!
//! The run walks a fixed sequence of [`Stage`]s and never branches back;
//! only the car and distance prompts loop until they get an acceptable
//! answer.

use chrono::{Local, NaiveDateTime, Timelike};
use log::debug;
use std::io::{BufRead, Write};

use crate::console::Console;
use crate::error::Result;
use crate::models::{format_timestamp, Customer, LedgerEntry, NewRental, Rental};
use crate::pricing::{compute_payment, hours_between};
use crate::store::RentalStore;

const NEGATIVE_DISTANCE: &str =
    "Kilometers driven cannot be a negative number. Please enter a valid number.";

/// Source of wall-clock readings for the rental start and end.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

/// Local time, truncated to whole seconds as stored.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        let now = Local::now().naive_local();
        now.with_nanosecond(0).unwrap_or(now)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Registering,
    ListingCars,
    AwaitingSelection,
    TimingStart,
    AwaitingEndSignal,
    TimingEnd,
    AwaitingDistance,
    ComputingPayment,
    Persisting,
    Reporting,
    Done,
}

/// What a completed run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct RentalOutcome {
    pub customer: Customer,
    pub rental: Rental,
    pub ledger: Vec<LedgerEntry>,
}

pub struct RentalSession<'a, R, W, C> {
    store: &'a RentalStore,
    console: Console<R, W>,
    clock: C,
    stage: Stage,
}

impl<'a, R: BufRead, W: Write, C: Clock> RentalSession<'a, R, W, C> {
    pub fn new(store: &'a RentalStore, console: Console<R, W>, clock: C) -> Self {
        Self {
            store,
            console,
            clock,
            stage: Stage::Idle,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    fn enter(&mut self, stage: Stage) {
        debug!("{:?} -> {:?}", self.stage, stage);
        self.stage = stage;
    }

    /// Drive the whole interaction and persist its results.
    pub fn run(&mut self) -> Result<RentalOutcome> {
        let customer = self.register()?;
        let car_id = self.select_car()?;

        self.enter(Stage::TimingStart);
        let start_time = self.clock.now();
        self.console
            .say(&format!("Rental started at: {}", format_timestamp(&start_time)))?;

        self.enter(Stage::AwaitingEndSignal);
        self.console.prompt("\nPress Enter when rental has ended...")?;
        self.console.read_line("end of rental")?;

        self.enter(Stage::TimingEnd);
        let end_time = self.clock.now();
        self.console
            .say(&format!("Rental ended at: {}", format_timestamp(&end_time)))?;

        self.enter(Stage::AwaitingDistance);
        let distance_driven = self
            .console
            .ask_integer("\nEnter kilometers driven: ", "distance", |km| {
                if km < 0 {
                    Err(NEGATIVE_DISTANCE.into())
                } else {
                    Ok(())
                }
            })?;

        self.enter(Stage::ComputingPayment);
        let car = self.store.car(car_id)?;
        let hours = hours_between(&start_time, &end_time);
        let total_payment = compute_payment(hours, distance_driven, &car);
        debug!(
            "{:.4} h on {} at {}/h + {} km at {}/km = {}",
            hours, car.model, car.hourly_rate, distance_driven, car.distance_rate, total_payment
        );

        self.enter(Stage::Persisting);
        let rental = self.store.insert_rental(&NewRental {
            customer_id: customer.id,
            car_id,
            start_time,
            end_time,
            distance_driven,
            total_payment,
        })?;
        self.console.say("\nRental data inserted successfully.")?;
        self.console
            .say(&format!("Total Payment: {} EUR.", rental.total_payment))?;

        self.enter(Stage::Reporting);
        let ledger = self.store.ledger()?;
        self.console.say("\nRentals in the database:")?;
        for entry in &ledger {
            self.console.say(&entry.to_string())?;
        }

        self.enter(Stage::Done);
        Ok(RentalOutcome {
            customer,
            rental,
            ledger,
        })
    }

    fn register(&mut self) -> Result<Customer> {
        self.enter(Stage::Registering);
        self.console.say("Please enter your details to register:")?;
        let full_name = self
            .console
            .ask("Full Name (First and Last Name): ", "full name")?;
        let email = self.console.ask("Email: ", "email")?;
        let customer = self.store.insert_customer(&full_name, &email)?;
        self.console.say("\nCustomer registered successfully.")?;
        Ok(customer)
    }

    fn select_car(&mut self) -> Result<i64> {
        self.enter(Stage::ListingCars);
        let cars = self.store.list_cars()?;
        self.console.say("\nAvailable cars for rent:")?;
        for car in &cars {
            self.console.say(&car.to_string())?;
        }

        self.enter(Stage::AwaitingSelection);
        let ids: Vec<i64> = cars.iter().map(|c| c.id).collect();
        let choices = join_choices(&ids);
        let prompt = format!("\nEnter the Car ID to rent ({}): ", choices);
        self.console.ask_integer(&prompt, "car id", |id| {
            if ids.contains(&id) {
                Ok(())
            } else {
                Err(format!(
                    "Invalid Car ID. Please enter a valid Car ID ({}).",
                    choices
                ))
            }
        })
    }

    pub fn into_console(self) -> Console<R, W> {
        self.console
    }
}

/// `[1, 2, 3]` becomes `1, 2, or 3`.
fn join_choices(ids: &[i64]) -> String {
    match ids {
        [] => String::new(),
        [only] => only.to_string(),
        [rest @ .., last] => {
            let head: Vec<String> = rest.iter().map(i64::to_string).collect();
            format!("{}, or {}", head.join(", "), last)
        }
    }
}
