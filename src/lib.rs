//! Console car-rental record keeper backed by SQLite.
//!
//! # Intention
//!
//! - Register a customer, rent one car from a fixed catalog, price the
//!   rental from the car's hourly and distance rates, and keep every record
//!   in a local SQLite file.
//! - Keep the console flow generic over reader/writer and clock so it can be
//!   driven end to end from tests.
//!
//! # Architectural Boundaries
//!
//! - `sqlite`: schema definition, bootstrap and catalog seeding.
//! - `store`: parameterized queries; no console I/O.
//! - `session`: the interactive flow; talks to storage only through `store`.

pub mod config;
pub mod console;
pub mod error;
pub mod models;
pub mod pricing;
pub mod session;
pub mod sqlite;
pub mod store;

pub use config::RentalConfig;
pub use console::Console;
pub use error::{RentalError, Result};
pub use models::{Car, Customer, LedgerEntry, NewRental, Rental};
pub use session::{Clock, RentalOutcome, RentalSession, Stage, SystemClock};
pub use store::{RentalStore, Table};
