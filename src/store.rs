//! Parameterized queries over the rental tables.

use log::info;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::error::{RentalError, Result};
use crate::models::{format_timestamp, Car, Customer, LedgerEntry, NewRental, Rental};

/// Owns the connection for the lifetime of a run.
pub struct RentalStore {
    conn: Connection,
}

impl RentalStore {
    /// Wrap a connection that already carries the rental schema.
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// In-memory store with schema and catalog applied.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        crate::sqlite::prepare_connection(&conn)?;
        Ok(Self::new(conn))
    }

    pub fn insert_customer(&self, full_name: &str, email: &str) -> Result<Customer> {
        self.conn.execute(
            "INSERT INTO Customers (FullName, Email) VALUES (?1, ?2)",
            params![full_name, email],
        )?;
        let id = self.conn.last_insert_rowid();
        info!("customer {} registered", id);
        Ok(Customer {
            id,
            full_name: full_name.to_string(),
            email: email.to_string(),
        })
    }

    pub fn customer(&self, id: i64) -> Result<Option<Customer>> {
        let customer = self
            .conn
            .query_row(
                "SELECT Id, FullName, Email FROM Customers WHERE Id = ?1",
                [id],
                |row| {
                    Ok(Customer {
                        id: row.get(0)?,
                        full_name: row.get(1)?,
                        email: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(customer)
    }

    pub fn list_cars(&self) -> Result<Vec<Car>> {
        let mut stmt = self
            .conn
            .prepare("SELECT Id, Model, HourlyRate, DistanceRate FROM Cars ORDER BY Id")?;
        let cars = stmt
            .query_map([], car_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(cars)
    }

    pub fn car(&self, id: i64) -> Result<Car> {
        self.conn
            .query_row(
                "SELECT Id, Model, HourlyRate, DistanceRate FROM Cars WHERE Id = ?1",
                [id],
                car_from_row,
            )
            .optional()?
            .ok_or(RentalError::UnknownCar(id))
    }

    pub fn insert_rental(&self, rental: &NewRental) -> Result<Rental> {
        let start_time = format_timestamp(&rental.start_time);
        let end_time = format_timestamp(&rental.end_time);
        self.conn.execute(
            "INSERT INTO Rentals (CustomerId, CarId, StartTime, EndTime, DistanceDriven, TotalPayment) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                rental.customer_id,
                rental.car_id,
                start_time,
                end_time,
                rental.distance_driven,
                rental.total_payment,
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        info!(
            "rental {} stored for customer {} on car {}",
            id, rental.customer_id, rental.car_id
        );
        Ok(Rental {
            id,
            customer_id: rental.customer_id,
            car_id: rental.car_id,
            start_time,
            end_time,
            distance_driven: rental.distance_driven,
            total_payment: rental.total_payment,
        })
    }

    pub fn rentals(&self) -> Result<Vec<Rental>> {
        let mut stmt = self.conn.prepare(
            "SELECT Id, CustomerId, CarId, StartTime, EndTime, DistanceDriven, TotalPayment \
             FROM Rentals ORDER BY Id",
        )?;
        let rentals = stmt
            .query_map([], |row| {
                Ok(Rental {
                    id: row.get(0)?,
                    customer_id: row.get(1)?,
                    car_id: row.get(2)?,
                    start_time: row.get(3)?,
                    end_time: row.get(4)?,
                    distance_driven: row.get(5)?,
                    total_payment: row.get(6)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rentals)
    }

    /// Every rental with customer name and car model looked up per row.
    pub fn ledger(&self) -> Result<Vec<LedgerEntry>> {
        let mut name_stmt = self
            .conn
            .prepare_cached("SELECT FullName FROM Customers WHERE Id = ?1")?;
        let mut model_stmt = self
            .conn
            .prepare_cached("SELECT Model FROM Cars WHERE Id = ?1")?;

        let mut entries = Vec::new();
        for rental in self.rentals()? {
            let customer_name: Option<String> = name_stmt
                .query_row([rental.customer_id], |row| row.get(0))
                .optional()?;
            let car_model: Option<String> = model_stmt
                .query_row([rental.car_id], |row| row.get(0))
                .optional()?;
            entries.push(LedgerEntry {
                rental,
                customer_name: customer_name.unwrap_or_default(),
                car_model: car_model.unwrap_or_default(),
            });
        }
        Ok(entries)
    }

    pub fn count(&self, table: Table) -> Result<i64> {
        let sql = format!("SELECT COUNT(*) FROM {}", table.name());
        Ok(self.conn.query_row(&sql, [], |row| row.get(0))?)
    }
}

/// The tables a row count can be taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Customers,
    Cars,
    Rentals,
}

impl Table {
    fn name(self) -> &'static str {
        match self {
            Table::Customers => "Customers",
            Table::Cars => "Cars",
            Table::Rentals => "Rentals",
        }
    }
}

fn car_from_row(row: &Row<'_>) -> rusqlite::Result<Car> {
    Ok(Car {
        id: row.get(0)?,
        model: row.get(1)?,
        hourly_rate: row.get(2)?,
        distance_rate: row.get(3)?,
    })
}
