use log::{debug, info};
use rusqlite::{params, Connection};
use std::path::Path;

use crate::error::Result;
use crate::models::SEED_CARS;

/// Schema definition for the SQLite database
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Schema {
    pub tables: Vec<TableDefinition>,
}

impl Schema {
    pub fn new() -> Self {
        Self { tables: Vec::new() }
    }
    pub fn add_table(mut self, table: TableDefinition) -> Self {
        self.tables.push(table);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableDefinition {
    pub name: String,
    pub columns: Vec<ColumnDefinition>,
    pub foreign_keys: Vec<ForeignKey>,
}

impl TableDefinition {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            columns: Vec::new(),
            foreign_keys: Vec::new(),
        }
    }

    pub fn column(
        mut self,
        name: &str,
        data_type: DataType,
        constraints: &[ColumnConstraint],
    ) -> Self {
        self.columns.push(ColumnDefinition {
            name: name.to_string(),
            data_type,
            constraints: constraints.to_vec(),
        });
        self
    }

    pub fn references(
        mut self,
        column: &str,
        foreign_table: &str,
        foreign_column: &str,
    ) -> Self {
        self.foreign_keys.push(ForeignKey {
            column: column.to_string(),
            foreign_table: foreign_table.to_string(),
            foreign_column: foreign_column.to_string(),
        });
        self
    }

    /// Render as an idempotent `CREATE TABLE IF NOT EXISTS` statement.
    pub fn create_sql(&self) -> String {
        let mut parts: Vec<String> = self
            .columns
            .iter()
            .map(ColumnDefinition::to_sql)
            .collect();
        parts.extend(self.foreign_keys.iter().map(|fk| {
            format!(
                "FOREIGN KEY ({}) REFERENCES {}({})",
                fk.column, fk.foreign_table, fk.foreign_column
            )
        }));
        format!(
            "CREATE TABLE IF NOT EXISTS {} ({});",
            self.name,
            parts.join(", ")
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDefinition {
    pub name: String,
    pub data_type: DataType,
    pub constraints: Vec<ColumnConstraint>,
}

impl ColumnDefinition {
    fn to_sql(&self) -> String {
        let mut sql = format!("{} {}", self.name, self.data_type.as_sql());
        for constraint in &self.constraints {
            sql.push(' ');
            sql.push_str(constraint.as_sql());
        }
        sql
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DataType {
    Integer,
    Text,
    Real,
}

impl DataType {
    fn as_sql(self) -> &'static str {
        match self {
            DataType::Integer => "INTEGER",
            DataType::Text => "TEXT",
            DataType::Real => "REAL",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColumnConstraint {
    /// `INTEGER PRIMARY KEY AUTOINCREMENT`: ids are never reused.
    AutoIncrementKey,
    NotNull,
}

impl ColumnConstraint {
    fn as_sql(self) -> &'static str {
        match self {
            ColumnConstraint::AutoIncrementKey => "PRIMARY KEY AUTOINCREMENT",
            ColumnConstraint::NotNull => "NOT NULL",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForeignKey {
    pub column: String,
    pub foreign_table: String,
    pub foreign_column: String,
}

/// The `Customers`, `Cars` and `Rentals` tables.
pub fn rental_schema() -> Schema {
    use ColumnConstraint::*;
    use DataType::*;

    Schema::new()
        .add_table(
            TableDefinition::new("Customers")
                .column("Id", Integer, &[AutoIncrementKey])
                .column("FullName", Text, &[NotNull])
                .column("Email", Text, &[NotNull]),
        )
        .add_table(
            TableDefinition::new("Cars")
                .column("Id", Integer, &[AutoIncrementKey])
                .column("Model", Text, &[NotNull])
                .column("HourlyRate", Integer, &[NotNull])
                .column("DistanceRate", Integer, &[NotNull]),
        )
        .add_table(
            TableDefinition::new("Rentals")
                .column("Id", Integer, &[AutoIncrementKey])
                .column("CustomerId", Integer, &[NotNull])
                .column("CarId", Integer, &[NotNull])
                .column("StartTime", Text, &[NotNull])
                .column("EndTime", Text, &[NotNull])
                .column("DistanceDriven", Integer, &[NotNull])
                .column("TotalPayment", Real, &[NotNull])
                .references("CustomerId", "Customers", "Id")
                .references("CarId", "Cars", "Id"),
        )
}

/// Create every table in `schema` that does not exist yet.
pub fn initialize_schema(conn: &Connection, schema: &Schema) -> Result<()> {
    for table in &schema.tables {
        conn.execute_batch(&table.create_sql())?;
        debug!("table {} created or already exists", table.name);
    }
    Ok(())
}

/// Insert the fixed car catalog. Rows carry explicit ids so a second run
/// is ignored instead of duplicating the catalog.
pub fn seed_cars(conn: &Connection) -> Result<()> {
    let mut stmt = conn.prepare(
        "INSERT OR IGNORE INTO Cars (Id, Model, HourlyRate, DistanceRate) VALUES (?1, ?2, ?3, ?4)",
    )?;
    let mut inserted = 0;
    for (id, model, hourly, distance) in SEED_CARS {
        inserted += stmt.execute(params![id, model, hourly, distance])?;
    }
    debug!("seeded {} car(s)", inserted);
    Ok(())
}

/// Apply the rental schema and seed data to an open connection.
pub fn prepare_connection(conn: &Connection) -> Result<()> {
    conn.pragma_update(None, "foreign_keys", true)?;
    initialize_schema(conn, &rental_schema())?;
    seed_cars(conn)?;
    Ok(())
}

/// Open the database file, creating it if absent, and make it ready for use.
pub fn open_database(path: &Path) -> Result<Connection> {
    let first_run = !path.exists();
    let conn = Connection::open(path)?;
    if first_run {
        info!("database file created at {}", path.display());
    }
    prepare_connection(&conn)?;
    info!("database ready at {}", path.display());
    Ok(conn)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_rentals_table_with_foreign_keys() {
        let schema = rental_schema();
        let rentals = schema.tables.iter().find(|t| t.name == "Rentals").unwrap();
        let sql = rentals.create_sql();
        assert!(sql.starts_with("CREATE TABLE IF NOT EXISTS Rentals ("));
        assert!(sql.contains("Id INTEGER PRIMARY KEY AUTOINCREMENT"));
        assert!(sql.contains("TotalPayment REAL NOT NULL"));
        assert!(sql.contains("FOREIGN KEY (CarId) REFERENCES Cars(Id)"));
    }

    #[test]
    fn schema_and_seed_are_idempotent() -> Result<()> {
        let conn = Connection::open_in_memory()?;
        prepare_connection(&conn)?;
        prepare_connection(&conn)?;

        let cars: i64 = conn.query_row("SELECT COUNT(*) FROM Cars", [], |row| row.get(0))?;
        assert_eq!(cars, 3);
        Ok(())
    }
}
