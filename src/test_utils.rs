/// # Test Utilities Module
///
/// Shared fixtures for the in-crate tests:
/// - In-memory database fixtures with a standard schema
/// - Helpers for asserting on `SqlError` values
/// - Small query helpers built on `Statement`

use crate::core::SqlResult;
use crate::Connection;

/// Isolated in-memory database test fixture
pub struct DatabaseFixture {
    pub name: String,
    pub connection: Connection,
}

impl DatabaseFixture {
    /// Create a new empty in-memory test database
    pub fn new(name: &str) -> SqlResult<Self> {
        let mut connection = Connection::new();
        connection.create_in_memory()?;

        Ok(DatabaseFixture {
            name: name.to_string(),
            connection,
        })
    }

    /// Create fixture with sample data schema
    pub fn with_sample_data(name: &str) -> SqlResult<Self> {
        let fixture = Self::new(name)?;

        fixture.setup_standard_schema()?;
        fixture.populate_sample_data()?;

        Ok(fixture)
    }

    /// Set up standard test schema
    pub fn setup_standard_schema(&self) -> SqlResult<()> {
        self.connection.execute(
            "
            CREATE TABLE users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL UNIQUE,
                email TEXT,
                avatar BLOB,
                score INTEGER NOT NULL DEFAULT 0
            );

            CREATE TABLE posts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL REFERENCES users (id),
                title TEXT NOT NULL
            );
        ",
        )
    }

    /// Populate with sample data through a reused prepared statement
    pub fn populate_sample_data(&self) -> SqlResult<()> {
        let users: [(&str, Option<&str>, i64); 3] = [
            ("alice", Some("alice@example.com"), 10),
            ("bob", None, 20),
            ("charlie", Some("charlie@example.com"), 30),
        ];

        let mut insert = self
            .connection
            .prepare("INSERT INTO users (username, email, score) VALUES (?, ?, ?)")?;
        for (username, email, score) in users {
            insert.reset()?;
            insert.bind(0, username)?;
            insert.bind(1, email)?;
            insert.bind(2, score)?;
            insert.step()?;
        }

        self.connection.execute(
            "
            INSERT INTO posts (user_id, title) VALUES (1, 'Welcome to Rust');
            INSERT INTO posts (user_id, title) VALUES (1, 'Owning native handles');
        ",
        )
    }

    /// Runs a single-value query and returns the first column as i64
    pub fn query_i64(&self, sql: &str) -> SqlResult<i64> {
        let mut stmt = self.connection.prepare(sql)?;
        assert!(stmt.step()?, "query returned no rows: {}", sql);
        Ok(stmt.get_int64(0))
    }
}

/// Error testing utilities for `SqlError`
pub mod error_testing {
    use crate::core::SqlError;

    /// Verify an engine error carries a status code and a descriptive message
    pub fn verify_error_message_quality<T>(result: &Result<T, SqlError>, context: &str)
    where
        T: std::fmt::Debug,
    {
        match result {
            Ok(value) => panic!("Expected error but got Ok({:?}) in {}", value, context),
            Err(error) => {
                assert_ne!(error.code, 0, "Error code should be non-zero in {}", context);
                assert!(
                    !error.message.is_empty(),
                    "Error message should not be empty in {}",
                    context
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_fixture_creation() {
        let fixture = DatabaseFixture::new("test_create").unwrap();
        assert_eq!(fixture.name, "test_create");
        assert!(fixture.connection.is_open());
    }

    #[test]
    fn test_sample_data_fixture() {
        let fixture = DatabaseFixture::with_sample_data("test_sample").unwrap();

        let tables = fixture
            .query_i64("SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'")
            .unwrap();
        assert_eq!(tables, 2);
        assert_eq!(fixture.query_i64("SELECT COUNT(*) FROM users").unwrap(), 3);
        assert_eq!(fixture.query_i64("SELECT SUM(score) FROM users").unwrap(), 60);
        assert_eq!(fixture.connection.live_statement_count(), 0);
    }
}
