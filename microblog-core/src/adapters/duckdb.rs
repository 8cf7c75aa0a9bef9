//! DuckDB repository implementation

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use chrono::{DateTime, Utc};
use duckdb::{params, Connection};

use crate::domain::result::{Error, Result};
use crate::domain::{Post, User};
use crate::services::MigrationService;

/// Maximum number of retries when the database file is locked
const MAX_RETRIES: u32 = 5;

/// Initial retry delay in milliseconds (doubles each retry: 50, 100, 200, 400, 800ms)
const INITIAL_RETRY_DELAY_MS: u64 = 50;

/// Check if an error message indicates a file locking issue that should be retried
fn is_retryable_error(err_msg: &str) -> bool {
    let lower = err_msg.to_lowercase();
    // Windows error messages
    lower.contains("being used by another process")
        || lower.contains("cannot access the file")
        // Unix/macOS error messages
        || lower.contains("resource temporarily unavailable")
        || lower.contains("database is locked")
        || lower.contains("file is already open")
}

/// DuckDB repository implementation
///
/// Holds the single connection behind a mutex; every operation reads
/// current persisted state. This is the persistence handle that gets
/// injected into the services.
pub struct DuckDbRepository {
    conn: Mutex<Connection>,
    db_path: PathBuf,
}

impl DuckDbRepository {
    /// Create a new DuckDB repository
    ///
    /// Includes retry logic with exponential backoff for file locking
    /// errors, which can occur when another process (a second CLI
    /// invocation) has the database open.
    pub fn new(db_path: &Path) -> Result<Self> {
        let mut last_error = None;

        for attempt in 0..MAX_RETRIES {
            match Self::try_open_connection(db_path) {
                Ok(conn) => {
                    return Ok(Self {
                        conn: Mutex::new(conn),
                        db_path: db_path.to_path_buf(),
                    });
                }
                Err(e) => {
                    let err_msg = e.to_string();
                    if is_retryable_error(&err_msg) && attempt < MAX_RETRIES - 1 {
                        let delay =
                            Duration::from_millis(INITIAL_RETRY_DELAY_MS * 2u64.pow(attempt));
                        eprintln!(
                            "[microblog] Database busy, retrying in {}ms (attempt {}/{}): {}",
                            delay.as_millis(),
                            attempt + 1,
                            MAX_RETRIES,
                            err_msg
                        );
                        thread::sleep(delay);
                        last_error = Some(e);
                        continue;
                    }
                    return Err(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            Error::database(format!("Failed to open database after {} retries", MAX_RETRIES))
        }))
    }

    /// Attempt to open a database connection (called by new() with retry logic)
    fn try_open_connection(db_path: &Path) -> Result<Connection> {
        // Extension autoloading is off: the schema only needs core SQL
        let config = duckdb::Config::default().enable_autoload_extension(false)?;
        let conn = Connection::open_with_flags(db_path, config)?;
        Ok(conn)
    }

    /// Run database migrations using the MigrationService
    pub fn run_migrations(&self) -> Result<crate::services::MigrationResult> {
        let conn = self.conn.lock().unwrap();
        let migration_service = MigrationService::new(&conn);
        migration_service.run_pending()
    }

    /// Ensure database schema exists (runs pending migrations)
    pub fn ensure_schema(&self) -> Result<()> {
        self.run_migrations()?;
        Ok(())
    }

    /// Path of the backing database file
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    // === User operations ===

    /// Insert a new user and return the stored row (id from the sequence)
    pub fn insert_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
        last_seen: DateTime<Utc>,
    ) -> Result<User> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "INSERT INTO users (username, email, password_hash, about_me, last_seen)
             VALUES (?, ?, ?, NULL, ?)
             RETURNING id",
        )?;

        let id: i64 = stmt.query_row(
            params![username, email, password_hash, last_seen.to_rfc3339()],
            |row| row.get(0),
        )?;

        Ok(User {
            id,
            username: username.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            about_me: None,
            last_seen,
        })
    }

    pub fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_where("id = ?", params![id])
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.get_user_where("username = ?", params![username])
    }

    pub fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.get_user_where("email = ?", params![email])
    }

    fn get_user_where(&self, predicate: &str, args: &[&dyn duckdb::ToSql]) -> Result<Option<User>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "SELECT id, username, email, password_hash, about_me, last_seen
             FROM users WHERE {}",
            predicate
        ))?;

        optional(stmt.query_row(args, row_to_user))
    }

    /// Overwrite a user's stored credential hash
    pub fn update_password_hash(&self, user_id: i64, password_hash: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        let changed = conn.execute(
            "UPDATE users SET password_hash = ? WHERE id = ?",
            params![password_hash, user_id],
        )?;
        if changed == 0 {
            return Err(Error::not_found(format!("user {}", user_id)));
        }
        Ok(())
    }

    pub fn update_about_me(&self, user_id: i64, about_me: Option<&str>) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        let changed = conn.execute(
            "UPDATE users SET about_me = ? WHERE id = ?",
            params![about_me, user_id],
        )?;
        if changed == 0 {
            return Err(Error::not_found(format!("user {}", user_id)));
        }
        Ok(())
    }

    pub fn touch_last_seen(&self, user_id: i64, when: DateTime<Utc>) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        let changed = conn.execute(
            "UPDATE users SET last_seen = ? WHERE id = ?",
            params![when.to_rfc3339(), user_id],
        )?;
        if changed == 0 {
            return Err(Error::not_found(format!("user {}", user_id)));
        }
        Ok(())
    }

    pub fn count_users(&self) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        let count = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
        Ok(count)
    }

    // === Post operations ===

    /// Insert a new post and return the stored row (id from the sequence)
    pub fn insert_post(
        &self,
        user_id: i64,
        body: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<Post> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "INSERT INTO posts (body, timestamp, user_id)
             VALUES (?, ?, ?)
             RETURNING id",
        )?;

        let id: i64 = stmt.query_row(
            params![body, timestamp.to_rfc3339(), user_id],
            |row| row.get(0),
        )?;

        Ok(Post {
            id,
            body: body.to_string(),
            timestamp,
            user_id,
        })
    }

    /// A user's own posts, newest first (ties broken by id descending)
    pub fn get_posts_by_user(&self, user_id: i64, limit: i64, offset: i64) -> Result<Vec<Post>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, body, timestamp, user_id
             FROM posts
             WHERE user_id = ?
             ORDER BY timestamp DESC, id DESC
             LIMIT ? OFFSET ?",
        )?;

        let posts = stmt
            .query_map(params![user_id, limit, offset], row_to_post)?
            .filter_map(|r| r.ok())
            .collect();

        Ok(posts)
    }

    pub fn count_posts_by_user(&self, user_id: i64) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        let count = conn.query_row(
            "SELECT COUNT(*) FROM posts WHERE user_id = ?",
            params![user_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    pub fn count_posts(&self) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        let count = conn.query_row("SELECT COUNT(*) FROM posts", [], |row| row.get(0))?;
        Ok(count)
    }

    // === Follow edge operations ===

    /// Create a follow edge; a pre-existing edge is left untouched.
    ///
    /// OR IGNORE plus the composite primary key keeps check-then-insert
    /// races from ever producing a duplicate edge.
    pub fn insert_follow_edge(&self, follower_id: i64, followed_id: i64) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT OR IGNORE INTO followers (follower_id, followed_id) VALUES (?, ?)",
            params![follower_id, followed_id],
        )?;
        Ok(())
    }

    /// Remove a follow edge; removing an absent edge is a no-op.
    pub fn delete_follow_edge(&self, follower_id: i64, followed_id: i64) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "DELETE FROM followers WHERE follower_id = ? AND followed_id = ?",
            params![follower_id, followed_id],
        )?;
        Ok(())
    }

    /// Membership probe on the edge set (primary-key lookup)
    pub fn is_following(&self, follower_id: i64, followed_id: i64) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM followers WHERE follower_id = ? AND followed_id = ?",
            params![follower_id, followed_id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Users that `user_id` follows, ordered by username, one page at a time
    pub fn get_following(&self, user_id: i64, limit: i64, offset: i64) -> Result<Vec<User>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT u.id, u.username, u.email, u.password_hash, u.about_me, u.last_seen
             FROM users u
             JOIN followers f ON f.followed_id = u.id
             WHERE f.follower_id = ?
             ORDER BY u.username
             LIMIT ? OFFSET ?",
        )?;

        let users = stmt
            .query_map(params![user_id, limit, offset], row_to_user)?
            .filter_map(|r| r.ok())
            .collect();

        Ok(users)
    }

    /// Users that follow `user_id` (reverse lookup), ordered by username
    pub fn get_followers(&self, user_id: i64, limit: i64, offset: i64) -> Result<Vec<User>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT u.id, u.username, u.email, u.password_hash, u.about_me, u.last_seen
             FROM users u
             JOIN followers f ON f.follower_id = u.id
             WHERE f.followed_id = ?
             ORDER BY u.username
             LIMIT ? OFFSET ?",
        )?;

        let users = stmt
            .query_map(params![user_id, limit, offset], row_to_user)?
            .filter_map(|r| r.ok())
            .collect();

        Ok(users)
    }

    pub fn count_following(&self, user_id: i64) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        let count = conn.query_row(
            "SELECT COUNT(*) FROM followers WHERE follower_id = ?",
            params![user_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    pub fn count_followers(&self, user_id: i64) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        let count = conn.query_row(
            "SELECT COUNT(*) FROM followers WHERE followed_id = ?",
            params![user_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    pub fn count_follow_edges(&self) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        let count = conn.query_row("SELECT COUNT(*) FROM followers", [], |row| row.get(0))?;
        Ok(count)
    }

    // === Timeline query ===

    /// One page of the timeline: posts by followed users UNION the user's
    /// own posts, newest first, ties broken by id descending.
    ///
    /// UNION (not UNION ALL) dedupes by row identity, so a self-loop in the
    /// graph could never surface the same post twice.
    pub fn followed_posts(&self, user_id: i64, limit: i64, offset: i64) -> Result<Vec<Post>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT p.id, p.body, p.timestamp, p.user_id
             FROM posts p
             JOIN followers f ON f.followed_id = p.user_id
             WHERE f.follower_id = ?
             UNION
             SELECT p.id, p.body, p.timestamp, p.user_id
             FROM posts p
             WHERE p.user_id = ?
             ORDER BY timestamp DESC, id DESC
             LIMIT ? OFFSET ?",
        )?;

        let posts = stmt
            .query_map(params![user_id, user_id, limit, offset], row_to_post)?
            .filter_map(|r| r.ok())
            .collect();

        Ok(posts)
    }

    /// Total size of the timeline union, for page arithmetic
    pub fn count_followed_posts(&self, user_id: i64) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        let count = conn.query_row(
            "SELECT COUNT(*) FROM (
                 SELECT p.id
                 FROM posts p
                 JOIN followers f ON f.followed_id = p.user_id
                 WHERE f.follower_id = ?
                 UNION
                 SELECT p.id FROM posts p WHERE p.user_id = ?
             ) AS timeline",
            params![user_id, user_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

// Helper functions

fn row_to_user(row: &duckdb::Row) -> duckdb::Result<User> {
    let last_seen: Option<String> = row.get(5)?;
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        password_hash: row.get(3)?,
        about_me: row.get(4)?,
        last_seen: parse_timestamp(&last_seen.unwrap_or_default()),
    })
}

fn row_to_post(row: &duckdb::Row) -> duckdb::Result<Post> {
    let timestamp: String = row.get(2)?;
    Ok(Post {
        id: row.get(0)?,
        body: row.get(1)?,
        timestamp: parse_timestamp(&timestamp),
        user_id: row.get(3)?,
    })
}

fn parse_timestamp(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

/// Map a missed single-row query to None instead of an error
fn optional<T>(result: duckdb::Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(duckdb::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_error_detection() {
        assert!(is_retryable_error("IO Error: database is locked"));
        assert!(is_retryable_error("Resource temporarily unavailable"));
        assert!(!is_retryable_error("Constraint Error: duplicate key"));
    }

    #[test]
    fn test_parse_timestamp_round_trip() {
        let now = Utc::now();
        let parsed = parse_timestamp(&now.to_rfc3339());
        assert_eq!(parsed, now);
    }
}
