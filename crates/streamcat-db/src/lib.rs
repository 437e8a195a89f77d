//! Streamcat-DB: Catalog schema, migrations, and query operations
//!
//! This crate provides the catalog store for streamcat using SQLite
//! with rusqlite and r2d2 connection pooling.
//!
//! Every counter, set, and rating mutation is a single SQL statement or a
//! single `BEGIN IMMEDIATE` transaction, so concurrent requests (including
//! from several processes sharing the database file) cannot interleave a
//! read-modify-write.
//!
//! # Modules
//!
//! - `migrations` - Database schema migrations
//! - `pool` - Connection pool management
//! - `models` - Rust models matching database schema
//! - `queries` - Database query operations
//!
//! # Example
//!
//! ```no_run
//! use streamcat_db::pool::{init_pool, get_conn};
//! use streamcat_db::queries::ratings;
//! use streamcat_common::ContentId;
//!
//! let pool = init_pool("/var/lib/streamcat/catalog.db", 4).unwrap();
//! let conn = get_conn(&pool).unwrap();
//!
//! let id: ContentId = "track-1".parse().unwrap();
//! let summary = ratings::rating_summary(&conn, &id).unwrap();
//! println!("{} votes, average {}", summary.count, summary.average);
//! ```

pub mod migrations;
pub mod models;
pub mod pool;
pub mod queries;
