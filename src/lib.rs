//! # Driveboard
//!
//! A placement-drive tracker for a student placement cell, usable both as a
//! standalone binary and as a library. Admins publish upcoming company
//! visits, in-progress drives, and completed drives with outcomes; students
//! read them. Every admin mutation lands in an append-only audit trail.
//!
//! ## Library Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use std::path::PathBuf;
//! use driveboard::auth::SessionKeys;
//! use driveboard::server::{AppState, create_router};
//! use driveboard::store::{SqliteStore, Store};
//!
//! let store = SqliteStore::new(&PathBuf::from("./data/driveboard.db")).unwrap();
//! store.initialize().unwrap();
//!
//! let state = Arc::new(AppState {
//!     store: Arc::new(store),
//!     sessions: SessionKeys::new("secret"),
//!     secure_cookies: false,
//! });
//! let router = create_router(state, &["http://localhost:5173".to_string()]);
//! // Serve with axum...
//! ```

pub mod audit;
pub mod auth;
pub mod config;
pub mod error;
pub mod server;
pub mod store;
pub mod types;
