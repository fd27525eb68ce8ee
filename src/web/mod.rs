//! Web server for browser-based opening search.
//!
//! This module provides an interactive web interface using Axum.
//! Users upload an SGF record and get the most similar records of the
//! database, each linked to its raw file.
//!
//! ## Starting the Server
//!
//! ```text
//! # Start on default port 8080 with the records in ./database
//! kifu-finder serve
//!
//! # Custom database, port and auto-open browser
//! kifu-finder serve --database games/ --port 3000 --open
//!
//! # Bind to all interfaces
//! kifu-finder serve --address 0.0.0.0
//! ```
//!
//! ## API Endpoints
//!
//! - `GET /` - Main page with upload form
//! - `POST /api/search` - Rank the database against an uploaded record (multipart form)
//! - `GET /api/database` - List all records in the database
//! - `GET /database/{filename}` - Download a database record

pub mod server;
