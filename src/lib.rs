//! Song Picker: a one-button web demo.
//!
//! The home page renders a button that calls `POST /api/pick_random_song`.
//! That server function probes a local libsql database for liveness and then
//! returns one song chosen uniformly at random from a fixed catalog.

pub mod catalog;
pub mod config;
pub mod error;
pub mod http;
pub mod middleware;
pub mod picker;
pub mod routes;
pub mod state;
pub mod store;
pub mod templates;

pub use catalog::{SongCatalog, SongRecord};
pub use error::AppError;
pub use picker::{PickError, SongPicker};
pub use store::{BackingStore, LibsqlStore, StoreError};
