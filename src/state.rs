//! Shared application state for request handlers.

use std::sync::Arc;
use tera::Tera;

use crate::config::AppConfig;
use crate::middleware::Identity;
use crate::picker::SongPicker;

/// Shared application state, cloneable across handlers via Arc-wrapped fields.
///
/// Contains the application configuration, Tera template engine, the song
/// picker, and the identity attached by the authorization stub.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub tera: Arc<Tera>,
    pub picker: SongPicker,
    pub identity: Arc<Identity>,
}

impl AppState {
    /// Creates a new application state from the given configuration, templates, and picker.
    pub fn new(config: AppConfig, tera: Tera, picker: SongPicker) -> Self {
        let identity = Arc::new(Identity {
            name: config.auth.identity.clone(),
        });
        Self {
            config: Arc::new(config),
            tera: Arc::new(tera),
            picker,
            identity,
        }
    }
}
