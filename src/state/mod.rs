//! Shared application state
//!
//! Everything a handler needs, cloned cheaply into every request.

use std::sync::Arc;

use crate::config::Settings;
use crate::hubs::ConsoleHub;
use crate::services::ServiceFactory;

#[derive(Clone)]
pub struct AppState {
    pub services: ServiceFactory,
    pub console: ConsoleHub,
    pub settings: Arc<Settings>,
}

impl AppState {
    pub fn new(services: ServiceFactory, console: ConsoleHub, settings: Settings) -> Self {
        Self {
            services,
            console,
            settings: Arc::new(settings),
        }
    }
}
