//! Services module
//!
//! This module contains the business logic services. Handlers only ever see
//! the trait objects defined here, so each service can be swapped for a fake.

pub mod demo_data;
pub mod email;
pub mod event;
pub mod health;
pub mod service;
pub mod user;
pub mod user_event;

// Re-export commonly used services
pub use demo_data::DemoDataService;
pub use email::{EmailService, Mailer, SmtpMailer};
pub use event::EventService;
pub use health::{DatabaseProbe, HealthProbe, HealthService};
pub use service::Service;
pub use user::UserService;
pub use user_event::UserEventService;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::config::settings::Settings;
use crate::database::{DatabasePool, Entity};
use crate::models::event::{CreateEventDto, CreateUserEventDto, Event, EventDto};
use crate::models::user::{CreateUserDto, User, UserDto, UserFilter};
use crate::utils::errors::Result;

/// The CRUD contract every entity service fulfils.
///
/// `C` is the request body used by create, replace and update; `R` is the
/// public representation returned to callers.
#[async_trait]
pub trait CrudService<E, C, R>: Send + Sync
where
    E: Entity,
    C: Send + 'static,
    R: Send + 'static,
{
    /// Every match in database order; `None` means no filter.
    async fn get_all(
        &self,
        predicate: Option<E::Filter>,
        token: &CancellationToken,
    ) -> Result<Vec<R>>;

    /// First match, or `None`.
    async fn get(&self, predicate: E::Filter, token: &CancellationToken) -> Result<Option<R>>;

    async fn create(&self, dto: C, parent_id: Option<i32>, token: &CancellationToken) -> Result<R>;

    /// Overwrites every mutable field of the first match.
    async fn replace(&self, predicate: E::Filter, dto: C, token: &CancellationToken) -> Result<R>;

    /// Overwrites only the fields present in `dto`.
    async fn update(&self, predicate: E::Filter, dto: C, token: &CancellationToken) -> Result<R>;

    async fn delete(&self, predicate: E::Filter, token: &CancellationToken) -> Result<()>;
}

/// User reads that can nest each user's events.
#[async_trait]
pub trait UserQueries: CrudService<User, CreateUserDto, UserDto> {
    async fn get_with_events(
        &self,
        predicate: UserFilter,
        include_events: bool,
        token: &CancellationToken,
    ) -> Result<Option<UserDto>>;

    async fn get_all_with_events(
        &self,
        predicate: Option<UserFilter>,
        include_events: bool,
        token: &CancellationToken,
    ) -> Result<Vec<UserDto>>;
}

pub type EventCrud = dyn CrudService<Event, CreateEventDto, EventDto>;
pub type UserEventCrud = dyn CrudService<Event, CreateUserEventDto, EventDto>;

/// Service factory for creating and managing all services
#[derive(Clone)]
pub struct ServiceFactory {
    pub users: Arc<dyn UserQueries>,
    pub events: Arc<EventCrud>,
    pub user_events: Arc<UserEventCrud>,
    pub health: HealthService,
    pub email: EmailService,
    pub demo_data: DemoDataService,
}

impl ServiceFactory {
    /// Create a new ServiceFactory with all services backed by PostgreSQL
    pub fn new(pool: DatabasePool, settings: &Settings) -> Result<Self> {
        let users: Arc<dyn UserQueries> = Arc::new(UserService::new(pool.clone()));
        let events: Arc<EventCrud> = Arc::new(EventService::new(pool.clone()));
        let user_events: Arc<UserEventCrud> = Arc::new(UserEventService::new(pool.clone()));

        let health = HealthService::new(
            Arc::new(DatabaseProbe::new(pool)),
            Duration::from_secs(settings.health.cache_ttl_seconds),
        );
        let email = EmailService::from_config(settings.email.as_ref())?;

        Ok(Self::from_parts(users, events, user_events, health, email))
    }

    /// Assembles a factory from already built services.
    pub fn from_parts(
        users: Arc<dyn UserQueries>,
        events: Arc<EventCrud>,
        user_events: Arc<UserEventCrud>,
        health: HealthService,
        email: EmailService,
    ) -> Self {
        let demo_data = DemoDataService::new(users.clone(), user_events.clone());
        Self {
            users,
            events,
            user_events,
            health,
            email,
            demo_data,
        }
    }
}
