//! Event service for the flat `/Events` resource
//!
//! The owning user travels in the request body, so every write that sets or
//! changes `userId` checks that the user exists first.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::database::DatabasePool;
use crate::models::event::{CreateEventDto, Event, EventDto, EventFilter, NewEvent};
use crate::models::user::{User, UserFilter};
use crate::services::service::{ensure_active, Service};
use crate::services::CrudService;
use crate::utils::errors::{Result, UserEventsError};

pub(crate) const RETURNING: &str = "RETURNING id, title, location, start, duration, user_id";

#[derive(Clone)]
pub struct EventService {
    base: Service<Event, EventDto>,
}

impl EventService {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            base: Service::new(pool),
        }
    }

    async fn require_parent(&self, user_id: i32, token: &CancellationToken) -> Result<()> {
        if self.base.validate_parent::<User>(&UserFilter::Id(user_id), token).await? {
            Ok(())
        } else {
            warn!(user_id = user_id, "Event parent does not exist");
            Err(UserEventsError::InvalidParent { parent_id: user_id })
        }
    }
}

/// `INSERT ... RETURNING` shared with the user-scoped service.
pub(crate) async fn insert_event(
    pool: &DatabasePool,
    new_event: NewEvent,
    token: &CancellationToken,
) -> Result<Event> {
    ensure_active(token)?;

    let event = sqlx::query_as::<_, Event>(&format!(
        "INSERT INTO events (title, location, start, duration, user_id) \
         VALUES ($1, $2, $3, $4, $5) {}",
        RETURNING
    ))
    .bind(new_event.details.title)
    .bind(new_event.details.location)
    .bind(new_event.details.start)
    .bind(new_event.details.duration)
    .bind(new_event.user_id)
    .fetch_one(pool)
    .await?;

    info!(
        event_id = event.id,
        user_id = event.user_id,
        "Event: {} Id:{} created.",
        event.title,
        event.id
    );
    Ok(event)
}

/// Writes every column of an already loaded event back.
pub(crate) async fn save_event(
    pool: &DatabasePool,
    event: &Event,
    token: &CancellationToken,
) -> Result<Event> {
    ensure_active(token)?;

    let event = sqlx::query_as::<_, Event>(&format!(
        "UPDATE events SET title = $2, location = $3, start = $4, duration = $5, user_id = $6 \
         WHERE id = $1 {}",
        RETURNING
    ))
    .bind(event.id)
    .bind(&event.title)
    .bind(&event.location)
    .bind(event.start)
    .bind(event.duration)
    .bind(event.user_id)
    .fetch_one(pool)
    .await?;

    Ok(event)
}

#[async_trait]
impl CrudService<Event, CreateEventDto, EventDto> for EventService {
    async fn get_all(
        &self,
        predicate: Option<EventFilter>,
        token: &CancellationToken,
    ) -> Result<Vec<EventDto>> {
        self.base.dtos(predicate.as_ref(), token).await
    }

    async fn get(
        &self,
        predicate: EventFilter,
        token: &CancellationToken,
    ) -> Result<Option<EventDto>> {
        self.base.first_dto(&predicate, token).await
    }

    async fn create(
        &self,
        dto: CreateEventDto,
        _parent_id: Option<i32>,
        token: &CancellationToken,
    ) -> Result<EventDto> {
        let new_event = dto.validate()?;
        self.require_parent(new_event.user_id, token).await?;

        let event = insert_event(self.base.pool(), new_event, token).await?;
        Ok(Service::<Event, EventDto>::as_dto(&event))
    }

    async fn replace(
        &self,
        predicate: EventFilter,
        dto: CreateEventDto,
        token: &CancellationToken,
    ) -> Result<EventDto> {
        let new_event = dto.validate()?;
        let mut event = self.base.require_entity(&predicate, token).await?;
        if new_event.user_id != event.user_id {
            self.require_parent(new_event.user_id, token).await?;
        }
        new_event.overwrite(&mut event);

        let event = save_event(self.base.pool(), &event, token).await?;
        debug!(event_id = event.id, "Event replaced");
        Ok(Service::<Event, EventDto>::as_dto(&event))
    }

    async fn update(
        &self,
        predicate: EventFilter,
        dto: CreateEventDto,
        token: &CancellationToken,
    ) -> Result<EventDto> {
        dto.validate_partial()?;
        let mut event = self.base.require_entity(&predicate, token).await?;
        if let Some(user_id) = dto.user_id.filter(|user_id| *user_id != event.user_id) {
            self.require_parent(user_id, token).await?;
        }
        dto.merge_into(&mut event);

        let event = save_event(self.base.pool(), &event, token).await?;
        debug!(event_id = event.id, "Event updated");
        Ok(Service::<Event, EventDto>::as_dto(&event))
    }

    async fn delete(&self, predicate: EventFilter, token: &CancellationToken) -> Result<()> {
        let event = self.base.require_entity(&predicate, token).await?;
        self.base.remove(&event, token).await?;
        info!(event_id = event.id, "Event deleted");
        Ok(())
    }
}
