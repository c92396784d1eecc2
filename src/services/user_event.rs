//! Events scoped to a single user
//!
//! The owner always comes from the route, never from the body, and is never
//! changed by replace or update.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::database::DatabasePool;
use crate::models::event::{CreateUserEventDto, Event, EventDto, EventFilter};
use crate::models::user::{User, UserFilter};
use crate::services::event::{insert_event, save_event};
use crate::services::service::Service;
use crate::services::CrudService;
use crate::utils::errors::{Result, UserEventsError};

#[derive(Clone)]
pub struct UserEventService {
    base: Service<Event, EventDto>,
}

impl UserEventService {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            base: Service::new(pool),
        }
    }
}

#[async_trait]
impl CrudService<Event, CreateUserEventDto, EventDto> for UserEventService {
    /// A predicate is mandatory: listing every user's events is not allowed here.
    async fn get_all(
        &self,
        predicate: Option<EventFilter>,
        token: &CancellationToken,
    ) -> Result<Vec<EventDto>> {
        let predicate = predicate.ok_or_else(|| {
            UserEventsError::InvalidInput(
                "A predicate is required to list a user's events.".to_string(),
            )
        })?;
        self.base.dtos(Some(&predicate), token).await
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
        dto: CreateUserEventDto,
        parent_id: Option<i32>,
        token: &CancellationToken,
    ) -> Result<EventDto> {
        let parent_id = parent_id.ok_or(UserEventsError::MissingParent)?;
        let details = dto.validate()?;

        if !self.base.validate_parent::<User>(&UserFilter::Id(parent_id), token).await? {
            warn!(user_id = parent_id, "Event parent does not exist");
            return Err(UserEventsError::InvalidParent { parent_id });
        }

        let event = insert_event(self.base.pool(), details.with_owner(parent_id), token).await?;
        Ok(Service::<Event, EventDto>::as_dto(&event))
    }

    async fn replace(
        &self,
        predicate: EventFilter,
        dto: CreateUserEventDto,
        token: &CancellationToken,
    ) -> Result<EventDto> {
        let details = dto.validate()?;
        let mut event = self.base.require_entity(&predicate, token).await?;
        details.overwrite(&mut event);

        let event = save_event(self.base.pool(), &event, token).await?;
        debug!(event_id = event.id, user_id = event.user_id, "Event replaced");
        Ok(Service::<Event, EventDto>::as_dto(&event))
    }

    async fn update(
        &self,
        predicate: EventFilter,
        dto: CreateUserEventDto,
        token: &CancellationToken,
    ) -> Result<EventDto> {
        dto.validate_partial()?;
        let mut event = self.base.require_entity(&predicate, token).await?;
        dto.merge_into(&mut event);

        let event = save_event(self.base.pool(), &event, token).await?;
        debug!(event_id = event.id, user_id = event.user_id, "Event updated");
        Ok(Service::<Event, EventDto>::as_dto(&event))
    }

    async fn delete(&self, predicate: EventFilter, token: &CancellationToken) -> Result<()> {
        let event = self.base.require_entity(&predicate, token).await?;
        self.base.remove(&event, token).await?;
        info!(event_id = event.id, user_id = event.user_id, "Event deleted");
        Ok(())
    }
}
