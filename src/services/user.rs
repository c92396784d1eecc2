//! User service implementation
//!
//! This service handles user creation, replacement, partial updates and
//! deletion, plus the reads that can nest each user's events.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::database::{DatabasePool, Predicate};
use crate::models::event::{Event, EventDto, EventFilter};
use crate::models::user::{CreateUserDto, User, UserDto, UserFilter};
use crate::services::service::{ensure_active, Service};
use crate::services::{CrudService, UserQueries};
use crate::utils::errors::Result;

const RETURNING: &str = "RETURNING id, first_name, last_name, notes";

/// User service for managing user operations
#[derive(Clone)]
pub struct UserService {
    base: Service<User, UserDto>,
    events: Service<Event, EventDto>,
}

impl UserService {
    /// Create a new UserService instance
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            base: Service::new(pool.clone()),
            events: Service::new(pool),
        }
    }

    async fn insert(&self, dto: CreateUserDto, token: &CancellationToken) -> Result<User> {
        let new_user = dto.validate()?;
        ensure_active(token)?;

        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (first_name, last_name, notes) VALUES ($1, $2, $3) {}",
            RETURNING
        ))
        .bind(new_user.first_name)
        .bind(new_user.last_name)
        .bind(new_user.notes)
        .fetch_one(self.base.pool())
        .await?;

        Ok(user)
    }

    async fn save(&self, user: &User, token: &CancellationToken) -> Result<User> {
        ensure_active(token)?;

        let user = sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET first_name = $2, last_name = $3, notes = $4 WHERE id = $1 {}",
            RETURNING
        ))
        .bind(user.id)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.notes)
        .fetch_one(self.base.pool())
        .await?;

        Ok(user)
    }

    /// Attaches each user's events, loading them in one query.
    async fn nest_events(
        &self,
        users: Vec<UserDto>,
        token: &CancellationToken,
    ) -> Result<Vec<UserDto>> {
        if users.is_empty() {
            return Ok(users);
        }

        let owners = EventFilter::Users(users.iter().map(|user| user.id).collect());
        let events = self.events.entities(Some(&owners), token).await?;

        Ok(users
            .into_iter()
            .map(|user| {
                let owned = EventFilter::User(user.id);
                let nested = events
                    .iter()
                    .filter(|event| owned.matches(event))
                    .map(Service::<Event, EventDto>::as_dto)
                    .collect();
                user.with_events(nested)
            })
            .collect())
    }
}

#[async_trait]
impl CrudService<User, CreateUserDto, UserDto> for UserService {
    async fn get_all(
        &self,
        predicate: Option<UserFilter>,
        token: &CancellationToken,
    ) -> Result<Vec<UserDto>> {
        self.base.dtos(predicate.as_ref(), token).await
    }

    async fn get(
        &self,
        predicate: UserFilter,
        token: &CancellationToken,
    ) -> Result<Option<UserDto>> {
        self.base.first_dto(&predicate, token).await
    }

    async fn create(
        &self,
        dto: CreateUserDto,
        _parent_id: Option<i32>,
        token: &CancellationToken,
    ) -> Result<UserDto> {
        let user = self.insert(dto, token).await?;
        info!(
            user_id = user.id,
            "User: {}, {} Id:{} created.",
            user.last_name,
            user.first_name,
            user.id
        );
        Ok(Service::<User, UserDto>::as_dto(&user))
    }

    async fn replace(
        &self,
        predicate: UserFilter,
        dto: CreateUserDto,
        token: &CancellationToken,
    ) -> Result<UserDto> {
        let new_user = dto.validate()?;
        let mut user = self.base.require_entity(&predicate, token).await?;
        new_user.overwrite(&mut user);

        let user = self.save(&user, token).await?;
        debug!(user_id = user.id, "User replaced");
        Ok(Service::<User, UserDto>::as_dto(&user))
    }

    async fn update(
        &self,
        predicate: UserFilter,
        dto: CreateUserDto,
        token: &CancellationToken,
    ) -> Result<UserDto> {
        dto.validate_partial()?;
        let mut user = self.base.require_entity(&predicate, token).await?;
        dto.merge_into(&mut user);

        let user = self.save(&user, token).await?;
        debug!(user_id = user.id, "User updated");
        Ok(Service::<User, UserDto>::as_dto(&user))
    }

    async fn delete(&self, predicate: UserFilter, token: &CancellationToken) -> Result<()> {
        let user = self.base.require_entity(&predicate, token).await?;
        self.base.remove(&user, token).await?;
        info!(user_id = user.id, "User deleted");
        Ok(())
    }
}

#[async_trait]
impl UserQueries for UserService {
    async fn get_with_events(
        &self,
        predicate: UserFilter,
        include_events: bool,
        token: &CancellationToken,
    ) -> Result<Option<UserDto>> {
        let Some(user) = self.base.first_dto(&predicate, token).await? else {
            return Ok(None);
        };

        if !include_events {
            return Ok(Some(user));
        }

        Ok(self.nest_events(vec![user], token).await?.into_iter().next())
    }

    async fn get_all_with_events(
        &self,
        predicate: Option<UserFilter>,
        include_events: bool,
        token: &CancellationToken,
    ) -> Result<Vec<UserDto>> {
        let users = self.base.dtos(predicate.as_ref(), token).await?;
        if include_events {
            self.nest_events(users, token).await
        } else {
            Ok(users)
        }
    }
}
