//! In-memory service fakes
//!
//! These implement the same service traits the PostgreSQL services do, using
//! the models' own validation, predicates and projections, so HTTP tests run
//! without a database.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use UserEvents::database::{Predicate, Projection};
use UserEvents::models::email::ContactMessage;
use UserEvents::models::event::{
    CreateEventDto, CreateUserEventDto, Event, EventDto, EventFilter, NewEvent,
};
use UserEvents::models::user::{CreateUserDto, User, UserDto, UserFilter};
use UserEvents::services::{CrudService, HealthProbe, Mailer, UserQueries};
use UserEvents::{Result, UserEventsError};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    events: Vec<Event>,
    last_user_id: i32,
    last_event_id: i32,
}

/// Shared backing store for every fake service.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryStore {
    pub fn users(&self) -> Vec<User> {
        self.tables.lock().unwrap().users.clone()
    }

    pub fn events(&self) -> Vec<Event> {
        self.tables.lock().unwrap().events.clone()
    }

    fn insert_user(&self, dto: CreateUserDto) -> Result<User> {
        let new_user = dto.validate()?;
        let mut tables = self.tables.lock().unwrap();
        tables.last_user_id += 1;
        let user = User {
            id: tables.last_user_id,
            first_name: new_user.first_name,
            last_name: new_user.last_name,
            notes: new_user.notes,
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    fn insert_event(&self, new_event: NewEvent) -> Result<Event> {
        let mut tables = self.tables.lock().unwrap();
        if !tables.users.iter().any(|user| user.id == new_event.user_id) {
            return Err(UserEventsError::InvalidParent {
                parent_id: new_event.user_id,
            });
        }

        tables.last_event_id += 1;
        let event = Event {
            id: tables.last_event_id,
            title: new_event.details.title,
            location: new_event.details.location,
            start: new_event.details.start,
            duration: new_event.details.duration,
            user_id: new_event.user_id,
        };
        tables.events.push(event.clone());
        Ok(event)
    }

    fn modify_user(&self, predicate: &UserFilter, change: impl FnOnce(&mut User)) -> Result<User> {
        let mut tables = self.tables.lock().unwrap();
        let user = tables
            .users
            .iter_mut()
            .find(|user| predicate.matches(user))
            .ok_or(UserEventsError::InvalidIdentifier)?;
        change(user);
        Ok(user.clone())
    }

    fn modify_event(
        &self,
        predicate: &EventFilter,
        change: impl FnOnce(&mut Event),
    ) -> Result<Event> {
        let mut tables = self.tables.lock().unwrap();
        let event = tables
            .events
            .iter_mut()
            .find(|event| predicate.matches(event))
            .ok_or(UserEventsError::InvalidIdentifier)?;
        change(event);
        Ok(event.clone())
    }

    fn user_exists(&self, id: i32) -> bool {
        self.tables.lock().unwrap().users.iter().any(|user| user.id == id)
    }

    fn event_dtos(&self, predicate: Option<&EventFilter>) -> Vec<EventDto> {
        self.tables
            .lock()
            .unwrap()
            .events
            .iter()
            .filter(|event| predicate.map_or(true, |p| p.matches(event)))
            .map(EventDto::project)
            .collect()
    }

    fn remove_event(&self, predicate: &EventFilter) -> Result<()> {
        let mut tables = self.tables.lock().unwrap();
        let index = tables
            .events
            .iter()
            .position(|event| predicate.matches(event))
            .ok_or(UserEventsError::InvalidIdentifier)?;
        tables.events.remove(index);
        Ok(())
    }
}

fn check(token: &CancellationToken) -> Result<()> {
    if token.is_cancelled() {
        Err(UserEventsError::Cancelled)
    } else {
        Ok(())
    }
}

#[derive(Clone)]
pub struct FakeUserService {
    store: InMemoryStore,
}

impl FakeUserService {
    pub fn new(store: InMemoryStore) -> Self {
        Self { store }
    }

    fn nest(&self, user: UserDto) -> UserDto {
        let owned = EventFilter::User(user.id);
        let events = self.store.event_dtos(Some(&owned));
        user.with_events(events)
    }
}

#[async_trait]
impl CrudService<User, CreateUserDto, UserDto> for FakeUserService {
    async fn get_all(
        &self,
        predicate: Option<UserFilter>,
        token: &CancellationToken,
    ) -> Result<Vec<UserDto>> {
        check(token)?;
        Ok(self
            .store
            .users()
            .iter()
            .filter(|user| predicate.as_ref().map_or(true, |p| p.matches(user)))
            .map(UserDto::project)
            .collect())
    }

    async fn get(
        &self,
        predicate: UserFilter,
        token: &CancellationToken,
    ) -> Result<Option<UserDto>> {
        check(token)?;
        Ok(self
            .store
            .users()
            .iter()
            .find(|user| predicate.matches(user))
            .map(UserDto::project))
    }

    async fn create(
        &self,
        dto: CreateUserDto,
        _parent_id: Option<i32>,
        token: &CancellationToken,
    ) -> Result<UserDto> {
        check(token)?;
        let user = self.store.insert_user(dto)?;
        Ok(UserDto::project(&user))
    }

    async fn replace(
        &self,
        predicate: UserFilter,
        dto: CreateUserDto,
        token: &CancellationToken,
    ) -> Result<UserDto> {
        check(token)?;
        let new_user = dto.validate()?;
        let user = self.store.modify_user(&predicate, |user| new_user.overwrite(user))?;
        Ok(UserDto::project(&user))
    }

    async fn update(
        &self,
        predicate: UserFilter,
        dto: CreateUserDto,
        token: &CancellationToken,
    ) -> Result<UserDto> {
        check(token)?;
        dto.validate_partial()?;
        let user = self.store.modify_user(&predicate, |user| dto.merge_into(user))?;
        Ok(UserDto::project(&user))
    }

    async fn delete(&self, predicate: UserFilter, token: &CancellationToken) -> Result<()> {
        check(token)?;
        let mut tables = self.store.tables.lock().unwrap();
        let index = tables
            .users
            .iter()
            .position(|user| predicate.matches(user))
            .ok_or(UserEventsError::InvalidIdentifier)?;
        let user = tables.users.remove(index);
        tables.events.retain(|event| event.user_id != user.id);
        Ok(())
    }
}

#[async_trait]
impl UserQueries for FakeUserService {
    async fn get_with_events(
        &self,
        predicate: UserFilter,
        include_events: bool,
        token: &CancellationToken,
    ) -> Result<Option<UserDto>> {
        let user = self.get(predicate, token).await?;
        Ok(if include_events { user.map(|user| self.nest(user)) } else { user })
    }

    async fn get_all_with_events(
        &self,
        predicate: Option<UserFilter>,
        include_events: bool,
        token: &CancellationToken,
    ) -> Result<Vec<UserDto>> {
        let users = self.get_all(predicate, token).await?;
        Ok(if include_events {
            users.into_iter().map(|user| self.nest(user)).collect()
        } else {
            users
        })
    }
}

#[derive(Clone)]
pub struct FakeEventService {
    store: InMemoryStore,
}

impl FakeEventService {
    pub fn new(store: InMemoryStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl CrudService<Event, CreateEventDto, EventDto> for FakeEventService {
    async fn get_all(
        &self,
        predicate: Option<EventFilter>,
        token: &CancellationToken,
    ) -> Result<Vec<EventDto>> {
        check(token)?;
        Ok(self.store.event_dtos(predicate.as_ref()))
    }

    async fn get(
        &self,
        predicate: EventFilter,
        token: &CancellationToken,
    ) -> Result<Option<EventDto>> {
        check(token)?;
        Ok(self.store.event_dtos(Some(&predicate)).into_iter().next())
    }

    async fn create(
        &self,
        dto: CreateEventDto,
        _parent_id: Option<i32>,
        token: &CancellationToken,
    ) -> Result<EventDto> {
        check(token)?;
        let event = self.store.insert_event(dto.validate()?)?;
        Ok(EventDto::project(&event))
    }

    async fn replace(
        &self,
        predicate: EventFilter,
        dto: CreateEventDto,
        token: &CancellationToken,
    ) -> Result<EventDto> {
        check(token)?;
        let new_event = dto.validate()?;
        if !self.store.user_exists(new_event.user_id) {
            return Err(UserEventsError::InvalidParent {
                parent_id: new_event.user_id,
            });
        }
        let event = self.store.modify_event(&predicate, |event| new_event.overwrite(event))?;
        Ok(EventDto::project(&event))
    }

    async fn update(
        &self,
        predicate: EventFilter,
        dto: CreateEventDto,
        token: &CancellationToken,
    ) -> Result<EventDto> {
        check(token)?;
        dto.validate_partial()?;
        if let Some(user_id) = dto.user_id.filter(|id| !self.store.user_exists(*id)) {
            return Err(UserEventsError::InvalidParent { parent_id: user_id });
        }
        let event = self.store.modify_event(&predicate, |event| dto.merge_into(event))?;
        Ok(EventDto::project(&event))
    }

    async fn delete(&self, predicate: EventFilter, token: &CancellationToken) -> Result<()> {
        check(token)?;
        self.store.remove_event(&predicate)
    }
}

#[derive(Clone)]
pub struct FakeUserEventService {
    store: InMemoryStore,
}

impl FakeUserEventService {
    pub fn new(store: InMemoryStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl CrudService<Event, CreateUserEventDto, EventDto> for FakeUserEventService {
    async fn get_all(
        &self,
        predicate: Option<EventFilter>,
        token: &CancellationToken,
    ) -> Result<Vec<EventDto>> {
        check(token)?;
        let predicate = predicate.ok_or_else(|| {
            UserEventsError::InvalidInput("A predicate is required.".to_string())
        })?;
        Ok(self.store.event_dtos(Some(&predicate)))
    }

    async fn get(
        &self,
        predicate: EventFilter,
        token: &CancellationToken,
    ) -> Result<Option<EventDto>> {
        check(token)?;
        Ok(self.store.event_dtos(Some(&predicate)).into_iter().next())
    }

    async fn create(
        &self,
        dto: CreateUserEventDto,
        parent_id: Option<i32>,
        token: &CancellationToken,
    ) -> Result<EventDto> {
        check(token)?;
        let parent_id = parent_id.ok_or(UserEventsError::MissingParent)?;
        let event = self.store.insert_event(dto.validate()?.with_owner(parent_id))?;
        Ok(EventDto::project(&event))
    }

    async fn replace(
        &self,
        predicate: EventFilter,
        dto: CreateUserEventDto,
        token: &CancellationToken,
    ) -> Result<EventDto> {
        check(token)?;
        let details = dto.validate()?;
        let event = self.store.modify_event(&predicate, |event| details.overwrite(event))?;
        Ok(EventDto::project(&event))
    }

    async fn update(
        &self,
        predicate: EventFilter,
        dto: CreateUserEventDto,
        token: &CancellationToken,
    ) -> Result<EventDto> {
        check(token)?;
        dto.validate_partial()?;
        let event = self.store.modify_event(&predicate, |event| dto.merge_into(event))?;
        Ok(EventDto::project(&event))
    }

    async fn delete(&self, predicate: EventFilter, token: &CancellationToken) -> Result<()> {
        check(token)?;
        self.store.remove_event(&predicate)
    }
}

/// Delegates to [`FakeUserEventService`] but fails the `fail_on`-th create
/// (1-based) with a pool timeout.
pub struct FlakyUserEventService {
    inner: FakeUserEventService,
    fail_on: usize,
    creates: AtomicUsize,
}

impl FlakyUserEventService {
    pub fn new(store: InMemoryStore, fail_on: usize) -> Self {
        Self {
            inner: FakeUserEventService::new(store),
            fail_on,
            creates: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl CrudService<Event, CreateUserEventDto, EventDto> for FlakyUserEventService {
    async fn get_all(
        &self,
        predicate: Option<EventFilter>,
        token: &CancellationToken,
    ) -> Result<Vec<EventDto>> {
        self.inner.get_all(predicate, token).await
    }

    async fn get(
        &self,
        predicate: EventFilter,
        token: &CancellationToken,
    ) -> Result<Option<EventDto>> {
        self.inner.get(predicate, token).await
    }

    async fn create(
        &self,
        dto: CreateUserEventDto,
        parent_id: Option<i32>,
        token: &CancellationToken,
    ) -> Result<EventDto> {
        if self.creates.fetch_add(1, Ordering::SeqCst) + 1 == self.fail_on {
            return Err(UserEventsError::Database(sqlx::Error::PoolTimedOut));
        }
        self.inner.create(dto, parent_id, token).await
    }

    async fn replace(
        &self,
        predicate: EventFilter,
        dto: CreateUserEventDto,
        token: &CancellationToken,
    ) -> Result<EventDto> {
        self.inner.replace(predicate, dto, token).await
    }

    async fn update(
        &self,
        predicate: EventFilter,
        dto: CreateUserEventDto,
        token: &CancellationToken,
    ) -> Result<EventDto> {
        self.inner.update(predicate, dto, token).await
    }

    async fn delete(&self, predicate: EventFilter, token: &CancellationToken) -> Result<()> {
        self.inner.delete(predicate, token).await
    }
}

/// Always healthy.
pub struct StaticProbe;

#[async_trait]
impl HealthProbe for StaticProbe {
    async fn probe(&self, _token: &CancellationToken) -> Result<i32> {
        Ok(1)
    }
}

#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<ContactMessage>>,
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, message: ContactMessage) -> Result<()> {
        self.sent.lock().unwrap().push(message);
        Ok(())
    }
}
