//! Demo data seeding

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::models::event::{CreateUserEventDto, Event, EventDto};
use crate::models::user::{CreateUserDto, UserFilter};
use crate::services::{CrudService, UserQueries};
use crate::utils::errors::{Result, UserEventsError};

const DANCE_TITLE: &str = "The Enchantment Under The Sea Dance";
const DANCE_LOCATION: &str = "Hill Valley High School";
const DANCE_DURATION: i32 = 90;

const CAST: [(&str, &str, &str); 6] = [
    (
        "Marty",
        "McFly",
        "Wait a minute. Wait a minute, Doc. Ah... \
         Are you telling me that you built a time machine... out of a DeLorean?",
    ),
    (
        "Emmett",
        "Brown",
        "Oh, my God. They found me. I don't know how, but they found me. Run for it, Marty!",
    ),
    (
        "Biff",
        "Tannen",
        "Since you're new here, I-I'm gonna cut you a break, today. \
         So, why don't you make like a tree and get outta here?",
    ),
    (
        "Lorraine",
        "Baines",
        "This is all wrong. I don't know what it is. \
         But when I kiss you, it's like I'm kissing... my brother. \
         I guess that doesn't make any sense, does it?",
    ),
    (
        "George",
        "McFly",
        "Last night, Darth Vader came down from Planet Vulcan and told me \
         that if I didn't take Lorraine out, that he'd melt my brain.",
    ),
    (
        "Mr.",
        "Strickland",
        "No McFly ever amounted to anything in the history of Hill Valley!",
    ),
];

#[derive(Clone)]
pub struct DemoDataService {
    users: Arc<dyn UserQueries>,
    user_events: Arc<dyn CrudService<Event, CreateUserEventDto, EventDto>>,
}

impl DemoDataService {
    pub fn new(
        users: Arc<dyn UserQueries>,
        user_events: Arc<dyn CrudService<Event, CreateUserEventDto, EventDto>>,
    ) -> Self {
        Self { users, user_events }
    }

    /// Seeds every cast member that does not exist yet and returns how many
    /// were added. Running it twice adds nothing the second time.
    pub async fn seed(&self, token: &CancellationToken) -> Result<usize> {
        let dance_start = Utc
            .with_ymd_and_hms(1955, 11, 12, 20, 0, 0)
            .single()
            .ok_or_else(|| UserEventsError::InvalidInput("Invalid demo event start.".to_string()))?;

        let mut created = 0;
        for (first_name, last_name, notes) in CAST {
            let filter = UserFilter::FullName {
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
            };
            if self.users.get(filter, token).await?.is_some() {
                debug!(first_name, last_name, "Demo user already present");
                continue;
            }

            let user = self
                .users
                .create(CreateUserDto::new(first_name, last_name).with_notes(notes), None, token)
                .await?;
            let dance = CreateUserEventDto::new(DANCE_TITLE, dance_start, DANCE_DURATION)
                .at(DANCE_LOCATION);
            if let Err(e) = self.user_events.create(dance, Some(user.id), token).await {
                self.discard(user.id).await;
                return Err(e);
            }
            created += 1;
        }

        info!(created = created, "Demo data seeded");
        Ok(created)
    }

    /// Removes a user whose dance could not be stored, so the next seed
    /// creates both again. Runs even when the request was cancelled.
    async fn discard(&self, user_id: i32) {
        let cleanup = CancellationToken::new();
        if let Err(e) = self.users.delete(UserFilter::Id(user_id), &cleanup).await {
            warn!(user_id = user_id, error = %e, "Failed to remove partially seeded user");
        }
    }
}
