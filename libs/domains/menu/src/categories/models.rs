use chrono::{DateTime, Utc};
use database::Record;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::error::AggregateKind;
use crate::events::{AggregateRoot, EventAction, EventBuffer};

/// Menu section of one restaurant. Sections are shown by ascending
/// `priority`, ties broken by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Category {
    pub id: Uuid,
    pub restaurant_id: Uuid,
    /// Unique per restaurant among non-deleted categories
    pub name: String,
    pub picture_url: Option<String>,
    pub priority: i32,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
    #[serde(skip)]
    pub(crate) events: EventBuffer,
}

impl Category {
    pub fn new(input: CreateCategory) -> Self {
        let now = Utc::now();
        let mut category = Self {
            id: Uuid::now_v7(),
            restaurant_id: input.restaurant_id,
            name: input.name,
            picture_url: None,
            priority: input.priority,
            active: true,
            created_at: now,
            updated_at: now,
            deleted_at: None,
            events: EventBuffer::default(),
        };
        category.raise(EventAction::Created);
        category
    }

    pub fn apply_update(&mut self, update: UpdateCategory) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(priority) = update.priority {
            self.priority = priority;
        }
        self.touch();
    }

    pub(crate) fn touch(&mut self) {
        self.updated_at = Utc::now();
        self.raise(EventAction::Updated);
    }
}

impl AggregateRoot for Category {
    const KIND: AggregateKind = AggregateKind::Category;

    fn id(&self) -> Uuid {
        self.id
    }

    fn events_mut(&mut self) -> &mut EventBuffer {
        &mut self.events
    }
}

impl Record for Category {
    const FIELDS: &'static [&'static str] = &[
        "id",
        "restaurant_id",
        "name",
        "picture_url",
        "priority",
        "active",
        "created_at",
        "updated_at",
        "deleted_at",
    ];

    fn id(&self) -> Uuid {
        self.id
    }

    fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }

    fn set_deleted_at(&mut self, at: DateTime<Utc>) {
        self.deleted_at = Some(at);
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
pub struct CreateCategory {
    pub restaurant_id: Uuid,
    #[validate(length(min = 1, max = 80))]
    pub name: String,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub priority: i32,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema, Validate)]
pub struct UpdateCategory {
    #[validate(length(min = 1, max = 80))]
    pub name: Option<String>,
    #[validate(range(min = 0))]
    pub priority: Option<i32>,
}

/// How `reorder` moves a category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReorderTarget {
    /// Set the priority directly
    Priority(i32),
    /// Exchange priorities with another category of the same restaurant
    SwapWith(Uuid),
}
