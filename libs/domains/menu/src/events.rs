//! Domain events raised by aggregates and drained by services after a write.
//!
//! Events are handed to an [`EventSink`]; nothing is persisted or replayed.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::Display;
use uuid::Uuid;

use crate::error::AggregateKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EventAction {
    Created,
    Updated,
    Deleted,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainEvent {
    pub kind: AggregateKind,
    pub action: EventAction,
    pub aggregate_id: Uuid,
    pub occurred_at: DateTime<Utc>,
}

impl DomainEvent {
    pub fn new(kind: AggregateKind, action: EventAction, aggregate_id: Uuid) -> Self {
        Self {
            kind,
            action,
            aggregate_id,
            occurred_at: Utc::now(),
        }
    }

    /// e.g. `category.updated`
    pub fn name(&self) -> String {
        format!("{}.{}", self.kind, self.action)
    }
}

/// Append-only buffer of pending events. Equality ignores its contents so
/// aggregates compare by state alone.
#[derive(Debug, Clone, Default)]
pub struct EventBuffer(Vec<DomainEvent>);

impl EventBuffer {
    pub fn push(&mut self, event: DomainEvent) {
        self.0.push(event);
    }

    pub fn take(&mut self) -> Vec<DomainEvent> {
        std::mem::take(&mut self.0)
    }

    pub fn pending(&self) -> &[DomainEvent] {
        &self.0
    }
}

impl PartialEq for EventBuffer {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

/// Identity plus a pending-event buffer
pub trait AggregateRoot {
    const KIND: AggregateKind;

    fn id(&self) -> Uuid;

    fn events_mut(&mut self) -> &mut EventBuffer;

    fn raise(&mut self, action: EventAction) {
        let event = DomainEvent::new(Self::KIND, action, self.id());
        self.events_mut().push(event);
    }

    /// Empties the buffer, returning events in the order they were raised.
    fn take_events(&mut self) -> Vec<DomainEvent> {
        self.events_mut().take()
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventSink: Send + Sync {
    async fn publish(&self, events: Vec<DomainEvent>);
}

/// Emits every event as a structured record on the `domain_event` target.
#[derive(Debug, Clone, Default)]
pub struct TracingEventSink;

#[async_trait]
impl EventSink for TracingEventSink {
    async fn publish(&self, events: Vec<DomainEvent>) {
        for event in events {
            tracing::info!(
                target: "domain_event",
                event = %event.name(),
                aggregate_id = %event.aggregate_id,
                occurred_at = %event.occurred_at,
                "Domain event"
            );
        }
    }
}
