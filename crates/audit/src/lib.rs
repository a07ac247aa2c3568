// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

use serde::Serialize;

/// Represents the staff member or process performing an action.
///
/// Procurement records keep the actor id as their creating user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Actor {
    /// The unique identifier for this actor (an email for staff).
    pub id: String,
    /// The type of actor (e.g., "user", "system").
    pub actor_type: String,
}

impl Actor {
    /// Creates a new Actor.
    ///
    /// # Arguments
    ///
    /// * `id` - The unique identifier for this actor
    /// * `actor_type` - The type of actor
    #[must_use]
    pub const fn new(id: String, actor_type: String) -> Self {
        Self { id, actor_type }
    }

    /// A staff member identified by email.
    #[must_use]
    pub fn user(email: &str) -> Self {
        Self::new(email.to_string(), String::from("user"))
    }

    /// An automated process, such as a bulk import.
    #[must_use]
    pub fn system(name: &str) -> Self {
        Self::new(name.to_string(), String::from("system"))
    }
}

/// Represents the reason or trigger for an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cause {
    /// A unique identifier for this cause (e.g., request ID).
    pub id: String,
    /// A description of the cause.
    pub description: String,
}

impl Cause {
    /// Creates a new Cause.
    ///
    /// # Arguments
    ///
    /// * `id` - The unique identifier for this cause
    /// * `description` - A description of what triggered this action
    #[must_use]
    pub const fn new(id: String, description: String) -> Self {
        Self { id, description }
    }
}

/// The kind of entity an action touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EntityKind {
    /// A holiday.
    Holiday,
    /// A stage.
    Stage,
    /// A modality.
    Modality,
    /// A modality-stage link.
    ModalityStage,
    /// A procurement record.
    Record,
}

impl EntityKind {
    /// Converts this kind to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Holiday => "holiday",
            Self::Stage => "stage",
            Self::Modality => "modality",
            Self::ModalityStage => "modality_stage",
            Self::Record => "record",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Represents the specific action performed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Action {
    /// The name of the action (e.g., "`CreateRecord`", "`DeleteStage`").
    pub name: String,
    /// Optional additional details about the action.
    pub details: Option<String>,
}

impl Action {
    /// Creates a new Action.
    ///
    /// # Arguments
    ///
    /// * `name` - The name of the action
    /// * `details` - Optional additional details
    #[must_use]
    pub const fn new(name: String, details: Option<String>) -> Self {
        Self { name, details }
    }
}

/// A compact description of state at a point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateSnapshot {
    /// A string representation of the state.
    pub data: String,
}

impl StateSnapshot {
    /// Creates a new `StateSnapshot`.
    #[must_use]
    pub const fn new(data: String) -> Self {
        Self { data }
    }
}

/// An immutable audit event representing a state transition.
///
/// Every successful state change produces exactly one audit event,
/// capturing who acted, why, what was done to which entity, and the
/// state before and after.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditEvent {
    /// The actor who initiated this state change.
    pub actor: Actor,
    /// The cause or reason for this state change.
    pub cause: Cause,
    /// The action that was performed.
    pub action: Action,
    /// The kind of entity affected.
    pub entity: EntityKind,
    /// The identifier of the entity affected.
    pub entity_id: i64,
    /// The state before the transition.
    pub before: StateSnapshot,
    /// The state after the transition.
    pub after: StateSnapshot,
}

impl AuditEvent {
    /// Creates a new `AuditEvent`.
    ///
    /// Once created, an audit event is immutable.
    #[must_use]
    pub const fn new(
        actor: Actor,
        cause: Cause,
        action: Action,
        entity: (EntityKind, i64),
        before: StateSnapshot,
        after: StateSnapshot,
    ) -> Self {
        Self {
            actor,
            cause,
            action,
            entity: entity.0,
            entity_id: entity.1,
            before,
            after,
        }
    }
}
