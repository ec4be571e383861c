use crate::core::BodyHandle;
use crate::math::Vector3;
use std::collections::VecDeque;

/// An impulse exchanged between two bodies during a step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionEvent {
    /// The body the impulse pushed along `normal`
    pub body_a: BodyHandle,

    /// The body the impulse pushed against `normal`
    pub body_b: BodyHandle,

    /// World-space averaged contact point
    pub contact_point: Vector3,

    /// Contact normal, pointing from `body_b` towards `body_a`
    pub normal: Vector3,

    /// Magnitude of the applied impulse
    pub impulse: f32,
}

/// Types of body events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyEventType {
    /// A body has been added to the world
    Added,

    /// A body has been removed from the world
    Removed,

    /// External velocity was injected and restitution reset
    VelocityInjected,
}

/// An event related to a single body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodyEvent {
    pub event_type: BodyEventType,
    pub body: BodyHandle,
}

/// A queue of physics events
#[derive(Debug, Default)]
pub struct EventQueue {
    collision_events: VecDeque<CollisionEvent>,
    body_events: VecDeque<BodyEvent>,
}

impl EventQueue {
    /// Creates a new empty event queue
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_collision_event(&mut self, event: CollisionEvent) {
        self.collision_events.push_back(event);
    }

    pub fn add_body_event(&mut self, event: BodyEvent) {
        self.body_events.push_back(event);
    }

    /// Gets the next collision event from the queue
    pub fn next_collision_event(&mut self) -> Option<CollisionEvent> {
        self.collision_events.pop_front()
    }

    /// Gets the next body event from the queue
    pub fn next_body_event(&mut self) -> Option<BodyEvent> {
        self.body_events.pop_front()
    }

    pub fn has_collision_events(&self) -> bool {
        !self.collision_events.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.collision_events.is_empty() && self.body_events.is_empty()
    }

    /// Clears all events from the queue
    pub fn clear(&mut self) {
        self.collision_events.clear();
        self.body_events.clear();
    }

    /// Gets all collision events involving a specific body
    pub fn get_collision_events_for_body(&self, body: BodyHandle) -> Vec<&CollisionEvent> {
        self.collision_events
            .iter()
            .filter(|e| e.body_a == body || e.body_b == body)
            .collect()
    }

    /// Gets all body events of a specific type
    pub fn get_body_events_of_type(&self, event_type: BodyEventType) -> Vec<&BodyEvent> {
        self.body_events
            .iter()
            .filter(|e| e.event_type == event_type)
            .collect()
    }
}
