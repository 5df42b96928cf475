use crate::core::types::EntityId;

/// Hands out canonical entity ids: 0, 1, 2, ... never reused within a session.
#[derive(Debug, Default)]
pub struct IdAllocator {
    next: EntityId,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> EntityId {
        let id = self.next;
        self.next += 1;
        id
    }

    pub fn peek(&self) -> EntityId {
        self.next
    }
}
