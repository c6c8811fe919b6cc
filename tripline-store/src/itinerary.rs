use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A place on the trip.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Destination {
    pub id: Uuid,
    pub name: String,
}

/// A todo attached to a destination. The `destination_id` always references
/// an existing destination.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TodoItem {
    pub id: Uuid,
    pub text: String,
    pub destination_id: Uuid,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ItineraryError {
    #[error("Destination not found: {0}")]
    DestinationNotFound(Uuid),

    #[error("Todo not found: {0}")]
    TodoNotFound(Uuid),
}

/// Normalized two-table itinerary store.
///
/// Both tables keep insertion order. Every mutation is a single state
/// transition: removing a destination drops its dependent todos in the same
/// call, so no observer can ever see a dangling `destination_id`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ItineraryStore {
    destinations: Vec<Destination>,
    todos: Vec<TodoItem>,
}

impl ItineraryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn destinations(&self) -> &[Destination] {
        &self.destinations
    }

    pub fn todos(&self) -> &[TodoItem] {
        &self.todos
    }

    pub fn todos_for(&self, destination_id: Uuid) -> Vec<&TodoItem> {
        self.todos
            .iter()
            .filter(|t| t.destination_id == destination_id)
            .collect()
    }

    /// Add a destination and return its freshly minted id. New destinations
    /// commonly start with an empty name and get renamed as the user types.
    pub fn add_destination(&mut self, name: impl Into<String>) -> Uuid {
        let destination = Destination {
            id: Uuid::new_v4(),
            name: name.into(),
        };
        let id = destination.id;
        self.destinations.push(destination);
        id
    }

    pub fn rename_destination(
        &mut self,
        destination_id: Uuid,
        name: impl Into<String>,
    ) -> Result<(), ItineraryError> {
        let destination = self
            .destinations
            .iter_mut()
            .find(|d| d.id == destination_id)
            .ok_or(ItineraryError::DestinationNotFound(destination_id))?;
        destination.name = name.into();
        Ok(())
    }

    /// Remove a destination and every todo that references it, atomically.
    /// Returns the number of todos removed with it.
    pub fn remove_destination(&mut self, destination_id: Uuid) -> Result<usize, ItineraryError> {
        let before = self.destinations.len();
        self.destinations.retain(|d| d.id != destination_id);
        if self.destinations.len() == before {
            return Err(ItineraryError::DestinationNotFound(destination_id));
        }

        let todos_before = self.todos.len();
        self.todos.retain(|t| t.destination_id != destination_id);
        Ok(todos_before - self.todos.len())
    }

    /// Add a todo under an existing destination.
    pub fn add_todo(
        &mut self,
        destination_id: Uuid,
        text: impl Into<String>,
    ) -> Result<Uuid, ItineraryError> {
        if !self.destinations.iter().any(|d| d.id == destination_id) {
            return Err(ItineraryError::DestinationNotFound(destination_id));
        }

        let todo = TodoItem {
            id: Uuid::new_v4(),
            text: text.into(),
            destination_id,
        };
        let id = todo.id;
        self.todos.push(todo);
        Ok(id)
    }

    pub fn remove_todo(&mut self, todo_id: Uuid) -> Result<(), ItineraryError> {
        let before = self.todos.len();
        self.todos.retain(|t| t.id != todo_id);
        if self.todos.len() == before {
            return Err(ItineraryError::TodoNotFound(todo_id));
        }
        Ok(())
    }
}
