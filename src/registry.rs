//! The server-side tag registry and its concurrency discipline (§4.C, §5).

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::error::Error;
use crate::tag::{DataType, Tag, Value};

/// The tag store a server consults. Handlers depend on this trait, not on a
/// concrete store, per Design Note 9: tests substitute a second
/// implementation without touching sockets.
pub trait Registry: Send + Sync {
    /// Inserts a tag, replacing any existing tag with the same id (§3.4.b).
    fn insert(&self, tag: Tag);

    /// Looks up a tag by id.
    fn get(&self, id: u16) -> Option<Tag>;

    /// Stores a new value for an existing tag.
    ///
    /// Fails with [`Error::NotFound`] if the tag does not exist, or
    /// [`Error::InvalidValue`] if `value`'s data type does not match the
    /// tag's fixed `data_type` (§3.4.c).
    fn update_value(&self, id: u16, value: Value) -> Result<(), Error>;

    /// Stores a new string body for an existing `String` tag. Same failure
    /// modes as [`Registry::update_value`].
    fn update_string(&self, id: u16, value: String) -> Result<(), Error>;

    /// Removes a tag by id. Idempotent: removing an absent id is not an
    /// error (§9, Open Question b is about `insert`, not `remove`; removal
    /// is specified idempotent in §6.3).
    fn remove(&self, id: u16);

    /// Lists every registered tag.
    fn list(&self) -> Vec<Tag>;

    /// The number of currently connected clients (§4.D.2, §6.3).
    fn client_count(&self) -> usize;

    /// Called by the server's request loop when a connection is accepted.
    fn client_connected(&self) {}

    /// Called by the server's request loop when a connection ends.
    fn client_disconnected(&self) {}
}

/// The one production [`Registry`]: a mutex-guarded map plus an atomic
/// client counter. The mutex is the single serialization point §5 requires
/// for tag mutation; `client_count` is tracked separately since reading it
/// must not contend with tag reads/writes.
#[derive(Debug, Default)]
pub struct InMemoryRegistry {
    tags: Mutex<HashMap<u16, Tag>>,
    clients: AtomicUsize,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Registry for InMemoryRegistry {
    fn insert(&self, tag: Tag) {
        let mut tags = self.tags.lock().expect("tag registry mutex poisoned");
        tags.insert(tag.tag_id, tag);
    }

    fn get(&self, id: u16) -> Option<Tag> {
        let tags = self.tags.lock().expect("tag registry mutex poisoned");
        tags.get(&id).cloned()
    }

    fn update_value(&self, id: u16, value: Value) -> Result<(), Error> {
        let mut tags = self.tags.lock().expect("tag registry mutex poisoned");
        let tag = tags.get_mut(&id).ok_or(Error::NotFound(id))?;
        if tag.data_type() != value.data_type() {
            return Err(Error::InvalidValue);
        }
        tag.set_value(value);
        Ok(())
    }

    fn update_string(&self, id: u16, value: String) -> Result<(), Error> {
        let mut tags = self.tags.lock().expect("tag registry mutex poisoned");
        let tag = tags.get_mut(&id).ok_or(Error::NotFound(id))?;
        if tag.data_type() != DataType::String {
            return Err(Error::InvalidValue);
        }
        tag.set_string_value(value);
        Ok(())
    }

    fn remove(&self, id: u16) {
        let mut tags = self.tags.lock().expect("tag registry mutex poisoned");
        tags.remove(&id);
    }

    fn list(&self) -> Vec<Tag> {
        let tags = self.tags.lock().expect("tag registry mutex poisoned");
        tags.values().cloned().collect()
    }

    fn client_count(&self) -> usize {
        self.clients.load(Ordering::SeqCst)
    }

    fn client_connected(&self) {
        self.clients.fetch_add(1, Ordering::SeqCst);
    }

    fn client_disconnected(&self) {
        self.clients.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Encodes a numeric tag's current value into the 4-byte payload slot.
///
/// `data_type == String` tags have no numeric value to encode; callers use
/// [`crate::handlers::read_string`] for those instead. Returns `None` for a
/// string tag so handlers can map that case to `ImplausibleArgument`
/// themselves (§4.B.2).
///
/// Matches on `tag.data_type()`, not on `tag.value()`'s own discriminant:
/// `data_type` is the field handlers already checked before calling this,
/// and a `Tag` whose `value` disagrees with its `data_type` is a
/// constructed-invariant violation, not a case to route silently to the
/// wrong payload encoding.
pub fn value_to_payload(tag: &Tag) -> Option<[u8; 4]> {
    match tag.data_type() {
        DataType::Integer => match tag.value() {
            Value::Integer(v) => Some(v.to_le_bytes()),
            other => panic!("tag {} claims Integer but holds {other:?}", tag.tag_id),
        },
        DataType::Unsigned => match tag.value() {
            Value::Unsigned(v) => Some(v.to_le_bytes()),
            other => panic!("tag {} claims Unsigned but holds {other:?}", tag.tag_id),
        },
        DataType::Float => match tag.value() {
            Value::Float(v) => Some(v.to_le_bytes()),
            other => panic!("tag {} claims Float but holds {other:?}", tag.tag_id),
        },
        DataType::String => None,
    }
}

/// Decodes a 4-byte payload into a [`Value`] matching `data_type`.
///
/// Returns `None` for `data_type == String`, the same as
/// [`value_to_payload`] (string bodies travel via the multi-frame
/// extension, never the 4-byte slot).
pub fn apply_payload(data_type: DataType, payload: [u8; 4]) -> Option<Value> {
    match data_type {
        DataType::Integer => Some(Value::Integer(i32::from_le_bytes(payload))),
        DataType::Unsigned => Some(Value::Unsigned(u32::from_le_bytes(payload))),
        DataType::Float => Some(Value::Float(f32::from_le_bytes(payload))),
        DataType::String => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tag::Access;

    fn sample(id: u16) -> Tag {
        Tag::numeric(id, "temperature", Value::Integer(42), Access::ReadWrite)
    }

    #[test]
    fn insert_then_get_round_trips() {
        let registry = InMemoryRegistry::new();
        registry.insert(sample(1001));
        assert_eq!(registry.get(1001).unwrap().value(), Value::Integer(42));
    }

    #[test]
    fn insert_with_existing_id_replaces() {
        let registry = InMemoryRegistry::new();
        registry.insert(sample(1001));
        registry.insert(Tag::numeric(1001, "temperature", Value::Integer(7), Access::ReadWrite));
        assert_eq!(registry.get(1001).unwrap().value(), Value::Integer(7));
    }

    #[test]
    fn get_on_unregistered_tag_is_none() {
        let registry = InMemoryRegistry::new();
        assert!(registry.get(9).is_none());
    }

    #[test]
    fn update_value_on_missing_tag_is_not_found() {
        let registry = InMemoryRegistry::new();
        assert!(matches!(
            registry.update_value(1, Value::Integer(1)),
            Err(Error::NotFound(1))
        ));
    }

    #[test]
    fn update_value_with_wrong_type_is_invalid() {
        let registry = InMemoryRegistry::new();
        registry.insert(sample(1001));
        assert!(matches!(
            registry.update_value(1001, Value::Float(1.0)),
            Err(Error::InvalidValue)
        ));
    }

    #[test]
    fn remove_is_idempotent() {
        let registry = InMemoryRegistry::new();
        registry.insert(sample(1001));
        registry.remove(1001);
        registry.remove(1001);
        assert!(registry.get(1001).is_none());
    }

    #[test]
    fn client_count_tracks_connects_and_disconnects() {
        let registry = InMemoryRegistry::new();
        assert_eq!(registry.client_count(), 0);
        registry.client_connected();
        registry.client_connected();
        assert_eq!(registry.client_count(), 2);
        registry.client_disconnected();
        assert_eq!(registry.client_count(), 1);
    }

    #[test]
    fn value_payload_round_trips_per_data_type() {
        for (value, data_type) in [
            (Value::Integer(-7), DataType::Integer),
            (Value::Unsigned(7), DataType::Unsigned),
            (Value::Float(3.14), DataType::Float),
        ] {
            let payload = value_to_payload(&Tag::numeric(1, "x", value, Access::ReadWrite)).unwrap();
            assert_eq!(apply_payload(data_type, payload).unwrap(), value);
        }
    }

    #[test]
    fn string_tag_has_no_numeric_payload() {
        let tag = Tag::string(1, "label", "hi", Access::ReadWrite);
        assert!(value_to_payload(&tag).is_none());
        assert!(apply_payload(DataType::String, [0; 4]).is_none());
    }
}
