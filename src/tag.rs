//! Tags: the named, typed data points the registry holds.

/// The type of a tag's value. Fixed for the tag's lifetime (§3.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Integer,
    Unsigned,
    Float,
    String,
}

/// A tag's current value, as a sum type keyed by [`DataType`].
///
/// There is no struct-of-optionals here: only the variant matching a tag's
/// `data_type` can ever be constructed for it, so invariant (a) of §3.4 ("a
/// mismatched variant must never be observed") holds by construction rather
/// than by runtime discipline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Integer(i32),
    Unsigned(u32),
    Float(f32),
    String,
}

impl Value {
    pub fn data_type(&self) -> DataType {
        match self {
            Value::Integer(_) => DataType::Integer,
            Value::Unsigned(_) => DataType::Unsigned,
            Value::Float(_) => DataType::Float,
            Value::String => DataType::String,
        }
    }
}

/// A tag's access mode: which operations a client may perform on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Access {
    ReadOnly,
    WriteOnly,
    ReadWrite,
}

impl Access {
    pub fn is_readable(self) -> bool {
        matches!(self, Access::ReadOnly | Access::ReadWrite)
    }

    pub fn is_writable(self) -> bool {
        matches!(self, Access::WriteOnly | Access::ReadWrite)
    }
}

/// A single registered tag.
///
/// `value` carries the numeric payload for [`DataType::Integer`],
/// [`DataType::Unsigned`], and [`DataType::Float`] tags; string tags store
/// their text out-of-band in `string_value`, since a UTF-8 `String` has no
/// fixed-width representation that would fit the 4-byte value slot (§4.A).
///
/// `data_type`, `value`, and `string_value` are private: the only way to
/// build or mutate a `Tag` is through [`Tag::numeric`]/[`Tag::string`] and
/// the `set_*` methods below, all of which keep `data_type` and the active
/// field in lockstep. A `pub` field here would let a caller of the
/// administrative API (`Server::add_tag`, §6.3) construct a `Tag` with a
/// `data_type` that disagrees with `value`'s actual variant; keeping them
/// private is what makes invariant (a) of §3.4 hold by construction rather
/// than by callers' discipline.
#[derive(Debug, Clone, PartialEq)]
pub struct Tag {
    pub tag_id: u16,
    pub name: String,
    data_type: DataType,
    value: Value,
    string_value: String,
    pub access: Access,
}

impl Tag {
    pub fn numeric(tag_id: u16, name: impl Into<String>, value: Value, access: Access) -> Self {
        debug_assert!(!matches!(value, Value::String));
        Self {
            tag_id,
            name: name.into(),
            data_type: value.data_type(),
            value,
            string_value: String::new(),
            access,
        }
    }

    pub fn string(tag_id: u16, name: impl Into<String>, value: impl Into<String>, access: Access) -> Self {
        Self {
            tag_id,
            name: name.into(),
            data_type: DataType::String,
            value: Value::String,
            string_value: value.into(),
            access,
        }
    }

    /// This tag's fixed type (§3.4.c).
    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    /// This tag's current numeric value. Meaningless (always `Value::String`)
    /// when `data_type() == DataType::String`; use [`Tag::string_value`]
    /// instead.
    pub fn value(&self) -> Value {
        self.value
    }

    /// This tag's current string body. Only meaningful when
    /// `data_type() == DataType::String`.
    pub fn string_value(&self) -> &str {
        &self.string_value
    }

    /// Replaces this tag's numeric value.
    ///
    /// Callers (the registry) must check `value.data_type() ==
    /// self.data_type()` themselves and report a typed error instead of
    /// calling this on a mismatch; this only asserts the invariant rather
    /// than checking it, since by the time a `Tag` exists the type check
    /// has already happened once at construction (§3.4.c).
    pub(crate) fn set_value(&mut self, value: Value) {
        debug_assert_eq!(self.data_type, value.data_type());
        self.value = value;
    }

    /// Replaces this tag's string body. Same discipline as
    /// [`Tag::set_value`]: callers check `data_type() == DataType::String`
    /// first.
    pub(crate) fn set_string_value(&mut self, value: String) {
        debug_assert_eq!(self.data_type, DataType::String);
        self.string_value = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_readable_writable_matrix() {
        assert!(Access::ReadOnly.is_readable());
        assert!(!Access::ReadOnly.is_writable());

        assert!(!Access::WriteOnly.is_readable());
        assert!(Access::WriteOnly.is_writable());

        assert!(Access::ReadWrite.is_readable());
        assert!(Access::ReadWrite.is_writable());
    }

    #[test]
    fn value_data_type_matches_constructor() {
        assert_eq!(Value::Integer(1).data_type(), DataType::Integer);
        assert_eq!(Value::Unsigned(1).data_type(), DataType::Unsigned);
        assert_eq!(Value::Float(1.0).data_type(), DataType::Float);
        assert_eq!(Value::String.data_type(), DataType::String);
    }
}
