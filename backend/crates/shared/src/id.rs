//! Common ID Types
//!
//! Type-safe ID wrappers for persisted records. Values are assigned by the
//! database (`BIGSERIAL`), so an `Id` is only ever built from a stored row or
//! from a request path that is then looked up.

use serde::{Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::str::FromStr;

/// Generic typed ID wrapper
///
/// The marker parameter keeps ids of different record types apart.
///
/// Usage:
/// ```
/// use kernel::id::Id;
/// struct Sponsor;
/// type SponsorId = Id<Sponsor>;
/// let id = SponsorId::new(7);
/// assert_eq!(id.get(), 7);
/// ```
pub struct Id<T> {
    value: i64,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Id<T> {
    /// Wrap a database-assigned identifier
    pub const fn new(value: i64) -> Self {
        Self {
            value,
            _marker: PhantomData,
        }
    }

    /// Get the raw identifier (for binding into queries)
    pub const fn get(&self) -> i64 {
        self.value
    }
}

// Manual impls: derives would require `T: Clone` etc. on the marker.
impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Id<T> {}

impl<T> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T> Eq for Id<T> {}

impl<T> PartialOrd for Id<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Id<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.value.cmp(&other.value)
    }
}

impl<T> Hash for Id<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<T> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.value)
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl<T> From<i64> for Id<T> {
    fn from(value: i64) -> Self {
        Self::new(value)
    }
}

impl<T> From<Id<T>> for i64 {
    fn from(id: Id<T>) -> Self {
        id.value
    }
}

impl<T> FromStr for Id<T> {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<i64>().map(Self::new)
    }
}

impl<T> Serialize for Id<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Sponsor;
    struct Team;

    #[test]
    fn test_id_type_safety() {
        let sponsor_id: Id<Sponsor> = Id::new(1);
        let team_id: Id<Team> = Id::new(1);

        // Same raw value, different types; only the raw values compare
        assert_eq!(sponsor_id.get(), team_id.get());
    }

    #[test]
    fn test_id_copy_without_marker_bounds() {
        let id: Id<Sponsor> = Id::new(42);
        let copy = id;
        assert_eq!(id, copy);
        assert_eq!(format!("{:?}", copy), "Id(42)");
    }

    #[test]
    fn test_id_from_str() {
        let id: Id<Sponsor> = "15".parse().unwrap();
        assert_eq!(id.get(), 15);
        assert!("abc".parse::<Id<Sponsor>>().is_err());
    }

    #[test]
    fn test_id_serializes_as_number() {
        let id: Id<Team> = Id::new(3);
        assert_eq!(serde_json::to_string(&id).unwrap(), "3");
    }
}
