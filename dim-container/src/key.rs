//! Argument addressing keys.
//!
//! An [`ArgumentKey`] addresses one parameter of a callable, either by
//! its declared name or by its 0-based position.

use std::fmt;

/// Addresses a parameter by name or by position.
///
/// # Examples
/// ```
/// use dim_container::key::ArgumentKey;
///
/// let by_position = ArgumentKey::from(2);
/// assert_eq!(by_position.position(), Some(2));
///
/// let by_name = ArgumentKey::from("transport");
/// assert_eq!(by_name.name(), Some("transport"));
/// assert_ne!(by_name, by_position);
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ArgumentKey {
    Position(usize),
    Name(String),
}

impl ArgumentKey {
    #[inline]
    pub fn position(&self) -> Option<usize> {
        match self {
            ArgumentKey::Position(position) => Some(*position),
            ArgumentKey::Name(_) => None,
        }
    }

    #[inline]
    pub fn name(&self) -> Option<&str> {
        match self {
            ArgumentKey::Name(name) => Some(name),
            ArgumentKey::Position(_) => None,
        }
    }

    /// Returns `true` if this key addresses the given name.
    #[inline]
    pub fn is_name(&self, name: &str) -> bool {
        self.name() == Some(name)
    }

    /// Returns `true` if this key addresses the given position.
    #[inline]
    pub fn is_position(&self, position: usize) -> bool {
        self.position() == Some(position)
    }
}

impl From<usize> for ArgumentKey {
    fn from(position: usize) -> Self {
        ArgumentKey::Position(position)
    }
}

impl From<&str> for ArgumentKey {
    fn from(name: &str) -> Self {
        ArgumentKey::Name(name.to_string())
    }
}

impl From<String> for ArgumentKey {
    fn from(name: String) -> Self {
        ArgumentKey::Name(name)
    }
}

impl From<&ArgumentKey> for ArgumentKey {
    fn from(key: &ArgumentKey) -> Self {
        key.clone()
    }
}

impl fmt::Debug for ArgumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgumentKey::Position(position) => write!(f, "{position}"),
            ArgumentKey::Name(name) => write!(f, "{name:?}"),
        }
    }
}

impl fmt::Display for ArgumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgumentKey::Position(position) => write!(f, "#{position}"),
            ArgumentKey::Name(name) => write!(f, "${name}"),
        }
    }
}
