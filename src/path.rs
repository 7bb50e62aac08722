use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

use crate::element_path_parser::parse_element_path;

/// One segment of an ignore pattern.
#[derive(Eq, PartialEq, Clone, Debug)]
pub enum PathElement {
    Key(String),
    /// Matches any single key (`*`).
    AnyKey,
}

impl PathElement {
    fn matches(&self, key: &str) -> bool {
        match self {
            PathElement::Key(k) => k == key,
            PathElement::AnyKey => true,
        }
    }
}

/// A parsed ignore pattern, e.g. `database.*.password`.
#[derive(PartialEq, Clone, Debug, Default)]
pub struct Path(Vec<PathElement>);

impl Path {
    /// Returns true if the pattern covers exactly the location `key_path`.
    pub fn matches(&self, key_path: &KeyPath) -> bool {
        self.0.len() == key_path.len()
            && self.0.iter().zip(key_path.iter()).all(|(elem, key)| elem.matches(key))
    }
}

impl Deref for Path {
    type Target = Vec<PathElement>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<PathElement>> for Path {
    fn from(value: Vec<PathElement>) -> Self {
        Self(value)
    }
}

impl FromStr for Path {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Path(parse_element_path(s)?))
    }
}

impl TryFrom<&str> for Path {
    type Error = String;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// A pattern to skip during comparison. The flag says whether keys that are
/// present on only one side are skipped as well.
#[derive(PartialEq, Clone, Debug)]
pub struct IgnorePath(pub Path, pub bool);

/// The concrete location of a value: the object keys leading to it from the
/// document root.
#[derive(PartialEq, Eq, Clone, Debug, Default)]
pub struct KeyPath(Vec<String>);

impl KeyPath {
    pub fn root() -> Self {
        Self::default()
    }

    /// The path of `key` inside the object at `self`.
    pub fn child(&self, key: &str) -> Self {
        let mut segments = self.0.clone();
        segments.push(key.to_string());
        Self(segments)
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl Deref for KeyPath {
    type Target = [String];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Segments joined with `.`; the root renders as an empty string.
impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dotted_rendering() {
        let root = KeyPath::root();
        assert_eq!(root.to_string(), "");
        assert!(root.is_root());

        let host = root.child("database").child("host");
        assert_eq!(host.to_string(), "database.host");
        assert_eq!(host.len(), 2);
    }

    #[test]
    fn pattern_matching() {
        let path = KeyPath::root().child("db").child("primary").child("password");

        let exact: Path = "db.primary.password".parse().unwrap();
        let wildcard: Path = "db.*.password".parse().unwrap();
        let prefix: Path = "db.primary".parse().unwrap();
        let other: Path = "db.replica.password".parse().unwrap();

        assert!(exact.matches(&path));
        assert!(wildcard.matches(&path));
        assert!(!prefix.matches(&path));
        assert!(!other.matches(&path));
    }

    #[test]
    fn invalid_pattern() {
        assert!(Path::try_from("a..b").is_err());
    }
}
