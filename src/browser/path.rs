use std::fmt;

/// Slash-delimited location in the remote tree. The root is the empty path.
///
/// Always normalised: no leading or trailing slash and no empty segments, so
/// two paths naming the same folder compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct TreePath(String);

impl TreePath {
    pub fn root() -> Self {
        Self(String::new())
    }

    /// Normalises typed input: slashes collapse and each segment is trimmed.
    pub fn parse(raw: &str) -> Self {
        let joined = raw
            .split('/')
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .collect::<Vec<_>>()
            .join("/");
        Self(joined)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|s| !s.is_empty())
    }

    /// Child path `self/name`, or `name` at the root. The name is taken
    /// verbatim; surrounding spaces are part of remote names.
    pub fn join(&self, name: &str) -> Self {
        if self.is_root() {
            Self(name.to_string())
        } else {
            Self(format!("{}/{}", self.0, name))
        }
    }

    /// One level up. `None` at the root; a single-segment path goes to the
    /// root.
    pub fn parent(&self) -> Option<Self> {
        if self.is_root() {
            return None;
        }
        match self.0.rfind('/') {
            Some(idx) => Some(Self(self.0[..idx].to_string())),
            None => Some(Self::root()),
        }
    }

    /// Last segment, empty at the root.
    pub fn name(&self) -> &str {
        self.segments().last().unwrap_or("")
    }

    /// Whether `self` is `other` or lies beneath it.
    pub fn starts_with(&self, other: &TreePath) -> bool {
        other.is_root()
            || self.0 == other.0
            || (self.0.starts_with(&other.0) && self.0[other.0.len()..].starts_with('/'))
    }

    /// Object-store list prefix: `""` at the root, otherwise `path/`.
    pub fn as_prefix(&self) -> String {
        if self.is_root() {
            String::new()
        } else {
            format!("{}/", self.0)
        }
    }

    /// Human label for toolbars.
    pub fn label(&self) -> &str {
        if self.is_root() { "Root" } else { &self.0 }
    }
}

impl fmt::Display for TreePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TreePath {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}
