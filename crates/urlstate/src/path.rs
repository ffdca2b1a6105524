//! Paths into a state tree.
//!
//! A [`Path`] is the ordered sequence of keys leading from the root of a
//! state tree to one of its leaves. Each [`Seg`] is either an object key or
//! an array index.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// A single segment in a state path.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Seg {
    /// Object key: `{"key": value}`
    Key(String),
    /// Array index: `[index]`
    Index(usize),
}

impl Seg {
    /// Create a key segment.
    #[inline]
    pub fn key(k: impl Into<String>) -> Self {
        Seg::Key(k.into())
    }

    /// Create an index segment.
    #[inline]
    pub fn index(i: usize) -> Self {
        Seg::Index(i)
    }

    /// Returns true if this is an index segment.
    #[inline]
    pub fn is_index(&self) -> bool {
        matches!(self, Seg::Index(_))
    }

    /// The key used when this segment addresses an object.
    ///
    /// Index segments address objects by their decimal form, so `Index(3)`
    /// reads the member `"3"`.
    pub fn object_key(&self) -> Cow<'_, str> {
        match self {
            Seg::Key(k) => Cow::Borrowed(k),
            Seg::Index(i) => Cow::Owned(i.to_string()),
        }
    }

    /// The position used when this segment addresses an array.
    ///
    /// Key segments only address arrays when they are canonical decimal
    /// numbers (`"2"`, not `"02"` or `"+2"`).
    pub fn array_index(&self) -> Option<usize> {
        match self {
            Seg::Index(i) => Some(*i),
            Seg::Key(k) => {
                let canonical = k == "0" || (!k.starts_with('0') && !k.is_empty());
                if canonical && k.bytes().all(|b| b.is_ascii_digit()) {
                    k.parse().ok()
                } else {
                    None
                }
            }
        }
    }
}

impl fmt::Display for Seg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Seg::Key(k) => write!(f, ".{k}"),
            Seg::Index(i) => write!(f, "[{i}]"),
        }
    }
}

impl From<String> for Seg {
    fn from(s: String) -> Self {
        Seg::Key(s)
    }
}

impl From<&str> for Seg {
    fn from(s: &str) -> Self {
        Seg::Key(s.to_owned())
    }
}

impl From<usize> for Seg {
    fn from(i: usize) -> Self {
        Seg::Index(i)
    }
}

/// A complete path into a state tree.
///
/// ```
/// use urlstate::{path, Path, Seg};
///
/// let center = Path::root().key("mapControls").key("center");
/// assert_eq!(center, path!("mapControls", "center"));
/// assert_eq!(center.child(Seg::index(1)).to_string(), "$.mapControls.center[1]");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Path(Vec<Seg>);

impl Path {
    /// The empty path, addressing the root itself.
    #[inline]
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Create a path from a vector of segments.
    #[inline]
    pub fn from_segments(segments: Vec<Seg>) -> Self {
        Self(segments)
    }

    /// Append a key segment (builder pattern).
    #[inline]
    pub fn key(mut self, k: impl Into<String>) -> Self {
        self.0.push(Seg::Key(k.into()));
        self
    }

    /// Append an index segment (builder pattern).
    #[inline]
    pub fn index(mut self, i: usize) -> Self {
        self.0.push(Seg::Index(i));
        self
    }

    /// Push a segment onto the path.
    #[inline]
    pub fn push(&mut self, seg: Seg) {
        self.0.push(seg);
    }

    /// A new path one segment deeper than this one.
    pub fn child(&self, seg: Seg) -> Path {
        let mut segments = Vec::with_capacity(self.0.len() + 1);
        segments.extend(self.0.iter().cloned());
        segments.push(seg);
        Path(segments)
    }

    #[inline]
    pub fn segments(&self) -> &[Seg] {
        &self.0
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn last(&self) -> Option<&Seg> {
        self.0.last()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Seg> {
        self.0.iter()
    }

    /// Render this path as an RFC 6901 JSON Pointer (`/a/0/b`).
    pub fn to_json_pointer(&self) -> String {
        let mut pointer = String::new();
        for seg in &self.0 {
            pointer.push('/');
            pointer.push_str(&seg.object_key().replace('~', "~0").replace('/', "~1"));
        }
        pointer
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "$")?;
        for seg in &self.0 {
            write!(f, "{seg}")?;
        }
        Ok(())
    }
}

impl FromIterator<Seg> for Path {
    fn from_iter<I: IntoIterator<Item = Seg>>(iter: I) -> Self {
        Path(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a Seg;
    type IntoIter = std::slice::Iter<'a, Seg>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl std::ops::Index<usize> for Path {
    type Output = Seg;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

/// Construct a [`Path`] from a sequence of segments.
///
/// String literals become key segments, integers become index segments:
///
/// ```
/// use urlstate::path;
///
/// let p = path!("mapLayers", "EO:TEST-123", "zIndex");
/// let q = path!("mapControls", "center", 0);
/// assert_eq!(q.len(), 3);
/// # let _ = p;
/// ```
#[macro_export]
macro_rules! path {
    () => {
        $crate::Path::root()
    };
    ($($seg:expr),+ $(,)?) => {{
        let mut p = $crate::Path::root();
        $(
            p.push($crate::Seg::from($seg));
        )+
        p
    }};
}
