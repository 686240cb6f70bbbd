//! Path text → ordered segments.
//!
//! A path addresses a location in an object graph with `.`-separated
//! member names, using the reserved `Container.data[<int>]` marker for
//! array/list elements:
//!
//! ```text
//! stats.hp
//! items.Container.data[2]
//! items.Container.data[2].name
//! grid.Container.data[1].Container.data[3]     (containers nested in containers)
//! ```
//!
//! Parsing is a single left-to-right scan. The marker attaches the
//! bracketed index to the *preceding* member name; when that name slot was
//! already consumed (nested containers), a pure-index segment with an
//! empty name is produced instead.

use alloc::borrow::Cow;
use core::fmt;
use core::fmt::Write as _;

use fastvec::FastVec;

use crate::error::SyntaxError;

// -----------------------------------------------------------------------------
// Segment

/// One atomic step of a [`FieldPath`]: a member name, optionally carrying
/// the ordinal position at which the member's container is consumed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Segment<'a> {
    name: Cow<'a, str>,
    index: Option<usize>,
    offset: usize,
}

impl<'a> Segment<'a> {
    /// Returns the member name. Empty for a pure-index segment (nested
    /// containers).
    #[inline]
    pub fn name(&self) -> &str {
        self.name.as_ref()
    }

    /// Returns the container index, if this segment is indexed.
    #[inline]
    pub const fn index(&self) -> Option<usize> {
        self.index
    }

    /// Returns the byte offset of this segment in the parsed text.
    #[inline]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// Converts this into an "owned" value.
    #[inline]
    pub fn into_owned(self) -> Segment<'static> {
        Segment {
            name: Cow::Owned(self.name.into_owned()),
            index: self.index,
            offset: self.offset,
        }
    }
}

impl fmt::Display for Segment<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.name.is_empty() {
            f.write_str(&self.name)?;
        }
        if let Some(index) = self.index {
            if !self.name.is_empty() {
                f.write_str(".")?;
            }
            write!(f, "Container.data[{index}]")?;
        }
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// FieldPath

/// A parsed path: a non-empty ordered sequence of [`Segment`]s.
///
/// Parsing borrows from the input; use [`into_owned`](Self::into_owned)
/// to keep a path beyond the text's lifetime. Re-serializing through
/// `Display` produces the canonical text, and re-parsing that text yields
/// an identical segment sequence.
///
/// # Examples
///
/// ```
/// use glint_inspect::path::FieldPath;
///
/// let path = FieldPath::parse("items.Container.data[2].name").unwrap();
/// assert_eq!(path.len(), 2);
/// assert_eq!(path.segments()[0].name(), "items");
/// assert_eq!(path.segments()[0].index(), Some(2));
/// assert_eq!(path.segments()[1].name(), "name");
/// assert_eq!(path.to_string(), "items.Container.data[2].name");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath<'a> {
    segments: Box<[Segment<'a>]>,
}

/// The reserved marker that turns the preceding member into an indexed
/// container access.
const MARKER: &str = "Container.data[";

impl<'a> FieldPath<'a> {
    /// Parses a path string.
    ///
    /// Returns [`SyntaxError`] for empty paths, empty segments, and
    /// malformed bracket content. These are caller bugs, never retryable.
    ///
    /// # Examples
    ///
    /// ```
    /// use glint_inspect::path::FieldPath;
    ///
    /// assert!(FieldPath::parse("stats.hp").is_ok());
    /// assert!(FieldPath::parse("items.Container.data[+2]").is_err());
    /// assert!(FieldPath::parse("stats..hp").is_err());
    /// assert!(FieldPath::parse("").is_err());
    /// ```
    pub fn parse(path: &'a str) -> Result<Self, SyntaxError> {
        fn fail(path: &str, offset: usize, error: &'static str) -> SyntaxError {
            SyntaxError {
                offset,
                path: path.to_owned(),
                error: Cow::Borrowed(error),
            }
        }

        if path.is_empty() {
            return Err(fail(path, 0, "a path holds at least one segment"));
        }

        let mut vec: FastVec<Segment<'a>, 8> = FastVec::new();
        let segments = vec.data();
        // The most recent segment stays local until the next token, so the
        // marker can still attach its index to it.
        let mut pending: Option<Segment<'a>> = None;
        let mut pos = 0_usize;

        loop {
            let start = pos;
            if path[pos..].starts_with(MARKER) {
                let digits_at = pos + MARKER.len();
                let Some(close) = path[digits_at..].find(']') else {
                    return Err(fail(path, digits_at, "unterminated container index"));
                };
                let digits = &path[digits_at..digits_at + close];
                if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(fail(
                        path,
                        digits_at,
                        "container index must be a non-negative base-10 integer",
                    ));
                }
                let index: usize = digits
                    .parse()
                    .map_err(|_| fail(path, digits_at, "container index out of range"))?;
                match pending.as_mut() {
                    Some(seg) if seg.index.is_none() => seg.index = Some(index),
                    // The name axis was already consumed: nested containers.
                    _ => {
                        if let Some(seg) = pending.take() {
                            segments.push(seg);
                        }
                        pending = Some(Segment {
                            name: Cow::Borrowed(""),
                            index: Some(index),
                            offset: start,
                        });
                    }
                }
                pos = digits_at + close + 1;
            } else {
                let end = path[pos..].find('.').map_or(path.len(), |rel| pos + rel);
                let name = &path[start..end];
                if name.is_empty() {
                    return Err(fail(path, start, "empty path segment"));
                }
                if let Some(seg) = pending.take() {
                    segments.push(seg);
                }
                pending = Some(Segment {
                    name: Cow::Borrowed(name),
                    index: None,
                    offset: start,
                });
                pos = end;
            }

            if pos == path.len() {
                break;
            }
            if path.as_bytes()[pos] != b'.' {
                return Err(fail(path, pos, "expected `.` after container index"));
            }
            pos += 1;
            if pos == path.len() {
                return Err(fail(path, pos, "empty path segment"));
            }
        }

        if let Some(seg) = pending.take() {
            segments.push(seg);
        }

        Ok(Self {
            segments: vec.into_boxed_slice(),
        })
    }

    /// Returns the parsed segments.
    #[inline]
    pub fn segments(&self) -> &[Segment<'a>] {
        &self.segments
    }

    /// Returns the number of segments.
    #[inline]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Converts this into an "owned" value.
    pub fn into_owned(self) -> FieldPath<'static> {
        FieldPath {
            segments: self
                .segments
                .into_vec()
                .into_iter()
                .map(Segment::into_owned)
                .collect(),
        }
    }

    /// Renders the canonical text of the first `count` segments.
    ///
    /// Used for error context; `count` is clamped to the path length.
    pub fn prefix(&self, count: usize) -> String {
        let mut out = String::new();
        for (i, seg) in self.segments.iter().take(count).enumerate() {
            if i > 0 {
                out.push('.');
            }
            // Writing to a String cannot fail.
            let _ = write!(out, "{seg}");
        }
        out
    }
}

impl fmt::Display for FieldPath<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, seg) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            fmt::Display::fmt(seg, f)?;
        }
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::FieldPath;

    #[test]
    fn plain_members() {
        let path = FieldPath::parse("a.b.c").unwrap();
        let names: Vec<_> = path.segments().iter().map(|s| s.name()).collect();
        assert_eq!(names, ["a", "b", "c"]);
        assert!(path.segments().iter().all(|s| s.index().is_none()));
    }

    #[test]
    fn indexed_member() {
        let path = FieldPath::parse("items.Container.data[2]").unwrap();
        assert_eq!(path.len(), 1);
        assert_eq!(path.segments()[0].name(), "items");
        assert_eq!(path.segments()[0].index(), Some(2));
    }

    #[test]
    fn marker_mid_path() {
        let path = FieldPath::parse("a.items.Container.data[0].b").unwrap();
        assert_eq!(path.len(), 3);
        assert_eq!(path.segments()[1].name(), "items");
        assert_eq!(path.segments()[1].index(), Some(0));
        assert_eq!(path.segments()[2].name(), "b");
    }

    #[test]
    fn nested_containers() {
        let path = FieldPath::parse("grid.Container.data[1].Container.data[3]").unwrap();
        assert_eq!(path.len(), 2);
        assert_eq!(path.segments()[0].name(), "grid");
        assert_eq!(path.segments()[0].index(), Some(1));
        assert_eq!(path.segments()[1].name(), "");
        assert_eq!(path.segments()[1].index(), Some(3));
    }

    #[test]
    fn container_as_plain_member_name() {
        // No bracket after it, so `Container` is just a member.
        let path = FieldPath::parse("a.Container.b").unwrap();
        let names: Vec<_> = path.segments().iter().map(|s| s.name()).collect();
        assert_eq!(names, ["a", "Container", "b"]);
    }

    #[test]
    fn malformed_brackets() {
        assert!(FieldPath::parse("a.Container.data[]").is_err());
        assert!(FieldPath::parse("a.Container.data[x]").is_err());
        assert!(FieldPath::parse("a.Container.data[+1]").is_err());
        assert!(FieldPath::parse("a.Container.data[-1]").is_err());
        assert!(FieldPath::parse("a.Container.data[1").is_err());
        assert!(FieldPath::parse("a.Container.data[1]b").is_err());
    }

    #[test]
    fn empty_segments() {
        assert!(FieldPath::parse("").is_err());
        assert!(FieldPath::parse(".").is_err());
        assert!(FieldPath::parse("a.").is_err());
        assert!(FieldPath::parse(".a").is_err());
        assert!(FieldPath::parse("a..b").is_err());
    }

    #[test]
    fn reserialize_reparse_is_identity() {
        for text in [
            "a",
            "a.b.c",
            "items.Container.data[2]",
            "a.items.Container.data[0].b",
            "grid.Container.data[1].Container.data[3]",
        ] {
            let parsed = FieldPath::parse(text).unwrap();
            let canonical = parsed.to_string();
            assert_eq!(canonical, text);
            assert_eq!(FieldPath::parse(&canonical).unwrap(), parsed);
        }
    }

    #[test]
    fn prefix_renders_leading_segments() {
        let path = FieldPath::parse("a.items.Container.data[0].b").unwrap();
        assert_eq!(path.prefix(1), "a");
        assert_eq!(path.prefix(2), "a.items.Container.data[0]");
        assert_eq!(path.prefix(9), path.to_string());
    }

    #[test]
    fn offsets_track_the_source_text() {
        let path = FieldPath::parse("ab.cd.Container.data[1]").unwrap();
        assert_eq!(path.segments()[0].offset(), 0);
        assert_eq!(path.segments()[1].offset(), 3);
    }
}
