//! A URL's path, modeled as the sum type the living standard actually
//! describes: either a single opaque string, or a list of path segments.
//!
//! [Specification](https://url.spec.whatwg.org/#url-path)

use crate::util;

/// <https://url.spec.whatwg.org/#url-path>
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Path {
    /// A path with no internal structure, used by URLs with an opaque path
    /// (e.g. `mailto:user@example.com`, `data:text/plain,hi`).
    Opaque(String),

    /// A list of zero or more path segments, used by URLs with a
    /// hierarchical path (special URLs, and non-opaque `file:`/relative
    /// references).
    List(Vec<String>),
}

impl Path {
    #[must_use]
    pub fn is_opaque(&self) -> bool {
        matches!(self, Self::Opaque(_))
    }

    /// The path's segments, for list paths only.
    #[must_use]
    pub fn segments(&self) -> Option<&[String]> {
        match self {
            Self::Opaque(_) => None,
            Self::List(segments) => Some(segments),
        }
    }

    pub fn segments_mut(&mut self) -> Option<&mut Vec<String>> {
        match self {
            Self::Opaque(_) => None,
            Self::List(segments) => Some(segments),
        }
    }

    pub fn push(&mut self, segment: String) {
        if let Self::List(segments) = self {
            segments.push(segment);
        }
    }

    /// <https://url.spec.whatwg.org/#shorten-a-urls-path>
    ///
    /// `is_file` controls the single-normalized-Windows-drive-letter
    /// exception the algorithm carves out for `file:` URLs. A no-op on
    /// opaque paths.
    pub fn shorten(&mut self, is_file: bool) {
        let Self::List(segments) = self else {
            return;
        };

        if is_file
            && segments.len() == 1
            && util::is_normalized_windows_drive_letter(&segments[0])
        {
            return;
        }

        segments.pop();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Opaque(s) => s.is_empty(),
            Self::List(segments) => segments.is_empty(),
        }
    }

    /// <https://url.spec.whatwg.org/#url-path-serializer>
    #[must_use]
    pub fn serialize(&self) -> String {
        match self {
            Self::Opaque(s) => s.clone(),
            Self::List(segments) => {
                let mut out = String::new();
                for segment in segments {
                    out.push('/');
                    out.push_str(segment);
                }
                out
            },
        }
    }
}

impl Default for Path {
    fn default() -> Self {
        Self::List(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::Path;

    #[test]
    fn shorten_pops_last_segment() {
        let mut path = Path::List(vec!["a".to_string(), "b".to_string()]);
        path.shorten(false);
        assert_eq!(path, Path::List(vec!["a".to_string()]));
    }

    #[test]
    fn shorten_keeps_lone_drive_letter_for_file_urls() {
        let mut path = Path::List(vec!["C:".to_string()]);
        path.shorten(true);
        assert_eq!(path, Path::List(vec!["C:".to_string()]));
    }

    #[test]
    fn shorten_is_noop_on_opaque_paths() {
        let mut path = Path::Opaque("text/plain,hi".to_string());
        path.shorten(false);
        assert_eq!(path, Path::Opaque("text/plain,hi".to_string()));
    }

    #[test]
    fn serialize_joins_list_with_slashes() {
        let path = Path::List(vec!["a".to_string(), "b".to_string(), "c".to_string()]);
        assert_eq!(path.serialize(), "/a/b/c");
    }

    #[test]
    fn serialize_opaque_is_verbatim() {
        let path = Path::Opaque("text/plain,hi".to_string());
        assert_eq!(path.serialize(), "text/plain,hi");
    }
}
