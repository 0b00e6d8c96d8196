use std::fmt;

use crate::config::{INFO_DIR, THUMBNAILS_DIR};

/// Slash-terminated address of a remote folder, e.g. `/videos/Trip%202024/`.
///
/// Segments stay percent-encoded; [`FolderPath::display`] decodes for
/// presentation only and is never used to build request URLs.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FolderPath(String);

impl FolderPath {
    /// Normalize to a leading and trailing `/`.
    pub fn new(raw: &str) -> Self {
        let mut path = String::with_capacity(raw.len() + 2);
        if !raw.starts_with('/') {
            path.push('/');
        }
        path.push_str(raw);
        if !path.ends_with('/') {
            path.push('/');
        }
        Self(path)
    }

    /// Derive the managed root from the page location.
    ///
    /// A trailing filename-like segment (one containing a `.`) is dropped,
    /// so `/videos/index.html` and `/videos` both give `/videos/`.
    pub fn from_location(pathname: &str) -> Self {
        let dir = match pathname.rsplit_once('/') {
            Some((head, last)) if last.contains('.') => head,
            Some(_) => pathname,
            None if pathname.contains('.') => "",
            None => pathname,
        };
        Self::new(dir)
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Non-empty, still-encoded segments.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|s| !s.is_empty())
    }

    pub fn depth(&self) -> usize {
        self.segments().count()
    }

    pub fn is_root(&self) -> bool {
        self.depth() == 0
    }

    pub fn last_segment(&self) -> Option<&str> {
        self.segments().last()
    }

    /// Last segment, percent-decoded.
    pub fn name(&self) -> Option<String> {
        self.last_segment().map(decode)
    }

    /// Path of a child folder; the name is percent-encoded.
    pub fn child(&self, name: &str) -> Self {
        Self(format!("{}{}/", self.0, urlencoding::encode(name)))
    }

    /// Path with the last segment removed, `None` at `/`.
    pub fn parent(&self) -> Option<Self> {
        let segments: Vec<&str> = self.segments().collect();
        let (_, kept) = segments.split_last()?;

        let mut path = String::from("/");
        for segment in kept {
            path.push_str(segment);
            path.push('/');
        }
        Some(Self(path))
    }

    /// Companion thumbnail listing of this folder.
    pub fn thumbnails(&self) -> Self {
        Self(format!("{}{}/", self.0, THUMBNAILS_DIR))
    }

    /// Companion subfolder info listing of this folder.
    pub fn info(&self) -> Self {
        Self(format!("{}{}/", self.0, INFO_DIR))
    }

    pub fn starts_with(&self, base: &FolderPath) -> bool {
        self.0.starts_with(&base.0)
    }

    /// Percent-decoded path for titles.
    pub fn display(&self) -> String {
        decode(&self.0)
    }
}

impl fmt::Display for FolderPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for FolderPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

fn decode(raw: &str) -> String {
    urlencoding::decode(raw)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| raw.to_string())
}
