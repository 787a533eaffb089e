use std::fmt;

use crate::kind::ObjectKind;

/// Suffix addressing the tombstone left behind by a delete.
pub const TOMBSTONE_SUFFIX: &str = "/fcr:tombstone";

/// Suffix addressing the technical metadata of a binary.
pub const METADATA_SUFFIX: &str = "/fcr:metadata";

/// Canonical location of an object in the repository.
///
/// Layout: `{base_url}{container}/{record|resource}/{id}`. The base URL is
/// expected to end with `/`. Ids and containers are used verbatim; nothing is
/// validated or escaped here.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RepositoryPath(String);

impl RepositoryPath {
    /// Build the path for an object of `kind` with `id` inside `container`.
    pub fn new(base_url: &str, container: &str, kind: ObjectKind, id: &str) -> Self {
        let segment = kind.segment();
        let mut path = String::with_capacity(
            base_url.len() + container.len() + segment.len() + id.len() + 2,
        );
        path.push_str(base_url);
        path.push_str(container);
        path.push('/');
        path.push_str(segment);
        path.push('/');
        path.push_str(id);
        Self(path)
    }

    /// Path of the tombstone for this object.
    pub fn tombstone(&self) -> String {
        format!("{}{TOMBSTONE_SUFFIX}", self.0)
    }

    /// Path of the metadata description for this object.
    pub fn metadata(&self) -> String {
        format!("{}{METADATA_SUFFIX}", self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for RepositoryPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RepositoryPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
