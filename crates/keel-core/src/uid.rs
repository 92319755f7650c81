//! Package addressing
//!
//! Every package is identified by a two-level composite key: an open-ended
//! `kind` tag (e.g. `"library"`, `"module"`) and a case-sensitive `id`,
//! unique within its kind. The canonical form is `"<kind>.<id>"` and is the
//! sole identity used in event names and error messages.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Canonical composite key identifying a package
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PackageUid {
    /// Package kind tag
    pub kind: String,

    /// Package id, unique within its kind
    pub id: String,
}

impl PackageUid {
    /// Create a uid from split kind and id tokens
    pub fn new(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            id: id.into(),
        }
    }

    /// Parse a dotted `"<kind>.<id>"` string.
    ///
    /// The string must split into exactly two non-empty parts; anything
    /// else (`"foo"`, `".foo"`, `"a.b.c"`) is rejected with
    /// [`Error::MalformedUid`].
    pub fn parse(uid: &str) -> Result<Self> {
        let mut parts = uid.split('.');

        match (parts.next(), parts.next(), parts.next()) {
            (Some(kind), Some(id), None) if !kind.is_empty() && !id.is_empty() => {
                Ok(Self::new(kind, id))
            }
            _ => Err(Error::MalformedUid(uid.to_string())),
        }
    }
}

impl fmt::Display for PackageUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.kind, self.id)
    }
}

impl FromStr for PackageUid {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Argument-conversion seam for the dual addressing scheme.
///
/// Registry methods accept either a dotted uid string or split kind/id
/// tokens; this trait resolves both into a [`PackageUid`]. Split tokens are
/// infallible, a dotted string goes through [`PackageUid::parse`].
pub trait UidSpec {
    /// Resolve into a concrete uid
    fn resolve(self) -> Result<PackageUid>;
}

impl UidSpec for PackageUid {
    fn resolve(self) -> Result<PackageUid> {
        Ok(self)
    }
}

impl UidSpec for &PackageUid {
    fn resolve(self) -> Result<PackageUid> {
        Ok(self.clone())
    }
}

impl UidSpec for &str {
    fn resolve(self) -> Result<PackageUid> {
        PackageUid::parse(self)
    }
}

impl UidSpec for &String {
    fn resolve(self) -> Result<PackageUid> {
        PackageUid::parse(self)
    }
}

impl UidSpec for (&str, &str) {
    fn resolve(self) -> Result<PackageUid> {
        Ok(PackageUid::new(self.0, self.1))
    }
}
