//! Storage provider descriptors.

use std::fmt;

/// Identity and header conventions of a storage provider.
///
/// The `name` selects which credential keys are read from configuration, and
/// `auth_header` is the scheme placed in front of the access key in the
/// `Authorization` header.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Provider {
    /// Provider identity (`aws`, `google`, ...).
    pub name: String,
    /// Scheme used by header-based authentication (`AWS`, `GOOG1`).
    pub auth_header: String,
    /// Prefix of vendor headers included in the canonical string.
    pub header_prefix: String,
    /// Vendor date header that overrides `Date` when present.
    pub date_header: String,
}

impl Provider {
    /// Name of the Amazon Web Services provider.
    pub const AWS: &str = "aws";
    /// Name of the Google Cloud Storage provider.
    pub const GOOGLE: &str = "google";

    /// Descriptor for Amazon Web Services.
    #[must_use]
    pub fn aws() -> Self {
        Self {
            name: Self::AWS.to_owned(),
            auth_header: "AWS".to_owned(),
            header_prefix: "x-amz-".to_owned(),
            date_header: "x-amz-date".to_owned(),
        }
    }

    /// Descriptor for Google Cloud Storage (interoperable access).
    #[must_use]
    pub fn google() -> Self {
        Self {
            name: Self::GOOGLE.to_owned(),
            auth_header: "GOOG1".to_owned(),
            header_prefix: "x-goog-".to_owned(),
            date_header: "x-goog-date".to_owned(),
        }
    }

    /// Look up a built-in provider by name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            Self::AWS => Some(Self::aws()),
            Self::GOOGLE => Some(Self::google()),
            _ => None,
        }
    }

    /// Get the provider name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.name
    }
}

impl Default for Provider {
    fn default() -> Self {
        Self::aws()
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
