//! Upload values handed to the renamer: a bare path or a full upload record.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// A received upload: where it currently lives and what the client called it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadDescriptor {
    /// Current on-disk location of the uploaded bytes.
    pub temporary_path: PathBuf,
    /// Filename as supplied by the client. Untrusted; may carry directory parts.
    pub original_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// Caller-defined fields, carried through relocation untouched.
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

impl UploadDescriptor {
    pub fn new(temporary_path: impl Into<PathBuf>, original_name: impl Into<String>) -> Self {
        Self {
            temporary_path: temporary_path.into(),
            original_name: original_name.into(),
            media_type: None,
            size: None,
            extra: BTreeMap::new(),
        }
    }

    pub fn with_media_type(mut self, media_type: impl Into<String>) -> Self {
        self.media_type = Some(media_type.into());
        self
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Same record, pointing at a new location.
    pub fn relocated(&self, new_path: PathBuf) -> Self {
        Self {
            temporary_path: new_path,
            ..self.clone()
        }
    }
}

/// Input and output shape of [`UploadRenamer::filter`](crate::renamer::UploadRenamer::filter).
/// The variant going in is the variant coming out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadValue {
    Path(PathBuf),
    Descriptor(UploadDescriptor),
}

impl UploadValue {
    /// Path of the file this value currently refers to.
    pub fn source_path(&self) -> &Path {
        match self {
            UploadValue::Path(p) => p,
            UploadValue::Descriptor(d) => &d.temporary_path,
        }
    }

    /// Descriptor view of the value. A bare path serves as its own original name.
    pub fn to_descriptor(&self) -> UploadDescriptor {
        match self {
            UploadValue::Path(p) => {
                UploadDescriptor::new(p.clone(), p.to_string_lossy().into_owned())
            }
            UploadValue::Descriptor(d) => d.clone(),
        }
    }

    /// Build the value of the same shape pointing at `new_path`.
    pub(crate) fn relocated(&self, new_path: PathBuf) -> Self {
        match self {
            UploadValue::Path(_) => UploadValue::Path(new_path),
            UploadValue::Descriptor(d) => UploadValue::Descriptor(d.relocated(new_path)),
        }
    }

    pub fn into_path(self) -> PathBuf {
        match self {
            UploadValue::Path(p) => p,
            UploadValue::Descriptor(d) => d.temporary_path,
        }
    }
}

impl From<PathBuf> for UploadValue {
    fn from(p: PathBuf) -> Self {
        UploadValue::Path(p)
    }
}

impl From<&Path> for UploadValue {
    fn from(p: &Path) -> Self {
        UploadValue::Path(p.to_path_buf())
    }
}

impl From<&str> for UploadValue {
    fn from(p: &str) -> Self {
        UploadValue::Path(PathBuf::from(p))
    }
}

impl From<UploadDescriptor> for UploadValue {
    fn from(d: UploadDescriptor) -> Self {
        UploadValue::Descriptor(d)
    }
}
