//! Output types for the resolution pipeline.
//!
//! Everything here is ephemeral: recomputed on every configuration change,
//! serialized to the UI listing collaborator, never persisted.

use serde::Serialize;

use crate::manifest::PartVariant;

/// A variant that matched the current configuration, joined with its
/// owning category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedPart {
    pub category: String,
    pub category_label: String,
    pub variant: PartVariant,
}

/// The matching part set, split the way the scene and download collaborators
/// consume it. Order within each group follows manifest insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResolvedParts {
    pub renderable: Vec<ResolvedPart>,
    pub download_only: Vec<ResolvedPart>,
}

impl ResolvedParts {
    /// All resolved parts, renderable group first.
    pub fn iter(&self) -> impl Iterator<Item = &ResolvedPart> {
        self.renderable.iter().chain(self.download_only.iter())
    }
}

/// An (axis, option) pair the UI should grey out under the current
/// configuration.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct DisabledOption {
    pub axis: String,
    pub option: String,
}

/// Output file format. The two formats are mutually exclusive per file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FileFormat {
    #[serde(rename = "stl")]
    Stl,
    #[serde(rename = "3mf")]
    ThreeMf,
}

impl FileFormat {
    pub fn extension(self) -> &'static str {
        match self {
            FileFormat::Stl => "stl",
            FileFormat::ThreeMf => "3mf",
        }
    }
}

/// A resolved output artifact for the packaging collaborator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileDescriptor {
    /// Display name (the final filename without its extension).
    pub name: String,
    /// Fetch path relative to the asset root.
    pub path: String,
    pub format: FileFormat,
    /// True when the file belongs to the category eligible for the
    /// cosmetic-variant transformation.
    pub cosmetic: bool,
}

/// Complete result of resolving one configuration: the part set, the
/// compatibility output, and the derived file manifest.
#[derive(Debug, Clone, Serialize)]
pub struct Resolution {
    pub parts: ResolvedParts,
    pub warnings: Vec<String>,
    pub disabled: Vec<DisabledOption>,
    pub files: Vec<FileDescriptor>,
}
