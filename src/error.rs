use thiserror::Error;

/// Manifest integrity violations. All of these are fatal at load time:
/// a manifest that references options or categories that do not exist
/// would silently never match, so it is rejected up front.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("duplicate option axis '{0}'")]
    DuplicateAxis(String),

    #[error("option domain '{axis}' has default '{default}' which is not one of its choices")]
    BadDefault { axis: String, default: String },

    #[error("duplicate variant id '{0}'")]
    DuplicateVariant(String),

    #[error("variant '{variant}' references unknown axis '{axis}'")]
    UnknownAxis { variant: String, axis: String },

    #[error("variant '{variant}' references unknown option '{value}' on axis '{axis}'")]
    UnknownOption {
        variant: String,
        axis: String,
        value: String,
    },

    #[error("variant '{variant}' uses a non-boolean predicate on toggle '{axis}'")]
    NonBooleanToggle { variant: String, axis: String },

    #[error("compatibility rule '{0}' does not match any known option")]
    UnknownRuleKey(String),

    #[error("compatibility rule '{0}' matches options on more than one axis")]
    AmbiguousRuleKey(String),

    #[error("compatibility rule '{rule}' targets unknown axis '{axis}'")]
    UnknownRuleAxis { rule: String, axis: String },

    #[error("compatibility rule '{rule}' suppresses unknown category '{category}'")]
    UnknownSuppressedCategory { rule: String, category: String },

    #[error("renderable variant '{0}' has no render asset")]
    MissingAsset(String),

    #[error("download-only variant '{0}' has no output file")]
    MissingFile(String),

    #[error("variant '{variant}' has unsafe path '{path}'")]
    UnsafePath { variant: String, path: String },

    #[error("failed to read manifest: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse manifest: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Configuration snapshot decode failures. Always recoverable: the caller
/// keeps its last-known-good configuration and reports the failure.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot is not valid base64: {0}")]
    Encoding(String),

    #[error("snapshot payload is not a valid configuration object: {0}")]
    Payload(String),
}
