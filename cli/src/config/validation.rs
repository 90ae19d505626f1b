//! Sanity checks over loaded configuration.

/// A validation warning detected during configuration loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// The configuration key (e.g., `"restore.ignore_suffixes"`).
    pub source: String,
    /// The specific item that triggered the warning.
    pub item: String,
    /// Human-readable warning message.
    pub message: String,
}

impl ValidationWarning {
    /// Create a new warning.
    #[must_use]
    pub fn new(
        source: impl Into<String>,
        item: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            item: item.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: '{}' {}", self.source, self.item, self.message)
    }
}

/// Trait for configuration validators.
pub trait ConfigValidator {
    /// Validate the configuration and return any warnings found.
    fn validate(&self) -> Vec<ValidationWarning>;
}

/// Check a list of names for entries that can never match a file name.
pub(super) fn check_names(source: &str, names: &[String], warnings: &mut Vec<ValidationWarning>) {
    for name in names {
        if name.is_empty() {
            warnings.push(ValidationWarning::new(source, name, "is empty"));
        } else if name.contains('/') || name.contains('\\') {
            warnings.push(ValidationWarning::new(
                source,
                name,
                "contains a path separator and will never match a single name",
            ));
        }
    }
}
