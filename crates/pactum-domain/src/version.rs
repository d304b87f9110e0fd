//! Schema version module - which built-in field set a prompt asks for

/// Built-in schema versions
///
/// Two field sets are in use and neither is canonical:
/// - Batch: the file pipeline's set (trial period, agreement type, reconciliation entity)
/// - Review: the interactive form's set (HIPAA flags, reconciliation method,
///   computed reconciliation start date)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaVersion {
    /// Field set used by the batch pipeline
    Batch,

    /// Field set used by the interactive review form
    Review,
}

impl SchemaVersion {
    /// All built-in versions, in listing order
    pub const ALL: [SchemaVersion; 2] = [SchemaVersion::Batch, SchemaVersion::Review];

    /// Get the version name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaVersion::Batch => "batch",
            SchemaVersion::Review => "review",
        }
    }

    /// Parse a version from a string (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "batch" => Some(SchemaVersion::Batch),
            "review" => Some(SchemaVersion::Review),
            _ => None,
        }
    }
}

impl std::fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SchemaVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid schema version: {}", s))
    }
}
