/// Every remote table uses a `uuid` primary key with a `gen_random_uuid()` default.
pub type EntityId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// The four entity collections kept in sync with the remote store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Project,
    WorkLog,
    Team,
    Personnel,
}

impl EntityKind {
    /// Name of the remote table backing this entity.
    pub fn table(self) -> &'static str {
        match self {
            Self::Project => "projects",
            Self::WorkLog => "work_logs",
            Self::Team => "teams",
            Self::Personnel => "personnel",
        }
    }

    /// Human-readable label used in error messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::Project => "Project",
            Self::WorkLog => "WorkLog",
            Self::Team => "Team",
            Self::Personnel => "Personnel",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
