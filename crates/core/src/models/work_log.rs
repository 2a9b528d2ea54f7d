//! WorkLog entity model and DTOs.
//!
//! A work log records one maintenance visit. Logs without a project are
//! "blank worksheets"; that status is derived from `project_id` and never
//! stored on its own.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::models::Entity;
use crate::types::{EntityId, EntityKind, Timestamp};
use crate::validation::{
    require_non_negative_f64, require_non_negative_i32, require_present, validate_personnel,
};

// ---------------------------------------------------------------------------
// Tagged fields
// ---------------------------------------------------------------------------

/// Irrigation work performed during the visit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Irrigation {
    #[default]
    None,
    /// System started or serviced.
    #[serde(rename = "irrigation")]
    Active,
    /// System shut down (end of season).
    Disabled,
}

impl Irrigation {
    /// Tag stored in the remote `irrigation` column.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Active => "irrigation",
            Self::Disabled => "disabled",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "none" => Some(Self::None),
            "irrigation" => Some(Self::Active),
            "disabled" => Some(Self::Disabled),
            _ => None,
        }
    }
}

/// What happened to green waste produced during the visit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WasteManagement {
    #[default]
    None,
    LeftOnSite,
    Removed,
}

impl WasteManagement {
    /// Tag stored in the remote `waste_management` column.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::LeftOnSite => "left_on_site",
            Self::Removed => "removed",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "none" => Some(Self::None),
            "left_on_site" => Some(Self::LeftOnSite),
            "removed" => Some(Self::Removed),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Time tracking
// ---------------------------------------------------------------------------

/// Clock times and billed hours for a visit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeTracking {
    /// Left the depot.
    pub departure: Option<NaiveTime>,
    /// Arrived on site.
    pub arrival: Option<NaiveTime>,
    /// Finished on site.
    pub end: Option<NaiveTime>,
    pub break_minutes: i32,
    pub total_hours: f64,
}

impl TimeTracking {
    /// On-site hours from `arrival` to `end`, minus the break.
    ///
    /// Returns `None` when either clock time is missing or the end precedes
    /// the arrival. Never negative.
    pub fn computed_hours(&self) -> Option<f64> {
        let (arrival, end) = (self.arrival?, self.end?);
        if end < arrival {
            return None;
        }
        let minutes = (end - arrival).num_minutes() - i64::from(self.break_minutes);
        Some((minutes.max(0) as f64) / 60.0)
    }

    fn validate(&self) -> Result<(), CoreError> {
        require_non_negative_i32("break_minutes", self.break_minutes)?;
        require_non_negative_f64("total_hours", self.total_hours)
    }
}

// ---------------------------------------------------------------------------
// Entity and DTOs
// ---------------------------------------------------------------------------

/// A single maintenance visit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkLog {
    pub id: EntityId,
    /// `None` for a blank worksheet.
    pub project_id: Option<EntityId>,
    pub date: NaiveDate,
    /// Names of the people on the visit; soft references to personnel.
    pub personnel: Vec<String>,
    pub time_tracking: TimeTracking,
    /// Litres of water used.
    pub water_consumption: Option<f64>,
    pub irrigation: Irrigation,
    pub waste_management: WasteManagement,
    pub tasks: Option<String>,
    pub notes: Option<String>,
    pub invoiced: bool,
    pub is_archived: bool,
    pub created_at: Timestamp,
}

impl WorkLog {
    /// A work log not tied to any project.
    pub fn is_blank_worksheet(&self) -> bool {
        self.project_id.is_none()
    }

    pub fn belongs_to(&self, project_id: EntityId) -> bool {
        self.project_id == Some(project_id)
    }
}

/// DTO for creating a work log.
///
/// `date` is optional here only so that a missing date can be reported as a
/// validation failure instead of a deserialization error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorkLog {
    pub project_id: Option<EntityId>,
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub personnel: Vec<String>,
    #[serde(default)]
    pub time_tracking: TimeTracking,
    pub water_consumption: Option<f64>,
    #[serde(default)]
    pub irrigation: Irrigation,
    #[serde(default)]
    pub waste_management: WasteManagement,
    pub tasks: Option<String>,
    pub notes: Option<String>,
    #[serde(default)]
    pub invoiced: bool,
    #[serde(default)]
    pub is_archived: bool,
}

/// DTO for updating a work log. All fields are optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWorkLog {
    pub project_id: Option<Option<EntityId>>,
    pub date: Option<NaiveDate>,
    pub personnel: Option<Vec<String>>,
    pub time_tracking: Option<TimeTracking>,
    pub water_consumption: Option<Option<f64>>,
    pub irrigation: Option<Irrigation>,
    pub waste_management: Option<WasteManagement>,
    pub tasks: Option<Option<String>>,
    pub notes: Option<Option<String>>,
    pub invoiced: Option<bool>,
    /// Only honoured for blank worksheets.
    pub is_archived: Option<bool>,
}

impl Entity for WorkLog {
    const KIND: EntityKind = EntityKind::WorkLog;
    type Create = CreateWorkLog;
    type Patch = UpdateWorkLog;

    fn id(&self) -> EntityId {
        self.id
    }

    fn validate_create(input: &CreateWorkLog) -> Result<(), CoreError> {
        require_present("date", input.date.as_ref())?;
        validate_personnel(&input.personnel)?;
        input.time_tracking.validate()?;
        if let Some(water) = input.water_consumption {
            require_non_negative_f64("water_consumption", water)?;
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), CoreError> {
        validate_personnel(&self.personnel)?;
        self.time_tracking.validate()?;
        if let Some(water) = self.water_consumption {
            require_non_negative_f64("water_consumption", water)?;
        }
        Ok(())
    }

    fn apply_patch(&mut self, patch: UpdateWorkLog) {
        if let Some(project_id) = patch.project_id {
            self.project_id = project_id;
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(personnel) = patch.personnel {
            self.personnel = personnel;
        }
        if let Some(time_tracking) = patch.time_tracking {
            self.time_tracking = time_tracking;
        }
        if let Some(water) = patch.water_consumption {
            self.water_consumption = water;
        }
        if let Some(irrigation) = patch.irrigation {
            self.irrigation = irrigation;
        }
        if let Some(waste) = patch.waste_management {
            self.waste_management = waste;
        }
        if let Some(tasks) = patch.tasks {
            self.tasks = tasks;
        }
        if let Some(notes) = patch.notes {
            self.notes = notes;
        }
        if let Some(invoiced) = patch.invoiced {
            self.invoiced = invoiced;
        }
        if let Some(is_archived) = patch.is_archived {
            self.is_archived = is_archived;
        }
    }

    fn archive_link(&mut self) -> Option<(EntityId, &mut bool)> {
        let project_id = self.project_id?;
        Some((project_id, &mut self.is_archived))
    }

    fn create_archive_link(input: &mut CreateWorkLog) -> Option<(EntityId, &mut bool)> {
        let project_id = input.project_id?;
        Some((project_id, &mut input.is_archived))
    }

    /// The archive flag of a project-linked log follows its project.
    fn check_transition(&self, next: &Self) -> Result<(), CoreError> {
        let stays_blank = self.is_blank_worksheet() && next.is_blank_worksheet();
        if self.is_archived != next.is_archived && !stays_blank {
            return Err(CoreError::Validation(
                "archive state of a project work log follows its project".to_string(),
            ));
        }
        Ok(())
    }
}
