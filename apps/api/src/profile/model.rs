use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ────────────────────────────────────────────────────────────────────────────
// Entry identifiers
// ────────────────────────────────────────────────────────────────────────────

/// Locally generated key of a list entry. Unique within its list only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(String);

impl EntryId {
    pub fn generate() -> Self {
        EntryId(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EntryId {
    fn from(value: &str) -> Self {
        EntryId(value.to_string())
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Scalar blocks
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BasicInfo {
    pub name: String,
    pub title: String,
    pub email: String,
    pub phone: String,
    pub location: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Socials {
    pub linkedin: String,
    pub github: String,
    pub portfolio: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
}

impl Socials {
    /// Non-empty links in display order.
    pub fn links(&self) -> Vec<&str> {
        [
            Some(self.linkedin.as_str()),
            Some(self.github.as_str()),
            Some(self.portfolio.as_str()),
            self.twitter.as_deref(),
        ]
        .into_iter()
        .flatten()
        .filter(|s| !s.trim().is_empty())
        .collect()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// List entries
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmploymentType {
    Fulltime,
    Internship,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Experience {
    pub id: EntryId,
    #[serde(alias = "position")]
    pub role: String,
    pub company: String,
    pub location: String,
    pub start_date: String,
    pub end_date: String,
    pub current: bool,
    pub description: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<EmploymentType>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Education {
    pub id: EntryId,
    pub institution: String,
    pub degree: String,
    pub field: String,
    pub location: String,
    pub start_date: String,
    pub end_date: String,
    pub current: bool,
    pub grade: String,
    pub description: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillCategory {
    #[default]
    Technical,
    Soft,
    Language,
    Tool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Proficiency {
    Beginner,
    #[default]
    Intermediate,
    Expert,
}

impl Proficiency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Proficiency::Beginner => "beginner",
            Proficiency::Intermediate => "intermediate",
            Proficiency::Expert => "expert",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Skill {
    pub id: EntryId,
    pub name: String,
    pub category: SkillCategory,
    pub proficiency: Proficiency,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AchievementCategory {
    Academic,
    #[default]
    Professional,
    Personal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Achievement {
    pub id: EntryId,
    pub title: String,
    pub description: String,
    pub date: String,
    pub category: AchievementCategory,
}

/// A hackathon or side project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Project {
    pub id: EntryId,
    pub project_name: String,
    pub event_name: String,
    pub date: String,
    pub role: String,
    pub description: String,
    pub technologies: Vec<String>,
    pub award: String,
    pub project_link: String,
}

/// Common access to the identifier every list entry carries.
pub trait ListEntry {
    fn id(&self) -> &EntryId;
    fn set_id(&mut self, id: EntryId);
}

macro_rules! impl_list_entry {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl ListEntry for $ty {
                fn id(&self) -> &EntryId {
                    &self.id
                }

                fn set_id(&mut self, id: EntryId) {
                    self.id = id;
                }
            }
        )+
    };
}

impl_list_entry!(Experience, Education, Skill, Achievement, Project);

// ────────────────────────────────────────────────────────────────────────────
// Profile aggregate
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Profile {
    pub basic_info: BasicInfo,
    pub socials: Socials,
    pub summary: String,
    pub experience: Vec<Experience>,
    pub education: Vec<Education>,
    pub skills: Vec<Skill>,
    pub achievements: Vec<Achievement>,
    #[serde(alias = "hackathons")]
    pub projects: Vec<Project>,
}

impl Profile {
    /// Display name used for export file names; falls back to "Resume".
    pub fn display_name(&self) -> &str {
        let name = self.basic_info.name.trim();
        if name.is_empty() {
            "Resume"
        } else {
            name
        }
    }

    pub fn has_summary(&self) -> bool {
        !self.summary.trim().is_empty()
    }
}

/// Formats `start - end`, substituting "Present" for current entries.
pub fn date_range(start: &str, end: &str, current: bool) -> String {
    let end = if current { "Present" } else { end };
    match (start.trim().is_empty(), end.trim().is_empty()) {
        (true, true) => String::new(),
        (false, true) => start.to_string(),
        (true, false) => end.to_string(),
        (false, false) => format!("{start} - {end}"),
    }
}
