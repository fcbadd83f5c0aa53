//! Profile Store: the single mutable cell holding one session's profile.
//!
//! The store is a `tokio::sync::watch` channel of immutable snapshots. Every edit
//! clones the current profile, applies the change, and publishes the result as a
//! new snapshot with a bumped revision. Edits run inside `send_if_modified`, so
//! they are serialized and a failed edit publishes nothing: readers only ever
//! observe complete snapshots.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::watch;

use crate::profile::model::{
    Achievement, BasicInfo, Education, EntryId, Experience, ListEntry, Profile, Project, Skill,
    Socials,
};

#[derive(Debug, Error, PartialEq)]
pub enum ProfileError {
    #[error("No {section} entry with id '{id}'")]
    EntryNotFound { section: ListSection, id: EntryId },
}

/// One published state of the store.
#[derive(Debug, Clone)]
pub struct ProfileSnapshot {
    /// Starts at 0 for the hydrated profile and increases by one per edit.
    pub revision: u64,
    pub profile: Arc<Profile>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListSection {
    Experience,
    Education,
    Skills,
    Achievements,
    Projects,
}

impl std::fmt::Display for ListSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ListSection::Experience => "experience",
            ListSection::Education => "education",
            ListSection::Skills => "skills",
            ListSection::Achievements => "achievements",
            ListSection::Projects => "projects",
        };
        f.write_str(s)
    }
}

/// An entry payload addressed to one list section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "section", content = "entry", rename_all = "snake_case")]
pub enum SectionEntry {
    Experience(Experience),
    Education(Education),
    Skills(Skill),
    Achievements(Achievement),
    Projects(Project),
}

impl SectionEntry {
    pub fn section(&self) -> ListSection {
        match self {
            SectionEntry::Experience(_) => ListSection::Experience,
            SectionEntry::Education(_) => ListSection::Education,
            SectionEntry::Skills(_) => ListSection::Skills,
            SectionEntry::Achievements(_) => ListSection::Achievements,
            SectionEntry::Projects(_) => ListSection::Projects,
        }
    }
}

/// Every mutation the editors can make.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ProfileEdit {
    SetBasicInfo { basic_info: BasicInfo },
    SetSocials { socials: Socials },
    SetSummary { summary: String },
    AddEntry { item: SectionEntry },
    UpdateEntry { id: EntryId, item: SectionEntry },
    DeleteEntry { section: ListSection, id: EntryId },
}

/// Result of a successful edit.
#[derive(Debug, Clone)]
pub struct EditOutcome {
    pub snapshot: ProfileSnapshot,
    /// Identifier assigned by an `AddEntry`.
    pub created_id: Option<EntryId>,
}

pub struct ProfileStore {
    tx: watch::Sender<ProfileSnapshot>,
}

impl ProfileStore {
    pub fn new(profile: Profile) -> Self {
        let (tx, _rx) = watch::channel(ProfileSnapshot {
            revision: 0,
            profile: Arc::new(profile),
        });
        Self { tx }
    }

    pub fn snapshot(&self) -> ProfileSnapshot {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ProfileSnapshot> {
        self.tx.subscribe()
    }

    /// Applies one edit atomically and returns the published snapshot.
    pub fn apply(&self, edit: ProfileEdit) -> Result<EditOutcome, ProfileError> {
        let mut result: Option<Result<EditOutcome, ProfileError>> = None;

        self.tx.send_if_modified(|current| {
            let mut next = Profile::clone(&current.profile);
            match apply_edit(&mut next, edit) {
                Ok(created_id) => {
                    *current = ProfileSnapshot {
                        revision: current.revision + 1,
                        profile: Arc::new(next),
                    };
                    result = Some(Ok(EditOutcome {
                        snapshot: current.clone(),
                        created_id,
                    }));
                    true
                }
                Err(e) => {
                    result = Some(Err(e));
                    false
                }
            }
        });

        result.unwrap_or_else(|| {
            Ok(EditOutcome {
                snapshot: self.snapshot(),
                created_id: None,
            })
        })
    }
}

fn apply_edit(profile: &mut Profile, edit: ProfileEdit) -> Result<Option<EntryId>, ProfileError> {
    match edit {
        ProfileEdit::SetBasicInfo { basic_info } => {
            profile.basic_info = basic_info;
            Ok(None)
        }
        ProfileEdit::SetSocials { socials } => {
            profile.socials = socials;
            Ok(None)
        }
        ProfileEdit::SetSummary { summary } => {
            profile.summary = summary;
            Ok(None)
        }
        ProfileEdit::AddEntry { item } => {
            let id = match item {
                SectionEntry::Experience(e) => add_entry(&mut profile.experience, e),
                SectionEntry::Education(e) => add_entry(&mut profile.education, e),
                SectionEntry::Skills(e) => add_entry(&mut profile.skills, e),
                SectionEntry::Achievements(e) => add_entry(&mut profile.achievements, e),
                SectionEntry::Projects(e) => add_entry(&mut profile.projects, e),
            };
            Ok(Some(id))
        }
        ProfileEdit::UpdateEntry { id, item } => {
            let section = item.section();
            let found = match item {
                SectionEntry::Experience(e) => update_entry(&mut profile.experience, &id, e),
                SectionEntry::Education(e) => update_entry(&mut profile.education, &id, e),
                SectionEntry::Skills(e) => update_entry(&mut profile.skills, &id, e),
                SectionEntry::Achievements(e) => update_entry(&mut profile.achievements, &id, e),
                SectionEntry::Projects(e) => update_entry(&mut profile.projects, &id, e),
            };
            found
                .then_some(None)
                .ok_or(ProfileError::EntryNotFound { section, id })
        }
        ProfileEdit::DeleteEntry { section, id } => {
            let found = match section {
                ListSection::Experience => delete_entry(&mut profile.experience, &id),
                ListSection::Education => delete_entry(&mut profile.education, &id),
                ListSection::Skills => delete_entry(&mut profile.skills, &id),
                ListSection::Achievements => delete_entry(&mut profile.achievements, &id),
                ListSection::Projects => delete_entry(&mut profile.projects, &id),
            };
            found
                .then_some(None)
                .ok_or(ProfileError::EntryNotFound { section, id })
        }
    }
}

/// Appends with a freshly generated id. Any id in the payload is ignored.
fn add_entry<T: ListEntry>(list: &mut Vec<T>, mut entry: T) -> EntryId {
    let mut id = EntryId::generate();
    while list.iter().any(|e| e.id() == &id) {
        id = EntryId::generate();
    }
    entry.set_id(id.clone());
    list.push(entry);
    id
}

/// Replaces in place, keeping the stored id and position.
fn update_entry<T: ListEntry>(list: &mut [T], id: &EntryId, mut entry: T) -> bool {
    match list.iter_mut().find(|e| e.id() == id) {
        Some(slot) => {
            entry.set_id(id.clone());
            *slot = entry;
            true
        }
        None => false,
    }
}

/// Removes the first entry with `id`. Stored documents may carry blank or
/// repeated ids, and one delete must never take out more than one entry.
fn delete_entry<T: ListEntry>(list: &mut Vec<T>, id: &EntryId) -> bool {
    match list.iter().position(|e| e.id() == id) {
        Some(index) => {
            list.remove(index);
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn experience(role: &str, company: &str) -> Experience {
        Experience {
            role: role.to_string(),
            company: company.to_string(),
            start_date: "2020".to_string(),
            end_date: "Present".to_string(),
            ..Default::default()
        }
    }

    fn add(store: &ProfileStore, e: Experience) -> EntryId {
        store
            .apply(ProfileEdit::AddEntry {
                item: SectionEntry::Experience(e),
            })
            .unwrap()
            .created_id
            .unwrap()
    }

    #[test]
    fn test_add_assigns_fresh_id_ignoring_payload() {
        let store = ProfileStore::new(Profile::default());
        let mut e = experience("Engineer", "Acme");
        e.id = EntryId::from("client-chosen");
        let id = add(&store, e);

        let snap = store.snapshot();
        assert_ne!(id.as_str(), "client-chosen");
        assert_eq!(snap.profile.experience[0].id, id);
        assert_eq!(snap.revision, 1);
    }

    #[test]
    fn test_update_one_entry_leaves_others_untouched() {
        let store = ProfileStore::new(Profile::default());
        let a = add(&store, experience("Engineer", "Acme"));
        let b = add(&store, experience("Lead", "Globex"));
        let c = add(&store, experience("CTO", "Initech"));
        let before = store.snapshot().profile;

        let mut changed = experience("Senior Lead", "Globex");
        changed.id = EntryId::from("ignored");
        store
            .apply(ProfileEdit::UpdateEntry {
                id: b.clone(),
                item: SectionEntry::Experience(changed),
            })
            .unwrap();

        let after = store.snapshot().profile;
        let ids: Vec<_> = after.experience.iter().map(|e| e.id.clone()).collect();
        assert_eq!(ids, vec![a, b, c]);
        assert_eq!(after.experience[0], before.experience[0]);
        assert_eq!(after.experience[2], before.experience[2]);
        assert_eq!(after.experience[1].role, "Senior Lead");
    }

    #[test]
    fn test_delete_removes_exactly_one_without_renumbering() {
        let store = ProfileStore::new(Profile::default());
        let a = add(&store, experience("A", "A"));
        let b = add(&store, experience("B", "B"));
        let c = add(&store, experience("C", "C"));

        store
            .apply(ProfileEdit::DeleteEntry {
                section: ListSection::Experience,
                id: b,
            })
            .unwrap();

        let ids: Vec<_> = store
            .snapshot()
            .profile
            .experience
            .iter()
            .map(|e| e.id.clone())
            .collect();
        assert_eq!(ids, vec![a, c]);
    }

    #[test]
    fn test_delete_with_shared_blank_id_removes_only_first() {
        let mut profile = Profile::default();
        profile.experience = vec![
            experience("First", "A"),
            experience("Second", "B"),
            experience("Third", "C"),
        ];
        let store = ProfileStore::new(profile);

        store
            .apply(ProfileEdit::DeleteEntry {
                section: ListSection::Experience,
                id: EntryId::default(),
            })
            .unwrap();

        let roles: Vec<_> = store
            .snapshot()
            .profile
            .experience
            .iter()
            .map(|e| e.role.clone())
            .collect();
        assert_eq!(roles, vec!["Second".to_string(), "Third".to_string()]);
    }

    #[test]
    fn test_failed_edit_publishes_nothing() {
        let store = ProfileStore::new(Profile::default());
        add(&store, experience("A", "A"));
        let mut rx = store.subscribe();
        rx.borrow_and_update();

        let err = store
            .apply(ProfileEdit::DeleteEntry {
                section: ListSection::Skills,
                id: EntryId::from("missing"),
            })
            .unwrap_err();

        assert!(matches!(err, ProfileError::EntryNotFound { .. }));
        assert!(!rx.has_changed().unwrap());
        assert_eq!(store.snapshot().revision, 1);
    }

    #[test]
    fn test_snapshots_are_immutable_after_edit() {
        let store = ProfileStore::new(Profile::default());
        let held = store.snapshot();
        store
            .apply(ProfileEdit::SetSummary {
                summary: "New summary".to_string(),
            })
            .unwrap();
        assert!(held.profile.summary.is_empty());
        assert_eq!(store.snapshot().profile.summary, "New summary");
    }

    #[test]
    fn test_edit_deserializes_from_tagged_json() {
        let json = serde_json::json!({
            "op": "update_entry",
            "id": "abc",
            "item": { "section": "skills", "entry": { "name": "Rust", "proficiency": "expert" } }
        });
        let edit: ProfileEdit = serde_json::from_value(json).unwrap();
        match edit {
            ProfileEdit::UpdateEntry {
                id,
                item: SectionEntry::Skills(skill),
            } => {
                assert_eq!(id.as_str(), "abc");
                assert_eq!(skill.name, "Rust");
            }
            other => panic!("unexpected edit: {other:?}"),
        }
    }
}
