use std::{collections::BTreeSet, rc::Rc};

use leptos::*;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::session::{SessionStore, StoreError};

pub const PROFILE_KEY: &str = "profileData";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileSection {
    Personal,
    Contact,
    Service,
    Education,
    Training,
    Documents,
}

impl ProfileSection {
    pub const ALL: [ProfileSection; 6] = [
        ProfileSection::Personal,
        ProfileSection::Contact,
        ProfileSection::Service,
        ProfileSection::Education,
        ProfileSection::Training,
        ProfileSection::Documents,
    ];
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileCompletion {
    pub completed: BTreeSet<ProfileSection>,
}

impl ProfileCompletion {
    pub fn mark_complete(&mut self, section: ProfileSection) -> bool {
        self.completed.insert(section)
    }

    pub fn is_section_complete(&self, section: ProfileSection) -> bool {
        self.completed.contains(&section)
    }

    /// Whole-number percentage, rounded down.
    pub fn percent_complete(&self) -> u8 {
        let total = ProfileSection::ALL.len();
        (self.completed.len() * 100 / total) as u8
    }

    pub fn is_complete(&self) -> bool {
        self.completed.len() == ProfileSection::ALL.len()
    }
}

/// Officer profile cached in session storage between page views.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileData {
    pub full_name: Option<String>,
    pub service_id: Option<String>,
    pub cadre: Option<String>,
    pub batch_year: Option<u16>,
    pub completion: ProfileCompletion,
    /// Fields owned by other screens, kept as-is on save.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Clone)]
pub struct ProfileRepository {
    store: Rc<dyn SessionStore>,
}

impl ProfileRepository {
    pub fn new(store: Rc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// Missing or unreadable data yields an empty profile.
    pub fn load(&self) -> Result<ProfileData, StoreError> {
        let Some(raw) = self.store.get(PROFILE_KEY)? else {
            return Ok(ProfileData::default());
        };
        Ok(serde_json::from_str(&raw).unwrap_or_else(|err| {
            warn!("Discarding cached profile data: {}", err);
            ProfileData::default()
        }))
    }

    pub fn save(&self, profile: &ProfileData) -> Result<(), StoreError> {
        let raw = serde_json::to_string(profile).map_err(|err| StoreError::Write {
            key: PROFILE_KEY.to_string(),
            message: err.to_string(),
        })?;
        self.store.set(PROFILE_KEY, &raw)
    }
}

#[derive(Clone, Copy)]
pub struct ProfileContext {
    pub profile: RwSignal<ProfileData>,
    repository: StoredValue<ProfileRepository>,
}

impl ProfileContext {
    pub fn completion_percent(&self) -> Signal<u8> {
        let profile = self.profile;
        Signal::derive(move || profile.with(|p| p.completion.percent_complete()))
    }

    pub fn mark_section_complete(&self, section: ProfileSection) {
        let mut changed = false;
        self.profile
            .update(|p| changed = p.completion.mark_complete(section));
        if changed {
            self.persist();
        }
    }

    fn persist(&self) {
        let result = self
            .profile
            .with_untracked(|p| self.repository.with_value(|repo| repo.save(p)));
        if let Err(err) = result {
            warn!("Failed to cache profile data: {}", err);
        }
    }
}

pub fn provide_profile(store: Rc<dyn SessionStore>) -> ProfileContext {
    let repository = ProfileRepository::new(store);
    let initial = repository.load().unwrap_or_else(|err| {
        warn!("Profile cache unavailable: {}", err);
        ProfileData::default()
    });
    let ctx = ProfileContext {
        profile: create_rw_signal(initial),
        repository: store_value(repository),
    };
    provide_context(ctx);
    ctx
}

pub fn use_profile() -> Option<ProfileContext> {
    use_context::<ProfileContext>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemoryStore;

    #[test]
    fn completion_percent_rounds_down() {
        let mut completion = ProfileCompletion::default();
        assert_eq!(completion.percent_complete(), 0);
        completion.mark_complete(ProfileSection::Personal);
        assert_eq!(completion.percent_complete(), 16);
        for section in ProfileSection::ALL {
            completion.mark_complete(section);
        }
        assert_eq!(completion.percent_complete(), 100);
        assert!(completion.is_complete());
    }

    #[test]
    fn load_tolerates_corrupt_cache() {
        let store = Rc::new(MemoryStore::with_entries([(PROFILE_KEY, "{oops")]));
        let repo = ProfileRepository::new(store);
        assert_eq!(repo.load().unwrap(), ProfileData::default());
    }

    #[test]
    fn save_keeps_unknown_fields() {
        let store = Rc::new(MemoryStore::with_entries([(
            PROFILE_KEY,
            r#"{"fullName":"A. Officer","posting":{"state":"Kerala"}}"#,
        )]));
        let repo = ProfileRepository::new(store.clone());
        let mut profile = repo.load().unwrap();
        assert_eq!(profile.full_name.as_deref(), Some("A. Officer"));
        profile.batch_year = Some(2015);
        repo.save(&profile).unwrap();

        let raw = store.get(PROFILE_KEY).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["posting"]["state"], "Kerala");
        assert_eq!(value["batchYear"], 2015);
    }
}
