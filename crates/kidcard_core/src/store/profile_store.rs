//! Durable child profile list and legacy-format migration.
//!
//! # Responsibility
//! - Own the persisted profile list under the `children_list` key.
//! - Reconcile the legacy single-profile slot (`child_profile`) into the
//!   list format exactly once.
//! - Provide create/update/delete/list/get with `NotFound` semantics.
//!
//! # Invariants
//! - Every operation is a whole-list read-modify-write serialized by a
//!   store-level mutex; at most one mutation is in flight at a time.
//! - Ids are unique and assigned exactly once; updates preserve both the
//!   id and the record's position in the list.
//! - Invalid persisted state is rejected (`InvalidData`), never masked;
//!   on any failure the persisted list is left unchanged.

use crate::model::form::ValidationErrors;
use crate::model::profile::{ChildProfile, ProfileDraft, ProfileId};
use crate::store::kv::{KeyValueStore, KvError};
use log::info;
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::{Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

/// Canonical storage key: JSON-encoded list of [`ChildProfile`] records.
pub const CHILDREN_LIST_KEY: &str = "children_list";
/// Legacy storage key: JSON-encoded single profile without an id.
/// Read-only migration source; deleted once migrated.
pub const LEGACY_PROFILE_KEY: &str = "child_profile";

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors from profile store operations.
#[derive(Debug)]
pub enum StoreError {
    /// The draft violates a field constraint; nothing was written.
    Validation(ValidationErrors),
    /// No record with the given id exists.
    NotFound(ProfileId),
    /// Underlying key-value storage failure.
    Kv(KvError),
    /// Persisted data cannot be decoded into valid profile records.
    InvalidData(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "invalid profile: {err}"),
            Self::NotFound(id) => write!(f, "profile not found: {id}"),
            Self::Kv(err) => write!(f, "{err}"),
            Self::InvalidData(message) => {
                write!(f, "invalid persisted profile data: {message}")
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Kv(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<ValidationErrors> for StoreError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value)
    }
}

impl From<KvError> for StoreError {
    fn from(value: KvError) -> Self {
        Self::Kv(value)
    }
}

/// Exclusive owner of the persisted profile list.
///
/// The mutex queues interleaved callers so that whole-list
/// read-modify-write sequences cannot lose updates to each other; the
/// external contract is unchanged from the unguarded design.
pub struct ProfileStore<S: KeyValueStore> {
    inner: Mutex<S>,
}

impl<S: KeyValueStore> ProfileStore<S> {
    /// Takes exclusive ownership of the storage handle.
    pub fn new(kv: S) -> Self {
        Self {
            inner: Mutex::new(kv),
        }
    }

    /// Returns all stored profiles in list order.
    ///
    /// Runs the legacy-slot migration first when the list key is absent;
    /// an empty store is the valid empty state, never an error.
    pub fn list(&self) -> StoreResult<Vec<ChildProfile>> {
        let mut kv = self.lock();
        read_profiles(&mut *kv)
    }

    /// Returns the profile with the given id.
    ///
    /// Derived from the same read path as [`ProfileStore::list`], so the
    /// legacy-slot migration is honored here as well.
    pub fn get_by_id(&self, id: ProfileId) -> StoreResult<ChildProfile> {
        let mut kv = self.lock();
        read_profiles(&mut *kv)?
            .into_iter()
            .find(|profile| profile.id == id)
            .ok_or(StoreError::NotFound(id))
    }

    /// Appends a new profile with a freshly assigned unique id.
    pub fn create(&self, draft: &ProfileDraft) -> StoreResult<ChildProfile> {
        draft.check_invariants()?;

        let mut kv = self.lock();
        let mut profiles = read_profiles(&mut *kv)?;
        let id = unused_profile_id(&profiles);
        let profile = ChildProfile::from_draft(id, draft.clone());
        profiles.push(profile.clone());
        write_profiles(&mut *kv, &profiles)?;

        info!(
            "event=profile_create module=store status=ok id={id} count={}",
            profiles.len()
        );
        Ok(profile)
    }

    /// Replaces the record with the given id, preserving id and position.
    pub fn update(&self, id: ProfileId, draft: &ProfileDraft) -> StoreResult<ChildProfile> {
        draft.check_invariants()?;

        let mut kv = self.lock();
        let mut profiles = read_profiles(&mut *kv)?;
        let updated = ChildProfile::from_draft(id, draft.clone());
        let slot = profiles
            .iter_mut()
            .find(|profile| profile.id == id)
            .ok_or(StoreError::NotFound(id))?;
        *slot = updated.clone();
        write_profiles(&mut *kv, &profiles)?;

        info!("event=profile_update module=store status=ok id={id}");
        Ok(updated)
    }

    /// Removes the record with the given id. Irreversible.
    pub fn delete(&self, id: ProfileId) -> StoreResult<()> {
        let mut kv = self.lock();
        let mut profiles = read_profiles(&mut *kv)?;
        let before = profiles.len();
        profiles.retain(|profile| profile.id != id);
        if profiles.len() == before {
            return Err(StoreError::NotFound(id));
        }
        write_profiles(&mut *kv, &profiles)?;

        info!(
            "event=profile_delete module=store status=ok id={id} count={}",
            profiles.len()
        );
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, S> {
        // A poisoned mutex only means another caller panicked mid-write;
        // the persisted list is still the last fully written state.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn read_profiles<S: KeyValueStore>(kv: &mut S) -> StoreResult<Vec<ChildProfile>> {
    if let Some(raw) = kv.get(CHILDREN_LIST_KEY)? {
        return decode_profiles(&raw);
    }
    migrate_legacy_slot(kv)
}

/// One-time conversion of the legacy single-profile slot.
///
/// Only consulted when the list key is absent. Persists the one-element
/// list first, then deletes the legacy slot, so a crash in between still
/// leaves the migrated list authoritative on the next read.
fn migrate_legacy_slot<S: KeyValueStore>(kv: &mut S) -> StoreResult<Vec<ChildProfile>> {
    let Some(raw) = kv.get(LEGACY_PROFILE_KEY)? else {
        return Ok(Vec::new());
    };

    let draft: ProfileDraft = serde_json::from_str(&raw).map_err(|err| {
        StoreError::InvalidData(format!("legacy profile record is not decodable: {err}"))
    })?;
    draft.check_invariants().map_err(|err| {
        StoreError::InvalidData(format!("legacy profile record violates constraints: {err}"))
    })?;

    let profile = ChildProfile::from_draft(Uuid::new_v4(), draft);
    let migrated = vec![profile];
    write_profiles(kv, &migrated)?;
    kv.remove(LEGACY_PROFILE_KEY)?;

    info!("event=legacy_migrate module=store status=ok count=1");
    Ok(migrated)
}

fn decode_profiles(raw: &str) -> StoreResult<Vec<ChildProfile>> {
    let profiles: Vec<ChildProfile> = serde_json::from_str(raw).map_err(|err| {
        StoreError::InvalidData(format!("profile list is not decodable: {err}"))
    })?;

    let mut seen = HashSet::new();
    for profile in &profiles {
        if !seen.insert(profile.id) {
            return Err(StoreError::InvalidData(format!(
                "duplicate profile id {} in persisted list",
                profile.id
            )));
        }
        profile.check_invariants().map_err(|err| {
            StoreError::InvalidData(format!(
                "persisted profile {} violates constraints: {err}",
                profile.id
            ))
        })?;
    }

    Ok(profiles)
}

fn write_profiles<S: KeyValueStore>(kv: &mut S, profiles: &[ChildProfile]) -> StoreResult<()> {
    let raw = serde_json::to_string(profiles).map_err(|err| {
        StoreError::InvalidData(format!("profile list is not encodable: {err}"))
    })?;
    kv.set(CHILDREN_LIST_KEY, &raw)?;
    Ok(())
}

fn unused_profile_id(profiles: &[ChildProfile]) -> ProfileId {
    // v4 collisions are negligible; the loop makes uniqueness within the
    // current list unconditional anyway.
    loop {
        let id = Uuid::new_v4();
        if !profiles.iter().any(|profile| profile.id == id) {
            return id;
        }
    }
}
