// ── Group manager ──
//
// Facade over a `GroupStore`. The document is loaded on first access and
// cached for the life of the manager; every mutating call rewrites the
// whole file before returning. Split by concern:
//
//   mod.rs       - lifecycle, resolution, group CRUD
//   members.rs   - static group membership
//   evaluate.rs  - auto-group rules and client filtering
//   transfer.rs  - export / import

mod evaluate;
mod members;
mod transfer;

pub use evaluate::client_matches_rules;

use std::path::PathBuf;

use tracing::{debug, warn};

use crate::error::GroupError;
use crate::model::{FieldUpdate, Group, GroupType, GroupsDocument, NewGroupKind, slugify};
use crate::store::GroupStore;

/// Owns a group store and its lazily loaded document.
#[derive(Debug)]
pub struct GroupManager {
    store: GroupStore,
    data: Option<GroupsDocument>,
}

impl GroupManager {
    pub fn new(store: GroupStore) -> Self {
        Self { store, data: None }
    }

    /// Shorthand for a manager over the groups file at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self::new(GroupStore::new(path))
    }

    pub fn store(&self) -> &GroupStore {
        &self.store
    }

    // ── Document access ──────────────────────────────────────────────

    fn data(&mut self) -> Result<&mut GroupsDocument, GroupError> {
        let doc = match self.data.take() {
            Some(doc) => doc,
            None => self.store.load()?,
        };
        Ok(self.data.insert(doc))
    }

    /// Persist the cached document. On failure the cache is dropped so the
    /// unsaved mutation is not written by a later save.
    fn save(&mut self) -> Result<(), GroupError> {
        let Some(doc) = &self.data else {
            return Ok(());
        };
        let result = self.store.save(doc);
        if let Err(ref err) = result {
            warn!(
                path = %self.store.path().display(),
                error = %err,
                "save failed, discarding cached groups"
            );
            self.data = None;
        }
        result
    }

    /// Resolve `identifier` to a slug and hand back the group mutably.
    fn resolve_mut(&mut self, identifier: &str) -> Result<(String, &mut Group), GroupError> {
        let doc = self.data()?;
        let slug = resolve_in(doc, identifier).ok_or_else(|| GroupError::not_found(identifier))?;
        let group = doc
            .groups
            .get_mut(&slug)
            .ok_or_else(|| GroupError::not_found(identifier))?;
        Ok((slug, group))
    }

    // ── Resolution ───────────────────────────────────────────────────

    /// Resolve a name or slug to the slug it is stored under.
    ///
    /// Tries the identifier as a key, then its slug form, then an exact
    /// case-insensitive display-name match.
    pub fn resolve_group(&mut self, identifier: &str) -> Result<Option<String>, GroupError> {
        Ok(resolve_in(self.data()?, identifier))
    }

    // ── Group CRUD ───────────────────────────────────────────────────

    /// All groups as `(slug, group)` pairs, in store order.
    pub fn list_groups(&mut self) -> Result<Vec<(String, Group)>, GroupError> {
        Ok(self
            .data()?
            .groups
            .iter()
            .map(|(slug, group)| (slug.clone(), group.clone()))
            .collect())
    }

    pub fn get_group(&mut self, identifier: &str) -> Result<Option<(String, Group)>, GroupError> {
        let doc = self.data()?;
        Ok(resolve_in(doc, identifier)
            .and_then(|slug| doc.groups.get(&slug).map(|g| (slug.clone(), g.clone()))))
    }

    /// Create a group keyed by the slug of `name`.
    pub fn create_group(
        &mut self,
        name: &str,
        description: Option<String>,
        kind: NewGroupKind,
    ) -> Result<(String, Group), GroupError> {
        let slug = slugify(name);
        let doc = self.data()?;
        if doc.groups.contains_key(&slug) {
            return Err(GroupError::AlreadyExists { name: name.into() });
        }

        let group = Group::new(name, description, kind, chrono::Utc::now());
        doc.groups.insert(slug.clone(), group.clone());
        self.save()?;

        debug!(slug, kind = %group.group_type(), "created group");
        Ok((slug, group))
    }

    /// Delete a group. Returns `false` if nothing resolved.
    pub fn delete_group(&mut self, identifier: &str) -> Result<bool, GroupError> {
        let doc = self.data()?;
        let Some(slug) = resolve_in(doc, identifier) else {
            return Ok(false);
        };
        doc.groups.shift_remove(&slug);
        self.save()?;

        debug!(slug, "deleted group");
        Ok(true)
    }

    /// Rename and/or re-describe a group.
    ///
    /// A rename whose slug differs moves the entry to the new key. If another
    /// group already lives at that key it is overwritten; use
    /// [`rename_collision`](Self::rename_collision) to check first.
    pub fn update_group(
        &mut self,
        identifier: &str,
        new_name: Option<&str>,
        description: FieldUpdate<String>,
    ) -> Result<(String, Group), GroupError> {
        let (slug, group) = self.resolve_mut(identifier)?;

        let mut new_slug = slug.clone();
        if let Some(name) = new_name.filter(|n| !n.is_empty()) {
            name.clone_into(&mut group.name);
            new_slug = slugify(name);
        }
        description.apply(&mut group.description);
        group.touch();
        let updated = group.clone();

        if new_slug != slug {
            let doc = self.data()?;
            doc.groups.shift_remove(&slug);
            if let Some(replaced) = doc.groups.insert(new_slug.clone(), updated.clone()) {
                warn!(
                    from = slug,
                    to = new_slug,
                    replaced = replaced.name,
                    "rename overwrote an existing group"
                );
            }
        }
        self.save()?;

        Ok((new_slug, updated))
    }

    /// The slug of a *different* group that renaming `identifier` to
    /// `new_name` would overwrite, if any.
    pub fn rename_collision(
        &mut self,
        identifier: &str,
        new_name: &str,
    ) -> Result<Option<String>, GroupError> {
        let doc = self.data()?;
        let slug = resolve_in(doc, identifier).ok_or_else(|| GroupError::not_found(identifier))?;
        let new_slug = slugify(new_name);
        Ok((new_slug != slug && doc.groups.contains_key(&new_slug)).then_some(new_slug))
    }
}

fn resolve_in(doc: &GroupsDocument, identifier: &str) -> Option<String> {
    if doc.groups.contains_key(identifier) {
        return Some(identifier.to_owned());
    }

    let slug = slugify(identifier);
    if doc.groups.contains_key(&slug) {
        return Some(slug);
    }

    let wanted = identifier.to_lowercase();
    doc.groups
        .iter()
        .find(|(_, group)| group.name.to_lowercase() == wanted)
        .map(|(slug, _)| slug.clone())
}

/// Fail with `WrongKind` unless `group` is of the `expected` type.
fn require_kind(
    group: &Group,
    identifier: &str,
    expected: GroupType,
    operation: &'static str,
) -> Result<(), GroupError> {
    let actual = group.group_type();
    if actual == expected {
        Ok(())
    } else {
        Err(GroupError::WrongKind {
            identifier: identifier.to_owned(),
            operation,
            expected,
            actual,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn manager() -> (TempDir, GroupManager) {
        let dir = tempfile::tempdir().unwrap();
        let gm = GroupManager::open(dir.path().join("groups.json"));
        (dir, gm)
    }

    #[test]
    fn create_derives_slug() {
        let (_dir, mut gm) = manager();
        let (slug, group) = gm
            .create_group("Kids Devices", Some("Tablets and phones".into()), NewGroupKind::Static)
            .unwrap();

        assert_eq!(slug, "kids-devices");
        assert_eq!(group.name, "Kids Devices");
        assert_eq!(group.description.as_deref(), Some("Tablets and phones"));
        assert_eq!(group.members(), Some(&[][..]));
        assert_eq!(group.created_at, group.updated_at);
    }

    #[test]
    fn create_twice_is_already_exists() {
        let (_dir, mut gm) = manager();
        gm.create_group("Kids Devices", None, NewGroupKind::Static)
            .unwrap();
        let err = gm
            .create_group("kids devices!", None, NewGroupKind::Static)
            .unwrap_err();
        assert!(matches!(err, GroupError::AlreadyExists { .. }));
    }

    #[test]
    fn resolves_by_slug_then_name() {
        let (_dir, mut gm) = manager();
        gm.create_group("My Test Group", None, NewGroupKind::Static)
            .unwrap();

        assert_eq!(
            gm.resolve_group("my-test-group").unwrap().as_deref(),
            Some("my-test-group")
        );
        assert_eq!(
            gm.resolve_group("MY TEST GROUP").unwrap().as_deref(),
            Some("my-test-group")
        );
        assert_eq!(gm.resolve_group("nope").unwrap(), None);
    }

    #[test]
    fn resolves_name_whose_slug_differs_from_key() {
        let (_dir, mut gm) = manager();
        gm.create_group("Office", None, NewGroupKind::Static).unwrap();
        gm.update_group("office", Some("C++ Lab"), FieldUpdate::Keep)
            .unwrap();
        assert_eq!(
            gm.resolve_group("c++ lab").unwrap().as_deref(),
            Some("c-lab")
        );
    }

    #[test]
    fn delete_reports_missing() {
        let (_dir, mut gm) = manager();
        gm.create_group("To Delete", None, NewGroupKind::Static)
            .unwrap();

        assert!(gm.delete_group("to-delete").unwrap());
        assert!(gm.get_group("to-delete").unwrap().is_none());
        assert!(!gm.delete_group("to-delete").unwrap());
    }

    #[test]
    fn update_renames_and_moves_key() {
        let (_dir, mut gm) = manager();
        gm.create_group("Original Name", Some("Original desc".into()), NewGroupKind::Static)
            .unwrap();

        let (slug, group) = gm
            .update_group(
                "original-name",
                Some("New Name"),
                FieldUpdate::Set("New desc".into()),
            )
            .unwrap();

        assert_eq!(slug, "new-name");
        assert_eq!(group.name, "New Name");
        assert_eq!(group.description.as_deref(), Some("New desc"));
        assert!(gm.get_group("original-name").unwrap().is_none());
        assert_eq!(gm.list_groups().unwrap().len(), 1);
    }

    #[test]
    fn update_description_tri_state() {
        let (_dir, mut gm) = manager();
        gm.create_group("Lab", Some("bench".into()), NewGroupKind::Static)
            .unwrap();

        let (_, group) = gm.update_group("lab", None, FieldUpdate::Keep).unwrap();
        assert_eq!(group.description.as_deref(), Some("bench"));

        let (_, group) = gm.update_group("lab", None, FieldUpdate::Clear).unwrap();
        assert_eq!(group.description, None);
    }

    #[test]
    fn update_missing_is_not_found() {
        let (_dir, mut gm) = manager();
        let err = gm
            .update_group("ghost", Some("x"), FieldUpdate::Keep)
            .unwrap_err();
        assert!(matches!(err, GroupError::NotFound { .. }));
    }

    #[test]
    fn rename_collision_overwrites_and_is_detectable() {
        let (_dir, mut gm) = manager();
        gm.create_group("Alpha", None, NewGroupKind::Static).unwrap();
        gm.create_group("Beta", None, NewGroupKind::Auto(None))
            .unwrap();

        assert_eq!(
            gm.rename_collision("alpha", "Beta").unwrap().as_deref(),
            Some("beta")
        );
        assert_eq!(gm.rename_collision("alpha", "Gamma").unwrap(), None);
        assert_eq!(gm.rename_collision("beta", "BETA").unwrap(), None);

        gm.update_group("alpha", Some("Beta"), FieldUpdate::Keep)
            .unwrap();
        let groups = gm.list_groups().unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].0, "beta");
        assert_eq!(groups[0].1.group_type(), GroupType::Static);
    }

    #[test]
    fn changes_persist_across_managers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("groups.json");

        let mut gm = GroupManager::open(&path);
        gm.create_group("Persisted", None, NewGroupKind::Static)
            .unwrap();

        let mut reopened = GroupManager::open(&path);
        assert!(reopened.get_group("persisted").unwrap().is_some());
    }

    #[test]
    fn failed_save_does_not_leak_into_cache() {
        let dir = tempfile::tempdir().unwrap();
        let parent = dir.path().join("state");
        let mut gm = GroupManager::open(parent.join("groups.json"));
        assert!(gm.list_groups().unwrap().is_empty());

        // A regular file where the parent directory should be.
        std::fs::write(&parent, "").unwrap();
        let err = gm
            .create_group("Kids", None, NewGroupKind::Static)
            .unwrap_err();
        assert!(matches!(err, GroupError::Io(_)));

        std::fs::remove_file(&parent).unwrap();
        assert!(gm.list_groups().unwrap().is_empty());
        gm.create_group("Kids", None, NewGroupKind::Static).unwrap();
        assert_eq!(gm.list_groups().unwrap().len(), 1);
    }
}
