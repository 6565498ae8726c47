// ── Static group membership ──
//
// Members are identified by normalized MAC or by their literal alias.
// Auto groups have no member list. Adding, listing and clearing fail with
// `WrongKind` on them; lookups, alias updates and removals find nothing;
// `member_macs` reports an empty list.

use super::GroupManager;
use crate::error::GroupError;
use crate::model::{FieldUpdate, Group, GroupKind, GroupMember, GroupType, normalize_mac};

impl GroupManager {
    /// Add a member, or refresh the alias of an existing one.
    ///
    /// `updated_at` only moves when something changed; the file is
    /// rewritten either way.
    pub fn add_member(
        &mut self,
        identifier: &str,
        mac: &str,
        alias: Option<&str>,
    ) -> Result<Group, GroupError> {
        let mac = normalize_mac(mac);
        let alias = alias.filter(|a| !a.is_empty());
        let (_, group) = self.resolve_mut(identifier)?;
        let members = static_members(group, identifier, "add members")?;

        let changed = match members.iter_mut().find(|m| m.mac == mac) {
            Some(existing) => match alias {
                Some(alias) if existing.alias.as_deref() != Some(alias) => {
                    existing.alias = Some(alias.to_owned());
                    true
                }
                _ => false,
            },
            None => {
                members.push(GroupMember {
                    mac,
                    alias: alias.map(str::to_owned),
                });
                true
            }
        };

        if changed {
            group.touch();
        }
        let updated = group.clone();
        self.save()?;
        Ok(updated)
    }

    /// Look up a member by MAC (any format) or alias.
    pub fn get_member(
        &mut self,
        identifier: &str,
        member: &str,
    ) -> Result<Option<GroupMember>, GroupError> {
        let (_, group) = self.resolve_mut(identifier)?;
        let GroupKind::Static { members } = &group.kind else {
            return Ok(None);
        };
        let member_mac = normalize_mac(member);
        Ok(members
            .iter()
            .find(|m| m.is_identified_by(member, &member_mac))
            .cloned())
    }

    /// Set, clear, or keep a member's alias. Returns `false` if the member
    /// does not exist.
    pub fn update_member(
        &mut self,
        identifier: &str,
        member: &str,
        alias: FieldUpdate<String>,
    ) -> Result<bool, GroupError> {
        let (_, group) = self.resolve_mut(identifier)?;
        let GroupKind::Static { members } = &mut group.kind else {
            return Ok(false);
        };
        let member_mac = normalize_mac(member);

        let Some(found) = members
            .iter_mut()
            .find(|m| m.is_identified_by(member, &member_mac))
        else {
            return Ok(false);
        };

        if alias.apply(&mut found.alias) {
            group.touch();
            self.save()?;
        }
        Ok(true)
    }

    /// Remove a member by MAC or alias. Returns `false` if it was not there.
    pub fn remove_member(&mut self, identifier: &str, member: &str) -> Result<bool, GroupError> {
        let (_, group) = self.resolve_mut(identifier)?;
        let GroupKind::Static { members } = &mut group.kind else {
            return Ok(false);
        };
        let member_mac = normalize_mac(member);

        let Some(index) = members
            .iter()
            .position(|m| m.is_identified_by(member, &member_mac))
        else {
            return Ok(false);
        };

        members.remove(index);
        group.touch();
        self.save()?;
        Ok(true)
    }

    /// Members of a static group. An empty group yields an empty list.
    pub fn list_members(&mut self, identifier: &str) -> Result<Vec<GroupMember>, GroupError> {
        let (_, group) = self.resolve_mut(identifier)?;
        Ok(static_members(group, identifier, "list members")?.clone())
    }

    /// Drop every member. Succeeds on an already-empty group.
    pub fn clear_members(&mut self, identifier: &str) -> Result<bool, GroupError> {
        let (_, group) = self.resolve_mut(identifier)?;
        static_members(group, identifier, "clear members")?.clear();
        group.touch();
        self.save()?;
        Ok(true)
    }

    /// MAC addresses of a static group's members; empty for auto groups.
    pub fn member_macs(&mut self, identifier: &str) -> Result<Vec<String>, GroupError> {
        let (_, group) = self.resolve_mut(identifier)?;
        Ok(group
            .members()
            .map(|members| members.iter().map(|m| m.mac.clone()).collect())
            .unwrap_or_default())
    }
}

fn static_members<'g>(
    group: &'g mut Group,
    identifier: &str,
    operation: &'static str,
) -> Result<&'g mut Vec<GroupMember>, GroupError> {
    match &mut group.kind {
        GroupKind::Static { members } => Ok(members),
        GroupKind::Auto { .. } => Err(GroupError::WrongKind {
            identifier: identifier.to_owned(),
            operation,
            expected: GroupType::Static,
            actual: GroupType::Auto,
        }),
    }
}
