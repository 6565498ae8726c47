// ── Auto-group rules and client filtering ──

use std::collections::HashSet;

use tracing::{debug, trace};

use super::{GroupManager, require_kind};
use crate::error::GroupError;
use crate::matcher::CompiledRules;
use crate::model::{AutoGroupRules, ClientView, Group, GroupKind, GroupType, normalize_mac};

impl GroupManager {
    /// Replace the rule set of an auto group.
    pub fn set_rules(&mut self, identifier: &str, rules: AutoGroupRules) -> Result<Group, GroupError> {
        let (slug, group) = self.resolve_mut(identifier)?;
        require_kind(group, identifier, GroupType::Auto, "set rules")?;

        group.kind = GroupKind::Auto { rules: Some(rules) };
        group.touch();
        let updated = group.clone();
        self.save()?;

        debug!(slug, "updated auto-group rules");
        Ok(updated)
    }

    /// Clients from `candidates` that satisfy the group's rules.
    ///
    /// Static groups and auto groups without a rule set evaluate to nothing.
    /// A rule set with every category empty constrains nothing and keeps
    /// every candidate.
    pub fn evaluate_auto_group<'c, C: ClientView>(
        &mut self,
        identifier: &str,
        candidates: &'c [C],
    ) -> Result<Vec<&'c C>, GroupError> {
        let (slug, group) = self.resolve_mut(identifier)?;
        let Some(rules) = group.rules() else {
            return Ok(Vec::new());
        };

        let compiled = CompiledRules::compile(rules);
        let matched: Vec<&C> = candidates
            .iter()
            .filter(|client| {
                let hit = compiled.matches(*client);
                trace!(slug, mac = client.mac().unwrap_or("-"), hit, "evaluated client");
                hit
            })
            .collect();

        debug!(
            slug,
            candidates = candidates.len(),
            matched = matched.len(),
            "evaluated auto group"
        );
        Ok(matched)
    }

    /// Narrow `candidates` to the group's clients.
    ///
    /// Static groups keep clients whose MAC is a member, in any MAC format.
    /// Auto groups delegate to [`evaluate_auto_group`](Self::evaluate_auto_group).
    pub fn filter_clients<'c, C: ClientView>(
        &mut self,
        identifier: &str,
        candidates: &'c [C],
    ) -> Result<Vec<&'c C>, GroupError> {
        let (_, group) = self.resolve_mut(identifier)?;
        let Some(members) = group.members() else {
            return self.evaluate_auto_group(identifier, candidates);
        };

        let macs: HashSet<&str> = members.iter().map(|m| m.mac.as_str()).collect();
        Ok(candidates
            .iter()
            .filter(|client| {
                client
                    .mac()
                    .is_some_and(|mac| macs.contains(normalize_mac(mac).as_str()))
            })
            .collect())
    }
}

/// One-off rule check without a manager. Compiles `rules` on every call;
/// use [`CompiledRules`] when testing many clients.
pub fn client_matches_rules<C: ClientView + ?Sized>(client: &C, rules: &AutoGroupRules) -> bool {
    CompiledRules::compile(rules).matches(client)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{ClientRecord, NewGroupKind};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tempfile::TempDir;

    fn manager() -> (TempDir, GroupManager) {
        let dir = tempfile::tempdir().unwrap();
        let gm = GroupManager::open(dir.path().join("groups.json"));
        (dir, gm)
    }

    fn clients() -> Vec<ClientRecord> {
        serde_json::from_value(json!([
            { "mac": "aa:bb:cc:00:00:01", "name": "iPhone", "oui": "Apple", "is_wired": false },
            { "mac": "aa:bb:cc:00:00:02", "hostname": "mac-mini", "oui": "Apple", "is_wired": true },
            { "mac": "11:22:33:00:00:03", "name": "Galaxy", "oui": "Samsung", "is_wired": false },
            { "mac": "11:22:33:00:00:04", "hostname": "printer", "oui": "HP", "is_wired": true }
        ]))
        .unwrap()
    }

    fn apple_wireless() -> AutoGroupRules {
        AutoGroupRules {
            vendor: vec!["Apple".into()],
            conn_type: vec!["wireless".into()],
            ..AutoGroupRules::default()
        }
    }

    fn names<C: ClientView>(matched: &[&C]) -> Vec<String> {
        matched
            .iter()
            .map(|c| c.display_name().unwrap_or_default().to_owned())
            .collect()
    }

    #[test]
    fn evaluates_apple_wireless_only() {
        let (_dir, mut gm) = manager();
        gm.create_group("Phones", None, NewGroupKind::Auto(Some(apple_wireless())))
            .unwrap();

        let clients = clients();
        let matched = gm.evaluate_auto_group("phones", &clients).unwrap();
        assert_eq!(names(&matched), vec!["iPhone"]);
    }

    #[test]
    fn vendor_patterns_are_ored() {
        let (_dir, mut gm) = manager();
        let rules = AutoGroupRules {
            vendor: vec!["Apple".into(), "Samsung".into()],
            conn_type: vec!["wireless".into()],
            ..AutoGroupRules::default()
        };
        gm.create_group("Phones", None, rules.into()).unwrap();

        let clients = clients();
        let matched = gm.evaluate_auto_group("phones", &clients).unwrap();
        assert_eq!(names(&matched), vec!["iPhone", "Galaxy"]);
    }

    #[test]
    fn static_and_ruleless_groups_evaluate_empty() {
        let (_dir, mut gm) = manager();
        gm.create_group("Static", None, NewGroupKind::Static)
            .unwrap();
        gm.create_group("Bare", None, NewGroupKind::Auto(None))
            .unwrap();

        let clients = clients();
        assert!(gm.evaluate_auto_group("static", &clients).unwrap().is_empty());
        assert!(gm.evaluate_auto_group("bare", &clients).unwrap().is_empty());
    }

    #[test]
    fn blank_rule_set_keeps_every_client() {
        let (_dir, mut gm) = manager();
        gm.create_group("Blank", None, AutoGroupRules::default().into())
            .unwrap();
        gm.import(
            serde_json::json!({ "groups": { "all": {
                "name": "All",
                "type": "auto",
                "rules": {
                    "vendor": null, "name": null, "hostname": null, "network": null,
                    "ip": null, "mac": null, "conn_type": null
                },
                "created_at": "2024-01-15T10:30:00Z",
                "updated_at": "2024-01-15T10:30:00Z"
            } } }),
            false,
        )
        .unwrap();

        let clients = clients();
        assert_eq!(gm.evaluate_auto_group("blank", &clients).unwrap().len(), clients.len());
        assert_eq!(gm.evaluate_auto_group("all", &clients).unwrap().len(), clients.len());
    }

    #[test]
    fn evaluate_missing_is_not_found() {
        let (_dir, mut gm) = manager();
        let err = gm
            .evaluate_auto_group::<ClientRecord>("ghost", &[])
            .unwrap_err();
        assert!(matches!(err, GroupError::NotFound { .. }));
    }

    #[test]
    fn set_rules_replaces_and_rejects_static() {
        let (_dir, mut gm) = manager();
        gm.create_group("Auto", None, NewGroupKind::Auto(None))
            .unwrap();
        gm.create_group("Static", None, NewGroupKind::Static)
            .unwrap();

        let group = gm.set_rules("auto", apple_wireless()).unwrap();
        assert_eq!(group.rules(), Some(&apple_wireless()));

        let err = gm.set_rules("static", apple_wireless()).unwrap_err();
        assert!(matches!(
            err,
            GroupError::WrongKind {
                expected: GroupType::Auto,
                actual: GroupType::Static,
                ..
            }
        ));
    }

    #[test]
    fn filter_static_group_by_member_mac() {
        let (_dir, mut gm) = manager();
        gm.create_group("Kids", None, NewGroupKind::Static).unwrap();
        gm.add_member("kids", "AABBCC000002", None).unwrap();
        gm.add_member("kids", "11-22-33-00-00-04", None).unwrap();

        let clients = clients();
        let matched = gm.filter_clients("kids", &clients).unwrap();
        assert_eq!(names(&matched), vec!["mac-mini", "printer"]);
    }

    #[test]
    fn filter_auto_group_delegates_to_rules() {
        let (_dir, mut gm) = manager();
        gm.create_group("Phones", None, apple_wireless().into())
            .unwrap();

        let clients = clients();
        let matched = gm.filter_clients("phones", &clients).unwrap();
        assert_eq!(names(&matched), vec!["iPhone"]);
    }

    #[test]
    fn client_matches_rules_standalone() {
        let clients = clients();
        assert!(client_matches_rules(&clients[0], &apple_wireless()));
        assert!(!client_matches_rules(&clients[1], &apple_wireless()));
        assert!(client_matches_rules(&clients[3], &AutoGroupRules::default()));
    }
}
