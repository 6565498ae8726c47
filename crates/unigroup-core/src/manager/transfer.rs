// ── Export / import ──

use tracing::info;

use super::GroupManager;
use crate::error::GroupError;
use crate::model::GroupsDocument;

impl GroupManager {
    /// Snapshot of the whole store.
    pub fn export(&mut self) -> Result<GroupsDocument, GroupError> {
        Ok(self.data()?.clone())
    }

    /// Import a groups document.
    ///
    /// The document is parsed in full before anything changes. `replace`
    /// swaps the store wholesale; otherwise imported groups are upserted by
    /// slug and win on collision. Returns the number of groups in `document`,
    /// not the number that changed.
    pub fn import(&mut self, document: serde_json::Value, replace: bool) -> Result<usize, GroupError> {
        let imported: GroupsDocument =
            serde_json::from_value(document).map_err(|err| GroupError::InvalidFormat {
                message: err.to_string(),
            })?;
        let count = imported.groups.len();

        if replace {
            self.data = Some(imported);
        } else {
            self.data()?.groups.extend(imported.groups);
        }
        self.save()?;

        info!(count, replace, "imported groups");
        Ok(count)
    }
}
