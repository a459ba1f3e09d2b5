#![forbid(unsafe_code)]

use super::super::{SqliteStore, StoreError};
use jf_core::TemplateId;
use rusqlite::params;

impl SqliteStore {
    /// Templates whose forms hold a live include row targeting the given
    /// template: the reverse edge walked by publish propagation.
    pub fn templates_including(
        &self,
        template: TemplateId,
    ) -> Result<Vec<TemplateId>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT t.id FROM templates t \
             JOIN form_rows r ON r.form_id = t.form_id \
             WHERE r.include_template_id = ?1 AND r.status = 'live' \
             ORDER BY t.id ASC",
        )?;
        let ids = stmt.query_map(params![template.as_i64()], |row| row.get::<_, i64>(0))?;
        let mut out = Vec::new();
        for id in ids {
            out.push(TemplateId::new(id?));
        }
        Ok(out)
    }
}
