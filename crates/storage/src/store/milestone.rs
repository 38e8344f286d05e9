#![forbid(unsafe_code)]

use super::{SqliteStore, StoreError, now_ms};
use mq_core::model::{MilestoneSettings, MilestoneUpdate};
use rusqlite::{Connection, params};

impl SqliteStore {
    pub fn milestone_settings(&self) -> Result<MilestoneSettings, StoreError> {
        read_milestone(&self.conn)
    }

    pub fn update_milestone(
        &mut self,
        update: MilestoneUpdate,
    ) -> Result<MilestoneSettings, StoreError> {
        let tx = self.conn.transaction()?;
        tx.execute(
            "UPDATE milestone_settings SET total_goal=?1, current_value=?2, updated_at_ms=?3 WHERE id=1",
            params![update.goal(), update.value(), now_ms()],
        )?;
        let settings = read_milestone(&tx)?;
        tx.commit()?;
        Ok(settings)
    }

    /// Adds a signed delta to the current value; the stored value floors at zero.
    pub fn increment_milestone(&mut self, delta: i64) -> Result<MilestoneSettings, StoreError> {
        let tx = self.conn.transaction()?;
        tx.execute(
            "UPDATE milestone_settings \
             SET current_value = MAX(0, current_value + ?1), updated_at_ms=?2 \
             WHERE id=1",
            params![delta, now_ms()],
        )?;
        let settings = read_milestone(&tx)?;
        tx.commit()?;
        Ok(settings)
    }
}

fn read_milestone(conn: &Connection) -> Result<MilestoneSettings, StoreError> {
    let (goal, value) = conn.query_row(
        "SELECT total_goal, current_value FROM milestone_settings WHERE id=1",
        [],
        |row| Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?)),
    )?;
    Ok(MilestoneSettings { goal, value })
}
