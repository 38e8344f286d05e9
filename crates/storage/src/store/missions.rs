#![forbid(unsafe_code)]

use super::{SqliteStore, StoreError, now_ms};
use mq_core::ids::MissionId;
use mq_core::model::{Mission, NewMission, StarValue, Stats};
use mq_core::progress::STAR_POINTS;
use rusqlite::{OptionalExtension, Row, Transaction, params};

const MISSION_COLUMNS: &str = "id, title, description, stars, completed, created_at_ms";

impl SqliteStore {
    /// All missions, cheapest reward first (ties by id).
    pub fn list_missions(&self) -> Result<Vec<Mission>, StoreError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {MISSION_COLUMNS} FROM missions ORDER BY stars ASC, id ASC"
        ))?;

        let mut rows = stmt.query([])?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            out.push(mission_from_row(row)?);
        }
        Ok(out)
    }

    pub fn get_mission(&self, id: MissionId) -> Result<Option<Mission>, StoreError> {
        let row = self
            .conn
            .query_row(
                &format!("SELECT {MISSION_COLUMNS} FROM missions WHERE id=?1"),
                params![id.get()],
                raw_mission,
            )
            .optional()?;
        row.map(RawMission::into_mission).transpose()
    }

    pub fn add_mission(&mut self, mission: &NewMission) -> Result<Mission, StoreError> {
        let created_at_ms = now_ms();
        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO missions(title, description, stars, completed, created_at_ms) \
             VALUES (?1, ?2, ?3, 0, ?4)",
            params![
                mission.title(),
                mission.description(),
                mission.stars().get(),
                created_at_ms,
            ],
        )?;
        let id = tx.last_insert_rowid();
        let stored = mission_tx(&tx, id)?;
        tx.commit()?;
        Ok(stored)
    }

    /// Flips `completed` and returns the row as stored afterwards.
    pub fn toggle_mission(&mut self, id: MissionId) -> Result<Mission, StoreError> {
        let tx = self.conn.transaction()?;
        let changed = tx.execute(
            "UPDATE missions SET completed = 1 - completed WHERE id=?1",
            params![id.get()],
        )?;
        if changed == 0 {
            return Err(StoreError::UnknownId);
        }
        let stored = mission_tx(&tx, id.get())?;
        tx.commit()?;
        Ok(stored)
    }

    /// Removes the mission and returns the row it had.
    pub fn delete_mission(&mut self, id: MissionId) -> Result<Mission, StoreError> {
        let tx = self.conn.transaction()?;
        let existing = mission_tx(&tx, id.get())?;
        tx.execute("DELETE FROM missions WHERE id=?1", params![id.get()])?;
        tx.commit()?;
        Ok(existing)
    }

    pub fn mission_stats(&self) -> Result<Stats, StoreError> {
        let stars = self.conn.query_row(
            "SELECT COALESCE(SUM(stars), 0) FROM missions WHERE completed=1",
            [],
            |row| row.get::<_, i64>(0),
        )?;
        Ok(Stats::from_completed_points(stars.saturating_mul(STAR_POINTS)))
    }

    pub fn mission_count(&self) -> Result<usize, StoreError> {
        let count = self
            .conn
            .query_row("SELECT COUNT(1) FROM missions", [], |row| row.get::<_, i64>(0))?;
        usize::try_from(count).map_err(|_| StoreError::InvalidInput("numeric overflow"))
    }
}

struct RawMission {
    id: i64,
    title: String,
    description: String,
    stars: i64,
    completed: i64,
    created_at_ms: i64,
}

impl RawMission {
    fn into_mission(self) -> Result<Mission, StoreError> {
        let id =
            MissionId::try_new(self.id).map_err(|_| StoreError::InvalidInput("invalid mission row"))?;
        let stars = StarValue::try_new(self.stars)
            .map_err(|_| StoreError::InvalidInput("invalid mission row"))?;
        Ok(Mission {
            id,
            title: self.title,
            description: self.description,
            stars,
            completed: self.completed != 0,
            created_at_ms: self.created_at_ms,
        })
    }
}

fn raw_mission(row: &Row<'_>) -> rusqlite::Result<RawMission> {
    Ok(RawMission {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        stars: row.get(3)?,
        completed: row.get(4)?,
        created_at_ms: row.get(5)?,
    })
}

fn mission_from_row(row: &Row<'_>) -> Result<Mission, StoreError> {
    raw_mission(row)?.into_mission()
}

fn mission_tx(tx: &Transaction<'_>, id: i64) -> Result<Mission, StoreError> {
    let row = tx
        .query_row(
            &format!("SELECT {MISSION_COLUMNS} FROM missions WHERE id=?1"),
            params![id],
            raw_mission,
        )
        .optional()?;
    match row {
        Some(raw) => raw.into_mission(),
        None => Err(StoreError::UnknownId),
    }
}
