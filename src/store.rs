use crate::models::{Difficulty, Goal, NewGoal};
use chrono::{Local, NaiveDate};
use rusqlite::{params, types::Type, Connection, Row};
use std::{env, path::Path, path::PathBuf};
use tracing::info;

pub fn resolve_db_path() -> PathBuf {
    if let Ok(path) = env::var("APP_DB_PATH") {
        return PathBuf::from(path);
    }

    PathBuf::from("data/goals.sqlite3")
}

/// The goal table. Every query that touches a single goal is scoped by
/// `(id, client_id)` so a token can only ever reach its own rows.
pub struct GoalStore {
    conn: Connection,
}

impl GoalStore {
    pub fn open(path: &Path) -> rusqlite::Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.migrate()?;
        info!("opened goal store at {}", path.display());
        Ok(store)
    }

    pub fn open_in_memory() -> rusqlite::Result<Self> {
        let store = Self {
            conn: Connection::open_in_memory()?,
        };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&self) -> rusqlite::Result<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS goal (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                client_id   TEXT NOT NULL,
                title       TEXT NOT NULL,
                difficulty  TEXT NOT NULL CHECK (difficulty IN ('small', 'medium', 'large')),
                weight      INTEGER NOT NULL,
                is_done     INTEGER NOT NULL DEFAULT 0,
                date        TEXT NOT NULL,
                created_at  TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_goal_client_date ON goal (client_id, date);",
        )
    }

    /// A client's goals for one day, newest first.
    pub fn list_for_day(&self, client_id: &str, date: NaiveDate) -> rusqlite::Result<Vec<Goal>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, client_id, title, difficulty, weight, is_done, date, created_at
             FROM goal
             WHERE client_id = ?1 AND date = ?2
             ORDER BY created_at DESC, id DESC",
        )?;
        let rows = stmt.query_map(params![client_id, date], goal_from_row)?;
        rows.collect()
    }

    pub fn get(&self, id: i64, client_id: &str) -> rusqlite::Result<Option<Goal>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, client_id, title, difficulty, weight, is_done, date, created_at
             FROM goal
             WHERE id = ?1 AND client_id = ?2",
        )?;
        let mut rows = stmt.query_map(params![id, client_id], goal_from_row)?;
        rows.next().transpose()
    }

    pub fn insert(&self, goal: &NewGoal) -> rusqlite::Result<Goal> {
        let created_at = Local::now();
        let weight = goal.difficulty.weight();
        self.conn.execute(
            "INSERT INTO goal (client_id, title, difficulty, weight, is_done, date, created_at)
             VALUES (?1, ?2, ?3, ?4, 0, ?5, ?6)",
            params![
                goal.client_id,
                goal.title,
                goal.difficulty.as_str(),
                weight,
                goal.date,
                created_at
            ],
        )?;

        Ok(Goal {
            id: self.conn.last_insert_rowid(),
            client_id: goal.client_id.clone(),
            title: goal.title.clone(),
            difficulty: goal.difficulty,
            weight,
            is_done: false,
            date: goal.date,
            created_at,
        })
    }

    /// Flips `is_done`. Returns the new value, or `None` when the client owns
    /// no goal with this id.
    pub fn toggle(&self, id: i64, client_id: &str) -> rusqlite::Result<Option<bool>> {
        let changed = self.conn.execute(
            "UPDATE goal SET is_done = NOT is_done WHERE id = ?1 AND client_id = ?2",
            params![id, client_id],
        )?;
        if changed == 0 {
            return Ok(None);
        }
        Ok(self.get(id, client_id)?.map(|goal| goal.is_done))
    }

    /// Returns false when the client owns no goal with this id.
    pub fn delete(&self, id: i64, client_id: &str) -> rusqlite::Result<bool> {
        let removed = self.conn.execute(
            "DELETE FROM goal WHERE id = ?1 AND client_id = ?2",
            params![id, client_id],
        )?;
        Ok(removed > 0)
    }
}

fn goal_from_row(row: &Row<'_>) -> rusqlite::Result<Goal> {
    let difficulty: String = row.get(3)?;
    let difficulty = difficulty
        .parse::<Difficulty>()
        .map_err(|err| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(err)))?;

    Ok(Goal {
        id: row.get(0)?,
        client_id: row.get(1)?,
        title: row.get(2)?,
        difficulty,
        weight: row.get(4)?,
        is_done: row.get(5)?,
        date: row.get(6)?,
        created_at: row.get(7)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 5).unwrap()
    }

    fn new_goal(client_id: &str, title: &str, difficulty: Difficulty) -> NewGoal {
        NewGoal {
            client_id: client_id.into(),
            title: title.into(),
            difficulty,
            date: today(),
        }
    }

    #[test]
    fn insert_derives_weight_and_defaults() {
        let store = GoalStore::open_in_memory().unwrap();
        let goal = store
            .insert(&new_goal("a", "stretch", Difficulty::Large))
            .unwrap();
        assert_eq!(goal.weight, 5);
        assert!(!goal.is_done);

        let listed = store.list_for_day("a", today()).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, goal.id);
        assert_eq!(listed[0].weight, 5);
        assert_eq!(listed[0].difficulty, Difficulty::Large);
        assert_eq!(listed[0].date, today());
    }

    #[test]
    fn list_is_newest_first() {
        let store = GoalStore::open_in_memory().unwrap();
        let first = store.insert(&new_goal("a", "one", Difficulty::Small)).unwrap();
        let second = store.insert(&new_goal("a", "two", Difficulty::Small)).unwrap();
        let third = store.insert(&new_goal("a", "three", Difficulty::Small)).unwrap();

        let ids: Vec<i64> = store
            .list_for_day("a", today())
            .unwrap()
            .iter()
            .map(|goal| goal.id)
            .collect();
        assert_eq!(ids, vec![third.id, second.id, first.id]);
    }

    #[test]
    fn other_days_are_excluded() {
        let store = GoalStore::open_in_memory().unwrap();
        let mut old = new_goal("a", "yesterday", Difficulty::Medium);
        old.date = today() - Duration::days(1);
        store.insert(&old).unwrap();
        store.insert(&new_goal("a", "today", Difficulty::Medium)).unwrap();

        let listed = store.list_for_day("a", today()).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].title, "today");
        assert_eq!(store.list_for_day("a", old.date).unwrap().len(), 1);
    }

    #[test]
    fn toggle_twice_restores_state() {
        let store = GoalStore::open_in_memory().unwrap();
        let goal = store.insert(&new_goal("a", "run", Difficulty::Small)).unwrap();

        assert_eq!(store.toggle(goal.id, "a").unwrap(), Some(true));
        assert!(store.get(goal.id, "a").unwrap().unwrap().is_done);
        assert_eq!(store.toggle(goal.id, "a").unwrap(), Some(false));
        assert!(!store.get(goal.id, "a").unwrap().unwrap().is_done);
    }

    #[test]
    fn foreign_client_cannot_reach_goal() {
        let store = GoalStore::open_in_memory().unwrap();
        let goal = store.insert(&new_goal("a", "mine", Difficulty::Small)).unwrap();

        assert!(store.list_for_day("b", today()).unwrap().is_empty());
        assert_eq!(store.toggle(goal.id, "b").unwrap(), None);
        assert!(!store.delete(goal.id, "b").unwrap());

        let still_there = store.get(goal.id, "a").unwrap().unwrap();
        assert!(!still_there.is_done);
    }

    #[test]
    fn delete_is_permanent() {
        let store = GoalStore::open_in_memory().unwrap();
        let goal = store.insert(&new_goal("a", "gone", Difficulty::Small)).unwrap();

        assert!(store.delete(goal.id, "a").unwrap());
        assert!(store.list_for_day("a", today()).unwrap().is_empty());
        assert!(store.get(goal.id, "a").unwrap().is_none());
        assert!(!store.delete(goal.id, "a").unwrap());
        assert_eq!(store.toggle(goal.id, "a").unwrap(), None);
    }

    #[test]
    fn unknown_ids_are_not_found() {
        let store = GoalStore::open_in_memory().unwrap();
        assert_eq!(store.toggle(42, "a").unwrap(), None);
        assert!(!store.delete(42, "a").unwrap());
    }

    #[test]
    fn reopening_a_file_keeps_goals() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("goals.sqlite3");
        {
            let store = GoalStore::open(&path).unwrap();
            store.insert(&new_goal("a", "persist", Difficulty::Medium)).unwrap();
        }
        let store = GoalStore::open(&path).unwrap();
        let listed = store.list_for_day("a", today()).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].title, "persist");
    }
}
