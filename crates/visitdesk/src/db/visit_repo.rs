//! Visit repository: CRUD operations for the `visits` table.

use chrono::Utc;
use rusqlite::{params, Row};

use super::{Database, DatabaseError};
use crate::model::{Visit, VisitId, VisitStatus};

/// A raw visit row from the database.
#[derive(Debug, Clone)]
struct VisitRow {
    id: String,
    grade: String,
    class_num: Option<String>,
    name: String,
    purpose: String,
    teacher: String,
    timestamp: i64,
    status: String,
}

impl VisitRow {
    fn from_row(row: &Row<'_>) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            id: row.get("id")?,
            grade: row.get("grade")?,
            class_num: row.get("class_num")?,
            name: row.get("name")?,
            purpose: row.get("purpose")?,
            teacher: row.get("teacher")?,
            timestamp: row.get("timestamp")?,
            status: row.get("status")?,
        })
    }

    fn into_visit(self) -> Result<Visit, DatabaseError> {
        let status = VisitStatus::parse(&self.status).ok_or_else(|| DatabaseError::CorruptRow {
            id: self.id.clone(),
            reason: format!("unknown status '{}'", self.status),
        })?;

        Ok(Visit {
            id: VisitId::new(self.id),
            grade: self.grade,
            class_num: self.class_num,
            name: self.name,
            purpose: self.purpose,
            teacher: self.teacher,
            timestamp: self.timestamp,
            status,
        })
    }
}

/// Inserts a new visit.
pub fn insert(db: &Database, visit: &Visit) -> Result<(), DatabaseError> {
    let now = Utc::now().to_rfc3339();
    db.with_conn(|conn| {
        conn.execute(
            "INSERT INTO visits (id, grade, class_num, name, purpose, teacher, timestamp,
             status, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                visit.id.as_str(),
                visit.grade,
                visit.class_num,
                visit.name,
                visit.purpose,
                visit.teacher,
                visit.timestamp,
                visit.status.as_str(),
                now,
            ],
        )?;
        Ok(())
    })
}

/// Overwrites the status of one visit. Returns whether a row was touched.
pub fn update_status(
    db: &Database,
    id: &VisitId,
    status: VisitStatus,
) -> Result<bool, DatabaseError> {
    let now = Utc::now().to_rfc3339();
    db.with_conn(|conn| {
        let changed = conn.execute(
            "UPDATE visits SET status = ?2, updated_at = ?3 WHERE id = ?1",
            params![id.as_str(), status.as_str(), now],
        )?;
        Ok(changed > 0)
    })
}

/// Finds a visit by its ID.
pub fn find_by_id(db: &Database, id: &VisitId) -> Result<Option<Visit>, DatabaseError> {
    let row = db.with_conn(|conn| {
        let mut stmt = conn.prepare("SELECT * FROM visits WHERE id = ?1")?;
        let mut rows = stmt.query_map(params![id.as_str()], VisitRow::from_row)?;
        match rows.next() {
            Some(Ok(row)) => Ok(Some(row)),
            Some(Err(e)) => Err(DatabaseError::Sqlite(e)),
            None => Ok(None),
        }
    })?;
    row.map(VisitRow::into_visit).transpose()
}

/// Lists visits that are not `DONE`, ordered by timestamp ascending.
pub fn list_active(db: &Database) -> Result<Vec<Visit>, DatabaseError> {
    let rows = db.with_conn(|conn| {
        let mut stmt = conn.prepare(
            "SELECT * FROM visits WHERE status != 'DONE' ORDER BY timestamp ASC, rowid ASC",
        )?;
        let rows = stmt
            .query_map([], VisitRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    })?;
    rows.into_iter().map(VisitRow::into_visit).collect()
}

/// Largest timestamp ever stored, including completed visits. Zero when empty.
pub fn latest_timestamp(db: &Database) -> Result<i64, DatabaseError> {
    db.with_conn(|conn| {
        let latest: i64 =
            conn.query_row("SELECT COALESCE(MAX(timestamp), 0) FROM visits", [], |row| {
                row.get(0)
            })?;
        Ok(latest)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NewVisit;

    fn visit(id: &str, timestamp: i64) -> Visit {
        Visit::from_request(
            VisitId::new(id),
            NewVisit {
                purpose: "상담 요청".to_string(),
                grade: "3".to_string(),
                class_num: Some("2".to_string()),
                name: "김철수".to_string(),
                teacher: "김선옥 선생님".to_string(),
            },
            timestamp,
        )
    }

    #[test]
    fn test_insert_and_find() {
        let db = Database::open_in_memory().unwrap();
        insert(&db, &visit("a", 10)).unwrap();

        let found = find_by_id(&db, &VisitId::new("a")).unwrap().unwrap();
        assert_eq!(found, visit("a", 10));
        assert!(find_by_id(&db, &VisitId::new("missing")).unwrap().is_none());
    }

    #[test]
    fn test_update_status() {
        let db = Database::open_in_memory().unwrap();
        insert(&db, &visit("a", 10)).unwrap();

        assert!(update_status(&db, &VisitId::new("a"), VisitStatus::Approved).unwrap());
        assert!(!update_status(&db, &VisitId::new("b"), VisitStatus::Approved).unwrap());

        let found = find_by_id(&db, &VisitId::new("a")).unwrap().unwrap();
        assert_eq!(found.status, VisitStatus::Approved);
    }

    #[test]
    fn test_list_active_ordered_by_timestamp() {
        let db = Database::open_in_memory().unwrap();
        insert(&db, &visit("late", 300)).unwrap();
        insert(&db, &visit("early", 100)).unwrap();
        insert(&db, &visit("mid", 200)).unwrap();

        let ids: Vec<String> = list_active(&db)
            .unwrap()
            .into_iter()
            .map(|v| v.id.to_string())
            .collect();
        assert_eq!(ids, vec!["early", "mid", "late"]);
    }

    #[test]
    fn test_list_active_skips_done_but_keeps_history() {
        let db = Database::open_in_memory().unwrap();
        insert(&db, &visit("kept", 100)).unwrap();
        insert(&db, &visit("finished", 200)).unwrap();
        update_status(&db, &VisitId::new("finished"), VisitStatus::Done).unwrap();

        let active = list_active(&db).unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, VisitId::new("kept"));

        let finished = find_by_id(&db, &VisitId::new("finished")).unwrap().unwrap();
        assert_eq!(finished.status, VisitStatus::Done);
        assert_eq!(latest_timestamp(&db).unwrap(), 200);
    }

    #[test]
    fn test_latest_timestamp_empty() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(latest_timestamp(&db).unwrap(), 0);
    }

    #[test]
    fn test_corrupt_status_is_reported() {
        let db = Database::open_in_memory().unwrap();
        insert(&db, &visit("a", 10)).unwrap();
        db.with_conn(|conn| {
            conn.execute("UPDATE visits SET status = '대기중' WHERE id = 'a'", [])?;
            Ok(())
        })
        .unwrap();

        let err = find_by_id(&db, &VisitId::new("a")).unwrap_err();
        assert!(matches!(err, DatabaseError::CorruptRow { .. }));
    }
}
