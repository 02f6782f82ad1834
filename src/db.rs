use chrono::Utc;
use rusqlite::{params, Connection, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::error::StoreError;
use crate::models::ProfileAggregate;

// Key the profile blob is stored under
pub const STORAGE_KEY: &str = "empower-journey";
pub const SCHEMA_VERSION: u32 = 1;

// Persistence port used by the coordinator
pub trait ProfileStore {
    fn load(&self) -> std::result::Result<Option<ProfileAggregate>, StoreError>;
    fn save(&self, profile: &ProfileAggregate) -> std::result::Result<(), StoreError>;
    fn clear(&self) -> std::result::Result<(), StoreError>;
}

#[derive(Serialize)]
struct Envelope<'a> {
    version: u32,
    profile: &'a ProfileAggregate,
}

#[derive(Deserialize)]
struct StoredEnvelope {
    #[serde(default)]
    version: u32,
    profile: serde_json::Value,
}

pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        Ok(Self { conn })
    }

    pub fn init(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS app_state (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT (datetime('now'))
            );
            "#,
        )?;
        Ok(())
    }

    fn read_blob(&self) -> Result<Option<String>> {
        let value = self.conn.query_row(
            "SELECT value FROM app_state WHERE key = ?1",
            params![STORAGE_KEY],
            |row| row.get(0),
        );

        match value {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

impl ProfileStore for Database {
    fn load(&self) -> std::result::Result<Option<ProfileAggregate>, StoreError> {
        let Some(blob) = self.read_blob()? else {
            debug!(key = STORAGE_KEY, "no stored profile");
            return Ok(None);
        };

        let stored: StoredEnvelope = serde_json::from_str(&blob)?;
        if stored.version != SCHEMA_VERSION {
            return Err(StoreError::UnsupportedVersion {
                found: stored.version,
                expected: SCHEMA_VERSION,
            });
        }

        let profile: ProfileAggregate = serde_json::from_value(stored.profile)?;
        debug!(
            user = %profile.user.id,
            records = profile.progress.len(),
            "loaded profile"
        );
        Ok(Some(profile))
    }

    // Whole blob is replaced in one statement inside a transaction
    fn save(&self, profile: &ProfileAggregate) -> std::result::Result<(), StoreError> {
        let blob = serde_json::to_string(&Envelope {
            version: SCHEMA_VERSION,
            profile,
        })?;

        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            r#"
            INSERT INTO app_state (key, value, updated_at) VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            "#,
            params![STORAGE_KEY, blob, Utc::now().to_rfc3339()],
        )?;
        tx.commit()?;

        debug!(bytes = blob.len(), "saved profile");
        Ok(())
    }

    fn clear(&self) -> std::result::Result<(), StoreError> {
        self.conn.execute(
            "DELETE FROM app_state WHERE key = ?1",
            params![STORAGE_KEY],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::badges::initial_badges;
    use crate::models::{CompletionRecord, Language, UserProfile};
    use chrono::TimeZone;

    fn setup_db() -> Database {
        let db = Database::open(":memory:").expect("Failed to create in-memory database");
        db.init().expect("Failed to initialize database");
        db
    }

    fn make_profile() -> ProfileAggregate {
        let joined = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
        ProfileAggregate {
            user: UserProfile {
                id: "k3j9x0a1b".to_string(),
                name: "Grace".to_string(),
                email: "grace@example.com".to_string(),
                join_date: joined,
                language: Language::Es,
            },
            progress: vec![CompletionRecord::new("online-safety", 50, joined)],
            badges: initial_badges(joined),
            tutor_questions: 4,
        }
    }

    fn updated_at(db: &Database) -> Option<String> {
        db.conn
            .query_row(
                "SELECT updated_at FROM app_state WHERE key = ?1",
                params![STORAGE_KEY],
                |row| row.get(0),
            )
            .ok()
    }

    fn row_count(db: &Database) -> i64 {
        db.conn
            .query_row("SELECT COUNT(*) FROM app_state", [], |row| row.get(0))
            .unwrap()
    }

    mod init_tests {
        use super::*;

        #[test]
        fn init_creates_table() {
            let db = setup_db();
            assert_eq!(row_count(&db), 0);
        }

        #[test]
        fn init_is_idempotent() {
            let db = setup_db();
            db.save(&make_profile()).unwrap();

            db.init().expect("Re-init should succeed");

            assert!(db.load().unwrap().is_some());
        }
    }

    mod profile_tests {
        use super::*;

        #[test]
        fn load_empty_returns_none() {
            let db = setup_db();
            assert!(db.load().unwrap().is_none());
            assert!(updated_at(&db).is_none());
        }

        #[test]
        fn save_then_load() {
            let db = setup_db();
            let profile = make_profile();
            db.save(&profile).unwrap();
            assert_eq!(db.load().unwrap(), Some(profile));
            assert!(updated_at(&db).is_some());
        }

        #[test]
        fn save_replaces_single_row() {
            let db = setup_db();
            let mut profile = make_profile();
            db.save(&profile).unwrap();
            profile.tutor_questions = 9;
            db.save(&profile).unwrap();

            assert_eq!(row_count(&db), 1);
            assert_eq!(db.load().unwrap().unwrap().tutor_questions, 9);
        }

        #[test]
        fn blob_carries_version_tag() {
            let db = setup_db();
            db.save(&make_profile()).unwrap();
            let blob = db.read_blob().unwrap().unwrap();
            let value: serde_json::Value = serde_json::from_str(&blob).unwrap();
            assert_eq!(value["version"], 1);
            assert_eq!(value["profile"]["user"]["name"], "Grace");
        }

        #[test]
        fn unknown_version_is_rejected() {
            let db = setup_db();
            db.conn
                .execute(
                    "INSERT INTO app_state (key, value) VALUES (?1, ?2)",
                    params![STORAGE_KEY, r#"{"version": 2, "profile": {}}"#],
                )
                .unwrap();
            let err = db.load().unwrap_err();
            assert!(matches!(
                err,
                StoreError::UnsupportedVersion {
                    found: 2,
                    expected: 1
                }
            ));
        }

        #[test]
        fn unversioned_blob_is_rejected() {
            let db = setup_db();
            db.conn
                .execute(
                    "INSERT INTO app_state (key, value) VALUES (?1, ?2)",
                    params![STORAGE_KEY, r#"{"profile": {"user": null}}"#],
                )
                .unwrap();
            assert!(matches!(
                db.load(),
                Err(StoreError::UnsupportedVersion { found: 0, .. })
            ));
        }

        #[test]
        fn corrupt_blob_is_json_error() {
            let db = setup_db();
            db.conn
                .execute(
                    "INSERT INTO app_state (key, value) VALUES (?1, ?2)",
                    params![STORAGE_KEY, "not json"],
                )
                .unwrap();
            assert!(matches!(db.load(), Err(StoreError::Json(_))));
        }

        #[test]
        fn clear_removes_profile() {
            let db = setup_db();
            db.save(&make_profile()).unwrap();
            db.clear().unwrap();
            assert!(db.load().unwrap().is_none());
        }

        #[test]
        fn save_without_table_fails() {
            let db = Database::open(":memory:").unwrap();
            assert!(matches!(
                db.save(&make_profile()),
                Err(StoreError::Sqlite(_))
            ));
        }
    }

    mod file_tests {
        use super::*;
        use tempfile::TempDir;

        #[test]
        fn profile_survives_reopen() {
            let dir = TempDir::new().unwrap();
            let path = dir.path().join("empower.db");

            {
                let db = Database::open(&path).unwrap();
                db.init().unwrap();
                db.save(&make_profile()).unwrap();
            }

            let db = Database::open(&path).unwrap();
            db.init().unwrap();
            let loaded = db.load().unwrap().expect("profile should persist");
            assert_eq!(loaded.user.email, "grace@example.com");
            assert_eq!(loaded.progress.len(), 1);
        }
    }
}
