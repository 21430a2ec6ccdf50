//! In-memory record store with JSONL persistence.

use chrono::NaiveDate;
use tokio::sync::RwLock;
use tracing::info;

use super::{EntityType, JsonlReader, JsonlWriter, StorageConfig, StorageError};
use crate::models::{RecordId, SleepRecord, User, UserId};

/// Owner-scoped store for accounts and sleep records.
///
/// The full data set is held in memory behind a `RwLock` and flushed to
/// JSONL after every mutation; ownership checks on record access are the
/// store's only concurrency-relevant guarantee.
pub struct RecordStore {
    config: StorageConfig,
    users: RwLock<Vec<User>>,
    records: RwLock<Vec<SleepRecord>>,
}

impl RecordStore {
    /// Open the store, loading any existing JSONL files.
    pub fn open(config: StorageConfig) -> Result<Self, StorageError> {
        let users = JsonlReader::<User>::for_entity(&config, EntityType::User).read_all()?;
        let records =
            JsonlReader::<SleepRecord>::for_entity(&config, EntityType::SleepRecord).read_all()?;

        info!(
            "Opened record store: {} users, {} sleep records",
            users.len(),
            records.len()
        );

        Ok(Self {
            config,
            users: RwLock::new(users),
            records: RwLock::new(records),
        })
    }

    // ── Users ──

    /// Create an account. Fails if the email is already registered
    /// (compared case-insensitively).
    pub async fn create_user(&self, user: User) -> Result<User, StorageError> {
        let mut users = self.users.write().await;

        if users
            .iter()
            .any(|u| u.email.eq_ignore_ascii_case(&user.email))
        {
            return Err(StorageError::DuplicateEmail(user.email));
        }

        users.push(user.clone());
        self.persist_users(&users)?;
        Ok(user)
    }

    pub async fn user_by_email(&self, email: &str) -> Option<User> {
        self.users
            .read()
            .await
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned()
    }

    pub async fn user_by_id(&self, id: UserId) -> Option<User> {
        self.users.read().await.iter().find(|u| u.id == id).cloned()
    }

    /// Delete an account and every record it owns (cascade). Returns
    /// false if the account did not exist.
    pub async fn delete_user(&self, id: UserId) -> Result<bool, StorageError> {
        let mut users = self.users.write().await;
        let mut records = self.records.write().await;

        let before = users.len();
        users.retain(|u| u.id != id);
        if users.len() == before {
            return Ok(false);
        }

        records.retain(|r| r.owner_id != id);
        self.persist_users(&users)?;
        self.persist_records(&records)?;
        Ok(true)
    }

    // ── Sleep records ──

    /// Insert a new record.
    pub async fn insert_record(&self, record: SleepRecord) -> Result<SleepRecord, StorageError> {
        let mut records = self.records.write().await;
        records.push(record.clone());
        self.persist_records(&records)?;
        Ok(record)
    }

    /// All records for one owner, optionally restricted to an inclusive
    /// date range, sorted by sleep date then creation time, newest first.
    pub async fn records_for_owner(
        &self,
        owner_id: UserId,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Vec<SleepRecord> {
        let records = self.records.read().await;

        let mut matched: Vec<SleepRecord> = records
            .iter()
            .filter(|r| r.owner_id == owner_id)
            .filter(|r| from.map_or(true, |d| r.sleep_date >= d))
            .filter(|r| to.map_or(true, |d| r.sleep_date <= d))
            .cloned()
            .collect();

        matched.sort_by(|a, b| {
            b.sleep_date
                .cmp(&a.sleep_date)
                .then(b.created_at.cmp(&a.created_at))
        });
        matched
    }

    /// Fetch a single record, owner-checked.
    pub async fn record_for_owner(&self, owner_id: UserId, id: RecordId) -> Option<SleepRecord> {
        self.records
            .read()
            .await
            .iter()
            .find(|r| r.id == id && r.owner_id == owner_id)
            .cloned()
    }

    /// Replace an existing record with an edited copy, owner-checked.
    /// Returns `None` when no record matches (absent or foreign-owned).
    pub async fn replace_record(
        &self,
        owner_id: UserId,
        updated: SleepRecord,
    ) -> Result<Option<SleepRecord>, StorageError> {
        let mut records = self.records.write().await;

        let Some(slot) = records
            .iter_mut()
            .find(|r| r.id == updated.id && r.owner_id == owner_id)
        else {
            return Ok(None);
        };

        *slot = updated.clone();
        self.persist_records(&records)?;
        Ok(Some(updated))
    }

    /// Delete a record, owner-checked. Returns false when no record
    /// matches.
    pub async fn delete_record(&self, owner_id: UserId, id: RecordId) -> Result<bool, StorageError> {
        let mut records = self.records.write().await;

        let before = records.len();
        records.retain(|r| !(r.id == id && r.owner_id == owner_id));
        if records.len() == before {
            return Ok(false);
        }

        self.persist_records(&records)?;
        Ok(true)
    }

    fn persist_users(&self, users: &[User]) -> Result<(), StorageError> {
        JsonlWriter::for_entity(&self.config, EntityType::User).write_all(users)?;
        Ok(())
    }

    fn persist_records(&self, records: &[SleepRecord]) -> Result<(), StorageError> {
        JsonlWriter::for_entity(&self.config, EntityType::SleepRecord).write_all(records)?;
        Ok(())
    }
}
