//! In-memory [`MediaStore`] and [`UserStore`] for tests.
//!
//! They follow the Postgres repositories' semantics (owner scoping, rank assignment,
//! ordering with id tiebreak, all-or-nothing batches) without needing a database.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::cmp::Ordering as CmpOrdering;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;
use vitrine_core::models::{ListScope, MediaRecord, NewMediaRecord, OrderKey, PageRequest};
use vitrine_core::{AppError, User};

use super::media::{rank_for_position, MediaStore};
use super::user::UserStore;

fn simulated_outage() -> AppError {
    AppError::Database(sqlx::Error::PoolTimedOut)
}

#[derive(Default)]
struct MediaTable {
    next_id: i64,
    last_timestamp: Option<DateTime<Utc>>,
    rows: BTreeMap<i64, MediaRecord>,
}

impl MediaTable {
    /// Strictly increasing timestamps keep created_at ordering deterministic.
    fn tick(&mut self) -> DateTime<Utc> {
        let mut now = Utc::now();
        if let Some(last) = self.last_timestamp {
            if now <= last {
                now = last + Duration::microseconds(1);
            }
        }
        self.last_timestamp = Some(now);
        now
    }
}

#[derive(Default)]
pub struct InMemoryMediaStore {
    table: Mutex<MediaTable>,
    fail_writes: AtomicBool,
}

impl InMemoryMediaStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every mutating call fail with a database error until reset.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub async fn len(&self) -> usize {
        self.table.lock().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Every stored record, in id order.
    pub async fn all(&self) -> Vec<MediaRecord> {
        self.table.lock().await.rows.values().cloned().collect()
    }

    fn check_writable(&self) -> Result<(), AppError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            Err(simulated_outage())
        } else {
            Ok(())
        }
    }
}

fn compare(order: OrderKey, a: &MediaRecord, b: &MediaRecord) -> CmpOrdering {
    match order {
        OrderKey::SortRank => a.sort_rank.cmp(&b.sort_rank).then(a.id.cmp(&b.id)),
        OrderKey::CreatedAtDesc => b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)),
        OrderKey::CreatedAtAsc => a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)),
        OrderKey::FilenameAsc => a
            .original_name
            .cmp(&b.original_name)
            .then(a.id.cmp(&b.id)),
        OrderKey::FilenameDesc => b
            .original_name
            .cmp(&a.original_name)
            .then(b.id.cmp(&a.id)),
        OrderKey::SizeAsc => a.size_bytes.cmp(&b.size_bytes).then(a.id.cmp(&b.id)),
        OrderKey::SizeDesc => b.size_bytes.cmp(&a.size_bytes).then(b.id.cmp(&a.id)),
    }
}

#[async_trait]
impl MediaStore for InMemoryMediaStore {
    async fn create(&self, record: NewMediaRecord) -> Result<MediaRecord, AppError> {
        self.check_writable()?;
        let mut table = self.table.lock().await;

        if table
            .rows
            .values()
            .any(|r| r.relative_path == record.file.relative_path)
        {
            return Err(AppError::Conflict(format!(
                "relative_path {} already in use",
                record.file.relative_path
            )));
        }

        let next_rank = table
            .rows
            .values()
            .filter(|r| r.owner_id == record.owner_id)
            .map(|r| r.sort_rank)
            .max()
            .unwrap_or(0)
            + 1;
        table.next_id += 1;
        let now = table.tick();
        let file = record.file;
        let row = MediaRecord {
            id: table.next_id,
            owner_id: record.owner_id,
            stored_name: file.stored_name,
            original_name: file.original_name,
            relative_path: file.relative_path,
            size_bytes: file.size_bytes,
            content_type: file.content_type,
            kind: file.kind,
            sort_rank: next_rank,
            created_at: now,
            updated_at: now,
        };
        table.rows.insert(row.id, row.clone());
        Ok(row)
    }

    async fn get_by_id(&self, id: i64, owner_id: i64) -> Result<Option<MediaRecord>, AppError> {
        let table = self.table.lock().await;
        Ok(table
            .rows
            .get(&id)
            .filter(|r| r.owner_id == owner_id)
            .cloned())
    }

    async fn get_public_by_path(
        &self,
        relative_path: &str,
    ) -> Result<Option<MediaRecord>, AppError> {
        let table = self.table.lock().await;
        Ok(table
            .rows
            .values()
            .find(|r| r.relative_path == relative_path)
            .cloned())
    }

    async fn list(
        &self,
        scope: ListScope,
        request: &PageRequest,
    ) -> Result<(Vec<MediaRecord>, i64), AppError> {
        let table = self.table.lock().await;
        let mut matching: Vec<MediaRecord> = table
            .rows
            .values()
            .filter(|r| match scope {
                ListScope::Owner(owner_id) => r.owner_id == owner_id,
                ListScope::Public => true,
            })
            .filter(|r| request.kind.map_or(true, |kind| r.kind == kind))
            .cloned()
            .collect();
        matching.sort_by(|a, b| compare(request.order, a, b));

        let total = matching.len() as i64;
        let page = matching
            .into_iter()
            .skip(request.offset() as usize)
            .take(request.limit() as usize)
            .collect();
        Ok((page, total))
    }

    async fn update_rank(&self, record: &MediaRecord) -> Result<Option<MediaRecord>, AppError> {
        self.check_writable()?;
        let mut table = self.table.lock().await;
        let now = table.tick();
        Ok(table
            .rows
            .get_mut(&record.id)
            .filter(|r| r.owner_id == record.owner_id)
            .map(|row| {
                row.sort_rank = record.sort_rank;
                row.updated_at = now;
                row.clone()
            }))
    }

    async fn replace(&self, record: &MediaRecord) -> Result<Option<MediaRecord>, AppError> {
        self.check_writable()?;
        let mut table = self.table.lock().await;
        let now = table.tick();
        Ok(table
            .rows
            .get_mut(&record.id)
            .filter(|r| r.owner_id == record.owner_id)
            .map(|row| {
                let updated = row.clone().with_file(record.file());
                *row = MediaRecord {
                    updated_at: now,
                    ..updated
                };
                row.clone()
            }))
    }

    async fn delete(&self, id: i64, owner_id: i64) -> Result<bool, AppError> {
        self.check_writable()?;
        let mut table = self.table.lock().await;
        let owned = table.rows.get(&id).is_some_and(|r| r.owner_id == owner_id);
        if owned {
            table.rows.remove(&id);
        }
        Ok(owned)
    }

    async fn set_ranks_batch(&self, owner_id: i64, ordered_ids: &[i64]) -> Result<u64, AppError> {
        self.check_writable()?;
        let mut table = self.table.lock().await;

        // Validate every rank before touching any row.
        let ranks = ordered_ids
            .iter()
            .enumerate()
            .map(|(position, id)| rank_for_position(position).map(|rank| (*id, rank)))
            .collect::<Result<Vec<_>, _>>()?;

        let now = table.tick();
        let mut updated = 0u64;
        for (id, rank) in ranks {
            if let Some(row) = table.rows.get_mut(&id).filter(|r| r.owner_id == owner_id) {
                row.sort_rank = rank;
                row.updated_at = now;
                updated += 1;
            }
        }
        Ok(updated)
    }

    async fn ping(&self) -> Result<(), AppError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(simulated_outage());
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryUserStore {
    users: Mutex<Vec<User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an account with an argon2-hashed password.
    pub async fn insert_user(&self, username: &str, password: &str) -> Result<User, AppError> {
        let hash = vitrine_core::password::hash_password(password)?;
        self.create(username, &hash).await
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn create(&self, username: &str, password_hash: &str) -> Result<User, AppError> {
        let mut users = self.users.lock().await;
        if users.iter().any(|u| u.username == username) {
            return Err(AppError::Conflict(format!(
                "Username '{}' is already taken",
                username
            )));
        }
        let now = Utc::now();
        let user = User {
            id: users.len() as i64 + 1,
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            created_at: now,
            updated_at: now,
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let users = self.users.lock().await;
        Ok(users.iter().find(|u| u.username == username).cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        let users = self.users.lock().await;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }
}
