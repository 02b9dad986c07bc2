use crate::domain::history::{DailyAnalytics, HistoryError, HistoryRecord, NewHistoryEntry};
use crate::infrastructure::db::{check_connection, DbPool};
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use uuid::Uuid;

/// Append-only, user-scoped store of synthesis history
#[async_trait]
pub trait HistoryRepository: Send + Sync {
    /// Insert one row. Rows are never updated afterwards.
    async fn insert(&self, entry: &NewHistoryEntry) -> Result<HistoryRecord, HistoryError>;

    /// Most recent rows for `user_id`, newest first
    async fn list_by_user(&self, user_id: &str, limit: i64)
        -> Result<Vec<HistoryRecord>, HistoryError>;

    /// Per-day aggregates over all users for the `days` most recent days
    /// with activity, newest first
    async fn daily_analytics(&self, days: i64) -> Result<Vec<DailyAnalytics>, HistoryError>;

    /// Verify the store is reachable
    async fn ping(&self) -> Result<(), HistoryError>;
}

/// PostgreSQL-backed history (`tts_requests` table)
pub struct PgHistoryRepository {
    pool: Arc<DbPool>,
}

impl PgHistoryRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HistoryRepository for PgHistoryRepository {
    async fn insert(&self, entry: &NewHistoryEntry) -> Result<HistoryRecord, HistoryError> {
        let pool = self.pool.as_ref();
        let record = sqlx::query_as::<_, HistoryRecord>(
            r#"
            INSERT INTO tts_requests
                (id, user_id, text, voice, speed, character_count, audio_url, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, user_id, text, voice, speed, character_count, audio_url, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&entry.user_id)
        .bind(&entry.text)
        .bind(&entry.voice)
        .bind(entry.speed)
        .bind(entry.character_count)
        .bind(&entry.audio_url)
        .bind(Utc::now())
        .fetch_one(pool)
        .await?;

        Ok(record)
    }

    async fn list_by_user(
        &self,
        user_id: &str,
        limit: i64,
    ) -> Result<Vec<HistoryRecord>, HistoryError> {
        let pool = self.pool.as_ref();
        let records = sqlx::query_as::<_, HistoryRecord>(
            r#"
            SELECT id, user_id, text, voice, speed, character_count, audio_url, created_at
            FROM tts_requests
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    async fn daily_analytics(&self, days: i64) -> Result<Vec<DailyAnalytics>, HistoryError> {
        let pool = self.pool.as_ref();
        let rows = sqlx::query_as::<_, DailyAnalytics>(
            r#"
            SELECT (created_at AT TIME ZONE 'UTC')::date AS date,
                   COUNT(*) AS total_requests,
                   COALESCE(SUM(character_count), 0)::BIGINT AS total_characters,
                   COUNT(DISTINCT user_id) AS unique_users,
                   MODE() WITHIN GROUP (ORDER BY voice) AS popular_voice,
                   AVG(character_count)::DOUBLE PRECISION AS avg_text_length
            FROM tts_requests
            GROUP BY 1
            ORDER BY 1 DESC
            LIMIT $1
            "#,
        )
        .bind(days)
        .fetch_all(pool)
        .await?;

        Ok(rows)
    }

    async fn ping(&self) -> Result<(), HistoryError> {
        check_connection(&self.pool).await?;
        Ok(())
    }
}

/// In-process history, used when no database is configured.
/// Contents are lost on restart.
#[derive(Default)]
pub struct MemoryHistoryRepository {
    records: RwLock<Vec<HistoryRecord>>,
}

impl MemoryHistoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

#[async_trait]
impl HistoryRepository for MemoryHistoryRepository {
    async fn insert(&self, entry: &NewHistoryEntry) -> Result<HistoryRecord, HistoryError> {
        let record = entry.clone().into_record(Uuid::new_v4(), Utc::now());
        self.records.write().push(record.clone());
        Ok(record)
    }

    async fn list_by_user(
        &self,
        user_id: &str,
        limit: i64,
    ) -> Result<Vec<HistoryRecord>, HistoryError> {
        let limit = usize::try_from(limit.max(0)).unwrap_or(usize::MAX);
        // Insertion order breaks timestamp ties: later inserts come first.
        let mut records: Vec<HistoryRecord> = self
            .records
            .read()
            .iter()
            .rev()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        records.truncate(limit);
        Ok(records)
    }

    async fn daily_analytics(&self, days: i64) -> Result<Vec<DailyAnalytics>, HistoryError> {
        let days = usize::try_from(days.max(0)).unwrap_or(usize::MAX);

        let mut by_date: BTreeMap<NaiveDate, Vec<HistoryRecord>> = BTreeMap::new();
        for record in self.records.read().iter() {
            by_date
                .entry(record.created_at.date_naive())
                .or_default()
                .push(record.clone());
        }

        Ok(by_date
            .into_iter()
            .rev()
            .take(days)
            .map(|(date, records)| summarize_day(date, &records))
            .collect())
    }

    async fn ping(&self) -> Result<(), HistoryError> {
        Ok(())
    }
}

fn summarize_day(date: NaiveDate, records: &[HistoryRecord]) -> DailyAnalytics {
    let total_requests = records.len() as i64;
    let total_characters: i64 = records.iter().map(|r| i64::from(r.character_count)).sum();
    let unique_users = records
        .iter()
        .map(|r| r.user_id.as_str())
        .collect::<HashSet<_>>()
        .len() as i64;

    let mut voice_counts: HashMap<&str, usize> = HashMap::new();
    for record in records {
        *voice_counts.entry(record.voice.as_str()).or_default() += 1;
    }
    let popular_voice = voice_counts
        .into_iter()
        .max_by(|(a, a_count), (b, b_count)| a_count.cmp(b_count).then_with(|| b.cmp(a)))
        .map(|(voice, _)| voice.to_string());

    DailyAnalytics {
        date,
        total_requests,
        total_characters,
        unique_users,
        popular_voice,
        avg_text_length: total_characters as f64 / total_requests.max(1) as f64,
    }
}
