//! Transactional vote store.
//!
//! Battles and ballots are stored as serialized records in two key-value
//! shaped tables. Every multi-step operation runs inside a single sqlx
//! transaction: the handle commits explicitly and rolls back when dropped,
//! so no partial update is ever visible to concurrent readers.

use std::path::Path;

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{error, info};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::reconcile::reconcile_battle;
use crate::types::{score_is_valid, Battle, ScannedBattle, Votes};

/// Persistent store for battles and per-voter ballots.
#[derive(Clone)]
pub struct Store {
    pool: SqlitePool,
}

/// Outcome of a batch reconciliation: which battles were updated and which
/// failed, so one corrupt record cannot hide the rest of the scan.
#[derive(Debug, Default)]
pub struct ReconcileSummary {
    pub updated: Vec<String>,
    pub failed: Vec<(String, Error)>,
}

impl ReconcileSummary {
    pub fn all_failed(&self) -> bool {
        self.updated.is_empty() && !self.failed.is_empty()
    }
}

impl Store {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open (creating if needed) the database at `db_path`.
    pub async fn open(db_path: &Path) -> Result<Self> {
        let pool = super::init::init_database(db_path).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Read one battle. Absence is `Error::BattleNotFound`.
    pub async fn get_battle(&self, name: &str) -> Result<Battle> {
        let data: Option<String> = sqlx::query_scalar("SELECT data FROM battles WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

        match data {
            Some(data) => Ok(serde_json::from_str(&data)?),
            None => Err(Error::BattleNotFound(name.to_string())),
        }
    }

    /// Read every stored battle, ordered by name.
    ///
    /// A single corrupt record aborts the whole read.
    pub async fn get_all_battles(&self) -> Result<Vec<Battle>> {
        let rows: Vec<String> = sqlx::query_scalar("SELECT data FROM battles ORDER BY name")
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(|data| serde_json::from_str(data).map_err(Error::from))
            .collect()
    }

    /// Reconcile one scanned battle against its persisted record and write
    /// the result back, all inside one transaction.
    pub async fn update_battle(&self, scanned: &ScannedBattle) -> Result<Battle> {
        let mut tx = self.pool.begin().await?;

        let previous = fetch_battle(&mut tx, &scanned.name).await?;
        let battle = reconcile_battle(scanned, previous.as_ref(), Utc::now());

        info!(battle = %battle.name, entries = battle.entries.len(), "storing battle");
        put_battle(&mut tx, &battle).await?;

        tx.commit().await?;
        Ok(battle)
    }

    /// Reconcile every scanned battle, collecting per-battle failures
    /// instead of aborting on the first one.
    pub async fn reconcile_all(&self, scanned: &[ScannedBattle]) -> ReconcileSummary {
        let mut summary = ReconcileSummary::default();
        for battle in scanned {
            match self.update_battle(battle).await {
                Ok(_) => summary.updated.push(battle.name.clone()),
                Err(err) => {
                    error!(battle = %battle.name, %err, "could not update battle");
                    summary.failed.push((battle.name.clone(), err));
                }
            }
        }
        summary
    }

    /// Reopen voting.
    pub async fn open_battle(&self, name: &str) -> Result<()> {
        self.modify_battle(name, |battle| battle.closed_at = None).await
    }

    /// Close voting, stamping the close time.
    pub async fn close_battle(&self, name: &str) -> Result<()> {
        self.modify_battle(name, |battle| battle.closed_at = Some(Utc::now()))
            .await
    }

    pub async fn hide_battle(&self, name: &str) -> Result<()> {
        self.modify_battle(name, |battle| battle.hidden = true).await
    }

    pub async fn unhide_battle(&self, name: &str) -> Result<()> {
        self.modify_battle(name, |battle| battle.hidden = false).await
    }

    /// Read-modify-write of one battle record in a single transaction.
    async fn modify_battle<F>(&self, name: &str, apply: F) -> Result<()>
    where
        F: FnOnce(&mut Battle),
    {
        let mut tx = self.pool.begin().await?;

        let mut battle = fetch_battle(&mut tx, name)
            .await?
            .ok_or_else(|| Error::BattleNotFound(name.to_string()))?;
        apply(&mut battle);
        put_battle(&mut tx, &battle).await?;

        tx.commit().await?;
        Ok(())
    }

    /// Read one voter's ballot. Absence is `Error::VotesNotFound`.
    pub async fn get_votes(&self, battle_name: &str, voter_id: &str) -> Result<Votes> {
        let data: Option<String> =
            sqlx::query_scalar("SELECT data FROM votes WHERE battle_name = ? AND voter_id = ?")
                .bind(battle_name)
                .bind(voter_id)
                .fetch_optional(&self.pool)
                .await?;

        match data {
            Some(data) => Ok(serde_json::from_str(&data)?),
            None => Err(Error::VotesNotFound {
                battle: battle_name.to_string(),
                voter_id: voter_id.to_string(),
            }),
        }
    }

    /// Read every ballot recorded for a battle.
    pub async fn get_all_votes(&self, battle_name: &str) -> Result<Vec<Votes>> {
        let rows: Vec<String> =
            sqlx::query_scalar("SELECT data FROM votes WHERE battle_name = ? ORDER BY voter_id")
                .bind(battle_name)
                .fetch_all(&self.pool)
                .await?;

        rows.iter()
            .map(|data| serde_json::from_str(data).map_err(Error::from))
            .collect()
    }

    /// Record one score on a voter's ballot.
    ///
    /// The score range is validated before anything is touched. The battle
    /// read, entry-existence check and ballot write share one transaction,
    /// so a vote can never be recorded for an entry a concurrent
    /// reconciliation just removed.
    pub async fn update_vote(
        &self,
        battle_name: &str,
        entry_id: Uuid,
        voter_id: &str,
        score: i64,
    ) -> Result<()> {
        if !score_is_valid(score) {
            return Err(Error::InvalidScore(score));
        }

        let mut tx = self.pool.begin().await?;

        let battle = fetch_battle(&mut tx, battle_name)
            .await?
            .ok_or_else(|| Error::BattleNotFound(battle_name.to_string()))?;
        if battle.entry_by_id(entry_id).is_none() {
            return Err(Error::EntryNotFound(entry_id));
        }

        let now = Utc::now();
        let mut votes = fetch_votes(&mut tx, battle_name, voter_id)
            .await?
            .unwrap_or_else(|| Votes::new(battle_name, voter_id, now));
        votes.update_score(entry_id, score, now);
        put_votes(&mut tx, &votes).await?;

        tx.commit().await?;
        Ok(())
    }

    /// Withdraw a voter's ballot entirely. Idempotent.
    pub async fn remove_votes(&self, battle_name: &str, voter_id: &str) -> Result<()> {
        sqlx::query("DELETE FROM votes WHERE battle_name = ? AND voter_id = ?")
            .bind(battle_name)
            .bind(voter_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

async fn fetch_battle(conn: &mut SqliteConnection, name: &str) -> Result<Option<Battle>> {
    let data: Option<String> = sqlx::query_scalar("SELECT data FROM battles WHERE name = ?")
        .bind(name)
        .fetch_optional(&mut *conn)
        .await?;

    data.map(|d| serde_json::from_str(&d).map_err(Error::from))
        .transpose()
}

async fn put_battle(conn: &mut SqliteConnection, battle: &Battle) -> Result<()> {
    let data = serde_json::to_string(battle)?;
    sqlx::query(
        r#"
        INSERT INTO battles (name, data) VALUES (?, ?)
        ON CONFLICT(name) DO UPDATE SET data = excluded.data
        "#,
    )
    .bind(&battle.name)
    .bind(data)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

async fn fetch_votes(
    conn: &mut SqliteConnection,
    battle_name: &str,
    voter_id: &str,
) -> Result<Option<Votes>> {
    let data: Option<String> =
        sqlx::query_scalar("SELECT data FROM votes WHERE battle_name = ? AND voter_id = ?")
            .bind(battle_name)
            .bind(voter_id)
            .fetch_optional(&mut *conn)
            .await?;

    data.map(|d| serde_json::from_str(&d).map_err(Error::from))
        .transpose()
}

async fn put_votes(conn: &mut SqliteConnection, votes: &Votes) -> Result<()> {
    let data = serde_json::to_string(votes)?;
    sqlx::query(
        r#"
        INSERT INTO votes (battle_name, voter_id, data) VALUES (?, ?, ?)
        ON CONFLICT(battle_name, voter_id) DO UPDATE SET data = excluded.data
        "#,
    )
    .bind(&votes.battle_name)
    .bind(&votes.voter_id)
    .bind(data)
    .execute(&mut *conn)
    .await?;

    Ok(())
}
