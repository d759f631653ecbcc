//! Activity repository for per-channel word counts.

use super::DbError;
use herald_platform::{ChannelId, GuildId, UserId};
use sqlx::SqlitePool;

/// A user's aggregated word count inside one guild.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserActivity {
    pub user_id: u64,
    pub words: i64,
}

/// Repository for activity operations.
pub struct ActivityRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ActivityRepository<'a> {
    /// Create a new activity repository.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Record the word count of one message.
    pub async fn record(
        &self,
        guild: GuildId,
        channel: ChannelId,
        user: UserId,
        words: i64,
        sent_at: i64,
    ) -> Result<(), DbError> {
        sqlx::query(
            r#"
            INSERT INTO activity (guild_id, channel_id, user_id, words, sent_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(guild.get() as i64)
        .bind(channel.get() as i64)
        .bind(user.get() as i64)
        .bind(words)
        .bind(sent_at)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Total words a user has written in a guild.
    pub async fn user_total(&self, guild: GuildId, user: UserId) -> Result<i64, DbError> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(words), 0) FROM activity WHERE guild_id = ? AND user_id = ?",
        )
        .bind(guild.get() as i64)
        .bind(user.get() as i64)
        .fetch_one(self.pool)
        .await?;

        Ok(total)
    }

    /// A user's position on the guild leaderboard, 1 being the most active.
    ///
    /// Users with the same total share a position.
    pub async fn user_rank(&self, guild: GuildId, user: UserId) -> Result<i64, DbError> {
        let rank: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) + 1 FROM (
                SELECT user_id, SUM(words) AS total
                FROM activity
                WHERE guild_id = ?
                GROUP BY user_id
            )
            WHERE total > (
                SELECT COALESCE(SUM(words), 0)
                FROM activity
                WHERE guild_id = ? AND user_id = ?
            )
            "#,
        )
        .bind(guild.get() as i64)
        .bind(guild.get() as i64)
        .bind(user.get() as i64)
        .fetch_one(self.pool)
        .await?;

        Ok(rank)
    }

    /// The most active users of a guild, highest total first.
    pub async fn leaderboard(
        &self,
        guild: GuildId,
        limit: i64,
    ) -> Result<Vec<UserActivity>, DbError> {
        let rows = sqlx::query_as::<_, (i64, i64)>(
            r#"
            SELECT user_id, SUM(words) AS total
            FROM activity
            WHERE guild_id = ?
            GROUP BY user_id
            ORDER BY total DESC, user_id ASC
            LIMIT ?
            "#,
        )
        .bind(guild.get() as i64)
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(user_id, words)| UserActivity {
                user_id: user_id as u64,
                words,
            })
            .collect())
    }

    /// Delete activity rows older than the cutoff. Returns rows removed.
    pub async fn prune_before(&self, cutoff: i64) -> Result<u64, DbError> {
        let result = sqlx::query("DELETE FROM activity WHERE sent_at < ?")
            .bind(cutoff)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
