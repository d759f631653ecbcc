//! Entity repository for guilds, users, members, and channels.
//!
//! Every inbound message runs through find-or-create here, so the write
//! paths are idempotent and safe to race.

use super::DbError;
use herald_platform::{ChannelId, GuildId, UserId};
use sqlx::SqlitePool;

/// A guild and its per-guild settings.
///
/// `prefix` and `locale` are `None` until a guild overrides the
/// configured defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Guild {
    pub id: u64,
    pub prefix: Option<String>,
    pub locale: Option<String>,
    pub created_at: i64,
}

/// A known user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: u64,
    /// Whether this user participates in activity statistics.
    pub trackable: bool,
    pub created_at: i64,
}

/// Repository for entity operations.
pub struct EntityRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> EntityRepository<'a> {
    /// Create a new entity repository.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Fetch a guild, creating it on first sight.
    pub async fn ensure_guild(&self, id: GuildId) -> Result<Guild, DbError> {
        let now = chrono::Utc::now().timestamp();

        sqlx::query("INSERT OR IGNORE INTO guilds (id, created_at) VALUES (?, ?)")
            .bind(id.get() as i64)
            .bind(now)
            .execute(self.pool)
            .await?;

        let (gid, prefix, locale, created_at) =
            sqlx::query_as::<_, (i64, Option<String>, Option<String>, i64)>(
                "SELECT id, prefix, locale, created_at FROM guilds WHERE id = ?",
            )
            .bind(id.get() as i64)
            .fetch_one(self.pool)
            .await?;

        Ok(Guild {
            id: gid as u64,
            prefix,
            locale,
            created_at,
        })
    }

    /// Fetch a user, creating it on first sight.
    pub async fn ensure_user(&self, id: UserId) -> Result<User, DbError> {
        let now = chrono::Utc::now().timestamp();

        sqlx::query("INSERT OR IGNORE INTO users (id, created_at) VALUES (?, ?)")
            .bind(id.get() as i64)
            .bind(now)
            .execute(self.pool)
            .await?;

        let (uid, trackable, created_at) = sqlx::query_as::<_, (i64, bool, i64)>(
            "SELECT id, trackable, created_at FROM users WHERE id = ?",
        )
        .bind(id.get() as i64)
        .fetch_one(self.pool)
        .await?;

        Ok(User {
            id: uid as u64,
            trackable,
            created_at,
        })
    }

    /// Record a guild membership on first sight.
    ///
    /// The guild and user rows must already exist; the schema enforces it.
    pub async fn ensure_member(&self, guild: GuildId, user: UserId) -> Result<(), DbError> {
        let now = chrono::Utc::now().timestamp();

        sqlx::query(
            "INSERT OR IGNORE INTO members (guild_id, user_id, joined_at) VALUES (?, ?, ?)",
        )
        .bind(guild.get() as i64)
        .bind(user.get() as i64)
        .bind(now)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Record a channel on first sight.
    pub async fn ensure_channel(&self, channel: ChannelId, guild: GuildId) -> Result<(), DbError> {
        let now = chrono::Utc::now().timestamp();

        sqlx::query("INSERT OR IGNORE INTO channels (id, guild_id, created_at) VALUES (?, ?, ?)")
            .bind(channel.get() as i64)
            .bind(guild.get() as i64)
            .bind(now)
            .execute(self.pool)
            .await?;

        Ok(())
    }

    /// Override a guild's command prefix.
    pub async fn set_prefix(&self, guild: GuildId, prefix: &str) -> Result<(), DbError> {
        let result = sqlx::query("UPDATE guilds SET prefix = ? WHERE id = ?")
            .bind(prefix)
            .bind(guild.get() as i64)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::GuildNotFound(guild.get()));
        }
        Ok(())
    }

    /// Override a guild's locale.
    pub async fn set_locale(&self, guild: GuildId, locale: &str) -> Result<(), DbError> {
        let result = sqlx::query("UPDATE guilds SET locale = ? WHERE id = ?")
            .bind(locale)
            .bind(guild.get() as i64)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::GuildNotFound(guild.get()));
        }
        Ok(())
    }

    /// Opt a user in or out of activity statistics.
    pub async fn set_trackable(&self, user: UserId, trackable: bool) -> Result<(), DbError> {
        let result = sqlx::query("UPDATE users SET trackable = ? WHERE id = ?")
            .bind(trackable)
            .bind(user.get() as i64)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::UserNotFound(user.get()));
        }
        Ok(())
    }

    /// Number of guilds ever seen.
    pub async fn guild_count(&self) -> Result<i64, DbError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM guilds")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }

    /// Number of users ever seen.
    pub async fn user_count(&self) -> Result<i64, DbError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }
}
