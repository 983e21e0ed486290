//! Database helpers for user records, the follow graph, and notifications.
//!
//! Every query binds its parameters and runs inside a `db.query` span. Reads
//! that feed responses select the public projection only; the password hash
//! is fetched exclusively by the credential lookups, which never leave this
//! module's callers in `auth`.

use anyhow::{Context, Result};
use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::Instrument;
use uuid::Uuid;

use super::types::UserResponse;
use super::utils::is_unique_violation;

/// Columns of the public projection. Deliberately omits `password_hash`.
const USER_PROJECTION: &str = "id, username, email, full_name, bio, link, \
     profile_image_url, cover_image_url, followers, following";

/// Outcome when attempting to create a new user record.
#[derive(Debug)]
pub(crate) enum SignupOutcome {
    Created { user_id: Uuid, user: UserResponse },
    Conflict,
}

/// Outcome of a merge-patch profile update.
#[derive(Debug)]
pub(crate) enum ProfileUpdateOutcome {
    Updated(UserResponse),
    Conflict,
    Missing,
}

/// Minimal fields needed to verify a login.
pub(crate) struct CredentialRecord {
    pub(crate) user_id: Uuid,
    pub(crate) password_hash: String,
}

/// The two denormalized sides of the follow graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum RelationField {
    Followers,
    Following,
}

impl RelationField {
    pub(crate) const fn column(self) -> &'static str {
        match self {
            Self::Followers => "followers",
            Self::Following => "following",
        }
    }
}

fn user_from_row(row: &PgRow) -> UserResponse {
    let id: Uuid = row.get("id");
    let followers: Vec<Uuid> = row.get("followers");
    let following: Vec<Uuid> = row.get("following");
    UserResponse {
        id: id.to_string(),
        username: row.get("username"),
        email: row.get("email"),
        full_name: row.get("full_name"),
        bio: row.get("bio"),
        link: row.get("link"),
        profile_image_url: row.get("profile_image_url"),
        cover_image_url: row.get("cover_image_url"),
        followers: followers.iter().map(ToString::to_string).collect(),
        following: following.iter().map(ToString::to_string).collect(),
    }
}

/// Look up login credentials by username.
pub(crate) async fn lookup_credentials(
    pool: &PgPool,
    username: &str,
) -> Result<Option<CredentialRecord>> {
    let query = "SELECT id, password_hash FROM users WHERE username = $1";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(username)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to lookup credentials")?;

    Ok(row.map(|row| CredentialRecord {
        user_id: row.get("id"),
        password_hash: row.get("password_hash"),
    }))
}

/// Fetch the stored password hash for a password change check.
pub(crate) async fn lookup_password_hash(pool: &PgPool, user_id: Uuid) -> Result<Option<String>> {
    let query = "SELECT password_hash FROM users WHERE id = $1";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(user_id)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to lookup password hash")?;

    Ok(row.map(|row| row.get("password_hash")))
}

pub(crate) async fn username_exists(pool: &PgPool, username: &str) -> Result<bool> {
    let query = "SELECT 1 FROM users WHERE username = $1 LIMIT 1";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(username)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to check username existence")?;
    Ok(row.is_some())
}

pub(crate) async fn email_exists(pool: &PgPool, email: &str) -> Result<bool> {
    let query = "SELECT 1 FROM users WHERE email = $1 LIMIT 1";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(email)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to check email existence")?;
    Ok(row.is_some())
}

/// Insert a new user with empty relationship lists.
///
/// The unique indexes on `username` and `email` are the backstop for the
/// friendly existence checks that run before this insert; a violation maps
/// to `Conflict` instead of an error.
pub(crate) async fn insert_user(
    pool: &PgPool,
    full_name: &str,
    username: &str,
    email: &str,
    password_hash: &str,
) -> Result<SignupOutcome> {
    let query = format!(
        "INSERT INTO users (full_name, username, email, password_hash) \
         VALUES ($1, $2, $3, $4) \
         RETURNING {USER_PROJECTION}"
    );
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "INSERT",
        db.statement = query.as_str()
    );
    let row = sqlx::query(&query)
        .bind(full_name)
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .fetch_one(pool)
        .instrument(span)
        .await;

    match row {
        Ok(row) => Ok(SignupOutcome::Created {
            user_id: row.get("id"),
            user: user_from_row(&row),
        }),
        Err(err) if is_unique_violation(&err) => Ok(SignupOutcome::Conflict),
        Err(err) => Err(err).context("failed to insert user"),
    }
}

pub(crate) async fn fetch_user_by_id(pool: &PgPool, user_id: Uuid) -> Result<Option<UserResponse>> {
    let query = format!("SELECT {USER_PROJECTION} FROM users WHERE id = $1");
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query.as_str()
    );
    let row = sqlx::query(&query)
        .bind(user_id)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to fetch user by id")?;
    Ok(row.map(|row| user_from_row(&row)))
}

pub(crate) async fn fetch_user_by_username(
    pool: &PgPool,
    username: &str,
) -> Result<Option<UserResponse>> {
    let query = format!("SELECT {USER_PROJECTION} FROM users WHERE username = $1");
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query.as_str()
    );
    let row = sqlx::query(&query)
        .bind(username)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to fetch user by username")?;
    Ok(row.map(|row| user_from_row(&row)))
}

pub(crate) async fn user_exists(pool: &PgPool, user_id: Uuid) -> Result<bool> {
    let query = "SELECT 1 FROM users WHERE id = $1 LIMIT 1";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(user_id)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to check user existence")?;
    Ok(row.is_some())
}

/// Membership test on the actor's `following` set.
pub(crate) async fn is_following(pool: &PgPool, actor_id: Uuid, target_id: Uuid) -> Result<bool> {
    let query = "SELECT following @> ARRAY[$2] AS is_following FROM users WHERE id = $1";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(actor_id)
        .bind(target_id)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to check follow state")?;
    Ok(row.is_some_and(|row| row.get("is_following")))
}

/// Add an id to one of the relationship sets.
///
/// The guard keeps the array set-like: two concurrent follows of the same
/// pair both pass the membership test, but only one append lands.
pub(crate) async fn add_to_set(
    pool: &PgPool,
    user_id: Uuid,
    field: RelationField,
    value: Uuid,
) -> Result<()> {
    let column = field.column();
    let query = format!(
        "UPDATE users SET {column} = array_append({column}, $2), updated_at = NOW() \
         WHERE id = $1 AND NOT ({column} @> ARRAY[$2])"
    );
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "UPDATE",
        db.statement = query.as_str()
    );
    sqlx::query(&query)
        .bind(user_id)
        .bind(value)
        .execute(pool)
        .instrument(span)
        .await
        .with_context(|| format!("failed to add to {column}"))?;
    Ok(())
}

/// Remove an id from one of the relationship sets. Idempotent.
pub(crate) async fn remove_from_set(
    pool: &PgPool,
    user_id: Uuid,
    field: RelationField,
    value: Uuid,
) -> Result<()> {
    let column = field.column();
    let query = format!(
        "UPDATE users SET {column} = array_remove({column}, $2), updated_at = NOW() \
         WHERE id = $1"
    );
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "UPDATE",
        db.statement = query.as_str()
    );
    sqlx::query(&query)
        .bind(user_id)
        .bind(value)
        .execute(pool)
        .instrument(span)
        .await
        .with_context(|| format!("failed to remove from {column}"))?;
    Ok(())
}

/// Read the actor's `following` set for suggestion filtering.
pub(crate) async fn fetch_following(pool: &PgPool, user_id: Uuid) -> Result<Vec<Uuid>> {
    let query = "SELECT following FROM users WHERE id = $1";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(user_id)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to fetch following set")?;
    Ok(row.map(|row| row.get("following")).unwrap_or_default())
}

/// Draw a random pool of other users, excluding the given id.
///
/// The pool is sampled before any follow filtering on purpose; callers
/// filter and truncate afterwards.
pub(crate) async fn sample_users_excluding(
    pool: &PgPool,
    exclude_id: Uuid,
    pool_size: i64,
) -> Result<Vec<UserResponse>> {
    let query =
        format!("SELECT {USER_PROJECTION} FROM users WHERE id <> $1 ORDER BY random() LIMIT $2");
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query.as_str()
    );
    let rows = sqlx::query(&query)
        .bind(exclude_id)
        .bind(pool_size)
        .fetch_all(pool)
        .instrument(span)
        .await
        .context("failed to sample users")?;
    Ok(rows.iter().map(user_from_row).collect())
}

/// Field-level merge-patch for a profile update. `None` leaves the stored
/// value untouched.
#[derive(Debug, Default)]
pub(crate) struct ProfilePatch {
    pub(crate) full_name: Option<String>,
    pub(crate) username: Option<String>,
    pub(crate) email: Option<String>,
    pub(crate) bio: Option<String>,
    pub(crate) link: Option<String>,
    pub(crate) password_hash: Option<String>,
    pub(crate) profile_image_url: Option<String>,
    pub(crate) cover_image_url: Option<String>,
}

impl ProfilePatch {
    pub(crate) fn is_empty(&self) -> bool {
        self.full_name.is_none()
            && self.username.is_none()
            && self.email.is_none()
            && self.bio.is_none()
            && self.link.is_none()
            && self.password_hash.is_none()
            && self.profile_image_url.is_none()
            && self.cover_image_url.is_none()
    }
}

/// Apply a merge-patch to a user record and return the updated projection.
pub(crate) async fn update_profile(
    pool: &PgPool,
    user_id: Uuid,
    patch: ProfilePatch,
) -> Result<ProfileUpdateOutcome> {
    let query = format!(
        "UPDATE users SET \
             full_name = COALESCE($1, full_name), \
             username = COALESCE($2, username), \
             email = COALESCE($3, email), \
             bio = COALESCE($4, bio), \
             link = COALESCE($5, link), \
             password_hash = COALESCE($6, password_hash), \
             profile_image_url = COALESCE($7, profile_image_url), \
             cover_image_url = COALESCE($8, cover_image_url), \
             updated_at = NOW() \
         WHERE id = $9 \
         RETURNING {USER_PROJECTION}"
    );
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "UPDATE",
        db.statement = query.as_str()
    );
    let row = sqlx::query(&query)
        .bind(patch.full_name)
        .bind(patch.username)
        .bind(patch.email)
        .bind(patch.bio)
        .bind(patch.link)
        .bind(patch.password_hash)
        .bind(patch.profile_image_url)
        .bind(patch.cover_image_url)
        .bind(user_id)
        .fetch_optional(pool)
        .instrument(span)
        .await;

    match row {
        Ok(Some(row)) => Ok(ProfileUpdateOutcome::Updated(user_from_row(&row))),
        Ok(None) => Ok(ProfileUpdateOutcome::Missing),
        Err(err) if is_unique_violation(&err) => Ok(ProfileUpdateOutcome::Conflict),
        Err(err) => Err(err).context("failed to update profile"),
    }
}

/// Record a follow notification. Fire-and-forget from the caller's
/// perspective; the read path lives outside this service.
pub(crate) async fn record_follow_notification(
    pool: &PgPool,
    from_user: Uuid,
    to_user: Uuid,
) -> Result<()> {
    let query = "INSERT INTO notifications (notif_type, from_user, to_user) \
                 VALUES ('follow', $1, $2)";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "INSERT",
        db.statement = query
    );
    sqlx::query(query)
        .bind(from_user)
        .bind(to_user)
        .execute(pool)
        .instrument(span)
        .await
        .context("failed to record follow notification")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{ProfilePatch, RelationField, SignupOutcome, USER_PROJECTION};

    #[test]
    fn relation_field_columns() {
        assert_eq!(RelationField::Followers.column(), "followers");
        assert_eq!(RelationField::Following.column(), "following");
    }

    #[test]
    fn projection_never_selects_password_hash() {
        assert!(!USER_PROJECTION.contains("password_hash"));
    }

    #[test]
    fn empty_patch_is_empty() {
        assert!(ProfilePatch::default().is_empty());
        let patch = ProfilePatch {
            bio: Some("hello".to_string()),
            ..ProfilePatch::default()
        };
        assert!(!patch.is_empty());
    }

    #[test]
    fn signup_outcome_conflict_debug_name() {
        assert_eq!(format!("{:?}", SignupOutcome::Conflict), "Conflict");
    }
}
