//! SQLite-backed implementation of [`LibraryStore`].
//!
//! # Data model
//!
//! Three tables mirror the relational model of the service:
//!
//! - `users`: one row per absolute uid seen
//! - `libraries`: metadata plus the document list as a JSON array
//! - `permissions`: the read/write/admin/owner flags per (user, library)
//!
//! The schema is created with `CREATE TABLE IF NOT EXISTS` when the store
//! connects. Mutations that touch more than one row run in a transaction.
//!
//! # Notes
//!
//! - `sqlite::memory:` databases live per connection, so the pool is pinned
//!   to a single, never-recycled connection for them.
//! - Uids are stored as `INTEGER` holding the same 64 bits as the `u64`, so
//!   uids above `i64::MAX` come back negative in raw SQL but round-trip
//!   through the store unchanged.

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use biblib_acl::{Permission, PermissionSet};
use biblib_core::{
    Bibcode, DocumentAction, Library, LibraryId, LibraryPatch, NewLibrary, User, UserId,
};
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{FromRow, Sqlite, SqlitePool, Transaction};
use uuid::Uuid;

use crate::{LibraryStore, StoreError, StoreResult};

const SCHEMA: &[&str] = &[
    r#"CREATE TABLE IF NOT EXISTS users (
        absolute_uid INTEGER PRIMARY KEY NOT NULL,
        date_created TEXT NOT NULL
    )"#,
    r#"CREATE TABLE IF NOT EXISTS libraries (
        id TEXT PRIMARY KEY NOT NULL,
        name TEXT NOT NULL,
        description TEXT NOT NULL,
        public BOOLEAN NOT NULL,
        bibcode TEXT NOT NULL,
        date_created TEXT NOT NULL,
        date_last_modified TEXT NOT NULL
    )"#,
    r#"CREATE TABLE IF NOT EXISTS permissions (
        user_uid INTEGER NOT NULL REFERENCES users(absolute_uid) ON DELETE CASCADE,
        library_id TEXT NOT NULL REFERENCES libraries(id) ON DELETE CASCADE,
        can_read BOOLEAN NOT NULL,
        can_write BOOLEAN NOT NULL,
        can_admin BOOLEAN NOT NULL,
        is_owner BOOLEAN NOT NULL,
        PRIMARY KEY (user_uid, library_id)
    )"#,
    "CREATE INDEX IF NOT EXISTS permissions_library ON permissions(library_id)",
];

const LIBRARY_COLUMNS: &str =
    "l.id, l.name, l.description, l.public, l.bibcode, l.date_created, l.date_last_modified";

/// Row shape for the `libraries` table.
#[derive(Debug, FromRow)]
struct LibraryRow {
    id: String,
    name: String,
    description: String,
    public: bool,
    bibcode: String,
    date_created: DateTime<Utc>,
    date_last_modified: DateTime<Utc>,
}

impl TryFrom<LibraryRow> for Library {
    type Error = StoreError;

    fn try_from(row: LibraryRow) -> StoreResult<Self> {
        let uuid = Uuid::parse_str(&row.id)
            .map_err(|e| StoreError::Corrupt(format!("library id {}: {e}", row.id)))?;
        let documents: Vec<Bibcode> = serde_json::from_str(&row.bibcode)?;
        Ok(Library {
            id: LibraryId::from_uuid(uuid),
            name: row.name,
            description: row.description,
            public: row.public,
            documents,
            date_created: row.date_created,
            date_last_modified: row.date_last_modified,
        })
    }
}

/// Row shape for a library joined with one user's grant.
#[derive(Debug, FromRow)]
struct GrantedLibraryRow {
    #[sqlx(flatten)]
    library: LibraryRow,
    #[sqlx(flatten)]
    grant: GrantRow,
}

/// Row shape for the flag columns of `permissions`.
#[derive(Debug, FromRow)]
struct GrantRow {
    can_read: bool,
    can_write: bool,
    can_admin: bool,
    is_owner: bool,
}

impl From<GrantRow> for PermissionSet {
    fn from(row: GrantRow) -> Self {
        PermissionSet {
            read: row.can_read,
            write: row.can_write,
            admin: row.can_admin,
            owner: row.is_owner,
        }
    }
}

#[derive(Debug, FromRow)]
struct UserGrantRow {
    user_uid: i64,
    #[sqlx(flatten)]
    grant: GrantRow,
}

#[derive(Debug, FromRow)]
struct UserRow {
    absolute_uid: i64,
    date_created: DateTime<Utc>,
}

fn uid_param(uid: UserId) -> i64 {
    i64::from_ne_bytes(uid.get().to_ne_bytes())
}

fn uid_from_row(raw: i64) -> UserId {
    UserId::new(u64::from_ne_bytes(raw.to_ne_bytes()))
}

fn library_param(id: &LibraryId) -> String {
    id.as_uuid().to_string()
}

/// Durable store backed by a SQLite database.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Connects to `url` and creates the schema if needed.
    pub async fn connect(url: &str, max_connections: u32) -> StoreResult<Self> {
        if !url.starts_with("sqlite:") {
            return Err(StoreError::UnsupportedUrl(url.to_string()));
        }
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let in_memory = url.contains(":memory:") || url.contains("mode=memory");
        let mut pool_options = SqlitePoolOptions::new().acquire_timeout(Duration::from_secs(5));
        pool_options = if in_memory {
            pool_options
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            pool_options.max_connections(max_connections.max(1))
        };

        let pool = pool_options.connect_with(options).await?;
        let store = Self { pool };
        store.create_schema().await?;
        tracing::debug!(in_memory, "sqlite store ready");
        Ok(store)
    }

    /// Wraps an existing pool and creates the schema if needed.
    pub async fn from_pool(pool: SqlitePool) -> StoreResult<Self> {
        let store = Self { pool };
        store.create_schema().await?;
        Ok(store)
    }

    async fn create_schema(&self) -> StoreResult<()> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    async fn fetch_library(
        tx: &mut Transaction<'_, Sqlite>,
        id: &LibraryId,
    ) -> StoreResult<Library> {
        let sql = format!("SELECT {LIBRARY_COLUMNS} FROM libraries l WHERE l.id = ?");
        let row: Option<LibraryRow> = sqlx::query_as(&sql)
            .bind(library_param(id))
            .fetch_optional(&mut **tx)
            .await?;
        row.ok_or_else(|| StoreError::NotFound(format!("library {id}")))?
            .try_into()
    }

    /// Takes the write lock by touching the user's row. Returns false when
    /// the user is unknown.
    ///
    /// Read-then-write transactions must start with a write: SQLite cannot
    /// upgrade a read lock while another writer is active, and fails with
    /// `SQLITE_BUSY` instead of waiting on the busy timeout.
    async fn lock_user(tx: &mut Transaction<'_, Sqlite>, uid: i64) -> StoreResult<bool> {
        let touched =
            sqlx::query("UPDATE users SET date_created = date_created WHERE absolute_uid = ?")
                .bind(uid)
                .execute(&mut **tx)
                .await?
                .rows_affected();
        Ok(touched > 0)
    }

    /// Takes the write lock by touching the library's row, then loads it.
    async fn lock_library(
        tx: &mut Transaction<'_, Sqlite>,
        id: &LibraryId,
    ) -> StoreResult<Library> {
        sqlx::query("UPDATE libraries SET name = name WHERE id = ?")
            .bind(library_param(id))
            .execute(&mut **tx)
            .await?;
        Self::fetch_library(tx, id).await
    }

    async fn owner_of(
        tx: &mut Transaction<'_, Sqlite>,
        id: &LibraryId,
    ) -> StoreResult<Option<i64>> {
        let owner: Option<(i64,)> = sqlx::query_as(
            "SELECT user_uid FROM permissions WHERE library_id = ? AND is_owner = 1",
        )
        .bind(library_param(id))
        .fetch_optional(&mut **tx)
        .await?;
        Ok(owner.map(|(uid,)| uid))
    }

    async fn name_taken(
        tx: &mut Transaction<'_, Sqlite>,
        owner: i64,
        name: &str,
        except: Option<&LibraryId>,
    ) -> StoreResult<bool> {
        let (count,): (i64,) = sqlx::query_as(
            r#"SELECT COUNT(*) FROM libraries l
               JOIN permissions p ON p.library_id = l.id
               WHERE p.user_uid = ? AND p.is_owner = 1 AND l.name = ? AND l.id != ?"#,
        )
        .bind(owner)
        .bind(name)
        .bind(except.map(library_param).unwrap_or_default())
        .fetch_one(&mut **tx)
        .await?;
        Ok(count > 0)
    }

    async fn write_library(
        tx: &mut Transaction<'_, Sqlite>,
        library: &Library,
    ) -> StoreResult<()> {
        sqlx::query(
            r#"UPDATE libraries
               SET name = ?, description = ?, public = ?, bibcode = ?, date_last_modified = ?
               WHERE id = ?"#,
        )
        .bind(&library.name)
        .bind(&library.description)
        .bind(library.public)
        .bind(serde_json::to_string(&library.documents)?)
        .bind(library.date_last_modified)
        .bind(library_param(&library.id))
        .execute(&mut **tx)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl LibraryStore for SqliteStore {
    async fn ensure_user(&self, uid: UserId) -> StoreResult<User> {
        let user = User::new(uid);
        sqlx::query("INSERT OR IGNORE INTO users (absolute_uid, date_created) VALUES (?, ?)")
            .bind(uid_param(uid))
            .bind(user.date_created)
            .execute(&self.pool)
            .await?;
        self.find_user(uid)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("user {uid}")))
    }

    async fn find_user(&self, uid: UserId) -> StoreResult<Option<User>> {
        let row: Option<UserRow> =
            sqlx::query_as("SELECT absolute_uid, date_created FROM users WHERE absolute_uid = ?")
                .bind(uid_param(uid))
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(|r| User {
            uid: uid_from_row(r.absolute_uid),
            date_created: r.date_created,
        }))
    }

    async fn create_library(&self, owner: UserId, input: NewLibrary) -> StoreResult<Library> {
        let owner_param = uid_param(owner);
        let mut tx = self.pool.begin().await?;
        if !Self::lock_user(&mut tx, owner_param).await? {
            return Err(StoreError::NotFound(format!("user {owner}")));
        }

        let owned: Vec<(String,)> = sqlx::query_as(
            r#"SELECT l.name FROM libraries l
               JOIN permissions p ON p.library_id = l.id
               WHERE p.user_uid = ? AND p.is_owner = 1"#,
        )
        .bind(owner_param)
        .fetch_all(&mut *tx)
        .await?;
        let library = Library::create(
            input.resolve_defaults(owned.iter().map(|(name,)| name.as_str())),
        );
        if owned.iter().any(|(name,)| *name == library.name) {
            return Err(StoreError::Conflict(format!(
                "library named {:?} already exists",
                library.name
            )));
        }

        sqlx::query(
            r#"INSERT INTO libraries
               (id, name, description, public, bibcode, date_created, date_last_modified)
               VALUES (?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(library_param(&library.id))
        .bind(&library.name)
        .bind(&library.description)
        .bind(library.public)
        .bind(serde_json::to_string(&library.documents)?)
        .bind(library.date_created)
        .bind(library.date_last_modified)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"INSERT INTO permissions
               (user_uid, library_id, can_read, can_write, can_admin, is_owner)
               VALUES (?, ?, 1, 1, 1, 1)"#,
        )
        .bind(owner_param)
        .bind(library_param(&library.id))
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(library)
    }

    async fn get_library(&self, id: &LibraryId) -> StoreResult<Library> {
        let mut tx = self.pool.begin().await?;
        let library = Self::fetch_library(&mut tx, id).await?;
        tx.commit().await?;
        Ok(library)
    }

    async fn list_libraries(&self, uid: UserId) -> StoreResult<Vec<(Library, PermissionSet)>> {
        let sql = format!(
            r#"SELECT {LIBRARY_COLUMNS}, p.can_read, p.can_write, p.can_admin, p.is_owner
               FROM libraries l
               JOIN permissions p ON p.library_id = l.id
               WHERE p.user_uid = ?
               ORDER BY l.date_created, l.rowid"#
        );
        let rows: Vec<GrantedLibraryRow> = sqlx::query_as(&sql)
            .bind(uid_param(uid))
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter()
            .map(|row| Ok((Library::try_from(row.library)?, row.grant.into())))
            .collect()
    }

    async fn update_documents(
        &self,
        id: &LibraryId,
        action: DocumentAction,
        bibcodes: &[Bibcode],
    ) -> StoreResult<(Library, usize)> {
        let mut tx = self.pool.begin().await?;
        let mut library = Self::lock_library(&mut tx, id).await?;
        let changed = match action {
            DocumentAction::Add => library.add_documents(bibcodes),
            DocumentAction::Remove => library.remove_documents(bibcodes),
        };
        if changed > 0 {
            Self::write_library(&mut tx, &library).await?;
        }
        tx.commit().await?;
        Ok((library, changed))
    }

    async fn update_metadata(&self, id: &LibraryId, patch: &LibraryPatch) -> StoreResult<Library> {
        let mut tx = self.pool.begin().await?;
        let mut library = Self::lock_library(&mut tx, id).await?;
        if let (Some(name), Some(owner)) = (&patch.name, Self::owner_of(&mut tx, id).await?) {
            let name = name.trim();
            if Self::name_taken(&mut tx, owner, name, Some(id)).await? {
                return Err(StoreError::Conflict(format!(
                    "library named {name:?} already exists"
                )));
            }
        }
        library.apply_patch(patch);
        Self::write_library(&mut tx, &library).await?;
        tx.commit().await?;
        Ok(library)
    }

    async fn delete_library(&self, id: &LibraryId) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM permissions WHERE library_id = ?")
            .bind(library_param(id))
            .execute(&mut *tx)
            .await?;
        let deleted = sqlx::query("DELETE FROM libraries WHERE id = ?")
            .bind(library_param(id))
            .execute(&mut *tx)
            .await?
            .rows_affected();
        if deleted == 0 {
            return Err(StoreError::NotFound(format!("library {id}")));
        }
        tx.commit().await?;
        Ok(())
    }

    async fn get_permissions(
        &self,
        uid: UserId,
        id: &LibraryId,
    ) -> StoreResult<Option<PermissionSet>> {
        let row: Option<GrantRow> = sqlx::query_as(
            r#"SELECT can_read, can_write, can_admin, is_owner
               FROM permissions WHERE user_uid = ? AND library_id = ?"#,
        )
        .bind(uid_param(uid))
        .bind(library_param(id))
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(PermissionSet::from))
    }

    async fn list_permissions(&self, id: &LibraryId) -> StoreResult<Vec<(UserId, PermissionSet)>> {
        let mut tx = self.pool.begin().await?;
        Self::fetch_library(&mut tx, id).await?;
        let rows: Vec<UserGrantRow> = sqlx::query_as(
            r#"SELECT user_uid, can_read, can_write, can_admin, is_owner
               FROM permissions WHERE library_id = ?"#,
        )
        .bind(library_param(id))
        .fetch_all(&mut *tx)
        .await?;
        tx.commit().await?;
        // Sorted here rather than in SQL: the stored bits do not order like u64.
        let mut grants: Vec<(UserId, PermissionSet)> = rows
            .into_iter()
            .map(|row| (uid_from_row(row.user_uid), row.grant.into()))
            .collect();
        grants.sort_by_key(|(uid, _)| *uid);
        Ok(grants)
    }

    async fn set_permission(
        &self,
        uid: UserId,
        id: &LibraryId,
        permission: Permission,
        value: bool,
    ) -> StoreResult<PermissionSet> {
        let uid_value = uid_param(uid);
        let mut tx = self.pool.begin().await?;
        if !Self::lock_user(&mut tx, uid_value).await? {
            return Err(StoreError::NotFound(format!("user {uid}")));
        }
        Self::fetch_library(&mut tx, id).await?;

        let current: Option<GrantRow> = sqlx::query_as(
            r#"SELECT can_read, can_write, can_admin, is_owner
               FROM permissions WHERE user_uid = ? AND library_id = ?"#,
        )
        .bind(uid_value)
        .bind(library_param(id))
        .fetch_optional(&mut *tx)
        .await?;
        let mut set = current.map(PermissionSet::from).unwrap_or_default();
        set.set(permission, value);

        if set.is_empty() {
            sqlx::query("DELETE FROM permissions WHERE user_uid = ? AND library_id = ?")
                .bind(uid_value)
                .bind(library_param(id))
                .execute(&mut *tx)
                .await?;
        } else {
            sqlx::query(
                r#"INSERT INTO permissions
                   (user_uid, library_id, can_read, can_write, can_admin, is_owner)
                   VALUES (?, ?, ?, ?, ?, ?)
                   ON CONFLICT (user_uid, library_id) DO UPDATE SET
                     can_read = excluded.can_read,
                     can_write = excluded.can_write,
                     can_admin = excluded.can_admin,
                     is_owner = excluded.is_owner"#,
            )
            .bind(uid_value)
            .bind(library_param(id))
            .bind(set.read)
            .bind(set.write)
            .bind(set.admin)
            .bind(set.owner)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(set)
    }

    async fn health_check(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "sqlite"
    }
}
