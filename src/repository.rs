use crate::error::ApiError;
use crate::models::{Admin, Listing, ListingStatus, NewListing};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Repository Trait
///
/// The abstract contract for all persistence operations: the listing registry
/// plus the administrator credential store. Handlers and the Auth Gate talk
/// to this trait only, never to a concrete backend.
///
/// **Send + Sync + async_trait** are required to make the trait object
/// (`Arc<dyn Repository>`) safely shareable across Axum's asynchronous task
/// boundaries.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Listing Registry ---

    /// Stores a new entry. The registry assigns the id, forces
    /// `status = pending`, and stamps `created_at == updated_at`.
    async fn create_listing(&self, new: NewListing) -> Result<Listing, ApiError>;

    /// Every entry regardless of status. Admin-only read.
    async fn list_all(&self) -> Result<Vec<Listing>, ApiError>;

    /// Entries in exactly the given status. With `Approved` this is the one
    /// query the anonymous public actor reaches.
    async fn list_by_status(&self, status: ListingStatus) -> Result<Vec<Listing>, ApiError>;

    /// Single-entry lookup by id.
    async fn get_listing(&self, id: Uuid) -> Result<Option<Listing>, ApiError>;

    /// The moderation transition: overwrites the status unconditionally (any
    /// legal state may move to any other, including itself) and refreshes
    /// `updated_at`. Returns None for an unknown id. Atomic per entry.
    async fn set_status(
        &self,
        id: Uuid,
        status: ListingStatus,
    ) -> Result<Option<Listing>, ApiError>;

    /// Removes an entry. Returns false for an unknown id.
    async fn delete_listing(&self, id: Uuid) -> Result<bool, ApiError>;

    // --- Credential Store ---

    /// Confirms the token subject still exists. Used by the Auth Gate on
    /// every gated request.
    async fn get_admin(&self, id: Uuid) -> Result<Option<Admin>, ApiError>;

    /// Exact-match login lookup for authentication.
    async fn get_admin_by_login(&self, login: &str) -> Result<Option<Admin>, ApiError>;

    /// Creates the administrator record. Only reachable from the startup
    /// seed path, never from a request handler.
    async fn create_admin(&self, login: &str, password_hash: &str) -> Result<Admin, ApiError>;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer across the
/// application state. Constructed once in `main` and injected explicitly;
/// there is no process-wide database handle.
pub type RepositoryState = Arc<dyn Repository>;

const LISTING_COLUMNS: &str =
    "id, name, category, short_description, full_description, link, image, tags, date, kind, \
     status, created_at, updated_at";

/// PostgresRepository
///
/// The production implementation of the `Repository` trait, backed by a
/// PostgreSQL connection pool.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Creates a new repository instance using the initialized connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository for PostgresRepository {
    async fn create_listing(&self, new: NewListing) -> Result<Listing, ApiError> {
        // A single NOW() expression feeds both timestamp columns, so a fresh
        // row always satisfies created_at == updated_at.
        let sql = format!(
            "INSERT INTO listings (id, name, category, short_description, full_description, \
             link, image, tags, date, kind, status, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, NOW(), NOW()) \
             RETURNING {LISTING_COLUMNS}"
        );

        let listing = sqlx::query_as::<_, Listing>(&sql)
            .bind(Uuid::new_v4())
            .bind(new.name)
            .bind(new.category)
            .bind(new.short_description)
            .bind(new.full_description)
            .bind(new.link)
            .bind(new.image)
            .bind(new.tags)
            .bind(new.date)
            .bind(new.kind)
            .bind(ListingStatus::Pending)
            .fetch_one(&self.pool)
            .await?;

        Ok(listing)
    }

    async fn list_all(&self) -> Result<Vec<Listing>, ApiError> {
        let sql =
            format!("SELECT {LISTING_COLUMNS} FROM listings ORDER BY created_at DESC");

        Ok(sqlx::query_as::<_, Listing>(&sql)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn list_by_status(&self, status: ListingStatus) -> Result<Vec<Listing>, ApiError> {
        let sql = format!(
            "SELECT {LISTING_COLUMNS} FROM listings WHERE status = $1 ORDER BY created_at DESC"
        );

        Ok(sqlx::query_as::<_, Listing>(&sql)
            .bind(status)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn get_listing(&self, id: Uuid) -> Result<Option<Listing>, ApiError> {
        let sql = format!("SELECT {LISTING_COLUMNS} FROM listings WHERE id = $1");

        Ok(sqlx::query_as::<_, Listing>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: ListingStatus,
    ) -> Result<Option<Listing>, ApiError> {
        // A single UPDATE statement keeps the read-modify-write atomic with
        // respect to concurrent transitions on the same row.
        let sql = format!(
            "UPDATE listings SET status = $2, updated_at = NOW() WHERE id = $1 \
             RETURNING {LISTING_COLUMNS}"
        );

        Ok(sqlx::query_as::<_, Listing>(&sql)
            .bind(id)
            .bind(status)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn delete_listing(&self, id: Uuid) -> Result<bool, ApiError> {
        let result = sqlx::query("DELETE FROM listings WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn get_admin(&self, id: Uuid) -> Result<Option<Admin>, ApiError> {
        Ok(sqlx::query_as::<_, Admin>(
            "SELECT id, login, password_hash FROM administrators WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn get_admin_by_login(&self, login: &str) -> Result<Option<Admin>, ApiError> {
        Ok(sqlx::query_as::<_, Admin>(
            "SELECT id, login, password_hash FROM administrators WHERE login = $1",
        )
        .bind(login)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn create_admin(&self, login: &str, password_hash: &str) -> Result<Admin, ApiError> {
        Ok(sqlx::query_as::<_, Admin>(
            "INSERT INTO administrators (id, login, password_hash) VALUES ($1, $2, $3) \
             RETURNING id, login, password_hash",
        )
        .bind(Uuid::new_v4())
        .bind(login)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await?)
    }
}

/// InMemoryRepository
///
/// A HashMap-backed implementation of `Repository` used by the test suite
/// and available for local development without a database. It honors the
/// same contract as the Postgres backend, including per-entry atomicity:
/// the write guard spans each whole read-modify-write, so concurrent
/// transitions on the same entry serialize.
#[derive(Default)]
pub struct InMemoryRepository {
    listings: RwLock<HashMap<Uuid, Listing>>,
    admins: RwLock<HashMap<Uuid, Admin>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn create_listing(&self, new: NewListing) -> Result<Listing, ApiError> {
        let now = Utc::now();
        let listing = Listing {
            id: Uuid::new_v4(),
            name: new.name,
            category: new.category,
            short_description: new.short_description,
            full_description: new.full_description,
            link: new.link,
            image: new.image,
            tags: new.tags,
            date: new.date,
            kind: new.kind,
            status: ListingStatus::Pending,
            created_at: now,
            updated_at: now,
        };

        self.listings
            .write()
            .await
            .insert(listing.id, listing.clone());

        Ok(listing)
    }

    async fn list_all(&self) -> Result<Vec<Listing>, ApiError> {
        let mut listings: Vec<Listing> = self.listings.read().await.values().cloned().collect();
        listings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(listings)
    }

    async fn list_by_status(&self, status: ListingStatus) -> Result<Vec<Listing>, ApiError> {
        let mut listings: Vec<Listing> = self
            .listings
            .read()
            .await
            .values()
            .filter(|listing| listing.status == status)
            .cloned()
            .collect();
        listings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(listings)
    }

    async fn get_listing(&self, id: Uuid) -> Result<Option<Listing>, ApiError> {
        Ok(self.listings.read().await.get(&id).cloned())
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: ListingStatus,
    ) -> Result<Option<Listing>, ApiError> {
        let mut listings = self.listings.write().await;

        Ok(listings.get_mut(&id).map(|listing| {
            listing.status = status;
            listing.updated_at = Utc::now();
            listing.clone()
        }))
    }

    async fn delete_listing(&self, id: Uuid) -> Result<bool, ApiError> {
        Ok(self.listings.write().await.remove(&id).is_some())
    }

    async fn get_admin(&self, id: Uuid) -> Result<Option<Admin>, ApiError> {
        Ok(self.admins.read().await.get(&id).cloned())
    }

    async fn get_admin_by_login(&self, login: &str) -> Result<Option<Admin>, ApiError> {
        Ok(self
            .admins
            .read()
            .await
            .values()
            .find(|admin| admin.login == login)
            .cloned())
    }

    async fn create_admin(&self, login: &str, password_hash: &str) -> Result<Admin, ApiError> {
        let admin = Admin {
            id: Uuid::new_v4(),
            login: login.to_string(),
            password_hash: password_hash.to_string(),
        };

        self.admins.write().await.insert(admin.id, admin.clone());

        Ok(admin)
    }
}
