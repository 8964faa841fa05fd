use std::sync::Arc;

use poem_openapi::{
    OpenApi,
    param::{Path, Query},
    payload::{Json, PlainText},
};

use super::models::{
    AuthorListResponseDto, BookCreateRequestDto, BookCreateResponseDto, BookListResponseDto,
    LibraryEntriesResponseDto, ProgressRequestDto, ProgressResponseDto, UserCreateRequestDto,
    UserCreateResponseDto, UserProfileResponseDto, UserUpdateRequestDto,
};
use super::services::{
    catalog::CatalogService, health::HealthService, progress::ProgressService, users::UserService,
};
use crate::storage::{CatalogRepo, UserRepo};

pub struct VintageApi {
    pub users: Arc<dyn UserRepo>,
    pub catalog: Arc<dyn CatalogRepo>,
}

#[OpenApi]
impl VintageApi {
    /// Service and store health
    #[oai(path = "/status", method = "get")]
    #[tracing::instrument(level = "debug", skip(self))]
    async fn status(&self) -> PlainText<String> {
        HealthService::new(self.users.as_ref()).status_text().await
    }

    // ===== Reading progress =====

    /// Create or update the caller's progress for one title
    #[oai(path = "/progress", method = "post")]
    #[tracing::instrument(level = "debug", skip(self, body))]
    async fn upsert_progress(&self, body: Json<ProgressRequestDto>) -> ProgressResponseDto {
        ProgressService::new(self.users.as_ref())
            .save_progress(body.0)
            .await
    }

    /// Library entries that are not finished yet
    #[oai(path = "/wishlist/:email", method = "get")]
    #[tracing::instrument(level = "debug", skip(self, email))]
    async fn wishlist(&self, email: Path<String>) -> LibraryEntriesResponseDto {
        ProgressService::new(self.users.as_ref())
            .wishlist(&email.0)
            .await
    }

    /// Every library entry, in the order it was added
    #[oai(path = "/library/:email", method = "get")]
    #[tracing::instrument(level = "debug", skip(self, email))]
    async fn library(&self, email: Path<String>) -> LibraryEntriesResponseDto {
        ProgressService::new(self.users.as_ref())
            .library(&email.0)
            .await
    }

    // ===== Accounts =====

    #[oai(path = "/users", method = "post")]
    #[tracing::instrument(level = "debug", skip(self, body))]
    async fn create_user(&self, body: Json<UserCreateRequestDto>) -> UserCreateResponseDto {
        UserService::new(self.users.as_ref()).register(body.0).await
    }

    #[oai(path = "/users/:email", method = "get")]
    #[tracing::instrument(level = "debug", skip(self, email))]
    async fn get_user(&self, email: Path<String>) -> UserProfileResponseDto {
        UserService::new(self.users.as_ref()).profile(&email.0).await
    }

    #[oai(path = "/users/:email", method = "put")]
    #[tracing::instrument(level = "debug", skip(self, email, body))]
    async fn update_user(
        &self,
        email: Path<String>,
        body: Json<UserUpdateRequestDto>,
    ) -> UserProfileResponseDto {
        UserService::new(self.users.as_ref())
            .update(&email.0, body.0)
            .await
    }

    // ===== Catalog =====

    #[oai(path = "/books", method = "get")]
    #[tracing::instrument(level = "debug", skip(self, author))]
    async fn list_books(
        &self,
        /// Only books by this author (exact match)
        Query(author): Query<Option<String>>,
    ) -> BookListResponseDto {
        tracing::debug!(author = author.as_deref().unwrap_or(""), "handling list_books");
        CatalogService::new(self.catalog.as_ref())
            .list_books(author.as_deref())
            .await
    }

    #[oai(path = "/books", method = "post")]
    #[tracing::instrument(level = "debug", skip(self, body))]
    async fn create_book(&self, body: Json<BookCreateRequestDto>) -> BookCreateResponseDto {
        CatalogService::new(self.catalog.as_ref())
            .create_book(body.0)
            .await
    }

    #[oai(path = "/books/authors", method = "get")]
    #[tracing::instrument(level = "debug", skip(self, initial))]
    async fn list_authors(
        &self,
        /// Only authors whose name starts with this prefix
        Query(initial): Query<Option<String>>,
    ) -> AuthorListResponseDto {
        CatalogService::new(self.catalog.as_ref())
            .list_authors(initial.as_deref())
            .await
    }
}
