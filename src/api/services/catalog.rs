use poem_openapi::payload::Json;

use crate::{
    api::models::{
        AuthorListResponseDto, BookCreateRequestDto, BookCreateResponseDto, BookDto,
        BookListResponseDto, ErrorDto,
    },
    domain::models::{Book, NewBook},
    error::{ServiceError, ServiceResult},
    storage::CatalogRepo,
};

pub struct CatalogService<'a> {
    pub catalog: &'a dyn CatalogRepo,
}

/// Distinct authors in first-appearance order, optionally those starting with `initial`.
pub fn authors_of(books: &[Book], initial: Option<&str>) -> Vec<String> {
    let mut authors: Vec<String> = Vec::new();
    for book in books {
        if let Some(prefix) = initial {
            if !book.author.starts_with(prefix) {
                continue;
            }
        }
        if !authors.contains(&book.author) {
            authors.push(book.author.clone());
        }
    }
    authors
}

impl<'a> CatalogService<'a> {
    pub fn new(catalog: &'a dyn CatalogRepo) -> Self {
        Self { catalog }
    }

    #[tracing::instrument(level = "debug", skip(self, req), fields(title = %req.title))]
    pub async fn add_book(&self, req: BookCreateRequestDto) -> ServiceResult<Book> {
        let title = req.title.trim();
        let author = req.author.trim();
        if title.is_empty() || author.is_empty() {
            return Err(ServiceError::Validation("title and author are required".into()));
        }
        let book = self
            .catalog
            .insert(NewBook {
                title: title.to_string(),
                author: author.to_string(),
                image: req.image,
                content_url: req.content_url,
            })
            .await?;
        Ok(book)
    }

    /// Insert `books` when the catalog is still empty. Returns how many were added.
    #[tracing::instrument(level = "debug", skip(self, books), fields(candidates = books.len()))]
    pub async fn seed_if_empty(&self, books: Vec<NewBook>) -> ServiceResult<usize> {
        if self.catalog.count().await? > 0 {
            tracing::debug!("catalog already populated, skipping seed");
            return Ok(0);
        }
        let mut added = 0;
        for book in books {
            self.catalog.insert(book).await?;
            added += 1;
        }
        tracing::info!(added, "seeded catalog");
        Ok(added)
    }

    pub async fn list_books(&self, author: Option<&str>) -> BookListResponseDto {
        match self.catalog.list(author).await {
            Ok(books) => {
                BookListResponseDto::Ok(Json(books.into_iter().map(BookDto::from).collect()))
            }
            Err(e) => {
                tracing::error!(error = %format!("{:?}", e), "failed to list books");
                BookListResponseDto::InternalError(Json(ErrorDto::from("Failed to fetch books.")))
            }
        }
    }

    pub async fn list_authors(&self, initial: Option<&str>) -> AuthorListResponseDto {
        match self.catalog.list(None).await {
            Ok(books) => AuthorListResponseDto::Ok(Json(authors_of(&books, initial))),
            Err(e) => {
                tracing::error!(error = %format!("{:?}", e), "failed to list authors");
                AuthorListResponseDto::InternalError(Json(ErrorDto::from(
                    "Failed to fetch authors.",
                )))
            }
        }
    }

    pub async fn create_book(&self, req: BookCreateRequestDto) -> BookCreateResponseDto {
        match self.add_book(req).await {
            Ok(book) => BookCreateResponseDto::Created(Json(BookDto::from(book))),
            Err(ServiceError::Validation(msg)) => {
                BookCreateResponseDto::BadRequest(Json(msg.into()))
            }
            Err(e) => {
                tracing::error!(error = %format!("{:?}", e), "failed to add book");
                BookCreateResponseDto::InternalError(Json(ErrorDto::from("Failed to add book.")))
            }
        }
    }
}
