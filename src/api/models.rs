use chrono::{DateTime, Utc};
use poem_openapi::{ApiResponse, Object, payload::Json};
use uuid::Uuid;

use crate::domain::models::{Book, LibraryEntry, User};

#[derive(Debug, Clone, Object)]
pub struct ErrorDto {
    /// Human-readable error message
    pub message: String,
}

impl From<String> for ErrorDto {
    fn from(message: String) -> Self {
        ErrorDto { message }
    }
}

impl From<&str> for ErrorDto {
    fn from(message: &str) -> Self {
        ErrorDto {
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Clone, Object)]
pub struct MessageDto {
    pub message: String,
}

// ===== Progress and wishlist =====

/// Every field is optional on the wire so missing values get our own 400 body.
#[derive(Debug, Clone, Default, Object)]
#[oai(rename_all = "camelCase")]
pub struct ProgressRequestDto {
    pub email: Option<String>,
    pub title: Option<String>,
    pub image: Option<String>,
    pub current_page: Option<i64>,
    pub percentage_read: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Object)]
#[oai(rename_all = "camelCase")]
pub struct LibraryEntryDto {
    pub title: String,
    pub image: Option<String>,
    pub current_page: u32,
    pub percentage_read: u8,
}

impl From<LibraryEntry> for LibraryEntryDto {
    fn from(entry: LibraryEntry) -> Self {
        LibraryEntryDto {
            title: entry.title,
            image: entry.image,
            current_page: entry.current_page,
            percentage_read: entry.percentage_read,
        }
    }
}

#[derive(ApiResponse)]
pub enum ProgressResponseDto {
    /// Progress stored
    #[oai(status = 200)]
    Ok(Json<MessageDto>),

    /// Required fields missing or out of range
    #[oai(status = 400)]
    BadRequest(Json<ErrorDto>),

    /// Unknown user
    #[oai(status = 404)]
    NotFound(Json<ErrorDto>),

    /// Persistence failure
    #[oai(status = 500)]
    InternalError(Json<ErrorDto>),
}

#[derive(ApiResponse)]
pub enum LibraryEntriesResponseDto {
    /// Library entries in stored order
    #[oai(status = 200)]
    Ok(Json<Vec<LibraryEntryDto>>),

    /// Unknown user
    #[oai(status = 404)]
    NotFound(Json<ErrorDto>),

    /// Persistence failure
    #[oai(status = 500)]
    InternalError(Json<ErrorDto>),
}

// ===== Accounts =====

#[derive(Debug, Clone, Object)]
#[oai(rename_all = "camelCase")]
pub struct UserCreateRequestDto {
    pub email: String,
    pub username: String,
    pub account_name: String,
}

#[derive(Debug, Clone, Default, Object)]
#[oai(rename_all = "camelCase")]
pub struct UserUpdateRequestDto {
    pub username: Option<String>,
    pub account_name: Option<String>,
}

#[derive(Debug, Clone, Object)]
#[oai(rename_all = "camelCase")]
pub struct UserProfileDto {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub account_name: String,
    pub books_in_library: u32,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserProfileDto {
    fn from(user: User) -> Self {
        UserProfileDto {
            id: user.id,
            books_in_library: u32::try_from(user.library.len()).unwrap_or(u32::MAX),
            email: user.email,
            username: user.username,
            account_name: user.account_name,
            created_at: user.created_at,
        }
    }
}

#[derive(ApiResponse)]
pub enum UserCreateResponseDto {
    /// User created
    #[oai(status = 201)]
    Created(Json<UserProfileDto>),

    #[oai(status = 400)]
    BadRequest(Json<ErrorDto>),

    /// Email already registered
    #[oai(status = 409)]
    Conflict(Json<ErrorDto>),

    #[oai(status = 500)]
    InternalError(Json<ErrorDto>),
}

#[derive(ApiResponse)]
pub enum UserProfileResponseDto {
    #[oai(status = 200)]
    Ok(Json<UserProfileDto>),

    #[oai(status = 400)]
    BadRequest(Json<ErrorDto>),

    #[oai(status = 404)]
    NotFound(Json<ErrorDto>),

    #[oai(status = 500)]
    InternalError(Json<ErrorDto>),
}

// ===== Catalog =====

#[derive(Debug, Clone, Object)]
#[oai(rename_all = "camelCase")]
pub struct BookDto {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub image: Option<String>,
    pub content_url: Option<String>,
}

impl From<Book> for BookDto {
    fn from(book: Book) -> Self {
        BookDto {
            id: book.id,
            title: book.title,
            author: book.author,
            image: book.image,
            content_url: book.content_url,
        }
    }
}

#[derive(Debug, Clone, Object)]
#[oai(rename_all = "camelCase")]
pub struct BookCreateRequestDto {
    pub title: String,
    pub author: String,
    pub image: Option<String>,
    pub content_url: Option<String>,
}

#[derive(ApiResponse)]
pub enum BookListResponseDto {
    #[oai(status = 200)]
    Ok(Json<Vec<BookDto>>),

    #[oai(status = 500)]
    InternalError(Json<ErrorDto>),
}

#[derive(ApiResponse)]
pub enum AuthorListResponseDto {
    /// Distinct authors in catalog order
    #[oai(status = 200)]
    Ok(Json<Vec<String>>),

    #[oai(status = 500)]
    InternalError(Json<ErrorDto>),
}

#[derive(ApiResponse)]
pub enum BookCreateResponseDto {
    #[oai(status = 201)]
    Created(Json<BookDto>),

    #[oai(status = 400)]
    BadRequest(Json<ErrorDto>),

    #[oai(status = 500)]
    InternalError(Json<ErrorDto>),
}
