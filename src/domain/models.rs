// Domain models, independent of both the database entities and the HTTP DTOs

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A user's reading progress for one title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryEntry {
    pub title: String,
    pub image: Option<String>,
    pub current_page: u32,
    /// 0 - 100, as computed by the reader
    pub percentage_read: u8,
}

impl LibraryEntry {
    pub fn is_complete(&self) -> bool {
        self.percentage_read >= 100
    }
}

#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub account_name: String,
    /// Insertion order, not reading order.
    pub library: Vec<LibraryEntry>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub account_name: String,
}

#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub username: Option<String>,
    pub account_name: Option<String>,
}

impl ProfileChanges {
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.account_name.is_none()
    }

    pub fn apply(self, user: &mut User) {
        if let Some(username) = self.username {
            user.username = username;
        }
        if let Some(account_name) = self.account_name {
            user.account_name = account_name;
        }
    }
}

#[derive(Debug, Clone)]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub image: Option<String>,
    pub content_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBook {
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub content_url: Option<String>,
}
