// Mapping between sea-orm entities and domain models

use entities::{book, user};

use super::models::{Book, LibraryEntry, User};

pub fn map_entry(entry: user::LibraryEntry) -> LibraryEntry {
    LibraryEntry {
        title: entry.title,
        image: entry.image,
        current_page: entry.current_page,
        percentage_read: entry.percentage_read,
    }
}

pub fn map_entry_to_record(entry: &LibraryEntry) -> user::LibraryEntry {
    user::LibraryEntry {
        title: entry.title.clone(),
        image: entry.image.clone(),
        current_page: entry.current_page,
        percentage_read: entry.percentage_read,
    }
}

pub fn map_user(model: user::Model) -> User {
    User {
        id: model.id,
        email: model.email,
        username: model.username,
        account_name: model.account_name,
        library: model.library.0.into_iter().map(map_entry).collect(),
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

pub fn map_library_to_record(library: &[LibraryEntry]) -> user::Library {
    user::Library(library.iter().map(map_entry_to_record).collect())
}

pub fn map_book(model: book::Model) -> Book {
    Book {
        id: model.id,
        title: model.title,
        author: model.author,
        image: model.image,
        content_url: model.content_url,
        created_at: model.created_at,
    }
}
