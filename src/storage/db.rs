use std::sync::Arc;

use chrono::Utc;
use entities::{book, user};
use sea_orm::{
    ActiveModelTrait, ActiveValue::{Set, Unchanged}, ColumnTrait, DatabaseConnection, DbErr,
    EntityTrait, Order, PaginatorTrait, QueryFilter, QueryOrder, SqlErr, sea_query::Expr,
};
use uuid::Uuid;

use super::{CatalogRepo, StoreError, StoreResult, UserRepo};
use crate::domain::{
    mapping::{map_book, map_library_to_record, map_user},
    models::{Book, NewBook, NewUser, User},
};

fn classify(err: DbErr) -> StoreError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => StoreError::Conflict(detail),
        _ => StoreError::Db(err),
    }
}

pub struct SeaUserRepo {
    db: Arc<DatabaseConnection>,
}

impl SeaUserRepo {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl UserRepo for SeaUserRepo {
    #[tracing::instrument(level = "debug", skip(self))]
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let found = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(self.db.as_ref())
            .await?;
        Ok(found.map(map_user))
    }

    #[tracing::instrument(level = "debug", skip(self, new_user), fields(email = %new_user.email))]
    async fn insert(&self, new_user: NewUser) -> StoreResult<User> {
        let now = Utc::now();
        let model = user::ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(new_user.email),
            username: Set(new_user.username),
            account_name: Set(new_user.account_name),
            library: Set(user::Library::default()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(self.db.as_ref())
        .await
        .map_err(classify)?;
        Ok(map_user(model))
    }

    #[tracing::instrument(
        level = "debug",
        skip(self, user),
        fields(email = %user.email, entries = user.library.len())
    )]
    async fn save(&self, user: &User) -> StoreResult<()> {
        user::ActiveModel {
            id: Unchanged(user.id),
            email: Set(user.email.clone()),
            username: Set(user.username.clone()),
            account_name: Set(user.account_name.clone()),
            library: Set(map_library_to_record(&user.library)),
            created_at: Unchanged(user.created_at),
            updated_at: Set(Utc::now()),
        }
        .update(self.db.as_ref())
        .await
        .map_err(classify)?;
        Ok(())
    }

    async fn ping(&self) -> StoreResult<()> {
        self.db.ping().await?;
        Ok(())
    }
}

pub struct SeaCatalogRepo {
    db: Arc<DatabaseConnection>,
}

impl SeaCatalogRepo {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl CatalogRepo for SeaCatalogRepo {
    #[tracing::instrument(level = "debug", skip(self))]
    async fn list(&self, author: Option<&str>) -> StoreResult<Vec<Book>> {
        let mut query = book::Entity::find();
        if let Some(author) = author {
            query = query.filter(book::Column::Author.eq(author));
        }
        let books = query
            .order_by_asc(book::Column::CreatedAt)
            // sqlite rowid breaks ties between rows created in the same instant
            .order_by(Expr::cust("rowid"), Order::Asc)
            .all(self.db.as_ref())
            .await?;
        Ok(books.into_iter().map(map_book).collect())
    }

    #[tracing::instrument(level = "debug", skip(self, new_book), fields(title = %new_book.title))]
    async fn insert(&self, new_book: NewBook) -> StoreResult<Book> {
        let model = book::ActiveModel {
            id: Set(Uuid::new_v4()),
            title: Set(new_book.title),
            author: Set(new_book.author),
            image: Set(new_book.image),
            content_url: Set(new_book.content_url),
            created_at: Set(Utc::now()),
        }
        .insert(self.db.as_ref())
        .await
        .map_err(classify)?;
        Ok(map_book(model))
    }

    async fn count(&self) -> StoreResult<u64> {
        Ok(book::Entity::find().count(self.db.as_ref()).await?)
    }
}
