pub mod book;
pub mod user;

pub mod prelude {
    pub use super::book::Entity as Book;
    pub use super::user::Entity as User;
}
