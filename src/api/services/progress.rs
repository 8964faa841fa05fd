use poem_openapi::payload::Json;

use crate::{
    api::models::{
        ErrorDto, LibraryEntriesResponseDto, LibraryEntryDto, MessageDto, ProgressRequestDto,
        ProgressResponseDto,
    },
    domain::{
        models::LibraryEntry,
        progress::{ProgressUpdate, UpsertOutcome, apply_progress, incomplete},
    },
    error::{ServiceError, ServiceResult},
    storage::UserRepo,
};

const MISSING_FIELDS: &str = "Invalid request. Missing required fields.";
const USER_NOT_FOUND: &str = "User not found.";

/// Check presence and ranges of a progress report. Empty strings count as missing.
pub fn validate_progress(req: ProgressRequestDto) -> ServiceResult<(String, ProgressUpdate)> {
    let email = req.email.filter(|s| !s.is_empty());
    let title = req.title.filter(|s| !s.is_empty());
    let (Some(email), Some(title), Some(current_page), Some(percentage_read)) =
        (email, title, req.current_page, req.percentage_read)
    else {
        return Err(ServiceError::Validation(MISSING_FIELDS.into()));
    };

    let current_page = u32::try_from(current_page).map_err(|_| {
        ServiceError::Validation(format!(
            "currentPage must be a non-negative integer, got {current_page}"
        ))
    })?;
    let percentage_read = u8::try_from(percentage_read)
        .ok()
        .filter(|pct| *pct <= 100)
        .ok_or_else(|| {
            ServiceError::Validation(format!(
                "percentageRead must be between 0 and 100, got {percentage_read}"
            ))
        })?;

    Ok((
        email,
        ProgressUpdate {
            title,
            image: req.image,
            current_page,
            percentage_read,
        },
    ))
}

pub struct ProgressService<'a> {
    pub users: &'a dyn UserRepo,
}

impl<'a> ProgressService<'a> {
    pub fn new(users: &'a dyn UserRepo) -> Self {
        Self { users }
    }

    /// Upsert one title's progress inside the user's record and persist the record.
    #[tracing::instrument(level = "debug", skip(self, update), fields(title = %update.title))]
    pub async fn upsert_progress(
        &self,
        email: &str,
        update: ProgressUpdate,
    ) -> ServiceResult<UpsertOutcome> {
        let mut user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or_else(|| ServiceError::NotFound(USER_NOT_FOUND.into()))?;

        let outcome = apply_progress(&mut user.library, update);
        self.users.save(&user).await?;
        tracing::debug!(?outcome, entries = user.library.len(), "progress stored");
        Ok(outcome)
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn list_incomplete(&self, email: &str) -> ServiceResult<Vec<LibraryEntry>> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or_else(|| ServiceError::NotFound(USER_NOT_FOUND.into()))?;
        Ok(incomplete(&user.library))
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn list_library(&self, email: &str) -> ServiceResult<Vec<LibraryEntry>> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or_else(|| ServiceError::NotFound(USER_NOT_FOUND.into()))?;
        Ok(user.library)
    }

    #[tracing::instrument(level = "debug", skip(self, req))]
    pub async fn save_progress(&self, req: ProgressRequestDto) -> ProgressResponseDto {
        let result = match validate_progress(req) {
            Ok((email, update)) => self.upsert_progress(&email, update).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(_) => ProgressResponseDto::Ok(Json(MessageDto {
                message: "Progress updated successfully.".into(),
            })),
            Err(ServiceError::Validation(msg)) => ProgressResponseDto::BadRequest(Json(msg.into())),
            Err(ServiceError::NotFound(msg)) => ProgressResponseDto::NotFound(Json(msg.into())),
            Err(e) => {
                tracing::error!(error = %format!("{:?}", e), "failed to save progress");
                ProgressResponseDto::InternalError(Json(ErrorDto::from("Failed to save progress.")))
            }
        }
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn wishlist(&self, email: &str) -> LibraryEntriesResponseDto {
        entries_response(self.list_incomplete(email).await, "Failed to fetch wishlist.")
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn library(&self, email: &str) -> LibraryEntriesResponseDto {
        entries_response(self.list_library(email).await, "Failed to fetch library.")
    }
}

fn entries_response(
    result: ServiceResult<Vec<LibraryEntry>>,
    failure: &str,
) -> LibraryEntriesResponseDto {
    match result {
        Ok(entries) => LibraryEntriesResponseDto::Ok(Json(
            entries.into_iter().map(LibraryEntryDto::from).collect(),
        )),
        Err(ServiceError::NotFound(msg)) => LibraryEntriesResponseDto::NotFound(Json(msg.into())),
        Err(e) => {
            tracing::error!(error = %format!("{:?}", e), "{}", failure);
            LibraryEntriesResponseDto::InternalError(Json(ErrorDto::from(failure)))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use sea_orm::DbErr;

    use super::*;
    use crate::{
        domain::models::{NewUser, User},
        storage::{StoreError, StoreResult, db::SeaUserRepo, test_db},
    };

    async fn repo_with_user(email: &str) -> SeaUserRepo {
        let repo = SeaUserRepo::new(Arc::new(test_db().await));
        repo.insert(NewUser {
            email: email.into(),
            username: "ishmael".into(),
            account_name: "Ishmael".into(),
        })
        .await
        .unwrap();
        repo
    }

    fn request(email: &str, title: &str, page: i64, pct: i64) -> ProgressRequestDto {
        ProgressRequestDto {
            email: Some(email.into()),
            title: Some(title.into()),
            image: Some("img.png".into()),
            current_page: Some(page),
            percentage_read: Some(pct),
        }
    }

    struct OfflineRepo;

    #[async_trait::async_trait]
    impl UserRepo for OfflineRepo {
        async fn find_by_email(&self, _email: &str) -> StoreResult<Option<User>> {
            Err(StoreError::Db(DbErr::Custom("store offline".into())))
        }
        async fn insert(&self, _user: NewUser) -> StoreResult<User> {
            Err(StoreError::Db(DbErr::Custom("store offline".into())))
        }
        async fn save(&self, _user: &User) -> StoreResult<()> {
            Err(StoreError::Db(DbErr::Custom("store offline".into())))
        }
        async fn ping(&self) -> StoreResult<()> {
            Err(StoreError::Db(DbErr::Custom("store offline".into())))
        }
    }

    #[test]
    fn validation_rejects_each_missing_field() {
        let full = request("a@x.com", "Moby Dick", 4, 50);
        assert!(validate_progress(full.clone()).is_ok());

        let cases = [
            ProgressRequestDto { email: None, ..full.clone() },
            ProgressRequestDto { email: Some(String::new()), ..full.clone() },
            ProgressRequestDto { title: None, ..full.clone() },
            ProgressRequestDto { title: Some(String::new()), ..full.clone() },
            ProgressRequestDto { current_page: None, ..full.clone() },
            ProgressRequestDto { percentage_read: None, ..full.clone() },
        ];
        for case in cases {
            assert!(
                matches!(validate_progress(case.clone()), Err(ServiceError::Validation(_))),
                "{case:?} should be rejected"
            );
        }
    }

    #[test]
    fn validation_accepts_missing_image_and_zero_page() {
        let req = ProgressRequestDto {
            image: None,
            ..request("a@x.com", "Moby Dick", 0, 0)
        };
        let (email, update) = validate_progress(req).unwrap();
        assert_eq!(email, "a@x.com");
        assert_eq!(update.current_page, 0);
        assert_eq!(update.image, None);
    }

    #[test]
    fn validation_rejects_out_of_range_numbers() {
        assert!(validate_progress(request("a@x.com", "T", -1, 10)).is_err());
        assert!(validate_progress(request("a@x.com", "T", 1, 101)).is_err());
        assert!(validate_progress(request("a@x.com", "T", 1, -5)).is_err());
        assert!(validate_progress(request("a@x.com", "T", 1, 100)).is_ok());
    }

    #[tokio::test]
    async fn moby_dick_example() {
        let repo = repo_with_user("a@x.com").await;
        let service = ProgressService::new(&repo);

        let res = service.save_progress(request("a@x.com", "Moby Dick", 4, 50)).await;
        assert!(matches!(res, ProgressResponseDto::Ok(_)));
        let library = service.list_library("a@x.com").await.unwrap();
        assert_eq!(
            library,
            vec![LibraryEntry {
                title: "Moby Dick".into(),
                image: Some("img.png".into()),
                current_page: 4,
                percentage_read: 50,
            }]
        );
        assert_eq!(service.list_incomplete("a@x.com").await.unwrap().len(), 1);

        let res = service.save_progress(request("a@x.com", "Moby Dick", 9, 100)).await;
        assert!(matches!(res, ProgressResponseDto::Ok(_)));
        let library = service.list_library("a@x.com").await.unwrap();
        assert_eq!(library.len(), 1);
        assert_eq!(library[0].current_page, 9);
        assert_eq!(library[0].percentage_read, 100);
        assert!(service.list_incomplete("a@x.com").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_user_is_not_found_and_nothing_changes() {
        let repo = repo_with_user("a@x.com").await;
        let service = ProgressService::new(&repo);

        let res = service.save_progress(request("ghost@x.com", "Moby Dick", 1, 10)).await;
        assert!(matches!(res, ProgressResponseDto::NotFound(_)));
        assert!(repo.find_by_email("ghost@x.com").await.unwrap().is_none());
        assert!(service.list_library("a@x.com").await.unwrap().is_empty());

        assert!(matches!(
            service.list_incomplete("ghost@x.com").await,
            Err(ServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn missing_field_is_bad_request_and_nothing_changes() {
        let repo = repo_with_user("a@x.com").await;
        let service = ProgressService::new(&repo);

        let req = ProgressRequestDto {
            percentage_read: None,
            ..request("a@x.com", "Moby Dick", 1, 10)
        };
        let res = service.save_progress(req).await;
        assert!(matches!(res, ProgressResponseDto::BadRequest(_)));
        assert!(service.list_library("a@x.com").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn store_failure_is_internal_error() {
        let service = ProgressService::new(&OfflineRepo);
        let res = service.save_progress(request("a@x.com", "Moby Dick", 1, 10)).await;
        match res {
            ProgressResponseDto::InternalError(Json(body)) => {
                assert_eq!(body.message, "Failed to save progress.")
            }
            _ => panic!("expected 500"),
        }
        assert!(matches!(
            service.wishlist("a@x.com").await,
            LibraryEntriesResponseDto::InternalError(_)
        ));
    }

    #[tokio::test]
    async fn repeated_reports_never_duplicate() {
        let repo = repo_with_user("a@x.com").await;
        let service = ProgressService::new(&repo);
        for page in 0..5 {
            let pct = ((page + 1) * 20) as i64;
            service
                .save_progress(request("a@x.com", "Dracula", page as i64, pct))
                .await;
        }
        let library = service.list_library("a@x.com").await.unwrap();
        assert_eq!(library.len(), 1);
        assert_eq!(library[0].percentage_read, 100);
    }
}
