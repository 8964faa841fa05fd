use poem_openapi::payload::Json;

use crate::{
    api::models::{
        ErrorDto, UserCreateRequestDto, UserCreateResponseDto, UserProfileDto,
        UserProfileResponseDto, UserUpdateRequestDto,
    },
    domain::models::{NewUser, ProfileChanges, User},
    error::{ServiceError, ServiceResult},
    storage::UserRepo,
};

pub struct UserService<'a> {
    pub users: &'a dyn UserRepo,
}

fn non_blank(field: &str, value: String) -> ServiceResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ServiceError::Validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

impl<'a> UserService<'a> {
    pub fn new(users: &'a dyn UserRepo) -> Self {
        Self { users }
    }

    #[tracing::instrument(level = "debug", skip(self, req), fields(email = %req.email))]
    pub async fn create_user(&self, req: UserCreateRequestDto) -> ServiceResult<User> {
        let email = non_blank("email", req.email)?;
        if !email.contains('@') {
            return Err(ServiceError::Validation(format!("Invalid email: {email}")));
        }
        let new_user = NewUser {
            email,
            username: non_blank("username", req.username)?,
            account_name: non_blank("accountName", req.account_name)?,
        };
        match self.users.insert(new_user).await {
            Ok(user) => {
                tracing::info!(user_id = %user.id, "registered user");
                Ok(user)
            }
            Err(e) => match ServiceError::from(e) {
                ServiceError::Conflict(_) => Err(ServiceError::Conflict(
                    "A user with this email already exists.".into(),
                )),
                other => Err(other),
            },
        }
    }

    pub async fn get_profile(&self, email: &str) -> ServiceResult<User> {
        self.users
            .find_by_email(email)
            .await?
            .ok_or_else(|| ServiceError::NotFound("User not found.".into()))
    }

    #[tracing::instrument(level = "debug", skip(self, req))]
    pub async fn update_profile(
        &self,
        email: &str,
        req: UserUpdateRequestDto,
    ) -> ServiceResult<User> {
        let changes = ProfileChanges {
            username: req.username.map(|v| non_blank("username", v)).transpose()?,
            account_name: req
                .account_name
                .map(|v| non_blank("accountName", v))
                .transpose()?,
        };
        if changes.is_empty() {
            return Err(ServiceError::Validation("Nothing to update.".into()));
        }
        let mut user = self.get_profile(email).await?;
        changes.apply(&mut user);
        self.users.save(&user).await?;
        Ok(user)
    }

    pub async fn register(&self, req: UserCreateRequestDto) -> UserCreateResponseDto {
        match self.create_user(req).await {
            Ok(user) => UserCreateResponseDto::Created(Json(UserProfileDto::from(user))),
            Err(ServiceError::Validation(msg)) => {
                UserCreateResponseDto::BadRequest(Json(msg.into()))
            }
            Err(ServiceError::Conflict(msg)) => UserCreateResponseDto::Conflict(Json(msg.into())),
            Err(e) => {
                tracing::error!(error = %format!("{:?}", e), "failed to create user");
                UserCreateResponseDto::InternalError(Json(ErrorDto::from("Failed to create user.")))
            }
        }
    }

    pub async fn profile(&self, email: &str) -> UserProfileResponseDto {
        profile_response(self.get_profile(email).await)
    }

    pub async fn update(&self, email: &str, req: UserUpdateRequestDto) -> UserProfileResponseDto {
        profile_response(self.update_profile(email, req).await)
    }
}

fn profile_response(result: ServiceResult<User>) -> UserProfileResponseDto {
    match result {
        Ok(user) => UserProfileResponseDto::Ok(Json(UserProfileDto::from(user))),
        Err(ServiceError::Validation(msg)) => UserProfileResponseDto::BadRequest(Json(msg.into())),
        Err(ServiceError::NotFound(msg)) => UserProfileResponseDto::NotFound(Json(msg.into())),
        Err(e) => {
            tracing::error!(error = %format!("{:?}", e), "user profile request failed");
            UserProfileResponseDto::InternalError(Json(ErrorDto::from(
                "Failed to load user profile.",
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::storage::{db::SeaUserRepo, test_db};

    fn signup(email: &str) -> UserCreateRequestDto {
        UserCreateRequestDto {
            email: email.into(),
            username: " queequeg ".into(),
            account_name: "Queequeg".into(),
        }
    }

    #[tokio::test]
    async fn create_trims_and_rejects_duplicates() {
        let repo = SeaUserRepo::new(Arc::new(test_db().await));
        let service = UserService::new(&repo);

        let user = service.create_user(signup("q@pequod.com")).await.unwrap();
        assert_eq!(user.username, "queequeg");
        assert!(user.library.is_empty());

        let err = service.create_user(signup("q@pequod.com")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
    }

    #[tokio::test]
    async fn create_validates_input() {
        let repo = SeaUserRepo::new(Arc::new(test_db().await));
        let service = UserService::new(&repo);

        assert!(matches!(
            service.create_user(signup("not-an-email")).await,
            Err(ServiceError::Validation(_))
        ));
        let blank = UserCreateRequestDto {
            username: "   ".into(),
            ..signup("q@pequod.com")
        };
        assert!(matches!(
            service.create_user(blank).await,
            Err(ServiceError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn update_changes_only_given_fields() {
        let repo = SeaUserRepo::new(Arc::new(test_db().await));
        let service = UserService::new(&repo);
        service.create_user(signup("q@pequod.com")).await.unwrap();

        let updated = service
            .update_profile(
                "q@pequod.com",
                UserUpdateRequestDto {
                    username: None,
                    account_name: Some("Harpooneer".into()),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.username, "queequeg");
        assert_eq!(updated.account_name, "Harpooneer");

        let reloaded = service.get_profile("q@pequod.com").await.unwrap();
        assert_eq!(reloaded.account_name, "Harpooneer");

        assert!(matches!(
            service
                .update_profile("q@pequod.com", UserUpdateRequestDto::default())
                .await,
            Err(ServiceError::Validation(_))
        ));
        assert!(matches!(
            service
                .update_profile(
                    "nobody@pequod.com",
                    UserUpdateRequestDto {
                        username: Some("x".into()),
                        account_name: None,
                    }
                )
                .await,
            Err(ServiceError::NotFound(_))
        ));
    }
}
