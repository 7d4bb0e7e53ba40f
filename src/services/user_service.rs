use std::sync::Arc;

use mongodb::bson::oid::ObjectId;
use validator::Validate;

use crate::{
    auth::{hash_password, verify_password, JwtService},
    errors::{AppError, AppResult},
    models::{
        domain::User,
        dto::{
            request::{LoginRequest, RegisterRequest, UpdateProfileRequest},
            response::{AuthResponse, UserDto},
        },
    },
    repositories::UserRepository,
};

const USER_EXISTS: &str = "User already exists";
const INVALID_CREDENTIALS: &str = "Invalid email or password";

pub struct UserService {
    repository: Arc<dyn UserRepository>,
    jwt_service: Arc<JwtService>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository>, jwt_service: Arc<JwtService>) -> Self {
        Self {
            repository,
            jwt_service,
        }
    }

    pub async fn register(&self, request: RegisterRequest) -> AppResult<AuthResponse> {
        request.validate()?;

        let email = request.email.trim().to_lowercase();
        self.ensure_available(None, Some(&request.username), Some(&email))
            .await?;

        let password_hash = hash_password(&request.password)?;
        let user = User::new(
            &request.username,
            &email,
            password_hash,
            request.role.unwrap_or_default(),
        );
        let user = self.repository.create(user).await?;

        log::info!("Registered {} user {}", user.role.as_str(), user.username);
        self.auth_response(user)
    }

    pub async fn login(&self, request: LoginRequest) -> AppResult<AuthResponse> {
        request.validate()?;

        let user = self
            .repository
            .find_by_email(request.email.trim())
            .await?
            .ok_or_else(|| AppError::Unauthorized(INVALID_CREDENTIALS.to_string()))?;

        if !verify_password(&request.password, &user.password_hash)? {
            log::warn!("Failed login for {}", user.username);
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        self.auth_response(user)
    }

    pub async fn get_profile(&self, user_id: &ObjectId) -> AppResult<UserDto> {
        let user = self.load(user_id).await?;
        Ok(UserDto::from(user))
    }

    pub async fn update_profile(
        &self,
        user_id: &ObjectId,
        request: UpdateProfileRequest,
    ) -> AppResult<UserDto> {
        request.validate()?;

        let mut user = self.load(user_id).await?;
        let email = request.email.map(|e| e.trim().to_lowercase());

        let username_changed = request.username.as_ref().filter(|u| **u != user.username);
        let email_changed = email.as_ref().filter(|e| **e != user.email);
        self.ensure_available(
            Some(user_id),
            username_changed.map(String::as_str),
            email_changed.map(String::as_str),
        )
        .await?;

        if let Some(username) = request.username {
            user.username = username;
        }
        if let Some(email) = email {
            user.email = email;
        }
        if let Some(password) = request.password {
            user.password_hash = hash_password(&password)?;
        }

        let user = self.repository.update(user).await?;
        log::info!("Updated profile of user {}", user.id);
        Ok(UserDto::from(user))
    }

    async fn load(&self, user_id: &ObjectId) -> AppResult<User> {
        self.repository
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    /// Fails when another account already holds `username` or `email`.
    async fn ensure_available(
        &self,
        current: Option<&ObjectId>,
        username: Option<&str>,
        email: Option<&str>,
    ) -> AppResult<()> {
        let taken = |user: Option<User>| user.is_some_and(|u| Some(&u.id) != current);

        if let Some(username) = username {
            if taken(self.repository.find_by_username(username).await?) {
                return Err(AppError::ValidationError(USER_EXISTS.to_string()));
            }
        }
        if let Some(email) = email {
            if taken(self.repository.find_by_email(email).await?) {
                return Err(AppError::ValidationError(USER_EXISTS.to_string()));
            }
        }
        Ok(())
    }

    fn auth_response(&self, user: User) -> AppResult<AuthResponse> {
        let token = self.jwt_service.create_token(&user)?;
        Ok(AuthResponse {
            id: user.id.to_hex(),
            username: user.username,
            email: user.email,
            role: user.role,
            token,
        })
    }
}
