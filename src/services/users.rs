//! Authentication, user and social-graph service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::user::{
        Follow, RegisterUser, UpdateProfile, User, UserClaims, UserProfile, UserSummary,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
    config: AuthConfig,
}

impl UsersService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Register a new account
    pub async fn register(&self, request: RegisterUser) -> AppResult<UserProfile> {
        if self.repository.users.username_exists(&request.username).await? {
            return Err(AppError::Conflict("Username already taken".to_string()));
        }

        let hash = self.hash_password(&request.password)?;
        let user = self
            .repository
            .users
            .create(&request.username, request.email.as_deref(), &hash)
            .await?;

        tracing::info!(user_id = user.id, "user registered");
        Ok(user.into())
    }

    /// Authenticate by username and password, returning a JWT token
    pub async fn authenticate(&self, username: &str, password: &str) -> AppResult<(String, User)> {
        let user = self
            .repository
            .users
            .get_by_username(username)
            .await?
            .ok_or_else(|| {
                AppError::Authentication("Invalid username or password".to_string())
            })?;

        if !self.verify_password(&user, password)? {
            return Err(AppError::Authentication(
                "Invalid username or password".to_string(),
            ));
        }

        let now = Utc::now().timestamp();
        let claims = UserClaims {
            sub: user.username.clone(),
            user_id: user.id,
            exp: now + (self.config.jwt_expiration_hours as i64 * 3600),
            iat: now,
        };

        let token = claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))?;

        Ok((token, user))
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<UserProfile> {
        let user = self.repository.users.get_by_id(id).await?;
        Ok(user.into())
    }

    /// List users, paginated
    pub async fn list(&self, limit: i64, offset: i64) -> AppResult<Vec<UserSummary>> {
        self.repository
            .users
            .list(limit.clamp(1, 200), offset.max(0))
            .await
    }

    /// Update own profile; a password change requires the current password
    pub async fn update_profile(
        &self,
        user_id: i32,
        profile: UpdateProfile,
    ) -> AppResult<UserProfile> {
        let user = self.repository.users.get_by_id(user_id).await?;

        if profile.new_password.is_some() {
            let current = profile.current_password.as_ref().ok_or_else(|| {
                AppError::Validation(
                    "Current password required to change password".to_string(),
                )
            })?;
            if !self.verify_password(&user, current)? {
                return Err(AppError::Authentication(
                    "Current password is incorrect".to_string(),
                ));
            }
        }

        let password_hash = match &profile.new_password {
            Some(new_password) => Some(self.hash_password(new_password)?),
            None => None,
        };

        let updated = self
            .repository
            .users
            .update_profile(user_id, &profile, password_hash)
            .await?;
        Ok(updated.into())
    }

    /// Follow another user
    pub async fn follow(&self, follower_id: i32, following_id: i32) -> AppResult<Follow> {
        if follower_id == following_id {
            return Err(AppError::Validation("Cannot follow yourself".to_string()));
        }
        // Verify target exists
        self.repository.users.get_by_id(following_id).await?;

        self.repository.users.follow(follower_id, following_id).await
    }

    /// Remove an own follow edge
    pub async fn unfollow(&self, id: i32, follower_id: i32) -> AppResult<()> {
        self.repository.users.unfollow(id, follower_id).await
    }

    /// Follows created by a user
    pub async fn follows_of(&self, follower_id: i32) -> AppResult<Vec<Follow>> {
        self.repository.users.follows_of(follower_id).await
    }

    fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
        Ok(hash.to_string())
    }

    fn verify_password(&self, user: &User, password: &str) -> AppResult<bool> {
        let parsed = PasswordHash::new(&user.password_hash)
            .map_err(|e| AppError::Internal(format!("Invalid stored password hash: {}", e)))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }
}
