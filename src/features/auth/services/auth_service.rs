use std::sync::Arc;

use chrono::Utc;

use crate::core::config::AuthConfig;
use crate::core::error::{AppError, Result};
use crate::features::auth::dtos::{
    AuthResponseDto, AuthUserDto, LoginWidgetRequestDto, MeResponseDto,
};
use crate::features::auth::model::{AuthenticatedUser, Role};
use crate::features::auth::services::TokenService;
use crate::features::auth::telegram::{self, TelegramUserData};
use crate::features::users::models::User;
use crate::features::users::UserService;

/// Exchanges verified Telegram identities for session tokens
pub struct AuthService {
    config: AuthConfig,
    token_service: Arc<TokenService>,
    user_service: Arc<UserService>,
}

impl AuthService {
    pub fn new(
        config: AuthConfig,
        token_service: Arc<TokenService>,
        user_service: Arc<UserService>,
    ) -> Self {
        Self {
            config,
            token_service,
            user_service,
        }
    }

    /// Login from inside the Telegram mini-app
    pub async fn login_webapp(&self, init_data: &str) -> Result<AuthResponseDto> {
        let data = telegram::verify_webapp_init_data(
            init_data,
            &self.config.bot_token,
            self.config.auth_max_age,
            Utc::now().timestamp(),
        )?;
        self.complete_login(data).await
    }

    /// Login from the browser through the Telegram Login Widget
    pub async fn login_widget(&self, payload: &LoginWidgetRequestDto) -> Result<AuthResponseDto> {
        let data = telegram::verify_login_widget(
            payload,
            &self.config.bot_token,
            self.config.auth_max_age,
            Utc::now().timestamp(),
        )?;
        self.complete_login(data).await
    }

    /// Resolve a bearer token into an identity. Customer sessions stop
    /// working as soon as the user is banned; admin sessions skip the lookup.
    pub async fn authenticate(&self, token: &str) -> Result<AuthenticatedUser> {
        let identity = self.token_service.verify(token)?;
        if !identity.is_admin() {
            self.user_service
                .ensure_not_banned(identity.telegram_id)
                .await?;
        }
        Ok(identity)
    }

    pub async fn me(&self, identity: &AuthenticatedUser) -> Result<MeResponseDto> {
        let user = self.user_service.get(identity.telegram_id).await?;
        if user.is_banned {
            return Err(AppError::Forbidden("User is banned".to_string()));
        }
        Ok(MeResponseDto {
            role: identity.role,
            user: user.into(),
        })
    }

    /// Role granted to a Telegram id
    pub fn role_for(&self, telegram_id: i64) -> Role {
        role_for(&self.config, telegram_id)
    }

    async fn complete_login(&self, data: TelegramUserData) -> Result<AuthResponseDto> {
        let user = self.user_service.upsert_from_telegram(&data).await?;
        if user.is_banned {
            tracing::info!("Rejected login of banned user {}", user.telegram_id);
            return Err(AppError::Forbidden("User is banned".to_string()));
        }

        let role = self.role_for(user.telegram_id);
        let token = self.token_service.issue(user.telegram_id, role)?;
        tracing::info!("User {} signed in as {}", user.telegram_id, role);

        Ok(AuthResponseDto {
            access_token: token.access_token,
            token_type: "Bearer".to_string(),
            expires_in: token.expires_in,
            user: auth_user(user, role),
        })
    }
}

fn role_for(config: &AuthConfig, telegram_id: i64) -> Role {
    if config.admin_telegram_ids.contains(&telegram_id) {
        Role::Admin
    } else {
        Role::Customer
    }
}

fn auth_user(user: User, role: Role) -> AuthUserDto {
    AuthUserDto {
        telegram_id: user.telegram_id,
        username: user.username,
        first_name: user.first_name,
        last_name: user.last_name,
        photo_url: user.photo_url,
        role,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::time::Duration;

    fn config(admins: &[i64]) -> AuthConfig {
        AuthConfig {
            bot_token: "123:abc".to_string(),
            session_secret: "s".repeat(32),
            session_token_ttl: Duration::from_secs(60),
            auth_max_age: Duration::from_secs(60),
            admin_telegram_ids: admins.iter().copied().collect::<HashSet<_>>(),
        }
    }

    #[test]
    fn test_admin_role_from_config() {
        let config = config(&[10, 20]);
        assert_eq!(role_for(&config, 10), Role::Admin);
        assert_eq!(role_for(&config, 20), Role::Admin);
        assert_eq!(role_for(&config, 30), Role::Customer);
    }

    #[test]
    fn test_no_admins_configured() {
        assert_eq!(role_for(&config(&[]), 10), Role::Customer);
    }
}
