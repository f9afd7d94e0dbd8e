//! Telegram identity verification.
//!
//! Two signed payloads are accepted:
//!
//! - **WebApp `initData`**: query string signed with
//!   `HMAC_SHA256(key = HMAC_SHA256("WebAppData", bot_token), data_check_string)`.
//! - **Login Widget**: JSON fields signed with
//!   `HMAC_SHA256(key = SHA256(bot_token), data_check_string)`.
//!
//! In both cases `data_check_string` is every field except `hash`, formatted as
//! `key=value`, sorted by key and joined with `\n`.

use std::collections::BTreeMap;
use std::time::Duration;

use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::core::error::AppError;
use crate::features::auth::dtos::LoginWidgetRequestDto;

type HmacSha256 = Hmac<Sha256>;

/// Tolerated clock skew for an `auth_date` ahead of the server clock
const MAX_CLOCK_SKEW_SECS: i64 = 60;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TelegramAuthError {
    #[error("Missing '{0}' parameter")]
    MissingField(&'static str),

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Authorization data is too old ({0} seconds)")]
    Expired(i64),

    #[error("Authorization date is {0} seconds in the future")]
    FromFuture(i64),

    #[error("Malformed user data: {0}")]
    MalformedUser(String),
}

impl From<TelegramAuthError> for AppError {
    fn from(e: TelegramAuthError) -> Self {
        AppError::Auth(e.to_string())
    }
}

/// Telegram profile fields shared by both login flows
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct TelegramUserData {
    pub id: i64,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: Option<String>,
    pub photo_url: Option<String>,
    pub language_code: Option<String>,
}

/// Verify WebApp `initData` and return the embedded user.
pub fn verify_webapp_init_data(
    init_data: &str,
    bot_token: &str,
    max_age: Duration,
    now_unix: i64,
) -> Result<TelegramUserData, TelegramAuthError> {
    let mut params = parse_query(init_data);

    let received_hash = params
        .remove("hash")
        .ok_or(TelegramAuthError::MissingField("hash"))?;

    let secret_key = hmac_sha256(b"WebAppData", bot_token.as_bytes());
    verify_signature(&secret_key, &params, &received_hash)?;

    let auth_date = params
        .get("auth_date")
        .and_then(|v| v.parse::<i64>().ok())
        .ok_or(TelegramAuthError::MissingField("auth_date"))?;
    check_freshness(auth_date, max_age, now_unix)?;

    let user_json = params
        .get("user")
        .ok_or(TelegramAuthError::MissingField("user"))?;

    serde_json::from_str(user_json).map_err(|e| TelegramAuthError::MalformedUser(e.to_string()))
}

/// Verify a Login Widget payload and return the user it describes.
pub fn verify_login_widget(
    payload: &LoginWidgetRequestDto,
    bot_token: &str,
    max_age: Duration,
    now_unix: i64,
) -> Result<TelegramUserData, TelegramAuthError> {
    let mut fields = BTreeMap::new();
    fields.insert("id".to_string(), payload.id.to_string());
    fields.insert("auth_date".to_string(), payload.auth_date.to_string());
    let optional = [
        ("first_name", &payload.first_name),
        ("last_name", &payload.last_name),
        ("username", &payload.username),
        ("photo_url", &payload.photo_url),
    ];
    for (key, value) in optional {
        if let Some(value) = value {
            fields.insert(key.to_string(), value.clone());
        }
    }

    let secret_key = Sha256::digest(bot_token.as_bytes());
    verify_signature(&secret_key, &fields, &payload.hash)?;
    check_freshness(payload.auth_date, max_age, now_unix)?;

    Ok(TelegramUserData {
        id: payload.id,
        first_name: payload.first_name.clone(),
        last_name: payload.last_name.clone(),
        username: payload.username.clone(),
        photo_url: payload.photo_url.clone(),
        language_code: None,
    })
}

fn parse_query(raw: &str) -> BTreeMap<String, String> {
    raw.split('&')
        .filter_map(|pair| {
            let (key, value) = pair.split_once('=')?;
            let value = urlencoding::decode(value).ok()?;
            Some((key.to_string(), value.into_owned()))
        })
        .collect()
}

pub(crate) fn data_check_string(fields: &BTreeMap<String, String>) -> String {
    fields
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("\n")
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can take key of any size");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}

fn verify_signature(
    secret_key: &[u8],
    fields: &BTreeMap<String, String>,
    received_hash: &str,
) -> Result<(), TelegramAuthError> {
    let expected = hex::decode(received_hash).map_err(|_| TelegramAuthError::InvalidSignature)?;

    let mut mac =
        HmacSha256::new_from_slice(secret_key).map_err(|_| TelegramAuthError::InvalidSignature)?;
    mac.update(data_check_string(fields).as_bytes());
    mac.verify_slice(&expected)
        .map_err(|_| TelegramAuthError::InvalidSignature)
}

fn check_freshness(auth_date: i64, max_age: Duration, now_unix: i64) -> Result<(), TelegramAuthError> {
    let age = now_unix - auth_date;
    if age < -MAX_CLOCK_SKEW_SECS {
        return Err(TelegramAuthError::FromFuture(-age));
    }
    if age > max_age.as_secs() as i64 {
        return Err(TelegramAuthError::Expired(age));
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Build a correctly signed initData query string
    pub fn signed_init_data(bot_token: &str, user_json: &str, auth_date: i64) -> String {
        signed_init_data_with(bot_token, user_json, auth_date, None)
    }

    /// Same as [`signed_init_data`], optionally carrying the Ed25519
    /// `signature` field current clients send alongside `hash`
    pub fn signed_init_data_with(
        bot_token: &str,
        user_json: &str,
        auth_date: i64,
        signature: Option<&str>,
    ) -> String {
        let mut fields = BTreeMap::new();
        fields.insert("auth_date".to_string(), auth_date.to_string());
        fields.insert("query_id".to_string(), "AAHdF6IQAAAAAN0XohDhrOrc".to_string());
        fields.insert("user".to_string(), user_json.to_string());
        if let Some(signature) = signature {
            fields.insert("signature".to_string(), signature.to_string());
        }

        let secret_key = hmac_sha256(b"WebAppData", bot_token.as_bytes());
        let hash = hex::encode(hmac_sha256(&secret_key, data_check_string(&fields).as_bytes()));

        let mut query: Vec<String> = fields
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect();
        query.push(format!("hash={}", hash));
        query.join("&")
    }

    /// Sign a Login Widget payload in place
    pub fn sign_widget(payload: &mut LoginWidgetRequestDto, bot_token: &str) {
        let mut fields = BTreeMap::new();
        fields.insert("id".to_string(), payload.id.to_string());
        fields.insert("auth_date".to_string(), payload.auth_date.to_string());
        if let Some(v) = &payload.first_name {
            fields.insert("first_name".to_string(), v.clone());
        }
        if let Some(v) = &payload.username {
            fields.insert("username".to_string(), v.clone());
        }
        let secret_key = Sha256::digest(bot_token.as_bytes());
        payload.hash = hex::encode(hmac_sha256(&secret_key, data_check_string(&fields).as_bytes()));
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    const BOT_TOKEN: &str = "123456:ABC-DEF1234ghIkl-zyx57W2v1u123ew11";
    const NOW: i64 = 1_700_000_000;
    const DAY: Duration = Duration::from_secs(86400);
    const USER: &str = r#"{"id":279058397,"first_name":"Vlad","username":"vlad","language_code":"en"}"#;

    #[test]
    fn test_valid_init_data() {
        let init_data = signed_init_data(BOT_TOKEN, USER, NOW - 60);
        let user = verify_webapp_init_data(&init_data, BOT_TOKEN, DAY, NOW).unwrap();
        assert_eq!(user.id, 279058397);
        assert_eq!(user.first_name.as_deref(), Some("Vlad"));
        assert_eq!(user.language_code.as_deref(), Some("en"));
    }

    #[test]
    fn test_tampered_init_data() {
        let init_data = signed_init_data(BOT_TOKEN, USER, NOW - 60);
        let tampered = init_data.replace("279058397", "1");
        let result = verify_webapp_init_data(&tampered, BOT_TOKEN, DAY, NOW);
        assert_eq!(result, Err(TelegramAuthError::InvalidSignature));
    }

    #[test]
    fn test_wrong_bot_token() {
        let init_data = signed_init_data(BOT_TOKEN, USER, NOW - 60);
        let result = verify_webapp_init_data(&init_data, "other:token", DAY, NOW);
        assert_eq!(result, Err(TelegramAuthError::InvalidSignature));
    }

    #[test]
    fn test_stale_init_data() {
        let init_data = signed_init_data(BOT_TOKEN, USER, NOW - 2 * 86400);
        let result = verify_webapp_init_data(&init_data, BOT_TOKEN, DAY, NOW);
        assert!(matches!(result, Err(TelegramAuthError::Expired(_))));
    }

    #[test]
    fn test_init_data_with_signature_field() {
        let init_data = signed_init_data_with(
            BOT_TOKEN,
            USER,
            NOW - 60,
            Some("kB2Vv1Ey8Cwd4bQ4d0cE3cZq1FZ9xR8n3mW0pL6tYhA-IjPnM1sQd2Y7uX5oB8rT"),
        );
        assert!(init_data.contains("signature="));

        let user = verify_webapp_init_data(&init_data, BOT_TOKEN, DAY, NOW).unwrap();
        assert_eq!(user.id, 279058397);
    }

    #[test]
    fn test_signature_field_is_signed() {
        let init_data = signed_init_data_with(BOT_TOKEN, USER, NOW - 60, Some("original"));
        let tampered = init_data.replace("signature=original", "signature=forged");
        let result = verify_webapp_init_data(&tampered, BOT_TOKEN, DAY, NOW);
        assert_eq!(result, Err(TelegramAuthError::InvalidSignature));
    }

    #[test]
    fn test_future_auth_date_rejected() {
        let init_data = signed_init_data(BOT_TOKEN, USER, NOW + 3600);
        let result = verify_webapp_init_data(&init_data, BOT_TOKEN, DAY, NOW);
        assert_eq!(result, Err(TelegramAuthError::FromFuture(3600)));
    }

    #[test]
    fn test_small_clock_skew_tolerated() {
        let init_data = signed_init_data(BOT_TOKEN, USER, NOW + 30);
        assert!(verify_webapp_init_data(&init_data, BOT_TOKEN, DAY, NOW).is_ok());
    }

    #[test]
    fn test_missing_hash() {
        let result =
            verify_webapp_init_data("user={\"id\":123}&auth_date=1234567890", BOT_TOKEN, DAY, NOW);
        assert_eq!(result, Err(TelegramAuthError::MissingField("hash")));
    }

    #[test]
    fn test_valid_login_widget() {
        let mut payload = LoginWidgetRequestDto {
            id: 42,
            first_name: Some("Ann".to_string()),
            last_name: None,
            username: Some("ann".to_string()),
            photo_url: None,
            auth_date: NOW - 10,
            hash: String::new(),
        };
        sign_widget(&mut payload, BOT_TOKEN);

        let user = verify_login_widget(&payload, BOT_TOKEN, DAY, NOW).unwrap();
        assert_eq!(user.id, 42);
        assert_eq!(user.username.as_deref(), Some("ann"));
    }

    #[test]
    fn test_tampered_login_widget() {
        let mut payload = LoginWidgetRequestDto {
            id: 42,
            first_name: Some("Ann".to_string()),
            last_name: None,
            username: None,
            photo_url: None,
            auth_date: NOW - 10,
            hash: String::new(),
        };
        sign_widget(&mut payload, BOT_TOKEN);
        payload.id = 43;

        let result = verify_login_widget(&payload, BOT_TOKEN, DAY, NOW);
        assert_eq!(result, Err(TelegramAuthError::InvalidSignature));
    }

    #[test]
    fn test_data_check_string_sorted() {
        let mut fields = BTreeMap::new();
        fields.insert("user".to_string(), "u".to_string());
        fields.insert("auth_date".to_string(), "1".to_string());
        assert_eq!(data_check_string(&fields), "auth_date=1\nuser=u");
    }
}
