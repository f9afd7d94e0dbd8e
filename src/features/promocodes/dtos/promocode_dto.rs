use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::features::promocodes::models::{DiscountType, Promocode};
use crate::features::promocodes::rules::Discount;
use crate::shared::validation::PROMOCODE_REGEX;

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CheckPromocodeDto {
    #[validate(length(min = 1, max = 64, message = "Code is required"))]
    pub code: String,

    /// Order total to price against; defaults to the current cart total
    #[schema(value_type = Option<String>)]
    pub total: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PromocodeCheckResponseDto {
    pub code: String,
    pub discount_type: DiscountType,
    #[schema(value_type = String)]
    pub value: Decimal,
    #[schema(value_type = String)]
    pub total: Decimal,
    #[schema(value_type = String)]
    pub discount: Decimal,
    #[schema(value_type = String)]
    pub final_total: Decimal,
}

impl From<Discount> for PromocodeCheckResponseDto {
    fn from(d: Discount) -> Self {
        Self {
            code: d.code,
            discount_type: d.discount_type,
            value: d.value,
            total: d.total,
            discount: d.discount,
            final_total: d.final_total,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PromocodeResponseDto {
    pub id: Uuid,
    pub code: String,
    pub discount_type: DiscountType,
    #[schema(value_type = String)]
    pub value: Decimal,
    #[schema(value_type = String)]
    pub min_order_total: Decimal,
    pub max_uses: i32,
    pub used_count: i32,
    pub is_active: bool,
    pub valid_from: Option<DateTime<Utc>>,
    pub valid_until: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Promocode> for PromocodeResponseDto {
    fn from(p: Promocode) -> Self {
        Self {
            id: p.id,
            code: p.code,
            discount_type: p.discount_type,
            value: p.value,
            min_order_total: p.min_order_total,
            max_uses: p.max_uses,
            used_count: p.used_count,
            is_active: p.is_active,
            valid_from: p.valid_from,
            valid_until: p.valid_until,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_create_promocode"))]
pub struct CreatePromocodeDto {
    #[validate(regex(
        path = *PROMOCODE_REGEX,
        message = "Code must be 3-32 letters, digits, '-' or '_'"
    ))]
    pub code: String,

    pub discount_type: DiscountType,

    #[schema(value_type = String, example = "10")]
    pub value: Decimal,

    #[serde(default)]
    #[schema(value_type = String, example = "0")]
    pub min_order_total: Decimal,

    /// 0 means unlimited
    #[serde(default)]
    #[validate(range(min = 0, message = "max_uses cannot be negative"))]
    pub max_uses: i32,

    #[serde(default = "default_true")]
    pub is_active: bool,

    pub valid_from: Option<DateTime<Utc>>,
    pub valid_until: Option<DateTime<Utc>>,
}

/// Partial update, absent fields are left unchanged. The code itself is
/// immutable because orders snapshot it.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdatePromocodeDto {
    pub discount_type: Option<DiscountType>,

    #[schema(value_type = Option<String>)]
    pub value: Option<Decimal>,

    #[schema(value_type = Option<String>)]
    pub min_order_total: Option<Decimal>,

    #[validate(range(min = 0, message = "max_uses cannot be negative"))]
    pub max_uses: Option<i32>,

    pub is_active: Option<bool>,

    /// Absent keeps the current bound, `null` removes it
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub valid_from: Option<Option<DateTime<Utc>>>,

    /// Absent keeps the current bound, `null` removes it
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub valid_until: Option<Option<DateTime<Utc>>>,
}

impl UpdatePromocodeDto {
    /// Validity window once this update is applied over the stored one
    pub fn merged_window(
        &self,
        current_from: Option<DateTime<Utc>>,
        current_until: Option<DateTime<Utc>>,
    ) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
        (
            self.valid_from.unwrap_or(current_from),
            self.valid_until.unwrap_or(current_until),
        )
    }
}

/// Tell an explicit `null` (`Some(None)`) apart from a missing field (`None`)
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn default_true() -> bool {
    true
}

fn validate_create_promocode(dto: &CreatePromocodeDto) -> Result<(), ValidationError> {
    check_terms(
        dto.discount_type,
        dto.value,
        dto.min_order_total,
        dto.valid_from,
        dto.valid_until,
    )
}

/// Value bounds per discount type plus a well-ordered validity window
pub fn check_terms(
    discount_type: DiscountType,
    value: Decimal,
    min_order_total: Decimal,
    valid_from: Option<DateTime<Utc>>,
    valid_until: Option<DateTime<Utc>>,
) -> Result<(), ValidationError> {
    match discount_type {
        DiscountType::Percentage if value <= Decimal::ZERO || value > Decimal::ONE_HUNDRED => {
            return Err(ValidationError::new("value")
                .with_message("Percentage must be greater than 0 and at most 100".into()));
        }
        DiscountType::Fixed if value <= Decimal::ZERO => {
            return Err(ValidationError::new("value")
                .with_message("Fixed discount must be positive".into()));
        }
        _ => {}
    }

    if min_order_total.is_sign_negative() {
        return Err(ValidationError::new("min_order_total")
            .with_message("Minimum order total cannot be negative".into()));
    }

    if let (Some(from), Some(until)) = (valid_from, valid_until) {
        if from > until {
            return Err(ValidationError::new("valid_until")
                .with_message("valid_until must not precede valid_from".into()));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(json: &str) -> CreatePromocodeDto {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_valid_percentage_code() {
        let dto = create(r#"{"code":"SAVE10","discount_type":"percentage","value":"10"}"#);
        assert!(dto.validate().is_ok());
        assert!(dto.is_active);
        assert_eq!(dto.max_uses, 0);
    }

    #[test]
    fn test_percentage_over_hundred_rejected() {
        let dto = create(r#"{"code":"HALF","discount_type":"percentage","value":"150"}"#);
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_zero_fixed_rejected() {
        let dto = create(r#"{"code":"NOTHING","discount_type":"fixed","value":"0"}"#);
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_bad_code_rejected() {
        let dto = create(r#"{"code":"no spaces","discount_type":"fixed","value":"5"}"#);
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_inverted_window_rejected() {
        let dto = create(
            r#"{"code":"WINDOW","discount_type":"fixed","value":"5",
                "valid_from":"2026-02-01T00:00:00Z","valid_until":"2026-01-01T00:00:00Z"}"#,
        );
        assert!(dto.validate().is_err());
    }

    fn update(json: &str) -> UpdatePromocodeDto {
        serde_json::from_str(json).unwrap()
    }

    fn at(raw: &str) -> DateTime<Utc> {
        raw.parse().unwrap()
    }

    #[test]
    fn test_update_absent_bounds_keep_window() {
        let dto = update(r#"{"value":"15"}"#);
        let from = Some(at("2026-01-01T00:00:00Z"));
        let until = Some(at("2026-02-01T00:00:00Z"));
        assert_eq!(dto.merged_window(from, until), (from, until));
    }

    #[test]
    fn test_update_null_clears_single_bound() {
        let dto = update(r#"{"valid_until":null}"#);
        assert_eq!(dto.valid_until, Some(None));
        assert_eq!(dto.valid_from, None);

        let from = Some(at("2026-01-01T00:00:00Z"));
        let until = Some(at("2026-02-01T00:00:00Z"));
        assert_eq!(dto.merged_window(from, until), (from, None));
    }

    #[test]
    fn test_update_replaces_one_bound_and_clears_other() {
        let dto = update(r#"{"valid_from":null,"valid_until":"2026-03-01T00:00:00Z"}"#);
        let merged = dto.merged_window(Some(at("2026-01-01T00:00:00Z")), None);
        assert_eq!(merged, (None, Some(at("2026-03-01T00:00:00Z"))));
    }
}
