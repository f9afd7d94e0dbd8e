//! Promocode eligibility and discount arithmetic.
//!
//! Everything here is pure; services fetch the promocode row and the usage
//! flag, then call [`evaluate`].

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::core::error::AppError;
use crate::features::promocodes::models::{DiscountType, Promocode};

/// Why a promocode cannot be applied
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("Promocode not found")]
    NotFound,

    #[error("Promocode is not active")]
    Inactive,

    #[error("Promocode is not valid yet")]
    NotYetValid,

    #[error("Promocode has expired")]
    Expired,

    #[error("Order total must be at least {0}")]
    BelowMinimum(Decimal),

    #[error("Promocode usage limit reached")]
    UsageLimitReached,

    #[error("Promocode has already been used")]
    AlreadyUsed,
}

impl From<Rejection> for AppError {
    fn from(r: Rejection) -> Self {
        AppError::InvalidPromocode(r.to_string())
    }
}

/// Discount granted for a given order total
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discount {
    pub code: String,
    pub discount_type: DiscountType,
    pub value: Decimal,
    pub total: Decimal,
    pub discount: Decimal,
    pub final_total: Decimal,
}

/// Discount in whole currency units, never more than `total`
pub fn compute_discount(discount_type: DiscountType, value: Decimal, total: Decimal) -> Decimal {
    let total = total.max(Decimal::ZERO);
    let raw = match discount_type {
        DiscountType::Percentage => total * value / Decimal::ONE_HUNDRED,
        DiscountType::Fixed => value.min(total),
    };
    raw.floor().clamp(Decimal::ZERO, total)
}

/// Check every rule in order and price the discount
pub fn evaluate(
    promo: &Promocode,
    total: Decimal,
    already_used: bool,
    now: DateTime<Utc>,
) -> Result<Discount, Rejection> {
    if !promo.is_active {
        return Err(Rejection::Inactive);
    }
    if promo.valid_from.is_some_and(|from| now < from) {
        return Err(Rejection::NotYetValid);
    }
    if promo.valid_until.is_some_and(|until| now > until) {
        return Err(Rejection::Expired);
    }
    if total < promo.min_order_total {
        return Err(Rejection::BelowMinimum(promo.min_order_total));
    }
    if !has_uses_left(promo) {
        return Err(Rejection::UsageLimitReached);
    }
    if already_used {
        return Err(Rejection::AlreadyUsed);
    }

    let discount = compute_discount(promo.discount_type, promo.value, total);
    Ok(Discount {
        code: promo.code.clone(),
        discount_type: promo.discount_type,
        value: promo.value,
        total,
        discount,
        final_total: (total - discount).max(Decimal::ZERO),
    })
}

pub fn has_uses_left(promo: &Promocode) -> bool {
    promo.max_uses == 0 || promo.used_count < promo.max_uses
}

/// Outcome of the guarded `used_count` increment. No updated row means the
/// last use went to a concurrent checkout.
pub fn ensure_use_claimed(rows_affected: u64) -> Result<(), AppError> {
    if rows_affected == 0 {
        return Err(AppError::Conflict("Promocode usage limit reached".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use std::str::FromStr;
    use uuid::Uuid;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn promo(discount_type: DiscountType, value: &str) -> Promocode {
        let now = Utc::now();
        Promocode {
            id: Uuid::now_v7(),
            code: "SAVE10".to_string(),
            discount_type,
            value: dec(value),
            min_order_total: Decimal::ZERO,
            max_uses: 0,
            used_count: 0,
            is_active: true,
            valid_from: None,
            valid_until: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_save10_on_500() {
        let result = evaluate(
            &promo(DiscountType::Percentage, "10"),
            dec("500"),
            false,
            Utc::now(),
        )
        .unwrap();

        assert_eq!(result.discount, dec("50"));
        assert_eq!(result.final_total, dec("450"));
        assert_eq!(result.code, "SAVE10");
    }

    #[test]
    fn test_percentage_is_floored() {
        assert_eq!(
            compute_discount(DiscountType::Percentage, dec("15"), dec("99.99")),
            dec("14")
        );
        assert_eq!(
            compute_discount(DiscountType::Percentage, dec("100"), dec("250.50")),
            dec("250")
        );
    }

    #[test]
    fn test_fixed_never_exceeds_total() {
        let result = evaluate(
            &promo(DiscountType::Fixed, "1000"),
            dec("300"),
            false,
            Utc::now(),
        )
        .unwrap();

        assert_eq!(result.discount, dec("300"));
        assert_eq!(result.final_total, Decimal::ZERO);
    }

    #[test]
    fn test_fixed_floors_fractional_value() {
        assert_eq!(
            compute_discount(DiscountType::Fixed, dec("99.90"), dec("500")),
            dec("99")
        );
    }

    #[test]
    fn test_exhausted_code_rejected_every_time() {
        let mut p = promo(DiscountType::Percentage, "10");
        p.max_uses = 1;
        p.used_count = 1;

        for _ in 0..3 {
            assert_eq!(
                evaluate(&p, dec("500"), false, Utc::now()),
                Err(Rejection::UsageLimitReached)
            );
        }
    }

    #[test]
    fn test_unlimited_uses() {
        let mut p = promo(DiscountType::Percentage, "10");
        p.used_count = 10_000;
        assert!(evaluate(&p, dec("500"), false, Utc::now()).is_ok());
    }

    #[test]
    fn test_min_order_total() {
        let mut p = promo(DiscountType::Fixed, "100");
        p.min_order_total = dec("1000");

        assert_eq!(
            evaluate(&p, dec("999.99"), false, Utc::now()),
            Err(Rejection::BelowMinimum(dec("1000")))
        );
        assert!(evaluate(&p, dec("1000"), false, Utc::now()).is_ok());
    }

    #[test]
    fn test_validity_window() {
        let now = Utc::now();
        let mut p = promo(DiscountType::Percentage, "10");

        p.valid_from = Some(now + Duration::hours(1));
        assert_eq!(evaluate(&p, dec("500"), false, now), Err(Rejection::NotYetValid));

        p.valid_from = Some(now - Duration::hours(2));
        p.valid_until = Some(now - Duration::hours(1));
        assert_eq!(evaluate(&p, dec("500"), false, now), Err(Rejection::Expired));

        p.valid_until = Some(now + Duration::hours(1));
        assert!(evaluate(&p, dec("500"), false, now).is_ok());
    }

    #[test]
    fn test_inactive_and_already_used() {
        let mut p = promo(DiscountType::Percentage, "10");
        assert_eq!(
            evaluate(&p, dec("500"), true, Utc::now()),
            Err(Rejection::AlreadyUsed)
        );

        p.is_active = false;
        assert_eq!(
            evaluate(&p, dec("500"), false, Utc::now()),
            Err(Rejection::Inactive)
        );
    }

    #[test]
    fn test_rejection_maps_to_invalid_promocode() {
        let err: AppError = Rejection::Expired.into();
        assert!(matches!(err, AppError::InvalidPromocode(reason) if reason == "Promocode has expired"));
    }

    #[test]
    fn test_lost_use_race_is_conflict() {
        assert!(matches!(ensure_use_claimed(0), Err(AppError::Conflict(_))));
        assert!(ensure_use_claimed(1).is_ok());
    }
}
