//! Access rules and argument checks applied before a call reaches an actor.

use super::ServiceError;
use crate::model::{Principal, Product, UserProfile};
use tracing::warn;

/// Tunables for argument validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServicePolicy {
    /// Largest quantity a single order may ask for.
    pub max_order_quantity: u32,
}

impl Default for ServicePolicy {
    fn default() -> Self {
        Self {
            max_order_quantity: 50,
        }
    }
}

pub(crate) fn require_authenticated(caller: &Principal, operation: &str) -> Result<(), ServiceError> {
    if caller.is_anonymous() {
        warn!(operation, "Denied anonymous caller");
        return Err(ServiceError::PermissionDenied(format!(
            "{operation} requires an authenticated caller"
        )));
    }
    Ok(())
}

pub(crate) fn require_admin(caller: &Principal, is_admin: bool, operation: &str) -> Result<(), ServiceError> {
    if !is_admin {
        warn!(%caller, operation, "Denied non-admin caller");
        return Err(ServiceError::PermissionDenied(format!(
            "{operation} is restricted to admins"
        )));
    }
    Ok(())
}

/// Checks an order request and returns the trimmed room number.
pub(crate) fn validate_order(
    policy: &ServicePolicy,
    products: &[Product],
    quantity: u32,
    room_number: &str,
) -> Result<String, ServiceError> {
    if products.is_empty() {
        return Err(ServiceError::InvalidArgument("an order needs at least one product".into()));
    }
    validate_products(products)?;
    if quantity == 0 || quantity > policy.max_order_quantity {
        return Err(ServiceError::InvalidArgument(format!(
            "quantity must be between 1 and {}, got {quantity}",
            policy.max_order_quantity
        )));
    }
    let room_number = room_number.trim();
    if room_number.is_empty() {
        return Err(ServiceError::InvalidArgument("room number is required".into()));
    }
    Ok(room_number.to_string())
}

pub(crate) fn validate_products(products: &[Product]) -> Result<(), ServiceError> {
    match products.iter().find(|p| p.name.trim().is_empty()) {
        Some(p) => Err(ServiceError::InvalidArgument(format!("{} has no name", p.id))),
        None => Ok(()),
    }
}

/// Trims the name and drops a blank room number.
pub(crate) fn normalize_profile(profile: UserProfile) -> Result<UserProfile, ServiceError> {
    let name = profile.name.trim();
    if name.is_empty() {
        return Err(ServiceError::InvalidArgument("profile name is required".into()));
    }
    let room_number = profile
        .room_number
        .map(|room| room.trim().to_string())
        .filter(|room| !room.is_empty());
    Ok(UserProfile::new(name, room_number))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stick() -> Vec<Product> {
        vec![Product::new(1, "Stick")]
    }

    #[test]
    fn test_order_bounds() {
        let policy = ServicePolicy::default();
        assert_eq!(validate_order(&policy, &stick(), 1, " 101 ").unwrap(), "101");
        assert!(validate_order(&policy, &stick(), 50, "101").is_ok());
        assert!(validate_order(&policy, &stick(), 0, "101").is_err());
        assert!(validate_order(&policy, &stick(), 51, "101").is_err());
        assert!(validate_order(&policy, &stick(), 1, "   ").is_err());
        assert!(validate_order(&policy, &[], 1, "101").is_err());
        assert!(validate_order(&policy, &[Product::new(2, " ")], 1, "101").is_err());
    }

    #[test]
    fn test_profile_normalization() {
        let profile = normalize_profile(UserProfile::new("  Asha ", Some("  ".into()))).unwrap();
        assert_eq!(profile, UserProfile::new("Asha", None));

        let profile = normalize_profile(UserProfile::new("Asha", Some(" 204 ".into()))).unwrap();
        assert_eq!(profile.room_number.as_deref(), Some("204"));

        assert!(matches!(
            normalize_profile(UserProfile::new("", None)),
            Err(ServiceError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_anonymous_is_denied() {
        let err = require_authenticated(&Principal::anonymous(), "placeOrder").unwrap_err();
        assert!(matches!(err, ServiceError::PermissionDenied(_)));
        assert!(require_authenticated(&Principal::new("aaaaa-aa"), "placeOrder").is_ok());

        // blank identity text never authenticates
        assert!(require_authenticated(&Principal::new(""), "placeOrder").is_err());
        assert!(require_authenticated(&Principal::new("anonymous"), "placeOrder").is_ok());
    }
}
