//! Account, authentication and customer dashboard bodies.

use serde::{Deserialize, Serialize};

use super::Role;
use super::orders::OrderSummary;
use crate::validation::{Validate, ValidationError, check_email, check_length};

/// Body of `POST /auth/register`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

impl Validate for RegisterRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        check_length("firstName", &self.first_name, 3, None)?;
        check_length("lastName", &self.last_name, 3, None)?;
        check_length("email", &self.email, 5, None)?;
        check_email("email", &self.email)?;
        check_length("password", &self.password, 6, Some(14))
    }
}

/// Body of `POST /auth/login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl Validate for LoginRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        check_email("email", &self.email)?;
        check_length("password", &self.password, 1, None)
    }
}

/// Body of `POST /auth/register/auth0`: an account created by an external
/// identity provider, known only by its e-mail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalRegisterRequest {
    pub email: String,
}

impl Validate for ExternalRegisterRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        check_email("email", &self.email)
    }
}

/// The single postal address kept per account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressBook {
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub apartment: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub phone: String,
}

impl AddressBook {
    /// Apply `update`, keeping the stored value for every absent or blank
    /// field.
    pub fn merged(&self, update: &AddressUpdate) -> AddressBook {
        fn pick(new: &Option<String>, old: &str) -> String {
            match new.as_deref().map(str::trim) {
                Some(value) if !value.is_empty() => value.to_string(),
                _ => old.to_string(),
            }
        }
        AddressBook {
            address: pick(&update.address, &self.address),
            apartment: pick(&update.apartment, &self.apartment),
            city: pick(&update.city, &self.city),
            country: pick(&update.country, &self.country),
            phone: pick(&update.phone, &self.phone),
        }
    }
}

/// Body of `PUT /users/changeAddress`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressUpdate {
    pub address: Option<String>,
    pub apartment: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub phone: Option<String>,
}

impl Validate for AddressUpdate {
    fn validate(&self) -> Result<(), ValidationError> {
        let fields = [
            ("address", &self.address, 5),
            ("apartment", &self.apartment, 5),
            ("city", &self.city, 5),
            ("country", &self.country, 5),
            ("phone", &self.phone, 7),
        ];
        for (field, value, min) in fields {
            if let Some(value) = value.as_deref().filter(|v| !v.trim().is_empty()) {
                check_length(field, value, min, None)?;
            }
        }
        Ok(())
    }
}

/// An account without its password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i32,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: String,
    pub addresses: AddressBook,
    pub role: Role,
    /// Unix timestamp of when the account was created.
    pub created_at: i64,
}

/// Body returned by `POST /users/overview`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerOverview {
    #[serde(flatten)]
    pub profile: UserProfile,
    pub orders: Vec<OrderSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register() -> RegisterRequest {
        RegisterRequest {
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            email: "jane@example.com".to_string(),
            password: "hunter22".to_string(),
        }
    }

    #[test]
    fn test_register_validation() {
        assert!(register().validate().is_ok());

        let short_name = RegisterRequest {
            first_name: " Jo ".to_string(),
            ..register()
        };
        assert_eq!(short_name.validate().unwrap_err().field, "firstName");

        let bad_email = RegisterRequest {
            email: "jane.example.com".to_string(),
            ..register()
        };
        assert_eq!(bad_email.validate().unwrap_err().field, "email");

        let long_password = RegisterRequest {
            password: "a-very-long-password".to_string(),
            ..register()
        };
        assert_eq!(long_password.validate().unwrap_err().field, "password");
    }

    #[test]
    fn test_address_merge_keeps_blank_fields() {
        let stored = AddressBook {
            address: "12 Palm Street".to_string(),
            apartment: "Villa 3".to_string(),
            city: "Dubai".to_string(),
            country: "United Arab Emirates".to_string(),
            phone: "+971500000000".to_string(),
        };
        let update = AddressUpdate {
            city: Some("Abu Dhabi".to_string()),
            phone: Some("   ".to_string()),
            ..AddressUpdate::default()
        };
        let merged = stored.merged(&update);
        assert_eq!(merged.city, "Abu Dhabi");
        assert_eq!(merged.phone, stored.phone);
        assert_eq!(merged.address, stored.address);
    }

    #[test]
    fn test_address_update_validation_skips_blank() {
        let update = AddressUpdate {
            phone: Some("".to_string()),
            city: Some("Dubai".to_string()),
            ..AddressUpdate::default()
        };
        assert!(update.validate().is_ok());

        let update = AddressUpdate {
            phone: Some("123".to_string()),
            ..AddressUpdate::default()
        };
        assert_eq!(update.validate().unwrap_err().field, "phone");
    }
}
