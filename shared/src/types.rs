use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;

use crate::error::HandlerError;

// ========== ATTRIBUTES ==========

/// The slice of Cognito user attributes the finalizer cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationAttributes {
    pub sub: String,
    pub user_status: String,
    pub email: String,
    pub phone_number: String,
    pub name: String,
    pub role: Option<String>,
}

impl RegistrationAttributes {
    /// Pull the known keys out of the attribute bag. Missing values become
    /// empty strings, except `sub` which must be present and non-empty.
    pub fn from_attributes(attributes: &HashMap<String, String>) -> Result<Self, HandlerError> {
        let get = |key: &str| attributes.get(key).cloned().unwrap_or_default();

        let sub = get("sub");
        if sub.is_empty() {
            return Err(HandlerError::MissingSubject);
        }

        Ok(Self {
            sub,
            user_status: get("cognito:user_status"),
            email: get("email"),
            phone_number: get("phone_number"),
            name: get("name"),
            role: attributes.get("custom:role").cloned(),
        })
    }

    pub fn relational_user(&self) -> RelationalUser {
        RelationalUser {
            cognito_id: self.sub.clone(),
            email: self.email.clone(),
            phone: self.phone_number.clone(),
            role: Role::from_attribute(self.role.as_deref()),
        }
    }

    pub fn user_record(&self) -> UserRecord {
        UserRecord {
            user_id: self.sub.clone(),
            email: self.email.clone(),
            phone_number: self.phone_number.clone(),
            user_status: self.user_status.clone(),
        }
    }

    pub fn entity_record(&self, id: String) -> EntityRecord {
        EntityRecord {
            id,
            name: self.name.clone(),
            id_type: self.sub.clone(),
            entity_type: EntityRecord::USER_TYPE.to_string(),
        }
    }
}

// ========== ROLE ==========

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Admin,
}

impl Role {
    /// Only the literal `admin` promotes; anything else, including a
    /// missing attribute, is a plain user.
    pub fn from_attribute(value: Option<&str>) -> Self {
        match value {
            Some("admin") => Role::Admin,
            _ => Role::User,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

// ========== RECORDS ==========

/// Row in the relational users table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationalUser {
    pub cognito_id: String,
    pub email: String,
    pub phone: String,
    pub role: Role,
}

/// Item in the key-value user table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub user_id: String,
    pub email: String,
    pub phone_number: String,
    pub user_status: String,
}

impl UserRecord {
    pub fn to_item(&self) -> HashMap<String, AttributeValue> {
        HashMap::from([
            ("userId".to_string(), AttributeValue::S(self.user_id.clone())),
            ("email".to_string(), AttributeValue::S(self.email.clone())),
            ("phoneNumber".to_string(), AttributeValue::S(self.phone_number.clone())),
            ("userStatus".to_string(), AttributeValue::S(self.user_status.clone())),
        ])
    }
}

/// Item in the key-value entity table. `id_type` holds the owning subject id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityRecord {
    pub id: String,
    pub name: String,
    pub id_type: String,
    pub entity_type: String,
}

impl EntityRecord {
    pub const USER_TYPE: &'static str = "user";

    pub fn to_item(&self) -> HashMap<String, AttributeValue> {
        HashMap::from([
            ("id".to_string(), AttributeValue::S(self.id.clone())),
            ("name".to_string(), AttributeValue::S(self.name.clone())),
            ("idType".to_string(), AttributeValue::S(self.id_type.clone())),
            ("type".to_string(), AttributeValue::S(self.entity_type.clone())),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attributes(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn s(item: &HashMap<String, AttributeValue>, key: &str) -> String {
        item.get(key)
            .and_then(|v| v.as_s().ok())
            .cloned()
            .unwrap_or_else(|| panic!("missing string attribute {key}"))
    }

    #[test]
    fn test_role_from_attribute() {
        assert_eq!(Role::from_attribute(Some("admin")), Role::Admin);
        assert_eq!(Role::from_attribute(Some("Admin")), Role::User);
        assert_eq!(Role::from_attribute(Some("superuser")), Role::User);
        assert_eq!(Role::from_attribute(Some("")), Role::User);
        assert_eq!(Role::from_attribute(None), Role::User);
        assert_eq!(Role::Admin.as_str(), "admin");
        assert_eq!(Role::User.as_str(), "user");
    }

    #[test]
    fn test_missing_optional_attributes_default_to_empty() {
        let attrs = RegistrationAttributes::from_attributes(&attributes(&[("sub", "u1")])).unwrap();
        assert_eq!(attrs.sub, "u1");
        assert_eq!(attrs.email, "");
        assert_eq!(attrs.phone_number, "");
        assert_eq!(attrs.name, "");
        assert_eq!(attrs.user_status, "");
        assert_eq!(attrs.role, None);
    }

    #[test]
    fn test_missing_or_empty_sub_is_rejected() {
        let missing = RegistrationAttributes::from_attributes(&attributes(&[("email", "a@x.com")]));
        assert!(matches!(missing, Err(HandlerError::MissingSubject)));

        let empty = RegistrationAttributes::from_attributes(&attributes(&[("sub", "")]));
        assert!(matches!(empty, Err(HandlerError::MissingSubject)));
    }

    #[test]
    fn test_records_from_attributes() {
        let attrs = RegistrationAttributes::from_attributes(&attributes(&[
            ("sub", "u1"),
            ("email", "a@x.com"),
            ("phone_number", "+1555"),
            ("name", "Alice"),
            ("cognito:user_status", "CONFIRMED"),
            ("custom:role", "admin"),
        ]))
        .unwrap();

        assert_eq!(
            attrs.relational_user(),
            RelationalUser {
                cognito_id: "u1".to_string(),
                email: "a@x.com".to_string(),
                phone: "+1555".to_string(),
                role: Role::Admin,
            }
        );

        let user_item = attrs.user_record().to_item();
        assert_eq!(user_item.len(), 4);
        assert_eq!(s(&user_item, "userId"), "u1");
        assert_eq!(s(&user_item, "email"), "a@x.com");
        assert_eq!(s(&user_item, "phoneNumber"), "+1555");
        assert_eq!(s(&user_item, "userStatus"), "CONFIRMED");

        let entity_item = attrs.entity_record("42".to_string()).to_item();
        assert_eq!(entity_item.len(), 4);
        assert_eq!(s(&entity_item, "id"), "42");
        assert_eq!(s(&entity_item, "name"), "Alice");
        assert_eq!(s(&entity_item, "idType"), "u1");
        assert_eq!(s(&entity_item, "type"), "user");
    }
}
