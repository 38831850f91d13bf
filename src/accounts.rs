//! Role-dispatched account lookup over the three disjoint account tables.
//!
//! Matched accounts are carried as a tagged union with a common
//! `{id, display_name, credential}` surface so handlers never branch on raw
//! role strings.

use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use uuid::Uuid;

use crate::entities::{farmer, shelter, vet};
use crate::error::AppError;
use crate::normalize::normalize_aadhaar;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Role {
    Farmer,
    Vet,
    Shelter,
}

impl Role {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "farmer" => Some(Role::Farmer),
            "vet" => Some(Role::Vet),
            "shelter" => Some(Role::Shelter),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Farmer => "farmer",
            Role::Vet => "vet",
            Role::Shelter => "shelter",
        }
    }

    /// "Farmer" / "Vet" / "Shelter", for human-readable messages.
    pub fn capitalized(&self) -> &'static str {
        match self {
            Role::Farmer => "Farmer",
            Role::Vet => "Vet",
            Role::Shelter => "Shelter",
        }
    }
}

pub enum Account {
    Farmer(farmer::Model),
    Vet(vet::Model),
    Shelter(shelter::Model),
}

impl Account {
    pub fn id(&self) -> Uuid {
        match self {
            Account::Farmer(m) => m.id,
            Account::Vet(m) => m.id,
            Account::Shelter(m) => m.id,
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            Account::Farmer(m) => &m.name,
            Account::Vet(m) => &m.name,
            Account::Shelter(m) => &m.name,
        }
    }

    /// `None` for a pre-provisioned farmer that has not set a password yet.
    pub fn credential(&self) -> Option<&str> {
        match self {
            Account::Farmer(m) => m.password_hash.as_deref(),
            Account::Vet(m) => Some(&m.password_hash),
            Account::Shelter(m) => Some(&m.password_hash),
        }
    }

    pub fn role(&self) -> Role {
        match self {
            Account::Farmer(_) => Role::Farmer,
            Account::Vet(_) => Role::Vet,
            Account::Shelter(_) => Role::Shelter,
        }
    }
}

/// Locates the account a login identifier refers to. Farmer identifiers are
/// Aadhaar numbers; if normalization fails the raw string is used as the
/// lookup key (lenient on purpose — malformed input still attempts a lookup
/// instead of hard-failing). Vet and shelter identifiers match the stored
/// lowercase email.
pub async fn find_for_login(
    db: &DatabaseConnection,
    role: Role,
    identifier: &str,
) -> Result<Option<Account>, AppError> {
    match role {
        Role::Farmer => {
            let key = normalize_aadhaar(identifier).unwrap_or_else(|_| identifier.to_string());
            let found = farmer::Entity::find()
                .filter(farmer::Column::Aadhaar.eq(key))
                .one(db)
                .await?;
            Ok(found.map(Account::Farmer))
        }
        Role::Vet => {
            let found = vet::Entity::find()
                .filter(vet::Column::Email.eq(identifier.to_lowercase()))
                .one(db)
                .await?;
            Ok(found.map(Account::Vet))
        }
        Role::Shelter => {
            let found = shelter::Entity::find()
                .filter(shelter::Column::Email.eq(identifier.to_lowercase()))
                .one(db)
                .await?;
            Ok(found.map(Account::Shelter))
        }
    }
}

/// Deletes the account and re-queries to confirm removal. A record that
/// survives its own deletion is a fatal integrity failure, not a best-effort
/// miss. Deleting a well-formed id with no matching record succeeds.
pub async fn delete_and_verify(
    db: &DatabaseConnection,
    role: Role,
    id: Uuid,
) -> Result<(), AppError> {
    let survived = match role {
        Role::Farmer => {
            farmer::Entity::delete_by_id(id).exec(db).await?;
            farmer::Entity::find_by_id(id).one(db).await?.is_some()
        }
        Role::Vet => {
            vet::Entity::delete_by_id(id).exec(db).await?;
            vet::Entity::find_by_id(id).one(db).await?.is_some()
        }
        Role::Shelter => {
            shelter::Entity::delete_by_id(id).exec(db).await?;
            shelter::Entity::find_by_id(id).one(db).await?.is_some()
        }
    };

    if survived {
        return Err(AppError::Integrity(
            "Deletion attempted but record still exists".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_parsing_is_case_insensitive() {
        assert_eq!(Role::parse("farmer"), Some(Role::Farmer));
        assert_eq!(Role::parse("Vet"), Some(Role::Vet));
        assert_eq!(Role::parse("SHELTER"), Some(Role::Shelter));
        assert_eq!(Role::parse("admin"), None);
        assert_eq!(Role::parse(""), None);
    }

    #[test]
    fn capitalized_names_match_roles() {
        assert_eq!(Role::Farmer.capitalized(), "Farmer");
        assert_eq!(Role::Shelter.as_str(), "shelter");
    }
}
