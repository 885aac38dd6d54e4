use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! opaque_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Generates a fresh random identifier.
            pub fn generate() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn as_uuid(&self) -> Uuid {
                self.0
            }

            /// First eight hex digits, used where a full id does not fit.
            pub fn short(&self) -> String {
                self.0.simple().to_string()[..8].to_string()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

opaque_id!(
    /// Identifier of a registered property.
    PropertyId
);

opaque_id!(
    /// Identifier of an ownership transfer.
    TransactionId
);

/// Kind of land parcel offered by the registration form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    Residential,
    Commercial,
    Industrial,
    Agricultural,
    Recreational,
}

impl PropertyType {
    pub const ALL: [PropertyType; 5] = [
        PropertyType::Residential,
        PropertyType::Commercial,
        PropertyType::Industrial,
        PropertyType::Agricultural,
        PropertyType::Recreational,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PropertyType::Residential => "Residential",
            PropertyType::Commercial => "Commercial",
            PropertyType::Industrial => "Industrial",
            PropertyType::Agricultural => "Agricultural",
            PropertyType::Recreational => "Recreational",
        }
    }

    fn position(&self) -> usize {
        Self::ALL.iter().position(|t| t == self).unwrap_or(0)
    }

    pub fn next(&self) -> Self {
        Self::ALL[(self.position() + 1) % Self::ALL.len()]
    }

    pub fn previous(&self) -> Self {
        let len = Self::ALL.len();
        Self::ALL[(self.position() + len - 1) % len]
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Lifecycle status of a property.
///
/// `Transferred` is part of the record format but no registry operation
/// ever assigns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyStatus {
    Pending,
    Active,
    Transferred,
}

impl PropertyStatus {
    pub fn label(&self) -> &'static str {
        match self {
            PropertyStatus::Pending => "pending",
            PropertyStatus::Active => "active",
            PropertyStatus::Transferred => "transferred",
        }
    }
}

impl fmt::Display for PropertyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Lifecycle status of a transfer. `Failed` is never produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Completed,
    Failed,
}

impl TransactionStatus {
    pub fn label(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "pending",
            TransactionStatus::Completed => "completed",
            TransactionStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// A registered land parcel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub id: PropertyId,
    pub address: String,
    pub owner: String,
    pub property_type: PropertyType,
    /// Square feet.
    pub area: f64,
    pub value: f64,
    pub registration_date: NaiveDate,
    pub status: PropertyStatus,
    pub coordinates: Coordinates,
    /// Cosmetic; not a digest of anything.
    pub document_hash: String,
}

/// An ownership transfer request and its resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub property_id: PropertyId,
    pub from_owner: String,
    pub to_owner: String,
    pub value: f64,
    pub timestamp: DateTime<Utc>,
    pub status: TransactionStatus,
    /// Cosmetic; not a digest of anything.
    pub block_hash: String,
}

/// Validated input for a new registration.
#[derive(Debug, Clone, PartialEq)]
pub struct RegistrationInput {
    pub address: String,
    pub owner: String,
    pub property_type: PropertyType,
    pub area: f64,
    pub value: f64,
    pub coordinates: Coordinates,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_distinct() {
        let a = PropertyId::generate();
        let b = PropertyId::generate();
        assert_ne!(a, b);
        assert_ne!(TransactionId::generate(), TransactionId::generate());
    }

    #[test]
    fn test_short_id_is_prefix_of_hex_form() {
        let id = PropertyId::generate();
        let short = id.short();
        assert_eq!(short.len(), 8);
        assert!(id.as_uuid().simple().to_string().starts_with(&short));
        assert!(id.to_string().starts_with(&short));
    }

    #[test]
    fn test_property_type_cycles() {
        assert_eq!(PropertyType::Residential.next(), PropertyType::Commercial);
        assert_eq!(PropertyType::Recreational.next(), PropertyType::Residential);
        assert_eq!(PropertyType::Residential.previous(), PropertyType::Recreational);
        for kind in PropertyType::ALL {
            assert_eq!(kind.next().previous(), kind);
        }
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(PropertyStatus::Pending.to_string(), "pending");
        assert_eq!(TransactionStatus::Completed.label(), "completed");
        assert_eq!(PropertyType::Agricultural.to_string(), "Agricultural");
    }

    #[test]
    fn test_property_json_shape() {
        let property = Property {
            id: PropertyId::generate(),
            address: "1 Elm St".to_string(),
            owner: "Alice".to_string(),
            property_type: PropertyType::Residential,
            area: 1000.0,
            value: 100_000.0,
            registration_date: NaiveDate::from_ymd_opt(2023, 1, 15).unwrap(),
            status: PropertyStatus::Pending,
            coordinates: Coordinates::default(),
            document_hash: "0xabc".to_string(),
        };
        let json = serde_json::to_value(&property).unwrap();
        assert_eq!(json["id"], property.id.to_string());
        assert_eq!(json["property_type"], "residential");
        assert_eq!(json["status"], "pending");
        assert_eq!(json["registration_date"], "2023-01-15");

        let back: Property = serde_json::from_value(json).unwrap();
        assert_eq!(back, property);
    }
}
