use super::models::{PropertyId, TransactionId};

/// Something observers of the registry should hear about.
///
/// `RegistrationSubmitted` and `TransferInitiated` are raised synchronously by
/// the store operations; the other two only when a delayed confirmation
/// actually changed a record.
#[derive(Debug, Clone, PartialEq)]
pub enum RegistryEvent {
    RegistrationSubmitted {
        property_id: PropertyId,
        address: String,
    },
    PropertyConfirmed {
        property_id: PropertyId,
        address: String,
    },
    TransferInitiated {
        transaction_id: TransactionId,
        property_id: PropertyId,
        new_owner: String,
    },
    TransferCompleted {
        transaction_id: TransactionId,
        property_id: PropertyId,
        new_owner: String,
    },
}
