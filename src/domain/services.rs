//! The registry state store.
//!
//! [`RegistryStore`] owns every property and transaction record and is the
//! only thing allowed to change them. Registrations and transfers are
//! applied in two steps: the record is appended right away in a pending
//! state, and a confirmation is queued that fires once its delay has
//! elapsed on the store's clock (see [`RegistryStore::tick`]).

use super::events::RegistryEvent;
use super::models::{
    Coordinates, Property, PropertyId, PropertyStatus, PropertyType, RegistrationInput,
    Transaction, TransactionId, TransactionStatus,
};
use super::scheduler::{Clock, DelayQueue, SystemClock};
use chrono::{NaiveDate, TimeZone, Utc};
use std::collections::VecDeque;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Height shown before any confirmation has fired.
pub const GENESIS_BLOCK_HEIGHT: u64 = 1_234_567;

/// How long simulated confirmations take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmationDelays {
    pub registration: Duration,
    pub transfer: Duration,
}

impl Default for ConfirmationDelays {
    fn default() -> Self {
        Self {
            registration: Duration::from_millis(3000),
            transfer: Duration::from_millis(4000),
        }
    }
}

/// Work queued by an operation. Holds ids only; records are looked up again
/// when the action fires.
#[derive(Debug, Clone, PartialEq)]
enum PendingAction {
    ConfirmRegistration {
        property_id: PropertyId,
    },
    CompleteTransfer {
        transaction_id: TransactionId,
        property_id: PropertyId,
        new_owner: String,
    },
}

/// In-memory land registry with simulated confirmation delays.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use land_registry::domain::{
///     ConfirmationDelays, Coordinates, ManualClock, PropertyStatus, PropertyType,
///     RegistrationInput, RegistryStore,
/// };
///
/// let clock = ManualClock::new();
/// let mut store = RegistryStore::with_clock(ConfirmationDelays::default(), Box::new(clock.clone()));
///
/// let property = store.register_property(RegistrationInput {
///     address: "1 Elm St".to_string(),
///     owner: "Alice".to_string(),
///     property_type: PropertyType::Residential,
///     area: 1000.0,
///     value: 100_000.0,
///     coordinates: Coordinates::default(),
/// });
/// assert_eq!(property.status, PropertyStatus::Pending);
///
/// clock.advance(Duration::from_secs(3));
/// store.tick();
/// assert_eq!(store.find_property(property.id).unwrap().status, PropertyStatus::Active);
/// ```
#[derive(Debug)]
pub struct RegistryStore {
    properties: Vec<Property>,
    transactions: Vec<Transaction>,
    pending: DelayQueue<PendingAction>,
    events: VecDeque<RegistryEvent>,
    delays: ConfirmationDelays,
    clock: Box<dyn Clock>,
    block_height: u64,
}

impl Default for RegistryStore {
    fn default() -> Self {
        Self::new(ConfirmationDelays::default())
    }
}

impl RegistryStore {
    /// Creates an empty store driven by the system clock.
    pub fn new(delays: ConfirmationDelays) -> Self {
        Self::with_clock(delays, Box::new(SystemClock))
    }

    pub fn with_clock(delays: ConfirmationDelays, clock: Box<dyn Clock>) -> Self {
        Self {
            properties: Vec::new(),
            transactions: Vec::new(),
            pending: DelayQueue::new(),
            events: VecDeque::new(),
            delays,
            clock,
            block_height: GENESIS_BLOCK_HEIGHT,
        }
    }

    /// Loads the two demo parcels and the transfer that gave John Smith the
    /// first one. Seeded records are already confirmed.
    pub fn seed_demo_data(&mut self) {
        let maple = Property {
            id: PropertyId::generate(),
            address: "123 Maple Street, Springfield".to_string(),
            owner: "John Smith".to_string(),
            property_type: PropertyType::Residential,
            area: 2500.0,
            value: 450_000.0,
            registration_date: seed_date(2023, 1, 15),
            status: PropertyStatus::Active,
            coordinates: Coordinates {
                lat: 40.7128,
                lng: -74.0060,
            },
            document_hash: cosmetic_hash(""),
        };
        let oak = Property {
            id: PropertyId::generate(),
            address: "456 Oak Avenue, Springfield".to_string(),
            owner: "Sarah Johnson".to_string(),
            property_type: PropertyType::Residential,
            area: 1800.0,
            value: 320_000.0,
            registration_date: seed_date(2023, 3, 22),
            status: PropertyStatus::Active,
            coordinates: Coordinates {
                lat: 40.7589,
                lng: -73.9851,
            },
            document_hash: cosmetic_hash(""),
        };
        let purchase = Transaction {
            id: TransactionId::generate(),
            property_id: maple.id,
            from_owner: "Michael Brown".to_string(),
            to_owner: "John Smith".to_string(),
            value: 450_000.0,
            timestamp: Utc
                .with_ymd_and_hms(2023, 1, 15, 10, 30, 0)
                .single()
                .unwrap_or_else(Utc::now),
            status: TransactionStatus::Completed,
            block_hash: cosmetic_hash("block"),
        };

        self.properties.push(maple);
        self.properties.push(oak);
        self.transactions.push(purchase);
        info!(
            properties = self.properties.len(),
            transactions = self.transactions.len(),
            "seeded demo registry"
        );
    }

    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn find_property(&self, id: PropertyId) -> Option<&Property> {
        self.properties.iter().find(|p| p.id == id)
    }

    pub fn find_transaction(&self, id: TransactionId) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id == id)
    }

    /// Current instant according to the store's clock.
    pub fn now(&self) -> Instant {
        self.clock.now()
    }

    /// Cosmetic chain height; grows by one per fired confirmation.
    pub fn block_height(&self) -> u64 {
        self.block_height
    }

    /// Number of confirmations that have not fired yet.
    pub fn pending_confirmations(&self) -> usize {
        self.pending.len()
    }

    /// Appends a new pending property and queues its confirmation.
    ///
    /// Input is assumed valid; the registration form checks it first.
    /// Returns a copy of the record as it was appended.
    pub fn register_property(&mut self, input: RegistrationInput) -> Property {
        let property = Property {
            id: PropertyId::generate(),
            address: input.address,
            owner: input.owner,
            property_type: input.property_type,
            area: input.area,
            value: input.value,
            registration_date: Utc::now().date_naive(),
            status: PropertyStatus::Pending,
            coordinates: input.coordinates,
            document_hash: cosmetic_hash(""),
        };

        let due = self.clock.now() + self.delays.registration;
        self.pending.schedule(
            due,
            PendingAction::ConfirmRegistration {
                property_id: property.id,
            },
        );
        self.properties.push(property.clone());

        info!(property_id = %property.id, address = %property.address, "registration submitted");
        debug!(property_id = %property.id, delay_ms = self.delays.registration.as_millis() as u64, "confirmation scheduled");
        self.events.push_back(RegistryEvent::RegistrationSubmitted {
            property_id: property.id,
            address: property.address.clone(),
        });

        property
    }

    /// Records a pending transfer of `property_id` to `new_owner` and queues
    /// its completion.
    ///
    /// An unknown id is ignored: nothing is recorded or scheduled and `None`
    /// is returned.
    pub fn transfer_property(&mut self, property_id: PropertyId, new_owner: &str) -> Option<Transaction> {
        let Some(property) = self.find_property(property_id) else {
            warn!(property_id = %property_id, "transfer requested for unknown property, ignoring");
            return None;
        };

        let transaction = Transaction {
            id: TransactionId::generate(),
            property_id,
            from_owner: property.owner.clone(),
            to_owner: new_owner.to_string(),
            value: property.value,
            timestamp: Utc::now(),
            status: TransactionStatus::Pending,
            block_hash: cosmetic_hash("block"),
        };

        let due = self.clock.now() + self.delays.transfer;
        self.pending.schedule(
            due,
            PendingAction::CompleteTransfer {
                transaction_id: transaction.id,
                property_id,
                new_owner: new_owner.to_string(),
            },
        );
        self.transactions.push(transaction.clone());

        info!(
            transaction_id = %transaction.id,
            property_id = %property_id,
            from = %transaction.from_owner,
            to = %transaction.to_owner,
            "transfer initiated"
        );
        self.events.push_back(RegistryEvent::TransferInitiated {
            transaction_id: transaction.id,
            property_id,
            new_owner: new_owner.to_string(),
        });

        Some(transaction)
    }

    /// Drops a property record. Transactions that reference it are kept.
    pub fn remove_property(&mut self, id: PropertyId) -> Option<Property> {
        let index = self.properties.iter().position(|p| p.id == id)?;
        let removed = self.properties.remove(index);
        info!(property_id = %id, "property removed");
        Some(removed)
    }

    /// Fires every confirmation whose deadline has passed, earliest first.
    ///
    /// Returns how many fired, including ones whose records had vanished.
    pub fn tick(&mut self) -> usize {
        let now = self.clock.now();
        let mut fired = 0;
        while let Some(action) = self.pending.pop_due(now) {
            self.apply(action);
            self.block_height += 1;
            fired += 1;
        }
        fired
    }

    /// Takes every event raised since the last call, oldest first.
    pub fn drain_events(&mut self) -> Vec<RegistryEvent> {
        self.events.drain(..).collect()
    }

    fn apply(&mut self, action: PendingAction) {
        match action {
            PendingAction::ConfirmRegistration { property_id } => {
                let Some(property) = self.properties.iter_mut().find(|p| p.id == property_id) else {
                    debug!(property_id = %property_id, "confirmation fired for removed property");
                    return;
                };
                property.status = PropertyStatus::Active;
                info!(property_id = %property_id, block = self.block_height + 1, "property confirmed");
                self.events.push_back(RegistryEvent::PropertyConfirmed {
                    property_id,
                    address: property.address.clone(),
                });
            }
            PendingAction::CompleteTransfer {
                transaction_id,
                property_id,
                new_owner,
            } => {
                let mut applied = false;

                if let Some(property) = self.properties.iter_mut().find(|p| p.id == property_id) {
                    property.owner = new_owner.clone();
                    applied = true;
                } else {
                    debug!(property_id = %property_id, "transfer completed for removed property");
                }

                if let Some(transaction) = self.transactions.iter_mut().find(|t| t.id == transaction_id) {
                    transaction.status = TransactionStatus::Completed;
                    applied = true;
                } else {
                    debug!(transaction_id = %transaction_id, "transfer completed for removed transaction");
                }

                if applied {
                    info!(
                        transaction_id = %transaction_id,
                        property_id = %property_id,
                        new_owner = %new_owner,
                        "transfer completed"
                    );
                    self.events.push_back(RegistryEvent::TransferCompleted {
                        transaction_id,
                        property_id,
                        new_owner,
                    });
                }
            }
        }
    }
}

fn cosmetic_hash(prefix: &str) -> String {
    format!("0x{prefix}{}", Uuid::new_v4().simple())
}

fn seed_date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MIN)
}
