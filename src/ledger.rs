//! Allocation ledger: total capacity, the free-slot heap, and the occupancy
//! indices that are derived from it.
//!
//! The ledger is plain data — callers (`ParkingService`) provide the mutual
//! exclusion. Index updates only happen through `index_vehicle` /
//! `deindex_vehicle` so the four indices can never be updated independently
//! and drift apart.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::Serialize;

use crate::heap::MinHeap;

/// Slot numbers are positive; the valid universe is `1..=capacity`.
pub type SlotNumber = u32;

/// A parked vehicle, stored with its registration and color already
/// normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vehicle {
    pub registration: String,
    pub color: String,
}

/// One row of the status report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotRecord {
    pub slot_no: SlotNumber,
    pub registration_no: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("{0}")]
    InvalidArgument(String),
    #[error("Parking lot not initialized")]
    NotInitialized,
    #[error("Parking lot is full")]
    Full,
    #[error("Vehicle {0} is already parked")]
    DuplicateVehicle(String),
    #[error("Slot {0} is already free")]
    AlreadyFree(SlotNumber),
    #[error("No parked vehicle with registration {0}")]
    NotFound(String),
}

fn invalid(msg: impl Into<String>) -> LedgerError {
    LedgerError::InvalidArgument(msg.into())
}

/// Registrations are matched case- and whitespace-insensitively. The
/// transport layer uses the same rule when it renders lookup misses.
pub(crate) fn normalize_registration(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Colors are matched case- and whitespace-insensitively.
fn normalize_color(raw: &str) -> String {
    raw.trim().to_lowercase()
}

#[derive(Debug, Default)]
pub struct ParkingLedger {
    capacity: SlotNumber,
    free: MinHeap<SlotNumber>,
    /// BTreeMap keeps the status report naturally ordered by slot.
    occupied: BTreeMap<SlotNumber, Vehicle>,
    slot_by_registration: HashMap<String, SlotNumber>,
    registrations_by_color: HashMap<String, BTreeSet<String>>,
    slots_by_color: HashMap<String, BTreeSet<SlotNumber>>,
}

impl ParkingLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn capacity(&self) -> SlotNumber {
        self.capacity
    }

    pub fn available(&self) -> usize {
        self.free.len()
    }

    pub fn occupied_count(&self) -> usize {
        self.occupied.len()
    }

    /// Reset the ledger to `capacity` empty slots.
    ///
    /// Destructive: any prior occupancy is discarded.
    pub fn init(&mut self, capacity: SlotNumber) -> Result<SlotNumber, LedgerError> {
        if capacity == 0 {
            return Err(invalid("no_of_slot must be a positive integer"));
        }
        self.capacity = capacity;
        self.free = MinHeap::from_values((1..=capacity).collect());
        self.occupied.clear();
        self.slot_by_registration.clear();
        self.registrations_by_color.clear();
        self.slots_by_color.clear();
        Ok(self.capacity)
    }

    /// Grow the lot by `increment` slots, leaving occupancy untouched.
    ///
    /// Valid on an uninitialized ledger: expanding from capacity zero
    /// establishes the lot.
    pub fn expand(&mut self, increment: SlotNumber) -> Result<SlotNumber, LedgerError> {
        if increment == 0 {
            return Err(invalid("increment_slot must be a positive integer"));
        }
        let new_capacity = self
            .capacity
            .checked_add(increment)
            .ok_or_else(|| invalid("increment_slot overflows lot capacity"))?;
        for slot in self.capacity + 1..=new_capacity {
            self.free.push(slot);
        }
        self.capacity = new_capacity;
        Ok(self.capacity)
    }

    /// Allocate the lowest-numbered free slot to a vehicle.
    pub fn park(&mut self, registration: &str, color: &str) -> Result<SlotNumber, LedgerError> {
        let registration = normalize_registration(registration);
        if registration.is_empty() {
            return Err(invalid("car_reg_no must not be empty"));
        }
        let color = normalize_color(color);
        if color.is_empty() {
            return Err(invalid("car_color must not be empty"));
        }

        if self.capacity == 0 {
            return Err(LedgerError::NotInitialized);
        }
        if self.free.is_empty() {
            return Err(LedgerError::Full);
        }
        if self.slot_by_registration.contains_key(&registration) {
            return Err(LedgerError::DuplicateVehicle(registration));
        }

        // Non-empty was checked above; pop cannot fail here.
        let Some(slot) = self.free.pop() else {
            return Err(LedgerError::Full);
        };
        self.index_vehicle(slot, Vehicle { registration, color });
        Ok(slot)
    }

    /// Free an occupied slot and re-admit it to the free heap.
    pub fn release_by_slot(&mut self, slot: SlotNumber) -> Result<SlotNumber, LedgerError> {
        if slot == 0 || slot > self.capacity {
            return Err(invalid(format!(
                "slot_number must be in 1..={}",
                self.capacity
            )));
        }
        if self.deindex_vehicle(slot).is_none() {
            return Err(LedgerError::AlreadyFree(slot));
        }
        self.free.push(slot);
        Ok(slot)
    }

    /// Free the slot held by a registration.
    pub fn release_by_registration(&mut self, registration: &str) -> Result<SlotNumber, LedgerError> {
        let registration = normalize_registration(registration);
        let slot = self
            .slot_by_registration
            .get(&registration)
            .copied()
            .ok_or(LedgerError::NotFound(registration))?;
        self.release_by_slot(slot)
    }

    /// All occupied slots, ascending by slot number.
    pub fn status(&self) -> Vec<SlotRecord> {
        self.occupied
            .iter()
            .map(|(slot, vehicle)| SlotRecord {
                slot_no: *slot,
                registration_no: vehicle.registration.clone(),
                color: vehicle.color.clone(),
            })
            .collect()
    }

    /// Registrations of parked vehicles with the given color. Unknown colors
    /// yield an empty list, not an error.
    pub fn registrations_by_color(&self, color: &str) -> Vec<String> {
        self.registrations_by_color
            .get(&normalize_color(color))
            .map(|regs| regs.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Occupied slots holding the given color, ascending. Unknown colors
    /// yield an empty list, not an error.
    pub fn slots_by_color(&self, color: &str) -> Vec<SlotNumber> {
        self.slots_by_color
            .get(&normalize_color(color))
            .map(|slots| slots.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Slot held by a registration; `None` means the vehicle is not parked.
    pub fn slot_by_registration(&self, registration: &str) -> Option<SlotNumber> {
        self.slot_by_registration
            .get(&normalize_registration(registration))
            .copied()
    }

    /// Record an occupancy in all four indices at once.
    fn index_vehicle(&mut self, slot: SlotNumber, vehicle: Vehicle) {
        self.slot_by_registration
            .insert(vehicle.registration.clone(), slot);
        self.registrations_by_color
            .entry(vehicle.color.clone())
            .or_default()
            .insert(vehicle.registration.clone());
        self.slots_by_color
            .entry(vehicle.color.clone())
            .or_default()
            .insert(slot);
        self.occupied.insert(slot, vehicle);
    }

    /// Remove an occupancy from all four indices at once, dropping color
    /// keys whose sets become empty.
    fn deindex_vehicle(&mut self, slot: SlotNumber) -> Option<Vehicle> {
        let vehicle = self.occupied.remove(&slot)?;
        self.slot_by_registration.remove(&vehicle.registration);
        if let Some(regs) = self.registrations_by_color.get_mut(&vehicle.color) {
            regs.remove(&vehicle.registration);
            if regs.is_empty() {
                self.registrations_by_color.remove(&vehicle.color);
            }
        }
        if let Some(slots) = self.slots_by_color.get_mut(&vehicle.color) {
            slots.remove(&slot);
            if slots.is_empty() {
                self.slots_by_color.remove(&vehicle.color);
            }
        }
        Some(vehicle)
    }
}
