//! ParkingService: transport-agnostic access to the allocation ledger.
//!
//! This service owns:
//! - The ledger behind a reader-writer lock (every mutation is one write-locked
//!   critical section; queries share a read lock)
//! - Shutdown coordination (signal handlers and the /shutdown endpoint both
//!   feed the same watch channel)
//!
//! Transports (HTTP today) delegate to this service; no allocation logic
//! lives in the transport layer.

use tokio::sync::{RwLock, watch};

use crate::ledger::{LedgerError, ParkingLedger, SlotNumber, SlotRecord};
use crate::version::VersionInfo;

/// Point-in-time counts for the health endpoint.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct LedgerSnapshot {
    pub total_slots: SlotNumber,
    pub available_slots: usize,
    pub occupied_slots: usize,
}

pub struct ParkingService {
    ledger: RwLock<ParkingLedger>,

    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,

    version: VersionInfo,
    started_at: String,
}

impl Default for ParkingService {
    fn default() -> Self {
        Self::new()
    }
}

impl ParkingService {
    pub fn new() -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        Self {
            ledger: RwLock::new(ParkingLedger::new()),
            shutdown_tx,
            shutdown_rx,
            version: VersionInfo::new(),
            started_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub async fn init(&self, capacity: SlotNumber) -> Result<SlotNumber, LedgerError> {
        let total = self.ledger.write().await.init(capacity)?;
        tracing::info!(total_slots = total, "Parking lot initialized");
        Ok(total)
    }

    pub async fn expand(&self, increment: SlotNumber) -> Result<SlotNumber, LedgerError> {
        let total = self.ledger.write().await.expand(increment)?;
        tracing::info!(total_slots = total, increment, "Parking lot expanded");
        Ok(total)
    }

    pub async fn park(&self, registration: &str, color: &str) -> Result<SlotNumber, LedgerError> {
        let slot = self.ledger.write().await.park(registration, color)?;
        tracing::debug!(slot, "Vehicle parked");
        Ok(slot)
    }

    pub async fn release_by_slot(&self, slot: SlotNumber) -> Result<SlotNumber, LedgerError> {
        let freed = self.ledger.write().await.release_by_slot(slot)?;
        tracing::debug!(slot = freed, "Slot freed");
        Ok(freed)
    }

    pub async fn release_by_registration(
        &self,
        registration: &str,
    ) -> Result<SlotNumber, LedgerError> {
        let freed = self
            .ledger
            .write()
            .await
            .release_by_registration(registration)?;
        tracing::debug!(slot = freed, "Slot freed");
        Ok(freed)
    }

    pub async fn status(&self) -> Vec<SlotRecord> {
        self.ledger.read().await.status()
    }

    pub async fn registrations_by_color(&self, color: &str) -> Vec<String> {
        self.ledger.read().await.registrations_by_color(color)
    }

    pub async fn slots_by_color(&self, color: &str) -> Vec<SlotNumber> {
        self.ledger.read().await.slots_by_color(color)
    }

    pub async fn slot_by_registration(&self, registration: &str) -> Option<SlotNumber> {
        self.ledger.read().await.slot_by_registration(registration)
    }

    pub async fn snapshot(&self) -> LedgerSnapshot {
        let ledger = self.ledger.read().await;
        LedgerSnapshot {
            total_slots: ledger.capacity(),
            available_slots: ledger.available(),
            occupied_slots: ledger.occupied_count(),
        }
    }

    pub fn version(&self) -> &VersionInfo {
        &self.version
    }

    pub fn started_at(&self) -> &str {
        &self.started_at
    }

    pub fn trigger_shutdown(&self) {
        let _ = self.shutdown_tx.send(true);
    }

    pub fn shutdown_rx(&self) -> watch::Receiver<bool> {
        self.shutdown_rx.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use std::sync::Arc;

    #[tokio::test]
    async fn fresh_service_reports_zero_capacity() {
        let svc = ParkingService::new();
        let snapshot = svc.snapshot().await;
        assert_eq!(snapshot.total_slots, 0);
        assert_eq!(snapshot.available_slots, 0);
        assert_eq!(snapshot.occupied_slots, 0);
        assert!(svc.status().await.is_empty());
    }

    #[tokio::test]
    async fn park_and_release_flow_through_service() {
        let svc = ParkingService::new();
        svc.init(2).await.unwrap();

        assert_eq!(svc.park("KA01", "White").await, Ok(1));
        assert_eq!(svc.park("KA02", "Black").await, Ok(2));
        assert_eq!(svc.park("KA03", "Red").await, Err(LedgerError::Full));

        let snapshot = svc.snapshot().await;
        assert_eq!(snapshot.available_slots, 0);
        assert_eq!(snapshot.occupied_slots, 2);

        assert_eq!(svc.release_by_slot(1).await, Ok(1));
        assert_eq!(svc.park("KA03", "Red").await, Ok(1));
        assert_eq!(svc.slot_by_registration("ka03").await, Some(1));
    }

    #[tokio::test]
    async fn concurrent_parks_get_distinct_slots() {
        let svc = Arc::new(ParkingService::new());
        svc.init(64).await.unwrap();

        let mut handles = Vec::new();
        for i in 0..64u32 {
            let svc = Arc::clone(&svc);
            handles.push(tokio::spawn(async move {
                svc.park(&format!("KA{i:03}"), "silver").await
            }));
        }

        let mut slots = BTreeSet::new();
        for handle in handles {
            let slot = handle.await.unwrap().unwrap();
            assert!(slots.insert(slot), "slot {slot} allocated twice");
        }
        assert_eq!(slots.len(), 64);
        assert_eq!(slots.first(), Some(&1));
        assert_eq!(slots.last(), Some(&64));

        let snapshot = svc.snapshot().await;
        assert_eq!(snapshot.available_slots, 0);
        assert_eq!(svc.slots_by_color("silver").await.len(), 64);
    }

    #[tokio::test]
    async fn shutdown_signal_works() {
        let svc = ParkingService::new();
        let mut rx = svc.shutdown_rx();

        assert!(!*rx.borrow());

        svc.trigger_shutdown();
        rx.changed().await.unwrap();

        assert!(*rx.borrow());
    }
}
