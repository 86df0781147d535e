//! parkd: in-memory parking slot allocation engine.

mod heap;
mod version;

pub mod ledger;
pub mod service;
pub mod transport;

pub use heap::MinHeap;
pub use ledger::{LedgerError, ParkingLedger, SlotNumber, SlotRecord, Vehicle};
pub use service::{LedgerSnapshot, ParkingService};
pub use version::{PARKD_VERSION, VersionInfo};
