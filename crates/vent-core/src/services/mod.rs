//! Core services - the inventory logic layer.
//!
//! Services orchestrate between ports (trait interfaces) and domain logic.
//! They never know about concrete adapters; everything is injected.

mod checkout_locks;
mod host_facts;
mod inventory;
mod snapshot;

pub use checkout_locks::CheckoutLocks;
pub use host_facts::{CUDA_IMAGE, HostFactsService};
pub use inventory::InventoryReconciler;
pub use snapshot::{RuntimeSnapshot, aggregate_names, count_jobs};
