//! Resource inventory export
//!
//! Turns Resource Graph rows into fixed-shape records and drives the
//! query → normalize → export pipeline.

mod commands;
mod models;

pub use commands::{export_inventory, run_inventory_command, InventorySummary, INVENTORY_QUERY};
pub use models::{fields, normalize_rows, ResourceRecord};
