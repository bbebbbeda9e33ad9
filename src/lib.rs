//! azinv - Azure resource inventory via Azure Resource Graph
//!
//! Queries Resource Graph across one or more subscriptions and exports every
//! matching resource to a flat CSV file.
//!
//! # Features
//!
//! - Automatic pagination via continuation (skip) tokens, with a page cap
//! - Retry of throttling, server and network errors with jittered backoff
//! - Token from CLI argument, environment, or the Azure CLI
//! - Fixed-schema CSV output
//!
//! # Example
//!
//! ```bash
//! # Export two subscriptions to report.csv
//! azinv --subs 1111-...,2222-...
//!
//! # Custom output path, verbose logs
//! azinv --subs 1111-... --out out/inventory.csv --log-level debug
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod graph;
pub mod inventory;
pub mod output;
pub mod ui;

pub use cli::{parse_subscriptions, Cli};
pub use error::{InventoryError, Result};
pub use graph::{
    QueryPage, QueryRequest, QueryResult, ResourceGraphClient, RetryPolicy, Row, TokenResolver,
};
pub use inventory::{
    export_inventory, normalize_rows, run_inventory_command, InventorySummary, ResourceRecord,
    INVENTORY_QUERY,
};
pub use output::write_csv;
