//! Inventory command handlers

use log::{debug, info};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cli::Cli;
use crate::error::Result;
use crate::graph::{ResourceGraphClient, TokenResolver};
use crate::output::write_csv;
use crate::ui::{clear_spinner, create_spinner, finish_spinner, set_spinner_message};

use super::normalize_rows;

/// Resource Graph query behind the inventory export
pub const INVENTORY_QUERY: &str = "Resources
| project name, resourceGroup, type, subscriptionId
| order by type asc";

/// Outcome of a successful export
#[derive(Debug, Clone, PartialEq)]
pub struct InventorySummary {
    pub rows: usize,
    pub path: PathBuf,
    /// Page cap was reached; the file may be incomplete
    pub truncated: bool,
}

/// Run the inventory command
pub async fn run_inventory_command(cli: &Cli) -> Result<InventorySummary> {
    let subscriptions = cli.subscriptions()?;
    debug!(
        "Processing {} subscriptions: {:?}",
        subscriptions.len(),
        subscriptions
    );

    let token = TokenResolver::default().resolve(cli.token.as_deref())?;

    let client = ResourceGraphClient::new(token)
        .with_endpoint(&cli.endpoint)
        .with_timeout(Duration::from_secs(cli.timeout));

    export_inventory(&client, &subscriptions, cli.max_pages, &cli.out, cli.quiet).await
}

/// Query, normalize and write the inventory
///
/// Nothing is written unless every row normalizes.
pub async fn export_inventory(
    client: &ResourceGraphClient,
    subscriptions: &[String],
    max_pages: u32,
    out: &Path,
    quiet: bool,
) -> Result<InventorySummary> {
    let spinner = create_spinner(
        &format!(
            "Querying Resource Graph across {} subscription(s)...",
            subscriptions.len()
        ),
        quiet,
    );

    let result = match client
        .execute_query_all(subscriptions, INVENTORY_QUERY, max_pages)
        .await
    {
        Ok(result) => result,
        Err(e) => {
            clear_spinner(spinner);
            return Err(e);
        }
    };

    info!(
        "Fetched {} rows in {} page(s)",
        result.rows.len(),
        result.pages_fetched
    );

    set_spinner_message(&spinner, &format!("Writing {}...", out.display()));

    let written = normalize_rows(&result.rows).and_then(|records| {
        let path = write_csv(&records, out)?;
        Ok((records.len(), path))
    });

    let (rows, path) = match written {
        Ok(written) => written,
        Err(e) => {
            clear_spinner(spinner);
            return Err(e);
        }
    };

    finish_spinner(spinner, "Done");

    Ok(InventorySummary {
        rows,
        path,
        truncated: result.truncated,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InventoryError;
    use crate::graph::RetryPolicy;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> ResourceGraphClient {
        ResourceGraphClient::new("test-token".to_string())
            .with_endpoint(format!("{}/resources", server.uri()))
            .with_retry_policy(RetryPolicy::with_base_delay(Duration::from_millis(1)))
    }

    fn subs() -> Vec<String> {
        vec!["sub-1".to_string(), "sub-2".to_string()]
    }

    #[test]
    fn test_inventory_query_projects_required_columns() {
        for column in ["name", "resourceGroup", "type", "subscriptionId"] {
            assert!(INVENTORY_QUERY.contains(column));
        }
        assert!(INVENTORY_QUERY.starts_with("Resources"));
    }

    #[tokio::test]
    async fn test_export_inventory_end_to_end() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(body_partial_json(json!({
                "subscriptions": ["sub-1", "sub-2"],
                "query": INVENTORY_QUERY
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [
                    {"type": "microsoft.compute/disks", "subscriptionId": "sub-1",
                     "name": "disk-1", "resourceGroup": "rg-vm", "location": "eastus"},
                    {"name": "vm-1", "resourceGroup": "rg-vm",
                     "type": "microsoft.compute/virtualmachines", "subscriptionId": "sub-2"}
                ]
            })))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("reports/report.csv");

        let summary = export_inventory(&client(&server), &subs(), 10, &out, true)
            .await
            .unwrap();

        assert_eq!(summary.rows, 2);
        assert_eq!(summary.path, out);
        assert!(!summary.truncated);

        let content = std::fs::read_to_string(&out).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "disk-1,rg-vm,microsoft.compute/disks,sub-1,");
        assert_eq!(lines[2], "vm-1,rg-vm,microsoft.compute/virtualmachines,sub-2,");
    }

    #[tokio::test]
    async fn test_export_inventory_missing_field_writes_nothing() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [
                    {"name": "ok", "resourceGroup": "rg", "type": "t", "subscriptionId": "sub-1"},
                    {"name": "bad", "type": "t", "subscriptionId": "sub-1"}
                ]
            })))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("report.csv");

        let err = export_inventory(&client(&server), &subs(), 10, &out, true)
            .await
            .unwrap_err();

        match err {
            InventoryError::MissingField(field) => assert_eq!(field, "resourceGroup"),
            other => panic!("Expected MissingField, got {:?}", other),
        }
        assert!(!out.exists());
    }

    #[tokio::test]
    async fn test_export_inventory_truncated() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [
                    {"name": "r", "resourceGroup": "rg", "type": "t", "subscriptionId": "sub-1"}
                ],
                "$skipToken": "more"
            })))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("report.csv");

        let summary = export_inventory(&client(&server), &subs(), 2, &out, true)
            .await
            .unwrap();

        assert!(summary.truncated);
        assert_eq!(summary.rows, 2);
    }

    #[tokio::test]
    async fn test_export_inventory_http_error_writes_nothing() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("report.csv");

        let err = export_inventory(&client(&server), &subs(), 10, &out, true)
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(403));
        assert!(!out.exists());
    }
}
