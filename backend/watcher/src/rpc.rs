//! Soroban RPC client — polls `getEvents` and decodes delivery alerts.
//!
//! ## Resilience
//!
//! * Exponential back-off is applied when the RPC returns an error or
//!   rate-limit response, up to [`MAX_BACKOFF_SECS`] seconds.
//! * Transient network errors (connection reset, timeout) are retried
//!   silently.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::errors::{Result, WatcherError};
use crate::events::{DeliveryAlert, EventKind};

const MAX_BACKOFF_SECS: u64 = 60;
const INITIAL_BACKOFF_SECS: u64 = 2;

// ─────────────────────────────────────────────────────────
// JSON-RPC response shapes
// ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RpcResponse {
    pub result: Option<EventsResult>,
    pub error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct EventsResult {
    pub events: Vec<RawEvent>,
    pub cursor: Option<String>,
    #[serde(rename = "latestLedger")]
    pub latest_ledger: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
#[allow(dead_code)]
pub struct RawEvent {
    /// XDR-encoded topic list
    pub topic: Vec<String>,
    /// XDR-encoded event value / data
    pub value: Value,
    #[serde(rename = "contractId")]
    pub contract_id: Option<String>,
    #[serde(rename = "txHash")]
    pub tx_hash: Option<String>,
    pub id: Option<String>,
    pub ledger: Option<u64>,
    #[serde(rename = "ledgerClosedAt")]
    pub ledger_closed_at: Option<String>,
    #[serde(rename = "inSuccessfulContractCall")]
    pub in_successful_contract_call: Option<bool>,
    #[serde(rename = "pagingToken")]
    pub paging_token: Option<String>,
}

// ─────────────────────────────────────────────────────────
// Public API
// ─────────────────────────────────────────────────────────

/// Fetch a page of events from the RPC for all watched contracts.
///
/// * `start_ledger` — the ledger sequence to scan from (inclusive).
/// * `cursor`       — optional opaque pagination cursor from a previous
///   response.
/// * `limit`        — maximum number of events to return.
///
/// Returns `(events, next_cursor, latest_ledger)`.
pub async fn fetch_events(
    client: &Client,
    rpc_url: &str,
    contract_ids: &[String],
    start_ledger: u32,
    cursor: Option<&str>,
    limit: u32,
) -> Result<(Vec<RawEvent>, Option<String>, Option<u64>)> {
    let mut backoff = INITIAL_BACKOFF_SECS;

    loop {
        let params = build_params(contract_ids, start_ledger, cursor, limit);

        let response = client
            .post(rpc_url)
            .json(&json!({
                "jsonrpc": "2.0",
                "id": 1,
                "method": "getEvents",
                "params": params,
            }))
            .send()
            .await;

        match response {
            Err(e) => {
                warn!("RPC request failed (will retry in {backoff}s): {e}");
                tokio::time::sleep(Duration::from_secs(backoff)).await;
                backoff = (backoff * 2).min(MAX_BACKOFF_SECS);
                continue;
            }
            Ok(resp) => {
                let status = resp.status();
                if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    warn!("Rate-limited by RPC (will retry in {backoff}s)");
                    tokio::time::sleep(Duration::from_secs(backoff)).await;
                    backoff = (backoff * 2).min(MAX_BACKOFF_SECS);
                    continue;
                }

                let body: RpcResponse = resp.json().await?;

                if let Some(err) = body.error {
                    // Code -32600 / -32601 are hard failures; everything else we retry
                    if err.code == -32600 || err.code == -32601 {
                        return Err(WatcherError::EventParse(format!(
                            "RPC hard error {}: {}",
                            err.code, err.message
                        )));
                    }
                    warn!(
                        "RPC soft error (will retry in {backoff}s): {} {}",
                        err.code, err.message
                    );
                    tokio::time::sleep(Duration::from_secs(backoff)).await;
                    backoff = (backoff * 2).min(MAX_BACKOFF_SECS);
                    continue;
                }

                let result = body.result.ok_or_else(|| {
                    WatcherError::EventParse("Empty result from getEvents".to_string())
                })?;

                debug!(
                    "Fetched {} events (latest_ledger={:?})",
                    result.events.len(),
                    result.latest_ledger
                );

                return Ok((result.events, result.cursor, result.latest_ledger));
            }
        }
    }
}

fn build_params(
    contract_ids: &[String],
    start_ledger: u32,
    cursor: Option<&str>,
    limit: u32,
) -> Value {
    let mut params = json!({
        "filters": [
            {
                "type": "contract",
                "contractIds": contract_ids
            }
        ],
        "pagination": {
            "limit": limit
        }
    });

    if let Some(cur) = cursor {
        params["pagination"]["cursor"] = json!(cur);
    } else {
        params["startLedger"] = json!(start_ledger);
    }

    params
}

// ─────────────────────────────────────────────────────────
// Event decoding
// ─────────────────────────────────────────────────────────

/// Decode a list of raw RPC events into [`DeliveryAlert`] structs.
pub fn decode_events(raw: &[RawEvent]) -> Vec<DeliveryAlert> {
    raw.iter().filter_map(decode_single).collect()
}

fn decode_single(raw: &RawEvent) -> Option<DeliveryAlert> {
    // Extract leading topic symbol to determine event type.
    let first_topic = raw.topic.first()?;
    let kind = EventKind::from_topic(&extract_symbol(first_topic));

    // Events that lack a contract ID can't be attributed to an instance.
    let contract_id = raw.contract_id.clone()?;

    let ledger = raw.ledger.unwrap_or(0) as i64;
    let timestamp = raw
        .ledger_closed_at
        .as_deref()
        .and_then(parse_iso_to_unix)
        .unwrap_or(0);

    let message = match kind {
        EventKind::NewAlert => extract_string(&raw.value),
        EventKind::Unknown => None,
    };

    Some(DeliveryAlert {
        event_type: kind.as_str().to_string(),
        message,
        ledger,
        timestamp,
        contract_id,
        tx_hash: raw.tx_hash.clone(),
    })
}

/// Extract a Soroban Symbol from the XDR-decoded topic string.
/// The RPC may return `{"type":"symbol","value":"alert"}` or just the raw
/// string.
fn extract_symbol(raw: &str) -> String {
    if let Ok(v) = serde_json::from_str::<Value>(raw) {
        if let Some(s) = v.get("value").and_then(|x| x.as_str()) {
            return s.to_string();
        }
    }
    // Fallback: treat the raw string as the symbol
    raw.to_string()
}

/// Pull the alert message out of the XDR-decoded event data. The RPC
/// returns either a bare JSON string or a `{"type":"string","value":…}`
/// wrapper depending on version.
fn extract_string(value: &Value) -> Option<String> {
    if let Some(s) = value.as_str() {
        return Some(s.to_string());
    }
    value
        .get("value")
        .and_then(|v| v.as_str())
        .map(String::from)
}

/// Parse an ISO-8601 timestamp string into a Unix epoch (seconds).
fn parse_iso_to_unix(s: &str) -> Option<i64> {
    use chrono::DateTime;
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.timestamp())
}

// ─────────────────────────────────────────────────────────
// Unit tests
// ─────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_alert(value: Value) -> RawEvent {
        RawEvent {
            topic: vec![r#"{"type":"symbol","value":"alert"}"#.to_string()],
            value,
            contract_id: Some("CSHIPPING123".to_string()),
            tx_hash: Some("TX1".to_string()),
            id: None,
            ledger: Some(1000),
            ledger_closed_at: Some("2024-01-01T00:00:00Z".to_string()),
            in_successful_contract_call: Some(true),
            paging_token: None,
        }
    }

    #[test]
    fn event_kind_from_topic() {
        assert_eq!(EventKind::from_topic("alert"), EventKind::NewAlert);
        assert_eq!(EventKind::from_topic("something_else"), EventKind::Unknown);
    }

    #[test]
    fn event_kind_as_str() {
        assert_eq!(EventKind::NewAlert.as_str(), "new_alert");
        assert_eq!(EventKind::Unknown.as_str(), "unknown");
    }

    #[test]
    fn extract_symbol_from_json() {
        let raw = r#"{"type":"symbol","value":"alert"}"#;
        assert_eq!(extract_symbol(raw), "alert");
    }

    #[test]
    fn extract_symbol_raw_fallback() {
        assert_eq!(extract_symbol("alert"), "alert");
    }

    #[test]
    fn decode_alert_event_bare_string() {
        let raw = raw_alert(serde_json::json!("Your package has arrived"));

        let alerts = decode_events(&[raw]);
        assert_eq!(alerts.len(), 1);
        let alert = &alerts[0];
        assert_eq!(alert.event_type, "new_alert");
        assert_eq!(alert.message.as_deref(), Some("Your package has arrived"));
        assert_eq!(alert.contract_id, "CSHIPPING123");
        assert_eq!(alert.ledger, 1000);
        assert_eq!(alert.timestamp, 1_704_067_200);
    }

    #[test]
    fn decode_alert_event_wrapped_string() {
        let raw = raw_alert(serde_json::json!({
            "type": "string",
            "value": "Your food order has arrived"
        }));

        let alerts = decode_events(&[raw]);
        assert_eq!(alerts.len(), 1);
        assert_eq!(
            alerts[0].message.as_deref(),
            Some("Your food order has arrived")
        );
    }

    #[test]
    fn decode_unknown_topic_kept_without_message() {
        let mut raw = raw_alert(serde_json::json!("ignored"));
        raw.topic = vec![r#"{"type":"symbol","value":"upgraded"}"#.to_string()];

        let alerts = decode_events(&[raw]);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].event_type, "unknown");
        assert_eq!(alerts[0].message, None);
    }

    #[test]
    fn decode_skips_event_without_contract_id() {
        let mut raw = raw_alert(serde_json::json!("Your package has arrived"));
        raw.contract_id = None;

        assert!(decode_events(&[raw]).is_empty());
    }

    #[test]
    fn build_params_with_multiple_contracts() {
        let ids = vec!["C1".to_string(), "C2".to_string()];
        let params = build_params(&ids, 42, None, 100);

        assert_eq!(params["startLedger"], 42);
        assert_eq!(params["filters"][0]["contractIds"], json!(["C1", "C2"]));
    }

    #[test]
    fn build_params_cursor_replaces_start_ledger() {
        let ids = vec!["C1".to_string()];
        let params = build_params(&ids, 42, Some("cursor-1"), 100);

        assert_eq!(params["pagination"]["cursor"], "cursor-1");
        assert!(params.get("startLedger").is_none());
    }

    #[test]
    fn parse_iso_timestamp() {
        let ts = parse_iso_to_unix("2024-01-01T00:00:00Z").unwrap();
        assert_eq!(ts, 1_704_067_200);
    }
}
