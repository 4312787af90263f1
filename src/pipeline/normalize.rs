use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;

use crate::axelarscan::types::GmpRecord;
use crate::models::TransferRecord;

/// Normalize a batch of raw GMP records into flat transfer rows.
///
/// Records missing an `id` or a parseable timestamp are dropped — never
/// defaulted to "now" or zero.
pub fn normalize_records(raw: &[GmpRecord]) -> Vec<TransferRecord> {
    raw.iter().filter_map(normalize_record).collect()
}

/// Flatten one record, resolving each ambiguous field through its
/// documented fallback chain (first non-null wins, never summed).
pub fn normalize_record(raw: &GmpRecord) -> Option<TransferRecord> {
    let id = raw.id.clone()?;
    let timestamp = resolve_timestamp(raw)?;
    let transfer = raw.interchain_transfer.as_ref();

    let source_chain = first_string([
        transfer.and_then(|t| t.source_chain.clone()),
        raw.source_chain.clone(),
        raw.call.as_ref().and_then(|c| c.chain.clone()),
        raw.origin_chain.clone(),
    ]);

    let destination_chain = first_string([
        transfer.and_then(|t| t.destination_chain.clone()),
        raw.destination_chain.clone(),
        raw.call
            .as_ref()
            .and_then(|c| c.return_values.as_ref())
            .and_then(|rv| rv.destination_chain.clone()),
        raw.callback_chain.clone(),
    ]);

    let sender_address = first_string([
        transfer.and_then(|t| t.source_address.clone()),
        raw.source_address.clone(),
        raw.call
            .as_ref()
            .and_then(|c| c.transaction.as_ref())
            .and_then(|tx| tx.from.clone()),
        raw.from.clone(),
    ]);

    let amount = transfer
        .and_then(|t| t.amount.as_ref())
        .and_then(coerce_decimal)
        .or_else(|| raw.amount.as_ref().and_then(coerce_decimal));

    let amount_usd = transfer
        .and_then(|t| t.value.as_ref())
        .and_then(coerce_decimal)
        .or_else(|| raw.value.as_ref().and_then(coerce_decimal));

    let token_symbol = first_string([
        transfer.and_then(|t| t.symbol.clone()),
        raw.symbol.clone(),
    ]);

    Some(TransferRecord {
        id,
        timestamp,
        source_chain,
        destination_chain,
        sender_address,
        amount,
        amount_usd,
        fee_usd: resolve_fee(raw),
        token_symbol,
    })
}

/// Canonical fee precedence: `fees.base_fee_usd`, else
/// `fees.express_fee_usd`, else `gas_used_amount * source token USD
/// price`, else null.
fn resolve_fee(raw: &GmpRecord) -> Option<Decimal> {
    let fees = raw.fees.as_ref();
    if let Some(fee) = fees
        .and_then(|f| f.base_fee_usd.as_ref())
        .and_then(coerce_decimal)
    {
        return Some(fee);
    }
    if let Some(fee) = fees
        .and_then(|f| f.express_fee_usd.as_ref())
        .and_then(coerce_decimal)
    {
        return Some(fee);
    }

    let gas_used = raw
        .gas
        .as_ref()
        .and_then(|g| g.gas_used_amount.as_ref())
        .and_then(coerce_decimal);
    let token_price = raw
        .gas_price_rate
        .as_ref()
        .and_then(|r| r.source_token.as_ref())
        .and_then(|t| t.token_price.as_ref())
        .and_then(|p| p.usd.as_ref())
        .and_then(coerce_decimal);

    match (gas_used, token_price) {
        (Some(gas), Some(price)) => gas.checked_mul(price),
        _ => None,
    }
}

/// First parseable timestamp across the status sub-objects, then the
/// top-level fields.
fn resolve_timestamp(raw: &GmpRecord) -> Option<DateTime<Utc>> {
    let call = raw.call.as_ref();
    let candidates = [
        raw.executed.as_ref().and_then(|t| t.block_timestamp.as_ref()),
        raw.executed.as_ref().and_then(|t| t.timestamp.as_ref()),
        call.and_then(|c| c.block_timestamp.as_ref()),
        call.and_then(|c| c.timestamp.as_ref()),
        raw.approved.as_ref().and_then(|t| t.block_timestamp.as_ref()),
        raw.approved.as_ref().and_then(|t| t.timestamp.as_ref()),
        raw.confirm.as_ref().and_then(|t| t.block_timestamp.as_ref()),
        raw.confirm.as_ref().and_then(|t| t.timestamp.as_ref()),
        raw.transaction
            .as_ref()
            .and_then(|t| t.block_timestamp.as_ref()),
        raw.transaction.as_ref().and_then(|t| t.timestamp.as_ref()),
        raw.block_timestamp.as_ref(),
        raw.timestamp.as_ref(),
    ];

    candidates.into_iter().flatten().find_map(parse_timestamp)
}

/// Parse a timestamp that may be a unix number in s/ms/µs/ns, a numeric
/// string, or an ISO-8601 string.
pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => n.as_f64().and_then(from_unix_magnitude),
        Value::String(s) => {
            let s = s.trim();
            if let Ok(n) = s.parse::<f64>() {
                return from_unix_magnitude(n);
            }
            DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|dt| dt.with_timezone(&Utc))
        }
        _ => None,
    }
}

/// Infer the unit of a unix-epoch number from its magnitude.
fn from_unix_magnitude(value: f64) -> Option<DateTime<Utc>> {
    if !value.is_finite() || value <= 0.0 {
        return None;
    }

    let seconds = if value > 1e18 {
        value / 1e9 // nanoseconds
    } else if value > 1e15 {
        value / 1e6 // microseconds
    } else if value > 1e12 {
        value / 1e3 // milliseconds
    } else {
        value // seconds, also the fallback band
    };

    let mut secs = seconds.trunc() as i64;
    let mut nanos = ((seconds - seconds.trunc()) * 1e9).round() as u32;
    if nanos >= 1_000_000_000 {
        secs += 1;
        nanos = 0;
    }
    DateTime::from_timestamp(secs, nanos)
}

/// Null-safe numeric coercion: numbers and numeric strings parse,
/// everything else (arrays, objects, empty strings) is null.
pub fn coerce_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Some(Decimal::from(i));
            }
            n.as_f64().and_then(Decimal::from_f64_retain)
        }
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return None;
            }
            Decimal::from_str(s)
                .ok()
                .or_else(|| Decimal::from_scientific(s).ok())
        }
        _ => None,
    }
}

fn first_string<const N: usize>(candidates: [Option<String>; N]) -> Option<String> {
    candidates.into_iter().flatten().find(|s| !s.is_empty())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> GmpRecord {
        serde_json::from_value(value).expect("fixture should deserialize")
    }

    #[test]
    fn test_timestamp_magnitude_bands_agree() {
        let expected = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let cases = [
            json!(1_700_000_000i64),
            json!(1_700_000_000_000i64),
            json!(1_700_000_000_000_000i64),
            json!(1_700_000_000_000_000_000i64),
            json!("1700000000"),
        ];
        for case in &cases {
            assert_eq!(parse_timestamp(case), Some(expected), "case {case}");
        }
    }

    #[test]
    fn test_timestamp_iso_string() {
        let parsed = parse_timestamp(&json!("2023-11-14T22:13:20Z"));
        assert_eq!(parsed, Some(DateTime::from_timestamp(1_700_000_000, 0).unwrap()));
    }

    #[test]
    fn test_timestamp_garbage_is_none() {
        assert_eq!(parse_timestamp(&json!("not a date")), None);
        assert_eq!(parse_timestamp(&json!({"nested": 1})), None);
        assert_eq!(parse_timestamp(&json!(-5)), None);
    }

    #[test]
    fn test_record_without_timestamp_is_dropped() {
        let raw = record(json!({"id": "0xabc", "symbol": "ATH"}));
        assert!(normalize_record(&raw).is_none());
    }

    #[test]
    fn test_fee_base_wins_over_express_and_gas() {
        let raw = record(json!({
            "id": "0x1",
            "timestamp": 1_700_000_000i64,
            "fees": {"base_fee_usd": "0.50", "express_fee_usd": 9.99},
            "gas": {"gas_used_amount": 100},
            "gas_price_rate": {"source_token": {"token_price": {"usd": 2.0}}},
        }));
        let row = normalize_record(&raw).unwrap();
        assert_eq!(row.fee_usd, Some(Decimal::new(50, 2)));
    }

    #[test]
    fn test_fee_express_only() {
        let raw = record(json!({
            "id": "0x1",
            "timestamp": 1_700_000_000i64,
            "fees": {"express_fee_usd": 1.25},
        }));
        let row = normalize_record(&raw).unwrap();
        assert_eq!(row.fee_usd, Some(Decimal::new(125, 2)));
    }

    #[test]
    fn test_fee_computed_from_gas_product() {
        let raw = record(json!({
            "id": "0x1",
            "timestamp": 1_700_000_000i64,
            "gas": {"gas_used_amount": "0.004"},
            "gas_price_rate": {"source_token": {"token_price": {"usd": 1500}}},
        }));
        let row = normalize_record(&raw).unwrap();
        assert_eq!(row.fee_usd, Some(Decimal::from(6)));
    }

    #[test]
    fn test_fee_absent_is_null() {
        let raw = record(json!({
            "id": "0x1",
            "timestamp": 1_700_000_000i64,
            "gas": {"gas_used_amount": 100},
        }));
        let row = normalize_record(&raw).unwrap();
        assert_eq!(row.fee_usd, None);
    }

    #[test]
    fn test_fee_non_scalar_shapes_are_null() {
        let raw = record(json!({
            "id": "0x1",
            "timestamp": 1_700_000_000i64,
            "fees": {"base_fee_usd": [1, 2], "express_fee_usd": {"usd": 3}},
        }));
        let row = normalize_record(&raw).unwrap();
        assert_eq!(row.fee_usd, None);
    }

    #[test]
    fn test_chain_fallback_order() {
        let raw = record(json!({
            "id": "0x1",
            "timestamp": 1_700_000_000i64,
            "call": {
                "chain": "ethereum",
                "returnValues": {"destinationChain": "base"},
            },
            "origin_chain": "fantom",
        }));
        let row = normalize_record(&raw).unwrap();
        assert_eq!(row.source_chain.as_deref(), Some("ethereum"));
        assert_eq!(row.destination_chain.as_deref(), Some("base"));

        let nested_wins = record(json!({
            "id": "0x2",
            "timestamp": 1_700_000_000i64,
            "interchain_transfer": {"sourceChain": "polygon", "destinationChain": "osmosis"},
            "call": {"chain": "ethereum"},
        }));
        let row = normalize_record(&nested_wins).unwrap();
        assert_eq!(row.source_chain.as_deref(), Some("polygon"));
        assert_eq!(row.destination_chain.as_deref(), Some("osmosis"));
    }

    #[test]
    fn test_sender_falls_back_to_call_transaction() {
        let raw = record(json!({
            "id": "0x1",
            "timestamp": 1_700_000_000i64,
            "call": {"transaction": {"from": "0xsender"}},
        }));
        let row = normalize_record(&raw).unwrap();
        assert_eq!(row.sender_address.as_deref(), Some("0xsender"));
    }

    #[test]
    fn test_amounts_from_nested_transfer() {
        let raw = record(json!({
            "id": "0x1",
            "timestamp": 1_700_000_000i64,
            "interchain_transfer": {"amount": "123.45", "value": 67.5, "symbol": "ATH"},
        }));
        let row = normalize_record(&raw).unwrap();
        assert_eq!(row.amount, Some(Decimal::new(12_345, 2)));
        assert_eq!(row.amount_usd, Some(Decimal::new(675, 1)));
        assert_eq!(row.token_symbol.as_deref(), Some("ATH"));
    }

    #[test]
    fn test_coerce_decimal_scientific_string() {
        assert_eq!(coerce_decimal(&json!("1e3")), Some(Decimal::from(1000)));
        assert_eq!(coerce_decimal(&json!("")), None);
        assert_eq!(coerce_decimal(&json!(null)), None);
    }

    #[test]
    fn test_missing_chains_stay_null() {
        let raw = record(json!({"id": "0x1", "timestamp": 1_700_000_000i64}));
        let row = normalize_record(&raw).unwrap();
        assert_eq!(row.source_chain, None);
        assert_eq!(row.destination_chain, None);
        assert_eq!(row.path_label(), "Unknown → Unknown");
    }
}
