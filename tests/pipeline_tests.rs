//! End-to-end pipeline tests: raw searchGMP-shaped JSON fixtures through
//! normalize → aggregate, no network or database required.

use chrono::DateTime;
use rust_decimal::Decimal;
use serde_json::json;

use itscope::axelarscan::GmpRecord;
use itscope::models::{Dimension, Timeframe};
use itscope::pipeline::{aggregate, normalize};

/// 2023-11-14T22:13:20Z.
const EPOCH_SECS: i64 = 1_700_000_000;

fn fixture(value: serde_json::Value) -> GmpRecord {
    serde_json::from_value(value).expect("fixture should deserialize")
}

fn transfer(id: &str, day_offset: i64, source: &str, destination: &str) -> GmpRecord {
    fixture(json!({
        "id": id,
        "call": {
            "chain": source,
            "returnValues": {"destinationChain": destination},
            "transaction": {"from": format!("0xsender-{id}")},
            "block_timestamp": EPOCH_SECS + day_offset * 86_400,
        },
        "interchain_transfer": {"amount": 10, "value": 20.0, "symbol": "ATH"},
    }))
}

#[test]
fn timestamp_unit_is_inferred_from_magnitude() {
    let expected = DateTime::from_timestamp(EPOCH_SECS, 0).unwrap();

    // The same instant expressed in seconds, milliseconds, microseconds
    // and nanoseconds must normalize identically.
    let units: [i64; 4] = [1, 1_000, 1_000_000, 1_000_000_000];
    for (i, unit) in units.iter().enumerate() {
        let raw = fixture(json!({
            "id": format!("0x{i}"),
            "timestamp": EPOCH_SECS * unit,
        }));
        let row = normalize::normalize_record(&raw).expect("record should normalize");
        assert_eq!(row.timestamp, expected, "unit multiplier {unit}");
    }
}

#[test]
fn unparseable_timestamps_drop_the_record() {
    let records = vec![
        fixture(json!({"id": "0xgood", "timestamp": EPOCH_SECS})),
        fixture(json!({"id": "0xbad", "timestamp": "soon"})),
        fixture(json!({"id": "0xmissing"})),
    ];
    let rows = normalize::normalize_records(&records);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, "0xgood");
}

#[test]
fn express_fee_alone_is_used_verbatim() {
    let raw = fixture(json!({
        "id": "0x1",
        "timestamp": EPOCH_SECS,
        "fees": {"express_fee_usd": 1.25},
        "gas": {"gas_used_amount": 100},
    }));
    let row = normalize::normalize_record(&raw).unwrap();
    // Not null, and not combined with any gas-based estimate.
    assert_eq!(row.fee_usd, Some(Decimal::new(125, 2)));
}

#[test]
fn absent_fees_stay_null_and_are_excluded_from_sums() {
    let with_fee = fixture(json!({
        "id": "0xfee",
        "timestamp": EPOCH_SECS,
        "fees": {"base_fee_usd": 2.5},
    }));
    let without_fee = fixture(json!({
        "id": "0xnofee",
        "timestamp": EPOCH_SECS,
    }));

    let rows = normalize::normalize_records(&[with_fee, without_fee]);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].fee_usd, None);

    let table = aggregate::aggregate(&rows, Timeframe::Day, None);
    assert_eq!(table.len(), 1);
    assert_eq!(table[0].transfer_count, 2);
    // Sum over the one non-null fee, not null treated as zero.
    assert_eq!(table[0].fee_usd, Some(Decimal::new(25, 1)));

    let all_null = normalize::normalize_records(&[fixture(json!({
        "id": "0xonly",
        "timestamp": EPOCH_SECS,
    }))]);
    let table = aggregate::aggregate(&all_null, Timeframe::Day, None);
    assert_eq!(table[0].fee_usd, None, "zero non-null fees sum to null");
}

#[test]
fn grouped_metrics_sum_to_ungrouped_totals() {
    let records = vec![
        transfer("a", 0, "ethereum", "base"),
        transfer("b", 0, "base", "celo"),
        transfer("c", 1, "ethereum", "base"),
        transfer("d", 1, "fantom", "osmosis"),
        transfer("e", 1, "fantom", "osmosis"),
    ];
    let rows = normalize::normalize_records(&records);
    let grouped = aggregate::aggregate(&rows, Timeframe::Day, Some(Dimension::Path));
    let totals = aggregate::aggregate(&rows, Timeframe::Day, None);

    for total in &totals {
        let count: u64 = grouped
            .iter()
            .filter(|g| g.bucket == total.bucket)
            .map(|g| g.transfer_count)
            .sum();
        let volume: Decimal = grouped
            .iter()
            .filter(|g| g.bucket == total.bucket)
            .filter_map(|g| g.volume)
            .sum();
        assert_eq!(count, total.transfer_count, "no double counting");
        assert_eq!(Some(volume), total.volume);
    }
}

#[test]
fn cumulative_equals_running_total_of_buckets() {
    // Worked example: day 1 has paths A→B ×3 and B→C ×2, day 2 has
    // A→B ×5; totals are 5 and 5, cumulative 5 then 10.
    let mut records = Vec::new();
    for i in 0..3 {
        records.push(transfer(&format!("a{i}"), 0, "A", "B"));
    }
    for i in 0..2 {
        records.push(transfer(&format!("b{i}"), 0, "B", "C"));
    }
    for i in 0..5 {
        records.push(transfer(&format!("c{i}"), 1, "A", "B"));
    }

    let rows = normalize::normalize_records(&records);
    let trend = aggregate::trend(&rows, Timeframe::Day);

    assert_eq!(trend.len(), 2);
    assert_eq!(trend[0].transfer_count, 5);
    assert_eq!(trend[1].transfer_count, 5);
    assert_eq!(trend[0].cumulative_count, 5);
    assert_eq!(trend[1].cumulative_count, 10);

    let total: u64 = trend.iter().map(|r| r.transfer_count).sum();
    assert_eq!(trend.last().unwrap().cumulative_count, total);
}

#[test]
fn shares_are_null_when_bucket_total_is_zero() {
    // No record carries a USD value, so every bucket total is null and
    // the share column must be null, not a division error or zero.
    let records = vec![fixture(json!({
        "id": "0x1",
        "timestamp": EPOCH_SECS,
        "call": {"chain": "ethereum", "returnValues": {"destinationChain": "base"}},
    }))];
    let rows = normalize::normalize_records(&records);
    let grouped = aggregate::aggregate(&rows, Timeframe::Day, Some(Dimension::Path));
    let shares = aggregate::shares(&grouped, |r| r.volume_usd);
    assert_eq!(shares, vec![None]);
}

#[test]
fn empty_fetch_yields_empty_aggregate_table() {
    let rows = normalize::normalize_records(&[]);
    assert!(rows.is_empty());
    assert!(aggregate::aggregate(&rows, Timeframe::Day, None).is_empty());
    assert!(aggregate::trend(&rows, Timeframe::Day).is_empty());
    assert!(aggregate::volume_distribution(&rows, Timeframe::Day).is_empty());

    let stats = aggregate::summary(&rows);
    assert_eq!(stats.transfer_count, 0);
    assert_eq!(stats.volume_usd, None);
    assert_eq!(stats.fee_median, None);
}

#[test]
fn weekly_buckets_group_the_same_iso_week() {
    // EPOCH_SECS is a Tuesday; offsets 0..5 stay in the same ISO week,
    // offset 6 lands in the next one.
    let records = vec![
        transfer("a", 0, "A", "B"),
        transfer("b", 5, "A", "B"),
        transfer("c", 6, "A", "B"),
    ];
    let rows = normalize::normalize_records(&records);
    let weekly = aggregate::trend(&rows, Timeframe::Week);
    assert_eq!(weekly.len(), 2);
    assert_eq!(weekly[0].transfer_count, 2);
    assert_eq!(weekly[1].transfer_count, 1);
}

#[test]
fn monitor_style_pipeline_handles_mixed_shapes() {
    // A realistic mixed batch: nested transfer objects, flat records,
    // missing chains, string timestamps.
    let records = vec![
        fixture(json!({
            "id": "0x1",
            "executed": {"block_timestamp": EPOCH_SECS},
            "interchain_transfer": {
                "amount": "1000",
                "value": 2000,
                "sourceChain": "ethereum",
                "destinationChain": "base",
                "sourceAddress": "0xaaa",
                "symbol": "ATH",
            },
            "fees": {"base_fee_usd": 0.5},
        })),
        fixture(json!({
            "id": "0x2",
            "timestamp": (EPOCH_SECS + 86_400) * 1_000,
            "sourceChain": "ethereum",
            "destinationChain": "celo",
            "sourceAddress": "0xbbb",
            "amount": 50,
            "value": 100,
            "symbol": "ATH",
        })),
        fixture(json!({
            "id": "0x3",
            "timestamp": "2023-11-14T23:00:00Z",
            "amount": 1,
        })),
    ];

    let rows = normalize::normalize_records(&records);
    assert_eq!(rows.len(), 3);

    let stats = aggregate::summary(&rows);
    assert_eq!(stats.transfer_count, 3);
    assert_eq!(stats.sender_count, 2);
    assert_eq!(stats.volume, Some(Decimal::from(1_051)));
    assert_eq!(stats.volume_usd, Some(Decimal::from(2_100)));
    assert_eq!(stats.fee_total, Some(Decimal::new(5, 1)));
    // Chain counts skip the record with no chains at all.
    assert_eq!(stats.source_chain_count, 1);
    assert_eq!(stats.destination_chain_count, 2);
    assert_eq!(stats.path_count, 2);

    let by_path = aggregate::totals_by_dimension(&rows, Dimension::Path);
    assert_eq!(by_path.len(), 3);
    assert!(by_path.iter().any(|p| p.dimension == "Unknown → Unknown"));
}
