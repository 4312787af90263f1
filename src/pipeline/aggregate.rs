use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

use crate::models::{
    AggregateRow, CategoryCount, Dimension, DimensionTotal, SenderRow, SummaryStats, Timeframe,
    TransferRecord, TrendRow, VolumeClassRow, VolumeClassTotal, WeekdayRow,
};

const DAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

// ---------------------------------------------------------------------------
// Accumulator
// ---------------------------------------------------------------------------

#[derive(Default)]
struct Acc {
    ids: HashSet<String>,
    senders: HashSet<String>,
    volume: Option<Decimal>,
    volume_usd: Option<Decimal>,
    fee_usd: Option<Decimal>,
}

impl Acc {
    fn add(&mut self, record: &TransferRecord) {
        self.ids.insert(record.id.clone());
        if let Some(sender) = &record.sender_address {
            self.senders.insert(sender.clone());
        }
        add_opt(&mut self.volume, record.amount);
        add_opt(&mut self.volume_usd, record.amount_usd);
        add_opt(&mut self.fee_usd, record.fee_usd);
    }
}

/// Null-safe accumulation: absent values never contribute, and a sum
/// with no non-null contributions stays null rather than zero.
fn add_opt(acc: &mut Option<Decimal>, value: Option<Decimal>) {
    if let Some(v) = value {
        *acc = Some(acc.unwrap_or(Decimal::ZERO) + v);
    }
}

// ---------------------------------------------------------------------------
// Bucketed aggregation
// ---------------------------------------------------------------------------

/// Group normalized rows by time bucket and an optional dimension.
/// Output is ordered ascending by bucket, then by dimension value.
pub fn aggregate(
    rows: &[TransferRecord],
    timeframe: Timeframe,
    dimension: Option<Dimension>,
) -> Vec<AggregateRow> {
    let mut groups: BTreeMap<(NaiveDate, Option<String>), Acc> = BTreeMap::new();

    for row in rows {
        let dim_key = match dimension {
            Some(dim) => match dim.key_for(row) {
                Some(key) => Some(key),
                // Rows without the dimension value are not countable
                // under that grouping.
                None => continue,
            },
            None => None,
        };
        let bucket = timeframe.truncate(row.timestamp);
        groups.entry((bucket, dim_key)).or_default().add(row);
    }

    groups
        .into_iter()
        .map(|((bucket, dimension), acc)| AggregateRow {
            bucket,
            dimension,
            transfer_count: acc.ids.len() as u64,
            sender_count: acc.senders.len() as u64,
            volume: acc.volume,
            volume_usd: acc.volume_usd,
            fee_usd: acc.fee_usd,
        })
        .collect()
}

/// Per-bucket totals with the running cumulative transfer count.
pub fn trend(rows: &[TransferRecord], timeframe: Timeframe) -> Vec<TrendRow> {
    let mut cumulative = 0u64;
    aggregate(rows, timeframe, None)
        .into_iter()
        .map(|row| {
            cumulative += row.transfer_count;
            TrendRow {
                bucket: row.bucket,
                transfer_count: row.transfer_count,
                cumulative_count: cumulative,
                sender_count: row.sender_count,
                volume: row.volume,
                volume_usd: row.volume_usd,
                fee_usd: row.fee_usd,
            }
        })
        .collect()
}

/// Whole-range totals per dimension value, largest USD volume first.
pub fn totals_by_dimension(rows: &[TransferRecord], dimension: Dimension) -> Vec<DimensionTotal> {
    let mut groups: BTreeMap<String, Acc> = BTreeMap::new();
    for row in rows {
        if let Some(key) = dimension.key_for(row) {
            groups.entry(key).or_default().add(row);
        }
    }

    let mut totals: Vec<DimensionTotal> = groups
        .into_iter()
        .map(|(dimension, acc)| DimensionTotal {
            dimension,
            transfer_count: acc.ids.len() as u64,
            sender_count: acc.senders.len() as u64,
            volume: acc.volume,
            volume_usd: acc.volume_usd,
            fee_usd: acc.fee_usd,
        })
        .collect();
    totals.sort_by(|a, b| {
        b.volume_usd
            .unwrap_or(Decimal::ZERO)
            .cmp(&a.volume_usd.unwrap_or(Decimal::ZERO))
    });
    totals
}

/// Share of each row's metric in its bucket's total across all
/// dimensions. Null when the row's metric is null or the bucket total is
/// zero — never a division by zero.
pub fn shares(
    rows: &[AggregateRow],
    metric: fn(&AggregateRow) -> Option<Decimal>,
) -> Vec<Option<Decimal>> {
    let mut totals: HashMap<NaiveDate, Decimal> = HashMap::new();
    for row in rows {
        if let Some(value) = metric(row) {
            *totals.entry(row.bucket).or_default() += value;
        }
    }

    rows.iter()
        .map(|row| {
            let total = totals.get(&row.bucket).copied()?;
            if total.is_zero() {
                return None;
            }
            metric(row).map(|value| value / total)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Volume classes
// ---------------------------------------------------------------------------

/// Magnitude band for a transfer's native amount.
pub fn volume_class(amount: Decimal) -> &'static str {
    let bands: [(Decimal, &'static str); 14] = [
        (Decimal::new(1, 2), "V<=0.01"),
        (Decimal::new(1, 1), "0.01<V<=0.1"),
        (Decimal::ONE, "0.1<V<=1"),
        (Decimal::from(10), "1<V<=10"),
        (Decimal::from(100), "10<V<=100"),
        (Decimal::from(1_000), "100<V<=1k"),
        (Decimal::from(10_000), "1k<V<=10k"),
        (Decimal::from(20_000), "10k<V<=20k"),
        (Decimal::from(50_000), "20k<V<=50k"),
        (Decimal::from(100_000), "50k<V<=100k"),
        (Decimal::from(1_000_000), "100k<V<=1m"),
        (Decimal::from(10_000_000), "1m<V<=10m"),
        (Decimal::from(100_000_000), "10m<V<=100m"),
        (Decimal::from(1_000_000_000), "100m<V<=1b"),
    ];
    for (bound, label) in bands {
        if amount <= bound {
            return label;
        }
    }
    "V>1b"
}

/// Distinct transfers per (bucket, volume class). Rows without an amount
/// cannot be classified and are skipped.
pub fn volume_distribution(rows: &[TransferRecord], timeframe: Timeframe) -> Vec<VolumeClassRow> {
    let mut groups: BTreeMap<(NaiveDate, &'static str), HashSet<&str>> = BTreeMap::new();
    for row in rows {
        let Some(amount) = row.amount else { continue };
        let bucket = timeframe.truncate(row.timestamp);
        groups
            .entry((bucket, volume_class(amount)))
            .or_default()
            .insert(row.id.as_str());
    }

    groups
        .into_iter()
        .map(|((bucket, class), ids)| VolumeClassRow {
            bucket,
            class: class.to_string(),
            transfer_count: ids.len() as u64,
        })
        .collect()
}

/// Distinct transfers per volume class over the whole range.
pub fn volume_distribution_totals(rows: &[TransferRecord]) -> Vec<VolumeClassTotal> {
    let mut groups: BTreeMap<&'static str, HashSet<&str>> = BTreeMap::new();
    for row in rows {
        let Some(amount) = row.amount else { continue };
        groups
            .entry(volume_class(amount))
            .or_default()
            .insert(row.id.as_str());
    }

    groups
        .into_iter()
        .map(|(class, ids)| VolumeClassTotal {
            class: class.to_string(),
            transfer_count: ids.len() as u64,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Weekday breakdown
// ---------------------------------------------------------------------------

/// Activity totals per day of the week. All seven rows are always
/// present, Monday first.
pub fn weekday_breakdown(rows: &[TransferRecord]) -> Vec<WeekdayRow> {
    let mut accs: [Acc; 7] = Default::default();
    for row in rows {
        let idx = row.timestamp.weekday().num_days_from_monday() as usize;
        accs[idx].add(row);
    }

    accs.into_iter()
        .enumerate()
        .map(|(idx, acc)| WeekdayRow {
            day_number: idx as u32 + 1,
            day_name: format!("{} - {}", idx + 1, DAY_NAMES[idx]),
            transfer_count: acc.ids.len() as u64,
            sender_count: acc.senders.len() as u64,
            volume: acc.volume,
        })
        .collect()
}

/// Display label for an ISO day number (1 = Monday .. 7 = Sunday), used
/// when the warehouse already did the grouping.
pub fn weekday_label(day_number: u32) -> String {
    let idx = (day_number.clamp(1, 7) - 1) as usize;
    format!("{} - {}", idx + 1, DAY_NAMES[idx])
}

// ---------------------------------------------------------------------------
// Senders
// ---------------------------------------------------------------------------

fn sender_stats(rows: &[TransferRecord]) -> Vec<SenderRow> {
    let mut groups: BTreeMap<String, (HashSet<&str>, Option<Decimal>)> = BTreeMap::new();
    for row in rows {
        let Some(sender) = &row.sender_address else {
            continue;
        };
        let entry = groups.entry(sender.clone()).or_default();
        entry.0.insert(row.id.as_str());
        add_opt(&mut entry.1, row.amount_usd);
    }

    groups
        .into_iter()
        .map(|(address, (ids, volume_usd))| SenderRow {
            address,
            transfer_count: ids.len() as u64,
            volume_usd,
        })
        .collect()
}

pub fn top_senders_by_count(rows: &[TransferRecord], limit: usize) -> Vec<SenderRow> {
    let mut senders = sender_stats(rows);
    senders.sort_by(|a, b| b.transfer_count.cmp(&a.transfer_count));
    senders.truncate(limit);
    senders
}

pub fn top_senders_by_volume(rows: &[TransferRecord], limit: usize) -> Vec<SenderRow> {
    let mut senders = sender_stats(rows);
    senders.sort_by(|a, b| {
        b.volume_usd
            .unwrap_or(Decimal::ZERO)
            .cmp(&a.volume_usd.unwrap_or(Decimal::ZERO))
    });
    senders.truncate(limit);
    senders
}

/// Senders bucketed by how many transfers they made.
pub fn sender_tx_categories(rows: &[TransferRecord]) -> Vec<CategoryCount> {
    let bounds: [(u64, &str); 6] = [
        (1, "1 Tx"),
        (5, "2-5 Txs"),
        (10, "6-10 Txs"),
        (20, "11-20 Txs"),
        (50, "21-50 Txs"),
        (100, "51-100 Txs"),
    ];

    let mut counts: Vec<CategoryCount> = bounds
        .iter()
        .map(|(_, label)| CategoryCount {
            label: (*label).to_string(),
            sender_count: 0,
        })
        .collect();
    counts.push(CategoryCount {
        label: ">100 Txs".to_string(),
        sender_count: 0,
    });

    for sender in sender_stats(rows) {
        let idx = bounds
            .iter()
            .position(|(bound, _)| sender.transfer_count <= *bound)
            .unwrap_or(bounds.len());
        counts[idx].sender_count += 1;
    }
    counts
}

/// Senders bucketed by their total USD volume. Senders with no USD
/// amounts at all land in the lowest band.
pub fn sender_volume_categories(rows: &[TransferRecord]) -> Vec<CategoryCount> {
    let bounds: [(Decimal, &str); 5] = [
        (Decimal::ONE, "< $1"),
        (Decimal::from(10), "$1-$10"),
        (Decimal::from(100), "$10-$100"),
        (Decimal::from(1_000), "$100-$1k"),
        (Decimal::from(10_000), "$1k-$10k"),
    ];

    let mut counts: Vec<CategoryCount> = bounds
        .iter()
        .map(|(_, label)| CategoryCount {
            label: (*label).to_string(),
            sender_count: 0,
        })
        .collect();
    counts.push(CategoryCount {
        label: "> $10k".to_string(),
        sender_count: 0,
    });

    for sender in sender_stats(rows) {
        let volume = sender.volume_usd.unwrap_or(Decimal::ZERO);
        let idx = bounds
            .iter()
            .position(|(bound, _)| volume <= *bound)
            .unwrap_or(bounds.len());
        counts[idx].sender_count += 1;
    }
    counts
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

/// Whole-range headline stats for the KPI cards.
pub fn summary(rows: &[TransferRecord]) -> SummaryStats {
    let mut acc = Acc::default();
    let mut paths: HashSet<(String, String)> = HashSet::new();
    let mut source_chains: HashSet<&str> = HashSet::new();
    let mut destination_chains: HashSet<&str> = HashSet::new();
    let mut fees: Vec<Decimal> = Vec::new();

    for row in rows {
        acc.add(row);
        // Chain counts skip missing values instead of counting "Unknown".
        if let Some(source) = &row.source_chain {
            source_chains.insert(source);
            if let Some(destination) = &row.destination_chain {
                paths.insert((source.clone(), destination.clone()));
            }
        }
        if let Some(destination) = &row.destination_chain {
            destination_chains.insert(destination);
        }
        if let Some(fee) = row.fee_usd {
            fees.push(fee);
        }
    }

    SummaryStats {
        transfer_count: acc.ids.len() as u64,
        sender_count: acc.senders.len() as u64,
        volume: acc.volume,
        volume_usd: acc.volume_usd,
        fee_total: acc.fee_usd,
        fee_median: median(&mut fees),
        path_count: paths.len() as u64,
        source_chain_count: source_chains.len() as u64,
        destination_chain_count: destination_chains.len() as u64,
    }
}

/// Median of the non-null values; null when there are none.
fn median(values: &mut [Decimal]) -> Option<Decimal> {
    if values.is_empty() {
        return None;
    }
    values.sort();
    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        Some(values[mid])
    } else {
        Some((values[mid - 1] + values[mid]) / Decimal::from(2))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
