use serde::{Deserialize, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Response envelope
// ---------------------------------------------------------------------------

/// The analytics endpoints wrap lists as `{"data": [...]}`, while the
/// asset registry returns a bare list. Both decode here.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum DataEnvelope<T> {
    Wrapped { data: Vec<T> },
    Bare(Vec<T>),
}

impl<T> DataEnvelope<T> {
    pub fn into_inner(self) -> Vec<T> {
        match self {
            DataEnvelope::Wrapped { data } => data,
            DataEnvelope::Bare(items) => items,
        }
    }
}

// ---------------------------------------------------------------------------
// Chart / top-assets endpoints
// ---------------------------------------------------------------------------

/// One per-day point from `GMPChart`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChartPoint {
    /// Unix milliseconds.
    #[serde(default)]
    pub timestamp: Option<i64>,
    #[serde(default)]
    pub volume: Option<f64>,
    #[serde(default)]
    pub num_txs: Option<u64>,
}

/// One per-asset total from `GMPTopITSAssets`; `key` is the token address.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TopAsset {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub volume: Option<f64>,
    #[serde(default)]
    pub num_txs: Option<u64>,
}

/// Asset registry entry from `getITSAssets`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ItsAsset {
    #[serde(default)]
    pub symbol: Option<String>,
    /// Either a JSON array of addresses or a stringified array.
    #[serde(default)]
    pub addresses: Option<Value>,
}

impl ItsAsset {
    /// Parse `addresses` regardless of which of the two shapes arrived.
    pub fn address_list(&self) -> Vec<String> {
        match &self.addresses {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_owned))
                .collect(),
            Some(Value::String(s)) => serde_json::from_str::<Vec<String>>(s).unwrap_or_default(),
            _ => Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// searchGMP records
// ---------------------------------------------------------------------------

/// One raw GMP execution record from `searchGMP`.
///
/// Every field is optional and the nested sub-objects may be absent
/// entirely; amount/fee/timestamp values stay `serde_json::Value` because
/// the upstream mixes numbers, numeric strings, and ISO strings. The
/// normalization pipeline resolves them once into `TransferRecord` —
/// nothing downstream touches these raw shapes.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GmpRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub call: Option<CallInfo>,
    #[serde(default)]
    pub executed: Option<TxInfo>,
    #[serde(default)]
    pub approved: Option<TxInfo>,
    #[serde(default)]
    pub confirm: Option<TxInfo>,
    #[serde(default)]
    pub transaction: Option<TxInfo>,
    #[serde(default)]
    pub interchain_transfer: Option<InterchainTransfer>,
    #[serde(default)]
    pub fees: Option<Fees>,
    #[serde(default)]
    pub gas: Option<GasInfo>,
    #[serde(default)]
    pub gas_price_rate: Option<GasPriceRate>,
    #[serde(default, rename = "sourceChain")]
    pub source_chain: Option<String>,
    #[serde(default)]
    pub origin_chain: Option<String>,
    #[serde(default, rename = "destinationChain")]
    pub destination_chain: Option<String>,
    #[serde(default)]
    pub callback_chain: Option<String>,
    #[serde(default, rename = "sourceAddress")]
    pub source_address: Option<String>,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub amount: Option<Value>,
    #[serde(default)]
    pub value: Option<Value>,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub block_timestamp: Option<Value>,
    #[serde(default)]
    pub timestamp: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CallInfo {
    #[serde(default)]
    pub chain: Option<String>,
    #[serde(default, rename = "returnValues")]
    pub return_values: Option<ReturnValues>,
    #[serde(default)]
    pub transaction: Option<TxMeta>,
    #[serde(default)]
    pub block_timestamp: Option<Value>,
    #[serde(default)]
    pub timestamp: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ReturnValues {
    #[serde(default, rename = "destinationChain")]
    pub destination_chain: Option<String>,
    #[serde(default, rename = "destinationContractAddress")]
    pub destination_contract_address: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TxMeta {
    #[serde(default)]
    pub from: Option<String>,
}

/// Timestamp-bearing status sub-object (`executed`, `approved`, ...).
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TxInfo {
    #[serde(default)]
    pub block_timestamp: Option<Value>,
    #[serde(default)]
    pub timestamp: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct InterchainTransfer {
    #[serde(default)]
    pub amount: Option<Value>,
    #[serde(default)]
    pub value: Option<Value>,
    #[serde(default, rename = "sourceAddress")]
    pub source_address: Option<String>,
    #[serde(default, rename = "destinationAddress")]
    pub destination_address: Option<String>,
    #[serde(default, rename = "sourceChain")]
    pub source_chain: Option<String>,
    #[serde(default, rename = "destinationChain")]
    pub destination_chain: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Fees {
    #[serde(default)]
    pub base_fee_usd: Option<Value>,
    #[serde(default)]
    pub express_fee_usd: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GasInfo {
    #[serde(default)]
    pub gas_used_amount: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GasPriceRate {
    #[serde(default)]
    pub source_token: Option<SourceToken>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SourceToken {
    #[serde(default)]
    pub token_price: Option<TokenPrice>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TokenPrice {
    #[serde(default)]
    pub usd: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_wrapped_and_bare() {
        let wrapped: DataEnvelope<ChartPoint> =
            serde_json::from_value(json!({"data": [{"timestamp": 1, "num_txs": 2}]})).unwrap();
        assert_eq!(wrapped.into_inner().len(), 1);

        let bare: DataEnvelope<ChartPoint> =
            serde_json::from_value(json!([{"timestamp": 1}])).unwrap();
        assert_eq!(bare.into_inner().len(), 1);
    }

    #[test]
    fn test_asset_addresses_array_or_string() {
        let from_array: ItsAsset =
            serde_json::from_value(json!({"symbol": "ATH", "addresses": ["0xabc", "0xdef"]}))
                .unwrap();
        assert_eq!(from_array.address_list(), vec!["0xabc", "0xdef"]);

        let from_string: ItsAsset =
            serde_json::from_value(json!({"symbol": "ATH", "addresses": "[\"0xabc\"]"})).unwrap();
        assert_eq!(from_string.address_list(), vec!["0xabc"]);

        let missing: ItsAsset = serde_json::from_value(json!({"symbol": "ATH"})).unwrap();
        assert!(missing.address_list().is_empty());
    }
}
