use serde::{de::DeserializeOwned, Deserialize, Deserializer};
use serde_json::Value;

/// One market (base/quote pool) for a token as reported by DEX Screener.
///
/// Upstream data is inconsistent, so every field is optional and a value of
/// the wrong JSON type decodes as absent instead of rejecting the record.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TradingPair {
    #[serde(default, deserialize_with = "lenient_string")]
    pub chain_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub chain: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub dex_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub pair_address: Option<String>,
    #[serde(default, deserialize_with = "lenient_object")]
    pub base_token: TokenRef,
    #[serde(default, deserialize_with = "lenient_object")]
    pub quote_token: TokenRef,
    #[serde(default, deserialize_with = "lenient_object")]
    pub liquidity: Liquidity,
    #[serde(default, deserialize_with = "lenient_object")]
    pub txns: Txns,
    #[serde(default, deserialize_with = "lenient_object")]
    pub price_change: PriceChange,
    /// Promotion data; only its truthiness matters
    #[serde(default)]
    pub boosts: Option<Value>,
    /// Epoch milliseconds
    #[serde(default, deserialize_with = "lenient_i64")]
    pub pair_created_at: Option<i64>,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct TokenRef {
    #[serde(default, deserialize_with = "lenient_string")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub symbol: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Liquidity {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub usd: Option<f64>,
}

/// Transaction counts per trailing window
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Txns {
    #[serde(default, deserialize_with = "lenient_object")]
    pub m5: TxnWindow,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct TxnWindow {
    #[serde(default, deserialize_with = "lenient_count")]
    pub buys: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub sells: u64,
}

/// Signed percentage price changes
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct PriceChange {
    #[serde(default, deserialize_with = "lenient_number")]
    pub m5: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub h1: Option<f64>,
}

impl TradingPair {
    /// Chain identifier from `chainId`, falling back to `chain`.
    pub fn chain_identifier(&self) -> Option<&str> {
        self.chain_id
            .as_deref()
            .filter(|c| !c.is_empty())
            .or(self.chain.as_deref())
    }

    /// Pool liquidity in USD, 0.0 when missing.
    pub fn liquidity_usd(&self) -> f64 {
        self.liquidity.usd.unwrap_or(0.0)
    }

    pub fn is_boosted(&self) -> bool {
        self.boosts.as_ref().is_some_and(truthy)
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite())
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(number(&Value::deserialize(deserializer)?))
}

/// Like `lenient_f64` but only JSON numbers count; numeric strings are absent
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        _ => None,
    })
}

fn lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match &value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|v| v as i64)),
        _ => number(&value).map(|v| v as i64),
    })
}

fn lenient_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(number(&value).filter(|v| *v > 0.0).map_or(0, |v| v as u64))
}

fn lenient_object<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}
