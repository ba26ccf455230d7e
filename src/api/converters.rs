use crate::api::models::{CURRENCY, FUNDING_TICKER, TRADING_TICKER};
use crate::core::kernel::{build_records, RecordBuilder, Transformer};
use serde_json::{Map, Value};

/// Number of config tables the currency listing merges
pub const CURRENCY_TABLES: usize = 6;

fn ticker_builder(symbol: &str) -> RecordBuilder {
    if symbol.starts_with('t') {
        TRADING_TICKER
    } else {
        FUNDING_TICKER
    }
}

/// Single-symbol tickers come back without their symbol; put it in front
pub fn ticker_transformer(symbol: &str) -> Transformer {
    let symbol = symbol.to_string();
    Transformer::function(move |data| {
        let mut row = vec![Value::String(symbol.clone())];
        if let Value::Array(items) = data {
            row.extend(items);
        }
        Ok(ticker_builder(&symbol).build(&Value::Array(row)))
    })
}

/// Multi-symbol tickers carry their symbol first; pick the layout per row
pub fn tickers_transformer() -> Transformer {
    Transformer::function(|data| {
        let Value::Array(rows) = data else {
            return Ok(data);
        };

        Ok(Value::Array(
            rows.iter()
                .map(|row| {
                    let symbol = row.get(0).and_then(Value::as_str).unwrap_or_default();
                    ticker_builder(symbol).build(row)
                })
                .collect(),
        ))
    })
}

/// `[k, v]` pairs (or bare keys) into a lookup map
fn table_to_map(table: &Value) -> Map<String, Value> {
    let mut map = Map::new();
    for entry in table.as_array().map(Vec::as_slice).unwrap_or_default() {
        match entry {
            Value::Array(pair) if pair.len() > 1 => {
                if let Some(key) = key_string(&pair[0]) {
                    map.insert(key, pair[1].clone());
                }
            }
            Value::Array(_) => {}
            other => {
                if let Some(key) = key_string(other) {
                    map.insert(key, other.clone());
                }
            }
        }
    }
    map
}

fn key_string(value: &Value) -> Option<String> {
    match value {
        Value::String(key) => Some(key.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

/// Join the six currency config tables into `[id, name, pool, explorer, symbol, walletFx]` rows
///
/// Tables, in order: listed currencies, symbol map, label map, pool map,
/// explorer map, wallet fx map. Anything else is returned untouched.
pub fn merge_currency_tables(data: Value) -> Value {
    let tables = match data.as_array() {
        Some(tables) if tables.len() == CURRENCY_TABLES => tables,
        _ => return data,
    };

    let listed = table_to_map(&tables[0]);
    let symbols = table_to_map(&tables[1]);
    let labels = table_to_map(&tables[2]);
    let pools = table_to_map(&tables[3]);
    let mut explorers = table_to_map(&tables[4]);
    let wallet_fx = table_to_map(&tables[5]);

    // currencies living in a pool inherit the pool's explorers
    for (currency, pool) in &pools {
        if explorers.contains_key(currency) {
            continue;
        }
        let inherited = pool.as_str().and_then(|pool| explorers.get(pool)).cloned();
        if let Some(inherited) = inherited {
            explorers.insert(currency.clone(), inherited);
        }
    }

    let mut names = listed;
    for (key, value) in symbols.iter().chain(labels.iter()) {
        names.insert(key.clone(), value.clone());
    }

    let rows = names
        .iter()
        .map(|(id, name)| {
            Value::Array(vec![
                Value::String(id.clone()),
                name.clone(),
                pools.get(id).cloned().unwrap_or(Value::Null),
                explorers
                    .get(id)
                    .cloned()
                    .unwrap_or_else(|| Value::Array(Vec::new())),
                symbols
                    .get(id)
                    .cloned()
                    .unwrap_or_else(|| Value::String(id.clone())),
                wallet_fx
                    .get(id)
                    .cloned()
                    .unwrap_or_else(|| Value::Array(Vec::new())),
            ])
        })
        .collect();

    Value::Array(rows)
}

pub fn currencies_transformer() -> Transformer {
    Transformer::function(|data| Ok(build_records(merge_currency_tables(data), &CURRENCY)))
}

/// First entry of a notification's info field, or an empty row
pub fn first_notified_row(notification: &Value) -> Value {
    let info = match notification {
        Value::Array(items) => items.get(4),
        Value::Object(fields) => fields.get("notifyInfo"),
        _ => None,
    };

    info.and_then(Value::as_array)
        .and_then(|rows| rows.first())
        .cloned()
        .unwrap_or_else(|| Value::Array(Vec::new()))
}
