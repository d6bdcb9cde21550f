//! Matcher column codec
//!
//! Rules keep each matcher as an `(operator, value)` pair of text columns.
//! Values are decided once at load time: amounts become decimals, account ids
//! become numbers, transaction types become their single-letter code. A value
//! that does not parse stays text, so it simply fails to match.

use std::str::FromStr;

use rusqlite::types::Value;
use rust_decimal::Decimal;
use tally_core::rule::{AttrValue, Attribute, Matcher, Operator, RuleId, TransactionType};
use tracing::warn;

use crate::error::{Result, SqliteError};

/// Column holding a matcher's value
pub(crate) fn value_column(attribute: Attribute) -> &'static str {
    match attribute {
        Attribute::Description => "description_value",
        Attribute::Amount => "amount_value",
        Attribute::Type => "type_value",
        Attribute::AccountFrom => "account_from_value",
        Attribute::AccountTo => "account_to_value",
    }
}

/// Text form of a matcher value for storage
pub(crate) fn store_value(value: &AttrValue) -> String {
    match value {
        AttrValue::Text(s) => s.clone(),
        AttrValue::Number(n) => n.to_string(),
    }
}

/// Rebuild a matcher from its stored operator and value
pub(crate) fn load_matcher(
    rule_id: RuleId,
    attribute: Attribute,
    operator: &str,
    value: Value,
) -> Result<Matcher> {
    let operator = Operator::parse(operator);
    let value = match value {
        Value::Null => None,
        Value::Integer(i) => Some(Raw::Number(Decimal::from(i))),
        Value::Real(f) => {
            let n = Decimal::try_from(f).map_err(|_| SqliteError::InvalidValue {
                column: value_column(attribute),
                value: f.to_string(),
            })?;
            Some(Raw::Number(n))
        }
        Value::Text(s) => Some(Raw::Text(s)),
        Value::Blob(_) => {
            return Err(SqliteError::InvalidValue {
                column: value_column(attribute),
                value: "<blob>".to_string(),
            })
        }
    };

    let value = value.map(|raw| typed_value(rule_id, attribute, raw));
    Ok(Matcher::new(operator, value))
}

enum Raw {
    Text(String),
    Number(Decimal),
}

fn typed_value(rule_id: RuleId, attribute: Attribute, raw: Raw) -> AttrValue {
    match (attribute, raw) {
        (Attribute::Description, Raw::Text(s)) => AttrValue::Text(s),
        (Attribute::Description, Raw::Number(n)) => AttrValue::Text(n.to_string()),

        (Attribute::Amount, Raw::Number(n)) => AttrValue::Number(n),
        (Attribute::Amount, Raw::Text(s)) => match Decimal::from_str(s.trim()) {
            Ok(n) => AttrValue::Number(n),
            Err(_) => unparsable(rule_id, attribute, s),
        },

        (Attribute::Type, Raw::Text(s)) => match TransactionType::parse(&s) {
            Some(ty) => AttrValue::Text(ty.code().to_string()),
            None => unparsable(rule_id, attribute, s),
        },
        (Attribute::Type, Raw::Number(n)) => unparsable(rule_id, attribute, n.to_string()),

        (Attribute::AccountFrom | Attribute::AccountTo, Raw::Number(n)) => AttrValue::Number(n),
        (Attribute::AccountFrom | Attribute::AccountTo, Raw::Text(s)) => {
            match s.trim().parse::<i64>() {
                Ok(id) => AttrValue::Number(Decimal::from(id)),
                Err(_) => unparsable(rule_id, attribute, s),
            }
        }
    }
}

fn unparsable(rule_id: RuleId, attribute: Attribute, value: String) -> AttrValue {
    warn!(
        rule_id,
        %attribute,
        value = %value,
        "stored matcher value does not parse, keeping as text"
    );
    AttrValue::Text(value)
}
