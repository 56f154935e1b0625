//! Conversions between `quarry_core::Value` and the wire values of
//! `mysql_async`.

use mysql_async::Params;
use mysql_async::consts::ColumnType;
use quarry_core::Value;

/// Build positional statement parameters from bound values.
pub(crate) fn to_mysql_params(params: &[Value]) -> Params {
    if params.is_empty() {
        Params::Empty
    } else {
        Params::Positional(params.iter().map(to_mysql_value).collect())
    }
}

pub(crate) fn to_mysql_value(value: &Value) -> mysql_async::Value {
    match value {
        Value::Null => mysql_async::Value::NULL,
        Value::Bool(v) => mysql_async::Value::Int(i64::from(*v)),
        Value::Int8(v) => mysql_async::Value::Int(i64::from(*v)),
        Value::Int16(v) => mysql_async::Value::Int(i64::from(*v)),
        Value::Int32(v) => mysql_async::Value::Int(i64::from(*v)),
        Value::Int64(v) => mysql_async::Value::Int(*v),
        Value::Float32(v) => mysql_async::Value::Float(*v),
        Value::Float64(v) => mysql_async::Value::Double(*v),
        Value::Decimal(v) => mysql_async::Value::Bytes(v.clone().into_bytes()),
        Value::String(v) => mysql_async::Value::Bytes(v.clone().into_bytes()),
        Value::Bytes(v) => mysql_async::Value::Bytes(v.clone()),
        Value::Uuid(v) => mysql_async::Value::Bytes(v.to_string().into_bytes()),
        Value::Date(v) => {
            use chrono::Datelike;
            mysql_async::Value::Date(v.year() as u16, v.month() as u8, v.day() as u8, 0, 0, 0, 0)
        }
        Value::Time(v) => {
            use chrono::Timelike;
            mysql_async::Value::Time(
                false,
                0,
                v.hour() as u8,
                v.minute() as u8,
                v.second() as u8,
                v.nanosecond() / 1000,
            )
        }
        Value::DateTime(v) => {
            use chrono::{Datelike, Timelike};
            mysql_async::Value::Date(
                v.year() as u16,
                v.month() as u8,
                v.day() as u8,
                v.hour() as u8,
                v.minute() as u8,
                v.second() as u8,
                v.nanosecond() / 1000,
            )
        }
        Value::DateTimeUtc(v) => {
            use chrono::{Datelike, Timelike};
            mysql_async::Value::Date(
                v.year() as u16,
                v.month() as u8,
                v.day() as u8,
                v.hour() as u8,
                v.minute() as u8,
                v.second() as u8,
                v.nanosecond() / 1000,
            )
        }
        Value::Json(v) => mysql_async::Value::Bytes(v.to_string().into_bytes()),
        // MySQL has no array type; encode as a JSON document
        Value::Array(arr) => {
            let json = serde_json::to_string(arr).unwrap_or_else(|_| "[]".to_string());
            mysql_async::Value::Bytes(json.into_bytes())
        }
    }
}

/// Convert a wire value back to a `Value`, using column type metadata to
/// correctly interpret byte strings from the text protocol.
pub(crate) fn from_mysql_value(val: mysql_async::Value, col_type: ColumnType) -> Value {
    match val {
        mysql_async::Value::NULL => Value::Null,
        mysql_async::Value::Bytes(bytes) => match String::from_utf8(bytes) {
            Ok(s) => match col_type {
                ColumnType::MYSQL_TYPE_TINY
                | ColumnType::MYSQL_TYPE_SHORT
                | ColumnType::MYSQL_TYPE_LONG
                | ColumnType::MYSQL_TYPE_LONGLONG
                | ColumnType::MYSQL_TYPE_INT24
                | ColumnType::MYSQL_TYPE_YEAR => {
                    s.parse::<i64>().map(Value::Int64).unwrap_or(Value::String(s))
                }
                ColumnType::MYSQL_TYPE_FLOAT => {
                    s.parse::<f32>().map(Value::Float32).unwrap_or(Value::String(s))
                }
                ColumnType::MYSQL_TYPE_DOUBLE => {
                    s.parse::<f64>().map(Value::Float64).unwrap_or(Value::String(s))
                }
                ColumnType::MYSQL_TYPE_DECIMAL | ColumnType::MYSQL_TYPE_NEWDECIMAL => {
                    Value::Decimal(s)
                }
                ColumnType::MYSQL_TYPE_JSON => serde_json::from_str(&s)
                    .map(Value::Json)
                    .unwrap_or(Value::String(s)),
                _ => Value::String(s),
            },
            Err(err) => Value::Bytes(err.into_bytes()),
        },
        mysql_async::Value::Int(i) => Value::Int64(i),
        mysql_async::Value::UInt(u) => {
            if u <= i64::MAX as u64 {
                Value::Int64(u as i64)
            } else {
                Value::String(u.to_string())
            }
        }
        mysql_async::Value::Float(f) => Value::Float32(f),
        mysql_async::Value::Double(d) => Value::Float64(d),
        mysql_async::Value::Date(year, month, day, hour, min, sec, micro) => {
            if hour == 0 && min == 0 && sec == 0 && micro == 0 {
                if let Some(date) =
                    chrono::NaiveDate::from_ymd_opt(year as i32, month as u32, day as u32)
                {
                    Value::Date(date)
                } else {
                    Value::String(format!("{:04}-{:02}-{:02}", year, month, day))
                }
            } else if let Some(dt) =
                chrono::NaiveDate::from_ymd_opt(year as i32, month as u32, day as u32)
                    .and_then(|d| d.and_hms_micro_opt(hour as u32, min as u32, sec as u32, micro))
            {
                Value::DateTime(dt)
            } else {
                Value::String(format!(
                    "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
                    year, month, day, hour, min, sec
                ))
            }
        }
        mysql_async::Value::Time(negative, days, hours, mins, secs, micros) => {
            let total_hours = (days as u32) * 24 + (hours as u32);
            let sign = if negative { "-" } else { "" };
            Value::String(format!(
                "{}{:02}:{:02}:{:02}.{:06}",
                sign, total_hours, mins, secs, micros
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positional_params() {
        let params = to_mysql_params(&[Value::Int64(7), Value::String("x".into())]);
        match params {
            Params::Positional(values) => {
                assert_eq!(values.len(), 2);
                assert_eq!(values[0], mysql_async::Value::Int(7));
                assert_eq!(values[1], mysql_async::Value::Bytes(b"x".to_vec()));
            }
            other => panic!("expected positional params, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_params() {
        assert!(matches!(to_mysql_params(&[]), Params::Empty));
    }

    #[test]
    fn test_integer_text_protocol_decode() {
        let value = from_mysql_value(
            mysql_async::Value::Bytes(b"42".to_vec()),
            ColumnType::MYSQL_TYPE_LONGLONG,
        );
        assert_eq!(value, Value::Int64(42));
    }

    #[test]
    fn test_decimal_decodes_as_decimal_string() {
        let value = from_mysql_value(
            mysql_async::Value::Bytes(b"12.50".to_vec()),
            ColumnType::MYSQL_TYPE_NEWDECIMAL,
        );
        assert_eq!(value, Value::Decimal("12.50".to_string()));
    }

    #[test]
    fn test_date_without_time_decodes_as_date() {
        let value = from_mysql_value(
            mysql_async::Value::Date(2024, 3, 9, 0, 0, 0, 0),
            ColumnType::MYSQL_TYPE_DATE,
        );
        assert_eq!(
            value,
            Value::Date(chrono::NaiveDate::from_ymd_opt(2024, 3, 9).unwrap())
        );
    }

    #[test]
    fn test_bool_encodes_as_int() {
        assert_eq!(to_mysql_value(&Value::Bool(true)), mysql_async::Value::Int(1));
    }
}
