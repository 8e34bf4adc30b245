use serde::{Deserialize, Serialize};
use std::fmt;
use crate::domain::entity::data_type::ColumnType;
use crate::domain::entity::money::{Money, MONEY_MAX};
use thiserror::Error;

// 値変換エラーの定義
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValueError {
    #[error("'{input}' is not a valid {column_type} value: {reason}")]
    Format {
        column_type: ColumnType,
        input: String,
        reason: String,
    },

    #[error("{value} exceeds the maximum allowed amount of {max}")]
    Range { value: Money, max: Money },
}

impl ValueError {
    fn format(column_type: &ColumnType, input: &str, reason: impl fmt::Display) -> Self {
        ValueError::Format {
            column_type: column_type.clone(),
            input: input.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// `$Invl` カラムの区間値。始点と終点の大小は検証しない
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Interval {
    pub start: f64,
    pub end: f64,
}

impl Interval {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

// テーブル内の値の表現。NULLは存在しない
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Integer(i64),
    Real(f64),
    Char(char),
    Text(String),
    Money(Money),
    Interval(Interval),
}

impl Value {
    /// この値に対応する型タグ（未知のタグは `string` に寄せる）
    pub fn column_type(&self) -> ColumnType {
        match self {
            Value::Integer(_) => ColumnType::Integer,
            Value::Real(_) => ColumnType::Real,
            Value::Char(_) => ColumnType::Char,
            Value::Text(_) => ColumnType::Text,
            Value::Money(_) => ColumnType::Money,
            Value::Interval(_) => ColumnType::Interval,
        }
    }
}

/// 生の入力文字列をカラム型に従って型付きの値へ変換する
///
/// 副作用はなく、同じ入力には常に同じ結果を返す。
pub fn coerce(raw: &str, column_type: &ColumnType) -> Result<Value, ValueError> {
    match column_type {
        ColumnType::Integer => raw
            .trim()
            .parse::<i64>()
            .map(Value::Integer)
            .map_err(|e| ValueError::format(column_type, raw, e)),

        ColumnType::Real => parse_real(raw)
            .map(Value::Real)
            .map_err(|reason| ValueError::format(column_type, raw, reason)),

        ColumnType::Char => {
            let mut chars = raw.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(Value::Char(c)),
                _ => Err(ValueError::format(
                    column_type,
                    raw,
                    "expected exactly one character",
                )),
            }
        }

        ColumnType::Money => {
            let money: Money = raw
                .parse()
                .map_err(|e| ValueError::format(column_type, raw, e))?;
            if money > MONEY_MAX {
                return Err(ValueError::Range {
                    value: money,
                    max: MONEY_MAX,
                });
            }
            Ok(Value::Money(money))
        }

        ColumnType::Interval => {
            let parts: Vec<&str> = raw.split('-').collect();
            let [start, end] = parts.as_slice() else {
                return Err(ValueError::format(
                    column_type,
                    raw,
                    "expected exactly one '-' between start and end",
                ));
            };
            let start = parse_real(start)
                .map_err(|reason| ValueError::format(column_type, raw, format!("start {}", reason)))?;
            let end = parse_real(end)
                .map_err(|reason| ValueError::format(column_type, raw, format!("end {}", reason)))?;
            Ok(Value::Interval(Interval::new(start, end)))
        }

        // 未知のタグは文字列として素通しする
        ColumnType::Text | ColumnType::Other(_) => Ok(Value::Text(raw.to_string())),
    }
}

// JSON文書に書けない NaN / inf は受け付けない
fn parse_real(raw: &str) -> Result<f64, String> {
    let parsed = raw.trim().parse::<f64>().map_err(|e| e.to_string())?;
    if parsed.is_finite() {
        Ok(parsed)
    } else {
        Err("is not a finite number".to_string())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Integer(i) => write!(f, "{}", i),
            Value::Real(n) => write!(f, "{}", n),
            Value::Char(c) => write!(f, "{}", c),
            Value::Text(s) => write!(f, "{}", s),
            Value::Money(m) => write!(f, "{}", m),
            Value::Interval(iv) => write!(f, "{}", iv),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn money(raw: &str) -> Money {
        raw.parse().unwrap()
    }

    #[test_case("42", ColumnType::Integer, Value::Integer(42))]
    #[test_case(" -7 ", ColumnType::Integer, Value::Integer(-7))]
    #[test_case("3.25", ColumnType::Real, Value::Real(3.25))]
    #[test_case("1e3", ColumnType::Real, Value::Real(1000.0))]
    #[test_case("x", ColumnType::Char, Value::Char('x'))]
    #[test_case("é", ColumnType::Char, Value::Char('é'))]
    #[test_case("", ColumnType::Text, Value::Text(String::new()))]
    #[test_case("  any text  ", ColumnType::Text, Value::Text("  any text  ".to_string()))]
    #[test_case("12.50", ColumnType::Money, Value::Money(money("12.50")))]
    #[test_case("10000000000000.00", ColumnType::Money, Value::Money(MONEY_MAX))]
    #[test_case("-5000000000000000", ColumnType::Money, Value::Money(money("-5000000000000000")))]
    #[test_case("1.5-3", ColumnType::Interval, Value::Interval(Interval::new(1.5, 3.0)))]
    #[test_case("9 - 2", ColumnType::Interval, Value::Interval(Interval::new(9.0, 2.0)))]
    #[test_case("whatever", ColumnType::Other("date".into()), Value::Text("whatever".to_string()))]
    fn coerces_valid_input(raw: &str, column_type: ColumnType, expected: Value) {
        assert_eq!(coerce(raw, &column_type), Ok(expected));
    }

    #[test_case("abc", ColumnType::Integer)]
    #[test_case("9223372036854775808", ColumnType::Integer)]
    #[test_case("1.5", ColumnType::Integer)]
    #[test_case("", ColumnType::Real)]
    #[test_case("NaN", ColumnType::Real)]
    #[test_case("inf", ColumnType::Real)]
    #[test_case("", ColumnType::Char)]
    #[test_case("ab", ColumnType::Char)]
    #[test_case("12,50", ColumnType::Money)]
    #[test_case("1-2-3", ColumnType::Interval)]
    #[test_case("-1-2", ColumnType::Interval)]
    #[test_case("12", ColumnType::Interval)]
    #[test_case("a-2", ColumnType::Interval)]
    #[test_case("1-", ColumnType::Interval)]
    fn rejects_malformed_input(raw: &str, column_type: ColumnType) {
        assert!(matches!(
            coerce(raw, &column_type),
            Err(ValueError::Format { .. })
        ));
    }

    #[test]
    fn money_above_maximum_is_a_range_error() {
        let err = coerce("99999999999999.99", &ColumnType::Money).unwrap_err();
        assert_eq!(
            err,
            ValueError::Range {
                value: money("99999999999999.99"),
                max: MONEY_MAX,
            }
        );

        let err = coerce("10000000000000.01", &ColumnType::Money).unwrap_err();
        assert!(matches!(err, ValueError::Range { .. }));
    }

    #[test]
    fn coercion_is_deterministic() {
        for column_type in [ColumnType::Integer, ColumnType::Money, ColumnType::Interval] {
            assert_eq!(coerce("5-6", &column_type), coerce("5-6", &column_type));
            assert_eq!(coerce("12", &column_type), coerce("12", &column_type));
        }
    }

    #[test]
    fn values_serialize_with_type_tag() {
        let json = serde_json::to_string(&vec![
            Value::Integer(5),
            Value::Money(money("12.50")),
            Value::Interval(Interval::new(1.0, 2.5)),
        ])
        .unwrap();
        assert_eq!(
            json,
            r#"[{"Integer":5},{"Money":"12.50"},{"Interval":{"Start":1.0,"End":2.5}}]"#
        );
    }
}
