use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use thiserror::Error;

/// 小数部の最大桁数
pub const MAX_SCALE: u32 = 28;

/// 有効数字の最大桁数
pub const MAX_DIGITS: usize = 28;

/// `$` カラムに格納できる上限額（この値ちょうどは許可）
pub const MONEY_MAX: Money = Money::new(1_000_000_000_000_000, 2);

const FRACTION_ONE: i128 = 10_i128.pow(MAX_SCALE);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MoneyParseError {
    #[error("no digits found")]
    Empty,

    #[error("invalid character '{0}'")]
    InvalidCharacter(char),

    #[error("more than {} fractional digits", MAX_SCALE)]
    TooPrecise,

    #[error("more than {} significant digits", MAX_DIGITS)]
    Overflow,
}

/// 固定小数点の金額
///
/// 仮数部と小数桁数の組で保持する。比較は数値として行い（`12.5 == 12.50`）、
/// 表示と保存には入力時の桁数をそのまま使う。
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Money {
    mantissa: i128,
    scale: u32,
}

impl Money {
    pub const fn new(mantissa: i128, scale: u32) -> Self {
        Self { mantissa, scale }
    }

    pub fn mantissa(&self) -> i128 {
        self.mantissa
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }

    // (整数部, 小数部を MAX_SCALE 桁に揃えた値)。負数は両方とも負になる
    fn ordering_key(&self) -> (i128, i128) {
        let unit = 10_i128.pow(self.scale);
        let integer = self.mantissa / unit;
        let fraction = (self.mantissa % unit) * (FRACTION_ONE / unit);
        (integer, fraction)
    }
}

impl PartialEq for Money {
    fn eq(&self, other: &Self) -> bool {
        self.ordering_key() == other.ordering_key()
    }
}

impl Eq for Money {}

impl Hash for Money {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.ordering_key().hash(state);
    }
}

impl PartialOrd for Money {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Money {
    fn cmp(&self, other: &Self) -> Ordering {
        self.ordering_key().cmp(&other.ordering_key())
    }
}

impl FromStr for Money {
    type Err = MoneyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (negative, unsigned) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s.strip_prefix('+').unwrap_or(s)),
        };

        let (integer, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));
        if integer.is_empty() && fraction.is_empty() {
            return Err(MoneyParseError::Empty);
        }
        if let Some(c) = integer.chars().chain(fraction.chars()).find(|c| !c.is_ascii_digit()) {
            return Err(MoneyParseError::InvalidCharacter(c));
        }
        if fraction.len() > MAX_SCALE as usize {
            return Err(MoneyParseError::TooPrecise);
        }

        let significant = integer.trim_start_matches('0').len()
            + if integer.trim_start_matches('0').is_empty() {
                fraction.trim_start_matches('0').len()
            } else {
                fraction.len()
            };
        if significant > MAX_DIGITS {
            return Err(MoneyParseError::Overflow);
        }

        let magnitude = integer
            .bytes()
            .chain(fraction.bytes())
            .fold(0_i128, |acc, b| acc * 10 + i128::from(b - b'0'));

        Ok(Money::new(
            if negative { -magnitude } else { magnitude },
            fraction.len() as u32,
        ))
    }
}

impl TryFrom<String> for Money {
    type Error = MoneyParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Money> for String {
    fn from(money: Money) -> Self {
        money.to_string()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.mantissa.unsigned_abs().to_string();
        let scale = self.scale as usize;
        let padded = if digits.len() <= scale {
            format!("{}{}", "0".repeat(scale + 1 - digits.len()), digits)
        } else {
            digits
        };
        let (integer, fraction) = padded.split_at(padded.len() - scale);

        if self.mantissa < 0 {
            write!(f, "-")?;
        }
        if fraction.is_empty() {
            write!(f, "{}", integer)
        } else {
            write!(f, "{}.{}", integer, fraction)
        }
    }
}
