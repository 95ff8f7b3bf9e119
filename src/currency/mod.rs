//! Locale-aware money formatting for tables, summaries and reports.

use serde::{Deserialize, Serialize};

/// ISO 4217 currency representation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct CurrencyCode(pub String);

impl CurrencyCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        Self::new("COP")
    }
}

/// Number separators for a locale.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LocaleConfig {
    pub language_tag: String,
    pub decimal_separator: char,
    pub grouping_separator: char,
}

impl LocaleConfig {
    pub fn es_co() -> Self {
        Self {
            language_tag: "es-CO".into(),
            decimal_separator: ',',
            grouping_separator: '.',
        }
    }

    pub fn en_us() -> Self {
        Self {
            language_tag: "en-US".into(),
            decimal_separator: '.',
            grouping_separator: ',',
        }
    }
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self::es_co()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum NegativeStyle {
    #[default]
    Sign,
    Parentheses,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum CurrencyDisplay {
    Symbol,
    Code,
    #[default]
    CodeAndSymbol,
}

/// Everything needed to turn an amount into display text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MoneyFormat {
    pub code: CurrencyCode,
    pub locale: LocaleConfig,
    pub display: CurrencyDisplay,
    pub negative_style: NegativeStyle,
}

impl MoneyFormat {
    /// Renders `amount`, e.g. `COP $1.234,50` with the default settings.
    pub fn format(&self, amount: f64) -> String {
        let precision = minor_units_for(self.code.as_str());
        let mut body = format_number(&self.locale, amount.abs(), precision);
        if amount < 0.0 && body.chars().any(|c| c.is_ascii_digit() && c != '0') {
            body = match self.negative_style {
                NegativeStyle::Sign => format!("-{}", body),
                NegativeStyle::Parentheses => format!("({})", body),
            };
        }
        let symbol = symbol_for(self.code.as_str());
        match self.display {
            CurrencyDisplay::Symbol => format!("{}{}", symbol, body),
            CurrencyDisplay::Code => format!("{} {}", self.code.as_str(), body),
            CurrencyDisplay::CodeAndSymbol if symbol == self.code.as_str() => {
                format!("{} {}", self.code.as_str(), body)
            }
            CurrencyDisplay::CodeAndSymbol => {
                format!("{} {}{}", self.code.as_str(), symbol, body)
            }
        }
    }
}

pub fn symbol_for(code: &str) -> String {
    match code {
        "USD" | "COP" | "MXN" | "ARS" | "CLP" => "$".into(),
        "EUR" => "€".into(),
        "GBP" => "£".into(),
        "JPY" => "¥".into(),
        "BRL" => "R$".into(),
        _ => code.into(),
    }
}

pub fn minor_units_for(code: &str) -> u8 {
    match code {
        "JPY" => 0,
        "KWD" | "BHD" => 3,
        _ => 2,
    }
}

pub fn format_number(locale: &LocaleConfig, value: f64, precision: u8) -> String {
    let body = format!("{:.*}", precision as usize, value);
    let (int_part, fraction) = match body.split_once('.') {
        Some((int_part, fraction)) => (int_part, Some(fraction)),
        None => (body.as_str(), None),
    };
    let grouped = match int_part.strip_prefix('-') {
        Some(digits) => format!("-{}", group_digits(digits, locale.grouping_separator)),
        None => group_digits(int_part, locale.grouping_separator),
    };
    match fraction {
        Some(fraction) => format!("{}{}{}", grouped, locale.decimal_separator, fraction),
        None => grouped,
    }
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut grouped = String::new();
    for (count, ch) in digits.chars().rev().enumerate() {
        if count != 0 && count % 3 == 0 {
            grouped.insert(0, separator);
        }
        grouped.insert(0, ch);
    }
    grouped
}
