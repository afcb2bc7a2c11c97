//! Display currency selection and amount formatting.
//!
//! Amounts are stored without a currency; the code only changes how they render.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CurrencyCode {
    #[default]
    Inr,
    Usd,
    Eur,
    Gbp,
}

impl CurrencyCode {
    pub const ALL: [CurrencyCode; 4] = [
        CurrencyCode::Inr,
        CurrencyCode::Usd,
        CurrencyCode::Eur,
        CurrencyCode::Gbp,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CurrencyCode::Inr => "INR",
            CurrencyCode::Usd => "USD",
            CurrencyCode::Eur => "EUR",
            CurrencyCode::Gbp => "GBP",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            CurrencyCode::Inr => "₹",
            CurrencyCode::Usd => "$",
            CurrencyCode::Eur => "€",
            CurrencyCode::Gbp => "£",
        }
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CurrencyCode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let wanted = value.trim();
        CurrencyCode::ALL
            .into_iter()
            .find(|code| code.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("unsupported currency `{wanted}`"))
    }
}

/// Separators used when rendering numbers for a language tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberLocale {
    pub decimal_separator: char,
    pub grouping_separator: char,
}

impl Default for NumberLocale {
    fn default() -> Self {
        Self {
            decimal_separator: '.',
            grouping_separator: ',',
        }
    }
}

impl NumberLocale {
    /// Resolves a BCP 47 tag such as `de-DE` by its language subtag. Unknown
    /// languages render like `en-US`.
    pub fn from_tag(tag: &str) -> Self {
        let language = tag
            .trim()
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match language.as_str() {
            "de" | "es" | "it" | "pt" | "nl" | "id" | "tr" | "da" => Self {
                decimal_separator: ',',
                grouping_separator: '.',
            },
            "fr" | "ru" | "pl" | "sv" | "nb" | "cs" | "fi" | "uk" => Self {
                decimal_separator: ',',
                grouping_separator: ' ',
            },
            _ => Self::default(),
        }
    }
}

/// Renders `amount` as `<sign><symbol><grouped digits>.<cents>`, e.g. `-₹1,234.50`.
pub fn format_amount(amount: f64, code: CurrencyCode) -> String {
    format_amount_in(amount, code, NumberLocale::default())
}

/// Like [`format_amount`] with the separators of `locale`.
pub fn format_amount_in(amount: f64, code: CurrencyCode, locale: NumberLocale) -> String {
    let body = format!("{:.2}", amount.abs());
    let (int_part, frac_part) = body.split_once('.').unwrap_or((body.as_str(), "00"));
    let sign = if amount < 0.0 && body.chars().any(|c| c != '0' && c != '.') {
        "-"
    } else {
        ""
    };
    format!(
        "{sign}{}{}{}{frac_part}",
        code.symbol(),
        group_digits(int_part, locale.grouping_separator),
        locale.decimal_separator
    )
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx != 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(ch);
    }
    grouped
}
