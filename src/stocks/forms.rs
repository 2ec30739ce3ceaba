use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;

use crate::forms::FieldError;

/// Raw add-stock form fields, kept as strings so a failed submit re-renders
/// exactly what the user typed.
#[derive(Debug, Deserialize)]
pub struct StockForm {
    #[serde(default)]
    pub stock_symbol: String,
    #[serde(default)]
    pub number_of_shares: String,
    #[serde(default)]
    pub purchase_price: String,
}

/// A validated stock position ready for insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStock {
    pub stock_symbol: String,
    pub number_of_shares: i32,
    /// Dollars-and-cents price stored as integer cents: $24.10 -> 2410.
    pub purchase_price: i32,
}

impl StockForm {
    pub fn validate(&self) -> Result<NewStock, Vec<FieldError>> {
        lazy_static! {
            static ref SYMBOL_RE: Regex = Regex::new(r"^[A-Za-z]{1,5}$").unwrap();
        }

        let mut errors = Vec::new();

        let symbol = if self.stock_symbol.is_empty() {
            errors.push(FieldError::required("stock_symbol"));
            None
        } else if !SYMBOL_RE.is_match(&self.stock_symbol) {
            errors.push(FieldError::new(
                "stock_symbol",
                "Stock symbol must be 1-5 characters",
            ));
            None
        } else {
            Some(self.stock_symbol.to_uppercase())
        };

        let shares = if self.number_of_shares.is_empty() {
            errors.push(FieldError::required("number_of_shares"));
            None
        } else {
            match self.number_of_shares.parse::<i32>() {
                Ok(n) if n > 0 => Some(n),
                _ => {
                    errors.push(FieldError::new(
                        "number_of_shares",
                        "Number of shares must be a positive integer",
                    ));
                    None
                }
            }
        };

        let price = if self.purchase_price.is_empty() {
            errors.push(FieldError::required("purchase_price"));
            None
        } else {
            match parse_cents(&self.purchase_price) {
                Some(cents) if cents > 0 => Some(cents),
                _ => {
                    errors.push(FieldError::new(
                        "purchase_price",
                        "Purchase price must be a positive dollar amount",
                    ));
                    None
                }
            }
        };

        match (symbol, shares, price) {
            (Some(stock_symbol), Some(number_of_shares), Some(purchase_price)) => Ok(NewStock {
                stock_symbol,
                number_of_shares,
                purchase_price,
            }),
            _ => Err(errors),
        }
    }
}

/// Parse a dollar amount with at most two fraction digits into integer
/// cents, exactly (no float round-trip): "432.17" -> 43217, "45" -> 4500.
fn parse_cents(raw: &str) -> Option<i32> {
    let (whole, frac) = match raw.split_once('.') {
        Some((whole, frac)) => (whole, frac),
        None => (raw, ""),
    };
    if whole.is_empty() && frac.is_empty() {
        return None;
    }
    if frac.len() > 2 {
        return None;
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let whole: i64 = if whole.is_empty() {
        0
    } else {
        whole.parse().ok()?
    };
    let frac: i64 = if frac.is_empty() {
        0
    } else {
        // Right-pad to hundredths: "4.5" means 50 cents, not 5.
        format!("{frac:0<2}").parse().ok()?
    };
    i32::try_from(whole.checked_mul(100)?.checked_add(frac)?).ok()
}
