//! Base58 text codec over a configured alphabet.
//!
//! Numbers are written most significant symbol first with no padding, so
//! small values give short strings. Zero is a single symbol.

use crate::error::{CodecError, Result};
use std::collections::HashMap;
use std::fmt;

/// Number of symbols in an alphabet.
pub const ALPHABET_LEN: usize = 58;

const BASE: u64 = ALPHABET_LEN as u64;

/// A validated 58-symbol alphabet.
#[derive(Clone)]
pub struct Alphabet {
    symbols: Vec<char>,
    index: HashMap<char, u8>,
}

impl Alphabet {
    /// Validate and index an alphabet.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidConfig`] unless `symbols` holds exactly 58
    /// distinct symbols, none of them whitespace, control characters or `.`
    /// (the credential separator).
    ///
    /// # Examples
    ///
    /// ```
    /// use ticket_codec_core::Alphabet;
    ///
    /// let alphabet = Alphabet::new("123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz").unwrap();
    /// assert_eq!(alphabet.encode(57), "z");
    /// assert_eq!(alphabet.decode("21"), Some(58));
    /// assert!(Alphabet::new("abc").is_err());
    /// ```
    pub fn new(symbols: &str) -> Result<Self> {
        const KEY: &str = "BASE58_ALPHABET";

        let symbols: Vec<char> = symbols.chars().collect();
        if symbols.len() != ALPHABET_LEN {
            return Err(CodecError::config(
                KEY,
                format!("expected {ALPHABET_LEN} symbols, found {}", symbols.len()),
            ));
        }

        let mut index = HashMap::with_capacity(ALPHABET_LEN);
        for (position, &symbol) in symbols.iter().enumerate() {
            if symbol.is_whitespace() || symbol.is_control() || symbol == '.' {
                return Err(CodecError::config(
                    KEY,
                    format!("symbol {symbol:?} at position {position} is not allowed"),
                ));
            }
            #[allow(clippy::cast_possible_truncation)] // position < 58
            let digit = position as u8;
            if index.insert(symbol, digit).is_some() {
                return Err(CodecError::config(
                    KEY,
                    format!("symbol {symbol:?} appears more than once"),
                ));
            }
        }

        Ok(Self { symbols, index })
    }

    /// Returns `true` if `symbol` belongs to the alphabet.
    #[must_use]
    pub fn contains(&self, symbol: char) -> bool {
        self.index.contains_key(&symbol)
    }

    /// Encode a number.
    #[must_use]
    pub fn encode(&self, mut n: u64) -> String {
        let mut digits = Vec::new();
        loop {
            #[allow(clippy::cast_possible_truncation)] // remainder < 58
            let digit = (n % BASE) as usize;
            digits.push(self.symbols[digit]);
            n /= BASE;
            if n == 0 {
                break;
            }
        }
        digits.iter().rev().collect()
    }

    /// Decode a string.
    ///
    /// Returns `None` if the string is empty, contains a symbol outside the
    /// alphabet, or does not fit in 64 bits.
    #[must_use]
    pub fn decode(&self, text: &str) -> Option<u64> {
        if text.is_empty() {
            return None;
        }

        text.chars().try_fold(0u64, |acc, symbol| {
            let digit = *self.index.get(&symbol)?;
            acc.checked_mul(BASE)?.checked_add(u64::from(digit))
        })
    }
}

impl fmt::Debug for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Alphabet")
            .field(&self.symbols.iter().collect::<String>())
            .finish()
    }
}
