//! Random value and password generation.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::Deserialize;

use crate::error::ApiError;

pub const MIN_PASSWORD_LENGTH: usize = 4;
pub const MAX_PASSWORD_LENGTH: usize = 200;

const UPPER: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const LOWER: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const DIGITS: &[u8] = b"0123456789";
const SPECIAL: &[u8] = b"!@#$%^&*()-_=+[]{};:,.?/";

/// Character-class and length options for a generated string.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PasswordParameters {
    pub length: Option<usize>,
    pub exclude_upper: bool,
    pub exclude_lower: bool,
    pub exclude_special: bool,
    pub exclude_number: bool,
}

impl PasswordParameters {
    fn classes(&self) -> Vec<&'static [u8]> {
        [
            (!self.exclude_upper, UPPER),
            (!self.exclude_lower, LOWER),
            (!self.exclude_number, DIGITS),
            (!self.exclude_special, SPECIAL),
        ]
        .into_iter()
        .filter_map(|(enabled, set)| enabled.then_some(set))
        .collect()
    }
}

/// Generate a random string honouring `params`.
///
/// Every enabled class contributes at least one character; the rest are
/// drawn uniformly from the union of enabled classes.
pub fn generate(params: &PasswordParameters, default_length: usize) -> Result<String, ApiError> {
    let length = params.length.unwrap_or(default_length);
    if !(MIN_PASSWORD_LENGTH..=MAX_PASSWORD_LENGTH).contains(&length) {
        return Err(ApiError::InvalidPasswordLength(length));
    }

    let classes = params.classes();
    if classes.is_empty() {
        return Err(ApiError::NoCharacterClasses);
    }
    let pool: Vec<u8> = classes.concat();

    let mut rng = rand::rng();
    let mut chars: Vec<u8> = classes
        .iter()
        .map(|set| set[rng.random_range(0..set.len())])
        .collect();
    while chars.len() < length {
        chars.push(pool[rng.random_range(0..pool.len())]);
    }
    chars.shuffle(&mut rng);

    Ok(chars.into_iter().map(char::from).collect())
}
