//! Certificate serial numbers.

use openssl::bn::{BigNum, MsbOption};

use crate::error::PkiError;

const SERIAL_NUMBER_BITS: i32 = 128;

pub trait SerialNumberGenerator: Send + Sync {
    fn generate(&self) -> Result<BigNum, PkiError>;
}

/// Random positive 128-bit serial numbers.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomSerialNumberGenerator;

impl SerialNumberGenerator for RandomSerialNumberGenerator {
    fn generate(&self) -> Result<BigNum, PkiError> {
        let mut serial = BigNum::new()?;
        serial.rand(SERIAL_NUMBER_BITS, MsbOption::MAYBE_ZERO, false)?;
        Ok(serial)
    }
}
