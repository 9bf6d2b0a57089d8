//! Fixed-point helpers for deterministic probability rolls.
//!
//! Probabilities are stored as fixed-point fractions and compared against
//! fixed-point draws from the seeded generator, so a roll never depends on
//! platform floating-point behaviour.

use fixed::types::I32F32;
use rand::Rng;

/// Fixed-point number type for all simulation math.
///
/// Uses 32 bits for integer part and 32 bits for fractional part.
pub type Fixed = I32F32;

/// Draw a uniform fixed-point value in `[0, 1)`.
pub fn unit_draw<R: Rng>(rng: &mut R) -> Fixed {
    // The low 32 bits of an I32F32 are exactly the fractional part.
    Fixed::from_bits(i64::from(rng.gen::<u32>()))
}

/// Returns true with probability `chance`.
///
/// `chance <= 0` never succeeds and `chance >= 1` always does.
pub fn roll<R: Rng>(rng: &mut R, chance: Fixed) -> bool {
    unit_draw(rng) < chance
}

/// Serde support for fixed-point numbers.
///
/// Serializes as an `f64` so hand-written tuning files stay readable; the
/// value is converted back to fixed-point on load.
pub mod fixed_serde {
    use super::Fixed;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Serialize a fixed-point number as a decimal.
    pub fn serialize<S>(value: &Fixed, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        value.to_num::<f64>().serialize(serializer)
    }

    /// Deserialize a fixed-point number from a decimal.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Fixed, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = f64::deserialize(deserializer)?;
        Fixed::checked_from_num(value)
            .ok_or_else(|| serde::de::Error::custom("fixed-point value out of range"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_unit_draw_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..1000 {
            let v = unit_draw(&mut rng);
            assert!(v >= Fixed::ZERO && v < Fixed::ONE);
        }
    }

    #[test]
    fn test_roll_extremes() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for _ in 0..200 {
            assert!(!roll(&mut rng, Fixed::ZERO));
            assert!(roll(&mut rng, Fixed::ONE));
        }
    }
}
