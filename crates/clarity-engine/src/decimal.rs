//! Decimal rounding for wire values.
//!
//! `(x * 100.0).round() / 100.0` rounds the product, not `x`: for 0.015,
//! whose binary value is just under 0.015, the product comes out as exactly
//! 1.5 and rounds up. Here the halfway test runs on the exact binary value
//! instead, ties going away from zero, so 0.015 becomes 0.01 and 0.125
//! becomes 0.13.

const MANTISSA_BITS: u32 = 52;
const EXPONENT_BIAS: i32 = 1075;

/// Round `value` to `places` decimal digits (at most 18).
pub(crate) fn round_half_up(value: f64, places: u32) -> f64 {
    if !value.is_finite() || value == 0.0 {
        return value;
    }

    let bits = value.to_bits();
    let biased = ((bits >> MANTISSA_BITS) & 0x7ff) as i32;
    let fraction = bits & ((1u64 << MANTISSA_BITS) - 1);
    // value = mantissa * 2^exponent
    let (mantissa, exponent) = if biased == 0 {
        (fraction, 1 - EXPONENT_BIAS)
    } else {
        (fraction | (1u64 << MANTISSA_BITS), biased - EXPONENT_BIAS)
    };

    if exponent >= 0 {
        // Already an integer
        return value;
    }

    let shift = exponent.unsigned_abs();
    // Below 2^-68 nothing survives at 18 places or fewer
    if shift > 120 {
        return 0.0_f64.copysign(value);
    }

    let scale = 10u128.pow(places);
    let scaled = mantissa as u128 * scale;
    let mut units = scaled >> shift;
    let remainder = scaled - (units << shift);
    if remainder >= 1u128 << (shift - 1) {
        units += 1;
    }

    (units as f64 / scale as f64).copysign(value)
}
