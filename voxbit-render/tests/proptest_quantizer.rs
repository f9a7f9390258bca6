use proptest::prelude::*;
use voxbit_core::ValueRange;
use voxbit_render::RangeQuantizer;

fn quantizer(bit_depth: u8, low: f32, high: f32) -> RangeQuantizer {
    RangeQuantizer::new(bit_depth, ValueRange::new(low, high).unwrap()).unwrap()
}

// Property 1: output length equals input length, and every code lies inside
// the interval derived from bit depth and signedness.
proptest! {
    #[test]
    fn prop_length_and_code_bounds(
        bit_depth in 1u8..=16,
        samples in prop::collection::vec(-1.0e6f32..1.0e6f32, 0..500),
    ) {
        let q = quantizer(bit_depth, -1000.0, 1000.0);
        let (codes, clipped) = q.quantize::<u16>(&samples).unwrap();

        prop_assert_eq!(codes.len(), samples.len());
        prop_assert!(clipped <= samples.len());

        let out_max = ((1u32 << bit_depth) - 1) as u16;
        for (i, &c) in codes.iter().enumerate() {
            prop_assert!(c <= out_max, "code {} at {} exceeds {}", c, i, out_max);
        }
    }
}

// Property 2: the same, for signed output.
proptest! {
    #[test]
    fn prop_signed_code_bounds(
        bit_depth in 1u8..=16,
        samples in prop::collection::vec(-1.0e6f32..1.0e6f32, 0..500),
    ) {
        let q = quantizer(bit_depth, -1000.0, 1000.0);
        let (codes, _) = q.quantize::<i16>(&samples).unwrap();

        let half = 1i32 << (bit_depth - 1);
        for &c in &codes {
            prop_assert!(i32::from(c) >= -half && i32::from(c) < half,
                "code {} outside [{}, {})", c, -half, half);
        }
    }
}

// Property 3: the clipped count is exactly the number of samples at or
// beyond a range bound, and those samples land on the edge codes.
proptest! {
    #[test]
    fn prop_clipped_count_matches_boundary_samples(
        samples in prop::collection::vec(-2000.0f32..2000.0f32, 1..500),
    ) {
        let (low, high) = (-500.0f32, 500.0f32);
        let q = quantizer(8, low, high);
        let (codes, clipped) = q.quantize::<u8>(&samples).unwrap();

        let expected = samples.iter().filter(|&&v| v <= low || v >= high).count();
        prop_assert_eq!(clipped, expected);

        for (&v, &c) in samples.iter().zip(codes.iter()) {
            if v <= low {
                prop_assert_eq!(c, 0);
            } else if v >= high {
                prop_assert_eq!(c, 255);
            }
        }
    }
}

// Property 4: re-quantizing a produced buffer, reinterpreted as floats over
// its own code interval, reproduces the buffer exactly.
proptest! {
    #[test]
    fn prop_requantization_is_idempotent(
        bit_depth in 1u8..=8,
        samples in prop::collection::vec(-100.0f32..100.0f32, 1..200),
    ) {
        let q = quantizer(bit_depth, -50.0, 50.0);
        let (codes, _) = q.quantize::<i8>(&samples).unwrap();

        let half = 1i32 << (bit_depth - 1);
        let q_codes = quantizer(bit_depth, -half as f32, (half - 1) as f32);
        let as_floats: Vec<f32> = codes.iter().map(|&c| f32::from(c)).collect();
        let (again, _) = q_codes.quantize::<i8>(&as_floats).unwrap();

        prop_assert_eq!(codes, again);
    }
}

// Property 5: restoring in-range samples stays within one quantization step
// of the original value (truncation loses at most one step).
proptest! {
    #[test]
    fn prop_restore_error_within_one_step(
        bit_depth in 8u8..=16,
        low in -1000.0f32..1000.0,
        width in 1.0f32..1000.0,
        fractions in prop::collection::vec(0.01f32..0.99, 1..200),
    ) {
        let high = low + width;
        let samples: Vec<f32> = fractions.iter().map(|f| low + f * width).collect();

        let q = quantizer(bit_depth, low, high);
        let (codes, clipped) = q.quantize::<u16>(&samples).unwrap();
        prop_assert_eq!(clipped, 0, "in-range samples must not clip");

        let restored = q.restore::<u16>(&codes).unwrap();
        let steps = ((1u32 << bit_depth) - 1) as f32;
        let step = width / steps;

        for (i, (&v, &r)) in samples.iter().zip(restored.iter()).enumerate() {
            let err = (v - r).abs();
            prop_assert!(
                err <= step * 1.01 + 1e-4,
                "restore error at {}: {} vs {} (err {}, step {})",
                i, v, r, err, step
            );
        }
    }
}
