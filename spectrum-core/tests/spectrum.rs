//! End-to-end analyzer tests: known signals, reference agreement against
//! RustFFT, block-size boundaries and determinism.

use proptest::prelude::*;
use spectrum_core::reference::reference_magnitudes;
use spectrum_core::{MAX_SIZE, SpectrumAnalyzer, bin_count, run_length};

fn sine(len: usize, bin: usize, amplitude: f64) -> Vec<i16> {
    (0..len)
        .map(|n| {
            let phase = 2.0 * std::f64::consts::PI * bin as f64 * n as f64 / len as f64;
            (amplitude * phase.sin()).round() as i16
        })
        .collect()
}

/// Deterministic pseudo-random samples (64-bit LCG).
fn noise(len: usize, seed: u64, amplitude: i32) -> Vec<i16> {
    let mut state = seed;
    (0..len)
        .map(|_| {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            let unit = (state >> 33) as i64 % (2 * amplitude as i64 + 1);
            (unit - amplitude as i64) as i16
        })
        .collect()
}

fn analyze(samples: &[i16], stride: usize, bits: u32) -> (Vec<u16>, f32) {
    let mut analyzer = SpectrumAnalyzer::new();
    let mut out = vec![0u16; bin_count(bits)];
    let intensity = analyzer.analyze_i16(&mut out, samples, stride, bits).unwrap();
    (out, intensity)
}

/// Allowed gap between the fixed-point and the exact magnitude of bin `i`.
fn tolerance(bin: usize) -> f64 {
    2.0 * (bin as f64).sqrt() + 2.0
}

fn assert_matches_reference(samples: &[i16], stride: usize, bits: u32) {
    let (fixed, _) = analyze(samples, stride, bits);
    let exact = reference_magnitudes(samples, stride, bits);
    assert_eq!(fixed.len(), exact.len());
    for (slot, (&got, &want)) in fixed.iter().zip(&exact).enumerate() {
        let bin = slot + 1;
        let want = want.min(u16::MAX as f64);
        assert!(
            (got as f64 - want).abs() <= tolerance(bin),
            "bin {bin}: fixed {got}, reference {want:.2}"
        );
    }
}

#[test]
fn quarter_rate_pattern_lands_in_bin_two() {
    let samples = [0i16, 10_000, 0, -10_000, 0, 10_000, 0, -10_000];
    let (mags, intensity) = analyze(&samples, 1, 3);
    assert_eq!(mags, vec![0, 7071, 0, 0]);

    let norm = 10_000.0f32 / 32_768.0;
    let expected = 4.0 * norm * norm / 8.0;
    assert!((intensity - expected).abs() < 1e-6);
}

#[test]
fn nyquist_alternation_lands_in_the_highest_bin() {
    let samples = [10_000i16, -10_000, 10_000, -10_000, 10_000, -10_000, 10_000, -10_000];
    let (mags, _) = analyze(&samples, 1, 3);
    assert_eq!(mags, vec![0, 0, 0, 20_000]);
}

#[test]
fn sine_peak_sits_at_its_bin() {
    for (bits, bin) in [(11u32, 37usize), (11, 1), (11, 1023), (10, 200), (6, 5)] {
        let run = run_length(bits);
        let samples = sine(run, bin, 12_000.0);
        let (mags, _) = analyze(&samples, 1, bits);

        let (peak_slot, &peak) = mags.iter().enumerate().max_by_key(|(_, m)| **m).unwrap();
        assert!(
            (peak_slot as i64 - (bin as i64 - 1)).abs() <= 1,
            "bits {bits}, bin {bin}: peak at slot {peak_slot}"
        );
        for (slot, &m) in mags.iter().enumerate() {
            if (slot as i64 - peak_slot as i64).abs() > 1 {
                assert!(m <= peak / 10, "bits {bits}, bin {bin}: slot {slot} = {m}, peak {peak}");
            }
        }
        assert_matches_reference(&samples, 1, bits);
    }
}

#[test]
fn two_tones_match_reference() {
    let a = sine(MAX_SIZE, 64, 6_000.0);
    let b = sine(MAX_SIZE, 700, 3_000.0);
    let mixed: Vec<i16> = a.iter().zip(&b).map(|(x, y)| x + y).collect();
    assert_matches_reference(&mixed, 1, 11);
}

#[test]
fn noise_matches_reference_at_every_size() {
    let samples = noise(2 * MAX_SIZE, 0x5eed, 20_000);
    for bits in 1..=11 {
        assert_matches_reference(&samples, 1, bits);
        assert_matches_reference(&samples, 2, bits);
    }
}

#[test]
fn silence_is_silent() {
    let samples = vec![0i16; MAX_SIZE];
    let (mags, intensity) = analyze(&samples, 1, 11);
    assert_eq!(intensity, 0.0);
    assert!(mags.iter().all(|&m| m == 0));
}

#[test]
fn dc_does_not_reach_reported_bins() {
    for value in [1i16, -7_000, 32_767, -32_768] {
        let samples = vec![value; MAX_SIZE];
        let (mags, intensity) = analyze(&samples, 1, 11);
        assert!(mags.iter().all(|&m| m == 0), "DC {value} leaked");
        assert!(intensity > 0.0);
    }
}

#[test]
fn full_block_reads_exactly_2048_samples() {
    let base = noise(MAX_SIZE + 1, 7, 10_000);
    let (reference, _) = analyze(&base, 1, 11);
    assert_eq!(reference.len(), 1024);

    let mut past_end = base.clone();
    past_end[MAX_SIZE] = i16::MAX;
    assert_eq!(analyze(&past_end, 1, 11).0, reference);

    let mut last = base.clone();
    last[MAX_SIZE - 1] = last[MAX_SIZE - 1].wrapping_add(20_000);
    assert_ne!(analyze(&last, 1, 11).0, reference);
}

#[test]
fn zero_exponent_is_a_single_sample() {
    let (mags, intensity) = analyze(&[32_767], 1, 0);
    assert!(mags.is_empty());
    assert!(intensity > 0.99);
}

#[test]
fn run_length_and_bin_count_per_exponent() {
    for bits in 1..=11u32 {
        assert_eq!(run_length(bits), (1usize << bits).min(2048));
        assert_eq!(bin_count(bits), run_length(bits) / 2);
    }
}

#[test]
fn float_input_matches_integer_input() {
    let ints = noise(MAX_SIZE, 99, 30_000);
    let floats: Vec<f32> = ints.iter().map(|&s| s as f32 / 32_768.0).collect();

    let mut analyzer = SpectrumAnalyzer::new();
    let mut from_ints = vec![0u16; 1024];
    let mut from_floats = vec![0u16; 1024];
    let ia = analyzer.analyze_i16(&mut from_ints, &ints, 1, 11).unwrap();
    let fa = analyzer.analyze_f32(&mut from_floats, &floats, 1, 11).unwrap();

    assert_eq!(from_ints, from_floats);
    assert!((ia - fa).abs() < 1e-6);
}

#[test]
fn out_of_range_floats_are_clamped() {
    let loud: Vec<f32> = (0..8).map(|n| if n % 2 == 0 { 4.0 } else { -4.0 }).collect();
    let full: Vec<f32> = (0..8).map(|n| if n % 2 == 0 { 1.0 } else { -1.0 }).collect();

    let mut analyzer = SpectrumAnalyzer::new();
    let mut a = [0u16; 4];
    let mut b = [0u16; 4];
    let ia = analyzer.analyze_f32(&mut a, &loud, 1, 3).unwrap();
    let ib = analyzer.analyze_f32(&mut b, &full, 1, 3).unwrap();
    assert_eq!(a, b);
    assert_eq!(ia, ib);
    assert!((ia - 1.0).abs() < 1e-6);
}

#[test]
fn stereo_stride_reads_one_channel_and_doubles_intensity() {
    let left = sine(256, 10, 8_000.0);
    let right = noise(256, 3, 30_000);
    let interleaved: Vec<i16> = left.iter().zip(&right).flat_map(|(&l, &r)| [l, r]).collect();

    let (mono_mags, mono_intensity) = analyze(&left, 1, 8);
    let (stereo_mags, stereo_intensity) = analyze(&interleaved, 2, 8);
    assert_eq!(mono_mags, stereo_mags);
    assert!((stereo_intensity - 2.0 * mono_intensity).abs() < 1e-5);
}

#[test]
fn separate_analyzers_agree() {
    let samples = noise(MAX_SIZE, 11, 25_000);
    let mut first = SpectrumAnalyzer::new();
    let mut second = SpectrumAnalyzer::new();
    let mut a = vec![0u16; 1024];
    let mut b = vec![0u16; 1024];
    first.analyze_i16(&mut a, &samples, 1, 11).unwrap();
    second.analyze_i16(&mut b, &samples, 1, 11).unwrap();
    assert_eq!(a, b);
}

#[test]
fn analyzers_run_in_parallel_threads() {
    let handles: Vec<_> = (0..4)
        .map(|seed| {
            std::thread::spawn(move || {
                let samples = noise(MAX_SIZE, seed, 15_000);
                let first = analyze(&samples, 1, 11);
                let second = analyze(&samples, 1, 11);
                first == second
            })
        })
        .collect();
    for handle in handles {
        assert!(handle.join().unwrap());
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn repeated_calls_are_bit_identical(
        samples in proptest::collection::vec(any::<i16>(), 2 * MAX_SIZE),
        bits in 0u32..=11,
        stride in 1usize..=2,
    ) {
        let mut analyzer = SpectrumAnalyzer::new();
        let mut first = vec![0u16; bin_count(bits)];
        let mut second = vec![0u16; bin_count(bits)];
        let a = analyzer.analyze_i16(&mut first, &samples, stride, bits).unwrap();
        let b = analyzer.analyze_i16(&mut second, &samples, stride, bits).unwrap();
        prop_assert_eq!(first, second);
        prop_assert_eq!(a.to_bits(), b.to_bits());
    }

    #[test]
    fn writes_exactly_half_the_run(bits in 0u32..=11) {
        let samples = vec![1_000i16; MAX_SIZE];
        let mut out = vec![u16::MAX; MAX_SIZE];
        SpectrumAnalyzer::new().analyze_i16(&mut out, &samples, 1, bits).unwrap();
        let bins = run_length(bits) / 2;
        prop_assert!(out[..bins].iter().all(|&m| m == 0));
        prop_assert!(out[bins..].iter().all(|&m| m == u16::MAX));
    }

    #[test]
    fn random_blocks_track_the_reference(
        samples in proptest::collection::vec(any::<i16>(), MAX_SIZE),
        bits in 1u32..=11,
    ) {
        let mut analyzer = SpectrumAnalyzer::new();
        let mut fixed = vec![0u16; bin_count(bits)];
        analyzer.analyze_i16(&mut fixed, &samples, 1, bits).unwrap();
        let exact = reference_magnitudes(&samples, 1, bits);
        for (slot, (&got, &want)) in fixed.iter().zip(&exact).enumerate() {
            let want = want.min(u16::MAX as f64);
            prop_assert!((got as f64 - want).abs() <= tolerance(slot + 1));
        }
    }
}
