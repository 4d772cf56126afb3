//! Test that exports estimation diagnostics to JSON for offline plotting.
//!
//! Run with: cargo test --test export_diagnostics -- --ignored --nocapture

use motion_physiology::{estimate_rate, estimate_wiggle, RateConfig, Vec3};
use serde::Serialize;
use std::collections::BTreeMap;
use std::f64::consts::PI;
use std::fs::File;
use std::io::Write;

#[derive(Serialize)]
struct RateExport {
    label: String,
    true_bpm: f64,
    estimated_bpm: f64,
    strength: f64,
    magnitude: f64,
    kurtosis: f64,
    selected_index: usize,
    iterations: usize,
    converged: bool,
    buffers: BTreeMap<String, Vec<f64>>,
}

#[derive(Serialize)]
struct WiggleExport {
    label: String,
    wiggle: f64,
    derivative_spread: f64,
    trace: Vec<f64>,
}

#[derive(Serialize)]
struct ExportData {
    sample_rate_hz: f64,
    rates: Vec<RateExport>,
    wiggles: Vec<WiggleExport>,
}

/// Pulse at `bpm` on accelerometer X with low-level noise elsewhere.
fn generate_window(n: usize, bpm: f64, seed: u64) -> (Vec<Vec3>, Vec<Vec3>) {
    let mut state = seed;
    let mut noise = move || {
        state = state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        (state >> 11) as f64 / (1u64 << 53) as f64 - 0.5
    };

    let accel = (0..n)
        .map(|i| {
            let t = i as f64 / 60.0;
            [(2.0 * PI * bpm / 60.0 * t).sin(), noise(), 9.81 + noise()]
        })
        .collect();
    let gyro = (0..n).map(|_| [noise(), noise(), noise()]).collect();
    (accel, gyro)
}

fn export_rate(label: &str, bpm: f64, n: usize, config: &RateConfig) -> RateExport {
    let (accel, gyro) = generate_window(n, bpm, 2024);
    let estimate = estimate_rate(&accel, &gyro, config, true).expect("estimation failed");

    let buffers = estimate
        .diagnostics
        .as_ref()
        .map(|d| {
            d.buffers()
                .map(|(key, buffer)| (key.to_string(), buffer.to_vec()))
                .collect()
        })
        .unwrap_or_default();

    RateExport {
        label: label.to_string(),
        true_bpm: bpm,
        estimated_bpm: estimate.rate_bpm(),
        strength: estimate.strength,
        magnitude: estimate.magnitude,
        kurtosis: estimate.kurtosis,
        selected_index: estimate.selected_index,
        iterations: estimate.iterations,
        converged: estimate.convergence.is_converged(),
        buffers,
    }
}

#[test]
#[ignore] // Run manually with: cargo test --test export_diagnostics -- --ignored --nocapture
fn export_diagnostics_to_json() {
    let heart = RateConfig::heart_rate();
    let breathing = RateConfig::breathing();

    let rates = vec![
        export_rate("heart_60", 60.0, 600, &heart),
        export_rate("heart_75", 75.0, 600, &heart),
        export_rate("heart_110", 110.0, 600, &heart),
        export_rate("breathing_12", 12.0, 1200, &breathing),
        export_rate("breathing_20", 20.0, 1200, &breathing),
    ];

    let wiggles = [("still", 0.0), ("tremor", 0.05), ("shaking", 0.5)]
        .iter()
        .map(|&(label, amplitude)| {
            let accel: Vec<Vec3> = (0..300)
                .map(|i| [amplitude * (i as f64 * 1.1).sin(), 0.0, 9.81])
                .collect();
            let reading = estimate_wiggle(&accel, None, false).expect("wiggle failed");
            WiggleExport {
                label: label.to_string(),
                wiggle: reading.wiggle,
                derivative_spread: reading.derivative_spread,
                trace: reading.trace,
            }
        })
        .collect();

    let export_data = ExportData {
        sample_rate_hz: heart.sample_rate_hz,
        rates,
        wiggles,
    };

    let json = serde_json::to_string_pretty(&export_data).expect("Failed to serialize");

    let output_path = "target/diagnostics.json";
    let mut file = File::create(output_path).expect("Failed to create file");
    file.write_all(json.as_bytes()).expect("Failed to write file");

    println!("Exported {} rate runs to {}", export_data.rates.len(), output_path);
    for rate in &export_data.rates {
        println!(
            "  {:<14} true {:>6.1}  estimated {:>6.1}  kurtosis {:>7.2}",
            rate.label, rate.true_bpm, rate.estimated_bpm, rate.kurtosis
        );
    }
}
