//! Subdivision timing probe on a concave test polygon.
//!
//! Usage:
//!   cargo run -p polykern --example subdivide_timing -- [max_area] [variation]
//!
//! Prints piece counts, the run report and wall time for one seeded run, so
//! changes to the cut rule show up as concrete numbers.

use std::time::Instant;

use polykern::api::*;

fn main() {
    let mut args = std::env::args().skip(1);
    let max_area: f64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(2.0);
    let variation: f64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(0.5);

    let poly = comb();
    let cfg = SubdivideCfg {
        max_area,
        variation,
        seed: 2025,
        ..SubdivideCfg::default()
    };
    let start = Instant::now();
    let report = match subdivide(&poly, cfg) {
        Ok(r) => r,
        Err(err) => {
            eprintln!("subdivide failed: {err}");
            std::process::exit(1);
        }
    };
    let elapsed = start.elapsed().as_secs_f64() * 1e3;

    let largest = report.pieces.iter().map(|p| area(p)).fold(0.0, f64::max);
    println!(
        "input_area={:.6} pieces={} largest={largest:.6} threshold={}",
        area(&poly),
        report.pieces.len(),
        report.threshold
    );
    println!(
        "iterations={} budget={} truncated={} unsplit={} fallback_cuts={}",
        report.iterations, report.budget, report.truncated, report.unsplit, report.fallback_cuts
    );
    println!("covered_area={:.6}", report.total_area());
    println!("time_ms={elapsed:.3}");
}

/// A 20 x 8 block with three 2 x 5 notches cut from the top.
fn comb() -> Vec<Point> {
    let mut ring = vec![Point::new(0.0, 0.0), Point::new(20.0, 0.0), Point::new(20.0, 8.0)];
    for k in (0..3).rev() {
        let x = 3.0 + 6.0 * k as f64;
        ring.push(Point::new(x + 2.0, 8.0));
        ring.push(Point::new(x + 2.0, 3.0));
        ring.push(Point::new(x, 3.0));
        ring.push(Point::new(x, 8.0));
    }
    ring.push(Point::new(0.0, 8.0));
    ring
}
