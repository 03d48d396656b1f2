//! Print clipped Voronoi cells of a seeded point set before and after Lloyd
//! relaxation, for a quick visual sanity check on cell regularity.
//!
//! Usage:
//!   cargo run -p polykern --example voronoi_cells -- [count] [relax_iterations]

use polykern::api::*;

fn main() {
    let mut args = std::env::args().skip(1);
    let count: usize = args.next().and_then(|s| s.parse().ok()).unwrap_or(12);
    let iterations: usize = args.next().and_then(|s| s.parse().ok()).unwrap_or(3);

    let input = DelaunayInput::Synthetic {
        count,
        width: 10.0,
        height: 10.0,
        seed: 17,
    };
    for relax_iterations in [0, iterations] {
        let cfg = DelaunayCfg {
            relax_iterations,
            ..DelaunayCfg::default()
        };
        let graph = match triangulate(input.clone(), cfg) {
            Ok(g) => g,
            Err(err) => {
                eprintln!("triangulation failed: {err}");
                std::process::exit(1);
            }
        };
        let cells = graph.voronoi_cells(true);
        let areas: Vec<f64> = cells
            .iter()
            .filter(|c| !graph.is_corner(c.site))
            .map(|c| area(&c.vertices))
            .collect();
        let (lo, hi) = areas
            .iter()
            .fold((f64::INFINITY, 0.0f64), |(lo, hi), &a| (lo.min(a), hi.max(a)));
        println!(
            "relax={relax_iterations} triangles={} edges={} cell_area_min={lo:.4} cell_area_max={hi:.4}",
            graph.triangle_count(),
            graph.edges().len()
        );
        for c in cells.iter().filter(|c| !graph.is_corner(c.site)) {
            let verts: Vec<String> = c
                .vertices
                .iter()
                .map(|v| format!("({:.3},{:.3})", v.x, v.y))
                .collect();
            println!(
                "  site {} at ({:.3},{:.3}): {}",
                c.site.0,
                c.position.x,
                c.position.y,
                verts.join(" ")
            );
        }
    }
}
