mod io;
mod provenance;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use polykern::api::*;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::SubscriberBuilder;
use tracing_subscriber::EnvFilter;

use crate::io::{read_polygon, read_sites, to_pairs, write_json};
use crate::provenance::{write_sidecar, Payload};

#[derive(Parser)]
#[command(name = "polykern")]
#[command(about = "Run polygon kernel algorithms on JSON inputs")]
struct Cmd {
    #[command(subcommand)]
    action: Action,
}

#[derive(Args, Debug, Clone)]
struct Paths {
    /// Polygon JSON: {"outer": [[x, y], ...], "holes": [...]}
    #[arg(long)]
    input: PathBuf,
    /// Output JSON; a `<stem>.provenance.json` sidecar is written next to it
    #[arg(long)]
    out: PathBuf,
}

#[derive(Subcommand)]
enum Action {
    /// Split a simple polygon into convex pieces
    Decompose {
        #[command(flatten)]
        paths: Paths,
        #[arg(long)]
        max_iterations: Option<usize>,
    },
    /// Ear-cut triangulation of the outer ring minus its holes
    Tessellate {
        #[command(flatten)]
        paths: Paths,
        /// Skip the self-intersection check
        #[arg(long)]
        no_validate: bool,
    },
    /// Delaunay triangulation of explicit or seeded sites
    Delaunay(DelaunayArgs),
    /// Minimum-area oriented bounding box
    Obb {
        #[command(flatten)]
        paths: Paths,
        /// Fit the convex hull of the points instead of the ring as given
        #[arg(long)]
        hull: bool,
    },
    /// Inset (positive) or outset (negative) a polygon
    Offset {
        #[command(flatten)]
        paths: Paths,
        #[arg(long, allow_hyphen_values = true)]
        distance: f64,
        /// Winding for which positive distances inset
        #[arg(long, value_enum, default_value_t = WindingArg::Ccw)]
        reference: WindingArg,
        #[arg(long)]
        max_splits: Option<usize>,
    },
    /// Slice a polygon into pieces no larger than `max_area`
    Subdivide(SubdivideArgs),
    /// Print a small provenance JSON block
    Report,
}

#[derive(Args, Debug, Clone)]
struct DelaunayArgs {
    /// Sites JSON ({"points": [...]} or a polygon file); omit for seeded sites
    #[arg(long)]
    input: Option<PathBuf>,
    #[arg(long)]
    out: PathBuf,
    #[arg(long, default_value_t = 64)]
    count: usize,
    #[arg(long, default_value_t = 100.0)]
    width: f64,
    #[arg(long, default_value_t = 100.0)]
    height: f64,
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Lloyd relaxation steps
    #[arg(long, default_value_t = 0)]
    relax: usize,
    /// Also emit Voronoi cells clipped to the bounds
    #[arg(long)]
    voronoi: bool,
}

#[derive(Args, Debug, Clone)]
struct SubdivideArgs {
    #[command(flatten)]
    paths: Paths,
    #[arg(long, default_value_t = 1.0)]
    max_area: f64,
    #[arg(long, default_value_t = 0)]
    seed: u64,
    #[arg(long, default_value_t = 0.0)]
    variation: f64,
    #[arg(long, default_value_t = 0.0)]
    min_edge_length: f64,
    #[arg(long)]
    snap_points: bool,
    /// Disable the long-axis retry for failed cuts
    #[arg(long)]
    no_fallback: bool,
    #[arg(long)]
    max_iterations: Option<usize>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum WindingArg {
    Ccw,
    Cw,
}

impl From<WindingArg> for Winding {
    fn from(w: WindingArg) -> Self {
        match w {
            WindingArg::Ccw => Winding::CounterClockwise,
            WindingArg::Cw => Winding::Clockwise,
        }
    }
}

fn main() -> Result<()> {
    SubscriberBuilder::default()
        .with_target(false)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Decompose {
            paths,
            max_iterations,
        } => run_decompose(&paths, max_iterations),
        Action::Tessellate { paths, no_validate } => run_tessellate(&paths, !no_validate),
        Action::Delaunay(args) => run_delaunay(&args),
        Action::Obb { paths, hull } => run_obb(&paths, hull),
        Action::Offset {
            paths,
            distance,
            reference,
            max_splits,
        } => run_offset(&paths, distance, reference.into(), max_splits),
        Action::Subdivide(args) => run_subdivide(&args),
        Action::Report => report(),
    }
}

fn diagnostic_json(diag: Option<Diagnostic>) -> Value {
    match diag {
        Some(Diagnostic::SelfIntersecting { first, second }) => {
            json!({"self_intersecting": [first, second]})
        }
        None => Value::Null,
    }
}

fn rings_json(rings: &[Vec<Point>]) -> Value {
    json!(rings.iter().map(|r| to_pairs(r)).collect::<Vec<_>>())
}

fn finish(out: &Path, doc: &Value, payload: Payload) -> Result<()> {
    write_json(out, doc)?;
    let prov = write_sidecar(out, payload)?;
    tracing::info!(out = %out.display(), provenance = %prov.display(), "wrote");
    Ok(())
}

fn run_decompose(paths: &Paths, max_iterations: Option<usize>) -> Result<()> {
    let poly = read_polygon(&paths.input)?;
    let cfg = DecomposeCfg {
        max_iterations,
        ..DecomposeCfg::default()
    };
    let r = decompose_convex(&poly.outer_points(), cfg);
    let summary = json!({
        "pieces": r.pieces.len(),
        "iterations": r.iterations,
        "budget": r.budget,
        "truncated": r.truncated,
        "unresolved": r.unresolved,
        "diagnostic": diagnostic_json(r.diagnostic),
    });
    let doc = json!({"pieces": rings_json(&r.pieces), "report": summary});
    let params = json!({"input": paths.input, "max_iterations": max_iterations});
    let payload = Payload::new("decompose", params).with_summary(summary);
    finish(&paths.out, &doc, payload)
}

fn run_tessellate(paths: &Paths, validate: bool) -> Result<()> {
    let poly = read_polygon(&paths.input)?;
    let cfg = TessellateCfg {
        validate,
        ..TessellateCfg::default()
    };
    let t = tessellate(&poly.outer_points(), &poly.hole_points(), cfg)
        .context("tessellation failed")?;
    let summary = json!({
        "triangles": t.triangle_count(),
        "area": t.area(),
        "diagnostic": diagnostic_json(t.diagnostic),
    });
    let doc = json!({
        "points": to_pairs(&t.points),
        "triangles": t.triangles().collect::<Vec<_>>(),
        "report": summary,
    });
    let payload = Payload::new("tessellate", json!({"input": paths.input, "validate": validate}))
        .with_summary(summary);
    finish(&paths.out, &doc, payload)
}

fn run_delaunay(args: &DelaunayArgs) -> Result<()> {
    let input = match &args.input {
        Some(path) => DelaunayInput::Points {
            points: read_sites(path)?,
            bounds: None,
        },
        None => DelaunayInput::Synthetic {
            count: args.count,
            width: args.width,
            height: args.height,
            seed: args.seed,
        },
    };
    let cfg = DelaunayCfg {
        relax_iterations: args.relax,
        ..DelaunayCfg::default()
    };
    let graph = triangulate(input, cfg).context("triangulation failed")?;
    let stats = graph.stats();
    let summary = json!({
        "sites": graph.points().len(),
        "inserted": stats.inserted,
        "skipped_duplicates": stats.skipped_duplicates,
        "triangles": graph.triangle_count(),
        "edges": graph.edges().len(),
    });
    let mut doc = json!({
        "points": to_pairs(&graph.positions()),
        "triangles": graph.index_triples(),
        "edges": graph
            .edges()
            .iter()
            .map(|e| {
                let (a, b) = e.endpoints();
                [a.0, b.0]
            })
            .collect::<Vec<_>>(),
        "report": summary,
    });
    if args.voronoi {
        let cells: Vec<Value> = graph
            .voronoi_cells(true)
            .iter()
            .map(|c| json!({"site": c.site.0, "vertices": to_pairs(&c.vertices)}))
            .collect();
        doc["voronoi"] = json!(cells);
    }
    let payload = Payload::new(
        "delaunay",
        json!({
            "input": args.input,
            "count": args.count,
            "width": args.width,
            "height": args.height,
            "seed": args.seed,
            "relax": args.relax,
        }),
    )
    .with_summary(summary);
    finish(&args.out, &doc, payload)
}

fn run_obb(paths: &Paths, hull: bool) -> Result<()> {
    let poly = read_polygon(&paths.input)?;
    let points = poly.outer_points();
    let geom = GeomCfg::default();
    let obb = if hull {
        fit_obb_hull(&points, geom)
    } else {
        fit_obb(&points, geom)
    }
    .context("bounding box fit failed")?;
    let summary = json!({"area": obb.area(), "angle": obb.angle});
    let doc = json!({
        "center": [obb.center.x, obb.center.y],
        "long_extent": obb.long_extent,
        "short_extent": obb.short_extent,
        "angle": obb.angle,
        "corners": to_pairs(&obb.corners()),
    });
    let payload = Payload::new("obb", json!({"input": paths.input, "hull": hull})).with_summary(summary);
    finish(&paths.out, &doc, payload)
}

fn run_offset(
    paths: &Paths,
    distance: f64,
    reference: Winding,
    max_splits: Option<usize>,
) -> Result<()> {
    let poly = read_polygon(&paths.input)?;
    let cfg = OffsetCfg {
        reference,
        max_splits,
        ..OffsetCfg::default()
    };
    let r = offset_polygon(&poly.outer_points(), distance, cfg).context("offset failed")?;
    let summary = json!({
        "rings": r.rings.len(),
        "status": format!("{:?}", r.status),
        "splits": r.splits,
        "budget": r.budget,
        "diagnostic": diagnostic_json(r.diagnostic),
    });
    let doc = json!({"rings": rings_json(&r.rings), "report": summary});
    let payload = Payload::new(
        "offset",
        json!({
            "input": paths.input,
            "distance": distance,
            "reference": format!("{reference:?}"),
            "max_splits": max_splits,
        }),
    )
    .with_summary(summary);
    finish(&paths.out, &doc, payload)
}

fn run_subdivide(args: &SubdivideArgs) -> Result<()> {
    let poly = read_polygon(&args.paths.input)?;
    let cfg = SubdivideCfg {
        max_area: args.max_area,
        seed: args.seed,
        variation: args.variation,
        min_edge_length: args.min_edge_length,
        snap_points: args.snap_points,
        fallback_long_axis: !args.no_fallback,
        max_iterations: args.max_iterations,
        ..SubdivideCfg::default()
    };
    let r = subdivide(&poly.outer_points(), cfg).context("subdivision failed")?;
    let summary = json!({
        "pieces": r.pieces.len(),
        "threshold": r.threshold,
        "iterations": r.iterations,
        "budget": r.budget,
        "truncated": r.truncated,
        "unsplit": r.unsplit,
        "fallback_cuts": r.fallback_cuts,
        "decompose_truncated": r.decompose_truncated,
        "decompose_unresolved": r.decompose_unresolved,
        "diagnostic": diagnostic_json(r.diagnostic),
    });
    let doc = json!({"pieces": rings_json(&r.pieces), "report": summary});
    let payload = Payload::new(
        "subdivide",
        json!({
            "input": args.paths.input,
            "max_area": args.max_area,
            "seed": args.seed,
            "variation": args.variation,
            "min_edge_length": args.min_edge_length,
            "snap_points": args.snap_points,
            "fallback_long_axis": !args.no_fallback,
            "max_iterations": args.max_iterations,
        }),
    )
    .with_summary(summary);
    finish(&args.paths.out, &doc, payload)
}

fn report() -> Result<()> {
    let obj = json!({
        "code_rev": provenance::current_git_rev(),
        "kernel_version": polykern::VERSION,
        "params": {},
        "outputs": []
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}
