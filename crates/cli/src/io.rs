//! JSON polygon files in and out.
//!
//! Input: `{"outer": [[x, y], ...], "holes": [[[x, y], ...], ...]}`, with
//! `holes` optional. Delaunay runs also accept a bare `{"points": [...]}`.
//! Outputs are written pretty-printed; parent directories are created.

use anyhow::{bail, Context, Result};
use polykern::Point;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub type Pair = [f64; 2];

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct PolygonFile {
    pub outer: Vec<Pair>,
    #[serde(default)]
    pub holes: Vec<Vec<Pair>>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct PointsFile {
    pub points: Vec<Pair>,
}

impl PolygonFile {
    pub fn outer_points(&self) -> Vec<Point> {
        to_points(&self.outer)
    }

    pub fn hole_points(&self) -> Vec<Vec<Point>> {
        self.holes.iter().map(|h| to_points(h)).collect()
    }
}

pub fn to_points(pairs: &[Pair]) -> Vec<Point> {
    pairs.iter().map(|&[x, y]| Point::new(x, y)).collect()
}

pub fn to_pairs(points: &[Point]) -> Vec<Pair> {
    points.iter().map(|p| [p.x, p.y]).collect()
}

pub fn read_polygon(path: &Path) -> Result<PolygonFile> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let poly: PolygonFile = serde_json::from_slice(&bytes)
        .with_context(|| format!("parsing polygon JSON {}", path.display()))?;
    if let Some(bad) = poly
        .outer
        .iter()
        .chain(poly.holes.iter().flatten())
        .find(|[x, y]| !x.is_finite() || !y.is_finite())
    {
        bail!("non-finite coordinate {bad:?} in {}", path.display());
    }
    Ok(poly)
}

/// Sites for a Delaunay run: a `points` file, or the outer ring of a polygon file.
pub fn read_sites(path: &Path) -> Result<Vec<Point>> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    if let Ok(p) = serde_json::from_slice::<PointsFile>(&bytes) {
        return Ok(to_points(&p.points));
    }
    let poly: PolygonFile = serde_json::from_slice(&bytes)
        .with_context(|| format!("parsing sites JSON {}", path.display()))?;
    Ok(poly.outer_points())
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating output dir {}", parent.display()))?;
        }
    }
    fs::write(path, serde_json::to_vec_pretty(value)?)
        .with_context(|| format!("writing {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn holes_are_optional() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sq.json");
        fs::write(&path, r#"{"outer": [[0,0],[1,0],[1,1],[0,1]]}"#).unwrap();
        let poly = read_polygon(&path).unwrap();
        assert_eq!(poly.outer.len(), 4);
        assert!(poly.holes.is_empty());
        assert_eq!(poly.outer_points()[2], Point::new(1.0, 1.0));
    }

    #[test]
    fn sites_accept_both_shapes() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.json");
        let b = dir.path().join("b.json");
        fs::write(&a, r#"{"points": [[0.5, 0.5], [2, 1]]}"#).unwrap();
        fs::write(&b, r#"{"outer": [[0, 0], [3, 0], [0, 3]]}"#).unwrap();
        assert_eq!(read_sites(&a).unwrap().len(), 2);
        assert_eq!(read_sites(&b).unwrap().len(), 3);
    }

    #[test]
    fn malformed_input_carries_the_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{").unwrap();
        let err = format!("{:#}", read_polygon(&path).unwrap_err());
        assert!(err.contains("bad.json"));
    }

    #[test]
    fn write_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("nested/deeper/out.json");
        let poly = PolygonFile {
            outer: to_pairs(&[Point::new(0.0, 0.0), Point::new(1.0, 0.0), Point::new(0.0, 1.0)]),
            holes: Vec::new(),
        };
        write_json(&out, &poly).unwrap();
        let back = read_polygon(&out).unwrap();
        assert_eq!(back.outer, poly.outer);
    }
}
