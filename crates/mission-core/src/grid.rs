//! Boustrophedon (lawnmower) coverage planning over a polygonal region.
//!
//! The region is projected into a flat east/north frame centred on its
//! bounding box. Scan lines run along the longer side of the bounding box and
//! are stacked across the shorter side, no more than `spacing` apart and no
//! more than `spacing / 2` from the edges. Each line spans the polygon's
//! extent within half a line step on either side; samples that fall outside
//! the polygon are pulled back onto it. Direction alternates line by line.

use crate::config::{GridOptions, PlannerConfig};
use crate::error::{PlanningError, Result};
use crate::models::{FlightPath, Waypoint};
use crate::planner::{PathGenerator, PathPlanner};
use crate::spatial::{lat_to_meters, lon_to_meters, meters_to_lat, meters_to_lon};
use serde::Serialize;

/// Regions smaller than this (in square meters) are treated as degenerate.
const MIN_REGION_AREA_M2: f64 = 1e-3;

/// Samples closer than this (in meters) to the region boundary count as on it.
const BOUNDARY_TOLERANCE_M: f64 = 1e-9;

/// `(u, v)` in the scan frame: `u` along a line, `v` across lines.
type Point = (f64, f64);
type Segment = (Point, Point);

/// Area to cover: polygon corners as `[lat, lon]` pairs plus pass parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridRegion {
    corners: Vec<[f64; 2]>,
    spacing_m: f64,
    altitude_m: f64,
}

impl GridRegion {
    /// Validate and build a region. A closing corner equal to the first one
    /// is accepted and dropped.
    pub fn new(mut corners: Vec<[f64; 2]>, spacing_m: f64, altitude_m: f64) -> Result<Self> {
        if corners.len() > 1 && corners.first() == corners.last() {
            corners.pop();
        }
        if corners.len() < 3 {
            return Err(PlanningError::validation(format!(
                "coverage region needs at least 3 corners, got {}",
                corners.len()
            )));
        }
        if !spacing_m.is_finite() || spacing_m <= 0.0 {
            return Err(PlanningError::validation(format!(
                "scan line spacing must be positive, got {spacing_m}"
            )));
        }
        if !altitude_m.is_finite() {
            return Err(PlanningError::validation("coverage altitude must be finite"));
        }
        for corner in &corners {
            Waypoint::new(corner[0], corner[1], altitude_m)?;
        }

        let (min_lon, max_lon) = corners
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), c| {
                (lo.min(c[1]), hi.max(c[1]))
            });
        if max_lon - min_lon > 180.0 {
            return Err(PlanningError::validation(
                "coverage region cannot span more than 180 degrees of longitude",
            ));
        }

        let region = Self {
            corners,
            spacing_m,
            altitude_m,
        };
        if region.area_m2() < MIN_REGION_AREA_M2 {
            return Err(PlanningError::validation(
                "coverage region is degenerate (zero area)",
            ));
        }
        Ok(region)
    }

    pub fn corners(&self) -> &[[f64; 2]] {
        &self.corners
    }

    pub fn spacing_m(&self) -> f64 {
        self.spacing_m
    }

    pub fn altitude_m(&self) -> f64 {
        self.altitude_m
    }

    /// Planar area in square meters.
    pub fn area_m2(&self) -> f64 {
        let frame = LocalFrame::around(&self.corners);
        let local: Vec<(f64, f64)> = self
            .corners
            .iter()
            .map(|c| frame.to_local(c[0], c[1]))
            .collect();
        let mut twice_area = 0.0;
        let mut j = local.len() - 1;
        for i in 0..local.len() {
            twice_area += local[j].0 * local[i].1 - local[i].0 * local[j].1;
            j = i;
        }
        (twice_area / 2.0).abs()
    }

    /// Even-odd containment test on the corner ring.
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        let ring: Vec<Point> = self.corners.iter().map(|c| (c[1], c[0])).collect();
        polygon_contains(&ring, (lon, lat))
    }
}

/// One pass of the coverage pattern, in flight order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanLine {
    pub index: usize,
    /// True when the pass runs toward decreasing along-track coordinate
    pub reversed: bool,
    pub waypoints: Vec<Waypoint>,
}

/// Coverage planner. Generates the target list from a region and hands it to
/// an owned [`PathPlanner`] for assembly and metrics.
#[derive(Debug, Clone)]
pub struct GridPathPlanner {
    planner: PathPlanner,
    region: Option<GridRegion>,
    options: GridOptions,
}

impl GridPathPlanner {
    pub fn new(home_lat: f64, home_lon: f64, home_alt: f64) -> Result<Self> {
        Self::with_config(home_lat, home_lon, home_alt, PlannerConfig::default())
    }

    pub fn with_config(
        home_lat: f64,
        home_lon: f64,
        home_alt: f64,
        config: PlannerConfig,
    ) -> Result<Self> {
        Ok(Self {
            planner: PathPlanner::with_config(home_lat, home_lon, home_alt, config)?,
            region: None,
            options: GridOptions::default(),
        })
    }

    pub fn with_options(mut self, options: GridOptions) -> Result<Self> {
        options.validate()?;
        self.options = options;
        Ok(self)
    }

    pub fn options(&self) -> &GridOptions {
        &self.options
    }

    pub fn planner(&self) -> &PathPlanner {
        &self.planner
    }

    pub fn region(&self) -> Option<&GridRegion> {
        self.region.as_ref()
    }

    /// Store the region to cover. On error the previous region is kept.
    pub fn set_region(
        &mut self,
        corners: Vec<[f64; 2]>,
        spacing_m: f64,
        altitude_m: f64,
    ) -> Result<()> {
        let region = GridRegion::new(corners, spacing_m, altitude_m).inspect_err(|err| {
            tracing::warn!(error = %err, "rejected coverage region");
        })?;
        self.region = Some(region);
        Ok(())
    }

    /// Coverage passes for the current region, in flight order.
    pub fn scan_lines(&self) -> Result<Vec<ScanLine>> {
        let region = self
            .region
            .as_ref()
            .ok_or_else(|| PlanningError::validation("no coverage region set"))?;
        build_scan_lines(region, &self.options)
    }
}

impl PathGenerator for GridPathPlanner {
    fn generate_path(&self) -> Result<FlightPath> {
        let lines = self.scan_lines()?;
        let line_count = lines.len();
        let mut targets: Vec<Waypoint> = lines
            .into_iter()
            .flat_map(|line| line.waypoints)
            .collect();
        if self.options.return_to_home {
            targets.push(*self.planner.home());
        }
        tracing::debug!(
            scan_lines = line_count,
            targets = targets.len(),
            "generated coverage pattern"
        );
        Ok(self.planner.assemble(&targets))
    }
}

/// Equirectangular projection around a reference point.
#[derive(Debug, Clone, Copy)]
struct LocalFrame {
    ref_lat: f64,
    ref_lon: f64,
}

impl LocalFrame {
    /// Frame centred on the bounding box of `corners`.
    fn around(corners: &[[f64; 2]]) -> Self {
        let (min_lat, max_lat, min_lon, max_lon) = corners.iter().fold(
            (
                f64::INFINITY,
                f64::NEG_INFINITY,
                f64::INFINITY,
                f64::NEG_INFINITY,
            ),
            |(lat_lo, lat_hi, lon_lo, lon_hi), c| {
                (lat_lo.min(c[0]), lat_hi.max(c[0]), lon_lo.min(c[1]), lon_hi.max(c[1]))
            },
        );
        Self {
            ref_lat: (min_lat + max_lat) / 2.0,
            ref_lon: (min_lon + max_lon) / 2.0,
        }
    }

    /// (east_m, north_m)
    fn to_local(self, lat: f64, lon: f64) -> (f64, f64) {
        (
            lon_to_meters(lon - self.ref_lon, self.ref_lat),
            lat_to_meters(lat - self.ref_lat, self.ref_lat),
        )
    }

    /// (lat, lon)
    fn to_geo(self, east_m: f64, north_m: f64) -> (f64, f64) {
        (
            self.ref_lat + meters_to_lat(north_m, self.ref_lat),
            self.ref_lon + meters_to_lon(east_m, self.ref_lat),
        )
    }
}

fn build_scan_lines(region: &GridRegion, options: &GridOptions) -> Result<Vec<ScanLine>> {
    let frame = LocalFrame::around(&region.corners);
    let local: Vec<Point> = region
        .corners
        .iter()
        .map(|c| frame.to_local(c[0], c[1]))
        .collect();

    let (min_e, max_e, min_n, max_n) = local.iter().fold(
        (
            f64::INFINITY,
            f64::NEG_INFINITY,
            f64::INFINITY,
            f64::NEG_INFINITY,
        ),
        |(e_lo, e_hi, n_lo, n_hi), &(e, n)| (e_lo.min(e), e_hi.max(e), n_lo.min(n), n_hi.max(n)),
    );

    // (u, v): u runs along a scan line, v across the stack of lines.
    let along_east = (max_e - min_e) >= (max_n - min_n);
    let polygon: Vec<Point> = local
        .iter()
        .map(|&(e, n)| if along_east { (e, n) } else { (n, e) })
        .collect();
    let (v_min, v_max) = if along_east {
        (min_n, max_n)
    } else {
        (min_e, max_e)
    };

    let spacing = region.spacing_m;
    let extent = v_max - v_min;
    let line_count = ((extent / spacing).ceil() as usize).max(1);
    if line_count > options.max_waypoints {
        return Err(too_many_waypoints(options.max_waypoints));
    }
    let step = extent / line_count as f64;

    let mut lines = Vec::new();
    let mut emitted = 0usize;
    let mut forward = true;

    for i in 0..line_count {
        let v = v_min + (i as f64 + 0.5) * step;
        // Each line is responsible for everything within half a step of it.
        let boundary = strip_boundary(&polygon, v - step / 2.0, v + step / 2.0);
        let mut along = Vec::new();
        for (start, end) in covered_spans(&boundary) {
            let budget = options.max_waypoints.saturating_sub(emitted + along.len());
            if !sample_interval(start, end, spacing, options.subdivide_lines, budget, &mut along) {
                return Err(too_many_waypoints(options.max_waypoints));
            }
        }
        if along.is_empty() {
            continue;
        }
        if !forward {
            along.reverse();
        }
        emitted += along.len();

        let waypoints = along
            .into_iter()
            .map(|u| {
                let (u, v) = pull_inside(&polygon, &boundary, (u, v));
                let (east, north) = if along_east { (u, v) } else { (v, u) };
                let (lat, lon) = frame.to_geo(east, north);
                Waypoint {
                    lat,
                    lon,
                    altitude_m: region.altitude_m,
                }
            })
            .collect();

        lines.push(ScanLine {
            index: lines.len(),
            reversed: !forward,
            waypoints,
        });
        forward = !forward;
    }

    Ok(lines)
}

/// Even-odd containment in the scan frame.
fn polygon_contains(polygon: &[Point], (u, v): Point) -> bool {
    let mut inside = false;
    let mut j = polygon.len() - 1;
    for i in 0..polygon.len() {
        let (ui, vi) = polygon[i];
        let (uj, vj) = polygon[j];
        if ((vi > v) != (vj > v)) && (u < (uj - ui) * (v - vi) / (vj - vi) + ui) {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Inside intervals of the line `v = const`, sorted by `u`.
fn chord_intervals(polygon: &[Point], v: f64) -> Vec<(f64, f64)> {
    let mut crossings = Vec::new();
    let n = polygon.len();
    let mut j = n - 1;
    for i in 0..n {
        let (ui, vi) = polygon[i];
        let (uj, vj) = polygon[j];
        if (vi > v) != (vj > v) {
            crossings.push(ui + (v - vi) * (uj - ui) / (vj - vi));
        }
        j = i;
    }
    crossings.sort_by(f64::total_cmp);
    crossings
        .chunks_exact(2)
        .map(|pair| (pair[0], pair[1]))
        .collect()
}

/// Boundary of the polygon's part inside `lo <= v <= hi`: every edge clipped
/// to the strip plus the inside chords along both strip edges.
fn strip_boundary(polygon: &[Point], lo: f64, hi: f64) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut j = polygon.len() - 1;
    for i in 0..polygon.len() {
        if let Some(segment) = clip_to_strip(polygon[j], polygon[i], lo, hi) {
            segments.push(segment);
        }
        j = i;
    }
    for v in [lo, hi] {
        segments.extend(
            chord_intervals(polygon, v)
                .into_iter()
                .map(|(start, end)| ((start, v), (end, v))),
        );
    }
    segments
}

fn clip_to_strip(a: Point, b: Point, lo: f64, hi: f64) -> Option<Segment> {
    let (du, dv) = (b.0 - a.0, b.1 - a.1);
    if dv == 0.0 {
        return (lo..=hi).contains(&a.1).then_some((a, b));
    }
    let t_lo = (lo - a.1) / dv;
    let t_hi = (hi - a.1) / dv;
    let t0 = t_lo.min(t_hi).max(0.0);
    let t1 = t_lo.max(t_hi).min(1.0);
    if t0 > t1 {
        return None;
    }
    let at = |t: f64| (a.0 + t * du, a.1 + t * dv);
    Some((at(t0), at(t1)))
}

/// Projection of a strip boundary onto the scan line, merged and sorted by `u`.
fn covered_spans(boundary: &[Segment]) -> Vec<(f64, f64)> {
    let mut spans: Vec<(f64, f64)> = boundary
        .iter()
        .map(|&(a, b)| (a.0.min(b.0), a.0.max(b.0)))
        .collect();
    spans.sort_by(|x, y| x.0.total_cmp(&y.0));

    let mut merged: Vec<(f64, f64)> = Vec::new();
    for (start, end) in spans {
        match merged.last_mut() {
            Some(last) if start <= last.1 + BOUNDARY_TOLERANCE_M => last.1 = last.1.max(end),
            _ => merged.push((start, end)),
        }
    }
    merged
}

/// `p` itself when it lies in the polygon, otherwise the nearest point of the
/// polygon's part inside the strip whose boundary is given.
fn pull_inside(polygon: &[Point], boundary: &[Segment], p: Point) -> Point {
    if polygon_contains(polygon, p) {
        return p;
    }
    let mut nearest = p;
    let mut best = f64::INFINITY;
    for &(a, b) in boundary {
        let q = closest_on_segment(a, b, p);
        let d = (q.0 - p.0).hypot(q.1 - p.1);
        if d < best {
            best = d;
            nearest = q;
        }
    }
    if best <= BOUNDARY_TOLERANCE_M {
        p
    } else {
        nearest
    }
}

fn closest_on_segment(a: Point, b: Point, p: Point) -> Point {
    let (du, dv) = (b.0 - a.0, b.1 - a.1);
    let len_sq = du * du + dv * dv;
    if len_sq == 0.0 {
        return a;
    }
    let t = (((p.0 - a.0) * du + (p.1 - a.1) * dv) / len_sq).clamp(0.0, 1.0);
    (a.0 + t * du, a.1 + t * dv)
}

/// Push the along-track samples of one interval into `out`. Returns false
/// (and pushes nothing) when more than `budget` samples would be needed.
fn sample_interval(
    start: f64,
    end: f64,
    spacing: f64,
    subdivide: bool,
    budget: usize,
    out: &mut Vec<f64>,
) -> bool {
    let length = end - start;
    let segments = if length <= f64::EPSILON {
        0.0
    } else if subdivide {
        (length / spacing).ceil().max(1.0)
    } else {
        1.0
    };
    if segments + 1.0 > budget as f64 {
        return false;
    }
    let segments = segments as usize;

    out.push(start);
    for k in 1..segments {
        out.push(start + length * k as f64 / segments as f64);
    }
    if segments > 0 {
        out.push(end);
    }
    true
}

fn too_many_waypoints(limit: usize) -> PlanningError {
    PlanningError::validation(format!(
        "coverage pattern exceeds the waypoint limit ({limit}); increase spacing"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::haversine_distance;

    const BASE_LAT: f64 = 47.0;
    const BASE_LON: f64 = 8.0;

    /// Corner at `east_m`/`north_m` from the base point.
    fn corner(east_m: f64, north_m: f64) -> [f64; 2] {
        [
            BASE_LAT + meters_to_lat(north_m, BASE_LAT),
            BASE_LON + meters_to_lon(east_m, BASE_LAT),
        ]
    }

    fn rectangle(width_m: f64, height_m: f64) -> Vec<[f64; 2]> {
        vec![
            corner(0.0, 0.0),
            corner(width_m, 0.0),
            corner(width_m, height_m),
            corner(0.0, height_m),
        ]
    }

    fn grid_planner(corners: Vec<[f64; 2]>, spacing_m: f64) -> GridPathPlanner {
        let mut planner = GridPathPlanner::new(BASE_LAT, BASE_LON, 0.0).unwrap();
        planner.set_region(corners, spacing_m, 40.0).unwrap();
        planner
    }

    fn distance_to_edge_deg(a: [f64; 2], b: [f64; 2], p: [f64; 2]) -> f64 {
        let (dx, dy) = (b[1] - a[1], b[0] - a[0]);
        let len_sq = dx * dx + dy * dy;
        let t = (((p[1] - a[1]) * dx + (p[0] - a[0]) * dy) / len_sq).clamp(0.0, 1.0);
        let (cx, cy) = (a[1] + t * dx, a[0] + t * dy);
        ((p[1] - cx).powi(2) + (p[0] - cy).powi(2)).sqrt()
    }

    fn inside_or_on_boundary(region: &GridRegion, wp: &Waypoint) -> bool {
        if region.contains(wp.lat, wp.lon) {
            return true;
        }
        let corners = region.corners();
        let n = corners.len();
        (0..n).any(|i| {
            distance_to_edge_deg(corners[i], corners[(i + 1) % n], [wp.lat, wp.lon]) < 1e-9
        })
    }

    #[test]
    fn rectangle_lines_alternate_direction() {
        let planner = grid_planner(rectangle(200.0, 100.0), 30.0);
        let lines = planner.scan_lines().unwrap();
        assert_eq!(lines.len(), 4);

        for line in &lines {
            assert_eq!(line.waypoints.len(), 8);
            let first = line.waypoints.first().unwrap();
            let last = line.waypoints.last().unwrap();
            // Lines run east-west, so latitude is constant along a pass.
            assert!(line.waypoints.iter().all(|wp| wp.lat == first.lat));
            if line.index % 2 == 0 {
                assert!(!line.reversed);
                assert!(first.lon < last.lon);
            } else {
                assert!(line.reversed);
                assert!(first.lon > last.lon);
            }
        }
        for pair in lines.windows(2) {
            assert!(pair[1].waypoints[0].lat > pair[0].waypoints[0].lat);
        }
    }

    #[test]
    fn tall_region_scans_north_south() {
        let planner = grid_planner(rectangle(100.0, 200.0), 30.0);
        let lines = planner.scan_lines().unwrap();
        assert_eq!(lines.len(), 4);
        for line in &lines {
            let lon = line.waypoints[0].lon;
            assert!(line.waypoints.iter().all(|wp| wp.lon == lon));
        }
    }

    #[test]
    fn consecutive_points_on_a_line_respect_spacing() {
        let planner = grid_planner(rectangle(200.0, 100.0), 30.0);
        for line in planner.scan_lines().unwrap() {
            for pair in line.waypoints.windows(2) {
                let d = haversine_distance(pair[0].lat, pair[0].lon, pair[1].lat, pair[1].lon);
                assert!(d <= 30.0 * 1.01, "gap {d}");
            }
        }
    }

    #[test]
    fn generation_is_deterministic() {
        let corners = vec![
            corner(0.0, 0.0),
            corner(180.0, 20.0),
            corner(150.0, 130.0),
            corner(20.0, 90.0),
        ];
        let a = grid_planner(corners.clone(), 17.0).generate_path().unwrap();
        let b = grid_planner(corners, 17.0).generate_path().unwrap();
        assert_eq!(a.waypoint_count(), b.waypoint_count());
        for (x, y) in a.waypoints().iter().zip(b.waypoints()) {
            assert_eq!(x.lat.to_bits(), y.lat.to_bits());
            assert_eq!(x.lon.to_bits(), y.lon.to_bits());
            assert_eq!(x.altitude_m.to_bits(), y.altitude_m.to_bits());
        }
    }

    #[test]
    fn waypoints_stay_inside_irregular_regions() {
        let triangle = vec![corner(0.0, 0.0), corner(200.0, 0.0), corner(0.0, 140.0)];
        let u_shape = vec![
            corner(0.0, 0.0),
            corner(200.0, 0.0),
            corner(200.0, 140.0),
            corner(140.0, 140.0),
            corner(140.0, 50.0),
            corner(60.0, 50.0),
            corner(60.0, 140.0),
            corner(0.0, 140.0),
        ];
        for corners in [triangle, u_shape] {
            let planner = grid_planner(corners, 25.0);
            let region = planner.region().unwrap().clone();
            let path = planner.generate_path().unwrap();
            assert!(path.waypoint_count() > 1);
            for wp in &path.waypoints()[1..] {
                assert!(inside_or_on_boundary(&region, wp), "{wp:?} outside region");
                assert_eq!(wp.altitude_m, 40.0);
            }
        }
    }

    #[test]
    fn concave_region_splits_lines_around_the_notch() {
        let u_shape = vec![
            corner(0.0, 0.0),
            corner(200.0, 0.0),
            corner(200.0, 140.0),
            corner(140.0, 140.0),
            corner(140.0, 50.0),
            corner(60.0, 50.0),
            corner(60.0, 140.0),
            corner(0.0, 140.0),
        ];
        let planner = grid_planner(u_shape, 25.0);
        let notch_lat_min = corner(0.0, 51.0)[0];
        let notch_lon = (corner(61.0, 0.0)[1], corner(139.0, 0.0)[1]);
        for wp in planner.generate_path().unwrap().waypoints() {
            let in_notch = wp.lat > notch_lat_min && wp.lon > notch_lon.0 && wp.lon < notch_lon.1;
            assert!(!in_notch, "{wp:?} inside notch");
        }
    }

    #[test]
    fn coverage_within_spacing() {
        let spacing = 30.0;
        let cases = [
            rectangle(200.0, 100.0),
            vec![corner(0.0, 0.0), corner(200.0, 0.0), corner(0.0, 140.0)],
        ];
        for corners in cases {
            let planner = grid_planner(corners, spacing);
            let region = planner.region().unwrap().clone();
            let path = planner.generate_path().unwrap();
            let coverage = &path.waypoints()[1..];

            for i in 0..=40 {
                for j in 0..=40 {
                    let [lat, lon] = corner(200.0 * i as f64 / 40.0, 140.0 * j as f64 / 40.0);
                    if !region.contains(lat, lon) {
                        continue;
                    }
                    let nearest = coverage
                        .iter()
                        .map(|wp| haversine_distance(lat, lon, wp.lat, wp.lon))
                        .fold(f64::INFINITY, f64::min);
                    assert!(nearest <= spacing, "({lat}, {lon}) is {nearest} m from coverage");
                }
            }
        }
    }

    #[test]
    fn sliver_tip_between_lines_is_covered() {
        let spacing = 30.0;
        let sliver = vec![corner(0.0, 0.0), corner(1000.0, 0.0), corner(0.0, 40.0)];
        let planner = grid_planner(sliver, spacing);
        let region = planner.region().unwrap().clone();
        let path = planner.generate_path().unwrap();
        let coverage = &path.waypoints()[1..];
        for wp in coverage {
            assert!(inside_or_on_boundary(&region, wp), "{wp:?} outside region");
        }

        let nearest = |east_m: f64, north_m: f64| {
            let [lat, lon] = corner(east_m, north_m);
            coverage
                .iter()
                .map(|wp| haversine_distance(lat, lon, wp.lat, wp.lon))
                .fold(f64::INFINITY, f64::min)
        };

        assert!(nearest(900.0, 3.0) <= spacing);
        for i in 0..=200 {
            for j in 0..=16 {
                let (east, north) = (5.0 * i as f64, 2.5 * j as f64);
                let [lat, lon] = corner(east, north);
                if !region.contains(lat, lon) {
                    continue;
                }
                let d = nearest(east, north);
                assert!(d <= spacing, "({east} E, {north} N) is {d} m from coverage");
            }
        }
    }

    #[test]
    fn wide_spacing_gives_single_line() {
        let planner = grid_planner(rectangle(200.0, 100.0), 500.0);
        let lines = planner.scan_lines().unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].waypoints.len(), 2);
    }

    #[test]
    fn endpoints_only_without_subdivision() {
        let mut planner = GridPathPlanner::new(BASE_LAT, BASE_LON, 0.0)
            .unwrap()
            .with_options(GridOptions {
                subdivide_lines: false,
                ..GridOptions::default()
            })
            .unwrap();
        planner.set_region(rectangle(200.0, 100.0), 30.0, 40.0).unwrap();
        let lines = planner.scan_lines().unwrap();
        assert!(lines.iter().all(|line| line.waypoints.len() == 2));
    }

    #[test]
    fn return_to_home_closes_the_mission() {
        let mut planner = GridPathPlanner::new(BASE_LAT, BASE_LON, 0.0)
            .unwrap()
            .with_options(GridOptions {
                return_to_home: true,
                ..GridOptions::default()
            })
            .unwrap();
        planner.set_region(rectangle(200.0, 100.0), 30.0, 40.0).unwrap();
        let path = planner.generate_path().unwrap();
        assert_eq!(path.waypoints().last(), Some(path.home()));
    }

    #[test]
    fn total_distance_matches_recomputation() {
        let path = grid_planner(rectangle(200.0, 100.0), 30.0)
            .generate_path()
            .unwrap();
        let recomputed: f64 = path
            .waypoints()
            .windows(2)
            .map(|p| haversine_distance(p[0].lat, p[0].lon, p[1].lat, p[1].lon))
            .sum();
        assert!((path.total_distance() - recomputed).abs() <= 1e-6 * recomputed);
    }

    #[test]
    fn rejects_invalid_regions() {
        let mut planner = GridPathPlanner::new(BASE_LAT, BASE_LON, 0.0).unwrap();
        let cases = [
            (rectangle(100.0, 100.0), 0.0),
            (rectangle(100.0, 100.0), -5.0),
            (vec![corner(0.0, 0.0), corner(10.0, 0.0)], 5.0),
            (vec![corner(0.0, 0.0), corner(10.0, 0.0), corner(20.0, 0.0)], 5.0),
            (vec![[95.0, 8.0], corner(10.0, 0.0), corner(0.0, 10.0)], 5.0),
            (vec![[0.0, -170.0], [0.0, 170.0], [1.0, 170.0]], 5.0),
        ];
        for (corners, spacing) in cases {
            let err = planner.set_region(corners, spacing, 40.0).unwrap_err();
            assert!(err.is_validation(), "{err}");
        }
        assert!(planner.region().is_none());
    }

    #[test]
    fn failed_update_keeps_previous_region() {
        let mut planner = grid_planner(rectangle(100.0, 100.0), 20.0);
        let before = planner.region().cloned();
        assert!(planner.set_region(rectangle(50.0, 50.0), 0.0, 40.0).is_err());
        assert_eq!(planner.region().cloned(), before);
    }

    #[test]
    fn closed_ring_is_accepted() {
        let mut ring = rectangle(100.0, 60.0);
        ring.push(ring[0]);
        let region = GridRegion::new(ring, 20.0, 30.0).unwrap();
        assert_eq!(region.corners().len(), 4);
        assert!((region.area_m2() - 6_000.0).abs() < 1.0);
    }

    #[test]
    fn requires_region_before_generation() {
        let planner = GridPathPlanner::new(BASE_LAT, BASE_LON, 0.0).unwrap();
        assert!(planner.generate_path().unwrap_err().is_validation());
    }

    #[test]
    fn tiny_spacing_fails_before_allocating_lines() {
        let mut planner = GridPathPlanner::new(BASE_LAT, BASE_LON, 0.0)
            .unwrap()
            .with_options(GridOptions {
                max_waypoints: GridOptions::WAYPOINT_CEILING,
                ..GridOptions::default()
            })
            .unwrap();
        planner.set_region(rectangle(200.0, 100.0), 1e-6, 40.0).unwrap();
        assert!(planner.scan_lines().unwrap_err().is_validation());

        let unbounded = GridPathPlanner::new(BASE_LAT, BASE_LON, 0.0)
            .unwrap()
            .with_options(GridOptions {
                max_waypoints: usize::MAX,
                ..GridOptions::default()
            });
        assert!(unbounded.unwrap_err().is_validation());
    }

    #[test]
    fn enforces_waypoint_limit() {
        let mut planner = GridPathPlanner::new(BASE_LAT, BASE_LON, 0.0)
            .unwrap()
            .with_options(GridOptions {
                max_waypoints: 10,
                ..GridOptions::default()
            })
            .unwrap();
        planner.set_region(rectangle(200.0, 100.0), 5.0, 40.0).unwrap();
        assert!(planner.scan_lines().unwrap_err().is_validation());
    }
}
