//! Intersections between lines, planes and segments.
//!
//! Every `intersect_*` function always returns a value: when the objects do
//! not actually meet it falls back to a point (or line) lying on one of them.
//! Callers that need to know whether the result is a real intersection test
//! the matching `*_intersecting` predicate first.

use super::{any_orthogonal, Line3, Plane, Point3, Segment, EPSILON, PARALLEL_EPSILON};

/// Closest-point parameters `(t, s)` on `l1` and `l2` of the common
/// perpendicular, or None when the lines are parallel.
fn common_perpendicular(l1: &Line3, l2: &Line3) -> Option<(f64, f64)> {
    let w0 = l1.origin - l2.origin;
    let b = l1.direction.dot(&l2.direction);
    let d = l1.direction.dot(&w0);
    let e = l2.direction.dot(&w0);
    let denom = 1.0 - b * b;

    if l1.direction.cross(&l2.direction).norm() < PARALLEL_EPSILON {
        return None;
    }

    let t = (b * e - d) / denom;
    let s = (e - b * d) / denom;
    Some((t, s))
}

/// Point on `l2` closest to `l1`. Parallel lines yield `l2.origin`.
pub fn intersect_lines(l1: &Line3, l2: &Line3) -> Point3 {
    match common_perpendicular(l1, l2) {
        Some((_, s)) => l2.point_at(s),
        None => l2.origin,
    }
}

/// True when the two lines cross within tolerance. Parallel lines never do.
pub fn lines_intersecting(l1: &Line3, l2: &Line3) -> bool {
    match common_perpendicular(l1, l2) {
        Some((t, s)) => (l1.point_at(t) - l2.point_at(s)).norm() < EPSILON,
        None => false,
    }
}

/// Line shared by two planes. Parallel planes yield a line lying in `p1`
/// through its origin.
pub fn intersect_planes(p1: &Plane, p2: &Plane) -> Line3 {
    let direction = p1.normal.cross(&p2.normal);
    let len_sq = direction.norm_squared();

    if len_sq.sqrt() < PARALLEL_EPSILON {
        return Line3::new(p1.origin(), any_orthogonal(&p1.normal));
    }

    let coords = (p2.normal.cross(&direction) * p1.offset
        + direction.cross(&p1.normal) * p2.offset)
        / len_sq;
    Line3::new(Point3::from(coords), direction)
}

pub fn planes_intersecting(p1: &Plane, p2: &Plane) -> bool {
    !p1.is_parallel_to(p2)
}

/// Where `line` pierces `plane`. A parallel line yields its own origin.
pub fn intersect_plane_line(plane: &Plane, line: &Line3) -> Point3 {
    let denom = plane.normal.dot(&line.direction);
    if denom.abs() < PARALLEL_EPSILON {
        return line.origin;
    }
    let t = -plane.signed_distance(&line.origin) / denom;
    line.point_at(t)
}

pub fn plane_line_intersecting(plane: &Plane, line: &Line3) -> bool {
    plane.normal.dot(&line.direction).abs() >= PARALLEL_EPSILON
}

/// Where `segment`'s supporting line crosses `plane`. A segment parallel to
/// the plane yields its start point.
pub fn intersect_plane_segment(plane: &Plane, segment: &Segment) -> Point3 {
    let s0 = plane.signed_distance(&segment.start);
    let s1 = plane.signed_distance(&segment.end);
    if (s0 - s1).abs() < EPSILON {
        return segment.start;
    }
    segment.start + (segment.end - segment.start) * (s0 / (s0 - s1))
}

/// True when the segment touches or crosses the plane.
pub fn plane_segment_intersecting(plane: &Plane, segment: &Segment) -> bool {
    let s0 = plane.signed_distance(&segment.start);
    let s1 = plane.signed_distance(&segment.end);
    (s0 <= EPSILON && s1 >= -EPSILON) || (s0 >= -EPSILON && s1 <= EPSILON)
}

/// Point on `s2`'s line closest to `s1`'s line. Parallel segments yield `s2.start`.
pub fn intersect_segments(s1: &Segment, s2: &Segment) -> Point3 {
    if s2.is_degenerate() {
        return s2.start;
    }
    intersect_lines(&s1.line, &s2.line)
}

/// True when both bounded segments share a point, endpoints included.
pub fn segments_intersecting(s1: &Segment, s2: &Segment) -> bool {
    if s1.is_degenerate() {
        return s2.contains_point(&s1.start);
    }
    if s2.is_degenerate() {
        return s1.contains_point(&s2.start);
    }
    if !lines_intersecting(&s1.line, &s2.line) {
        return false;
    }
    let p = intersect_lines(&s1.line, &s2.line);
    s1.contains_point(&p) && s2.contains_point(&p)
}

/// True when `segment` crosses the infinite `line`.
pub fn segment_line_intersecting(segment: &Segment, line: &Line3) -> bool {
    if segment.is_degenerate() {
        return line.contains_point(&segment.start);
    }
    lines_intersecting(&segment.line, line) && segment.contains_point(&intersect_lines(line, &segment.line))
}
