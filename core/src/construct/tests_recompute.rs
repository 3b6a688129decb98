use super::*;
use crate::geometry::{ApproxEq, Line3, Plane, Point3, Segment, Vector3};

fn pt(x: f64, y: f64, z: f64) -> Shape {
    Shape::Point(Point3::new(x, y, z))
}

fn seg(a: [f64; 3], b: [f64; 3]) -> Shape {
    Shape::Segment(Segment::new(Point3::from(a), Point3::from(b)))
}

fn line(origin: [f64; 3], dir: [f64; 3]) -> Shape {
    Shape::Line(Line3::new(Point3::from(origin), Vector3::from(dir)))
}

fn plane(normal: [f64; 3], offset: f64) -> Shape {
    Shape::Plane(Plane::new(Vector3::from(normal), offset))
}

fn assert_point(shape: Shape, expected: [f64; 3]) {
    let p = shape.as_point().expect("point");
    assert!(p.approx_eq(&Point3::from(expected)), "{p:?} != {expected:?}");
}

/// Rebuilding from the same inputs gives the same shape.
fn assert_stable(rule: Rule, deps: &[Shape]) -> Shape {
    let first = build(rule, deps).expect("Should build");
    let again = recompute(first.kind(), rule, &first, deps).expect("Should recompute");
    assert!(first.approx_eq(&again), "{rule:?} not stable: {first:?} vs {again:?}");
    first
}

#[test]
fn test_point_rules() {
    assert_point(assert_stable(Rule::Midpoint, &[pt(0.0, 0.0, 0.0), pt(2.0, 0.0, 0.0)]), [1.0, 0.0, 0.0]);
    assert_point(
        assert_stable(Rule::SegmentMidpoint, &[seg([0.0, 0.0, 0.0], [0.0, 4.0, 2.0])]),
        [0.0, 2.0, 1.0],
    );
    assert_point(
        assert_stable(
            Rule::Centroid,
            &[pt(0.0, 0.0, 0.0), pt(3.0, 0.0, 0.0), pt(0.0, 3.0, 0.0)],
        ),
        [1.0, 1.0, 0.0],
    );
    let tri = Shape::Triangle([
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(3.0, 0.0, 0.0),
        Point3::new(0.0, 3.0, 3.0),
    ]);
    assert_point(assert_stable(Rule::TriangleCentroid, &[tri]), [1.0, 1.0, 1.0]);
}

#[test]
fn test_projection_onto_each_target() {
    let p = pt(1.0, 1.0, 1.0);
    assert_point(
        assert_stable(Rule::Projection, &[p, line([0.0, 0.0, 0.0], [1.0, 0.0, 0.0])]),
        [1.0, 0.0, 0.0],
    );
    assert_point(assert_stable(Rule::Projection, &[p, plane([0.0, 0.0, 1.0], 0.0)]), [1.0, 1.0, 0.0]);
    // Projection onto a segment uses its carrier line, unclamped
    assert_point(
        assert_stable(Rule::Projection, &[pt(5.0, 1.0, 0.0), seg([0.0, 0.0, 0.0], [1.0, 0.0, 0.0])]),
        [5.0, 0.0, 0.0],
    );
    assert!(matches!(
        build(Rule::Projection, &[p, pt(0.0, 0.0, 0.0)]),
        Err(RuleError::DependencyKind { position: 1, .. })
    ));
}

#[test]
fn test_intersection_rule() {
    let l1 = line([0.0, 0.0, 0.0], [1.0, 1.0, 0.0]);
    let l2 = line([2.0, 0.0, 0.0], [-1.0, 1.0, 0.0]);
    assert_point(assert_stable(Rule::Intersection, &[l1, l2]), [1.0, 1.0, 0.0]);

    let shape = assert_stable(Rule::Intersection, &[plane([0.0, 0.0, 1.0], 0.0), plane([1.0, 0.0, 0.0], 1.0)]);
    let l = shape.as_line().expect("line");
    assert!(l.contains_point(&Point3::new(1.0, 5.0, 0.0)));
    assert!(l.direction.cross(&Vector3::y()).norm() < 1e-9);
}

#[test]
fn test_line_rules() {
    let a = pt(0.0, 0.0, 0.0);
    let b = pt(2.0, 0.0, 0.0);
    let through = assert_stable(Rule::LineThrough, &[a, b]).as_line().unwrap();
    assert!(through.contains_point(&Point3::new(-7.0, 0.0, 0.0)));

    let s = assert_stable(Rule::Segment, &[a, b]);
    let from_seg = assert_stable(Rule::LineFromSegment, &[s]).as_line().unwrap();
    assert!(from_seg.direction.approx_eq(&Vector3::x()));

    let perp = assert_stable(Rule::PerpendicularLine, &[pt(1.0, 3.0, 0.0), s]).as_line().unwrap();
    assert!(perp.contains_point(&Point3::new(1.0, 0.0, 0.0)));
    assert!(perp.direction.dot(&Vector3::x()).abs() < 1e-9);

    let normal = assert_stable(Rule::PerpendicularLine, &[pt(1.0, 3.0, 5.0), plane([0.0, 0.0, 1.0], 0.0)])
        .as_line()
        .unwrap();
    assert!(normal.contains_point(&Point3::new(1.0, 3.0, 0.0)));

    let parallel = assert_stable(Rule::ParallelLine, &[pt(0.0, 1.0, 0.0), s]).as_line().unwrap();
    assert!(parallel.contains_point(&Point3::new(9.0, 1.0, 0.0)));
}

#[test]
fn test_perpendicular_line_through_point_on_target() {
    let s = seg([0.0, 0.0, 0.0], [2.0, 0.0, 0.0]);
    let perp = assert_stable(Rule::PerpendicularLine, &[pt(1.0, 0.0, 0.0), s]).as_line().unwrap();
    assert!(perp.direction.dot(&Vector3::x()).abs() < 1e-9);
    assert!(perp.contains_point(&Point3::new(1.0, 0.0, 0.0)));
}

#[test]
fn test_angle_bisector() {
    let l1 = line([0.0, 0.0, 0.0], [1.0, 0.0, 0.0]);
    let l2 = line([0.0, 0.0, 0.0], [0.0, 1.0, 0.0]);
    let bisector = assert_stable(Rule::AngleBisector, &[l1, l2]).as_line().unwrap();
    assert!(bisector.contains_point(&Point3::new(1.0, 1.0, 0.0)));

    // Parallel lines bisect to the mid-line
    let l3 = line([0.0, 2.0, 0.0], [1.0, 0.0, 0.0]);
    let mid = assert_stable(Rule::AngleBisector, &[l1, l3]).as_line().unwrap();
    assert!(mid.contains_point(&Point3::new(5.0, 1.0, 0.0)));
}

#[test]
fn test_plane_rules() {
    let a = pt(0.0, 0.0, 1.0);
    let b = pt(1.0, 0.0, 1.0);
    let c = pt(0.0, 1.0, 1.0);
    let through = assert_stable(Rule::PlaneThrough, &[a, b, c]).as_plane().unwrap();
    assert!(through.contains_point(&Point3::new(7.0, -3.0, 1.0)));

    let tri = assert_stable(Rule::Triangle, &[a, b, c]);
    let from_tri = assert_stable(Rule::PlaneFromTriangle, &[tri]).as_plane().unwrap();
    assert!(from_tri.normal.cross(&through.normal).norm() < 1e-9);

    let x_axis = line([0.0, 0.0, 0.0], [1.0, 0.0, 0.0]);
    let with_line = assert_stable(Rule::PlaneThroughPointLine, &[pt(0.0, 0.0, 3.0), x_axis])
        .as_plane()
        .unwrap();
    assert!(with_line.contains_point(&Point3::new(4.0, 0.0, -2.0)));

    let perp = assert_stable(Rule::PerpendicularPlane, &[pt(2.0, 5.0, 5.0), x_axis]).as_plane().unwrap();
    assert!(perp.contains_point(&Point3::new(2.0, 0.0, 0.0)));

    let parallel = assert_stable(Rule::ParallelPlane, &[pt(0.0, 0.0, 4.0), Shape::Plane(through)])
        .as_plane()
        .unwrap();
    assert!(parallel.contains_point(&Point3::new(3.0, 3.0, 4.0)));
}

#[test]
fn test_mid_plane_from_points_or_segment() {
    let from_points = assert_stable(Rule::MidPlane, &[pt(0.0, 0.0, 0.0), pt(4.0, 0.0, 0.0)]);
    assert!(from_points.contains_point(&Point3::new(2.0, 9.0, -1.0)));

    let from_segment = assert_stable(Rule::MidPlane, &[seg([0.0, 0.0, 0.0], [4.0, 0.0, 0.0])]);
    assert!(from_segment.approx_eq(&from_points));
}

#[test]
fn test_bisector_plane() {
    let xy = plane([0.0, 0.0, 1.0], 0.0);
    let yz = plane([1.0, 0.0, 0.0], 0.0);
    let bisector = assert_stable(Rule::BisectorPlane, &[xy, yz]).as_plane().unwrap();
    // Points equidistant from both planes
    assert!(bisector.contains_point(&Point3::new(1.0, 5.0, 1.0)));

    let lifted = plane([0.0, 0.0, 1.0], 2.0);
    let midway = assert_stable(Rule::BisectorPlane, &[xy, lifted]).as_plane().unwrap();
    assert!(midway.contains_point(&Point3::new(3.0, 3.0, 1.0)));
}

#[test]
fn test_symmetries_and_translation() {
    let s = seg([1.0, 0.0, 0.0], [2.0, 1.0, 0.0]);

    let about_point = assert_stable(Rule::PointSymmetry, &[s, pt(0.0, 0.0, 0.0)]);
    match about_point {
        Shape::Segment(r) => {
            assert!(r.start.approx_eq(&Point3::new(-1.0, 0.0, 0.0)));
            assert!(r.end.approx_eq(&Point3::new(-2.0, -1.0, 0.0)));
        }
        other => panic!("expected segment, got {other:?}"),
    }

    let y_axis = line([0.0, 0.0, 0.0], [0.0, 1.0, 0.0]);
    assert_point(assert_stable(Rule::LineSymmetry, &[pt(1.0, 2.0, 3.0), y_axis]), [-1.0, 2.0, -3.0]);

    let xy = plane([0.0, 0.0, 1.0], 0.0);
    assert_point(assert_stable(Rule::PlaneSymmetry, &[pt(1.0, 2.0, 3.0), xy]), [1.0, 2.0, -3.0]);

    let moved = assert_stable(Rule::Translate, &[s, pt(0.0, 0.0, 0.0), pt(0.0, 0.0, 5.0)]);
    assert_eq!(moved.kind(), EntityKind::Segment);
    assert!(moved.approx_eq(&seg([1.0, 0.0, 5.0], [2.0, 1.0, 5.0])));
}

#[test]
fn test_connect_keeps_point_on_target() {
    let target = plane([0.0, 0.0, 1.0], 0.0);
    let current = pt(3.0, 4.0, 7.0);
    let snapped = recompute(EntityKind::Point, Rule::Connect, &current, &[target]).unwrap();
    assert_point(snapped, [3.0, 4.0, 0.0]);

    // Already on the target: unchanged
    let again = recompute(EntityKind::Point, Rule::Connect, &snapped, &[target]).unwrap();
    assert!(again.approx_eq(&snapped));
}

#[test]
fn test_free_rule_keeps_current_shape() {
    let current = pt(1.0, 2.0, 3.0);
    let shape = recompute(EntityKind::Point, Rule::Free, &current, &[]).unwrap();
    assert_eq!(shape, current);
}

#[test]
fn test_degenerate_inputs_stay_defined() {
    let a = pt(1.0, 1.0, 1.0);
    let line = assert_stable(Rule::LineThrough, &[a, a]).as_line().unwrap();
    assert!((line.direction.norm() - 1.0).abs() < 1e-9);

    let plane = assert_stable(Rule::PlaneThrough, &[a, a, pt(2.0, 2.0, 2.0)]).as_plane().unwrap();
    assert!((plane.normal.norm() - 1.0).abs() < 1e-9);
}

#[test]
fn test_wrong_dependency_lists_fail() {
    assert!(matches!(
        build(Rule::Midpoint, &[pt(0.0, 0.0, 0.0)]),
        Err(RuleError::Arity { expected: 2, got: 1, .. })
    ));
    assert!(matches!(
        build(Rule::Segment, &[pt(0.0, 0.0, 0.0), line([0.0, 0.0, 0.0], [1.0, 0.0, 0.0])]),
        Err(RuleError::DependencyKind { position: 1, got: EntityKind::Line, .. })
    ));
    let tri = Shape::Triangle([Point3::origin(), Point3::new(1.0, 0.0, 0.0), Point3::new(0.0, 1.0, 0.0)]);
    assert!(build(Rule::Intersection, &[tri, tri]).is_err());
    assert!(matches!(
        recompute(EntityKind::Line, Rule::Midpoint, &pt(0.0, 0.0, 0.0), &[pt(0.0, 0.0, 0.0), pt(1.0, 0.0, 0.0)]),
        Err(RuleError::OutputKind { kind: EntityKind::Line, .. })
    ));
}
