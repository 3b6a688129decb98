use super::*;
use crate::construct::{build, EntityKind, Rule, Shape};
use crate::geometry::{Line3, Plane, Point3, Segment, Vector3};
use std::collections::HashSet;

use EntityKind::{Line as L, Plane as PL, Point as P, Segment as S, Triangle as T};

#[test]
fn test_command_codes_are_unique() {
    let codes: HashSet<CommandCode> = COMMANDS.iter().map(|c| c.code).collect();
    assert_eq!(codes.len(), COMMANDS.len());
    assert!(command(CommandCode::new(9, 9)).is_none());
    assert!(!is_available(CommandCode::new(9, 9), P, &[]));
}

#[test]
fn test_midpoint_accepts_points_or_one_segment() {
    let code = CommandCode::MIDPOINT;
    assert!(is_available(code, P, &[]));
    assert!(is_available(code, S, &[]));
    assert!(is_available(code, P, &[P]));
    assert!(!is_available(code, S, &[P]));
    assert!(!is_available(code, P, &[S]));
    assert!(!is_available(code, L, &[]));

    assert!(!is_ready(code, &[P]));
    assert!(is_ready(code, &[P, P]));
    assert_eq!(
        resolve(code, &[S]).map(|r| r.action),
        Some(Action::Construct(Rule::SegmentMidpoint))
    );
}

#[test]
fn test_point_is_moved_to_first_slot() {
    // Line picked before the point: dependencies come out as [point, line]
    let resolved = resolve(CommandCode::PERPENDICULAR_LINE, &[L, P]).expect("Should resolve");
    assert_eq!(resolved.action, Action::Construct(Rule::PerpendicularLine));
    assert_eq!(resolved.order, vec![1, 0]);

    let resolved = resolve(CommandCode::PARALLEL_PLANE, &[T, P]).expect("Should resolve");
    assert_eq!(resolved.order, vec![1, 0]);

    let resolved = resolve(CommandCode::PROJECTION, &[P, PL]).expect("Should resolve");
    assert_eq!(resolved.order, vec![0, 1]);
}

#[test]
fn test_transform_object_keeps_first_slot_when_it_fits() {
    // Two points: the first picked is the object, the second the center
    let resolved = resolve(CommandCode::POINT_SYMMETRY, &[P, P]).expect("Should resolve");
    assert_eq!(resolved.order, vec![0, 1]);

    // Center picked first: backtracking moves it to the center slot
    let resolved = resolve(CommandCode::POINT_SYMMETRY, &[P, S]).expect("Should resolve");
    assert_eq!(resolved.order, vec![1, 0]);

    let resolved = resolve(CommandCode::TRANSLATE, &[P, P, T]).expect("Should resolve");
    assert_eq!(resolved.order, vec![2, 0, 1]);
}

#[test]
fn test_intersection_pairs() {
    let code = CommandCode::INTERSECTION;
    for (a, b) in [(S, S), (S, L), (L, L), (L, PL), (S, T), (PL, PL), (PL, T), (T, PL), (PL, L)] {
        assert!(is_available(code, b, &[a]), "{a:?} x {b:?}");
        assert!(is_ready(code, &[a, b]), "{a:?} x {b:?}");
    }
    assert!(!is_available(code, T, &[T]));
    assert!(!is_available(code, P, &[]));
    assert!(!is_ready(code, &[L]));
}

#[test]
fn test_plane_signatures() {
    let code = CommandCode::PLANE;
    assert_eq!(
        resolve(code, &[P, P, P]).map(|r| r.action),
        Some(Action::Construct(Rule::PlaneThrough))
    );
    assert_eq!(
        resolve(code, &[T]).map(|r| r.action),
        Some(Action::Construct(Rule::PlaneFromTriangle))
    );
    let through_line = resolve(code, &[S, P]).expect("Should resolve");
    assert_eq!(through_line.action, Action::Construct(Rule::PlaneThroughPointLine));
    assert_eq!(through_line.order, vec![1, 0]);

    // A point then a line, or a third point, are both still possible
    assert!(is_available(code, L, &[P]));
    assert!(is_available(code, P, &[P, P]));
    assert!(!is_available(code, L, &[P, P]));
}

#[test]
fn test_bisector_plane_variants() {
    let code = CommandCode::BISECTOR_PLANE;
    assert_eq!(
        resolve(code, &[PL, PL]).map(|r| r.action),
        Some(Action::Construct(Rule::BisectorPlane))
    );
    assert_eq!(resolve(code, &[P, P]).map(|r| r.action), Some(Action::Construct(Rule::MidPlane)));
    assert_eq!(resolve(code, &[S]).map(|r| r.action), Some(Action::Construct(Rule::MidPlane)));
    assert!(!is_available(code, T, &[]));
}

#[test]
fn test_place_point_needs_no_selection() {
    let code = CommandCode::PLACE_POINT;
    assert!(command(code).expect("exists").places_point());
    assert!(is_ready::<EntityKind>(code, &[]));
    for kind in EntityKind::ALL {
        assert!(!is_available(code, kind, &[]));
    }
}

fn free(kind: EntityKind) -> Candidate {
    Candidate::new(kind, Origin::Free)
}

#[test]
fn test_edit_commands() {
    assert_eq!(
        resolve(CommandCode::CONNECT, &[S.into(), free(P)]),
        Some(Resolved { action: Action::Connect, order: vec![1, 0] })
    );
    assert!(!is_available(CommandCode::CONNECT, free(P), &[free(P)]));
    for code in [CommandCode::DELETE, CommandCode::HIDE] {
        for kind in EntityKind::ALL {
            assert!(is_ready(code, &[kind]));
            assert!(!is_available(code, kind, &[kind]));
        }
    }
}

#[test]
fn test_pin_and_connect_require_manual_entities() {
    let connected = Candidate::new(P, Origin::Connected);

    for kind in EntityKind::ALL {
        assert!(!is_available(CommandCode::PIN, kind, &[]));
        assert!(is_ready(CommandCode::PIN, &[free(kind)]));
    }
    assert!(is_ready(CommandCode::PIN, &[connected]));

    // Only a free point can gain a dependency
    assert!(is_available(CommandCode::CONNECT, free(P), &[]));
    assert!(!is_available(CommandCode::CONNECT, Candidate::from(P), &[]));
    assert!(!is_available(CommandCode::CONNECT, connected, &[]));
    assert!(!is_ready(CommandCode::CONNECT, &[connected, L.into()]));
    // The target may be derived
    assert!(is_ready(CommandCode::CONNECT, &[free(P), L.into()]));
}

fn sample(kind: EntityKind) -> Shape {
    match kind {
        P => Shape::Point(Point3::new(0.0, 1.0, 2.0)),
        S => Shape::Segment(Segment::new(Point3::origin(), Point3::new(1.0, 0.0, 0.0))),
        L => Shape::Line(Line3::new(Point3::new(0.0, 0.0, 1.0), Vector3::y())),
        PL => Shape::Plane(Plane::xy()),
        T => Shape::Triangle([
            Point3::new(0.0, 0.0, 3.0),
            Point3::new(1.0, 0.0, 3.0),
            Point3::new(0.0, 1.0, 3.0),
        ]),
    }
}

#[test]
fn test_every_construct_signature_builds() {
    for spec in COMMANDS {
        for sig in spec.signatures {
            let Action::Construct(rule) = sig.action else {
                continue;
            };
            // Every kind each slot accepts must be readable by the rule
            for (i, slot) in sig.slots.iter().enumerate() {
                for kind in EntityKind::ALL.into_iter().filter(|k| slot.accepts(*k)) {
                    let deps: Vec<Shape> = sig
                        .slots
                        .iter()
                        .enumerate()
                        .map(|(j, other)| {
                            if j == i {
                                sample(kind)
                            } else {
                                let k = EntityKind::ALL
                                    .into_iter()
                                    .find(|k| other.accepts(*k))
                                    .expect("slot accepts some kind");
                                sample(k)
                            }
                        })
                        .collect();
                    assert!(
                        build(rule, &deps).is_ok(),
                        "{} {:?} rejects {:?}",
                        spec.name,
                        rule,
                        deps
                    );
                }
            }
        }
    }
}
