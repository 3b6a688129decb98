use super::tests_order::{derive, free_point, reachable};
use super::*;
use crate::construct::{EntityId, Rule, Shape};
use crate::geometry::{ApproxEq, Point3, Vector3};
use crate::scene::MemoryScene;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::HashSet;

fn point_of(graph: &ConstructionGraph, id: EntityId) -> Point3 {
    graph
        .get(id)
        .and_then(|e| e.shape().as_point())
        .expect("entity is a point")
}

#[test]
fn test_midpoint_follows_moved_endpoint() {
    let mut graph = ConstructionGraph::new();
    let mut scene = MemoryScene::new();
    let p1 = free_point(&mut graph, &mut scene, 0.0, 0.0, 0.0);
    let p2 = free_point(&mut graph, &mut scene, 2.0, 0.0, 0.0);
    let m = derive(&mut graph, &mut scene, Rule::Midpoint, &[p1, p2]);
    assert!(point_of(&graph, m).approx_eq(&Point3::new(1.0, 0.0, 0.0)));

    let n = graph
        .set_manual_shape(p1, Shape::Point(Point3::new(4.0, 0.0, 0.0)), &mut scene)
        .expect("Should move");

    assert_eq!(n, 1);
    assert!(point_of(&graph, m).approx_eq(&Point3::new(3.0, 0.0, 0.0)));
    assert!(graph.moved().is_empty());
}

#[test]
fn test_chain_recomputes_in_order() {
    let mut graph = ConstructionGraph::new();
    let mut scene = MemoryScene::new();
    let a = free_point(&mut graph, &mut scene, 0.0, 0.0, 0.0);
    let b = free_point(&mut graph, &mut scene, 2.0, 2.0, 0.0);
    let c = free_point(&mut graph, &mut scene, 4.0, 0.0, 0.0);
    let m = derive(&mut graph, &mut scene, Rule::Midpoint, &[a, b]);
    let s = derive(&mut graph, &mut scene, Rule::Segment, &[m, c]);
    let l = derive(&mut graph, &mut scene, Rule::LineFromSegment, &[s]);
    let sm = derive(&mut graph, &mut scene, Rule::SegmentMidpoint, &[s]);

    graph
        .set_manual_shape(a, Shape::Point(Point3::new(-2.0, 2.0, 0.0)), &mut scene)
        .expect("Should move");

    let m_now = point_of(&graph, m);
    assert!(m_now.approx_eq(&Point3::new(0.0, 2.0, 0.0)));
    match graph.get(s).unwrap().shape() {
        Shape::Segment(seg) => assert!(seg.start.approx_eq(&m_now)),
        other => panic!("expected segment, got {other:?}"),
    }
    let line = graph.get(l).unwrap().shape().as_line().expect("line");
    assert!(line.contains_point(&m_now));
    assert!(line.contains_point(&Point3::new(4.0, 0.0, 0.0)));
    assert!(point_of(&graph, sm).approx_eq(&Point3::new(2.0, 1.0, 0.0)));
}

#[test]
fn test_unrelated_entities_not_recomputed() {
    let mut graph = ConstructionGraph::new();
    let mut scene = MemoryScene::new();
    let a = free_point(&mut graph, &mut scene, 0.0, 0.0, 0.0);
    let b = free_point(&mut graph, &mut scene, 2.0, 0.0, 0.0);
    let c = free_point(&mut graph, &mut scene, 0.0, 2.0, 0.0);
    let _m_ab = derive(&mut graph, &mut scene, Rule::Midpoint, &[a, b]);
    let _m_bc = derive(&mut graph, &mut scene, Rule::Midpoint, &[b, c]);

    let n = graph
        .set_manual_shape(a, Shape::Point(Point3::new(1.0, 1.0, 1.0)), &mut scene)
        .expect("Should move");
    assert_eq!(n, 1);
}

#[test]
fn test_sweep_marks_exactly_the_descendants() {
    let mut rng = ChaCha8Rng::seed_from_u64(42);

    for _ in 0..25 {
        let mut graph = ConstructionGraph::new();
        let mut scene = MemoryScene::new();
        let mut ids = Vec::new();
        for _ in 0..3 {
            let x = rng.gen_range(-3.0..3.0);
            ids.push(free_point(&mut graph, &mut scene, x, 0.0, 1.0));
        }
        for _ in 0..15 {
            let a = ids[rng.gen_range(0..ids.len())];
            let b = ids[rng.gen_range(0..ids.len())];
            ids.push(derive(&mut graph, &mut scene, Rule::Midpoint, &[a, b]));
        }

        let start = ids[rng.gen_range(0..ids.len())];
        let expected = reachable(&graph, start);

        graph.mark_moved(start).unwrap();
        graph.propagate();
        let mut marked: HashSet<EntityId> = graph.moved().into_iter().collect();
        assert!(marked.remove(&start));
        assert_eq!(marked, expected);

        graph.clear_moved();
        let descendants: HashSet<EntityId> =
            graph.descendants(start).unwrap().into_iter().collect();
        assert_eq!(descendants, expected);
    }
}

#[test]
fn test_delete_cascades_to_dependents() {
    let mut graph = ConstructionGraph::new();
    let mut scene = MemoryScene::new();
    let a = free_point(&mut graph, &mut scene, 0.0, 0.0, 0.0);
    let b = free_point(&mut graph, &mut scene, 2.0, 0.0, 0.0);
    let c = free_point(&mut graph, &mut scene, 0.0, 2.0, 0.0);
    let s = derive(&mut graph, &mut scene, Rule::Segment, &[a, b]);
    let m = derive(&mut graph, &mut scene, Rule::SegmentMidpoint, &[s]);
    let t = derive(&mut graph, &mut scene, Rule::Triangle, &[m, b, c]);
    let keep = derive(&mut graph, &mut scene, Rule::Midpoint, &[b, c]);
    let handles: Vec<_> = [s, m, t].iter().map(|id| graph.get(*id).unwrap().placement()).collect();

    let removed = graph.remove_cascade(a, &mut scene).expect("Should delete");

    assert_eq!(removed, vec![a, s, m, t]);
    assert_eq!(graph.order(), vec![b, c, keep]);
    assert!(graph.is_topologically_sorted());
    for handle in handles {
        assert!(scene.instance(handle).is_none());
    }
    assert_eq!(scene.len(), 3);
    for e in graph.iter() {
        assert!(e.dependencies().iter().all(|d| graph.contains(*d)));
    }
}

#[test]
fn test_random_delete_leaves_no_dangling_dependencies() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);

    for _ in 0..25 {
        let mut graph = ConstructionGraph::new();
        let mut scene = MemoryScene::new();
        let mut points = Vec::new();
        for i in 0..4 {
            points.push(free_point(&mut graph, &mut scene, i as f64, 0.0, 0.0));
        }
        for _ in 0..12 {
            let a = points[rng.gen_range(0..points.len())];
            let b = points[rng.gen_range(0..points.len())];
            if rng.gen_bool(0.3) {
                // Leaves: segments are not reused as inputs
                derive(&mut graph, &mut scene, Rule::Segment, &[a, b]);
            } else {
                points.push(derive(&mut graph, &mut scene, Rule::Midpoint, &[a, b]));
            }
        }

        let ids = graph.order();
        let victim = ids[rng.gen_range(0..ids.len())];
        let mut expected = reachable(&graph, victim);
        expected.insert(victim);
        let total = graph.len();

        let removed: HashSet<EntityId> =
            graph.remove_cascade(victim, &mut scene).unwrap().into_iter().collect();

        assert_eq!(removed, expected);
        assert_eq!(graph.len(), total - removed.len());
        assert_eq!(scene.len(), graph.len());
        assert!(graph.is_topologically_sorted());
        for e in graph.iter() {
            assert!(e.dependencies().iter().all(|d| graph.contains(*d)));
        }
    }
}

#[test]
fn test_pinned_group_drags_together() {
    let mut graph = ConstructionGraph::new();
    let mut scene = MemoryScene::new();
    let a = free_point(&mut graph, &mut scene, 0.0, 0.0, 0.0);
    let b = free_point(&mut graph, &mut scene, 2.0, 0.0, 0.0);
    let c = free_point(&mut graph, &mut scene, 0.0, 2.0, 0.0);
    let m = derive(&mut graph, &mut scene, Rule::Midpoint, &[a, c]);
    graph.toggle_pinned(a).unwrap();
    graph.toggle_pinned(c).unwrap();

    let group = graph.drag_group(a).unwrap();
    graph
        .translate_group(&group, &Vector3::new(1.0, 0.0, 0.0), &mut scene)
        .expect("Should drag");

    assert!(point_of(&graph, a).approx_eq(&Point3::new(1.0, 0.0, 0.0)));
    assert!(point_of(&graph, c).approx_eq(&Point3::new(1.0, 2.0, 0.0)));
    assert!(point_of(&graph, b).approx_eq(&Point3::new(2.0, 0.0, 0.0)));
    assert!(point_of(&graph, m).approx_eq(&Point3::new(1.0, 1.0, 0.0)));
}

#[test]
fn test_derived_entities_cannot_be_pinned_or_dragged() {
    let mut graph = ConstructionGraph::new();
    let mut scene = MemoryScene::new();
    let a = free_point(&mut graph, &mut scene, 0.0, 0.0, 0.0);
    let b = free_point(&mut graph, &mut scene, 2.0, 0.0, 0.0);
    let m = derive(&mut graph, &mut scene, Rule::Midpoint, &[a, b]);

    assert_eq!(graph.toggle_pinned(m), Err(GraphError::NotManual(m)));
    assert!(graph.drag_group(m).unwrap().is_empty());
    assert_eq!(
        graph.set_manual_shape(m, Shape::Point(Point3::origin()), &mut scene),
        Err(GraphError::NotManual(m))
    );
}

#[test]
fn test_connected_point_stays_on_target() {
    let mut graph = ConstructionGraph::new();
    let mut scene = MemoryScene::new();
    let a = free_point(&mut graph, &mut scene, 0.0, 0.0, 0.0);
    let b = free_point(&mut graph, &mut scene, 2.0, 0.0, 0.0);
    let l = derive(&mut graph, &mut scene, Rule::LineThrough, &[a, b]);
    let p = free_point(&mut graph, &mut scene, 1.0, 1.0, 0.0);

    graph.connect(p, l, &mut scene).expect("Should connect");
    assert!(point_of(&graph, p).approx_eq(&Point3::new(1.0, 0.0, 0.0)));

    // Dragging a connected point slides it along its target
    graph
        .translate_group(&[p], &Vector3::new(0.5, 3.0, 0.0), &mut scene)
        .expect("Should drag");
    assert!(point_of(&graph, p).approx_eq(&Point3::new(1.5, 0.0, 0.0)));

    // Moving the target carries the point along
    graph
        .set_manual_shape(b, Shape::Point(Point3::new(0.0, 2.0, 0.0)), &mut scene)
        .expect("Should move");
    let line = graph.get(l).unwrap().shape().as_line().unwrap();
    assert!(line.contains_point(&point_of(&graph, p)));
}

#[test]
fn test_connected_point_clamps_to_segment() {
    let mut graph = ConstructionGraph::new();
    let mut scene = MemoryScene::new();
    let a = free_point(&mut graph, &mut scene, 0.0, 0.0, 0.0);
    let b = free_point(&mut graph, &mut scene, 2.0, 0.0, 0.0);
    let s = derive(&mut graph, &mut scene, Rule::Segment, &[a, b]);
    let p = free_point(&mut graph, &mut scene, 5.0, 1.0, 0.0);

    graph.connect(p, s, &mut scene).expect("Should connect");

    assert!(point_of(&graph, p).approx_eq(&Point3::new(2.0, 0.0, 0.0)));
}

#[test]
fn test_pinned_dependent_moves_only_through_sweep() {
    let mut graph = ConstructionGraph::new();
    let mut scene = MemoryScene::new();
    let f = free_point(&mut graph, &mut scene, 0.0, 0.0, 0.0);
    let g = free_point(&mut graph, &mut scene, 4.0, 0.0, 0.0);
    let s = derive(&mut graph, &mut scene, Rule::Segment, &[f, g]);
    let p = free_point(&mut graph, &mut scene, 2.0, 1.0, 0.0);
    graph.connect(p, s, &mut scene).expect("Should connect");
    assert!(point_of(&graph, p).approx_eq(&Point3::new(2.0, 0.0, 0.0)));

    graph.toggle_pinned(f).unwrap();
    graph.toggle_pinned(p).unwrap();
    let group = graph.drag_group(f).unwrap();
    assert!(group.contains(&p));

    graph
        .translate_group(&group, &Vector3::new(0.0, 2.0, 0.0), &mut scene)
        .expect("Should drag");

    // P is reprojected from (2,0,0) onto the moved segment, never shifted by the delta
    assert!(point_of(&graph, f).approx_eq(&Point3::new(0.0, 2.0, 0.0)));
    assert!(point_of(&graph, p).approx_eq(&Point3::new(2.4, 0.8, 0.0)));
    assert!(graph.moved().is_empty());
}
