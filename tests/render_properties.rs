use callout::render::TerminatorShape;
use callout::{AnnotationGeometry, CoordinateSpace, LineShape, Point, RenderPlan, Terminator, render};

fn scenario_a() -> AnnotationGeometry {
    AnnotationGeometry {
        start: Point::new(100.0, 100.0),
        end: Point::new(300.0, 100.0),
        line_shape: LineShape::Straight,
        terminator: Terminator::Arrow,
        label: 5,
        curvature: 0,
        curve_flipped: false,
        label_font_size: 20.0,
        terminator_size: 15.0,
        label_gap: 8.0,
        space: CoordinateSpace::Screen,
    }
}

fn variants() -> Vec<AnnotationGeometry> {
    let mut out = Vec::new();
    let ends = [
        Point::new(300.0, 100.0),
        Point::new(40.0, 380.0),
        Point::new(260.0, -150.0),
        Point::new(-200.0, 90.0),
    ];
    for end in ends {
        for shape in [LineShape::Straight, LineShape::Curved, LineShape::SCurved] {
            for curvature in [0, 1, 25, 50, 75, 100] {
                for flipped in [false, true] {
                    for terminator in [Terminator::None, Terminator::Dot, Terminator::Arrow] {
                        out.push(AnnotationGeometry {
                            end,
                            line_shape: shape,
                            curvature,
                            curve_flipped: flipped,
                            terminator,
                            ..scenario_a()
                        });
                    }
                }
            }
        }
    }
    out
}

/// Bent and straight lines across label sizes and gaps, including a zero gap
fn sized_variants() -> Vec<AnnotationGeometry> {
    let mut out = Vec::new();
    for label_gap in [0.0, 2.0, 30.0] {
        for label_font_size in [8.0, 60.0] {
            for label in [5, 123] {
                for base in variants() {
                    if base.curve_flipped || base.terminator == Terminator::Dot {
                        continue;
                    }
                    out.push(AnnotationGeometry {
                        label,
                        label_font_size,
                        label_gap,
                        ..base
                    });
                }
            }
        }
    }
    out
}

fn arrow_apex(plan: &RenderPlan) -> Point {
    match &plan.terminator {
        Some(TerminatorShape::Arrow(pts)) => pts[0],
        other => panic!("expected arrow, got {other:?}"),
    }
}

#[test]
fn scenario_a_straight_arrow() {
    let plan = render(&scenario_a()).unwrap();
    let radius = plan.label_box.radius();
    assert_eq!(plan.main_path.len(), 2);
    assert_eq!(plan.main_path[0], Point::new(100.0 + radius + 8.0, 100.0));
    assert_eq!(plan.main_path[1], Point::new(285.0, 100.0));
    assert_eq!(arrow_apex(&plan), Point::new(300.0, 100.0));
}

#[test]
fn scenario_b_curved_bends_to_one_side() {
    let geo = AnnotationGeometry {
        line_shape: LineShape::Curved,
        curvature: 50,
        ..scenario_a()
    };
    let plan = render(&geo).unwrap();
    assert!(plan.main_path.len() > 2);

    let interior = &plan.main_path[1..plan.main_path.len() - 1];
    assert!(interior.iter().all(|p| p.y != 100.0));
    let above = interior.iter().filter(|p| p.y < 100.0).count();
    assert!(above == interior.len() || above == 0, "curve crosses the chord");

    // The end tucks under the arrowhead, close to the chord
    let last = *plan.main_path.last().unwrap();
    assert!((last.y - 100.0).abs() < 15.0);
    assert_eq!(arrow_apex(&plan), Point::new(300.0, 100.0));
}

#[test]
fn scenario_c_zero_curvature_matches_straight() {
    let straight = render(&scenario_a()).unwrap();
    for shape in [LineShape::Curved, LineShape::SCurved] {
        let geo = AnnotationGeometry {
            line_shape: shape,
            curvature: 0,
            curve_flipped: true,
            ..scenario_a()
        };
        assert_eq!(render(&geo).unwrap(), straight);
    }
}

#[test]
fn scenario_d_degenerate_chord() {
    for shape in [LineShape::Straight, LineShape::Curved, LineShape::SCurved] {
        let geo = AnnotationGeometry {
            end: Point::new(100.0, 100.0),
            line_shape: shape,
            curvature: 60,
            ..scenario_a()
        };
        let plan = render(&geo).unwrap();
        assert_eq!(plan.main_path.len(), 2);
        assert_eq!(plan.main_path[0], plan.main_path[1]);
        assert!(plan.underlay_path.is_none());
        assert_eq!(arrow_apex(&plan), Point::new(100.0, 100.0));
    }
}

#[test]
fn rendering_is_deterministic() {
    for geo in variants() {
        assert_eq!(render(&geo).unwrap(), render(&geo).unwrap());
    }
}

#[test]
fn visible_line_stays_outside_label() {
    for geo in variants().into_iter().chain(sized_variants()) {
        let plan = render(&geo).unwrap();
        let radius = plan.label_box.radius();
        for p in &plan.main_path {
            let d = p.distance(geo.start);
            assert!(d >= radius - 0.5, "{:?}: point {:?} at {} < {}", geo.line_shape, p, d, radius);
        }
        assert!(!plan.label_box.rect.contains_point(plan.main_path[0]) || geo.start == geo.end);
    }
}

#[test]
fn arrow_setback_and_apex() {
    let all = variants().into_iter().chain(sized_variants());
    for geo in all.filter(|g| g.terminator == Terminator::Arrow) {
        let plan = render(&geo).unwrap();
        let last = *plan.main_path.last().unwrap();
        assert!((last.distance(geo.end) - geo.terminator_size).abs() < 1e-3);
        assert_eq!(arrow_apex(&plan), geo.end);
    }
}

#[test]
fn non_arrow_paths_end_at_target() {
    for geo in variants().into_iter().filter(|g| g.terminator != Terminator::Arrow) {
        let plan = render(&geo).unwrap();
        assert_eq!(*plan.main_path.last().unwrap(), geo.end);
    }
}

#[test]
fn underlay_bridges_offset_point_to_curve() {
    let geo = AnnotationGeometry {
        line_shape: LineShape::SCurved,
        curvature: 100,
        ..scenario_a()
    };
    let plan = render(&geo).unwrap();
    let underlay = plan.underlay_path.expect("bent line should have an underlay");
    assert_eq!(underlay.len(), 2);
    assert_eq!(underlay[1], plan.main_path[0]);
    let reach = plan.label_box.radius() + geo.label_gap;
    assert!((underlay[0].distance(geo.start) - reach).abs() < 1e-3);
}

#[test]
fn document_space_mirrors_screen_space() {
    let page_height = 800.0;
    for screen in variants() {
        let document = AnnotationGeometry {
            start: screen.start.flip_y(page_height),
            end: screen.end.flip_y(page_height),
            space: CoordinateSpace::Document { page_height },
            ..screen.clone()
        };
        let a = render(&screen).unwrap();
        let b = render(&document).unwrap();

        let close = |p: Point, q: Point| p.flip_y(page_height).distance(q) < 1e-3;
        assert_eq!(a.main_path.len(), b.main_path.len());
        assert!(a.main_path.iter().zip(&b.main_path).all(|(p, q)| close(*p, *q)));
        assert_eq!(a.underlay_path.is_some(), b.underlay_path.is_some());
        assert!(close(a.label_box.center(), b.label_box.center()));
        match (&a.terminator, &b.terminator) {
            (Some(TerminatorShape::Arrow(x)), Some(TerminatorShape::Arrow(y))) => {
                assert!(x.iter().zip(y).all(|(p, q)| close(*p, *q)));
            }
            (Some(TerminatorShape::Dot { center: c1, .. }), Some(TerminatorShape::Dot { center: c2, .. })) => {
                assert!(close(*c1, *c2));
            }
            (None, None) => {}
            other => panic!("terminators differ: {other:?}"),
        }
    }
}

#[test]
fn curvature_is_clamped_not_rejected() {
    let over = AnnotationGeometry {
        line_shape: LineShape::Curved,
        curvature: 1000,
        ..scenario_a()
    };
    let max = AnnotationGeometry {
        curvature: 100,
        ..over.clone()
    };
    assert_eq!(render(&over).unwrap(), render(&max).unwrap());

    let under = AnnotationGeometry {
        curvature: -5,
        ..over
    };
    assert_eq!(render(&under).unwrap(), render(&scenario_a()).unwrap());
}

#[test]
fn render_is_callable_from_many_threads() {
    let expected = render(&scenario_a()).unwrap();
    std::thread::scope(|s| {
        let handles: Vec<_> = (0..4).map(|_| s.spawn(|| render(&scenario_a()).unwrap())).collect();
        for h in handles {
            assert_eq!(h.join().unwrap(), expected);
        }
    });
}
