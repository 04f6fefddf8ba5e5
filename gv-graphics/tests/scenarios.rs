use std::{cell::RefCell, rc::Rc};

use anyhow::Result;
use egui::{Color32, PointerButton, Pos2};
use gv_core::geometry::{Pixel, Point};
use gv_graphics::{
    Canvas, CanvasConfig, CanvasId, Mode, VertexId,
    shape::Shape,
    surface::{BACKGROUND, FOREGROUND},
};
use indexmap::IndexSet;
use itertools::Itertools;
use rstest::{fixture, rstest};

fn click(canvas: &mut Canvas, (x, y): (i32, i32)) {
    let at = Pixel::new(x, y);
    canvas.on_press(PointerButton::Primary, at).unwrap();
    canvas.on_release(PointerButton::Primary, at).unwrap();
}

fn drag(canvas: &mut Canvas, path: &[(i32, i32)]) {
    let (&first, rest) = path.split_first().unwrap();
    canvas
        .on_press(PointerButton::Primary, Pixel::new(first.0, first.1))
        .unwrap();
    for &(x, y) in rest {
        canvas
            .on_pointer_move(Pixel::new(x, y), Some(PointerButton::Primary))
            .unwrap();
    }
    let (x, y) = path[path.len() - 1];
    canvas
        .on_release(PointerButton::Primary, Pixel::new(x, y))
        .unwrap();
}

fn vertices(canvas: &Canvas) -> Vec<VertexId> {
    canvas.graph().graph().vertices().sorted().collect()
}

fn edges(canvas: &Canvas) -> Vec<(VertexId, VertexId)> {
    canvas
        .graph()
        .graph()
        .edges()
        .map(|(u, v)| (u.min(v), u.max(v)))
        .sorted()
        .collect()
}

#[fixture]
fn canvas() -> Canvas {
    Canvas::new(CanvasId(0), CanvasConfig::default())
}

#[rstest]
fn clicks_then_a_drag_along_the_base(mut canvas: Canvas) {
    for at in [(10, 10), (50, 50), (90, 10)] {
        click(&mut canvas, at);
    }
    canvas.set_mode(Mode::PaintEdges);
    drag(&mut canvas, &[(10, 10), (90, 10)]);

    assert_eq!(vertices(&canvas), vec![0, 1, 2]);
    assert_eq!(edges(&canvas), vec![(0, 2)]);
}

#[rstest]
fn erasing_an_edge_notifies_once(mut canvas: Canvas) {
    for at in [(10, 10), (90, 10), (50, 80)] {
        click(&mut canvas, at);
    }
    canvas.set_mode(Mode::PaintEdges);
    drag(&mut canvas, &[(50, 0), (50, 20)]);
    drag(&mut canvas, &[(0, 40), (50, 40)]);
    assert_eq!(edges(&canvas), vec![(0, 1), (0, 2)]);

    let removed = Rc::new(RefCell::new(Vec::new()));
    let log = Rc::clone(&removed);
    canvas.with_graph(|graph, _| {
        graph
            .observers_mut()
            .register_edge_removed_callback(move |u, v| {
                log.borrow_mut().push((u, v));
                Ok(())
            });
    });

    canvas.set_mode(Mode::DeleteEdges);
    drag(&mut canvas, &[(50, 0), (50, 5), (50, 20)]);

    assert_eq!(*removed.borrow(), vec![(0, 1)]);
    assert_eq!(edges(&canvas), vec![(0, 2)]);
    assert_eq!(vertices(&canvas), vec![0, 1, 2]);
}

#[rstest]
fn moving_a_vertex_keeps_the_graph(mut canvas: Canvas) {
    for at in [(10, 10), (60, 10), (110, 10), (150, 150)] {
        click(&mut canvas, at);
    }
    canvas.set_mode(Mode::PaintEdges);
    drag(&mut canvas, &[(0, 100), (200, 100)]);
    let (before_vertices, before_edges) = (vertices(&canvas), edges(&canvas));
    assert_eq!(before_edges, vec![(0, 3), (1, 3), (2, 3)]);

    canvas.set_mode(Mode::MoveVertices);
    drag(&mut canvas, &[(153, 154), (180, 170), (200, 200)]);

    assert_eq!(canvas.graph().location(3), Some(Pixel::new(200, 200)));
    assert_eq!(vertices(&canvas), before_vertices);
    assert_eq!(edges(&canvas), before_edges);

    // The edges are unpainted at the last stop and painted again from the new spot.
    let lines_from = |x: f32, y: f32, colour: Color32| {
        canvas
            .surface()
            .iter()
            .positions(|shape| {
                matches!(shape, Shape::Line { start, pen, .. }
                    if *pen == colour && *start == Pos2::new(x, y))
            })
            .collect_vec()
    };
    let erased = lines_from(180.0, 170.0, BACKGROUND);
    let redrawn = lines_from(200.0, 200.0, FOREGROUND);
    assert_eq!(erased.len(), 3);
    assert_eq!(redrawn.len(), 3);
    assert!(erased.iter().max() < redrawn.iter().min());
}

#[rstest]
fn wheel_in_then_out_restores_positions(mut canvas: Canvas) {
    for at in [(10, 10), (57, 123), (301, 44)] {
        click(&mut canvas, at);
    }
    let pointer = Pixel::new(77, 91);
    canvas.on_wheel(360, pointer);
    canvas.on_wheel(-360, pointer);

    for (u, (x, y)) in [(0, (10, 10)), (1, (57, 123)), (2, (301, 44))] {
        let position = canvas.graph().position(u).unwrap();
        assert!(position.distance(Point::new(f64::from(x), f64::from(y))) < 1e-9);
    }
}

#[rstest]
fn lasso_selection_limits_edge_painting(mut canvas: Canvas) {
    for at in [(20, 20), (120, 20), (120, 120), (20, 120)] {
        click(&mut canvas, at);
    }
    canvas.set_mode(Mode::PaintEdges);
    canvas.set_mode(Mode::SelectVertices);
    drag(&mut canvas, &[(0, 0), (140, 0), (140, 40), (0, 40)]);
    assert_eq!(canvas.graph().selection(), &IndexSet::from([0, 1]));

    canvas.set_mode(Mode::PaintEdges);
    // Also crosses the gap 0-3, which is outside the selection.
    drag(&mut canvas, &[(70, 0), (70, 40), (0, 90)]);

    assert_eq!(edges(&canvas), vec![(0, 1)]);
}

#[rstest]
fn transitions_clean_up_after_themselves(mut canvas: Canvas) {
    click(&mut canvas, (20, 20));
    click(&mut canvas, (120, 20));
    for mode in Mode::ALL.into_iter().chain(Mode::ALL.into_iter().rev()) {
        canvas.set_mode(mode);
        assert_eq!(canvas.mode(), mode);
    }
    canvas.set_mode(Mode::PaintVertices);
    canvas
        .on_pointer_move(Pixel::new(70, 70), None)
        .unwrap();
    canvas.set_mode(Mode::DragView);
    canvas.redraw();
    // Two vertices on a cleared background and nothing else.
    assert_eq!(canvas.surface().len(), 3);
}

#[rstest]
fn export_follows_painting_order(mut canvas: Canvas) -> Result<()> {
    let at = Pixel::new(40, 40);
    canvas.on_press(PointerButton::Primary, at)?;
    canvas.on_release(PointerButton::Primary, at)?;
    canvas.draw_grid(1, 1);

    let svg = canvas.surface().to_svg().to_string();

    // Background, grid cell, then the vertex on top of it.
    let rect = svg.rfind("<rect").unwrap_or_default();
    let vertex = svg.find("<ellipse").unwrap_or_default();
    assert!(rect < vertex);
    assert!(svg.contains("(0, 0)"));
    Ok(())
}
