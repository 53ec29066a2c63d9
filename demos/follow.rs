//! Follow Example - Track the mouse over a terminal "surface"
//!
//! Lays out a surface with taffy, feeds terminal mouse events to it and
//! prints the pointer position relative to the surface's corner.
//! The first move prints a one-time greeting through `enhance`.
//!
//! Run with: cargo run --example follow
//! Set SPARK_POINTER_DELAY_MS to change the throttle, RUST_LOG=debug to see lifecycle logs.

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;
use std::time::Duration;

use crossterm::event::{poll, read, Event, KeyCode};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use spark_pointer::surface::input::{disable_mouse, enable_mouse, route_mouse_event};
use spark_pointer::{
    enhance, FirstMoveProps, Position, PositionTracker, SurfaceElement, TrackerConfig,
    TrackerProps,
};
use taffy::prelude::TaffyMaxContent;
use taffy::style_helpers::length;
use taffy::{Size, Style, TaffyTree};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let config = TrackerConfig::from_env()?;

    // Root fills the terminal, the surface sits 10 columns / 4 rows in
    let mut tree: TaffyTree<()> = TaffyTree::new();
    let node = tree
        .new_leaf(Style {
            size: Size {
                width: length(40.0),
                height: length(12.0),
            },
            ..Default::default()
        })
        .map_err(|e| e.to_string())?;
    let root = tree
        .new_with_children(
            Style {
                padding: taffy::Rect {
                    left: length(10.0),
                    right: length(0.0),
                    top: length(4.0),
                    bottom: length(0.0),
                },
                ..Default::default()
            },
            &[node],
        )
        .map_err(|e| e.to_string())?;
    tree.compute_layout(root, Size::MAX_CONTENT).map_err(|e| e.to_string())?;

    let surface = Rc::new(SurfaceElement::with_layout(Rc::new(RefCell::new(tree)), node));

    let tracked = enhance({
        let surface = surface.clone();
        move |props: FirstMoveProps| {
            PositionTracker::new(
                surface.clone(),
                |p: Position| format!("x={:>5.1} y={:>5.1}", p.x, p.y),
                TrackerProps {
                    on_first_move_once: Some(props.on_first_move_once),
                    delay: Some(config.delay),
                },
            )
        }
    });

    let tracker = tracked.mount(Some(Rc::new(|| {
        print!("\r\nfirst move! (q to quit)\r\n");
    })));

    enable_raw_mode()?;
    enable_mouse()?;
    tracker.start();

    let _stop = tracker.watch(|p| {
        print!("\r  pointer at ({:>5.1}, {:>5.1})   ", p.x, p.y);
        let _ = io::stdout().flush();
    });

    let result = run(&surface, &tracker);

    tracker.stop();
    disable_mouse()?;
    disable_raw_mode()?;
    println!("\nlast: {}", tracker.render());
    result
}

fn run<P>(
    surface: &SurfaceElement,
    tracker: &PositionTracker<P>,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        if poll(Duration::from_millis(8))? {
            match read()? {
                Event::Mouse(mouse) => {
                    route_mouse_event(surface, mouse);
                }
                Event::Key(key) if matches!(key.code, KeyCode::Char('q') | KeyCode::Esc) => {
                    return Ok(());
                }
                _ => {}
            }
        }
        tracker.tick();
    }
}
