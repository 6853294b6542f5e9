//! SVG rendering of the chart scene.

use crate::state::AppState;
use chrono::Utc;
use dioxus::prelude::*;
use ecount_chart::scene::Shape;

fn render_shape(idx: usize, shape: &Shape) -> Element {
    match shape {
        Shape::Rect(area) => rsx! {
            rect {
                key: "{idx}",
                x: "{area.x}",
                y: "{area.y}",
                width: "{area.width}",
                height: "{area.height}",
                fill: "{area.fill}",
            }
        },
        Shape::Line(seg) => rsx! {
            line {
                key: "{idx}",
                x1: "{seg.x1}",
                y1: "{seg.y1}",
                x2: "{seg.x2}",
                y2: "{seg.y2}",
                stroke: "{seg.stroke}",
                "stroke-width": "{seg.stroke_width}",
            }
        },
        Shape::Path(curve) => rsx! {
            path {
                key: "{idx}",
                d: "{curve.d}",
                fill: curve.fill.clone().unwrap_or_else(|| "none".to_string()),
                stroke: curve.stroke.clone(),
                "stroke-width": "{curve.stroke_width}",
                "stroke-dasharray": curve.dash.clone(),
                opacity: "{curve.opacity}",
            }
        },
        Shape::Text(label) => rsx! {
            text {
                key: "{idx}",
                x: "{label.x}",
                y: "{label.y}",
                "text-anchor": label.anchor.as_str(),
                "font-size": "{label.font_size}",
                "font-weight": if label.bold { "bold" } else { "normal" },
                transform: label.rotation.map(|deg| format!("rotate({})", deg)),
                "{label.content}"
            }
        },
    }
}

/// The chart itself. Clicking the plot opens the tooltip for the nearest
/// sample date.
#[component]
pub fn GraphSvg() -> Element {
    let mut state = use_context::<AppState>();
    let layout = (state.layout)();
    let scene = state.chart.read().scene(&layout, Utc::now().naive_utc());

    let on_click = move |evt: Event<MouseData>| {
        let point = evt.data().element_coordinates();
        let layout = *state.layout.peek();
        state.chart.write().locate(point.x, point.y, &layout);
    };

    rsx! {
        svg {
            width: "{scene.width}",
            height: "{scene.height}",
            view_box: "0 0 {scene.width} {scene.height}",
            style: "cursor: crosshair;",
            onclick: on_click,
            for (idx, shape) in scene.shapes.iter().enumerate() {
                {render_shape(idx, shape)}
            }
        }
    }
}
