//! Series legend with one checkbox per selectable entry.

use crate::state::AppState;
use dioxus::prelude::*;
use ecount_chart::scene::PALETTE;
use ecount_chart::visibility::LegendTarget;

/// Collapsible legend. The band group toggles all three of its keys.
#[component]
pub fn LegendDropdown() -> Element {
    let mut state = use_context::<AppState>();
    let open = (state.legend_open)();
    let chart = state.chart.read();
    let entries = chart.legend();
    let colors: Vec<&'static str> = entries
        .iter()
        .map(|entry| match &entry.target {
            LegendTarget::Group => chart.band().line.as_str(),
            LegendTarget::Metric(name) => name.as_str(),
        })
        .map(|key| {
            chart
                .series()
                .position(key)
                .map(|idx| PALETTE[idx % PALETTE.len()])
                .unwrap_or("#999")
        })
        .collect();
    drop(chart);

    rsx! {
        div {
            style: "margin: 8px 0;",
            button {
                onclick: move |_| state.legend_open.set(!open),
                if open { "Hide series" } else { "Select series" }
            }
            if open {
                ul {
                    style: "list-style: none; padding: 4px 0; margin: 0;",
                    for (entry, color) in entries.into_iter().zip(colors) {
                        li {
                            key: "{entry.label}",
                            label {
                                style: "cursor: pointer;",
                                input {
                                    r#type: "checkbox",
                                    checked: entry.selected,
                                    onchange: move |_| state.chart.write().select(&entry.target),
                                }
                                span {
                                    style: "display: inline-block; width: 10px; height: 10px; margin: 0 6px; background: {color};",
                                }
                                "{entry.label}"
                            }
                        }
                    }
                }
            }
        }
    }
}
