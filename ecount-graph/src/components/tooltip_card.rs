use crate::state::AppState;
use dioxus::prelude::*;

/// Readings at the clicked date, placed next to the click.
#[component]
pub fn TooltipCard() -> Element {
    let mut state = use_context::<AppState>();
    let tooltip = state.chart.read().tooltip().cloned();

    let Some(tooltip) = tooltip else {
        return rsx! {};
    };
    let (x, y) = tooltip.anchor;

    rsx! {
        div {
            style: "position: absolute; left: {x + 12.0}px; top: {y}px; background: white; border: 1px solid #ccc; border-radius: 4px; padding: 6px 10px; font-size: 12px; box-shadow: 0 1px 4px rgba(0,0,0,0.2);",
            onclick: move |_| state.chart.write().dismiss_tooltip(),
            if !tooltip.date.is_empty() {
                div { style: "font-weight: bold; margin-bottom: 4px;", "{tooltip.date}" }
            }
            for value in tooltip.values.iter() {
                div {
                    key: "{value.name}",
                    "{value.name}: {value.display()}"
                }
            }
            if tooltip.values.is_empty() {
                div { style: "color: #666;", "No readings near this date" }
            }
        }
    }
}
