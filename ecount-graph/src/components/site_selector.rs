//! Text field for choosing the sampling site.

use crate::state::AppState;
use dioxus::prelude::*;

/// Site identifier input. Committing a new value restarts the fetch loop.
#[component]
pub fn SiteSelector() -> Element {
    let mut state = use_context::<AppState>();
    let site = (state.site)();

    let on_change = move |evt: Event<FormData>| {
        let value = evt.value().trim().to_string();
        if !value.is_empty() && value != *state.site.peek() {
            state.site.set(value);
        }
    };

    rsx! {
        div {
            style: "margin: 8px 0;",
            label {
                r#for: "site-input",
                style: "font-weight: bold; margin-right: 8px;",
                "Site: "
            }
            input {
                id: "site-input",
                r#type: "text",
                value: "{site}",
                style: "width: 120px;",
                onchange: on_change,
            }
        }
    }
}
