use crate::state::AppState;
use dioxus::prelude::*;

/// Loading notice or the latest fetch error. Stale data stays drawn below it.
#[component]
pub fn StatusLine() -> Element {
    let state = use_context::<AppState>();
    let loading = (state.loading)();
    let error = (state.error_msg)();

    rsx! {
        if loading {
            div {
                style: "padding: 8px 0; color: #666;",
                "Loading data..."
            }
        }
        if let Some(message) = error {
            div {
                style: "padding: 8px 12px; margin: 8px 0; background: #FFEBEE; color: #C62828; border-radius: 4px;",
                strong { "Refresh failed: " }
                "{message}"
            }
        }
    }
}
