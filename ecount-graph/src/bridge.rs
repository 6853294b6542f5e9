//! Browser APIs the chart needs: `fetch`, `localStorage`, and `setTimeout`.

use ecount_core::cache::LastFetchCache;
use ecount_core::EcountError;
use js_sys::Promise;
use log::warn;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Response, UrlSearchParams};

fn js_error(context: &str, value: JsValue) -> EcountError {
    EcountError::FetchFailed(format!("{}: {:?}", context, value))
}

/// GET `url` and return the response body as text.
pub async fn fetch_text(url: &str) -> ecount_core::Result<String> {
    let window = web_sys::window()
        .ok_or_else(|| EcountError::FetchFailed("No window available".to_string()))?;
    let response = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(|e| js_error("Request failed", e))?;
    let response: Response = response
        .dyn_into()
        .map_err(|e| js_error("Unexpected fetch result", e))?;
    if !response.ok() {
        return Err(EcountError::BadStatus {
            url: url.to_string(),
            status: response.status(),
        });
    }
    let text = response.text().map_err(|e| js_error("Body unavailable", e))?;
    let body = JsFuture::from(text)
        .await
        .map_err(|e| js_error("Body read failed", e))?;
    body.as_string()
        .ok_or_else(|| EcountError::FetchFailed("Body is not text".to_string()))
}

/// A `setTimeout` wait. Dropping it before it fires clears the timer, so a
/// refresh loop torn down on a site switch leaves nothing scheduled.
pub struct Sleep {
    handle: Option<i32>,
    fired: JsFuture,
}

impl Future for Sleep {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        match Pin::new(&mut self.fired).poll(cx) {
            Poll::Ready(_) => {
                self.handle = None;
                Poll::Ready(())
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

impl Drop for Sleep {
    fn drop(&mut self) {
        if let (Some(handle), Some(window)) = (self.handle.take(), web_sys::window()) {
            window.clear_timeout_with_handle(handle);
        }
    }
}

/// Resolve after `millis` milliseconds.
pub fn sleep_ms(millis: i32) -> Sleep {
    let mut handle = None;
    let promise = Promise::new(&mut |resolve, _reject| {
        handle = web_sys::window().and_then(|window| {
            window
                .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, millis)
                .ok()
        });
    });
    if handle.is_none() {
        warn!("Could not schedule a {} ms timer", millis);
    }
    Sleep {
        handle,
        fired: JsFuture::from(promise),
    }
}

/// `?site=` from the page URL, decoded, if present and not blank.
pub fn site_from_location() -> Option<String> {
    let search = web_sys::window()?.location().search().ok()?;
    let params = UrlSearchParams::new_with_str(&search).ok()?;
    usable_site(params.get("site"))
}

fn usable_site(raw: Option<String>) -> Option<String> {
    raw.map(|site| site.trim().to_string())
        .filter(|site| !site.is_empty())
}

/// Last fetch dates kept in the browser's `localStorage`. Storage failures
/// are logged and read as empty; the date is informational only.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStorageCache;

impl LocalStorageCache {
    fn storage(&self) -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok().flatten()
    }
}

impl LastFetchCache for LocalStorageCache {
    fn get_raw(&self, key: &str) -> ecount_core::Result<Option<String>> {
        Ok(self
            .storage()
            .and_then(|storage| storage.get_item(key).ok().flatten()))
    }

    fn set_raw(&mut self, key: &str, value: &str) -> ecount_core::Result<()> {
        match self.storage() {
            Some(storage) => {
                if storage.set_item(key, value).is_err() {
                    warn!("localStorage refused {}", key);
                }
            }
            None => warn!("localStorage unavailable, {} not recorded", key),
        }
        Ok(())
    }
}
