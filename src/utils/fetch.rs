//! Network fetching over the Fetch API.

use futures::FutureExt;
use futures::future::LocalBoxFuture;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

use vidshelf_core::{Accept, FetchError, Fetcher};

/// [`Fetcher`] backed by `window.fetch`.
///
/// Requests are same-origin GETs with an `Accept` header matching the
/// expected content. No timeout: a hung listing keeps its folder empty.
#[derive(Clone, Copy, Debug, Default)]
pub struct WebFetcher;

impl Fetcher for WebFetcher {
    fn fetch_text(
        &self,
        url: &str,
        accept: Accept,
    ) -> LocalBoxFuture<'static, Result<String, FetchError>> {
        let url = url.to_string();
        async move { fetch_url(&url, accept).await }.boxed_local()
    }
}

/// Fetch text from a URL using the Fetch API.
async fn fetch_url(url: &str, accept: Accept) -> Result<String, FetchError> {
    let window = web_sys::window().ok_or(FetchError::NoWindow)?;

    let opts = RequestInit::new();
    opts.set_method("GET");
    opts.set_mode(RequestMode::SameOrigin);

    let request = Request::new_with_str_and_init(url, &opts)
        .map_err(|_| FetchError::RequestCreationFailed)?;
    request
        .headers()
        .set("Accept", accept.mime())
        .map_err(|_| FetchError::RequestCreationFailed)?;

    let result = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|e| {
            FetchError::NetworkError(e.as_string().unwrap_or_else(|| "Unknown error".to_string()))
        })?;
    let resp: Response = result.dyn_into().map_err(|_| FetchError::InvalidContent)?;

    if !resp.ok() {
        return Err(FetchError::HttpError(resp.status()));
    }

    let text = JsFuture::from(resp.text().map_err(|_| FetchError::ResponseReadFailed)?)
        .await
        .map_err(|_| FetchError::ResponseReadFailed)?;

    text.as_string().ok_or(FetchError::InvalidContent)
}
