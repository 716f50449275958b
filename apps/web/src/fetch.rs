use charts_core::{FetchError, JsonSource};
use serde_json::Value;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

/// Same-origin `window.fetch` transport.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserSource;

impl JsonSource for BrowserSource {
    async fn fetch_json(&self, url: &str) -> Result<Value, FetchError> {
        let network = |error: JsValue| FetchError::Network {
            url: url.to_string(),
            message: js_error_message(&error),
        };

        let Some(window) = web_sys::window() else {
            return Err(FetchError::Network {
                url: url.to_string(),
                message: "no window".to_string(),
            });
        };

        let opts = RequestInit::new();
        opts.set_method("GET");
        opts.set_mode(RequestMode::SameOrigin);

        let request = Request::new_with_str_and_init(url, &opts).map_err(network)?;
        let response = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(network)?
            .dyn_into::<Response>()
            .map_err(network)?;

        if !response.ok() {
            let status = response.status();
            return Err(if status == 404 {
                FetchError::NotFound {
                    url: url.to_string(),
                }
            } else {
                FetchError::Status {
                    url: url.to_string(),
                    status,
                }
            });
        }

        let decode = |error: JsValue| FetchError::Decode {
            url: url.to_string(),
            message: js_error_message(&error),
        };
        let json = JsFuture::from(response.json().map_err(decode)?)
            .await
            .map_err(decode)?;

        serde_wasm_bindgen::from_value(json).map_err(|error| FetchError::Decode {
            url: url.to_string(),
            message: error.to_string(),
        })
    }
}

fn js_error_message(error: &JsValue) -> String {
    if let Some(message) = error.as_string() {
        return message;
    }
    error
        .dyn_ref::<js_sys::Error>()
        .map_or_else(|| "request failed".to_string(), |error| error.message().into())
}
