use std::cell::RefCell;

use popup::{Action, OptionsPatch, PopupController, WebHost};
use wasm_bindgen::{prelude::*, JsCast};

/// Attribute marking elements which get a popup at start-up, its value are
/// the JSON encoded options.
const DATA_POPUP: &str = "data-popup";

thread_local! {
    static POPUPS: RefCell<Option<PopupController<WebHost>>> = const { RefCell::new(None) };
}

pub fn main() {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();

    let host = WebHost::new();
    let elements = select_all(host.document(), &format!("[{DATA_POPUP}]"));

    let mut popups = PopupController::new(host);
    for element in &elements {
        let config = element.get_attribute(DATA_POPUP).unwrap_or_default();
        let options = match config.trim() {
            "" => Ok(OptionsPatch::new()),
            config => OptionsPatch::from_json(config),
        };

        match options {
            Ok(options) => {
                popups.invoke([element], Action::Create(options));
            }
            Err(err) => tracing::warn!("ignoring popup with invalid options {config:?}: {err}"),
        }
    }

    tracing::info!("attached {} popups", popups.len());
    POPUPS.with(|cell| *cell.borrow_mut() = Some(popups));
}

/// Plugin style entry point for JavaScript.
///
/// Runs the named action on every element matching `selector`, `value` is the
/// JSON encoded argument. Returns the JSON encoded getter or setter result.
#[wasm_bindgen(js_name = uiPopup)]
pub fn ui_popup(
    selector: &str,
    action: &str,
    value: Option<String>,
) -> Result<Option<String>, JsError> {
    let value: Option<serde_json::Value> = value
        .map(|value| serde_json::from_str(&value))
        .transpose()?;

    POPUPS.with(|cell| -> Result<Option<String>, JsError> {
        let mut popups = cell
            .try_borrow_mut()
            .map_err(|_| JsError::new("uiPopup must not be called from a popup event handler"))?;
        let Some(popups) = popups.as_mut() else {
            return Ok(None);
        };

        let elements = select_all(popups.host().document(), selector);
        let result = popups
            .invoke_named(&elements, action, value)
            .map_err(|err| {
                tracing::warn!("popup action '{action}' failed: {err}");
                err
            })?;

        Ok(result.map(|value| value.to_json().to_string()))
    })
}

fn select_all(document: &web_sys::Document, selector: &str) -> Vec<web_sys::Element> {
    let Ok(nodes) = document.query_selector_all(selector) else {
        return Vec::new();
    };

    (0..nodes.length())
        .filter_map(|index| nodes.get(index))
        .filter_map(|node| node.dyn_into::<web_sys::Element>().ok())
        .collect()
}
