//! Lazy embed of the third-party build-guide widget.
//!
//! The provider's script tag is injected on first use. Its global init
//! hook appears asynchronously, so initialization polls for it with a
//! bounded number of retries instead of assuming it is ready.

use std::time::Duration;

use js_sys::{Function, Reflect};
use leptos::prelude::set_timeout;
use log::{debug, warn};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, HtmlScriptElement};

use super::types::Role;

const SCRIPT_SRC: &str =
	"https://cdn.jsdelivr.net/gh/mobalyticshq/mobalytics-widgets/build/mobalytics-widgets.js";
const SCRIPT_ID: &str = "build-guide-widget-script";
const GLOBAL_HOOK: &str = "mobalyticsWidgets";

/// Element the widget renders into.
pub const CONTAINER_ID: &str = "champion-widget-container";

const INIT_RETRIES: u32 = 3;
const RETRY_INTERVAL: Duration = Duration::from_millis(100);

/// Render the build guide for a champion and role into the widget
/// container. Injects the provider script on first call.
pub fn render_widget(champion_slug: &str, role: Role) {
	let Some(document) = web_sys::window().and_then(|w| w.document()) else {
		return;
	};
	let Some(container) = document.get_element_by_id(CONTAINER_ID) else {
		warn!("widget container #{CONTAINER_ID} not found");
		return;
	};

	container.set_inner_html(&format!(
		r#"<div data-moba-widget="lol-champion-build-compact" data-moba-champion="{slug}" data-moba-champion-role="{role}"></div>"#,
		slug = champion_slug,
		role = role.as_str(),
	));

	ensure_script(&document);
	try_init(0);
}

/// The provider's init function, once its script has executed.
fn init_hook() -> Option<Function> {
	let window = web_sys::window()?;
	let widgets = Reflect::get(window.as_ref(), &JsValue::from_str(GLOBAL_HOOK)).ok()?;
	if widgets.is_undefined() || widgets.is_null() {
		return None;
	}
	Reflect::get(&widgets, &JsValue::from_str("init"))
		.ok()?
		.dyn_into()
		.ok()
}

fn ensure_script(document: &Document) {
	if init_hook().is_some() || document.get_element_by_id(SCRIPT_ID).is_some() {
		return;
	}
	let script: HtmlScriptElement = match document
		.create_element("script")
		.ok()
		.and_then(|el| el.dyn_into().ok())
	{
		Some(script) => script,
		None => {
			warn!("failed to create widget script element");
			return;
		}
	};
	script.set_id(SCRIPT_ID);
	script.set_src(SCRIPT_SRC);
	if let Some(body) = document.body() {
		let _ = body.append_child(&script);
	}
}

fn try_init(attempt: u32) {
	if let Some(init) = init_hook() {
		if let Err(err) = init.call0(&JsValue::UNDEFINED) {
			warn!("widget init call failed: {err:?}");
		} else {
			debug!("build-guide widget initialized, attempt {}", attempt + 1);
		}
	} else if attempt < INIT_RETRIES {
		set_timeout(move || try_init(attempt + 1), RETRY_INTERVAL);
	} else {
		warn!("build-guide widget init hook never appeared");
	}
}
