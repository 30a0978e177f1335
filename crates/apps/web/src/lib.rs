use gloo_net::http::Request;
use serde::Serialize;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::sync::OnceLock;
use tracing::{info, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

use formats::config::MapConfig;
use formats::view_state;
use foundation::view::ViewState;
use runtime::event_bus::MapEvent;
use scene::world::MapWorld;

mod events;
mod leaflet;
use leaflet::LeafletSurface;

static LOGGING_SET: OnceLock<()> = OnceLock::new();

type Dispatch = Closure<dyn FnMut(String, f64, f64, f64, bool)>;

#[derive(Default)]
struct AppState {
    world: Option<MapWorld<LeafletSurface>>,
    // Kept alive for as long as the shim may call it.
    dispatch: Option<Dispatch>,
}

thread_local! {
    static STATE: RefCell<AppState> = RefCell::new(AppState::default());
    // Surface events raised while a handler holds STATE; drained in order.
    static PENDING: RefCell<VecDeque<MapEvent>> = const { RefCell::new(VecDeque::new()) };
}

/// Runs `f` on the live world, then handles events the surface raised
/// meanwhile. `None` before `init_map` or during teardown.
fn with_world<R>(f: impl FnOnce(&mut MapWorld<LeafletSurface>) -> R) -> Option<R> {
    let out = STATE
        .try_with(|state| {
            let mut state = state.try_borrow_mut().ok()?;
            state.world.as_mut().map(f)
        })
        .ok()
        .flatten();
    drain_pending();
    out
}

fn drain_pending() {
    let _ = STATE.try_with(|state| {
        // Busy: the outer call drains when it returns.
        let Ok(mut state) = state.try_borrow_mut() else {
            return;
        };
        let Some(world) = state.world.as_mut() else {
            PENDING.with(|q| q.borrow_mut().clear());
            return;
        };
        while let Some(event) = PENDING.with(|q| q.borrow_mut().pop_front()) {
            world.handle_event(event);
        }
    });
}

fn enqueue_event(event: MapEvent) {
    PENDING.with(|q| q.borrow_mut().push_back(event));
    drain_pending();
}

fn init_logging() {
    LOGGING_SET.get_or_init(|| {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Debug);
    });
}

fn not_ready() -> JsValue {
    JsValue::from_str("map not initialised; call init_map first")
}

fn to_json<T: Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Whole number from a JS numeric input.
fn integral(v: f64) -> Option<i64> {
    (v.is_finite() && v.fract() == 0.0).then_some(v as i64)
}

fn page_query() -> String {
    web_sys::window()
        .and_then(|w| w.location().search().ok())
        .unwrap_or_default()
}

fn write_address_bar(view: &ViewState) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let url = format!("?{}", view_state::encode(view));
    let result = window
        .history()
        .and_then(|h| h.replace_state_with_url(&JsValue::NULL, "", Some(&url)));
    if let Err(err) = result {
        warn!(?err, "address bar not updated");
    }
}

fn init_with_config(container_id: &str, config: MapConfig) -> Result<(), JsValue> {
    config
        .validate()
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    with_world(|w| w.teardown());

    let surface = LeafletSurface::create(container_id, config.clone());
    let dispatch = Dispatch::new(|kind: String, lat: f64, lng: f64, target: f64, shift: bool| {
        if let Some(event) = events::event_from_parts(&kind, lat, lng, target, shift) {
            enqueue_event(event);
        }
    });
    leaflet::set_dispatch(dispatch.as_ref().unchecked_ref());

    let mut world = MapWorld::new(surface, config);
    world.observe_view(write_address_bar);
    STATE
        .try_with(|state| {
            let mut state = state
                .try_borrow_mut()
                .map_err(|_| JsValue::from_str("map state busy"))?;
            state.world = Some(world);
            state.dispatch = Some(dispatch);
            Ok::<(), JsValue>(())
        })
        .map_err(|_| JsValue::from_str("map state unavailable"))??;

    let query = page_query();
    with_world(|w| w.load(&query)).ok_or_else(not_ready)?;
    info!(container_id, "map initialised");
    Ok(())
}

async fn fetch_config(url: &str) -> Result<MapConfig, JsValue> {
    let resp = Request::get(url)
        .send()
        .await
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    if !resp.ok() {
        return Err(JsValue::from_str(&format!(
            "config fetch failed: HTTP {}",
            resp.status()
        )));
    }
    let text = resp
        .text()
        .await
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    MapConfig::from_json_str(&text).map_err(|e| JsValue::from_str(&e.to_string()))
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    init_logging();
    Ok(())
}

/// Builds the map in element `container_id`, from an inline JSON config or the
/// defaults, and restores the view from the page's query string.
#[wasm_bindgen]
pub fn init_map(container_id: &str, config_json: Option<String>) -> Result<(), JsValue> {
    init_logging();
    let config = match config_json {
        Some(json) => MapConfig::from_json_str(&json).map_err(|e| JsValue::from_str(&e.to_string()))?,
        None => MapConfig::default(),
    };
    init_with_config(container_id, config)
}

/// Like [`init_map`], with the config fetched from `config_url`. A missing or
/// broken config falls back to the defaults.
#[wasm_bindgen]
pub fn init_map_from_url(container_id: String, config_url: String) {
    init_logging();
    spawn_local(async move {
        let config = match fetch_config(&config_url).await {
            Ok(config) => config,
            Err(err) => {
                warn!(?err, url = %config_url, "using default map config");
                MapConfig::default()
            }
        };
        if let Err(err) = init_with_config(&container_id, config) {
            warn!(?err, "map init failed");
        }
    });
}

#[wasm_bindgen]
pub fn teardown_map() {
    with_world(|w| w.teardown());
    let _ = STATE.try_with(|state| {
        if let Ok(mut state) = state.try_borrow_mut() {
            state.world = None;
        }
    });
}

#[wasm_bindgen]
pub fn set_plane(plane: i32) -> Result<(), JsValue> {
    with_world(|w| {
        w.set_plane(i64::from(plane));
    })
    .ok_or_else(not_ready)
}

/// Current view as JSON (`{"center":{"x":..,"y":..,"plane":..},"zoom":..,"plane":..}`).
#[wasm_bindgen]
pub fn current_view() -> Result<String, JsValue> {
    let view = with_world(|w| w.view()).ok_or_else(not_ready)?;
    to_json(&view)
}

#[wasm_bindgen]
pub fn go_to_position(x: f64, y: f64, plane: f64) -> Result<(), JsValue> {
    if !(x.is_finite() && y.is_finite() && plane.is_finite()) {
        return Err(JsValue::from_str("position must be finite"));
    }
    // `as` saturates, and the world clamps into range.
    with_world(|w| {
        w.go_to_position(x as i64, y as i64, plane as i64);
    })
    .ok_or_else(not_ready)
}

/// Returns `false` if `id` is not a valid region id.
#[wasm_bindgen]
pub fn go_to_region(id: f64) -> Result<bool, JsValue> {
    let Some(id) = integral(id) else {
        warn!(id, "region id must be a whole number");
        return Ok(false);
    };
    with_world(|w| w.go_to_region(id)).ok_or_else(not_ready)
}

/// Cell under the cursor as JSON, or `None` before the mouse has moved.
#[wasm_bindgen]
pub fn cursor_readout() -> Result<Option<String>, JsValue> {
    with_world(|w| w.cursor_readout())
        .ok_or_else(not_ready)?
        .map(|r| to_json(&r))
        .transpose()
}

/// Cell under container pixel `(x, y)` as JSON.
#[wasm_bindgen]
pub fn cell_at_screen(x: f64, y: f64) -> Result<Option<String>, JsValue> {
    with_world(|w| w.cell_at_screen(x, y))
        .ok_or_else(not_ready)?
        .map(|r| to_json(&r))
        .transpose()
}

/// Shows the selection rectangle and returns the panel contents as JSON.
#[wasm_bindgen]
pub fn show_selection() -> Result<String, JsValue> {
    let display = with_world(|w| {
        w.show_selection();
        w.panel_display()
    })
    .ok_or_else(not_ready)?;
    to_json(&display)
}

#[wasm_bindgen]
pub fn hide_selection() -> Result<(), JsValue> {
    with_world(|w| w.hide_selection()).ok_or_else(not_ready)
}

/// Applies an edit typed into panel field `field` and returns the panel
/// contents as JSON. Rejected edits return the unchanged panel so the input
/// can be reset.
#[wasm_bindgen]
pub fn selection_field_changed(field: &str, value: &str) -> Result<String, JsValue> {
    let display = with_world(|w| {
        w.edit_selection_field(field, value);
        w.panel_display()
    })
    .ok_or_else(not_ready)?;
    to_json(&display)
}

#[wasm_bindgen]
pub fn selection_panel() -> Result<String, JsValue> {
    let display = with_world(|w| w.panel_display()).ok_or_else(not_ready)?;
    to_json(&display)
}
