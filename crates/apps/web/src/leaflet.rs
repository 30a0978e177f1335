use tracing::warn;
use wasm_bindgen::prelude::*;

use formats::config::MapConfig;
use foundation::ids::{ListenerId, OverlayId};
use foundation::math::ProjectedPoint;
use runtime::event_bus::{EventKind, Listeners};
use scene::surface::{MapSurface, OverlayShape};

// Thin Leaflet wrapper. Leaflet itself is loaded by the page as the global `L`.
// Every map callback is forwarded to the registered dispatch function as
// (kind, lat, lng, target, shift) with target < 0 meaning "no overlay".
#[wasm_bindgen(inline_js = "
let map = null;
let tiles = null;
let tileOptions = null;
let dispatch = null;
const overlays = new Map();
const handlers = new Map();

const LEAFLET_EVENT = {
    move: 'move',
    zoom: 'zoomend',
    mousemove: 'mousemove',
    pointerdown: 'mousedown',
    pointermove: 'mousemove',
    pointerup: 'mouseup',
};

const RECT_STYLE = {
    selection: { color: '#33b5e5', weight: 1, fillOpacity: 0.2, interactive: false },
    hover_cell: { color: '#ffffff', weight: 1, fillOpacity: 0.1, interactive: false },
};

// Simple CRS is infinite, so Leaflet ignores `tms` and counts tile rows
// downwards from -1. Images are addressed by row counted upwards from 0.
function gridTiles(url, options) {
    const GridTileLayer = L.TileLayer.extend({
        getTileUrl(coords) {
            const flipped = L.point(coords.x, -coords.y - 1);
            flipped.z = coords.z;
            return L.TileLayer.prototype.getTileUrl.call(this, flipped);
        },
    });
    return new GridTileLayer(url, options);
}

function send(kind, latlng, target, shift) {
    if (!dispatch) return;
    const lat = latlng ? latlng.lat : NaN;
    const lng = latlng ? latlng.lng : NaN;
    dispatch(kind, lat, lng, target, shift);
}

export function map_js_create(container, tileUrl, minZoom, maxZoom, maxNativeZoom) {
    if (map) {
        map.remove();
        overlays.clear();
        handlers.clear();
    }
    map = L.map(container, {
        crs: L.CRS.Simple,
        minZoom: minZoom,
        maxZoom: maxZoom,
        boxZoom: false,
        doubleClickZoom: false,
        zoomControl: false,
        renderer: L.canvas(),
    });
    tileOptions = { minZoom: minZoom, maxZoom: maxZoom, maxNativeZoom: maxNativeZoom, noWrap: true };
    tiles = gridTiles(tileUrl, tileOptions).addTo(map);
    map.on('mouseup', () => map.dragging.enable());
    map.getContainer().focus();
}

export function map_js_set_dispatch(cb) {
    dispatch = cb;
}

export function map_js_set_tile_url(url) {
    if (!map) return;
    if (tiles) map.removeLayer(tiles);
    tiles = gridTiles(url, tileOptions).addTo(map);
    map.invalidateSize();
}

export function map_js_zoom() {
    return map ? map.getZoom() : 0;
}

export function map_js_center() {
    if (!map) return new Float64Array([NaN, NaN]);
    const c = map.getCenter();
    return new Float64Array([c.lat, c.lng]);
}

export function map_js_point_from_screen(x, y) {
    if (!map) return new Float64Array([NaN, NaN]);
    const c = map.containerPointToLatLng(L.point(x, y));
    return new Float64Array([c.lat, c.lng]);
}

export function map_js_set_view(lat, lng, zoom) {
    if (map) map.setView([lat, lng], zoom);
}

export function map_js_subscribe(id, kind) {
    if (!map) return;
    const name = LEAFLET_EVENT[kind];
    if (!name) return;
    const fn = (e) => {
        const shift = !!(e.originalEvent && e.originalEvent.shiftKey);
        if (kind === 'pointerdown' && shift) map.dragging.disable();
        send(kind, e.latlng || null, -1, shift);
    };
    map.on(name, fn);
    handlers.set(id, [name, fn]);
}

export function map_js_unsubscribe(id) {
    const h = handlers.get(id);
    if (!h || !map) return;
    map.off(h[0], h[1]);
    handlers.delete(id);
}

export function map_js_add_overlay(id, json) {
    if (!map) return;
    map_js_remove_overlay(id);
    const shape = JSON.parse(json);
    let layer;
    if (shape.kind === 'rectangle') {
        const b = shape.bounds;
        layer = L.rectangle([[b.south, b.west], [b.north, b.east]], RECT_STYLE[shape.style] || {});
    } else if (shape.kind === 'vertex') {
        layer = L.circleMarker([shape.point.lat, shape.point.lng], { radius: 5, color: '#33b5e5', fillOpacity: 1 });
        layer.on('mousedown', (e) => {
            L.DomEvent.stop(e);
            map.dragging.disable();
            const shift = !!(e.originalEvent && e.originalEvent.shiftKey);
            send('pointerdown', e.latlng, id, shift);
        });
    } else {
        return;
    }
    layer.addTo(map);
    overlays.set(id, layer);
}

export function map_js_remove_overlay(id) {
    const layer = overlays.get(id);
    if (layer && map) map.removeLayer(layer);
    overlays.delete(id);
}
")]
extern "C" {
    fn map_js_create(container: &str, tile_url: &str, min_zoom: i32, max_zoom: i32, max_native_zoom: i32);
    fn map_js_set_dispatch(cb: &js_sys::Function);
    fn map_js_set_tile_url(url: &str);
    fn map_js_zoom() -> f64;
    fn map_js_center() -> js_sys::Float64Array;
    fn map_js_point_from_screen(x: f64, y: f64) -> js_sys::Float64Array;
    fn map_js_set_view(lat: f64, lng: f64, zoom: i32);
    fn map_js_subscribe(id: f64, kind: &str);
    fn map_js_unsubscribe(id: f64);
    fn map_js_add_overlay(id: f64, json: &str);
    fn map_js_remove_overlay(id: f64);
}

pub fn set_dispatch(cb: &js_sys::Function) {
    map_js_set_dispatch(cb);
}

fn point_from(arr: js_sys::Float64Array) -> ProjectedPoint {
    let v = arr.to_vec();
    match v.as_slice() {
        [lat, lng] => ProjectedPoint::new(*lat, *lng),
        _ => ProjectedPoint::new(f64::NAN, f64::NAN),
    }
}

/// [`MapSurface`] backed by a Leaflet map in the page.
#[derive(Debug)]
pub struct LeafletSurface {
    config: MapConfig,
    listeners: Listeners,
}

impl LeafletSurface {
    /// Creates the Leaflet map inside the element with id `container`.
    pub fn create(container: &str, config: MapConfig) -> Self {
        map_js_create(
            container,
            &config.tile_url_for_plane(config.default_centre.plane),
            config.min_zoom,
            config.max_zoom,
            config.max_native_zoom,
        );
        Self {
            config,
            listeners: Listeners::new(),
        }
    }
}

impl MapSurface for LeafletSurface {
    fn projected_point_from_screen(&self, x_px: f64, y_px: f64) -> ProjectedPoint {
        point_from(map_js_point_from_screen(x_px, y_px))
    }

    fn current_zoom(&self) -> i32 {
        // Fractional zoom only appears mid-animation; the settled value is whole.
        map_js_zoom().round() as i32
    }

    fn viewport_center(&self) -> ProjectedPoint {
        point_from(map_js_center())
    }

    fn set_viewport(&mut self, center: ProjectedPoint, zoom: i32) {
        map_js_set_view(center.lat, center.lng, zoom);
    }

    fn add_overlay(&mut self, id: OverlayId, shape: &OverlayShape) {
        match serde_json::to_string(shape) {
            Ok(json) => map_js_add_overlay(id.get() as f64, &json),
            Err(err) => warn!(overlay = id.get(), %err, "overlay not drawn"),
        }
    }

    fn remove_overlay(&mut self, id: OverlayId) {
        map_js_remove_overlay(id.get() as f64);
    }

    fn subscribe(&mut self, kind: EventKind) -> ListenerId {
        let id = self.listeners.subscribe(kind);
        map_js_subscribe(id.get() as f64, kind.as_str());
        id
    }

    fn unsubscribe(&mut self, id: ListenerId) {
        if self.listeners.unsubscribe(id) {
            map_js_unsubscribe(id.get() as f64);
        }
    }

    fn set_tile_plane(&mut self, plane: i32) {
        map_js_set_tile_url(&self.config.tile_url_for_plane(plane));
    }
}
