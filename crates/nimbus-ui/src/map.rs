//! Map overlay resource.
//!
//! [`MapOverlay`] owns a map instance for its whole life:
//! `Uninitialized -> Active -> Disposed`. The actual drawing surface sits
//! behind [`MapBackend`]; [`HeadlessMap`] records what a tile map would show.

use chrono::{DateTime, Utc};
use nimbus_core::{MapConfig, MapLayer};
use thiserror::Error;

/// Overlay timestamps are bucketed to this many seconds.
pub const OVERLAY_BUCKET_SECS: i64 = 600;
pub const OVERLAY_OPACITY: f32 = 0.7;
pub const OVERLAY_Z_INDEX: i32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Slippy-map tile address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileCoord {
    pub z: u8,
    pub x: u32,
    pub y: u32,
}

impl TileCoord {
    /// Tile containing `center` at `zoom` (Web Mercator).
    pub fn from_lat_lon(center: LatLon, zoom: u8) -> Self {
        let n = 2f64.powi(i32::from(zoom));
        let max = (n as u32).saturating_sub(1);

        // Mercator is undefined at the poles.
        let lat = center.lat.clamp(-85.0511, 85.0511).to_radians();
        let x = ((center.lon + 180.0) / 360.0 * n).floor();
        let y = ((1.0 - lat.tan().asinh() / std::f64::consts::PI) / 2.0 * n).floor();

        Self {
            z: zoom,
            x: (x.max(0.0) as u32).min(max),
            y: (y.max(0.0) as u32).min(max),
        }
    }

    /// Substitute this tile into an XYZ template. `{s}` becomes subdomain "a".
    pub fn fill(&self, template: &str) -> String {
        template
            .replace("{s}", "a")
            .replace("{z}", &self.z.to_string())
            .replace("{x}", &self.x.to_string())
            .replace("{y}", &self.y.to_string())
    }
}

/// `floor(unix_seconds / 600) * 600`
pub fn overlay_timestamp(now: DateTime<Utc>) -> i64 {
    now.timestamp().div_euclid(OVERLAY_BUCKET_SECS) * OVERLAY_BUCKET_SECS
}

/// XYZ template for the weather overlay at `timestamp`.
pub fn overlay_template(base_url: &str, layer: MapLayer, timestamp: i64) -> String {
    let base = base_url.trim_end_matches('/');
    match layer {
        MapLayer::Precipitation => {
            format!("{}/v2/radar/{}/256/{{z}}/{{x}}/{{y}}/2/1_1.png", base, timestamp)
        }
        MapLayer::Clouds => {
            format!("{}/v2/satellite/{}/256/{{z}}/{{x}}/{{y}}/0/1_1.png", base, timestamp)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TileLayer {
    pub template: String,
    pub opacity: f32,
    pub z_index: i32,
    pub max_zoom: u8,
}

impl TileLayer {
    pub fn base(config: &MapConfig) -> Self {
        Self {
            template: config.base_tile_url.clone(),
            opacity: 1.0,
            z_index: 0,
            max_zoom: config.max_zoom,
        }
    }

    pub fn overlay(config: &MapConfig, layer: MapLayer, now: DateTime<Utc>) -> Self {
        Self {
            template: overlay_template(&config.overlay_base_url, layer, overlay_timestamp(now)),
            opacity: OVERLAY_OPACITY,
            z_index: OVERLAY_Z_INDEX,
            max_zoom: config.max_zoom,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayerId(pub u64);

/// Capabilities of an interactive tile-map library.
pub trait MapBackend {
    fn create(&mut self, center: LatLon, zoom: u8, base: TileLayer);
    fn fly_to(&mut self, center: LatLon, zoom: u8);
    fn add_marker(&mut self, at: LatLon);
    fn move_marker(&mut self, at: LatLon);
    fn add_layer(&mut self, layer: TileLayer) -> LayerId;
    fn remove_layer(&mut self, id: LayerId);
    fn destroy(&mut self);
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MapError {
    #[error("Map is already active")]
    AlreadyActive,

    #[error("Map has not been created")]
    NotActive,

    #[error("Map has been disposed")]
    Disposed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapLifecycle {
    Uninitialized,
    Active,
    Disposed,
}

#[derive(Debug)]
struct ActiveMap {
    center: LatLon,
    zoom: u8,
    layer: Option<MapLayer>,
    overlay: Option<LayerId>,
}

#[derive(Debug)]
enum Lifecycle {
    Uninitialized,
    Active(ActiveMap),
    Disposed,
}

pub struct MapOverlay<B: MapBackend> {
    backend: B,
    config: MapConfig,
    lifecycle: Lifecycle,
}

impl<B: MapBackend> MapOverlay<B> {
    pub fn new(backend: B, config: MapConfig) -> Self {
        Self {
            backend,
            config,
            lifecycle: Lifecycle::Uninitialized,
        }
    }

    pub fn lifecycle(&self) -> MapLifecycle {
        match self.lifecycle {
            Lifecycle::Uninitialized => MapLifecycle::Uninitialized,
            Lifecycle::Active(_) => MapLifecycle::Active,
            Lifecycle::Disposed => MapLifecycle::Disposed,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    /// Current view while active.
    pub fn view(&self) -> Option<(LatLon, u8)> {
        match &self.lifecycle {
            Lifecycle::Active(active) => Some((active.center, active.zoom)),
            Lifecycle::Uninitialized | Lifecycle::Disposed => None,
        }
    }

    /// Create the map centred on `center` with the base layer and a marker.
    pub fn create(&mut self, center: LatLon) -> Result<(), MapError> {
        match self.lifecycle {
            Lifecycle::Uninitialized => {}
            Lifecycle::Active(_) => return Err(MapError::AlreadyActive),
            Lifecycle::Disposed => return Err(MapError::Disposed),
        }

        self.backend
            .create(center, self.config.initial_zoom, TileLayer::base(&self.config));
        self.backend.add_marker(center);
        self.lifecycle = Lifecycle::Active(ActiveMap {
            center,
            zoom: self.config.initial_zoom,
            layer: None,
            overlay: None,
        });
        tracing::debug!("Map created at {:.4}, {:.4}", center.lat, center.lon);
        Ok(())
    }

    /// Fly to `center` and reposition the marker.
    pub fn move_to(&mut self, center: LatLon) -> Result<(), MapError> {
        let zoom = self.config.follow_zoom;
        let active = self.active_mut()?;
        active.center = center;
        active.zoom = zoom;
        self.backend.fly_to(center, zoom);
        self.backend.move_marker(center);
        Ok(())
    }

    /// Replace the weather overlay.
    pub fn set_overlay(&mut self, layer: MapLayer, now: DateTime<Utc>) -> Result<(), MapError> {
        let tile_layer = TileLayer::overlay(&self.config, layer, now);
        let previous = {
            let active = self.active_mut()?;
            active.layer = Some(layer);
            active.overlay.take()
        };

        if let Some(id) = previous {
            self.backend.remove_layer(id);
        }
        let id = self.backend.add_layer(tile_layer);
        if let Lifecycle::Active(active) = &mut self.lifecycle {
            active.overlay = Some(id);
        }
        Ok(())
    }

    /// Create on first use, otherwise follow centre and layer changes.
    pub fn sync(
        &mut self,
        center: LatLon,
        layer: MapLayer,
        now: DateTime<Utc>,
    ) -> Result<(), MapError> {
        if self.lifecycle() == MapLifecycle::Uninitialized {
            self.create(center)?;
            return self.set_overlay(layer, now);
        }

        let (moved, relayer) = match &self.lifecycle {
            Lifecycle::Active(active) => (active.center != center, active.layer != Some(layer)),
            Lifecycle::Uninitialized | Lifecycle::Disposed => return Err(MapError::Disposed),
        };

        if moved {
            self.move_to(center)?;
        }
        if moved || relayer {
            self.set_overlay(layer, now)?;
        }
        Ok(())
    }

    /// Release the map. Safe to call more than once.
    pub fn dispose(&mut self) {
        if let Lifecycle::Active(_) = self.lifecycle {
            self.backend.destroy();
            tracing::debug!("Map disposed");
        }
        self.lifecycle = Lifecycle::Disposed;
    }

    fn active_mut(&mut self) -> Result<&mut ActiveMap, MapError> {
        match &mut self.lifecycle {
            Lifecycle::Active(active) => Ok(active),
            Lifecycle::Uninitialized => Err(MapError::NotActive),
            Lifecycle::Disposed => Err(MapError::Disposed),
        }
    }
}

impl<B: MapBackend> Drop for MapOverlay<B> {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// In-memory map that records its view and layer stack.
#[derive(Debug, Default)]
pub struct HeadlessMap {
    center: Option<LatLon>,
    zoom: u8,
    marker: Option<LatLon>,
    layers: Vec<(LayerId, TileLayer)>,
    next_layer: u64,
    markers_created: usize,
    destroyed: bool,
}

impl HeadlessMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn center(&self) -> Option<LatLon> {
        self.center
    }

    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    pub fn marker(&self) -> Option<LatLon> {
        self.marker
    }

    /// Layers bottom to top.
    pub fn layers(&self) -> impl Iterator<Item = &TileLayer> {
        self.layers.iter().map(|(_, layer)| layer)
    }

    pub fn overlays(&self) -> impl Iterator<Item = &TileLayer> {
        self.layers().filter(|l| l.z_index > 0)
    }

    pub fn markers_created(&self) -> usize {
        self.markers_created
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }
}

impl MapBackend for HeadlessMap {
    fn create(&mut self, center: LatLon, zoom: u8, base: TileLayer) {
        self.center = Some(center);
        self.zoom = zoom;
        self.destroyed = false;
        self.add_layer(base);
    }

    fn fly_to(&mut self, center: LatLon, zoom: u8) {
        self.center = Some(center);
        self.zoom = zoom;
    }

    fn add_marker(&mut self, at: LatLon) {
        self.marker = Some(at);
        self.markers_created += 1;
    }

    fn move_marker(&mut self, at: LatLon) {
        self.marker = Some(at);
    }

    fn add_layer(&mut self, layer: TileLayer) -> LayerId {
        self.next_layer += 1;
        let id = LayerId(self.next_layer);
        self.layers.push((id, layer));
        self.layers.sort_by_key(|(_, l)| l.z_index);
        id
    }

    fn remove_layer(&mut self, id: LayerId) {
        self.layers.retain(|(existing, _)| *existing != id);
    }

    fn destroy(&mut self) {
        self.layers.clear();
        self.marker = None;
        self.center = None;
        self.destroyed = true;
    }
}
