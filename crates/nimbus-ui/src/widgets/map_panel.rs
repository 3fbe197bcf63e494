use chrono::{DateTime, Utc};
use nimbus_core::{MapConfig, MapLayer};
use nimbus_weather::WeatherSnapshot;

use super::Widget;
use crate::map::{overlay_template, overlay_timestamp, LatLon, TileCoord};
use crate::state::DisplayPreferences;

/// Map card: active layer, centre and the tiles covering it.
#[derive(Debug, Clone, PartialEq)]
pub struct MapPanelView {
    pub title: &'static str,
    pub subtitle: String,
    pub layer: &'static str,
    pub center: LatLon,
    pub tile: TileCoord,
    pub base_tile_url: String,
    pub overlay_tile_url: String,
    pub status: &'static str,
    pub refresh_note: &'static str,
}

impl MapPanelView {
    pub fn build(
        snapshot: &WeatherSnapshot,
        prefs: DisplayPreferences,
        config: &MapConfig,
        zoom: u8,
        now: DateTime<Utc>,
    ) -> Self {
        let strings = prefs.language.strings();
        let center = LatLon::new(snapshot.latitude, snapshot.longitude);
        let tile = TileCoord::from_lat_lon(center, zoom.min(config.max_zoom));

        Self {
            title: strings.map_title,
            subtitle: format!("{} {}", strings.map_subtitle, snapshot.city),
            layer: match prefs.map_layer {
                MapLayer::Clouds => strings.clouds_layer,
                MapLayer::Precipitation => strings.precip_layer,
            },
            center,
            tile,
            base_tile_url: tile.fill(&config.base_tile_url),
            overlay_tile_url: tile.fill(&overlay_template(
                &config.overlay_base_url,
                prefs.map_layer,
                overlay_timestamp(now),
            )),
            status: strings.map_online,
            refresh_note: strings.auto_update,
        }
    }
}

impl Widget for MapPanelView {
    fn render(&self) -> Vec<String> {
        vec![
            format!("{}  [{}]", self.title, self.layer),
            self.subtitle.clone(),
            format!(
                "📍 {:.4}, {:.4}  (z{} {}/{})",
                self.center.lat, self.center.lon, self.tile.z, self.tile.x, self.tile.y
            ),
            format!("   {}", self.base_tile_url),
            format!("   {}", self.overlay_tile_url),
            format!("● {} · {}", self.status, self.refresh_note),
        ]
    }
}
