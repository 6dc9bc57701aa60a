// Map images compiled into the binary

use crate::config;
use rust_embed::RustEmbed;
use std::borrow::Cow;

#[derive(RustEmbed)]
#[folder = "assets/"]
pub struct Asset;

pub fn get_asset_bytes(name: &str) -> Option<Cow<'static, [u8]>> {
    Asset::get(name).map(|f| f.data)
}

/// Encoded bytes of the arena used when no `--map` is given
pub fn default_map_bytes() -> Option<Cow<'static, [u8]>> {
    get_asset_bytes(config::DEFAULT_MAP_ASSET)
}

/// Names of every embedded map
pub fn map_names() -> Vec<String> {
    Asset::iter()
        .filter(|name| name.starts_with("maps/"))
        .map(|name| name.into_owned())
        .collect()
}
