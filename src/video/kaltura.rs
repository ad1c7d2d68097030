//! Kaltura embed protocol.
//!
//! Everything that depends on the video vendor's page and URL layout lives
//! here: the sentinels searched for, the manifest path template and the
//! quality tier constant.

use serde_json::Value;

use crate::error::{Error, Result};

/// Marker of the inline script line carrying the player's JSON package.
pub const PACKAGE_DATA_SENTINEL: &str = "kalturaIframePackageData";

/// Path segment at which the embed URL is cut to build the manifest URL.
pub const EMBED_PATH_MARKER: &str = "embedIframeJs";

/// `flavorParamsId` of the source-quality rendition.
pub const SOURCE_QUALITY_PARAM_ID: i64 = 5;

/// Substring identifying the playlist line of the manifest.
pub const INDEX_MARKER: &str = "index";

/// Filename of the segment playlist.
pub const INDEX_FILENAME: &str = "index.m3u8";

/// `id` attribute of embedded player iframes.
pub const PLAYER_IFRAME_ID: &str = "kaltura_player";

/// JSON path of the rendition list inside the package data.
const FLAVOR_ASSETS_POINTER: &str = "/entryResult/contextData/flavorAssets";

/// One quality rendition of an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoVariant {
    pub entry_id: String,
    pub flavor_id: String,
    pub quality_param_id: i64,
}

/// Pull the JSON package out of an embed page.
///
/// The JSON starts at the first `{` of the sentinel line and runs up to, but
/// excluding, the line's last character (the statement terminator).
pub fn extract_package_data(page: &str) -> Result<Value> {
    let line = page
        .lines()
        .find(|l| l.contains(PACKAGE_DATA_SENTINEL))
        .ok_or_else(|| Error::MalformedUpstream("embed data not found".into()))?
        .trim_end();

    let start = line
        .find('{')
        .ok_or_else(|| Error::MalformedUpstream("embed data not found".into()))?;
    let end = line
        .char_indices()
        .last()
        .map(|(i, _)| i)
        .filter(|&end| end > start)
        .ok_or_else(|| Error::MalformedUpstream("embed data is truncated".into()))?;

    serde_json::from_str(&line[start..end])
        .map_err(|e| Error::MalformedUpstream(format!("embed data is not valid JSON: {}", e)))
}

/// The rendition list of a package.
pub fn flavor_assets(package: &Value) -> Result<&[Value]> {
    package
        .pointer(FLAVOR_ASSETS_POINTER)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .ok_or_else(|| Error::MalformedUpstream("variant list not found".into()))
}

/// Pick the first rendition whose `flavorParamsId` equals `quality_param_id`.
///
/// No other rendition is ever substituted.
pub fn select_variant(assets: &[Value], quality_param_id: i64) -> Result<VideoVariant> {
    let asset = assets
        .iter()
        .find(|a| a.get("flavorParamsId").and_then(Value::as_i64) == Some(quality_param_id))
        .ok_or_else(|| {
            Error::MalformedUpstream(format!(
                "no matching variant for flavorParamsId {}",
                quality_param_id
            ))
        })?;

    match (
        asset.get("entryId").and_then(scalar_string),
        asset.get("id").and_then(scalar_string),
    ) {
        (Some(entry_id), Some(flavor_id)) => Ok(VideoVariant {
            entry_id,
            flavor_id,
            quality_param_id,
        }),
        _ => Err(Error::MalformedUpstream("missing variant keys".into())),
    }
}

fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Build the HTTP-streaming manifest URL of a rendition (manifest layout v1).
///
/// `https://host/p/1/sp/100/embedIframeJs/uiconf_id/...` becomes
/// `https://host/p/1/sp/100/playManifest/entryId/{entry}/flavorIds/{flavor}/format/applehttp/protocol/https/a.m3u8`.
pub fn manifest_url(embed_url: &str, variant: &VideoVariant) -> Result<String> {
    let cut = embed_url.find(EMBED_PATH_MARKER).ok_or_else(|| {
        Error::MalformedUpstream(format!("'{}' not found in embed URL", EMBED_PATH_MARKER))
    })?;
    let base = &embed_url[..cut];
    let separator = if base.ends_with('/') { "" } else { "/" };

    Ok(format!(
        "{}{}playManifest/entryId/{}/flavorIds/{}/format/applehttp/protocol/https/a.m3u8",
        base, separator, variant.entry_id, variant.flavor_id
    ))
}

/// The playlist URL listed in a manifest.
pub fn find_index_url(manifest: &str) -> Result<String> {
    manifest
        .lines()
        .map(str::trim)
        .find(|l| l.contains(INDEX_MARKER))
        .map(str::to_string)
        .ok_or_else(|| Error::MalformedUpstream("index URL not found".into()))
}

/// Ordered segment URIs of a playlist.
///
/// Well-formed playlists are read with `m3u8-rs`; anything it rejects falls
/// back to every non-blank line not starting with `#`.
pub fn segment_uris(playlist: &str) -> Vec<String> {
    if let Ok(m3u8_rs::Playlist::MediaPlaylist(media)) =
        m3u8_rs::parse_playlist_res(playlist.as_bytes())
    {
        if !media.segments.is_empty() {
            return media.segments.into_iter().map(|s| s.uri).collect();
        }
    }

    playlist
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// Base URL segments are relative to: the index URL without its filename.
pub fn streaming_base(index_url: &str) -> String {
    match index_url.rfind(INDEX_FILENAME) {
        Some(pos) => index_url[..pos].to_string(),
        None => match index_url.rfind('/') {
            Some(pos) => index_url[..=pos].to_string(),
            None => index_url.to_string(),
        },
    }
}

/// Resolve a segment URI against the streaming base.
pub fn segment_url(base: &str, uri: &str) -> Result<String> {
    if uri.starts_with("http://") || uri.starts_with("https://") {
        return Ok(uri.to_string());
    }

    let base_url = url::Url::parse(base)?;
    let resolved = base_url.join(uri)?;
    Ok(resolved.to_string())
}
