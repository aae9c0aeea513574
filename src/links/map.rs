//! Map link resolution.
//!
//! Admins paste whatever map link they have into a project. To show an
//! embedded map the link is reduced to something the embed endpoint
//! accepts, trying in order:
//!
//! 1. an embed link on an allowlisted map host, used as is
//! 2. `@lat,lng` in the path
//! 3. `/maps/place/<name>`
//! 4. a `q=` parameter, passed through verbatim
//! 5. an `ll=lat,lng` parameter
//! 6. the link is itself `lat,lng`
//! 7. a text search for the project location
//!
//! Unparseable input never fails; it ends at the location search.

use std::sync::LazyLock;

use regex::Regex;

use super::{decode_component, encode_component};

/// Location searched when a project has neither a usable link nor a location.
pub const DEFAULT_LOCATION: &str = "الرياض";

const EMBED_HOSTS: [&str; 3] = [
    "https://www.google.com/maps",
    "https://maps.google.com",
    "https://google.com/maps",
];

const REGEX_MSG: &str = "map link regex should be valid";

static AT_COORDS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@(-?[0-9]+\.[0-9]+),(-?[0-9]+\.[0-9]+)").expect(REGEX_MSG));
static PLACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/maps/place/([^/]+)").expect(REGEX_MSG));
static Q_PARAM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[?&]q=([^&]+)").expect(REGEX_MSG));
static LL_PARAM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[?&]ll=(-?[0-9]+\.[0-9]+),(-?[0-9]+\.[0-9]+)").expect(REGEX_MSG)
});
static RAW_COORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(-?[0-9]+\.[0-9]+),\s*(-?[0-9]+\.[0-9]+)$").expect(REGEX_MSG)
});

/// What an embedded map should show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapTarget {
    /// An allowlisted embed link, used unchanged
    Embed(String),
    Coordinates { lat: String, lng: String },
    /// A decoded place name
    Place(String),
    /// A `q=` value exactly as it appeared in the link
    Query(String),
    /// Free-text search
    Search(String),
}

impl MapTarget {
    pub fn embed_url(&self) -> String {
        let q = match self {
            MapTarget::Embed(url) => return url.clone(),
            MapTarget::Coordinates { lat, lng } => format!("{lat},{lng}"),
            MapTarget::Place(name) => encode_component(name),
            MapTarget::Query(raw) => raw.clone(),
            MapTarget::Search(text) => encode_component(text),
        };
        format!("https://maps.google.com/maps?q={q}&hl=ar&z=15&output=embed")
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

/// Prefix `https://` unless the link already starts with `http`.
pub fn normalize_link(link: &str) -> String {
    if link.starts_with("http") {
        link.to_string()
    } else {
        format!("https://{link}")
    }
}

fn coordinates(caps: &regex::Captures<'_>) -> MapTarget {
    MapTarget::Coordinates {
        lat: caps[1].to_string(),
        lng: caps[2].to_string(),
    }
}

fn resolve_link(link: &str) -> Option<MapTarget> {
    let safe = normalize_link(link);

    if safe.contains("/maps/embed") && EMBED_HOSTS.iter().any(|host| safe.starts_with(host)) {
        return Some(MapTarget::Embed(safe));
    }

    if let Some(caps) = AT_COORDS.captures(&safe) {
        return Some(coordinates(&caps));
    }

    if let Some(caps) = PLACE.captures(&safe) {
        match decode_component(&caps[1].replace('+', " ")) {
            Some(name) => return Some(MapTarget::Place(name)),
            None => tracing::debug!("ignoring undecodable place name in map link"),
        }
    }

    if let Some(caps) = Q_PARAM.captures(&safe) {
        return Some(MapTarget::Query(caps[1].to_string()));
    }

    if let Some(caps) = LL_PARAM.captures(&safe) {
        return Some(coordinates(&caps));
    }

    // Checked against the link as typed; the https:// prefix would
    // otherwise keep bare coordinates from ever matching.
    RAW_COORDS.captures(link).map(|caps| coordinates(&caps))
}

/// Resolve a project's map link and location into a map target.
pub fn resolve_map_target(
    link: Option<&str>,
    location: Option<&str>,
    default_location: &str,
) -> MapTarget {
    if let Some(target) = non_empty(link).and_then(resolve_link) {
        return target;
    }
    let query = non_empty(location).unwrap_or(default_location);
    MapTarget::Search(query.to_string())
}

/// Embed URL for a project's map, with the default fallback location.
pub fn map_embed_url(link: Option<&str>, location: Option<&str>) -> String {
    resolve_map_target(link, location, DEFAULT_LOCATION).embed_url()
}

fn search_link(query: &str) -> String {
    format!(
        "https://www.google.com/maps/search/?api=1&query={}",
        encode_component(query)
    )
}

/// "Open in maps" link for a project page: the project link, else a search
/// for its location (or `default_location`).
pub fn project_map_link(link: Option<&str>, location: Option<&str>, default_location: &str) -> String {
    match non_empty(link) {
        Some(link) => normalize_link(link),
        None => search_link(non_empty(location).unwrap_or(default_location)),
    }
}

/// "Open in maps" link for a unit card: the project link, else a search for
/// the project location, else nothing.
pub fn unit_map_link(link: Option<&str>, location: Option<&str>) -> Option<String> {
    non_empty(link)
        .map(normalize_link)
        .or_else(|| non_empty(location).map(search_link))
}
