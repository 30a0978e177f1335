//! Query-string form of a [`ViewState`].
//!
//! Encoded views look like `centreX=3200&centreY=3200&centreZ=0&zoom=0`.
//! Decoding also accepts `regionID=<id>`, which centres the view on that
//! region when no full centre triple is present.

use tracing::warn;
use url::form_urlencoded;

use foundation::position::Position;
use foundation::region::Region;
use foundation::view::ViewState;

pub const KEY_CENTRE_X: &str = "centreX";
pub const KEY_CENTRE_Y: &str = "centreY";
pub const KEY_CENTRE_Z: &str = "centreZ";
pub const KEY_ZOOM: &str = "zoom";
pub const KEY_REGION_ID: &str = "regionID";

/// Parses `query` (with or without a leading `?`) into key/value pairs.
pub fn parse_query(query: &str) -> Vec<(String, String)> {
    let query = query.strip_prefix('?').unwrap_or(query);
    form_urlencoded::parse(query.as_bytes())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

/// First non-empty value for `key`; later duplicates are ignored.
fn first<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
    params
        .iter()
        .filter(|(k, _)| k == key)
        .map(|(_, v)| v.trim())
        .find(|v| !v.is_empty())
}

fn parse_int(key: &str, raw: &str) -> Option<i64> {
    match raw.parse::<i64>() {
        Ok(v) => Some(v),
        Err(err) => {
            warn!(key, raw, %err, "ignoring unparsable view parameter");
            None
        }
    }
}

pub fn decode(query: &str) -> ViewState {
    decode_with_defaults(query, ViewState::default())
}

/// Decodes a view from a query string, falling back to `defaults` piecewise.
///
/// Centre comes from the full `centreX/centreY/centreZ` triple when all three
/// parse, otherwise from `regionID`, otherwise from `defaults`. Coordinates
/// are clamped into the world; an invalid region id is ignored.
pub fn decode_with_defaults(query: &str, defaults: ViewState) -> ViewState {
    let params = parse_query(query);

    let zoom = first(&params, KEY_ZOOM)
        .and_then(|raw| parse_int(KEY_ZOOM, raw))
        .map(|z| z.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32)
        .unwrap_or(defaults.zoom);

    let centre = decode_centre(&params)
        .or_else(|| decode_region(&params))
        .unwrap_or(defaults.center);

    ViewState::new(centre, zoom)
}

fn decode_centre(params: &[(String, String)]) -> Option<Position> {
    let x = first(params, KEY_CENTRE_X)?;
    let y = first(params, KEY_CENTRE_Y)?;
    let z = first(params, KEY_CENTRE_Z)?;
    let x = parse_int(KEY_CENTRE_X, x)?;
    let y = parse_int(KEY_CENTRE_Y, y)?;
    let z = parse_int(KEY_CENTRE_Z, z)?;
    Some(Position::clamped(x, y, z))
}

fn decode_region(params: &[(String, String)]) -> Option<Position> {
    let raw = first(params, KEY_REGION_ID)?;
    let id = parse_int(KEY_REGION_ID, raw)?;
    let region = i32::try_from(id)
        .ok()
        .and_then(|id| Region::from_id(id).ok());
    match region {
        Some(region) => Some(region.centre_position()),
        None => {
            warn!(region_id = id, "ignoring invalid region id");
            None
        }
    }
}

/// Encodes `view` without a leading `?`.
pub fn encode(view: &ViewState) -> String {
    form_urlencoded::Serializer::new(String::new())
        .append_pair(KEY_CENTRE_X, &view.center.x.to_string())
        .append_pair(KEY_CENTRE_Y, &view.center.y.to_string())
        .append_pair(KEY_CENTRE_Z, &view.plane.to_string())
        .append_pair(KEY_ZOOM, &view.zoom.to_string())
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use foundation::position::{MAX_PLANE, MAX_X, MIN_Y};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn encodes_in_fixed_key_order() {
        assert_eq!(
            encode(&ViewState::default()),
            "centreX=3200&centreY=3200&centreZ=0&zoom=0"
        );
        let v = ViewState::new(Position::new(12, 34, 2), -3);
        assert_eq!(encode(&v), "centreX=12&centreY=34&centreZ=2&zoom=-3");
    }

    #[test]
    fn decodes_full_triple() {
        let v = decode("?centreX=3210&centreY=3190&centreZ=1&zoom=3");
        assert_eq!(v, ViewState::new(Position::new(3210, 3190, 1), 3));
    }

    #[test]
    fn out_of_range_triple_is_clamped() {
        let v = decode("centreX=99999&centreY=-5&centreZ=7&zoom=2");
        assert_eq!(v.center, Position::new(MAX_X, MIN_Y, MAX_PLANE));
        assert_eq!(v.plane, MAX_PLANE);
        assert_eq!(v.zoom, 2);
    }

    #[test]
    fn region_id_centres_on_region() {
        let v = decode("?regionID=12850");
        assert_eq!(v.center, Position::new(3232, 3232, 0));
        assert_eq!(v.zoom, 0);
    }

    #[test]
    fn full_triple_wins_over_region() {
        let v = decode("regionID=12850&centreX=1&centreY=2&centreZ=0");
        assert_eq!(v.center, Position::new(1, 2, 0));
    }

    #[test]
    fn partial_or_bad_triple_falls_back() {
        let defaults = ViewState::new(Position::new(5, 6, 0), 1);
        assert_eq!(decode_with_defaults("centreX=1&centreY=2", defaults), defaults);
        assert_eq!(
            decode_with_defaults("centreX=1&centreY=2&centreZ=", defaults),
            defaults
        );
        assert_eq!(
            decode_with_defaults("centreX=a&centreY=2&centreZ=0&regionID=12850", defaults).center,
            Position::new(3232, 3232, 0)
        );
    }

    #[test]
    fn invalid_region_keeps_default_centre() {
        let defaults = ViewState::default();
        for q in ["regionID=-1", "regionID=200", "regionID=99999999999", "regionID=x"] {
            assert_eq!(decode_with_defaults(q, defaults), defaults, "{q}");
        }
        let v = decode_with_defaults("regionID=-1&zoom=4", defaults);
        assert_eq!((v.center, v.zoom), (defaults.center, 4));
    }

    #[test]
    fn first_occurrence_wins() {
        let v = decode("zoom=2&zoom=5");
        assert_eq!(v.zoom, 2);
    }

    #[test]
    fn empty_values_are_skipped() {
        assert_eq!(decode("zoom=&zoom=5").zoom, 5);
        assert_eq!(
            decode("centreX=&centreX=7&centreY=8&centreZ= &centreZ=1").center,
            Position::new(7, 8, 1)
        );
    }

    #[test]
    fn empty_query_is_default() {
        assert_eq!(decode(""), ViewState::default());
        assert_eq!(decode("?"), ViewState::default());
        assert_eq!(decode("unrelated=1"), ViewState::default());
    }

    proptest! {
        #[test]
        fn encode_decode_preserves_in_world_views(
            x in 0i32..=MAX_X,
            y in 0i32..=12_799,
            plane in 0i32..=MAX_PLANE,
            zoom in -4i32..=5,
        ) {
            let v = ViewState::new(Position::new(x, y, plane), zoom);
            prop_assert_eq!(decode(&encode(&v)), v);
        }
    }
}
