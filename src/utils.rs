use base64::{Engine, engine::general_purpose::STANDARD};
use rand::{Rng, distr::Alphanumeric};
use url::Url;

const STATE_LEN: usize = 32;

/// Random value for the OAuth `state` parameter.
pub fn generate_state() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(STATE_LEN)
        .map(char::from)
        .collect()
}

/// `Authorization` header value for HTTP Basic client authentication.
pub fn basic_auth_header(client_id: &str, client_secret: &str) -> String {
    format!(
        "Basic {}",
        STANDARD.encode(format!("{client_id}:{client_secret}"))
    )
}

/// Normalizes a playable item reference to its `spotify:` URI form.
///
/// Accepts `spotify:track:<id>`, `spotify:episode:<id>` and the matching
/// `https://open.spotify.com/<kind>/<id>` share links (query string ignored).
/// Used as a clap value parser.
pub fn parse_track_uri(input: &str) -> Result<String, String> {
    let input = input.trim();

    if let Some(rest) = input.strip_prefix("spotify:") {
        return match rest.split_once(':') {
            Some((kind, id)) if is_playable_kind(kind) && is_valid_id(id) => {
                Ok(format!("spotify:{kind}:{id}"))
            }
            _ => Err(format!("`{input}` is not a spotify:track: or spotify:episode: URI")),
        };
    }

    let url = Url::parse(input).map_err(|_| format!("`{input}` is not a Spotify URI or link"))?;
    if url.host_str() != Some("open.spotify.com") {
        return Err(format!("`{input}` is not an open.spotify.com link"));
    }

    // Localized links look like /intl-de/track/<id>.
    let segments: Vec<&str> = url
        .path_segments()
        .map(|s| s.filter(|seg| !seg.is_empty() && !seg.starts_with("intl-")).collect())
        .unwrap_or_default();

    match segments.as_slice() {
        [kind, id] if is_playable_kind(kind) && is_valid_id(id) => {
            Ok(format!("spotify:{kind}:{id}"))
        }
        _ => Err(format!("`{input}` does not point to a track or episode")),
    }
}

fn is_playable_kind(kind: &str) -> bool {
    matches!(kind, "track" | "episode")
}

fn is_valid_id(id: &str) -> bool {
    !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric())
}
