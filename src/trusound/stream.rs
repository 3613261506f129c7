use reqwest::Url;

use crate::{
    error::{Result, TruSoundError},
    types::TrackId,
};

/// Builds stream URLs for direct playback.
///
/// An audio player fetching a URL cannot set headers, so the session token is
/// bound into the query string: `{base}/TruSoundCloud/tracks/{id}/stream?token=…`.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamUrlBuilder {
    base_url: String,
    token: String,
}

impl StreamUrlBuilder {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    pub fn build(&self, track_id: TrackId) -> Result<String> {
        let raw = format!("{}/TruSoundCloud/tracks/{}/stream", self.base_url, track_id);
        Url::parse_with_params(&raw, &[("token", self.token.as_str())])
            .map(String::from)
            .map_err(|e| TruSoundError::Validation(format!("bad stream URL '{}': {}", raw, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_is_query_encoded() {
        let builder = StreamUrlBuilder::new("http://host:3000/api/", "a b/c&d");
        let url = builder.build(42).unwrap();
        assert_eq!(
            url,
            "http://host:3000/api/TruSoundCloud/tracks/42/stream?token=a+b%2Fc%26d"
        );
    }

    #[test]
    fn rejects_unparseable_base() {
        let builder = StreamUrlBuilder::new("not a url", "t");
        assert!(builder.build(1).unwrap_err().is_validation());
    }
}
