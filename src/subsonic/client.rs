use std::time::Duration;

use log::debug;
use rand::{Rng, distr::Alphanumeric};
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde_json::Value;
use snafu::prelude::*;

use super::MusicServer;
use super::model::{Album, ApiError, Artist, Index, Indexes};
use crate::config::ServerSettings;
use crate::error::{ApiSnafu, Error, HttpSnafu, Result};
use crate::rating::Stars;

const SALT_LEN: usize = 12;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum Endpoint {
    Indexes,
    Artist,
    Album,
    SetRating,
}

impl Endpoint {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Endpoint::Indexes => "getIndexes",
            Endpoint::Artist => "getArtist",
            Endpoint::Album => "getAlbum",
            Endpoint::SetRating => "setRating",
        }
    }

    /// Key under `subsonic-response` that carries this endpoint's payload.
    pub(crate) fn payload_key(&self) -> Option<&'static str> {
        match self {
            Endpoint::Indexes => Some("indexes"),
            Endpoint::Artist => Some("artist"),
            Endpoint::Album => Some("album"),
            Endpoint::SetRating => None,
        }
    }
}

/// Blocking Subsonic REST client using salted token authentication.
#[derive(Debug, Clone)]
pub struct SubsonicClient {
    http: reqwest::blocking::Client,
    base_url: Url,
    username: String,
    password: String,
    client_name: String,
    api_version: String,
}

impl SubsonicClient {
    pub fn new(settings: &ServerSettings) -> Result<Self> {
        let base_url = base_url(settings)?;

        let timeout =
            (settings.timeout_secs > 0).then(|| Duration::from_secs(settings.timeout_secs));
        let http = reqwest::blocking::Client::builder()
            .user_agent(concat!("subrate/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .context(HttpSnafu {
                endpoint: "client setup",
            })?;

        Ok(Self {
            http,
            base_url,
            username: settings.username.clone(),
            password: settings.password.clone(),
            client_name: settings.client_name.clone(),
            api_version: settings.api_version.clone(),
        })
    }

    pub(crate) fn endpoint_url(&self, endpoint: Endpoint) -> String {
        format!(
            "{}/rest/{}.view",
            self.base_url.as_str().trim_end_matches('/'),
            endpoint.as_str()
        )
    }

    /// Query parameters shared by every request. A fresh salt is drawn each time.
    pub(crate) fn auth_params(&self) -> Vec<(&'static str, String)> {
        let salt: String = rand::rng()
            .sample_iter(&Alphanumeric)
            .take(SALT_LEN)
            .map(char::from)
            .collect();

        vec![
            ("u", self.username.clone()),
            ("t", token(&self.password, &salt)),
            ("s", salt),
            ("v", self.api_version.clone()),
            ("c", self.client_name.clone()),
            ("f", "json".to_string()),
        ]
    }

    fn call<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        params: &[(&str, String)],
    ) -> Result<T> {
        let url = self.endpoint_url(endpoint);
        debug!("GET {url} {params:?}");

        let context = HttpSnafu {
            endpoint: endpoint.as_str(),
        };
        let body = self
            .http
            .get(&url)
            .query(&self.auth_params())
            .query(params)
            .send()
            .context(context)?
            .error_for_status()
            .context(context)?
            .text()
            .context(context)?;

        parse_response(endpoint, &body)
    }
}

impl MusicServer for SubsonicClient {
    fn indexes(&self) -> Result<Vec<Index>> {
        let indexes: Indexes = self.call(Endpoint::Indexes, &[])?;
        Ok(indexes.index)
    }

    fn artist(&self, id: &str) -> Result<Artist> {
        self.call(Endpoint::Artist, &[("id", id.to_string())])
    }

    fn album(&self, id: &str) -> Result<Album> {
        self.call(Endpoint::Album, &[("id", id.to_string())])
    }

    fn set_rating(&self, id: &str, rating: Stars) -> Result<()> {
        self.call::<Value>(
            Endpoint::SetRating,
            &[("id", id.to_string()), ("rating", rating.get().to_string())],
        )?;
        Ok(())
    }
}

fn base_url(settings: &ServerSettings) -> Result<Url> {
    let mut url = Url::parse(settings.url.trim()).map_err(|e| Error::InvalidSettings {
        message: format!("server.url {:?} is not a valid URL: {e}", settings.url),
    })?;

    if let Some(port) = settings.port {
        url.set_port(Some(port)).map_err(|_| Error::InvalidSettings {
            message: format!("server.url {:?} cannot carry a port", settings.url),
        })?;
    }

    Ok(url)
}

/// Subsonic auth token: hex md5 of the password followed by the salt.
pub(crate) fn token(password: &str, salt: &str) -> String {
    format!("{:x}", md5::compute(format!("{password}{salt}")))
}

/// Unwrap the `subsonic-response` envelope and decode the endpoint's payload.
pub(crate) fn parse_response<T: DeserializeOwned>(endpoint: Endpoint, body: &str) -> Result<T> {
    let decode_error = |message: String| Error::Decode {
        endpoint: endpoint.as_str().to_string(),
        message,
    };

    let mut envelope: Value =
        serde_json::from_str(body).map_err(|e| decode_error(e.to_string()))?;
    let response = envelope
        .get_mut("subsonic-response")
        .map(Value::take)
        .ok_or_else(|| decode_error("missing subsonic-response".to_string()))?;

    if response.get("status").and_then(Value::as_str) != Some("ok") {
        let error: ApiError = response
            .get("error")
            .cloned()
            .map(serde_json::from_value::<ApiError>)
            .transpose()
            .map_err(|e| decode_error(e.to_string()))?
            .unwrap_or(ApiError {
                code: 0,
                message: "request failed without an error message".to_string(),
            });

        return ApiSnafu {
            endpoint: endpoint.as_str(),
            code: error.code,
            message: error.message,
        }
        .fail();
    }

    let payload = match endpoint.payload_key() {
        Some(key) => response
            .get(key)
            .cloned()
            .ok_or_else(|| decode_error(format!("missing `{key}` in response")))?,
        None => response,
    };

    serde_json::from_value(payload).map_err(|e| decode_error(e.to_string()))
}
