/// Errors that can occur while reading from the BoardGameGeek XML API.
///
/// Busy responses (HTTP 202/429) never show up here: the fetcher absorbs
/// them by retrying.
#[derive(Debug, thiserror::Error)]
pub enum BggError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("BoardGameGeek returned HTTP {status} for {endpoint}")]
    FetchFailed { endpoint: String, status: u16 },

    #[error("BoardGameGeek does not know '{0}'")]
    InvalidSubject(String),

    #[error("XML parse error: {0}")]
    XmlParse(#[from] quick_xml::Error),

    #[error("XML attribute error: {0}")]
    XmlAttribute(#[from] quick_xml::events::attributes::AttrError),

    #[error("Unexpected response: {0}")]
    InvalidResponse(String),
}

impl BggError {
    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }
}
