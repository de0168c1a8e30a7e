use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("API error: {code} - {message}")]
    Api { code: u16, message: String },

    #[error("A tag with the same name already exists")]
    TagNameExists,

    #[error("Missing \"Content-Location\" header")]
    MissingContentLocation,

    #[error("Failed to load tags")]
    LoadTags(#[source] Box<Error>),

    #[error("Failed to load tag")]
    LoadTag(#[source] Box<Error>),

    #[error("Failed to create tag")]
    CreateTag(#[source] Box<Error>),

    #[error("Failed to update tag")]
    UpdateTag(#[source] Box<Error>),

    #[error("Failed to delete tag")]
    DeleteTag(#[source] Box<Error>),

    #[error("Failed to load last used tags")]
    LoadLastUsedTags(#[source] Box<Error>),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn is_conflict(&self) -> bool {
        matches!(self, Error::TagNameExists)
    }

    pub fn is_protocol_violation(&self) -> bool {
        matches!(self, Error::MissingContentLocation)
    }

    /// Status code of the underlying API response, if there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { code, .. } => Some(*code),
            Error::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
