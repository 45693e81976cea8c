use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("unknown country id: {0}")]
    UnknownCountryId(u32),
    #[error("unknown country name: {0}")]
    UnknownCountryName(String),
    #[error("flag url carries no country id: {0:?}")]
    UnrecognizedFlag(String),
    #[error("country table conflict on {key}: {existing:?} vs {incoming:?}")]
    CountryConflict {
        key: String,
        existing: String,
        incoming: String,
    },

    #[error("no shard files found in {}", .0.display())]
    NoShards(PathBuf),
    #[error("invalid year range {from}..={to}")]
    InvalidYearRange { from: i32, to: i32 },

    #[error("unification failed for player {player_id}: {source}")]
    Player {
        player_id: u32,
        #[source]
        source: Box<Error>,
    },
    #[error("malformed transfer history for player {player_id}: {source}")]
    MalformedHistory {
        player_id: u32,
        #[source]
        source: serde_json::Error,
    },
    #[error("unexpected status {status} from {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("The selector you are trying to scrape for is missing. Selector: {0}")]
    ParseMissingSelector(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("Io Error at {}: {source}", .path.display())]
    IoAt {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Io Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to decode {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Json Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Csv Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Tokio Join Error, couldn't await a task! {0}")]
    RuntimeJoin(#[from] tokio::task::JoinError),

    #[error("Reqwest Error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

impl Error {
    pub(crate) fn io_at(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Error {
        let path = path.into();
        move |source| Error::IoAt { path, source }
    }

    pub(crate) fn for_player(player_id: u32) -> impl FnOnce(Error) -> Error {
        move |source| Error::Player {
            player_id,
            source: Box::new(source),
        }
    }
}
