use std::fmt;

use url::Url;

use crate::error::{Error, Result};
use crate::repository::RecordId;

/// Path of the REST interface below the project URL.
pub const REST_PATH: &str = "rest/v1/";

/// A typed representation of the store endpoints used by the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEndpoint {
    /// Every row of a table.
    Table(String),
    /// The row of a table carrying one identifier.
    Row { table: String, id: RecordId },
}

impl StoreEndpoint {
    #[must_use]
    pub fn table(table: &str) -> Self {
        Self::Table(table.to_string())
    }

    #[must_use]
    pub fn row(table: &str, id: RecordId) -> Self {
        Self::Row {
            table: table.to_string(),
            id,
        }
    }

    /// Resolves the endpoint against the project URL.
    pub fn to_url(&self, base: &Url) -> Result<Url> {
        let rest = base.join(REST_PATH).map_err(|_| Error::InvalidEndpoint)?;

        match self {
            Self::Table(table) => {
                let mut url = rest.join(table).map_err(|_| Error::InvalidEndpoint)?;
                url.query_pairs_mut().append_pair("select", "*");
                Ok(url)
            }
            Self::Row { table, id } => {
                let mut url = rest.join(table).map_err(|_| Error::InvalidEndpoint)?;
                url.query_pairs_mut()
                    .append_pair("id", &format!("eq.{id}"))
                    .append_pair("select", "*");
                Ok(url)
            }
        }
    }
}

impl fmt::Display for StoreEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Table(table) => write!(f, "{REST_PATH}{table}"),
            Self::Row { table, id } => write!(f, "{REST_PATH}{table}?id=eq.{id}"),
        }
    }
}
