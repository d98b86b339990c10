use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug)]
pub struct Health {
    pub status: &'static str,
}

/// Answer to the "is this value still free" checks the admin forms call while typing.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Availability {
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
}
