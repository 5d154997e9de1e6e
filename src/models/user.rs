use serde::{Deserialize, Serialize};

/// Buyer details the server joins onto an inquiry. Display-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyerSnapshot {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

impl BuyerSnapshot {
    /// Company name when present, otherwise the person's name, otherwise the id.
    pub fn display_name(&self) -> &str {
        self.company_name
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or(&self.id)
    }
}
