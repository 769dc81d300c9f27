use serde::{Deserialize, Serialize};

/// A single user record as stored in the collection file.
///
/// Field order is significant: records serialize as `{"id":..,"email":..,"age":..}`.
/// Missing fields take their zero value and capitalized keys are accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    #[serde(alias = "Id", alias = "ID")]
    pub id: String,
    #[serde(alias = "Email", alias = "EMAIL")]
    pub email: String,
    #[serde(alias = "Age", alias = "AGE")]
    pub age: i64,
}

/// The whole collection, in insertion order.
pub type Users = Vec<User>;

impl User {
    pub fn new(id: impl Into<String>, email: impl Into<String>, age: i64) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            age,
        }
    }

    pub fn from_json(item: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(item)
    }
}
