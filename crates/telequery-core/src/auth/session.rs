use chrono::{Local, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::AccountCredential;

/// Field names injected into the provider's login payload when it is stored
const PHONENUM_FIELD: &str = "phonenum";
const PASSWORD_FIELD: &str = "password";
const CREATE_TIME_FIELD: &str = "createTime";

/// A cached provider session bound to the credential pair that produced it.
///
/// Persisted as the provider's `loginSuccessResult` object with the account
/// id, password and creation time added alongside the provider's own fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    #[serde(flatten)]
    pub payload: Map<String, Value>,
    #[serde(default, deserialize_with = "lenient_string::deserialize")]
    pub phonenum: String,
    #[serde(default, deserialize_with = "lenient_string::deserialize")]
    pub password: String,
    #[serde(rename = "createTime", default, with = "create_time")]
    pub created_at: Option<NaiveDateTime>,
}

impl SessionRecord {
    /// Build a record from a successful login payload.
    ///
    /// Returns `None` if the payload is not a JSON object.
    pub fn from_login(credential: &AccountCredential, payload: Value) -> Option<Self> {
        let Value::Object(mut payload) = payload else {
            return None;
        };
        for field in [PHONENUM_FIELD, PASSWORD_FIELD, CREATE_TIME_FIELD] {
            payload.remove(field);
        }
        Some(Self {
            payload,
            phonenum: credential.account_id().to_string(),
            password: credential.secret().to_string(),
            created_at: Some(now_to_the_second()),
        })
    }

    /// Whether this record may serve a request presenting `credential`
    pub fn is_usable_for(&self, credential: &AccountCredential) -> bool {
        credential.matches(&self.phonenum, &self.password)
    }

    /// The opaque session to install on the provider client
    pub fn session(&self) -> Value {
        Value::Object(self.payload.clone())
    }
}

fn now_to_the_second() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

/// `createTime` is stored as local wall-clock time, `%Y-%m-%d %H:%M:%S`.
/// Unparseable values load as `None` rather than failing the whole store.
mod create_time {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};
    use serde_json::Value;

    const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn serialize<S: Serializer>(value: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(dt) => serializer.serialize_str(&dt.format(FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        Ok(raw
            .as_str()
            .and_then(|s| NaiveDateTime::parse_from_str(s, FORMAT).ok()))
    }
}

/// Older files may hold the account id or password as a JSON number.
/// Numbers load as their string form; any other type loads as `""` and
/// the record simply never matches a credential pair.
mod lenient_string {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(s) => s,
            Value::Number(n) => n.to_string(),
            _ => String::new(),
        })
    }
}
