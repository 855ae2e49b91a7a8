//! Records returned by host queries
//!
//! The host owns these shapes and changes them without notice, so they are
//! kept as opaque JSON. Accessors read the two fields callers usually need.
//! GraphQL items nest their payload under `data`; both layouts are accepted.

use serde::{Deserialize, Serialize};
use serde_json::Value;

fn string_field<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value
        .get("data")
        .and_then(|data| data.get(key))
        .or_else(|| value.get(key))
        .and_then(Value::as_str)
}

macro_rules! opaque_record {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Value);

        impl $name {
            pub fn uri(&self) -> Option<&str> {
                string_field(&self.0, "uri")
            }

            pub fn name(&self) -> Option<&str> {
                string_field(&self.0, "name")
            }

            pub fn into_inner(self) -> Value {
                self.0
            }
        }

        impl From<Value> for $name {
            fn from(value: Value) -> Self {
                Self(value)
            }
        }
    };
}

opaque_record!(
    /// Top track entry, ranked by affinity
    TopTrack
);

opaque_record!(
    /// Top artist entry, ranked by affinity
    TopArtist
);

opaque_record!(
    /// Album metadata (`albumUnion`)
    Album
);
