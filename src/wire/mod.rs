//! Torch state message format.
//!
//! Both directions carry the same flat JSON object. There is no version
//! field and no message type; every message is a full snapshot, and any
//! field may be missing or `null`.

use std::convert::TryFrom;
use std::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use thiserror::Error;

/// One snapshot of the torch state as it travels over the socket.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct WireMessage {
    #[serde(rename = "Brightness", default, deserialize_with = "lenient_int", skip_serializing_if = "Option::is_none")]
    pub brightness: Option<i64>,
    #[serde(rename = "Rate", default, deserialize_with = "lenient_int", skip_serializing_if = "Option::is_none")]
    pub rate: Option<i64>,
    #[serde(rename = "RedLevel", default, deserialize_with = "lenient_int", skip_serializing_if = "Option::is_none")]
    pub red: Option<i64>,
    #[serde(rename = "GreenLevel", default, deserialize_with = "lenient_int", skip_serializing_if = "Option::is_none")]
    pub green: Option<i64>,
    #[serde(rename = "BlueLevel", default, deserialize_with = "lenient_int", skip_serializing_if = "Option::is_none")]
    pub blue: Option<i64>,
    #[serde(rename = "EffectType", default, deserialize_with = "lenient_int", skip_serializing_if = "Option::is_none")]
    pub effect_type: Option<i64>,
    /// Power state, `"1"` or `"0"` on the wire.
    #[serde(
        rename = "UserReqOnOFF",
        default,
        deserialize_with = "lenient_switch",
        serialize_with = "switch_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub on_off: Option<bool>,
    #[serde(rename = "Heading1", default, skip_serializing_if = "Option::is_none")]
    pub heading1: Option<String>,
    #[serde(rename = "Heading2", default, skip_serializing_if = "Option::is_none")]
    pub heading2: Option<String>,
}

pub type WireResult<T> = Result<T, WireError>;

#[derive(Debug, Error)]
pub enum WireError {
    /// The payload was not a torch state object.
    #[error("malformed state message: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl WireMessage {
    /// Parse an inbound text frame. Only a JSON object is a snapshot.
    pub fn decode(payload: &str) -> WireResult<WireMessage> {
        // The derived impl would also take an array and fill fields by position.
        let fields: Map<String, Value> = serde_json::from_str(payload)?;
        Ok(WireMessage::deserialize(Value::Object(fields))?)
    }

    /// Serialize for an outbound text frame.
    pub fn encode(&self) -> WireResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

fn switch_string<S: Serializer>(value: &Option<bool>, serializer: S) -> Result<S::Ok, S::Error> {
    match value {
        Some(true) => serializer.serialize_str("1"),
        Some(false) => serializer.serialize_str("0"),
        None => serializer.serialize_none(),
    }
}

/// Integers may arrive as numbers or as numeric strings.
fn lenient_int<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    struct IntVisitor;

    impl<'de> Visitor<'de> for IntVisitor {
        type Value = Option<i64>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("an integer, a numeric string or null")
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Self::Value, D::Error> {
            d.deserialize_any(self)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            Ok(Some(v))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            i64::try_from(v)
                .map(Some)
                .map_err(|_| E::invalid_value(de::Unexpected::Unsigned(v), &self))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
            if v.is_finite() {
                Ok(Some(v.trunc() as i64))
            } else {
                Err(E::invalid_value(de::Unexpected::Float(v), &self))
            }
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            v.trim()
                .parse::<i64>()
                .map(Some)
                .map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
        }
    }

    deserializer.deserialize_option(IntVisitor)
}

/// The power switch is `"1"`/`"0"`, but tolerate numbers and booleans too.
fn lenient_switch<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<bool>, D::Error> {
    struct SwitchVisitor;

    impl<'de> Visitor<'de> for SwitchVisitor {
        type Value = Option<bool>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("\"1\", \"0\", a boolean or null")
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Self::Value, D::Error> {
            d.deserialize_any(self)
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
            Ok(Some(v))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            match v {
                0 => Ok(Some(false)),
                1 => Ok(Some(true)),
                _ => Err(E::invalid_value(de::Unexpected::Signed(v), &self)),
            }
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            match v {
                0 => Ok(Some(false)),
                1 => Ok(Some(true)),
                _ => Err(E::invalid_value(de::Unexpected::Unsigned(v), &self)),
            }
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            match v.trim() {
                "1" => Ok(Some(true)),
                "0" => Ok(Some(false)),
                _ => Err(E::invalid_value(de::Unexpected::Str(v), &self)),
            }
        }
    }

    deserializer.deserialize_option(SwitchVisitor)
}
