use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::{Map, Value as JsonValue};

use crate::{EvalError, EvalResult, Value};

/// Wire shape of an incoming event.
#[derive(Debug, Deserialize)]
struct RawEvent {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    timestamp: Option<f64>,
    #[serde(default)]
    properties: Map<String, JsonValue>,
}

/// Read-only view of one event, resolved against `event.<segment>...` paths.
///
/// Built per evaluation and dropped afterwards. Absent `code` or `timestamp`
/// resolve to [`EvalError::PropertyNotFound`], never to `Null`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventContext {
    code: Option<String>,
    timestamp: Option<f64>,
    properties: BTreeMap<String, Value>,
}

impl EventContext {
    pub fn new(code: &str, timestamp: f64, properties: BTreeMap<String, Value>) -> EventContext {
        EventContext {
            code: Some(code.to_owned()),
            timestamp: Some(timestamp),
            properties,
        }
    }

    /// Decode an event from JSON text. Anything that is not an object with
    /// well-typed `code`, `timestamp` and `properties` fields is rejected.
    pub fn from_json(json: &str) -> EvalResult<EventContext> {
        EventContext::from_json_value(serde_json::from_str(json)?)
    }

    pub fn from_json_value(json: JsonValue) -> EvalResult<EventContext> {
        if !json.is_object() {
            return Err(EvalError::MalformedEventJSON(format!(
                "expected an object, found {}",
                Value::from(json).as_type()
            )));
        }

        let raw: RawEvent = serde_json::from_value(json)?;
        Ok(raw.into_context())
    }

    pub fn with_property(mut self, name: &str, value: Value) -> EventContext {
        self.properties.insert(name.to_owned(), value);
        self
    }

    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    pub fn timestamp(&self) -> Option<f64> {
        self.timestamp
    }

    pub fn properties(&self) -> &BTreeMap<String, Value> {
        &self.properties
    }

    /// Look up the value at `event.<path...>`.
    ///
    /// Strings found under `properties` that spell a number are handed out as
    /// numbers, so `"12.34"` takes part in arithmetic like `12.34` does.
    pub fn resolve(&self, path: &[String]) -> EvalResult<Value> {
        let not_found = || EvalError::PropertyNotFound(display_path(path));

        let Some((first, rest)) = path.split_first() else {
            return Ok(self.as_value());
        };

        match first.as_str() {
            "code" if rest.is_empty() => self.code.clone().map(Value::String).ok_or_else(not_found),
            "timestamp" if rest.is_empty() => {
                self.timestamp.map(Value::Number).ok_or_else(not_found)
            }
            "properties" => {
                let Some((key, rest)) = rest.split_first() else {
                    return Ok(Value::Map(self.properties.clone()));
                };

                let mut current = self.properties.get(key).ok_or_else(not_found)?;
                for segment in rest {
                    current = match current {
                        Value::Map(map) => map.get(segment).ok_or_else(not_found)?,
                        _ => return Err(not_found()),
                    };
                }

                Ok(match current {
                    Value::String(s) => Value::number_from_str(s)
                        .map_or_else(|| current.clone(), Value::Number),
                    other => other.clone(),
                })
            }
            _ => Err(not_found()),
        }
    }

    /// The whole event as a map, for a bare `event` reference.
    fn as_value(&self) -> Value {
        let mut map = BTreeMap::new();

        if let Some(ref code) = self.code {
            map.insert("code".to_owned(), Value::String(code.clone()));
        }
        if let Some(timestamp) = self.timestamp {
            map.insert("timestamp".to_owned(), Value::Number(timestamp));
        }
        map.insert("properties".to_owned(), Value::Map(self.properties.clone()));

        Value::Map(map)
    }
}

impl RawEvent {
    fn into_context(self) -> EventContext {
        EventContext {
            code: self.code,
            timestamp: self.timestamp,
            properties: self
                .properties
                .into_iter()
                .map(|(k, v)| (k, Value::from(v)))
                .collect(),
        }
    }
}

fn display_path(path: &[String]) -> String {
    let mut text = String::from(crate::compiler::grammar::EVENT_ROOT);
    for segment in path {
        text.push('.');
        text.push_str(segment);
    }
    text
}
