use crate::error::{FieldErrors, HandlerError};
use crate::validation;
use actix_web::web;
use anyhow::anyhow;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// A request body that has to be a JSON object. Its fields are read through [Payload].
pub type JsonObject = web::Json<Map<String, Value>>;

const REQUIRED: &str = "This field is required.";
const NOT_NULL: &str = "This field may not be null.";

/// Types that can be read from a single body field.
pub trait FieldValue: DeserializeOwned {
    /// Reported when the JSON value has the wrong type.
    const INVALID: &'static str;
}

impl FieldValue for String {
    const INVALID: &'static str = "Not a valid string.";
}

impl FieldValue for i32 {
    const INVALID: &'static str = "A valid integer is required.";
}

impl FieldValue for Decimal {
    const INVALID: &'static str = "A valid number is required.";
}

impl FieldValue for BTreeSet<i32> {
    const INVALID: &'static str = "Expected a list of ids.";
}

/// Reads fields out of a JSON object one at a time, collecting a message for every field that is
/// missing, null, of the wrong type, or fails a later check.
pub struct Payload {
    fields: Map<String, Value>,
    errors: FieldErrors,
}

impl Payload {
    pub fn new(body: JsonObject) -> Payload {
        Payload {
            fields: body.into_inner(),
            errors: FieldErrors::new(),
        }
    }

    pub fn required<T: FieldValue>(&mut self, key: &str) -> Option<T> {
        match self.fields.remove(key) {
            None => {
                self.errors.add(key, REQUIRED);
                None
            }
            Some(value) => self.parse(key, value),
        }
    }

    /// Absent fields are `None` without an error.
    pub fn optional<T: FieldValue>(&mut self, key: &str) -> Option<T> {
        let value = self.fields.remove(key)?;
        self.parse(key, value)
    }

    pub fn check<T>(&mut self, key: &str, result: Result<T, &'static str>) -> Option<T> {
        self.errors.check(key, result)
    }

    pub fn finish(self) -> Result<(), HandlerError> {
        self.errors.into_result()
    }

    /// Like [Payload::finish], handing back `value` when no field had a problem.
    pub fn finish_with<T>(self, value: Option<T>) -> Result<T, HandlerError> {
        self.finish()?;
        value.ok_or_else(|| anyhow!("Body accepted with a field missing").into())
    }

    fn parse<T: FieldValue>(&mut self, key: &str, value: Value) -> Option<T> {
        if value.is_null() {
            self.errors.add(key, NOT_NULL);
            return None;
        }
        match T::deserialize(value) {
            Ok(value) => Some(value),
            Err(_) => {
                self.errors.add(key, T::INVALID);
                None
            }
        }
    }
}

/// Reads the body of a tag or ingredient, which only carries a name.
pub fn read_name(body: JsonObject) -> Result<String, HandlerError> {
    let mut payload = Payload::new(body);
    let name = payload
        .required::<String>("name")
        .and_then(|name| payload.check("name", validation::validate_name(&name)));
    payload.finish_with(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(body: Value) -> Payload {
        match body {
            Value::Object(fields) => Payload::new(web::Json(fields)),
            other => panic!("not an object: {}", other),
        }
    }

    fn errors(payload: Payload) -> Value {
        match payload.finish() {
            Err(HandlerError::Invalid(errors)) => serde_json::to_value(errors).unwrap(),
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn reads_typed_fields() {
        let mut payload = payload(json!({"title": "Soup", "time_minutes": 5, "price": "1.50"}));
        assert_eq!(payload.required::<String>("title").as_deref(), Some("Soup"));
        assert_eq!(payload.required::<i32>("time_minutes"), Some(5));
        assert_eq!(
            payload.required::<Decimal>("price").map(|p| p.to_string()),
            Some("1.50".to_owned())
        );
        assert_eq!(payload.optional::<BTreeSet<i32>>("tags"), None);
        assert!(payload.finish().is_ok());
    }

    #[test]
    fn every_problem_is_reported_under_its_key() {
        let mut payload = payload(json!({"time_minutes": "abc", "link": null, "tags": "1"}));
        payload.required::<String>("title");
        payload.required::<i32>("time_minutes");
        payload.optional::<String>("link");
        payload.optional::<BTreeSet<i32>>("tags");

        assert_eq!(
            errors(payload),
            json!({
                "title": ["This field is required."],
                "time_minutes": ["A valid integer is required."],
                "link": ["This field may not be null."],
                "tags": ["Expected a list of ids."],
            })
        );
    }

    #[test]
    fn name_is_required_and_trimmed() {
        let name = |value: Value| match value {
            Value::Object(fields) => read_name(web::Json(fields)),
            other => panic!("not an object: {}", other),
        };

        assert_eq!(name(json!({"name": " Vegan "})).unwrap(), "Vegan");
        match name(json!({})) {
            Err(HandlerError::Invalid(errors)) => assert_eq!(
                serde_json::to_value(errors).unwrap(),
                json!({"name": ["This field is required."]})
            ),
            other => panic!("unexpected result {:?}", other),
        }
        assert!(name(json!({"name": 5})).is_err());
    }

    #[test]
    fn checks_join_type_errors() {
        let mut payload = payload(json!({"name": " "}));
        let name = payload.required::<String>("name");
        assert_eq!(name.as_deref(), Some(" "));
        payload.check::<()>("name", Err("This field may not be blank."));
        assert_eq!(
            errors(payload),
            json!({"name": ["This field may not be blank."]})
        );
    }
}
