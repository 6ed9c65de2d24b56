use std::fmt;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::{Field, FieldError, ValidationErrors};

/// Whole-object predicate, evaluated after every field passed.
type Predicate = fn(&Map<String, Value>) -> bool;

#[derive(Clone)]
struct Refinement {
    path: &'static str,
    message: &'static str,
    predicate: Predicate,
}

impl fmt::Debug for Refinement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Refinement")
            .field("path", &self.path)
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}

/// An ordered set of field rules plus cross-field refinements.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: Vec<(&'static str, Field)>,
    refinements: Vec<Refinement>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: &'static str, field: Field) -> Self {
        self.fields.retain(|(n, _)| *n != name);
        self.fields.push((name, field));
        self
    }

    /// Reject the whole object when `predicate` is false, reporting
    /// `message` under `path`.
    pub fn refine(mut self, path: &'static str, message: &'static str, predicate: Predicate) -> Self {
        self.refinements.push(Refinement {
            path,
            message,
            predicate,
        });
        self
    }

    /// Copy of this schema for partial updates: every key may be omitted and
    /// defaults are dropped, but a required field sent blank still fails.
    pub fn partial(&self) -> Self {
        Self {
            fields: self
                .fields
                .iter()
                .map(|(name, field)| (*name, field.clone().without_default().omittable()))
                .collect(),
            refinements: self.refinements.clone(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|(n, _)| *n == name).map(|(_, f)| f)
    }

    pub fn field_names(&self) -> Vec<&'static str> {
        self.fields.iter().map(|(n, _)| *n).collect()
    }

    /// Validate `input`, returning the coerced object with defaults applied.
    /// Keys the schema does not declare are dropped.
    pub fn parse(&self, input: &Value) -> Result<Map<String, Value>, ValidationErrors> {
        let Value::Object(object) = input else {
            return Err(ValidationErrors::single("", "Input harus berupa objek"));
        };

        let mut output = Map::new();
        let mut errors = Vec::new();
        for (name, field) in &self.fields {
            match field.check(name, object.get(*name)) {
                Ok(Some(value)) => {
                    output.insert((*name).to_string(), value);
                }
                Ok(None) => {}
                Err(e) => errors.push(e),
            }
        }
        if let Some(errors) = ValidationErrors::from_vec(errors) {
            return Err(errors);
        }

        let failed: Vec<FieldError> = self
            .refinements
            .iter()
            .filter(|r| !(r.predicate)(&output))
            .map(|r| FieldError::new(r.path, r.message))
            .collect();
        match ValidationErrors::from_vec(failed) {
            Some(errors) => Err(errors),
            None => Ok(output),
        }
    }

    /// `parse`, then deserialize the coerced object into `T`.
    pub fn validate<T: DeserializeOwned>(&self, input: &Value) -> Result<T, ValidationErrors> {
        let output = self.parse(input)?;
        serde_json::from_value(Value::Object(output))
            .map_err(|e| ValidationErrors::single("", e.to_string()))
    }
}
