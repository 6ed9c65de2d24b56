use serde_json::{Number, Value};

use super::{FieldError, Format};

/// What a field holds and the bounds it is checked against.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    String {
        min_len: Option<usize>,
        max_len: Option<usize>,
        format: Option<Format>,
    },
    Integer {
        min: Option<i64>,
        max: Option<i64>,
        selector: bool,
    },
    Boolean,
    OneOf(&'static [&'static str]),
    /// File metadata object `{ "name", "type", "size" }`.
    File {
        media_types: &'static [&'static str],
        max_size: Option<u64>,
    },
}

/// A single field rule. Modifiers that do not apply to the field's kind are
/// ignored.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    kind: FieldKind,
    required: bool,
    omittable: bool,
    default: Option<Value>,
    label: Option<&'static str>,
    message: Option<&'static str>,
}

impl Field {
    fn of(kind: FieldKind) -> Self {
        Self {
            kind,
            required: true,
            omittable: false,
            default: None,
            label: None,
            message: None,
        }
    }

    pub fn string() -> Self {
        Self::of(FieldKind::String {
            min_len: None,
            max_len: None,
            format: None,
        })
    }

    pub fn integer() -> Self {
        Self::of(FieldKind::Integer {
            min: None,
            max: None,
            selector: false,
        })
    }

    pub fn boolean() -> Self {
        Self::of(FieldKind::Boolean)
    }

    pub fn one_of(allowed: &'static [&'static str]) -> Self {
        Self::of(FieldKind::OneOf(allowed))
    }

    pub fn file(media_types: &'static [&'static str]) -> Self {
        Self::of(FieldKind::File {
            media_types,
            max_size: None,
        })
    }

    /// Foreign-key picker: a positive integer, where 0 or absence means
    /// nothing was selected.
    pub fn selector() -> Self {
        Self::of(FieldKind::Integer {
            min: None,
            max: None,
            selector: true,
        })
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Value substituted when the input omits the field.
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self.required = false;
        self
    }

    pub(crate) fn without_default(mut self) -> Self {
        self.default = None;
        self
    }

    /// A missing key passes, but a present blank value is still held to
    /// `required`.
    pub(crate) fn omittable(mut self) -> Self {
        self.omittable = true;
        self
    }

    pub fn label(mut self, label: &'static str) -> Self {
        self.label = Some(label);
        self
    }

    /// Replaces every generated message for this field.
    pub fn message(mut self, message: &'static str) -> Self {
        self.message = Some(message);
        self
    }

    pub fn min_len(mut self, n: usize) -> Self {
        if let FieldKind::String { min_len, .. } = &mut self.kind {
            *min_len = Some(n);
        }
        self
    }

    pub fn max_len(mut self, n: usize) -> Self {
        if let FieldKind::String { max_len, .. } = &mut self.kind {
            *max_len = Some(n);
        }
        self
    }

    pub fn format(mut self, f: Format) -> Self {
        if let FieldKind::String { format, .. } = &mut self.kind {
            *format = Some(f);
        }
        self
    }

    pub fn min(mut self, n: i64) -> Self {
        if let FieldKind::Integer { min, .. } = &mut self.kind {
            *min = Some(n);
        }
        self
    }

    /// Shorthand for `min(1)`.
    pub fn positive(self) -> Self {
        self.min(1)
    }

    pub fn max(mut self, n: i64) -> Self {
        if let FieldKind::Integer { max, .. } = &mut self.kind {
            *max = Some(n);
        }
        self
    }

    pub fn max_size(mut self, bytes: u64) -> Self {
        if let FieldKind::File { max_size, .. } = &mut self.kind {
            *max_size = Some(bytes);
        }
        self
    }

    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Check `raw` and return the coerced value, `None` when the field is
    /// legitimately absent.
    pub(crate) fn check(&self, path: &str, raw: Option<&Value>) -> Result<Option<Value>, FieldError> {
        let label = self.label.unwrap_or(path);
        let fail = |generated: String| {
            FieldError::new(path, self.message.map(str::to_string).unwrap_or(generated))
        };

        let present = match raw {
            None if self.omittable => return Ok(None),
            None | Some(Value::Null) => None,
            Some(value) => self.coerce(label, value).map_err(|m| fail(m))?,
        };

        match present {
            Some(value) => Ok(Some(value)),
            None => match &self.default {
                Some(default) => Ok(Some(default.clone())),
                None if self.required => Err(fail(format!("{label} wajib diisi"))),
                None => Ok(None),
            },
        }
    }

    /// `Ok(None)` for values that count as empty input.
    fn coerce(&self, label: &str, value: &Value) -> Result<Option<Value>, String> {
        match &self.kind {
            FieldKind::String {
                min_len,
                max_len,
                format,
            } => {
                let Value::String(s) = value else {
                    return Err(format!("{label} harus berupa teks"));
                };
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Ok(None);
                }
                let len = trimmed.chars().count();
                if let Some(min) = min_len {
                    if len < *min {
                        return Err(format!("{label} minimal {min} karakter"));
                    }
                }
                if let Some(max) = max_len {
                    if len > *max {
                        return Err(format!("{label} maksimal {max} karakter"));
                    }
                }
                if let Some(f) = format {
                    if !f.matches(trimmed) {
                        return Err(f.message(label));
                    }
                }
                Ok(Some(Value::String(trimmed.to_string())))
            }
            FieldKind::Integer { min, max, selector } => {
                let n = match value {
                    Value::Number(n) => match n.as_i64() {
                        Some(n) => n,
                        None => return Err(format!("{label} harus berupa bilangan bulat")),
                    },
                    Value::String(s) if s.trim().is_empty() => return Ok(None),
                    Value::String(s) => s
                        .trim()
                        .parse::<i64>()
                        .map_err(|_| format!("{label} harus berupa bilangan bulat"))?,
                    _ => return Err(format!("{label} harus berupa bilangan bulat")),
                };
                if *selector && n <= 0 {
                    return Err(format!("{label} harus dipilih"));
                }
                if let Some(min) = min {
                    if n < *min {
                        return Err(format!("{label} minimal {min}"));
                    }
                }
                if let Some(max) = max {
                    if n > *max {
                        return Err(format!("{label} maksimal {max}"));
                    }
                }
                Ok(Some(Value::Number(Number::from(n))))
            }
            FieldKind::Boolean => match value {
                Value::Bool(b) => Ok(Some(Value::Bool(*b))),
                Value::String(s) => match s.trim() {
                    "true" | "1" => Ok(Some(Value::Bool(true))),
                    "false" | "0" => Ok(Some(Value::Bool(false))),
                    "" => Ok(None),
                    _ => Err(format!("{label} harus berupa boolean")),
                },
                Value::Number(n) => match n.as_i64() {
                    Some(1) => Ok(Some(Value::Bool(true))),
                    Some(0) => Ok(Some(Value::Bool(false))),
                    _ => Err(format!("{label} harus berupa boolean")),
                },
                _ => Err(format!("{label} harus berupa boolean")),
            },
            FieldKind::OneOf(allowed) => match value {
                Value::String(s) if s.trim().is_empty() => Ok(None),
                Value::String(s) if allowed.contains(&s.trim()) => {
                    Ok(Some(Value::String(s.trim().to_string())))
                }
                _ if allowed.is_empty() => Err(format!("{label} tidak didukung")),
                _ => Err(format!(
                    "{label} harus salah satu dari: {}",
                    allowed.join(", ")
                )),
            },
            FieldKind::File {
                media_types,
                max_size,
            } => {
                let Value::Object(meta) = value else {
                    return Err(format!("{label} harus berupa file"));
                };
                let media_type = meta.get("type").and_then(Value::as_str).unwrap_or_default();
                if !media_types.contains(&media_type) {
                    return Err(format!(
                        "{label} harus bertipe {}",
                        media_types.join(" atau ")
                    ));
                }
                if let (Some(max), Some(size)) = (max_size, meta.get("size").and_then(Value::as_u64)) {
                    if size > *max {
                        return Err(format!("Ukuran {label} maksimal {max} byte"));
                    }
                }
                Ok(Some(value.clone()))
            }
        }
    }
}
