use super::path::{FieldPath, Segment};
use crate::error::{SchemaViolation, Violation};
use itertools::Itertools;
use serde_json::{Map, Value};

/// The expected shape of a single JSON value.
#[derive(Debug)]
pub enum Kind {
    String,
    Bool,
    /// Any JSON number, with inclusive bounds.
    Number { min: Option<f64>, max: Option<f64> },
    /// A non-negative integer, with inclusive bounds.
    Integer { min: Option<u64>, max: Option<u64> },
    /// A non-negative integer that fits in 32 bits, or a string holding one.
    UintLike,
    OneOf(&'static [&'static str]),
    Literal(&'static str),
    /// An object whose values all have the given kind.
    Map(&'static Kind),
    Any,
    List {
        item: &'static Kind,
        max_items: Option<usize>,
    },
    Object(&'static ObjectShape),
    Union(&'static UnionShape),
}

#[derive(Debug)]
pub struct Field {
    pub name: &'static str,
    pub kind: Kind,
    pub required: bool,
}

pub const fn req(name: &'static str, kind: Kind) -> Field {
    Field {
        name,
        kind,
        required: true,
    }
}

pub const fn opt(name: &'static str, kind: Kind) -> Field {
    Field {
        name,
        kind,
        required: false,
    }
}

/// A fixed set of named fields. Keys not listed are ignored.
#[derive(Debug)]
pub struct ObjectShape {
    pub name: &'static str,
    pub fields: &'static [Field],
}

impl ObjectShape {
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Objects discriminated by a string tag.
#[derive(Debug)]
pub struct UnionShape {
    pub name: &'static str,
    pub tag: &'static str,
    pub variants: &'static [(&'static str, &'static ObjectShape)],
}

impl UnionShape {
    pub fn variant(&self, tag: &str) -> Option<&'static ObjectShape> {
        self.variants
            .iter()
            .find(|(name, _)| *name == tag)
            .map(|(_, shape)| *shape)
    }

    pub fn tags(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.variants.iter().map(|(name, _)| *name)
    }
}

/// How `null` in an optional field is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NullPolicy {
    /// `null` is a type error, as for caller-supplied input.
    #[default]
    Reject,
    /// `null` means the field is absent, as in platform responses.
    TreatAsAbsent,
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Walks a document against a [`Kind`], collecting every violation.
pub(crate) struct Walker {
    nulls: NullPolicy,
    path: FieldPath,
    violations: Vec<SchemaViolation>,
}

impl Walker {
    pub(crate) fn new(nulls: NullPolicy) -> Self {
        Self {
            nulls,
            path: FieldPath::root(),
            violations: Vec::new(),
        }
    }

    pub(crate) fn finish(self) -> Vec<SchemaViolation> {
        self.violations
    }

    fn report(&mut self, violation: Violation) {
        self.violations.push(SchemaViolation {
            path: self.path.clone(),
            violation,
        });
    }

    fn within(&mut self, segment: Segment, visit: impl FnOnce(&mut Self)) {
        self.path.push(segment);
        visit(self);
        self.path.pop();
    }

    fn mismatch(&mut self, expected: &'static str, found: &Value) {
        self.report(Violation::TypeMismatch {
            expected,
            found: json_type_name(found),
        });
    }

    pub(crate) fn check(&mut self, kind: &Kind, value: &Value) {
        match kind {
            Kind::String => {
                if !value.is_string() {
                    self.mismatch("string", value);
                }
            }
            Kind::Bool => {
                if !value.is_boolean() {
                    self.mismatch("boolean", value);
                }
            }
            Kind::Number { min, max } => match value.as_f64() {
                Some(n) => self.check_range(n, min.unwrap_or(f64::NEG_INFINITY), max.unwrap_or(f64::INFINITY)),
                None => self.mismatch("number", value),
            },
            Kind::Integer { min, max } => match value.as_u64() {
                Some(n) => self.check_range(
                    n as f64,
                    min.map_or(0.0, |m| m as f64),
                    max.map_or(f64::INFINITY, |m| m as f64),
                ),
                None => self.mismatch("non-negative integer", value),
            },
            Kind::UintLike => {
                let parsed = match value {
                    Value::Number(n) => n.as_u64(),
                    Value::String(s) => s.trim().parse::<u64>().ok(),
                    _ => None,
                };
                match parsed {
                    Some(n) => self.check_range(n as f64, 0.0, u32::MAX as f64),
                    None => self.mismatch("non-negative integer or numeric string", value),
                }
            }
            Kind::OneOf(allowed) => match value.as_str() {
                Some(s) if allowed.contains(&s) => {}
                Some(s) => self.report(Violation::NotAllowed {
                    found: s.to_string(),
                    allowed: allowed.iter().join(", "),
                }),
                None => self.mismatch("string", value),
            },
            Kind::Literal(expected) => match value.as_str() {
                Some(s) if s == *expected => {}
                Some(s) => self.report(Violation::LiteralMismatch {
                    expected: *expected,
                    found: s.to_string(),
                }),
                None => self.mismatch("string", value),
            },
            Kind::Map(values) => match value.as_object() {
                Some(map) => {
                    for (key, item) in map {
                        self.within(Segment::Field(key.clone()), |w| w.check(values, item));
                    }
                }
                None => self.mismatch("object", value),
            },
            Kind::Any => {}
            Kind::List { item, max_items } => match value.as_array() {
                Some(items) => {
                    if let Some(max) = max_items {
                        if items.len() > *max {
                            self.report(Violation::TooManyItems {
                                max: *max,
                                found: items.len(),
                            });
                        }
                    }
                    for (i, element) in items.iter().enumerate() {
                        self.within(Segment::Index(i), |w| w.check(item, element));
                    }
                }
                None => self.mismatch("array", value),
            },
            Kind::Object(shape) => self.check_object(shape, value),
            Kind::Union(shape) => self.check_union(shape, value),
        }
    }

    fn check_range(&mut self, value: f64, min: f64, max: f64) {
        if value < min || value > max {
            self.report(Violation::OutOfRange { value, min, max });
        }
    }

    pub(crate) fn check_object(&mut self, shape: &ObjectShape, value: &Value) {
        match value.as_object() {
            Some(map) => self.check_fields(shape, map),
            None => self.mismatch("object", value),
        }
    }

    fn check_fields(&mut self, shape: &ObjectShape, map: &Map<String, Value>) {
        for field in shape.fields {
            match map.get(field.name) {
                None if field.required => {
                    self.within(Segment::Field(field.name.to_string()), |w| {
                        w.report(Violation::Missing)
                    });
                }
                None => {}
                Some(Value::Null) if !field.required && self.nulls == NullPolicy::TreatAsAbsent => {}
                Some(item) => {
                    self.within(Segment::Field(field.name.to_string()), |w| {
                        w.check(&field.kind, item)
                    });
                }
            }
        }
    }

    fn check_union(&mut self, shape: &UnionShape, value: &Value) {
        let Some(map) = value.as_object() else {
            self.mismatch("object", value);
            return;
        };
        let tag_segment = Segment::Field(shape.tag.to_string());
        match map.get(shape.tag) {
            None => self.within(tag_segment, |w| w.report(Violation::Missing)),
            Some(Value::String(tag)) => match shape.variant(tag) {
                Some(variant) => self.check_fields(variant, map),
                None => self.within(tag_segment, |w| {
                    w.report(Violation::UnknownVariant {
                        union: shape.name,
                        found: tag.clone(),
                        expected: shape.tags().join(", "),
                    })
                }),
            },
            Some(other) => self.within(tag_segment, |w| w.mismatch("string", other)),
        }
    }
}
