//! Substitution data handed to the translator.
//!
//! Templates are filled from an ordered list of named [`Param`]s. A param is
//! either a plain JSON value, a list (which enables `$map{...}` projection),
//! or a [`TranslatableError`] that is itself translated before substitution.

use serde_json::{Map, Value};

/// Capability shared by every error that can be rendered as an `error.<code>` phrase.
pub trait Translatable {
    /// The error code; the phrase key is `error.<code>`
    fn code(&self) -> &str;

    /// Data used to fill the phrase. `None` means the error offers only its code.
    fn data(&self) -> Option<Data> {
        None
    }
}

/// An error value that can be translated through the phrase store.
#[derive(Debug, Clone, PartialEq)]
pub struct TranslatableError {
    pub code: String,
    pub data: Option<Data>,
}

impl TranslatableError {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            data: None,
        }
    }

    /// Attach substitution data
    pub fn with_data(mut self, data: Data) -> Self {
        self.data = Some(data);
        self
    }

    /// Capture any [`Translatable`] value.
    pub fn from_translatable<T: Translatable + ?Sized>(error: &T) -> Self {
        Self {
            code: error.code().to_string(),
            data: error.data(),
        }
    }

    /// The phrase key for this error
    pub fn key(&self) -> String {
        format!("error.{}", self.code)
    }

    /// The data used for substitution.
    ///
    /// Without explicit data the error describes itself, so a phrase such as
    /// `Code: ${code}` can still reference the error code.
    pub fn substitution_data(&self) -> Data {
        self.data
            .clone()
            .unwrap_or_else(|| Data::new().with("code", self.code.as_str()))
    }
}

impl Translatable for TranslatableError {
    fn code(&self) -> &str {
        &self.code
    }

    fn data(&self) -> Option<Data> {
        self.data.clone()
    }
}

/// A value offered to a template placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum Param {
    Value(Value),
    List(Vec<Param>),
    Error(TranslatableError),
}

impl Param {
    /// Elements of a list param.
    ///
    /// Params built with `From<Value>` turn JSON arrays into lists.
    pub fn as_list(&self) -> Option<&[Param]> {
        match self {
            Param::List(items) => Some(items),
            _ => None,
        }
    }

    /// Check whether this param carries a translatable error
    pub fn is_error(&self) -> bool {
        matches!(self, Param::Error(_))
    }

    /// Look up an attribute on an object element, rendered as text (`null` renders empty).
    pub fn attribute(&self, name: &str) -> Option<String> {
        match self {
            Param::Value(Value::Object(map)) => map.get(name).map(|value| match value {
                Value::Null => String::new(),
                other => render_value(other),
            }),
            _ => None,
        }
    }

    /// Render the param the way it appears inside a substituted string.
    pub fn render(&self) -> String {
        match self {
            Param::Value(value) => render_value(value),
            Param::List(items) => items
                .iter()
                .map(|item| match item {
                    Param::Value(Value::Null) => String::new(),
                    other => other.render(),
                })
                .collect::<Vec<_>>()
                .join(","),
            Param::Error(error) => error.code.clone(),
        }
    }
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => render_value(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        other => other.to_string(),
    }
}

impl From<Value> for Param {
    fn from(value: Value) -> Self {
        match value {
            Value::Array(items) => Param::List(items.into_iter().map(Param::from).collect()),
            other => Param::Value(other),
        }
    }
}

impl From<TranslatableError> for Param {
    fn from(error: TranslatableError) -> Self {
        Param::Error(error)
    }
}

impl From<Vec<Param>> for Param {
    fn from(items: Vec<Param>) -> Self {
        Param::List(items)
    }
}

impl From<&str> for Param {
    fn from(s: &str) -> Self {
        Param::Value(Value::String(s.to_string()))
    }
}

impl From<String> for Param {
    fn from(s: String) -> Self {
        Param::Value(Value::String(s))
    }
}

macro_rules! param_from_number {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Param {
                fn from(n: $t) -> Self {
                    Param::Value(Value::from(n))
                }
            }
        )*
    };
}

param_from_number!(i32, i64, u32, u64, usize, f64, bool);

/// Ordered substitution data. Entries are applied in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Data {
    entries: Vec<(String, Param)>,
}

impl Data {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry (builder style).
    ///
    /// Re-using a name replaces the earlier value in place, keeping its position.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Param>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Param>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Param> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Param)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Build data from a JSON value. Only objects carry named entries.
    pub fn from_json(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self::from(map)),
            _ => None,
        }
    }
}

impl From<Map<String, Value>> for Data {
    fn from(map: Map<String, Value>) -> Self {
        map.into_iter().collect()
    }
}

impl<K: Into<String>, V: Into<Param>> FromIterator<(K, V)> for Data {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut data = Data::new();
        for (name, value) in iter {
            data.insert(name, value);
        }
        data
    }
}
