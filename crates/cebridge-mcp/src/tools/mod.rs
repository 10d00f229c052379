//! Tool table: which names the gateway answers and how their arguments map
//! onto engine RPC params.
//!
//! Every tool is a pass-through. The table only describes parameter names,
//! types and defaults; one generic routine builds the `params` object.

mod catalog;

pub use catalog::CATALOG;

use cebridge_core::{BridgeError, Result};
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use tracing::debug;

/// JSON type accepted for a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    String,
    /// Address expression (`"0x400000"`, `"game.exe+1F0"`) or plain integer.
    Address,
    Integer,
    Number,
    Boolean,
    IntegerList,
}

impl ParamKind {
    pub fn accepts(self, value: &Value) -> bool {
        match self {
            ParamKind::String => value.is_string(),
            ParamKind::Address => value.is_string() || value.is_i64() || value.is_u64(),
            ParamKind::Integer => value.is_i64() || value.is_u64(),
            ParamKind::Number => value.is_number(),
            ParamKind::Boolean => value.is_boolean(),
            ParamKind::IntegerList => value
                .as_array()
                .is_some_and(|items| items.iter().all(|v| v.is_i64() || v.is_u64())),
        }
    }

    fn describe(self) -> &'static str {
        match self {
            ParamKind::String => "a string",
            ParamKind::Address => "an address string or integer",
            ParamKind::Integer => "an integer",
            ParamKind::Number => "a number",
            ParamKind::Boolean => "a boolean",
            ParamKind::IntegerList => "a list of integers",
        }
    }

    fn schema(self) -> Map<String, Value> {
        let mut schema = Map::new();
        match self {
            ParamKind::String => {
                schema.insert("type".into(), json!("string"));
            }
            ParamKind::Address => {
                schema.insert("type".into(), json!(["string", "integer"]));
            }
            ParamKind::Integer => {
                schema.insert("type".into(), json!("integer"));
            }
            ParamKind::Number => {
                schema.insert("type".into(), json!("number"));
            }
            ParamKind::Boolean => {
                schema.insert("type".into(), json!("boolean"));
            }
            ParamKind::IntegerList => {
                schema.insert("type".into(), json!("array"));
                schema.insert("items".into(), json!({"type": "integer"}));
            }
        }
        schema
    }
}

/// Value used when the caller omits a parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamDefault {
    Required,
    Null,
    Bool(bool),
    Int(i64),
    Str(&'static str),
    IntList(&'static [i64]),
}

impl ParamDefault {
    /// `None` for required parameters.
    pub fn to_value(self) -> Option<Value> {
        match self {
            ParamDefault::Required => None,
            ParamDefault::Null => Some(Value::Null),
            ParamDefault::Bool(b) => Some(json!(b)),
            ParamDefault::Int(i) => Some(json!(i)),
            ParamDefault::Str(s) => Some(json!(s)),
            ParamDefault::IntList(items) => Some(json!(items)),
        }
    }
}

/// One parameter of a tool.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamSpec {
    /// Name the caller uses.
    pub name: &'static str,
    /// Key sent to the engine.
    pub wire: &'static str,
    pub kind: ParamKind,
    pub default: ParamDefault,
    /// An empty list counts as omitted.
    pub empty_is_default: bool,
}

impl ParamSpec {
    pub const fn required(name: &'static str, kind: ParamKind) -> Self {
        Self::optional(name, kind, ParamDefault::Required)
    }

    pub const fn optional(name: &'static str, kind: ParamKind, default: ParamDefault) -> Self {
        Self {
            name,
            wire: name,
            kind,
            default,
            empty_is_default: false,
        }
    }

    /// Send this parameter to the engine under a different key.
    pub const fn sent_as(mut self, wire: &'static str) -> Self {
        self.wire = wire;
        self
    }

    pub const fn empty_is_default(mut self) -> Self {
        self.empty_is_default = true;
        self
    }
}

/// A tool exposed to the caller, forwarded to one engine method.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToolSpec {
    pub name: &'static str,
    /// Engine RPC method; usually the same as `name`.
    pub method: &'static str,
    pub description: &'static str,
    pub params: &'static [ParamSpec],
}

impl ToolSpec {
    pub const fn new(
        name: &'static str,
        description: &'static str,
        params: &'static [ParamSpec],
    ) -> Self {
        Self {
            name,
            method: name,
            description,
            params,
        }
    }

    /// Forward to a differently named engine method.
    pub const fn calls(mut self, method: &'static str) -> Self {
        self.method = method;
        self
    }

    /// Build the engine `params` object from caller arguments.
    ///
    /// `null` arguments count as omitted. Unknown arguments are dropped.
    pub fn build_params(&self, arguments: &Value) -> Result<Value> {
        let empty = Map::new();
        let args = match arguments {
            Value::Object(map) => map,
            Value::Null => &empty,
            _ => {
                return Err(BridgeError::invalid_params(format!(
                    "{}: arguments must be an object",
                    self.name
                )))
            }
        };

        let mut params = Map::new();
        for spec in self.params {
            let provided = args
                .get(spec.name)
                .filter(|v| !v.is_null())
                .filter(|v| !(spec.empty_is_default && v.as_array().is_some_and(Vec::is_empty)));

            let value = match provided {
                Some(v) if spec.kind.accepts(v) => v.clone(),
                Some(_) => {
                    return Err(BridgeError::invalid_params(format!(
                        "{}: parameter '{}' must be {}",
                        self.name,
                        spec.name,
                        spec.kind.describe()
                    )))
                }
                None => spec.default.to_value().ok_or_else(|| {
                    BridgeError::invalid_params(format!(
                        "{}: missing required parameter '{}'",
                        self.name, spec.name
                    ))
                })?,
            };
            params.insert(spec.wire.to_string(), value);
        }

        for key in args.keys() {
            if !self.params.iter().any(|p| p.name == key) {
                debug!("Ignoring unknown argument '{}' for {}", key, self.name);
            }
        }

        Ok(Value::Object(params))
    }

    /// JSON Schema describing the tool's arguments.
    pub fn input_schema(&self) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();

        for spec in self.params {
            let mut schema = spec.kind.schema();
            match spec.default {
                ParamDefault::Required => required.push(json!(spec.name)),
                ParamDefault::Null => {
                    if let Some(ty) = schema.remove("type") {
                        let mut types = match ty {
                            Value::Array(types) => types,
                            other => vec![other],
                        };
                        types.push(json!("null"));
                        schema.insert("type".into(), Value::Array(types));
                    }
                    schema.insert("default".into(), Value::Null);
                }
                other => {
                    if let Some(default) = other.to_value() {
                        schema.insert("default".into(), default);
                    }
                }
            }
            properties.insert(spec.name.to_string(), Value::Object(schema));
        }

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }
}

/// Name-indexed set of tools handed to the dispatcher.
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    tools: Vec<ToolSpec>,
    by_name: HashMap<&'static str, usize>,
}

impl ToolRegistry {
    /// Build a registry. A later spec with the same name replaces an earlier one.
    pub fn new(specs: impl IntoIterator<Item = ToolSpec>) -> Self {
        let mut tools: Vec<ToolSpec> = Vec::new();
        let mut by_name = HashMap::new();
        for spec in specs {
            match by_name.get(spec.name) {
                Some(&index) => tools[index] = spec,
                None => {
                    by_name.insert(spec.name, tools.len());
                    tools.push(spec);
                }
            }
        }
        Self { tools, by_name }
    }

    /// Registry holding the full engine catalog.
    pub fn builtin() -> Self {
        Self::new(CATALOG.iter().copied())
    }

    pub fn get(&self, name: &str) -> Option<&ToolSpec> {
        self.by_name.get(name).and_then(|&index| self.tools.get(index))
    }

    /// Tools in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &ToolSpec> {
        self.tools.iter()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
