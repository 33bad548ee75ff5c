use super::{LogicOperator, Operands};
use crate::error::{GraphEvaluationError, OperatorValidationError};
use crate::node::{NodeDefinition, NodeKind};
use crate::value::Value;
use ahash::AHashMap;
use jsonschema::Validator;
use log::{debug, trace, warn};
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

/// Default number of schema texts a [`SchemaCache`] remembers.
pub const DEFAULT_SCHEMA_CAPACITY: usize = 256;

type Compiled = Result<Arc<Validator>, String>;

/// Compiled JSON schemas keyed by their source text.
///
/// Shared by every pass of an evaluator, so a schema is compiled once no
/// matter how many graphs or threads use it. Texts that fail to compile are
/// remembered too, with their error. Once `capacity` texts are held, an
/// arbitrary entry is evicted for each new one.
pub struct SchemaCache {
    compiled: RwLock<AHashMap<String, Compiled>>,
    capacity: usize,
}

impl Default for SchemaCache {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_SCHEMA_CAPACITY)
    }
}

impl SchemaCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            compiled: RwLock::new(AHashMap::new()),
            capacity: capacity.max(1),
        }
    }

    /// Parses and compiles a schema without caching it.
    pub fn compile(text: &str) -> Result<Validator, String> {
        let schema: serde_json::Value =
            serde_json::from_str(text).map_err(|e| format!("schema is not valid JSON: {}", e))?;
        jsonschema::validator_for(&schema).map_err(|e| format!("schema does not compile: {}", e))
    }

    pub fn get_or_compile(&self, text: &str) -> Result<Arc<Validator>, String> {
        if let Some(entry) = self
            .compiled
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(text)
        {
            return entry.clone();
        }

        let entry = Self::compile(text).map(Arc::new);
        trace!(
            "Compiled schema of {} bytes ({})",
            text.len(),
            if entry.is_ok() { "ok" } else { "failed" }
        );
        let mut compiled = self
            .compiled
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if compiled.len() >= self.capacity && !compiled.contains_key(text) {
            if let Some(evicted) = compiled.keys().next().cloned() {
                debug!("Schema cache full ({}), evicting one entry", self.capacity);
                compiled.remove(&evicted);
            }
        }
        compiled.entry(text.to_string()).or_insert(entry).clone()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.compiled
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for SchemaCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaCache")
            .field("schemas", &self.len())
            .finish()
    }
}

pub(super) fn matches_schema(operands: &Operands<'_>) -> Result<Value, GraphEvaluationError> {
    let node_id = operands.node().id;
    let Some(document) = operands.value(0) else {
        return Ok(Value::Bool(false));
    };
    let text = match operands.value(1) {
        Some(Value::String(text)) => text,
        other => {
            return Err(GraphEvaluationError::TypeMismatch {
                node_id,
                expected: "a JSON schema string".to_string(),
                found: other.map_or("nothing".to_string(), |v| v.value_type().to_string()),
            });
        }
    };

    let validator = operands.schemas().get_or_compile(text).map_err(|message| {
        warn!("Node {}: {}", node_id, message);
        GraphEvaluationError::ExecutionFailed { node_id, message }
    })?;
    Ok(Value::Bool(validator.is_valid(&document.to_json())))
}

/// Compiles a literal schema input up front so a broken schema fails
/// validation instead of the first pass.
pub(super) fn validate_schema_input(
    node: &NodeDefinition,
    inputs: &[&NodeDefinition],
) -> Result<(), OperatorValidationError> {
    let text = match inputs.get(1).map(|input| &input.kind) {
        Some(NodeKind::Schema { schema }) => schema.as_str(),
        Some(NodeKind::Constant {
            value: Value::String(schema),
        }) => schema.as_str(),
        _ => return Ok(()),
    };
    SchemaCache::compile(text)
        .map(|_| ())
        .map_err(|message| OperatorValidationError::InvalidInput {
            node_id: node.id,
            operator: LogicOperator::MatchesSchema,
            index: 1,
            message,
        })
}
