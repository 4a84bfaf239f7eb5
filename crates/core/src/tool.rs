//! Tool trait: the abstraction over agent capabilities.
//!
//! Tools are what let the assistant act on the calendar. Each tool carries a
//! name, a description for the model and an input schema; the registry
//! resolves names coming out of model text to exactly one tool or none.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ToolError;
use crate::schema::InputSchema;

/// Static description of a tool, shown to the model and listed by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDescriptor {
    /// The unique tool name
    pub name: String,

    /// Description of what the tool does
    pub description: String,

    /// Fields the tool accepts
    pub input_schema: InputSchema,
}

/// The core Tool trait.
///
/// `invoke` receives arguments that already passed schema validation.
/// Failures of external collaborators should be turned into the returned
/// text by the tool itself; `Err` is for problems with the call.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The unique name of this tool (e.g., "check_calendar_availability").
    fn name(&self) -> &str;

    /// A description of what this tool does (sent to the model).
    fn description(&self) -> &str;

    /// Schema describing this tool's arguments.
    fn input_schema(&self) -> &InputSchema;

    /// Run the tool with validated arguments.
    async fn invoke(&self, arguments: Map<String, Value>) -> Result<String, ToolError>;

    /// Validate raw arguments against the schema, then invoke.
    async fn validate_and_invoke(&self, arguments: &Value) -> Result<String, ToolError> {
        let arguments = self.input_schema().validate(arguments)?;
        self.invoke(arguments).await
    }

    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: self.name().to_string(),
            description: self.description().to_string(),
            input_schema: self.input_schema().clone(),
        }
    }
}

/// A lookup table of the available tools, kept in registration order.
pub struct ToolRegistry {
    tools: Vec<Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// Register a tool. Replaces any existing tool with the same name.
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        match self.tools.iter().position(|t| t.name() == tool.name()) {
            Some(index) => self.tools[index] = tool,
            None => self.tools.push(tool),
        }
    }

    /// Resolve a tool by exact name.
    pub fn lookup(&self, name: &str) -> Option<&dyn Tool> {
        self.tools
            .iter()
            .find(|t| t.name() == name)
            .map(|t| t.as_ref())
    }

    /// Descriptors of all tools, in registration order.
    pub fn descriptors(&self) -> Vec<ToolDescriptor> {
        self.tools.iter().map(|t| t.descriptor()).collect()
    }

    /// List all registered tool names.
    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
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
        Self::new()
    }
}
