//! CLI runner - executes commands

use crate::builtin;
use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::{load_user_config, RuntimeConfig};
use crate::engine::{
    ExecutionOutput, Executor, FULL_RESPONSE_FIELD, LIMIT_FIELD, OFFSET_FIELD, RETURN_ALL_FIELD,
};
use crate::error::{Error, Result};
use crate::loader::{load_api, ApiDefinition};
use crate::resolve::ItemResolver;
use crate::types::ErrorMode;
use serde_json::{json, Map, Value};
use std::fs;
use std::path::Path;
use tracing::info;

/// Options of the `run` command
#[derive(Debug)]
struct RunOptions<'a> {
    input_json: Option<&'a str>,
    input: Option<&'a Path>,
    return_all: bool,
    limit: Option<u32>,
    offset: Option<u64>,
    full_response: bool,
    continue_on_error: bool,
    base_url: Option<&'a str>,
}

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::List => self.list(),
            Commands::Describe {
                resource,
                operation,
            } => self.describe(resource, operation),
            Commands::Validate => self.validate(),
            Commands::Builtins => self.builtins(),
            Commands::Run {
                resource,
                operation,
                input_json,
                input,
                return_all,
                limit,
                offset,
                full_response,
                continue_on_error,
                base_url,
            } => {
                let options = RunOptions {
                    input_json: input_json.as_deref(),
                    input: input.as_deref(),
                    return_all: *return_all,
                    limit: *limit,
                    offset: *offset,
                    full_response: *full_response,
                    continue_on_error: *continue_on_error,
                    base_url: base_url.as_deref(),
                };
                self.run_operation(resource, operation, &options).await
            }
        }
    }

    /// Load the API definition
    fn load_api(&self) -> Result<ApiDefinition> {
        let name = self
            .cli
            .api
            .as_deref()
            .ok_or_else(|| Error::config("No API specified. Use --api <name or path>"))?;
        load_api(name)
    }

    /// List resources and operations
    fn list(&self) -> Result<()> {
        let api = self.load_api()?;

        let resources: Map<String, Value> = api
            .resources
            .iter()
            .map(|(resource, operations)| {
                let ops: Vec<Value> = operations
                    .iter()
                    .map(|(name, op)| {
                        json!({
                            "operation": name,
                            "method": op.method.to_uppercase(),
                            "path": op.path,
                            "pagination": op.pagination,
                            "description": op.description,
                        })
                    })
                    .collect();
                (resource.clone(), Value::Array(ops))
            })
            .collect();

        self.output_message(&json!({
            "api": api.name,
            "version": api.version,
            "resources": resources,
        }));
        Ok(())
    }

    /// Print one descriptor
    fn describe(&self, resource: &str, operation: &str) -> Result<()> {
        let api = self.load_api()?;
        let registry = api.to_registry()?;
        let descriptor = registry.get(resource, operation)?;
        let description = api
            .operation(resource, operation)
            .and_then(|op| op.description.clone());

        self.output_message(&json!({
            "resource": resource,
            "operation": operation,
            "description": description,
            "descriptor": descriptor,
        }));
        Ok(())
    }

    /// Validate the API definition
    fn validate(&self) -> Result<()> {
        let api = self.load_api()?;
        let registry = api.to_registry()?;

        self.output_message(&json!({
            "valid": true,
            "message": format!(
                "API '{}' v{} is valid with {} resources and {} operations",
                api.name,
                api.version,
                registry.resources().len(),
                registry.len()
            )
        }));
        Ok(())
    }

    /// List built-in definitions
    fn builtins(&self) -> Result<()> {
        let apis = builtin::list_builtin()
            .into_iter()
            .map(|name| {
                let api = load_api(name)?;
                Ok(json!({
                    "name": api.name,
                    "version": api.version,
                    "description": api.description,
                    "base_url": api.base_url,
                    "operations": api.operation_count(),
                }))
            })
            .collect::<Result<Vec<Value>>>()?;

        self.output_message(&json!({ "builtins": apis }));
        Ok(())
    }

    /// Execute an operation over the input items
    async fn run_operation(
        &self,
        resource: &str,
        operation: &str,
        options: &RunOptions<'_>,
    ) -> Result<()> {
        let api = self.load_api()?;
        let registry = api.to_registry()?;
        let user_config = load_user_config(self.cli.config.as_deref(), self.cli.config_json.as_deref())?;

        let mut runtime = RuntimeConfig::from_definition(&api, &user_config)?;
        if let Some(url) = options.base_url {
            runtime = runtime.with_base_url(url);
        }
        if options.continue_on_error {
            runtime.executor.error_mode = ErrorMode::Continue;
        }

        let items = match (options.input_json, options.input) {
            (Some(inline), _) => parse_input(inline)?,
            (None, Some(path)) => {
                let content = fs::read_to_string(path).map_err(|e| {
                    Error::config(format!("Failed to read input '{}': {e}", path.display()))
                })?;
                parse_input(&content)?
            }
            (None, None) => vec![json!({})],
        };
        let resolver = ItemResolver::new(items).with_defaults(item_defaults(options));

        info!(
            "Running {}.{} against {} ({} items)",
            resource,
            operation,
            api.name,
            resolver.items().len()
        );

        let client = runtime.build_client()?;
        let executor = Executor::new(registry, client).with_config(runtime.executor);
        let output = executor.execute(resource, operation, &resolver).await?;

        self.output_records(&output);
        check_failures(&output)
    }

    /// Write records to stdout and failures to stderr
    fn output_records(&self, output: &ExecutionOutput) {
        match self.cli.format {
            OutputFormat::Json => {
                for record in &output.records {
                    println!("{}", serde_json::to_string(record).unwrap_or_default());
                }
            }
            OutputFormat::Pretty => {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&output.records).unwrap_or_default()
                );
            }
        }

        for failure in &output.failures {
            eprintln!(
                "{}",
                serde_json::to_string(&failure.to_json()).unwrap_or_default()
            );
        }
    }

    /// Output a message
    fn output_message(&self, msg: &Value) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(msg).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
            }
        }
    }
}

/// Shared item options taken from CLI flags
fn item_defaults(options: &RunOptions<'_>) -> Value {
    let mut defaults = Map::new();
    if options.return_all {
        defaults.insert(RETURN_ALL_FIELD.to_string(), Value::Bool(true));
    }
    if let Some(limit) = options.limit {
        defaults.insert(LIMIT_FIELD.to_string(), json!(limit));
    }
    if let Some(offset) = options.offset {
        defaults.insert(OFFSET_FIELD.to_string(), json!(offset));
    }
    if options.full_response {
        defaults.insert(FULL_RESPONSE_FIELD.to_string(), Value::Bool(true));
    }
    Value::Object(defaults)
}

/// Fail the run when any item failed, after its output was written
pub fn check_failures(output: &ExecutionOutput) -> Result<()> {
    if output.is_success() {
        return Ok(());
    }
    Err(Error::ItemsFailed {
        failed: output.failures.len(),
        total: output.stats.items_succeeded + output.stats.items_failed,
    })
}

/// Parse input items
///
/// Accepts one JSON object, a JSON array of objects, or JSON lines.
pub fn parse_input(content: &str) -> Result<Vec<Value>> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    let items = match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::Array(items)) => items,
        Ok(item) => vec![item],
        // Not a single document, try JSON lines
        Err(_) => trimmed
            .lines()
            .enumerate()
            .map(|(n, line)| (n, line.trim()))
            .filter(|(_, line)| !line.is_empty())
            .map(|(n, line)| {
                serde_json::from_str(line).map_err(|e| {
                    Error::config(format!("Invalid input JSON on line {}: {e}", n + 1))
                })
            })
            .collect::<Result<Vec<Value>>>()?,
    };

    if let Some(index) = items.iter().position(|item| !item.is_object()) {
        return Err(Error::invalid_value(
            "input",
            format!("item {index} is not a JSON object"),
        ));
    }
    Ok(items)
}
