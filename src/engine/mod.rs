//! Execution engine module
//!
//! The per-item executor loop.
//!
//! # Overview
//!
//! For every input item the executor:
//! 1. Resolves the item's options (`return_all`, `limit`, `full_response`)
//! 2. Either paginates to the end or sends one bounded request
//! 3. Normalizes the response into records
//!
//! Items run sequentially in input order. A failing item aborts the batch
//! unless the executor runs in [`ErrorMode::Continue`].

mod types;

pub use types::{
    ExecutionOutput, ExecutionStats, ExecutorConfig, ItemFailure, ItemOptions,
    FULL_RESPONSE_FIELD, LIMIT_FIELD, OFFSET_FIELD, RETURN_ALL_FIELD,
};

use crate::dispatch::{Dispatcher, RequestOverrides, Transport};
use crate::error::Result;
use crate::normalize::ResponseNormalizer;
use crate::pagination::paginator_for;
use crate::registry::{OperationDescriptor, OperationRegistry};
use crate::resolve::FieldResolver;
use crate::types::ErrorMode;
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Executes registry operations over a batch of input items
pub struct Executor<T> {
    registry: OperationRegistry,
    dispatcher: Dispatcher<T>,
    config: ExecutorConfig,
}

impl<T: Transport> Executor<T> {
    /// Create a new executor
    pub fn new(registry: OperationRegistry, transport: T) -> Self {
        Self {
            registry,
            dispatcher: Dispatcher::new(transport),
            config: ExecutorConfig::default(),
        }
    }

    /// Set executor configuration
    #[must_use]
    pub fn with_config(mut self, config: ExecutorConfig) -> Self {
        self.config = config;
        self
    }

    /// Get the registry
    pub fn registry(&self) -> &OperationRegistry {
        &self.registry
    }

    /// Get the dispatcher
    pub fn dispatcher(&self) -> &Dispatcher<T> {
        &self.dispatcher
    }

    /// Get the configuration
    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Run `resource.operation` once per input item
    ///
    /// An unknown operation fails before any item runs, whatever the error
    /// mode.
    pub async fn execute(
        &self,
        resource: &str,
        operation: &str,
        resolver: &dyn FieldResolver,
    ) -> Result<ExecutionOutput> {
        let start = Instant::now();
        let descriptor = self.registry.get(resource, operation)?;
        let mut output = ExecutionOutput::default();

        for item in 0..resolver.item_count() {
            match self.execute_item(descriptor, resolver, item).await {
                Ok((records, requests)) => {
                    output.stats.add_requests(requests);
                    output.stats.add_item(records.len());
                    output.records.extend(records);
                }
                Err(error) => match self.config.error_mode {
                    ErrorMode::Abort => return Err(error),
                    ErrorMode::Continue => {
                        warn!("{resource}.{operation}: item {item} failed: {error}");
                        output.stats.add_failure();
                        output.failures.push(ItemFailure { item, error });
                    }
                },
            }
        }

        output.stats.set_duration(start.elapsed().as_millis() as u64);
        info!(
            "{resource}.{operation}: {} records from {} items ({} failed, {} requests) in {}ms",
            output.stats.records,
            output.stats.items_succeeded,
            output.stats.items_failed,
            output.stats.requests,
            output.stats.duration_ms
        );

        Ok(output)
    }

    /// Run one item, returning its records and the number of requests sent
    async fn execute_item(
        &self,
        descriptor: &OperationDescriptor,
        resolver: &dyn FieldResolver,
        item: usize,
    ) -> Result<(Vec<Value>, usize)> {
        let options = ItemOptions::resolve(resolver, item)?;
        let normalizer = ResponseNormalizer::with_collection_key(&self.config.collection_key)
            .full_response(options.full_response);

        if options.return_all && descriptor.supports_pagination() {
            let page_size = descriptor.page_size.unwrap_or(self.config.page_size);
            let paginator = paginator_for(descriptor.pagination, page_size, options.offset);
            debug!("Item {item}: paginating with page size {page_size}");

            let result = self
                .dispatcher
                .dispatch_paginated(
                    descriptor,
                    resolver,
                    item,
                    paginator.as_ref(),
                    &normalizer,
                    self.config.max_pages,
                )
                .await?;
            return Ok((result.records, result.pages as usize));
        }

        let mut overrides = RequestOverrides::new();
        if !options.return_all && descriptor.supports_pagination() {
            if let Some(param) = descriptor.pagination.size_param() {
                overrides = overrides.query(param, options.limit);
            }
        }

        let raw = self
            .dispatcher
            .dispatch(descriptor, resolver, item, &overrides)
            .await?;
        Ok((normalizer.normalize(raw), 1))
    }
}

impl<T> std::fmt::Debug for Executor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Executor")
            .field("operations", &self.registry.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
