//! Request dispatcher module
//!
//! Resolves an [`OperationDescriptor`] against caller input and sends it
//! through a [`Transport`].
//!
//! # Resolution order
//!
//! 1. Path parameters (missing/null/empty, `.` or `..` fails before any I/O)
//! 2. Declared query parameters, then the extra query group (`query_*`)
//! 3. Body: declared fields, then the extra body group (`body_*`), or a
//!    single whole-body field
//! 4. Overrides (pagination parameters)
//!
//! Later writes win on key collisions.

mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use types::{
    PageResult, RequestOverrides, ResolvedRequest, Transport, BODY_EXTRA_PREFIX,
    QUERY_EXTRA_PREFIX,
};

use crate::error::{Error, Result};
use crate::normalize::ResponseNormalizer;
use crate::pagination::{NextPage, Paginator};
use crate::registry::{BodySource, OperationDescriptor, ParamBinding};
use crate::resolve::FieldResolver;
use crate::template;
use crate::types::{is_blank, value_to_string};
use serde_json::{Map, Value};
use std::collections::HashMap;
use tracing::debug;

/// Builds and sends requests for operation descriptors
#[derive(Debug, Clone)]
pub struct Dispatcher<T> {
    transport: T,
}

impl<T: Transport> Dispatcher<T> {
    /// Create a dispatcher over a transport
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// The underlying transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Resolve a descriptor into a concrete request without sending it
    pub fn build_request(
        &self,
        descriptor: &OperationDescriptor,
        resolver: &dyn FieldResolver,
        item_index: usize,
        overrides: &RequestOverrides,
    ) -> Result<ResolvedRequest> {
        let path = resolve_path(descriptor, resolver, item_index)?;

        let mut query = Map::new();
        insert_declared(&mut query, &descriptor.query_params, resolver, item_index);
        if let Some(group) = &descriptor.extra_query_group {
            merge_extras(&mut query, group, QUERY_EXTRA_PREFIX, resolver, item_index)?;
        }
        for (key, value) in &overrides.query {
            query.insert(key.clone(), value.clone());
        }

        let body = if descriptor.method.allows_body() {
            resolve_body(&descriptor.body, resolver, item_index, &overrides.body)?
        } else {
            None
        };

        Ok(ResolvedRequest {
            method: descriptor.method,
            path,
            query,
            body,
        })
    }

    /// Resolve and send exactly one request, returning the raw response
    pub async fn dispatch(
        &self,
        descriptor: &OperationDescriptor,
        resolver: &dyn FieldResolver,
        item_index: usize,
        overrides: &RequestOverrides,
    ) -> Result<Value> {
        let request = self.build_request(descriptor, resolver, item_index, overrides)?;
        self.send(&request).await
    }

    /// Send an already resolved request, wrapping transport failures
    pub async fn send(&self, request: &ResolvedRequest) -> Result<Value> {
        debug!(
            "Dispatching {} query={:?}",
            request.label(),
            request.query
        );
        self.transport
            .send(request)
            .await
            .map_err(|e| Error::api(request.label(), e))
    }

    /// Repeatedly dispatch with paging parameters until the paginator stops
    ///
    /// Records of every page are extracted with `normalizer` and concatenated.
    /// Fails with [`Error::PaginationLimit`] instead of issuing more than
    /// `max_pages` requests.
    pub async fn dispatch_paginated(
        &self,
        descriptor: &OperationDescriptor,
        resolver: &dyn FieldResolver,
        item_index: usize,
        paginator: &dyn Paginator,
        normalizer: &ResponseNormalizer,
        max_pages: u32,
    ) -> Result<PageResult> {
        let mut state = paginator.initial_state();
        let mut overrides = RequestOverrides::with_query(paginator.initial_params(&state));
        let mut result = PageResult::default();

        loop {
            if result.pages >= max_pages {
                return Err(Error::PaginationLimit { max_pages });
            }

            let raw = self
                .dispatch(descriptor, resolver, item_index, &overrides)
                .await?;
            result.pages += 1;

            let records = normalizer.records(raw);
            let count = records.len();
            result.records.extend(records);

            debug!(
                "Page {}: fetched {count} records ({} total)",
                result.pages,
                result.records.len()
            );

            match paginator.process_page(count, &mut state) {
                NextPage::Continue { query_params } => {
                    overrides = RequestOverrides::with_query(query_params);
                }
                NextPage::Done => break,
            }
        }

        Ok(result)
    }
}

/// Resolve every path parameter and substitute it into the template
fn resolve_path(
    descriptor: &OperationDescriptor,
    resolver: &dyn FieldResolver,
    item_index: usize,
) -> Result<String> {
    let mut values = HashMap::new();
    for param in &descriptor.path_params {
        let value = resolver.resolve(&param.field, item_index);
        if is_blank(value.as_ref()) {
            return Err(Error::missing_path_param(&param.name));
        }
        let value = value.map(|v| value_to_string(&v)).unwrap_or_default();
        // URL parsers collapse dot segments, even percent-encoded ones
        if value == "." || value == ".." {
            return Err(Error::invalid_path_param(
                &param.name,
                format!("'{value}' is not a valid path segment"),
            ));
        }
        values.insert(param.name.clone(), value);
    }

    template::render_path(&descriptor.path, &values).map_err(|e| match e {
        // Placeholders are validated against path params, so this only fires
        // for descriptors built without the registry
        Error::UndefinedVariable { variable } => Error::missing_path_param(variable),
        other => other,
    })
}

/// Insert declared parameters that resolved to a non-null value
fn insert_declared(
    target: &mut Map<String, Value>,
    params: &[ParamBinding],
    resolver: &dyn FieldResolver,
    item_index: usize,
) {
    for param in params {
        match resolver.resolve(&param.field, item_index) {
            None | Some(Value::Null) => {}
            Some(value) => {
                target.insert(param.name.clone(), value);
            }
        }
    }
}

/// Merge an extra field group, stripping the key prefix where present
fn merge_extras(
    target: &mut Map<String, Value>,
    group: &str,
    prefix: &str,
    resolver: &dyn FieldResolver,
    item_index: usize,
) -> Result<()> {
    match resolver.resolve(group, item_index) {
        None | Some(Value::Null) => Ok(()),
        Some(Value::Object(extras)) => {
            for (key, value) in extras {
                if value.is_null() {
                    continue;
                }
                let key = key.strip_prefix(prefix).map_or(key.clone(), str::to_string);
                target.insert(key, value);
            }
            Ok(())
        }
        Some(other) => Err(Error::invalid_value(
            group,
            format!("expected an object of extra fields, got {other}"),
        )),
    }
}

/// Build the request body from its declared source
fn resolve_body(
    source: &BodySource,
    resolver: &dyn FieldResolver,
    item_index: usize,
    overrides: &Map<String, Value>,
) -> Result<Option<Value>> {
    match source {
        BodySource::Field { field } => Ok(resolver
            .resolve(field, item_index)
            .filter(|v| !v.is_null())),
        BodySource::Fields {
            params,
            extra_group,
        } => {
            let mut body = Map::new();
            insert_declared(&mut body, params, resolver, item_index);
            if let Some(group) = extra_group {
                merge_extras(&mut body, group, BODY_EXTRA_PREFIX, resolver, item_index)?;
            }
            for (key, value) in overrides {
                body.insert(key.clone(), value.clone());
            }
            Ok((!body.is_empty()).then_some(Value::Object(body)))
        }
    }
}
