// Licensed to the Apache Software Foundation (ASF) under one or more
// contributor license agreements.  See the NOTICE file distributed with
// this work for additional information regarding copyright ownership.
// The ASF licenses this file to You under the Apache License, Version 2.0
// (the "License"); you may not use this file except in compliance with
// the License.  You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

//! TraceContext identifies one span of a trace, and carries the typed side
//! data (extensions) that travels with it across process boundaries.

use crate::{
    common::random_generator::RandomGenerator,
    error::{Error, Result},
};
use std::{any::Any, fmt::Formatter, sync::Arc};

/// Typed side data which can be attached to a [TraceContext].
///
/// Each extension type declares a kind identifier. A context holds at most one
/// value per kind.
pub trait Extension: Any + Send + Sync {
    /// Identifier of this extension kind in the context's registry. Must be
    /// unique among extension types, two types sharing a kind overwrite each
    /// other (debug builds panic on it).
    const KIND: &'static str;
}

type ExtensionValue = Arc<dyn Any + Send + Sync>;

/// Registry of extensions keyed by [Extension::KIND].
#[derive(Clone, Default)]
pub struct Extensions {
    entries: Vec<(&'static str, ExtensionValue)>,
}

impl Extensions {
    /// Attach an extension, replacing any previous value of the same kind.
    pub fn insert<T: Extension>(&mut self, value: T) {
        let value: ExtensionValue = Arc::new(value);
        match self.entries.iter_mut().find(|(kind, _)| *kind == T::KIND) {
            Some(entry) => {
                debug_assert!(
                    entry.1.is::<T>(),
                    "extension kind `{}` is declared by two types",
                    T::KIND
                );
                entry.1 = value
            }
            None => self.entries.push((T::KIND, value)),
        }
    }

    /// Find the extension of kind `T`.
    pub fn get<T: Extension>(&self) -> Option<&T> {
        self.entries
            .iter()
            .find(|(kind, _)| *kind == T::KIND)
            .and_then(|(_, value)| {
                debug_assert!(
                    value.is::<T>(),
                    "extension kind `{}` is declared by two types",
                    T::KIND
                );
                value.downcast_ref::<T>()
            })
    }

    /// Number of attached extensions.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no extension is attached.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for Extensions {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|(kind, _)| kind))
            .finish()
    }
}

/// Identifiers and extensions of the current span.
///
/// Ids are immutable once assigned. Extensions are shared with child contexts
/// and never mutated after being attached.
#[derive(Clone)]
pub struct TraceContext {
    trace_id: u128,
    span_id: u64,
    parent_span_id: Option<u64>,
    sampled: Option<bool>,
    extensions: Extensions,
}

impl std::fmt::Debug for TraceContext {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TraceContext")
            .field("trace_id", &self.trace_id_string())
            .field("span_id", &self.span_id_string())
            .field("parent_span_id", &self.parent_span_id_string())
            .field("sampled", &self.sampled)
            .field("extensions", &self.extensions)
            .finish()
    }
}

impl TraceContext {
    /// New context with the given ids, no parent and a deferred sampling
    /// decision.
    pub fn new(trace_id: u128, span_id: u64) -> Self {
        Self {
            trace_id,
            span_id,
            parent_span_id: None,
            sampled: None,
            extensions: Default::default(),
        }
    }

    /// New context starting a trace, with random ids.
    pub fn new_root() -> Self {
        Self::new(RandomGenerator::trace_id(), RandomGenerator::span_id())
    }

    /// Parse a context from hex encoded ids, such as those read from a `b3`
    /// header.
    pub fn from_hex(trace_id: &str, span_id: &str) -> Result<Self> {
        let trace_id = parse_hex(trace_id, 32)
            .and_then(|id| u128::from_str_radix(id, 16).ok())
            .filter(|id| *id != 0)
            .ok_or_else(|| Error::InvalidTraceId(trace_id.to_owned()))?;
        let span_id = parse_hex(span_id, 16)
            .and_then(|id| u64::from_str_radix(id, 16).ok())
            .filter(|id| *id != 0)
            .ok_or_else(|| Error::InvalidSpanId(span_id.to_owned()))?;
        Ok(Self::new(trace_id, span_id))
    }

    /// Create the context of a child span. The trace id, sampling decision and
    /// extensions are kept, the current span becomes the parent.
    pub fn child(&self) -> Self {
        let mut span_id = RandomGenerator::span_id();
        while span_id == self.span_id {
            span_id = RandomGenerator::span_id();
        }
        Self {
            trace_id: self.trace_id,
            span_id,
            parent_span_id: Some(self.span_id),
            sampled: self.sampled,
            extensions: self.extensions.clone(),
        }
    }

    /// Set the parent span id.
    pub fn with_parent_span_id(mut self, parent_span_id: u64) -> Self {
        self.parent_span_id = Some(parent_span_id);
        self
    }

    /// Set the primary sampling decision.
    pub fn with_sampled(mut self, sampled: bool) -> Self {
        self.sampled = Some(sampled);
        self
    }

    /// Attach an extension.
    pub fn with_extra<T: Extension>(mut self, extra: T) -> Self {
        self.extensions.insert(extra);
        self
    }

    /// Get trace id.
    #[inline]
    pub fn trace_id(&self) -> u128 {
        self.trace_id
    }

    /// Get span id.
    #[inline]
    pub fn span_id(&self) -> u64 {
        self.span_id
    }

    /// Get parent span id.
    #[inline]
    pub fn parent_span_id(&self) -> Option<u64> {
        self.parent_span_id
    }

    /// Primary sampling decision, `None` when deferred.
    #[inline]
    pub fn sampled(&self) -> Option<bool> {
        self.sampled
    }

    /// Trace id as 32 lowercase hex digits.
    pub fn trace_id_string(&self) -> String {
        format!("{:032x}", self.trace_id)
    }

    /// Span id as 16 lowercase hex digits.
    pub fn span_id_string(&self) -> String {
        format!("{:016x}", self.span_id)
    }

    /// Parent span id as 16 lowercase hex digits.
    pub fn parent_span_id_string(&self) -> Option<String> {
        self.parent_span_id.map(|id| format!("{:016x}", id))
    }

    /// Find the attached extension of kind `T`.
    #[inline]
    pub fn find_extra<T: Extension>(&self) -> Option<&T> {
        self.extensions.get::<T>()
    }

    /// All attached extensions.
    #[inline]
    pub fn extensions(&self) -> &Extensions {
        &self.extensions
    }
}

fn parse_hex(id: &str, max_len: usize) -> Option<&str> {
    (!id.is_empty() && id.len() <= max_len && id.bytes().all(|b| b.is_ascii_hexdigit()))
        .then_some(id)
}
