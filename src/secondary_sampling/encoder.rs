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

//! Secondary sampling encoder.

use crate::{
    secondary_sampling::state::{Extra, SPAN_ID_PARAMETER, SecondarySamplingState},
    trace::{
        propagation::{carrier::Setter, injector::Injector},
        trace_context::TraceContext,
    },
};

/// Writes the secondary sampling header after the primary propagation fields,
/// with an updated `spanId` parameter for each key sampled at this hop. A
/// collector can use that span id to correct the parent hierarchy of the key.
#[derive(Debug, Clone)]
pub struct SecondarySamplingInjector<D, S> {
    delegate: D,
    setter: S,
    field_name: String,
}

impl<D, S> SecondarySamplingInjector<D, S> {
    /// Wrap the primary injector `delegate`. The header is written by `setter`
    /// under `field_name`.
    pub fn new(delegate: D, setter: S, field_name: impl Into<String>) -> Self {
        Self {
            delegate,
            setter,
            field_name: field_name.into(),
        }
    }

    /// Name of the written header.
    #[inline]
    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    /// Get the primary injector.
    #[inline]
    pub fn delegate(&self) -> &D {
        &self.delegate
    }
}

impl<C, D, S> Injector<C> for SecondarySamplingInjector<D, S>
where
    C: ?Sized,
    D: Injector<C>,
    S: Setter<C>,
{
    fn inject(&self, context: &TraceContext, carrier: &mut C) {
        self.delegate.inject(context, carrier);

        let Some(extra) = context.find_extra::<Extra>().filter(|extra| !extra.is_empty()) else {
            tracing::trace!(field = %self.field_name, "no secondary sampling state, skipping");
            return;
        };

        let value = serialize_with_span_id(extra, &context.span_id_string());
        if value.is_empty() {
            tracing::trace!(field = %self.field_name, "only empty sampling keys, skipping");
            return;
        }
        tracing::trace!(field = %self.field_name, %value, "inject secondary sampling");
        self.setter.put(carrier, &self.field_name, value);
    }
}

/// Encode all states of `extra`, using `span_id` as the span id of this hop.
/// States with an empty sampling key are skipped.
pub fn serialize_with_span_id(extra: &Extra, span_id: &str) -> String {
    let mut res = String::new();
    for state in extra.iter() {
        if state.sampling_key().is_empty() {
            continue;
        }
        if !res.is_empty() {
            res.push(',');
        }
        serialize_state(&mut res, state, span_id);
    }
    res
}

fn serialize_state(res: &mut String, state: &SecondarySamplingState, span_id: &str) {
    res.push_str(state.sampling_key());

    for (key, value) in state.parameters() {
        if key == SPAN_ID_PARAMETER {
            continue;
        }
        res.push(';');
        res.push_str(key);
        res.push('=');
        res.push_str(value);
    }

    // A key sampled here gets this hop's span id, otherwise the upstream one
    // passes through.
    let span_id = if state.sampled() {
        Some(span_id)
    } else {
        state.upstream_span_id()
    };
    if let Some(span_id) = span_id {
        res.push(';');
        res.push_str(SPAN_ID_PARAMETER);
        res.push('=');
        res.push_str(span_id);
    }
}
