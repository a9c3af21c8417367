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

//! Injectors write trace propagation data into the carrier of an outbound
//! call.

use crate::trace::{propagation::carrier::Setter, trace_context::TraceContext};
use std::sync::Arc;

/// Header of the single-line B3 propagation format.
pub static B3_SINGLE_HEADER_KEY: &str = "b3";

/// Writes propagation data of a [TraceContext] into a carrier of type `C`.
pub trait Injector<C: ?Sized> {
    /// Inject the context into the carrier.
    fn inject(&self, context: &TraceContext, carrier: &mut C);
}

impl<C: ?Sized, T: Injector<C> + ?Sized> Injector<C> for &T {
    fn inject(&self, context: &TraceContext, carrier: &mut C) {
        (**self).inject(context, carrier)
    }
}

impl<C: ?Sized, T: Injector<C> + ?Sized> Injector<C> for Box<T> {
    fn inject(&self, context: &TraceContext, carrier: &mut C) {
        (**self).inject(context, carrier)
    }
}

impl<C: ?Sized, T: Injector<C> + ?Sized> Injector<C> for Arc<T> {
    fn inject(&self, context: &TraceContext, carrier: &mut C) {
        (**self).inject(context, carrier)
    }
}

/// Noop injector.
impl<C: ?Sized> Injector<C> for () {
    fn inject(&self, _context: &TraceContext, _carrier: &mut C) {}
}

/// Primary propagation in the single header B3 format:
/// `{trace_id}-{span_id}[-{sampled}[-{parent_span_id}]]`.
#[derive(Debug, Clone)]
pub struct B3SingleInjector<S> {
    setter: S,
}

impl<S> B3SingleInjector<S> {
    /// New with the setter used to write the `b3` header.
    pub fn new(setter: S) -> Self {
        Self { setter }
    }
}

impl<C: ?Sized, S: Setter<C>> Injector<C> for B3SingleInjector<S> {
    fn inject(&self, context: &TraceContext, carrier: &mut C) {
        self.setter
            .put(carrier, B3_SINGLE_HEADER_KEY, encode_b3_single(context));
    }
}

/// Encode the context in the single header B3 format. The parent span id is
/// only written after a sampling flag.
pub fn encode_b3_single(context: &TraceContext) -> String {
    let mut res = format!("{}-{}", context.trace_id_string(), context.span_id_string());
    if let Some(sampled) = context.sampled() {
        res += if sampled { "-1" } else { "-0" };
        if let Some(parent_span_id) = context.parent_span_id_string() {
            res += "-";
            res += &parent_span_id;
        }
    }
    res
}
