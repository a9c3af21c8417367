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

//! Secondary sampling: per-key sampling decisions propagated alongside the
//! primary trace context, each with its own span id lineage.
//!
//! [SecondarySampling] is the entry point. It fixes the header name and hands
//! out an injector and an extractor which agree on it.

pub mod decoder;
pub mod encoder;
pub mod state;

pub use decoder::{SecondarySamplingExtractor, decode_secondary_sampling};
pub use encoder::{SecondarySamplingInjector, serialize_with_span_id};
pub use state::{Extra, SecondarySamplingState};

use serde::{Deserialize, Serialize};

/// Default name of the secondary sampling header.
pub static SECONDARY_SAMPLING_HEADER_KEY: &str = "sampling";

/// Serializable configuration of [SecondarySampling].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecondarySamplingConfig {
    /// Name of the header carrying secondary sampling states.
    pub field_name: String,
}

impl Default for SecondarySamplingConfig {
    fn default() -> Self {
        Self {
            field_name: SECONDARY_SAMPLING_HEADER_KEY.to_owned(),
        }
    }
}

/// Secondary sampling propagation.
#[derive(Debug, Clone)]
pub struct SecondarySampling {
    field_name: String,
}

impl SecondarySampling {
    /// New builder, with header name `sampling`.
    #[inline]
    pub fn builder() -> SecondarySamplingBuilder {
        Default::default()
    }

    /// Get header name.
    #[inline]
    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    /// Wrap the primary injector `delegate`, so that secondary sampling states
    /// are written after it by `setter`.
    pub fn injector<D, S>(&self, delegate: D, setter: S) -> SecondarySamplingInjector<D, S> {
        SecondarySamplingInjector::new(delegate, setter, self.field_name.clone())
    }

    /// New extractor reading secondary sampling states with `getter`.
    pub fn extractor<G>(&self, getter: G) -> SecondarySamplingExtractor<G> {
        SecondarySamplingExtractor::new(getter, self.field_name.clone())
    }
}

impl From<SecondarySamplingConfig> for SecondarySampling {
    fn from(config: SecondarySamplingConfig) -> Self {
        SecondarySampling::builder()
            .field_name(config.field_name)
            .build()
    }
}

impl Default for SecondarySampling {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Builder of [SecondarySampling].
#[derive(Debug, Clone)]
pub struct SecondarySamplingBuilder {
    field_name: String,
}

impl Default for SecondarySamplingBuilder {
    fn default() -> Self {
        Self {
            field_name: SECONDARY_SAMPLING_HEADER_KEY.to_owned(),
        }
    }
}

impl SecondarySamplingBuilder {
    /// Set the header name. Header names are case insensitive, so it is
    /// stored lowercase.
    pub fn field_name(mut self, field_name: impl Into<String>) -> Self {
        self.field_name = field_name.into().to_lowercase();
        self
    }

    /// Build.
    pub fn build(self) -> SecondarySampling {
        SecondarySampling {
            field_name: self.field_name,
        }
    }
}
