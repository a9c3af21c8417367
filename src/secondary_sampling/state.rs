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

//! Secondary sampling states, and the [Extra] collection attached to a trace
//! context.

use crate::{
    error::{Error, Result},
    trace::trace_context::Extension,
};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

/// Name of the parameter carrying the span id last sampled under a key.
pub static SPAN_ID_PARAMETER: &str = "spanId";

/// The sampling decision and parameters of one secondary sampling key.
///
/// A state with an empty sampling key can't be written to a header, the
/// encoder skips it. Use [SecondarySamplingState::try_new] to reject it up
/// front.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecondarySamplingState {
    #[serde(deserialize_with = "deserialize_sampling_key")]
    sampling_key: String,
    #[serde(default)]
    sampled: bool,
    #[serde(default)]
    parameters: IndexMap<String, String>,
}

impl SecondarySamplingState {
    /// New unsampled state without parameters.
    pub fn new(sampling_key: impl Into<String>) -> Self {
        Self {
            sampling_key: sampling_key.into(),
            sampled: false,
            parameters: IndexMap::new(),
        }
    }

    /// New unsampled state, failing if the sampling key is empty.
    pub fn try_new(sampling_key: impl Into<String>) -> Result<Self> {
        let sampling_key = sampling_key.into();
        if sampling_key.is_empty() {
            return Err(Error::EmptySamplingKey {
                entry: sampling_key,
            });
        }
        Ok(Self::new(sampling_key))
    }

    /// Set whether this hop samples under the key.
    pub fn with_sampled(mut self, sampled: bool) -> Self {
        self.sampled = sampled;
        self
    }

    /// Append a parameter.
    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.put_parameter(key, value);
        self
    }

    /// Get sampling key.
    #[inline]
    pub fn sampling_key(&self) -> &str {
        &self.sampling_key
    }

    /// Whether this hop samples under the key.
    #[inline]
    pub fn sampled(&self) -> bool {
        self.sampled
    }

    /// Set the sampling decision of this hop.
    #[inline]
    pub fn set_sampled(&mut self, sampled: bool) {
        self.sampled = sampled;
    }

    /// Get a parameter by name.
    pub fn parameter(&self, key: &str) -> Option<&str> {
        self.parameters.get(key).map(String::as_str)
    }

    /// Parameters in insertion order.
    pub fn parameters(&self) -> impl Iterator<Item = (&str, &str)> {
        self.parameters
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Put a parameter. An existing parameter keeps its position.
    pub fn put_parameter(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.parameters.insert(key.into(), value.into());
    }

    /// Remove a parameter, keeping the order of the others.
    pub fn remove_parameter(&mut self, key: &str) -> Option<String> {
        self.parameters.shift_remove(key)
    }

    /// Span id propagated from upstream under this key, if any.
    #[inline]
    pub fn upstream_span_id(&self) -> Option<&str> {
        self.parameter(SPAN_ID_PARAMETER)
    }
}

fn deserialize_sampling_key<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<String, D::Error> {
    let sampling_key = String::deserialize(deserializer)?;
    if sampling_key.is_empty() {
        return Err(serde::de::Error::custom("sampling key must not be empty"));
    }
    Ok(sampling_key)
}

/// Secondary sampling states of one trace, keyed by sampling key, in
/// insertion order.
///
/// Attach it to a trace context with
/// [TraceContext::with_extra](crate::trace::trace_context::TraceContext::with_extra).
///
/// Building from an iterator lets later states replace earlier ones with the
/// same key. Deserializing rejects duplicate keys instead, as decoding a
/// header does.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StateList", into = "Vec<SecondarySamplingState>")]
pub struct Extra {
    states: IndexMap<String, SecondarySamplingState>,
}

impl Extension for Extra {
    const KIND: &'static str = "secondary_sampling";
}

impl Extra {
    /// New empty collection.
    #[inline]
    pub fn new() -> Self {
        Default::default()
    }

    /// Insert a state. A state replacing one with the same key keeps its
    /// position, and the replaced state is returned.
    pub fn insert(&mut self, state: SecondarySamplingState) -> Option<SecondarySamplingState> {
        self.states.insert(state.sampling_key.clone(), state)
    }

    /// Get the state of a sampling key.
    pub fn get(&self, sampling_key: &str) -> Option<&SecondarySamplingState> {
        self.states.get(sampling_key)
    }

    /// Get the mutable state of a sampling key.
    pub fn get_mut(&mut self, sampling_key: &str) -> Option<&mut SecondarySamplingState> {
        self.states.get_mut(sampling_key)
    }

    /// Remove the state of a sampling key, keeping the order of the others.
    pub fn remove(&mut self, sampling_key: &str) -> Option<SecondarySamplingState> {
        self.states.shift_remove(sampling_key)
    }

    /// Set the sampling decision of a key. Returns `false` if the key is
    /// unknown.
    pub fn set_sampled(&mut self, sampling_key: &str, sampled: bool) -> bool {
        match self.get_mut(sampling_key) {
            Some(state) => {
                state.set_sampled(sampled);
                true
            }
            None => false,
        }
    }

    /// Number of states.
    #[inline]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Whether there is no state.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// States in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &SecondarySamplingState> {
        self.states.values()
    }
}

impl FromIterator<SecondarySamplingState> for Extra {
    fn from_iter<I: IntoIterator<Item = SecondarySamplingState>>(iter: I) -> Self {
        let mut extra = Extra::new();
        for state in iter {
            extra.insert(state);
        }
        extra
    }
}

impl From<Vec<SecondarySamplingState>> for Extra {
    fn from(states: Vec<SecondarySamplingState>) -> Self {
        states.into_iter().collect()
    }
}

#[derive(Deserialize)]
#[serde(transparent)]
struct StateList(Vec<SecondarySamplingState>);

impl TryFrom<StateList> for Extra {
    type Error = Error;

    fn try_from(StateList(states): StateList) -> Result<Self> {
        let mut extra = Extra::new();
        for state in states {
            if extra.get(state.sampling_key()).is_some() {
                return Err(Error::DuplicateSamplingKey(state.sampling_key));
            }
            extra.insert(state);
        }
        Ok(extra)
    }
}

impl From<Extra> for Vec<SecondarySamplingState> {
    fn from(extra: Extra) -> Self {
        extra.states.into_values().collect()
    }
}
