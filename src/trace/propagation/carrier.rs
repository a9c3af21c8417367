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

//! Carrier access. The propagation code never touches a carrier directly, it
//! goes through a [Setter] when writing and a [Getter] when reading.

use std::{collections::HashMap, hash::BuildHasher};

/// Writes one propagated value into a carrier, such as putting a header into
/// an HTTP request.
///
/// The way of writing is determined by the implementation, no panic should
/// happen even if writing fails.
pub trait Setter<C: ?Sized> {
    /// Put the value under the given key.
    fn put(&self, carrier: &mut C, key: &str, value: String);
}

/// Reads one propagated value out of a carrier.
pub trait Getter<C: ?Sized> {
    /// Fetch the value of the given key.
    fn get<'a>(&self, carrier: &'a C, key: &str) -> Option<&'a str>;
}

impl<C: ?Sized, F> Setter<C> for F
where
    F: Fn(&mut C, &str, String),
{
    fn put(&self, carrier: &mut C, key: &str, value: String) {
        self(carrier, key, value)
    }
}

/// [Setter] for [HashMap] carriers.
#[derive(Debug, Default, Clone, Copy)]
pub struct MapSetter;

impl<S: BuildHasher> Setter<HashMap<String, String, S>> for MapSetter {
    fn put(&self, carrier: &mut HashMap<String, String, S>, key: &str, value: String) {
        carrier.insert(key.to_owned(), value);
    }
}

/// [Getter] for [HashMap] carriers.
#[derive(Debug, Default, Clone, Copy)]
pub struct MapGetter;

impl<S: BuildHasher> Getter<HashMap<String, String, S>> for MapGetter {
    fn get<'a>(&self, carrier: &'a HashMap<String, String, S>, key: &str) -> Option<&'a str> {
        carrier.get(key).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_carrier() {
        let mut carrier: HashMap<String, String> = HashMap::new();
        MapSetter.put(&mut carrier, "sampling", "b3".to_owned());
        MapSetter.put(&mut carrier, "sampling", "lb".to_owned());

        assert_eq!(carrier.len(), 1);
        assert_eq!(MapGetter.get(&carrier, "sampling"), Some("lb"));
        assert_eq!(MapGetter.get(&carrier, "b3"), None);
    }

    #[test]
    fn closure_setter() {
        let setter = |carrier: &mut Vec<(String, String)>, key: &str, value: String| {
            carrier.push((key.to_owned(), value))
        };
        let mut carrier: Vec<(String, String)> = Vec::new();
        setter.put(&mut carrier, "b3", "1".to_owned());

        assert_eq!(carrier, vec![("b3".to_owned(), "1".to_owned())]);
    }
}
