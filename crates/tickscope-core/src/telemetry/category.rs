// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Category identity for timed and counted things.

use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display};

/// The module name assigned to categories that carry no path qualifier.
pub const HOST_MODULE: &str = "Server (Core)";

/// A unique, structured identifier for a profiled category.
///
/// A category names one thing being timed or counted: a tick phase, a
/// subsystem, an event type. Categories carry an owning-module name derived
/// from the category name itself, so presentation layers can group related
/// categories without any extra registration step.
///
/// Categories are created once on first use and live for the process
/// lifetime; they are never renamed or removed (a full reset clears their
/// statistics, not their identity).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CategoryId {
    /// The full category name (e.g. `"core.entity.movement_system"`).
    pub name: String,
    /// The owning module, derived from the name (e.g. `"Core"`).
    pub module: String,
}

impl CategoryId {
    /// Creates a `CategoryId`, deriving the owning module from the name.
    ///
    /// Path-qualified names (`"physics.broadphase"`) belong to the module
    /// named by their first segment, capitalized (`"Physics"`). Unqualified
    /// names belong to [`HOST_MODULE`].
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let module = derive_module(&name);
        Self { name, module }
    }

    /// Creates a `CategoryId` with an explicitly assigned module.
    pub fn with_module(name: impl Into<String>, module: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            module: module.into(),
        }
    }

    /// Returns the last path segment of the category name, for compact display
    /// (`"core.entity.movement_system"` -> `"movement_system"`).
    pub fn short_name(&self) -> &str {
        match self.name.rfind('.') {
            Some(idx) if idx + 1 < self.name.len() => &self.name[idx + 1..],
            _ => &self.name,
        }
    }
}

impl Display for CategoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Derives the owning-module name from a category name.
fn derive_module(name: &str) -> String {
    match name.split('.').next().filter(|head| *head != name) {
        Some(head) => capitalize(head),
        None => HOST_MODULE.to_string(),
    }
}

/// Capitalizes the first character of a module segment.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qualified_name_derives_module_from_first_segment() {
        let id = CategoryId::new("core.entity.movement_system");
        assert_eq!(id.name, "core.entity.movement_system");
        assert_eq!(id.module, "Core");
        assert_eq!(id.short_name(), "movement_system");
    }

    #[test]
    fn unqualified_name_falls_to_host_module() {
        let id = CategoryId::new("tick");
        assert_eq!(id.module, HOST_MODULE);
        assert_eq!(id.short_name(), "tick");
    }

    #[test]
    fn explicit_module_overrides_derivation() {
        let id = CategoryId::with_module("physics.broadphase", "Engine");
        assert_eq!(id.module, "Engine");
    }

    #[test]
    fn display_is_the_full_name() {
        let id = CategoryId::new("io.chunk_save");
        assert_eq!(id.to_string(), "io.chunk_save");
    }

    #[test]
    fn trailing_dot_keeps_full_name_as_short_name() {
        let id = CategoryId::new("weird.");
        assert_eq!(id.short_name(), "weird.");
        assert_eq!(id.module, "Weird");
    }
}
