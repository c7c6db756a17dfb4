//! Component registration.
//!
//! Host applications declare components by name. A crate registers its
//! components once under fixed names together with their declared props, and
//! the registry checks declared props before a component is set up.

use std::collections::HashMap;

use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Component already registered: {0}")]
    AlreadyRegistered(String),
    #[error("Unknown component: {0}")]
    UnknownComponent(String),
    #[error("Component '{component}' is missing required prop '{prop}'")]
    MissingProp { component: String, prop: String },
    #[error("Component '{component}' prop '{prop}' expects {expected}")]
    InvalidProp {
        component: String,
        prop: String,
        expected: PropKind,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PropKind {
    String,
    Number,
    Object,
}

impl PropKind {
    fn accepts(self, value: &Value) -> bool {
        match self {
            PropKind::String => value.is_string(),
            PropKind::Number => value.is_number(),
            PropKind::Object => value.is_object(),
        }
    }
}

impl std::fmt::Display for PropKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PropKind::String => "a string",
            PropKind::Number => "a number",
            PropKind::Object => "an object",
        };
        f.write_str(name)
    }
}

/// Declared prop of a registered component.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PropSpec {
    pub name: &'static str,
    pub kind: PropKind,
    pub required: bool,
}

impl PropSpec {
    pub const fn required(name: &'static str, kind: PropKind) -> Self {
        Self { name, kind, required: true }
    }

    pub const fn optional(name: &'static str, kind: PropKind) -> Self {
        Self { name, kind, required: false }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegisteredComponent {
    pub name: &'static str,
    /// Path of the module providing the component.
    pub module: &'static str,
    pub props: &'static [PropSpec],
}

#[derive(Debug, Default)]
pub struct ComponentRegistry {
    components: HashMap<&'static str, RegisteredComponent>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, component: RegisteredComponent) -> Result<(), RegistryError> {
        if self.components.contains_key(component.name) {
            return Err(RegistryError::AlreadyRegistered(component.name.to_string()));
        }
        log::debug!("Registered component '{}' from {}", component.name, component.module);
        self.components.insert(component.name, component);
        Ok(())
    }

    pub fn resolve(&self, name: &str) -> Result<&RegisteredComponent, RegistryError> {
        self.components
            .get(name)
            .ok_or_else(|| RegistryError::UnknownComponent(name.to_string()))
    }

    /// Check `props` against the declaration of `name`.
    ///
    /// Unknown props are ignored, mirroring how hosts pass extra attributes through.
    pub fn validate_props(&self, name: &str, props: &Map<String, Value>) -> Result<(), RegistryError> {
        let component = self.resolve(name)?;
        for spec in component.props {
            match props.get(spec.name) {
                None | Some(Value::Null) if spec.required => {
                    return Err(RegistryError::MissingProp {
                        component: name.to_string(),
                        prop: spec.name.to_string(),
                    });
                }
                Some(value) if !value.is_null() && !spec.kind.accepts(value) => {
                    return Err(RegistryError::InvalidProp {
                        component: name.to_string(),
                        prop: spec.name.to_string(),
                        expected: spec.kind,
                    });
                }
                _ => {}
            }
        }
        Ok(())
    }

    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.components.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

// ===================================================================
// Tests
// ===================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const PROPS: &[PropSpec] = &[
        PropSpec::required("id", PropKind::String),
        PropSpec::required("width", PropKind::Number),
        PropSpec::optional("extra", PropKind::Object),
    ];

    fn registry() -> ComponentRegistry {
        let mut registry = ComponentRegistry::new();
        registry
            .register(RegisteredComponent {
                name: "Widget",
                module: "tests::widget",
                props: PROPS,
            })
            .unwrap();
        registry
    }

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut registry = registry();
        let err = registry
            .register(RegisteredComponent {
                name: "Widget",
                module: "elsewhere",
                props: &[],
            })
            .unwrap_err();
        assert_eq!(err, RegistryError::AlreadyRegistered("Widget".into()));
        assert_eq!(registry.resolve("Widget").unwrap().module, "tests::widget");
    }

    #[test]
    fn test_validate_props() {
        let registry = registry();
        assert!(registry
            .validate_props("Widget", &object(json!({"id": "w", "width": 10})))
            .is_ok());

        let missing = registry
            .validate_props("Widget", &object(json!({"id": "w"})))
            .unwrap_err();
        assert!(matches!(missing, RegistryError::MissingProp { ref prop, .. } if prop == "width"));

        let invalid = registry
            .validate_props("Widget", &object(json!({"id": 3, "width": 10})))
            .unwrap_err();
        assert!(matches!(invalid, RegistryError::InvalidProp { expected: PropKind::String, .. }));
    }

    #[test]
    fn test_unknown_component() {
        let registry = registry();
        assert_eq!(
            registry.resolve("Missing").unwrap_err(),
            RegistryError::UnknownComponent("Missing".into())
        );
        assert_eq!(registry.names(), vec!["Widget"]);
    }
}
