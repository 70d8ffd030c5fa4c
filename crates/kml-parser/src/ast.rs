//! Parsed markup model handed to code generators.
//!
//! Values are kept as opaque expression text. Nothing here is evaluated:
//! constants are not resolved and variables are not substituted.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::value::ValueShape;
use kml_lexer::CursorError;

/// Everything produced from one batch of markup files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseResult {
    /// One entry per `element` declaration, in file then declaration order.
    pub elements: Vec<MarkupElement>,
    /// `const` declarations from every file, merged without deduplication.
    pub constants: Vec<Constant>,
}

impl ParseResult {
    /// Look up a built element by its declared name.
    pub fn element(&self, name: &str) -> Option<&MarkupElement> {
        self.elements.iter().find(|e| e.root.type_name == name)
    }
}

/// A top-level `element` declaration together with its source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkupElement {
    pub root: UIElement,
    pub file: String,
}

/// Whether an element type comes from the built-in catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElementKind {
    Default,
    UserDefined,
}

/// A node of the element tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UIElement {
    pub type_name: String,
    pub kind: ElementKind,
    /// Instance name from `child Type name { ... }`. Always `None` on roots.
    pub element_name: Option<String>,
    pub properties: Vec<Property>,
    /// Only root elements declare variables.
    pub variables: IndexMap<String, Variable>,
    /// In declaration order, which is also layout order.
    pub children: Vec<UIElement>,
}

impl UIElement {
    pub fn new(type_name: impl Into<String>, kind: ElementKind) -> Self {
        Self {
            type_name: type_name.into(),
            kind,
            element_name: None,
            properties: Vec::new(),
            variables: IndexMap::new(),
            children: Vec::new(),
        }
    }

    /// The last assignment to `name`, which is the one that takes effect.
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().rev().find(|p| p.name == name)
    }

    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.variables.get(name)
    }

    /// Find a direct child by instance name.
    pub fn child(&self, name: &str) -> Option<&UIElement> {
        self.children
            .iter()
            .find(|c| c.element_name.as_deref() == Some(name))
    }
}

/// `name = expr` inside an element body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    pub value: String,
}

impl Property {
    /// Classify the value text. See [`ValueShape::classify`].
    pub fn shape(&self) -> Result<ValueShape, CursorError> {
        ValueShape::classify(&self.value)
    }
}

/// Type slot for a declared variable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum VariableType {
    /// Assigned by a later phase that evaluates the value.
    #[default]
    Unresolved,
}

/// `var name [= expr]` in a root element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    /// Empty when the declaration has no initializer.
    pub value: String,
    pub var_type: VariableType,
}

impl Variable {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            var_type: VariableType::default(),
        }
    }
}

/// `const name = expr` at file scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constant {
    pub name: String,
    pub value: String,
}
