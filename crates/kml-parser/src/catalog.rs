use std::collections::HashSet;

/// Element types provided by the UI toolkit itself.
pub const DEFAULT_ELEMENTS: &[&str] = &[
    "UIBox",
    "UIBackground",
    "UIButton",
    "UIText",
    "UITextField",
    "UIScrollBox",
    "UISpinner",
];

/// Check if a type name is one of the toolkit's built-in elements.
pub fn is_default_element(name: &str) -> bool {
    DEFAULT_ELEMENTS.contains(&name)
}

/// The set of reserved element type names the parser checks against.
///
/// User `element` declarations may not reuse these names, and `child`
/// declarations of these types are classified as built-in.
pub trait ElementCatalog {
    fn is_default_element(&self, name: &str) -> bool;
}

/// [`DEFAULT_ELEMENTS`] plus any names registered by the host toolkit.
#[derive(Debug, Clone, Default)]
pub struct BuiltinElements {
    extra: HashSet<String>,
}

impl BuiltinElements {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_extra<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            extra: names.into_iter().map(Into::into).collect(),
        }
    }
}

impl ElementCatalog for BuiltinElements {
    fn is_default_element(&self, name: &str) -> bool {
        is_default_element(name) || self.extra.contains(name)
    }
}

/// A fully custom catalog.
impl ElementCatalog for HashSet<String> {
    fn is_default_element(&self, name: &str) -> bool {
        self.contains(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_names() {
        let catalog = BuiltinElements::new();
        assert!(catalog.is_default_element("UIBox"));
        assert!(catalog.is_default_element("UITextField"));
        assert!(!catalog.is_default_element("uibox"));
        assert!(!catalog.is_default_element("SettingsPanel"));
    }

    #[test]
    fn test_extra_names() {
        let catalog = BuiltinElements::with_extra(["UIDropdown"]);
        assert!(catalog.is_default_element("UIDropdown"));
        assert!(catalog.is_default_element("UIText"));
        assert!(!is_default_element("UIDropdown"));
    }

    #[test]
    fn test_custom_set() {
        let catalog: HashSet<String> = ["Button".to_string()].into_iter().collect();
        assert!(catalog.is_default_element("Button"));
        assert!(!catalog.is_default_element("UIBox"));
    }
}
