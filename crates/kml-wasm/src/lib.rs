//! WASM bindings for the KML parser.
//!
//! Exposes `parse()` to JavaScript via wasm-bindgen. Input is an array of
//! `{ name, content }` objects; output is `{ elements, constants, diagnostics }`.

use kml_parser::{BuiltinElements, Diagnostic, Diagnostics, FileEntry, ParseResult};
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// Parse a batch of markup files.
///
/// Diagnostics do not throw: the partial result is returned alongside them.
/// `builtins` is an optional array of extra built-in element names.
/// Throws only if the arguments have the wrong shape.
#[wasm_bindgen]
pub fn parse(files: JsValue, builtins: JsValue) -> Result<JsValue, JsError> {
    let files: Vec<FileEntry> =
        serde_wasm_bindgen::from_value(files).map_err(|e| JsError::new(&e.to_string()))?;
    let builtins: Option<Vec<String>> =
        serde_wasm_bindgen::from_value(builtins).map_err(|e| JsError::new(&e.to_string()))?;

    let (result, diagnostics) = parse_native(&files, builtins.unwrap_or_default());

    let js_obj = js_sys::Object::new();
    set(&js_obj, "elements", &result.elements)?;
    set(&js_obj, "constants", &result.constants)?;
    set(&js_obj, "diagnostics", &diagnostics)?;
    Ok(js_obj.into())
}

/// Get the parser version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn parse_native(files: &[FileEntry], builtins: Vec<String>) -> (ParseResult, Vec<Diagnostic>) {
    let catalog = BuiltinElements::with_extra(builtins);
    let mut diagnostics = Diagnostics::new();
    let result = kml_parser::parse_files(files, &catalog, &mut diagnostics);
    (result, diagnostics.into_vec())
}

fn set<T: Serialize + ?Sized>(obj: &js_sys::Object, key: &str, value: &T) -> Result<(), JsError> {
    let value = serde_wasm_bindgen::to_value(value).map_err(|e| JsError::new(&e.to_string()))?;
    js_sys::Reflect::set(obj, &key.into(), &value)
        .map_err(|_| JsError::new(&format!("Failed to set {key} property")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use kml_parser::Severity;
    use pretty_assertions::assert_eq;

    // =========================================================================
    // Native tests (non-WASM) for the parse pipeline behind the binding
    // =========================================================================

    fn native_parse(files: &[(&str, &str)]) -> (ParseResult, Vec<Diagnostic>) {
        let files: Vec<FileEntry> = files
            .iter()
            .map(|(name, content)| FileEntry::new(*name, *content))
            .collect();
        parse_native(&files, Vec::new())
    }

    #[test]
    fn test_empty_batch() {
        let (result, diagnostics) = native_parse(&[]);
        assert_eq!(result, ParseResult::default());
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_partial_result_with_diagnostics() {
        let (result, diagnostics) = native_parse(&[(
            "a.kml",
            "element A { width 1; height = 2; }",
        )]);
        assert_eq!(result.elements.len(), 1);
        assert_eq!(result.elements[0].root.properties.len(), 1);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].severity, Severity::Error);
    }

    #[test]
    fn test_extra_builtins() {
        let files = [FileEntry::new("a.kml", "element Slider { }")];
        let (result, diagnostics) = parse_native(&files, vec!["Slider".into()]);
        assert!(result.elements.is_empty());
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn test_multiple_parses_are_independent() {
        let (first, _) = native_parse(&[("a.kml", "const X = 1;")]);
        let (second, _) = native_parse(&[("b.kml", "const Y = 2;")]);
        assert_eq!(first.constants.len(), 1);
        assert_eq!(first.constants[0].name, "X");
        assert_eq!(second.constants.len(), 1);
        assert_eq!(second.constants[0].name, "Y");
    }

    #[test]
    fn test_version() {
        let v = version();
        assert!(!v.is_empty());
        assert!(v.contains('.'));
    }
}
