//! Brace-depth extraction of `PROPERTY` and `CLASSDATA` markers.
//!
//! The extractor is not a host-language parser. It tracks one integer brace
//! depth and one optional open-class context; that is sufficient because the
//! marker syntax is fixed and only accepted directly inside a class body.
//! Nested class definitions are unsupported: a `class` introducer at any
//! depth replaces the open context.

use log::debug;

use crate::errors::ScanError;
use crate::lexer::TokenStream;
use crate::model::{ClassRecord, Property, Registry};
use crate::token::{Token, TokenKind};

/// Scans one input and appends every committed class to `registry`.
///
/// `file` is the path as given on the command line; it is recorded verbatim
/// in the registry's include list when the file commits at least one class.
pub fn extract_file(file: &str, src: &str, registry: &mut Registry) -> Result<(), ScanError> {
    let mut stream = TokenStream::new(file, src);
    let mut depth: i32 = 0;
    let mut current: Option<ClassRecord> = None;
    let mut committed = 0usize;

    while let Some(token) = stream.advance() {
        match token.kind {
            TokenKind::BraceStart => depth += 1,

            TokenKind::BraceEnd => {
                depth -= 1;
                if depth == 0
                    && let Some(class) = current.take()
                {
                    if class.properties.is_empty() {
                        debug!("{file}: discarding {} (no properties)", class.name);
                    } else {
                        debug!(
                            "{file}: committing {} ({} properties)",
                            class.name,
                            class.properties.len()
                        );
                        registry.classes.push(class);
                        committed += 1;
                    }
                }
            }

            TokenKind::Semicolon => {
                // Covers forward declarations and non-class statements.
                if depth == 0 {
                    current = None;
                }
            }

            TokenKind::Symbol if token.text == "class" => {
                let name = stream.require(TokenKind::Symbol)?;
                current = Some(ClassRecord::new(name.text));
            }

            TokenKind::Symbol if token.text == "PROPERTY" => {
                let Some(class) = current.as_mut().filter(|_| depth == 1) else {
                    return Err(ScanError::MarkerOutsideClass {
                        file: file.to_string(),
                        line: token.line,
                        marker: "PROPERTY",
                    });
                };
                let property = parse_property(&mut stream, file, &class.name)?;
                class.properties.push(property);
            }

            TokenKind::Symbol if token.text == "CLASSDATA" => {
                let Some(class) = current.as_mut() else {
                    return Err(ScanError::MarkerOutsideClass {
                        file: file.to_string(),
                        line: token.line,
                        marker: "CLASSDATA",
                    });
                };
                if class.has_class_data {
                    return Err(ScanError::DuplicateClassData {
                        class: class.name.clone(),
                    });
                }

                stream.require(TokenKind::ParenStart)?;
                let argument = stream.require(TokenKind::Symbol)?;
                if argument.text != class.name {
                    return Err(ScanError::ClassDataMismatch {
                        expected: class.name.clone(),
                    });
                }
                stream.require(TokenKind::ParenEnd)?;
                class.has_class_data = true;
            }

            TokenKind::Symbol | TokenKind::ParenStart | TokenKind::ParenEnd => {}
        }
    }

    if committed > 0 {
        registry.includes.push(file.to_string());
    }

    Ok(())
}

/// Parses one `PROPERTY(...)` argument list, opening paren onward.
///
/// Argument tokens accumulate until a `)`, a `;`, or an accessor keyword;
/// the last accumulated token is the property name and the rest join into
/// the type. A `;` or keyword terminator switches to the accessor-specifier
/// list, which runs until the closing paren.
fn parse_property(
    stream: &mut TokenStream<'_>,
    file: &str,
    class: &str,
) -> Result<Property, ScanError> {
    let open = stream.require(TokenKind::ParenStart)?;
    let marker_line = open.line;

    let mut tokens: Vec<String> = Vec::new();
    let mut carried: Option<Token> = None;
    let mut in_specifiers = false;

    loop {
        if stream.advance_if(TokenKind::ParenEnd) {
            break;
        }
        if stream.advance_if(TokenKind::Semicolon) {
            in_specifiers = true;
            break;
        }

        let token = stream.require_any()?;
        if token.is_symbol("READ") || token.is_symbol("WRITE") {
            in_specifiers = true;
            carried = Some(token);
            break;
        }
        tokens.push(token.text);
    }

    let Some(name) = tokens.pop() else {
        return Err(ScanError::MissingPropertyTokens {
            file: file.to_string(),
            line: marker_line,
        });
    };
    if tokens.is_empty() {
        return Err(ScanError::MissingPropertyTokens {
            file: file.to_string(),
            line: marker_line,
        });
    }
    let type_name = tokens.join(" ");

    let mut read: Option<String> = None;
    let mut write: Option<String> = None;

    if in_specifiers {
        loop {
            let entry = match carried.take() {
                Some(token) => token,
                None => {
                    if stream.advance_if(TokenKind::ParenEnd) {
                        break;
                    }
                    stream.require(TokenKind::Symbol)?
                }
            };

            match entry.text.as_str() {
                "READ" => {
                    if read.is_some() {
                        return Err(ScanError::DuplicateAccessor {
                            class: class.to_string(),
                            property: name,
                            accessor: "READ",
                        });
                    }
                    read = Some(stream.require(TokenKind::Symbol)?.text);
                }
                "WRITE" => {
                    if write.is_some() {
                        return Err(ScanError::DuplicateAccessor {
                            class: class.to_string(),
                            property: name,
                            accessor: "WRITE",
                        });
                    }
                    write = Some(stream.require(TokenKind::Symbol)?.text);
                }
                // Unrecognized specifier symbols are consumed and ignored.
                _ => {}
            }
        }
    }

    Ok(Property {
        name,
        type_name,
        read,
        write,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(src: &str) -> Result<Registry, ScanError> {
        let mut registry = Registry::new();
        extract_file("test.h", src, &mut registry)?;
        Ok(registry)
    }

    #[test]
    fn commits_class_with_property() {
        let registry = scan("class Widget { PROPERTY(int width); CLASSDATA(Widget); };").unwrap();
        assert_eq!(registry.classes.len(), 1);
        let class = &registry.classes[0];
        assert_eq!(class.name, "Widget");
        assert!(class.has_class_data);
        assert_eq!(class.properties.len(), 1);
        assert_eq!(registry.includes, vec!["test.h"]);
    }

    #[test]
    fn trivial_property_has_no_accessors() {
        let registry = scan("class W { PROPERTY(int x); CLASSDATA(W); };").unwrap();
        let property = &registry.classes[0].properties[0];
        assert_eq!(property.name, "x");
        assert_eq!(property.type_name, "int");
        assert!(property.is_trivial());
        assert!(!property.needs_wrapper());
    }

    #[test]
    fn multi_token_types_join_with_spaces() {
        let registry = scan("class W { PROPERTY(unsigned long count); CLASSDATA(W); };").unwrap();
        let property = &registry.classes[0].properties[0];
        assert_eq!(property.name, "count");
        assert_eq!(property.type_name, "unsigned long");
    }

    #[test]
    fn semicolon_form_parses_accessors() {
        let registry =
            scan("class W { PROPERTY(int x; READ getX WRITE setX); CLASSDATA(W); };").unwrap();
        let property = &registry.classes[0].properties[0];
        assert_eq!(property.read.as_deref(), Some("getX"));
        assert_eq!(property.write.as_deref(), Some("setX"));
        assert!(property.needs_wrapper());
    }

    #[test]
    fn accessor_keyword_terminates_argument_list() {
        let registry =
            scan("class Widget { PROPERTY(int, width, WRITE setWidth); CLASSDATA(Widget); };")
                .unwrap();
        let property = &registry.classes[0].properties[0];
        assert_eq!(property.name, "width");
        assert_eq!(property.type_name, "int");
        assert_eq!(property.write.as_deref(), Some("setWidth"));
        assert_eq!(property.read, None);
    }

    #[test]
    fn class_without_properties_is_discarded() {
        let registry = scan("class Plain { int x; void f(); };").unwrap();
        assert!(registry.classes.is_empty());
        assert!(registry.includes.is_empty());
    }

    #[test]
    fn forward_declaration_is_discarded() {
        let registry = scan("class Ahead;\nclass W { PROPERTY(int x); CLASSDATA(W); };").unwrap();
        assert_eq!(registry.classes.len(), 1);
        assert_eq!(registry.classes[0].name, "W");
    }

    #[test]
    fn properties_keep_declaration_order() {
        let registry = scan(
            "class W { PROPERTY(int a); PROPERTY(int b); PROPERTY(int c); CLASSDATA(W); };",
        )
        .unwrap();
        let names: Vec<&str> = registry.classes[0]
            .properties
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn property_outside_class_is_fatal() {
        let err = scan("PROPERTY(int x);").unwrap_err();
        assert!(matches!(err, ScanError::MarkerOutsideClass { marker: "PROPERTY", .. }));
    }

    #[test]
    fn property_in_nested_braces_is_fatal() {
        let err = scan("class W { void f() { PROPERTY(int x); } };").unwrap_err();
        assert!(matches!(err, ScanError::MarkerOutsideClass { .. }));
    }

    #[test]
    fn too_few_property_tokens_is_fatal() {
        let err = scan("class W { PROPERTY(x); };").unwrap_err();
        assert!(matches!(err, ScanError::MissingPropertyTokens { .. }));
    }

    #[test]
    fn duplicate_write_is_fatal() {
        let err = scan("class W { PROPERTY(int x; WRITE a WRITE b); };").unwrap_err();
        assert!(matches!(
            err,
            ScanError::DuplicateAccessor { accessor: "WRITE", .. }
        ));
    }

    #[test]
    fn duplicate_read_is_fatal() {
        let err = scan("class W { PROPERTY(int x; READ a READ b); };").unwrap_err();
        assert!(matches!(
            err,
            ScanError::DuplicateAccessor { accessor: "READ", .. }
        ));
    }

    #[test]
    fn classdata_name_mismatch_is_fatal() {
        let err = scan("class Right { PROPERTY(int x); CLASSDATA(Wrong); };").unwrap_err();
        match err {
            ScanError::ClassDataMismatch { expected } => assert_eq!(expected, "Right"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn duplicate_classdata_is_fatal() {
        let err = scan("class W { PROPERTY(int x); CLASSDATA(W); CLASSDATA(W); };").unwrap_err();
        assert!(matches!(err, ScanError::DuplicateClassData { .. }));
    }

    #[test]
    fn classdata_outside_class_is_fatal() {
        let err = scan("CLASSDATA(W);").unwrap_err();
        assert!(matches!(err, ScanError::MarkerOutsideClass { marker: "CLASSDATA", .. }));
    }

    #[test]
    fn missing_classdata_fails_validation() {
        let registry = scan("class W { PROPERTY(int x); };").unwrap();
        let err = registry.validate().unwrap_err();
        match err {
            ScanError::MissingClassData { class } => assert_eq!(class, "W"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn unterminated_marker_is_fatal() {
        let err = scan("class W { PROPERTY(int x").unwrap_err();
        assert!(matches!(err, ScanError::UnexpectedEnd { .. }));
    }

    #[test]
    fn include_list_tracks_contributing_files_in_order() {
        let mut registry = Registry::new();
        extract_file("a.h", "class A { PROPERTY(int x); CLASSDATA(A); };", &mut registry).unwrap();
        extract_file("b.h", "class Plain { };", &mut registry).unwrap();
        extract_file("c.h", "class C { PROPERTY(int y); CLASSDATA(C); };", &mut registry).unwrap();
        assert_eq!(registry.includes, vec!["a.h", "c.h"]);
    }

    #[test]
    fn classes_accumulate_across_files_in_discovery_order() {
        let mut registry = Registry::new();
        extract_file("a.h", "class A { PROPERTY(int x); CLASSDATA(A); };", &mut registry).unwrap();
        extract_file("b.h", "class B { PROPERTY(int y); CLASSDATA(B); };", &mut registry).unwrap();
        let names: Vec<&str> = registry.classes.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
    }
}
