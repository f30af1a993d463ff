//! Built-in symbol queries.
//!
//! Capture names follow the tags vocabulary: `@name`, `@body`, `@comment`, `@receiver`, and a
//! `@definition.<kind>` capture on the node whose span defines nesting.

use crate::analyzer::parser::Language;

/// Built-in query for `language`, or `None` when no query ships for it.
pub fn symbol_query(language: Language) -> Option<&'static str> {
    match language {
        Language::Java => Some(JAVA),
        Language::TypeScript | Language::JavaScript | Language::Tsx | Language::Jsx => {
            Some(TYPESCRIPT)
        }
        Language::Python => Some(PYTHON),
        Language::Go => Some(GO),
        Language::Rust => Some(RUST),
        _ => None,
    }
}

const JAVA: &str = r#"
; Package runs to end of file
(package_declaration
  [(scoped_identifier) (identifier)] @name) @definition.module.filescoped

(class_declaration
  name: (identifier) @name
  body: (class_body) @body) @definition.class

(record_declaration
  name: (identifier) @name
  body: (class_body) @body) @definition.class

(interface_declaration
  name: (identifier) @name
  body: (interface_body) @body) @definition.interface

(annotation_type_declaration
  name: (identifier) @name) @definition.interface

(enum_declaration
  name: (identifier) @name
  body: (enum_body) @body) @definition.enum

(enum_constant
  name: (identifier) @name) @definition.enum_variant

(method_declaration
  name: (identifier) @name) @definition.method

(constructor_declaration
  name: (identifier) @name
  body: (constructor_body) @body) @definition.method

; One symbol per declarator: `int x, y;`
(field_declaration
  declarator: (variable_declarator
    name: (identifier) @name) @definition.field)

(constant_declaration
  declarator: (variable_declarator
    name: (identifier) @name) @definition.constant)
"#;

const TYPESCRIPT: &str = r#"
(class_declaration
  name: (type_identifier) @name
  body: (class_body) @body) @definition.class

(abstract_class_declaration
  name: (type_identifier) @name
  body: (class_body) @body) @definition.class

(interface_declaration
  name: (type_identifier) @name
  body: (_) @body) @definition.interface

(method_definition
  name: (_) @name) @definition.method

(method_signature
  name: (_) @name) @definition.method

(abstract_method_signature
  name: (_) @name) @definition.method

(public_field_definition
  name: (_) @name) @definition.field

(property_signature
  name: (_) @name) @definition.field

(function_declaration
  name: (identifier) @name
  body: (statement_block) @body) @definition.function

(lexical_declaration
  (variable_declarator
    name: (identifier) @name
    value: (arrow_function)) @definition.function)

(enum_declaration
  name: (identifier) @name
  body: (enum_body) @body) @definition.enum

(type_alias_declaration
  name: (type_identifier) @name) @definition.type

(internal_module
  name: (_) @name) @definition.module
"#;

const PYTHON: &str = r#"
(class_definition
  name: (identifier) @name
  body: (block) @body) @definition.class

(function_definition
  name: (identifier) @name
  body: (block) @body) @definition.function
"#;

const GO: &str = r#"
(
  (comment)* @comment
  .
  (function_declaration
    name: (identifier) @name) @definition.function
)

(
  (comment)* @comment
  .
  (method_declaration
    receiver: (parameter_list
      (parameter_declaration
        type: [
          (type_identifier) @receiver
          (pointer_type (type_identifier) @receiver)
          (generic_type type: (type_identifier) @receiver)
          (pointer_type (generic_type type: (type_identifier) @receiver))
        ]))
    name: (field_identifier) @name) @definition.method
)

(
  (comment)* @comment
  .
  (type_declaration
    (type_spec
      name: (type_identifier) @name
      type: (struct_type) @body) @definition.struct)
)

(
  (comment)* @comment
  .
  (type_declaration
    (type_spec
      name: (type_identifier) @name
      type: (interface_type) @body) @definition.interface)
)

; `a, b int` yields one symbol per name
(field_declaration
  name: (field_identifier) @name @definition.field)
"#;

const RUST: &str = r#"
(
  (line_comment)* @comment
  .
  (struct_item
    name: (type_identifier) @name) @definition.struct
)

(
  (line_comment)* @comment
  .
  (enum_item
    name: (type_identifier) @name
    body: (enum_variant_list) @body) @definition.enum
)

(
  (line_comment)* @comment
  .
  (trait_item
    name: (type_identifier) @name
    body: (declaration_list) @body) @definition.trait
)

(
  (line_comment)* @comment
  .
  (function_item
    name: (identifier) @name
    body: (block) @body) @definition.function
)

(function_signature_item
  name: (identifier) @name) @definition.function

(impl_item
  type: [
    (type_identifier) @name
    (generic_type type: (type_identifier) @name)
  ]
  body: (declaration_list) @body) @definition.implementation

(
  (line_comment)* @comment
  .
  (mod_item
    name: (identifier) @name) @definition.module
)

(macro_definition
  name: (identifier) @name) @definition.macro

(const_item
  name: (identifier) @name) @definition.constant

(static_item
  name: (identifier) @name) @definition.constant

(type_item
  name: (type_identifier) @name) @definition.type

(union_item
  name: (type_identifier) @name) @definition.union

(field_declaration
  name: (field_identifier) @name) @definition.field

(enum_variant
  name: (identifier) @name) @definition.enum_variant
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_structured_language_has_a_query() {
        for lang in Language::all_variants() {
            assert_eq!(symbol_query(*lang).is_some(), lang.has_structurer(), "{:?}", lang);
        }
    }

    #[test]
    fn test_builtin_queries_compile() {
        for lang in Language::all_variants() {
            let (Some(grammar), Some(source)) = (lang.grammar(), symbol_query(*lang)) else {
                continue;
            };
            if let Err(e) = tree_sitter::Query::new(&grammar, source) {
                panic!("{} query failed to compile: {}", lang, e);
            }
        }
    }
}
