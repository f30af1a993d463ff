use tree_sitter::Node;

use super::{
    Language, Structurer, create_ts_parser, field_text, get_node_text, named_children,
    parse_tree, start_end,
};
use crate::types::{
    CodeAnnotation, CodeField, CodeFile, CodeFunction, CodeParameter, CodeStructure, Result,
    StructureType, strip_generics,
};

pub struct GoStructurer;

impl GoStructurer {
    pub fn new() -> Result<Self> {
        let _ = create_ts_parser(tree_sitter_go::LANGUAGE, "Go")?;
        Ok(Self)
    }
}

impl Structurer for GoStructurer {
    fn language(&self) -> Language {
        Language::Go
    }

    fn parse_file(&self, source: &str, file_path: &str) -> Result<CodeFile> {
        let tree = parse_tree(Language::Go, source, file_path)?;
        let content = source.as_bytes();

        let mut file = CodeFile::new(file_path, Language::Go.id());
        let mut methods: Vec<(String, CodeFunction)> = Vec::new();

        for node in named_children(tree.root_node()) {
            match node.kind() {
                "package_clause" => {
                    if let Some(name) = node.named_child(0) {
                        file.package = get_node_text(name, content).to_string();
                    }
                }
                "import_declaration" => file.imports.extend(extract_imports(node, content)),
                "type_declaration" => {
                    for spec in named_children(node) {
                        if let Some(structure) = extract_type_spec(spec, content, &file.package) {
                            file.classes.push(structure);
                        }
                    }
                }
                "function_declaration" => file.functions.push(extract_function(node, content)),
                "method_declaration" => {
                    let receiver = receiver_type(node, content).unwrap_or_default();
                    methods.push((receiver, extract_function(node, content)));
                }
                _ => {}
            }
        }

        // Methods may be declared before their receiver type
        for (receiver, method) in methods {
            match file
                .find_structure_mut(&receiver)
                .filter(|s| s.structure_type == StructureType::Struct)
            {
                Some(structure) => structure.methods.push(method),
                None => {
                    tracing::debug!(
                        "{}: receiver {} of {} not declared in this file",
                        file_path,
                        receiver,
                        method.name
                    );
                    file.functions.push(method);
                }
            }
        }

        Ok(file)
    }
}

fn extract_imports(node: Node, content: &[u8]) -> Vec<String> {
    let mut imports = Vec::new();
    for child in named_children(node) {
        match child.kind() {
            "import_spec" => {
                if let Some(path) = field_text(child, "path", content) {
                    imports.push(path.trim_matches(['"', '`']).to_string());
                }
            }
            "import_spec_list" => imports.extend(extract_imports(child, content)),
            _ => {}
        }
    }
    imports
}

fn extract_type_spec(spec: Node, content: &[u8], package: &str) -> Option<CodeStructure> {
    if spec.kind() != "type_spec" {
        return None;
    }
    let name = field_text(spec, "name", content)?;
    let body = spec.child_by_field_name("type")?;

    let structure_type = match body.kind() {
        "struct_type" => StructureType::Struct,
        "interface_type" => StructureType::Interface,
        _ => return None,
    };

    let mut structure = CodeStructure::new(structure_type, name, package);
    (structure.start, structure.end) = start_end(spec);

    match structure_type {
        StructureType::Struct => collect_struct_fields(body, content, &mut structure),
        _ => collect_interface_elements(body, content, &mut structure),
    }

    Some(structure)
}

fn collect_struct_fields(struct_type: Node, content: &[u8], structure: &mut CodeStructure) {
    let Some(list) = named_children(struct_type)
        .into_iter()
        .find(|n| n.kind() == "field_declaration_list")
    else {
        return;
    };

    for decl in named_children(list) {
        if decl.kind() != "field_declaration" {
            continue;
        }
        let field_type = field_text(decl, "type", content).map(str::to_string);
        let names = field_names(decl, content);

        // Embedded type: no field name, the type is promoted into the struct
        if names.is_empty() {
            if let Some(embedded) = field_type.as_deref().map(strip_generics) {
                structure.extends.push(embedded);
            }
            continue;
        }

        let tag = field_text(decl, "tag", content);
        let (start, end) = start_end(decl);
        for name in names {
            structure.fields.push(CodeField {
                modifiers: exported_modifier(&name),
                name,
                field_type: field_type.clone(),
                annotations: tag
                    .map(|t| vec![CodeAnnotation::new(t.trim_matches('`'))])
                    .unwrap_or_default(),
                start,
                end,
            });
        }
    }
}

fn collect_interface_elements(iface: Node, content: &[u8], structure: &mut CodeStructure) {
    for element in named_children(iface) {
        match element.kind() {
            "method_elem" | "method_spec" => {
                structure.methods.push(extract_function(element, content))
            }
            "type_elem" | "constraint_elem" => {
                let text = get_node_text(element, content);
                // Union and approximation constraints embed no single interface
                if text.contains('|') || text.contains('~') {
                    continue;
                }
                let name = strip_generics(text);
                if !name.is_empty() {
                    structure.extends.push(name);
                }
            }
            _ => {}
        }
    }
}

fn extract_function(node: Node, content: &[u8]) -> CodeFunction {
    let (start, end) = start_end(node);
    let name = field_text(node, "name", content).unwrap_or_default().to_string();
    CodeFunction {
        modifiers: exported_modifier(&name),
        name,
        return_type: field_text(node, "result", content).map(str::to_string),
        parameters: node
            .child_by_field_name("parameters")
            .map(|p| extract_parameters(p, content))
            .unwrap_or_default(),
        annotations: Vec::new(),
        start,
        end,
    }
}

fn extract_parameters(params: Node, content: &[u8]) -> Vec<CodeParameter> {
    let mut parameters = Vec::new();
    for decl in named_children(params) {
        if !matches!(
            decl.kind(),
            "parameter_declaration" | "variadic_parameter_declaration"
        ) {
            continue;
        }
        let mut param_type = field_text(decl, "type", content).map(str::to_string);
        if decl.kind() == "variadic_parameter_declaration" {
            param_type = param_type.map(|t| format!("...{}", t));
        }

        let names = field_names(decl, content);
        if names.is_empty() {
            // `func(int, string)`
            parameters.push(CodeParameter {
                name: String::new(),
                param_type,
            });
            continue;
        }
        for name in names {
            parameters.push(CodeParameter {
                name,
                param_type: param_type.clone(),
            });
        }
    }
    parameters
}

/// Every `name:` child; `a, b int` declares two.
fn field_names(node: Node, content: &[u8]) -> Vec<String> {
    let mut cursor = node.walk();
    let names = node
        .children_by_field_name("name", &mut cursor)
        .map(|n| get_node_text(n, content).to_string())
        .collect();
    names
}

/// Bare receiver type name: `(s *Server)` → `Server`, `(l List[T])` → `List`.
fn receiver_type(method: Node, content: &[u8]) -> Option<String> {
    let receiver = method.child_by_field_name("receiver")?;
    let decl = named_children(receiver)
        .into_iter()
        .find(|n| n.kind() == "parameter_declaration")?;
    field_text(decl, "type", content).map(strip_generics)
}

fn exported_modifier(name: &str) -> Vec<String> {
    if name.starts_with(|c: char| c.is_uppercase()) {
        vec!["exported".to_string()]
    } else {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> CodeFile {
        GoStructurer::new()
            .unwrap()
            .parse_file(source, "internal/server/server.go")
            .unwrap()
    }

    #[test]
    fn test_package_and_imports() {
        let file = parse(
            r#"
package server

import "fmt"

import (
    "net/http"
    log "github.com/sirupsen/logrus"
)
"#,
        );
        assert_eq!(file.package, "server");
        assert_eq!(file.language, "go");
        assert_eq!(
            file.imports,
            vec!["fmt", "net/http", "github.com/sirupsen/logrus"]
        );
    }

    #[test]
    fn test_struct_fields_and_embedding() {
        let file = parse(
            r#"
package server

type Server struct {
    *Base
    sync.Mutex
    Addr, host string `json:"addr"`
    port       int
}
"#,
        );
        let server = &file.classes[0];
        assert_eq!(server.structure_type, StructureType::Struct);
        assert_eq!(server.canonical_key(), "server.Server");
        assert_eq!(server.extends, vec!["Base", "sync.Mutex"]);

        let fields: Vec<_> = server.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(fields, vec!["Addr", "host", "port"]);
        assert_eq!(server.fields[0].modifiers, vec!["exported"]);
        assert!(server.fields[1].modifiers.is_empty());
        assert_eq!(server.fields[2].field_type.as_deref(), Some("int"));
        assert_eq!(server.fields[0].annotations[0].name, "json:\"addr\"");
    }

    #[test]
    fn test_interface_methods_and_embedding() {
        let file = parse(
            r#"
package io

type ReadCloser interface {
    Reader
    Close() error
}

type Number interface {
    ~int | ~float64
}
"#,
        );
        let rc = &file.classes[0];
        assert_eq!(rc.structure_type, StructureType::Interface);
        assert_eq!(rc.extends, vec!["Reader"]);
        assert_eq!(rc.methods.len(), 1);
        assert_eq!(rc.methods[0].name, "Close");
        assert_eq!(rc.methods[0].return_type.as_deref(), Some("error"));

        assert!(file.classes[1].extends.is_empty());
    }

    #[test]
    fn test_methods_attach_to_receiver() {
        let file = parse(
            r#"
package server

func (s *Server) Start(ctx context.Context, addrs ...string) error { return nil }

type Server struct{}

func (o *Other) Stop() {}

func helper(a, b int) int { return a + b }
"#,
        );
        let server = &file.classes[0];
        assert_eq!(server.methods.len(), 1);
        let start = &server.methods[0];
        assert_eq!(start.name, "Start");
        assert_eq!(start.modifiers, vec!["exported"]);
        assert_eq!(start.parameters[0].name, "ctx");
        assert_eq!(start.parameters[1].param_type.as_deref(), Some("...string"));

        let functions: Vec<_> = file.functions.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(functions, vec!["helper", "Stop"]);
        let helper = &file.functions[0];
        assert_eq!(helper.parameters.len(), 2);
        assert_eq!(helper.parameters[1].name, "b");
        assert_eq!(helper.parameters[1].param_type.as_deref(), Some("int"));
    }
}
