use tree_sitter::Node;

use super::{
    Language, Structurer, create_ts_parser, field_text, find_child, get_node_text, named_children,
    parse_tree, start_end,
};
use crate::types::{
    CodeAnnotation, CodeField, CodeFile, CodeFunction, CodeParameter, CodeStructure, Result,
    StructureType, qualify, strip_generics,
};

pub struct JavaStructurer;

impl JavaStructurer {
    pub fn new() -> Result<Self> {
        // Validate grammar at construction time
        let _ = create_ts_parser(tree_sitter_java::LANGUAGE, "Java")?;
        Ok(Self)
    }
}

impl Structurer for JavaStructurer {
    fn language(&self) -> Language {
        Language::Java
    }

    fn parse_file(&self, source: &str, file_path: &str) -> Result<CodeFile> {
        let tree = parse_tree(Language::Java, source, file_path)?;
        let root = tree.root_node();
        let content = source.as_bytes();

        let mut file = CodeFile::new(file_path, Language::Java.id());
        file.package = extract_package(root, content);
        file.imports = extract_imports(root, content);

        let package = file.package.clone();
        for node in named_children(root) {
            collect_type(node, content, &package, None, &mut file.classes);
        }

        Ok(file)
    }
}

fn extract_package(root: Node, content: &[u8]) -> String {
    named_children(root)
        .into_iter()
        .find(|n| n.kind() == "package_declaration")
        .and_then(|decl| {
            named_children(decl)
                .into_iter()
                .find(|n| matches!(n.kind(), "scoped_identifier" | "identifier"))
        })
        .map(|n| get_node_text(n, content).to_string())
        .unwrap_or_default()
}

fn extract_imports(root: Node, content: &[u8]) -> Vec<String> {
    named_children(root)
        .into_iter()
        .filter(|n| n.kind() == "import_declaration")
        .map(|n| {
            let text = get_node_text(n, content)
                .trim_start_matches("import")
                .trim()
                .trim_end_matches(';')
                .trim();
            text.strip_prefix("static ").unwrap_or(text).trim().to_string()
        })
        .filter(|s| !s.is_empty())
        .collect()
}

fn structure_type(kind: &str) -> Option<StructureType> {
    match kind {
        "class_declaration" | "record_declaration" => Some(StructureType::Class),
        "interface_declaration" | "annotation_type_declaration" => Some(StructureType::Interface),
        "enum_declaration" => Some(StructureType::Enum),
        _ => None,
    }
}

/// Push `node` (if it declares a type) and every type nested in it, outer first.
fn collect_type(
    node: Node,
    content: &[u8],
    package: &str,
    outer: Option<&str>,
    out: &mut Vec<CodeStructure>,
) {
    let Some(structure_type) = structure_type(node.kind()) else {
        return;
    };
    let Some(name) = field_text(node, "name", content).filter(|n| !n.is_empty()) else {
        return;
    };

    let nested_name = match outer {
        Some(outer) => format!("{}.{}", outer, name),
        None => name.to_string(),
    };

    let mut structure = CodeStructure::new(structure_type, name, package);
    if outer.is_some() {
        structure.canonical_name = qualify(package, &nested_name);
    }
    (structure.start, structure.end) = start_end(node);

    if let Some(modifiers) = find_child(node, "modifiers") {
        structure.annotations = extract_modifiers(modifiers, content).1;
    }

    if let Some(superclass) = node.child_by_field_name("superclass") {
        structure.extends.extend(type_names(superclass, content));
    }
    if let Some(interfaces) = node.child_by_field_name("interfaces") {
        structure.implements.extend(type_names(interfaces, content));
    }
    if let Some(extends) = find_child(node, "extends_interfaces") {
        structure.extends.extend(type_names(extends, content));
    }

    let mut nested = Vec::new();
    if let Some(body) = node.child_by_field_name("body") {
        collect_members(body, content, package, &nested_name, &mut structure, &mut nested);
    }

    out.push(structure);
    out.append(&mut nested);
}

fn collect_members(
    body: Node,
    content: &[u8],
    package: &str,
    nested_name: &str,
    structure: &mut CodeStructure,
    nested: &mut Vec<CodeStructure>,
) {
    let is_interface = structure.structure_type == StructureType::Interface;

    for member in named_children(body) {
        match member.kind() {
            "method_declaration" | "constructor_declaration" => {
                structure.methods.push(extract_method(member, content));
            }
            "field_declaration" => {
                for field in extract_fields(member, content) {
                    // Interface fields are implicitly static final
                    let constant = is_interface
                        || (field.modifiers.iter().any(|m| m == "static")
                            && field.modifiers.iter().any(|m| m == "final"));
                    if constant {
                        structure.constants.push(field);
                    } else {
                        structure.fields.push(field);
                    }
                }
            }
            "constant_declaration" => {
                structure.constants.extend(extract_fields(member, content));
            }
            "enum_constant" => {
                if let Some(name) = field_text(member, "name", content) {
                    let (start, end) = start_end(member);
                    structure.constants.push(CodeField {
                        name: name.to_string(),
                        field_type: Some(structure.name.clone()),
                        start,
                        end,
                        ..Default::default()
                    });
                }
            }
            // Members after the constant list of an enum
            "enum_body_declarations" => {
                collect_members(member, content, package, nested_name, structure, nested);
            }
            _ => collect_type(member, content, package, Some(nested_name), nested),
        }
    }
}

fn extract_method(node: Node, content: &[u8]) -> CodeFunction {
    let (start, end) = start_end(node);
    let (modifiers, annotations) = find_child(node, "modifiers")
        .map(|m| extract_modifiers(m, content))
        .unwrap_or_default();

    CodeFunction {
        name: field_text(node, "name", content).unwrap_or_default().to_string(),
        // Constructors have no return type
        return_type: field_text(node, "type", content).map(str::to_string),
        modifiers,
        parameters: node
            .child_by_field_name("parameters")
            .map(|p| extract_parameters(p, content))
            .unwrap_or_default(),
        annotations,
        start,
        end,
    }
}

fn extract_parameters(params: Node, content: &[u8]) -> Vec<CodeParameter> {
    named_children(params)
        .into_iter()
        .filter_map(|param| match param.kind() {
            "formal_parameter" => Some(CodeParameter {
                name: field_text(param, "name", content).unwrap_or_default().to_string(),
                param_type: field_text(param, "type", content).map(str::to_string),
            }),
            "spread_parameter" => {
                let declarator = find_child(param, "variable_declarator")?;
                let param_type = named_children(param)
                    .into_iter()
                    .find(|n| !matches!(n.kind(), "modifiers" | "variable_declarator"))
                    .map(|n| format!("{}...", get_node_text(n, content)));
                Some(CodeParameter {
                    name: field_text(declarator, "name", content)
                        .unwrap_or_default()
                        .to_string(),
                    param_type,
                })
            }
            _ => None,
        })
        .collect()
}

/// One `CodeField` per declarator of a field or constant declaration.
fn extract_fields(node: Node, content: &[u8]) -> Vec<CodeField> {
    let (modifiers, annotations) = find_child(node, "modifiers")
        .map(|m| extract_modifiers(m, content))
        .unwrap_or_default();
    let field_type = field_text(node, "type", content).map(str::to_string);

    named_children(node)
        .into_iter()
        .filter(|n| n.kind() == "variable_declarator")
        .filter_map(|declarator| {
            let name = field_text(declarator, "name", content)?;
            let (start, end) = start_end(declarator);
            Some(CodeField {
                name: name.to_string(),
                field_type: field_type.clone(),
                modifiers: modifiers.clone(),
                annotations: annotations.clone(),
                start,
                end,
            })
        })
        .collect()
}

/// Keyword modifiers and annotations of a `modifiers` node.
fn extract_modifiers(node: Node, content: &[u8]) -> (Vec<String>, Vec<CodeAnnotation>) {
    let mut modifiers = Vec::new();
    let mut annotations = Vec::new();

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "marker_annotation" | "annotation" => {
                let name = field_text(child, "name", content).unwrap_or_default();
                let arguments = field_text(child, "arguments", content)
                    .map(|a| a.trim_start_matches('(').trim_end_matches(')').to_string());
                annotations.push(CodeAnnotation {
                    name: name.to_string(),
                    arguments,
                });
            }
            "line_comment" | "block_comment" => {}
            _ => modifiers.push(get_node_text(child, content).to_string()),
        }
    }

    (modifiers, annotations)
}

/// Bare type names listed under a `superclass`, `super_interfaces` or `extends_interfaces` node.
fn type_names(node: Node, content: &[u8]) -> Vec<String> {
    let mut names = Vec::new();
    for child in named_children(node) {
        if child.kind() == "type_list" {
            names.extend(type_names(child, content));
        } else {
            let name = strip_generics(get_node_text(child, content));
            if !name.is_empty() {
                names.push(name);
            }
        }
    }
    names
}
