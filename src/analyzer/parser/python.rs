use tree_sitter::Node;

use super::{
    Language, Structurer, create_ts_parser, field_text, get_node_text, module_path_from_file,
    named_children, parse_tree, start_end,
};
use crate::types::{
    CodeAnnotation, CodeField, CodeFile, CodeFunction, CodeParameter, CodeStructure, Result,
    StructureType, last_segment, qualify, strip_generics,
};

/// Bases that turn a class into an interface. They are not kept as `extends` entries.
const INTERFACE_MARKERS: &[&str] = &["Protocol", "ABC"];

pub struct PythonStructurer;

impl PythonStructurer {
    pub fn new() -> Result<Self> {
        // Validate that the language is available
        let _ = create_ts_parser(tree_sitter_python::LANGUAGE, "Python")?;
        Ok(Self)
    }
}

impl Structurer for PythonStructurer {
    fn language(&self) -> Language {
        Language::Python
    }

    fn parse_file(&self, source: &str, file_path: &str) -> Result<CodeFile> {
        let tree = parse_tree(Language::Python, source, file_path)?;
        let content = source.as_bytes();

        let mut file = CodeFile::new(file_path, Language::Python.id());
        file.package = module_path_from_file(file_path);

        let package = file.package.clone();
        for node in named_children(tree.root_node()) {
            let (definition, decorators) = unwrap_decorated(node, content);
            match definition.kind() {
                "import_statement" | "import_from_statement" => {
                    file.imports.extend(extract_imports(definition, content));
                }
                "class_definition" => {
                    collect_class(
                        definition,
                        content,
                        &package,
                        None,
                        decorators,
                        &mut file.classes,
                    );
                }
                "function_definition" => {
                    let mut function = extract_function(definition, content);
                    function.annotations = decorators;
                    file.functions.push(function);
                }
                _ => {}
            }
        }

        move_same_file_interfaces_to_implements(&mut file.classes);
        Ok(file)
    }
}

/// `@decorator def ...` wraps the definition; return the definition and its decorators.
fn unwrap_decorated<'t>(node: Node<'t>, content: &[u8]) -> (Node<'t>, Vec<CodeAnnotation>) {
    if node.kind() != "decorated_definition" {
        return (node, Vec::new());
    }
    let decorators = named_children(node)
        .into_iter()
        .filter(|n| n.kind() == "decorator")
        .map(|n| decorator(n, content))
        .collect();
    match node.child_by_field_name("definition") {
        Some(definition) => (definition, decorators),
        None => (node, decorators),
    }
}

fn decorator(node: Node, content: &[u8]) -> CodeAnnotation {
    let Some(expr) = node.named_child(0) else {
        return CodeAnnotation::new(get_node_text(node, content).trim_start_matches('@'));
    };
    match expr.kind() {
        "call" => CodeAnnotation {
            name: field_text(expr, "function", content)
                .unwrap_or_default()
                .to_string(),
            arguments: field_text(expr, "arguments", content)
                .map(|a| a.trim_start_matches('(').trim_end_matches(')').to_string()),
        },
        _ => CodeAnnotation::new(get_node_text(expr, content)),
    }
}

fn extract_imports(node: Node, content: &[u8]) -> Vec<String> {
    if node.kind() == "import_from_statement" {
        // `from a.b import c, d` imports from `a.b`
        return field_text(node, "module_name", content)
            .filter(|m| !m.is_empty())
            .map(|m| vec![m.to_string()])
            .unwrap_or_default();
    }

    named_children(node)
        .into_iter()
        .filter_map(|n| match n.kind() {
            "dotted_name" => Some(get_node_text(n, content).to_string()),
            "aliased_import" => field_text(n, "name", content).map(str::to_string),
            _ => None,
        })
        .collect()
}

fn collect_class(
    node: Node,
    content: &[u8],
    package: &str,
    outer: Option<&str>,
    decorators: Vec<CodeAnnotation>,
    out: &mut Vec<CodeStructure>,
) {
    let Some(name) = field_text(node, "name", content).filter(|n| !n.is_empty()) else {
        return;
    };
    let nested_name = match outer {
        Some(outer) => format!("{}.{}", outer, name),
        None => name.to_string(),
    };

    let mut structure = CodeStructure::new(StructureType::Class, name, package);
    if outer.is_some() {
        structure.canonical_name = qualify(package, &nested_name);
    }
    (structure.start, structure.end) = start_end(node);
    structure.annotations = decorators;

    let mut is_interface = false;
    if let Some(bases) = node.child_by_field_name("superclasses") {
        for base in named_children(bases) {
            // `metaclass=ABCMeta` and friends
            if base.kind() == "keyword_argument" {
                continue;
            }
            let name = strip_generics(get_node_text(base, content));
            if name.is_empty() {
                continue;
            }
            if INTERFACE_MARKERS.contains(&last_segment(&name)) {
                is_interface = true;
            } else {
                structure.extends.push(name);
            }
        }
    }
    if is_interface {
        structure.structure_type = StructureType::Interface;
    }

    let mut nested = Vec::new();
    if let Some(body) = node.child_by_field_name("body") {
        for member in named_children(body) {
            let (definition, decorators) = unwrap_decorated(member, content);
            match definition.kind() {
                "function_definition" => {
                    let mut method = extract_function(definition, content);
                    method.annotations = decorators;
                    if method.name == "__init__" {
                        structure.fields.extend(instance_fields(definition, content));
                    }
                    structure.methods.push(method);
                }
                "expression_statement" => {
                    for field in class_attributes(definition, content) {
                        if is_constant_name(&field.name) {
                            structure.constants.push(field);
                        } else {
                            structure.fields.push(field);
                        }
                    }
                }
                "class_definition" => collect_class(
                    definition,
                    content,
                    package,
                    Some(&nested_name),
                    decorators,
                    &mut nested,
                ),
                _ => {}
            }
        }
    }

    // Keep declaration order stable when `__init__` redeclares a class attribute
    dedup_fields(&mut structure.fields);

    out.push(structure);
    out.append(&mut nested);
}

/// A base that names an interface declared in the same file is an implementation, not an
/// extension.
fn move_same_file_interfaces_to_implements(classes: &mut [CodeStructure]) {
    let interfaces: Vec<String> = classes
        .iter()
        .filter(|c| c.structure_type == StructureType::Interface)
        .map(|c| c.name.clone())
        .collect();
    if interfaces.is_empty() {
        return;
    }

    for class in classes
        .iter_mut()
        .filter(|c| c.structure_type != StructureType::Interface)
    {
        let (implements, extends): (Vec<String>, Vec<String>) = std::mem::take(&mut class.extends)
            .into_iter()
            .partition(|base| interfaces.iter().any(|i| i == last_segment(base)));
        class.extends = extends;
        class.implements.extend(implements);
    }
}

fn extract_function(node: Node, content: &[u8]) -> CodeFunction {
    let (start, end) = start_end(node);

    let mut modifiers = Vec::new();
    if node.child(0).is_some_and(|c| c.kind() == "async") {
        modifiers.push("async".to_string());
    }

    CodeFunction {
        name: field_text(node, "name", content).unwrap_or_default().to_string(),
        return_type: field_text(node, "return_type", content).map(str::to_string),
        modifiers,
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
    named_children(params)
        .into_iter()
        .filter_map(|param| {
            let (name, param_type) = match param.kind() {
                "identifier" => (get_node_text(param, content).to_string(), None),
                "typed_parameter" => {
                    let name = named_children(param)
                        .into_iter()
                        .find(|n| {
                            matches!(
                                n.kind(),
                                "identifier" | "list_splat_pattern" | "dictionary_splat_pattern"
                            )
                        })
                        .map(|n| get_node_text(n, content).to_string())?;
                    (name, field_text(param, "type", content).map(str::to_string))
                }
                "default_parameter" | "typed_default_parameter" => (
                    field_text(param, "name", content)?.to_string(),
                    field_text(param, "type", content).map(str::to_string),
                ),
                "list_splat_pattern" | "dictionary_splat_pattern" => {
                    (get_node_text(param, content).to_string(), None)
                }
                _ => return None,
            };
            Some(CodeParameter { name, param_type })
        })
        // The receiver is implicit
        .filter(|p| p.name != "self" && p.name != "cls")
        .collect()
}

/// `name: int = 0` / `NAME = 1` at class level.
fn class_attributes(statement: Node, content: &[u8]) -> Vec<CodeField> {
    named_children(statement)
        .into_iter()
        .filter(|n| n.kind() == "assignment")
        .filter_map(|assignment| {
            let left = assignment.child_by_field_name("left")?;
            if left.kind() != "identifier" {
                return None;
            }
            let (start, end) = start_end(assignment);
            Some(CodeField {
                name: get_node_text(left, content).to_string(),
                field_type: field_text(assignment, "type", content).map(str::to_string),
                start,
                end,
                ..Default::default()
            })
        })
        .collect()
}

/// `self.x = ...` statements directly in the body of `__init__`.
fn instance_fields(init: Node, content: &[u8]) -> Vec<CodeField> {
    let Some(body) = init.child_by_field_name("body") else {
        return Vec::new();
    };

    named_children(body)
        .into_iter()
        .filter(|n| n.kind() == "expression_statement")
        .flat_map(named_children)
        .filter(|n| n.kind() == "assignment")
        .filter_map(|assignment| {
            let left = assignment.child_by_field_name("left")?;
            if left.kind() != "attribute" || field_text(left, "object", content)? != "self" {
                return None;
            }
            let (start, end) = start_end(assignment);
            Some(CodeField {
                name: field_text(left, "attribute", content)?.to_string(),
                field_type: field_text(assignment, "type", content).map(str::to_string),
                start,
                end,
                ..Default::default()
            })
        })
        .collect()
}

fn dedup_fields(fields: &mut Vec<CodeField>) {
    let mut seen = std::collections::HashSet::new();
    fields.retain(|f| seen.insert(f.name.clone()));
}

fn is_constant_name(name: &str) -> bool {
    name.chars().any(|c| c.is_ascii_uppercase())
        && name
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}
