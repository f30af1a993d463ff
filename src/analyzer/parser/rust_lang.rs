use tree_sitter::Node;

use super::{
    Language, Structurer, create_ts_parser, field_text, get_node_text, module_path_from_file,
    named_children, parse_tree, start_end,
};
use crate::types::{
    CodeAnnotation, CodeField, CodeFile, CodeFunction, CodeParameter, CodeStructure, Result,
    StructureType, qualify, strip_generics,
};

pub struct RustStructurer;

impl RustStructurer {
    pub fn new() -> Result<Self> {
        // Validate parser creation at construction time
        let _ = create_ts_parser(tree_sitter_rust::LANGUAGE, "Rust")?;
        Ok(Self)
    }
}

impl Structurer for RustStructurer {
    fn language(&self) -> Language {
        Language::Rust
    }

    fn parse_file(&self, source: &str, file_path: &str) -> Result<CodeFile> {
        let tree = parse_tree(Language::Rust, source, file_path)?;
        let content = source.as_bytes();

        let mut file = CodeFile::new(file_path, Language::Rust.id());
        file.package = module_path_from_file(file_path);

        let mut impls = Vec::new();
        let package = file.package.clone();
        collect_items(tree.root_node(), content, &package, &mut file, &mut impls);

        // impl blocks may precede the type they extend
        for block in impls {
            attach_impl(&mut file, block);
        }

        Ok(file)
    }
}

/// Members of one `impl` block, waiting to be attached to their type.
struct ImplBlock {
    package: String,
    type_name: String,
    trait_name: Option<String>,
    methods: Vec<CodeFunction>,
    constants: Vec<CodeField>,
}

fn collect_items(
    container: Node,
    content: &[u8],
    package: &str,
    file: &mut CodeFile,
    impls: &mut Vec<ImplBlock>,
) {
    let mut attributes: Vec<CodeAnnotation> = Vec::new();

    for item in named_children(container) {
        match item.kind() {
            "attribute_item" => {
                attributes.extend(attribute(item, content));
                continue;
            }
            "line_comment" | "block_comment" => continue,
            "use_declaration" => {
                if let Some(argument) = field_text(item, "argument", content) {
                    file.imports.push(argument.to_string());
                }
            }
            "struct_item" | "enum_item" | "trait_item" => {
                if let Some(mut structure) = extract_structure(item, content, package) {
                    structure.annotations = std::mem::take(&mut attributes);
                    file.classes.push(structure);
                }
            }
            "function_item" => {
                let mut function = extract_function(item, content);
                function.annotations = std::mem::take(&mut attributes);
                file.functions.push(function);
            }
            "impl_item" => {
                if let Some(block) = extract_impl(item, content, package) {
                    impls.push(block);
                }
            }
            // Inline modules extend the package path
            "mod_item" => {
                if let (Some(name), Some(body)) = (
                    field_text(item, "name", content),
                    item.child_by_field_name("body"),
                ) {
                    collect_items(body, content, &qualify(package, name), file, impls);
                }
            }
            _ => {}
        }
        attributes.clear();
    }
}

fn extract_structure(node: Node, content: &[u8], package: &str) -> Option<CodeStructure> {
    let structure_type = match node.kind() {
        "struct_item" => StructureType::Struct,
        "enum_item" => StructureType::Enum,
        _ => StructureType::Trait,
    };
    let name = field_text(node, "name", content).filter(|n| !n.is_empty())?;

    let mut structure = CodeStructure::new(structure_type, name, package);
    (structure.start, structure.end) = start_end(node);

    // Supertraits: `trait Shape: Debug + Clone`
    if let Some(bounds) = node.child_by_field_name("bounds") {
        structure.extends = named_children(bounds)
            .into_iter()
            .filter(|n| n.kind() != "lifetime")
            .map(|n| strip_generics(get_node_text(n, content)))
            .filter(|n| !n.is_empty())
            .collect();
    }

    let Some(body) = node.child_by_field_name("body") else {
        return Some(structure);
    };

    match body.kind() {
        "field_declaration_list" => {
            structure.fields = named_children(body)
                .into_iter()
                .filter(|n| n.kind() == "field_declaration")
                .map(|decl| {
                    let (start, end) = start_end(decl);
                    CodeField {
                        name: field_text(decl, "name", content).unwrap_or_default().to_string(),
                        field_type: field_text(decl, "type", content).map(str::to_string),
                        modifiers: visibility(decl, content),
                        annotations: Vec::new(),
                        start,
                        end,
                    }
                })
                .collect();
        }
        // Tuple struct: fields are named by position
        "ordered_field_declaration_list" => {
            let mut cursor = body.walk();
            let types: Vec<Node> = body.children_by_field_name("type", &mut cursor).collect();
            structure.fields = types
                .into_iter()
                .enumerate()
                .map(|(idx, ty)| {
                    let (start, end) = start_end(ty);
                    CodeField {
                        name: idx.to_string(),
                        field_type: Some(get_node_text(ty, content).to_string()),
                        start,
                        end,
                        ..Default::default()
                    }
                })
                .collect();
        }
        "enum_variant_list" => {
            structure.constants = named_children(body)
                .into_iter()
                .filter(|n| n.kind() == "enum_variant")
                .filter_map(|variant| {
                    let (start, end) = start_end(variant);
                    Some(CodeField {
                        name: field_text(variant, "name", content)?.to_string(),
                        field_type: Some(name.to_string()),
                        start,
                        end,
                        ..Default::default()
                    })
                })
                .collect();
        }
        "declaration_list" => {
            let (methods, constants) = associated_items(body, content);
            structure.methods = methods;
            structure.constants = constants;
        }
        _ => {}
    }

    Some(structure)
}

fn extract_impl(node: Node, content: &[u8], package: &str) -> Option<ImplBlock> {
    let type_name = field_text(node, "type", content).map(strip_generics)?;
    let trait_name = field_text(node, "trait", content).map(strip_generics);
    let (methods, constants) = node
        .child_by_field_name("body")
        .map(|body| associated_items(body, content))
        .unwrap_or_default();

    Some(ImplBlock {
        package: package.to_string(),
        type_name,
        trait_name,
        methods,
        constants,
    })
}

fn attach_impl(file: &mut CodeFile, block: ImplBlock) {
    let target = file.classes.iter_mut().find(|s| {
        s.name == block.type_name
            && s.package == block.package
            && s.structure_type != StructureType::Trait
    });

    let Some(structure) = target else {
        tracing::debug!(
            "{}: impl for {} has no type declared in this file",
            file.filepath,
            block.type_name
        );
        return;
    };

    if let Some(trait_name) = block.trait_name
        && !structure.implements.contains(&trait_name)
    {
        structure.implements.push(trait_name);
    }
    structure.methods.extend(block.methods);
    structure.constants.extend(block.constants);
}

/// Functions and consts inside a trait or impl body.
fn associated_items(body: Node, content: &[u8]) -> (Vec<CodeFunction>, Vec<CodeField>) {
    let mut methods = Vec::new();
    let mut constants = Vec::new();
    let mut attributes: Vec<CodeAnnotation> = Vec::new();

    for item in named_children(body) {
        match item.kind() {
            "attribute_item" => {
                attributes.extend(attribute(item, content));
                continue;
            }
            "line_comment" | "block_comment" => continue,
            "function_item" | "function_signature_item" => {
                let mut method = extract_function(item, content);
                method.annotations = std::mem::take(&mut attributes);
                methods.push(method);
            }
            "const_item" => {
                let (start, end) = start_end(item);
                constants.push(CodeField {
                    name: field_text(item, "name", content).unwrap_or_default().to_string(),
                    field_type: field_text(item, "type", content).map(str::to_string),
                    modifiers: visibility(item, content),
                    annotations: std::mem::take(&mut attributes),
                    start,
                    end,
                });
            }
            _ => {}
        }
        attributes.clear();
    }

    (methods, constants)
}

fn extract_function(node: Node, content: &[u8]) -> CodeFunction {
    let (start, end) = start_end(node);

    let mut modifiers = visibility(node, content);
    if let Some(fn_modifiers) = named_children(node)
        .into_iter()
        .find(|n| n.kind() == "function_modifiers")
    {
        let mut cursor = fn_modifiers.walk();
        modifiers.extend(
            fn_modifiers
                .children(&mut cursor)
                .map(|m| get_node_text(m, content).to_string()),
        );
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
        .filter_map(|param| match param.kind() {
            "parameter" => Some(CodeParameter {
                name: field_text(param, "pattern", content)
                    .unwrap_or_default()
                    .to_string(),
                param_type: field_text(param, "type", content).map(str::to_string),
            }),
            "variadic_parameter" => Some(CodeParameter {
                name: "...".to_string(),
                param_type: None,
            }),
            // `self`, `&mut self`
            _ => None,
        })
        .collect()
}

fn visibility(node: Node, content: &[u8]) -> Vec<String> {
    named_children(node)
        .into_iter()
        .find(|n| n.kind() == "visibility_modifier")
        .map(|v| vec![get_node_text(v, content).to_string()])
        .unwrap_or_default()
}

/// `#[derive(Debug, Clone)]` → `derive` with arguments `Debug, Clone`.
fn attribute(item: Node, content: &[u8]) -> Option<CodeAnnotation> {
    let attr = named_children(item)
        .into_iter()
        .find(|n| n.kind() == "attribute")?;
    let path = attr.named_child(0)?;
    Some(CodeAnnotation {
        name: get_node_text(path, content).to_string(),
        arguments: field_text(attr, "arguments", content)
            .map(|a| a.trim_start_matches('(').trim_end_matches(')').to_string()),
    })
}
