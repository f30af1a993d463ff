use tree_sitter::Node;

use super::{
    Language, Structurer, create_ts_parser, field_text, get_node_text, module_path_from_file,
    named_children, parse_tree, start_end,
};
use crate::types::{
    CodeAnnotation, CodeField, CodeFile, CodeFunction, CodeParameter, CodeStructure, Result,
    StructureType, WeaveError, strip_generics,
};

/// Structurer for TypeScript and JavaScript, including their JSX dialects.
pub struct TypeScriptStructurer {
    language: Language,
}

impl TypeScriptStructurer {
    pub fn new(language: Language) -> Result<Self> {
        let grammar = language
            .grammar()
            .filter(|_| is_script(language))
            .ok_or_else(|| WeaveError::UnsupportedLanguage(language.to_string()))?;
        let _ = create_ts_parser(grammar, language.as_str())?;
        Ok(Self { language })
    }
}

fn is_script(language: Language) -> bool {
    matches!(
        language,
        Language::TypeScript | Language::JavaScript | Language::Tsx | Language::Jsx
    )
}

impl Structurer for TypeScriptStructurer {
    fn language(&self) -> Language {
        self.language
    }

    fn is_applicable(&self, language: Language) -> bool {
        is_script(language)
    }

    fn parse_file(&self, source: &str, file_path: &str) -> Result<CodeFile> {
        // `.tsx` needs the TSX grammar even when the structurer was built for plain TypeScript
        let language = Some(Language::from_path(file_path))
            .filter(|l| is_script(*l))
            .unwrap_or(self.language);

        let tree = parse_tree(language, source, file_path)?;
        let content = source.as_bytes();

        let mut file = CodeFile::new(file_path, language.id());
        file.package = module_path_from_file(file_path);

        let package = file.package.clone();
        for node in named_children(tree.root_node()) {
            collect_top_level(node, content, &package, &[], &mut file);
        }

        Ok(file)
    }
}

fn collect_top_level(
    node: Node,
    content: &[u8],
    package: &str,
    decorators: &[CodeAnnotation],
    file: &mut CodeFile,
) {
    match node.kind() {
        "import_statement" => {
            if let Some(source) = node.child_by_field_name("source") {
                let path = get_node_text(source, content).trim_matches(['"', '\'', '`']);
                if !path.is_empty() {
                    file.imports.push(path.to_string());
                }
            }
        }
        // `export class ...`, `@Injectable() export class ...`
        "export_statement" => {
            let mut decorators = decorators.to_vec();
            decorators.extend(decorator_children(node, content));
            for child in named_children(node) {
                collect_top_level(child, content, package, &decorators, file);
            }
        }
        // `declare class ...`
        "ambient_declaration" => {
            for child in named_children(node) {
                collect_top_level(child, content, package, decorators, file);
            }
        }
        "class_declaration" | "abstract_class_declaration" | "interface_declaration"
        | "enum_declaration" => {
            if let Some(mut structure) = extract_structure(node, content, package) {
                let mut annotations = decorators.to_vec();
                annotations.append(&mut structure.annotations);
                structure.annotations = annotations;
                file.classes.push(structure);
            }
        }
        "function_declaration" | "generator_function_declaration" => {
            file.functions.push(extract_function(node, node, content));
        }
        "lexical_declaration" | "variable_declaration" => {
            for declarator in named_children(node) {
                let Some(value) = declarator.child_by_field_name("value") else {
                    continue;
                };
                if matches!(value.kind(), "arrow_function" | "function_expression" | "function") {
                    file.functions.push(extract_function(declarator, value, content));
                }
            }
        }
        _ => {}
    }
}

fn extract_structure(node: Node, content: &[u8], package: &str) -> Option<CodeStructure> {
    let structure_type = match node.kind() {
        "interface_declaration" => StructureType::Interface,
        "enum_declaration" => StructureType::Enum,
        _ => StructureType::Class,
    };
    let name = field_text(node, "name", content).filter(|n| !n.is_empty())?;

    let mut structure = CodeStructure::new(structure_type, name, package);
    (structure.start, structure.end) = start_end(node);
    structure.annotations = decorator_children(node, content);

    for child in named_children(node) {
        match child.kind() {
            "class_heritage" => {
                for clause in named_children(child) {
                    match clause.kind() {
                        "extends_clause" => {
                            structure.extends.extend(heritage_names(clause, content))
                        }
                        "implements_clause" => {
                            structure.implements.extend(heritage_names(clause, content))
                        }
                        _ => {}
                    }
                }
            }
            // Interfaces only extend
            "extends_type_clause" => structure.extends.extend(heritage_names(child, content)),
            _ => {}
        }
    }

    if let Some(body) = node.child_by_field_name("body") {
        match structure_type {
            StructureType::Enum => collect_enum_members(body, content, &mut structure),
            _ => collect_members(body, content, &mut structure),
        }
    }

    Some(structure)
}

fn heritage_names(clause: Node, content: &[u8]) -> Vec<String> {
    named_children(clause)
        .into_iter()
        .filter(|n| n.kind() != "type_arguments")
        .map(|n| strip_generics(get_node_text(n, content)))
        // Mixins such as `extends Base(Other)` name no resolvable type
        .filter(|n| !n.is_empty() && !n.contains('('))
        .collect()
}

fn collect_members(body: Node, content: &[u8], structure: &mut CodeStructure) {
    // Decorators precede their member as siblings inside the class body
    let mut pending: Vec<CodeAnnotation> = Vec::new();

    for member in named_children(body) {
        match member.kind() {
            "decorator" => pending.push(decorator(member, content)),
            "method_definition" | "method_signature" | "abstract_method_signature" => {
                let mut method = extract_function(member, member, content);
                pending.append(&mut method.annotations);
                method.annotations = std::mem::take(&mut pending);

                if method.name == "constructor" {
                    structure
                        .fields
                        .extend(parameter_properties(member, content));
                }
                structure.methods.push(method);
            }
            "public_field_definition" | "property_signature" => {
                let mut field = extract_field(member, content);
                pending.append(&mut field.annotations);
                field.annotations = std::mem::take(&mut pending);

                let is_constant = ["static", "readonly"]
                    .iter()
                    .all(|m| field.modifiers.iter().any(|f| f == m));
                if is_constant {
                    structure.constants.push(field);
                } else {
                    structure.fields.push(field);
                }
            }
            _ => pending.clear(),
        }
    }
}

fn collect_enum_members(body: Node, content: &[u8], structure: &mut CodeStructure) {
    for member in named_children(body) {
        let name_node = match member.kind() {
            "property_identifier" | "string" => member,
            "enum_assignment" => match member.child_by_field_name("name") {
                Some(name) => name,
                None => continue,
            },
            _ => continue,
        };
        let (start, end) = start_end(member);
        structure.constants.push(CodeField {
            name: get_node_text(name_node, content)
                .trim_matches(['"', '\''])
                .to_string(),
            field_type: Some(structure.name.clone()),
            start,
            end,
            ..Default::default()
        });
    }
}

/// `decl` carries the name and span, `func` the signature. They differ for
/// `const handler = (req) => ...`.
fn extract_function(decl: Node, func: Node, content: &[u8]) -> CodeFunction {
    let (start, end) = start_end(decl);

    let parameters = match func.child_by_field_name("parameters") {
        Some(params) => extract_parameters(params, content),
        // Single bare parameter: `x => x + 1`
        None => func
            .child_by_field_name("parameter")
            .map(|p| {
                vec![CodeParameter {
                    name: get_node_text(p, content).to_string(),
                    param_type: None,
                }]
            })
            .unwrap_or_default(),
    };

    let mut modifiers = member_modifiers(decl, content);
    if decl != func {
        modifiers.extend(member_modifiers(func, content));
    }

    CodeFunction {
        name: field_text(decl, "name", content).unwrap_or_default().to_string(),
        return_type: func
            .child_by_field_name("return_type")
            .map(|t| type_annotation(t, content)),
        modifiers,
        parameters,
        annotations: decorator_children(decl, content),
        start,
        end,
    }
}

fn extract_parameters(params: Node, content: &[u8]) -> Vec<CodeParameter> {
    named_children(params)
        .into_iter()
        .filter_map(|param| match param.kind() {
            "required_parameter" | "optional_parameter" => {
                let pattern = param.child_by_field_name("pattern")?;
                Some(CodeParameter {
                    name: get_node_text(pattern, content).to_string(),
                    param_type: param
                        .child_by_field_name("type")
                        .map(|t| type_annotation(t, content)),
                })
            }
            // Plain JavaScript parameters
            "identifier" | "assignment_pattern" | "rest_pattern" => Some(CodeParameter {
                name: get_node_text(param, content).to_string(),
                param_type: None,
            }),
            _ => None,
        })
        .collect()
}

/// Constructor parameters declared with an accessibility or `readonly` modifier are fields.
fn parameter_properties(ctor: Node, content: &[u8]) -> Vec<CodeField> {
    let Some(params) = ctor.child_by_field_name("parameters") else {
        return Vec::new();
    };

    named_children(params)
        .into_iter()
        .filter(|p| matches!(p.kind(), "required_parameter" | "optional_parameter"))
        .filter_map(|param| {
            let modifiers = member_modifiers(param, content);
            if modifiers.is_empty() {
                return None;
            }
            let pattern = param.child_by_field_name("pattern")?;
            let (start, end) = start_end(param);
            Some(CodeField {
                name: get_node_text(pattern, content).to_string(),
                field_type: param
                    .child_by_field_name("type")
                    .map(|t| type_annotation(t, content)),
                modifiers,
                annotations: decorator_children(param, content),
                start,
                end,
            })
        })
        .collect()
}

fn extract_field(node: Node, content: &[u8]) -> CodeField {
    let (start, end) = start_end(node);
    CodeField {
        name: field_text(node, "name", content).unwrap_or_default().to_string(),
        field_type: node
            .child_by_field_name("type")
            .map(|t| type_annotation(t, content)),
        modifiers: member_modifiers(node, content),
        annotations: decorator_children(node, content),
        start,
        end,
    }
}

/// Keyword modifiers written directly on a member, e.g. `private static readonly`.
fn member_modifiers(node: Node, content: &[u8]) -> Vec<String> {
    let mut modifiers = Vec::new();
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "accessibility_modifier" | "override_modifier" => {
                modifiers.push(get_node_text(child, content).to_string())
            }
            "static" | "readonly" | "async" | "abstract" | "declare" | "get" | "set" => {
                modifiers.push(child.kind().to_string())
            }
            _ => {}
        }
    }
    modifiers
}

fn decorator_children(node: Node, content: &[u8]) -> Vec<CodeAnnotation> {
    named_children(node)
        .into_iter()
        .filter(|n| n.kind() == "decorator")
        .map(|n| decorator(n, content))
        .collect()
}

fn decorator(node: Node, content: &[u8]) -> CodeAnnotation {
    let Some(expr) = node.named_child(0) else {
        return CodeAnnotation::new(get_node_text(node, content).trim_start_matches('@'));
    };

    match expr.kind() {
        "call_expression" => CodeAnnotation {
            name: field_text(expr, "function", content)
                .unwrap_or_default()
                .to_string(),
            arguments: field_text(expr, "arguments", content)
                .map(|a| a.trim_start_matches('(').trim_end_matches(')').to_string()),
        },
        _ => CodeAnnotation::new(get_node_text(expr, content)),
    }
}

/// `: Promise<User>` → `Promise<User>`
fn type_annotation(node: Node, content: &[u8]) -> String {
    let text = get_node_text(node, content);
    text.strip_prefix(':').unwrap_or(text).trim().to_string()
}
