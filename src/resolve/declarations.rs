//! Declaring-position detection.
//!
//! An identifier occurrence is declaring when the nearest ancestor whose kind
//! appears in the language's table holds it inside that entry's field. The
//! nearest ancestor decides: in `int y = x;` the `init_declarator` owns both
//! names, and only `y` sits in its `declarator` field.

use crate::ingest::detect::Language;

/// (ancestor kind, field holding the declared name)
type DeclarationField = (&'static str, &'static str);

const RUST: &[DeclarationField] = &[
    ("let_declaration", "pattern"),
    ("parameter", "pattern"),
    ("for_expression", "pattern"),
    ("function_item", "name"),
    ("function_signature_item", "name"),
    ("struct_item", "name"),
    ("enum_item", "name"),
    ("union_item", "name"),
    ("trait_item", "name"),
    ("type_item", "name"),
    ("const_item", "name"),
    ("static_item", "name"),
    ("mod_item", "name"),
    ("macro_definition", "name"),
    ("field_declaration", "name"),
    ("enum_variant", "name"),
];

const PYTHON: &[DeclarationField] = &[
    ("function_definition", "name"),
    ("class_definition", "name"),
    ("assignment", "left"),
    ("for_statement", "left"),
    ("default_parameter", "name"),
    ("typed_default_parameter", "name"),
];

const C: &[DeclarationField] = &[
    ("function_declarator", "declarator"),
    ("init_declarator", "declarator"),
    ("declaration", "declarator"),
    ("parameter_declaration", "declarator"),
    ("field_declaration", "declarator"),
    ("type_definition", "declarator"),
    ("struct_specifier", "name"),
    ("union_specifier", "name"),
    ("enum_specifier", "name"),
    ("enumerator", "name"),
];

const CPP: &[DeclarationField] = &[
    ("function_declarator", "declarator"),
    ("init_declarator", "declarator"),
    ("declaration", "declarator"),
    ("parameter_declaration", "declarator"),
    ("field_declaration", "declarator"),
    ("type_definition", "declarator"),
    ("struct_specifier", "name"),
    ("union_specifier", "name"),
    ("enum_specifier", "name"),
    ("enumerator", "name"),
    ("class_specifier", "name"),
    ("namespace_definition", "name"),
    ("alias_declaration", "name"),
];

const JAVA: &[DeclarationField] = &[
    ("class_declaration", "name"),
    ("interface_declaration", "name"),
    ("enum_declaration", "name"),
    ("record_declaration", "name"),
    ("method_declaration", "name"),
    ("constructor_declaration", "name"),
    ("variable_declarator", "name"),
    ("formal_parameter", "name"),
    ("catch_formal_parameter", "name"),
    ("enum_constant", "name"),
];

const JAVASCRIPT: &[DeclarationField] = &[
    ("function_declaration", "name"),
    ("generator_function_declaration", "name"),
    ("function_expression", "name"),
    ("class_declaration", "name"),
    ("method_definition", "name"),
    ("variable_declarator", "name"),
];

const TYPESCRIPT: &[DeclarationField] = &[
    ("function_declaration", "name"),
    ("generator_function_declaration", "name"),
    ("function_expression", "name"),
    ("class_declaration", "name"),
    ("method_definition", "name"),
    ("variable_declarator", "name"),
    ("interface_declaration", "name"),
    ("type_alias_declaration", "name"),
    ("enum_declaration", "name"),
    ("required_parameter", "pattern"),
    ("optional_parameter", "pattern"),
];

const GO: &[DeclarationField] = &[
    ("short_var_declaration", "left"),
    ("range_clause", "left"),
    ("var_spec", "name"),
    ("const_spec", "name"),
    ("type_spec", "name"),
    ("type_alias", "name"),
    ("function_declaration", "name"),
    ("method_declaration", "name"),
    ("parameter_declaration", "name"),
    ("variadic_parameter_declaration", "name"),
    ("field_declaration", "name"),
];

/// Declaration table for `language`.
pub fn declaration_fields(language: Language) -> &'static [(&'static str, &'static str)] {
    match language {
        Language::Rust => RUST,
        Language::Python => PYTHON,
        Language::C => C,
        Language::Cpp => CPP,
        Language::Java => JAVA,
        Language::JavaScript => JAVASCRIPT,
        Language::TypeScript => TYPESCRIPT,
        Language::Go => GO,
    }
}

/// Whether `node` is the declared name of its nearest declaration ancestor.
pub fn is_declaring(node: tree_sitter::Node<'_>, language: Language) -> bool {
    let table = declaration_fields(language);

    let mut current = node;
    while let Some(parent) = current.parent() {
        if let Some(&(_, field)) = table.iter().find(|(kind, _)| *kind == parent.kind()) {
            let mut cursor = parent.walk();
            let declared = parent
                .children_by_field_name(field, &mut cursor)
                .any(|child| {
                    child.start_byte() <= node.start_byte() && node.end_byte() <= child.end_byte()
                });
            return declared;
        }
        current = parent;
    }

    false
}
