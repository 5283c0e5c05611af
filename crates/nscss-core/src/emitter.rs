//! Flattening of the rule tree and CSS text output.

use crate::ast::{Declaration, StyleRule, Stylesheet};

/// A flattened rule: the full selector path and its declarations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatRule<'src> {
    pub selector: String,
    pub declarations: Vec<Declaration<'src>>,
}

/// Flatten nested rules into a list ordered by depth-first pre-order.
///
/// Nesting becomes a descendant combinator: a child's selector is its
/// parent's full selector, a space, then its own. Rules without
/// declarations are kept, so an author's empty blocks survive.
pub fn emit<'src>(stylesheet: &Stylesheet<'src>) -> Vec<FlatRule<'src>> {
    let mut flat = Vec::new();
    for rule in &stylesheet.rules {
        emit_rule(rule, None, &mut flat);
    }
    flat
}

fn emit_rule<'src>(rule: &StyleRule<'src>, parent: Option<&str>, out: &mut Vec<FlatRule<'src>>) {
    let selector = match parent {
        Some(parent) => format!("{} {}", parent, rule.selector),
        None => rule.selector.to_string(),
    };

    out.push(FlatRule {
        selector: selector.clone(),
        declarations: rule.declarations.clone(),
    });

    for child in &rule.children {
        emit_rule(child, Some(&selector), out);
    }
}

/// Render the flat list as CSS text. Rules are separated by one blank
/// line; declarations are indented two spaces.
pub fn emit_css(rules: &[FlatRule<'_>]) -> String {
    let mut out = String::new();

    for (index, rule) in rules.iter().enumerate() {
        if index > 0 {
            out.push('\n');
        }
        out.push_str(&rule.selector);
        out.push_str(" {\n");
        for declaration in &rule.declarations {
            emit_declaration(declaration, &mut out);
        }
        out.push_str("}\n");
    }

    out
}

fn emit_declaration(declaration: &Declaration<'_>, out: &mut String) {
    out.push_str("  ");
    out.push_str(declaration.property);
    out.push_str(": ");
    out.push_str(declaration.value);
    out.push_str(";\n");
}
