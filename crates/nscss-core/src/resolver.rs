//! Variable substitution under lexical scoping.
//!
//! Because every rule carries the full snapshot of bindings visible at
//! its scope, resolution is a local pass over each list: no scope stack
//! is threaded through the walk.

use crate::ast::{StyleRule, Stylesheet, Variable};
use crate::error::{CompileError, CompileResult};

/// Rewrite every `$name` reference in the sheet to its bound literal.
///
/// Lists resolve front to back, so an entry only sees bindings declared
/// before it and forward references fail. Lookups scan in reverse, so
/// when a name is shadowed the nearest binding wins.
pub fn resolve(mut stylesheet: Stylesheet<'_>) -> CompileResult<Stylesheet<'_>> {
    resolve_variables(&mut stylesheet.variables)?;
    for rule in &mut stylesheet.rules {
        resolve_rule(rule)?;
    }
    Ok(stylesheet)
}

fn resolve_rule(rule: &mut StyleRule<'_>) -> CompileResult<()> {
    resolve_variables(&mut rule.variables)?;

    for declaration in &mut rule.declarations {
        if declaration.value.starts_with('$') {
            declaration.value = lookup(&rule.variables, declaration.value)?;
        }
    }

    for child in &mut rule.children {
        resolve_rule(child)?;
    }
    Ok(())
}

/// Resolve references between entries of one list. Entry `i` may only
/// reference entries `[0, i)`, which are already literal by the time it
/// is reached.
fn resolve_variables(variables: &mut [Variable<'_>]) -> CompileResult<()> {
    for i in 0..variables.len() {
        if !variables[i].value.starts_with('$') {
            continue;
        }
        let resolved = lookup(&variables[..i], variables[i].value)?;
        variables[i].value = resolved;
    }
    Ok(())
}

fn lookup<'src>(variables: &[Variable<'src>], reference: &str) -> CompileResult<&'src str> {
    variables
        .iter()
        .rev()
        .find(|variable| variable.name == reference)
        .map(|variable| variable.value)
        .ok_or(CompileError::UndefinedVariable)
}
