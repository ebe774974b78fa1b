//! Human-readable output formatting

use crate::collection::{format_float, Primitive};
use crate::engine::executor::{ExecutionResult, ResultData};

pub fn format_human(result: &ExecutionResult) -> String {
    match &result.data {
        ResultData::Value(value) => render_tree(&Primitive::from(value)),
        ResultData::Explanation(lines) => {
            let mut output = String::from("Pipeline\n--------\n");
            for line in lines {
                output.push_str(line);
                output.push('\n');
            }
            output
        }
    }
}

/// Render a tree as indented lines.
///
/// Sequences print one `- item` line per element, mappings one `key: value`
/// line per entry. Nested containers open a new indented block.
pub fn render_tree(tree: &Primitive) -> String {
    if tree.is_scalar() || is_empty_container(tree) {
        return scalar_text(tree);
    }
    let mut output = String::new();
    render_into(&mut output, tree, 0);
    output
}

fn render_into(output: &mut String, tree: &Primitive, depth: usize) {
    let indent = "  ".repeat(depth);
    match tree {
        Primitive::List(items) => {
            for item in items {
                push_entry(output, &indent, "-", item, depth);
            }
        }
        Primitive::Map(entries) => {
            for (key, value) in entries {
                push_entry(output, &indent, &format!("{}:", key), value, depth);
            }
        }
        scalar => {
            output.push_str(&indent);
            output.push_str(&scalar_text(scalar));
            output.push('\n');
        }
    }
}

fn push_entry(output: &mut String, indent: &str, label: &str, value: &Primitive, depth: usize) {
    output.push_str(indent);
    output.push_str(label);
    if value.is_scalar() || is_empty_container(value) {
        output.push(' ');
        output.push_str(&scalar_text(value));
        output.push('\n');
    } else {
        output.push('\n');
        render_into(output, value, depth + 1);
    }
}

fn is_empty_container(tree: &Primitive) -> bool {
    match tree {
        Primitive::List(items) => items.is_empty(),
        Primitive::Map(entries) => entries.is_empty(),
        _ => false,
    }
}

fn scalar_text(tree: &Primitive) -> String {
    match tree {
        Primitive::Null => "null".to_string(),
        Primitive::Bool(b) => b.to_string(),
        Primitive::Int(n) => n.to_string(),
        Primitive::Float(f) => format_float(*f),
        Primitive::Str(s) => s.clone(),
        Primitive::List(_) => "[]".to_string(),
        Primitive::Map(_) => "{}".to_string(),
    }
}
