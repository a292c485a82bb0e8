//! Template loading and management

use proto_converter_common::{assemble_comment, CommentInput, ConverterError, Result};
use std::collections::HashMap;
use tera::{Tera, Value};

/// Load all templates
pub fn load_templates() -> Result<Tera> {
    let mut tera = Tera::default();

    tera.register_filter("comment", comment_filter);

    tera.add_raw_template(
        "typescript.ts",
        include_str!("../templates/typescript.ts.tera"),
    )
    .map_err(|e| {
        ConverterError::Generation(format!("Failed to load typescript.ts template: {}", e))
    })?;

    tera.add_raw_template("resolver.ts", include_str!("../templates/resolver.ts.tera"))
        .map_err(|e| {
            ConverterError::Generation(format!("Failed to load resolver.ts template: {}", e))
        })?;

    tera.add_raw_template("gql.ts", include_str!("../templates/gql.ts.tera"))
        .map_err(|e| {
            ConverterError::Generation(format!("Failed to load gql.ts template: {}", e))
        })?;

    Ok(tera)
}

/// Render `template`, mapping template failures to generation errors
pub fn render(tera: &Tera, template: &str, context: &tera::Context) -> Result<String> {
    tera.render(template, context)
        .map_err(|e| ConverterError::Generation(format!("Template error in {}: {:?}", template, e)))
}

/// Filter rendering an optional proto comment
///
/// Accepts `label` (defaults to `//`) and `inline` (defaults to false).
fn comment_filter(value: &Value, args: &HashMap<String, Value>) -> tera::Result<Value> {
    let comment = match value {
        Value::Null => None,
        Value::String(s) => Some(s.as_str()),
        _ => return Err(tera::Error::msg("comment filter expects a string or null")),
    };

    let mut input = CommentInput::new(comment);
    if let Some(label) = args.get("label") {
        input = input.label(
            label
                .as_str()
                .ok_or_else(|| tera::Error::msg("comment filter `label` must be a string"))?,
        );
    }
    if let Some(inline) = args.get("inline") {
        input = input.inline(
            inline
                .as_bool()
                .ok_or_else(|| tera::Error::msg("comment filter `inline` must be a bool"))?,
        );
    }

    Ok(Value::String(assemble_comment(input)))
}
