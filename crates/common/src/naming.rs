//! Deterministic identifier derivation
//!
//! Every generated name is a pure function of AST names: parts are case
//! converted by the caller, then joined with [`NAME_COMBINATOR`].

use crate::ast::{Method, NamespaceRoot};
use heck::ToLowerCamelCase;

/// Character joining the parts of a derived name
pub const NAME_COMBINATOR: &str = "_";

pub const DEFAULT_FILE_PREFIX: &str = "index";
pub const DEFAULT_FILE_SUFFIX: &str = "ts";

/// One element of a name: a single part or an already-grouped sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamePart {
    One(String),
    Many(Vec<String>),
}

impl From<&str> for NamePart {
    fn from(part: &str) -> Self {
        NamePart::One(part.to_string())
    }
}

impl From<String> for NamePart {
    fn from(part: String) -> Self {
        NamePart::One(part)
    }
}

impl From<Vec<String>> for NamePart {
    fn from(parts: Vec<String>) -> Self {
        NamePart::Many(parts)
    }
}

impl From<Vec<&str>> for NamePart {
    fn from(parts: Vec<&str>) -> Self {
        NamePart::Many(parts.into_iter().map(str::to_string).collect())
    }
}

/// Flatten `parts` and join them with [`NAME_COMBINATOR`]
///
/// # Examples
/// ```
/// use proto_converter_common::{assemble_name, NamePart};
///
/// assert_eq!(assemble_name(["svc", "method"]), "svc_method");
/// assert_eq!(
///     assemble_name([NamePart::from(vec!["svc"]), NamePart::from("method")]),
///     "svc_method"
/// );
/// ```
pub fn assemble_name<I, P>(parts: I) -> String
where
    I: IntoIterator<Item = P>,
    P: Into<NamePart>,
{
    let mut flat: Vec<String> = Vec::new();
    for part in parts {
        match part.into() {
            NamePart::One(part) => flat.push(part),
            NamePart::Many(group) => flat.extend(group),
        }
    }
    flat.join(NAME_COMBINATOR)
}

/// Service-scoped method name, e.g. `Greeter.GetUser` -> `greeter_getUser`
///
/// The parent service is resolved through `root`; a dangling reference
/// contributes an empty part.
pub fn create_method_name(method: &Method, root: &NamespaceRoot) -> String {
    let parent = root
        .service(&method.parent)
        .map(|service| service.name.to_lower_camel_case())
        .unwrap_or_default();
    assemble_name([parent, method.name.to_lower_camel_case()])
}

/// Method name used inside typing declarations, which are already scoped
/// by their module
pub fn create_typing_method_name(method: &Method) -> String {
    method.name.to_lower_camel_case()
}

/// Identifier for a fully-qualified proto type, e.g. `.demo.User` -> `demo_User`
pub fn full_type_name(full_name: &str) -> String {
    assemble_name(full_name.split('.').filter(|segment| !segment.is_empty()))
}

/// `<prefix>.<suffix>`, where the suffix excludes the leading dot
pub fn create_file_name(prefix: Option<&str>, suffix: Option<&str>) -> String {
    format!(
        "{}.{}",
        prefix.unwrap_or(DEFAULT_FILE_PREFIX),
        suffix.unwrap_or(DEFAULT_FILE_SUFFIX)
    )
}
