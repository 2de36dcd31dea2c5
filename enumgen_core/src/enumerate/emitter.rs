//! Go code emission for `Enum()` accessors.

use super::EnumerationResult;

/// The command line recorded in the header of a generated file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHeader {
    pub args: Vec<String>,
}

impl FileHeader {
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// `// Code generated by "enumgen <args>"; DO NOT EDIT.`
    pub fn render(&self) -> String {
        let mut command = String::from("enumgen");
        for arg in &self.args {
            command.push(' ');
            command.push_str(arg);
        }
        format!("// Code generated by \"{}\"; DO NOT EDIT.\n", command)
    }
}

/// Render the `Enum()` accessor for `type_name`.
///
/// Returns `None` when the type has no values, in which case nothing should
/// be generated for it.
pub fn emit(result: &EnumerationResult, type_name: &str) -> Option<String> {
    if result.is_empty() {
        return None;
    }

    let mut out = String::new();
    out.push('\n');
    out.push_str("// Enum returns a list of values declared for a type.\n");
    out.push_str(&format!("func ({}) Enum() []interface{{}} {{\n", type_name));
    out.push_str("\treturn []interface{}{\n");
    for identifier in result.identifiers() {
        out.push_str(&format!("\t\t{},\n", identifier));
    }
    out.push_str("\t}\n");
    out.push_str("}\n");
    Some(out)
}

/// Wrap rendered accessors into a complete Go source file.
pub fn render_file<'a, I>(header: &FileHeader, package: &str, accessors: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut out = header.render();
    out.push('\n');
    out.push_str(&format!("package {}\n", package));
    for accessor in accessors {
        out.push_str(accessor);
    }
    out
}
