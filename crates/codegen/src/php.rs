//! # PHP Source Builder
//!
//! Generators assemble a [`PhpFile`] (namespace, imports, one class) and only
//! render it to text at the end. Rendering is fixed-style: 4-space
//! indentation, one import per line sorted by fully-qualified name, trailing
//! commas on every element of a multi-line array, and a blank line between
//! class members.

use std::collections::{BTreeMap, BTreeSet};

/// One indentation level
pub const INDENT: &str = "    ";

// ============================================================================
// Values
// ============================================================================

/// A PHP expression appearing as a property value or inside an array
#[derive(Debug, Clone, PartialEq)]
pub enum PhpValue {
    /// Single-quoted string literal
    Str(String),
    /// Emitted verbatim (`Post::class`, `fake()->sentence()`)
    Raw(String),
    Bool(bool),
    Int(i64),
    Null,
    /// Multi-line list, one element per line
    List(Vec<PhpValue>),
    /// Single-line list: `['required', 'string']`
    Inline(Vec<PhpValue>),
    /// Multi-line associative array, one entry per line
    Map(Vec<(PhpValue, PhpValue)>),
}

impl PhpValue {
    pub fn str(s: impl Into<String>) -> Self {
        PhpValue::Str(s.into())
    }

    pub fn raw(s: impl Into<String>) -> Self {
        PhpValue::Raw(s.into())
    }

    /// Multi-line list of string literals
    pub fn str_list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        PhpValue::List(items.into_iter().map(PhpValue::str).collect())
    }

    /// Multi-line map keyed by string literals
    pub fn str_map<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, PhpValue)>,
        K: Into<String>,
    {
        PhpValue::Map(
            entries
                .into_iter()
                .map(|(k, v)| (PhpValue::str(k), v))
                .collect(),
        )
    }

    /// `[]` once rendered
    pub fn is_empty_array(&self) -> bool {
        match self {
            PhpValue::List(items) | PhpValue::Inline(items) => items.is_empty(),
            PhpValue::Map(entries) => entries.is_empty(),
            _ => false,
        }
    }

    /// Render at statement level; nested lines are indented relative to it
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.write(&mut out, 0);
        out
    }

    fn write(&self, out: &mut String, depth: usize) {
        match self {
            PhpValue::Str(s) => out.push_str(&quote(s)),
            PhpValue::Raw(s) => out.push_str(s),
            PhpValue::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
            PhpValue::Int(i) => out.push_str(&i.to_string()),
            PhpValue::Null => out.push_str("null"),
            PhpValue::List(items) if items.is_empty() => out.push_str("[]"),
            PhpValue::Map(entries) if entries.is_empty() => out.push_str("[]"),
            PhpValue::List(items) => {
                out.push_str("[\n");
                for item in items {
                    out.push_str(&INDENT.repeat(depth + 1));
                    item.write(out, depth + 1);
                    out.push_str(",\n");
                }
                out.push_str(&INDENT.repeat(depth));
                out.push(']');
            }
            PhpValue::Inline(items) => {
                out.push('[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    item.write(out, depth);
                }
                out.push(']');
            }
            PhpValue::Map(entries) => {
                out.push_str("[\n");
                for (key, value) in entries {
                    out.push_str(&INDENT.repeat(depth + 1));
                    key.write(out, depth + 1);
                    out.push_str(" => ");
                    value.write(out, depth + 1);
                    out.push_str(",\n");
                }
                out.push_str(&INDENT.repeat(depth));
                out.push(']');
            }
        }
    }
}

/// Single-quote a string for PHP
pub fn quote(s: &str) -> String {
    format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'"))
}

/// Short class name from a fully-qualified one
pub fn short_name(fqn: &str) -> &str {
    fqn.rsplit('\\').next().unwrap_or(fqn)
}

/// Prefix every non-empty line of `block` with `levels` indentation
pub fn indent(block: &str, levels: usize) -> String {
    let prefix = INDENT.repeat(levels);
    block
        .lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{}{}", prefix, line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn docblock(lines: &[String]) -> String {
    let mut out = String::from("/**\n");
    for line in lines {
        if line.is_empty() {
            out.push_str(" *\n");
        } else {
            out.push_str(&format!(" * {}\n", line));
        }
    }
    out.push_str(" */");
    out
}

// ============================================================================
// Members
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Protected,
    Private,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Protected => "protected",
            Visibility::Private => "private",
        }
    }
}

/// A class property with an initial value
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub visibility: Visibility,
    pub name: String,
    pub value: PhpValue,
}

impl Property {
    pub fn protected(name: impl Into<String>, value: PhpValue) -> Self {
        Self {
            visibility: Visibility::Protected,
            name: name.into(),
            value,
        }
    }

    pub fn public(name: impl Into<String>, value: PhpValue) -> Self {
        Self {
            visibility: Visibility::Public,
            name: name.into(),
            value,
        }
    }

    fn render(&self) -> String {
        format!(
            "{} ${} = {};",
            self.visibility.as_str(),
            self.name,
            self.value.render()
        )
    }
}

/// A class method; `body` holds statements, each possibly spanning lines
#[derive(Debug, Clone, PartialEq)]
pub struct Method {
    pub visibility: Visibility,
    pub name: String,
    pub params: Vec<String>,
    pub return_type: Option<String>,
    pub doc: Vec<String>,
    pub body: Vec<String>,
}

impl Method {
    pub fn public(name: impl Into<String>) -> Self {
        Self {
            visibility: Visibility::Public,
            name: name.into(),
            params: Vec::new(),
            return_type: None,
            doc: Vec::new(),
            body: Vec::new(),
        }
    }

    pub fn param(mut self, param: impl Into<String>) -> Self {
        self.params.push(param.into());
        self
    }

    pub fn returns(mut self, return_type: impl Into<String>) -> Self {
        self.return_type = Some(return_type.into());
        self
    }

    pub fn doc(mut self, line: impl Into<String>) -> Self {
        self.doc.push(line.into());
        self
    }

    /// Append a statement
    pub fn line(mut self, statement: impl Into<String>) -> Self {
        self.body.push(statement.into());
        self
    }

    /// Append a blank separator line
    pub fn blank(mut self) -> Self {
        self.body.push(String::new());
        self
    }

    fn render(&self) -> String {
        let mut out = String::new();
        if !self.doc.is_empty() {
            out.push_str(&docblock(&self.doc));
            out.push('\n');
        }

        out.push_str(&format!(
            "{} function {}({})",
            self.visibility.as_str(),
            self.name,
            self.params.join(", ")
        ));
        if let Some(ret) = &self.return_type {
            out.push_str(&format!(": {}", ret));
        }
        out.push_str("\n{\n");

        if !self.body.is_empty() {
            out.push_str(&indent(&self.body.join("\n"), 1));
            out.push('\n');
        }
        out.push('}');
        out
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClassMember {
    Property(Property),
    Method(Method),
}

// ============================================================================
// Class
// ============================================================================

/// A single class; an unnamed class renders as `return new class ...;`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PhpClass {
    pub name: Option<String>,
    pub extends: Option<String>,
    pub implements: Vec<String>,
    pub traits: Vec<String>,
    pub members: Vec<ClassMember>,
}

impl PhpClass {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    /// An anonymous class returned from the file
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn extends(mut self, parent: impl Into<String>) -> Self {
        self.extends = Some(parent.into());
        self
    }

    pub fn implement(&mut self, interface: impl Into<String>) {
        self.implements.push(interface.into());
    }

    pub fn use_trait(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !self.traits.contains(&name) {
            self.traits.push(name);
        }
    }

    pub fn property(&mut self, property: Property) {
        self.members.push(ClassMember::Property(property));
    }

    pub fn method(&mut self, method: Method) {
        self.members.push(ClassMember::Method(method));
    }

    pub fn render(&self) -> String {
        let mut header = match &self.name {
            Some(name) => format!("class {}", name),
            None => "return new class".to_string(),
        };
        if let Some(parent) = &self.extends {
            header.push_str(&format!(" extends {}", parent));
        }
        if !self.implements.is_empty() {
            header.push_str(&format!(" implements {}", self.implements.join(", ")));
        }

        let mut sections: Vec<String> = Vec::new();
        if !self.traits.is_empty() {
            sections.push(
                self.traits
                    .iter()
                    .map(|t| format!("use {};", t))
                    .collect::<Vec<_>>()
                    .join("\n"),
            );
        }
        for member in &self.members {
            sections.push(match member {
                ClassMember::Property(p) => p.render(),
                ClassMember::Method(m) => m.render(),
            });
        }

        let mut out = String::with_capacity(1024);
        out.push_str(&header);
        out.push_str("\n{\n");
        if !sections.is_empty() {
            out.push_str(&indent(&sections.join("\n\n"), 1));
            out.push('\n');
        }
        out.push('}');
        if self.name.is_none() {
            out.push(';');
        }
        out.push('\n');
        out
    }
}

// ============================================================================
// File
// ============================================================================

/// A complete PHP source file: namespace, imports and one class
#[derive(Debug, Clone, PartialEq)]
pub struct PhpFile {
    namespace: String,
    imports: BTreeMap<String, Option<String>>,
    /// Short names referenced from the file's own namespace
    local_names: BTreeSet<String>,
    pub class: PhpClass,
}

impl PhpFile {
    pub fn new(namespace: impl Into<String>, class: PhpClass) -> Self {
        Self {
            namespace: namespace.into(),
            imports: BTreeMap::new(),
            local_names: BTreeSet::new(),
            class,
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Import a class and return the name to refer to it by
    ///
    /// Classes living in the file's own namespace are not imported. A short
    /// name already bound to another class gets an alias prefixed with the
    /// parent namespace segment, e.g. `RelationsHasMany`.
    pub fn import(&mut self, fqn: &str) -> String {
        let fqn = fqn.trim_start_matches('\\');
        if let Some(alias) = self.imports.get(fqn) {
            return alias.clone().unwrap_or_else(|| short_name(fqn).to_string());
        }

        let short = short_name(fqn).to_string();
        let in_namespace = fqn
            .strip_suffix(short.as_str())
            .and_then(|ns| ns.strip_suffix('\\'))
            .is_some_and(|ns| ns == self.namespace);

        if in_namespace {
            if self.imported_as(&short) {
                return format!("\\{}", fqn);
            }
            self.local_names.insert(short.clone());
            return short;
        }

        if !self.is_bound(&short) {
            self.imports.insert(fqn.to_string(), None);
            return short;
        }

        let alias = self.free_alias(fqn, &short);
        tracing::debug!(class = fqn, alias = %alias, "aliased colliding import");
        self.imports.insert(fqn.to_string(), Some(alias.clone()));
        alias
    }

    fn imported_as(&self, name: &str) -> bool {
        self.imports
            .iter()
            .any(|(fqn, alias)| alias.as_deref().unwrap_or_else(|| short_name(fqn)) == name)
    }

    fn is_bound(&self, name: &str) -> bool {
        self.imported_as(name)
            || self.local_names.contains(name)
            || self.class.name.as_deref() == Some(name)
    }

    fn free_alias(&self, fqn: &str, short: &str) -> String {
        let parent = fqn
            .strip_suffix(short)
            .and_then(|ns| ns.strip_suffix('\\'))
            .map(short_name)
            .unwrap_or_default();
        let base = format!("{}{}", parent, short);
        let mut alias = base.clone();
        let mut suffix = 2;
        while self.is_bound(&alias) {
            alias = format!("{}{}", base, suffix);
            suffix += 1;
        }
        alias
    }

    /// Import a class under an alias and return the alias
    pub fn import_as(&mut self, fqn: &str, alias: &str) -> String {
        self.imports.insert(
            fqn.trim_start_matches('\\').to_string(),
            Some(alias.to_string()),
        );
        alias.to_string()
    }

    pub fn imports(&self) -> impl Iterator<Item = &str> {
        self.imports.keys().map(String::as_str)
    }

    pub fn render(&self) -> String {
        let mut out = String::with_capacity(2048);
        out.push_str("<?php\n\n");
        out.push_str(&format!("namespace {};\n\n", self.namespace));

        if !self.imports.is_empty() {
            for (fqn, alias) in &self.imports {
                match alias {
                    Some(alias) => out.push_str(&format!("use {} as {};\n", fqn, alias)),
                    None => out.push_str(&format!("use {};\n", fqn)),
                }
            }
            out.push('\n');
        }

        out.push_str(&self.class.render());
        out
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_value_rendering() {
        assert_eq!(PhpValue::str("it's").render(), "'it\\'s'");
        assert_eq!(PhpValue::Bool(false).render(), "false");
        assert_eq!(PhpValue::List(vec![]).render(), "[]");
        assert_eq!(
            PhpValue::Inline(vec![PhpValue::str("required"), PhpValue::str("string")]).render(),
            "['required', 'string']"
        );
        assert_eq!(
            PhpValue::str_list(["title", "content"]).render(),
            "[\n    'title',\n    'content',\n]"
        );
    }

    #[test]
    fn test_nested_map_rendering() {
        let value = PhpValue::str_map([
            ("data", PhpValue::raw("$this->collection")),
            (
                "meta",
                PhpValue::str_map([("total", PhpValue::raw("$this->collection->count()"))]),
            ),
        ]);
        assert_eq!(
            value.render(),
            "[\n    'data' => $this->collection,\n    'meta' => [\n        'total' => $this->collection->count(),\n    ],\n]"
        );
    }

    #[test]
    fn test_short_name_and_indent() {
        assert_eq!(short_name("Illuminate\\Database\\Eloquent\\Model"), "Model");
        assert_eq!(short_name("Model"), "Model");
        assert_eq!(indent("a\n\nb", 2), "        a\n\n        b");
    }

    #[test]
    fn test_import_skips_own_namespace() {
        let mut file = PhpFile::new("App\\Models", PhpClass::new("Post"));
        assert_eq!(file.import("App\\Models\\User"), "User");
        assert_eq!(file.import("Illuminate\\Database\\Eloquent\\Model"), "Model");
        assert_eq!(file.import("\\Illuminate\\Database\\Eloquent\\Model"), "Model");
        assert_eq!(
            file.imports().collect::<Vec<_>>(),
            vec!["Illuminate\\Database\\Eloquent\\Model"]
        );
    }

    #[test]
    fn test_colliding_imports_are_aliased() {
        let mut file = PhpFile::new("App\\Models", PhpClass::new("Post"));
        assert_eq!(file.import("App\\Concerns\\HasMany"), "HasMany");
        assert_eq!(
            file.import("Illuminate\\Database\\Eloquent\\Relations\\HasMany"),
            "RelationsHasMany"
        );
        // repeated imports resolve to the same name
        assert_eq!(
            file.import("Illuminate\\Database\\Eloquent\\Relations\\HasMany"),
            "RelationsHasMany"
        );
        assert_eq!(file.import("Vendor\\Relations\\HasMany"), "RelationsHasMany2");

        let rendered = file.render();
        assert!(rendered.contains("use App\\Concerns\\HasMany;\n"));
        assert!(rendered.contains(
            "use Illuminate\\Database\\Eloquent\\Relations\\HasMany as RelationsHasMany;\n"
        ));
        assert_eq!(rendered.matches("\\HasMany;\n").count(), 1);
    }

    #[test]
    fn test_import_avoids_class_and_local_names() {
        let mut file = PhpFile::new("App\\Models", PhpClass::new("Model"));
        assert_eq!(
            file.import("Illuminate\\Database\\Eloquent\\Model"),
            "EloquentModel"
        );

        let mut file = PhpFile::new("App\\Models", PhpClass::new("Post"));
        assert_eq!(file.import("App\\Models\\User"), "User");
        assert_eq!(file.import("Illuminate\\Foundation\\Auth\\User"), "AuthUser");

        let mut file = PhpFile::new("App\\Models", PhpClass::new("Post"));
        assert_eq!(file.import("Illuminate\\Foundation\\Auth\\User"), "User");
        assert_eq!(file.import("App\\Models\\User"), "\\App\\Models\\User");
    }

    #[test]
    fn test_empty_array_values() {
        assert!(PhpValue::str_list(Vec::<String>::new()).is_empty_array());
        assert!(PhpValue::str_map(Vec::<(String, PhpValue)>::new()).is_empty_array());
        assert!(PhpValue::Inline(Vec::new()).is_empty_array());
        assert!(!PhpValue::str_list(["title"]).is_empty_array());
        assert!(!PhpValue::str("").is_empty_array());
    }

    #[test]
    fn test_file_rendering() {
        let mut class = PhpClass::new("PostPolicy");
        class.use_trait("HandlesAuthorization");
        class.property(Property::protected("fillable", PhpValue::str_list(["title"])));
        class.method(
            Method::public("viewAny")
                .param("User $user")
                .returns("bool")
                .line("return true;"),
        );

        let mut file = PhpFile::new("App\\Policies", class);
        file.import("Illuminate\\Auth\\Access\\HandlesAuthorization");
        file.import("App\\Models\\User");

        let expected = "<?php

namespace App\\Policies;

use App\\Models\\User;
use Illuminate\\Auth\\Access\\HandlesAuthorization;

class PostPolicy
{
    use HandlesAuthorization;

    protected $fillable = [
        'title',
    ];

    public function viewAny(User $user): bool
    {
        return true;
    }
}
";
        assert_eq!(file.render(), expected);
    }

    #[test]
    fn test_anonymous_class_and_alias() {
        let mut class = PhpClass::anonymous().extends("Migration");
        class.method(Method::public("down").returns("void"));
        let mut file = PhpFile::new("Database\\Migrations", class);
        file.import_as(
            "Illuminate\\Foundation\\Support\\Providers\\AuthServiceProvider",
            "ServiceProvider",
        );

        let rendered = file.render();
        assert!(rendered.contains(
            "use Illuminate\\Foundation\\Support\\Providers\\AuthServiceProvider as ServiceProvider;"
        ));
        assert!(rendered.contains("return new class extends Migration\n{\n"));
        assert!(rendered.contains("    public function down(): void\n    {\n    }\n"));
        assert!(rendered.ends_with("};\n"));
    }

    #[test]
    fn test_method_doc_and_blank_lines() {
        let method = Method::public("store")
            .doc("Store a new record.")
            .line("$post = Post::create($data);")
            .blank()
            .line("return $post;");
        assert_eq!(
            method.render(),
            "/**\n * Store a new record.\n */\npublic function store()\n{\n    $post = Post::create($data);\n\n    return $post;\n}"
        );
    }
}
