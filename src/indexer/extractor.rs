use std::path::Path;

use tree_sitter::Node;

use crate::config::ExtractionConfig;
use crate::error::Result;
use crate::facts::{graph, Fact, Predicate};
use crate::indexer::fallback;
use crate::indexer::parser::{read_lossy, ParsedFile, Parser};
use crate::indexer::records::{Extraction, ImportKind, ImportRecord, SymbolKind, SymbolRecord};
use crate::languages::NodeRole;

/// Walks a syntax tree and emits facts, symbol records and import records.
pub struct FactExtractor {
    parser: Parser,
    options: ExtractionConfig,
}

impl FactExtractor {
    pub fn new(options: ExtractionConfig) -> Self {
        Self {
            parser: Parser::default(),
            options,
        }
    }

    pub fn parser(&self) -> &Parser {
        &self.parser
    }

    /// Read and extract one file. Sources with syntax errors go through the
    /// regex fallback; only IO and language errors are returned.
    pub fn extract_file(&self, path: &Path) -> Result<Extraction> {
        let grammar = self.parser.grammar_for(path)?;
        let source = read_lossy(path)?;
        let parsed = self.parser.parse_source(&source, grammar)?;
        Ok(self.extract_or_fallback(&parsed, path))
    }

    pub fn extract_source(&self, source: &str, path: &Path) -> Result<Extraction> {
        let grammar = self.parser.grammar_for(path)?;
        let parsed = self.parser.parse_source(source, grammar)?;
        Ok(self.extract_or_fallback(&parsed, path))
    }

    fn extract_or_fallback(&self, parsed: &ParsedFile, path: &Path) -> Extraction {
        if parsed.has_syntax_errors() {
            tracing::debug!("{} has syntax errors, using regex scan", path.display());
            return fallback::scan(&parsed.source, path);
        }
        self.extract_parsed(parsed, path)
    }

    /// Pre-order walk over every node; nested definitions are included.
    pub fn extract_parsed(&self, parsed: &ParsedFile, path: &Path) -> Extraction {
        let mut walk = FileWalk {
            parsed,
            options: &self.options,
            context: path.to_string_lossy().to_string(),
            base_name: super::base_name(path),
            out: Extraction::default(),
        };

        let mut stack = vec![parsed.root_node()];
        while let Some(node) = stack.pop() {
            if let Some(role) = parsed.grammar.node_role(node.kind()) {
                walk.visit(role, node);
            }

            let mut cursor = node.walk();
            let children: Vec<Node> = node.children(&mut cursor).collect();
            stack.extend(children.into_iter().rev());
        }

        walk.out
    }
}

impl Default for FactExtractor {
    fn default() -> Self {
        Self::new(ExtractionConfig::default())
    }
}

struct FileWalk<'a> {
    parsed: &'a ParsedFile,
    options: &'a ExtractionConfig,
    context: String,
    base_name: String,
    out: Extraction,
}

impl<'a> FileWalk<'a> {
    fn visit(&mut self, role: NodeRole, node: Node) {
        match role {
            NodeRole::Function => self.visit_function(node),
            NodeRole::Class => self.visit_class(node),
            NodeRole::Import => self.visit_import(node),
            NodeRole::ImportFrom => self.visit_import_from(node),
            NodeRole::Assignment => self.visit_assignment(node),
            NodeRole::Call => self.visit_call(node),
        }
    }

    fn text(&self, node: &Node) -> &'a str {
        self.parsed.node_text(node)
    }

    fn field_text(&self, node: &Node, field: &str) -> Option<&'a str> {
        node.child_by_field_name(field).map(|n| self.text(&n))
    }

    fn push(&mut self, subject: &str, predicate: Predicate, object: &str, graph: &str) {
        self.out.facts.push(
            Fact::new(subject, predicate, object)
                .with_context(&self.context)
                .in_graph(graph),
        );
    }

    fn line(node: &Node) -> u32 {
        node.start_position().row as u32 + 1
    }

    fn end_line(node: &Node) -> u32 {
        node.end_position().row as u32 + 1
    }

    fn visit_function(&mut self, node: Node) {
        let Some(name) = self.field_text(&node, "name") else {
            return;
        };

        let params = node
            .child_by_field_name("parameters")
            .map(|p| self.parameter_names(&p))
            .unwrap_or_default();

        self.push(name, Predicate::IsA, "function", graph::CODE_STRUCTURE);
        for param in &params {
            self.push(name, Predicate::HasParameter, param, graph::CODE_STRUCTURE);
        }

        self.out.symbols.push(
            SymbolRecord::new(name, SymbolKind::Function)
                .at_line(Self::line(&node))
                .ending_at(Self::end_line(&node))
                .with_params(params),
        );
    }

    /// Positional-or-keyword parameters in declaration order. Names before a
    /// `/` are positional-only and dropped; the walk ends at `*`, `*args` or
    /// `**kwargs`, so keyword-only parameters are not included.
    fn parameter_names(&self, params: &Node) -> Vec<String> {
        let mut names = Vec::new();
        let mut cursor = params.walk();
        for child in params.named_children(&mut cursor) {
            let ident = match child.kind() {
                "identifier" => Some(child),
                "positional_separator" => {
                    names.clear();
                    None
                }
                "keyword_separator" | "list_splat_pattern" | "dictionary_splat_pattern" => break,
                "typed_parameter" => match child.named_child(0) {
                    Some(n) if n.kind() == "identifier" => Some(n),
                    _ => break,
                },
                "default_parameter" | "typed_default_parameter" => child
                    .child_by_field_name("name")
                    .filter(|n| n.kind() == "identifier"),
                _ => None,
            };
            if let Some(ident) = ident {
                names.push(self.text(&ident).to_string());
            }
        }
        names
    }

    fn visit_class(&mut self, node: Node) {
        let Some(name) = self.field_text(&node, "name") else {
            return;
        };

        self.push(name, Predicate::IsA, "class", graph::CODE_STRUCTURE);

        let mut bases = Vec::new();
        if let Some(superclasses) = node.child_by_field_name("superclasses") {
            let mut cursor = superclasses.walk();
            for base in superclasses.named_children(&mut cursor) {
                match base.kind() {
                    "identifier" => {
                        let base_name = self.text(&base);
                        self.push(name, Predicate::InheritsFrom, base_name, graph::INHERITANCE);
                        bases.push(base_name.to_string());
                    }
                    // metaclass=... and friends are not bases
                    "keyword_argument" | "comment" => {}
                    _ => bases.push(self.text(&base).to_string()),
                }
            }
        }

        let methods = node
            .child_by_field_name("body")
            .map(|body| self.method_names(&body))
            .unwrap_or_default();

        self.out.symbols.push(
            SymbolRecord::new(name, SymbolKind::Class)
                .at_line(Self::line(&node))
                .ending_at(Self::end_line(&node))
                .with_bases(bases)
                .with_methods(methods),
        );
    }

    fn method_names(&self, body: &Node) -> Vec<String> {
        let mut methods = Vec::new();
        let mut cursor = body.walk();
        for stmt in body.named_children(&mut cursor) {
            let def = match stmt.kind() {
                "function_definition" => Some(stmt),
                "decorated_definition" => stmt
                    .child_by_field_name("definition")
                    .filter(|d| d.kind() == "function_definition"),
                _ => None,
            };
            if let Some(name) = def.and_then(|d| self.field_text(&d, "name")) {
                methods.push(name.to_string());
            }
        }
        methods
    }

    fn visit_import(&mut self, node: Node) {
        let mut cursor = node.walk();
        let names: Vec<Node> = node.children_by_field_name("name", &mut cursor).collect();
        for name_node in names {
            let (module, alias) = self.import_name(&name_node);
            let base_name = self.base_name.clone();
            self.push(&base_name, Predicate::Imports, &module, graph::DEPENDENCIES);
            self.out.imports.push(ImportRecord {
                module,
                alias,
                kind: ImportKind::Import,
            });
        }
    }

    fn visit_import_from(&mut self, node: Node) {
        let module = node
            .child_by_field_name("module_name")
            .map(|m| self.text(&m).trim_start_matches('.').to_string())
            .unwrap_or_default();

        let mut imported: Vec<(String, Option<String>)> = Vec::new();
        let mut cursor = node.walk();
        for name_node in node.children_by_field_name("name", &mut cursor) {
            imported.push(self.import_name(&name_node));
        }
        let mut cursor = node.walk();
        if node.children(&mut cursor).any(|c| c.kind() == "wildcard_import") {
            imported.push(("*".to_string(), None));
        }

        for (name, alias) in imported {
            // `from . import x` has no module to qualify with
            if !module.is_empty() {
                let base_name = self.base_name.clone();
                let object = format!("{}.{}", module, name);
                self.push(&base_name, Predicate::ImportsFrom, &object, graph::DEPENDENCIES);
            }
            let qualified = if module.is_empty() {
                name
            } else {
                format!("{}.{}", module, name)
            };
            self.out.imports.push(ImportRecord {
                module: qualified,
                alias,
                kind: ImportKind::ImportFrom,
            });
        }
    }

    fn import_name(&self, node: &Node) -> (String, Option<String>) {
        if node.kind() == "aliased_import" {
            let name = self.field_text(node, "name").unwrap_or_default().to_string();
            let alias = self.field_text(node, "alias").map(|a| a.to_string());
            (name, alias)
        } else {
            (self.text(node).to_string(), None)
        }
    }

    fn visit_assignment(&mut self, node: Node) {
        // annotated assignments (`x: int = 1`) are not plain assignments
        if node.child_by_field_name("type").is_some() || node.child_by_field_name("right").is_none() {
            return;
        }
        let Some(target) = node.child_by_field_name("left") else {
            return;
        };
        if target.kind() != "identifier" {
            return;
        }

        let name = self.text(&target);
        let base_name = self.base_name.clone();
        self.push(name, Predicate::AssignedIn, &base_name, graph::CODE_STRUCTURE);
        self.out
            .symbols
            .push(SymbolRecord::new(name, SymbolKind::Variable).at_line(Self::line(&node)));
    }

    fn visit_call(&mut self, node: Node) {
        let Some(callee) = node.child_by_field_name("function") else {
            return;
        };
        let object = match callee.kind() {
            "identifier" => self.text(&callee),
            "attribute" if self.options.attribute_calls => self.text(&callee),
            _ => return,
        };
        let base_name = self.base_name.clone();
        self.push(&base_name, Predicate::Calls, object, graph::CALL_GRAPH);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(source: &str) -> Extraction {
        FactExtractor::default()
            .extract_source(source, Path::new("/proj/sample.py"))
            .unwrap()
    }

    fn triples(extraction: &Extraction) -> Vec<(String, String, String)> {
        extraction
            .facts
            .iter()
            .map(|f| (f.subject.clone(), f.predicate.to_string(), f.object.clone()))
            .collect()
    }

    fn has(extraction: &Extraction, s: &str, p: &str, o: &str) -> bool {
        triples(extraction)
            .iter()
            .any(|(fs, fp, fo)| fs == s && fp == p && fo == o)
    }

    #[test]
    fn test_function_with_parameters() {
        let ex = extract("def foo(a, b): pass\n");
        assert_eq!(
            triples(&ex),
            vec![
                ("foo".into(), "is_a".into(), "function".into()),
                ("foo".into(), "has_parameter".into(), "a".into()),
                ("foo".into(), "has_parameter".into(), "b".into()),
            ]
        );
        assert!(ex.note.is_none());
    }

    #[test]
    fn test_parameter_forms() {
        let ex = extract("def f(self, x: int, y=1, z: str = 'a', *args, key=None, **kw): pass\n");
        let params: Vec<_> = ex.symbols[0].params.clone();
        assert_eq!(params, vec!["self", "x", "y", "z"]);
    }

    #[test]
    fn test_keyword_only_and_positional_only_parameters_skipped() {
        let ex = extract("def f(a, *, key=None): pass\ndef g(p, /, q, *args: int, r): pass\n");
        assert_eq!(ex.symbols[0].params, vec!["a"]);
        assert_eq!(ex.symbols[1].params, vec!["q"]);
        assert!(!has(&ex, "f", "has_parameter", "key"));
    }

    #[test]
    fn test_class_with_simple_base() {
        let ex = extract("class Bar(Base): pass\n");
        assert!(has(&ex, "Bar", "is_a", "class"));
        assert!(has(&ex, "Bar", "inherits_from", "Base"));
    }

    #[test]
    fn test_attribute_and_keyword_bases_skipped() {
        let ex = extract("class C(mod.Base, Mixin, metaclass=Meta): pass\n");
        let inherits: Vec<_> = ex
            .facts
            .iter()
            .filter(|f| f.predicate == Predicate::InheritsFrom)
            .map(|f| f.object.as_str())
            .collect();
        assert_eq!(inherits, vec!["Mixin"]);
        assert_eq!(ex.symbols[0].bases, vec!["mod.Base", "Mixin"]);
    }

    #[test]
    fn test_class_methods_recorded() {
        let ex = extract(
            "class Svc:\n    def start(self): pass\n    @staticmethod\n    def make(): pass\n",
        );
        let class = ex.symbols_of(SymbolKind::Class).next().unwrap();
        assert_eq!(class.methods, vec!["start", "make"]);
        assert_eq!(ex.symbols_of(SymbolKind::Function).count(), 2);
    }

    #[test]
    fn test_nested_functions_counted() {
        let ex = extract(
            "def outer():\n    def inner():\n        pass\n    return inner\n\nasync def run(): pass\n",
        );
        let functions = ex
            .facts
            .iter()
            .filter(|f| f.predicate == Predicate::IsA && f.object == "function")
            .count();
        assert_eq!(functions, 3);
    }

    #[test]
    fn test_imports() {
        let ex = extract("import os, sys as system\nimport a.b\n");
        assert!(has(&ex, "sample.py", "imports", "os"));
        assert!(has(&ex, "sample.py", "imports", "sys"));
        assert!(has(&ex, "sample.py", "imports", "a.b"));
        assert_eq!(ex.imports[1].alias.as_deref(), Some("system"));
        assert!(ex.facts.iter().all(|f| f.graph == "dependencies"));
    }

    #[test]
    fn test_from_imports() {
        let ex = extract("from Crypto.Cipher import AES, DES as D\nfrom x import *\n");
        assert!(has(&ex, "sample.py", "imports_from", "Crypto.Cipher.AES"));
        assert!(has(&ex, "sample.py", "imports_from", "Crypto.Cipher.DES"));
        assert!(has(&ex, "sample.py", "imports_from", "x.*"));
    }

    #[test]
    fn test_relative_import_without_module_has_no_fact() {
        let ex = extract("from . import sibling\nfrom .pkg import thing\n");
        assert!(!ex.facts.iter().any(|f| f.object.ends_with("sibling")));
        assert!(has(&ex, "sample.py", "imports_from", "pkg.thing"));
        assert_eq!(ex.imports.len(), 2);
        assert_eq!(ex.imports[0].module, "sibling");
    }

    #[test]
    fn test_assignments() {
        let ex = extract("a = 1\nb = c = 2\nd: int = 3\ne += 1\nf, g = 1, 2\nobj.attr = 4\n");
        let assigned: Vec<_> = ex
            .facts
            .iter()
            .filter(|f| f.predicate == Predicate::AssignedIn)
            .map(|f| f.subject.as_str())
            .collect();
        assert_eq!(assigned, vec!["a", "b", "c"]);
        assert!(has(&ex, "a", "assigned_in", "sample.py"));
    }

    #[test]
    fn test_calls_bare_names_only_by_default() {
        let ex = extract("print(len(x))\nobj.method()\n");
        let calls: Vec<_> = ex
            .facts
            .iter()
            .filter(|f| f.predicate == Predicate::Calls)
            .map(|f| f.object.as_str())
            .collect();
        assert_eq!(calls, vec!["print", "len"]);
        assert!(ex.facts.iter().all(|f| f.subject == "sample.py" || f.predicate != Predicate::Calls));
    }

    #[test]
    fn test_attribute_calls_when_enabled() {
        let extractor = FactExtractor::new(ExtractionConfig {
            attribute_calls: true,
            ..ExtractionConfig::default()
        });
        let ex = extractor
            .extract_source("obj.method()\n", Path::new("m.py"))
            .unwrap();
        assert!(has(&ex, "m.py", "calls", "obj.method"));
    }

    #[test]
    fn test_context_and_graphs() {
        let ex = extract("import os\ndef f(): g()\n");
        assert!(ex.facts.iter().all(|f| f.context == "/proj/sample.py"));
        let call = ex.facts.iter().find(|f| f.predicate == Predicate::Calls).unwrap();
        assert_eq!(call.graph, "call_graph");
    }

    #[test]
    fn test_unparsable_source_falls_back() {
        let ex = extract("import base64\ndef run(:\n  exec(base64.b64decode('...')\nclass X\n");
        assert!(ex.is_fallback());
        assert!(!ex.facts.is_empty());
        assert!(has(&ex, "run", "is_a", "function"));
    }

    #[test]
    fn test_symbol_lines() {
        let ex = extract("\n\ndef late(): pass\n");
        assert_eq!(ex.symbols[0].line, Some(3));
    }

    #[test]
    fn test_definition_spans() {
        let ex = extract("class Voice:\n    def speak(self):\n        return 1\n\nVoice().speak()\n");
        let voice = ex.symbols.iter().find(|s| s.name == "Voice").unwrap();
        assert_eq!((voice.line, voice.end_line), (Some(1), Some(3)));
        let speak = ex.symbols.iter().find(|s| s.name == "speak").unwrap();
        assert_eq!((speak.line, speak.end_line), (Some(2), Some(3)));
        assert!(!voice.spans(5));
    }

    #[test]
    fn test_extract_missing_file_is_error() {
        let err = FactExtractor::default()
            .extract_file(Path::new("/definitely/not/here.py"))
            .unwrap_err();
        assert!(matches!(err, crate::error::AnalysisError::FileNotFound(_)));
    }
}
