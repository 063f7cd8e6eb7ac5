use super::{LanguageGrammar, NodeRole};

pub struct PythonGrammar;

impl LanguageGrammar for PythonGrammar {
    fn name(&self) -> &'static str {
        "python"
    }

    fn file_extensions(&self) -> &[&'static str] {
        &["py", "pyi"]
    }

    fn language(&self) -> tree_sitter::Language {
        tree_sitter_python::LANGUAGE.into()
    }

    fn node_role(&self, kind: &str) -> Option<NodeRole> {
        match kind {
            "function_definition" => Some(NodeRole::Function),
            "class_definition" => Some(NodeRole::Class),
            "import_statement" => Some(NodeRole::Import),
            "import_from_statement" => Some(NodeRole::ImportFrom),
            "assignment" => Some(NodeRole::Assignment),
            "call" => Some(NodeRole::Call),
            _ => None,
        }
    }
}
