//! Keyword categorisation of symbols, dependencies and imports.
//!
//! A [`Categorizer`] owns an immutable, ordered rule table. The first rule
//! with a keyword contained in the lowercased input wins; table order is the
//! precedence. Inputs matching nothing get the categorizer's fallback.

pub mod rules;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use rules::{KeywordRule, DEPENDENCY_RULES, IMPORT_RULES, SYMBOL_RULES};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Installation,
    Configuration,
    UserInterface,
    ApiIntegration,
    DataProcessing,
    Authentication,
    Utilities,
    ErrorHandling,
    PlatformDetection,
    DependencyManagement,
    VoiceProcessing,
    Translation,
    Cryptography,
    SystemIntegration,
    TypeSystem,
}

impl Category {
    pub const ALL: [Category; 15] = [
        Category::Installation,
        Category::Configuration,
        Category::UserInterface,
        Category::ApiIntegration,
        Category::DataProcessing,
        Category::Authentication,
        Category::Utilities,
        Category::ErrorHandling,
        Category::PlatformDetection,
        Category::DependencyManagement,
        Category::VoiceProcessing,
        Category::Translation,
        Category::Cryptography,
        Category::SystemIntegration,
        Category::TypeSystem,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Installation => "installation",
            Category::Configuration => "configuration",
            Category::UserInterface => "user_interface",
            Category::ApiIntegration => "api_integration",
            Category::DataProcessing => "data_processing",
            Category::Authentication => "authentication",
            Category::Utilities => "utilities",
            Category::ErrorHandling => "error_handling",
            Category::PlatformDetection => "platform_detection",
            Category::DependencyManagement => "dependency_management",
            Category::VoiceProcessing => "voice_processing",
            Category::Translation => "translation",
            Category::Cryptography => "cryptography",
            Category::SystemIntegration => "system_integration",
            Category::TypeSystem => "type_system",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.as_str() == s)
    }

    /// Heading form: `voice_processing` -> `Voice Processing`.
    pub fn title(&self) -> String {
        title_case(self.as_str())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn title_case(label: &str) -> String {
    label
        .split('_')
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Outcome of matching one input against a rule table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub category: Category,
    /// Capability/inference text of the matched rule (or the fallback's)
    pub description: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct Categorizer {
    rules: &'static [KeywordRule],
    fallback: Classification,
}

impl Categorizer {
    pub const fn new(rules: &'static [KeywordRule], fallback: Classification) -> Self {
        Self { rules, fallback }
    }

    /// Symbol names: functions, classes, variables.
    pub fn symbols() -> Self {
        Self::new(
            SYMBOL_RULES,
            Classification {
                category: Category::Utilities,
                description: "",
            },
        )
    }

    /// Requirement strings such as `edge-tts==1.2.3`.
    pub fn dependencies() -> Self {
        Self::new(
            DEPENDENCY_RULES,
            Classification {
                category: Category::Utilities,
                description: "General utility functionality",
            },
        )
    }

    pub fn rules(&self) -> &'static [KeywordRule] {
        self.rules
    }

    pub fn classify(&self, input: &str) -> Classification {
        let lowered = input.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.matches(&lowered))
            .map(|rule| Classification {
                category: rule.category,
                description: rule.description,
            })
            .unwrap_or(self.fallback)
    }

    pub fn categorize(&self, input: &str) -> Category {
        self.classify(input).category
    }

    /// Every matching rule, not just the first; used for import inference
    /// where one module may indicate several capabilities.
    pub fn classify_all(&self, input: &str) -> Vec<Classification> {
        let lowered = input.to_lowercase();
        self.rules
            .iter()
            .filter(|rule| rule.matches(&lowered))
            .map(|rule| Classification {
                category: rule.category,
                description: rule.description,
            })
            .collect()
    }
}

/// Package name of a requirement line, lowercased, without version specifier.
pub fn strip_version(requirement: &str) -> String {
    let lowered = requirement.trim().to_lowercase();
    let cut = ["==", ">=", "<=", "~=", "!="]
        .iter()
        .filter_map(|op| lowered.find(op))
        .min()
        .unwrap_or(lowered.len());
    lowered[..cut].trim().to_string()
}

pub fn categorize_symbol(name: &str) -> Category {
    Categorizer::symbols().categorize(name)
}

pub fn categorize_dependency(requirement: &str) -> Classification {
    Categorizer::dependencies().classify(&strip_version(requirement))
}

/// Categories suggested by an imported module name (possibly several).
pub fn infer_from_import(module: &str) -> Vec<Classification> {
    Categorizer::new(
        IMPORT_RULES,
        Classification {
            category: Category::Utilities,
            description: "",
        },
    )
    .classify_all(module)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_first_match_wins() {
        // contains both "install" and "config"; installation is checked first
        assert_eq!(categorize_symbol("install_config"), Category::Installation);
        assert_eq!(categorize_symbol("load_config"), Category::Configuration);
    }

    #[test]
    fn test_symbol_categories() {
        assert_eq!(categorize_symbol("detect_os"), Category::PlatformDetection);
        assert_eq!(categorize_symbol("show_banner"), Category::UserInterface);
        assert_eq!(categorize_symbol("fetch_reply"), Category::ApiIntegration);
        assert_eq!(categorize_symbol("speak_text"), Category::VoiceProcessing);
        assert_eq!(categorize_symbol("translate"), Category::Translation);
        assert_eq!(categorize_symbol("decrypt_blob"), Category::Cryptography);
        assert_eq!(categorize_symbol("parse_line"), Category::DataProcessing);
        assert_eq!(categorize_symbol("handle_error"), Category::ErrorHandling);
    }

    #[test]
    fn test_symbol_default_is_utilities() {
        assert_eq!(categorize_symbol("zzz"), Category::Utilities);
        assert_eq!(categorize_symbol(""), Category::Utilities);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(categorize_symbol("InstallManager"), Category::Installation);
    }

    #[test]
    fn test_deterministic() {
        let categorizer = Categorizer::symbols();
        for name in ["pip_install", "x", "SoundPlayer", "main"] {
            let first = categorizer.categorize(name);
            for _ in 0..10 {
                assert_eq!(categorizer.categorize(name), first);
            }
        }
    }

    #[test]
    fn test_dependency_voice() {
        let c = categorize_dependency("edge-tts==1.2.3");
        assert_eq!(c.category, Category::VoiceProcessing);
        assert_eq!(c.description, "Text-to-speech and audio playback");
    }

    #[test]
    fn test_dependency_rules() {
        assert_eq!(categorize_dependency("translate==3.6.1").category, Category::Translation);
        assert_eq!(categorize_dependency("pycryptodome>=3.0").category, Category::Cryptography);
        assert_eq!(categorize_dependency("requests").category, Category::ApiIntegration);
        assert_eq!(categorize_dependency("prompt_toolkit").category, Category::UserInterface);
        assert_eq!(categorize_dependency("fake_useragent").category, Category::ApiIntegration);
        assert_eq!(categorize_dependency("colorama").category, Category::UserInterface);
        assert_eq!(categorize_dependency("regex").category, Category::DataProcessing);
        assert_eq!(categorize_dependency("pexpect").category, Category::SystemIntegration);
        assert_eq!(categorize_dependency("psutil").category, Category::Utilities);
    }

    #[test]
    fn test_strip_version() {
        assert_eq!(strip_version("Edge-TTS==1.2.3"), "edge-tts");
        assert_eq!(strip_version("requests >= 2.0"), "requests");
        assert_eq!(strip_version("numpy~=1.26"), "numpy");
        assert_eq!(strip_version("plain"), "plain");
    }

    #[test]
    fn test_import_inference_is_multi_label() {
        let cats: Vec<_> = infer_from_import("os").iter().map(|c| c.category).collect();
        assert_eq!(cats, vec![Category::SystemIntegration]);

        // "hashlib" holds "hashlib" (crypto) and nothing system-level
        let cats: Vec<_> = infer_from_import("hashlib").iter().map(|c| c.category).collect();
        assert_eq!(cats, vec![Category::Cryptography]);

        // "Crypto.Cipher.AES" lowercases to contain "crypto"
        assert!(!infer_from_import("Crypto.Cipher.AES").is_empty());
        assert!(infer_from_import("json").is_empty());
    }

    #[test]
    fn test_title_case() {
        assert_eq!(Category::VoiceProcessing.title(), "Voice Processing");
        assert_eq!(title_case("code_structure"), "Code Structure");
    }

    #[test]
    fn test_from_str_round_trip() {
        for category in Category::ALL {
            assert_eq!(Category::from_str(category.as_str()), Some(category));
        }
        assert_eq!(Category::from_str("nope"), None);
    }
}
