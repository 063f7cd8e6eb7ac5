//! Ordered keyword tables. Earlier entries take precedence.

use super::Category;

#[derive(Debug, Clone, Copy)]
pub struct KeywordRule {
    pub category: Category,
    pub keywords: &'static [&'static str],
    pub description: &'static str,
}

impl KeywordRule {
    const fn new(
        category: Category,
        keywords: &'static [&'static str],
        description: &'static str,
    ) -> Self {
        Self {
            category,
            keywords,
            description,
        }
    }

    /// `lowered` must already be lowercase.
    pub fn matches(&self, lowered: &str) -> bool {
        self.keywords.iter().any(|kw| lowered.contains(kw))
    }
}

pub static SYMBOL_RULES: &[KeywordRule] = &[
    KeywordRule::new(
        Category::Installation,
        &["install", "setup", "package", "dependencies"],
        "",
    ),
    KeywordRule::new(
        Category::PlatformDetection,
        &["detect", "os", "platform", "termux", "linux", "android"],
        "",
    ),
    KeywordRule::new(Category::Configuration, &["config", "setting", "mode", "option"], ""),
    KeywordRule::new(
        Category::UserInterface,
        &["ui", "interface", "display", "show", "print", "prompt"],
        "",
    ),
    KeywordRule::new(
        Category::ApiIntegration,
        &["api", "request", "http", "client", "fetch"],
        "",
    ),
    KeywordRule::new(
        Category::VoiceProcessing,
        &["voice", "tts", "audio", "sound", "alsa", "speak"],
        "",
    ),
    KeywordRule::new(Category::Translation, &["translate", "translation", "language"], ""),
    KeywordRule::new(
        Category::Cryptography,
        &["crypto", "encrypt", "decrypt", "hash", "secure"],
        "",
    ),
    KeywordRule::new(
        Category::DataProcessing,
        &["process", "parse", "transform", "convert", "generate"],
        "",
    ),
    KeywordRule::new(
        Category::ErrorHandling,
        &["error", "exception", "try", "catch", "handle"],
        "",
    ),
    KeywordRule::new(
        Category::Utilities,
        &["util", "helper", "common", "shared", "base"],
        "",
    ),
];

pub static DEPENDENCY_RULES: &[KeywordRule] = &[
    KeywordRule::new(
        Category::VoiceProcessing,
        &["tts", "audio", "sound"],
        "Text-to-speech and audio playback",
    ),
    KeywordRule::new(Category::Translation, &["translate"], "Multi-language translation"),
    KeywordRule::new(
        Category::Cryptography,
        &["crypto"],
        "Encryption and cryptographic operations",
    ),
    KeywordRule::new(
        Category::ApiIntegration,
        &["request"],
        "HTTP requests and API communication",
    ),
    KeywordRule::new(
        Category::UserInterface,
        &["toolkit", "prompt"],
        "Interactive command-line interface",
    ),
    KeywordRule::new(
        Category::ApiIntegration,
        &["useragent"],
        "HTTP client spoofing/user agent rotation",
    ),
    KeywordRule::new(Category::UserInterface, &["colorama"], "Colored terminal output"),
    KeywordRule::new(
        Category::DataProcessing,
        &["regex"],
        "Pattern matching and text processing",
    ),
    KeywordRule::new(
        Category::SystemIntegration,
        &["pexpect"],
        "Process automation and interaction",
    ),
    KeywordRule::new(Category::DataProcessing, &["pydub"], "Audio file manipulation"),
];

pub static IMPORT_RULES: &[KeywordRule] = &[
    KeywordRule::new(
        Category::Cryptography,
        &["crypto", "hashlib", "base64", "zlib"],
        "Code obfuscation/encryption capabilities",
    ),
    KeywordRule::new(
        Category::SystemIntegration,
        &["os", "sys", "warnings"],
        "System-level operations",
    ),
    KeywordRule::new(
        Category::TypeSystem,
        &["types", "builtins"],
        "Dynamic type manipulation (common in obfuscated code)",
    ),
];
