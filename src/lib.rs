pub mod agent;
pub mod categorize;
pub mod config;
pub mod error;
pub mod facts;
pub mod indexer;
pub mod languages;
pub mod memory;
pub mod pipeline;
pub mod report;

pub use agent::{AnalysisAgent, LocalAgent, PatternMatch, SymbolMatch, SymbolReference};
pub use categorize::{Categorizer, Category, Classification};
pub use config::{AnalysisConfig, FailurePolicy};
pub use error::{AnalysisError, Result};
pub use facts::{Fact, Predicate, Quad};
pub use indexer::{Extraction, FactExtractor, FileWalker, Parser, SymbolKind, SymbolRecord};
pub use languages::LanguageRegistry;
pub use pipeline::{Pass, Pipeline};
pub use report::{RunReport, StepFailure};
