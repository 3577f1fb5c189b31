pub mod client;
pub mod factory;
pub mod interface;
pub mod language;

pub use factory::TranslatorFactory;
pub use interface::Translator;
pub use language::SupportedLanguage;

#[cfg(test)]
pub use interface::MockTranslator;
