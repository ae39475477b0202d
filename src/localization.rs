use anyhow::{anyhow, Result};
use fluent_bundle::concurrent::FluentBundle;
use fluent_bundle::{FluentArgs, FluentResource};
use std::collections::HashMap;
use unic_langid::LanguageIdentifier;

/// Languages with a bundled message file
pub const SUPPORTED_LANGUAGES: [&str; 2] = ["en", "fr"];

/// Language used when the requested one is not supported
pub const FALLBACK_LANGUAGE: &str = "en";

const EN_MESSAGES: &str = include_str!("../locales/en/main.ftl");
const FR_MESSAGES: &str = include_str!("../locales/fr/main.ftl");

/// Localization manager for cost reports
pub struct LocalizationManager {
    bundles: HashMap<String, FluentBundle<FluentResource>>,
}

impl std::fmt::Debug for LocalizationManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalizationManager")
            .field("languages", &self.bundles.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl LocalizationManager {
    /// Create a new localization manager with every supported language loaded
    pub fn new() -> Result<Self> {
        let mut bundles = HashMap::new();

        for (language, source) in [("en", EN_MESSAGES), ("fr", FR_MESSAGES)] {
            let locale: LanguageIdentifier = language.parse()?;
            let bundle = Self::create_bundle(&locale, source)?;
            bundles.insert(language.to_string(), bundle);
        }

        Ok(Self { bundles })
    }

    /// Create a fluent bundle for a specific locale
    fn create_bundle(locale: &LanguageIdentifier, source: &str) -> Result<FluentBundle<FluentResource>> {
        let mut bundle = FluentBundle::new_concurrent(vec![locale.clone()]);
        // Reports are plain text; no bidi isolation marks around arguments
        bundle.set_use_isolating(false);

        let resource = FluentResource::try_new(source.to_string())
            .map_err(|(_, errors)| anyhow!("Invalid messages for {locale}: {errors:?}"))?;
        bundle
            .add_resource(resource)
            .map_err(|errors| anyhow!("Conflicting messages for {locale}: {errors:?}"))?;

        Ok(bundle)
    }

    /// Get a localized message in a specific language
    ///
    /// Unsupported languages fall back to English.
    pub fn get_message_in_language(
        &self,
        key: &str,
        language: &str,
        args: Option<&HashMap<&str, &str>>,
    ) -> String {
        let language = detect_language(Some(language));
        let Some(bundle) = self
            .bundles
            .get(language)
            .or_else(|| self.bundles.get(FALLBACK_LANGUAGE))
        else {
            return format!("Missing translation: {key}");
        };

        let msg = match bundle.get_message(key) {
            Some(msg) => msg,
            None => return format!("Missing translation: {key}"),
        };

        let pattern = match msg.value() {
            Some(pattern) => pattern,
            None => return format!("Missing value for key: {key}"),
        };

        let fluent_args = args.map(|args| {
            let mut fluent_args = FluentArgs::new();
            for (name, value) in args {
                fluent_args.set(*name, *value);
            }
            fluent_args
        });

        let mut errors = Vec::new();
        let value = bundle.format_pattern(pattern, fluent_args.as_ref(), &mut errors);
        if !errors.is_empty() {
            tracing::debug!(key, language, ?errors, "Message formatted with errors");
        }

        value.into_owned()
    }

    /// Get a localized message in English
    pub fn get_message(&self, key: &str, args: Option<&HashMap<&str, &str>>) -> String {
        self.get_message_in_language(key, FALLBACK_LANGUAGE, args)
    }

    /// Get a localized message with simple string arguments
    pub fn get_message_with_args(&self, key: &str, language: &str, args: &[(&str, &str)]) -> String {
        let args_map: HashMap<&str, &str> = args.iter().cloned().collect();
        self.get_message_in_language(key, language, Some(&args_map))
    }
}

/// Map a language tag to a supported language, defaulting to English
///
/// Region subtags are ignored: "fr-CA" is French.
pub fn detect_language(language_code: Option<&str>) -> &'static str {
    let Some(code) = language_code else {
        return FALLBACK_LANGUAGE;
    };

    let primary = code
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    SUPPORTED_LANGUAGES
        .iter()
        .find(|&&supported| supported == primary)
        .copied()
        .unwrap_or(FALLBACK_LANGUAGE)
}
