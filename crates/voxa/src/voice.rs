//! Voices: named processors and the utterance types that sequence them.
//!
//! A voice is assembled once with a [`VoiceBuilder`] and is read-only
//! afterwards, so it can be shared behind an [`Arc`] by every utterance it
//! synthesizes.
//!
//! # Example
//!
//! ```
//! use voxa::hrg::Utterance;
//! use voxa::processor::UttProcessor;
//! use voxa::{Object, Result, Voice};
//!
//! struct Tokenize;
//!
//! impl UttProcessor for Tokenize {
//!     fn run(&self, utt: &mut Utterance) -> Result<()> {
//!         let text = utt.feature("input").map(|i| i.as_str()).transpose()?;
//!         let text = text.unwrap_or_default().to_string();
//!         let mut tokens = utt.new_relation("Token")?;
//!         for word in text.split_whitespace() {
//!             tokens.append(None)?.set_name(word)?;
//!         }
//!         Ok(())
//!     }
//! }
//!
//! let voice = Voice::builder("demo")
//!     .utt_processor("Tokenize", Tokenize)
//!     .utt_type("text", ["Tokenize"])
//!     .build()
//!     .unwrap();
//!
//! let utt = voice.synth_utt("text", Object::string("hello world")).unwrap();
//! assert_eq!(utt.relation("Token").unwrap().len(), 2);
//! ```

use std::fmt;
use std::sync::Arc;

use fxhash::FxHashMap;

use crate::config::Config;
use crate::container::Map;
use crate::error::{Error, Result};
use crate::hrg::Utterance;
use crate::object::Object;
use crate::processor::{FeatProcessor, UttProcessor};

/// Utterance feature holding the synthesis input.
pub const INPUT_FEATURE: &str = "input";

/// A configured voice.
pub struct Voice {
    name: String,
    config: Config,
    features: Map,
    feat_procs: FxHashMap<String, Arc<dyn FeatProcessor>>,
    utt_procs: FxHashMap<String, Box<dyn UttProcessor>>,
    utt_types: FxHashMap<String, Vec<String>>,
}

impl Voice {
    /// Starts building a voice called `name`.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> VoiceBuilder {
        VoiceBuilder {
            name: name.into(),
            config: Config::default(),
            features: Map::default(),
            feat_procs: FxHashMap::default(),
            utt_procs: Vec::new(),
            utt_types: FxHashMap::default(),
        }
    }

    /// The voice's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Configuration given to every utterance this voice creates.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Voice-level features.
    #[must_use]
    pub fn features(&self) -> &Map {
        &self.features
    }

    /// The voice feature stored under `key`.
    #[must_use]
    pub fn feature(&self, key: &str) -> Option<&Object> {
        self.features.get(key)
    }

    /// The feature processor registered as `name`.
    #[must_use]
    pub fn feat_processor(&self, name: &str) -> Option<Arc<dyn FeatProcessor>> {
        self.feat_procs.get(name).cloned()
    }

    /// The utterance processor registered as `name`.
    #[must_use]
    pub fn utt_processor(&self, name: &str) -> Option<&dyn UttProcessor> {
        self.utt_procs.get(name).map(|p| p.as_ref())
    }

    /// The processor names an utterance type runs, in order.
    #[must_use]
    pub fn utt_type(&self, name: &str) -> Option<&[String]> {
        self.utt_types.get(name).map(Vec::as_slice)
    }

    /// Returns `true` if the utterance type `name` is defined.
    #[must_use]
    pub fn utt_type_present(&self, name: &str) -> bool {
        self.utt_types.contains_key(name)
    }

    /// Creates an utterance bound to this voice, stores `input` as its
    /// `input` feature and runs the processors of `utt_type` on it.
    ///
    /// # Errors
    ///
    /// - [`Error::UnknownUttType`] if `utt_type` is not defined.
    /// - Whatever a processor reports. The partially processed utterance is
    ///   dropped.
    pub fn synth_utt(self: &Arc<Self>, utt_type: &str, input: Object) -> Result<Utterance> {
        let processors = self.processors(utt_type)?;
        let mut utt = Utterance::with_config(self.config.clone());
        utt.set_voice(self);
        utt.set_feature(INPUT_FEATURE, input);
        self.run(utt_type, processors, &mut utt)?;
        Ok(utt)
    }

    /// Runs the processors of `utt_type` on an existing utterance.
    ///
    /// # Errors
    ///
    /// Same as [`Voice::synth_utt`]; on failure `utt` keeps whatever the
    /// completed stages did.
    pub fn resynth_utt(&self, utt_type: &str, utt: &mut Utterance) -> Result<()> {
        let processors = self.processors(utt_type)?;
        self.run(utt_type, processors, utt)
    }

    fn processors(&self, utt_type: &str) -> Result<&[String]> {
        self.utt_type(utt_type).ok_or_else(|| Error::UnknownUttType {
            name: utt_type.to_string(),
        })
    }

    fn run(&self, utt_type: &str, processors: &[String], utt: &mut Utterance) -> Result<()> {
        for name in processors {
            let processor = self
                .utt_procs
                .get(name)
                .ok_or_else(|| Error::UnknownProcessor { name: name.clone() })?;
            voxa_log::debug!("{}: running {} for '{}'", self.name, name, utt_type);
            if let Err(err) = processor.run(utt) {
                voxa_log::warn!("{}: {} failed: {}", self.name, name, err);
                return Err(err);
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Voice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut utt_procs: Vec<_> = self.utt_procs.keys().collect();
        utt_procs.sort();
        let mut feat_procs: Vec<_> = self.feat_procs.keys().collect();
        feat_procs.sort();
        f.debug_struct("Voice")
            .field("name", &self.name)
            .field("features", &self.features)
            .field("utt_procs", &utt_procs)
            .field("feat_procs", &feat_procs)
            .finish_non_exhaustive()
    }
}

/// Builder for [`Voice`].
pub struct VoiceBuilder {
    name: String,
    config: Config,
    features: Map,
    feat_procs: FxHashMap<String, Arc<dyn FeatProcessor>>,
    utt_procs: Vec<(String, Box<dyn UttProcessor>)>,
    utt_types: FxHashMap<String, Vec<String>>,
}

impl VoiceBuilder {
    /// Sets the configuration of synthesized utterances.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Sets a voice feature.
    #[must_use]
    pub fn feature(mut self, key: impl Into<String>, value: impl Into<Object>) -> Self {
        self.features.set(key, value.into());
        self
    }

    /// Registers a feature processor, replacing one of the same name.
    #[must_use]
    pub fn feat_processor(mut self, name: impl Into<String>, processor: impl FeatProcessor + 'static) -> Self {
        self.feat_procs.insert(name.into(), Arc::new(processor));
        self
    }

    /// Registers an utterance processor, replacing one of the same name.
    #[must_use]
    pub fn utt_processor(mut self, name: impl Into<String>, processor: impl UttProcessor + 'static) -> Self {
        let name = name.into();
        self.utt_procs.retain(|(other, _)| *other != name);
        self.utt_procs.push((name, Box::new(processor)));
        self
    }

    /// Defines an utterance type as an ordered list of processor names.
    #[must_use]
    pub fn utt_type<I, S>(mut self, name: impl Into<String>, processors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.utt_types
            .insert(name.into(), processors.into_iter().map(Into::into).collect());
        self
    }

    /// Initializes every utterance processor and freezes the voice.
    ///
    /// # Errors
    ///
    /// - [`Error::UnknownProcessor`] if an utterance type names a processor
    ///   that was never registered.
    /// - Whatever a processor's `initialize` reports.
    pub fn build(self) -> Result<Arc<Voice>> {
        for processors in self.utt_types.values() {
            if let Some(missing) = processors
                .iter()
                .find(|name| !self.utt_procs.iter().any(|(other, _)| other == *name))
            {
                return Err(Error::UnknownProcessor {
                    name: missing.clone(),
                });
            }
        }

        let mut voice = Voice {
            name: self.name,
            config: self.config,
            features: self.features,
            feat_procs: self.feat_procs,
            utt_procs: FxHashMap::default(),
            utt_types: self.utt_types,
        };
        for (name, mut processor) in self.utt_procs {
            processor.initialize(&voice)?;
            voice.utt_procs.insert(name, processor);
        }
        voxa_log::debug!(
            "built voice {} with {} stages and {} utterance types",
            voice.name,
            voice.utt_procs.len(),
            voice.utt_types.len()
        );
        Ok(Arc::new(voice))
    }
}
