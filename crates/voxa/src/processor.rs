//! Processing-stage traits.
//!
//! Linguistic stages (tokenizers, phrasifiers, syllabifiers) live outside
//! this crate and plug in through [`UttProcessor`]; per-item feature
//! functions plug in through [`FeatProcessor`]. Both are registered on a
//! [`Voice`] by name.

use crate::error::Result;
use crate::hrg::{Item, Utterance};
use crate::object::Object;
use crate::voice::Voice;

/// A stage that transforms a whole utterance.
///
/// A stage that fails after creating a relation should remove it again;
/// [`Utterance::build_relation`] does this for the common case.
pub trait UttProcessor: Send + Sync {
    /// Called once when the voice is built. The voice passed in carries its
    /// features and feature processors but not yet every stage.
    ///
    /// # Errors
    ///
    /// A failure aborts building the voice.
    fn initialize(&mut self, _voice: &Voice) -> Result<()> {
        Ok(())
    }

    /// Runs the stage.
    ///
    /// # Errors
    ///
    /// Usually [`Error::Processor`](crate::Error::Processor) with a message.
    fn run(&self, utt: &mut Utterance) -> Result<()>;
}

/// A function computing a feature of one item on demand.
pub trait FeatProcessor: Send + Sync {
    /// Computes the feature, `None` when it does not apply to the item.
    ///
    /// # Errors
    ///
    /// Whatever the computation reports.
    fn run(&self, item: Item<'_>) -> Result<Option<Object>>;
}
