//! Voxa: object runtime and relation graph for speech synthesis
//!
//! Voxa is the substrate a text-to-speech pipeline is built on. It provides:
//!
//! - **Object Core**: a process-wide class registry with `:`-separated
//!   ancestry, reference-counted instances and checked casts
//! - **Containers**: lists and maps with interchangeable backings and
//!   look-ahead cursors that stay valid while unlinking
//! - **Utterance Graph**: named relations of items over shared contents,
//!   navigable across relations
//! - **Processing Boundary**: utterance and feature processors sequenced by
//!   a voice
//!
//! # Architecture
//!
//! - [`object`]: classes, instances and the built-in scalar classes
//! - [`container`]: [`List`], [`Map`] and their cursors
//! - [`hrg`]: [`Utterance`], relations and items, stored in
//!   [`voxa_mem::Arena`]s
//! - [`voice`] and [`processor`]: the pipeline boundary
//!
//! # Example
//!
//! ```rust
//! use voxa::{Object, Utterance};
//!
//! let mut utt = Utterance::new();
//! let mut tokens = utt.new_relation("Token").unwrap();
//! let mut token = tokens.append(None).unwrap();
//! token.set_feature("name", Object::from("born")).unwrap();
//! let token = token.id();
//!
//! let token = utt.item(token).unwrap();
//! assert_eq!(token.name(), Some("born"));
//! assert!(token.feature("name").unwrap().is_type("String"));
//! ```

pub mod config;
pub mod container;
pub mod error;
pub mod hrg;
pub mod object;
pub mod processor;
pub mod voice;

// Re-export commonly used types
pub use config::Config;
pub use container::{List, ListKind, Map, MapKind};
pub use error::{Error, Result};
pub use hrg::{Item, ItemId, ItemMut, Relation, RelationMut, Utterance};
pub use object::{Class, ClassSpec, Object, Value};
pub use voice::{Voice, VoiceBuilder};
