//! Dotted item paths such as `R:SylStructure.parent.parent.name`.
//!
//! A path is a sequence of tokens separated by `.` or `:`. Navigation
//! tokens move from item to item:
//!
//! | token      | moves to                                   |
//! |------------|--------------------------------------------|
//! | `n`        | next sibling                               |
//! | `p`        | previous sibling                           |
//! | `parent`   | parent                                     |
//! | `daughter` | first daughter                             |
//! | `daughtern`| last daughter                              |
//! | `R` `<rel>`| the item sharing the content in `<rel>`    |
//!
//! Any other token is a feature name and may only appear last.

use super::item::Item;
use crate::error::{Error, Result};
use crate::object::Object;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step<'p> {
    Next,
    Prev,
    Parent,
    Daughter,
    LastDaughter,
    Relation(&'p str),
}

/// A parsed path: the navigation steps and the trailing feature name.
struct Path<'p> {
    steps: Vec<Step<'p>>,
    feature: Option<&'p str>,
}

fn invalid(path: &str, reason: impl Into<String>) -> Error {
    Error::InvalidPath {
        path: path.to_string(),
        reason: reason.into(),
    }
}

fn parse(path: &str) -> Result<Path<'_>> {
    if path.is_empty() {
        return Err(invalid(path, "empty path"));
    }
    let mut tokens = path.split(['.', ':']).peekable();
    let mut steps = Vec::new();
    let mut feature = None;

    while let Some(token) = tokens.next() {
        if feature.is_some() {
            return Err(invalid(path, format!("'{token}' follows a feature name")));
        }
        let step = match token {
            "" => return Err(invalid(path, "empty token")),
            "n" => Step::Next,
            "p" => Step::Prev,
            "parent" => Step::Parent,
            "daughter" => Step::Daughter,
            "daughtern" => Step::LastDaughter,
            "R" => match tokens.next() {
                Some("") | None => return Err(invalid(path, "'R' needs a relation name")),
                Some(name) => Step::Relation(name),
            },
            name => {
                feature = Some(name);
                continue;
            }
        };
        steps.push(step);
    }
    Ok(Path { steps, feature })
}

impl<'u> Item<'u> {
    fn follow(self, path: &str, steps: &[Step<'_>]) -> Option<Item<'u>> {
        let mut item = self;
        for step in steps {
            let next = match *step {
                Step::Next => item.next(),
                Step::Prev => item.prev(),
                Step::Parent => item.parent(),
                Step::Daughter => item.daughter(),
                Step::LastDaughter => item.last_daughter(),
                Step::Relation(name) => item.as_relation(name),
            };
            match next {
                Some(next) => item = next,
                None => {
                    voxa_log::trace!("path '{}' leaves the graph at {:?}", path, step);
                    return None;
                }
            }
        }
        Some(item)
    }

    /// Follows a navigation-only path. `Ok(None)` means the path ran off
    /// the graph, e.g. `n` on the last item.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPath`] if the path is malformed or ends in a
    /// feature name.
    ///
    /// # Example
    ///
    /// ```
    /// use voxa::hrg::Utterance;
    ///
    /// let mut utt = Utterance::new();
    /// let mut words = utt.new_relation("Word").unwrap();
    /// let first = words.append(None).unwrap().id();
    /// words.append(None).unwrap().set_name("second").unwrap();
    ///
    /// let first = utt.item(first).unwrap();
    /// let second = first.path_to_item("n").unwrap().unwrap();
    /// assert_eq!(second.name(), Some("second"));
    /// assert!(first.path_to_item("p").unwrap().is_none());
    /// ```
    pub fn path_to_item(&self, path: &str) -> Result<Option<Item<'u>>> {
        let parsed = parse(path)?;
        if let Some(feature) = parsed.feature {
            return Err(invalid(path, format!("'{feature}' is not a navigation token")));
        }
        Ok(self.follow(path, &parsed.steps))
    }

    /// Follows a path ending in a feature name and returns that feature.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPath`] if the path is malformed or has no
    /// trailing feature name.
    pub fn path_to_feature(&self, path: &str) -> Result<Option<&'u Object>> {
        let parsed = parse(path)?;
        let Some(feature) = parsed.feature else {
            return Err(invalid(path, "missing feature name"));
        };
        Ok(self
            .follow(path, &parsed.steps)
            .and_then(|item| item.feature(feature)))
    }

    /// Follows a path whose last token names a feature processor of the
    /// utterance's voice, and runs it on the item reached.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidPath`] as for [`Item::path_to_feature`].
    /// - [`Error::UnknownProcessor`] if the utterance has no voice or the
    ///   voice has no such processor.
    /// - Whatever the processor reports.
    pub fn path_to_featproc(&self, path: &str) -> Result<Option<Object>> {
        let parsed = parse(path)?;
        let Some(name) = parsed.feature else {
            return Err(invalid(path, "missing processor name"));
        };
        let processor = self
            .utterance()
            .voice()
            .and_then(|voice| voice.feat_processor(name))
            .ok_or_else(|| Error::UnknownProcessor {
                name: name.to_string(),
            })?;
        match self.follow(path, &parsed.steps) {
            Some(item) => processor.run(item),
            None => Ok(None),
        }
    }
}
