//! Class descriptors and the process-wide class registry.
//!
//! A class is named by its colon-separated ancestry, for example
//! `Object:Container:List:LinkedList`. The last segment is the class's own
//! name and the prefix names its parent. Registration requires the parent to
//! be registered already, so every class reaches `Object` through registered
//! ancestors.
//!
//! Registered classes live for the rest of the process. Lookups take a read
//! lock; registration takes the write lock and is expected to happen during
//! plug-in loading, before pipelines start.
//!
//! # Example
//!
//! ```
//! use voxa::object::{Class, ClassSpec, Object, Value};
//!
//! #[derive(Default)]
//! struct Phoneset {
//!     vowels: Vec<&'static str>,
//! }
//!
//! ClassSpec::new("Object:DocPhoneset")
//!     .size_of::<Phoneset>()
//!     .construct(|| Ok(Value::custom(Phoneset::default())))
//!     .register()
//!     .unwrap();
//!
//! let obj = Object::new("DocPhoneset").unwrap();
//! assert!(obj.is_type("Object"));
//! assert!(obj.downcast_ref::<Phoneset>().unwrap().vowels.is_empty());
//! assert!(Class::find("Object:DocPhoneset").is_ok());
//! ```

use std::fmt;
use std::sync::{OnceLock, PoisonError, RwLock};

use fxhash::FxHashMap;

use super::builtins::{self, Builtins};
use super::value::Value;
use crate::error::{Error, Result};

/// Builds the initial payload of a new instance.
pub type ConstructFn = fn() -> Result<Value>;
/// Releases class-specific resources. Runs once, when the last reference
/// to an instance goes away.
pub type DestroyFn = fn(&mut Value);
/// Value equality between two instances of the same class.
pub type CompareFn = fn(&Value, &Value) -> bool;
/// Human-readable rendering of an instance.
pub type PrintFn = fn(&Value) -> Result<String>;
/// Produces the payload of an independent copy.
pub type CopyFn = fn(&Value) -> Result<Value>;

/// The operation table of a class.
///
/// Only `construct` is needed to instantiate a class; a class without it is
/// abstract. The remaining operations are optional and the corresponding
/// [`Object`](super::Object) methods report [`Error::NotComparable`] or
/// [`Error::Unsupported`] when they are missing.
#[derive(Clone, Copy, Default)]
pub struct ClassOps {
    /// Payload constructor.
    pub construct: Option<ConstructFn>,
    /// Destructor hook.
    pub destroy: Option<DestroyFn>,
    /// Equality.
    pub compare: Option<CompareFn>,
    /// Printing.
    pub print: Option<PrintFn>,
    /// Copying.
    pub copy: Option<CopyFn>,
}

/// Description of a class to be registered.
#[derive(Clone)]
pub struct ClassSpec {
    ancestry: String,
    size: usize,
    ops: ClassOps,
}

impl ClassSpec {
    /// Starts describing a class with the given colon-separated ancestry.
    pub fn new(ancestry: impl Into<String>) -> Self {
        ClassSpec {
            ancestry: ancestry.into(),
            size: 0,
            ops: ClassOps::default(),
        }
    }

    /// Records the payload size of `T` as the instance size token.
    #[must_use]
    pub fn size_of<T>(mut self) -> Self {
        self.size = std::mem::size_of::<T>();
        self
    }

    /// Sets the payload constructor.
    #[must_use]
    pub fn construct(mut self, f: ConstructFn) -> Self {
        self.ops.construct = Some(f);
        self
    }

    /// Sets the destructor hook.
    #[must_use]
    pub fn destroy(mut self, f: DestroyFn) -> Self {
        self.ops.destroy = Some(f);
        self
    }

    /// Sets the compare operation.
    #[must_use]
    pub fn compare(mut self, f: CompareFn) -> Self {
        self.ops.compare = Some(f);
        self
    }

    /// Sets the print operation.
    #[must_use]
    pub fn print(mut self, f: PrintFn) -> Self {
        self.ops.print = Some(f);
        self
    }

    /// Sets the copy operation.
    #[must_use]
    pub fn copy(mut self, f: CopyFn) -> Self {
        self.ops.copy = Some(f);
        self
    }

    /// Registers the class with the global registry.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidArgument`] if the ancestry is empty or has an empty
    ///   segment.
    /// - [`Error::UnknownClass`] if the parent class is not registered.
    /// - [`Error::DuplicateClass`] if the full ancestry or the leaf name is
    ///   already taken.
    pub fn register(self) -> Result<&'static Class> {
        Class::register(self)
    }
}

/// A registered class.
///
/// Classes are compared by identity; there is exactly one `Class` per
/// registered ancestry.
pub struct Class {
    ancestry: &'static str,
    name: &'static str,
    size: usize,
    ops: ClassOps,
}

impl Class {
    /// Registers a class. See [`ClassSpec::register`].
    ///
    /// # Errors
    ///
    /// See [`ClassSpec::register`].
    pub fn register(spec: ClassSpec) -> Result<&'static Class> {
        let mut tables = registry()
            .tables
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        tables.insert(spec)
    }

    /// Looks up a class by full ancestry or by its own name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownClass`] if nothing is registered under `name`.
    pub fn find(name: &str) -> Result<&'static Class> {
        let tables = registry()
            .tables
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        tables
            .by_ancestry
            .get(name)
            .or_else(|| tables.by_name.get(name))
            .copied()
            .ok_or_else(|| Error::UnknownClass {
                name: name.to_string(),
            })
    }

    /// Returns `true` if a class is registered under `name`.
    #[must_use]
    pub fn is_registered(name: &str) -> bool {
        Class::find(name).is_ok()
    }

    /// Returns every registered class, sorted by ancestry.
    #[must_use]
    pub fn all() -> Vec<&'static Class> {
        let tables = registry()
            .tables
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        let mut classes: Vec<_> = tables.by_ancestry.values().copied().collect();
        classes.sort_by_key(|class| class.ancestry);
        classes
    }

    /// The full colon-separated ancestry.
    #[must_use]
    pub fn ancestry(&self) -> &'static str {
        self.ancestry
    }

    /// The class's own name, the last ancestry segment.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The instance size token.
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// The operation table.
    #[must_use]
    pub fn ops(&self) -> &ClassOps {
        &self.ops
    }

    /// Returns `true` if the class has no constructor.
    #[must_use]
    pub fn is_abstract(&self) -> bool {
        self.ops.construct.is_none()
    }

    /// The parent class, `None` for `Object`.
    #[must_use]
    pub fn super_class(&self) -> Option<&'static Class> {
        let (parent, _) = self.ancestry.rsplit_once(':')?;
        Class::find(parent).ok()
    }

    /// Returns `true` if `name` is this class's ancestry or one of its
    /// segments.
    #[must_use]
    pub fn is_a(&self, name: &str) -> bool {
        self.ancestry == name || self.ancestry.split(':').any(|segment| segment == name)
    }
}

impl PartialEq for Class {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
    }
}

impl Eq for Class {}

impl fmt::Debug for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Class")
            .field("ancestry", &self.ancestry)
            .field("size", &self.size)
            .field("abstract", &self.is_abstract())
            .finish()
    }
}

impl fmt::Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.ancestry)
    }
}

// ============================================================================
// Registry
// ============================================================================

#[derive(Default)]
pub(super) struct Tables {
    by_ancestry: FxHashMap<&'static str, &'static Class>,
    by_name: FxHashMap<&'static str, &'static Class>,
}

impl Tables {
    pub(super) fn insert(&mut self, spec: ClassSpec) -> Result<&'static Class> {
        let ancestry = spec.ancestry.trim();
        if ancestry.is_empty() || ancestry.split(':').any(str::is_empty) {
            return Err(Error::invalid_argument(format!(
                "malformed class ancestry '{}'",
                spec.ancestry
            )));
        }

        let name = match ancestry.rsplit_once(':') {
            Some((parent, name)) => {
                if !self.by_ancestry.contains_key(parent) {
                    return Err(Error::UnknownClass {
                        name: parent.to_string(),
                    });
                }
                name
            }
            None => ancestry,
        };

        if self.by_ancestry.contains_key(ancestry) {
            return Err(Error::DuplicateClass {
                name: ancestry.to_string(),
            });
        }
        if self.by_name.contains_key(name) {
            return Err(Error::DuplicateClass {
                name: name.to_string(),
            });
        }

        let ancestry: &'static str = Box::leak(ancestry.to_string().into_boxed_str());
        let name = &ancestry[ancestry.len() - name.len()..];
        let class: &'static Class = Box::leak(Box::new(Class {
            ancestry,
            name,
            size: spec.size,
            ops: spec.ops,
        }));

        self.by_ancestry.insert(ancestry, class);
        self.by_name.insert(name, class);
        voxa_log::debug!("registered class {}", ancestry);
        Ok(class)
    }

    /// Inserts a builtin class without validation. Only used while the
    /// registry is being created.
    pub(super) fn insert_builtin(
        &mut self,
        ancestry: &'static str,
        size: usize,
        ops: ClassOps,
    ) -> &'static Class {
        let name = ancestry.rsplit_once(':').map_or(ancestry, |(_, name)| name);
        let class: &'static Class = Box::leak(Box::new(Class {
            ancestry,
            name,
            size,
            ops,
        }));
        self.by_ancestry.insert(ancestry, class);
        self.by_name.insert(name, class);
        class
    }
}

struct Registry {
    tables: RwLock<Tables>,
    builtins: Builtins,
}

static REGISTRY: OnceLock<Registry> = OnceLock::new();

fn registry() -> &'static Registry {
    REGISTRY.get_or_init(|| {
        let mut tables = Tables::default();
        let builtins = builtins::install(&mut tables);
        Registry {
            tables: RwLock::new(tables),
            builtins,
        }
    })
}

/// Handles to the builtin classes.
pub(crate) fn builtin() -> &'static Builtins {
    &registry().builtins
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    static TEST_ID: AtomicUsize = AtomicUsize::new(0);

    fn unique(prefix: &str) -> String {
        format!("{prefix}{}", TEST_ID.fetch_add(1, Ordering::Relaxed))
    }

    #[test]
    fn test_builtins_registered() {
        for name in [
            "Object",
            "Int",
            "Float",
            "String",
            "Bool",
            "LinkedList",
            "ArrayList",
            "ListMap",
            "HashMap",
        ] {
            assert!(Class::is_registered(name), "{name} missing");
        }
        let list = Class::find("Object:Container:List:LinkedList").unwrap();
        assert_eq!(list.name(), "LinkedList");
        assert_eq!(Class::find("LinkedList").unwrap(), list);
    }

    #[test]
    fn test_register_and_find() {
        let leaf = unique("ClassTest");
        let class = ClassSpec::new(format!("Object:{leaf}"))
            .construct(|| Ok(Value::custom(())))
            .register()
            .unwrap();

        assert_eq!(class.name(), leaf);
        assert_eq!(Class::find(&leaf).unwrap(), class);
        assert_eq!(class.super_class(), Class::find("Object").ok());
        assert!(!class.is_abstract());
    }

    #[test]
    fn test_register_duplicate() {
        let leaf = unique("Dup");
        ClassSpec::new(format!("Object:{leaf}")).register().unwrap();

        let err = ClassSpec::new(format!("Object:{leaf}")).register().unwrap_err();
        assert!(matches!(err, Error::DuplicateClass { .. }));

        // Same leaf under a different parent is still a clash.
        let err = ClassSpec::new(format!("Object:Container:{leaf}"))
            .register()
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateClass { .. }));
    }

    #[test]
    fn test_register_requires_parent() {
        let err = ClassSpec::new("Object:NoSuchParent:Child")
            .register()
            .unwrap_err();
        assert_eq!(
            err,
            Error::UnknownClass {
                name: "Object:NoSuchParent".into()
            }
        );
    }

    #[test]
    fn test_register_malformed() {
        for bad in ["", "Object::X", ":X", "Object:"] {
            let err = ClassSpec::new(bad).register().unwrap_err();
            assert!(matches!(err, Error::InvalidArgument { .. }), "{bad}");
        }
    }

    #[test]
    fn test_find_unknown() {
        assert_eq!(
            Class::find("Nope").unwrap_err(),
            Error::UnknownClass {
                name: "Nope".into()
            }
        );
    }

    #[test]
    fn test_is_a_segments() {
        let class = Class::find("ArrayList").unwrap();
        assert!(class.is_a("Object"));
        assert!(class.is_a("Container"));
        assert!(class.is_a("List"));
        assert!(class.is_a("ArrayList"));
        assert!(class.is_a("Object:Container:List:ArrayList"));
        assert!(!class.is_a("Map"));
        assert!(!class.is_a("Array"));
    }

    #[test]
    fn test_abstract_classes() {
        assert!(Class::find("Object:Container").unwrap().is_abstract());
        assert!(!Class::find("Int").unwrap().is_abstract());
    }

    #[test]
    fn test_all_sorted() {
        let all = Class::all();
        assert!(all.windows(2).all(|w| w[0].ancestry() <= w[1].ancestry()));
        assert!(all.iter().any(|c| c.ancestry() == "Object:Float"));
    }
}
