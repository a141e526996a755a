//! The object core: registered classes and reference-counted instances.
//!
//! Every value handled by the runtime is an [`Object`], a shared handle to an
//! instance of a registered [`Class`]. Cloning an `Object` adds an owner;
//! dropping the last owner runs the class's destroy hook exactly once and
//! frees the instance. There is no separate dispose call and no way to reach
//! an instance after its last owner is gone.
//!
//! Downcasting goes through the class ancestry: [`Object::cast`] succeeds
//! only when the requested name is one of the instance's ancestry segments,
//! and the payload itself is read through an exhaustive [`Value`] match.
//!
//! # Example
//!
//! ```
//! use voxa::object::Object;
//!
//! let pos = Object::string("PRP");
//! assert!(pos.is_type("String"));
//! assert_eq!(pos.as_str().unwrap(), "PRP");
//! assert!(pos.cast("Int").is_none());
//!
//! let shared = pos.clone();
//! assert_eq!(pos.refcount(), 2);
//! drop(shared);
//! assert_eq!(pos.refcount(), 1);
//! ```

mod builtins;
mod class;
mod value;

pub use class::{Class, ClassOps, ClassSpec, CompareFn, ConstructFn, CopyFn, DestroyFn, PrintFn};
pub use value::Value;

pub(crate) use class::builtin;

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::container::{List, Map};
use crate::error::{Error, Result};

/// A shared handle to a class instance.
///
/// Equality (`==`) is identity: two handles are equal when they refer to the
/// same instance. Use [`Object::compare`] for value equality.
#[derive(Clone)]
pub struct Object {
    inner: Arc<ObjectInner>,
}

struct ObjectInner {
    class: &'static Class,
    value: Value,
}

impl Drop for ObjectInner {
    fn drop(&mut self) {
        if let Some(destroy) = self.class.ops().destroy {
            destroy(&mut self.value);
        }
    }
}

impl Object {
    /// Instantiates a registered class by ancestry or leaf name.
    ///
    /// # Errors
    ///
    /// - [`Error::UnknownClass`] if the class is not registered.
    /// - [`Error::Unsupported`] if the class is abstract.
    /// - Whatever the class constructor reports.
    pub fn new(class_name: &str) -> Result<Object> {
        Object::of_class(Class::find(class_name)?)
    }

    /// Instantiates `class`.
    ///
    /// # Errors
    ///
    /// See [`Object::new`].
    pub fn of_class(class: &'static Class) -> Result<Object> {
        let construct = class.ops().construct.ok_or_else(|| Error::Unsupported {
            class: class.ancestry().to_string(),
            operation: "construct",
        })?;
        Ok(Object::from_parts(class, construct()?))
    }

    /// Instantiates a plug-in class with the given state instead of running
    /// its constructor.
    ///
    /// # Errors
    ///
    /// - [`Error::UnknownClass`] if the class is not registered.
    /// - [`Error::InvalidArgument`] for builtin classes, whose payloads are
    ///   not custom state.
    pub fn with_state<T: Any + Send + Sync>(class_name: &str, state: T) -> Result<Object> {
        let class = Class::find(class_name)?;
        if builtin().contains(class) {
            return Err(Error::invalid_argument(format!(
                "'{}' is a builtin class",
                class.ancestry()
            )));
        }
        Ok(Object::from_parts(class, Value::custom(state)))
    }

    pub(crate) fn from_parts(class: &'static Class, value: Value) -> Object {
        Object {
            inner: Arc::new(ObjectInner { class, value }),
        }
    }

    /// Creates an `Object:Int`.
    #[must_use]
    pub fn int(value: i32) -> Object {
        Object::from_parts(builtin().int, Value::Int(value))
    }

    /// Creates an `Object:Float`.
    #[must_use]
    pub fn float(value: f32) -> Object {
        Object::from_parts(builtin().float, Value::Float(value))
    }

    /// Creates an `Object:String`.
    #[must_use]
    pub fn string(value: impl Into<String>) -> Object {
        Object::from_parts(builtin().string, Value::Str(value.into()))
    }

    /// Creates an `Object:Bool`.
    #[must_use]
    pub fn bool(value: bool) -> Object {
        Object::from_parts(builtin().boolean, Value::Bool(value))
    }

    /// Wraps a list. The class follows the list's backing.
    #[must_use]
    pub fn from_list(list: List) -> Object {
        Object::from_parts(list.class(), Value::list(list))
    }

    /// Wraps a map. The class follows the map's backing.
    #[must_use]
    pub fn from_map(map: Map) -> Object {
        Object::from_parts(map.class(), Value::map(map))
    }

    /// The instance's class.
    #[must_use]
    pub fn class(&self) -> &'static Class {
        self.inner.class
    }

    /// The class's own name.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.inner.class.name()
    }

    /// The payload.
    #[must_use]
    pub fn value(&self) -> &Value {
        &self.inner.value
    }

    /// Returns `true` if `name` is the class ancestry or any segment of it.
    #[must_use]
    pub fn is_type(&self, name: &str) -> bool {
        self.inner.class.is_a(name)
    }

    /// Returns `self` if it is an instance of `name`.
    #[must_use]
    pub fn cast(&self, name: &str) -> Option<&Object> {
        self.is_type(name).then_some(self)
    }

    /// Like [`Object::cast`], reporting a failed cast as an error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCast`] if the instance is not of class `name`.
    pub fn try_cast(&self, name: &str) -> Result<&Object> {
        self.cast(name).ok_or_else(|| self.invalid_cast(name))
    }

    fn invalid_cast(&self, to: &str) -> Error {
        Error::InvalidCast {
            from: self.inner.class.ancestry().to_string(),
            to: to.to_string(),
        }
    }

    /// Reads an `Object:Int`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCast`] for any other class.
    pub fn as_int(&self) -> Result<i32> {
        match self.inner.value {
            Value::Int(v) => Ok(v),
            _ => Err(self.invalid_cast("Int")),
        }
    }

    /// Reads an `Object:Float`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCast`] for any other class.
    pub fn as_float(&self) -> Result<f32> {
        match self.inner.value {
            Value::Float(v) => Ok(v),
            _ => Err(self.invalid_cast("Float")),
        }
    }

    /// Reads an `Object:String`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCast`] for any other class.
    pub fn as_str(&self) -> Result<&str> {
        match &self.inner.value {
            Value::Str(v) => Ok(v),
            _ => Err(self.invalid_cast("String")),
        }
    }

    /// Reads an `Object:Bool`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCast`] for any other class.
    pub fn as_bool(&self) -> Result<bool> {
        match self.inner.value {
            Value::Bool(v) => Ok(v),
            _ => Err(self.invalid_cast("Bool")),
        }
    }

    /// Borrows plug-in state as `T`.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.value.downcast_ref()
    }

    /// Runs `f` with shared access to the wrapped list.
    ///
    /// The list lock is held for the duration of `f`; calling back into the
    /// same object's list from `f` deadlocks.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCast`] if this is not a list.
    pub fn with_list<R>(&self, f: impl FnOnce(&List) -> R) -> Result<R> {
        let list = self
            .inner
            .value
            .read_list()
            .ok_or_else(|| self.invalid_cast("List"))?;
        Ok(f(&list))
    }

    /// Runs `f` with exclusive access to the wrapped list.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCast`] if this is not a list.
    pub fn with_list_mut<R>(&self, f: impl FnOnce(&mut List) -> R) -> Result<R> {
        let mut list = self
            .inner
            .value
            .write_list()
            .ok_or_else(|| self.invalid_cast("List"))?;
        Ok(f(&mut list))
    }

    /// Runs `f` with shared access to the wrapped map.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCast`] if this is not a map.
    pub fn with_map<R>(&self, f: impl FnOnce(&Map) -> R) -> Result<R> {
        let map = self
            .inner
            .value
            .read_map()
            .ok_or_else(|| self.invalid_cast("Map"))?;
        Ok(f(&map))
    }

    /// Runs `f` with exclusive access to the wrapped map.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCast`] if this is not a map.
    pub fn with_map_mut<R>(&self, f: impl FnOnce(&mut Map) -> R) -> Result<R> {
        let mut map = self
            .inner
            .value
            .write_map()
            .ok_or_else(|| self.invalid_cast("Map"))?;
        Ok(f(&mut map))
    }

    /// Number of live handles to this instance.
    #[must_use]
    pub fn refcount(&self) -> usize {
        Arc::strong_count(&self.inner)
    }

    /// Returns `true` if both handles refer to the same instance.
    #[must_use]
    pub fn ptr_eq(&self, other: &Object) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub(crate) fn addr(&self) -> usize {
        Arc::as_ptr(&self.inner) as usize
    }

    /// Value equality through the class's compare operation.
    ///
    /// Instances of different classes are never equal.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotComparable`] if the class of `self` has no compare
    /// operation.
    pub fn compare(&self, other: &Object) -> Result<bool> {
        let compare = self
            .inner
            .class
            .ops()
            .compare
            .ok_or_else(|| Error::NotComparable {
                class: self.inner.class.ancestry().to_string(),
            })?;
        if self.inner.class != other.inner.class {
            return Ok(false);
        }
        Ok(compare(&self.inner.value, &other.inner.value))
    }

    /// Renders the instance through the class's print operation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] if the class has no print operation.
    pub fn print(&self) -> Result<String> {
        let print = self.inner.class.ops().print.ok_or_else(|| self.unsupported("print"))?;
        print(&self.inner.value)
    }

    /// Creates an independent instance through the class's copy operation.
    ///
    /// Container copies are shallow: the new container shares its elements
    /// with the original.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] if the class has no copy operation.
    pub fn copy(&self) -> Result<Object> {
        let copy = self.inner.class.ops().copy.ok_or_else(|| self.unsupported("copy"))?;
        Ok(Object::from_parts(self.inner.class, copy(&self.inner.value)?))
    }

    fn unsupported(&self, operation: &'static str) -> Error {
        Error::Unsupported {
            class: self.inner.class.ancestry().to_string(),
            operation,
        }
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Object {}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Object")
            .field("class", &self.inner.class.ancestry())
            .field("value", &self.inner.value)
            .finish()
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.print() {
            Ok(text) => f.write_str(&text),
            Err(_) => write!(f, "<{}>", self.inner.class.ancestry()),
        }
    }
}

impl From<i32> for Object {
    fn from(value: i32) -> Self {
        Object::int(value)
    }
}

impl From<f32> for Object {
    fn from(value: f32) -> Self {
        Object::float(value)
    }
}

impl From<&str> for Object {
    fn from(value: &str) -> Self {
        Object::string(value)
    }
}

impl From<String> for Object {
    fn from(value: String) -> Self {
        Object::string(value)
    }
}

impl From<bool> for Object {
    fn from(value: bool) -> Self {
        Object::bool(value)
    }
}

/// Appends every element of `src` to the list in `dst`.
///
/// Merging a list into itself appends a snapshot of its elements taken
/// before the first append. For distinct lists both locks are taken in
/// address order, so concurrent `merge_lists(a, b)` and `merge_lists(b, a)`
/// cannot deadlock.
///
/// # Errors
///
/// Returns [`Error::InvalidCast`] if either object is not a list.
pub fn merge_lists(dst: &Object, src: &Object) -> Result<()> {
    if dst.ptr_eq(src) {
        let snapshot: Vec<Object> = src.with_list(|list| list.iter().cloned().collect())?;
        return dst.with_list_mut(|list| {
            for obj in snapshot {
                list.append(obj);
            }
        });
    }

    // Validate both before locking either.
    dst.try_cast("List")?;
    src.try_cast("List")?;

    let (dst_value, src_value) = (dst.value(), src.value());
    if dst.addr() < src.addr() {
        let mut dst_list = dst_value.write_list().ok_or_else(|| dst.invalid_cast("List"))?;
        let src_list = src_value.read_list().ok_or_else(|| src.invalid_cast("List"))?;
        dst_list.merge(&src_list);
    } else {
        let src_list = src_value.read_list().ok_or_else(|| src.invalid_cast("List"))?;
        let mut dst_list = dst_value.write_list().ok_or_else(|| dst.invalid_cast("List"))?;
        dst_list.merge(&src_list);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    static DESTROYED: AtomicUsize = AtomicUsize::new(0);

    struct Counter(u32);

    fn counter_new() -> Result<Value> {
        Ok(Value::custom(Counter(0)))
    }

    fn counter_destroy(_: &mut Value) {
        DESTROYED.fetch_add(1, Ordering::SeqCst);
    }

    fn counter_compare(a: &Value, b: &Value) -> bool {
        match (a.downcast_ref::<Counter>(), b.downcast_ref::<Counter>()) {
            (Some(a), Some(b)) => a.0 == b.0,
            _ => false,
        }
    }

    #[test]
    fn test_scalar_constructors() {
        assert_eq!(Object::int(3).as_int().unwrap(), 3);
        assert_eq!(Object::float(0.5).as_float().unwrap(), 0.5);
        assert_eq!(Object::string("abc").as_str().unwrap(), "abc");
        assert!(Object::bool(true).as_bool().unwrap());
        assert_eq!(Object::from(7).type_name(), "Int");
    }

    #[test]
    fn test_new_by_name() {
        let obj = Object::new("Int").unwrap();
        assert_eq!(obj.as_int().unwrap(), 0);

        let obj = Object::new("Object:Container:List:LinkedList").unwrap();
        assert!(obj.with_list(List::is_empty).unwrap());

        assert_eq!(
            Object::new("Missing").unwrap_err(),
            Error::UnknownClass {
                name: "Missing".into()
            }
        );
        assert!(matches!(
            Object::new("Container").unwrap_err(),
            Error::Unsupported {
                operation: "construct",
                ..
            }
        ));
    }

    #[test]
    fn test_cast() {
        let obj = Object::int(1);
        assert!(obj.cast("Int").is_some());
        assert!(obj.cast("Object").is_some());
        assert!(obj.cast("Float").is_none());
        assert_eq!(
            obj.try_cast("String").unwrap_err(),
            Error::InvalidCast {
                from: "Object:Int".into(),
                to: "String".into()
            }
        );
        assert!(obj.as_str().is_err());
    }

    #[test]
    fn test_refcount_and_destroy_once() {
        let class = ClassSpec::new("Object:TestCounter")
            .size_of::<Counter>()
            .construct(counter_new)
            .destroy(counter_destroy)
            .compare(counter_compare)
            .register()
            .unwrap();

        let before = DESTROYED.load(Ordering::SeqCst);
        let obj = Object::of_class(class).unwrap();
        let alias = obj.clone();
        assert_eq!(obj.refcount(), 2);

        drop(obj);
        assert_eq!(DESTROYED.load(Ordering::SeqCst), before);
        assert_eq!(alias.refcount(), 1);

        drop(alias);
        assert_eq!(DESTROYED.load(Ordering::SeqCst), before + 1);
    }

    #[test]
    fn test_custom_state() {
        ClassSpec::new("Object:TestState")
            .construct(counter_new)
            .compare(counter_compare)
            .register()
            .unwrap();

        let a = Object::with_state("TestState", Counter(4)).unwrap();
        let b = Object::with_state("TestState", Counter(4)).unwrap();
        let c = Object::new("TestState").unwrap();

        assert_eq!(a.downcast_ref::<Counter>().unwrap().0, 4);
        assert!(a.compare(&b).unwrap());
        assert!(!a.compare(&c).unwrap());
        assert!(a != b);

        assert!(matches!(
            a.print().unwrap_err(),
            Error::Unsupported {
                operation: "print",
                ..
            }
        ));
        assert_eq!(a.to_string(), "<Object:TestState>");
        assert!(Object::with_state("Int", Counter(1)).is_err());
    }

    #[test]
    fn test_compare() {
        assert!(Object::int(1).compare(&Object::int(1)).unwrap());
        assert!(!Object::int(1).compare(&Object::int(2)).unwrap());
        assert!(!Object::int(1).compare(&Object::float(1.0)).unwrap());
        assert!(Object::float(0.1 + 0.2).compare(&Object::float(0.3)).unwrap());
        assert!(Object::string("a").compare(&Object::string("a")).unwrap());

        let list = Object::new("LinkedList").unwrap();
        assert!(matches!(
            list.compare(&list).unwrap_err(),
            Error::NotComparable { .. }
        ));
    }

    #[test]
    fn test_print() {
        assert_eq!(Object::int(3).print().unwrap(), "[Int] 3");
        assert_eq!(Object::float(0.5).print().unwrap(), "[Float] 0.500000");
        assert_eq!(Object::string("abc").print().unwrap(), "[String] abc");
        assert_eq!(Object::bool(false).to_string(), "[Bool] false");

        let mut list = List::new(crate::container::ListKind::Array);
        list.append(Object::int(1));
        list.append(Object::int(2));
        assert_eq!(Object::from_list(list).to_string(), "[[Int] 1, [Int] 2]");

        let mut map = Map::new(crate::container::MapKind::List);
        map.set("k", Object::string("v"));
        assert_eq!(Object::from_map(map).to_string(), "{k: [String] v}");
    }

    #[test]
    fn test_copy() {
        let original = Object::string("x");
        let copy = original.copy().unwrap();
        assert!(!copy.ptr_eq(&original));
        assert_eq!(copy.as_str().unwrap(), "x");

        let element = Object::int(9);
        let mut list = List::new(crate::container::ListKind::Linked);
        list.append(element.clone());
        let list = Object::from_list(list);
        let copied = list.copy().unwrap();

        assert_eq!(copied.class(), list.class());
        assert_eq!(element.refcount(), 3);
        assert!(copied.with_list(|l| l.nth(0).unwrap().ptr_eq(&element)).unwrap());
    }

    #[test]
    fn test_merge_lists_distinct() {
        let a = Object::new("LinkedList").unwrap();
        let b = Object::new("ArrayList").unwrap();
        a.with_list_mut(|l| l.append(Object::int(1))).unwrap();
        b.with_list_mut(|l| {
            l.append(Object::int(2));
            l.append(Object::int(3));
        })
        .unwrap();

        merge_lists(&a, &b).unwrap();
        merge_lists(&b, &a).unwrap();

        assert_eq!(a.with_list(List::len).unwrap(), 3);
        assert_eq!(b.with_list(List::len).unwrap(), 5);
    }

    #[test]
    fn test_merge_lists_self() {
        let a = Object::new("ArrayList").unwrap();
        a.with_list_mut(|l| {
            l.append(Object::int(1));
            l.append(Object::int(2));
        })
        .unwrap();

        merge_lists(&a, &a).unwrap();

        let values: Vec<i32> = a
            .with_list(|l| l.iter().map(|o| o.as_int().unwrap()).collect())
            .unwrap();
        assert_eq!(values, vec![1, 2, 1, 2]);
    }

    #[test]
    fn test_merge_lists_rejects_non_lists() {
        let a = Object::new("LinkedList").unwrap();
        assert!(matches!(
            merge_lists(&a, &Object::int(1)).unwrap_err(),
            Error::InvalidCast { .. }
        ));
    }
}
