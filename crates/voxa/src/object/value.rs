//! Instance payloads.

use std::any::Any;
use std::fmt;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::container::{List, Map};

/// The payload carried by an [`Object`](super::Object).
///
/// Builtin classes use the typed variants; plug-in classes keep their state
/// in [`Value::Custom`]. Containers sit behind a lock so that a shared
/// container object can still be mutated.
pub enum Value {
    /// `Object:Int`
    Int(i32),
    /// `Object:Float`
    Float(f32),
    /// `Object:String`
    Str(String),
    /// `Object:Bool`
    Bool(bool),
    /// `Object:Container:List:*`
    List(RwLock<List>),
    /// `Object:Container:Map:*`
    Map(RwLock<Map>),
    /// Plug-in class state.
    Custom(Box<dyn Any + Send + Sync>),
}

impl Value {
    /// Wraps plug-in state.
    pub fn custom<T: Any + Send + Sync>(value: T) -> Self {
        Value::Custom(Box::new(value))
    }

    /// Wraps a list.
    pub fn list(list: List) -> Self {
        Value::List(RwLock::new(list))
    }

    /// Wraps a map.
    pub fn map(map: Map) -> Self {
        Value::Map(RwLock::new(map))
    }

    /// Borrows plug-in state as `T`.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Value::Custom(state) => state.downcast_ref(),
            _ => None,
        }
    }

    /// Mutably borrows plug-in state as `T`.
    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        match self {
            Value::Custom(state) => state.downcast_mut(),
            _ => None,
        }
    }

    pub(crate) fn read_list(&self) -> Option<RwLockReadGuard<'_, List>> {
        match self {
            Value::List(lock) => Some(lock.read().unwrap_or_else(PoisonError::into_inner)),
            _ => None,
        }
    }

    pub(crate) fn write_list(&self) -> Option<RwLockWriteGuard<'_, List>> {
        match self {
            Value::List(lock) => Some(lock.write().unwrap_or_else(PoisonError::into_inner)),
            _ => None,
        }
    }

    pub(crate) fn read_map(&self) -> Option<RwLockReadGuard<'_, Map>> {
        match self {
            Value::Map(lock) => Some(lock.read().unwrap_or_else(PoisonError::into_inner)),
            _ => None,
        }
    }

    pub(crate) fn write_map(&self) -> Option<RwLockWriteGuard<'_, Map>> {
        match self {
            Value::Map(lock) => Some(lock.write().unwrap_or_else(PoisonError::into_inner)),
            _ => None,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Value::Int(_) => "Int",
            Value::Float(_) => "Float",
            Value::Str(_) => "Str",
            Value::Bool(_) => "Bool",
            Value::List(_) => "List",
            Value::Map(_) => "Map",
            Value::Custom(_) => "Custom",
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "Int({v})"),
            Value::Float(v) => write!(f, "Float({v})"),
            Value::Str(v) => write!(f, "Str({v:?})"),
            Value::Bool(v) => write!(f, "Bool({v})"),
            other => write!(f, "{}(..)", other.kind()),
        }
    }
}
