//! Classes every registry starts with.
//!
//! Scalars are `Object:Int`, `Object:Float`, `Object:String` and
//! `Object:Bool`. The container classes are `Object:Container:List:*` and
//! `Object:Container:Map:*`, one concrete class per backing.

use super::class::{Class, ClassOps, Tables};
use super::value::Value;
use crate::container::{List, ListKind, Map, MapKind};
use crate::error::{Error, Result};

/// Handles to the builtin classes, resolved once when the registry is
/// created.
pub(crate) struct Builtins {
    pub(crate) int: &'static Class,
    pub(crate) float: &'static Class,
    pub(crate) string: &'static Class,
    pub(crate) boolean: &'static Class,
    pub(crate) linked_list: &'static Class,
    pub(crate) array_list: &'static Class,
    pub(crate) list_map: &'static Class,
    pub(crate) hash_map: &'static Class,
}

impl Builtins {
    /// Returns `true` if `class` is one of the concrete builtin classes.
    pub(crate) fn contains(&self, class: &Class) -> bool {
        [
            self.int,
            self.float,
            self.string,
            self.boolean,
            self.linked_list,
            self.array_list,
            self.list_map,
            self.hash_map,
        ]
        .iter()
        .any(|builtin| *builtin == class)
    }
}

pub(super) fn install(tables: &mut Tables) -> Builtins {
    tables.insert_builtin("Object", 0, ClassOps::default());
    tables.insert_builtin("Object:Container", 0, ClassOps::default());
    tables.insert_builtin("Object:Container:List", 0, ClassOps::default());
    tables.insert_builtin("Object:Container:Map", 0, ClassOps::default());

    Builtins {
        int: tables.insert_builtin(
            "Object:Int",
            size_of::<i32>(),
            ClassOps {
                construct: Some(int_new),
                destroy: None,
                compare: Some(int_compare),
                print: Some(int_print),
                copy: Some(scalar_copy),
            },
        ),
        float: tables.insert_builtin(
            "Object:Float",
            size_of::<f32>(),
            ClassOps {
                construct: Some(float_new),
                destroy: None,
                compare: Some(float_compare),
                print: Some(float_print),
                copy: Some(scalar_copy),
            },
        ),
        string: tables.insert_builtin(
            "Object:String",
            size_of::<String>(),
            ClassOps {
                construct: Some(string_new),
                destroy: None,
                compare: Some(string_compare),
                print: Some(string_print),
                copy: Some(scalar_copy),
            },
        ),
        boolean: tables.insert_builtin(
            "Object:Bool",
            size_of::<bool>(),
            ClassOps {
                construct: Some(bool_new),
                destroy: None,
                compare: Some(bool_compare),
                print: Some(bool_print),
                copy: Some(scalar_copy),
            },
        ),
        linked_list: tables.insert_builtin(
            "Object:Container:List:LinkedList",
            size_of::<List>(),
            ClassOps {
                construct: Some(linked_list_new),
                destroy: None,
                compare: None,
                print: Some(list_print),
                copy: Some(list_copy),
            },
        ),
        array_list: tables.insert_builtin(
            "Object:Container:List:ArrayList",
            size_of::<List>(),
            ClassOps {
                construct: Some(array_list_new),
                destroy: None,
                compare: None,
                print: Some(list_print),
                copy: Some(list_copy),
            },
        ),
        list_map: tables.insert_builtin(
            "Object:Container:Map:ListMap",
            size_of::<Map>(),
            ClassOps {
                construct: Some(list_map_new),
                destroy: None,
                compare: None,
                print: Some(map_print),
                copy: Some(map_copy),
            },
        ),
        hash_map: tables.insert_builtin(
            "Object:Container:Map:HashMap",
            size_of::<Map>(),
            ClassOps {
                construct: Some(hash_map_new),
                destroy: None,
                compare: None,
                print: Some(map_print),
                copy: Some(map_copy),
            },
        ),
    }
}

fn mismatch(expected: &str, value: &Value) -> Error {
    Error::consistency(format!("{expected} class holds {value:?}"))
}

// ============================================================================
// Scalars
// ============================================================================

fn int_new() -> Result<Value> {
    Ok(Value::Int(0))
}

fn float_new() -> Result<Value> {
    Ok(Value::Float(0.0))
}

fn string_new() -> Result<Value> {
    Ok(Value::Str(String::new()))
}

fn bool_new() -> Result<Value> {
    Ok(Value::Bool(false))
}

fn int_compare(a: &Value, b: &Value) -> bool {
    matches!((a, b), (Value::Int(a), Value::Int(b)) if a == b)
}

fn float_compare(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Float(a), Value::Float(b)) => (a - b).abs() <= f32::EPSILON,
        _ => false,
    }
}

fn string_compare(a: &Value, b: &Value) -> bool {
    matches!((a, b), (Value::Str(a), Value::Str(b)) if a == b)
}

fn bool_compare(a: &Value, b: &Value) -> bool {
    matches!((a, b), (Value::Bool(a), Value::Bool(b)) if a == b)
}

fn int_print(value: &Value) -> Result<String> {
    match value {
        Value::Int(v) => Ok(format!("[Int] {v}")),
        other => Err(mismatch("Int", other)),
    }
}

fn float_print(value: &Value) -> Result<String> {
    match value {
        Value::Float(v) => Ok(format!("[Float] {v:.6}")),
        other => Err(mismatch("Float", other)),
    }
}

fn string_print(value: &Value) -> Result<String> {
    match value {
        Value::Str(v) => Ok(format!("[String] {v}")),
        other => Err(mismatch("String", other)),
    }
}

fn bool_print(value: &Value) -> Result<String> {
    match value {
        Value::Bool(v) => Ok(format!("[Bool] {v}")),
        other => Err(mismatch("Bool", other)),
    }
}

fn scalar_copy(value: &Value) -> Result<Value> {
    match value {
        Value::Int(v) => Ok(Value::Int(*v)),
        Value::Float(v) => Ok(Value::Float(*v)),
        Value::Str(v) => Ok(Value::Str(v.clone())),
        Value::Bool(v) => Ok(Value::Bool(*v)),
        other => Err(mismatch("scalar", other)),
    }
}

// ============================================================================
// Containers
// ============================================================================

fn linked_list_new() -> Result<Value> {
    Ok(Value::list(List::new(ListKind::Linked)))
}

fn array_list_new() -> Result<Value> {
    Ok(Value::list(List::new(ListKind::Array)))
}

fn list_map_new() -> Result<Value> {
    Ok(Value::map(Map::new(MapKind::List)))
}

fn hash_map_new() -> Result<Value> {
    Ok(Value::map(Map::new(MapKind::Hash)))
}

fn list_print(value: &Value) -> Result<String> {
    let list = value.read_list().ok_or_else(|| mismatch("List", value))?;
    let items: Vec<String> = list.iter().map(ToString::to_string).collect();
    Ok(format!("[{}]", items.join(", ")))
}

fn list_copy(value: &Value) -> Result<Value> {
    let list = value.read_list().ok_or_else(|| mismatch("List", value))?;
    Ok(Value::list(list.copy(None)))
}

fn map_print(value: &Value) -> Result<String> {
    let map = value.read_map().ok_or_else(|| mismatch("Map", value))?;
    let entries: Vec<String> = map.iter().map(|(key, obj)| format!("{key}: {obj}")).collect();
    Ok(format!("{{{}}}", entries.join(", ")))
}

fn map_copy(value: &Value) -> Result<Value> {
    let map = value.read_map().ok_or_else(|| mismatch("Map", value))?;
    Ok(Value::map(map.copy(None)))
}
