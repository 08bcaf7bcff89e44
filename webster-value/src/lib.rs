//! Runtime values of the Webster language.

pub mod env;
pub mod object;

pub use env::{EnvRef, Environment};
pub use object::{
    Array, DictPair, Dictionary, Function, HashKey, HashKind, Hashable, UnhashableKey,
};

use rustc_hash::FxHashSet;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use webster_stack::ensure_sufficient_stack;

/// Shared, mutable array storage. Every copy of an `Object::Array` aliases the same elements.
pub type ArrayRef = Rc<RefCell<Array>>;
/// Shared, mutable dictionary storage.
pub type DictRef = Rc<RefCell<Dictionary>>;

#[derive(Debug, Clone)]
pub enum Object {
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Null,
    String(String),
    Array(ArrayRef),
    Dictionary(DictRef),
    Function(Rc<Function>),
}

impl Object {
    pub fn new_array(elements: Vec<Object>) -> Self {
        Object::Array(Rc::new(RefCell::new(Array::from(elements))))
    }

    pub fn new_dictionary(dict: Dictionary) -> Self {
        Object::Dictionary(Rc::new(RefCell::new(dict)))
    }

    /// Upper-case type name used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Object::Integer(_) => "INTEGER",
            Object::Float(_) => "FLOAT",
            Object::Boolean(_) => "BOOLEAN",
            Object::Null => "NULL",
            Object::String(_) => "STRING",
            Object::Array(_) => "ARRAY",
            Object::Dictionary(_) => "DICTIONARY",
            Object::Function(_) => "FUNCTION",
        }
    }

    /// `null` and `false` are falsy, every other value (including `0` and `""`) is truthy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Object::Null | Object::Boolean(false))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Object::Null)
    }

    /// Returns the dictionary key of the value, or `None` if the value is not [`Hashable`].
    pub fn hash_key(&self) -> Option<HashKey> {
        match self {
            Object::Integer(val) => Some(val.hash_key()),
            Object::Float(val) => Some(val.hash_key()),
            Object::Boolean(val) => Some(val.hash_key()),
            Object::String(val) => Some(val.as_str().hash_key()),
            Object::Null | Object::Array(_) | Object::Dictionary(_) | Object::Function(_) => None,
        }
    }

    /// Textual rendering of the value.
    pub fn inspect(&self) -> String {
        self.to_string()
    }

    /// Writes the value. `seen` holds the containers currently being written so that
    /// a container that (indirectly) contains itself is rendered as `[...]` / `{...}`.
    fn write(&self, f: &mut fmt::Formatter<'_>, seen: &mut FxHashSet<*const ()>) -> fmt::Result {
        ensure_sufficient_stack(|| self.write_inner(f, seen))
    }

    fn write_inner(&self, f: &mut fmt::Formatter<'_>, seen: &mut FxHashSet<*const ()>) -> fmt::Result {
        match self {
            Object::Integer(val) => write!(f, "{}", val),
            Object::Float(val) => write_float(f, *val),
            Object::Boolean(val) => write!(f, "{}", val),
            Object::Null => f.write_str("null"),
            Object::String(val) => f.write_str(val),
            Object::Array(elements) => {
                let ptr = Rc::as_ptr(elements) as *const ();
                if !seen.insert(ptr) {
                    return f.write_str("[...]");
                }
                f.write_str("[")?;
                for (i, element) in elements.borrow().iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    element.write(f, seen)?;
                }
                seen.remove(&ptr);
                f.write_str("]")
            }
            Object::Dictionary(dict) => {
                let ptr = Rc::as_ptr(dict) as *const ();
                if !seen.insert(ptr) {
                    return f.write_str("{...}");
                }
                f.write_str("{")?;
                for (i, pair) in dict.borrow().iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    pair.key.write(f, seen)?;
                    f.write_str(": ")?;
                    pair.value.write(f, seen)?;
                }
                seen.remove(&ptr);
                f.write_str("}")
            }
            Object::Function(func) => write!(f, "{}", func),
        }
    }
}

/// Shortest round-trip form, always with a fractional part for finite values.
fn write_float(f: &mut fmt::Formatter<'_>, val: f64) -> fmt::Result {
    let text = val.to_string();
    if val.is_finite() && !text.contains('.') {
        write!(f, "{}.0", text)
    } else {
        f.write_str(&text)
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write(f, &mut FxHashSet::default())
    }
}

/// Structural equality, used by tests and by the host. Language level `==` lives in the evaluator.
impl PartialEq for Object {
    fn eq(&self, other: &Object) -> bool {
        match (self, other) {
            (Object::Integer(l), Object::Integer(r)) => l == r,
            (Object::Float(l), Object::Float(r)) => l == r,
            (Object::Boolean(l), Object::Boolean(r)) => l == r,
            (Object::Null, Object::Null) => true,
            (Object::String(l), Object::String(r)) => l == r,
            (Object::Array(l), Object::Array(r)) => Rc::ptr_eq(l, r) || *l.borrow() == *r.borrow(),
            (Object::Dictionary(l), Object::Dictionary(r)) => {
                Rc::ptr_eq(l, r) || *l.borrow() == *r.borrow()
            }
            (Object::Function(l), Object::Function(r)) => Rc::ptr_eq(l, r),
            _ => false,
        }
    }
}

impl From<i64> for Object {
    fn from(val: i64) -> Self {
        Object::Integer(val)
    }
}

impl From<f64> for Object {
    fn from(val: f64) -> Self {
        Object::Float(val)
    }
}

impl From<bool> for Object {
    fn from(val: bool) -> Self {
        Object::Boolean(val)
    }
}

impl From<&str> for Object {
    fn from(val: &str) -> Self {
        Object::String(val.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inspect_scalars() {
        assert_eq!(Object::Integer(-42).inspect(), "-42");
        assert_eq!(Object::Boolean(true).inspect(), "true");
        assert_eq!(Object::Null.inspect(), "null");
        assert_eq!(Object::from("verbatim \"text\"").inspect(), "verbatim \"text\"");
    }

    #[test]
    fn test_inspect_floats() {
        assert_eq!(Object::Float(2.0).inspect(), "2.0");
        assert_eq!(Object::Float(0.1).inspect(), "0.1");
        assert_eq!(Object::Float(-0.0).inspect(), "-0.0");
        assert_eq!(Object::Float(1.5e-7).inspect(), "0.00000015");
        assert_eq!(Object::Float(f64::NAN).inspect(), "NaN");
        assert_eq!(Object::Float(f64::INFINITY).inspect(), "inf");
        // rendering round-trips
        let val = 0.1 + 0.2;
        assert_eq!(Object::Float(val).inspect().parse::<f64>().unwrap(), val);
    }

    #[test]
    fn test_inspect_containers() {
        let array = Object::new_array(vec![Object::Integer(1), "two".into(), Object::new_array(vec![])]);
        assert_eq!(array.inspect(), "[1, two, []]");

        let mut dict = Dictionary::new();
        dict.insert(Object::from("a"), Object::Integer(1)).unwrap();
        assert_eq!(Object::new_dictionary(dict).inspect(), "{a: 1}");
        assert_eq!(Object::new_dictionary(Dictionary::new()).inspect(), "{}");
    }

    #[test]
    fn test_inspect_self_containing_array() {
        let array = Object::new_array(vec![Object::Integer(1)]);
        if let Object::Array(elements) = &array {
            elements.borrow_mut().push(array.clone());
        }
        assert_eq!(array.inspect(), "[1, [...]]");
    }

    #[test]
    fn test_truthiness() {
        assert!(!Object::Null.is_truthy());
        assert!(!Object::Boolean(false).is_truthy());
        assert!(Object::Boolean(true).is_truthy());
        assert!(Object::Integer(0).is_truthy());
        assert!(Object::from("").is_truthy());
        assert!(Object::new_array(vec![]).is_truthy());
    }

    #[test]
    fn test_hashable_variants() {
        assert!(Object::Integer(1).hash_key().is_some());
        assert!(Object::Float(1.0).hash_key().is_some());
        assert!(Object::Boolean(true).hash_key().is_some());
        assert!(Object::from("a").hash_key().is_some());
        assert!(Object::Null.hash_key().is_none());
        assert!(Object::new_array(vec![]).hash_key().is_none());
        assert!(Object::new_dictionary(Dictionary::new()).hash_key().is_none());
    }

    #[test]
    fn test_type_names() {
        assert_eq!(Object::Integer(1).type_name(), "INTEGER");
        assert_eq!(Object::Float(1.0).type_name(), "FLOAT");
        assert_eq!(Object::Null.type_name(), "NULL");
        assert_eq!(Object::new_array(vec![]).type_name(), "ARRAY");
    }

    #[test]
    fn test_arrays_alias() {
        let array = Object::new_array(vec![Object::Integer(1)]);
        let alias = array.clone();
        if let Object::Array(elements) = &alias {
            elements.borrow_mut()[0] = Object::Integer(9);
        }
        assert_eq!(array.inspect(), "[9]");
    }

    fn nested_arrays(depth: usize) -> Object {
        (0..depth).fold(Object::new_array(vec![]), |inner, _| Object::new_array(vec![inner]))
    }

    #[test]
    fn test_drop_deeply_nested_containers() {
        drop(nested_arrays(200_000));

        let nested = (0..200_000).fold(Object::Null, |inner, i| {
            let mut dict = Dictionary::new();
            dict.insert(Object::Integer(i), inner).unwrap();
            Object::new_dictionary(dict)
        });
        drop(nested);
    }

    #[test]
    fn test_drop_keeps_shared_children() {
        let shared = nested_arrays(3);
        let outer = Object::new_array(vec![shared.clone(), Object::Integer(1)]);
        drop(outer);
        assert_eq!(shared.inspect(), "[[[[]]]]");
    }

    #[test]
    fn test_inspect_deeply_nested_array() {
        let depth = 100_000;
        let rendered = nested_arrays(depth).inspect();
        assert_eq!(rendered.len(), 2 * (depth + 1));
        assert!(rendered.starts_with("[[[["));
        assert!(rendered.ends_with("]]]]"));
    }
}
