use crate::{EnvRef, Object};
use rustc_hash::FxHashMap;
use std::fmt;
use std::mem;
use std::ops::{Deref, DerefMut};
use std::rc::Rc;
use webster_parser::ast::Block;

/// Type tag of a [`HashKey`]. Keys of different types never collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HashKind {
    Integer,
    Float,
    Boolean,
    String,
}

/// Structural dictionary key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HashKey {
    pub kind: HashKind,
    pub value: u64,
}

/// Values that can be used as dictionary keys.
pub trait Hashable {
    fn hash_key(&self) -> HashKey;
}

impl Hashable for i64 {
    fn hash_key(&self) -> HashKey {
        HashKey {
            kind: HashKind::Integer,
            value: *self as u64,
        }
    }
}

/// Floats hash by bit pattern: `0.0` and `-0.0` are different keys, identical NaNs are the same key.
impl Hashable for f64 {
    fn hash_key(&self) -> HashKey {
        HashKey {
            kind: HashKind::Float,
            value: self.to_bits(),
        }
    }
}

impl Hashable for bool {
    fn hash_key(&self) -> HashKey {
        HashKey {
            kind: HashKind::Boolean,
            value: *self as u64,
        }
    }
}

impl Hashable for str {
    fn hash_key(&self) -> HashKey {
        HashKey {
            kind: HashKind::String,
            value: fnv1a(self.as_bytes()),
        }
    }
}

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// 64-bit FNV-1a.
fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET_BASIS, |hash, &byte| {
        (hash ^ u64::from(byte)).wrapping_mul(FNV_PRIME)
    })
}

/// A value that is not [`Hashable`] was used as a dictionary key. Holds the value's type name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnhashableKey(pub &'static str);

#[derive(Debug, Clone, PartialEq)]
pub struct DictPair {
    /// The key as it was written, kept for iteration and rendering.
    pub key: Object,
    pub value: Object,
}

/// Element storage of an array value.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Array(Vec<Object>);

impl From<Vec<Object>> for Array {
    fn from(elements: Vec<Object>) -> Self {
        Self(elements)
    }
}

impl Deref for Array {
    type Target = Vec<Object>;

    fn deref(&self) -> &Vec<Object> {
        &self.0
    }
}

impl DerefMut for Array {
    fn deref_mut(&mut self) -> &mut Vec<Object> {
        &mut self.0
    }
}

impl Drop for Array {
    fn drop(&mut self) {
        drop_iteratively(mem::take(&mut self.0));
    }
}

/// Drops `worklist` without recursing into nested containers. Containers that are the
/// last owner of their storage are emptied onto the worklist before they go away.
fn drop_iteratively(mut worklist: Vec<Object>) {
    while let Some(object) = worklist.pop() {
        match object {
            Object::Array(elements) => {
                if let Ok(cell) = Rc::try_unwrap(elements) {
                    worklist.append(&mut cell.into_inner().0);
                }
            }
            Object::Dictionary(dict) => {
                if let Ok(cell) = Rc::try_unwrap(dict) {
                    cell.into_inner().drain_into(&mut worklist);
                }
            }
            _ => {}
        }
    }
}

/// Mapping from [`HashKey`] to the original key and its value. Iteration order is unspecified.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dictionary {
    pairs: FxHashMap<HashKey, DictPair>,
}

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites the pair for `key`.
    pub fn insert(&mut self, key: Object, value: Object) -> Result<(), UnhashableKey> {
        let hash_key = key.hash_key().ok_or(UnhashableKey(key.type_name()))?;
        self.pairs.insert(hash_key, DictPair { key, value });
        Ok(())
    }

    /// Returns the value stored for `key`, `Ok(None)` if there is none.
    pub fn get(&self, key: &Object) -> Result<Option<&Object>, UnhashableKey> {
        let hash_key = key.hash_key().ok_or(UnhashableKey(key.type_name()))?;
        Ok(self.pairs.get(&hash_key).map(|pair| &pair.value))
    }

    pub fn iter(&self) -> impl Iterator<Item = &DictPair> {
        self.pairs.values()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    fn drain_into(&mut self, worklist: &mut Vec<Object>) {
        for (_, pair) in self.pairs.drain() {
            worklist.push(pair.key);
            worklist.push(pair.value);
        }
    }
}

impl Drop for Dictionary {
    fn drop(&mut self) {
        let mut worklist = Vec::new();
        self.drain_into(&mut worklist);
        drop_iteratively(worklist);
    }
}

/// A closure: parameters and body of a function literal plus the environment it was defined in.
pub struct Function {
    /// Name of the binding the literal was assigned to, if any.
    pub ident: Option<String>,
    pub params: Vec<String>,
    pub body: Rc<Block>,
    /// The defining environment, shared with every other closure defined in it.
    pub env: EnvRef,
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("func")?;
        if let Some(ident) = &self.ident {
            write!(f, " {}", ident)?;
        }
        write!(f, "({}) {}", self.params.join(", "), self.body)
    }
}

/// The captured environment is left out, it usually contains the function itself.
impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("ident", &self.ident)
            .field("params", &self.params)
            .finish()
    }
}
