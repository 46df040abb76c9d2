use std::fmt::{self, Display, Formatter};

use crate::string::ObjString;

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ObjType {
    String,
}

/// A handle to an object owned by a [`Heap`][crate::heap::Heap].
///
/// Handles are only ever produced by the heap that owns the object, so two
/// handles are the same object exactly when they compare equal. For strings
/// this is also content equality, since the heap interns every string it
/// allocates.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ObjRef(usize);

impl ObjRef {
    pub(crate) fn new(index: usize) -> ObjRef {
        ObjRef(index)
    }

    pub(crate) fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug)]
pub enum Obj {
    String(ObjString),
}

impl Obj {
    pub fn obj_type(&self) -> ObjType {
        match self {
            Obj::String(_) => ObjType::String,
        }
    }

    pub fn as_string(&self) -> Option<&ObjString> {
        match self {
            Obj::String(s) => Some(s),
        }
    }
}

impl Display for Obj {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Obj::String(s) => write!(f, "{}", s.as_str()),
        }
    }
}
