use crate::{
    object::{Obj, ObjRef},
    string::ObjString,
    table::{Key, Table},
    value::Value,
};

/// Owns every object the VM allocates.
///
/// Objects are never freed individually. They all go at once when the heap
/// is dropped along with its VM.
#[derive(Debug, Default)]
pub struct Heap {
    objects: Vec<Obj>,
    /// Interning pool. Keys are the canonical strings, values are always nil.
    strings: Table,
}

impl Heap {
    pub fn new() -> Heap {
        Heap::default()
    }

    /// Interns a copy of `chars`.
    pub fn copy_string(&mut self, chars: &str) -> ObjRef {
        let hash = ObjString::compute_hash(chars);

        if let Some(interned) =
            self.strings.find_string(&self.objects, chars, hash)
        {
            interned
        } else {
            self.allocate_string(chars.into(), hash)
        }
    }

    /// Interns `buf`, taking ownership of it. If the content is already
    /// interned the buffer is dropped and the existing string returned.
    pub fn take_string(&mut self, buf: String) -> ObjRef {
        let hash = ObjString::compute_hash(&buf);

        if let Some(interned) =
            self.strings.find_string(&self.objects, &buf, hash)
        {
            interned
        } else {
            self.allocate_string(buf.into_boxed_str(), hash)
        }
    }

    /// Concatenates two strings into a freshly interned one. Returns `None`
    /// if either handle isn't a string.
    pub fn concatenate(&mut self, a: ObjRef, b: ObjRef) -> Option<ObjRef> {
        let buf = {
            let a = self.string(a)?.as_str();
            let b = self.string(b)?.as_str();
            let mut buf = String::with_capacity(a.len() + b.len());
            buf.push_str(a);
            buf.push_str(b);
            buf
        };

        Some(self.take_string(buf))
    }

    fn allocate_string(&mut self, chars: Box<str>, hash: u32) -> ObjRef {
        let string = ObjRef::new(self.objects.len());
        self.objects.push(Obj::String(ObjString::new(chars, hash)));
        self.strings.set(Key { string, hash }, Value::Nil);
        string
    }

    pub fn get(&self, obj: ObjRef) -> Option<&Obj> {
        self.objects.get(obj.index())
    }

    pub fn string(&self, obj: ObjRef) -> Option<&ObjString> {
        self.get(obj).and_then(Obj::as_string)
    }

    /// The table key for a string handle.
    pub fn key(&self, string: ObjRef) -> Option<Key> {
        self.string(string).map(|s| Key {
            string,
            hash: s.hash(),
        })
    }

    /// The interning table.
    pub fn strings(&self) -> &Table {
        &self.strings
    }

    /// Number of objects allocated so far.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn copy_string_interns() {
        let mut heap = Heap::new();
        let a = heap.copy_string("hello");
        let b = heap.copy_string("hello");
        let c = heap.copy_string("world");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(heap.len(), 2);
        assert_eq!(heap.strings().len(), 2);
    }

    #[test]
    fn take_string_reuses_canonical_instance() {
        let mut heap = Heap::new();
        let literal = heap.copy_string("abcd");
        let taken = heap.take_string(String::from("abcd"));

        assert_eq!(literal, taken);
        assert_eq!(heap.len(), 1);
    }

    #[test]
    fn concatenation_is_interned() {
        let mut heap = Heap::new();
        let ab = heap.copy_string("ab");
        let cd = heap.copy_string("cd");

        let abcd = heap.concatenate(ab, cd).unwrap();
        assert_eq!(heap.string(abcd).unwrap().as_str(), "abcd");

        let before = heap.strings().len();
        let literal = heap.copy_string("abcd");
        assert_eq!(literal, abcd);
        assert_eq!(heap.strings().len(), before);
    }

    #[test]
    fn empty_string_is_a_string_too() {
        let mut heap = Heap::new();
        let empty = heap.copy_string("");
        let again = heap.take_string(String::new());

        assert_eq!(empty, again);
        assert!(heap.string(empty).unwrap().is_empty());
    }

    #[test]
    fn interned_strings_survive_table_growth() {
        let mut heap = Heap::new();
        let handles: Vec<_> =
            (0..100).map(|i| heap.copy_string(&i.to_string())).collect();

        assert!(heap.strings().capacity() >= 128);
        for (i, handle) in handles.iter().enumerate() {
            assert_eq!(heap.copy_string(&i.to_string()), *handle);
            assert_eq!(
                heap.strings().get(heap.key(*handle).unwrap()),
                Some(Value::Nil)
            );
        }
    }

    #[test]
    fn unknown_handles_are_rejected() {
        let heap = Heap::new();
        assert!(heap.get(ObjRef::new(3)).is_none());
        assert!(heap.key(ObjRef::new(3)).is_none());
    }
}
