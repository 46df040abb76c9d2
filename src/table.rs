use log::trace;

use crate::{
    object::{Obj, ObjRef},
    value::Value,
};

const TABLE_MAX_LOAD: f64 = 0.75;
const MIN_CAPACITY: usize = 8;

/// A table key: an interned string handle and its cached hash.
///
/// Keys compare by handle, so the hash only steers probing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Key {
    pub string: ObjRef,
    pub hash: u32,
}

#[derive(Debug, Clone, Copy)]
enum Entry {
    Empty,
    /// A deleted slot. Probes walk past these instead of stopping.
    Tombstone,
    Occupied(Key, Value),
}

/// Open addressing hash table with linear probing, keyed by interned strings.
///
/// `count` tracks occupied slots *and* tombstones, and only shrinks back to
/// the number of live entries when the table is rebuilt. The load factor is
/// checked against it, so there is always an empty slot to end a probe.
#[derive(Debug, Default)]
pub struct Table {
    count: usize,
    live: usize,
    entries: Vec<Entry>,
}

impl Table {
    pub fn new() -> Self {
        Table::default()
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Slots in use, tombstones included.
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    /// Inserts or overwrites `key`. Returns `true` if the key was not already
    /// present.
    pub fn set(&mut self, key: Key, value: Value) -> bool {
        if (self.count + 1) as f64 > self.capacity() as f64 * TABLE_MAX_LOAD {
            let capacity = grow_capacity(self.capacity());
            self.adjust_capacity(capacity);
        }

        let index = find_entry(&self.entries, key);
        let entry = &mut self.entries[index];
        let is_new_key = !matches!(entry, Entry::Occupied(..));

        if is_new_key {
            // a reused tombstone is already part of `count`
            if let Entry::Empty = entry {
                self.count += 1;
            }
            self.live += 1;
        }

        *entry = Entry::Occupied(key, value);
        is_new_key
    }

    pub fn get(&self, key: Key) -> Option<Value> {
        if self.count == 0 {
            return None;
        }

        match self.entries[find_entry(&self.entries, key)] {
            Entry::Occupied(_, value) => Some(value),
            _ => None,
        }
    }

    /// Removes `key`, leaving a tombstone in its slot. Returns `true` if the
    /// key was present.
    pub fn delete(&mut self, key: Key) -> bool {
        if self.count == 0 {
            return false;
        }

        let index = find_entry(&self.entries, key);
        let entry = &mut self.entries[index];

        if let Entry::Occupied(..) = entry {
            *entry = Entry::Tombstone;
            self.live -= 1;
            true
        } else {
            false
        }
    }

    /// Looks a string up by content rather than identity. This is how the
    /// heap discovers whether some characters already have a canonical
    /// string object.
    pub fn find_string(
        &self,
        objects: &[Obj],
        chars: &str,
        hash: u32,
    ) -> Option<ObjRef> {
        if self.count == 0 {
            return None;
        }

        let mask = self.capacity() - 1;
        let mut index = hash as usize & mask;

        loop {
            match self.entries[index] {
                Entry::Empty => return None,
                Entry::Tombstone => {}
                Entry::Occupied(key, _) if key.hash == hash => {
                    let same = objects
                        .get(key.string.index())
                        .and_then(Obj::as_string)
                        .map_or(false, |s| s.as_str() == chars);

                    if same {
                        return Some(key.string);
                    }
                }
                Entry::Occupied(..) => {}
            }

            index = (index + 1) & mask;
        }
    }

    /// Live entries, in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (Key, Value)> + '_ {
        self.entries.iter().filter_map(|entry| match entry {
            Entry::Occupied(key, value) => Some((*key, *value)),
            _ => None,
        })
    }

    fn adjust_capacity(&mut self, capacity: usize) {
        trace!(
            "table grow {} -> {} ({} live, {} tombstones)",
            self.capacity(),
            capacity,
            self.live,
            self.count - self.live
        );

        let mut entries = vec![Entry::Empty; capacity];

        // Tombstones are dropped here, so `count` goes back to the live count.
        for (key, value) in self.iter() {
            let index = find_entry(&entries, key);
            entries[index] = Entry::Occupied(key, value);
        }

        self.entries = entries;
        self.count = self.live;
    }
}

fn grow_capacity(capacity: usize) -> usize {
    if capacity < MIN_CAPACITY {
        MIN_CAPACITY
    } else {
        capacity * 2
    }
}

/// Returns the slot holding `key`, or the slot it should be inserted into:
/// the first tombstone passed on the way, or else the empty slot that ended
/// the probe.
///
/// `entries` must be non-empty with a power of two length and at least one
/// empty slot.
fn find_entry(entries: &[Entry], key: Key) -> usize {
    let mask = entries.len() - 1;
    let mut index = key.hash as usize & mask;
    let mut tombstone = None;

    loop {
        match entries[index] {
            Entry::Empty => return tombstone.unwrap_or(index),
            Entry::Tombstone => {
                if tombstone.is_none() {
                    tombstone = Some(index);
                }
            }
            Entry::Occupied(k, _) if k == key => return index,
            Entry::Occupied(..) => {}
        }

        index = (index + 1) & mask;
    }
}
