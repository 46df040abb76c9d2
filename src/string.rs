const FNV_OFFSET_BASIS: u32 = 2_166_136_261;
const FNV_PRIME: u32 = 16_777_619;

/// The string object. The characters live in a single allocation sized to the
/// string, and the hash is computed once when the string is interned.
#[derive(Debug)]
pub struct ObjString {
    hash: u32,
    chars: Box<str>,
}

impl ObjString {
    /// FNV-1a over the UTF-8 bytes.
    pub fn compute_hash(s: &str) -> u32 {
        let mut hash = FNV_OFFSET_BASIS;
        for byte in s.bytes() {
            hash ^= u32::from(byte);
            hash = hash.wrapping_mul(FNV_PRIME);
        }
        hash
    }

    pub(crate) fn new(chars: Box<str>, hash: u32) -> ObjString {
        ObjString { hash, chars }
    }

    pub fn as_str(&self) -> &str {
        &self.chars
    }

    pub fn hash(&self) -> u32 {
        self.hash
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }
}
