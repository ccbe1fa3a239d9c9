use fxhash::FxBuildHasher;
use indexmap::IndexMap;

use crate::MAX_NAME_LEN;

type FxMap<K, V> = IndexMap<K, V, FxBuildHasher>;

/// Label-name -> address store. Kept in sorted key order at all times, so
/// enumeration for the listing needs no extra work, while lookup stays a
/// hashed `get`.
#[derive(Debug, Default)]
pub struct SymbolTable {
    map: FxMap<String, u16>,
}

/// Insert rejection; the earlier binding always wins.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct DuplicateSymbol;

/// Fold a source identifier to its stored form: upper-cased, capped.
pub fn normalize(name: &str) -> String {
    let end = name.len().min(MAX_NAME_LEN);
    name[..end].to_ascii_uppercase()
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable {
            map: IndexMap::with_hasher(FxBuildHasher::default()),
        }
    }

    /// Bind `name` in sorted position. Fails if already bound; the table is
    /// left unchanged.
    pub fn insert(&mut self, name: &str, addr: u16) -> Result<(), DuplicateSymbol> {
        let name = normalize(name);
        match self.map.binary_search_keys(&name) {
            Ok(_) => Err(DuplicateSymbol),
            Err(at) => {
                self.map.shift_insert(at, name, addr);
                Ok(())
            }
        }
    }

    pub fn lookup(&self, name: &str) -> Option<u16> {
        self.map.get(&normalize(name)).copied()
    }

    /// All bindings, in sorted name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u16)> {
        self.map.iter().map(|(name, addr)| (name.as_str(), *addr))
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
