//! String interning.
//!
//! A [`Symbol`] is a compact handle into an [`Interner`], giving O(1)
//! equality instead of repeated string comparison for identifiers that
//! recur throughout a compilation unit (variable/function names, module
//! names). Unlike the usual rustc-style global interner, this one is
//! owned per [`Interner`] instance rather than a process-wide `static` —
//! spec §5 requires the whole pipeline to be free of shared mutable state
//! beyond the mangled-name map, so a lazily-initialized global table would
//! be architecturally out of place here.
//!
//! # Examples
//!
//! ```
//! use nvylang_util::symbol::Interner;
//!
//! let mut interner = Interner::new();
//! let a = interner.intern("x");
//! let b = interner.intern("x");
//! assert_eq!(a, b);
//! assert_eq!(interner.resolve(a), "x");
//! ```

use rustc_hash::FxHashMap;

/// A compact handle to an interned string. Cheap to copy and compare;
/// resolve back to text via the [`Interner`] that produced it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(u32);

impl Symbol {
    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }
}

/// Owns the backing storage for a set of interned strings.
#[derive(Default)]
pub struct Interner {
    strings: Vec<Box<str>>,
    lookup: FxHashMap<Box<str>, Symbol>,
}

impl Interner {
    pub fn new() -> Self {
        Self {
            strings: Vec::new(),
            lookup: FxHashMap::default(),
        }
    }

    /// Intern `text`, returning its existing [`Symbol`] if already seen.
    pub fn intern(&mut self, text: &str) -> Symbol {
        if let Some(&sym) = self.lookup.get(text) {
            return sym;
        }
        let sym = Symbol(self.strings.len() as u32);
        let boxed: Box<str> = text.into();
        self.strings.push(boxed.clone());
        self.lookup.insert(boxed, sym);
        sym
    }

    /// Resolve a `Symbol` back to its text.
    ///
    /// # Panics
    ///
    /// Panics if `symbol` was not produced by this interner.
    pub fn resolve(&self, symbol: Symbol) -> &str {
        &self.strings[symbol.0 as usize]
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}
