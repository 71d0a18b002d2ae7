//! The token graph: an arena-indexed doubly-linked sequence of tokens
//! (spec §3 "Token").
//!
//! The original implementation manages this as a graph of raw,
//! individually-`new`'d nodes linked by pointers, which leaks whenever a
//! run of nodes is collapsed during rewriting (spec §9). Here every token
//! lives in one `Vec` slot addressed by a stable [`TokenId`]; `next`/`prev`
//! are indices into that arena, and `remove` returns a slot to a free
//! list instead of freeing memory — there is no dangling handle to follow
//! because the arena never shrinks and ids are never reused while still
//! referenced by a live link.

use nvylang_util::{NodeType, Value};

/// A stable handle into a [`TokenGraph`]'s arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TokenId(usize);

#[derive(Debug)]
struct Slot {
    ty: NodeType,
    value: Value,
    next: Option<TokenId>,
    prev: Option<TokenId>,
    /// `false` once `remove`d; the slot stays in the arena so no other
    /// `TokenId` is invalidated, but traversal must never land on it.
    live: bool,
}

/// Owns every token produced by the lexer for one compilation unit.
///
/// Invariants (spec §8 property 1): `head` is the unique `PROGRAM` token,
/// `tail` is the unique `ENDOFSTREAM` token, and `prev`/`next` links are
/// symmetric at every live node.
#[derive(Debug)]
pub struct TokenGraph {
    slots: Vec<Slot>,
    free: Vec<usize>,
    head: TokenId,
    tail: TokenId,
}

impl TokenGraph {
    /// Start a new graph with just its `PROGRAM` head and `ENDOFSTREAM`
    /// tail, linked to each other.
    pub fn new() -> Self {
        let mut slots = Vec::new();
        slots.push(Slot {
            ty: NodeType::Program,
            value: Value::Null,
            next: Some(TokenId(1)),
            prev: None,
            live: true,
        });
        slots.push(Slot {
            ty: NodeType::EndOfStream,
            value: Value::Null,
            next: None,
            prev: Some(TokenId(0)),
            live: true,
        });
        Self {
            slots,
            free: Vec::new(),
            head: TokenId(0),
            tail: TokenId(1),
        }
    }

    pub fn head(&self) -> TokenId {
        self.head
    }

    pub fn tail(&self) -> TokenId {
        self.tail
    }

    pub fn ty(&self, id: TokenId) -> NodeType {
        self.slots[id.0].ty
    }

    pub fn value(&self, id: TokenId) -> &Value {
        &self.slots[id.0].value
    }

    pub fn set_value(&mut self, id: TokenId, value: Value) {
        self.slots[id.0].value = value;
    }

    /// Retag a token in place, keeping its id and links. Used by the
    /// pre-parse rewriter to collapse a run of tokens into a single one
    /// without disturbing neighbours that still hold a reference to it.
    pub fn set_ty(&mut self, id: TokenId, ty: NodeType) {
        self.slots[id.0].ty = ty;
    }

    pub fn next(&self, id: TokenId) -> Option<TokenId> {
        self.slots[id.0].next
    }

    pub fn prev(&self, id: TokenId) -> Option<TokenId> {
        self.slots[id.0].prev
    }

    fn alloc(&mut self, ty: NodeType, value: Value) -> TokenId {
        let slot = Slot {
            ty,
            value,
            next: None,
            prev: None,
            live: true,
        };
        if let Some(idx) = self.free.pop() {
            self.slots[idx] = slot;
            TokenId(idx)
        } else {
            self.slots.push(slot);
            TokenId(self.slots.len() - 1)
        }
    }

    /// Append a new token just before the `ENDOFSTREAM` tail, matching how
    /// the lexer builds the graph left to right.
    pub fn push_before_tail(&mut self, ty: NodeType, value: Value) -> TokenId {
        let new_id = self.alloc(ty, value);
        let prev_of_tail = self.slots[self.tail.0].prev;
        self.set_next(prev_of_tail.expect("tail always has a prev"), Some(new_id));
        self.set_prev(new_id, prev_of_tail);
        self.set_next(new_id, Some(self.tail));
        self.set_prev(self.tail, Some(new_id));
        new_id
    }

    /// Insert `ty`/`value` immediately after `after`, returning the new id.
    pub fn insert_after(&mut self, after: TokenId, ty: NodeType, value: Value) -> TokenId {
        let new_id = self.alloc(ty, value);
        let next_of_after = self.slots[after.0].next;
        self.set_next(after, Some(new_id));
        self.set_prev(new_id, Some(after));
        self.set_next(new_id, next_of_after);
        if let Some(n) = next_of_after {
            self.set_prev(n, Some(new_id));
        }
        new_id
    }

    fn set_next(&mut self, id: TokenId, next: Option<TokenId>) {
        self.slots[id.0].next = next;
    }

    fn set_prev(&mut self, id: TokenId, prev: Option<TokenId>) {
        self.slots[id.0].prev = prev;
    }

    /// Unlink `id` from the graph, stitching its neighbours together, and
    /// return its slot to the free list. Panics if asked to remove the
    /// head or tail sentinel — those invariants hold for the whole graph
    /// lifetime.
    pub fn remove(&mut self, id: TokenId) {
        assert!(id != self.head && id != self.tail, "cannot remove graph sentinels");
        let prev = self.slots[id.0].prev;
        let next = self.slots[id.0].next;
        if let Some(p) = prev {
            self.set_next(p, next);
        }
        if let Some(n) = next {
            self.set_prev(n, prev);
        }
        self.slots[id.0].live = false;
        self.free.push(id.0);
    }

    /// Walk backward from `from` until the `PROGRAM` head is reached.
    /// Spec §8 property 1: this must always succeed.
    pub fn backtrack(&self, from: TokenId) -> TokenId {
        let mut cur = from;
        while let Some(p) = self.prev(cur) {
            cur = p;
        }
        cur
    }

    pub fn forward(&self, from: TokenId, n: usize) -> Option<TokenId> {
        let mut cur = from;
        for _ in 0..n {
            cur = self.next(cur)?;
        }
        Some(cur)
    }

    pub fn backward(&self, from: TokenId, n: usize) -> Option<TokenId> {
        let mut cur = from;
        for _ in 0..n {
            cur = self.prev(cur)?;
        }
        Some(cur)
    }

    /// Scan forward from `from` (inclusive) to the first token of type `ty`.
    pub fn forward_type(&self, from: TokenId, ty: NodeType) -> Option<TokenId> {
        let mut cur = Some(from);
        while let Some(id) = cur {
            if self.ty(id) == ty {
                return Some(id);
            }
            cur = self.next(id);
        }
        None
    }

    /// Number of tokens reachable forward from `from` up to (and
    /// including) `tail`.
    pub fn length(&self, from: TokenId) -> usize {
        let mut count = 0;
        let mut cur = Some(from);
        while let Some(id) = cur {
            count += 1;
            if id == self.tail {
                break;
            }
            cur = self.next(id);
        }
        count
    }

    /// Assert the graph's structural invariants hold (used by tests and
    /// by `nvylangc --verbose` sanity checks).
    pub fn check_invariants(&self) {
        assert_eq!(self.ty(self.head), NodeType::Program);
        assert_eq!(self.ty(self.backtrack(self.tail)), NodeType::Program);
        let mut cur = self.head;
        loop {
            if let Some(n) = self.next(cur) {
                assert_eq!(self.prev(n), Some(cur), "next/prev asymmetry at {:?}", cur);
                cur = n;
            } else {
                break;
            }
        }
        assert_eq!(self.ty(cur), NodeType::EndOfStream);
    }
}

impl Default for TokenGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_graph_links_program_to_endofstream() {
        let g = TokenGraph::new();
        assert_eq!(g.ty(g.head()), NodeType::Program);
        assert_eq!(g.ty(g.tail()), NodeType::EndOfStream);
        assert_eq!(g.next(g.head()), Some(g.tail()));
        assert_eq!(g.prev(g.tail()), Some(g.head()));
    }

    #[test]
    fn push_before_tail_keeps_tail_last() {
        let mut g = TokenGraph::new();
        let a = g.push_before_tail(NodeType::Variable, Value::Str("x".into()));
        let b = g.push_before_tail(NodeType::Assign, Value::Null);
        g.check_invariants();
        assert_eq!(g.next(g.head()), Some(a));
        assert_eq!(g.next(a), Some(b));
        assert_eq!(g.next(b), Some(g.tail()));
    }

    #[test]
    fn remove_stitches_neighbours() {
        let mut g = TokenGraph::new();
        let a = g.push_before_tail(NodeType::Mul, Value::Null);
        let b = g.push_before_tail(NodeType::Mul, Value::Null);
        let c = g.push_before_tail(NodeType::Variable, Value::Str("x".into()));
        g.remove(b);
        g.check_invariants();
        assert_eq!(g.next(a), Some(c));
        assert_eq!(g.prev(c), Some(a));
    }

    #[test]
    fn backtrack_reaches_program_from_any_node() {
        let mut g = TokenGraph::new();
        let a = g.push_before_tail(NodeType::Variable, Value::Str("x".into()));
        assert_eq!(g.backtrack(a), g.head());
        assert_eq!(g.backtrack(g.tail()), g.head());
    }

    #[test]
    fn forward_type_scans_to_first_match() {
        let mut g = TokenGraph::new();
        g.push_before_tail(NodeType::Variable, Value::Str("x".into()));
        let semi = g.push_before_tail(NodeType::EndOfLine, Value::Null);
        g.push_before_tail(NodeType::Variable, Value::Str("y".into()));
        assert_eq!(g.forward_type(g.head(), NodeType::EndOfLine), Some(semi));
    }

    #[test]
    fn length_counts_head_through_tail_inclusive() {
        let mut g = TokenGraph::new();
        g.push_before_tail(NodeType::Variable, Value::Str("x".into()));
        g.push_before_tail(NodeType::EndOfLine, Value::Null);
        assert_eq!(g.length(g.head()), 4);
    }

    #[test]
    #[should_panic]
    fn removing_head_panics() {
        let mut g = TokenGraph::new();
        let head = g.head();
        g.remove(head);
    }
}
