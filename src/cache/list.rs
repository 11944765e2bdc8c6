//! Node Arena Module
//!
//! Slot arena of list nodes addressed by stable indices, plus intrusive
//! doubly linked lists threaded through those nodes.
//!
//! A single arena can back many lists: the LRU engine uses one list, the
//! LFU engine one list per frequency. A [`ListHead`] only records head, tail
//! and length; the prev/next links live in the nodes.

/// Stable index of a node inside a [`NodeArena`].
pub type SlotId = usize;

#[derive(Debug)]
struct Node<T> {
    value: T,
    prev: Option<SlotId>,
    next: Option<SlotId>,
}

// == List Head ==
/// Head/tail/length of one intrusive list.
///
/// Front = most recently linked, back = next eviction candidate.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ListHead {
    head: Option<SlotId>,
    tail: Option<SlotId>,
    len: usize,
}

impl ListHead {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn front(&self) -> Option<SlotId> {
        self.head
    }

    pub fn back(&self) -> Option<SlotId> {
        self.tail
    }
}

// == Node Arena ==
/// Owns list nodes; freed slots are recycled through a free list.
#[derive(Debug)]
pub struct NodeArena<T> {
    slots: Vec<Option<Node<T>>>,
    free: Vec<SlotId>,
    len: usize,
}

impl<T> Default for NodeArena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> NodeArena<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            len: 0,
        }
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.len
    }

    // == Insert ==
    /// Stores `value` in a fresh, unlinked node and returns its slot.
    pub fn insert(&mut self, value: T) -> SlotId {
        let node = Node {
            value,
            prev: None,
            next: None,
        };
        self.len += 1;
        if let Some(id) = self.free.pop() {
            self.slots[id] = Some(node);
            id
        } else {
            self.slots.push(Some(node));
            self.slots.len() - 1
        }
    }

    // == Remove ==
    /// Frees a slot and returns its value.
    ///
    /// The node must already be unlinked from its list.
    pub fn remove(&mut self, id: SlotId) -> Option<T> {
        let node = self.slots.get_mut(id)?.take()?;
        debug_assert!(node.prev.is_none() && node.next.is_none());
        self.free.push(id);
        self.len -= 1;
        Some(node.value)
    }

    pub fn get(&self, id: SlotId) -> Option<&T> {
        self.node(id).map(|node| &node.value)
    }

    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        self.node_mut(id).map(|node| &mut node.value)
    }

    // == Push Front ==
    /// Links an unlinked node at the front of `list`.
    pub fn push_front(&mut self, list: &mut ListHead, id: SlotId) {
        let old_head = list.head;
        match self.node_mut(id) {
            Some(node) => {
                node.prev = None;
                node.next = old_head;
            }
            None => return,
        }
        match old_head.and_then(|head| self.node_mut(head)) {
            Some(head) => head.prev = Some(id),
            None => list.tail = Some(id),
        }
        list.head = Some(id);
        list.len += 1;
    }

    // == Unlink ==
    /// Detaches a node from `list`, leaving it allocated.
    pub fn unlink(&mut self, list: &mut ListHead, id: SlotId) {
        let (prev, next) = match self.node_mut(id) {
            Some(node) => (node.prev.take(), node.next.take()),
            None => return,
        };
        match prev.and_then(|p| self.node_mut(p)) {
            Some(node) => node.next = next,
            None => list.head = next,
        }
        match next.and_then(|n| self.node_mut(n)) {
            Some(node) => node.prev = prev,
            None => list.tail = prev,
        }
        list.len -= 1;
    }

    // == Move To Front ==
    pub fn move_to_front(&mut self, list: &mut ListHead, id: SlotId) {
        if list.head == Some(id) {
            return;
        }
        self.unlink(list, id);
        self.push_front(list, id);
    }

    /// Iterates the slots of `list` from front to back.
    pub fn iter_ids<'a>(&'a self, list: &ListHead) -> impl Iterator<Item = SlotId> + 'a {
        let mut cursor = list.front();
        std::iter::from_fn(move || {
            let id = cursor?;
            cursor = self.node(id).and_then(|node| node.next);
            Some(id)
        })
    }

    /// Iterates the live slots in arena order.
    pub fn iter(&self) -> impl Iterator<Item = (SlotId, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(id, slot)| slot.as_ref().map(|node| (id, &node.value)))
    }

    /// Drops every node.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.len = 0;
    }

    /// Panics if `list` is not a well-formed chain of live nodes.
    pub fn debug_validate_list(&self, list: &ListHead) {
        let mut count = 0;
        let mut prev = None;
        let mut cursor = list.front();
        while let Some(id) = cursor {
            let node = self.node(id).expect("list links a freed slot");
            assert_eq!(node.prev, prev, "broken back link at slot {id}");
            count += 1;
            assert!(count <= self.len, "list longer than arena (cycle?)");
            prev = Some(id);
            cursor = node.next;
        }
        assert_eq!(list.back(), prev, "tail does not match last node");
        assert_eq!(list.len(), count, "list length mismatch");
    }

    fn node(&self, id: SlotId) -> Option<&Node<T>> {
        self.slots.get(id).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, id: SlotId) -> Option<&mut Node<T>> {
        self.slots.get_mut(id).and_then(Option::as_mut)
    }
}
