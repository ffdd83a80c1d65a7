//! Arena-backed doubly linked list with sentinel-guarded removal.
//!
//! Entries live in a slot vector and refer to their neighbours by [`Link`].
//! Two slots are reserved as guards. They are linked in front of the head and
//! behind the tail only while an entry is being unlinked, so the relinking
//! step never branches on a missing neighbour. Both the block chain of a node
//! and the node list of a registry are built on this type.
//!
//! # Invariants
//!
//! - `head.prev` and `tail.next` are `None` outside of a removal
//! - Forward and backward traversal yield the same entries in reverse order
//! - A [`Link`] stays valid until its entry is removed. Released slots are
//!   recycled, but a recycled slot never answers to a link issued before
//!   the release

use crate::error::{CoreError, CoreResult};

/// Identity handle of an entry inside one [`SpliceList`].
///
/// Links compare by identity: two entries holding equal values still have
/// distinct links. A link is meaningless for any list other than the one
/// that produced it.
///
/// Removing an entry invalidates its link. The slot may be reused by a later
/// insertion, but the new entry gets a fresh generation, so lookups through
/// the old link keep returning `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Link {
    index: usize,
    generation: u32,
}

impl Link {
    const fn new(index: usize, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Returns the slot index behind this link.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.index
    }

    /// Returns how many times the slot was released before this link was
    /// issued.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

const HEAD_GUARD: Link = Link::new(0, 0);
const TAIL_GUARD: Link = Link::new(1, 0);

#[derive(Debug)]
struct Slot<T> {
    value: Option<T>,
    generation: u32,
    prev: Option<Link>,
    next: Option<Link>,
}

impl<T> Slot<T> {
    const fn vacant() -> Self {
        Self {
            value: None,
            generation: 0,
            prev: None,
            next: None,
        }
    }

    fn release(&mut self) -> Option<T> {
        self.prev = None;
        self.next = None;
        self.generation = self.generation.wrapping_add(1);
        self.value.take()
    }
}

/// A doubly linked list whose entries are addressed by [`Link`].
#[derive(Debug)]
pub struct SpliceList<T> {
    slots: Vec<Slot<T>>,
    free: Vec<Link>,
    head: Option<Link>,
    tail: Option<Link>,
    len: usize,
    limit: Option<usize>,
}

impl<T> Default for SpliceList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SpliceList<T> {
    /// Creates an empty, unbounded list.
    #[must_use]
    pub fn new() -> Self {
        Self::with_limit(None)
    }

    /// Creates an empty list holding at most `limit` entries.
    #[must_use]
    pub fn with_limit(limit: Option<usize>) -> Self {
        Self {
            slots: vec![Slot::vacant(), Slot::vacant()],
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
            limit,
        }
    }

    /// Returns the capacity limit, if any.
    #[must_use]
    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Returns the number of linked entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the list has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Returns the first entry's link.
    #[must_use]
    pub fn head(&self) -> Option<Link> {
        self.head
    }

    /// Returns the last entry's link.
    #[must_use]
    pub fn tail(&self) -> Option<Link> {
        self.tail
    }

    /// Returns the value behind `link`, if it is a live entry of this list.
    #[must_use]
    pub fn get(&self, link: Link) -> Option<&T> {
        if is_guard(link) {
            return None;
        }
        let slot = self.slots.get(link.index)?;
        if slot.generation != link.generation {
            return None;
        }
        slot.value.as_ref()
    }

    /// Returns a mutable reference to the value behind `link`.
    pub fn get_mut(&mut self, link: Link) -> Option<&mut T> {
        if is_guard(link) {
            return None;
        }
        let slot = self.slots.get_mut(link.index)?;
        if slot.generation != link.generation {
            return None;
        }
        slot.value.as_mut()
    }

    /// Returns true if `link` refers to a live entry.
    #[must_use]
    pub fn contains(&self, link: Link) -> bool {
        self.get(link).is_some()
    }

    /// Returns the successor of `link`.
    #[must_use]
    pub fn next(&self, link: Link) -> Option<Link> {
        self.get(link)?;
        self.slots[link.index].next
    }

    /// Returns the predecessor of `link`.
    #[must_use]
    pub fn prev(&self, link: Link) -> Option<Link> {
        self.get(link)?;
        self.slots[link.index].prev
    }

    /// Returns the first entry matching `pred`, scanning head to tail.
    pub fn find(&self, mut pred: impl FnMut(&T) -> bool) -> Option<Link> {
        self.iter().find(|(_, value)| pred(value)).map(|(link, _)| link)
    }

    /// Iterates entries head to tail.
    pub fn iter(&self) -> Iter<'_, T> {
        self.iter_from(self.head)
    }

    /// Iterates entries from `start` (inclusive) to the tail.
    pub fn iter_from(&self, start: Option<Link>) -> Iter<'_, T> {
        Iter {
            list: self,
            cursor: start.filter(|link| self.contains(*link)),
            backward: false,
        }
    }

    /// Iterates entries tail to head.
    pub fn iter_rev(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            cursor: self.tail,
            backward: true,
        }
    }

    /// Appends `value` after the current tail.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::ResourceExhausted`] if the limit is reached or
    /// the slot vector cannot grow. The list is unchanged on error.
    pub fn push_back(&mut self, value: T) -> CoreResult<Link> {
        self.ensure_capacity(1)?;
        Ok(self.link_back(value))
    }

    /// Moves every entry of `other` behind the current tail, keeping order.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::ResourceExhausted`] before moving anything if the
    /// combined length would exceed the limit or cannot be allocated.
    pub fn append(&mut self, mut other: Self) -> CoreResult<()> {
        self.ensure_capacity(other.len)?;
        let mut cursor = other.head;
        while let Some(link) = cursor {
            let slot = &mut other.slots[link.index];
            cursor = slot.next;
            if let Some(value) = slot.value.take() {
                self.link_back(value);
            }
        }
        Ok(())
    }

    /// Removes the entry behind `link` and returns its value.
    ///
    /// Returns `None` if `link` is not a live entry of this list.
    pub fn remove(&mut self, link: Link) -> Option<T> {
        let mut untracked = None;
        self.remove_tracking(link, &mut untracked)
    }

    /// Removes the entry behind `link`, keeping `marker` pointed at a live
    /// entry.
    ///
    /// If `marker` points at the removed entry it moves to the predecessor,
    /// or to `None` when the removed entry was the head. Removing the last
    /// remaining entry always resets `marker` to `None`.
    pub fn remove_tracking(&mut self, link: Link, marker: &mut Option<Link>) -> Option<T> {
        if !self.contains(link) {
            return None;
        }

        if self.len == 1 {
            self.head = None;
            self.tail = None;
            *marker = None;
        } else if let (Some(head), Some(tail)) = (self.head, self.tail) {
            let mut guard = SentinelGuard::attach(self, head, tail);
            let predecessor = guard.unlink(link);
            if *marker == Some(link) {
                *marker = Some(predecessor);
            }
            guard.detach(marker);
        }

        self.len -= 1;
        self.release(link)
    }

    /// Drops every entry and resets the list to empty.
    ///
    /// Slots are kept for reuse; every link issued so far is invalidated.
    pub fn clear(&mut self) {
        self.slots[HEAD_GUARD.index] = Slot::vacant();
        self.slots[TAIL_GUARD.index] = Slot::vacant();
        self.free.clear();
        for (index, slot) in self.slots.iter_mut().enumerate().skip(2) {
            if slot.value.is_some() {
                slot.release();
            }
            self.free.push(Link::new(index, slot.generation));
        }
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    fn ensure_capacity(&mut self, additional: usize) -> CoreResult<()> {
        if let Some(limit) = self.limit {
            if self.len.saturating_add(additional) > limit {
                return Err(CoreError::resource_exhausted(format!(
                    "limit of {limit} entries reached"
                )));
            }
        }
        let recycled = self.free.len();
        if additional > recycled {
            self.slots.try_reserve(additional - recycled)?;
        }
        Ok(())
    }

    fn link_back(&mut self, value: T) -> Link {
        let link = match self.free.pop() {
            Some(free) => {
                let slot = &mut self.slots[free.index];
                slot.value = Some(value);
                Link::new(free.index, slot.generation)
            }
            None => {
                self.slots.push(Slot {
                    value: Some(value),
                    generation: 0,
                    prev: None,
                    next: None,
                });
                Link::new(self.slots.len() - 1, 0)
            }
        };

        match self.tail {
            None => self.head = Some(link),
            Some(tail) => {
                self.slots[tail.index].next = Some(link);
                self.slots[link.index].prev = Some(tail);
            }
        }
        self.tail = Some(link);
        self.len += 1;
        link
    }

    fn release(&mut self, link: Link) -> Option<T> {
        let slot = &mut self.slots[link.index];
        let value = slot.release();
        self.free.push(Link::new(link.index, slot.generation));
        value
    }
}

impl<T: Clone> SpliceList<T> {
    /// Deep-copies the list into fresh slots with the same order and limit.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::ResourceExhausted`] if the copy cannot be
    /// allocated. `self` is never modified.
    pub fn try_clone(&self) -> CoreResult<Self> {
        let mut clone = Self::with_limit(self.limit);
        clone.ensure_capacity(self.len)?;
        for (_, value) in self.iter() {
            clone.link_back(value.clone());
        }
        Ok(clone)
    }
}

fn is_guard(link: Link) -> bool {
    link.index == HEAD_GUARD.index || link.index == TAIL_GUARD.index
}

/// Guards linked around a non-empty list for the span of one unlink.
struct SentinelGuard<'a, T> {
    list: &'a mut SpliceList<T>,
}

impl<'a, T> SentinelGuard<'a, T> {
    fn attach(list: &'a mut SpliceList<T>, head: Link, tail: Link) -> Self {
        list.slots[head.index].prev = Some(HEAD_GUARD);
        list.slots[HEAD_GUARD.index].next = Some(head);
        list.slots[tail.index].next = Some(TAIL_GUARD);
        list.slots[TAIL_GUARD.index].prev = Some(tail);
        Self { list }
    }

    /// Relinks the neighbours of `link` to each other and returns the
    /// predecessor, which is the head guard when `link` was the head.
    fn unlink(&mut self, link: Link) -> Link {
        let slot = &mut self.list.slots[link.index];
        let (Some(prev), Some(next)) = (slot.prev.take(), slot.next.take()) else {
            unreachable!("attached guards bracket every linked entry");
        };
        self.list.slots[prev.index].next = Some(next);
        self.list.slots[next.index].prev = Some(prev);
        prev
    }

    /// Restores the real head and tail and maps a guard-valued marker back
    /// to `None`.
    fn detach(self, marker: &mut Option<Link>) {
        let list = self.list;
        list.head = list.slots[HEAD_GUARD.index].next.take();
        list.tail = list.slots[TAIL_GUARD.index].prev.take();
        if let Some(head) = list.head {
            list.slots[head.index].prev = None;
        }
        if let Some(tail) = list.tail {
            list.slots[tail.index].next = None;
        }
        if *marker == Some(HEAD_GUARD) {
            *marker = None;
        }
    }
}

/// Iterator over `(Link, &T)` pairs of a [`SpliceList`].
#[derive(Debug)]
pub struct Iter<'a, T> {
    list: &'a SpliceList<T>,
    cursor: Option<Link>,
    backward: bool,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (Link, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        let link = self.cursor?;
        let slot = &self.list.slots[link.index];
        self.cursor = if self.backward { slot.prev } else { slot.next };
        slot.value.as_ref().map(|value| (link, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list_of(values: &[u32]) -> SpliceList<u32> {
        let mut list = SpliceList::new();
        for value in values {
            list.push_back(*value).unwrap();
        }
        list
    }

    fn forward(list: &SpliceList<u32>) -> Vec<u32> {
        list.iter().map(|(_, v)| *v).collect()
    }

    fn backward(list: &SpliceList<u32>) -> Vec<u32> {
        list.iter_rev().map(|(_, v)| *v).collect()
    }

    fn assert_well_formed(list: &SpliceList<u32>) {
        let mut reversed = backward(list);
        reversed.reverse();
        assert_eq!(forward(list), reversed);
        assert_eq!(forward(list).len(), list.len());
        if let Some(head) = list.head() {
            assert_eq!(list.prev(head), None);
        }
        if let Some(tail) = list.tail() {
            assert_eq!(list.next(tail), None);
        }
    }

    #[test]
    fn new_list_is_empty() {
        let list: SpliceList<u32> = SpliceList::new();
        assert!(list.is_empty());
        assert_eq!(list.len(), 0);
        assert_eq!(list.head(), None);
        assert_eq!(list.tail(), None);
    }

    #[test]
    fn push_back_preserves_order() {
        let list = list_of(&[3, 1, 2]);
        assert_eq!(forward(&list), vec![3, 1, 2]);
        assert_eq!(backward(&list), vec![2, 1, 3]);
        assert_well_formed(&list);
    }

    #[test]
    fn remove_middle_head_and_tail() {
        let mut list = list_of(&[3, 4, 5, 6, 7, 8]);

        let middle = list.find(|v| *v == 5).unwrap();
        assert_eq!(list.remove(middle), Some(5));
        assert_eq!(forward(&list), vec![3, 4, 6, 7, 8]);
        assert_well_formed(&list);

        let head = list.head().unwrap();
        assert_eq!(list.remove(head), Some(3));
        assert_eq!(forward(&list), vec![4, 6, 7, 8]);
        assert_well_formed(&list);

        let tail = list.tail().unwrap();
        assert_eq!(list.remove(tail), Some(8));
        assert_eq!(forward(&list), vec![4, 6, 7]);
        assert_well_formed(&list);
    }

    #[test]
    fn remove_sole_entry_resets_list() {
        let mut list = list_of(&[9]);
        let only = list.head().unwrap();
        let mut marker = Some(only);

        assert_eq!(list.remove_tracking(only, &mut marker), Some(9));
        assert!(list.is_empty());
        assert_eq!(list.tail(), None);
        assert_eq!(marker, None);
    }

    #[test]
    fn marker_moves_to_predecessor() {
        let mut list = list_of(&[5, 6, 7]);
        let six = list.find(|v| *v == 6).unwrap();
        let five = list.head().unwrap();
        let mut marker = Some(six);

        list.remove_tracking(six, &mut marker);
        assert_eq!(marker, Some(five));
    }

    #[test]
    fn marker_on_removed_head_becomes_none() {
        let mut list = list_of(&[5, 6, 7]);
        let head = list.head().unwrap();
        let mut marker = Some(head);

        list.remove_tracking(head, &mut marker);
        assert_eq!(marker, None);
        assert_eq!(forward(&list), vec![6, 7]);
    }

    #[test]
    fn marker_elsewhere_is_untouched() {
        let mut list = list_of(&[5, 6, 7]);
        let six = list.find(|v| *v == 6).unwrap();
        let seven = list.tail().unwrap();
        let mut marker = Some(seven);

        list.remove_tracking(six, &mut marker);
        assert_eq!(marker, Some(seven));
        assert_eq!(list.get(seven), Some(&7));
    }

    #[test]
    fn removing_stale_link_is_noop() {
        let mut list = list_of(&[1, 2]);
        let head = list.head().unwrap();
        list.remove(head);
        assert_eq!(list.remove(head), None);
        assert_eq!(list.remove(HEAD_GUARD), None);
        assert_eq!(forward(&list), vec![2]);
    }

    #[test]
    fn released_slots_are_recycled() {
        let mut list = list_of(&[1, 2, 3]);
        let two = list.find(|v| *v == 2).unwrap();
        list.remove(two);
        let four = list.push_back(4).unwrap();
        assert_eq!(four.index(), two.index());
        assert_ne!(four, two);
        assert_eq!(forward(&list), vec![1, 3, 4]);
        assert_well_formed(&list);
    }

    #[test]
    fn stale_link_does_not_reach_recycled_slot() {
        let mut list = list_of(&[1, 2, 3]);
        let two = list.find(|v| *v == 2).unwrap();
        list.remove(two);
        list.push_back(4).unwrap();

        assert_eq!(list.get(two), None);
        assert!(!list.contains(two));
        assert_eq!(list.next(two), None);
        assert_eq!(list.remove(two), None);
        assert_eq!(forward(&list), vec![1, 3, 4]);
    }

    #[test]
    fn clear_invalidates_links() {
        let mut list = list_of(&[1, 2]);
        let head = list.head().unwrap();
        list.clear();
        let fresh = list.push_back(7).unwrap();

        assert_eq!(list.get(head), None);
        assert_eq!(list.get(fresh), Some(&7));
    }

    #[test]
    fn limit_rejects_growth() {
        let mut list = SpliceList::with_limit(Some(2));
        list.push_back(1u32).unwrap();
        list.push_back(2).unwrap();
        let err = list.push_back(3).unwrap_err();
        assert!(err.is_resource_exhausted());
        assert_eq!(forward(&list), vec![1, 2]);
    }

    #[test]
    fn try_clone_is_independent() {
        let source = list_of(&[1, 2, 3]);
        let mut clone = source.try_clone().unwrap();
        let head = clone.head().unwrap();
        clone.remove(head);

        assert_eq!(forward(&source), vec![1, 2, 3]);
        assert_eq!(forward(&clone), vec![2, 3]);
    }

    #[test]
    fn append_moves_entries_in_order() {
        let mut list = list_of(&[1, 2]);
        list.append(list_of(&[3, 4])).unwrap();
        assert_eq!(forward(&list), vec![1, 2, 3, 4]);
        assert_well_formed(&list);

        let mut empty = SpliceList::new();
        empty.append(list_of(&[7])).unwrap();
        assert_eq!(forward(&empty), vec![7]);
    }

    #[test]
    fn append_over_limit_changes_nothing() {
        let mut list = SpliceList::with_limit(Some(3));
        list.push_back(1u32).unwrap();
        list.push_back(2).unwrap();
        assert!(list.append(list_of(&[3, 4])).is_err());
        assert_eq!(forward(&list), vec![1, 2]);
    }

    #[test]
    fn iter_from_starts_at_link() {
        let list = list_of(&[1, 2, 3]);
        let two = list.find(|v| *v == 2).unwrap();
        let rest: Vec<u32> = list.iter_from(Some(two)).map(|(_, v)| *v).collect();
        assert_eq!(rest, vec![2, 3]);
        assert_eq!(list.iter_from(None).count(), 0);
    }

    #[test]
    fn clear_empties_list() {
        let mut list = list_of(&[1, 2, 3]);
        list.clear();
        assert!(list.is_empty());
        list.push_back(5).unwrap();
        assert_eq!(forward(&list), vec![5]);
    }
}
