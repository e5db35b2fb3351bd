/*!
A bounded, open-addressed LRU table.

The table maps short byte-string keys to `u32` counts. Capacity is fixed at
construction: there is no rehashing, and a full table refuses new keys rather
than evicting. Collisions are resolved by linear probing, and removals leave
tombstones behind so probe chains stay intact.

The recency order is a doubly-linked list threaded through the slot array
itself. Links are slot indices rather than pointers, with two sentinel
elements appended past the data slots, so linking and unlinking is plain
index arithmetic and no slot ever self-references.

A slot is in exactly one of three states:

- *free*: both links unset, `erased` clear, key empty
- *live*: both links set to a valid neighbor in the recency list
- *tombstone*: both links unset, `erased` set

"Occupied" is derived from the links alone; the `erased` flag exists only so
a probe can tell "keep walking" tombstones apart from "chain over" free
slots.
*/

use std::hash::Hasher;

use rustc_hash::FxHasher;

/// Marker for an unset link.
const NONE: u32 = u32::MAX;

#[derive(Debug, Clone)]
struct Slot {
    // towards the least recently touched entry
    next: u32,
    // towards the most recently touched entry
    prev: u32,
    value: u32,
    key: Vec<u8>,
    erased: bool,
}

impl Slot {
    fn unlinked() -> Self {
        Slot {
            next: NONE,
            prev: NONE,
            value: 0,
            key: Vec::new(),
            erased: false,
        }
    }
}

/**
A fixed-capacity table from byte-string keys to `u32` counts with an
embedded least-recently-used order.

`insert` and a found `get` both count as a touch and move the entry to the
front of the recency list; [`get_first`](LruTable::get_first) and
[`get_last`](LruTable::get_last) are pure observers.
*/
pub struct LruTable {
    // `capacity + 2` elements: the data slots, then the head and tail
    // sentinels at `capacity` and `capacity + 1`
    slots: Vec<Slot>,
    capacity: usize,
}

impl LruTable {
    /**
    Create a table with room for `capacity` entries.

    The slot array lives on the heap so a large capacity can't exhaust the
    stack.

    # Panics

    Panics if `capacity` is zero or too large to index with `u32` links.
    */
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "capacity must be non-zero");
        assert!(
            capacity < (NONE as usize) - 1,
            "capacity must be indexable by u32 links"
        );

        let mut slots = vec![Slot::unlinked(); capacity + 2];

        // an empty list: the sentinels point at each other
        slots[capacity].next = capacity as u32 + 1;
        slots[capacity + 1].prev = capacity as u32;

        LruTable { slots, capacity }
    }

    /**
    The initial probe index for `key`.

    Deterministic and stable across runs; exposed for diagnostic use.
    */
    pub fn hash(&self, key: &[u8]) -> u32 {
        let mut hasher = FxHasher::default();
        hasher.write(key);
        (hasher.finish() % self.capacity as u64) as u32
    }

    /**
    Insert `key` with `value`, or overwrite the value of an existing entry.

    Either way the entry becomes the most recently touched. Returns `false`
    when the key is absent and every slot holds a live entry.
    */
    pub fn insert(&mut self, key: &[u8], value: u32) -> bool {
        let start = self.hash(key);
        let mut index = start;

        // the first tombstone or free slot seen on the way; claimed only
        // once the probe proves the key is absent, so a removed-then-probed
        // duplicate further down the chain can't end up live twice
        let mut reclaim = NONE;

        loop {
            if self.is_occupied(index) {
                if self.slots[index as usize].key == key {
                    let slot = &mut self.slots[index as usize];
                    slot.value = value;
                    slot.erased = false;

                    self.unlink(index);
                    self.link_front(index);

                    return true;
                }
            } else {
                if reclaim == NONE {
                    reclaim = index;
                }

                if !self.slots[index as usize].erased {
                    // a free slot terminates the chain: the key is absent
                    break;
                }
            }

            index = (index + 1) % self.capacity as u32;
            if index == start {
                break;
            }
        }

        if reclaim == NONE {
            // every probed slot is live with some other key
            return false;
        }

        let slot = &mut self.slots[reclaim as usize];
        slot.key.clear();
        slot.key.extend_from_slice(key);
        slot.value = value;
        slot.erased = false;

        self.link_front(reclaim);

        true
    }

    /**
    Look up `key`, touching the entry on a hit.

    Takes `&mut self` because a hit moves the entry to the front of the
    recency list.
    */
    pub fn get(&mut self, key: &[u8]) -> Option<u32> {
        let index = self.find(key)?;

        self.unlink(index);
        self.link_front(index);

        Some(self.slots[index as usize].value)
    }

    /**
    Remove `key`, leaving a tombstone so probe chains through this slot
    keep working. Returns `false` if the key is absent.
    */
    pub fn remove(&mut self, key: &[u8]) -> bool {
        let index = match self.find(key) {
            Some(index) => index,
            None => return false,
        };

        self.unlink(index);

        let slot = &mut self.slots[index as usize];
        slot.erased = true;
        slot.key.clear();
        slot.value = 0;

        true
    }

    /**
    The least recently touched entry. Does not touch.
    */
    pub fn get_first(&self) -> Option<(&[u8], u32)> {
        let index = self.slots[self.tail() as usize].prev;
        if index == self.head() {
            return None;
        }

        let slot = &self.slots[index as usize];
        Some((slot.key.as_slice(), slot.value))
    }

    /**
    The most recently touched entry. Does not touch.
    */
    pub fn get_last(&self) -> Option<(&[u8], u32)> {
        let index = self.slots[self.head() as usize].next;
        if index == self.tail() {
            return None;
        }

        let slot = &self.slots[index as usize];
        Some((slot.key.as_slice(), slot.value))
    }

    fn head(&self) -> u32 {
        self.capacity as u32
    }

    fn tail(&self) -> u32 {
        self.capacity as u32 + 1
    }

    // occupied means linked into the recency list; tombstones and free
    // slots both look unoccupied here
    fn is_occupied(&self, index: u32) -> bool {
        let slot = &self.slots[index as usize];
        slot.next != NONE && slot.prev != NONE
    }

    fn find(&self, key: &[u8]) -> Option<u32> {
        let start = self.hash(key);
        let mut index = start;

        loop {
            if self.is_occupied(index) {
                if self.slots[index as usize].key == key {
                    return Some(index);
                }
            } else if !self.slots[index as usize].erased {
                // a free, never-erased slot ends the probe chain
                return None;
            }

            index = (index + 1) % self.capacity as u32;
            if index == start {
                return None;
            }
        }
    }

    // no-op on slots that aren't linked
    fn unlink(&mut self, index: u32) {
        if !self.is_occupied(index) {
            return;
        }

        let prev = self.slots[index as usize].prev;
        let next = self.slots[index as usize].next;

        self.slots[prev as usize].next = next;
        self.slots[next as usize].prev = prev;

        let slot = &mut self.slots[index as usize];
        slot.next = NONE;
        slot.prev = NONE;

        test_assert!(!self.is_occupied(index));
    }

    // insert between the head sentinel and the previous front entry
    fn link_front(&mut self, index: u32) {
        let head = self.head();
        let front = self.slots[head as usize].next;

        self.slots[head as usize].next = index;
        self.slots[index as usize].next = front;

        self.slots[front as usize].prev = index;
        self.slots[index as usize].prev = head;

        test_assert_eq!(self.slots[self.head() as usize].next, index);
    }

    /**
    Audit every structural invariant of the table. Test-only.

    Panics if any slot is in a mixed state, if the recency list is not a
    well-formed cycle over exactly the live slots, or if live + tombstone
    counts exceed the capacity.
    */
    #[cfg(test)]
    pub(crate) fn audit(&self) {
        let mut live = 0;
        let mut tombstones = 0;

        for index in 0..self.capacity {
            let slot = &self.slots[index];

            let linked = slot.next != NONE && slot.prev != NONE;
            let half_linked = (slot.next != NONE) ^ (slot.prev != NONE);
            assert!(!half_linked, "slot {} has exactly one link set", index);

            if linked {
                assert!(!slot.erased, "slot {} is both live and erased", index);
                assert_eq!(
                    self.slots[slot.prev as usize].next, index as u32,
                    "slot {} prev link is stale",
                    index
                );
                assert_eq!(
                    self.slots[slot.next as usize].prev, index as u32,
                    "slot {} next link is stale",
                    index
                );
                live += 1;
            } else if slot.erased {
                assert!(slot.key.is_empty(), "tombstone {} retains key bytes", index);
                tombstones += 1;
            } else {
                assert!(slot.key.is_empty(), "free slot {} retains key bytes", index);
            }
        }

        assert!(live + tombstones <= self.capacity);

        // the forward walk must visit every live slot exactly once
        let mut visited = 0;
        let mut index = self.slots[self.head() as usize].next;
        while index != self.tail() {
            assert!(
                (index as usize) < self.capacity,
                "list escaped the slot array"
            );
            visited += 1;
            assert!(visited <= live, "recency list cycles");
            index = self.slots[index as usize].next;
        }
        assert_eq!(visited, live, "recency list misses live slots");
    }
}
