use std::collections::HashMap;

use crate::library::Track;

use super::id::TrackId;

#[derive(Debug)]
struct Node {
    track: Track,
    prev: Option<TrackId>,
    next: Option<TrackId>,
}

/// Doubly linked, insertion-ordered list of tracks with a single cursor.
///
/// The cursor is `None` exactly when the playlist is empty.
#[derive(Debug, Default)]
pub struct Playlist {
    nodes: HashMap<TrackId, Node>,
    head: Option<TrackId>,
    tail: Option<TrackId>,
    cursor: Option<TrackId>,
    next_id: u64,
}

impl Playlist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn head(&self) -> Option<TrackId> {
        self.head
    }

    pub fn tail(&self) -> Option<TrackId> {
        self.tail
    }

    /// Id under the cursor.
    pub fn current(&self) -> Option<TrackId> {
        self.cursor
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.cursor.and_then(|id| self.get(id))
    }

    pub fn get(&self, id: TrackId) -> Option<&Track> {
        self.nodes.get(&id).map(|n| &n.track)
    }

    pub fn contains(&self, id: TrackId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Append `track` at the tail. The first track added also becomes the cursor.
    ///
    /// O(1) in release builds; debug builds also run [`Playlist::check_links`],
    /// which walks the whole list.
    pub fn add(&mut self, track: Track) -> TrackId {
        let id = TrackId::new(self.next_id);
        self.next_id += 1;

        match self.tail {
            Some(tail) => self.node_mut(tail).next = Some(id),
            None => {
                self.head = Some(id);
                self.cursor = Some(id);
            }
        }
        self.nodes.insert(
            id,
            Node {
                track,
                prev: self.tail,
                next: None,
            },
        );
        self.tail = Some(id);

        self.debug_check();
        id
    }

    /// Unlink the entry `id` and return its track.
    ///
    /// When the cursor pointed at the removed entry it moves to the successor,
    /// else the predecessor, else nowhere. Returns `None` if `id` is absent.
    pub fn delete(&mut self, id: TrackId) -> Option<Track> {
        let node = self.nodes.remove(&id)?;

        match node.prev {
            Some(prev) => self.node_mut(prev).next = node.next,
            None => self.head = node.next,
        }
        match node.next {
            Some(next) => self.node_mut(next).prev = node.prev,
            None => self.tail = node.prev,
        }
        if self.cursor == Some(id) {
            self.cursor = node.next.or(node.prev);
        }

        self.debug_check();
        Some(node.track)
    }

    /// Move the cursor one step towards the tail.
    ///
    /// Returns the new cursor, or `None` (cursor unchanged) when the playlist
    /// is empty or the cursor is already at the tail.
    pub fn advance(&mut self) -> Option<TrackId> {
        let next = self.cursor.and_then(|c| self.node(c).next)?;
        self.cursor = Some(next);
        Some(next)
    }

    /// Move the cursor one step towards the head. See [`Playlist::advance`].
    pub fn retreat(&mut self) -> Option<TrackId> {
        let prev = self.cursor.and_then(|c| self.node(c).prev)?;
        self.cursor = Some(prev);
        Some(prev)
    }

    /// Put the cursor on `id`. Returns `false` (cursor unchanged) if absent.
    pub fn select(&mut self, id: TrackId) -> bool {
        if !self.nodes.contains_key(&id) {
            return false;
        }
        self.cursor = Some(id);
        true
    }

    /// First entry, scanning from the head, whose display name is `name`.
    pub fn find_by_name(&self, name: &str) -> Option<TrackId> {
        self.iter().find(|(_, t)| t.name == name).map(|(id, _)| id)
    }

    /// Iterate from head to tail. Never touches the cursor.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            playlist: self,
            next: self.head,
        }
    }

    /// Walk the whole list and panic if links, endpoints or the cursor disagree.
    ///
    /// A broken list cannot be repaired safely, so this never tries.
    pub fn check_links(&self) {
        let mut count = 0usize;
        let mut prev: Option<TrackId> = None;
        let mut cur = self.head;

        while let Some(id) = cur {
            let node = self
                .nodes
                .get(&id)
                .unwrap_or_else(|| panic!("playlist corrupted: {id} is linked but not stored"));
            assert_eq!(
                node.prev, prev,
                "playlist corrupted: {id} has prev {:?}, expected {:?}",
                node.prev, prev
            );
            count += 1;
            assert!(
                count <= self.nodes.len(),
                "playlist corrupted: cycle detected at {id}"
            );
            prev = Some(id);
            cur = node.next;
        }

        assert_eq!(self.tail, prev, "playlist corrupted: tail does not end the chain");
        assert_eq!(
            count,
            self.nodes.len(),
            "playlist corrupted: {} stored entries unreachable from head",
            self.nodes.len() - count
        );
        match self.cursor {
            Some(c) => assert!(
                self.nodes.contains_key(&c),
                "playlist corrupted: cursor {c} is not in the list"
            ),
            None => assert!(
                self.nodes.is_empty(),
                "playlist corrupted: cursor is empty on a non-empty list"
            ),
        }
    }

    /// Full link check after a mutation, debug builds only. O(n).
    fn debug_check(&self) {
        if cfg!(debug_assertions) {
            self.check_links();
        }
    }

    fn node(&self, id: TrackId) -> &Node {
        self.nodes
            .get(&id)
            .unwrap_or_else(|| panic!("playlist corrupted: dangling link to {id}"))
    }

    fn node_mut(&mut self, id: TrackId) -> &mut Node {
        self.nodes
            .get_mut(&id)
            .unwrap_or_else(|| panic!("playlist corrupted: dangling link to {id}"))
    }
}

/// Head-to-tail iterator over `(TrackId, &Track)`.
pub struct Iter<'a> {
    playlist: &'a Playlist,
    next: Option<TrackId>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (TrackId, &'a Track);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        let node = self.playlist.node(id);
        self.next = node.next;
        Some((id, &node.track))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.next.is_none() {
            (0, Some(0))
        } else {
            (1, Some(self.playlist.len()))
        }
    }
}

impl<'a> IntoIterator for &'a Playlist {
    type Item = (TrackId, &'a Track);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three() -> (Playlist, Vec<TrackId>) {
        let mut p = Playlist::new();
        let ids = ["a.mp3", "b.mp3", "c.mp3"]
            .iter()
            .map(|n| p.add(Track::from_path(format!("/music/{n}"))))
            .collect();
        (p, ids)
    }

    #[test]
    fn healthy_list_passes_the_link_check() {
        let (mut p, ids) = three();
        p.check_links();
        p.delete(ids[1]);
        p.check_links();
    }

    #[test]
    #[should_panic(expected = "playlist corrupted")]
    fn broken_prev_link_panics() {
        let (mut p, ids) = three();
        p.nodes.get_mut(&ids[2]).unwrap().prev = Some(ids[0]);
        p.check_links();
    }

    #[test]
    #[should_panic(expected = "playlist corrupted")]
    fn cursor_outside_the_list_panics() {
        let (mut p, _) = three();
        p.cursor = Some(TrackId::new(99));
        p.check_links();
    }

    #[test]
    #[should_panic(expected = "playlist corrupted")]
    fn unreachable_entry_panics() {
        let (mut p, ids) = three();
        p.nodes.get_mut(&ids[0]).unwrap().next = None;
        p.tail = Some(ids[0]);
        p.check_links();
    }

    #[test]
    #[should_panic(expected = "playlist corrupted")]
    fn dangling_next_link_panics_on_iteration() {
        let (mut p, ids) = three();
        p.nodes.get_mut(&ids[1]).unwrap().next = Some(TrackId::new(99));
        let _ = p.iter().count();
    }
}
