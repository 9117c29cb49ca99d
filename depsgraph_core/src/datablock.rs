// Copyright 2026 the Depsgraph Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The database of original data-blocks.
//!
//! [`Main`] owns every user-editable data-block. Graphs never own original
//! data; they reference it through [`IdRef`] handles and look it up here.
//! Removed slots are recycled via a free list, and generation counters make
//! stale handles detectable.

use alloc::string::String;
use alloc::vec::Vec;

use crate::config::DebugFlags;
use crate::id::{IdRef, IdType, MainId, ObjectType};
use crate::recalc::RecalcFlags;

/// One original data-block.
#[derive(Clone, Debug)]
pub struct DataBlock {
    pub(crate) name: String,
    pub(crate) id_type: IdType,
    pub(crate) object_type: Option<ObjectType>,
    pub(crate) data: Option<IdRef>,
    pub(crate) shape_key: Option<IdRef>,
    pub(crate) node_tree: Option<IdRef>,
    pub(crate) has_animation: bool,
    pub(crate) recalc: RecalcFlags,
    pub(crate) recalc_after_undo_push: RecalcFlags,
}

impl DataBlock {
    fn new(id_type: IdType, name: &str, object_type: Option<ObjectType>) -> Self {
        let mut full = String::with_capacity(name.len() + 2);
        full.push_str(id_type.code());
        full.push_str(name);
        Self {
            name: full,
            id_type,
            object_type,
            data: None,
            shape_key: None,
            node_tree: None,
            has_animation: false,
            recalc: RecalcFlags::NONE,
            recalc_after_undo_push: RecalcFlags::NONE,
        }
    }

    /// Returns the full name, prefixed with the two-letter type code
    /// (e.g. `OBCube`).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the data-block type.
    #[must_use]
    pub fn id_type(&self) -> IdType {
        self.id_type
    }

    /// Returns the object sub-type, or `None` for non-object data-blocks.
    #[must_use]
    pub fn object_type(&self) -> Option<ObjectType> {
        self.object_type
    }

    /// Returns the object's data link (mesh, curve, ...).
    #[must_use]
    pub fn data(&self) -> Option<IdRef> {
        self.data
    }

    /// Returns the shape key link.
    #[must_use]
    pub fn shape_key(&self) -> Option<IdRef> {
        self.shape_key
    }

    /// Returns the recalc flags accumulated on the original data-block.
    #[must_use]
    pub fn recalc(&self) -> RecalcFlags {
        self.recalc
    }

    /// Returns the recalc flags accumulated since the last undo push.
    #[must_use]
    pub fn recalc_after_undo_push(&self) -> RecalcFlags {
        self.recalc_after_undo_push
    }
}

/// Database of original data-blocks.
///
/// Data-blocks are addressed by [`IdRef`] handles. Accessors that take a
/// handle panic on stale handles, except [`get`](Self::get) and
/// [`is_alive`](Self::is_alive), which the tagging API uses to turn stale
/// handles into silent no-ops.
#[derive(Debug)]
pub struct Main {
    pub(crate) id: MainId,
    pub(crate) blocks: Vec<Option<DataBlock>>,
    pub(crate) generation: Vec<u32>,
    pub(crate) free_list: Vec<u32>,
    pub(crate) debug: DebugFlags,
}

impl Default for Main {
    fn default() -> Self {
        Self::new()
    }
}

impl Main {
    /// Creates an empty database with a fresh [`MainId`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: MainId::next(),
            blocks: Vec::new(),
            generation: Vec::new(),
            free_list: Vec::new(),
            debug: DebugFlags::NONE,
        }
    }

    /// Returns this database's identity.
    #[inline]
    #[must_use]
    pub fn id(&self) -> MainId {
        self.id
    }

    /// Returns the debug flags used for graph-less tagging.
    #[must_use]
    pub fn debug_flags(&self) -> DebugFlags {
        self.debug
    }

    /// Sets the debug flags used for graph-less tagging.
    pub fn set_debug_flags(&mut self, debug: DebugFlags) {
        self.debug = debug;
    }

    // -- Allocation API --

    /// Adds a data-block of the given type and returns its handle.
    ///
    /// Use [`add_object`](Self::add_object) for objects.
    ///
    /// # Panics
    ///
    /// Panics if `id_type` is [`IdType::Object`].
    pub fn add(&mut self, id_type: IdType, name: &str) -> IdRef {
        assert!(
            id_type != IdType::Object,
            "objects need a sub-type, use add_object"
        );
        self.insert(DataBlock::new(id_type, name, None))
    }

    /// Adds an object of the given sub-type and returns its handle.
    pub fn add_object(&mut self, object_type: ObjectType, name: &str) -> IdRef {
        self.insert(DataBlock::new(IdType::Object, name, Some(object_type)))
    }

    fn insert(&mut self, block: DataBlock) -> IdRef {
        let idx = if let Some(idx) = self.free_list.pop() {
            self.blocks[idx as usize] = Some(block);
            idx
        } else {
            let idx = u32::try_from(self.blocks.len()).unwrap_or(u32::MAX);
            assert!(idx != u32::MAX, "data-block slots exhausted");
            self.blocks.push(Some(block));
            self.generation.push(0);
            idx
        };
        IdRef {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    /// Removes a data-block, freeing its slot for reuse.
    ///
    /// Links from other data-blocks are left in place and become stale.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn remove(&mut self, id: IdRef) {
        self.validate(id);
        self.blocks[id.idx as usize] = None;
        self.generation[id.idx as usize] += 1;
        self.free_list.push(id.idx);
    }

    /// Returns whether the given handle refers to a live data-block.
    #[must_use]
    pub fn is_alive(&self, id: IdRef) -> bool {
        (id.idx as usize) < self.blocks.len()
            && self.generation[id.idx as usize] == id.generation
            && self.blocks[id.idx as usize].is_some()
    }

    /// Returns the data-block, or `None` for stale handles.
    #[must_use]
    pub fn get(&self, id: IdRef) -> Option<&DataBlock> {
        if !self.is_alive(id) {
            return None;
        }
        self.blocks[id.idx as usize].as_ref()
    }

    /// Returns the data-block.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn block(&self, id: IdRef) -> &DataBlock {
        self.validate(id);
        match &self.blocks[id.idx as usize] {
            Some(block) => block,
            None => unreachable!("validated slot is occupied"),
        }
    }

    fn block_mut(&mut self, id: IdRef) -> &mut DataBlock {
        self.validate(id);
        match &mut self.blocks[id.idx as usize] {
            Some(block) => block,
            None => unreachable!("validated slot is occupied"),
        }
    }

    /// Iterates over the handles of all live data-blocks, in slot order.
    pub fn ids(&self) -> impl Iterator<Item = IdRef> + '_ {
        self.blocks
            .iter()
            .zip(&self.generation)
            .enumerate()
            .filter(|(_, (block, _))| block.is_some())
            .map(|(idx, (_, &generation))| {
                #[expect(
                    clippy::cast_possible_truncation,
                    reason = "slot count is bounded by u32 in insert"
                )]
                let idx = idx as u32;
                IdRef { idx, generation }
            })
    }

    // -- Links --

    /// Sets the data link of an object.
    ///
    /// # Panics
    ///
    /// Panics if `object` is not an object, `data` is itself an object, or
    /// either handle is stale.
    pub fn set_object_data(&mut self, object: IdRef, data: Option<IdRef>) {
        if let Some(data) = data {
            assert!(
                self.block(data).id_type != IdType::Object,
                "object data cannot be another object"
            );
        }
        let block = self.block_mut(object);
        assert!(
            block.id_type == IdType::Object,
            "data links belong to objects, got {:?}",
            block.id_type
        );
        block.data = data;
    }

    /// Sets the shape key of a mesh, lattice or legacy curve.
    ///
    /// # Panics
    ///
    /// Panics if `owner` cannot carry a shape key, `key` is not a shape key,
    /// or either handle is stale.
    pub fn set_shape_key(&mut self, owner: IdRef, key: Option<IdRef>) {
        if let Some(key) = key {
            assert!(
                self.block(key).id_type == IdType::Key,
                "shape key link must point at a shape key"
            );
        }
        let block = self.block_mut(owner);
        assert!(
            block.id_type.can_have_shape_key(),
            "{:?} cannot carry a shape key",
            block.id_type
        );
        block.shape_key = key;
    }

    /// Sets the embedded node tree of a material, texture, light, world,
    /// scene or simulation.
    ///
    /// # Panics
    ///
    /// Panics if `owner` cannot embed a node tree, `tree` is not a node tree,
    /// or either handle is stale.
    pub fn set_node_tree(&mut self, owner: IdRef, tree: Option<IdRef>) {
        if let Some(tree) = tree {
            assert!(
                self.block(tree).id_type == IdType::NodeTree,
                "embedded tree link must point at a node tree"
            );
        }
        let block = self.block_mut(owner);
        assert!(
            block.id_type.can_embed_node_tree(),
            "{:?} cannot embed a node tree",
            block.id_type
        );
        block.node_tree = tree;
    }

    /// Sets whether the data-block carries animation data.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn set_animation_data(&mut self, id: IdRef, has_animation: bool) {
        self.block_mut(id).has_animation = has_animation;
    }

    // -- Queries used by the propagator --

    /// Returns the node tree embedded in `id`, if any and still alive.
    #[must_use]
    pub fn ntree_from_id(&self, id: IdRef) -> Option<IdRef> {
        self.get(id)?.node_tree.filter(|&tree| self.is_alive(tree))
    }

    /// Returns whether `id` carries animation data.
    #[must_use]
    pub fn has_animation_data(&self, id: IdRef) -> bool {
        self.get(id).is_some_and(|block| block.has_animation)
    }

    /// Returns the recalc flags of `id`, or the empty set for stale handles.
    #[must_use]
    pub fn recalc(&self, id: IdRef) -> RecalcFlags {
        self.get(id).map_or(RecalcFlags::NONE, |block| block.recalc)
    }

    /// Returns the undo-push accumulator of `id`, or the empty set for stale
    /// handles.
    #[must_use]
    pub fn recalc_after_undo_push(&self, id: IdRef) -> RecalcFlags {
        self.get(id)
            .map_or(RecalcFlags::NONE, |block| block.recalc_after_undo_push)
    }

    /// Resets the undo-push accumulator of every data-block.
    ///
    /// Called by the undo system once a step has been pushed.
    pub fn clear_recalc_after_undo_push(&mut self) {
        for block in self.blocks.iter_mut().flatten() {
            block.recalc_after_undo_push = RecalcFlags::NONE;
        }
    }

    pub(crate) fn or_recalc(&mut self, id: IdRef, flags: RecalcFlags) {
        if let Some(Some(block)) = self.live_slot_mut(id) {
            block.recalc |= flags;
        }
    }

    pub(crate) fn or_recalc_after_undo_push(&mut self, id: IdRef, flags: RecalcFlags) {
        if let Some(Some(block)) = self.live_slot_mut(id) {
            block.recalc_after_undo_push |= flags;
        }
    }

    pub(crate) fn clear_recalc(&mut self, id: IdRef, flags: RecalcFlags) {
        if let Some(Some(block)) = self.live_slot_mut(id) {
            block.recalc.remove(flags);
        }
    }

    fn live_slot_mut(&mut self, id: IdRef) -> Option<&mut Option<DataBlock>> {
        if !self.is_alive(id) {
            return None;
        }
        self.blocks.get_mut(id.idx as usize)
    }

    /// Panics if the handle is stale.
    fn validate(&self, id: IdRef) {
        assert!(
            self.is_alive(id),
            "stale IdRef: {id:?} (current gen: {})",
            self.generation
                .get(id.idx as usize)
                .copied()
                .unwrap_or(u32::MAX)
        );
    }
}
