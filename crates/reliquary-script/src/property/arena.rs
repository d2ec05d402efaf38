//! Property arena: tree structure, archetype links and initialization.

use indextree::{Arena, NodeId};
use reliquary_common::{crc, FourCC, Game, INVALID_ID};

use super::{align, PropertyKind, PropertyNode, TemplateRef};
use crate::{EnumProperty, Error, PropertyFlags, PropertyNameMap, PropertyType, Result};

/// Handle to a property node in a [`PropertyArena`].
pub type PropertyId = NodeId;

/// Legacy property IDs whose names never hash to their ID.
const XFRM: u32 = FourCC::from_bytes(*b"XFRM").to_u32();
const INAM: u32 = FourCC::from_bytes(*b"INAM").to_u32();
const ACTV: u32 = FourCC::from_bytes(*b"ACTV").to_u32();

/// Owner of every property node.
///
/// Parent/child structure is kept by the arena itself. Archetype links are
/// non-owning handles: an archetype records its live clones, and destroying
/// an archetype that still has clones is refused.
#[derive(Debug, Default)]
pub struct PropertyArena {
    arena: Arena<PropertyNode>,
}

impl PropertyArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.arena.iter().filter(|n| !n.is_removed()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `id` refers to a live node of this arena.
    pub fn contains(&self, id: PropertyId) -> bool {
        self.arena.get(id).is_some_and(|n| !n.is_removed())
    }

    pub fn get(&self, id: PropertyId) -> Option<&PropertyNode> {
        self.arena
            .get(id)
            .filter(|n| !n.is_removed())
            .map(|n| n.get())
    }

    pub fn get_mut(&mut self, id: PropertyId) -> Option<&mut PropertyNode> {
        self.arena
            .get_mut(id)
            .filter(|n| !n.is_removed())
            .map(|n| n.get_mut())
    }

    /// Borrow a node.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not created by this arena.
    #[inline]
    pub fn node(&self, id: PropertyId) -> &PropertyNode {
        self.arena[id].get()
    }

    /// Mutably borrow a node.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not created by this arena.
    #[inline]
    pub fn node_mut(&mut self, id: PropertyId) -> &mut PropertyNode {
        self.arena[id].get_mut()
    }

    #[inline]
    pub fn parent(&self, id: PropertyId) -> Option<PropertyId> {
        self.arena.get(id)?.parent()
    }

    /// Children in declaration order.
    pub fn children(&self, id: PropertyId) -> impl Iterator<Item = PropertyId> + '_ {
        id.children(&self.arena)
    }

    /// `id` followed by all of its descendants, depth first.
    pub fn descendants(&self, id: PropertyId) -> impl Iterator<Item = PropertyId> + '_ {
        id.descendants(&self.arena)
    }

    /// `id` followed by its parent chain up to the root.
    pub fn ancestors(&self, id: PropertyId) -> impl Iterator<Item = PropertyId> + '_ {
        id.ancestors(&self.arena)
    }

    pub fn child_count(&self, id: PropertyId) -> usize {
        self.children(id).count()
    }

    /// Whether the node has no parent.
    #[inline]
    pub fn is_root_parent(&self, id: PropertyId) -> bool {
        self.parent(id).is_none()
    }

    /// Topmost ancestor of the node (the node itself for roots).
    pub fn root_parent(&self, id: PropertyId) -> PropertyId {
        self.ancestors(id).last().unwrap_or(id)
    }

    /// End of the archetype chain (the node itself if it has no archetype).
    pub fn root_archetype(&self, id: PropertyId) -> PropertyId {
        let mut current = id;
        while let Some(archetype) = self.node(current).archetype {
            current = archetype;
        }
        current
    }

    /// All clones of the node, recursively through clones of clones.
    pub fn gather_all_sub_instances(&self, id: PropertyId, include_self: bool) -> Vec<PropertyId> {
        let mut out = Vec::new();
        if include_self {
            out.push(id);
        }

        let mut pending = self.node(id).sub_instances.clone();
        while let Some(next) = pending.pop() {
            out.push(next);
            pending.extend_from_slice(&self.node(next).sub_instances);
        }
        out
    }

    /// First direct child with the given property ID.
    pub fn child_by_id(&self, id: PropertyId, child_id: u32) -> Option<PropertyId> {
        self.children(id).find(|&c| self.node(c).id == child_id)
    }

    /// Item archetype of an array property.
    pub fn item_archetype(&self, array: PropertyId) -> Option<PropertyId> {
        match self.node(array).kind {
            PropertyKind::Array => self.children(array).next(),
            _ => None,
        }
    }

    /// Create a detached property with no parent.
    pub fn create(&mut self, ty: PropertyType, game: Game) -> PropertyId {
        self.arena.new_node(PropertyNode::new(ty, game))
    }

    /// Create a property and append it to `parent`.
    ///
    /// Children of arrays are item archetypes and are flagged as such.
    pub fn create_child(&mut self, parent: PropertyId, ty: PropertyType) -> PropertyId {
        let game = self.node(parent).game;
        let is_array = matches!(self.node(parent).kind, PropertyKind::Array);
        let child = self.create(ty, game);

        if is_array {
            self.node_mut(child).flags |= PropertyFlags::ARRAY_ARCHETYPE;
        }

        parent.append(child, &mut self.arena);
        child
    }

    /// Clone `archetype` into a new property, appended to `parent` if given.
    ///
    /// Aggregate children are cloned recursively, and the clone is recorded
    /// in the archetype's sub-instances.
    pub fn create_copy(&mut self, archetype: PropertyId, parent: Option<PropertyId>) -> PropertyId {
        let ty = self.node(archetype).property_type();
        let game = self.node(archetype).game;

        let copy = match parent {
            Some(parent) => self.create_child(parent, ty),
            None => self.create(ty, game),
        };

        self.init_from_archetype(copy, archetype);
        copy
    }

    /// Copy the inheritable fields of `archetype` onto an existing property
    /// and link the two.
    ///
    /// The property keeps its own ID unless it is still the sentinel.
    pub fn init_from_archetype(&mut self, id: PropertyId, archetype: PropertyId) {
        let source = self.node(archetype).clone();

        if let Some(previous) = self.node(id).archetype {
            if previous != archetype && self.contains(previous) {
                self.node_mut(previous).sub_instances.retain(|&s| s != id);
            }
        }

        let node = self.node_mut(id);
        node.archetype = Some(archetype);
        node.flags = (node.flags - PropertyFlags::ARCHETYPE_COPY - PropertyFlags::HAS_CACHED_NAME_CHECK)
            | (source.flags & PropertyFlags::ARCHETYPE_COPY);
        node.name = source.name;
        node.description = source.description;
        node.suffix = source.suffix;
        node.cook_preference = source.cook_preference;
        node.min_version = source.min_version;
        node.max_version = source.max_version;
        node.default_value = source.default_value;
        node.kind.copy_from(&source.kind);

        if node.id == INVALID_ID {
            node.id = source.id;
        }

        let instances = &mut self.node_mut(archetype).sub_instances;
        if !instances.contains(&id) {
            instances.push(id);
        }

        let aggregate = matches!(
            source.kind,
            PropertyKind::Struct | PropertyKind::Pointer | PropertyKind::Array
        );
        if aggregate && self.child_count(id) == 0 {
            let children: Vec<PropertyId> = self
                .children(archetype)
                .filter(|&c| !self.node(c).is_intrinsic())
                .collect();

            for child in children {
                self.create_copy(child, Some(id));
            }
        }
    }

    /// Create an intrinsic property under `parent` and initialize it at
    /// `offset`.
    pub fn create_intrinsic(
        &mut self,
        ty: PropertyType,
        parent: PropertyId,
        offset: u32,
        name: &str,
    ) -> Result<PropertyId> {
        let child = self.create_child(parent, ty);
        let node = self.node_mut(child);
        node.flags |= PropertyFlags::INTRINSIC;
        node.set_name(name);

        self.initialize_node(child, None, offset, None)?;
        Ok(child)
    }

    /// Create a detached intrinsic property and initialize it at `offset`.
    pub fn create_intrinsic_root(
        &mut self,
        ty: PropertyType,
        game: Game,
        offset: u32,
        name: &str,
    ) -> Result<PropertyId> {
        let id = self.create(ty, game);
        let node = self.node_mut(id);
        node.flags |= PropertyFlags::INTRINSIC;
        node.set_name(name);

        self.initialize_node(id, None, offset, None)?;
        Ok(id)
    }

    /// Initialize a property tree rooted at `id`.
    ///
    /// Assigns offsets, resolves ID-based names through `names`, inherits
    /// parent flags, spawns intrinsic children and recurses into children
    /// in declaration order. A property can only be initialized once.
    pub fn initialize(
        &mut self,
        id: PropertyId,
        template: Option<&TemplateRef>,
        offset: u32,
        names: &mut PropertyNameMap,
    ) -> Result<()> {
        self.initialize_node(id, template, offset, Some(names))
    }

    fn initialize_node(
        &mut self,
        id: PropertyId,
        template: Option<&TemplateRef>,
        offset: u32,
        mut names: Option<&mut PropertyNameMap>,
    ) -> Result<()> {
        let node = self.node_mut(id);
        if node.is_initialized() {
            return Err(Error::AlreadyInitialized {
                id: node.id,
                name: node.name.clone(),
            });
        }
        node.flags |= PropertyFlags::INITIALIZED;
        node.offset = offset;
        node.template = template.cloned();

        if self.uses_name_map(id) {
            if let Some(names) = names.as_deref_mut() {
                names.register_property(self, id)?;
            }
        }

        if let Some(parent) = self.parent(id) {
            let parent_node = self.node(parent);
            let inherited = parent_node.flags & PropertyFlags::INHERITABLE;
            let pointer_parent = if parent_node.is_pointer_type() {
                Some(parent)
            } else {
                parent_node.pointer_parent
            };

            let node = self.node_mut(id);
            node.flags |= inherited;
            node.pointer_parent = pointer_parent;
        }

        self.post_initialize(id)?;

        // Children of indirections are laid out in their own record.
        let mut child_offset = if self.node(id).is_pointer_type() { 0 } else { offset };
        let children: Vec<PropertyId> = self.children(id).collect();

        for (index, &child) in children.iter().enumerate() {
            if index > 0 {
                child_offset += self.data_size(children[index - 1]);
            }
            child_offset = align(child_offset, self.data_alignment(child));

            if !self.node(child).is_intrinsic() {
                self.initialize_node(child, template, child_offset, names.as_deref_mut())?;
            }
        }

        Ok(())
    }

    fn post_initialize(&mut self, id: PropertyId) -> Result<()> {
        let offset = self.node(id).offset;
        let components: &[&str] = match self.node(id).kind {
            PropertyKind::Vector => &["X", "Y", "Z"],
            PropertyKind::Color => &["R", "G", "B", "A"],
            _ => &[],
        };

        for (index, component) in components.iter().enumerate() {
            self.create_intrinsic(PropertyType::Float, id, offset + 4 * index as u32, component)?;
        }
        Ok(())
    }

    /// Destroy a property and its subtree.
    ///
    /// Fails without removing anything if any property in the subtree still
    /// has live sub-instances. Otherwise each property is unlinked from its
    /// archetype and unregistered from the name map, children first.
    pub fn destroy(&mut self, id: PropertyId, names: &mut PropertyNameMap) -> Result<()> {
        let subtree: Vec<PropertyId> = self.descendants(id).collect();

        if let Some(&busy) = subtree.iter().find(|&&n| !self.node(n).sub_instances.is_empty()) {
            let node = self.node(busy);
            return Err(Error::ArchetypeInUse {
                name: node.name.clone(),
                instances: node.sub_instances.len(),
            });
        }

        for &node in subtree.iter().rev() {
            self.unlink_archetype(node);
            if self.node(node).is_initialized() && self.uses_name_map(node) {
                names.unregister_property(self, node);
            }
        }

        id.remove_subtree(&mut self.arena);
        Ok(())
    }

    /// Remove a partially built, uninitialized subtree.
    pub(crate) fn discard(&mut self, id: PropertyId) {
        let subtree: Vec<PropertyId> = self.descendants(id).collect();
        for &node in subtree.iter().rev() {
            self.unlink_archetype(node);
        }
        id.remove_subtree(&mut self.arena);
    }

    fn unlink_archetype(&mut self, id: PropertyId) {
        if let Some(archetype) = self.node(id).archetype {
            if self.contains(archetype) {
                self.node_mut(archetype).sub_instances.retain(|&s| s != id);
            }
        }
    }

    /// Whether the property's name comes from the name map.
    ///
    /// True for ID-named games when the property has a real ID, is neither
    /// a root nor intrinsic, and its parent is not atomic.
    pub fn uses_name_map(&self, id: PropertyId) -> bool {
        let node = self.node(id);
        if !node.game.uses_id_names() || node.id == INVALID_ID || node.is_intrinsic() {
            return false;
        }

        match self.parent(id) {
            Some(parent) => !self.node(parent).is_atomic(),
            None => false,
        }
    }

    /// Size of the property's value in its record.
    pub fn data_size(&self, id: PropertyId) -> u32 {
        match self.node(id).property_type().fixed_size() {
            Some(size) => size,
            None => self.layout_extent(id),
        }
    }

    /// Alignment of the property's value in its record.
    pub fn data_alignment(&self, id: PropertyId) -> u32 {
        match self.node(id).property_type().fixed_alignment() {
            Some(alignment) => alignment,
            None => self
                .children(id)
                .map(|c| self.data_alignment(c))
                .max()
                .unwrap_or(1),
        }
    }

    /// Size of the separate record holding a pointer's target or one array
    /// element. For other properties this is the extent of their children.
    pub fn record_size(&self, id: PropertyId) -> u32 {
        match self.item_archetype(id) {
            Some(item) => self.data_size(item),
            None => self.layout_extent(id),
        }
    }

    /// Extent of the children laid out from offset zero.
    fn layout_extent(&self, id: PropertyId) -> u32 {
        self.children(id).fold(0, |end, child| {
            align(end, self.data_alignment(child)) + self.data_size(child)
        })
    }

    /// Type name mixed into the property ID hash.
    ///
    /// Enums and choices use their archetype's hashable name, or their own
    /// name when overriding the type name. Structs use their archetype's
    /// hashable name, and root structs their own name.
    pub fn hashable_type_name(&self, id: PropertyId) -> &str {
        let node = self.node(id);

        match &node.kind {
            PropertyKind::Enum(e) => match node.archetype {
                Some(archetype) => self.hashable_type_name(archetype),
                None if e.override_type_name() => &node.name,
                None => e.naming().default_type_name(),
            },
            PropertyKind::Struct => match node.archetype {
                Some(archetype) => self.hashable_type_name(archetype),
                None if self.is_root_parent(id) => &node.name,
                None => PropertyType::Struct.hashable_name(),
            },
            kind => kind.property_type().hashable_name(),
        }
    }

    /// Whether the property's name hashes to its ID, caching the result.
    pub fn has_accurate_name(&mut self, id: PropertyId) -> bool {
        if let Some(deferred) = self.deferred_name_check(id) {
            return deferred;
        }

        let node = self.node(id);
        if !node.flags.contains(PropertyFlags::HAS_CACHED_NAME_CHECK) {
            let accurate = crc::property_id(&node.name, self.hashable_type_name(id)) == node.id;
            let node = self.node_mut(id);
            node.flags.set(PropertyFlags::HAS_CORRECT_PROPERTY_NAME, accurate);
            node.flags |= PropertyFlags::HAS_CACHED_NAME_CHECK;
        }

        self.node(id)
            .flags
            .contains(PropertyFlags::HAS_CORRECT_PROPERTY_NAME)
    }

    /// Uncached variant of [`Self::has_accurate_name`].
    pub fn check_name(&self, id: PropertyId) -> bool {
        if let Some(deferred) = self.deferred_name_check(id) {
            return deferred;
        }

        let node = self.node(id);
        crc::property_id(&node.name, self.hashable_type_name(id)) == node.id
    }

    fn deferred_name_check(&self, id: PropertyId) -> Option<bool> {
        let node = self.node(id);
        if matches!(node.id, XFRM | INAM | ACTV) {
            return Some(true);
        }

        let parent = self.parent(id);
        let parent_atomic = parent.is_some_and(|p| self.node(p).is_atomic());

        if parent_atomic || node.is_intrinsic() {
            return Some(match parent {
                Some(parent) => self.check_name(parent),
                None => true,
            });
        }
        None
    }

    /// Template file that defines the property.
    pub fn template_file_name(&self, id: PropertyId) -> Option<&str> {
        let node = self.node(id);

        if let Some(template) = &node.template {
            return Some(&template.source_file);
        }

        if node.is_archetype() {
            let root = self.root_parent(id);
            return self.node(root).source_file.as_deref();
        }

        node.archetype.and_then(|a| self.template_file_name(a))
    }

    /// Record the file a root property archetype was loaded from.
    pub fn set_source_file(&mut self, id: PropertyId, path: &str) {
        self.node_mut(id).source_file = Some(path.into());
    }

    /// View as an enumeration. Succeeds for both `Enum` and `Choice`.
    pub fn as_enum(&self, id: PropertyId) -> Option<&EnumProperty> {
        self.get(id)?.as_enum()
    }

    /// View as an enumeration. Succeeds for both `Enum` and `Choice`.
    pub fn as_choice(&self, id: PropertyId) -> Option<&EnumProperty> {
        self.get(id)?.as_choice()
    }

    /// Whether an enumeration hashes with its own name, following the
    /// archetype.
    pub fn overrides_type_name(&self, id: PropertyId) -> bool {
        let node = self.node(id);
        match node.archetype {
            Some(archetype) => self.overrides_type_name(archetype),
            None => node.as_enum().is_some_and(|e| e.override_type_name()),
        }
    }

    /// Set the type name override on the root archetype of an enumeration.
    pub fn set_override_type_name(&mut self, id: PropertyId, value: bool) {
        let root = self.root_archetype(id);
        let node = self.node_mut(root);

        let changed = match node.as_enum_mut() {
            Some(e) if e.override_type_name() != value => {
                e.set_override_flag(value);
                true
            }
            _ => false,
        };

        if changed {
            node.mark_dirty();
            // The hashable name of every clone changed with it.
            for instance in self.gather_all_sub_instances(root, true) {
                self.node_mut(instance)
                    .flags
                    .remove(PropertyFlags::HAS_CACHED_NAME_CHECK);
            }
        }
    }

    /// Whether the property differs from its archetype and must be written.
    pub fn should_serialize(&self, id: PropertyId) -> bool {
        let node = self.node(id);
        let Some(archetype) = node.archetype else {
            return true;
        };
        let source = self.node(archetype);

        if node.id != source.id
            || node.name != source.name
            || node.description != source.description
            || node.suffix != source.suffix
            || node.cook_preference != source.cook_preference
            || node.min_version != source.min_version
            || node.max_version != source.max_version
            || node.default_value != source.default_value
            || node.is_atomic() != source.is_atomic()
            || !node.kind.same_payload(&source.kind)
        {
            return true;
        }

        self.children(id)
            .filter(|&c| !self.node(c).is_intrinsic())
            .any(|c| self.should_serialize(c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PropertyValue;

    fn echoes_struct(arena: &mut PropertyArena) -> PropertyId {
        arena.create(PropertyType::Struct, Game::Echoes)
    }

    fn add(arena: &mut PropertyArena, parent: PropertyId, ty: PropertyType, id: u32) -> PropertyId {
        let child = arena.create_child(parent, ty);
        arena.node_mut(child).set_id(id);
        child
    }

    #[test]
    fn test_offsets_are_aligned_and_monotonic() {
        let mut arena = PropertyArena::new();
        let mut names = PropertyNameMap::in_memory();
        let root = echoes_struct(&mut arena);

        let types = [
            PropertyType::Bool,
            PropertyType::Int,
            PropertyType::Byte,
            PropertyType::Short,
            PropertyType::Asset,
            PropertyType::Bool,
            PropertyType::Vector,
            PropertyType::Color,
        ];
        for (i, ty) in types.into_iter().enumerate() {
            add(&mut arena, root, ty, 0x1000 + i as u32);
        }

        arena.initialize(root, None, 0, &mut names).unwrap();

        let children: Vec<_> = arena.children(root).collect();
        let offsets: Vec<u32> = children.iter().map(|&c| arena.node(c).offset()).collect();
        assert_eq!(offsets, [0, 4, 8, 10, 16, 24, 28, 40]);

        for pair in children.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let expected = align(
                arena.node(a).offset() + arena.data_size(a),
                arena.data_alignment(b),
            );
            assert_eq!(arena.node(b).offset(), expected);
        }

        assert_eq!(arena.data_size(root), 56);
        assert_eq!(arena.data_alignment(root), 8);
    }

    #[test]
    fn test_nested_struct_offsets() {
        let mut arena = PropertyArena::new();
        let mut names = PropertyNameMap::in_memory();
        let root = echoes_struct(&mut arena);

        add(&mut arena, root, PropertyType::Byte, 0x10);
        let inner = add(&mut arena, root, PropertyType::Struct, 0x20);
        let a = add(&mut arena, inner, PropertyType::Short, 0x21);
        let b = add(&mut arena, inner, PropertyType::Float, 0x22);

        arena.initialize(root, None, 0, &mut names).unwrap();

        assert_eq!(arena.node(inner).offset(), 4);
        assert_eq!(arena.node(a).offset(), 4);
        assert_eq!(arena.node(b).offset(), 8);
        assert_eq!(arena.data_size(inner), 8);
    }

    #[test]
    fn test_empty_struct_layout() {
        let mut arena = PropertyArena::new();
        let root = echoes_struct(&mut arena);
        assert_eq!(arena.data_size(root), 0);
        assert_eq!(arena.data_alignment(root), 1);
    }

    #[test]
    fn test_vector_spawns_intrinsic_components() {
        let mut arena = PropertyArena::new();
        let mut names = PropertyNameMap::in_memory();
        let root = echoes_struct(&mut arena);
        add(&mut arena, root, PropertyType::Int, 0x30);
        let position = add(&mut arena, root, PropertyType::Vector, 0x31);

        arena.initialize(root, None, 0, &mut names).unwrap();

        let components: Vec<_> = arena
            .children(position)
            .map(|c| (arena.node(c).name().to_string(), arena.node(c).offset()))
            .collect();
        assert_eq!(
            components,
            [("X".to_string(), 4), ("Y".to_string(), 8), ("Z".to_string(), 12)]
        );
        assert!(arena.children(position).all(|c| arena.node(c).is_intrinsic()));
    }

    #[test]
    fn test_double_initialize_fails() {
        let mut arena = PropertyArena::new();
        let mut names = PropertyNameMap::in_memory();
        let root = echoes_struct(&mut arena);

        arena.initialize(root, None, 0, &mut names).unwrap();
        assert!(matches!(
            arena.initialize(root, None, 0, &mut names),
            Err(Error::AlreadyInitialized { .. })
        ));
    }

    #[test]
    fn test_pointer_parent_and_array_flags() {
        let mut arena = PropertyArena::new();
        let mut names = PropertyNameMap::in_memory();
        let root = echoes_struct(&mut arena);
        let array = add(&mut arena, root, PropertyType::Array, 0x40);
        let item = arena.create_child(array, PropertyType::Struct);
        let leaf = add(&mut arena, item, PropertyType::Float, 0x41);

        arena.initialize(root, None, 0, &mut names).unwrap();

        assert_eq!(arena.item_archetype(array), Some(item));
        assert!(arena.node(item).is_array_archetype());
        assert!(arena.node(leaf).is_array_archetype());
        assert_eq!(arena.node(item).pointer_parent(), Some(array));
        assert_eq!(arena.node(leaf).pointer_parent(), Some(array));
        assert_eq!(arena.node(item).offset(), 0);
        assert_eq!(arena.record_size(array), 4);
    }

    #[test]
    fn test_copy_inherits_fields_and_keeps_own_id() {
        let mut arena = PropertyArena::new();
        let archetype = arena.create(PropertyType::Float, Game::Echoes);
        {
            let node = arena.node_mut(archetype);
            node.set_id(0x100);
            node.set_name("Speed");
            node.set_description("Units per second");
            node.set_default_value(PropertyValue::Float(2.5)).unwrap();
        }

        let copy = arena.create_copy(archetype, None);
        assert_eq!(arena.node(copy).id(), 0x100);
        assert_eq!(arena.node(copy).name(), "Speed");
        assert_eq!(arena.node(copy).default_value(), Some(&PropertyValue::Float(2.5)));
        assert_eq!(arena.node(archetype).sub_instances(), &[copy]);
        assert!(!arena.should_serialize(copy));

        let overridden = arena.create(PropertyType::Float, Game::Echoes);
        arena.node_mut(overridden).set_id(0x200);
        arena.init_from_archetype(overridden, archetype);
        assert_eq!(arena.node(overridden).id(), 0x200);
        assert!(arena.should_serialize(overridden));
    }

    #[test]
    fn test_struct_copy_clones_children() {
        let mut arena = PropertyArena::new();
        let archetype = arena.create(PropertyType::Struct, Game::Echoes);
        arena.node_mut(archetype).set_name("Health");
        arena.node_mut(archetype).set_atomic(true);
        add(&mut arena, archetype, PropertyType::Float, 0x01);
        add(&mut arena, archetype, PropertyType::Float, 0x02);

        let copy = arena.create_copy(archetype, None);
        assert!(arena.node(copy).is_atomic());
        assert_eq!(arena.child_count(copy), 2);

        let copied_child = arena.child_by_id(copy, 0x02).unwrap();
        let source_child = arena.child_by_id(archetype, 0x02).unwrap();
        assert_eq!(arena.node(copied_child).archetype(), Some(source_child));
        assert_eq!(arena.root_archetype(copied_child), source_child);
        assert_eq!(arena.gather_all_sub_instances(archetype, false), [copy]);
    }

    #[test]
    fn test_destroy_archetype_with_instances_fails() {
        let mut arena = PropertyArena::new();
        let mut names = PropertyNameMap::in_memory();
        let archetype = arena.create(PropertyType::Int, Game::Echoes);
        let copy = arena.create_copy(archetype, None);

        assert!(matches!(
            arena.destroy(archetype, &mut names),
            Err(Error::ArchetypeInUse { instances: 1, .. })
        ));
        assert!(arena.contains(archetype));

        arena.destroy(copy, &mut names).unwrap();
        assert!(arena.node(archetype).sub_instances().is_empty());
        arena.destroy(archetype, &mut names).unwrap();
        assert!(!arena.contains(archetype));
        assert!(arena.is_empty());
    }

    #[test]
    fn test_name_accuracy() {
        let mut arena = PropertyArena::new();
        let mut names = PropertyNameMap::in_memory();
        let root = echoes_struct(&mut arena);
        let health = add(&mut arena, root, PropertyType::Float, 0xF066_8919);
        arena.initialize(root, None, 0, &mut names).unwrap();

        arena.node_mut(health).set_name("Health");
        assert!(arena.has_accurate_name(health));
        assert!(arena.check_name(health));

        arena.node_mut(health).set_name("Hitpoints");
        assert!(!arena.has_accurate_name(health));
    }

    #[test]
    fn test_legacy_ids_are_always_accurate() {
        let mut arena = PropertyArena::new();
        for code in [*b"XFRM", *b"INAM", *b"ACTV"] {
            let node = arena.create(PropertyType::Struct, Game::Echoes);
            arena.node_mut(node).set_id(FourCC::from_bytes(code).to_u32());
            arena.node_mut(node).set_name("Anything");
            assert!(arena.has_accurate_name(node));
        }
    }

    #[test]
    fn test_atomic_children_defer_to_parent() {
        let mut arena = PropertyArena::new();
        let mut names = PropertyNameMap::in_memory();
        let root = echoes_struct(&mut arena);
        let health = add(&mut arena, root, PropertyType::Struct, 0xE174_739A);
        arena.node_mut(health).set_atomic(true);
        let inner = add(&mut arena, health, PropertyType::Float, 0x00);
        arena.node_mut(inner).set_name("Health");

        arena.initialize(root, None, 0, &mut names).unwrap();

        arena.node_mut(health).set_name("HealthInfo");
        assert!(arena.has_accurate_name(inner));
        arena.node_mut(health).set_name("Wrong");
        assert!(!arena.has_accurate_name(inner));
    }

    #[test]
    fn test_enum_hashable_type_name() {
        let mut arena = PropertyArena::new();
        let archetype = arena.create(PropertyType::Enum, Game::Corruption);
        arena.node_mut(archetype).set_name("DamageType");
        assert_eq!(arena.hashable_type_name(archetype), "enum");

        let copy = arena.create_copy(archetype, None);
        arena.set_override_type_name(copy, true);
        assert!(arena.overrides_type_name(copy));
        assert_eq!(arena.hashable_type_name(archetype), "DamageType");
        assert_eq!(arena.hashable_type_name(copy), "DamageType");

        let choice = arena.create(PropertyType::Choice, Game::Corruption);
        assert_eq!(arena.hashable_type_name(choice), "choice");
    }

    #[test]
    fn test_template_file_name() {
        let mut arena = PropertyArena::new();
        let mut names = PropertyNameMap::in_memory();

        let archetype = arena.create(PropertyType::Struct, Game::Echoes);
        arena.node_mut(archetype).set_flags(PropertyFlags::ARCHETYPE);
        let child = add(&mut arena, archetype, PropertyType::Int, 0x50);
        arena.set_source_file(archetype, "Structs/Health.xml");
        arena.initialize(archetype, None, 0, &mut names).unwrap();
        assert_eq!(arena.template_file_name(child), Some("Structs/Health.xml"));

        let root = echoes_struct(&mut arena);
        let copy = arena.create_copy(child, Some(root));
        assert_eq!(arena.template_file_name(copy), Some("Structs/Health.xml"));

        let template = TemplateRef::new(0x444F4F52, "Script/Door.xml");
        arena.initialize(root, Some(&template), 0, &mut names).unwrap();
        assert_eq!(arena.template_file_name(copy), Some("Script/Door.xml"));
    }
}
