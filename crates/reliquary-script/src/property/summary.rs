//! Flattened, display-oriented view of a property tree.

use super::serialize::value_text;
use super::{PropertyArena, PropertyId};
use crate::PropertyType;

/// Snapshot of one property and its non-intrinsic children.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct PropertySummary {
    pub id: u32,
    pub id_string: String,
    pub name: String,
    pub property_type: PropertyType,
    pub offset: u32,
    pub size: u32,
    #[cfg_attr(feature = "json", serde(skip_serializing_if = "Option::is_none"))]
    pub default_value: Option<String>,
    #[cfg_attr(feature = "json", serde(skip_serializing_if = "Option::is_none"))]
    pub archetype: Option<String>,
    pub accurate_name: bool,
    #[cfg_attr(feature = "json", serde(skip_serializing_if = "Vec::is_empty"))]
    pub children: Vec<PropertySummary>,
}

impl PropertyArena {
    /// Summarize the subtree rooted at `id`.
    pub fn summarize(&self, id: PropertyId) -> PropertySummary {
        let node = self.node(id);
        let archetype = node
            .archetype
            .map(|a| self.root_archetype(a))
            .filter(|&a| self.is_root_parent(a))
            .map(|a| self.node(a).name.clone());

        PropertySummary {
            id: node.id,
            id_string: self.id_string(id),
            name: node.name.clone(),
            property_type: node.property_type(),
            offset: node.offset,
            size: self.data_size(id),
            default_value: node.default_value.as_ref().map(value_text),
            archetype,
            accurate_name: self.check_name(id),
            children: self
                .children(id)
                .filter(|&c| !self.node(c).is_intrinsic())
                .map(|c| self.summarize(c))
                .collect(),
        }
    }
}

impl PropertySummary {
    /// Number of properties in this summary, including itself.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(PropertySummary::count).sum::<usize>()
    }

    /// Render as pretty-printed JSON.
    #[cfg(feature = "json")]
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PropertyNameMap, PropertyValue};
    use reliquary_common::{crc, Game};

    #[test]
    fn test_summary_tree() {
        let mut arena = PropertyArena::new();
        let mut names = PropertyNameMap::in_memory();

        let root = arena.create(PropertyType::Struct, Game::Corruption);
        arena.node_mut(root).set_name("Actor");
        let scale = arena.create_child(root, PropertyType::Vector);
        arena.node_mut(scale).set_id(crc::property_id("Scale", "Vector"));
        let speed = arena.create_child(root, PropertyType::Float);
        arena.node_mut(speed).set_id(0x0A);
        arena.node_mut(speed).set_default_value(PropertyValue::Float(1.5)).unwrap();
        arena.initialize(root, None, 0, &mut names).unwrap();
        arena.node_mut(scale).set_name("Scale");

        let summary = arena.summarize(root);
        assert_eq!(summary.count(), 3);
        assert_eq!(summary.size, 16);

        let scale = &summary.children[0];
        assert!(scale.children.is_empty());
        assert!(scale.accurate_name);
        assert_eq!(scale.size, 12);

        let speed = &summary.children[1];
        assert_eq!(speed.id_string, "0A");
        assert_eq!(speed.offset, 12);
        assert_eq!(speed.default_value.as_deref(), Some("1.5"));
        assert!(!speed.accurate_name);
    }
}
