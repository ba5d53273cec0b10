//! Canvas model: the live arrangement of categories and mod nodes.
//!
//! Ownership is explicit. A category holds its mods in insertion order, and mods dropped
//! outside every category float on their own. Spatial queries return a [`Hit`] instead of
//! walking parent pointers, and render order decides overlaps: the last category in the
//! list is drawn on top.

use crate::constants::{FIT_MARGIN, MOD_NODE_HEIGHT, MOD_NODE_WIDTH};
use crate::model::{
    default_category_color, format_hex_color, parse_hex_color, Arrangement, Category, Mod,
};
use crate::payload::ModPayload;
use egui::{pos2, vec2, Color32, Pos2, Rect, Vec2};
use uuid::Uuid;

/// Stable handle for any node on the canvas.
pub type NodeId = Uuid;

/// Result of a spatial query at a canvas point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Hit {
    Category(NodeId),
    Mod { id: NodeId, owner: Option<NodeId> },
    Empty,
}

/// Anything the user can drag around.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Entity {
    Category(NodeId),
    Mod(NodeId),
}

/// A mod as it currently sits on the canvas.
#[derive(Clone, Debug)]
pub struct ModNode {
    pub id: NodeId,
    pub record: Mod,
    /// Relative to the owning category's origin, or absolute when floating.
    pub position: Pos2,
}

impl ModNode {
    fn new(record: Mod) -> Self {
        let position = pos2(record.x as f32, record.y as f32);
        Self {
            id: Uuid::new_v4(),
            record,
            position,
        }
    }

    /// Node rectangle in its parent's coordinate space.
    pub fn local_rect(&self) -> Rect {
        Rect::from_min_size(self.position, mod_node_size())
    }

    fn to_record(&mut self) -> Mod {
        sync_coordinate(&mut self.record.x, self.position.x);
        sync_coordinate(&mut self.record.y, self.position.y);
        self.record.clone()
    }
}

/// A category region and the mods it owns.
#[derive(Clone, Debug)]
pub struct CategoryNode {
    pub id: NodeId,
    pub name: String,
    pub color: Color32,
    pub position: Pos2,
    pub size: Vec2,
    pub mods: Vec<ModNode>,
    record: Category,
}

impl CategoryNode {
    fn from_record(mut record: Category) -> Self {
        let color = parse_hex_color(&record.color).unwrap_or_else(|| {
            log::warn!(
                "Category '{}' has unreadable color '{}', using default",
                record.name,
                record.color
            );
            default_category_color()
        });
        let mods = std::mem::take(&mut record.mods);
        let mut node = Self {
            id: Uuid::new_v4(),
            name: record.name.clone(),
            color,
            position: pos2(record.x as f32, record.y as f32),
            size: vec2(record.width as f32, record.height as f32),
            mods: Vec::with_capacity(mods.len()),
            record,
        };
        for record in mods {
            node.attach(ModNode::new(record));
        }
        node
    }

    /// Category rectangle in canvas space.
    pub fn rect(&self) -> Rect {
        Rect::from_min_size(self.position, self.size)
    }

    /// Canvas-space rectangle of one of this category's mods.
    pub fn mod_rect(&self, node: &ModNode) -> Rect {
        node.local_rect().translate(self.position.to_vec2())
    }

    /// Grows the category to the union of its own local rectangle and `child` plus the
    /// trailing margin. A child above or left of the origin widens it by the overhang.
    /// Never shrinks.
    pub fn expand_to_fit(&mut self, child: Rect) {
        let own = Rect::from_min_size(Pos2::ZERO, self.size);
        let padded = Rect::from_min_max(child.min, child.max + Vec2::splat(FIT_MARGIN));
        self.size = own.union(padded).size();
    }

    fn attach(&mut self, node: ModNode) {
        self.expand_to_fit(node.local_rect());
        self.mods.push(node);
    }

    fn to_record(&mut self) -> Category {
        self.record.name = self.name.clone();
        sync_coordinate(&mut self.record.x, self.position.x);
        sync_coordinate(&mut self.record.y, self.position.y);
        sync_coordinate(&mut self.record.width, self.size.x);
        sync_coordinate(&mut self.record.height, self.size.y);
        self.record.color = format_hex_color(self.color);
        self.record.mods = self.mods.iter_mut().map(ModNode::to_record).collect();
        self.record.clone()
    }
}

pub fn mod_node_size() -> Vec2 {
    vec2(MOD_NODE_WIDTH, MOD_NODE_HEIGHT)
}

/// Writes a live canvas value back into a stored one, unless it is just the stored value
/// narrowed to `f32`.
fn sync_coordinate(stored: &mut f64, live: f32) {
    if *stored as f32 != live {
        *stored = f64::from(live);
    }
}

/// Owns every category and floating mod on the canvas.
pub struct Board {
    categories: Vec<CategoryNode>,
    floating: Vec<ModNode>,
}

impl Board {
    /// Creates an empty board.
    pub fn new() -> Self {
        Self {
            categories: Vec::new(),
            floating: Vec::new(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Access
    // ─────────────────────────────────────────────────────────────────────────────

    /// Categories in render order, bottom first.
    pub fn categories(&self) -> &[CategoryNode] {
        &self.categories
    }

    /// Mods that were dropped outside every category.
    pub fn floating_mods(&self) -> &[ModNode] {
        &self.floating
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty() && self.floating.is_empty()
    }

    pub fn category(&self, id: NodeId) -> Option<&CategoryNode> {
        self.categories.iter().find(|c| c.id == id)
    }

    fn category_index(&self, id: NodeId) -> Option<usize> {
        self.categories.iter().position(|c| c.id == id)
    }

    /// Finds a mod by id and returns it with its owner, if any.
    pub fn find_mod(&self, id: NodeId) -> Option<(&ModNode, Option<NodeId>)> {
        if let Some(node) = self.floating.iter().find(|m| m.id == id) {
            return Some((node, None));
        }
        self.categories.iter().find_map(|c| {
            c.mods
                .iter()
                .find(|m| m.id == id)
                .map(|node| (node, Some(c.id)))
        })
    }

    fn find_mod_mut(&mut self, id: NodeId) -> Option<&mut ModNode> {
        if let Some(idx) = self.floating.iter().position(|m| m.id == id) {
            return self.floating.get_mut(idx);
        }
        self.categories
            .iter_mut()
            .flat_map(|c| c.mods.iter_mut())
            .find(|m| m.id == id)
    }

    /// Current position of an entity in its own coordinate space.
    pub fn entity_position(&self, entity: Entity) -> Option<Pos2> {
        match entity {
            Entity::Category(id) => self.category(id).map(|c| c.position),
            Entity::Mod(id) => self.find_mod(id).map(|(node, _)| node.position),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Creation and insertion
    // ─────────────────────────────────────────────────────────────────────────────

    /// Adds an empty category with the default size on top of the render order.
    pub fn create_category(
        &mut self,
        name: impl Into<String>,
        color: Color32,
        position: Option<Pos2>,
    ) -> NodeId {
        let mut record = Category::new(name, format_hex_color(color));
        let position = position.unwrap_or(Pos2::ZERO);
        record.x = f64::from(position.x);
        record.y = f64::from(position.y);

        let node = CategoryNode::from_record(record);
        let id = node.id;
        log::debug!("Created category '{}' at {:?}", node.name, position);
        self.categories.push(node);
        id
    }

    /// Places a dropped search result on the canvas.
    ///
    /// The topmost category under `drop` (directly, or through one of its mods) becomes the
    /// owner. The mod is then positioned relative to that category's origin and the category
    /// grows to fit. Otherwise the mod floats at `drop`.
    pub fn insert_mod(&mut self, payload: ModPayload, drop: Pos2) -> NodeId {
        let target = self
            .containing_category(drop)
            .and_then(|id| self.category_index(id));

        match target {
            Some(idx) => {
                let category = &mut self.categories[idx];
                let local = drop - category.position.to_vec2();
                let node =
                    ModNode::new(payload.into_mod(f64::from(local.x), f64::from(local.y)));
                let id = node.id;
                log::info!(
                    "Added mod '{}' to category '{}'",
                    node.record.slug,
                    category.name
                );
                category.attach(node);
                id
            }
            None => {
                let node = ModNode::new(payload.into_mod(f64::from(drop.x), f64::from(drop.y)));
                let id = node.id;
                log::info!("Added floating mod '{}'", node.record.slug);
                self.floating.push(node);
                id
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Spatial queries
    // ─────────────────────────────────────────────────────────────────────────────

    /// Returns the topmost node under `point`.
    ///
    /// Floating mods sit above every category. Within a category its mods sit above the
    /// category's own rectangle.
    pub fn hit_test(&self, point: Pos2) -> Hit {
        if let Some(node) = self
            .floating
            .iter()
            .rev()
            .find(|m| m.local_rect().contains(point))
        {
            return Hit::Mod {
                id: node.id,
                owner: None,
            };
        }

        for category in self.categories.iter().rev() {
            if let Some(node) = category
                .mods
                .iter()
                .rev()
                .find(|m| category.mod_rect(m).contains(point))
            {
                return Hit::Mod {
                    id: node.id,
                    owner: Some(category.id),
                };
            }
            if category.rect().contains(point) {
                return Hit::Category(category.id);
            }
        }

        Hit::Empty
    }

    /// Category that would own something dropped at `point`.
    pub fn containing_category(&self, point: Pos2) -> Option<NodeId> {
        match self.hit_test(point) {
            Hit::Category(id) => Some(id),
            Hit::Mod { owner, .. } => owner,
            Hit::Empty => None,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Mutation
    // ─────────────────────────────────────────────────────────────────────────────

    /// Moves an entity to `position` in its own coordinate space. Returns false if unknown.
    pub fn move_entity(&mut self, entity: Entity, position: Pos2) -> bool {
        match entity {
            Entity::Category(id) => match self.category_index(id) {
                Some(idx) => {
                    self.categories[idx].position = position;
                    true
                }
                None => false,
            },
            Entity::Mod(id) => match self.find_mod_mut(id) {
                Some(node) => {
                    node.position = position;
                    true
                }
                None => false,
            },
        }
    }

    /// Sets a category's size. Negative or non-finite components become zero.
    pub fn resize_category(&mut self, id: NodeId, size: Vec2) -> bool {
        let sanitize = |v: f32| if v.is_finite() { v.max(0.0) } else { 0.0 };
        match self.category_index(id) {
            Some(idx) => {
                self.categories[idx].size = vec2(sanitize(size.x), sanitize(size.y));
                true
            }
            None => false,
        }
    }

    /// Raises a category to the top of the render order.
    pub fn bring_to_front(&mut self, id: NodeId) {
        if let Some(idx) = self.category_index(id) {
            let node = self.categories.remove(idx);
            self.categories.push(node);
        }
    }

    pub fn rename_category(&mut self, id: NodeId, name: impl Into<String>) -> bool {
        match self.category_index(id) {
            Some(idx) => {
                self.categories[idx].name = name.into();
                true
            }
            None => false,
        }
    }

    pub fn set_category_color(&mut self, id: NodeId, color: Color32) -> bool {
        match self.category_index(id) {
            Some(idx) => {
                self.categories[idx].color = color;
                true
            }
            None => false,
        }
    }

    /// Deletes a category together with every mod it owns.
    /// Returns the number of mods removed with it.
    pub fn delete_category(&mut self, id: NodeId) -> Option<usize> {
        let idx = self.category_index(id)?;
        let removed = self.categories.remove(idx);
        log::info!(
            "Deleted category '{}' with {} mod(s)",
            removed.name,
            removed.mods.len()
        );
        Some(removed.mods.len())
    }

    /// Removes a single mod. Its owner keeps its current size.
    pub fn remove_mod(&mut self, id: NodeId) -> bool {
        if let Some(idx) = self.floating.iter().position(|m| m.id == id) {
            self.floating.remove(idx);
            return true;
        }
        for category in &mut self.categories {
            if let Some(idx) = category.mods.iter().position(|m| m.id == id) {
                category.mods.remove(idx);
                return true;
            }
        }
        false
    }

    /// Removes everything from the board.
    pub fn clear(&mut self) {
        self.categories.clear();
        self.floating.clear();
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Document sync
    // ─────────────────────────────────────────────────────────────────────────────

    /// Reads current positions, sizes, and colors back into the held records and returns
    /// them as a document in render order.
    ///
    /// Floating mods have no owner and so are not part of the document.
    pub fn extract_document(&mut self) -> Arrangement {
        if !self.floating.is_empty() {
            log::warn!(
                "{} floating mod(s) are outside every category and will not be saved",
                self.floating.len()
            );
        }
        self.categories
            .iter_mut()
            .map(CategoryNode::to_record)
            .collect()
    }

    /// Replaces the board contents with `document`, re-fitting each category to its mods.
    pub fn rebuild_from_document(&mut self, document: &[Category]) {
        self.clear();
        self.categories = document
            .iter()
            .cloned()
            .map(CategoryNode::from_record)
            .collect();
        log::info!("Rebuilt canvas with {} categories", self.categories.len());
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn payload(slug: &str) -> ModPayload {
        ModPayload {
            slug: slug.to_string(),
            title: slug.to_uppercase(),
            description: String::new(),
            author: "tester".to_string(),
            versions: vec!["1.0".to_string()],
            icon_url: None,
        }
    }

    fn gray() -> Color32 {
        Color32::from_rgb(60, 60, 60)
    }

    #[test]
    fn test_create_category_defaults() {
        let mut board = Board::new();
        let id = board.create_category("Building", gray(), None);
        let category = board.category(id).unwrap();
        assert_eq!(category.position, Pos2::ZERO);
        assert_eq!(category.size, vec2(200.0, 150.0));
        assert!(category.mods.is_empty());

        let placed = board.create_category("", gray(), Some(pos2(40.0, 50.0)));
        assert_eq!(board.category(placed).unwrap().position, pos2(40.0, 50.0));
    }

    #[test]
    fn test_drop_on_empty_canvas_floats_at_drop_point() {
        let mut board = Board::new();
        board.create_category("Far away", gray(), Some(pos2(1000.0, 1000.0)));
        let id = board.insert_mod(payload("sodium"), pos2(33.5, 71.25));

        let (node, owner) = board.find_mod(id).unwrap();
        assert_eq!(owner, None);
        assert_eq!(node.position, pos2(33.5, 71.25));
        assert_eq!(board.floating_mods().len(), 1);
    }

    #[test]
    fn test_drop_inside_category_is_relative_to_origin() {
        let mut board = Board::new();
        let cat = board.create_category("Perf", gray(), Some(pos2(100.0, 200.0)));
        let id = board.insert_mod(payload("lithium"), pos2(130.0, 240.0));

        let (node, owner) = board.find_mod(id).unwrap();
        assert_eq!(owner, Some(cat));
        assert_eq!(node.position, pos2(30.0, 40.0));
        assert_eq!(node.record.version, "1.0");
        assert_eq!(node.record.url, "https://modrinth.com/mod/lithium");
    }

    #[test]
    fn test_insert_grows_category_to_fit() {
        let mut board = Board::new();
        let cat = board.create_category("Perf", gray(), None);
        board.insert_mod(payload("a"), pos2(150.0, 130.0));

        let category = board.category(cat).unwrap();
        // 150 + 120 + 20, 130 + 40 + 20
        assert_eq!(category.size, vec2(290.0, 190.0));
    }

    #[test]
    fn test_growth_is_monotonic_and_a_superset() {
        let mut board = Board::new();
        let cat = board.create_category("Perf", gray(), None);
        let drops = [
            pos2(10.0, 10.0),
            pos2(190.0, 5.0),
            pos2(5.0, 140.0),
            pos2(20.0, 20.0),
        ];

        let mut previous = board.category(cat).unwrap().rect();
        for drop in drops {
            let id = board.insert_mod(payload("m"), drop);
            let category = board.category(cat).unwrap();
            let (node, _) = board.find_mod(id).unwrap();
            let rect = category.rect();
            let child = category.mod_rect(node);

            assert!(rect.contains_rect(previous));
            assert!(rect.max.x >= child.max.x + FIT_MARGIN);
            assert!(rect.max.y >= child.max.y + FIT_MARGIN);
            assert!(rect.area() >= previous.area());
            previous = rect;
        }
    }

    #[test]
    fn test_negative_local_position_widens_by_overhang() {
        let mut board = Board::new();
        let cat = board.create_category("Perf", gray(), Some(pos2(200.0, 200.0)));
        let first = board.insert_mod(payload("a"), pos2(210.0, 210.0));
        // Drag the owned mod up and left, out of its category.
        board.move_entity(Entity::Mod(first), pos2(-100.0, -30.0));

        let before = board.category(cat).unwrap().size;
        let second = board.insert_mod(payload("b"), pos2(110.0, 175.0));

        let (node, owner) = board.find_mod(second).unwrap();
        assert_eq!(owner, Some(cat));
        assert_eq!(node.position, pos2(-90.0, -25.0));

        // Union of (0, 0, 200, 150) and (-90, -25, 50, 35).
        let size = board.category(cat).unwrap().size;
        assert_eq!(size, vec2(290.0, 175.0));
        assert!(size.x >= before.x && size.y >= before.y);
    }

    #[test]
    fn test_expand_to_fit_covers_previous_size_and_child() {
        let mut category = CategoryNode::from_record(Category::new("C", "#3c3c3c"));
        let children = [
            Rect::from_min_size(pos2(10.0, 10.0), mod_node_size()),
            Rect::from_min_size(pos2(-40.0, 300.0), mod_node_size()),
            Rect::from_min_size(pos2(500.0, -75.5), mod_node_size()),
            Rect::from_min_size(pos2(-1.0e6, -1.0e6), mod_node_size()),
        ];
        for child in children {
            let before = category.size;
            category.expand_to_fit(child);
            let after = category.size;

            assert!(after.x >= before.x && after.y >= before.y);
            let low = child.min.min(Pos2::ZERO);
            let high = (child.max + Vec2::splat(FIT_MARGIN)).max(before.to_pos2());
            assert_eq!(after, high - low);
        }
    }

    proptest! {
        #[test]
        fn expand_to_fit_only_grows_and_covers_child(
            width in 0.0f32..2_000.0,
            height in 0.0f32..2_000.0,
            x in -5_000.0f32..5_000.0,
            y in -5_000.0f32..5_000.0,
        ) {
            let mut category = CategoryNode::from_record(Category::new("C", "#3c3c3c"));
            category.size = vec2(width, height);
            let child = Rect::from_min_size(pos2(x, y), mod_node_size());
            category.expand_to_fit(child);

            let after = category.size;
            let overhang = child.min.min(Pos2::ZERO).to_vec2();
            prop_assert!(after.x >= width && after.y >= height);
            prop_assert!(after.x >= child.max.x + FIT_MARGIN - overhang.x);
            prop_assert!(after.y >= child.max.y + FIT_MARGIN - overhang.y);
        }
    }

    #[test]
    fn test_untouched_coordinates_keep_full_precision() {
        let mut category = Category::new("Precise", "#3c3c3c");
        category.x = 123.456789012;
        category.y = -0.1;
        category.width = 333.333333333;
        category.mods.push(ModPayload::into_mod(payload("p"), 1.000000001, 2.5));

        let mut board = Board::new();
        board.rebuild_from_document(std::slice::from_ref(&category));
        let extracted = board.extract_document();
        assert_eq!(extracted[0].x, 123.456789012);
        assert_eq!(extracted[0].y, -0.1);
        assert_eq!(extracted[0].width, 333.333333333);
        assert_eq!(extracted[0].mods[0].x, 1.000000001);

        let id = board.categories()[0].id;
        board.move_entity(Entity::Category(id), pos2(10.5, 20.0));
        let moved = board.extract_document();
        assert_eq!((moved[0].x, moved[0].y), (10.5, 20.0));
        assert_eq!(moved[0].width, 333.333333333);
    }

    #[test]
    fn test_drop_on_owned_mod_walks_up_to_owner() {
        let mut board = Board::new();
        let cat = board.create_category("Perf", gray(), None);
        board.insert_mod(payload("a"), pos2(150.0, 100.0));
        // The category has grown, so this point is now over the mod and over the category.
        let id = board.insert_mod(payload("b"), pos2(200.0, 110.0));

        assert_eq!(board.find_mod(id).unwrap().1, Some(cat));
        assert_eq!(board.category(cat).unwrap().mods.len(), 2);
    }

    #[test]
    fn test_mod_outside_category_bounds_still_hits_owner() {
        let mut board = Board::new();
        let cat = board.create_category("Small", gray(), None);
        board.insert_mod(payload("a"), pos2(10.0, 10.0));
        board.resize_category(cat, vec2(20.0, 20.0));

        // Inside the mod node but outside the shrunken category.
        let point = pos2(100.0, 30.0);
        assert!(matches!(
            board.hit_test(point),
            Hit::Mod { owner: Some(owner), .. } if owner == cat
        ));
        assert_eq!(board.containing_category(point), Some(cat));
    }

    #[test]
    fn test_overlap_resolved_by_render_order() {
        let mut board = Board::new();
        let bottom = board.create_category("Bottom", gray(), Some(pos2(0.0, 0.0)));
        let top = board.create_category("Top", gray(), Some(pos2(100.0, 100.0)));
        let overlap = pos2(150.0, 120.0);

        assert_eq!(board.hit_test(overlap), Hit::Category(top));

        board.bring_to_front(bottom);
        assert_eq!(board.hit_test(overlap), Hit::Category(bottom));

        let id = board.insert_mod(payload("x"), overlap);
        assert_eq!(board.find_mod(id).unwrap().1, Some(bottom));
    }

    #[test]
    fn test_floating_mod_blocks_containment() {
        let mut board = Board::new();
        board.create_category("Under", gray(), Some(pos2(500.0, 500.0)));
        let floating = board.insert_mod(payload("f"), pos2(0.0, 0.0));
        board.move_entity(Entity::Mod(floating), pos2(520.0, 520.0));

        assert!(matches!(
            board.hit_test(pos2(530.0, 530.0)),
            Hit::Mod { owner: None, .. }
        ));
        assert_eq!(board.containing_category(pos2(530.0, 530.0)), None);
    }

    #[test]
    fn test_hit_test_empty() {
        let board = Board::new();
        assert_eq!(board.hit_test(pos2(1.0, 1.0)), Hit::Empty);
    }

    #[test]
    fn test_move_and_resize() {
        let mut board = Board::new();
        let cat = board.create_category("C", gray(), None);
        let m = board.insert_mod(payload("m"), pos2(10.0, 10.0));

        assert!(board.move_entity(Entity::Category(cat), pos2(-50.0, 9000.0)));
        assert!(board.move_entity(Entity::Mod(m), pos2(400.0, 400.0)));
        assert!(board.resize_category(cat, vec2(-5.0, f32::NAN)));

        let category = board.category(cat).unwrap();
        assert_eq!(category.position, pos2(-50.0, 9000.0));
        assert_eq!(category.size, vec2(0.0, 0.0));
        assert_eq!(
            board.entity_position(Entity::Mod(m)),
            Some(pos2(400.0, 400.0))
        );
        assert!(!board.move_entity(Entity::Mod(Uuid::new_v4()), Pos2::ZERO));
    }

    #[test]
    fn test_moving_or_removing_mods_never_shrinks() {
        let mut board = Board::new();
        let cat = board.create_category("C", gray(), None);
        let m = board.insert_mod(payload("m"), pos2(180.0, 10.0));
        let grown = board.category(cat).unwrap().size;

        board.move_entity(Entity::Mod(m), pos2(0.0, 0.0));
        assert_eq!(board.category(cat).unwrap().size, grown);

        assert!(board.remove_mod(m));
        assert_eq!(board.category(cat).unwrap().size, grown);
        assert!(board.category(cat).unwrap().mods.is_empty());
    }

    #[test]
    fn test_delete_category_cascades() {
        let mut board = Board::new();
        let keep = board.create_category("Keep", gray(), Some(pos2(500.0, 0.0)));
        let doomed = board.create_category("Doomed", gray(), None);
        let a = board.insert_mod(payload("a"), pos2(10.0, 10.0));
        board.insert_mod(payload("b"), pos2(10.0, 60.0));

        assert_eq!(board.delete_category(doomed), Some(2));
        assert!(board.find_mod(a).is_none());
        assert_eq!(board.categories().len(), 1);
        assert_eq!(board.categories()[0].id, keep);
        assert_eq!(board.delete_category(doomed), None);
    }

    #[test]
    fn test_extract_reads_back_visual_state() {
        let mut board = Board::new();
        let cat = board.create_category("Building", gray(), None);
        let m = board.insert_mod(payload("a"), pos2(5.0, 5.0));
        board.move_entity(Entity::Category(cat), pos2(10.0, 20.0));
        board.move_entity(Entity::Mod(m), pos2(7.0, 8.0));
        board.rename_category(cat, "Renamed");
        board.set_category_color(cat, Color32::from_rgb(255, 0, 0));

        let document = board.extract_document();
        assert_eq!(document.len(), 1);
        let category = &document[0];
        assert_eq!(category.name, "Renamed");
        assert_eq!((category.x, category.y), (10.0, 20.0));
        assert_eq!((category.width, category.height), (200.0, 150.0));
        assert_eq!(category.color, "#ff0000");
        assert_eq!(category.mods.len(), 1);
        assert_eq!((category.mods[0].x, category.mods[0].y), (7.0, 8.0));

        // Extraction is a pure read of the visual state.
        assert_eq!(board.extract_document(), document);
        assert_eq!(board.category(cat).unwrap().position, pos2(10.0, 20.0));
    }

    #[test]
    fn test_extract_skips_floating_mods() {
        let mut board = Board::new();
        board.insert_mod(payload("lonely"), pos2(5.0, 5.0));
        assert!(board.extract_document().is_empty());
        assert_eq!(board.floating_mods().len(), 1);
    }

    #[test]
    fn test_extract_preserves_render_order() {
        let mut board = Board::new();
        let first = board.create_category("First", gray(), None);
        board.create_category("Second", gray(), None);
        board.bring_to_front(first);

        let names: Vec<String> = board
            .extract_document()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Second".to_string(), "First".to_string()]);
    }

    #[test]
    fn test_rebuild_round_trips_through_extract() {
        let document = vec![Category {
            name: "Building".to_string(),
            mods: vec![Mod {
                slug: "a".to_string(),
                title: "A".to_string(),
                description: String::new(),
                author: "x".to_string(),
                version: "1.0".to_string(),
                url: "https://modrinth.com/mod/a".to_string(),
                x: 5.0,
                y: 5.0,
            }],
            x: 10.0,
            y: 20.0,
            width: 200.0,
            height: 150.0,
            color: "#3c3c3c".to_string(),
        }];

        let mut board = Board::new();
        board.insert_mod(payload("stale"), pos2(0.0, 0.0));
        board.rebuild_from_document(&document);

        assert!(board.floating_mods().is_empty());
        assert_eq!(board.categories()[0].position, pos2(10.0, 20.0));
        assert_eq!(board.categories()[0].mods[0].position, pos2(5.0, 5.0));
        assert_eq!(board.extract_document(), document);
    }

    #[test]
    fn test_rebuild_refits_undersized_categories() {
        let mut category = Category::new("Tight", "#3c3c3c");
        category.width = 10.0;
        category.height = 10.0;
        category.mods.push(Mod {
            slug: "m".to_string(),
            title: String::new(),
            description: String::new(),
            author: String::new(),
            version: String::new(),
            url: String::new(),
            x: 100.0,
            y: 50.0,
        });

        let mut board = Board::new();
        board.rebuild_from_document(&[category]);
        assert_eq!(board.categories()[0].size, vec2(240.0, 110.0));
    }

    #[test]
    fn test_rebuild_with_bad_color_falls_back() {
        let category = Category::new("Odd", "not-a-color");
        let mut board = Board::new();
        board.rebuild_from_document(&[category]);
        assert_eq!(board.categories()[0].color, default_category_color());
        assert_eq!(board.extract_document()[0].color, "#3c3c3c");
    }

    #[test]
    fn test_clear() {
        let mut board = Board::new();
        board.create_category("C", gray(), None);
        board.insert_mod(payload("m"), pos2(900.0, 900.0));
        board.clear();
        assert!(board.is_empty());
    }
}
