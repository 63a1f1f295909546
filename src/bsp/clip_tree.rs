// src/bsp/clip_tree.rs
//! Point and segment queries against a collision hull.
//!
//! A hull is a binary tree of splitting planes whose leaves say what fills
//! each convex cell. The file mixes node indices and contents codes in one
//! signed integer; here they are decoded once into `ClipChild` so queries
//! never look at raw codes.

use log::{debug, warn};

use crate::bsp::contents::Contents;
use crate::error::{FormatError, FormatResult};
use crate::lump::{BspFile, LumpKind};
use crate::map::{Plane, MAX_HULLS};
use crate::utils::geometry::Vec3;

/// Distance kept between a resolved point and the solid it was pushed out of.
pub const DIST_EPSILON: f32 = 1.0 / 32.0;

/// Root restarts allowed per `resolve_movement` call unless configured
/// otherwise.
pub const DEFAULT_MAX_RESTARTS: u32 = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipChild {
    Node(usize),
    Leaf(Contents),
}

/// A splitting node. `children[0]` is in front of the plane, `children[1]`
/// behind it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HullNode {
    pub plane: Plane,
    pub children: [ClipChild; 2],
}

impl HullNode {
    fn child_for(&self, distance: f32) -> ClipChild {
        self.children[if distance >= 0.0 { 0 } else { 1 }]
    }
}

/// Outcome of `ClipTree::resolve_movement`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Movement {
    /// Whether the segment touched solid space on the way.
    pub blocked: bool,
    /// Where the mover ends up.
    pub position: Vec3,
    /// How many times the query started over from the root.
    pub restarts: u32,
}

enum Pass {
    Clear,
    PushOut(Vec3),
    Stuck,
    Cycle,
    MissingNode(usize),
}

#[derive(Debug, Clone)]
pub struct ClipTree {
    nodes: Vec<HullNode>,
    root: ClipChild,
    max_restarts: u32,
}

impl ClipTree {
    /// Decodes the tree for `hull` of `model`. Hull 0 (point-sized) comes
    /// from the render nodes and their leaves, hulls 1 to 3 from the
    /// clip-node lump. Every plane and child index is checked here.
    pub fn for_hull(file: &BspFile, model: usize, hull: usize) -> FormatResult<Self> {
        if hull >= MAX_HULLS {
            return Err(FormatError::MissingHull { model, hull });
        }
        let head = file.models().try_get(model as i64, "hull model")?.head_nodes[hull];

        let tree = if hull == 0 {
            if file.nodes().is_empty() {
                return Err(FormatError::MissingHull { model, hull });
            }
            Self::from_render_nodes(file, head)?
        } else {
            if file.clip_nodes().is_empty() {
                return Err(FormatError::MissingHull { model, hull });
            }
            Self::from_clip_nodes(file, head)?
        };
        debug!(
            "Decoded hull {} of model {}: {} nodes",
            hull,
            model,
            tree.nodes.len()
        );
        Ok(tree)
    }

    fn from_clip_nodes(file: &BspFile, head: i32) -> FormatResult<Self> {
        let planes = file.planes();
        let clip_nodes = file.clip_nodes();
        let count = clip_nodes.len();

        let child = |raw: i32, context: &'static str| -> FormatResult<ClipChild> {
            if raw < 0 {
                return Ok(ClipChild::Leaf(Contents::from_code(raw)));
            }
            if raw as usize >= count {
                return Err(FormatError::IndexOutOfRange {
                    kind: LumpKind::ClipNodes,
                    index: raw as i64,
                    count,
                    context,
                });
            }
            Ok(ClipChild::Node(raw as usize))
        };

        let mut nodes = Vec::with_capacity(count);
        for raw in clip_nodes.iter() {
            nodes.push(HullNode {
                plane: planes.try_get(raw.plane as i64, "clip-node plane")?,
                children: [
                    child(raw.children[0] as i32, "clip-node child")?,
                    child(raw.children[1] as i32, "clip-node child")?,
                ],
            });
        }
        let root = child(head, "hull head node")?;
        Ok(ClipTree::new(nodes, root))
    }

    fn from_render_nodes(file: &BspFile, head: i32) -> FormatResult<Self> {
        let planes = file.planes();
        let render_nodes = file.nodes();
        let leaves = file.leaves();
        let count = render_nodes.len();

        // Negative children name leaf `-child - 1`.
        let child = |raw: i32, context: &'static str| -> FormatResult<ClipChild> {
            if raw < 0 {
                let leaf = leaves.try_get(-(raw as i64) - 1, context)?;
                return Ok(ClipChild::Leaf(Contents::from_code(leaf.contents)));
            }
            if raw as usize >= count {
                return Err(FormatError::IndexOutOfRange {
                    kind: LumpKind::Nodes,
                    index: raw as i64,
                    count,
                    context,
                });
            }
            Ok(ClipChild::Node(raw as usize))
        };

        let mut nodes = Vec::with_capacity(count);
        for raw in render_nodes.iter() {
            nodes.push(HullNode {
                plane: planes.try_get(raw.plane as i64, "node plane")?,
                children: [
                    child(raw.children[0] as i32, "node child")?,
                    child(raw.children[1] as i32, "node child")?,
                ],
            });
        }
        let root = child(head, "hull head node")?;
        Ok(ClipTree::new(nodes, root))
    }

    fn new(nodes: Vec<HullNode>, root: ClipChild) -> Self {
        ClipTree {
            nodes,
            root,
            max_restarts: DEFAULT_MAX_RESTARTS,
        }
    }

    pub fn with_max_restarts(mut self, max_restarts: u32) -> Self {
        self.max_restarts = max_restarts;
        self
    }

    pub fn root(&self) -> ClipChild {
        self.root
    }

    pub fn nodes(&self) -> &[HullNode] {
        &self.nodes
    }

    pub fn max_restarts(&self) -> u32 {
        self.max_restarts
    }

    /// Moves from `from` towards `to`, walking down from `start`.
    ///
    /// When `to` lands in solid space it is pushed back along the plane
    /// normal until it sits `DIST_EPSILON` outside, and the query starts over
    /// from the root with the new target. A push that does not move the
    /// point ends the query blocked where it is. Exceeding the restart limit,
    /// or a tree that loops back on itself, leaves the mover at `from`.
    pub fn resolve_movement(&self, from: Vec3, to: Vec3, start: ClipChild) -> Movement {
        let mut target = to;
        let mut node = start;
        let mut blocked = false;
        let mut restarts = 0;

        loop {
            match self.segment_pass(&target, node) {
                Pass::Clear => {
                    return Movement {
                        blocked,
                        position: target,
                        restarts,
                    }
                }
                Pass::Stuck => {
                    return Movement {
                        blocked: true,
                        position: target,
                        restarts,
                    }
                }
                Pass::PushOut(pushed) => {
                    blocked = true;
                    if restarts >= self.max_restarts {
                        warn!(
                            "Movement {:?} -> {:?} still in solid after {} restarts",
                            from, to, restarts
                        );
                        return Movement {
                            blocked: true,
                            position: from,
                            restarts,
                        };
                    }
                    restarts += 1;
                    debug!("Restart {}: target {:?} -> {:?}", restarts, target, pushed);
                    target = pushed;
                    node = self.root;
                }
                Pass::Cycle => {
                    warn!("Clip tree walk exceeded {} nodes, tree has a cycle", self.nodes.len());
                    return Movement {
                        blocked: true,
                        position: from,
                        restarts,
                    };
                }
                Pass::MissingNode(index) => {
                    warn!("Clip node {} is outside a tree of {}", index, self.nodes.len());
                    return Movement {
                        blocked: true,
                        position: from,
                        restarts,
                    };
                }
            }
        }
    }

    /// One descent for `resolve_movement`. Whether or not `from` shares a
    /// side with `to`, the walk continues into the child `to` falls in, so
    /// only `to` is tested. A solid child stops it.
    fn segment_pass(&self, to: &Vec3, start: ClipChild) -> Pass {
        let mut current = start;
        for _ in 0..=self.nodes.len() {
            let index = match current {
                ClipChild::Leaf(contents) if contents.is_solid() => return Pass::Stuck,
                ClipChild::Leaf(_) => return Pass::Clear,
                ClipChild::Node(index) => index,
            };
            let Some(node) = self.nodes.get(index) else {
                return Pass::MissingNode(index);
            };
            let to_dist = node.plane.distance_to(to);

            match node.child_for(to_dist) {
                ClipChild::Leaf(contents) if contents.is_solid() => {
                    let bias = if to_dist < 0.0 {
                        to_dist - DIST_EPSILON
                    } else {
                        to_dist + DIST_EPSILON
                    };
                    let pushed = *to + node.plane.normal * -bias;
                    if pushed == *to {
                        return Pass::Stuck;
                    }
                    return Pass::PushOut(pushed);
                }
                child => current = child,
            }
        }
        Pass::Cycle
    }

    /// Follows `to` down the tree without restarting and returns the first
    /// point of contact with non-empty space, or `to` if there is none.
    pub fn trace_line(&self, from: Vec3, to: Vec3, start: ClipChild) -> Vec3 {
        let mut current = start;
        for _ in 0..=self.nodes.len() {
            let index = match current {
                ClipChild::Leaf(contents) if contents.is_empty() => return to,
                ClipChild::Leaf(_) => return from,
                ClipChild::Node(index) => index,
            };
            let Some(node) = self.nodes.get(index) else {
                warn!("Clip node {} is outside a tree of {}", index, self.nodes.len());
                return from;
            };
            let from_dist = node.plane.distance_to(&from);
            let to_dist = node.plane.distance_to(&to);

            match node.child_for(to_dist) {
                ClipChild::Leaf(contents) if contents.is_empty() => return to,
                ClipChild::Leaf(_) => return from.lerp(&to, contact_fraction(from_dist, to_dist)),
                child => current = child,
            }
        }
        warn!("Trace exceeded {} nodes, tree has a cycle", self.nodes.len());
        from
    }

    /// What fills the cell containing `point`.
    pub fn contents_at(&self, point: Vec3, start: ClipChild) -> Contents {
        let mut current = start;
        for _ in 0..=self.nodes.len() {
            match current {
                ClipChild::Leaf(contents) => return contents,
                ClipChild::Node(index) => {
                    let Some(node) = self.nodes.get(index) else {
                        warn!("Clip node {} is outside a tree of {}", index, self.nodes.len());
                        return Contents::Solid;
                    };
                    current = node.child_for(node.plane.distance_to(&point));
                }
            }
        }
        Contents::Solid
    }
}

/// Fraction along the segment where it meets the plane, backed off by
/// `DIST_EPSILON` towards `from`.
fn contact_fraction(from_dist: f32, to_dist: f32) -> f32 {
    let span = from_dist - to_dist;
    if span == 0.0 {
        return 0.0;
    }
    let biased = if from_dist < 0.0 {
        from_dist + DIST_EPSILON
    } else {
        from_dist - DIST_EPSILON
    };
    (biased / span).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{square_room, BspBuilder};
    use assert_approx_eq::assert_approx_eq;

    /// One x = 0 plane with empty space in front and solid behind, both as a
    /// render tree (hull 0) and as clip-nodes. Clip-node 1 uses a plane with
    /// a zero normal, clip-node 2 is solid on both sides and clip-node 3
    /// points back at itself.
    fn hulls() -> BspFile {
        BspFile::from_bytes(
            BspBuilder::new()
                .plane([1.0, 0.0, 0.0], 0.0)
                .plane([0.0, 0.0, 0.0], 1.0)
                .node(0, [-2, -1])
                .leaf(-2, -1)
                .leaf(-1, -1)
                .clip_node(0, [-1, -2])
                .clip_node(1, [-1, -2])
                .clip_node(0, [-2, -2])
                .clip_node(0, [3, -1])
                .model([0.0; 3], [0, 0, 1, 2], 2, 0, 0)
                .model([0.0; 3], [0, 3, 0, 0], 0, 0, 0)
                .build(),
        )
        .unwrap()
    }

    fn tree(model: usize, hull: usize) -> ClipTree {
        ClipTree::for_hull(&hulls(), model, hull).unwrap()
    }

    #[test]
    fn test_hull_zero_uses_leaf_contents() {
        let tree = tree(0, 0);
        assert_eq!(tree.root(), ClipChild::Node(0));
        assert_eq!(
            tree.nodes()[0].children,
            [ClipChild::Leaf(Contents::Empty), ClipChild::Leaf(Contents::Solid)]
        );
        assert_eq!(tree.contents_at(Vec3::new(3.0, 0.0, 0.0), tree.root()), Contents::Empty);
        assert_eq!(tree.contents_at(Vec3::new(-3.0, 0.0, 0.0), tree.root()), Contents::Solid);
    }

    #[test]
    fn test_empty_start_returns_target() {
        let tree = tree(0, 1);
        let to = Vec3::new(-40.0, 2.0, 3.0);
        let movement = tree.resolve_movement(Vec3::ZERO, to, ClipChild::Leaf(Contents::Empty));
        assert_eq!(
            movement,
            Movement {
                blocked: false,
                position: to,
                restarts: 0
            }
        );
    }

    #[test]
    fn test_movement_in_open_space() {
        let tree = tree(0, 1);
        let to = Vec3::new(9.0, 1.0, 0.0);
        let movement = tree.resolve_movement(Vec3::new(5.0, 0.0, 0.0), to, tree.root());
        assert!(!movement.blocked);
        assert_eq!(movement.position, to);
    }

    #[test]
    fn test_movement_out_of_solid_is_not_blocked() {
        // Only the target is tested, so leaving solid space is free.
        for hull in [0, 1] {
            let tree = tree(0, hull);
            let movement = tree.resolve_movement(
                Vec3::new(-5.0, 0.0, 0.0),
                Vec3::new(5.0, 0.0, 0.0),
                tree.root(),
            );
            assert_eq!(
                movement,
                Movement {
                    blocked: false,
                    position: Vec3::new(5.0, 0.0, 0.0),
                    restarts: 0
                }
            );
        }
    }

    #[test]
    fn test_movement_into_solid_is_pushed_out() {
        for hull in [0, 1] {
            let tree = tree(0, hull);
            let movement = tree.resolve_movement(
                Vec3::new(5.0, 0.0, 0.0),
                Vec3::new(-5.0, 0.0, 0.0),
                tree.root(),
            );
            assert!(movement.blocked);
            assert_eq!(movement.restarts, 1);
            assert_approx_eq!(movement.position.x, DIST_EPSILON);
            assert_eq!(movement.position.y, 0.0);
            assert!(movement.position.x > 0.0);
        }
    }

    #[test]
    fn test_degenerate_push_stops_at_target() {
        // The zero normal leaves the corrected target where it was.
        let tree = tree(0, 2);
        let to = Vec3::new(4.0, 4.0, 4.0);
        let movement = tree.resolve_movement(Vec3::ZERO, to, tree.root());
        assert_eq!(
            movement,
            Movement {
                blocked: true,
                position: to,
                restarts: 0
            }
        );
    }

    #[test]
    fn test_restart_limit_returns_from() {
        let tree = tree(0, 3);
        let from = Vec3::new(1.0, 2.0, 3.0);
        let movement = tree.resolve_movement(from, Vec3::new(5.0, 0.0, 0.0), tree.root());
        assert!(movement.blocked);
        assert_eq!(movement.position, from);
        assert_eq!(movement.restarts, DEFAULT_MAX_RESTARTS);

        let tree = tree.with_max_restarts(2);
        let movement = tree.resolve_movement(from, Vec3::new(5.0, 0.0, 0.0), tree.root());
        assert_eq!(movement.restarts, 2);
    }

    #[test]
    fn test_cycle_is_blocked_at_from() {
        let tree = tree(1, 1);
        let from = Vec3::new(2.0, 0.0, 0.0);
        let movement = tree.resolve_movement(from, Vec3::new(8.0, 0.0, 0.0), tree.root());
        assert_eq!(
            movement,
            Movement {
                blocked: true,
                position: from,
                restarts: 0
            }
        );
        assert_eq!(tree.trace_line(from, Vec3::new(8.0, 0.0, 0.0), tree.root()), from);
        assert_eq!(tree.contents_at(from, tree.root()), Contents::Solid);
    }

    #[test]
    fn test_start_node_out_of_range() {
        let file = BspFile::from_bytes(square_room().build()).unwrap();
        let tree = ClipTree::for_hull(&file, 0, 0).unwrap();
        let from = Vec3::ZERO;
        let to = Vec3::new(1.0, 1.0, 1.0);
        assert_eq!(
            tree.resolve_movement(from, to, ClipChild::Node(5)),
            Movement {
                blocked: true,
                position: from,
                restarts: 0
            }
        );
        assert_eq!(tree.trace_line(from, to, ClipChild::Node(5)), from);
        assert_eq!(tree.contents_at(to, ClipChild::Node(5)), Contents::Solid);
    }

    #[test]
    fn test_trace_stops_before_solid() {
        let tree = tree(0, 1);
        let hit = tree.trace_line(
            Vec3::new(8.0, 4.0, 0.0),
            Vec3::new(-8.0, 4.0, 0.0),
            tree.root(),
        );
        assert_approx_eq!(hit.x, DIST_EPSILON);
        assert_approx_eq!(hit.y, 4.0);
    }

    #[test]
    fn test_trace_through_empty_reaches_end() {
        let tree = tree(0, 1);
        let to = Vec3::new(16.0, 0.0, 0.0);
        assert_eq!(tree.trace_line(Vec3::new(8.0, 0.0, 0.0), to, tree.root()), to);
    }

    #[test]
    fn test_missing_hulls() {
        let file = BspFile::from_bytes(square_room().build()).unwrap();
        assert_eq!(
            ClipTree::for_hull(&file, 0, 1).unwrap_err(),
            FormatError::MissingHull { model: 0, hull: 1 }
        );
        assert_eq!(
            ClipTree::for_hull(&hulls(), 0, 4).unwrap_err(),
            FormatError::MissingHull { model: 0, hull: 4 }
        );
    }

    #[test]
    fn test_bad_indices_are_rejected() {
        let bad_child = BspFile::from_bytes(
            BspBuilder::new()
                .plane([1.0, 0.0, 0.0], 0.0)
                .clip_node(0, [9, -1])
                .model([0.0; 3], [0, 0, 0, 0], 0, 0, 0)
                .build(),
        )
        .unwrap();
        assert!(matches!(
            ClipTree::for_hull(&bad_child, 0, 1),
            Err(FormatError::IndexOutOfRange { kind: LumpKind::ClipNodes, index: 9, .. })
        ));

        let bad_plane = BspFile::from_bytes(
            BspBuilder::new()
                .plane([1.0, 0.0, 0.0], 0.0)
                .clip_node(5, [-1, -2])
                .model([0.0; 3], [0, 0, 0, 0], 0, 0, 0)
                .build(),
        )
        .unwrap();
        assert!(matches!(
            ClipTree::for_hull(&bad_plane, 0, 1),
            Err(FormatError::IndexOutOfRange { kind: LumpKind::Planes, index: 5, .. })
        ));

        let bad_leaf = BspFile::from_bytes(
            BspBuilder::new()
                .plane([1.0, 0.0, 0.0], 0.0)
                .node(0, [-4, -1])
                .leaf(-2, -1)
                .model([0.0; 3], [0, 0, 0, 0], 0, 0, 0)
                .build(),
        )
        .unwrap();
        assert!(matches!(
            ClipTree::for_hull(&bad_leaf, 0, 0),
            Err(FormatError::IndexOutOfRange { kind: LumpKind::Leaves, index: 3, .. })
        ));
    }

    #[test]
    fn test_contact_fraction_guards() {
        assert_eq!(contact_fraction(3.0, 3.0), 0.0);
        assert_eq!(contact_fraction(0.0, -1.0), 0.0);
        assert_approx_eq!(contact_fraction(-4.0, 4.0), (4.0 - DIST_EPSILON) / 8.0);
    }
}
