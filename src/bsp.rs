//! [BSP](https://en.wikipedia.org/wiki/Binary_space_partitioning) tree node structure and operations

use crate::float_types::Real;
use crate::plane::{BACK, COPLANAR, FRONT, Plane};
use crate::polygon::Polygon;
use std::fmt::Debug;

/// A BSP tree node, containing polygons plus optional front/back subtrees.
#[derive(Debug, Clone)]
pub struct Node<S: Clone + Send + Sync + Debug> {
    /// Splitting plane for this node, `None` for an empty leaf.
    pub plane: Option<Plane>,

    /// Subtree in the front half-space.
    pub front: Option<Box<Node<S>>>,

    /// Subtree in the back half-space.
    pub back: Option<Box<Node<S>>>,

    /// Polygons lying exactly on `plane` once the node is built.
    pub polygons: Vec<Polygon<S>>,
}

impl<S: Clone + Send + Sync + Debug> Node<S> {
    /// Create a new empty BSP node.
    pub const fn new() -> Self {
        Self {
            plane: None,
            front: None,
            back: None,
            polygons: Vec::new(),
        }
    }

    /// Creates a new BSP node from polygons.
    pub fn from_polygons(polygons: &[Polygon<S>]) -> Self {
        let mut node = Self::new();
        if !polygons.is_empty() {
            node.build(polygons);
        }
        node
    }

    /// Invert all polygons in the BSP tree, swapping inside and outside.
    pub fn invert(&mut self) {
        self.polygons.iter_mut().for_each(Polygon::flip);
        if let Some(ref mut plane) = self.plane {
            plane.flip();
        }
        if let Some(ref mut front) = self.front {
            front.invert();
        }
        if let Some(ref mut back) = self.back {
            back.invert();
        }
        std::mem::swap(&mut self.front, &mut self.back);
    }

    /// Pick a splitting plane from a sample of candidate polygons,
    /// weighting against spans and front/back imbalance.
    fn pick_best_splitting_plane(&self, polygons: &[Polygon<S>]) -> Plane {
        const K_SPANS: Real = 8.0;
        const K_BALANCE: Real = 1.0;

        let mut best_plane = polygons[0].plane.clone();
        let mut best_score = Real::MAX;

        let sample_size = polygons.len().min(20);
        for candidate in polygons.iter().take(sample_size) {
            let plane = &candidate.plane;
            let mut num_front = 0i32;
            let mut num_back = 0i32;
            let mut num_spanning = 0i32;

            for poly in polygons {
                match plane.classify_polygon(poly) {
                    COPLANAR => {},
                    FRONT => num_front += 1,
                    BACK => num_back += 1,
                    _ => num_spanning += 1,
                }
            }

            let score =
                K_SPANS * num_spanning as Real + K_BALANCE * ((num_front - num_back) as Real).abs();
            if score < best_score {
                best_score = score;
                best_plane = plane.clone();
            }
        }
        best_plane
    }

    /// Recursively remove all polygons in `polygons` that are inside this
    /// BSP tree. Iterative to avoid deep recursion on large trees.
    pub fn clip_polygons(&self, polygons: &[Polygon<S>]) -> Vec<Polygon<S>> {
        let mut result = Vec::new();
        let mut stack = vec![(self, polygons.to_vec())];

        while let Some((node, polys)) = stack.pop() {
            let Some(plane) = node.plane.as_ref() else {
                result.extend(polys);
                continue;
            };

            let mut front_polys = Vec::with_capacity(polys.len());
            let mut back_polys = Vec::with_capacity(polys.len());

            for polygon in &polys {
                let (coplanar_front, coplanar_back, mut front_parts, mut back_parts) =
                    plane.split_polygon(polygon);

                for coplanar_poly in coplanar_front.into_iter().chain(coplanar_back) {
                    if plane.orient_plane(&coplanar_poly.plane) == FRONT {
                        front_parts.push(coplanar_poly);
                    } else {
                        back_parts.push(coplanar_poly);
                    }
                }

                front_polys.append(&mut front_parts);
                back_polys.append(&mut back_parts);
            }

            if let Some(front_node) = &node.front {
                if !front_polys.is_empty() {
                    stack.push((front_node, front_polys));
                }
            } else {
                result.extend(front_polys);
            }

            // Polygons with no back subtree are inside the solid: dropped.
            if let Some(back_node) = &node.back {
                if !back_polys.is_empty() {
                    stack.push((back_node, back_polys));
                }
            }
        }
        result
    }

    /// Remove all polygons in this BSP tree that are inside the other tree.
    pub fn clip_to(&mut self, bsp: &Node<S>) {
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            node.polygons = bsp.clip_polygons(&node.polygons);
            if let Some(front) = node.front.as_mut() {
                stack.push(front);
            }
            if let Some(back) = node.back.as_mut() {
                stack.push(back);
            }
        }
    }

    /// Return all polygons in this BSP tree.
    pub fn all_polygons(&self) -> Vec<Polygon<S>> {
        let mut result = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            result.extend_from_slice(&node.polygons);
            stack.extend(
                [&node.front, &node.back]
                    .iter()
                    .filter_map(|child| child.as_ref().map(|boxed| boxed.as_ref())),
            );
        }
        result
    }

    /// Build a BSP tree from the given polygons, extending the existing
    /// tree where one is present.
    pub fn build(&mut self, polygons: &[Polygon<S>]) {
        if polygons.is_empty() {
            return;
        }

        let mut stack = vec![(self, polygons.to_vec())];

        while let Some((node, polys)) = stack.pop() {
            if polys.is_empty() {
                continue;
            }

            if node.plane.is_none() {
                node.plane = Some(node.pick_best_splitting_plane(&polys));
            }
            let plane = node.plane.clone().expect("plane was just set");

            let mut front = Vec::with_capacity(polys.len() / 2);
            let mut back = Vec::with_capacity(polys.len() / 2);

            for polygon in &polys {
                let (coplanar_front, coplanar_back, mut front_parts, mut back_parts) =
                    plane.split_polygon(polygon);

                node.polygons.extend(coplanar_front);
                node.polygons.extend(coplanar_back);
                front.append(&mut front_parts);
                back.append(&mut back_parts);
            }

            if !front.is_empty() {
                let front_node = node.front.get_or_insert_with(|| Box::new(Node::new()));
                stack.push((front_node, front));
            }
            if !back.is_empty() {
                let back_node = node.back.get_or_insert_with(|| Box::new(Node::new()));
                stack.push((back_node, back));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Node;
    use crate::polygon::Polygon;
    use crate::vertex::Vertex;
    use nalgebra::{Point3, Vector3};

    fn triangle() -> Polygon<()> {
        Polygon::new(
            vec![
                Vertex::new(Point3::new(0.0, 0.0, 0.0), Vector3::z()),
                Vertex::new(Point3::new(1.0, 0.0, 0.0), Vector3::z()),
                Vertex::new(Point3::new(0.5, 1.0, 0.0), Vector3::z()),
            ],
            None,
        )
    }

    #[test]
    fn build_and_collect() {
        let node = Node::from_polygons(&[triangle()]);
        assert_eq!(node.all_polygons().len(), 1);
    }

    #[test]
    fn invert_flips_polygons() {
        let mut node = Node::from_polygons(&[triangle()]);
        let normal_before = node.all_polygons()[0].plane.normal();
        node.invert();
        let normal_after = node.all_polygons()[0].plane.normal();
        assert_eq!(normal_before, -normal_after);
    }

    #[test]
    fn clip_drops_polygons_inside() {
        // Clipping a tree against itself keeps the boundary polygons.
        let node = Node::from_polygons(&[triangle()]);
        let kept = node.clip_polygons(&[triangle()]);
        assert!(!kept.is_empty());
    }
}
