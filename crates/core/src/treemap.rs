use std::cmp::Ordering;

use serde::Serialize;

use crate::model::{NodeId, SalesNode, Tree};

/// Golden ratio, the target aspect ratio of squarified rows.
const PHI: f64 = 1.618_033_988_749_895;

/// A positioned leaf tile.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LayoutRect {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
    pub name: String,
    pub category: Option<String>,
    pub value: f64,
}

impl LayoutRect {
    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    pub fn overlaps(&self, other: &LayoutRect) -> bool {
        self.x0 < other.x1 && other.x0 < self.x1 && self.y0 < other.y1 && other.y0 < self.y1
    }
}

/// Squarified treemap over a region anchored at the origin.
#[derive(Clone, Copy, Debug)]
pub struct Treemap {
    pub width: f64,
    pub height: f64,
    /// Gap kept between siblings and around each group's children.
    pub padding: f64,
}

impl Treemap {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            padding: 0.0,
        }
    }

    pub fn padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }

    /// Sums and sorts the hierarchy, then tiles it and returns the leaves.
    pub fn layout(&self, sales: &SalesNode) -> Vec<LayoutRect> {
        let mut tree = Tree::from_sales(sales);
        sort_children(&mut tree);
        self.position(&mut tree);
        tree.leaves()
            .into_iter()
            .map(|id| {
                let n = tree.get(id);
                LayoutRect {
                    x0: n.x0,
                    y0: n.y0,
                    x1: n.x1,
                    y1: n.y1,
                    name: n.name.clone(),
                    category: n.category.clone(),
                    value: n.value,
                }
            })
            .collect()
    }

    /// Assigns `x0..y1` to every node of an already summed and sorted tree.
    pub fn position(&self, tree: &mut Tree) {
        let root = tree.root;
        {
            let r = tree.get_mut(root);
            r.x0 = 0.0;
            r.y0 = 0.0;
            r.x1 = self.width;
            r.y1 = self.height;
        }
        self.position_node(tree, root, 0.0);
    }

    fn position_node(&self, tree: &mut Tree, id: NodeId, outer: f64) {
        let node = tree.get_mut(id);
        let (mut x0, mut y0, mut x1, mut y1) = collapse(
            node.x0 + outer,
            node.y0 + outer,
            node.x1 - outer,
            node.y1 - outer,
        );
        node.x0 = x0;
        node.y0 = y0;
        node.x1 = x1;
        node.y1 = y1;
        if node.is_leaf() {
            return;
        }

        // Children are inset by the full padding, then each child gives back
        // half of it so neighbours end up `padding` apart.
        let half = self.padding / 2.0;
        (x0, y0, x1, y1) = collapse(
            x0 + self.padding - half,
            y0 + self.padding - half,
            x1 - (self.padding - half),
            y1 - (self.padding - half),
        );
        squarify(tree, id, x0, y0, x1, y1);

        let children = tree.get(id).children.clone();
        for child in children {
            self.position_node(tree, child, half);
        }
    }
}

fn collapse(mut x0: f64, mut y0: f64, mut x1: f64, mut y1: f64) -> (f64, f64, f64, f64) {
    if x1 < x0 {
        x0 = (x0 + x1) / 2.0;
        x1 = x0;
    }
    if y1 < y0 {
        y0 = (y0 + y1) / 2.0;
        y1 = y0;
    }
    (x0, y0, x1, y1)
}

/// Orders siblings by descending height, then descending value. Stable for ties.
pub fn sort_children(tree: &mut Tree) {
    for idx in 0..tree.nodes.len() {
        let mut children = std::mem::take(&mut tree.nodes[idx].children);
        children.sort_by(|a, b| {
            let (a, b) = (tree.get(*a), tree.get(*b));
            b.height
                .cmp(&a.height)
                .then_with(|| b.value.partial_cmp(&a.value).unwrap_or(Ordering::Equal))
        });
        tree.nodes[idx].children = children;
    }
}

fn squarify(tree: &mut Tree, parent: NodeId, mut x0: f64, mut y0: f64, x1: f64, y1: f64) {
    let children = tree.get(parent).children.clone();
    let n = children.len();
    let mut value = tree.get(parent).value;
    let (mut i0, mut i1) = (0usize, 0usize);

    while i0 < n {
        let dx = x1 - x0;
        let dy = y1 - y0;

        // Skip over empty nodes so a row never starts with a zero.
        let mut sum_value;
        loop {
            sum_value = tree.get(children[i1]).value;
            i1 += 1;
            if sum_value != 0.0 || i1 >= n {
                break;
            }
        }

        let mut min_value = sum_value;
        let mut max_value = sum_value;
        let alpha = (dy / dx).max(dx / dy) / (value * PHI);
        let mut beta = sum_value * sum_value * alpha;
        let mut min_ratio = (max_value / beta).max(beta / min_value);

        // Grow the row while the worst aspect ratio keeps improving.
        while i1 < n {
            let node_value = tree.get(children[i1]).value;
            sum_value += node_value;
            min_value = min_value.min(node_value);
            max_value = max_value.max(node_value);
            beta = sum_value * sum_value * alpha;
            let new_ratio = (max_value / beta).max(beta / min_value);
            if new_ratio > min_ratio {
                sum_value -= node_value;
                break;
            }
            min_ratio = new_ratio;
            i1 += 1;
        }

        let row = &children[i0..i1];
        if dx < dy {
            let y2 = if value != 0.0 { y0 + dy * sum_value / value } else { y1 };
            dice(tree, row, sum_value, x0, y0, x1, y2);
            y0 = y2;
        } else {
            let x2 = if value != 0.0 { x0 + dx * sum_value / value } else { x1 };
            slice(tree, row, sum_value, x0, y0, x2, y1);
            x0 = x2;
        }

        value -= sum_value;
        i0 = i1;
    }
}

/// Lays a row out left to right.
fn dice(tree: &mut Tree, row: &[NodeId], row_value: f64, x0: f64, y0: f64, x1: f64, y1: f64) {
    let k = if row_value != 0.0 { (x1 - x0) / row_value } else { 0.0 };
    let mut x = x0;
    for &id in row {
        let node = tree.get_mut(id);
        node.y0 = y0;
        node.y1 = y1;
        node.x0 = x;
        x += node.value * k;
        node.x1 = x;
    }
}

/// Lays a row out top to bottom.
fn slice(tree: &mut Tree, row: &[NodeId], row_value: f64, x0: f64, y0: f64, x1: f64, y1: f64) {
    let k = if row_value != 0.0 { (y1 - y0) / row_value } else { 0.0 };
    let mut y = y0;
    for &id in row {
        let node = tree.get_mut(id);
        node.x0 = x0;
        node.x1 = x1;
        node.y0 = y;
        y += node.value * k;
        node.y1 = y;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SalesNode {
        SalesNode::group(
            "root",
            vec![
                SalesNode::group(
                    "Wii",
                    vec![
                        SalesNode::leaf("Wii Sports", "Wii", 82.53),
                        SalesNode::leaf("Mario Kart Wii", "Wii", 35.52),
                        SalesNode::leaf("Wii Fit", "Wii", 22.7),
                    ],
                ),
                SalesNode::group(
                    "DS",
                    vec![
                        SalesNode::leaf("New Super Mario Bros.", "DS", 29.8),
                        SalesNode::leaf("Nintendogs", "DS", 24.67),
                    ],
                ),
                SalesNode::group("GB", vec![SalesNode::leaf("Pokemon Red", "GB", 31.37)]),
                SalesNode::group("NES", vec![SalesNode::leaf("Duck Hunt", "NES", 28.31)]),
            ],
        )
    }

    #[test]
    fn leaves_stay_inside_region() {
        let rects = Treemap::new(1600.0, 800.0).padding(1.0).layout(&sample());
        assert_eq!(rects.len(), 7);
        for r in &rects {
            assert!(r.x0 >= 0.0 && r.y0 >= 0.0, "{r:?}");
            assert!(r.x1 <= 1600.0 && r.y1 <= 800.0, "{r:?}");
            assert!(r.width() > 0.0 && r.height() > 0.0, "{r:?}");
        }
    }

    #[test]
    fn leaves_do_not_overlap() {
        let rects = Treemap::new(1600.0, 800.0).padding(1.0).layout(&sample());
        for (i, a) in rects.iter().enumerate() {
            for b in &rects[i + 1..] {
                assert!(!a.overlaps(b), "{} overlaps {}", a.name, b.name);
            }
        }
    }

    #[test]
    fn unpadded_layout_tiles_the_region() {
        let rects = Treemap::new(1600.0, 800.0).layout(&sample());
        let total: f64 = rects.iter().map(LayoutRect::area).sum();
        assert!((total - 1600.0 * 800.0).abs() < 1e-6);

        let value_total: f64 = rects.iter().map(|r| r.value).sum();
        for r in &rects {
            let expected = 1600.0 * 800.0 * r.value / value_total;
            assert!((r.area() - expected).abs() < 1e-6, "{}", r.name);
        }
    }

    #[test]
    fn padded_area_is_region_minus_gaps() {
        let root = SalesNode::group(
            "root",
            vec![SalesNode::group(
                "A",
                vec![SalesNode::leaf("x", "A", 1.0), SalesNode::leaf("y", "A", 1.0)],
            )],
        );
        let rects = Treemap::new(100.0, 50.0).padding(1.0).layout(&root);
        let [left, right] = rects.as_slice() else {
            panic!("expected two leaves, got {rects:?}");
        };

        // Group frame at 1..99 x 1..49, leaves inset by another 1 around the
        // edges and split by a 1 unit gutter.
        let eps = 1e-9;
        assert!((left.x0 - 2.0).abs() < eps && (left.x1 - 49.5).abs() < eps, "{left:?}");
        assert!((right.x0 - 50.5).abs() < eps && (right.x1 - 98.0).abs() < eps, "{right:?}");
        for r in &rects {
            assert!((r.y0 - 2.0).abs() < eps && (r.y1 - 48.0).abs() < eps, "{r:?}");
            assert!((r.area() - 47.5 * 46.0).abs() < eps, "{r:?}");
        }
        assert!((right.x0 - left.x1 - 1.0).abs() < eps);

        let total: f64 = rects.iter().map(LayoutRect::area).sum();
        let gaps = 100.0 * 50.0 - total;
        assert!((gaps - 630.0).abs() < eps, "gap area {gaps}");
    }

    #[test]
    fn siblings_sorted_by_height_then_value() {
        let mut tree = Tree::from_sales(&SalesNode::group(
            "root",
            vec![
                SalesNode::leaf("small", "x", 1.0),
                SalesNode::group("deep", vec![SalesNode::leaf("a", "deep", 0.5)]),
                SalesNode::leaf("big", "x", 9.0),
            ],
        ));
        sort_children(&mut tree);
        let order: Vec<_> = tree
            .get(tree.root)
            .children
            .iter()
            .map(|id| tree.get(*id).name.as_str())
            .collect();
        assert_eq!(order, ["deep", "big", "small"]);
    }

    #[test]
    fn zero_values_collapse_without_nan() {
        let root = SalesNode::group(
            "root",
            vec![SalesNode::group(
                "A",
                vec![SalesNode::leaf("zero", "A", 0.0), SalesNode::leaf("one", "A", 1.0)],
            )],
        );
        let rects = Treemap::new(100.0, 100.0).padding(1.0).layout(&root);
        for r in &rects {
            assert!(r.x0.is_finite() && r.x1.is_finite() && r.y0.is_finite() && r.y1.is_finite());
        }
        let zero = rects.iter().find(|r| r.name == "zero").unwrap();
        assert_eq!(zero.area(), 0.0);
    }
}
