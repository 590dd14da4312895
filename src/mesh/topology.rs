//! Edge and vertex topology analysis.
//!
//! [`TopologyReport`] answers the questions the repair pipeline promises to
//! settle: is every edge shared by exactly two triangles, do the triangles
//! around every vertex form a single fan, are neighbouring triangles oriented
//! consistently, and how many closed pieces does the mesh consist of.

use std::collections::HashMap;
use std::fmt;

use super::TriangleMesh;

/// Summary of the combinatorial structure of a [`TriangleMesh`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopologyReport {
    /// Total number of vertices, referenced or not.
    pub vertex_count: usize,
    /// Total number of faces.
    pub face_count: usize,
    /// Number of distinct undirected edges.
    pub edge_count: usize,
    /// Edges with exactly one incident face.
    pub boundary_edges: usize,
    /// Edges with more than two incident faces.
    pub non_manifold_edges: usize,
    /// Two-face edges traversed in the same direction by both faces.
    pub inconsistent_edges: usize,
    /// Vertices whose incident faces do not form a single fan.
    pub non_manifold_vertices: usize,
    /// Vertices not referenced by any face.
    pub isolated_vertices: usize,
    /// Faces that repeat a vertex index.
    pub degenerate_faces: usize,
    /// Connected components (vertex-connected face sets).
    pub components: usize,
    /// V - E + F over referenced vertices.
    pub euler_characteristic: i64,
}

impl TopologyReport {
    /// Analyze a mesh.
    pub fn analyze(mesh: &TriangleMesh) -> Self {
        let n = mesh.num_vertices();
        let mut report = TopologyReport {
            vertex_count: n,
            face_count: mesh.num_faces(),
            ..Default::default()
        };

        // Undirected edge -> (uses along min->max, uses along max->min)
        let mut edges: HashMap<(usize, usize), (usize, usize)> = HashMap::new();
        // Vertex -> opposite edges of its incident faces (its link)
        let mut links: Vec<Vec<(usize, usize)>> = vec![Vec::new(); n];
        let mut referenced = vec![false; n];
        let mut components = UnionFind::new(n);

        for &[a, b, c] in &mesh.faces {
            if a == b || b == c || a == c {
                report.degenerate_faces += 1;
                continue;
            }
            for (u, v) in [(a, b), (b, c), (c, a)] {
                let entry = edges.entry((u.min(v), u.max(v))).or_insert((0, 0));
                if u < v {
                    entry.0 += 1;
                } else {
                    entry.1 += 1;
                }
            }
            links[a].push((b, c));
            links[b].push((c, a));
            links[c].push((a, b));
            referenced[a] = true;
            referenced[b] = true;
            referenced[c] = true;
            components.union(a, b);
            components.union(b, c);
        }

        report.edge_count = edges.len();
        for &(forward, backward) in edges.values() {
            match forward + backward {
                1 => report.boundary_edges += 1,
                2 => {
                    if forward != 1 {
                        report.inconsistent_edges += 1;
                    }
                }
                _ => report.non_manifold_edges += 1,
            }
        }

        report.non_manifold_vertices = links
            .iter()
            .filter(|link| !link.is_empty() && !is_single_fan(link))
            .count();
        report.isolated_vertices = referenced.iter().filter(|&&r| !r).count();

        let mut roots: Vec<usize> = (0..n)
            .filter(|&v| referenced[v])
            .map(|v| components.find(v))
            .collect();
        roots.sort_unstable();
        roots.dedup();
        report.components = roots.len();

        let used_vertices = (n - report.isolated_vertices) as i64;
        let used_faces = (report.face_count - report.degenerate_faces) as i64;
        report.euler_characteristic = used_vertices - report.edge_count as i64 + used_faces;

        report
    }

    /// No non-manifold edges, no pinched vertices and no degenerate faces.
    pub fn is_manifold(&self) -> bool {
        self.non_manifold_edges == 0 && self.non_manifold_vertices == 0 && self.degenerate_faces == 0
    }

    /// No boundary edges.
    pub fn is_closed(&self) -> bool {
        self.boundary_edges == 0
    }

    /// Every two-face edge is traversed once in each direction.
    pub fn is_consistently_oriented(&self) -> bool {
        self.inconsistent_edges == 0
    }

    /// Closed, manifold and consistently oriented.
    pub fn is_watertight(&self) -> bool {
        self.is_manifold() && self.is_closed() && self.is_consistently_oriented()
    }

    /// Total genus, defined only for watertight meshes.
    ///
    /// For closed orientable surfaces `χ = 2c - 2g` summed over the `c`
    /// components.
    pub fn genus(&self) -> Option<i64> {
        if !self.is_watertight() {
            return None;
        }
        Some((2 * self.components as i64 - self.euler_characteristic) / 2)
    }
}

impl fmt::Display for TopologyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Topology:")?;
        writeln!(f, "  Vertices: {}", self.vertex_count)?;
        writeln!(f, "  Faces: {}", self.face_count)?;
        writeln!(f, "  Edges: {}", self.edge_count)?;
        writeln!(f, "  Components: {}", self.components)?;
        writeln!(f, "  Euler characteristic: {}", self.euler_characteristic)?;
        writeln!(f, "  Closed: {}", if self.is_closed() { "Yes" } else { "No" })?;
        writeln!(f, "  Manifold: {}", if self.is_manifold() { "Yes" } else { "No" })?;
        if let Some(genus) = self.genus() {
            writeln!(f, "  Genus: {}", genus)?;
        }
        if self.boundary_edges > 0 {
            writeln!(f, "  Boundary edges: {}", self.boundary_edges)?;
        }
        if self.non_manifold_edges > 0 {
            writeln!(f, "  Non-manifold edges: {}", self.non_manifold_edges)?;
        }
        if self.inconsistent_edges > 0 {
            writeln!(f, "  Inconsistently oriented edges: {}", self.inconsistent_edges)?;
        }
        if self.non_manifold_vertices > 0 {
            writeln!(f, "  Non-manifold vertices: {}", self.non_manifold_vertices)?;
        }
        if self.degenerate_faces > 0 {
            writeln!(f, "  Degenerate faces: {}", self.degenerate_faces)?;
        }
        if self.isolated_vertices > 0 {
            writeln!(f, "  Isolated vertices: {}", self.isolated_vertices)?;
        }
        Ok(())
    }
}

/// Whether the link edges around a vertex form one fan (a cycle or a path).
pub(crate) fn is_single_fan(link: &[(usize, usize)]) -> bool {
    let mut adjacency: HashMap<usize, Vec<usize>> = HashMap::new();
    for &(a, b) in link {
        adjacency.entry(a).or_default().push(b);
        adjacency.entry(b).or_default().push(a);
    }
    if adjacency.values().any(|n| n.len() > 2) {
        return false;
    }

    let Some(&start) = adjacency.keys().next() else {
        return true;
    };
    let mut seen = vec![start];
    let mut stack = vec![start];
    while let Some(u) = stack.pop() {
        for &w in &adjacency[&u] {
            if !seen.contains(&w) {
                seen.push(w);
                stack.push(w);
            }
        }
    }
    seen.len() == adjacency.len()
}

struct UnionFind {
    parent: Vec<usize>,
}

impl UnionFind {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    fn union(&mut self, a: usize, b: usize) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra != rb {
            self.parent[ra.max(rb)] = ra.min(rb);
        }
    }
}
