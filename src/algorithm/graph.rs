use crate::math::Point3;
use crate::navigation_mesh::{EdgeIndex, FaceIndex, NavigationMesh};

/// A walkable connection from one face to a neighbour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct Link {
    /// Face on the other side of the shared edge.
    pub face: FaceIndex,
    /// The shared edge.
    pub edge: EdgeIndex,
    /// Distance between the two face centers.
    pub weight: f32,
}

#[derive(Debug, Clone)]
struct FaceNode {
    center: Point3,
    links: Vec<Link>,
}

/// Faces as nodes, shared non-boundary edges as weighted links.
///
/// Built once from a mesh and never updated. Connected components are
/// resolved at build time so that unreachable targets are rejected without
/// a search.
#[derive(Debug, Clone)]
pub(super) struct FaceGraph {
    nodes: Vec<FaceNode>,
    components: Vec<FaceIndex>,
}

impl FaceGraph {
    pub fn build(mesh: &NavigationMesh) -> Self {
        let mut components = DisjointSet::new(mesh.faces().len());
        let nodes = mesh
            .face_indices()
            .zip(mesh.faces())
            .map(|(index, face)| {
                let links = face
                    .edge
                    .iter()
                    .filter_map(|&edge| {
                        let other = mesh.edge(edge)?.opposite_face(index)?;
                        let weight = (mesh.face(other)?.center - face.center).norm();
                        components.union(index, other);
                        Some(Link {
                            face: other,
                            edge,
                            weight,
                        })
                    })
                    .collect();
                FaceNode {
                    center: face.center,
                    links,
                }
            })
            .collect();

        let components = mesh.face_indices().map(|f| components.find(f)).collect();
        Self { nodes, components }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn contains(&self, face: FaceIndex) -> bool {
        usize::from(face) < self.nodes.len()
    }

    pub fn links(&self, face: FaceIndex) -> &[Link] {
        &self.nodes[usize::from(face)].links
    }

    pub fn center(&self, face: FaceIndex) -> Point3 {
        self.nodes[usize::from(face)].center
    }

    /// Whether a path between the two faces exists. Both must be in range.
    pub fn connected(&self, a: FaceIndex, b: FaceIndex) -> bool {
        self.components[usize::from(a)] == self.components[usize::from(b)]
    }

    /// The edge joining two adjacent faces.
    pub fn shared_edge(&self, from: FaceIndex, to: FaceIndex) -> Option<EdgeIndex> {
        self.links(from)
            .iter()
            .find(|link| link.face == to)
            .map(|link| link.edge)
    }
}

/// Relative slack under which two route costs count as equal.
const TIE_TOLERANCE: f32 = 1e-5;

/// Walks back from `to` over settled distances and returns a shortest chain
/// from `from` in forward order.
///
/// At each step the predecessor is the lowest-index neighbour that is closer
/// to `from` and lies on a shortest route within [`TIE_TOLERANCE`]. The chain
/// therefore depends only on `dist`, not on the order in which a search
/// relaxed its links. `prev` is followed only where no neighbour is strictly
/// closer, as happens across zero-length links.
///
/// `dist` must be final for every face closer to `from` than `to`.
pub(super) fn shortest_chain(
    graph: &FaceGraph,
    dist: &[f32],
    prev: &[Option<FaceIndex>],
    from: FaceIndex,
    to: FaceIndex,
) -> Vec<FaceIndex> {
    let mut path = vec![to];
    let mut current = to;
    while current != from && path.len() <= graph.len() {
        let here = dist[usize::from(current)];
        let slack = TIE_TOLERANCE * here.max(1.0);
        let tied = graph
            .links(current)
            .iter()
            .filter(|link| {
                let there = dist[usize::from(link.face)];
                there < here && there + link.weight <= here + slack
            })
            .map(|link| link.face)
            .min();
        let Some(previous) = tied.or(prev[usize::from(current)]) else {
            break;
        };
        path.push(previous);
        current = previous;
    }
    path.reverse();
    path
}

/// Follows predecessor links back from `to` and returns the chain in
/// forward order.
pub(super) fn trace_back(prev: &[Option<FaceIndex>], to: FaceIndex) -> Vec<FaceIndex> {
    let mut path = vec![to];
    let mut current = to;
    while let Some(previous) = prev[usize::from(current)] {
        path.push(previous);
        current = previous;
    }
    path.reverse();
    path
}

/// Union-find over face indices with union by rank and path halving.
#[derive(Debug)]
struct DisjointSet {
    parent: Vec<FaceIndex>,
    rank: Vec<u8>,
}

impl DisjointSet {
    fn new(len: usize) -> Self {
        Self {
            parent: (0..=u16::MAX).take(len).collect(),
            rank: vec![0; len],
        }
    }

    fn find(&mut self, mut x: FaceIndex) -> FaceIndex {
        while self.parent[usize::from(x)] != x {
            let grandparent = self.parent[usize::from(self.parent[usize::from(x)])];
            self.parent[usize::from(x)] = grandparent;
            x = grandparent;
        }
        x
    }

    fn union(&mut self, a: FaceIndex, b: FaceIndex) {
        let (a, b) = (self.find(a), self.find(b));
        if a == b {
            return;
        }
        let (rank_a, rank_b) = (self.rank[usize::from(a)], self.rank[usize::from(b)]);
        match rank_a.cmp(&rank_b) {
            std::cmp::Ordering::Less => self.parent[usize::from(a)] = b,
            std::cmp::Ordering::Greater => self.parent[usize::from(b)] = a,
            std::cmp::Ordering::Equal => {
                self.parent[usize::from(b)] = a;
                self.rank[usize::from(a)] += 1;
            }
        }
    }
}
