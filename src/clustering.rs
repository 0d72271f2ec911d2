//! Proximity clustering: connected components of the "within radius" graph.

use crate::distance::{haversine, Coordinate, KM_PER_DEGREE};
use crate::problem::{Problem, Stop};
use petgraph::unionfind::UnionFind;
use std::collections::HashMap;

/// Inputs at or below this size are clustered with a plain pairwise scan.
const PAIRWISE_LIMIT: usize = 256;

/// Grid cells are not used when stops lie this close to a pole (degrees).
const MAX_GRID_LATITUDE: f64 = 80.0;

/// A group of stops connected through chains of nearby stops.
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    /// Indices into the clustered stop slice, ascending
    pub members: Vec<usize>,
    /// Mean position of the members, `None` for an unlocated singleton
    pub centroid: Option<Coordinate>,
}

impl Cluster {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Partition stops into proximity clusters.
///
/// Two stops are linked when their haversine distance is at most `radius_km`;
/// clusters are the connected components of that graph, so a chain of close
/// stops forms one cluster even when its endpoints are far apart. Stops
/// without coordinates become singletons, as does every stop when the radius
/// is not positive. Clusters are ordered by their smallest member.
pub fn cluster(stops: &[Stop], radius_km: f64) -> Vec<Cluster> {
    let n = stops.len();
    let coordinates: Vec<Option<Coordinate>> = stops.iter().map(Stop::coordinate).collect();
    let mut components = UnionFind::<usize>::new(n);

    if radius_km > 0.0 {
        let located: Vec<(usize, Coordinate)> = coordinates
            .iter()
            .enumerate()
            .filter_map(|(i, c)| c.map(|c| (i, c)))
            .collect();

        if located.len() <= PAIRWISE_LIMIT || !link_by_grid(&located, radius_km, &mut components)
        {
            link_pairwise(&located, radius_km, &mut components);
        }
    }

    let mut groups: Vec<Vec<usize>> = Vec::new();
    let mut group_of_root: HashMap<usize, usize> = HashMap::new();

    // Visiting stops in index order yields ascending members and orders the
    // groups by their first member.
    for i in 0..n {
        let root = components.find(i);
        let group = *group_of_root.entry(root).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[group].push(i);
    }

    let clusters: Vec<Cluster> = groups
        .into_iter()
        .map(|members| {
            let centroid =
                Coordinate::centroid(members.iter().filter_map(|&i| coordinates[i].as_ref()));
            Cluster { members, centroid }
        })
        .collect();

    log::debug!(
        "clustered {} stops into {} clusters (radius {} km)",
        n,
        clusters.len(),
        radius_km
    );

    clusters
}

fn link_pairwise(
    located: &[(usize, Coordinate)],
    radius_km: f64,
    components: &mut UnionFind<usize>,
) {
    for (a, &(i, ci)) in located.iter().enumerate() {
        for &(j, cj) in &located[a + 1..] {
            if haversine(ci, cj) <= radius_km {
                components.union(i, j);
            }
        }
    }
}

/// Link stops using a uniform degree grid so only neighbouring cells are
/// compared. Returns `false` without linking anything when the stops come
/// close to a pole or the antimeridian, where the grid would miss pairs.
fn link_by_grid(
    located: &[(usize, Coordinate)],
    radius_km: f64,
    components: &mut UnionFind<usize>,
) -> bool {
    let lat_step = radius_km / KM_PER_DEGREE;
    let max_abs_lat = located
        .iter()
        .map(|(_, c)| c.latitude.abs())
        .fold(0.0_f64, f64::max);

    if max_abs_lat + lat_step > MAX_GRID_LATITUDE {
        return false;
    }

    // Widen longitude cells by the cosine at the most poleward latitude a
    // linking great circle can reach.
    let lon_step = lat_step / (max_abs_lat + lat_step).to_radians().cos();
    let (min_lon, max_lon) = located.iter().fold((f64::MAX, f64::MIN), |(lo, hi), (_, c)| {
        (lo.min(c.longitude), hi.max(c.longitude))
    });

    if min_lon - lon_step < -180.0 || max_lon + lon_step > 180.0 {
        return false;
    }

    let cell_of = |c: &Coordinate| -> (i64, i64) {
        (
            (c.latitude / lat_step).floor() as i64,
            (c.longitude / lon_step).floor() as i64,
        )
    };

    let mut grid: HashMap<(i64, i64), Vec<(usize, Coordinate)>> = HashMap::new();
    for &(i, c) in located {
        grid.entry(cell_of(&c)).or_default().push((i, c));
    }

    for &(i, ci) in located {
        let (row, col) = cell_of(&ci);
        for dr in -1..=1 {
            for dc in -1..=1 {
                if let Some(bucket) = grid.get(&(row + dr, col + dc)) {
                    for &(j, cj) in bucket {
                        if j > i && haversine(ci, cj) <= radius_km {
                            components.union(i, j);
                        }
                    }
                }
            }
        }
    }

    true
}

/// Concatenate cluster paths, reversing a path when its far end is closer to
/// the end of the route built so far.
pub fn stitch_segments<'a, I>(problem: &Problem, segments: I) -> Vec<usize>
where
    I: IntoIterator<Item = &'a Vec<usize>>,
{
    let mut tour: Vec<usize> = Vec::with_capacity(problem.len());

    for segment in segments {
        let (Some(&first), Some(&last)) = (segment.first(), segment.last()) else {
            continue;
        };

        match tour.last() {
            Some(&exit)
                if problem.get_distance(exit, last) < problem.get_distance(exit, first) =>
            {
                tour.extend(segment.iter().rev());
            }
            _ => tour.extend(segment.iter()),
        }
    }

    tour
}
