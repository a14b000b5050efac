use std::collections::HashMap;

use geo::Coord;
use maptopo::{ClosedMap, CoincidenceIndex, Polyline, Topology, TopologyOptions};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

type SegmentKey = ((u64, u64), (u64, u64));

fn segment_key(a: Coord<f64>, b: Coord<f64>) -> SegmentKey {
    let (a, b) = ((a.x.to_bits(), a.y.to_bits()), (b.x.to_bits(), b.y.to_bits()));
    if a <= b { (a, b) } else { (b, a) }
}

/// Strictly increasing grid lines with random integer spacing.
fn grid_lines(rng: &mut StdRng, n: usize) -> Vec<f64> {
    let mut at = rng.random_range(-5i32..5) as f64;
    let mut lines = vec![at];
    for _ in 0..n {
        at += rng.random_range(1i32..4) as f64;
        lines.push(at);
    }
    lines
}

/// Closed counter-clockwise ring over grid row `row`, columns `c0..c1`.
/// With `midpoints`, every grid line crossing the top and bottom edges gets a
/// vertex; without, only the corners are present.
fn cell_ring(xs: &[f64], ys: &[f64], row: usize, c0: usize, c1: usize, midpoints: bool) -> Vec<Coord<f64>> {
    let (y0, y1) = (ys[row], ys[row + 1]);
    let columns: Vec<usize> = if midpoints { (c0..=c1).collect() } else { vec![c0, c1] };

    let mut ring: Vec<Coord<f64>> = columns.iter().map(|&c| Coord { x: xs[c], y: y0 }).collect();
    ring.extend(columns.iter().rev().map(|&c| Coord { x: xs[c], y: y1 }));
    ring.push(ring[0]);
    ring
}

/// A random grid map: rows of cells, runs of up to three cells merged into one
/// region, some cells left empty.
fn random_grid(rng: &mut StdRng) -> Vec<Vec<Vec<Coord<f64>>>> {
    let (nx, ny) = (rng.random_range(1..=5), rng.random_range(1..=4));
    let (xs, ys) = (grid_lines(rng, nx), grid_lines(rng, ny));
    let midpoints = rng.random_bool(0.5);

    let mut regions = Vec::new();
    for row in 0..ny {
        let mut col = 0;
        while col < nx {
            let span = rng.random_range(1..=3).min(nx - col);
            if !rng.random_bool(0.15) {
                regions.push(vec![cell_ring(&xs, &ys, row, col, col + span, midpoints)]);
            }
            col += span;
        }
    }
    if regions.is_empty() {
        regions.push(vec![cell_ring(&xs, &ys, 0, 0, 1, midpoints)]);
    }
    regions
}

fn random_closed_map(rng: &mut StdRng) -> ClosedMap {
    ClosedMap::from([rng.random_bool(0.5), rng.random_bool(0.5), rng.random_bool(0.5), rng.random_bool(0.5)])
}

fn check_map(topo: &Topology, lines: &[Polyline], seed: u64) {
    let (stream, coincidence, neighbours, endpoints, border) =
        (topo.stream(), topo.coincidence(), topo.neighbours(), topo.endpoints(), topo.border());

    // Endpoint symmetry.
    for &i in endpoints.as_slice() {
        for j in coincidence.mates(i) {
            assert!(endpoints.contains(j), "seed {seed}: endpoint {i} has non-endpoint mate {j}");
        }
    }

    // Lines break exactly at endpoints.
    for line in lines {
        let (first, last) = (line.nodes[0], line.nodes[line.nodes.len() - 1]);
        assert!(endpoints.contains(first) && endpoints.contains(last), "seed {seed}: {line:?}");
        for &i in &line.nodes[1..line.nodes.len() - 1] {
            assert!(!endpoints.contains(i), "seed {seed}: interior vertex {i} is an endpoint");
        }
        assert_ne!(Some(line.left), line.right, "seed {seed}: line labelled the same on both sides");
    }

    // Segment -> labels of the line carrying it.
    let mut emitted: HashMap<SegmentKey, (usize, Option<usize>)> = HashMap::new();
    for line in lines {
        for w in line.coords.windows(2) {
            let previous = emitted.insert(segment_key(w[0], w[1]), (line.left, line.right));
            assert!(previous.is_none(), "seed {seed}: segment {:?} emitted twice", w);
        }
    }

    // Segment -> owners of the rings running along it.
    let mut owners: HashMap<SegmentKey, Vec<usize>> = HashMap::new();
    for i in 0..stream.len() {
        let (a, b) = (stream.point(i), stream.point(neighbours.next(i)));
        owners.entry(segment_key(a, b)).or_default().push(stream.owner(stream.ring_of(i)));
    }

    for (key, ring_owners) in &owners {
        let a = Coord { x: f64::from_bits(key.0.0), y: f64::from_bits(key.0.1) };
        let b = Coord { x: f64::from_bits(key.1.0), y: f64::from_bits(key.1.1) };
        if border.is_open_border_segment(a, b) {
            assert!(!emitted.contains_key(key), "seed {seed}: open border segment {a:?}-{b:?} emitted");
            continue;
        }

        let Some(&(left, right)) = emitted.get(key) else {
            panic!("seed {seed}: segment {a:?}-{b:?} is not covered by any line");
        };
        match ring_owners.as_slice() {
            [only] => assert_eq!((left, right), (*only, None), "seed {seed}: {a:?}-{b:?}"),
            [p, q] => {
                let mut got = [Some(left), right];
                let mut want = [Some(*p), Some(*q)];
                got.sort();
                want.sort();
                assert_eq!(got, want, "seed {seed}: {a:?}-{b:?}");
            }
            other => panic!("seed {seed}: segment {a:?}-{b:?} on {} rings", other.len()),
        }
    }
    assert!(emitted.keys().all(|k| owners.contains_key(k)), "seed {seed}: line segment off every ring");
}

#[test]
fn random_grids_satisfy_line_map_properties() {
    for seed in 0..300 {
        let mut rng = StdRng::seed_from_u64(seed);
        let regions = random_grid(&mut rng);
        let options = TopologyOptions { closed_map: random_closed_map(&mut rng), ..Default::default() };

        let topo = Topology::build(&regions, &options).unwrap();
        let lines = topo.lines().unwrap();
        check_map(&topo, &lines, seed);
    }
}

#[test]
fn fully_closed_grids_cover_every_ring_edge() {
    for seed in 0..50 {
        let mut rng = StdRng::seed_from_u64(1_000 + seed);
        let regions = random_grid(&mut rng);
        let options = TopologyOptions { closed_map: ClosedMap::all(true), ..Default::default() };

        let topo = Topology::build(&regions, &options).unwrap();
        let lines = topo.lines().unwrap();
        check_map(&topo, &lines, seed);

        let perimeter: usize = lines.iter().map(|l| l.coords.len() - 1).sum();
        assert!(perimeter > 0);
        assert_eq!(topo.border().num_on_border(), 0);
    }
}

#[test]
fn hashed_and_sorted_grouping_agree() {
    for seed in 0..50 {
        let mut rng = StdRng::seed_from_u64(2_000 + seed);
        let regions = random_grid(&mut rng);
        let topo = Topology::build(&regions, &TopologyOptions::default()).unwrap();

        let points = topo.stream().points();
        assert_eq!(CoincidenceIndex::from_points(points), CoincidenceIndex::from_points_sorted(points));
    }
}
