//! Fixtures shared by the CLI unit and behaviour tests.

use camino::{Utf8Path, Utf8PathBuf};
use geo::Coord;
use saferoute_core::test_support::straight_segment;
use saferoute_core::{FacilityPoint, RouteSegment, SurveillanceDetails};
use tempfile::TempDir;

pub(super) const ORIGIN: &str = "37.5665,126.9780";
pub(super) const DESTINATION: &str = "37.5705,126.9780";

pub(super) const ORIGIN_COORD: Coord<f64> = Coord {
    x: 126.9780,
    y: 37.5665,
};
pub(super) const DESTINATION_COORD: Coord<f64> = Coord {
    x: 126.9780,
    y: 37.5705,
};

pub(super) fn direct_route() -> Vec<RouteSegment> {
    vec![straight_segment(ORIGIN_COORD, DESTINATION_COORD, 20)]
}

pub(super) fn cameras_along(segments: &[RouteSegment]) -> Vec<FacilityPoint> {
    segments
        .iter()
        .flat_map(|segment| segment.coordinates.iter().copied())
        .map(|coord| {
            FacilityPoint::surveillance(coord, SurveillanceDetails::default())
                .expect("valid camera")
        })
        .collect()
}

/// Temporary directory addressed through UTF-8 paths.
pub(super) struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        Self { _dir: dir, root }
    }

    pub(super) fn root(&self) -> &Utf8Path {
        &self.root
    }

    pub(super) fn write(&self, name: &str, contents: &[u8]) -> Utf8PathBuf {
        let path = self.root.join(name);
        std::fs::write(&path, contents).expect("write fixture");
        path
    }
}
