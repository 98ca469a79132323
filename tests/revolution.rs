use nalgebra::point;
use quickcheck::TestResult;
use quickcheck_macros::quickcheck;
use spindle::{
    BufferError, Capacity, CurveMode, Error, GeometryBuffer, ProfileCurve, RecordingSink,
    RevolutionBuilder, Subdivisions,
};

fn vase() -> ProfileCurve {
    ProfileCurve::new(
        CurveMode::Bezier,
        vec![
            point![1.0, 0.0],
            point![2.0, 1.0],
            point![2.0, 2.0],
            point![1.0, 3.0],
        ],
    )
}

fn builder(subdivisions: u32) -> RevolutionBuilder {
    RevolutionBuilder::new(Subdivisions::new(subdivisions).unwrap())
}

#[test]
fn subdivisions() {
    assert_eq!(Subdivisions::default().get(), 16);
    assert_eq!(Subdivisions::DEFAULT.get(), 16);
    assert_eq!(RevolutionBuilder::default().subdivisions().get(), 16);
    assert!(matches!(Subdivisions::new(0), Err(Error::ZeroSubdivisions)));
    assert!(Subdivisions::try_from(0).is_err());
    assert!("0".parse::<Subdivisions>().is_err());
    assert_eq!("12".parse::<Subdivisions>().unwrap().get(), 12);
    assert_eq!(Subdivisions::new(7).unwrap().to_string(), "7");

    let mut builder = builder(4);
    assert!(!builder.set_subdivisions(Subdivisions::new(4).unwrap()));
    assert!(builder.set_subdivisions(Subdivisions::new(5).unwrap()));
    assert_eq!(builder.subdivisions().get(), 5);
}

#[test]
fn four_points_four_steps() {
    let rev = builder(4).build::<u32>(&vase()).unwrap().unwrap();
    let mesh = rev.mesh.view();
    assert_eq!(mesh.vertex_count(), 20);
    assert_eq!(mesh.triangle_count(), 24);
    assert_eq!((rev.stats.vertices, rev.stats.triangles), (20, 24));
    assert_eq!(&mesh.indices()[..6], &[0, 1, 5, 0, 5, 4]);
    assert_eq!(mesh.max_index(), Some(19));

    // a quarter turn takes +X to -Z
    let p = mesh.positions()[4];
    assert!((p - point![0.0, 0.0, -1.0]).norm() < 1e-6);
}

#[test]
fn unit_square_profile() {
    let curve = ProfileCurve::new(
        CurveMode::Bezier,
        vec![
            point![0.0, 0.0],
            point![1.0, 0.0],
            point![1.0, 1.0],
            point![0.0, 1.0],
        ],
    );
    let rev = builder(4).build::<u32>(&curve).unwrap().unwrap();
    assert_eq!(rev.mesh.vertex_count(), 20);
    assert_eq!(rev.mesh.triangle_count(), 24);
    assert_eq!(rev.stats.arc_length, 3.0);
}

#[test]
fn stats() {
    let rev = builder(3).build::<u32>(&vase()).unwrap().unwrap();
    assert_eq!(rev.stats.min_height, 0.0);
    assert_eq!(rev.stats.max_height, 3.0);
    let expected = 1.0 + 2.0 * std::f32::consts::SQRT_2;
    assert!((rev.stats.arc_length - expected).abs() < 1e-5);
}

#[test]
fn seam_and_texture_coordinates() {
    let s = 8;
    let curve = vase();
    let p = curve.len();
    let rev = builder(s).build::<u32>(&curve).unwrap().unwrap();
    let mesh = rev.mesh.view();
    let (positions, texcoords) = (mesh.positions(), mesh.texcoords());
    for i in 0..p {
        let (first, last) = (i, i + p * s as usize);
        assert_eq!(texcoords[first].x, 1.0);
        assert_eq!(texcoords[last].x, 0.0);
        assert_eq!(texcoords[first].y, texcoords[last].y);
        assert!((positions[first] - positions[last]).norm() < 1e-5);
    }
    assert_eq!(texcoords[0].y, 0.0);
    assert_eq!(texcoords[p - 1].y, 1.0);
    // v follows arc length, so it increases along the profile
    assert!(texcoords[..p].windows(2).all(|w| w[0].y < w[1].y));
}

#[test]
fn profile_lies_in_xy_plane_at_band_zero() {
    let curve = vase();
    let rev = builder(5).build::<u32>(&curve).unwrap().unwrap();
    let mesh = rev.mesh.view();
    for (v, p) in mesh.positions().iter().zip(curve.points()) {
        assert_eq!((v.x, v.y, v.z), (p.x, p.y, 0.0));
    }
    // every band keeps its height and its distance from the axis
    for (n, v) in mesh.positions().iter().enumerate() {
        let p = curve.points()[n % curve.len()];
        assert_eq!(v.y, p.y);
        assert!((v.x.hypot(v.z) - p.x).abs() < 1e-5);
    }
}

/// Triangles wind so that they face the same way as the vertex normals, whichever way the profile
/// runs.
#[test]
fn winding_matches_normals() {
    let up = ProfileCurve::new(
        CurveMode::Linear,
        (0..5).map(|i| point![1.5, i as f32]).collect(),
    );
    let down = ProfileCurve::new(
        CurveMode::Linear,
        (0..5).rev().map(|i| point![1.5, i as f32]).collect(),
    );
    for (curve, outward) in [(up, false), (down, true)] {
        let rev = builder(12).build::<u32>(&curve).unwrap().unwrap();
        let mesh = rev.mesh.view();
        for (t, [a, b, c]) in mesh.triangles().enumerate() {
            let face = mesh.face_normal(t).unwrap();
            let normal = mesh.normals()[a as usize]
                + mesh.normals()[b as usize]
                + mesh.normals()[c as usize];
            assert!(face.dot(&normal) > 0.0, "triangle {t}");

            let center = mesh.positions()[a as usize];
            let radial = nalgebra::vector![center.x, 0.0, center.z];
            assert_eq!(normal.dot(&radial) > 0.0, outward, "triangle {t}");
        }
        for n in mesh.normals() {
            assert!((n.norm() - 1.0).abs() < 1e-5);
            assert!(n.y.abs() < 1e-6);
        }
    }
}

#[test]
fn repeated_builds_are_identical() {
    let builder = builder(16);
    let a = builder.build::<u32>(&vase()).unwrap();
    let b = builder.build::<u32>(&vase()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn short_curves_are_rejected() {
    let short = [
        ProfileCurve::new(
            CurveMode::Bezier,
            vec![point![1.0, 0.0], point![1.0, 1.0], point![1.0, 2.0]],
        ),
        ProfileCurve::new(CurveMode::Linear, vec![point![1.0, 0.0]]),
        ProfileCurve::with_declared_points(CurveMode::Linear, 2, vec![point![1.0, 0.0]]),
        ProfileCurve::default(),
    ];
    let builder = builder(4);
    let mut buffer = GeometryBuffer::<u32>::new(Capacity::exact(3, 1)).unwrap();
    let mut sink = RecordingSink::new();
    for curve in &short {
        assert!(builder.build::<u32>(curve).unwrap().is_none());
        assert!(builder.rebuild(curve, &mut buffer, &mut sink).unwrap().is_none());
    }
    assert!(buffer.is_empty());
    assert_eq!(buffer.capacity(), Capacity::exact(3, 1));
    assert!(sink.publications.is_empty());
}

#[test]
fn declared_count_decides_minimum() {
    let curve = ProfileCurve::with_declared_points(
        CurveMode::Bezier,
        4,
        vec![point![1.0, 0.0], point![1.0, 1.0], point![1.0, 2.0]],
    );
    let rev = builder(4).build::<u32>(&curve).unwrap().unwrap();
    assert_eq!(rev.mesh.vertex_count(), 15);

    let linear = ProfileCurve::new(CurveMode::Linear, vec![point![1.0, 0.0], point![2.0, 1.0]]);
    let rev = builder(4).build::<u32>(&linear).unwrap().unwrap();
    assert_eq!((rev.mesh.vertex_count(), rev.mesh.triangle_count()), (10, 8));
}

#[test]
fn rebuild_replaces_and_publishes() {
    let mut builder = builder(4);
    let mut buffer = GeometryBuffer::<u32>::new(Capacity::default()).unwrap();
    let mut sink = RecordingSink::new();

    let stats = builder.rebuild(&vase(), &mut buffer, &mut sink).unwrap().unwrap();
    assert_eq!(stats.vertices, 20);
    assert_eq!(buffer.capacity(), Capacity::exact(20, 24));

    builder.set_subdivisions(Subdivisions::new(8).unwrap());
    builder.rebuild(&vase(), &mut buffer, &mut sink).unwrap().unwrap();
    assert_eq!(buffer.vertex_count(), 36);
    assert_eq!(buffer.triangle_count(), 48);
    assert_eq!(buffer.capacity(), Capacity::exact(36, 48));

    let counts: Vec<_> = sink
        .publications
        .iter()
        .map(|p| (p.vertices, p.triangles))
        .collect();
    assert_eq!(counts, [(20, 24), (36, 48)]);
    assert!(sink.publications.iter().all(|p| p.is_consistent()));
}

#[test]
fn degenerate_profile() {
    let curve = ProfileCurve::new(CurveMode::Linear, vec![point![1.0, 1.0]; 4]);
    let rev = builder(3).build::<u32>(&curve).unwrap().unwrap();
    assert_eq!(rev.stats.arc_length, 0.0);
    let mesh = rev.mesh.view();
    assert!(mesh.texcoords().iter().all(|t| t.y == 0.0));
    assert!(mesh.normals().iter().all(|n| n.iter().all(|c| c.is_finite())));
}

#[test]
fn narrow_indices() {
    let rev = builder(4).build::<u16>(&vase()).unwrap().unwrap();
    assert_eq!(rev.mesh.view().max_index(), Some(19));

    assert!(matches!(
        builder(100).build::<u8>(&vase()),
        Err(Error::Buffer(BufferError::IndexOverflow { vertices: 404, max: 256 }))
    ));
}

#[quickcheck]
fn counts(points: u8, subdivisions: u8) -> TestResult {
    let p = (points % 32) as usize;
    let s = (subdivisions % 64) as u32;
    if p < 2 || s == 0 {
        return TestResult::discard();
    }
    let curve = ProfileCurve::new(
        CurveMode::Linear,
        (0..p).map(|i| point![1.0 + (i % 3) as f32, i as f32]).collect(),
    );
    let rev = match builder(s).build::<u32>(&curve) {
        Ok(Some(rev)) => rev,
        _ => return TestResult::failed(),
    };
    let s = s as usize;
    TestResult::from_bool(
        rev.mesh.vertex_count() == p * (s + 1)
            && rev.mesh.triangle_count() == 2 * (p - 1) * s
            && rev.mesh.view().max_index() == Some(p * (s + 1) - 1),
    )
}
