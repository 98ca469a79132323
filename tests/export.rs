#![cfg(feature = "export")]

use nalgebra::point;
use rand::{rngs::StdRng, SeedableRng};
use spindle::{
    export, CurveMode, NullSink, ProfileCurve, RevolutionBuilder, SplatConfig, SplatEmitter,
    Subdivisions,
};

#[test]
fn converts_to_primitive() {
    let curve = ProfileCurve::new(
        CurveMode::Linear,
        vec![point![1.0, 0.0], point![1.0, 1.0], point![0.5, 2.0]],
    );
    let rev = RevolutionBuilder::new(Subdivisions::new(6).unwrap())
        .build::<u16>(&curve)
        .unwrap()
        .unwrap();
    let prim = hedron::Primitive::try_from(&rev.mesh).unwrap();
    assert_eq!(prim.vertex_count(), rev.mesh.vertex_count());
    assert_eq!(prim.triangle_count(), rev.mesh.triangle_count());
    let indices: Vec<u32> = rev.mesh.view().indices().iter().map(|&i| i as u32).collect();
    assert_eq!(prim.indices(), indices.as_slice());
    assert_eq!(prim.positions(), rev.mesh.view().positions());
}

#[test]
fn obj_round_trip() {
    let mut emitter: SplatEmitter<_, _> =
        SplatEmitter::new(SplatConfig::default(), StdRng::seed_from_u64(11), NullSink).unwrap();
    for i in 0..10 {
        let f = i as f32;
        emitter
            .add_splat(point![f, 0.0, -f], nalgebra::vector![0.0, 1.0, 0.0])
            .unwrap();
    }
    let mesh = emitter.buffer().freeze();

    let mut out = Vec::new();
    export::write_obj(&mesh, "splats", &mut out).unwrap();
    let models = hedron::de::obj::read(out.as_slice()).unwrap();
    assert_eq!(models.len(), 1);
    let (name, prim) = &models[0];
    assert_eq!(name, "splats");
    assert_eq!(prim.vertex_count(), 40);
    assert_eq!(prim.triangle_count(), 20);

    let view = mesh.view();
    for (read, [a, b, c]) in prim.iter_triangles().zip(view.triangles()) {
        let read = read.map(|i| prim.positions()[i as usize]);
        let written = [a, b, c].map(|i| view.positions()[i as usize]);
        assert_eq!(read, written);
    }
}

#[test]
fn save_to_file() {
    let curve = ProfileCurve::new(
        CurveMode::Bezier,
        vec![
            point![1.0, 0.0],
            point![2.0, 1.0],
            point![2.0, 2.0],
            point![1.0, 3.0],
        ],
    );
    let rev = RevolutionBuilder::default().build::<u32>(&curve).unwrap().unwrap();
    let path = std::env::temp_dir().join(format!("spindle-export-{}.obj", std::process::id()));
    export::save_obj(&rev.mesh, &path).unwrap();
    let models = hedron::de::obj::load(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(models[0].1.vertex_count(), rev.mesh.vertex_count());
    assert_eq!(models[0].1.triangle_count(), rev.mesh.triangle_count());
}
