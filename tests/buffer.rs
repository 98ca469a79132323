use nalgebra::{point, vector};
use quickcheck_macros::quickcheck;
use spindle::{BufferError, Capacity, GeometryBuffer, Mesh, RecordingSink, Texcoord};

fn vertex(buf: &mut GeometryBuffer, i: usize) -> Result<u32, BufferError> {
    let f = i as f32;
    buf.push_vertex(point![f, -f, 0.5 * f], vector![0.0, 0.0, 1.0], Texcoord::new(f, 0.0))
}

#[test]
fn capacity_for_polygons() {
    assert_eq!(Capacity::for_polygons(256, 4), Capacity::exact(256, 128));
    assert_eq!(Capacity::for_polygons(9, 3), Capacity { vertices: 9, indices: 9 });
    assert_eq!(
        Capacity::exact(4, 2).doubled(),
        Some(Capacity { vertices: 8, indices: 12 })
    );
    assert_eq!(Capacity::exact(usize::MAX, 0).doubled(), None);
}

#[test]
fn push_within_capacity() {
    let mut buf = GeometryBuffer::<u32>::new(Capacity::exact(3, 1)).unwrap();
    assert!(buf.is_empty());
    for i in 0..3 {
        assert_eq!(vertex(&mut buf, i).unwrap(), i as u32);
    }
    assert!(matches!(
        vertex(&mut buf, 3),
        Err(BufferError::VertexCapacityExceeded { capacity: 3 })
    ));
    buf.push_triangle([0, 1, 2]).unwrap();
    assert!(matches!(
        buf.push_triangle([2, 1, 0]),
        Err(BufferError::IndexCapacityExceeded { capacity: 3 })
    ));
    assert_eq!(buf.vertex_count(), 3);
    assert_eq!(buf.triangle_count(), 1);
}

#[test]
fn rejects_dangling_index() {
    let mut buf = GeometryBuffer::<u32>::new(Capacity::exact(4, 2)).unwrap();
    vertex(&mut buf, 0).unwrap();
    vertex(&mut buf, 1).unwrap();
    assert!(matches!(
        buf.push_triangle([0, 1, 2]),
        Err(BufferError::DanglingIndex { index: 2, live: 2 })
    ));
    assert_eq!(buf.triangle_count(), 0);
}

#[test]
fn rejects_unaddressable_capacity() {
    assert!(matches!(
        GeometryBuffer::<u8>::new(Capacity::exact(257, 0)),
        Err(BufferError::IndexOverflow { vertices: 257, max: 256 })
    ));
    let mut buf = GeometryBuffer::<u8>::new(Capacity::exact(128, 0)).unwrap();
    buf.grow().unwrap();
    assert!(matches!(buf.grow(), Err(BufferError::IndexOverflow { .. })));
    assert_eq!(buf.capacity().vertices, 256);
}

#[test]
fn reserve_refuses_to_shrink_below_live() {
    let mut buf = GeometryBuffer::<u32>::new(Capacity::exact(4, 0)).unwrap();
    for i in 0..3 {
        vertex(&mut buf, i).unwrap();
    }
    assert!(matches!(
        buf.reserve(Capacity::exact(2, 0)),
        Err(BufferError::ShrinkBelowLive { .. })
    ));
    buf.reserve(Capacity::exact(3, 0)).unwrap();
    assert_eq!(buf.capacity(), Capacity::exact(3, 0));
    assert_eq!(buf.vertex_count(), 3);
}

#[test]
fn reset_restores_initial_capacity() {
    let initial = Capacity::exact(2, 1);
    let mut buf = GeometryBuffer::<u32>::new(initial).unwrap();
    vertex(&mut buf, 0).unwrap();
    buf.grow().unwrap();
    buf.grow().unwrap();
    assert_eq!(buf.capacity(), Capacity::exact(8, 4));
    buf.reset();
    assert!(buf.is_empty());
    assert_eq!(buf.capacity(), initial);
    assert_eq!(buf.initial_capacity(), initial);
}

#[test]
fn detach_moves_contents() {
    let mut buf = GeometryBuffer::<u32>::new(Capacity::exact(3, 1)).unwrap();
    for i in 0..3 {
        vertex(&mut buf, i).unwrap();
    }
    buf.push_triangle([0, 1, 2]).unwrap();
    let frozen = buf.freeze();
    let mesh = buf.detach();
    assert_eq!(mesh, frozen);
    assert_eq!(mesh.vertex_count(), 3);
    assert_eq!(mesh.triangle_count(), 1);
    assert!(buf.is_empty());
}

#[test]
fn replace_sizes_exactly() {
    let mesh = Mesh::<u32>::new(
        vec![point![0.0, 0.0, 0.0], point![1.0, 0.0, 0.0], point![0.0, 1.0, 0.0]],
        vec![vector![0.0, 0.0, 1.0]; 3],
        vec![Texcoord::new(0.0, 0.0); 3],
        vec![0, 1, 2],
    )
    .unwrap();
    let mut buf = GeometryBuffer::<u32>::new(Capacity::exact(64, 64)).unwrap();
    buf.replace(mesh.clone());
    assert_eq!(buf.capacity(), Capacity::exact(3, 1));
    assert_eq!(buf.freeze(), mesh);

    let mut sink = RecordingSink::new();
    buf.publish(&mut sink);
    let last = sink.last().unwrap();
    assert_eq!((last.vertices, last.triangles, last.max_index), (3, 1, Some(2)));
}

#[test]
fn mesh_validation() {
    let p = vec![point![0.0, 0.0, 0.0]; 2];
    assert!(matches!(
        Mesh::<u32>::new(p.clone(), vec![], vec![], vec![]),
        Err(BufferError::LengthMismatch { positions: 2, normals: 0, texcoords: 0 })
    ));
    assert!(matches!(
        Mesh::<u32>::new(
            p.clone(),
            vec![vector![0.0, 0.0, 1.0]; 2],
            vec![Texcoord::new(0.0, 0.0); 2],
            vec![0, 1]
        ),
        Err(BufferError::IncompleteTriangle(2))
    ));
    assert!(matches!(
        Mesh::<u32>::new(
            p,
            vec![vector![0.0, 0.0, 1.0]; 2],
            vec![Texcoord::new(0.0, 0.0); 2],
            vec![0, 1, 2]
        ),
        Err(BufferError::DanglingIndex { index: 2, live: 2 })
    ));
}

/// Growing never moves or changes live entries.
#[quickcheck]
fn grow_preserves_contents(count: u8, grows: u8) -> bool {
    let count = count as usize;
    let triangles = count / 3;
    let mut buf =
        GeometryBuffer::<u32>::new(Capacity::exact(count.max(1), triangles.max(1))).unwrap();
    for i in 0..count {
        vertex(&mut buf, i).unwrap();
    }
    for t in 0..triangles {
        let base = (t * 3) as u32;
        buf.push_triangle([base + 2, base, base + 1]).unwrap();
    }
    let before = buf.freeze();
    let grows = grows % 8;
    for _ in 0..grows {
        buf.grow().unwrap();
    }
    buf.freeze() == before
        && buf.capacity() == Capacity::exact(count.max(1) << grows, triangles.max(1) << grows)
}
