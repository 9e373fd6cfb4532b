use criterion::{black_box, criterion_group, criterion_main, Criterion};

use petgraph::graph::NodeIndex;

use stereocip::{label, Atom, AtomId, Bond, Mol, StereoConfig, StereoElement, Winding};

fn ch(atomic_num: u8, hydrogen_count: u8) -> Atom {
    Atom {
        atomic_num,
        hydrogen_count,
        ..Atom::default()
    }
}

/// C bonded to F, Cl, Br with one implicit H.
fn simple_center() -> Mol<Atom, Bond> {
    let mut mol = Mol::new();
    let c = mol.add_atom(ch(6, 1));
    let mut ligands = Vec::new();
    for z in [9u8, 17, 35] {
        let x = mol.add_atom(ch(z, 0));
        mol.add_bond(c, x, Bond::default());
        ligands.push(AtomId::Node(x));
    }
    mol.add_stereo_element(StereoElement::Tetrahedral {
        focus: c,
        ligands: [ligands[0], ligands[1], ligands[2], AtomId::VirtualH(c, 0)],
        winding: Winding::Cw,
    });
    mol
}

/// A chain of substituted rings: every ring carries one fluorinated corner
/// with a defined winding, so labeling does real comparator work.
fn ring_chain(rings: usize) -> Mol<Atom, Bond> {
    let mut mol = Mol::new();
    let mut previous: Option<NodeIndex> = None;
    for _ in 0..rings {
        let corners: Vec<NodeIndex> = (0..5).map(|_| mol.add_atom(ch(6, 2))).collect();
        for i in 0..5 {
            mol.add_bond(corners[i], corners[(i + 1) % 5], Bond::default());
        }
        let focus = corners[0];
        mol.atom_mut(focus).hydrogen_count = 0;
        let f = mol.add_atom(ch(9, 0));
        mol.add_bond(focus, f, Bond::default());
        if let Some(prev) = previous {
            mol.add_bond(prev, focus, Bond::default());
            mol.add_stereo_element(StereoElement::Tetrahedral {
                focus,
                ligands: [
                    AtomId::Node(f),
                    AtomId::Node(prev),
                    AtomId::Node(corners[1]),
                    AtomId::Node(corners[4]),
                ],
                winding: Winding::Cw,
            });
        } else {
            mol.atom_mut(focus).hydrogen_count = 1;
            mol.add_stereo_element(StereoElement::Tetrahedral {
                focus,
                ligands: [
                    AtomId::Node(f),
                    AtomId::Node(corners[1]),
                    AtomId::Node(corners[4]),
                    AtomId::VirtualH(focus, 0),
                ],
                winding: Winding::Cw,
            });
        }
        previous = Some(focus);
    }
    mol
}

fn bench_label(c: &mut Criterion) {
    let config = StereoConfig::default();
    let mut group = c.benchmark_group("label");

    group.bench_function("simple_center", |b| {
        let mol = simple_center();
        b.iter(|| {
            let mut mol = mol.clone();
            label(black_box(&mut mol), &config).unwrap()
        })
    });
    group.bench_function("ring_chain_4", |b| {
        let mol = ring_chain(4);
        b.iter(|| {
            let mut mol = mol.clone();
            label(black_box(&mut mol), &config).unwrap()
        })
    });
    group.bench_function("ring_chain_16", |b| {
        let mol = ring_chain(16);
        b.iter(|| {
            let mut mol = mol.clone();
            label(black_box(&mut mol), &config).unwrap()
        })
    });

    group.finish();
}

criterion_group!(benches, bench_label);
criterion_main!(benches);
