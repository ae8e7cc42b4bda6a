use crate::auxiliary::molecule::Molecule;
use crate::basis::{BasisLayout, BasisShell};

#[test]
fn test_basis_shell_labels() {
    assert_eq!(BasisShell::new(1, 0).label(), "1s");
    assert_eq!(BasisShell::new(2, 1).label(), "2p");
    assert_eq!(BasisShell::new(3, 2).label(), "3d");
    assert_eq!(BasisShell::new(2, 1).n_funcs(), 3);
    assert_eq!(BasisShell::new(1, 0).m_labels(), vec!["1s"]);
    assert_eq!(BasisShell::new(2, 1).m_labels(), vec!["2py", "2pz", "2px"]);
}

#[test]
fn test_basis_layout_descriptors() {
    let mol = Molecule::from_geometry(&[
        ("O", [0.0, 0.0, 0.0]),
        ("H", [0.0, -0.757, 0.587]),
        ("H", [0.0, 0.757, 0.587]),
    ])
    .unwrap();
    let layout = BasisLayout::new(
        &mol.atoms,
        vec![
            vec![
                BasisShell::new(1, 0),
                BasisShell::new(2, 0),
                BasisShell::new(2, 1),
            ],
            vec![BasisShell::new(1, 0)],
            vec![BasisShell::new(1, 0)],
        ],
    );
    assert_eq!(layout.n_funcs(), 7);
    let descs = layout.descriptors();
    assert_eq!(descs.len(), 7);
    assert_eq!(descs[0].element, "O");
    assert_eq!(descs[0].shell, "1s");
    assert_eq!(descs[2].shell, "2p");
    assert_eq!(descs[2].m_label, "2py");
    assert_eq!(descs[4].m_label, "2px");
    assert_eq!(descs[5].atom_index, 1);
    assert_eq!(descs[6].atom_index, 2);
    assert_eq!(descs[6].element, "H");
}
