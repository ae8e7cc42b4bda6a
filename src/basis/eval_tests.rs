use approx::{assert_abs_diff_eq, assert_relative_eq};
use ndarray::array;

use crate::auxiliary::molecule::Molecule;
use crate::basis::eval::{BasisEvaluator, GaussianBasis};

fn water() -> Molecule {
    Molecule::from_geometry(&[
        ("O", [0.0, 0.0, 0.0]),
        ("H", [0.0, -0.757, 0.587]),
        ("H", [0.0, 0.757, 0.587]),
    ])
    .unwrap()
}

#[test]
fn test_eval_sto3g_water_layout() {
    let basis = GaussianBasis::sto3g(&water()).unwrap();
    // O: 1s + 2s + 2p, H: 1s each.
    assert_eq!(basis.n_funcs(), 7);
    let descs = basis.descriptors();
    assert_eq!(descs[0].shell, "1s");
    assert_eq!(descs[3].m_label, "2pz");
    assert_eq!(descs[5].element, "H");
}

#[test]
fn test_eval_unsupported_element() {
    let mol = Molecule::from_geometry(&[("Fe", [0.0, 0.0, 0.0])]).unwrap();
    assert!(GaussianBasis::sto3g(&mol).is_err());
}

#[test]
fn test_eval_s_function_maximum_at_centre() {
    let mol = Molecule::from_geometry(&[("H", [0.0, 0.0, 0.0])]).unwrap();
    let basis = GaussianBasis::sto3g(&mol).unwrap();
    let points = array![[0.0, 0.0, 0.0], [0.0, 0.0, 0.5], [0.0, 0.0, 1.5]];
    let values = basis.eval(points.view());
    assert_eq!(values.dim(), (3, 1));
    assert!(values[[0, 0]] > values[[1, 0]]);
    assert!(values[[1, 0]] > values[[2, 0]]);
    assert!(values[[2, 0]] > 0.0);
}

#[test]
fn test_eval_p_function_antisymmetry() {
    let mol = Molecule::from_geometry(&[("O", [0.0, 0.0, 0.0])]).unwrap();
    let basis = GaussianBasis::sto3g(&mol).unwrap();
    // Columns: 1s, 2s, 2py, 2pz, 2px.
    let points = array![[0.0, 0.0, 0.4], [0.0, 0.0, -0.4]];
    let values = basis.eval(points.view());
    let pz_plus = values[[0, 3]];
    let pz_minus = values[[1, 3]];
    assert!(pz_plus > 0.0);
    assert_relative_eq!(pz_plus, -pz_minus, max_relative = 1e-12);
    // px and py vanish on the z axis.
    assert_abs_diff_eq!(values[[0, 2]], 0.0);
    assert_abs_diff_eq!(values[[0, 4]], 0.0);
}

#[test]
fn test_eval_s_functions_even() {
    let basis = GaussianBasis::sto3g(&water()).unwrap();
    // The oxygen 1s amplitude is invariant under reflection through the molecular (yz) plane.
    let points = array![[0.3, 0.1, 0.2], [-0.3, 0.1, 0.2]];
    let values = basis.eval(points.view());
    assert_relative_eq!(values[[0, 0]], values[[1, 0]], max_relative = 1e-12);
}
