//! # Micromechanics Formulas
//!
//! Homogenization formulas that turn constituent properties and volume
//! fractions into lamina properties. Every function has the same shape,
//! `(fiber, matrix, vf, vm) -> f64`, so it can be stored in the registry
//! as a plain function pointer.
//!
//! ## Notation
//!
//! - `Vf`, `Vm` = fiber and matrix volume fractions
//! - `E1`, `E2` = longitudinal and transverse moduli
//! - `G12`, `G23` = in-plane and transverse shear moduli
//! - `nu12`, `nu21`, `nu23` = Poisson ratios
//! - subscript `f` = fiber, `m` = matrix
//!
//! ## Domain
//!
//! No input is validated. `Vf = 0` or `Vm = 0` in a denominator yields
//! infinity or NaN per IEEE-754, and that value is returned as-is.
//!
//! ## References
//!
//! - Barbero, Introduction to Composite Materials Design, Ch. 4
//! - Chamis, Simplified Composite Micromechanics Equations, NASA TM-83320
//! - Halpin & Kardos, The Halpin-Tsai Equations: A Review (1976)
//! - Hashin & Rosen, The Elastic Moduli of Fiber-Reinforced Materials (1964)

use crate::materials::{FiberProperties, MatrixProperties};

/// Halpin-Tsai reinforcement parameter for the transverse modulus
pub const HALPIN_TSAI_XI_E2: f64 = 2.0;

/// Halpin-Tsai reinforcement parameter for the in-plane shear modulus
pub const HALPIN_TSAI_XI_G12: f64 = 1.0;

// =============================================================================
// LONGITUDINAL MODULUS E1
// =============================================================================

/// Longitudinal modulus by the rule of mixtures (Voigt bound).
///
/// # Formula
/// E1 = E1f·Vf + Em·Vm
///
/// # Example
/// ```rust
/// use compwing_core::materials::MaterialCatalog;
/// use compwing_core::micromechanics::formulas::e1_rule_of_mixtures;
///
/// let catalog = MaterialCatalog::builtin().unwrap();
/// let f = catalog.resolve_fiber("T-300").unwrap();
/// let m = catalog.resolve_matrix("3501-6").unwrap();
/// let e1 = e1_rule_of_mixtures(f, m, 0.55, 0.425);
/// assert!((e1 - (230.0 * 0.55 + 4.2 * 0.425)).abs() < 1e-9);
/// ```
#[inline]
pub fn e1_rule_of_mixtures(f: &FiberProperties, m: &MatrixProperties, vf: f64, vm: f64) -> f64 {
    f.e1f * vf + m.em * vm
}

/// Longitudinal modulus by the inverse rule of mixtures (Reuss bound).
///
/// # Formula
/// 1/E1 = Vf/E1f + Vm/Em
#[inline]
pub fn e1_inverse_rule_of_mixtures(f: &FiberProperties, m: &MatrixProperties, vf: f64, vm: f64) -> f64 {
    1.0 / (vf / f.e1f + vm / m.em)
}

/// Longitudinal modulus, Halpin-Tsai form as tabulated for this tool.
///
/// # Formula
/// E1 = E1f·Em / (Vf·Em + Vm·E1f)
///
/// Algebraically this coincides with the inverse rule of mixtures. It is
/// kept as its own theory so existing result tables keep their columns.
#[inline]
pub fn e1_halpin_tsai(f: &FiberProperties, m: &MatrixProperties, vf: f64, vm: f64) -> f64 {
    (f.e1f * m.em) / (vf * m.em + vm * f.e1f)
}

// =============================================================================
// TRANSVERSE MODULUS E2
// =============================================================================

/// Transverse modulus by the (series) rule of mixtures.
///
/// # Formula
/// E2 = E2f·Em / (Em·Vf + E2f·Vm)
#[inline]
pub fn e2_rule_of_mixtures(f: &FiberProperties, m: &MatrixProperties, vf: f64, vm: f64) -> f64 {
    (f.e2f * m.em) / (m.em * vf + f.e2f * vm)
}

/// Transverse modulus by the Chamis square-packing model.
///
/// # Formula
/// E2 = Em / (1 - √Vf·(1 - Em/E2f))
///
/// # Example
/// ```rust
/// use compwing_core::materials::MaterialCatalog;
/// use compwing_core::micromechanics::formulas::e2_chamis;
///
/// let catalog = MaterialCatalog::builtin().unwrap();
/// let f = catalog.resolve_fiber("T-300").unwrap();
/// let m = catalog.resolve_matrix("3501-6").unwrap();
/// let expected = 4.2 / (1.0 - 0.55_f64.sqrt() * (1.0 - 4.2 / 15.0));
/// assert_eq!(e2_chamis(f, m, 0.55, 0.425), expected);
/// ```
#[inline]
pub fn e2_chamis(f: &FiberProperties, m: &MatrixProperties, vf: f64, _vm: f64) -> f64 {
    m.em / (1.0 - vf.sqrt() * (1.0 - m.em / f.e2f))
}

/// Transverse modulus by Halpin-Tsai with ξ = 2 (circular fibers, square array).
///
/// # Formula
/// η = (E2f/Em - 1) / (E2f/Em + ξ)
/// E2 = Em·(1 + ξ·η·Vf) / (1 - η·Vf)
#[inline]
pub fn e2_halpin_tsai(f: &FiberProperties, m: &MatrixProperties, vf: f64, _vm: f64) -> f64 {
    halpin_tsai(f.e2f, m.em, HALPIN_TSAI_XI_E2, vf)
}

// =============================================================================
// IN-PLANE SHEAR MODULUS G12
// =============================================================================

/// In-plane shear modulus by the (series) rule of mixtures.
///
/// # Formula
/// G12 = G12f·Gm / (Gm·Vf + G12f·Vm)
#[inline]
pub fn g12_rule_of_mixtures(f: &FiberProperties, m: &MatrixProperties, vf: f64, vm: f64) -> f64 {
    (f.g12f * m.gm) / (m.gm * vf + f.g12f * vm)
}

/// In-plane shear modulus by the Chamis model.
///
/// # Formula
/// G12 = Gm / (1 - √Vf·(1 - Gm/G12f))
#[inline]
pub fn g12_chamis(f: &FiberProperties, m: &MatrixProperties, vf: f64, _vm: f64) -> f64 {
    m.gm / (1.0 - vf.sqrt() * (1.0 - m.gm / f.g12f))
}

/// In-plane shear modulus by Halpin-Tsai with ξ = 1.
#[inline]
pub fn g12_halpin_tsai(f: &FiberProperties, m: &MatrixProperties, vf: f64, _vm: f64) -> f64 {
    halpin_tsai(f.g12f, m.gm, HALPIN_TSAI_XI_G12, vf)
}

/// In-plane shear modulus by the Hashin-Rosen composite cylinder assemblage.
///
/// # Formula
/// G12 = Gm·[(1+Vf)·G12f + (1-Vf)·Gm] / [(1-Vf)·G12f + (1+Vf)·Gm]
///
/// The cylinder model has no void phase, so only `Vf` enters.
#[inline]
pub fn g12_hashin_rosen(f: &FiberProperties, m: &MatrixProperties, vf: f64, _vm: f64) -> f64 {
    m.gm * ((1.0 + vf) * f.g12f + (1.0 - vf) * m.gm) / ((1.0 - vf) * f.g12f + (1.0 + vf) * m.gm)
}

// =============================================================================
// TRANSVERSE SHEAR MODULUS G23
// =============================================================================

/// Transverse shear modulus by the Chamis model.
///
/// # Formula
/// G23 = Gm / (1 - √Vf·(1 - Gm/G23f))
#[inline]
pub fn g23_chamis(f: &FiberProperties, m: &MatrixProperties, vf: f64, _vm: f64) -> f64 {
    m.gm / (1.0 - vf.sqrt() * (1.0 - m.gm / f.g23f))
}

// =============================================================================
// POISSON RATIOS
// =============================================================================

/// Major Poisson ratio by the rule of mixtures.
///
/// # Formula
/// ν12 = ν12f·Vf + νm·Vm
#[inline]
pub fn nu12_rule_of_mixtures(f: &FiberProperties, m: &MatrixProperties, vf: f64, vm: f64) -> f64 {
    f.nu12f * vf + m.num * vm
}

/// Minor Poisson ratio from symmetry of the compliance matrix.
///
/// # Formula
/// ν21 = ν12·E2 / E1
///
/// The three inputs are always computed with fixed theories: ν12 and E1 by
/// the rule of mixtures, E2 by Chamis. The registry is never consulted, so
/// the theory chosen for display elsewhere does not change this value.
#[inline]
pub fn nu21_symmetry(f: &FiberProperties, m: &MatrixProperties, vf: f64, vm: f64) -> f64 {
    let e1 = e1_rule_of_mixtures(f, m, vf, vm);
    let e2 = e2_chamis(f, m, vf, vm);
    let nu12 = nu12_rule_of_mixtures(f, m, vf, vm);
    nu12 * e2 / e1
}

/// Transverse Poisson ratio from transverse isotropy.
///
/// # Formula
/// ν23 = E2 / (2·G23) - 1
///
/// E2 and G23 are both fixed to the Chamis model.
#[inline]
pub fn nu23_symmetry(f: &FiberProperties, m: &MatrixProperties, vf: f64, vm: f64) -> f64 {
    let e2 = e2_chamis(f, m, vf, vm);
    let g23 = g23_chamis(f, m, vf, vm);
    e2 / (2.0 * g23) - 1.0
}

// =============================================================================
// HELPERS
// =============================================================================

/// Generic Halpin-Tsai interpolation between a fiber and matrix modulus.
fn halpin_tsai(fiber_modulus: f64, matrix_modulus: f64, xi: f64, vf: f64) -> f64 {
    let ratio = fiber_modulus / matrix_modulus;
    let eta = (ratio - 1.0) / (ratio + xi);
    matrix_modulus * (1.0 + xi * eta * vf) / (1.0 - eta * vf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::constituents::fixtures::{epoxy_3501_6, t300};

    const VF: f64 = 0.55;
    const VM: f64 = 0.425;

    #[test]
    fn test_e1_rom_reference_value() {
        let e1 = e1_rule_of_mixtures(&t300(), &epoxy_3501_6(), VF, VM);
        assert!((e1 - (230.0 * 0.55 + 4.2 * 0.425)).abs() < 1e-9);
        assert!((e1 - 128.285).abs() < 1e-9);
    }

    #[test]
    fn test_e1_rom_is_affine_in_vf() {
        let (f, m) = (t300(), epoxy_3501_6());
        let vvoid = 0.025;
        let e1 = |vf: f64| e1_rule_of_mixtures(&f, &m, vf, 1.0 - vf - vvoid);

        let samples = [0.3, 0.45, 0.6, 0.7];
        let slope = (e1(samples[3]) - e1(samples[0])) / (samples[3] - samples[0]);
        for vf in samples {
            let interpolated = e1(samples[0]) + slope * (vf - samples[0]);
            assert!((e1(vf) - interpolated).abs() < 1e-9, "not affine at Vf={}", vf);
        }
        // Slope of E1f*Vf + Em*(1 - Vf - Vvoid) is E1f - Em
        assert!((slope - (230.0 - 4.2)).abs() < 1e-9);
    }

    #[test]
    fn test_e1_inverse_rom_matches_halpin_tsai_column() {
        let (f, m) = (t300(), epoxy_3501_6());
        let inverse = e1_inverse_rule_of_mixtures(&f, &m, VF, VM);
        let ht = e1_halpin_tsai(&f, &m, VF, VM);
        assert!((inverse - ht).abs() < 1e-9);
        // Reuss bound sits below the Voigt bound
        assert!(inverse < e1_rule_of_mixtures(&f, &m, VF, VM));
    }

    #[test]
    fn test_e2_chamis_reference_value() {
        let e2 = e2_chamis(&t300(), &epoxy_3501_6(), VF, VM);
        let expected = 4.2 / (1.0 - VF.sqrt() * (1.0 - 4.2 / 15.0));
        assert_eq!(e2, expected);
    }

    #[test]
    fn test_e2_halpin_tsai_limits() {
        let (f, m) = (t300(), epoxy_3501_6());
        // Vf = 0 gives the matrix, Vf = 1 gives the fiber
        assert!((e2_halpin_tsai(&f, &m, 0.0, 1.0) - m.em).abs() < 1e-12);
        assert!((e2_halpin_tsai(&f, &m, 1.0, 0.0) - f.e2f).abs() < 1e-9);
    }

    #[test]
    fn test_g12_theories_between_constituents() {
        let (f, m) = (t300(), epoxy_3501_6());
        for g in [
            g12_rule_of_mixtures(&f, &m, VF, VM),
            g12_chamis(&f, &m, VF, VM),
            g12_halpin_tsai(&f, &m, VF, VM),
            g12_hashin_rosen(&f, &m, VF, VM),
        ] {
            assert!(g > m.gm && g < f.g12f, "G12 = {} outside constituent range", g);
        }
    }

    #[test]
    fn test_hashin_rosen_equals_halpin_tsai_xi_one() {
        // With xi = 1 the Halpin-Tsai shear estimate reduces to Hashin-Rosen
        let (f, m) = (t300(), epoxy_3501_6());
        let hr = g12_hashin_rosen(&f, &m, VF, VM);
        let ht = g12_halpin_tsai(&f, &m, VF, VM);
        assert!((hr - ht).abs() < 1e-9);
    }

    #[test]
    fn test_nu12_rom() {
        let nu12 = nu12_rule_of_mixtures(&t300(), &epoxy_3501_6(), VF, VM);
        assert!((nu12 - 0.2545).abs() < 1e-12);
    }

    #[test]
    fn test_nu21_uses_fixed_theories() {
        let (f, m) = (t300(), epoxy_3501_6());
        let expected = nu12_rule_of_mixtures(&f, &m, VF, VM) * e2_chamis(&f, &m, VF, VM)
            / e1_rule_of_mixtures(&f, &m, VF, VM);
        assert_eq!(nu21_symmetry(&f, &m, VF, VM), expected);
        assert!(nu21_symmetry(&f, &m, VF, VM) < 0.05);
    }

    #[test]
    fn test_nu23_from_chamis() {
        let (f, m) = (t300(), epoxy_3501_6());
        let expected = e2_chamis(&f, &m, VF, VM) / (2.0 * g23_chamis(&f, &m, VF, VM)) - 1.0;
        assert_eq!(nu23_symmetry(&f, &m, VF, VM), expected);
    }

    #[test]
    fn test_degenerate_fractions_are_not_guarded() {
        let (f, m) = (t300(), epoxy_3501_6());
        // x/0 in the series rule when both fractions vanish
        assert!(e2_rule_of_mixtures(&f, &m, 0.0, 0.0).is_infinite());
        // 1/0 in the inverse rule
        assert!(e1_inverse_rule_of_mixtures(&f, &m, 0.0, 0.0).is_infinite());
        // sqrt of a negative fraction
        assert!(e2_chamis(&f, &m, -0.1, 1.1).is_nan());
    }
}
