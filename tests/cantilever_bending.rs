use approx::assert_relative_eq;
use vlasov_fea::prelude::*;
use vlasov_fea::wire::cantilever_model;

const P: f64 = 1000.0;
const L: f64 = 2.0;
const E: f64 = 210e9;
const I: f64 = 1e-5;

fn env_usize(name: &str, default_val: usize) -> usize {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .filter(|&v| v > 0)
        .unwrap_or(default_val)
}

fn tip_deflection(n_elems: usize) -> f64 {
    let req = CantileverRequest {
        n_elems,
        ..Default::default()
    };
    let resp = solve_cantilever(&req).unwrap();
    *resp.uz.last().unwrap()
}

#[test]
fn cantilever_tip_deflection_converges() {
    // Euler-Bernoulli tip deflection P·L³/(3·E·I) ≈ 1.27e-3 m
    let expected = P * L.powi(3) / (3.0 * E * I);
    for n in [1, 2, 5, 10] {
        let uz = tip_deflection(n);
        assert_relative_eq!(uz, expected, max_relative = 0.02);
    }
}

#[test]
fn cantilever_deflection_curve_matches_closed_form() {
    let resp = solve_cantilever(&CantileverRequest::default()).unwrap();
    for (x, uz) in resp.x.iter().zip(&resp.uz) {
        // w(x) = P·x²·(3L − x)/(6EI)
        let expected = P * x * x * (3.0 * L - x) / (6.0 * E * I);
        assert_relative_eq!(*uz, expected, epsilon = 1e-9, max_relative = 1e-6);
    }
}

#[test]
fn cantilever_reactions_and_residual() {
    let model = cantilever_model(&CantileverRequest::default()).unwrap();
    let result = StaticSolver::new(&model).solve().unwrap();

    let scale = P * L;
    assert!(result.residual_norm <= 1e-9 * scale);

    let root = result.node_reactions(&model, 0).unwrap();
    assert_relative_eq!(root.fz, -P, max_relative = 1e-9);
    // Moment about Y balancing the tip load at x = L
    assert_relative_eq!(root.my, P * L, max_relative = 1e-9);
    assert!(root.fx.abs() < 1e-6);

    // Pure bending: no axial force in any element
    assert!(result.axial_forces.iter().all(|n| n.abs() < 1e-6));
}

#[test]
fn skew_cantilever_matches_axis_aligned() {
    // Same cantilever rotated into a general direction; the tip displacement
    // along the load keeps the closed-form magnitude
    let dir = nalgebra::Vector3::new(1.0, 2.0, 2.0).normalize();
    let n = 6;
    let section = Section::new(1e-3, I, I, 1e-6, 1e-8);

    let mut model = Model::new();
    for i in 0..=n {
        let p = dir * (L * i as f64 / n as f64);
        model.add_node(Node::new(i, p.x, p.y, p.z)).unwrap();
    }
    for i in 0..n {
        let a = *model.node(i).unwrap();
        let b = *model.node(i + 1).unwrap();
        model
            .add_element(Beam3D::new(&a, &b, Material::steel(), section).unwrap())
            .unwrap();
    }
    model.add_support(0, Support::fixed()).unwrap();

    // Load perpendicular to the member
    let load = nalgebra::Vector3::new(2.0, -1.0, 0.0).normalize() * P;
    model
        .add_load(n, NodeLoad::force(load.x, load.y, load.z))
        .unwrap();

    let result = StaticSolver::new(&model).solve().unwrap();
    let tip = result.node_displacement(&model, n).unwrap();
    let along_load = (tip.ux * load.x + tip.uy * load.y + tip.uz * load.z) / P;
    assert_relative_eq!(along_load, P * L.powi(3) / (3.0 * E * I), max_relative = 1e-6);
    // No twist about the member axis
    let twist = tip.rx * dir.x + tip.ry * dir.y + tip.rz * dir.z;
    assert!(twist.abs() < 1e-9);
}

#[test]
#[ignore]
fn cantilever_convergence_report() {
    // Run with:
    //   cargo test --test cantilever_bending cantilever_convergence_report -- --ignored --nocapture
    let max_n = env_usize("VLASOV_MAX_ELEMS", 20);
    let expected = P * L.powi(3) / (3.0 * E * I);
    println!("n_elems,uz_tip,rel_error");
    for n in 1..=max_n {
        let uz = tip_deflection(n);
        println!("{n},{uz:.9e},{:.3e}", (uz - expected).abs() / expected);
    }
}
