//! Vlasov FEA Example - warping torsion of a cantilever and column buckling

use std::f64::consts::PI;

use anyhow::{Context, Result};
use vlasov_fea::prelude::*;

const E: f64 = 210e9;
const G: f64 = 80e9;

/// Straight member along global X split into `n` equal elements
fn straight_member(length: f64, n: usize, section: Section) -> Result<Model> {
    let mut model = Model::new();
    for i in 0..=n {
        model.add_node(Node::new(i, length * i as f64 / n as f64, 0.0, 0.0))?;
    }
    for i in 0..n {
        let a = *model.node(i).context("missing node")?;
        let b = *model.node(i + 1).context("missing node")?;
        model.add_element(Beam3D::new(&a, &b, Material::new(E, G), section)?)?;
    }
    Ok(model)
}

fn tip_twist(support: Support, section: Section, torsion: TorsionFormulation) -> Result<f64> {
    let (length, n) = (2.0, 10);
    let mut model = straight_member(length, n, section)?;
    model.add_support(0, support)?;
    model.add_load(n, NodeLoad::torque(1000.0))?;

    let result = StaticSolver::new(&model)
        .with_options(AnalysisOptions::linear().with_torsion(torsion))
        .solve()
        .context("torsion analysis failed")?;
    result
        .dof(&model, n, Dof::Rx)
        .context("tip node has no twist DOF")
}

fn torsion_example() -> Result<()> {
    println!("=== Torsion of a Cantilever I-Beam with Warping ===\n");

    // IPE 300 (approximate)
    let section = Section::new(53.8e-4, 6.04e-6, 83.6e-6, 2.01e-7, 1.26e-7);
    let (torque, length) = (1000.0, 2.0);

    let restrained = tip_twist(Support::fixed(), section, TorsionFormulation::Hermite)?;
    let free = tip_twist(Support::fixed_free_warping(), section, TorsionFormulation::Hermite)?;
    let exact = tip_twist(Support::fixed(), section, TorsionFormulation::Exact)?;

    let k = section.torsion_parameter(&Material::new(E, G));
    let theta_sv = torque * length / (G * section.j);
    let theta_vlasov = torque / (G * section.j) * (length - (k * length).tanh() / k);

    println!("Tip twist (restrained warping, Hermite): {:.6} rad", restrained);
    println!("Tip twist (restrained warping, exact):   {:.6} rad", exact);
    println!("Tip twist (free warping):                {:.6} rad", free);
    println!("Ratio free / restrained:                 {:.2}", free / restrained);
    println!();
    println!("Analytical St. Venant  T·L/(G·J):        {:.6} rad", theta_sv);
    println!("Analytical Vlasov:                       {:.6} rad", theta_vlasov);
    println!(
        "Free warping vs St. Venant:              {:.3}%",
        (free - theta_sv).abs() / theta_sv * 100.0
    );
    println!(
        "Restrained warping vs Vlasov:            {:.3}%\n",
        (restrained - theta_vlasov).abs() / theta_vlasov * 100.0
    );
    Ok(())
}

fn buckling_example() -> Result<()> {
    println!("=== Euler Buckling of a Pinned Column ===\n");

    let section = Section::new(1e-3, 1e-6, 2e-5, 5e-7, 1e-8);
    let (length, n) = (4.0, 4);
    let mut model = straight_member(length, n, section)?;

    // Fork supports at both ends, axial movement free at the top
    model.add_support(0, Support::fork())?;
    model.add_support(n, Support::fork().release(Dof::Ux))?;
    model.add_load(n, NodeLoad::force(-1.0, 0.0, 0.0))?;

    let pre = StaticSolver::new(&model).solve()?;
    let result = BucklingSolver::from_static(&model, &pre)
        .with_options(AnalysisOptions::buckling(3).with_logging())
        .solve()
        .context("buckling analysis failed")?;

    println!("Buckling load factors (unit reference load):");
    for (i, mode) in result.modes.iter().enumerate() {
        println!("  Mode {}: P_cr = {:.2} N", i + 1, mode.load_factor);
    }

    let p_weak = PI.powi(2) * E * section.iy / length.powi(2);
    let p_strong = PI.powi(2) * E * section.iz / length.powi(2);
    let p_torsional =
        (G * section.j + PI.powi(2) * E * section.cw / length.powi(2)) / section.polar_radius_sq();

    println!();
    println!("Theoretical flexural (weak axis):   {:.2} N", p_weak);
    println!("Theoretical flexural (strong axis): {:.2} N", p_strong);
    println!("Theoretical torsional:              {:.2} N", p_torsional);

    let p_min = p_weak.min(p_strong).min(p_torsional);
    if let Some(p_cr) = result.critical_load_factor() {
        println!(
            "Lowest mode vs theory: {:.2}%",
            (p_cr - p_min).abs() / p_min * 100.0
        );
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    torsion_example()?;
    buckling_example()?;

    println!("\n=== Analysis Complete ===");
    Ok(())
}
