use crate::somelinalg::gauss_jordan_numeric;
use crate::somelinalg::gauss_jordan_symbolic;
use crate::somelinalg::linear_sys_diagnostics::{linear_system_diagnostics, residual_norm};
use crate::somelinalg::linear_system::{LinearSystem, SolverConfig, SolverMethod};
use crate::symbolic::complex_core::{ComplexCore, IMAGINARY_ONE};
use crate::symbolic::expression::{Expression, constant_matrix, constant_vector, evaluate_vector};
use crate::symbolic::variable::VariableSource;
use nalgebra::{DMatrix, DVector};
use num_complex::Complex64;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::PI;
use std::time::Instant;

/// random complex system with a dominant diagonal, so it is never singular
pub fn random_system(n: usize, seed: u64) -> (DMatrix<Complex64>, DVector<Complex64>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut random_complex =
        || Complex64::new(rng.random_range(-1.0..1.0), rng.random_range(-1.0..1.0));
    let mut a = DMatrix::from_fn(n, n, |_, _| random_complex());
    for i in 0..n {
        a[(i, i)] += Complex64::new(n as f64, 0.0);
    }
    let b = DVector::from_fn(n, |_, _| random_complex());
    (a, b)
}

/// Admittance system of a DC circuit: current source I into node 1, G1 from node 1 to ground,
/// G2 between the nodes, G3 from node 2 to ground
pub fn two_node_circuit(
    i: &VariableSource,
    g1: &VariableSource,
    g2: &VariableSource,
    g3: &VariableSource,
) -> (DMatrix<Expression>, DVector<Expression>) {
    let (i, g1, g2, g3) = (
        Expression::from(i),
        Expression::from(g1),
        Expression::from(g2),
        Expression::from(g3),
    );
    let a = DMatrix::from_row_slice(
        2,
        2,
        &[&g1 + &g2, -&g2, -&g2, &g2 + &g3],
    );
    let b = DVector::from_vec(vec![i, Expression::zero()]);
    (a, b)
}

pub fn linear_sys_examples(example: usize) {
    match example {
        0 => {
            // solve the circuit once, then evaluate the node voltages for other element values
            let i = VariableSource::labeled("I", Complex64::new(1.0, 0.0));
            let g1 = VariableSource::labeled("G1", Complex64::new(0.1, 0.0));
            let g2 = VariableSource::labeled("G2", Complex64::new(0.2, 0.0));
            let g3 = VariableSource::labeled("G3", Complex64::new(0.5, 0.0));
            let (a, b) = two_node_circuit(&i, &g1, &g2, &g3);
            let voltages = match gauss_jordan_symbolic::solved(a, b) {
                Ok(voltages) => voltages,
                Err(e) => {
                    println!("circuit cannot be solved: {}", e);
                    return;
                }
            };
            println!("U1 = {}", voltages[0]);
            println!("U2 = {}", voltages[1]);
            for step in 1..=5 {
                i.set_value(Complex64::new(step as f64, 0.0));
                g3.set_value(Complex64::new(0.1 * step as f64, 0.0));
                let u = evaluate_vector(&voltages);
                println!(
                    "I = {} A, G3 = {} S: U1 = {} V, U2 = {} V",
                    i.value().to_pretty_string(),
                    g3.value().to_pretty_string(),
                    u[0].round_to(1e-6).to_pretty_string(),
                    u[1].round_to(1e-6).to_pretty_string()
                );
            }
        }
        1 => {
            // RC low-pass filter: (1/R + jwC) U = Us/R, swept over frequency
            let r = 1e3;
            let c = 1e-6;
            let us = VariableSource::labeled("Us", Complex64::new(1.0, 0.0));
            let conductance = VariableSource::labeled("1/R", Complex64::new(1.0 / r, 0.0));
            let susceptance = VariableSource::labeled("jwC", Complex64::new(0.0, 0.0));
            let a = DMatrix::from_element(
                1,
                1,
                Expression::from(&conductance) + Expression::from(&susceptance),
            );
            let b = DVector::from_element(
                1,
                Expression::from(&us) * Expression::from(&conductance),
            );
            let u = match gauss_jordan_symbolic::solved(a, b) {
                Ok(u) => u,
                Err(e) => {
                    println!("filter cannot be solved: {}", e);
                    return;
                }
            };
            println!("U = {}", u[0]);
            for f in [10.0, 100.0, 159.15, 1e3, 1e4] {
                let w = 2.0 * PI * f;
                susceptance.set_value(IMAGINARY_ONE * w * c);
                let value = u[0].evaluate();
                let exact = Complex64::new(1.0, 0.0) / Complex64::new(1.0, w * r * c);
                println!(
                    "f = {:>8} Hz: |U| = {:.6}, phase = {:>8.3} deg, error = {:.2e}",
                    f,
                    value.magnitude(),
                    value.arg().to_degrees(),
                    (value - exact).magnitude()
                );
            }
        }
        2 => {
            // disconnected nodes produce 0 = 0 equations
            let task = r#"
            solver
            method: numeric
            ignore_identity_equations: true
            loglevel: info
            system
            unknowns: u1, u2, u3, u4, u5, u6
            row0: 1, 2, 0, 1, 0, 1
            row1: 1, 1, 0, 0, 0, 1
            row2: 0, 0, 0, 0, 0, 0
            row3: 1, 0, 0, 0, 0, 2
            row4: 0, 0, 0, 0, 0, 0
            row5: 2, 1, 0, 0, 0, 0
            free_terms: 0, 0, 0, 5, 0, 4
            "#;
            let mut system = match LinearSystem::from_task(task) {
                Ok(system) => system,
                Err(e) => {
                    println!("invalid task: {}", e);
                    return;
                }
            };
            match system.solve() {
                Ok(x) => {
                    println!("identity equations: {:?}", system.identity_equations());
                    for (name, value) in system.unknowns.iter().zip(x.iter()) {
                        println!("{} = {}", name, value.round_to(1e-9).to_pretty_string());
                    }
                }
                Err(e) => println!("solution failed: {}", e),
            }
            // without removal the same system is singular
            system.config.ignore_identity_equations = false;
            if let Err(e) = system.solver() {
                println!("without identity removal: {}", e);
            }
        }
        3 => {
            // numeric and symbolic engines on random systems
            for n in [2, 4, 8, 12, 16] {
                let (a, b) = random_system(n, n as u64);
                if !linear_system_diagnostics(&a, &b, 1e8) {
                    println!("n = {}: system skipped", n);
                    continue;
                }
                let begin = Instant::now();
                let numeric = gauss_jordan_numeric::solved(a.clone(), b.clone(), false);
                let numeric_time = begin.elapsed();
                let begin = Instant::now();
                let symbolic =
                    gauss_jordan_symbolic::solved(constant_matrix(&a), constant_vector(&b));
                let symbolic_time = begin.elapsed();
                match (numeric, symbolic) {
                    (Ok(x), Ok(expressions)) => {
                        let nodes: usize = expressions.iter().map(Expression::distinct_node_count).sum();
                        let y = evaluate_vector(&expressions);
                        println!(
                            "n = {:>3}: numeric {:?} (residual {:.2e}), symbolic {:?} ({} nodes, residual {:.2e}), |x - y| = {:.2e}",
                            n,
                            numeric_time,
                            residual_norm(&a, &x, &b),
                            symbolic_time,
                            nodes,
                            residual_norm(&a, &y, &b),
                            (x - y).norm()
                        );
                    }
                    (numeric, symbolic) => {
                        println!("n = {}: {:?} {:?}", n, numeric.err(), symbolic.err())
                    }
                }
            }
        }
        4 => {
            // the same system through the driver with both methods
            let (a, b) = random_system(6, 42);
            for method in [SolverMethod::Numeric, SolverMethod::Symbolic] {
                let config = SolverConfig {
                    method,
                    loglevel: Some("info".to_string()),
                    ..SolverConfig::default()
                };
                match LinearSystem::new(a.clone(), b.clone(), config) {
                    Ok(mut system) => match system.solve() {
                        Ok(_) => println!("{}: residual {:?}", method, system.residual()),
                        Err(e) => println!("{}: {}", method, e),
                    },
                    Err(e) => println!("{}: {}", method, e),
                }
            }
        }
        _ => {
            println!("example {} does not exist", example);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_node_circuit() {
        let i = VariableSource::labeled("I", Complex64::new(1.0, 0.0));
        let g1 = VariableSource::labeled("G1", Complex64::new(1.0, 0.0));
        let g2 = VariableSource::labeled("G2", Complex64::new(1.0, 0.0));
        let g3 = VariableSource::labeled("G3", Complex64::new(1.0, 0.0));
        let (a, b) = two_node_circuit(&i, &g1, &g2, &g3);
        let voltages = gauss_jordan_symbolic::solved(a, b).unwrap();
        // [[2, -1], [-1, 2]] u = [1, 0]
        let u = evaluate_vector(&voltages);
        assert!((u[0] - Complex64::new(2.0 / 3.0, 0.0)).norm() < 1e-12);
        assert!((u[1] - Complex64::new(1.0 / 3.0, 0.0)).norm() < 1e-12);

        // G3 shorted to a large conductance: U2 goes to zero
        g3.set_value(Complex64::new(1e9, 0.0));
        let u = evaluate_vector(&voltages);
        assert!(u[1].norm() < 1e-8);
        assert!((u[0] - Complex64::new(0.5, 0.0)).norm() < 1e-8);
    }

    #[test]
    fn test_random_system_is_reproducible() {
        let (a1, b1) = random_system(4, 7);
        let (a2, b2) = random_system(4, 7);
        assert_eq!(a1, a2);
        assert_eq!(b1, b2);
        assert!(linear_system_diagnostics(&a1, &b1, 1e6));
    }

    #[test]
    fn test_examples_run() {
        for example in 0..=3 {
            linear_sys_examples(example);
        }
    }
}
