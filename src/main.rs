// Copyright (c)  by Gleb E. Zaslavkiy
//MIT License
#![allow(non_snake_case)]
use RustedLinSolve::Examples::linear_sys_examples::linear_sys_examples;
use RustedLinSolve::somelinalg::linear_system::LinearSystem;
use std::env;
use std::process::ExitCode;

/// `RustedLinSolve <task file> [output file]` solves the task document;
/// `RustedLinSolve --example <n>` runs a built-in example; without arguments example 0 runs.
fn main() -> ExitCode {
    let args: Vec<String> = env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        None => {
            linear_sys_examples(0);
            ExitCode::SUCCESS
        }
        Some("--example") => {
            let example = args.get(1).and_then(|n| n.parse::<usize>().ok()).unwrap_or(0);
            linear_sys_examples(example);
            ExitCode::SUCCESS
        }
        Some(task_file) => {
            let mut system = match LinearSystem::from_task_file(task_file) {
                Ok(system) => system,
                Err(e) => {
                    eprintln!("{}", e);
                    return ExitCode::FAILURE;
                }
            };
            let solution = match system.solve() {
                Ok(solution) => solution,
                Err(e) => {
                    eprintln!("{}", e);
                    return ExitCode::FAILURE;
                }
            };
            for (name, value) in system.unknowns.iter().zip(solution.iter()) {
                println!("{} = {}", name, value);
            }
            if let Some(output) = args.get(1) {
                if let Err(e) = system.save_result(output) {
                    eprintln!("cannot save result to {}: {}", output, e);
                    return ExitCode::FAILURE;
                }
                println!("result saved to {}", output);
            }
            ExitCode::SUCCESS
        }
    }
}
