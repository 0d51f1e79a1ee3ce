#![allow(non_snake_case)]
use RustedMathSolver::Utils::logger::init_logger;
use RustedMathSolver::Utils::solver_config::SolverConfig;
use RustedMathSolver::problem_solver::dispatcher::solve_with_config;
use RustedMathSolver::problem_solver::problem_result::ProblemResult;
use log::LevelFilter;

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() {
        println!("{}", ProblemResult::no_problem().to_json_line());
        std::process::exit(1);
    }
    let problem = args.join(" ");

    let config = SolverConfig::default();
    init_logger(config.level_filter().unwrap_or(LevelFilter::Warn));
    log::debug!("problem: {}", problem);

    let result = std::panic::catch_unwind(|| solve_with_config(&problem, &config))
        .unwrap_or_else(|_| ProblemResult::error("internal failure while solving"));
    println!("{}", result.to_json_line());
}
