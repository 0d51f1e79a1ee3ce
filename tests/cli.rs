use RustedMathSolver::problem_solver::problem_result::ProblemResult;
use std::process::Command;

fn run(args: &[&str]) -> (Option<i32>, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_RustedMathSolver"))
        .args(args)
        .output()
        .unwrap();
    (output.status.code(), String::from_utf8(output.stdout).unwrap())
}

#[test]
fn no_argument_prints_fixed_failure_and_exits_1() {
    let (code, stdout) = run(&[]);
    assert_eq!(code, Some(1));
    assert_eq!(
        stdout.trim_end(),
        r#"{"success":false,"answer":"No problem provided","explanation":"Please provide a math problem as an argument"}"#
    );
}

#[test]
fn arguments_are_joined_into_one_problem() {
    let (code, stdout) = run(&["integrate", "x^2"]);
    assert_eq!(code, Some(0));
    assert_eq!(stdout.lines().count(), 1);
    let result: ProblemResult = serde_json::from_str(stdout.trim_end()).unwrap();
    assert!(result.success);
    assert_eq!(result.answer, "x**3/3");
}

#[test]
fn unsolved_problem_still_exits_0() {
    let (code, stdout) = run(&["hello world"]);
    assert_eq!(code, Some(0));
    let result: ProblemResult = serde_json::from_str(stdout.trim_end()).unwrap();
    assert!(!result.success);
    assert_eq!(result.answer, "Unable to solve symbolically");
}

#[test]
fn key_order_is_success_answer_explanation() {
    let (_, stdout) = run(&["5x + 3 = 13"]);
    assert!(stdout.starts_with(r#"{"success":true,"answer":"[2]","explanation":""#));
}

#[test]
fn exponent_overflow_prints_json_instead_of_aborting() {
    for problem in ["(x^3037000500)^3037000500", "(2x)^4294967297 = 0"] {
        let (code, stdout) = run(&[problem]);
        assert_eq!(code, Some(0), "{}", problem);
        assert_eq!(stdout.lines().count(), 1);
        let result: ProblemResult = serde_json::from_str(stdout.trim_end()).unwrap();
        assert!(!result.success, "{}", problem);
    }
}
