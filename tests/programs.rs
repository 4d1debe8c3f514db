use kamin_lisp::evaluator::Error;
use kamin_lisp::{Config, Interpreter, Value};

fn run_with(config: Config, program: &str) -> (String, Vec<Result<Value, Error>>) {
    let mut interpreter = Interpreter::with_output(Vec::new(), config);
    let results = interpreter
        .run_program(program)
        .expect("program should be readable");
    let output = String::from_utf8(interpreter.into_output()).unwrap();
    (output, results)
}

fn run(program: &str) -> String {
    let (output, results) = run_with(Config::default(), program);
    for result in &results {
        if let Err(e) = result {
            panic!("statement failed: {}", e);
        }
    }
    output
}

#[test]
fn arithmetic_and_predicates() {
    let program = "
        ((PRINT (- 5 15))
         (PRINT (/ 1 10))
         (PRINT (< 3 1))
         (PRINT (> 3 1))
         (PRINT (NULL? ()))
         (PRINT (NUMBER? (CONS 1 ()))))";
    assert_eq!(run(program), "-10\n0.1\n()\nt\nt\n()\n");
}

#[test]
fn list_construction() {
    let program = "
        ((SET L (CONS 10 20))
         (PRINT L)
         (PRINT (CAR L))
         (PRINT (CDR L)))";
    assert_eq!(run(program), "(10 20)\n10\n(20)\n");
}

#[test]
fn nested_cons_keeps_two_elements() {
    let program = "
        ((SET L (CONS 10 (CONS 20 ())))
         (PRINT L)
         (PRINT (CDR L))
         (PRINT (CAR (CAR (CDR L)))))";
    assert_eq!(run(program), "(10 (20 ()))\n((20 ()))\n20\n");
}

#[test]
fn silent_programs_print_nothing() {
    assert_eq!(run("((SET X 1) (SET Y (+ X 1)) (DEFINE ID (A) A))"), "");
}

#[test]
fn procedures_and_globals() {
    let program = "
        ((SET X 10)
         (DEFINE ADDX (N) (+ N X))
         (PRINT (ADDX 12)))";
    assert_eq!(run(program), "22\n");
}

#[test]
fn while_loop_counts_down() {
    let program = "
        ((SET N 5)
         (WHILE (> N 0) (SET N (- N 1)))
         (PRINT N))";
    assert_eq!(run(program), "0\n");
}

#[test]
fn mixed_predicates() {
    let program = "
        ((SET L (CONS 10 20))
         (PRINT L)
         (PRINT (CAR L))
         (PRINT (CDR L))
         (PRINT (LIST? L))
         (PRINT (LIST? 7))
         (PRINT (SYMBOL? (CAR (CONS T ()))))
         (PRINT (NUMBER? 2.5))
         (PRINT (= L (CONS 10 20)))
         (PRINT (/ 4 2)))";
    assert_eq!(
        run(program),
        "(10 20)\n10\n(20)\nt\n()\nt\nt\nt\n2.0\n"
    );
}

#[test]
fn conditionals() {
    let program = "
        ((PRINT (IF (= 1 1) T ()))
         (PRINT (IF (< 1 2) (= 2 2) 5))
         (PRINT (IF (> 1 2) T ()))
         (PRINT (IF () 1 ()))
         (PRINT (IF T (CONS 10 20) 0)))";
    assert_eq!(run(program), "t\nt\n()\n()\n(10 20)\n");
}

#[test]
fn recursive_procedure() {
    let program = "
        ((DEFINE SUMTO (N) (IF (= N 0) 0 (+ N (SUMTO (- N 1)))))
         (PRINT (- (SUMTO 5) 4)))";
    assert_eq!(run(program), "11\n");
}

#[test]
fn procedures_do_not_leak_parameters() {
    let program = "
        ((SET LAT 10)
         (DEFINE FOO (LAT) (* LAT 2))
         (DEFINE BAR (X) (+ X LAT))
         (PRINT (FOO 3))
         (PRINT LAT)
         (PRINT (- (BAR 5) 5)))";
    assert_eq!(run(program), "6\n10\n10\n");
}

#[test]
fn factorial_by_recursion_and_by_loop() {
    let program = "
        ((DEFINE FACT (N) (IF (< N 2) 1 (* N (FACT (- N 1)))))
         (PRINT (FACT 10))
         (SET ACC 1)
         (SET I 1)
         (WHILE (< I 6) (BEGIN (SET ACC (* ACC I)) (SET I (+ I 1))))
         (PRINT ACC))";
    assert_eq!(run(program), "3628800\n120\n");
}

#[test]
fn procedures_as_values() {
    let program = "
        ((DEFINE SQ (X) (* X X))
         (SET F SQ)
         (PRINT (F 7))
         (PRINT ((CAR (CONS + ())) 1 2)))";
    assert_eq!(run(program), "49\n3\n");
}

#[test]
fn math_supplements() {
    let program = "
        ((PRINT (SQRT 16))
         (PRINT (ABS -3))
         (PRINT (POW 2 10))
         (PRINT (FLOOR 2.7)))";
    assert_eq!(run(program), "4.0\n3\n1024.0\n2\n");
}

#[test]
fn failures_are_reported_per_statement() {
    let (output, results) = run_with(
        Config::default(),
        "(PRINT 1) (CAR ()) (UNDEFINED 2) (/ 1 0) (PRINT 2)",
    );
    assert_eq!(output, "1\n2\n");
    assert_eq!(results.len(), 5);
    assert!(results[0].is_ok());
    assert!(results[1].is_err());
    assert!(matches!(results[2], Err(Error::UnknownOperator(_))));
    assert!(matches!(results[3], Err(Error::Arithmetic(_))));
    assert!(results[4].is_ok());
}

#[test]
fn limits_stop_runaway_programs() {
    let config = Config {
        max_iterations: Some(100),
        max_depth: Some(50),
        allow_redefinition: false,
    };
    let program = "
        (WHILE T (PRINT 1))
        (DEFINE LOOP (N) (LOOP N))
        (LOOP 1)
        (DEFINE LOOP (N) N)";
    let (output, results) = run_with(config, program);
    assert_eq!(output.lines().count(), 100);
    assert!(matches!(results[0], Err(Error::IterationLimit(100))));
    assert!(results[1].is_ok());
    assert!(matches!(results[2], Err(Error::RecursionLimit(50))));
    assert!(matches!(results[3], Err(Error::Redefinition(_))));
}
