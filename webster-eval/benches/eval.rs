use criterion::{criterion_group, criterion_main, Criterion};
use webster_eval::eval_program;
use webster_parser::ast::Program;
use webster_parser::parse;
use webster_source::Source;
use webster_value::Environment;

fn compile(source: &str) -> Program {
    let source = Source::new(source);
    let program = parse(&source);
    assert!(source.has_no_errors());
    program
}

fn run(program: &Program) {
    let env = Environment::new().into_ref();
    eval_program(program, &env).unwrap();
}

fn fib(c: &mut Criterion) {
    let program = compile(
        r#"
        let fib = fn(n) {
            if n < 2 { return n }
            fib(n - 1) + fib(n - 2)
        };
        fib(20)"#,
    );
    c.bench_function("fib", |b| b.iter(|| run(&program)));
}

fn loops(c: &mut Criterion) {
    let program = compile(
        r#"
        var i = 0;
        var sum = 0;
        let xs = [0, 0, 0, 0, 0, 0, 0, 0, 0, 0];
        while i < 10000 {
            xs[i - i / 10 * 10] = i;
            sum = sum + xs[0];
            i = i + 1;
        }
        for x in xs { x }"#,
    );
    c.bench_function("loops", |b| b.iter(|| run(&program)));
}

fn dictionaries(c: &mut Criterion) {
    let program = compile(
        r#"
        let d = {};
        var i = 0;
        while i < 2000 {
            d[i] = "value";
            d["k"] = d[i];
            i = i + 1;
        }
        let count = [0];
        for k, v in d { count[0] = count[0] + 1 }
        count[0]"#,
    );
    c.bench_function("dictionaries", |b| b.iter(|| run(&program)));
}

criterion_group!(benches, fib, loops, dictionaries);
criterion_main!(benches);
