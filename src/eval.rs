// ABOUTME: Evaluator module walking the AST to produce runtime values

use crate::ast::{BlockStatement, Expression, Program, Statement};
use crate::env::Environment;
use crate::error::EvalError;
use crate::value::{native_bool_to_value, Value, NULL};
use std::rc::Rc;

/// Recursion guard: past this depth `eval` returns `Value::Error("stack
/// overflow")` rather than overflowing the real call stack, per the
/// language's allowance for implementations to bound recursion depth.
const MAX_RECURSION_DEPTH: usize = 1024;

/// Evaluates a whole program in the given environment, unwrapping a
/// top-level `return` to the value it carries.
pub fn eval(program: &Program, env: Rc<Environment>) -> Result<Value, EvalError> {
    let mut result = NULL;
    for stmt in &program.statements {
        result = eval_statement(stmt, env.clone(), 0)?;
        match result {
            Value::ReturnValue(inner) => return Ok(*inner),
            Value::Error(_) => return Ok(result),
            _ => {}
        }
    }
    Ok(result)
}

fn eval_block_statement(
    block: &BlockStatement,
    env: Rc<Environment>,
    depth: usize,
) -> Result<Value, EvalError> {
    let mut result = NULL;
    for stmt in &block.statements {
        result = eval_statement(stmt, env.clone(), depth)?;
        if matches!(result, Value::ReturnValue(_) | Value::Error(_)) {
            return Ok(result);
        }
    }
    Ok(result)
}

fn eval_statement(
    stmt: &Statement,
    env: Rc<Environment>,
    depth: usize,
) -> Result<Value, EvalError> {
    match stmt {
        Statement::Let { name, value, .. } => {
            let value = eval_expression(value, env.clone(), depth)?;
            if matches!(value, Value::Error(_)) {
                return Ok(value);
            }
            env.define(name.name.clone(), value);
            Ok(NULL)
        }
        Statement::Return { value, .. } => {
            let value = eval_expression(value, env, depth)?;
            if matches!(value, Value::Error(_)) {
                return Ok(value);
            }
            Ok(Value::ReturnValue(Box::new(value)))
        }
        Statement::Expression { expr, .. } => eval_expression(expr, env, depth),
    }
}

fn eval_expression(
    expr: &Expression,
    env: Rc<Environment>,
    depth: usize,
) -> Result<Value, EvalError> {
    if depth > MAX_RECURSION_DEPTH {
        return Ok(Value::Error(EvalError::StackOverflow.to_string()));
    }

    match expr {
        Expression::IntegerLiteral { value, .. } => Ok(Value::Integer(*value)),
        Expression::BooleanLiteral { value, .. } => Ok(native_bool_to_value(*value)),
        Expression::NullLiteral { .. } => Ok(NULL),
        Expression::Identifier(ident) => match env.get(&ident.name) {
            Some(value) => Ok(value),
            None => Ok(Value::Error(
                EvalError::identifier_not_found(&ident.name).to_string(),
            )),
        },
        Expression::Prefix {
            operator, right, ..
        } => {
            let right = eval_expression(right, env, depth + 1)?;
            if matches!(right, Value::Error(_)) {
                return Ok(right);
            }
            Ok(eval_prefix_expression(operator, &right))
        }
        Expression::Infix {
            left,
            operator,
            right,
            ..
        } => {
            let left = eval_expression(left, env.clone(), depth + 1)?;
            if matches!(left, Value::Error(_)) {
                return Ok(left);
            }
            let right = eval_expression(right, env, depth + 1)?;
            if matches!(right, Value::Error(_)) {
                return Ok(right);
            }
            Ok(eval_infix_expression(operator, &left, &right))
        }
        Expression::If {
            condition,
            consequence,
            alternative,
            ..
        } => {
            let condition = eval_expression(condition, env.clone(), depth + 1)?;
            if matches!(condition, Value::Error(_)) {
                return Ok(condition);
            }
            if condition.is_truthy() {
                eval_block_statement(consequence, env, depth + 1)
            } else if let Some(alt) = alternative {
                eval_block_statement(alt, env, depth + 1)
            } else {
                Ok(NULL)
            }
        }
        Expression::FunctionLiteral { params, body, .. } => Ok(Value::Function {
            params: params.clone(),
            body: body.clone(),
            env,
        }),
        Expression::Call { callee, args, .. } => {
            let function = eval_expression(callee, env.clone(), depth + 1)?;
            if matches!(function, Value::Error(_)) {
                return Ok(function);
            }

            let mut evaluated_args = Vec::with_capacity(args.len());
            for arg in args {
                let value = eval_expression(arg, env.clone(), depth + 1)?;
                if matches!(value, Value::Error(_)) {
                    return Ok(value);
                }
                evaluated_args.push(value);
            }

            apply_function(function, evaluated_args, depth + 1)
        }
    }
}

fn apply_function(
    function: Value,
    args: Vec<Value>,
    depth: usize,
) -> Result<Value, EvalError> {
    match function {
        Value::Function { params, body, env } => {
            if params.len() != args.len() {
                return Ok(Value::Error(
                    EvalError::arity_mismatch(params.len(), args.len()).to_string(),
                ));
            }

            let call_env = Environment::with_parent(env);
            for (param, arg) in params.iter().zip(args.into_iter()) {
                call_env.define(param.name.clone(), arg);
            }

            let result = eval_block_statement(&body, call_env, depth)?;
            match result {
                Value::ReturnValue(inner) => Ok(*inner),
                other => Ok(other),
            }
        }
        other => Ok(Value::Error(
            EvalError::not_a_function(other.type_name()).to_string(),
        )),
    }
}

fn eval_prefix_expression(operator: &str, right: &Value) -> Value {
    match operator {
        "!" => eval_bang_operator(right),
        "-" => eval_minus_prefix_operator(right),
        _ => Value::Error(
            EvalError::unknown_prefix_operator(operator, right.type_name()).to_string(),
        ),
    }
}

fn eval_bang_operator(right: &Value) -> Value {
    native_bool_to_value(!right.is_truthy())
}

fn eval_minus_prefix_operator(right: &Value) -> Value {
    match right {
        Value::Integer(n) => Value::Integer(-n),
        other => Value::Error(
            EvalError::unknown_prefix_operator("-", other.type_name()).to_string(),
        ),
    }
}

fn eval_infix_expression(operator: &str, left: &Value, right: &Value) -> Value {
    match (left, right) {
        (Value::Integer(l), Value::Integer(r)) => eval_integer_infix_expression(operator, *l, *r),
        // Reference/structural equality on booleans and null: these are
        // singleton-valued, so `==`/`!=` reduce to a plain match. Any other
        // operator between them is unsupported.
        _ if operator == "==" => native_bool_to_value(values_equal(left, right)),
        _ if operator == "!=" => native_bool_to_value(!values_equal(left, right)),
        _ if left.type_name() != right.type_name() => Value::Error(
            EvalError::type_mismatch(left.type_name(), operator, right.type_name()).to_string(),
        ),
        _ => Value::Error(
            EvalError::unknown_infix_operator(left.type_name(), operator, right.type_name())
                .to_string(),
        ),
    }
}

fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Boolean(l), Value::Boolean(r)) => l == r,
        (Value::Null, Value::Null) => true,
        _ => false,
    }
}

/// Integer division truncates toward zero (Rust's native `/` semantics),
/// and dividing by zero is a runtime error rather than a panic.
fn eval_integer_infix_expression(operator: &str, left: i64, right: i64) -> Value {
    match operator {
        "+" => Value::Integer(left + right),
        "-" => Value::Integer(left - right),
        "*" => Value::Integer(left * right),
        "/" => {
            if right == 0 {
                Value::Error(EvalError::DivisionByZero.to_string())
            } else {
                Value::Integer(left / right)
            }
        }
        "<" => native_bool_to_value(left < right),
        ">" => native_bool_to_value(left > right),
        "==" => native_bool_to_value(left == right),
        "!=" => native_bool_to_value(left != right),
        _ => Value::Error(
            EvalError::unknown_infix_operator("INTEGER", operator, "INTEGER").to_string(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn eval_source(source: &str) -> Value {
        let (program, errors) = parse(source);
        assert!(errors.is_empty(), "parser errors: {:?}", errors);
        let env = Environment::new();
        eval(&program, env).expect("eval should not fail at the Rust level")
    }

    fn assert_integer(value: &Value, expected: i64) {
        match value {
            Value::Integer(n) => assert_eq!(*n, expected),
            other => panic!("expected Integer({}), got {:?}", expected, other),
        }
    }

    #[test]
    fn test_eval_integer_expression() {
        let cases = [
            ("5", 5),
            ("10", 10),
            ("-5", -5),
            ("-10", -10),
            ("5 + 5 + 5 + 5 - 10", 10),
            ("2 * 2 * 2 * 2 * 2", 32),
            ("-50 + 100 + -50", 0),
            ("5 * 2 + 10", 20),
            ("5 + 2 * 10", 25),
            ("20 + 2 * -10", 0),
            ("50 / 2 * 2 + 10", 60),
            ("2 * (5 + 10)", 30),
            ("3 * 3 * 3 + 10", 37),
            ("3 * (3 * 3) + 10", 37),
            ("(5 + 10 * 2 + 15 / 3) * 2 + -10", 50),
        ];

        for (input, expected) in cases {
            assert_integer(&eval_source(input), expected);
        }
    }

    #[test]
    fn test_eval_boolean_expression() {
        let cases = [
            ("true", true),
            ("false", false),
            ("1 < 2", true),
            ("1 > 2", false),
            ("1 < 1", false),
            ("1 > 1", false),
            ("1 == 1", true),
            ("1 != 1", false),
            ("1 == 2", false),
            ("1 != 2", true),
            ("true == true", true),
            ("false == false", true),
            ("true == false", false),
            ("true != false", true),
            ("(1 < 2) == true", true),
            ("(1 < 2) == false", false),
        ];

        for (input, expected) in cases {
            match eval_source(input) {
                Value::Boolean(b) => assert_eq!(b, expected, "for input {}", input),
                other => panic!("expected Boolean({}), got {:?}", expected, other),
            }
        }
    }

    #[test]
    fn test_bang_operator() {
        let cases = [
            ("!true", false),
            ("!false", true),
            ("!5", false),
            ("!!true", true),
            ("!!false", false),
            ("!!5", true),
        ];
        for (input, expected) in cases {
            match eval_source(input) {
                Value::Boolean(b) => assert_eq!(b, expected),
                other => panic!("unexpected value: {:?}", other),
            }
        }
    }

    #[test]
    fn test_if_else_expressions() {
        assert_integer(&eval_source("if (true) { 10 }"), 10);
        assert!(matches!(eval_source("if (false) { 10 }"), Value::Null));
        assert_integer(&eval_source("if (1) { 10 }"), 10);
        assert_integer(&eval_source("if (1 < 2) { 10 }"), 10);
        assert!(matches!(eval_source("if (1 > 2) { 10 }"), Value::Null));
        assert_integer(&eval_source("if (1 > 2) { 10 } else { 20 }"), 20);
        assert_integer(&eval_source("if (1 < 2) { 10 } else { 20 }"), 10);
    }

    #[test]
    fn test_return_statements() {
        assert_integer(&eval_source("return 10;"), 10);
        assert_integer(&eval_source("return 10; 9;"), 10);
        assert_integer(&eval_source("return 2 * 5; 9;"), 10);
        assert_integer(&eval_source("9; return 2 * 5; 9;"), 10);

        let nested = "
            if (10 > 1) {
                if (10 > 1) {
                    return 10;
                }
                return 1;
            }
        ";
        assert_integer(&eval_source(nested), 10);
    }

    #[test]
    fn test_error_handling() {
        let cases = [
            ("5 + true;", "type mismatch: INTEGER + BOOLEAN"),
            ("5 + true; 5;", "type mismatch: INTEGER + BOOLEAN"),
            ("-true", "unknown operator: -BOOLEAN"),
            ("true + false;", "unknown operator: BOOLEAN + BOOLEAN"),
            ("5; true + false; 5", "unknown operator: BOOLEAN + BOOLEAN"),
            (
                "if (10 > 1) { true + false; }",
                "unknown operator: BOOLEAN + BOOLEAN",
            ),
            (
                "
                if (10 > 1) {
                    if (10 > 1) {
                        return true + false;
                    }
                    return 1;
                }
                ",
                "unknown operator: BOOLEAN + BOOLEAN",
            ),
            ("foobar", "identifier not found: foobar"),
            ("10 / 0", "division by zero"),
        ];

        for (input, expected_message) in cases {
            match eval_source(input) {
                Value::Error(msg) => assert_eq!(msg, expected_message, "for input {}", input),
                other => panic!("expected Error({:?}), got {:?}", expected_message, other),
            }
        }
    }

    #[test]
    fn test_let_statements() {
        assert_integer(&eval_source("let a = 5; a;"), 5);
        assert_integer(&eval_source("let a = 5 * 5; a;"), 25);
        assert_integer(&eval_source("let a = 5; let b = a; b;"), 5);
        assert_integer(&eval_source("let a = 5; let b = a; let c = a + b + 5; c;"), 15);
    }

    #[test]
    fn test_function_application() {
        assert_integer(&eval_source("let identity = fn(x) { x; }; identity(5);"), 5);
        assert_integer(
            &eval_source("let identity = fn(x) { return x; }; identity(5);"),
            5,
        );
        assert_integer(&eval_source("let double = fn(x) { x * 2; }; double(5);"), 10);
        assert_integer(
            &eval_source("let add = fn(x, y) { x + y; }; add(5, 5);"),
            10,
        );
        assert_integer(
            &eval_source("let add = fn(x, y) { x + y; }; add(5 + 5, add(5, 5));"),
            20,
        );
        assert_integer(&eval_source("fn(x) { x; }(5)"), 5);
    }

    #[test]
    fn test_closures() {
        let source = "
            let newAdder = fn(x) {
                fn(y) { x + y };
            };
            let addTwo = newAdder(2);
            addTwo(2);
        ";
        assert_integer(&eval_source(source), 4);
    }

    #[test]
    fn test_recursive_closures() {
        let source = "
            let counter = fn(x) {
                if (x > 100) {
                    return x;
                } else {
                    counter(x + 1);
                }
            };
            counter(0);
        ";
        assert_integer(&eval_source(source), 101);
    }

    #[test]
    fn test_wrong_number_of_arguments() {
        match eval_source("let add = fn(x, y) { x + y; }; add(1);") {
            Value::Error(msg) => assert_eq!(msg, "wrong number of arguments: want=2, got=1"),
            other => panic!("unexpected value: {:?}", other),
        }
    }

    #[test]
    fn test_calling_non_function_is_error() {
        match eval_source("let x = 5; x(1);") {
            Value::Error(msg) => assert_eq!(msg, "not a function: INTEGER"),
            other => panic!("unexpected value: {:?}", other),
        }
    }
}
